use alloy::primitives::U256;
use alloy::primitives::utils::{format_ether, parse_ether};
use anyhow::{Context, Result};
use rust_decimal::Decimal;

/// 10^18, the scale of both ether and the launchpad's 18-decimal tokens.
pub const UNIT: U256 = U256::from_limbs([1_000_000_000_000_000_000, 0, 0, 0]);

/// Converts a user-entered ether amount to wei.
pub fn to_wei(amount: Decimal) -> Result<U256> {
    anyhow::ensure!(
        !amount.is_sign_negative(),
        "amount must not be negative: {}",
        amount
    );
    let text = amount.normalize().to_string();
    parse_ether(&text).with_context(|| format!("invalid ether amount '{}'", text))
}

/// Scales a whole-token count to its 18-decimal base units.
pub fn scale_whole(amount: U256) -> Result<U256> {
    amount
        .checked_mul(UNIT)
        .ok_or_else(|| anyhow::anyhow!("amount {} overflows when scaled", amount))
}

pub fn format_wei(value: U256) -> String {
    format_ether(value)
}
