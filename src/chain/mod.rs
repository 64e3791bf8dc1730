pub mod contracts;
pub mod provider;
pub mod units;
