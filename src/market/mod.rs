pub mod bets;
pub mod holders;
pub mod listing;
pub mod pagination;
