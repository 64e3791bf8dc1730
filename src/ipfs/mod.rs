pub mod client;
pub mod pinata;
pub mod simulator;
