pub mod client;
pub mod contract;
pub mod service;
pub mod simulator;
