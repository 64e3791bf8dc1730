pub mod client;
pub mod contract;
pub mod metadata;
pub mod service;
pub mod simulator;
