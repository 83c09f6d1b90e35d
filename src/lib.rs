pub mod arena;
pub mod constants;
pub mod engine;
pub mod flood;
pub mod rng;
pub mod server_protocol;
pub mod session;
pub mod strategy;
pub mod types;
