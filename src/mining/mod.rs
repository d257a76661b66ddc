//! Mining module: proof-of-work search, bounds and cancellation

pub mod control;
pub mod miner;

pub use control::{MiningControl, MiningError};
pub use miner::{seal_block, MiningStats};
