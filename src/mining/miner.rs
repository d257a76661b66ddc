//! Mining engine for the ledger
//!
//! Wraps the nonce search with timing and logging.

use crate::core::Block;
use crate::mining::control::{MiningControl, MiningError};
use log::info;
use serde::Serialize;
use std::time::Instant;

/// Mining statistics
#[derive(Debug, Clone, Serialize)]
pub struct MiningStats {
    /// Index of the sealed block
    pub block_index: u64,
    /// Hash of the sealed block
    pub block_hash: String,
    /// Number of hash attempts
    pub hash_attempts: u64,
    /// Time taken in milliseconds
    pub time_ms: u128,
    /// Hash rate (hashes per second)
    pub hash_rate: f64,
}

/// Seal `block` with proof of work and report how it went
pub fn seal_block(
    block: &mut Block,
    difficulty: u32,
    control: &MiningControl,
) -> Result<MiningStats, MiningError> {
    let start = Instant::now();

    info!(
        "Mining block {} with difficulty {} ({} transactions)...",
        block.index,
        difficulty,
        block.tx_count()
    );

    let attempts = block.mine_with(difficulty, control)?;

    let elapsed = start.elapsed().as_millis();
    let hash_rate = if elapsed > 0 {
        (attempts as f64) / (elapsed as f64 / 1000.0)
    } else {
        attempts as f64
    };

    info!(
        "Block {} mined in {}ms ({} attempts, {:.2} H/s)",
        block.index, elapsed, attempts, hash_rate
    );

    Ok(MiningStats {
        block_index: block.index,
        block_hash: block.hash.clone(),
        hash_attempts: attempts,
        time_ms: elapsed,
        hash_rate,
    })
}
