//! Block implementation for the ledger
//!
//! A block is an ordered batch of transactions sealed by proof of work and
//! linked to its predecessor through `previous_hash`.

use crate::core::encoding::{block_value, canonical_string, transactions_value};
use crate::core::transaction::Transaction;
use crate::crypto::{meets_difficulty, sha256_hex};
use crate::mining::{MiningControl, MiningError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// `previous_hash` of the genesis block
pub const GENESIS_PREVIOUS_HASH: &str = "0";

/// A block in the chain
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Block {
    /// Position in the chain (genesis = 0)
    pub index: u64,
    /// Transactions in admission order
    pub transactions: Vec<Transaction>,
    /// Hash of the previous block
    pub previous_hash: String,
    /// Block creation timestamp
    pub timestamp: DateTime<Utc>,
    /// Nonce used for proof of work
    pub nonce: u64,
    /// Block hash (cached; recompute with [`Block::calculate_hash`])
    pub hash: String,
}

impl Block {
    /// Create a new block (unmined)
    pub fn new(index: u64, previous_hash: String, transactions: Vec<Transaction>) -> Self {
        let mut block = Self {
            index,
            transactions,
            previous_hash,
            timestamp: Utc::now(),
            nonce: 0,
            hash: String::new(),
        };
        block.hash = block.calculate_hash();
        block
    }

    /// Create and mine the genesis block under the limits of `control`
    pub fn genesis(difficulty: u32, control: &MiningControl) -> Result<Self, MiningError> {
        let mut block = Self::new(0, GENESIS_PREVIOUS_HASH.to_string(), Vec::new());
        block.mine_with(difficulty, control)?;
        Ok(block)
    }

    fn hash_with(&self, transactions: &Value, nonce: u64) -> String {
        let value = block_value(
            self.index,
            transactions,
            &self.previous_hash,
            &self.timestamp,
            nonce,
        );
        sha256_hex(canonical_string(&value).as_bytes())
    }

    /// Calculate the hash of the block from its stored fields
    pub fn calculate_hash(&self) -> String {
        self.hash_with(&transactions_value(&self.transactions), self.nonce)
    }

    /// Mine the block with no attempt bound
    ///
    /// Returns the number of hashes computed. The only possible error is
    /// [`MiningError::NonceSpaceExhausted`].
    pub fn mine(&mut self, difficulty: u32) -> Result<u64, MiningError> {
        self.mine_with(difficulty, &MiningControl::unbounded())
    }

    /// Search for a nonce under the limits of `control`
    ///
    /// `nonce` and `hash` are only updated once a valid nonce is found.
    pub fn mine_with(&mut self, difficulty: u32, control: &MiningControl) -> Result<u64, MiningError> {
        let transactions = transactions_value(&self.transactions);
        let mut nonce = 0u64;

        loop {
            let hash = self.hash_with(&transactions, nonce);
            let attempts = nonce + 1;

            if meets_difficulty(&hash, difficulty) {
                self.nonce = nonce;
                self.hash = hash;
                return Ok(attempts);
            }

            if control.is_cancelled() {
                return Err(MiningError::Cancelled { attempts });
            }
            if let Some(max) = control.max_attempts() {
                if attempts >= max {
                    return Err(MiningError::AttemptsExhausted(max));
                }
            }

            nonce = nonce.checked_add(1).ok_or(MiningError::NonceSpaceExhausted)?;
        }
    }

    /// Check if the stored hash meets the difficulty target
    pub fn meets_difficulty(&self, difficulty: u32) -> bool {
        meets_difficulty(&self.hash, difficulty)
    }

    /// Verify the stored hash against the block's fields
    pub fn verify_hash(&self) -> bool {
        self.hash == self.calculate_hash()
    }

    pub fn tx_count(&self) -> usize {
        self.transactions.len()
    }
}
