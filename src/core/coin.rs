//! Coin tokens
//!
//! A coin is a discrete value token of a fixed denomination, identified by
//! a serial number assigned once at mint time. Ownership moves between
//! addresses and every move is appended to the coin's history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// The canonical denomination set, in ascending order.
///
/// Greedy change-making is optimal for this set.
pub const DENOMINATIONS: [u64; 6] = [1, 2, 5, 10, 50, 100];

/// Coin-related errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum CoinError {
    #[error("Invalid denomination {0}: must be one of {:?}", DENOMINATIONS)]
    InvalidDenomination(u64),
}

/// Returns true if `value` is one of the canonical denominations
pub fn is_valid_denomination(value: u64) -> bool {
    DENOMINATIONS.contains(&value)
}

/// One ownership transfer in a coin's provenance trail
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CoinTransfer {
    pub from: String,
    pub to: String,
    pub timestamp: DateTime<Utc>,
}

/// A coin with an immutable denomination and serial
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Coin {
    denomination: u64,
    serial: String,
    owner: String,
    history: Vec<CoinTransfer>,
}

impl Coin {
    /// Mint a new coin owned by `owner`
    pub fn mint(denomination: u64, owner: &str) -> Result<Self, CoinError> {
        if !is_valid_denomination(denomination) {
            return Err(CoinError::InvalidDenomination(denomination));
        }

        Ok(Self {
            denomination,
            serial: Uuid::new_v4().to_string(),
            owner: owner.to_string(),
            history: Vec::new(),
        })
    }

    pub fn denomination(&self) -> u64 {
        self.denomination
    }

    pub fn serial(&self) -> &str {
        &self.serial
    }

    /// Current owner address
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Every ownership transfer since mint, oldest first
    pub fn history(&self) -> &[CoinTransfer] {
        &self.history
    }

    /// Record a transfer and move ownership to `to`
    pub fn record_transfer(&mut self, from: &str, to: &str, timestamp: DateTime<Utc>) {
        self.history.push(CoinTransfer {
            from: from.to_string(),
            to: to.to_string(),
            timestamp,
        });
        self.owner = to.to_string();
    }
}

/// Decompose `amount` into canonical denominations, largest first
///
/// Always succeeds because the set contains 1.
pub fn decompose_amount(amount: u64) -> Vec<u64> {
    let mut remaining = amount;
    let mut parts = Vec::new();

    for &denomination in DENOMINATIONS.iter().rev() {
        while remaining >= denomination {
            parts.push(denomination);
            remaining -= denomination;
        }
    }

    parts
}
