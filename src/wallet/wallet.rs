//! Coin wallet implementation
//!
//! A wallet holds an account's coins bucketed by denomination. Within a
//! bucket coins are kept in insertion order and spent oldest first.

use crate::core::coin::{Coin, DENOMINATIONS};
use std::collections::{BTreeMap, VecDeque};
use thiserror::Error;

/// Wallet-related errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum WalletError {
    #[error("Payment amount must be greater than zero")]
    ZeroAmount,
    #[error("Insufficient exact change for {amount}")]
    InsufficientExactChange { amount: u64 },
}

/// Coins staged for a payment
///
/// The coins are already out of the wallet. Either hand them on by
/// consuming the selection, or give them back with [`CoinWallet::restore`].
#[derive(Debug)]
#[must_use = "staged coins are lost unless committed or restored"]
pub struct CoinSelection {
    coins: Vec<Coin>,
}

impl CoinSelection {
    pub fn coins(&self) -> &[Coin] {
        &self.coins
    }

    /// Sum of the staged denominations
    pub fn total(&self) -> u64 {
        self.coins.iter().map(Coin::denomination).sum()
    }

    /// Commit the selection, taking ownership of the coins
    pub fn into_coins(self) -> Vec<Coin> {
        self.coins
    }
}

/// Per-account coin inventory
#[derive(Debug, Clone)]
pub struct CoinWallet {
    address: String,
    coins: BTreeMap<u64, VecDeque<Coin>>,
}

impl CoinWallet {
    /// Create an empty wallet with a bucket for every denomination
    pub fn new(address: &str) -> Self {
        Self {
            address: address.to_string(),
            coins: DENOMINATIONS
                .iter()
                .map(|d| (*d, VecDeque::new()))
                .collect(),
        }
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    /// Append a coin to its denomination's bucket
    ///
    /// The coin's owner is not checked against the wallet address.
    pub fn add_coin(&mut self, coin: Coin) {
        self.coins
            .entry(coin.denomination())
            .or_default()
            .push_back(coin);
    }

    /// Total value held
    pub fn balance(&self) -> u64 {
        self.coins
            .iter()
            .map(|(denomination, bucket)| denomination * bucket.len() as u64)
            .sum()
    }

    pub fn coin_count(&self) -> usize {
        self.coins.values().map(VecDeque::len).sum()
    }

    pub fn coins_by_denomination(&self) -> &BTreeMap<u64, VecDeque<Coin>> {
        &self.coins
    }

    /// All coins, smallest denomination first
    pub fn all_coins(&self) -> Vec<&Coin> {
        self.coins.values().flatten().collect()
    }

    pub fn contains(&self, serial: &str) -> bool {
        self.coins.values().flatten().any(|c| c.serial() == serial)
    }

    /// Select coins summing exactly to `amount`
    ///
    /// Greedy over denominations, largest first, taking the oldest coin of
    /// each. If the amount cannot be matched exactly the wallet is left as
    /// it was, even when the balance would cover it.
    pub fn find_coins_for_amount(&mut self, amount: u64) -> Result<CoinSelection, WalletError> {
        if amount == 0 {
            return Err(WalletError::ZeroAmount);
        }

        let mut remaining = amount;
        let mut selection = CoinSelection { coins: Vec::new() };

        for (&denomination, bucket) in self.coins.iter_mut().rev() {
            while remaining >= denomination {
                let Some(coin) = bucket.pop_front() else {
                    break;
                };
                remaining -= denomination;
                selection.coins.push(coin);
            }
        }

        if remaining > 0 {
            self.restore(selection);
            return Err(WalletError::InsufficientExactChange { amount });
        }

        Ok(selection)
    }

    /// Return staged coins to their original positions
    pub fn restore(&mut self, selection: CoinSelection) {
        // Within a bucket the staged coins were taken from the front in order,
        // so pushing them back in reverse rebuilds the original queue.
        for coin in selection.coins.into_iter().rev() {
            self.coins
                .entry(coin.denomination())
                .or_default()
                .push_front(coin);
        }
    }
}
