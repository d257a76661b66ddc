//! eRupee chain: a denomination-based coin ledger in Rust
//!
//! Value is held as discrete coins of fixed denominations, each with a
//! unique serial and an ownership history, rather than as account balances.
//! This crate provides:
//! - Coin wallets with exact-change greedy coin selection
//! - ECDSA-signed transfers (secp256k1)
//! - Proof of Work block sealing with cancellable mining
//! - Hash-chain integrity verification
//!
//! # Example
//!
//! ```rust
//! use erupee_chain::core::Ledger;
//!
//! let mut ledger = Ledger::with_difficulty(1).unwrap();
//! let alice = ledger.create_account();
//! let bob = ledger.create_account();
//!
//! ledger.issue_funds(&alice, 25).unwrap();
//! assert!(ledger.add_transaction(&alice, &bob, 20));
//!
//! ledger.mine_pending_transactions(&bob).unwrap();
//! assert_eq!(ledger.get_balance(&bob).unwrap(), 30);
//! assert!(ledger.is_chain_valid());
//! ```

pub mod cli;
pub mod core;
pub mod crypto;
pub mod mining;
pub mod wallet;

// Re-export commonly used types
pub use core::{
    Block, Coin, HistoryEntry, Ledger, LedgerConfig, LedgerError, SharedLedger, Transaction,
    BLOCK_REWARD, DEFAULT_DIFFICULTY, DENOMINATIONS,
};
pub use crypto::KeyPair;
pub use mining::{MiningControl, MiningStats};
pub use wallet::{Account, CoinWallet};
