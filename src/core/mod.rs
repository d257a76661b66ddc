//! Core ledger components
//!
//! This module contains the fundamental building blocks:
//! - Coins (fixed denominations, serials, provenance)
//! - Transactions (signed transfers of specific coins)
//! - Blocks (with proof of work)
//! - Ledger (chain, pending pool, accounts, validation)
//! - Canonical encoding shared by hashing and signing
//! - Shared async handle for concurrent hosts

pub mod block;
pub mod blockchain;
pub mod coin;
pub mod encoding;
pub mod shared;
pub mod transaction;

pub use block::{Block, GENESIS_PREVIOUS_HASH};
pub use blockchain::{
    ChainError, ChainStats, CoinRef, HistoryEntry, Ledger, LedgerConfig, LedgerError,
    TransferKind, BLOCK_REWARD, DEFAULT_DIFFICULTY,
};
pub use coin::{decompose_amount, is_valid_denomination, Coin, CoinError, CoinTransfer, DENOMINATIONS};
pub use shared::SharedLedger;
pub use transaction::{Transaction, TransactionError};
