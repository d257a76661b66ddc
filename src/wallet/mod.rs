//! Wallet module: accounts and their coin inventories

pub mod account;
pub mod wallet;

pub use account::Account;
pub use wallet::{CoinSelection, CoinWallet, WalletError};
