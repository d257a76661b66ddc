//! Accounts: a key pair, its derived address, and the coins it owns

use crate::core::transaction::{Transaction, TransactionError};
use crate::crypto::KeyPair;
use crate::wallet::wallet::CoinWallet;
use secp256k1::PublicKey;

/// A ledger participant
#[derive(Debug, Clone)]
pub struct Account {
    key_pair: KeyPair,
    address: String,
    wallet: CoinWallet,
}

impl Account {
    /// Create an account with a fresh key pair and an empty wallet
    pub fn new() -> Self {
        Self::from_key_pair(KeyPair::generate())
    }

    /// Create an account around an existing key pair
    pub fn from_key_pair(key_pair: KeyPair) -> Self {
        let address = key_pair.address();
        let wallet = CoinWallet::new(&address);
        Self {
            key_pair,
            address,
            wallet,
        }
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn public_key(&self) -> &PublicKey {
        self.key_pair.public_key()
    }

    pub fn public_key_hex(&self) -> String {
        self.key_pair.public_key_hex()
    }

    pub fn wallet(&self) -> &CoinWallet {
        &self.wallet
    }

    pub fn wallet_mut(&mut self) -> &mut CoinWallet {
        &mut self.wallet
    }

    pub fn balance(&self) -> u64 {
        self.wallet.balance()
    }

    /// Sign a transaction with this account's key
    pub fn sign_transaction(&self, tx: &mut Transaction) -> Result<(), TransactionError> {
        tx.sign(&self.key_pair)
    }
}

impl Default for Account {
    fn default() -> Self {
        Self::new()
    }
}
