//! Transaction handling for the ledger
//!
//! A transaction moves a specific, already-selected set of coins from one
//! address to another. It is authorized by the sender's secp256k1 signature
//! over the canonical encoding of its fields.

use crate::core::coin::Coin;
use crate::core::encoding::{canonical_string, signable_value};
use crate::crypto::{public_key_from_hex, public_key_to_address, verify_signature, KeyPair};
use chrono::{DateTime, Utc};
use secp256k1::PublicKey;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// =============================================================================
// Error Types
// =============================================================================

/// Transaction-related errors
#[derive(Error, Debug)]
pub enum TransactionError {
    #[error("Transaction amount must be greater than zero")]
    ZeroAmount,
    #[error("Amount mismatch: declared {declared}, coins sum to {actual}")]
    AmountMismatch { declared: u64, actual: u64 },
    #[error("Crypto error: {0}")]
    CryptoError(#[from] crate::crypto::KeyError),
}

// =============================================================================
// Transaction
// =============================================================================

/// A signed transfer of a specific coin set
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    /// Sender's address
    pub sender: String,
    /// Recipient's address
    pub recipient: String,
    /// Sender's public key (hex, compressed); filled in by [`Transaction::sign`]
    pub sender_public_key: Option<String>,
    /// Sum of the moved coins' denominations
    pub amount: u64,
    /// The exact coins being moved, in selection order
    pub coins: Vec<Coin>,
    /// Captured once at construction; reused for signing and hashing
    pub timestamp: DateTime<Utc>,
    /// Compact ECDSA signature (hex)
    pub signature: Option<String>,
}

impl Transaction {
    /// Create an unsigned transaction for an already-selected coin set
    pub fn new(
        sender: &str,
        recipient: &str,
        amount: u64,
        coins: Vec<Coin>,
    ) -> Result<Self, TransactionError> {
        if amount == 0 {
            return Err(TransactionError::ZeroAmount);
        }

        let actual: u64 = coins.iter().map(Coin::denomination).sum();
        if actual != amount {
            return Err(TransactionError::AmountMismatch {
                declared: amount,
                actual,
            });
        }

        Ok(Self {
            sender: sender.to_string(),
            recipient: recipient.to_string(),
            sender_public_key: None,
            amount,
            coins,
            timestamp: Utc::now(),
            signature: None,
        })
    }

    /// The canonical string covered by the signature
    pub fn signable_payload(&self) -> String {
        canonical_string(&signable_value(
            &self.sender,
            &self.recipient,
            self.amount,
            &self.timestamp,
            self.coins.iter().map(Coin::serial),
        ))
    }

    /// Sign the transaction with the sender's key pair
    pub fn sign(&mut self, key_pair: &KeyPair) -> Result<(), TransactionError> {
        let signature = key_pair.sign(self.signable_payload().as_bytes())?;
        self.signature = Some(hex::encode(signature));
        self.sender_public_key = Some(key_pair.public_key_hex());
        Ok(())
    }

    pub fn is_signed(&self) -> bool {
        self.signature.is_some()
    }

    /// Verify the signature against the embedded sender key
    ///
    /// The key must also hash to the sender address. Any malformed or
    /// missing piece yields `false`.
    pub fn verify(&self) -> bool {
        let Some(key_hex) = self.sender_public_key.as_deref() else {
            return false;
        };
        let Ok(public_key) = public_key_from_hex(key_hex) else {
            return false;
        };
        if public_key_to_address(&public_key) != self.sender {
            return false;
        }
        self.verify_with(&public_key)
    }

    /// Verify the signature against an explicit public key
    pub fn verify_with(&self, public_key: &PublicKey) -> bool {
        let Some(signature_hex) = self.signature.as_deref() else {
            return false;
        };
        let Ok(signature) = hex::decode(signature_hex) else {
            return false;
        };

        verify_signature(public_key, self.signable_payload().as_bytes(), &signature)
            .unwrap_or(false)
    }

    /// Serials of the moved coins, in order
    pub fn coin_serials(&self) -> Vec<&str> {
        self.coins.iter().map(Coin::serial).collect()
    }

    /// Check whether the transaction touches `address`
    pub fn involves(&self, address: &str) -> bool {
        self.sender == address || self.recipient == address
    }
}
