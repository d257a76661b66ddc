//! Canonical encoding shared by block hashing and transaction signing
//!
//! Both the block hash and the transaction signature depend on a byte-exact
//! serialization. Everything goes through [`canonical_string`], which emits
//! compact JSON with object keys in sorted order (`serde_json::Map` is
//! ordered by key). Timestamps are encoded as integer microseconds since
//! the Unix epoch so the output never depends on float formatting.

use crate::core::transaction::Transaction;
use chrono::{DateTime, Utc};
use serde_json::{json, Value};

/// Render a JSON value in canonical form
pub fn canonical_string(value: &Value) -> String {
    value.to_string()
}

/// Encode a timestamp for hashing and signing
pub fn encode_timestamp(timestamp: &DateTime<Utc>) -> i64 {
    timestamp.timestamp_micros()
}

/// The fields a transaction signature covers
///
/// Coin serials keep their selection order.
pub fn signable_value<'a>(
    sender: &str,
    recipient: &str,
    amount: u64,
    timestamp: &DateTime<Utc>,
    serials: impl IntoIterator<Item = &'a str>,
) -> Value {
    let serials: Vec<&str> = serials.into_iter().collect();
    json!({
        "sender": sender,
        "recipient": recipient,
        "amount": amount,
        "timestamp": encode_timestamp(timestamp),
        "coins": serials,
    })
}

/// A transaction as it appears inside a block hash
pub fn transaction_value(tx: &Transaction) -> Value {
    let coins: Vec<Value> = tx
        .coins
        .iter()
        .map(|coin| json!({ "serial": coin.serial(), "denomination": coin.denomination() }))
        .collect();

    json!({
        "sender": tx.sender,
        "recipient": tx.recipient,
        "amount": tx.amount,
        "coins": coins,
        "timestamp": encode_timestamp(&tx.timestamp),
        "signature": tx.signature,
    })
}

/// Encode a block's transaction list once so mining can reuse it per nonce
pub fn transactions_value(transactions: &[Transaction]) -> Value {
    Value::Array(transactions.iter().map(transaction_value).collect())
}

/// The full block object that is hashed
pub fn block_value(
    index: u64,
    transactions: &Value,
    previous_hash: &str,
    timestamp: &DateTime<Utc>,
    nonce: u64,
) -> Value {
    json!({
        "index": index,
        "transactions": transactions,
        "previous_hash": previous_hash,
        "timestamp": encode_timestamp(timestamp),
        "nonce": nonce,
    })
}
