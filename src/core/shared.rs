//! Shared ledger handle for concurrent hosts
//!
//! Every operation takes the ledger lock for its whole duration, so wallet
//! selection and insertion never interleave, and a reader never sees the
//! pending pool cleared without the matching block on the chain.

use crate::core::block::Block;
use crate::core::blockchain::{ChainStats, HistoryEntry, Ledger, LedgerError};
use crate::mining::{MiningControl, MiningStats};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Cloneable async handle over a [`Ledger`]
#[derive(Debug, Clone)]
pub struct SharedLedger {
    inner: Arc<RwLock<Ledger>>,
}

impl SharedLedger {
    pub fn new(ledger: Ledger) -> Self {
        Self {
            inner: Arc::new(RwLock::new(ledger)),
        }
    }

    pub async fn create_account(&self) -> String {
        self.inner.write().await.create_account()
    }

    pub async fn issue_funds(&self, address: &str, amount: u64) -> Result<Vec<String>, LedgerError> {
        self.inner.write().await.issue_funds(address, amount)
    }

    pub async fn add_transaction(&self, sender: &str, recipient: &str, amount: u64) -> bool {
        self.inner
            .write()
            .await
            .add_transaction(sender, recipient, amount)
    }

    /// Mine pending transactions on a blocking worker thread
    ///
    /// The write lock is held for the whole search so the block commit is a
    /// single step for readers. Cancel through a clone of `control`; a
    /// cancelled search leaves the ledger untouched.
    pub async fn mine_pending_transactions(
        &self,
        miner: &str,
        control: MiningControl,
    ) -> Result<MiningStats, LedgerError> {
        let inner = Arc::clone(&self.inner);
        let miner = miner.to_string();

        tokio::task::spawn_blocking(move || {
            let mut ledger = inner.blocking_write();
            ledger.mine_pending_transactions_with(&miner, &control)
        })
        .await?
    }

    pub async fn get_balance(&self, address: &str) -> Result<u64, LedgerError> {
        self.inner.read().await.get_balance(address)
    }

    pub async fn get_transaction_history(
        &self,
        address: &str,
    ) -> Result<Vec<HistoryEntry>, LedgerError> {
        self.inner.read().await.get_transaction_history(address)
    }

    pub async fn get_coins_by_denomination(
        &self,
        address: &str,
    ) -> Result<BTreeMap<u64, Vec<String>>, LedgerError> {
        self.inner.read().await.get_coins_by_denomination(address)
    }

    pub async fn is_chain_valid(&self) -> bool {
        self.inner.read().await.is_chain_valid()
    }

    pub async fn latest_block(&self) -> Block {
        self.inner.read().await.latest_block().clone()
    }

    pub async fn stats(&self) -> ChainStats {
        self.inner.read().await.stats()
    }
}
