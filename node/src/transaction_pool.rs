//! Transactions created through an endorser and not yet submitted.

use horde_types::{Transaction, TxHash};
use std::collections::BTreeMap;

#[derive(Debug, Default)]
pub struct TransactionPool {
    transactions: BTreeMap<TxHash, Transaction>,
}

impl TransactionPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert, replacing any transaction with the same hash.
    pub fn insert(&mut self, transaction: Transaction) {
        self.transactions.insert(transaction.hash.clone(), transaction);
    }

    /// Remove every listed hash that is present; returns how many were removed.
    pub fn remove_many<'a>(&mut self, hashes: impl IntoIterator<Item = &'a TxHash>) -> usize {
        hashes
            .into_iter()
            .filter(|hash| self.transactions.remove(*hash).is_some())
            .count()
    }

    pub fn get(&self, hash: &TxHash) -> Option<&Transaction> {
        self.transactions.get(hash)
    }

    pub fn contains(&self, hash: &TxHash) -> bool {
        self.transactions.contains_key(hash)
    }

    /// Pending hashes in sorted order.
    pub fn hashes(&self) -> Vec<TxHash> {
        self.transactions.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }
}
