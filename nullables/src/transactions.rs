//! Nullable transaction source — mints predictable transactions and records
//! submissions.

use horde_node::{SourceError, TransactionSource};
use horde_types::{PeerId, Transaction, TxHash};
use std::sync::Mutex;

use crate::peers::lock;

#[derive(Default)]
pub struct NullTransactionSource {
    next_id: Mutex<u64>,
    reject_creation: Mutex<Option<String>>,
    reject_submission: Mutex<Option<String>>,
    submitted: Mutex<Vec<(PeerId, Vec<TxHash>)>>,
}

impl NullTransactionSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject every make/transfer request with `reason`.
    pub fn reject_creation(&self, reason: &str) {
        *lock(&self.reject_creation) = Some(reason.to_string());
    }

    /// Reject every submission with `reason`.
    pub fn reject_submissions(&self, reason: &str) {
        *lock(&self.reject_submission) = Some(reason.to_string());
    }

    pub fn accept_submissions(&self) {
        *lock(&self.reject_submission) = None;
    }

    /// Accepted submissions, in call order.
    pub fn submitted(&self) -> Vec<(PeerId, Vec<TxHash>)> {
        lock(&self.submitted).clone()
    }

    fn create(&self, kind: &str, endorser: &PeerId, data: serde_json::Value) -> Result<Transaction, SourceError> {
        if let Some(reason) = lock(&self.reject_creation).clone() {
            return Err(SourceError::TransactionRejected(reason));
        }
        let mut next_id = lock(&self.next_id);
        *next_id += 1;
        let mut transaction = Transaction::new(format!("tx{:04}", *next_id));
        transaction
            .body
            .insert("endorser".into(), serde_json::json!(endorser.as_str()));
        transaction.body.insert("kind".into(), serde_json::json!(kind));
        transaction.body.insert("data".into(), data);
        Ok(transaction)
    }
}

impl TransactionSource for NullTransactionSource {
    async fn make_money(
        &self,
        endorser: &PeerId,
        data: serde_json::Value,
    ) -> Result<Transaction, SourceError> {
        self.create("make-money", endorser, data)
    }

    async fn transfer_money(
        &self,
        endorser: &PeerId,
        data: serde_json::Value,
    ) -> Result<Transaction, SourceError> {
        self.create("transfer-money", endorser, data)
    }

    async fn submit_transactions(
        &self,
        orderer: &PeerId,
        hashes: &[TxHash],
    ) -> Result<(), SourceError> {
        if let Some(reason) = lock(&self.reject_submission).clone() {
            return Err(SourceError::SubmissionRejected(reason));
        }
        lock(&self.submitted).push((orderer.clone(), hashes.to_vec()));
        Ok(())
    }
}
