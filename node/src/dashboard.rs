//! Dashboard facade — calls the node's endpoints and feeds results back in.
//!
//! A collaborator call runs outside the tracker service. Only its successful
//! result becomes an event on the service queue, so a failed fetch or a
//! rejected submission leaves the state exactly as it was.

use horde_types::{PeerId, Transaction, TxHash};

use crate::collaborators::{PeerSource, TransactionSource};
use crate::event::TrackerEvent;
use crate::service::TrackerHandle;
use crate::NodeError;

pub struct Dashboard<P, T> {
    peers: P,
    transactions: T,
    tracker: TrackerHandle,
}

impl<P: PeerSource, T: TransactionSource> Dashboard<P, T> {
    pub fn new(peers: P, transactions: T, tracker: TrackerHandle) -> Self {
        Self {
            peers,
            transactions,
            tracker,
        }
    }

    pub fn tracker(&self) -> &TrackerHandle {
        &self.tracker
    }

    /// Fetch the peer list and replace the directory. Returns the peer count.
    pub async fn refresh_peers(&self) -> Result<usize, NodeError> {
        let list = self.peers.fetch_peers().await.map_err(|e| {
            tracing::warn!(error = %e, "peer refresh failed");
            e
        })?;
        let count = list.peers.len();
        self.tracker.send(TrackerEvent::PeersReplaced(list)).await?;
        tracing::debug!(count, "peer list refreshed");
        Ok(count)
    }

    pub async fn make_money(
        &self,
        endorser: &PeerId,
        data: serde_json::Value,
    ) -> Result<Transaction, NodeError> {
        let transaction = self.transactions.make_money(endorser, data).await?;
        self.track_transaction(transaction).await
    }

    pub async fn transfer_money(
        &self,
        endorser: &PeerId,
        data: serde_json::Value,
    ) -> Result<Transaction, NodeError> {
        let transaction = self.transactions.transfer_money(endorser, data).await?;
        self.track_transaction(transaction).await
    }

    /// Submit `hashes` to `orderer`; on success they leave the pool.
    pub async fn submit(&self, orderer: &PeerId, hashes: Vec<TxHash>) -> Result<(), NodeError> {
        if let Err(e) = self.transactions.submit_transactions(orderer, &hashes).await {
            tracing::warn!(%orderer, count = hashes.len(), error = %e, "submission failed");
            return Err(e.into());
        }
        tracing::info!(%orderer, count = hashes.len(), "transactions submitted");
        self.tracker
            .send(TrackerEvent::TransactionsSubmitted(hashes))
            .await
    }

    /// Submit everything currently pending. Returns how many were submitted.
    pub async fn submit_pending(&self, orderer: &PeerId) -> Result<usize, NodeError> {
        let hashes = self.tracker.snapshot().await?.pending_transactions;
        if hashes.is_empty() {
            return Ok(0);
        }
        let count = hashes.len();
        self.submit(orderer, hashes).await?;
        Ok(count)
    }

    async fn track_transaction(&self, transaction: Transaction) -> Result<Transaction, NodeError> {
        self.tracker
            .send(TrackerEvent::TransactionCreated(transaction.clone()))
            .await?;
        Ok(transaction)
    }
}
