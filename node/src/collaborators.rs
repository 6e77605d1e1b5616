//! Collaborator seams — the node's REST endpoints as seen by the dashboard.
//!
//! Implementations live outside this crate (`horde-rpc` over HTTP,
//! `horde-nullables` for tests). Every call may fail; a failure is returned
//! to the caller and never reaches the tracker state.

use horde_types::{PeerId, Transaction, TxHash};
use std::future::Future;
use thiserror::Error;

use crate::peer_directory::PeerList;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SourceError {
    #[error("peer fetch failed: {0}")]
    PeerFetch(String),

    #[error("submission rejected: {0}")]
    SubmissionRejected(String),

    #[error("transaction request rejected: {0}")]
    TransactionRejected(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// Where the peer list comes from.
pub trait PeerSource: Send + Sync {
    fn fetch_peers(&self) -> impl Future<Output = Result<PeerList, SourceError>> + Send;
}

/// Endorser and orderer transaction endpoints.
pub trait TransactionSource: Send + Sync {
    /// Ask `endorser` to mint money into an account.
    fn make_money(
        &self,
        endorser: &PeerId,
        data: serde_json::Value,
    ) -> impl Future<Output = Result<Transaction, SourceError>> + Send;

    /// Ask `endorser` to build a transfer between accounts.
    fn transfer_money(
        &self,
        endorser: &PeerId,
        data: serde_json::Value,
    ) -> impl Future<Output = Result<Transaction, SourceError>> + Send;

    /// Hand the listed transactions to `orderer` for inclusion in a chain.
    fn submit_transactions(
        &self,
        orderer: &PeerId,
        hashes: &[TxHash],
    ) -> impl Future<Output = Result<(), SourceError>> + Send;
}
