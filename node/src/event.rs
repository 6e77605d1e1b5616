//! Events applied to the tracker state, one at a time.

use horde_types::{ChainHash, ChainPayload, PeerId, Transaction, TxHash};
use std::time::Instant;

use crate::peer_directory::PeerList;

#[derive(Clone, Debug)]
pub enum TrackerEvent {
    /// An orderer proposed a blockchain.
    ChainAnnounced {
        orderer: PeerId,
        hash: ChainHash,
        payload: Option<ChainPayload>,
    },
    /// A peer reported the outcome of verifying a blockchain.
    ChainVerified {
        peer: PeerId,
        hash: ChainHash,
        verified: bool,
    },
    /// A peer-list fetch completed.
    PeersReplaced(PeerList),
    /// An endorser created a transaction.
    TransactionCreated(Transaction),
    /// An orderer accepted these transactions.
    TransactionsSubmitted(Vec<TxHash>),
    /// Expire pending candidates, if a TTL is configured.
    PruneStaleCandidates { now: Instant },
}

impl TrackerEvent {
    /// Short name used in logs and metrics labels.
    pub fn kind(&self) -> &'static str {
        match self {
            TrackerEvent::ChainAnnounced { .. } => "chain_announced",
            TrackerEvent::ChainVerified { .. } => "chain_verified",
            TrackerEvent::PeersReplaced(_) => "peers_replaced",
            TrackerEvent::TransactionCreated(_) => "transaction_created",
            TrackerEvent::TransactionsSubmitted(_) => "transactions_submitted",
            TrackerEvent::PruneStaleCandidates { .. } => "prune_stale_candidates",
        }
    }
}
