//! The complete dashboard state and the reducer that applies events to it.
//!
//! [`TrackerState`] is owned by exactly one task (see [`crate::service`]);
//! nothing else mutates it.

use horde_consensus::{required_votes, Threshold};
use horde_types::{ChainHash, TxHash};
use serde::Serialize;
use std::time::Duration;

use crate::event::TrackerEvent;
use crate::peer_directory::PeerDirectory;
use crate::tracker::{ConfirmationTracker, Progress, TrackerOptions};
use crate::transaction_pool::TransactionPool;

/// What a single event did to the state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Applied {
    /// A chain event, with the resulting progress for that chain.
    Chain(Progress),
    /// Peer directory replaced; carries the new size.
    Peers(usize),
    /// Transactions inserted into or removed from the pool.
    Transactions(usize),
    /// Pending candidates expired.
    Pruned(Vec<ChainHash>),
}

/// The result of [`TrackerState::apply`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Outcome {
    pub applied: Applied,
    /// Notifications this event produced, oldest first.
    pub notifications: Vec<String>,
}

#[derive(Default)]
pub struct TrackerState {
    peers: PeerDirectory,
    tracker: ConfirmationTracker,
    pool: TransactionPool,
    candidate_ttl: Option<Duration>,
}

impl TrackerState {
    pub fn new(options: TrackerOptions, candidate_ttl: Option<Duration>) -> Self {
        Self {
            peers: PeerDirectory::new(),
            tracker: ConfirmationTracker::new(options),
            pool: TransactionPool::new(),
            candidate_ttl,
        }
    }

    pub fn apply(&mut self, event: TrackerEvent) -> Outcome {
        let applied = self.reduce(event);
        Outcome {
            applied,
            notifications: self.tracker.take_emitted(),
        }
    }

    fn reduce(&mut self, event: TrackerEvent) -> Applied {
        match event {
            TrackerEvent::ChainAnnounced {
                orderer,
                hash,
                payload,
            } => Applied::Chain(
                self.tracker
                    .on_chain_announced(&orderer, hash, payload, &self.peers),
            ),
            TrackerEvent::ChainVerified {
                peer,
                hash,
                verified,
            } => Applied::Chain(self.tracker.on_chain_verified(&peer, hash, verified, &self.peers)),
            TrackerEvent::PeersReplaced(list) => {
                self.peers.replace(list.self_descriptor, list.peers);
                Applied::Peers(self.peers.size().unwrap_or(0))
            }
            TrackerEvent::TransactionCreated(transaction) => {
                tracing::debug!(hash = %transaction.hash, "transaction added to pool");
                self.pool.insert(transaction);
                Applied::Transactions(1)
            }
            TrackerEvent::TransactionsSubmitted(hashes) => {
                let removed = self.pool.remove_many(&hashes);
                tracing::debug!(submitted = hashes.len(), removed, "transactions submitted");
                Applied::Transactions(removed)
            }
            TrackerEvent::PruneStaleCandidates { now } => match self.candidate_ttl {
                Some(ttl) => Applied::Pruned(self.tracker.prune_stale(now, ttl)),
                None => Applied::Pruned(Vec::new()),
            },
        }
    }

    pub fn peers(&self) -> &PeerDirectory {
        &self.peers
    }

    pub fn tracker(&self) -> &ConfirmationTracker {
        &self.tracker
    }

    pub fn pool(&self) -> &TransactionPool {
        &self.pool
    }

    pub fn threshold(&self) -> Threshold {
        required_votes(self.peers.size())
    }

    pub fn snapshot(&self) -> TrackerSnapshot {
        let mut pending: Vec<PendingCandidate> = self
            .tracker
            .candidates()
            .iter()
            .map(|(hash, candidate)| PendingCandidate {
                hash: hash.clone(),
                votes: candidate.votes(),
                has_payload: candidate.payload().is_some(),
            })
            .collect();
        pending.sort_by(|a, b| a.hash.cmp(&b.hash));

        TrackerSnapshot {
            peer_count: self.peers.size(),
            threshold: self.threshold(),
            pending,
            confirmed: self.tracker.confirmed_hashes().to_vec(),
            pending_transactions: self.pool.hashes(),
            notifications: self
                .tracker
                .notifications()
                .iter()
                .map(str::to_string)
                .collect(),
            latest_confirmation: self
                .tracker
                .notifications()
                .latest_confirmation()
                .map(str::to_string),
        }
    }
}

/// A pending candidate as shown in snapshots.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PendingCandidate {
    pub hash: ChainHash,
    pub votes: usize,
    pub has_payload: bool,
}

/// An owned, point-in-time view of the state.
#[derive(Clone, Debug, Serialize)]
pub struct TrackerSnapshot {
    pub peer_count: Option<usize>,
    pub threshold: Threshold,
    /// Sorted by hash.
    pub pending: Vec<PendingCandidate>,
    /// In confirmation order.
    pub confirmed: Vec<ChainHash>,
    pub pending_transactions: Vec<TxHash>,
    /// Newest first.
    pub notifications: Vec<String>,
    pub latest_confirmation: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::peer_directory::PeerList;
    use horde_types::{ChainPayload, PeerDescriptor, PeerId, Transaction};
    use std::collections::BTreeMap;
    use std::time::Instant;

    fn peer_list(n: usize) -> PeerList {
        PeerList {
            self_descriptor: PeerDescriptor(serde_json::json!({ "id": "client" })),
            peers: (0..n)
                .map(|i| (PeerId::new(format!("peer{i}")), PeerDescriptor::default()))
                .collect::<BTreeMap<_, _>>(),
        }
    }

    fn announce(hash: &str) -> TrackerEvent {
        TrackerEvent::ChainAnnounced {
            orderer: PeerId::from("orderer1"),
            hash: ChainHash::new(hash),
            payload: Some(ChainPayload::new(serde_json::json!({ "number": 1 }))),
        }
    }

    fn verify(peer: &str, hash: &str, verified: bool) -> TrackerEvent {
        TrackerEvent::ChainVerified {
            peer: PeerId::from(peer),
            hash: ChainHash::new(hash),
            verified,
        }
    }

    #[test]
    fn peer_refresh_feeds_threshold() {
        let mut state = TrackerState::default();
        assert_eq!(state.threshold(), Threshold::Unreachable);
        assert_eq!(state.apply(TrackerEvent::PeersReplaced(peer_list(7))).applied, Applied::Peers(7));
        assert_eq!(state.threshold(), Threshold::Votes(5));
    }

    #[test]
    fn chain_flow_through_events() {
        let mut state = TrackerState::default();
        state.apply(TrackerEvent::PeersReplaced(peer_list(2)));
        state.apply(announce("h"));
        state.apply(verify("peer0", "h", true));
        let outcome = state.apply(verify("peer1", "h", true));
        assert_eq!(outcome.applied, Applied::Chain(Progress::Confirmed));
        assert_eq!(
            outcome.notifications,
            vec![
                "blockchain h... accepted by peer1".to_string(),
                "new blockchain h... generated!".to_string(),
            ]
        );

        let snap = state.snapshot();
        assert_eq!(snap.confirmed, vec![ChainHash::new("h")]);
        assert!(snap.pending.is_empty());
        assert_eq!(
            snap.latest_confirmation.as_deref(),
            Some("new blockchain h... generated!")
        );
    }

    #[test]
    fn transactions_enter_and_leave_pool() {
        let mut state = TrackerState::default();
        state.apply(TrackerEvent::TransactionCreated(Transaction::new("t1")));
        state.apply(TrackerEvent::TransactionCreated(Transaction::new("t2")));
        let applied = state.apply(TrackerEvent::TransactionsSubmitted(vec![
            TxHash::new("t1"),
            TxHash::new("missing"),
        ])).applied;
        assert_eq!(applied, Applied::Transactions(1));
        assert_eq!(state.snapshot().pending_transactions, vec![TxHash::new("t2")]);
    }

    #[test]
    fn prune_without_ttl_is_noop() {
        let mut state = TrackerState::default();
        state.apply(announce("h"));
        let later = Instant::now() + Duration::from_secs(86_400);
        assert_eq!(
            state.apply(TrackerEvent::PruneStaleCandidates { now: later }).applied,
            Applied::Pruned(Vec::new())
        );
        assert_eq!(state.snapshot().pending.len(), 1);
    }

    #[test]
    fn prune_with_ttl_expires_pending() {
        let mut state = TrackerState::new(TrackerOptions::default(), Some(Duration::from_secs(60)));
        state.apply(announce("h"));
        let later = Instant::now() + Duration::from_secs(120);
        assert_eq!(
            state.apply(TrackerEvent::PruneStaleCandidates { now: later }).applied,
            Applied::Pruned(vec![ChainHash::new("h")])
        );
        assert!(state.snapshot().pending.is_empty());
    }

    #[test]
    fn snapshot_lists_pending_sorted() {
        let mut state = TrackerState::default();
        state.apply(verify("p", "b", true));
        state.apply(announce("a"));
        let snap = state.snapshot();
        assert_eq!(
            snap.pending,
            vec![
                PendingCandidate {
                    hash: ChainHash::new("a"),
                    votes: 0,
                    has_payload: true
                },
                PendingCandidate {
                    hash: ChainHash::new("b"),
                    votes: 1,
                    has_payload: false
                },
            ]
        );
        assert_eq!(snap.peer_count, None);
        assert_eq!(snap.notifications.len(), 2);
    }

    #[test]
    fn capped_log_stays_bounded_without_a_service() {
        let options = TrackerOptions {
            notification_capacity: Some(2),
            ..TrackerOptions::default()
        };
        let mut state = TrackerState::new(options, None);
        for i in 0..10_000 {
            let outcome = state.apply(verify(&format!("p{i}"), "h", false));
            assert_eq!(outcome.notifications.len(), 1);
        }
        assert_eq!(state.tracker().notifications().len(), 2);
        assert_eq!(state.snapshot().notifications.len(), 2);
    }

    #[test]
    fn non_chain_events_emit_nothing() {
        let mut state = TrackerState::default();
        state.apply(announce("h"));
        let outcome = state.apply(TrackerEvent::TransactionCreated(Transaction::new("t1")));
        assert!(outcome.notifications.is_empty());
    }
}
