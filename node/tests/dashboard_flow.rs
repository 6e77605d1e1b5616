//! End-to-end dashboard flows: collaborator calls → service queue → state.
//!
//! Collaborators are nullables, so every outcome is deterministic.

use horde_node::{
    Dashboard, NodeError, SourceError, TrackerEvent, TrackerHandle, TrackerOptions, TrackerService,
    TrackerState,
};
use horde_nullables::{NullPeerSource, NullTransactionSource};
use horde_types::{ChainHash, ChainPayload, PeerId, TxHash};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

struct Harness {
    dashboard: Dashboard<NullPeerSource, NullTransactionSource>,
    _shutdown: broadcast::Sender<()>,
    _service: JoinHandle<TrackerState>,
}

fn start(peers: NullPeerSource) -> Harness {
    let (service, handle) = TrackerService::new(TrackerState::new(TrackerOptions::default(), None), 64);
    let (shutdown, rx) = broadcast::channel(1);
    let service = service.spawn(rx);
    Harness {
        dashboard: Dashboard::new(peers, NullTransactionSource::new(), handle),
        _shutdown: shutdown,
        _service: service,
    }
}

fn tracker(h: &Harness) -> &TrackerHandle {
    h.dashboard.tracker()
}

// ---------------------------------------------------------------------------
// Peer refresh
// ---------------------------------------------------------------------------

#[tokio::test]
async fn refresh_replaces_peer_directory() {
    let h = start(NullPeerSource::with_peers(4));
    assert_eq!(h.dashboard.refresh_peers().await.unwrap(), 4);

    let snapshot = tracker(&h).snapshot().await.unwrap();
    assert_eq!(snapshot.peer_count, Some(4));
}

#[tokio::test]
async fn failed_refresh_keeps_previous_directory() {
    let h = start(NullPeerSource::with_peers(4));
    h.dashboard.refresh_peers().await.unwrap();

    let failing = Dashboard::new(
        NullPeerSource::failing("connection refused"),
        NullTransactionSource::new(),
        tracker(&h).clone(),
    );
    let err = failing.refresh_peers().await.unwrap_err();
    assert!(matches!(err, NodeError::Source(SourceError::PeerFetch(_))));
    assert_eq!(tracker(&h).snapshot().await.unwrap().peer_count, Some(4));
}

#[tokio::test]
async fn peer_count_unknown_before_first_refresh() {
    let h = start(NullPeerSource::with_peers(4));
    let snapshot = tracker(&h).snapshot().await.unwrap();
    assert_eq!(snapshot.peer_count, None);
    assert_eq!(snapshot.threshold, horde_consensus::Threshold::Unreachable);
}

// ---------------------------------------------------------------------------
// Transactions
// ---------------------------------------------------------------------------

#[tokio::test]
async fn created_transactions_enter_the_pool() {
    let h = start(NullPeerSource::with_peers(1));
    let endorser = PeerId::from("endorser1");

    let minted = h
        .dashboard
        .make_money(&endorser, serde_json::json!({ "account": "alice", "amount": 10 }))
        .await
        .unwrap();
    let moved = h
        .dashboard
        .transfer_money(&endorser, serde_json::json!({ "from": "alice", "to": "bob" }))
        .await
        .unwrap();

    let snapshot = tracker(&h).snapshot().await.unwrap();
    assert_eq!(snapshot.pending_transactions, vec![minted.hash, moved.hash]);
}

#[tokio::test]
async fn submit_pending_drains_the_pool() {
    let h = start(NullPeerSource::with_peers(1));
    let endorser = PeerId::from("endorser1");
    for _ in 0..3 {
        h.dashboard
            .make_money(&endorser, serde_json::json!({}))
            .await
            .unwrap();
    }

    let orderer = PeerId::from("orderer1");
    assert_eq!(h.dashboard.submit_pending(&orderer).await.unwrap(), 3);
    assert!(tracker(&h).snapshot().await.unwrap().pending_transactions.is_empty());
    assert_eq!(h.dashboard.submit_pending(&orderer).await.unwrap(), 0);
}

#[tokio::test]
async fn rejected_submission_leaves_pool_unchanged() {
    let h = start(NullPeerSource::with_peers(1));
    let tx = h
        .dashboard
        .make_money(&PeerId::from("endorser1"), serde_json::json!({}))
        .await
        .unwrap();

    let transactions = NullTransactionSource::new();
    transactions.reject_submissions("orderer offline");
    let rejecting = Dashboard::new(NullPeerSource::with_peers(1), transactions, tracker(&h).clone());

    let err = rejecting
        .submit(&PeerId::from("orderer1"), vec![tx.hash.clone()])
        .await
        .unwrap_err();
    assert!(matches!(err, NodeError::Source(SourceError::SubmissionRejected(_))));
    assert_eq!(tracker(&h).snapshot().await.unwrap().pending_transactions, vec![tx.hash]);
}

#[tokio::test]
async fn rejected_creation_adds_nothing() {
    let transactions = NullTransactionSource::new();
    transactions.reject_creation("endorser busy");
    let (service, handle) = TrackerService::new(TrackerState::default(), 8);
    let (_shutdown, rx) = broadcast::channel(1);
    service.spawn(rx);
    let dashboard = Dashboard::new(NullPeerSource::with_peers(1), transactions, handle);

    let err = dashboard
        .make_money(&PeerId::from("endorser1"), serde_json::json!({}))
        .await
        .unwrap_err();
    assert!(matches!(err, NodeError::Source(SourceError::TransactionRejected(_))));
    assert!(dashboard.tracker().snapshot().await.unwrap().pending_transactions.is_empty());
}

// ---------------------------------------------------------------------------
// Chain confirmation through the service
// ---------------------------------------------------------------------------

#[tokio::test]
async fn chain_confirms_after_refresh_and_votes() {
    let h = start(NullPeerSource::with_peers(4));
    h.dashboard.refresh_peers().await.unwrap();
    let mut notifications = tracker(&h).subscribe_notifications();

    let hash = ChainHash::new("aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa");
    tracker(&h)
        .send(TrackerEvent::ChainAnnounced {
            orderer: PeerId::from("orderer1"),
            hash: hash.clone(),
            payload: Some(ChainPayload::new(serde_json::json!({ "number": 1 }))),
        })
        .await
        .unwrap();
    for peer in ["peer0", "peer1", "peer2"] {
        tracker(&h)
            .send(TrackerEvent::ChainVerified {
                peer: PeerId::from(peer),
                hash: hash.clone(),
                verified: true,
            })
            .await
            .unwrap();
    }

    let snapshot = tracker(&h).snapshot().await.unwrap();
    assert_eq!(snapshot.confirmed, vec![hash]);
    assert!(snapshot.pending.is_empty());
    assert_eq!(
        snapshot.latest_confirmation.as_deref(),
        Some("new blockchain aaaaaaaaaaaaaaaa... generated!")
    );

    let first = notifications.recv().await.unwrap();
    assert_eq!(first, "new blockchain aaaaaaaaaaaaaaaa... from orderer1");
}

#[tokio::test]
async fn submitted_hashes_unknown_to_pool_are_ignored() {
    let h = start(NullPeerSource::with_peers(1));
    h.dashboard
        .submit(&PeerId::from("orderer1"), vec![TxHash::new("never-created")])
        .await
        .unwrap();
    assert!(tracker(&h).snapshot().await.unwrap().pending_transactions.is_empty());
}
