//! Confirmation tracker — promotes pending blockchains once peers agree.
//!
//! Per chain hash the state only moves forward:
//! `Unknown -> Pending(payload?, votes) -> Confirmed`.
//!
//! Announcements and verification votes may arrive in either order. Both
//! paths end in the same promotion check, so whichever event completes the
//! picture (payload present and votes at threshold) confirms the chain
//! exactly once. A confirmed hash is never tracked as a candidate again.

use horde_consensus::{required_votes, CandidateRegistry, Threshold};
use horde_types::{ChainHash, ChainPayload, PeerId};
use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::notifications::NotificationLog;
use crate::peer_directory::PeerDirectory;

/// Default number of hash characters shown in notifications.
pub const DEFAULT_HASH_PREFIX_LEN: usize = 16;

/// Tunables for the tracker. The defaults are the plain counting behaviour.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TrackerOptions {
    /// Characters of the hash shown in notification text.
    pub hash_prefix_len: usize,
    /// Count at most one accepting vote per peer and hash.
    pub dedupe_votes: bool,
    /// Cap on retained notifications; `None` keeps everything.
    pub notification_capacity: Option<usize>,
}

impl Default for TrackerOptions {
    fn default() -> Self {
        Self {
            hash_prefix_len: DEFAULT_HASH_PREFIX_LEN,
            dedupe_votes: false,
            notification_capacity: None,
        }
    }
}

/// Where a chain stands after an event was applied.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Progress {
    /// The hash was already confirmed; nothing changed.
    AlreadyConfirmed,
    /// The vote was a rejection; nothing changed.
    Rejected,
    /// Still waiting for a payload or for more votes.
    Pending {
        votes: usize,
        has_payload: bool,
        threshold: Threshold,
    },
    /// This event promoted the chain.
    Confirmed,
}

pub struct ConfirmationTracker {
    candidates: CandidateRegistry,
    confirmed: HashMap<ChainHash, ChainPayload>,
    /// Confirmed hashes in confirmation order.
    confirmed_order: Vec<ChainHash>,
    notifications: NotificationLog,
    /// Messages produced by the current event; reset at the start of each one.
    emitted: Vec<String>,
    options: TrackerOptions,
}

impl ConfirmationTracker {
    pub fn new(options: TrackerOptions) -> Self {
        let notifications = match options.notification_capacity {
            Some(capacity) => NotificationLog::with_capacity(capacity),
            None => NotificationLog::new(),
        };
        Self {
            candidates: CandidateRegistry::new(),
            confirmed: HashMap::new(),
            confirmed_order: Vec::new(),
            notifications,
            emitted: Vec::new(),
            options,
        }
    }

    /// An orderer proposed `hash`.
    ///
    /// Ignored silently once the hash is confirmed. A missing payload only
    /// registers the hash, leaving it pending.
    pub fn on_chain_announced(
        &mut self,
        orderer: &PeerId,
        hash: ChainHash,
        payload: Option<ChainPayload>,
        peers: &PeerDirectory,
    ) -> Progress {
        self.emitted.clear();
        if self.confirmed.contains_key(&hash) {
            tracing::debug!(%hash, %orderer, "ignoring announcement of confirmed chain");
            return Progress::AlreadyConfirmed;
        }

        match payload {
            Some(payload) => self.candidates.upsert_payload(hash.clone(), payload),
            None => self.candidates.ensure(hash.clone()),
        }
        let progress = self.evaluate(&hash, peers);

        let label = self.label(&hash);
        self.notify(format!("new blockchain {label} from {orderer}"));
        tracing::debug!(%hash, %orderer, ?progress, "chain announced");
        progress
    }

    /// `peer` reported whether it verified `hash`.
    ///
    /// Every report is logged; only acceptances of unconfirmed chains count.
    pub fn on_chain_verified(
        &mut self,
        peer: &PeerId,
        hash: ChainHash,
        verified: bool,
        peers: &PeerDirectory,
    ) -> Progress {
        self.emitted.clear();
        let verdict = if verified { "accepted" } else { "rejected" };
        let label = self.label(&hash);
        self.notify(format!("blockchain {label} {verdict} by {peer}"));

        if !verified {
            tracing::debug!(%hash, %peer, "chain rejected by peer");
            return Progress::Rejected;
        }
        if self.confirmed.contains_key(&hash) {
            return Progress::AlreadyConfirmed;
        }

        let counted = self
            .candidates
            .record_vote(hash.clone(), peer.clone(), self.options.dedupe_votes);
        if !counted {
            tracing::debug!(%hash, %peer, "duplicate vote ignored");
        }
        let progress = self.evaluate(&hash, peers);
        tracing::debug!(%hash, %peer, ?progress, "chain accepted by peer");
        progress
    }

    /// Drop candidates older than `ttl`. Confirmed chains are never touched.
    pub fn prune_stale(&mut self, now: Instant, ttl: Duration) -> Vec<ChainHash> {
        self.emitted.clear();
        let pruned = self.candidates.prune_older_than(now, ttl);
        for hash in &pruned {
            tracing::info!(%hash, "pending chain expired without quorum");
        }
        pruned
    }

    /// The single promotion path.
    fn evaluate(&mut self, hash: &ChainHash, peers: &PeerDirectory) -> Progress {
        let threshold = required_votes(peers.size());
        let (votes, has_payload) = match self.candidates.get(hash) {
            Some(candidate) => (candidate.votes(), candidate.payload().is_some()),
            None => (0, false),
        };
        if !has_payload || !threshold.is_met_by(votes) {
            return Progress::Pending {
                votes,
                has_payload,
                threshold,
            };
        }

        let Some(payload) = self.candidates.remove(hash).and_then(|c| c.into_payload()) else {
            return Progress::Pending {
                votes,
                has_payload,
                threshold,
            };
        };
        self.confirmed.insert(hash.clone(), payload);
        self.confirmed_order.push(hash.clone());
        let label = self.label(hash);
        let message = format!("new blockchain {label} generated!");
        self.notifications.push_confirmation(message.clone());
        self.emitted.push(message);
        tracing::info!(%hash, votes, ?threshold, "chain confirmed");
        Progress::Confirmed
    }

    fn notify(&mut self, message: String) {
        self.notifications.push(message.clone());
        self.emitted.push(message);
    }

    /// Take the notifications produced by the most recent event, in push order.
    pub fn take_emitted(&mut self) -> Vec<String> {
        std::mem::take(&mut self.emitted)
    }

    fn label(&self, hash: &ChainHash) -> String {
        format!("{}...", hash.prefix(self.options.hash_prefix_len))
    }

    pub fn is_confirmed(&self, hash: &ChainHash) -> bool {
        self.confirmed.contains_key(hash)
    }

    pub fn confirmed_payload(&self, hash: &ChainHash) -> Option<&ChainPayload> {
        self.confirmed.get(hash)
    }

    /// Confirmed hashes, oldest confirmation first.
    pub fn confirmed_hashes(&self) -> &[ChainHash] {
        &self.confirmed_order
    }

    pub fn candidates(&self) -> &CandidateRegistry {
        &self.candidates
    }

    pub fn notifications(&self) -> &NotificationLog {
        &self.notifications
    }

    pub fn options(&self) -> &TrackerOptions {
        &self.options
    }
}

impl Default for ConfirmationTracker {
    fn default() -> Self {
        Self::new(TrackerOptions::default())
    }
}
