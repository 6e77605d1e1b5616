//! Candidate registry — blockchains seen but not yet confirmed.
//!
//! An entry is created by whichever arrives first: the orderer's
//! announcement (carrying the payload) or a peer's verification vote. The
//! registry never decides anything on its own; the confirmation tracker
//! reads an entry after every change and removes it on promotion.
//!
//! Vote counts only ever grow. By default every accepting vote counts, even
//! a repeat from the same peer; [`CandidateRegistry::record_vote`] can
//! optionally count each voter once.

use horde_types::{ChainHash, ChainPayload, PeerId};
use std::collections::{HashMap, HashSet};
use std::time::{Duration, Instant};

/// A pending blockchain and the votes gathered for it so far.
#[derive(Clone, Debug)]
pub struct Candidate {
    payload: Option<ChainPayload>,
    votes: usize,
    voters: HashSet<PeerId>,
    first_seen: Instant,
}

impl Candidate {
    fn new() -> Self {
        Self {
            payload: None,
            votes: 0,
            voters: HashSet::new(),
            first_seen: Instant::now(),
        }
    }

    /// The announced payload, absent while only votes have arrived.
    pub fn payload(&self) -> Option<&ChainPayload> {
        self.payload.as_ref()
    }

    pub fn votes(&self) -> usize {
        self.votes
    }

    /// Distinct peers that have voted to accept this candidate.
    pub fn voters(&self) -> impl Iterator<Item = &PeerId> {
        self.voters.iter()
    }

    pub fn first_seen(&self) -> Instant {
        self.first_seen
    }

    pub fn into_payload(self) -> Option<ChainPayload> {
        self.payload
    }
}

/// Pending candidates keyed by chain hash.
#[derive(Debug, Default)]
pub struct CandidateRegistry {
    entries: HashMap<ChainHash, Candidate>,
}

impl CandidateRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store or overwrite the payload for `hash`, leaving its votes untouched.
    pub fn upsert_payload(&mut self, hash: ChainHash, payload: ChainPayload) {
        self.entries.entry(hash).or_insert_with(Candidate::new).payload = Some(payload);
    }

    /// Make sure `hash` is tracked, without touching payload or votes.
    pub fn ensure(&mut self, hash: ChainHash) {
        self.entries.entry(hash).or_insert_with(Candidate::new);
    }

    /// Count one more accepting vote and return the new total.
    pub fn increment_vote(&mut self, hash: ChainHash) -> usize {
        let candidate = self.entries.entry(hash).or_insert_with(Candidate::new);
        candidate.votes += 1;
        candidate.votes
    }

    /// Count an accepting vote from `voter`.
    ///
    /// With `dedupe` off this is [`increment_vote`](Self::increment_vote) plus
    /// remembering the voter. With `dedupe` on, a voter already recorded for
    /// this hash is ignored. Returns whether the vote was counted.
    pub fn record_vote(&mut self, hash: ChainHash, voter: PeerId, dedupe: bool) -> bool {
        let candidate = self.entries.entry(hash).or_insert_with(Candidate::new);
        let first_from_voter = candidate.voters.insert(voter);
        if dedupe && !first_from_voter {
            return false;
        }
        candidate.votes += 1;
        true
    }

    pub fn remove(&mut self, hash: &ChainHash) -> Option<Candidate> {
        self.entries.remove(hash)
    }

    pub fn get(&self, hash: &ChainHash) -> Option<&Candidate> {
        self.entries.get(hash)
    }

    pub fn contains(&self, hash: &ChainHash) -> bool {
        self.entries.contains_key(hash)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ChainHash, &Candidate)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop candidates first seen more than `ttl` before `now`.
    ///
    /// Returns the removed hashes, sorted.
    pub fn prune_older_than(&mut self, now: Instant, ttl: Duration) -> Vec<ChainHash> {
        let mut stale: Vec<ChainHash> = self
            .entries
            .iter()
            .filter(|(_, c)| now.saturating_duration_since(c.first_seen) > ttl)
            .map(|(h, _)| h.clone())
            .collect();
        stale.sort();
        for hash in &stale {
            self.entries.remove(hash);
        }
        if !stale.is_empty() {
            tracing::debug!(count = stale.len(), "pruned stale candidates");
        }
        stale
    }
}
