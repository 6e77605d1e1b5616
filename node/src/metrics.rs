//! Prometheus metrics for the confirmation tracker.
//!
//! [`TrackerMetrics`] owns a dedicated [`Registry`]; the daemon's status
//! server encodes it at `/metrics`.

use prometheus::{
    register_int_counter_with_registry, register_int_gauge_with_registry, Encoder, IntCounter,
    IntGauge, Opts, Registry, TextEncoder,
};

use crate::state::{Applied, TrackerState};
use crate::tracker::Progress;

pub struct TrackerMetrics {
    pub registry: Registry,

    // ── Counters ────────────────────────────────────────────────────────
    pub events_applied: IntCounter,
    pub chains_announced: IntCounter,
    pub votes_accepted: IntCounter,
    pub votes_rejected: IntCounter,
    pub chains_confirmed: IntCounter,
    pub candidates_expired: IntCounter,

    // ── Gauges ──────────────────────────────────────────────────────────
    pub pending_candidates: IntGauge,
    pub confirmed_chains: IntGauge,
    /// -1 until the peer list has been loaded.
    pub peer_count: IntGauge,
    pub pending_transactions: IntGauge,
}

impl TrackerMetrics {
    pub fn new() -> Self {
        let registry = Registry::new();

        let counter = |name: &str, help: &str| {
            register_int_counter_with_registry!(Opts::new(name, help), registry)
                .expect("failed to register tracker counter")
        };
        let events_applied = counter("horde_events_applied_total", "Events applied to the tracker");
        let chains_announced =
            counter("horde_chains_announced_total", "Blockchain announcements received");
        let votes_accepted =
            counter("horde_votes_accepted_total", "Verification votes accepting a chain");
        let votes_rejected =
            counter("horde_votes_rejected_total", "Verification votes rejecting a chain");
        let chains_confirmed = counter("horde_chains_confirmed_total", "Chains confirmed");
        let candidates_expired =
            counter("horde_candidates_expired_total", "Pending chains expired by TTL");

        let gauge = |name: &str, help: &str| {
            register_int_gauge_with_registry!(Opts::new(name, help), registry)
                .expect("failed to register tracker gauge")
        };
        let pending_candidates = gauge("horde_pending_candidates", "Chains awaiting quorum");
        let confirmed_chains = gauge("horde_confirmed_chains", "Chains confirmed so far");
        let peer_count = gauge("horde_peer_count", "Peers in the last fetched peer list");
        let pending_transactions =
            gauge("horde_pending_transactions", "Transactions awaiting submission");
        peer_count.set(-1);

        Self {
            registry,
            events_applied,
            chains_announced,
            votes_accepted,
            votes_rejected,
            chains_confirmed,
            candidates_expired,
            pending_candidates,
            confirmed_chains,
            peer_count,
            pending_transactions,
        }
    }

    /// Update counters for one applied event and refresh gauges from `state`.
    pub fn observe(&self, kind: &str, applied: &Applied, state: &TrackerState) {
        self.events_applied.inc();
        match (kind, applied) {
            ("chain_announced", Applied::Chain(progress)) => {
                self.chains_announced.inc();
                if *progress == Progress::Confirmed {
                    self.chains_confirmed.inc();
                }
            }
            ("chain_verified", Applied::Chain(Progress::Rejected)) => self.votes_rejected.inc(),
            ("chain_verified", Applied::Chain(progress)) => {
                self.votes_accepted.inc();
                if *progress == Progress::Confirmed {
                    self.chains_confirmed.inc();
                }
            }
            (_, Applied::Pruned(hashes)) => self.candidates_expired.inc_by(hashes.len() as u64),
            _ => {}
        }

        let tracker = state.tracker();
        self.pending_candidates.set(tracker.candidates().len() as i64);
        self.confirmed_chains.set(tracker.confirmed_hashes().len() as i64);
        self.peer_count
            .set(state.peers().size().map_or(-1, |n| n as i64));
        self.pending_transactions.set(state.pool().len() as i64);
    }

    /// Encode every metric in the Prometheus text exposition format.
    pub fn encode(&self) -> Result<String, prometheus::Error> {
        let mut buf = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buf)?;
        String::from_utf8(buf).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}

impl Default for TrackerMetrics {
    fn default() -> Self {
        Self::new()
    }
}
