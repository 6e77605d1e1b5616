//! Quorum policy: how many accepting peers confirm a blockchain.
//!
//! Up to three peers every peer must agree. Above that the requirement grows
//! sub-linearly, `2 * ceil((n - 1) / 3) + 1`, tolerating roughly a third of
//! the network staying silent.

use serde::Serialize;

/// Peer counts up to this size require unanimous agreement.
const UNANIMOUS_UP_TO: usize = 3;

/// Number of accepting votes required for a network of `peer_count` peers.
pub fn threshold(peer_count: usize) -> usize {
    if peer_count <= UNANIMOUS_UP_TO {
        peer_count
    } else {
        2 * (peer_count - 1).div_ceil(3) + 1
    }
}

/// A vote threshold that may not be satisfiable yet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Threshold {
    /// The peer set has never been loaded; no vote count is enough.
    Unreachable,
    /// At least this many accepting votes are needed.
    Votes(usize),
}

impl Threshold {
    pub fn is_met_by(&self, votes: usize) -> bool {
        match self {
            Threshold::Unreachable => false,
            Threshold::Votes(required) => votes >= *required,
        }
    }
}

/// Threshold for the current peer-set size, `None` meaning not fetched yet.
pub fn required_votes(peer_count: Option<usize>) -> Threshold {
    match peer_count {
        Some(n) => Threshold::Votes(threshold(n)),
        None => Threshold::Unreachable,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_networks_are_unanimous() {
        assert_eq!(threshold(0), 0);
        assert_eq!(threshold(1), 1);
        assert_eq!(threshold(2), 2);
        assert_eq!(threshold(3), 3);
    }

    #[test]
    fn larger_networks_use_ceiling_formula() {
        assert_eq!(threshold(4), 3);
        assert_eq!(threshold(5), 5);
        assert_eq!(threshold(6), 5);
        assert_eq!(threshold(7), 5);
        assert_eq!(threshold(8), 7);
        assert_eq!(threshold(10), 7);
        assert_eq!(threshold(11), 9);
        assert_eq!(threshold(100), 67);
    }

    #[test]
    fn unknown_peer_count_is_unreachable() {
        let t = required_votes(None);
        assert_eq!(t, Threshold::Unreachable);
        assert!(!t.is_met_by(0));
        assert!(!t.is_met_by(usize::MAX));
    }

    #[test]
    fn empty_peer_set_is_met_immediately() {
        assert!(required_votes(Some(0)).is_met_by(0));
    }

    #[test]
    fn votes_threshold_boundary() {
        let t = required_votes(Some(4));
        assert!(!t.is_met_by(2));
        assert!(t.is_met_by(3));
        assert!(t.is_met_by(4));
    }

    #[test]
    fn threshold_serializes_tagged() {
        let json = serde_json::to_value(Threshold::Votes(3)).unwrap();
        assert_eq!(json, serde_json::json!({ "votes": 3 }));
        let json = serde_json::to_value(Threshold::Unreachable).unwrap();
        assert_eq!(json, serde_json::json!("unreachable"));
    }
}
