//! Consensus bookkeeping for the dashboard's confirmation tracker.
//!
//! A blockchain proposed by an orderer is confirmed on the client once
//! enough peers have reported that they verified it:
//! - The number of votes required depends only on the current peer-set size.
//! - Votes and the chain payload arrive independently and in any order.
//! - Until both the payload and enough votes are known, the chain is a
//!   pending candidate.
//!
//! ## Module overview
//!
//! - [`quorum`] — Peer count → required vote threshold.
//! - [`candidates`] — Pending candidates keyed by chain hash.

pub mod candidates;
pub mod quorum;

pub use candidates::{Candidate, CandidateRegistry};
pub use quorum::{required_votes, threshold, Threshold};
