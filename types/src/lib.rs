//! Fundamental types for the horde dashboard.
//!
//! This crate defines the identifiers and opaque payload wrappers shared by
//! every other crate in the workspace: chain and transaction hashes, peer
//! identities, chain payloads and pending transactions.

pub mod chain;
pub mod hash;
pub mod peer;
pub mod transaction;

pub use chain::ChainPayload;
pub use hash::{ChainHash, TxHash};
pub use peer::{PeerDescriptor, PeerId};
pub use transaction::Transaction;
