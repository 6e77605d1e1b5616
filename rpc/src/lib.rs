//! HTTP client for the node's REST endpoints.
//!
//! `NodeClient` implements both collaborator seams of the dashboard:
//! [`PeerSource`](horde_node::PeerSource) over `GET /api/connections` and
//! [`TransactionSource`](horde_node::TransactionSource) over the
//! `/api/transaction/*` endpoints. The per-peer read queries of
//! [`queries`] are plain methods on the same client.

pub mod client;
pub mod envelope;
pub mod error;
pub mod queries;

pub use client::NodeClient;
pub use error::CallError;
pub use queries::{AccountQuery, AccountState, BlockchainQuery, BlockchainSummary};
