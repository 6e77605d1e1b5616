//! Nullable collaborators for deterministic testing.
//!
//! Both types implement the dashboard's collaborator traits without touching
//! the network. They:
//! - Return scripted answers
//! - Can be switched to failing mid-test
//! - Record every call for assertions

pub mod peers;
pub mod transactions;

pub use peers::NullPeerSource;
pub use transactions::NullTransactionSource;
