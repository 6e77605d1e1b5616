//! Horde dashboard core — turns the node's live feed into confirmed chains.
//!
//! The core is a single-owner reducer over a serial event queue:
//! - Orderers announce proposed blockchains; peers report whether they
//!   verified them. Both arrive in any order.
//! - A chain is confirmed once its payload is known and enough peers have
//!   accepted it for the current peer-set size.
//! - Pending transactions are held until an orderer accepts them.
//! - Everything observable is also written as a newest-first notification.
//!
//! Collaborators (peer list, transaction endpoints) sit behind the traits in
//! [`collaborators`]; their results come back as [`TrackerEvent`]s.

pub mod collaborators;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod event;
pub mod logging;
pub mod metrics;
pub mod notifications;
pub mod peer_directory;
pub mod service;
pub mod shutdown;
pub mod state;
pub mod tracker;
pub mod transaction_pool;

pub use collaborators::{PeerSource, SourceError, TransactionSource};
pub use config::DashboardConfig;
pub use dashboard::Dashboard;
pub use error::NodeError;
pub use event::TrackerEvent;
pub use logging::{init_logging, LogFormat};
pub use metrics::TrackerMetrics;
pub use notifications::NotificationLog;
pub use peer_directory::{PeerDirectory, PeerList};
pub use service::{TrackerHandle, TrackerService};
pub use shutdown::ShutdownController;
pub use state::{Applied, Outcome, PendingCandidate, TrackerSnapshot, TrackerState};
pub use tracker::{ConfirmationTracker, Progress, TrackerOptions};
pub use transaction_pool::TransactionPool;
