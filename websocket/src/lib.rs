//! Live event feed client.
//!
//! The node pushes two kinds of text frames over a WebSocket:
//! - `new-blockchain`: an orderer announced a chain
//! - `new-blockchain-verified`: a peer reported its verdict on a chain
//!
//! Each frame becomes a [`TrackerEvent`](horde_node::TrackerEvent) on the
//! tracker queue. Anything else is logged and skipped.

pub mod error;
pub mod feed;
pub mod message;

pub use error::FeedError;
pub use feed::FeedClient;
pub use message::{parse_frame, FeedMessage, Frame};
