//! Feed frame format.

use horde_node::TrackerEvent;
use horde_types::{ChainHash, ChainPayload, PeerId};
use serde::{Deserialize, Serialize};

/// Text frame the client sends to end the session. Also honoured if it
/// arrives from the node.
pub const CLOSE_FRAME: &str = "close";

/// Voter recorded for verification frames that do not name their peer.
pub const ANONYMOUS_PEER: &str = "unknown";

fn anonymous_peer() -> PeerId {
    PeerId::from(ANONYMOUS_PEER)
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum FeedMessage {
    #[serde(rename = "new-blockchain")]
    NewBlockchain {
        orderer: PeerId,
        hash: ChainHash,
        #[serde(default)]
        blockchain: Option<serde_json::Value>,
    },
    #[serde(rename = "new-blockchain-verified")]
    BlockchainVerified {
        #[serde(default = "anonymous_peer")]
        peer: PeerId,
        hash: ChainHash,
        verified: bool,
    },
}

impl From<FeedMessage> for TrackerEvent {
    fn from(message: FeedMessage) -> Self {
        match message {
            FeedMessage::NewBlockchain {
                orderer,
                hash,
                blockchain,
            } => TrackerEvent::ChainAnnounced {
                orderer,
                hash,
                payload: blockchain.map(ChainPayload::new),
            },
            FeedMessage::BlockchainVerified {
                peer,
                hash,
                verified,
            } => TrackerEvent::ChainVerified {
                peer,
                hash,
                verified,
            },
        }
    }
}

/// What a single text frame means to the feed loop.
#[derive(Debug)]
pub enum Frame {
    Event(TrackerEvent),
    Close,
    Skip(String),
}

pub fn parse_frame(text: &str) -> Frame {
    if text.trim() == CLOSE_FRAME {
        return Frame::Close;
    }
    match serde_json::from_str::<FeedMessage>(text) {
        Ok(message) => Frame::Event(message.into()),
        Err(e) => Frame::Skip(e.to_string()),
    }
}
