//! Peer identities and descriptors.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a peer, orderer or endorser as configured on the network.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PeerId(String);

impl PeerId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PeerId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for PeerId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Whatever the node reports about a peer (addresses, role, live connections).
///
/// Kept as raw JSON: the dashboard only needs to count peers, never to
/// interpret their descriptors.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PeerDescriptor(pub serde_json::Value);

impl PeerDescriptor {
    /// The `id` field of an object descriptor, if there is one.
    pub fn id(&self) -> Option<&str> {
        self.0.get("id").and_then(|v| v.as_str())
    }
}

impl From<serde_json::Value> for PeerDescriptor {
    fn from(value: serde_json::Value) -> Self {
        Self(value)
    }
}
