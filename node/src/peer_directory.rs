//! Peer directory — who this client is and which peers the network reports.
//!
//! Every refresh replaces the whole peer map. Until the first refresh the
//! size is unknown, which keeps the quorum unreachable.

use horde_types::{PeerDescriptor, PeerId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A full peer-list answer from the node.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PeerList {
    #[serde(rename = "self")]
    pub self_descriptor: PeerDescriptor,
    #[serde(default)]
    pub peers: BTreeMap<PeerId, PeerDescriptor>,
}

#[derive(Debug, Default)]
pub struct PeerDirectory {
    self_descriptor: Option<PeerDescriptor>,
    peers: Option<BTreeMap<PeerId, PeerDescriptor>>,
}

impl PeerDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace self identity and peer map wholesale.
    pub fn replace(&mut self, self_descriptor: PeerDescriptor, peers: BTreeMap<PeerId, PeerDescriptor>) {
        tracing::debug!(peers = peers.len(), "peer directory replaced");
        self.self_descriptor = Some(self_descriptor);
        self.peers = Some(peers);
    }

    /// Number of peers, `None` if the list has never been loaded.
    pub fn size(&self) -> Option<usize> {
        self.peers.as_ref().map(BTreeMap::len)
    }

    pub fn is_loaded(&self) -> bool {
        self.peers.is_some()
    }

    pub fn self_descriptor(&self) -> Option<&PeerDescriptor> {
        self.self_descriptor.as_ref()
    }

    pub fn contains(&self, peer: &PeerId) -> bool {
        self.peers.as_ref().is_some_and(|p| p.contains_key(peer))
    }

    pub fn peers(&self) -> impl Iterator<Item = (&PeerId, &PeerDescriptor)> {
        self.peers.iter().flat_map(|p| p.iter())
    }
}
