//! Nullable peer source — serves a scripted peer list.

use horde_node::{PeerList, PeerSource, SourceError};
use horde_types::{PeerDescriptor, PeerId};
use std::sync::Mutex;

pub struct NullPeerSource {
    response: Mutex<Result<PeerList, SourceError>>,
    calls: Mutex<usize>,
}

impl NullPeerSource {
    pub fn new(list: PeerList) -> Self {
        Self {
            response: Mutex::new(Ok(list)),
            calls: Mutex::new(0),
        }
    }

    /// A source reporting `count` peers named `peer0`, `peer1`, ...
    pub fn with_peers(count: usize) -> Self {
        Self::new(peer_list(count))
    }

    /// A source whose every fetch fails.
    pub fn failing(message: &str) -> Self {
        let source = Self::with_peers(0);
        source.fail_with(message);
        source
    }

    /// Serve `count` peers from the next fetch on.
    pub fn set_peers(&self, count: usize) {
        *lock(&self.response) = Ok(peer_list(count));
    }

    /// Fail every fetch from now on.
    pub fn fail_with(&self, message: &str) {
        *lock(&self.response) = Err(SourceError::PeerFetch(message.to_string()));
    }

    pub fn calls(&self) -> usize {
        *lock(&self.calls)
    }
}

impl PeerSource for NullPeerSource {
    async fn fetch_peers(&self) -> Result<PeerList, SourceError> {
        *lock(&self.calls) += 1;
        lock(&self.response).clone()
    }
}

/// A peer list with `count` peers and a fixed self descriptor.
pub fn peer_list(count: usize) -> PeerList {
    PeerList {
        self_descriptor: PeerDescriptor(serde_json::json!({ "id": "client" })),
        peers: (0..count)
            .map(|i| {
                let id = format!("peer{i}");
                (PeerId::new(id.clone()), PeerDescriptor(serde_json::json!({ "id": id })))
            })
            .collect(),
    }
}

// A poisoned lock only means another test thread panicked; keep serving.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}
