//! Blockchain payloads as announced by orderers.

use serde::{Deserialize, Serialize};

/// The body of a proposed blockchain (number, previous hash, transactions, ...).
///
/// Opaque to the dashboard: validation happens on the peers, which only
/// report whether they accepted it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChainPayload(pub serde_json::Value);

impl ChainPayload {
    pub fn new(value: serde_json::Value) -> Self {
        Self(value)
    }

    /// The block number, when the payload carries one.
    pub fn number(&self) -> Option<u64> {
        self.0.get("number").and_then(|v| v.as_u64())
    }
}

impl From<serde_json::Value> for ChainPayload {
    fn from(value: serde_json::Value) -> Self {
        Self(value)
    }
}
