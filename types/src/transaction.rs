//! Transactions created by endorsers and awaiting submission to an orderer.

use serde::{Deserialize, Serialize};

use crate::TxHash;

/// A transaction as returned by the endorser.
///
/// Only `hash` is interpreted; signature, mutations and the rest of the body
/// are carried through untouched.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub hash: TxHash,
    #[serde(flatten)]
    pub body: serde_json::Map<String, serde_json::Value>,
}

impl Transaction {
    pub fn new(hash: impl Into<TxHash>) -> Self {
        Self {
            hash: hash.into(),
            body: serde_json::Map::new(),
        }
    }

    pub fn endorser(&self) -> Option<&str> {
        self.body.get("endorser").and_then(|v| v.as_str())
    }
}
