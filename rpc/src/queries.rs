//! Per-peer read queries: topology, account states and stored blockchains.
//!
//! The node forwards each query to the named peer and relays its answer in
//! the usual `{"result"}` envelope. An offline peer is a 400 rejection.

use horde_types::{ChainHash, ChainPayload, PeerId};
use serde::{Deserialize, Serialize};

use crate::client::NodeClient;
use crate::error::CallError;

/// Filters for `GET /api/{peer}/accounts`. Unset fields are left to the peer
/// (it defaults to 15 rows from offset 0).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct AccountQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<u64>,
    /// Only the newest version of each account. Ignored when `version` is set.
    #[serde(rename = "latest-version", skip_serializing_if = "Option::is_none")]
    pub latest_version: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
}

/// Paging for `GET /api/{peer}/blockchains/`. The peer lists newest first
/// unless `asc` is set.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct BlockchainQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asc: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
}

/// One version of an account's balance.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AccountState {
    pub account: String,
    pub version: u64,
    pub value: f64,
}

/// A row of the blockchain listing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockchainSummary {
    pub hash: ChainHash,
    pub number: u64,
}

impl NodeClient {
    /// Peers that `peer` is currently connected to.
    pub async fn peer_connections(&self, peer: &PeerId) -> Result<Vec<PeerId>, CallError> {
        self.get(&format!("/api/{peer}/connections")).await
    }

    pub async fn accounts(
        &self,
        peer: &PeerId,
        query: &AccountQuery,
    ) -> Result<Vec<AccountState>, CallError> {
        self.get_with_query(&format!("/api/{peer}/accounts"), query)
            .await
    }

    pub async fn blockchains(
        &self,
        peer: &PeerId,
        query: &BlockchainQuery,
    ) -> Result<Vec<BlockchainSummary>, CallError> {
        self.get_with_query(&format!("/api/{peer}/blockchains/"), query)
            .await
    }

    /// Blockchain `number` as stored by `peer`, with its transactions.
    pub async fn blockchain(&self, peer: &PeerId, number: u64) -> Result<ChainPayload, CallError> {
        self.get(&format!("/api/{peer}/blockchains/{number}")).await
    }
}
