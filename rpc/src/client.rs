//! `reqwest`-backed collaborator for the node's REST API.

use horde_node::{PeerList, PeerSource, SourceError, TransactionSource};
use horde_types::{PeerId, Transaction, TxHash};
use serde::Serialize;
use std::time::Duration;

use crate::envelope::decode_result;
use crate::error::CallError;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Wraps `reqwest::Client` with the node's base URL.
#[derive(Clone)]
pub struct NodeClient {
    http: reqwest::Client,
    node_url: String,
}

#[derive(Serialize)]
struct TransactionRequest<'a> {
    endorser: &'a PeerId,
    data: serde_json::Value,
}

#[derive(Serialize)]
struct SubmitRequest<'a> {
    orderer: &'a PeerId,
    data: &'a [TxHash],
}

impl NodeClient {
    /// Create a client for `node_url` (e.g. `http://127.0.0.1:8080`).
    pub fn new(node_url: impl Into<String>, timeout: Duration) -> Result<Self, SourceError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(CONNECT_TIMEOUT.min(timeout))
            .build()
            .map_err(|e| SourceError::Transport(format!("failed to create HTTP client: {e}")))?;
        Ok(Self {
            http,
            node_url: node_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn node_url(&self) -> &str {
        &self.node_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.node_url)
    }

    pub(crate) async fn get<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<T, CallError> {
        self.send(self.http.get(self.endpoint(path))).await
    }

    pub(crate) async fn get_with_query<Q: Serialize, T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: &Q,
    ) -> Result<T, CallError> {
        self.send(self.http.get(self.endpoint(path)).query(query))
            .await
    }

    async fn post<B: Serialize, T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, CallError> {
        self.send(self.http.post(self.endpoint(path)).json(body))
            .await
    }

    async fn send<T: serde::de::DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, CallError> {
        let response = request
            .send()
            .await
            .map_err(|e| CallError::Transport(e.to_string()))?;
        Self::read(response).await
    }

    async fn read<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, CallError> {
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| CallError::Transport(format!("failed to read body: {e}")))?;
        decode_result(status, &body)
    }

    async fn create_transaction(
        &self,
        path: &str,
        endorser: &PeerId,
        data: serde_json::Value,
    ) -> Result<Transaction, SourceError> {
        let request = TransactionRequest { endorser, data };
        match self.post::<_, Transaction>(path, &request).await {
            Ok(transaction) => {
                tracing::debug!(%endorser, hash = %transaction.hash, path, "transaction created");
                Ok(transaction)
            }
            Err(e) => {
                tracing::warn!(%endorser, path, error = %e, "transaction request failed");
                Err(e.into_transaction())
            }
        }
    }
}

impl PeerSource for NodeClient {
    async fn fetch_peers(&self) -> Result<PeerList, SourceError> {
        self.get("/api/connections")
            .await
            .map_err(CallError::into_peer_fetch)
    }
}

impl TransactionSource for NodeClient {
    async fn make_money(
        &self,
        endorser: &PeerId,
        data: serde_json::Value,
    ) -> Result<Transaction, SourceError> {
        self.create_transaction("/api/transaction/make-money", endorser, data)
            .await
    }

    async fn transfer_money(
        &self,
        endorser: &PeerId,
        data: serde_json::Value,
    ) -> Result<Transaction, SourceError> {
        self.create_transaction("/api/transaction/transfer-money", endorser, data)
            .await
    }

    async fn submit_transactions(
        &self,
        orderer: &PeerId,
        hashes: &[TxHash],
    ) -> Result<(), SourceError> {
        let request = SubmitRequest {
            orderer,
            data: hashes,
        };
        self.post::<_, serde_json::Value>("/api/transaction/submit", &request)
            .await
            .map(|_| ())
            .map_err(CallError::into_submission)
    }
}
