//! `NodeClient` against an in-process stand-in for the node's REST API.

use axum::{
    extract::{Path, Query},
    http::StatusCode,
    routing::get,
    routing::post,
    Json, Router,
};
use horde_node::{PeerSource, SourceError, TransactionSource};
use horde_rpc::{AccountQuery, BlockchainQuery, CallError, NodeClient};
use horde_types::{PeerId, TxHash};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::time::Duration;

async fn connections() -> Json<Value> {
    Json(json!({ "result": {
        "self": { "id": "client", "type": "client" },
        "peers": {
            "endorser1": { "id": "endorser1", "type": "endorser" },
            "orderer1": { "id": "orderer1", "type": "orderer" },
            "peer1": { "id": "peer1", "type": "peer" }
        }
    }}))
}

async fn make_money(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    if body["endorser"] != "endorser1" {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": { "message": "unknown endorser", "data": body["endorser"] } })),
        );
    }
    (
        StatusCode::OK,
        Json(json!({ "result": {
            "hash": "c0ffee",
            "endorser": body["endorser"],
            "mutations": [body["data"]]
        }})),
    )
}

async fn submit(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    if body["data"].as_array().map_or(true, |hashes| hashes.is_empty()) {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": { "message": "nothing to submit", "data": null } })),
        );
    }
    (StatusCode::OK, Json(json!({ "result": "queued" })))
}

fn offline() -> (StatusCode, Json<Value>) {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "error": { "message": "peer offline" } })),
    )
}

async fn peer_connections(Path(peer): Path<String>) -> (StatusCode, Json<Value>) {
    if peer != "peer1" {
        return offline();
    }
    (StatusCode::OK, Json(json!({ "result": ["endorser1", "orderer1"] })))
}

/// Echoes the received filters back in the single returned row.
async fn accounts(
    Path(peer): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> (StatusCode, Json<Value>) {
    if peer != "peer1" {
        return offline();
    }
    let account = params.get("account").cloned().unwrap_or_else(|| "alice".into());
    let version = if params.get("latest-version").map(String::as_str) == Some("true") { 7 } else { 1 };
    (
        StatusCode::OK,
        Json(json!({ "result": [{ "account": account, "version": version, "value": 42.5 }] })),
    )
}

async fn blockchains(
    Path(peer): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    let asc = params.get("asc").map(String::as_str) == Some("true");
    let offset: u64 = params.get("offset").and_then(|o| o.parse().ok()).unwrap_or(0);
    let mut numbers: Vec<u64> = (1..=3).map(|n| n + offset).collect();
    if !asc {
        numbers.reverse();
    }
    let rows: Vec<Value> = numbers
        .into_iter()
        .map(|n| json!({ "hash": format!("{peer}-{n:04}"), "number": n }))
        .collect();
    Json(json!({ "result": rows }))
}

async fn blockchain(Path((_peer, number)): Path<(String, u64)>) -> (StatusCode, Json<Value>) {
    if number > 3 {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": { "message": "not found", "data": null } })),
        );
    }
    (
        StatusCode::OK,
        Json(json!({ "result": { "number": number, "hash": "abc", "transactions": [] } })),
    )
}

async fn start_node() -> String {
    let app = Router::new()
        .route("/api/connections", get(connections))
        .route("/api/:peer/connections", get(peer_connections))
        .route("/api/:peer/accounts", get(accounts))
        .route("/api/:peer/blockchains/", get(blockchains))
        .route("/api/:peer/blockchains/:number", get(blockchain))
        .route("/api/transaction/make-money", post(make_money))
        .route("/api/transaction/submit", post(submit));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn client(url: &str) -> NodeClient {
    NodeClient::new(url, Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn fetches_peer_list() {
    let url = start_node().await;
    let list = client(&url).fetch_peers().await.unwrap();
    assert_eq!(list.peers.len(), 3);
    assert!(list.peers.contains_key(&PeerId::from("peer1")));
}

#[tokio::test]
async fn make_money_returns_endorsed_transaction() {
    let url = start_node().await;
    let tx = client(&url)
        .make_money(&PeerId::from("endorser1"), json!({ "account": "alice", "amount": 5 }))
        .await
        .unwrap();
    assert_eq!(tx.hash, TxHash::new("c0ffee"));
    assert_eq!(tx.endorser(), Some("endorser1"));
}

#[tokio::test]
async fn endorser_rejection_surfaces_message() {
    let url = start_node().await;
    let err = client(&url)
        .make_money(&PeerId::from("nobody"), json!({}))
        .await
        .unwrap_err();
    assert_eq!(err, SourceError::TransactionRejected("unknown endorser".into()));
}

#[tokio::test]
async fn submission_round_trip() {
    let url = start_node().await;
    let node = client(&url);
    let orderer = PeerId::from("orderer1");

    node.submit_transactions(&orderer, &[TxHash::new("c0ffee")])
        .await
        .unwrap();
    let err = node.submit_transactions(&orderer, &[]).await.unwrap_err();
    assert_eq!(err, SourceError::SubmissionRejected("nothing to submit".into()));
}

#[tokio::test]
async fn missing_route_is_a_rejection() {
    let url = start_node().await;
    let err = client(&url)
        .transfer_money(&PeerId::from("endorser1"), json!({}))
        .await
        .unwrap_err();
    assert!(matches!(err, SourceError::TransactionRejected(_)));
}

#[tokio::test]
async fn unreachable_node_is_a_peer_fetch_failure() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = client(&format!("http://{addr}")).fetch_peers().await.unwrap_err();
    assert!(matches!(err, SourceError::PeerFetch(_)));
}

// ---------------------------------------------------------------------------
// Per-peer queries
// ---------------------------------------------------------------------------

#[tokio::test]
async fn peer_topology() {
    let url = start_node().await;
    let node = client(&url);
    let connected = node.peer_connections(&PeerId::from("peer1")).await.unwrap();
    assert_eq!(connected, vec![PeerId::from("endorser1"), PeerId::from("orderer1")]);

    let err = node.peer_connections(&PeerId::from("peer9")).await.unwrap_err();
    assert_eq!(
        err,
        CallError::Rejected {
            status: 400,
            message: "peer offline".into()
        }
    );
}

#[tokio::test]
async fn account_filters_reach_the_node() {
    let url = start_node().await;
    let query = AccountQuery {
        account: Some("bob".into()),
        latest_version: Some(true),
        ..AccountQuery::default()
    };
    let rows = client(&url).accounts(&PeerId::from("peer1"), &query).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].account, "bob");
    assert_eq!(rows[0].version, 7);
    assert_eq!(rows[0].value, 42.5);
}

#[tokio::test]
async fn blockchain_listing_honours_order_and_offset() {
    let url = start_node().await;
    let node = client(&url);
    let peer = PeerId::from("peer1");

    let newest_first = node.blockchains(&peer, &BlockchainQuery::default()).await.unwrap();
    let numbers: Vec<u64> = newest_first.iter().map(|b| b.number).collect();
    assert_eq!(numbers, vec![3, 2, 1]);

    let query = BlockchainQuery {
        asc: Some(true),
        offset: Some(10),
        ..BlockchainQuery::default()
    };
    let page = node.blockchains(&peer, &query).await.unwrap();
    assert_eq!(page[0].number, 11);
    assert_eq!(page[0].hash.as_str(), "peer1-0011");
}

#[tokio::test]
async fn single_blockchain_lookup() {
    let url = start_node().await;
    let node = client(&url);
    let peer = PeerId::from("peer1");

    let chain = node.blockchain(&peer, 2).await.unwrap();
    assert_eq!(chain.number(), Some(2));
    assert!(matches!(
        node.blockchain(&peer, 99).await,
        Err(CallError::Rejected { ref message, .. }) if message == "not found"
    ));
}
