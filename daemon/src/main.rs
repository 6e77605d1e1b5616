//! Horde dashboard daemon. Follows the live feed, tracks chain confirmation,
//! drives the node's transaction endpoints and answers per-peer queries.

mod status;

use anyhow::Context;
use clap::Parser;
use horde_node::{
    init_logging, Dashboard, DashboardConfig, LogFormat, PeerSource, ShutdownController,
    TrackerEvent, TrackerHandle, TrackerMetrics, TrackerService, TrackerState, TransactionSource,
};
use horde_rpc::{AccountQuery, BlockchainQuery, NodeClient};
use horde_types::{PeerId, Transaction, TxHash};
use horde_websocket::FeedClient;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use crate::status::StatusState;

#[derive(Parser)]
#[command(name = "horde-daemon", about = "Horde network dashboard daemon")]
struct Cli {
    /// Path to a TOML configuration file. If provided, file settings
    /// are used as the base; CLI flags and env vars override them.
    #[arg(long, env = "HORDE_CONFIG")]
    config: Option<PathBuf>,

    /// Base URL of the node's REST API.
    #[arg(long, env = "HORDE_NODE_URL")]
    node_url: Option<String>,

    /// WebSocket URL of the live event feed.
    #[arg(long, env = "HORDE_FEED_URL")]
    feed_url: Option<String>,

    /// Seconds between peer-list refreshes (0 disables periodic refresh).
    #[arg(long, env = "HORDE_PEER_REFRESH_SECS")]
    peer_refresh_secs: Option<u64>,

    /// Count at most one accepting vote per peer for each chain.
    #[arg(long, env = "HORDE_DEDUPE_VOTES")]
    dedupe_votes: bool,

    /// Expire pending chains after this many seconds.
    #[arg(long, env = "HORDE_CANDIDATE_TTL_SECS")]
    candidate_ttl_secs: Option<u64>,

    /// Serve Prometheus metrics and a JSON snapshot.
    #[arg(long, env = "HORDE_ENABLE_STATUS")]
    status: bool,

    /// Status server port.
    #[arg(long, env = "HORDE_STATUS_PORT")]
    status_port: Option<u16>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "HORDE_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format: "human" or "json".
    #[arg(long, env = "HORDE_LOG_FORMAT")]
    log_format: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Follow the feed and track confirmations until interrupted.
    Run,
    /// Print the node's current peer list.
    Peers,
    /// Ask an endorser to mint money; prints the transaction.
    MakeMoney {
        #[arg(long)]
        endorser: String,
        /// JSON request data.
        #[arg(long, default_value = "{}")]
        data: String,
        /// Submit the new transaction to this orderer right away.
        #[arg(long)]
        submit_to: Option<String>,
    },
    /// Ask an endorser to build a transfer; prints the transaction.
    TransferMoney {
        #[arg(long)]
        endorser: String,
        /// JSON request data.
        #[arg(long, default_value = "{}")]
        data: String,
        /// Submit the new transaction to this orderer right away.
        #[arg(long)]
        submit_to: Option<String>,
    },
    /// Hand transaction hashes to an orderer.
    Submit {
        #[arg(long)]
        orderer: String,
        #[arg(required = true)]
        hashes: Vec<String>,
    },
    /// Print the peers a given peer is connected to.
    PeerConnections { peer: String },
    /// Print account states stored by a peer.
    Accounts {
        peer: String,
        #[arg(long)]
        account: Option<String>,
        #[arg(long)]
        version: Option<u64>,
        /// Only the newest version of each account.
        #[arg(long)]
        latest_version: bool,
        #[arg(long)]
        limit: Option<u32>,
        #[arg(long)]
        offset: Option<u32>,
    },
    /// List a peer's blockchains, newest first unless --asc.
    Blockchains {
        peer: String,
        #[arg(long)]
        asc: bool,
        #[arg(long)]
        limit: Option<u32>,
        #[arg(long)]
        offset: Option<u32>,
    },
    /// Print one blockchain stored by a peer.
    Blockchain { peer: String, number: u64 },
}

/// Layer CLI flags and env vars over the file (or default) configuration.
fn resolve_config(cli: &Cli) -> anyhow::Result<DashboardConfig> {
    let mut config = match &cli.config {
        Some(path) => DashboardConfig::from_toml_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => DashboardConfig::default(),
    };

    if let Some(url) = &cli.node_url {
        config.node_url = url.clone();
    }
    if let Some(url) = &cli.feed_url {
        config.feed_url = url.clone();
    }
    if let Some(secs) = cli.peer_refresh_secs {
        config.peer_refresh_secs = secs;
    }
    if let Some(secs) = cli.candidate_ttl_secs {
        config.candidate_ttl_secs = Some(secs);
    }
    if let Some(port) = cli.status_port {
        config.status_port = port;
    }
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }
    if let Some(format) = &cli.log_format {
        config.log_format = format.clone();
    }
    config.dedupe_votes |= cli.dedupe_votes;
    config.enable_status |= cli.status;
    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = resolve_config(&cli)?;
    init_logging(LogFormat::from_name(&config.log_format), &config.log_level);

    let client = NodeClient::new(
        config.node_url.clone(),
        Duration::from_secs(config.request_timeout_secs),
    )?;

    match cli.command {
        Command::Run => run(config, client).await?,
        Command::Peers => {
            let list = client.fetch_peers().await?;
            print_json(&list)?;
        }
        Command::MakeMoney {
            endorser,
            data,
            submit_to,
        } => {
            let request = TxRequest::MakeMoney {
                endorser: PeerId::new(endorser),
                data: serde_json::from_str(&data).context("--data must be JSON")?,
                submit_to: submit_to.map(PeerId::new),
            };
            report(transact(client.clone(), client, request).await?)?;
        }
        Command::TransferMoney {
            endorser,
            data,
            submit_to,
        } => {
            let request = TxRequest::TransferMoney {
                endorser: PeerId::new(endorser),
                data: serde_json::from_str(&data).context("--data must be JSON")?,
                submit_to: submit_to.map(PeerId::new),
            };
            report(transact(client.clone(), client, request).await?)?;
        }
        Command::Submit { orderer, hashes } => {
            let request = TxRequest::Submit {
                orderer: PeerId::new(orderer),
                hashes: hashes.into_iter().map(TxHash::new).collect(),
            };
            report(transact(client.clone(), client, request).await?)?;
        }
        Command::PeerConnections { peer } => {
            print_json(&client.peer_connections(&PeerId::new(peer)).await?)?;
        }
        Command::Accounts {
            peer,
            account,
            version,
            latest_version,
            limit,
            offset,
        } => {
            let query = AccountQuery {
                account,
                version,
                latest_version: latest_version.then_some(true),
                limit,
                offset,
            };
            print_json(&client.accounts(&PeerId::new(peer), &query).await?)?;
        }
        Command::Blockchains {
            peer,
            asc,
            limit,
            offset,
        } => {
            let query = BlockchainQuery {
                asc: asc.then_some(true),
                limit,
                offset,
            };
            print_json(&client.blockchains(&PeerId::new(peer), &query).await?)?;
        }
        Command::Blockchain { peer, number } => {
            print_json(&client.blockchain(&PeerId::new(peer), number).await?)?;
        }
    }

    Ok(())
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// A one-shot transaction command.
enum TxRequest {
    MakeMoney {
        endorser: PeerId,
        data: serde_json::Value,
        submit_to: Option<PeerId>,
    },
    TransferMoney {
        endorser: PeerId,
        data: serde_json::Value,
        submit_to: Option<PeerId>,
    },
    Submit {
        orderer: PeerId,
        hashes: Vec<TxHash>,
    },
}

#[derive(Debug)]
struct Receipt {
    created: Option<Transaction>,
    submitted: usize,
    /// Pool contents when the command finished.
    pending: Vec<TxHash>,
}

fn report(receipt: Receipt) -> anyhow::Result<()> {
    if let Some(transaction) = &receipt.created {
        print_json(transaction)?;
    }
    tracing::info!(
        submitted = receipt.submitted,
        pending = receipt.pending.len(),
        "transaction command finished"
    );
    Ok(())
}

/// Run one transaction command through a short-lived tracker, so created
/// transactions enter the pool and submitted ones leave it.
async fn transact<P: PeerSource, T: TransactionSource>(
    peers: P,
    transactions: T,
    request: TxRequest,
) -> anyhow::Result<Receipt> {
    let shutdown = ShutdownController::new();
    let (service, tracker) = TrackerService::new(TrackerState::default(), 16);
    let service = service.spawn(shutdown.subscribe());
    let dashboard = Dashboard::new(peers, transactions, tracker);

    let result = match request {
        TxRequest::MakeMoney {
            endorser,
            data,
            submit_to,
        } => match dashboard.make_money(&endorser, data).await {
            Ok(tx) => submit_pool(&dashboard, submit_to).await.map(|n| (Some(tx), n)),
            Err(e) => Err(e),
        },
        TxRequest::TransferMoney {
            endorser,
            data,
            submit_to,
        } => match dashboard.transfer_money(&endorser, data).await {
            Ok(tx) => submit_pool(&dashboard, submit_to).await.map(|n| (Some(tx), n)),
            Err(e) => Err(e),
        },
        TxRequest::Submit { orderer, hashes } => {
            let count = hashes.len();
            dashboard.submit(&orderer, hashes).await.map(|()| (None, count))
        }
    };
    let pending = dashboard.tracker().snapshot().await?.pending_transactions;

    shutdown.shutdown();
    service.await.context("tracker service panicked")?;
    let (created, submitted) = result?;
    Ok(Receipt {
        created,
        submitted,
        pending,
    })
}

async fn submit_pool<P: PeerSource, T: TransactionSource>(
    dashboard: &Dashboard<P, T>,
    orderer: Option<PeerId>,
) -> Result<usize, horde_node::NodeError> {
    match orderer {
        Some(orderer) => dashboard.submit_pending(&orderer).await,
        None => Ok(0),
    }
}

async fn run(config: DashboardConfig, client: NodeClient) -> anyhow::Result<()> {
    let status_port = if config.enable_status {
        config.status_port.to_string()
    } else {
        "off".into()
    };
    tracing::info!(
        node = %config.node_url,
        feed = %config.feed_url,
        status = %status_port,
        "starting horde dashboard"
    );

    let shutdown = ShutdownController::new();
    let metrics = Arc::new(TrackerMetrics::new());
    let state = TrackerState::new(config.tracker_options(), config.candidate_ttl());
    let (service, tracker) = TrackerService::new(state, config.event_queue_capacity);
    let service = service
        .with_metrics(metrics.clone())
        .spawn(shutdown.subscribe());

    let dashboard = Dashboard::new(client.clone(), client, tracker.clone());
    let mut tasks: Vec<JoinHandle<()>> = vec![
        tokio::spawn(log_notifications(tracker.clone(), shutdown.subscribe())),
        tokio::spawn(refresh_peers(
            dashboard,
            config.peer_refresh_interval(),
            shutdown.subscribe(),
        )),
    ];

    let feed = FeedClient::new(
        config.feed_url.clone(),
        Duration::from_secs(config.feed_reconnect_secs),
        tracker.clone(),
    );
    tasks.push(tokio::spawn(feed.run(shutdown.subscribe())));

    if let Some(ttl) = config.candidate_ttl() {
        tasks.push(tokio::spawn(prune_stale(tracker.clone(), ttl, shutdown.subscribe())));
    }

    if config.enable_status {
        let addr = format!("0.0.0.0:{}", config.status_port);
        let state = StatusState {
            metrics,
            tracker: tracker.clone(),
        };
        let rx = shutdown.subscribe();
        tasks.push(tokio::spawn(async move {
            if let Err(e) = status::serve(&addr, state, rx).await {
                tracing::error!(error = %e, "status server stopped");
            }
        }));
    }
    drop(tracker);

    shutdown.wait_for_signal().await;

    for task in tasks {
        if let Err(e) = task.await {
            tracing::warn!(error = %e, "background task ended abnormally");
        }
    }
    let state = service.await.context("tracker service panicked")?;
    tracing::info!(
        confirmed = state.tracker().confirmed_hashes().len(),
        pending = state.tracker().candidates().len(),
        "horde dashboard exited cleanly"
    );
    Ok(())
}

async fn log_notifications(tracker: TrackerHandle, mut shutdown: broadcast::Receiver<()>) {
    let mut notifications = tracker.subscribe_notifications();
    drop(tracker);
    loop {
        tokio::select! {
            biased;
            _ = shutdown.recv() => break,
            message = notifications.recv() => match message {
                Ok(message) => tracing::info!(notification = %message, "notification"),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "notification log lagged");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            },
        }
    }
}

/// Fetch once at startup, then on every tick if periodic refresh is enabled.
/// Failures are logged and leave the last good peer list in place.
async fn refresh_peers<P: PeerSource, T: TransactionSource>(
    dashboard: Dashboard<P, T>,
    every: Option<Duration>,
    mut shutdown: broadcast::Receiver<()>,
) {
    let _ = dashboard.refresh_peers().await;
    let Some(every) = every else {
        return;
    };

    let mut ticker = tokio::time::interval(every);
    ticker.tick().await;
    loop {
        tokio::select! {
            biased;
            _ = shutdown.recv() => break,
            _ = ticker.tick() => {
                let _ = dashboard.refresh_peers().await;
            }
        }
    }
}

async fn prune_stale(tracker: TrackerHandle, ttl: Duration, mut shutdown: broadcast::Receiver<()>) {
    let mut ticker = tokio::time::interval(ttl.min(Duration::from_secs(60)).max(Duration::from_secs(1)));
    loop {
        tokio::select! {
            biased;
            _ = shutdown.recv() => break,
            _ = ticker.tick() => {
                let event = TrackerEvent::PruneStaleCandidates { now: Instant::now() };
                if tracker.send(event).await.is_err() {
                    break;
                }
            }
        }
    }
}
