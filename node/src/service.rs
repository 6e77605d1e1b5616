//! Tracker service — the single task that owns [`TrackerState`].
//!
//! Events from the live feed, the dashboard facade and the daemon's timers
//! all go through one bounded `mpsc` queue and are applied strictly in
//! arrival order. Reads are served from the same queue, so a snapshot always
//! reflects every event sent before it.
//!
//! New notifications are re-published on a `broadcast` channel for whoever
//! wants to display them; slow subscribers lag and lose messages, the
//! service never waits for them.

use std::sync::Arc;
use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::event::TrackerEvent;
use crate::metrics::TrackerMetrics;
use crate::state::{TrackerSnapshot, TrackerState};
use crate::NodeError;

const NOTIFICATION_CHANNEL_CAPACITY: usize = 256;

enum ServiceMessage {
    Event(TrackerEvent),
    Snapshot(oneshot::Sender<TrackerSnapshot>),
}

/// Cloneable entry point to a running [`TrackerService`].
#[derive(Clone)]
pub struct TrackerHandle {
    tx: mpsc::Sender<ServiceMessage>,
    notifications: broadcast::Sender<String>,
}

impl TrackerHandle {
    /// Queue an event, waiting for room if the queue is full.
    pub async fn send(&self, event: TrackerEvent) -> Result<(), NodeError> {
        self.tx
            .send(ServiceMessage::Event(event))
            .await
            .map_err(|_| NodeError::ServiceStopped)
    }

    /// A snapshot taken after every event queued before this call.
    pub async fn snapshot(&self) -> Result<TrackerSnapshot, NodeError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(ServiceMessage::Snapshot(reply_tx))
            .await
            .map_err(|_| NodeError::ServiceStopped)?;
        reply_rx.await.map_err(|_| NodeError::ServiceStopped)
    }

    /// Receive every notification emitted from now on.
    pub fn subscribe_notifications(&self) -> broadcast::Receiver<String> {
        self.notifications.subscribe()
    }
}

pub struct TrackerService {
    state: TrackerState,
    rx: mpsc::Receiver<ServiceMessage>,
    notifications: broadcast::Sender<String>,
    metrics: Option<Arc<TrackerMetrics>>,
}

impl TrackerService {
    pub fn new(state: TrackerState, queue_capacity: usize) -> (Self, TrackerHandle) {
        let (tx, rx) = mpsc::channel(queue_capacity.max(1));
        let (notifications, _) = broadcast::channel(NOTIFICATION_CHANNEL_CAPACITY);
        let handle = TrackerHandle {
            tx,
            notifications: notifications.clone(),
        };
        let service = Self {
            state,
            rx,
            notifications,
            metrics: None,
        };
        (service, handle)
    }

    pub fn with_metrics(mut self, metrics: Arc<TrackerMetrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Run until shutdown is signalled or every handle is dropped.
    ///
    /// Returns the final state.
    pub async fn run(mut self, mut shutdown: broadcast::Receiver<()>) -> TrackerState {
        tracing::info!("tracker service started");
        loop {
            let message = tokio::select! {
                biased;
                _ = shutdown.recv() => {
                    tracing::info!("tracker service shutting down");
                    break;
                }
                message = self.rx.recv() => match message {
                    Some(message) => message,
                    None => {
                        tracing::info!("all tracker handles dropped, stopping");
                        break;
                    }
                },
            };

            match message {
                ServiceMessage::Event(event) => self.handle_event(event),
                ServiceMessage::Snapshot(reply) => {
                    let _ = reply.send(self.state.snapshot());
                }
            }
        }
        self.state
    }

    pub fn spawn(self, shutdown: broadcast::Receiver<()>) -> JoinHandle<TrackerState> {
        tokio::spawn(self.run(shutdown))
    }

    fn handle_event(&mut self, event: TrackerEvent) {
        let kind = event.kind();
        let outcome = self.state.apply(event);
        tracing::trace!(kind, applied = ?outcome.applied, "event applied");

        if let Some(metrics) = &self.metrics {
            metrics.observe(kind, &outcome.applied, &self.state);
        }
        for message in outcome.notifications {
            tracing::info!(notification = %message);
            let _ = self.notifications.send(message);
        }
    }
}
