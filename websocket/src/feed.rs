//! Feed client: connects, forwards frames to the tracker, reconnects.

use futures_util::{SinkExt, StreamExt};
use horde_node::TrackerHandle;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio_tungstenite::{connect_async, tungstenite::Message};

use crate::error::FeedError;
use crate::message::{parse_frame, Frame, CLOSE_FRAME};

/// How a session ended.
#[derive(Debug, PartialEq, Eq)]
enum SessionEnd {
    /// The node closed the feed; reconnect after the back-off.
    Closed,
    Shutdown,
    TrackerStopped,
}

pub struct FeedClient {
    url: String,
    reconnect_delay: Duration,
    tracker: TrackerHandle,
}

impl FeedClient {
    pub fn new(url: impl Into<String>, reconnect_delay: Duration, tracker: TrackerHandle) -> Self {
        Self {
            url: url.into(),
            reconnect_delay,
            tracker,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Run sessions back to back until shutdown or until the tracker stops.
    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) {
        tracing::info!(url = %self.url, "feed client started");
        loop {
            match self.session(&mut shutdown).await {
                Ok(SessionEnd::Shutdown) => break,
                Ok(SessionEnd::TrackerStopped) => {
                    tracing::info!("tracker stopped, closing feed");
                    break;
                }
                Ok(SessionEnd::Closed) => {
                    tracing::info!(url = %self.url, "feed session closed");
                }
                Err(e) => {
                    tracing::warn!(error = %e, delay_secs = self.reconnect_delay.as_secs(), "feed session failed");
                }
            }

            tokio::select! {
                biased;
                _ = shutdown.recv() => break,
                _ = tokio::time::sleep(self.reconnect_delay) => {}
            }
        }
        tracing::info!("feed client stopped");
    }

    async fn session(&self, shutdown: &mut broadcast::Receiver<()>) -> Result<SessionEnd, FeedError> {
        let (mut stream, _) = connect_async(self.url.as_str())
            .await
            .map_err(|e| FeedError::Connect {
                url: self.url.clone(),
                reason: e.to_string(),
            })?;
        tracing::info!(url = %self.url, "feed connected");

        loop {
            let message = tokio::select! {
                biased;
                _ = shutdown.recv() => {
                    if let Err(e) = stream.send(Message::Text(CLOSE_FRAME.into())).await {
                        tracing::debug!(error = %e, "could not send close frame");
                    }
                    return Ok(SessionEnd::Shutdown);
                }
                message = stream.next() => message,
            };

            let text = match message {
                Some(Ok(Message::Text(text))) => text,
                Some(Ok(Message::Close(_))) | None => return Ok(SessionEnd::Closed),
                Some(Ok(_)) => continue,
                Some(Err(e)) => return Err(FeedError::Protocol(e.to_string())),
            };

            match parse_frame(&text) {
                Frame::Event(event) => {
                    tracing::debug!(kind = event.kind(), "feed event");
                    if self.tracker.send(event).await.is_err() {
                        return Ok(SessionEnd::TrackerStopped);
                    }
                }
                Frame::Close => return Ok(SessionEnd::Closed),
                Frame::Skip(reason) => {
                    tracing::warn!(%reason, frame = %text, "skipping feed frame");
                }
            }
        }
    }
}
