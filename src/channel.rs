//! Push-channel client.
//!
//! Maintains one subscription per session: a single background task
//! long-polls the event endpoint and forwards wire frames over an owned
//! mpsc handle. The consumer side never sees the transport, so tests can
//! feed frames through the same handle without a server.
//!
//! Reconnects happen inside the one task, so there is never a duplicate
//! subscription. After a delivery gap the channel reports `Resynced`; the
//! caller re-pulls a snapshot before resuming event application, since the
//! transport makes no gap-filling promise.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use intrack_core::event::WireFrame;

use crate::client::ApiClient;

const POLL_RETRY_DELAY: Duration = Duration::from_secs(2);
const CHANNEL_CAPACITY: usize = 64;

/// What the channel hands to its consumer.
#[derive(Debug)]
pub enum ChannelMessage {
    Frame(WireFrame),
    /// The transport dropped and came back. Frames may have been missed; the
    /// store must be re-seeded from a snapshot before applying what follows.
    Resynced,
}

/// Handle to the push subscription. Dropping it unsubscribes: the polling
/// task is aborted and no further frames are delivered.
pub struct EventChannel {
    rx: mpsc::Receiver<ChannelMessage>,
    task: Option<JoinHandle<()>>,
}

impl EventChannel {
    /// Connect once for this authenticated session.
    pub fn connect(client: ApiClient) -> Self {
        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
        let task = tokio::spawn(poll_loop(client, tx));
        EventChannel {
            rx,
            task: Some(task),
        }
    }

    /// Build a channel fed by the caller instead of a transport.
    #[cfg(test)]
    pub fn from_receiver(rx: mpsc::Receiver<ChannelMessage>) -> Self {
        EventChannel { rx, task: None }
    }

    /// Next message, or `None` once the channel is closed.
    pub async fn recv(&mut self) -> Option<ChannelMessage> {
        self.rx.recv().await
    }
}

impl Drop for EventChannel {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

async fn poll_loop(client: ApiClient, tx: mpsc::Sender<ChannelMessage>) {
    let mut cursor = 0u64;
    let mut disconnected = false;

    loop {
        match client.poll_events(cursor).await {
            Ok(batch) => {
                if disconnected {
                    disconnected = false;
                    if tx.send(ChannelMessage::Resynced).await.is_err() {
                        return;
                    }
                }
                cursor = batch.cursor;
                for frame in batch.frames {
                    if tx.send(ChannelMessage::Frame(frame)).await.is_err() {
                        // Consumer unsubscribed.
                        return;
                    }
                }
            }
            Err(e) => {
                if !disconnected {
                    warn!(error = %e, "push channel disconnected, retrying");
                }
                disconnected = true;
                debug!("retrying poll in {:?}", POLL_RETRY_DELAY);
                tokio::time::sleep(POLL_RETRY_DELAY).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn make_frame(id: i64) -> WireFrame {
        serde_json::from_value(json!({
            "topic": "interview-tracker:update",
            "payload": {
                "type": "created",
                "interview": {
                    "id": id,
                    "ownerUserId": 7,
                    "date": "2024-03-05",
                    "time": "10:00:00",
                    "counterpartName": "Acme",
                    "status": "scheduled",
                },
            },
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_injected_frames_are_delivered_in_order() {
        let (tx, rx) = mpsc::channel(8);
        let mut channel = EventChannel::from_receiver(rx);

        tx.send(ChannelMessage::Frame(make_frame(1))).await.unwrap();
        tx.send(ChannelMessage::Frame(make_frame(2))).await.unwrap();
        drop(tx);

        let first = channel.recv().await.unwrap();
        let second = channel.recv().await.unwrap();
        match (first, second) {
            (ChannelMessage::Frame(WireFrame::Interview(a)), ChannelMessage::Frame(WireFrame::Interview(b))) => {
                assert_eq!(a.body["id"], 1);
                assert_eq!(b.body["id"], 2);
            }
            other => panic!("unexpected messages: {:?}", other),
        }

        assert!(channel.recv().await.is_none());
    }
}
