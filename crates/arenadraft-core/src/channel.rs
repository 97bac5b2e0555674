// WebSocket client for the session lobby.

use futures_util::stream::Stream;
use futures_util::{SinkExt, StreamExt};
use thiserror::Error;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, info, warn};

use crate::protocol::PlayerUpdate;

/// Events emitted by a realtime channel to the controller. Every event
/// carries the generation the channel was opened with.
#[derive(Debug, Clone, PartialEq)]
pub enum ChannelEvent {
    /// The WebSocket handshake completed.
    Connected { generation: u64 },
    /// A text frame was received (raw JSON string).
    Frame { generation: u64, text: String },
    /// The connection ended, or never opened.
    Closed {
        generation: u64,
        reason: Option<String>,
    },
}

impl ChannelEvent {
    pub fn generation(&self) -> u64 {
        match self {
            ChannelEvent::Connected { generation }
            | ChannelEvent::Frame { generation, .. }
            | ChannelEvent::Closed { generation, .. } => *generation,
        }
    }
}

#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("realtime channel is closed")]
    Closed,

    #[error("failed to encode frame: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Handle to one open (or opening) lobby connection.
///
/// Dropping the handle closes the connection: the task sends a close frame
/// once its outbound queue is gone.
pub struct RealtimeChannel {
    generation: u64,
    outbound: mpsc::UnboundedSender<String>,
}

impl RealtimeChannel {
    /// Connect to `url` in a background task. When `first_message` is set it
    /// is sent immediately after the handshake.
    pub fn connect(
        url: String,
        generation: u64,
        first_message: Option<String>,
        events: mpsc::Sender<ChannelEvent>,
    ) -> Self {
        let (outbound, outbound_rx) = mpsc::unbounded_channel();
        tokio::spawn(run_connection(
            url,
            generation,
            first_message,
            outbound_rx,
            events,
        ));
        Self {
            generation,
            outbound,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Queue a readiness update.
    pub fn send_ready(&self, ready: bool) -> Result<(), ChannelError> {
        let text = serde_json::to_string(&PlayerUpdate { ready })?;
        self.outbound.send(text).map_err(|_| ChannelError::Closed)
    }

    /// Close the connection. Events already in flight may still arrive; the
    /// controller drops them by generation.
    pub fn close(self) {
        info!("Closing realtime channel (generation {})", self.generation);
        drop(self);
    }
}

async fn run_connection(
    url: String,
    generation: u64,
    first_message: Option<String>,
    mut outbound: mpsc::UnboundedReceiver<String>,
    events: mpsc::Sender<ChannelEvent>,
) {
    let ws_stream = match tokio_tungstenite::connect_async(url.as_str()).await {
        Ok((ws, _response)) => ws,
        Err(e) => {
            warn!("WebSocket connect to {url} failed: {e}");
            let _ = events
                .send(ChannelEvent::Closed {
                    generation,
                    reason: Some(e.to_string()),
                })
                .await;
            return;
        }
    };
    info!("Connected to {url}");

    if events
        .send(ChannelEvent::Connected { generation })
        .await
        .is_err()
    {
        return;
    }

    let (mut write, read) = ws_stream.split();

    if let Some(text) = first_message {
        if let Err(e) = write.send(Message::Text(text.into())).await {
            warn!("Failed to send registration frame: {e}");
            let _ = events
                .send(ChannelEvent::Closed {
                    generation,
                    reason: Some(e.to_string()),
                })
                .await;
            return;
        }
    }

    let reader = process_message_stream(read, &events, generation);
    tokio::pin!(reader);

    let reason = loop {
        tokio::select! {
            result = &mut reader => {
                match result {
                    Ok(reason) => break reason,
                    // Controller is gone; nobody to report to.
                    Err(()) => return,
                }
            }
            outgoing = outbound.recv() => {
                match outgoing {
                    Some(text) => {
                        debug!("Sending frame: {text}");
                        if let Err(e) = write.send(Message::Text(text.into())).await {
                            warn!("WebSocket send failed: {e}");
                            break Some(e.to_string());
                        }
                    }
                    None => {
                        let _ = write.send(Message::Close(None)).await;
                        break None;
                    }
                }
            }
        }
    };

    let _ = events
        .send(ChannelEvent::Closed { generation, reason })
        .await;
}

/// Forward text frames from any message [`Stream`] through `tx` until the
/// stream ends, a close frame arrives, or a read fails.
///
/// Returns the close reason (if any), or `Err(())` when the receiver was
/// dropped.
pub async fn process_message_stream<St>(
    mut stream: St,
    tx: &mpsc::Sender<ChannelEvent>,
    generation: u64,
) -> Result<Option<String>, ()>
where
    St: Stream<Item = Result<Message, tokio_tungstenite::tungstenite::Error>> + Unpin,
{
    while let Some(msg_result) = stream.next().await {
        match msg_result {
            Ok(Message::Text(text)) => {
                debug!("Received frame ({} bytes)", text.len());
                let event = ChannelEvent::Frame {
                    generation,
                    text: text.to_string(),
                };
                if tx.send(event).await.is_err() {
                    return Err(());
                }
            }
            Ok(Message::Close(frame)) => {
                info!("Server sent close frame");
                let reason = frame
                    .map(|f| f.reason.to_string())
                    .filter(|r| !r.is_empty());
                return Ok(reason);
            }
            Err(e) => {
                warn!("WebSocket read error: {e}");
                return Ok(Some(e.to_string()));
            }
            _ => {
                // Binary, Ping, Pong and raw frames carry nothing for us.
            }
        }
    }
    Ok(None)
}

/// Derive the WebSocket base from an HTTP base URL (`http` -> `ws`,
/// `https` -> `wss`). Other schemes pass through unchanged.
pub fn ws_base(http_base: &str) -> String {
    if let Some(rest) = http_base.strip_prefix("https://") {
        format!("wss://{rest}")
    } else if let Some(rest) = http_base.strip_prefix("http://") {
        format!("ws://{rest}")
    } else {
        http_base.to_string()
    }
}
