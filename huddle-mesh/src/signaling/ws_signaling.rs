use crate::error::MeshError;
use crate::signaling::{SignalingChannel, SignalingConnector, SignalingLink};
use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use huddle_core::utils::WS_PATH;
use huddle_core::{LocalIdentity, SignalEvent};
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, error, info, warn};
use url::Url;

const INBOUND_CAPACITY: usize = 256;

/// Подключение к relay по WebSocket (`ws(s)://host/ws`).
#[derive(Debug, Clone)]
pub struct WsConnector {
    url: Url,
}

impl WsConnector {
    pub fn new(url: Url) -> Self {
        Self { url }
    }

    /// `http://host:port` → `ws://host:port/ws`, `https` → `wss`.
    pub fn from_base(base: &Url) -> Result<Self, MeshError> {
        let mut url = base.clone();
        let scheme = match base.scheme() {
            "http" | "ws" => "ws",
            "https" | "wss" => "wss",
            other => {
                return Err(MeshError::Signaling(format!(
                    "unsupported relay scheme '{other}'"
                )));
            }
        };
        url.set_scheme(scheme)
            .map_err(|_| MeshError::Signaling(format!("cannot use {base} as a relay url")))?;
        url.set_path(&format!("/{WS_PATH}"));
        url.set_query(None);
        Ok(Self { url })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

#[async_trait]
impl SignalingConnector for WsConnector {
    async fn connect(&self, identity: &LocalIdentity) -> Result<SignalingLink, MeshError> {
        let (socket, _) = connect_async(self.url.as_str())
            .await
            .map_err(|e| MeshError::Signaling(format!("failed to connect to {}: {e}", self.url)))?;
        info!(
            "Signaling connected to {} as {} in room {}",
            self.url, identity.display_name, identity.room_id
        );

        let (mut sender, mut receiver) = socket.split();
        let (out_tx, mut out_rx) = mpsc::unbounded_channel::<Message>();
        let (in_tx, in_rx) = mpsc::channel(INBOUND_CAPACITY);

        tokio::spawn(async move {
            while let Some(msg) = out_rx.recv().await {
                let is_close = matches!(msg, Message::Close(_));
                if let Err(e) = sender.send(msg).await {
                    debug!("Signaling writer stopped: {}", e);
                    break;
                }
                if is_close {
                    break;
                }
            }
            let _ = sender.close().await;
        });

        let reader = tokio::spawn(async move {
            while let Some(frame) = receiver.next().await {
                let msg = match frame {
                    Ok(msg) => msg,
                    Err(e) => {
                        warn!("Signaling socket error: {}", e);
                        break;
                    }
                };
                match msg {
                    Message::Text(text) => match serde_json::from_str::<SignalEvent>(&text) {
                        Ok(event) => {
                            debug!("Signal in: {}", event.name());
                            if in_tx.send(event).await.is_err() {
                                break;
                            }
                        }
                        Err(e) => warn!("Skipping undecodable signaling frame: {}", e),
                    },
                    Message::Close(_) => break,
                    _ => {}
                }
            }
            info!("Signaling stream ended");
        });

        let channel = WsSignaling {
            outgoing: out_tx,
            reader: Mutex::new(Some(reader)),
            closed: AtomicBool::new(false),
        };

        Ok(SignalingLink {
            channel: Arc::new(channel),
            events: in_rx,
        })
    }
}

pub struct WsSignaling {
    outgoing: mpsc::UnboundedSender<Message>,
    reader: Mutex<Option<JoinHandle<()>>>,
    closed: AtomicBool,
}

impl WsSignaling {
    fn push(&self, event: &SignalEvent) -> Result<(), MeshError> {
        let json = serde_json::to_string(event).map_err(|e| {
            error!("Failed to serialize signal event: {}", e);
            MeshError::Signaling(e.to_string())
        })?;
        self.outgoing
            .send(Message::text(json))
            .map_err(|_| MeshError::ChannelClosed)
    }
}

#[async_trait]
impl SignalingChannel for WsSignaling {
    async fn send(&self, event: SignalEvent) -> Result<(), MeshError> {
        if self.closed.load(Ordering::Acquire) {
            return Err(MeshError::ChannelClosed);
        }
        debug!("Signal out: {}", event.name());
        self.push(&event)
    }

    async fn close(&self) {
        if self.closed.swap(true, Ordering::AcqRel) {
            return;
        }
        let _ = self.push(&SignalEvent::Leave);
        let _ = self.outgoing.send(Message::Close(None));

        let reader = self.reader.lock().ok().and_then(|mut guard| guard.take());
        if let Some(reader) = reader {
            reader.abort();
        }
        info!("Signaling channel closed");
    }
}
