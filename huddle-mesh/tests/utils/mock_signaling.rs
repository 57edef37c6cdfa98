use async_trait::async_trait;
use huddle_core::{IceCandidate, LocalIdentity, PeerName, SessionDescription, SignalEvent};
use huddle_mesh::{MeshError, SignalingChannel, SignalingConnector, SignalingLink};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::{Mutex, mpsc};

struct MockSignalingInner {
    /// Everything the session sent, in order.
    sent: Mutex<Vec<SignalEvent>>,
    /// Sender half of the session's inbound stream (set on connect).
    inbound: Mutex<Option<mpsc::Sender<SignalEvent>>>,
    closed: AtomicBool,
    connects: AtomicUsize,
    fail_connect: bool,
    /// Echo `peer-joined` back on `join`, as the relay does.
    echo_join: bool,
    /// Delivered right before the join echo.
    before_ack: Mutex<Vec<SignalEvent>>,
}

/// Mock relay connection that records outbound events and lets the test inject inbound ones.
///
/// # Example
///
/// ```ignore
/// let signaling = MockSignaling::new();
/// let session = MeshNegotiator::new(Arc::new(signaling.clone()), roster, transports);
///
/// signaling.inject(SignalEvent::PeerJoined { .. }).await;
/// assert_eq!(signaling.offers_to(&bob).await.len(), 1);
/// ```
#[derive(Clone)]
pub struct MockSignaling {
    inner: Arc<MockSignalingInner>,
}

impl MockSignaling {
    pub fn new() -> Self {
        Self::build(false, true)
    }

    /// Connector whose `connect` always fails.
    pub fn unreachable() -> Self {
        Self::build(true, false)
    }

    /// Relay that accepts the socket but never confirms `join`.
    pub fn silent() -> Self {
        Self::build(false, false)
    }

    fn build(fail_connect: bool, echo_join: bool) -> Self {
        Self {
            inner: Arc::new(MockSignalingInner {
                sent: Mutex::new(Vec::new()),
                inbound: Mutex::new(None),
                closed: AtomicBool::new(false),
                connects: AtomicUsize::new(0),
                fail_connect,
                echo_join,
                before_ack: Mutex::new(Vec::new()),
            }),
        }
    }

    pub fn connect_count(&self) -> usize {
        self.inner.connects.load(Ordering::SeqCst)
    }

    pub fn is_closed(&self) -> bool {
        self.inner.closed.load(Ordering::SeqCst)
    }

    /// Deliver an event to the session's inbound stream (for sessions driven by `run`).
    pub async fn inject(&self, event: SignalEvent) {
        let inbound = self.inner.inbound.lock().await.clone();
        if let Some(tx) = inbound {
            let _ = tx.send(event).await;
        }
    }

    /// Queue an event that reaches the session while it still waits for the join echo.
    pub async fn deliver_before_join_ack(&self, event: SignalEvent) {
        self.inner.before_ack.lock().await.push(event);
    }

    /// Simulate losing the relay connection.
    pub async fn drop_inbound(&self) {
        self.inner.inbound.lock().await.take();
    }

    pub async fn sent(&self) -> Vec<SignalEvent> {
        self.inner.sent.lock().await.clone()
    }

    pub async fn clear_sent(&self) {
        self.inner.sent.lock().await.clear();
    }

    pub async fn offers_to(&self, peer: &PeerName) -> Vec<SessionDescription> {
        self.sent()
            .await
            .into_iter()
            .filter_map(|e| match e {
                SignalEvent::Offer { offer, to, .. } if &to == peer => Some(offer),
                _ => None,
            })
            .collect()
    }

    pub async fn answers_to(&self, peer: &PeerName) -> Vec<SessionDescription> {
        self.sent()
            .await
            .into_iter()
            .filter_map(|e| match e {
                SignalEvent::Answer { answer, to, .. } if &to == peer => Some(answer),
                _ => None,
            })
            .collect()
    }

    pub async fn candidates_to(&self, peer: &PeerName) -> Vec<IceCandidate> {
        self.sent()
            .await
            .into_iter()
            .filter_map(|e| match e {
                SignalEvent::Candidate { candidate, to, .. } if &to == peer => Some(candidate),
                _ => None,
            })
            .collect()
    }

    /// Offer/answer/candidate traffic, i.e. everything except join/leave.
    pub async fn negotiation_traffic(&self) -> usize {
        self.sent()
            .await
            .iter()
            .filter(|e| e.route().is_some())
            .count()
    }

    /// Wait until at least `count` events were sent.
    pub async fn wait_for_sent(&self, count: usize, timeout_ms: u64) -> bool {
        let start = std::time::Instant::now();
        let timeout = std::time::Duration::from_millis(timeout_ms);

        loop {
            if self.inner.sent.lock().await.len() >= count {
                return true;
            }
            if start.elapsed() > timeout {
                return false;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
    }
}

impl Default for MockSignaling {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SignalingConnector for MockSignaling {
    async fn connect(&self, identity: &LocalIdentity) -> Result<SignalingLink, MeshError> {
        self.inner.connects.fetch_add(1, Ordering::SeqCst);
        if self.inner.fail_connect {
            return Err(MeshError::Signaling("relay unreachable".to_owned()));
        }
        tracing::debug!("[MockSignaling] connect as {}", identity.display_name);

        let (tx, rx) = mpsc::channel(64);
        *self.inner.inbound.lock().await = Some(tx);

        Ok(SignalingLink {
            channel: Arc::new(MockChannel {
                inner: Arc::clone(&self.inner),
            }),
            events: rx,
        })
    }
}

struct MockChannel {
    inner: Arc<MockSignalingInner>,
}

#[async_trait]
impl SignalingChannel for MockChannel {
    async fn send(&self, event: SignalEvent) -> Result<(), MeshError> {
        if self.inner.closed.load(Ordering::SeqCst) {
            return Err(MeshError::ChannelClosed);
        }
        tracing::debug!("[MockSignaling] send {}", event.name());
        self.inner.sent.lock().await.push(event.clone());

        if let SignalEvent::Join { display_name, .. } = event {
            if self.inner.echo_join {
                let inbound = self.inner.inbound.lock().await.clone();
                if let Some(tx) = inbound {
                    let early = std::mem::take(&mut *self.inner.before_ack.lock().await);
                    for event in early {
                        let _ = tx.send(event).await;
                    }
                    let _ = tx
                        .send(SignalEvent::PeerJoined {
                            users: vec![display_name.clone()],
                            username: display_name,
                        })
                        .await;
                }
            }
        }
        Ok(())
    }

    async fn close(&self) {
        if self.inner.closed.swap(true, Ordering::SeqCst) {
            return;
        }
        self.inner.sent.lock().await.push(SignalEvent::Leave);
        self.inner.inbound.lock().await.take();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_signaling_records_and_closes() {
        let signaling = MockSignaling::new();
        let link = signaling
            .connect(&LocalIdentity::new("R1", "alice"))
            .await
            .unwrap();

        link.channel
            .send(SignalEvent::PeerLeft {
                username: "bob".into(),
            })
            .await
            .unwrap();
        link.channel.close().await;
        link.channel.close().await;

        assert!(signaling.is_closed());
        assert_eq!(signaling.sent().await.len(), 2);
        assert!(matches!(
            link.channel.send(SignalEvent::Leave).await,
            Err(MeshError::ChannelClosed)
        ));
    }
}
