use crate::error::MeshError;
use async_trait::async_trait;
use huddle_core::{LocalIdentity, SignalEvent};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Исходящая половина сигнального канала. Содержимое событий не интерпретирует.
#[async_trait]
pub trait SignalingChannel: Send + Sync {
    /// Fails with `ChannelClosed` once the channel is gone.
    async fn send(&self, event: SignalEvent) -> Result<(), MeshError>;

    /// Announces `leave` and shuts the channel down. Repeated calls do nothing.
    async fn close(&self);
}

/// Открытый канал: отправитель плюс упорядоченный поток входящих событий.
/// Конец потока означает потерю соединения.
pub struct SignalingLink {
    pub channel: Arc<dyn SignalingChannel>,
    pub events: mpsc::Receiver<SignalEvent>,
}

#[async_trait]
pub trait SignalingConnector: Send + Sync {
    async fn connect(&self, identity: &LocalIdentity) -> Result<SignalingLink, MeshError>;
}
