use crate::media::LocalTrack;
use crate::transport::TransportEvent;
use anyhow::Result;
use async_trait::async_trait;
use huddle_core::{ConnectionId, IceCandidate, PeerName, SessionDescription};
use tokio::sync::mpsc;

/// One underlying peer connection. Local descriptions are applied by the
/// `create_*` calls themselves.
#[async_trait]
pub trait PeerTransport: Send + Sync {
    async fn create_offer(&self) -> Result<SessionDescription>;

    async fn create_answer(&self) -> Result<SessionDescription>;

    async fn set_remote_description(&self, description: SessionDescription) -> Result<()>;

    async fn add_ice_candidate(&self, candidate: IceCandidate) -> Result<()>;

    async fn close(&self) -> Result<()>;
}

/// Фабрика соединений. `events`: канал, в который транспорт отдаёт свои события циклу сессии.
#[async_trait]
pub trait TransportFactory: Send + Sync {
    async fn create(
        &self,
        peer: &PeerName,
        connection_id: ConnectionId,
        tracks: &[LocalTrack],
        events: mpsc::Sender<TransportEvent>,
    ) -> Result<Box<dyn PeerTransport>>;
}
