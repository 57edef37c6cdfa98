use huddle_core::PeerName;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum MeshError {
    #[error("invalid state: {0}")]
    InvalidState(String),

    #[error("media devices unavailable: {0}")]
    DeviceUnavailable(String),

    #[error("roster fetch failed: {0}")]
    RosterFetchFailed(String),

    #[error("negotiation with {peer} failed: {reason}")]
    NegotiationFailed { peer: PeerName, reason: String },

    #[error("signaling channel closed")]
    ChannelClosed,

    #[error("signaling error: {0}")]
    Signaling(String),
}

impl MeshError {
    pub(crate) fn negotiation(peer: &PeerName, err: anyhow::Error) -> Self {
        MeshError::NegotiationFailed {
            peer: peer.clone(),
            reason: format!("{err:#}"),
        }
    }

    /// Фатальные ошибки завершают всю сессию, остальные касаются одного пира.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            MeshError::RosterFetchFailed(_) | MeshError::ChannelClosed | MeshError::Signaling(_)
        )
    }
}
