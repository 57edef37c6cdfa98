use crate::registry::RemoteTrack;
use huddle_core::{ConnectionId, IceCandidate, PeerName};

/// Состояние нижележащего соединения (упрощённый `RTCPeerConnectionState`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportState {
    New,
    Connecting,
    Connected,
    Disconnected,
    Failed,
    Closed,
}

/// События, которые транспорт генерирует для цикла сессии.
/// Каждое помечено `ConnectionId`, чтобы события от закрытого соединения можно было отбросить.
#[derive(Debug, Clone)]
pub enum TransportEvent {
    /// Сгенерирован локальный ICE-кандидат, его нужно отправить пиру через сигналинг.
    CandidateGenerated(PeerName, ConnectionId, IceCandidate),

    /// Пришёл входящий трек.
    TrackArrived(PeerName, ConnectionId, RemoteTrack),

    StateChanged(PeerName, ConnectionId, TransportState),
}

impl TransportEvent {
    pub fn peer(&self) -> &PeerName {
        match self {
            TransportEvent::CandidateGenerated(peer, ..)
            | TransportEvent::TrackArrived(peer, ..)
            | TransportEvent::StateChanged(peer, ..) => peer,
        }
    }

    pub fn connection_id(&self) -> ConnectionId {
        match self {
            TransportEvent::CandidateGenerated(_, id, _)
            | TransportEvent::TrackArrived(_, id, _)
            | TransportEvent::StateChanged(_, id, _) => *id,
        }
    }
}
