use crate::error::MeshError;
use crate::media::LocalTrack;
use crate::registry::PeerStatus;
use crate::transport::{PeerTransport, TransportEvent, TransportFactory};
use huddle_core::{ConnectionId, IceCandidate, PeerName};
use tokio::sync::mpsc;
use tracing::debug;

mod answer_impl;
mod candidate_impl;
mod close_impl;
mod glare;
mod offer_impl;

pub use glare::keeps_own_offer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NegotiationRole {
    Offerer,
    Answerer,
}

/// Кто делает offer. Пиры из ростера вошли раньше нас, и offer делаем мы;
/// пиры из `peer-joined` вошли позже и сами пришлют offer.
pub fn decide_role(self_joined_before: bool) -> NegotiationRole {
    if self_joined_before {
        NegotiationRole::Answerer
    } else {
        NegotiationRole::Offerer
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NegotiationPhase {
    Idle,
    Offering,
    AwaitingAnswer,
    Answering,
    Connected,
    Closed,
}

impl NegotiationPhase {
    pub fn status(self) -> PeerStatus {
        match self {
            NegotiationPhase::Idle
            | NegotiationPhase::Offering
            | NegotiationPhase::AwaitingAnswer
            | NegotiationPhase::Answering => PeerStatus::Connecting,
            NegotiationPhase::Connected => PeerStatus::Connected,
            NegotiationPhase::Closed => PeerStatus::Closed,
        }
    }

    /// Our own offer to the peer is still outstanding.
    pub fn has_pending_offer(self) -> bool {
        matches!(
            self,
            NegotiationPhase::Offering | NegotiationPhase::AwaitingAnswer
        )
    }
}

/// Состояние соединения с одним пиром: ровно одно нижележащее соединение,
/// роль, фаза offer/answer и буфер ранних ICE-кандидатов.
pub struct ConnectionNegotiator {
    remote: PeerName,
    connection_id: ConnectionId,
    transport: Box<dyn PeerTransport>,
    role: NegotiationRole,
    phase: NegotiationPhase,
    remote_description_set: bool,
    /// `a=ice-ufrag` принятого remote description.
    remote_ufrag: Option<String>,
    pending_candidates: Vec<IceCandidate>,
}

impl ConnectionNegotiator {
    pub(crate) async fn open(
        remote: &PeerName,
        role: NegotiationRole,
        factory: &dyn TransportFactory,
        tracks: &[LocalTrack],
        events: mpsc::Sender<TransportEvent>,
    ) -> Result<Self, MeshError> {
        let connection_id = ConnectionId::new();
        let transport = factory
            .create(remote, connection_id, tracks, events)
            .await
            .map_err(|e| MeshError::negotiation(remote, e))?;

        debug!(
            "Opened connection {} to {} as {:?} with {} local tracks",
            connection_id,
            remote,
            role,
            tracks.len()
        );

        Ok(Self {
            remote: remote.clone(),
            connection_id,
            transport,
            role,
            phase: NegotiationPhase::Idle,
            remote_description_set: false,
            remote_ufrag: None,
            pending_candidates: Vec::new(),
        })
    }

    pub fn remote(&self) -> &PeerName {
        &self.remote
    }

    pub fn connection_id(&self) -> ConnectionId {
        self.connection_id
    }

    pub fn role(&self) -> NegotiationRole {
        self.role
    }

    pub fn phase(&self) -> NegotiationPhase {
        self.phase
    }

    pub fn status(&self) -> PeerStatus {
        self.phase.status()
    }

    pub fn pending_candidates(&self) -> usize {
        self.pending_candidates.len()
    }
}

impl std::fmt::Debug for ConnectionNegotiator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionNegotiator")
            .field("remote", &self.remote)
            .field("connection_id", &self.connection_id)
            .field("role", &self.role)
            .field("phase", &self.phase)
            .field("remote_description_set", &self.remote_description_set)
            .field("remote_ufrag", &self.remote_ufrag)
            .field("pending_candidates", &self.pending_candidates.len())
            .finish()
    }
}
