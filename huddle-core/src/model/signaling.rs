use crate::model::peer::PeerName;
use crate::model::room::RoomId;
use crate::model::session::{IceCandidate, SessionDescription};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
pub struct IceServerConfig {
    pub urls: Vec<String>,
    pub username: Option<String>,
    pub credential: Option<String>,
}

impl IceServerConfig {
    pub fn stun(urls: Vec<String>) -> Self {
        Self {
            urls,
            username: None,
            credential: None,
        }
    }

    pub fn turn(urls: Vec<String>, username: String, credential: String) -> Self {
        Self {
            urls,
            username: Some(username),
            credential: Some(credential),
        }
    }
}

/// Событие сигнального канала. На проводе: `{"event": "<имя>", "data": {..}}`.
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
#[serde(
    tag = "event",
    content = "data",
    rename_all = "kebab-case",
    rename_all_fields = "camelCase"
)]
pub enum SignalEvent {
    /// Клиент объявляет о себе в комнате.
    Join {
        room_id: RoomId,
        display_name: PeerName,
    },

    /// Клиент покидает комнату (перед закрытием сокета).
    Leave,

    /// Relay: в комнату вошёл новый участник.
    PeerJoined {
        username: PeerName,
        users: Vec<PeerName>,
    },

    /// Relay: участник вышел или его сокет закрылся.
    PeerLeft { username: PeerName },

    Offer {
        offer: SessionDescription,
        from: PeerName,
        to: PeerName,
    },

    Answer {
        answer: SessionDescription,
        from: PeerName,
        to: PeerName,
    },

    Candidate {
        candidate: IceCandidate,
        from: PeerName,
        to: PeerName,
    },
}

impl SignalEvent {
    pub fn name(&self) -> &'static str {
        match self {
            SignalEvent::Join { .. } => "join",
            SignalEvent::Leave => "leave",
            SignalEvent::PeerJoined { .. } => "peer-joined",
            SignalEvent::PeerLeft { .. } => "peer-left",
            SignalEvent::Offer { .. } => "offer",
            SignalEvent::Answer { .. } => "answer",
            SignalEvent::Candidate { .. } => "candidate",
        }
    }

    /// `(from, to)` for events relayed between two clients.
    pub fn route(&self) -> Option<(&PeerName, &PeerName)> {
        match self {
            SignalEvent::Offer { from, to, .. }
            | SignalEvent::Answer { from, to, .. }
            | SignalEvent::Candidate { from, to, .. } => Some((from, to)),
            _ => None,
        }
    }
}
