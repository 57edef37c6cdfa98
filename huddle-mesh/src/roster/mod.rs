mod http_roster;

pub use http_roster::*;

use crate::error::MeshError;
use async_trait::async_trait;
use huddle_core::{PeerName, RoomId};

/// Авторитетный список участников комнаты на момент входа.
#[async_trait]
pub trait RosterSource: Send + Sync {
    async fn fetch(&self, room: &RoomId) -> Result<Vec<PeerName>, MeshError>;
}
