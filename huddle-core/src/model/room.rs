use crate::model::peer::PeerName;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Serialize, Deserialize, Clone, Hash, Eq, PartialEq)]
#[serde(transparent)]
pub struct RoomId(String);

impl RoomId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RoomId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl From<String> for RoomId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Who we are for the lifetime of one session. Never mutated after join.
#[derive(Debug, Serialize, Deserialize, Clone, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LocalIdentity {
    pub room_id: RoomId,
    pub display_name: PeerName,
}

impl LocalIdentity {
    pub fn new(room_id: impl Into<RoomId>, display_name: impl Into<PeerName>) -> Self {
        Self {
            room_id: room_id.into(),
            display_name: display_name.into(),
        }
    }

    pub fn is_valid(&self) -> bool {
        !self.room_id.as_str().trim().is_empty() && !self.display_name.is_blank()
    }
}
