pub use huddle_core::model::{LocalIdentity, PeerName, RoomId};

pub mod model {
    pub use huddle_core::model::*;
}

#[cfg(feature = "mesh")]
pub mod mesh {
    pub use huddle_mesh::*;
}

#[cfg(feature = "relay")]
pub mod relay {
    pub use huddle_relay::*;
}
