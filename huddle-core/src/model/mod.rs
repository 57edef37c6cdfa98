mod media;
mod peer;
mod room;
mod session;
mod signaling;

pub use media::MediaKind;
pub use peer::{ConnectionId, PeerName};
pub use room::{LocalIdentity, RoomId};
pub use session::{IceCandidate, SdpType, SessionDescription};
pub use signaling::{IceServerConfig, SignalEvent};
