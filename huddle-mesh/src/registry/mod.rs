mod peer_registry;
mod remote_stream;

pub use peer_registry::*;
pub use remote_stream::*;
