mod error;
mod media;
mod negotiator;
mod registry;
mod roster;
mod session;
mod signaling;
mod transport;

pub use error::*;
pub use media::*;
pub use negotiator::*;
pub use registry::*;
pub use roster::*;
pub use session::*;
pub use signaling::*;
pub use transport::*;
