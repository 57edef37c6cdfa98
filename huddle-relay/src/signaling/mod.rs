mod roster_handler;
mod router;
mod ws_handler;
mod ws_output;

pub use roster_handler::*;
pub use router::*;
pub use ws_handler::*;
pub use ws_output::*;
