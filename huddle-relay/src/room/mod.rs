mod member_output;
mod room;
mod room_command;
mod room_manager;

pub use member_output::*;
pub use room::*;
pub use room_command::*;
pub use room_manager::*;
