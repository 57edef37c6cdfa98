mod gateway;
mod local_media;
mod local_track;
mod silence;

pub use gateway::*;
pub use local_media::*;
pub use local_track::*;
pub use silence::*;
