pub const DEFAULT_STUN_ADDR: &str = "stun:stun.relay.metered.ca:80";

pub const WS_PATH: &str = "ws";
pub const ROSTER_PATH: &str = "roster";
