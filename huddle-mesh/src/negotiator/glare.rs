use huddle_core::PeerName;

/// Both sides offered at once. The side whose name sorts lower keeps its offer,
/// the other one answers. Both ends compute the same result.
pub fn keeps_own_offer(local: &PeerName, remote: &PeerName) -> bool {
    local < remote
}
