use huddle_core::SignalEvent;

/// Трейт, который реализует транспорт участника (WebSocket),
/// чтобы комната могла отправлять ему события.
pub trait MemberOutput: Send + Sync {
    /// Returns `false` when the member is gone.
    fn send(&self, event: &SignalEvent) -> bool;
}
