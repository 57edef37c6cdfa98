use crate::room::MemberOutput;
use axum::extract::ws::Message;
use huddle_core::SignalEvent;
use tokio::sync::mpsc;
use tracing::error;

/// Очередь исходящих сообщений одного сокета.
pub struct WsMemberOutput {
    tx: mpsc::UnboundedSender<Message>,
}

impl WsMemberOutput {
    pub fn new(tx: mpsc::UnboundedSender<Message>) -> Self {
        Self { tx }
    }
}

impl MemberOutput for WsMemberOutput {
    fn send(&self, event: &SignalEvent) -> bool {
        match serde_json::to_string(event) {
            Ok(json) => self.tx.send(Message::Text(json.into())).is_ok(),
            Err(e) => {
                error!("Failed to serialize signal event: {}", e);
                false
            }
        }
    }
}
