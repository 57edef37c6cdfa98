use crate::negotiator::{ConnectionNegotiator, NegotiationPhase};
use tracing::{debug, warn};

impl ConnectionNegotiator {
    pub(crate) async fn close(&mut self) {
        if self.phase == NegotiationPhase::Closed {
            return;
        }
        self.phase = NegotiationPhase::Closed;
        self.pending_candidates.clear();

        match self.transport.close().await {
            Ok(()) => debug!("Closed connection {} to {}", self.connection_id, self.remote),
            Err(e) => warn!("Failed to close connection to {}: {:#}", self.remote, e),
        }
    }
}
