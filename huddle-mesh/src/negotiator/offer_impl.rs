use crate::error::MeshError;
use crate::negotiator::{ConnectionNegotiator, NegotiationPhase};
use huddle_core::SessionDescription;
use tracing::debug;

impl ConnectionNegotiator {
    /// idle → offering → awaiting-answer. The returned offer is already the local description.
    pub(crate) async fn start_offer(&mut self) -> Result<SessionDescription, MeshError> {
        if self.phase != NegotiationPhase::Idle {
            return Err(MeshError::InvalidState(format!(
                "cannot offer to {} in phase {:?}",
                self.remote, self.phase
            )));
        }

        self.phase = NegotiationPhase::Offering;
        let offer = self
            .transport
            .create_offer()
            .await
            .map_err(|e| MeshError::negotiation(&self.remote, e))?;
        self.phase = NegotiationPhase::AwaitingAnswer;

        debug!("Offer for {} ready, awaiting answer", self.remote);
        Ok(offer)
    }
}
