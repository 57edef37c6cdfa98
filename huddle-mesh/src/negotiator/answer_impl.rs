use crate::error::MeshError;
use crate::negotiator::{ConnectionNegotiator, NegotiationPhase};
use huddle_core::SessionDescription;
use tracing::debug;

impl ConnectionNegotiator {
    /// Ответ на входящий offer. Повторный offer от того же пира проходит через
    /// то же соединение.
    pub(crate) async fn accept_offer(
        &mut self,
        offer: SessionDescription,
    ) -> Result<SessionDescription, MeshError> {
        if self.phase == NegotiationPhase::Closed || self.phase.has_pending_offer() {
            return Err(MeshError::InvalidState(format!(
                "cannot answer {} in phase {:?}",
                self.remote, self.phase
            )));
        }

        self.phase = NegotiationPhase::Answering;
        self.apply_remote_description(offer).await?;

        let answer = self
            .transport
            .create_answer()
            .await
            .map_err(|e| MeshError::negotiation(&self.remote, e))?;
        self.phase = NegotiationPhase::Connected;

        debug!("Answer for {} ready", self.remote);
        Ok(answer)
    }

    /// Returns `false` when the answer was not expected.
    pub(crate) async fn accept_answer(
        &mut self,
        answer: SessionDescription,
    ) -> Result<bool, MeshError> {
        if self.phase != NegotiationPhase::AwaitingAnswer {
            debug!(
                "Ignoring answer from {} in phase {:?}",
                self.remote, self.phase
            );
            return Ok(false);
        }

        self.apply_remote_description(answer).await?;
        self.phase = NegotiationPhase::Connected;
        Ok(true)
    }

    async fn apply_remote_description(
        &mut self,
        description: SessionDescription,
    ) -> Result<(), MeshError> {
        let description_sdp = description.sdp.clone();
        self.transport
            .set_remote_description(description)
            .await
            .map_err(|e| MeshError::negotiation(&self.remote, e))?;
        self.remote_description_set = true;
        self.remote_ufrag = ice_ufrag(&description_sdp).map(str::to_owned);
        self.flush_candidates().await;
        Ok(())
    }
}

/// First `a=ice-ufrag:` value of an SDP blob.
pub(crate) fn ice_ufrag(sdp: &str) -> Option<&str> {
    sdp.lines()
        .find_map(|line| line.trim_end().strip_prefix("a=ice-ufrag:"))
        .filter(|ufrag| !ufrag.is_empty())
}
