use crate::negotiator::ConnectionNegotiator;
use huddle_core::IceCandidate;
use tracing::{debug, warn};

impl ConnectionNegotiator {
    /// До remote description кандидаты копятся в буфере.
    pub(crate) async fn add_remote_candidate(&mut self, candidate: IceCandidate) {
        if !self.remote_description_set {
            self.pending_candidates.push(candidate);
            debug!(
                "Buffered candidate from {} ({} pending)",
                self.remote,
                self.pending_candidates.len()
            );
            return;
        }
        self.apply_candidate(candidate).await;
    }

    /// Candidates still waiting for a remote description, in arrival order.
    pub(crate) fn take_pending_candidates(&mut self) -> Vec<IceCandidate> {
        std::mem::take(&mut self.pending_candidates)
    }

    pub(crate) async fn flush_candidates(&mut self) {
        if self.pending_candidates.is_empty() {
            return;
        }
        let pending = std::mem::take(&mut self.pending_candidates);
        debug!("Flushing {} candidates for {}", pending.len(), self.remote);
        for candidate in pending {
            self.apply_candidate(candidate).await;
        }
    }

    async fn apply_candidate(&self, candidate: IceCandidate) {
        // кандидат от соединения, которое пир уже выбросил (glare)
        if let (Some(theirs), Some(current)) = (&candidate.username_fragment, &self.remote_ufrag) {
            if theirs != current {
                debug!(
                    "Dropping stale candidate from {} (ufrag {} != {})",
                    self.remote, theirs, current
                );
                return;
            }
        }
        if let Err(e) = self.transport.add_ice_candidate(candidate).await {
            warn!("Failed to add ICE candidate for {}: {:#}", self.remote, e);
        }
    }
}
