use crate::error::MeshError;
use crate::registry::PeerStatus;
use crate::session::{MeshNegotiator, SessionLifecycle};
use crate::transport::{TransportEvent, TransportState};
use huddle_core::SignalEvent;
use tracing::{debug, info};

impl MeshNegotiator {
    /// События от WebRTC. События от закрытых или заменённых соединений отбрасываются.
    pub async fn handle_transport_event(&mut self, event: TransportEvent) -> Result<(), MeshError> {
        if self.lifecycle != SessionLifecycle::Active {
            return Ok(());
        }
        let current = self.peers.get(event.peer()).map(|n| n.connection_id());
        if current != Some(event.connection_id()) {
            debug!(
                "Discarding event from stale connection {} to {}",
                event.connection_id(),
                event.peer()
            );
            return Ok(());
        }

        match event {
            TransportEvent::CandidateGenerated(peer, _, candidate) => {
                let Some(me) = self.local_name() else {
                    return Ok(());
                };
                self.send_signal(SignalEvent::Candidate {
                    candidate,
                    from: me,
                    to: peer,
                })
                .await
            }

            TransportEvent::TrackArrived(peer, _, track) => {
                info!("Received {} track {} from {}", track.kind, track.id, peer);
                self.registry.apply_track(&peer, track);
                Ok(())
            }

            TransportEvent::StateChanged(peer, _, state) => {
                match state {
                    TransportState::Connected => {
                        self.registry.set_status(&peer, PeerStatus::Connected);
                    }
                    TransportState::Failed => {
                        let err = MeshError::NegotiationFailed {
                            peer: peer.clone(),
                            reason: "transport failed".to_owned(),
                        };
                        self.drop_peer(&peer, err).await;
                    }
                    other => debug!("Transport to {} is {:?}", peer, other),
                }
                Ok(())
            }
        }
    }
}
