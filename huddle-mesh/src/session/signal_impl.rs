use crate::error::MeshError;
use crate::negotiator::{NegotiationPhase, NegotiationRole, keeps_own_offer};
use crate::registry::PeerStatus;
use crate::session::{MeshNegotiator, SessionLifecycle};
use huddle_core::{IceCandidate, PeerName, SessionDescription, SignalEvent};
use tracing::{debug, info};

impl MeshNegotiator {
    /// Обработка одного события сигнального канала.
    /// `Err` только для фатальных ошибок; проблемы с одним пиром обрабатываются внутри.
    pub async fn handle_signal(&mut self, event: SignalEvent) -> Result<(), MeshError> {
        if self.lifecycle != SessionLifecycle::Active {
            debug!("Session not active, ignoring {}", event.name());
            return Ok(());
        }
        let Some(me) = self.local_name() else {
            return Ok(());
        };

        match event {
            SignalEvent::PeerJoined { username, users } => {
                if username == me {
                    debug!("Relay announced our own join ({} users)", users.len());
                    return Ok(());
                }
                self.discover_peer(username, true).await
            }

            SignalEvent::PeerLeft { username } => {
                if username != me {
                    self.remove_peer(&username).await;
                }
                Ok(())
            }

            SignalEvent::Offer { offer, from, to } => {
                if !addressed_to(&me, &from, &to) {
                    return Ok(());
                }
                self.on_offer(me, from, offer).await
            }

            SignalEvent::Answer { answer, from, to } => {
                if !addressed_to(&me, &from, &to) {
                    return Ok(());
                }
                self.on_answer(from, answer).await;
                Ok(())
            }

            SignalEvent::Candidate {
                candidate,
                from,
                to,
            } => {
                if !addressed_to(&me, &from, &to) {
                    return Ok(());
                }
                self.on_candidate(from, candidate).await;
                Ok(())
            }

            SignalEvent::Join { .. } | SignalEvent::Leave => {
                debug!("Ignoring client-bound {} event", event.name());
                Ok(())
            }
        }
    }

    async fn on_offer(
        &mut self,
        me: PeerName,
        from: PeerName,
        offer: SessionDescription,
    ) -> Result<(), MeshError> {
        let reuse = match self.peers.get(&from).map(|n| n.phase()) {
            Some(phase) if phase.has_pending_offer() => {
                if keeps_own_offer(&me, &from) {
                    info!("Glare with {}: keeping our offer", from);
                    return Ok(());
                }
                info!("Glare with {}: dropping our offer and answering", from);
                false
            }
            Some(NegotiationPhase::Closed) | None => false,
            Some(_) => true,
        };

        if reuse {
            debug!("Repeated offer from {}, reusing connection", from);
        } else {
            let carried = match self.peers.remove(&from) {
                Some(mut old) => {
                    let pending = old.take_pending_candidates();
                    old.close().await;
                    pending
                }
                None => Vec::new(),
            };

            let mut negotiator = match self
                .open_negotiator(&from, NegotiationRole::Answerer)
                .await
            {
                Ok(negotiator) => negotiator,
                Err(e) => {
                    self.drop_peer(&from, e).await;
                    return Ok(());
                }
            };
            for candidate in carried {
                negotiator.add_remote_candidate(candidate).await;
            }
            self.install(negotiator).await;
        }

        let Some(negotiator) = self.peers.get_mut(&from) else {
            return Ok(());
        };
        let result = negotiator.accept_offer(offer).await;
        let status = negotiator.status();

        match result {
            Ok(answer) => {
                self.registry.set_status(&from, status);
                self.send_signal(SignalEvent::Answer {
                    answer,
                    from: me,
                    to: from.clone(),
                })
                .await?;
                info!("Answered offer from {}", from);
            }
            Err(e) => self.drop_peer(&from, e).await,
        }
        Ok(())
    }

    async fn on_answer(&mut self, from: PeerName, answer: SessionDescription) {
        let Some(negotiator) = self.peers.get_mut(&from) else {
            debug!("Answer from unknown peer {}, ignoring", from);
            return;
        };

        let result = negotiator.accept_answer(answer).await;
        match result {
            Ok(true) => {
                self.registry.set_status(&from, PeerStatus::Connected);
                info!("Negotiation with {} complete", from);
            }
            Ok(false) => {}
            Err(e) => self.drop_peer(&from, e).await,
        }
    }

    async fn on_candidate(&mut self, from: PeerName, candidate: IceCandidate) {
        match self.peers.get_mut(&from) {
            Some(negotiator) => negotiator.add_remote_candidate(candidate).await,
            None => debug!("Candidate from unknown peer {}, ignoring", from),
        }
    }
}

fn addressed_to(me: &PeerName, from: &PeerName, to: &PeerName) -> bool {
    if to != me || from == me {
        debug!("Ignoring event {} -> {}", from, to);
        return false;
    }
    true
}
