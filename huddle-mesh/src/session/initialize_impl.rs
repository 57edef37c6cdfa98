use crate::error::MeshError;
use crate::negotiator::{NegotiationRole, decide_role};
use crate::session::{JOIN_ACK_TIMEOUT, MeshNegotiator, SessionLifecycle};
use huddle_core::{PeerName, SignalEvent};
use std::collections::HashSet;
use tracing::{debug, info};

impl MeshNegotiator {
    /// Вход в комнату: медиа, сигнальный канал, `join`, ростер, offer каждому из ростера.
    pub async fn initialize(&mut self) -> Result<(), MeshError> {
        if self.lifecycle != SessionLifecycle::Fresh {
            return Err(MeshError::InvalidState(format!(
                "initialize on a {:?} session",
                self.lifecycle
            )));
        }
        let identity = match &self.identity {
            Some(identity) if identity.is_valid() => identity.clone(),
            Some(_) => {
                return Err(MeshError::InvalidState(
                    "room id and display name must not be blank".to_owned(),
                ));
            }
            None => {
                return Err(MeshError::InvalidState(
                    "local identity is not set".to_owned(),
                ));
            }
        };

        self.lifecycle = SessionLifecycle::Active;
        info!(
            "Joining room {} as {}",
            identity.room_id, identity.display_name
        );

        let media = self.media_gateway.acquire().await;
        self.local_media.send_replace(Some(media));

        let link = match self.connector.connect(&identity).await {
            Ok(link) => link,
            Err(e) => return Err(self.fail(e).await),
        };
        self.channel = Some(link.channel);
        self.signals = Some(link.events);

        let join = SignalEvent::Join {
            room_id: identity.room_id.clone(),
            display_name: identity.display_name.clone(),
        };
        if let Err(e) = self.send_signal(join).await {
            return Err(self.fail(e).await);
        }
        // ростер запрашиваем только после того, как relay принял наш join
        if let Err(e) = self.await_join_ack(&identity.display_name).await {
            return Err(self.fail(e).await);
        }

        let roster = match self.roster.fetch(&identity.room_id).await {
            Ok(names) if names.is_empty() => Err(MeshError::RosterFetchFailed(format!(
                "room {} has an empty roster",
                identity.room_id
            ))),
            other => other,
        };
        let roster = match roster {
            Ok(roster) => roster,
            Err(e) => return Err(self.fail(e).await),
        };

        let peers = existing_peers(roster, &identity.display_name);
        info!(
            "Roster for room {}: {} other participants",
            identity.room_id,
            peers.len()
        );

        for peer in peers {
            if let Err(e) = self.discover_peer(peer, false).await {
                return Err(self.fail(e).await);
            }
        }
        Ok(())
    }

    /// Ждёт эха `peer-joined` со своим именем. Остальные события откладываются в backlog.
    async fn await_join_ack(&mut self, me: &PeerName) -> Result<(), MeshError> {
        let Some(signals) = self.signals.as_mut() else {
            return Err(MeshError::ChannelClosed);
        };
        let deadline = tokio::time::Instant::now() + JOIN_ACK_TIMEOUT;

        loop {
            let event = match tokio::time::timeout_at(deadline, signals.recv()).await {
                Err(_) => {
                    return Err(MeshError::Signaling(format!(
                        "relay did not confirm join within {:?}",
                        JOIN_ACK_TIMEOUT
                    )));
                }
                Ok(None) => return Err(MeshError::ChannelClosed),
                Ok(Some(event)) => event,
            };
            match event {
                SignalEvent::PeerJoined { username, users } if &username == me => {
                    debug!("Relay confirmed our join ({} users)", users.len());
                    return Ok(());
                }
                other => {
                    debug!("Holding {} until join is confirmed", other.name());
                    self.backlog.push_back(other);
                }
            }
        }
    }

    /// `self_joined_before` says which of the two sides entered the room first.
    pub(crate) async fn discover_peer(
        &mut self,
        peer: PeerName,
        self_joined_before: bool,
    ) -> Result<(), MeshError> {
        match decide_role(self_joined_before) {
            NegotiationRole::Offerer => self.offer_to(peer).await,
            NegotiationRole::Answerer => {
                if self.registry.ensure_placeholder(&peer) {
                    info!("Peer {} joined, waiting for their offer", peer);
                }
                Ok(())
            }
        }
    }
}

/// Roster order is kept; self, blanks and repeats are dropped.
fn existing_peers(roster: Vec<PeerName>, me: &PeerName) -> Vec<PeerName> {
    let mut seen = HashSet::new();
    roster
        .into_iter()
        .filter(|peer| peer != me && !peer.is_blank())
        .filter(|peer| seen.insert(peer.clone()))
        .collect()
}
