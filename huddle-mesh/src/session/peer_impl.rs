use crate::error::MeshError;
use crate::negotiator::{ConnectionNegotiator, NegotiationRole};
use crate::registry::PeerStatus;
use crate::session::MeshNegotiator;
use huddle_core::{PeerName, SignalEvent};
use tracing::{debug, error, info, warn};

impl MeshNegotiator {
    /// Offering path. Errors returned from here are fatal for the session;
    /// a failure with this one peer only drops the peer.
    pub(crate) async fn offer_to(&mut self, peer: PeerName) -> Result<(), MeshError> {
        if self.peers.contains_key(&peer) {
            debug!("Already negotiating with {}", peer);
            return Ok(());
        }
        let Some(me) = self.local_name() else {
            return Ok(());
        };

        self.registry.set_status(&peer, PeerStatus::Connecting);
        let mut negotiator = match self.open_negotiator(&peer, NegotiationRole::Offerer).await {
            Ok(negotiator) => negotiator,
            Err(e) => {
                self.drop_peer(&peer, e).await;
                return Ok(());
            }
        };

        let offer = match negotiator.start_offer().await {
            Ok(offer) => offer,
            Err(e) => {
                negotiator.close().await;
                self.drop_peer(&peer, e).await;
                return Ok(());
            }
        };
        self.install(negotiator).await;

        self.send_signal(SignalEvent::Offer {
            offer,
            from: me,
            to: peer.clone(),
        })
        .await?;
        info!("Sent offer to {}", peer);
        Ok(())
    }

    pub(crate) async fn open_negotiator(
        &self,
        peer: &PeerName,
        role: NegotiationRole,
    ) -> Result<ConnectionNegotiator, MeshError> {
        let tracks = self.local_tracks();
        ConnectionNegotiator::open(
            peer,
            role,
            self.transports.as_ref(),
            &tracks,
            self.transport_tx.clone(),
        )
        .await
    }

    /// Новое состояние вытесняет старое, старое соединение закрывается.
    pub(crate) async fn install(&mut self, negotiator: ConnectionNegotiator) {
        let peer = negotiator.remote().clone();
        self.registry.set_status(&peer, negotiator.status());

        if let Some(mut old) = self.peers.insert(peer.clone(), negotiator) {
            warn!(
                "Replacing connection {} to {}",
                old.connection_id(),
                peer
            );
            old.close().await;
        }
    }

    /// Ошибка с одним пиром: соединение и запись в реестре удаляются, сессия живёт дальше.
    pub(crate) async fn drop_peer(&mut self, peer: &PeerName, err: MeshError) {
        error!("Dropping peer {}: {}", peer, err);
        if let Some(mut negotiator) = self.peers.remove(peer) {
            negotiator.close().await;
        }
        self.registry.remove(peer);
    }

    pub(crate) async fn remove_peer(&mut self, peer: &PeerName) {
        let had_connection = match self.peers.remove(peer) {
            Some(mut negotiator) => {
                negotiator.close().await;
                true
            }
            None => false,
        };
        let had_entry = self.registry.remove(peer);

        if had_connection || had_entry {
            info!("Peer {} left", peer);
        } else {
            debug!("Peer {} left but was never known", peer);
        }
    }
}
