use crate::error::MeshError;
use crate::media::{LocalMediaState, LocalTrack, MediaDeviceGateway};
use crate::negotiator::{ConnectionNegotiator, NegotiationPhase, NegotiationRole};
use crate::registry::PeerRegistry;
use crate::roster::{HttpRoster, RosterSource};
use crate::signaling::{SignalingChannel, SignalingConnector, WsConnector};
use crate::transport::{RtcTransportFactory, TransportConfig, TransportEvent, TransportFactory};
use huddle_core::{LocalIdentity, PeerName, SignalEvent};
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use url::Url;

mod initialize_impl;
mod mesh_handle;
mod peer_impl;
mod run_impl;
mod session_command;
mod signal_impl;
mod teardown_impl;
mod toggle_impl;
mod transport_impl;

pub use mesh_handle::*;
pub use session_command::*;

/// How long `initialize` waits for the relay to echo our own `join`.
pub const JOIN_ACK_TIMEOUT: Duration = Duration::from_secs(10);

pub type ErrorCallback = Arc<dyn Fn(&MeshError) + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionLifecycle {
    Fresh,
    Active,
    TornDown,
}

/// Оркестратор mesh-сессии.
/// Владеет всеми соединениями с пирами и единолично пишет в `PeerRegistry`.
pub struct MeshNegotiator {
    identity: Option<LocalIdentity>,
    connector: Arc<dyn SignalingConnector>,
    roster: Arc<dyn RosterSource>,
    transports: Arc<dyn TransportFactory>,
    media_gateway: MediaDeviceGateway,
    on_error: Option<ErrorCallback>,

    lifecycle: SessionLifecycle,
    channel: Option<Arc<dyn SignalingChannel>>,
    signals: Option<mpsc::Receiver<SignalEvent>>,
    /// Пришли до подтверждения `join`, обрабатываются первыми в `run`.
    backlog: VecDeque<SignalEvent>,
    local_media: watch::Sender<Option<LocalMediaState>>,

    /// Одно состояние на пира, не больше.
    peers: HashMap<PeerName, ConnectionNegotiator>,
    registry: PeerRegistry,

    /// Все транспорты пишут сюда, цикл сессии читает.
    transport_tx: mpsc::Sender<TransportEvent>,
    transport_rx: mpsc::Receiver<TransportEvent>,

    command_tx: mpsc::Sender<SessionCommand>,
    command_rx: mpsc::Receiver<SessionCommand>,
}

impl MeshNegotiator {
    pub fn new(
        connector: Arc<dyn SignalingConnector>,
        roster: Arc<dyn RosterSource>,
        transports: Arc<dyn TransportFactory>,
    ) -> Self {
        let (transport_tx, transport_rx) = mpsc::channel(256);
        let (command_tx, command_rx) = mpsc::channel(32);
        let (local_media, _) = watch::channel(None);

        Self {
            identity: None,
            connector,
            roster,
            transports,
            media_gateway: MediaDeviceGateway::default(),
            on_error: None,
            lifecycle: SessionLifecycle::Fresh,
            channel: None,
            signals: None,
            backlog: VecDeque::new(),
            local_media,
            peers: HashMap::new(),
            registry: PeerRegistry::new(),
            transport_tx,
            transport_rx,
            command_tx,
            command_rx,
        }
    }

    /// Signaling over `{base}/ws`, roster from `{base}/roster/{roomId}`, real WebRTC transport.
    pub fn over_relay(base: &Url, config: TransportConfig) -> Result<Self, MeshError> {
        let connector = WsConnector::from_base(base)?;
        Ok(Self::new(
            Arc::new(connector),
            Arc::new(HttpRoster::new(base.clone())),
            Arc::new(RtcTransportFactory::new(config)),
        ))
    }

    pub fn with_identity(mut self, identity: LocalIdentity) -> Self {
        self.identity = Some(identity);
        self
    }

    pub fn with_media_gateway(mut self, gateway: MediaDeviceGateway) -> Self {
        self.media_gateway = gateway;
        self
    }

    /// Вызывается для фатальных ошибок, после полного teardown.
    pub fn on_error(mut self, callback: impl Fn(&MeshError) + Send + Sync + 'static) -> Self {
        self.on_error = Some(Arc::new(callback));
        self
    }

    pub fn identity(&self) -> Option<&LocalIdentity> {
        self.identity.as_ref()
    }

    pub fn lifecycle(&self) -> SessionLifecycle {
        self.lifecycle
    }

    pub fn registry(&self) -> &PeerRegistry {
        &self.registry
    }

    pub fn local_media(&self) -> Option<LocalMediaState> {
        self.local_media.borrow().clone()
    }

    pub fn connection_count(&self) -> usize {
        self.peers.len()
    }

    pub fn peer_phase(&self, peer: &PeerName) -> Option<NegotiationPhase> {
        self.peers.get(peer).map(|n| n.phase())
    }

    pub fn peer_role(&self, peer: &PeerName) -> Option<NegotiationRole> {
        self.peers.get(peer).map(|n| n.role())
    }

    pub fn pending_candidates(&self, peer: &PeerName) -> Option<usize> {
        self.peers.get(peer).map(|n| n.pending_candidates())
    }

    pub fn handle(&self) -> MeshHandle {
        MeshHandle::new(
            self.command_tx.clone(),
            self.registry.clone(),
            self.local_media.subscribe(),
        )
    }

    fn local_name(&self) -> Option<PeerName> {
        self.identity.as_ref().map(|i| i.display_name.clone())
    }

    fn local_tracks(&self) -> Vec<LocalTrack> {
        self.local_media
            .borrow()
            .as_ref()
            .map(|media| media.tracks().to_vec())
            .unwrap_or_default()
    }

    async fn send_signal(&self, event: SignalEvent) -> Result<(), MeshError> {
        let Some(channel) = &self.channel else {
            return Err(MeshError::ChannelClosed);
        };
        channel.send(event).await
    }
}
