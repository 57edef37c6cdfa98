use crate::media::LocalTrack;
use crate::registry::RemoteTrack;
use crate::transport::{PeerTransport, TransportConfig, TransportEvent, TransportFactory, TransportState};
use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use huddle_core::{ConnectionId, IceCandidate, MediaKind, PeerName, SdpType, SessionDescription};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use webrtc::api::APIBuilder;
use webrtc::api::interceptor_registry::register_default_interceptors;
use webrtc::api::media_engine::MediaEngine;
use webrtc::ice_transport::ice_candidate::{RTCIceCandidate, RTCIceCandidateInit};
use webrtc::interceptor::registry::Registry;
use webrtc::peer_connection::RTCPeerConnection;
use webrtc::peer_connection::configuration::RTCConfiguration;
use webrtc::peer_connection::peer_connection_state::RTCPeerConnectionState;
use webrtc::peer_connection::sdp::session_description::RTCSessionDescription;
use webrtc::rtp_transceiver::rtp_codec::RTPCodecType;
use webrtc::track::track_local::TrackLocal;
use webrtc::track::track_remote::TrackRemote;

pub struct ConnectionWrapper {
    pub peer: PeerName,
    pub connection_id: ConnectionId,
    pub peer_connection: Arc<RTCPeerConnection>,
}

impl ConnectionWrapper {
    /// Инициализация нового WebRTC соединения к пиру.
    /// event_tx: канал, в который транспорт будет "выплевывать" события для цикла сессии.
    pub async fn new(
        peer: PeerName,
        connection_id: ConnectionId,
        config: &TransportConfig,
        tracks: &[LocalTrack],
        event_tx: mpsc::Sender<TransportEvent>,
    ) -> Result<Self> {
        // 1. Кодеки и интерцепторы (RTCP отчеты, NACK)
        let mut m = MediaEngine::default();
        m.register_default_codecs()?;
        let registry = register_default_interceptors(Registry::new(), &mut m)?;

        let api = APIBuilder::new()
            .with_media_engine(m)
            .with_interceptor_registry(registry)
            .build();

        // 2. STUN/TURN
        let rtc_config = RTCConfiguration {
            ice_servers: config.rtc_ice_servers(),
            ..Default::default()
        };

        let peer_connection = Arc::new(
            api.new_peer_connection(rtc_config)
                .await
                .context("Failed to create peer connection")?,
        );

        // 3. Исходящие треки: одни и те же объекты для всех пиров
        for track in tracks {
            let rtp_sender = peer_connection
                .add_track(track.rtc_track() as Arc<dyn TrackLocal + Send + Sync>)
                .await
                .with_context(|| format!("Failed to add local {} track", track.kind()))?;

            // RTCP нужно вычитывать, иначе интерцепторы не работают
            tokio::spawn(async move {
                let mut buf = vec![0u8; 1500];
                while rtp_sender.read(&mut buf).await.is_ok() {}
            });
        }

        // A. Мониторинг состояния соединения
        let state_tx = event_tx.clone();
        let peer_state = peer.clone();
        peer_connection.on_peer_connection_state_change(Box::new(
            move |s: RTCPeerConnectionState| {
                let tx = state_tx.clone();
                let peer = peer_state.clone();

                Box::pin(async move {
                    info!("Peer Connection State changed for {}: {:?}", peer, s);
                    let Some(state) = map_state(s) else { return };
                    let _ = tx
                        .send(TransportEvent::StateChanged(peer, connection_id, state))
                        .await;
                })
            },
        ));

        // B. Trickle ICE
        let ice_tx = event_tx.clone();
        let peer_ice = peer.clone();
        peer_connection.on_ice_candidate(Box::new(move |c: Option<RTCIceCandidate>| {
            let tx = ice_tx.clone();
            let peer = peer_ice.clone();

            Box::pin(async move {
                let Some(candidate) = c else { return };
                let json = match candidate.to_json() {
                    Ok(json) => json,
                    Err(e) => {
                        warn!("Failed to serialize local candidate for {}: {}", peer, e);
                        return;
                    }
                };
                let _ = tx
                    .send(TransportEvent::CandidateGenerated(
                        peer,
                        connection_id,
                        from_rtc_candidate(json),
                    ))
                    .await;
            })
        }));

        // C. Входящие треки
        let track_tx = event_tx;
        let peer_track = peer.clone();
        peer_connection.on_track(Box::new(move |track: Arc<TrackRemote>, _receiver, _transceiver| {
            let tx = track_tx.clone();
            let peer = peer_track.clone();

            Box::pin(async move {
                let Some(kind) = map_kind(track.kind()) else {
                    debug!("Ignoring track of unspecified kind from {}", peer);
                    return;
                };
                let remote = RemoteTrack {
                    id: track.id(),
                    stream_id: track.stream_id(),
                    kind,
                    handle: Some(track),
                };
                debug!("Remote {} track {} from {}", kind, remote.id, peer);
                let _ = tx
                    .send(TransportEvent::TrackArrived(peer, connection_id, remote))
                    .await;
            })
        }));

        Ok(Self {
            peer,
            connection_id,
            peer_connection,
        })
    }
}

#[async_trait]
impl PeerTransport for ConnectionWrapper {
    async fn create_offer(&self) -> Result<SessionDescription> {
        let offer = self.peer_connection.create_offer(None).await?;
        self.peer_connection
            .set_local_description(offer.clone())
            .await
            .context("Failed to set local offer")?;
        Ok(SessionDescription::offer(offer.sdp))
    }

    async fn create_answer(&self) -> Result<SessionDescription> {
        let answer = self.peer_connection.create_answer(None).await?;
        self.peer_connection
            .set_local_description(answer.clone())
            .await
            .context("Failed to set local answer")?;
        Ok(SessionDescription::answer(answer.sdp))
    }

    async fn set_remote_description(&self, description: SessionDescription) -> Result<()> {
        let desc = to_rtc_description(description)?;
        self.peer_connection
            .set_remote_description(desc)
            .await
            .context("Failed to set remote description")?;
        Ok(())
    }

    async fn add_ice_candidate(&self, candidate: IceCandidate) -> Result<()> {
        self.peer_connection
            .add_ice_candidate(to_rtc_candidate(candidate))
            .await
            .context("Failed to add ICE candidate")?;
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        self.peer_connection.close().await?;
        Ok(())
    }
}

/// Фабрика настоящих WebRTC соединений.
#[derive(Debug, Clone, Default)]
pub struct RtcTransportFactory {
    config: TransportConfig,
}

impl RtcTransportFactory {
    pub fn new(config: TransportConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl TransportFactory for RtcTransportFactory {
    async fn create(
        &self,
        peer: &PeerName,
        connection_id: ConnectionId,
        tracks: &[LocalTrack],
        events: mpsc::Sender<TransportEvent>,
    ) -> Result<Box<dyn PeerTransport>> {
        let wrapper =
            ConnectionWrapper::new(peer.clone(), connection_id, &self.config, tracks, events)
                .await?;
        Ok(Box::new(wrapper))
    }
}

fn map_state(state: RTCPeerConnectionState) -> Option<TransportState> {
    match state {
        RTCPeerConnectionState::New => Some(TransportState::New),
        RTCPeerConnectionState::Connecting => Some(TransportState::Connecting),
        RTCPeerConnectionState::Connected => Some(TransportState::Connected),
        RTCPeerConnectionState::Disconnected => Some(TransportState::Disconnected),
        RTCPeerConnectionState::Failed => Some(TransportState::Failed),
        RTCPeerConnectionState::Closed => Some(TransportState::Closed),
        _ => None,
    }
}

fn map_kind(kind: RTPCodecType) -> Option<MediaKind> {
    match kind {
        RTPCodecType::Audio => Some(MediaKind::Audio),
        RTPCodecType::Video => Some(MediaKind::Video),
        _ => None,
    }
}

pub(crate) fn to_rtc_description(description: SessionDescription) -> Result<RTCSessionDescription> {
    let desc = match description.sdp_type {
        SdpType::Offer => RTCSessionDescription::offer(description.sdp)?,
        SdpType::Answer => RTCSessionDescription::answer(description.sdp)?,
        SdpType::Pranswer => RTCSessionDescription::pranswer(description.sdp)?,
        SdpType::Rollback => bail!("rollback descriptions are not supported"),
    };
    Ok(desc)
}

pub(crate) fn to_rtc_candidate(candidate: IceCandidate) -> RTCIceCandidateInit {
    RTCIceCandidateInit {
        candidate: candidate.candidate,
        sdp_mid: candidate.sdp_mid,
        sdp_mline_index: candidate.sdp_m_line_index,
        username_fragment: candidate.username_fragment,
    }
}

pub(crate) fn from_rtc_candidate(init: RTCIceCandidateInit) -> IceCandidate {
    IceCandidate {
        candidate: init.candidate,
        sdp_mid: init.sdp_mid,
        sdp_m_line_index: init.sdp_mline_index,
        username_fragment: init.username_fragment,
    }
}
