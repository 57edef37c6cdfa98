use crate::error::MeshError;
use crate::media::{LocalMediaState, LocalTrack};
use async_trait::async_trait;
use huddle_core::MediaKind;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

#[derive(Debug, Clone, Copy)]
pub struct MediaConstraints {
    pub audio: bool,
    pub video: bool,
}

impl Default for MediaConstraints {
    fn default() -> Self {
        Self {
            audio: true,
            video: true,
        }
    }
}

/// Источник захвата (камера, микрофон или их заменитель).
#[async_trait]
pub trait CaptureDevice: Send + Sync {
    async fn open(
        &self,
        stream_id: &str,
        constraints: MediaConstraints,
    ) -> Result<Vec<LocalTrack>, MeshError>;
}

/// Opus + VP8 sample tracks that the application feeds itself via `LocalTrack::write_sample`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SyntheticCapture;

#[async_trait]
impl CaptureDevice for SyntheticCapture {
    async fn open(
        &self,
        stream_id: &str,
        constraints: MediaConstraints,
    ) -> Result<Vec<LocalTrack>, MeshError> {
        let mut tracks = Vec::new();
        if constraints.audio {
            tracks.push(LocalTrack::new(MediaKind::Audio, stream_id));
        }
        if constraints.video {
            tracks.push(LocalTrack::new(MediaKind::Video, stream_id));
        }
        Ok(tracks)
    }
}

/// Device that is never there.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoCapture;

#[async_trait]
impl CaptureDevice for NoCapture {
    async fn open(
        &self,
        _stream_id: &str,
        _constraints: MediaConstraints,
    ) -> Result<Vec<LocalTrack>, MeshError> {
        Err(MeshError::DeviceUnavailable("no capture device".to_owned()))
    }
}

#[derive(Clone)]
pub struct MediaDeviceGateway {
    device: Arc<dyn CaptureDevice>,
    constraints: MediaConstraints,
}

impl MediaDeviceGateway {
    pub fn new(device: Arc<dyn CaptureDevice>) -> Self {
        Self {
            device,
            constraints: MediaConstraints::default(),
        }
    }

    pub fn with_constraints(mut self, constraints: MediaConstraints) -> Self {
        self.constraints = constraints;
        self
    }

    /// Захват локального потока. Никогда не возвращает ошибку: при недоступном
    /// устройстве отдаётся пустой поток с `has_media_devices() == false`.
    pub async fn acquire(&self) -> LocalMediaState {
        let stream_id = format!("huddle-{}", Uuid::new_v4());

        match self.device.open(&stream_id, self.constraints).await {
            Ok(tracks) => {
                for track in &tracks {
                    info!("Local track ready: kind={}, id={}", track.kind(), track.id());
                }
                LocalMediaState::new(stream_id, tracks)
            }
            Err(e) => {
                warn!("No media devices found or access denied, continuing without audio/video: {}", e);
                LocalMediaState::empty(stream_id)
            }
        }
    }
}

impl Default for MediaDeviceGateway {
    fn default() -> Self {
        Self::new(Arc::new(SyntheticCapture))
    }
}
