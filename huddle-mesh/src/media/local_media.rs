use crate::media::LocalTrack;
use huddle_core::MediaKind;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info};

struct LocalMediaInner {
    stream_id: String,
    tracks: Vec<LocalTrack>,
    has_media_devices: bool,
    audio_enabled: AtomicBool,
    video_enabled: AtomicBool,
}

/// Локальный поток: захватывается один раз и служит источником для всех пиров.
#[derive(Clone)]
pub struct LocalMediaState {
    inner: Arc<LocalMediaInner>,
}

impl LocalMediaState {
    pub fn new(stream_id: impl Into<String>, tracks: Vec<LocalTrack>) -> Self {
        Self::build(stream_id.into(), tracks, true)
    }

    /// Valid stream without tracks, used when capture is unavailable.
    pub fn empty(stream_id: impl Into<String>) -> Self {
        Self::build(stream_id.into(), Vec::new(), false)
    }

    fn build(stream_id: String, tracks: Vec<LocalTrack>, has_media_devices: bool) -> Self {
        Self {
            inner: Arc::new(LocalMediaInner {
                stream_id,
                tracks,
                has_media_devices,
                audio_enabled: AtomicBool::new(true),
                video_enabled: AtomicBool::new(true),
            }),
        }
    }

    pub fn stream_id(&self) -> &str {
        &self.inner.stream_id
    }

    pub fn tracks(&self) -> &[LocalTrack] {
        &self.inner.tracks
    }

    pub fn track(&self, kind: MediaKind) -> Option<&LocalTrack> {
        self.inner.tracks.iter().find(|t| t.kind() == kind)
    }

    pub fn has_media_devices(&self) -> bool {
        self.inner.has_media_devices
    }

    pub fn audio_enabled(&self) -> bool {
        self.inner.audio_enabled.load(Ordering::Acquire)
    }

    pub fn video_enabled(&self) -> bool {
        self.inner.video_enabled.load(Ordering::Acquire)
    }

    /// Flip the enabled flag of every track of `kind` in place.
    pub fn set_enabled(&self, kind: MediaKind, enabled: bool) {
        let flag = match kind {
            MediaKind::Audio => &self.inner.audio_enabled,
            MediaKind::Video => &self.inner.video_enabled,
        };
        flag.store(enabled, Ordering::Release);

        let mut touched = 0;
        for track in self.inner.tracks.iter().filter(|t| t.kind() == kind) {
            track.set_enabled(enabled);
            touched += 1;
        }
        debug!("Local {} set to enabled={} ({} tracks)", kind, enabled, touched);
    }

    pub fn stop_all(&self) {
        let live = self.inner.tracks.iter().filter(|t| !t.is_stopped()).count();
        for track in &self.inner.tracks {
            track.stop();
        }
        if live > 0 {
            info!("Stopped {} local tracks", live);
        }
    }
}

impl std::fmt::Debug for LocalMediaState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalMediaState")
            .field("stream_id", &self.inner.stream_id)
            .field("tracks", &self.inner.tracks)
            .field("has_media_devices", &self.inner.has_media_devices)
            .field("audio_enabled", &self.audio_enabled())
            .field("video_enabled", &self.video_enabled())
            .finish()
    }
}
