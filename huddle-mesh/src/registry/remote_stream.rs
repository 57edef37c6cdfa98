use huddle_core::MediaKind;
use std::sync::Arc;
use webrtc::track::track_remote::TrackRemote;

/// Входящий трек пира. `handle` отсутствует у транспортов без реального RTP.
#[derive(Clone)]
pub struct RemoteTrack {
    pub id: String,
    pub stream_id: String,
    pub kind: MediaKind,
    pub handle: Option<Arc<TrackRemote>>,
}

impl std::fmt::Debug for RemoteTrack {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteTrack")
            .field("id", &self.id)
            .field("stream_id", &self.stream_id)
            .field("kind", &self.kind)
            .field("has_handle", &self.handle.is_some())
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct RemoteStream {
    pub stream_id: String,
    pub tracks: Vec<RemoteTrack>,
}

impl RemoteStream {
    pub fn new(track: RemoteTrack) -> Self {
        Self {
            stream_id: track.stream_id.clone(),
            tracks: vec![track],
        }
    }

    /// Tracks arrive one by one. Same id replaces, a new stream id starts over.
    pub(crate) fn apply(&mut self, track: RemoteTrack) {
        if track.stream_id != self.stream_id {
            *self = RemoteStream::new(track);
            return;
        }
        match self.tracks.iter_mut().find(|t| t.id == track.id) {
            Some(existing) => *existing = track,
            None => self.tracks.push(track),
        }
    }

    pub fn track(&self, kind: MediaKind) -> Option<&RemoteTrack> {
        self.tracks.iter().find(|t| t.kind == kind)
    }
}
