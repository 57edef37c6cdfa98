use crate::session::MeshNegotiator;
use huddle_core::MediaKind;
use tracing::{debug, info};

impl MeshNegotiator {
    pub fn toggle_local_audio(&self, enabled: bool) {
        self.toggle(MediaKind::Audio, enabled);
    }

    pub fn toggle_local_video(&self, enabled: bool) {
        self.toggle(MediaKind::Video, enabled);
    }

    // Only the shared track flags change, nothing is renegotiated.
    fn toggle(&self, kind: MediaKind, enabled: bool) {
        let Some(media) = self.local_media() else {
            debug!("No local media yet, {} toggle ignored", kind);
            return;
        };
        media.set_enabled(kind, enabled);
        info!(
            "Local {} {}",
            kind,
            if enabled { "enabled" } else { "disabled" }
        );
    }
}
