use crate::media::LocalTrack;
use bytes::Bytes;
use huddle_core::MediaKind;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, warn};
use webrtc::media::Sample;

/// Opus frame that decodes to 20ms of silence.
const OPUS_SILENCE: [u8; 3] = [0xf8, 0xff, 0xfe];
const FRAME: Duration = Duration::from_millis(20);

/// Кормит аудиотрек тишиной, пока трек не остановят.
/// Без RTP удалённая сторона так и не увидит трек.
/// Only audio can be fed this way, for video `None` is returned.
pub fn spawn_silence(track: LocalTrack) -> Option<JoinHandle<()>> {
    if track.kind() != MediaKind::Audio {
        return None;
    }

    Some(tokio::spawn(async move {
        let sample = Sample {
            data: Bytes::from_static(&OPUS_SILENCE),
            duration: FRAME,
            ..Default::default()
        };
        let mut ticker = tokio::time::interval(FRAME);

        while !track.is_stopped() {
            ticker.tick().await;
            if let Err(e) = track.write_sample(&sample).await {
                warn!("Silence feed for {} stopped: {}", track.id(), e);
                return;
            }
        }
        debug!("Silence feed for {} finished", track.id());
    }))
}
