use std::time::Duration;

use bytes::Bytes;
use huddle_core::MediaKind;
use webrtc::media::Sample;

use crate::integration::{answer, init_tracing, joined_session};

fn sample() -> Sample {
    Sample {
        data: Bytes::from_static(&[0u8; 32]),
        duration: Duration::from_millis(20),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_toggle_audio_flips_shared_track_without_signaling() {
    init_tracing();

    let mut test = joined_session("alice", &["alice", "bob"]).await;
    test.session
        .handle_signal(answer("bob", "alice", "bob-answer"))
        .await
        .unwrap();
    test.signaling.clear_sent().await;

    let media = test.session.local_media().unwrap();
    let audio = media.track(MediaKind::Audio).unwrap().clone();
    let offers_before = test.transports.created()[0].log().offers_created;

    test.session.toggle_local_audio(false);
    assert!(!media.audio_enabled());
    assert!(!audio.write_sample(&sample()).await.unwrap());

    test.session.toggle_local_audio(true);
    assert!(media.audio_enabled());
    assert!(audio.write_sample(&sample()).await.unwrap());

    assert!(media.video_enabled());
    assert!(test.signaling.sent().await.is_empty());
    assert_eq!(test.transports.created().len(), 1);
    assert_eq!(test.transports.created()[0].log().offers_created, offers_before);
}

#[tokio::test]
async fn test_toggle_video_leaves_audio_alone() {
    init_tracing();

    let test = joined_session("alice", &["alice"]).await;
    let media = test.session.local_media().unwrap();

    test.session.toggle_local_video(false);

    assert!(!media.video_enabled());
    assert!(!media.track(MediaKind::Video).unwrap().is_enabled());
    assert!(media.track(MediaKind::Audio).unwrap().is_enabled());
}
