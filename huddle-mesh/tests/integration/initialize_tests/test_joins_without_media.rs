use std::sync::Arc;

use huddle_mesh::{MediaDeviceGateway, NoCapture};

use crate::integration::{create_test_session, init_tracing, peer};
use crate::utils::StaticRoster;

#[tokio::test]
async fn test_missing_devices_degrade_to_receive_only() {
    init_tracing();

    let test = create_test_session("alice", StaticRoster::names(&["alice", "bob"]));
    let mut session = test
        .session
        .with_media_gateway(MediaDeviceGateway::new(Arc::new(NoCapture)));

    session.initialize().await.expect("initialize must not fail without devices");

    let media = session.local_media().expect("empty stream is still published");
    assert!(!media.has_media_devices());
    assert!(media.tracks().is_empty());

    let handle = test.transports.latest(&peer("bob")).expect("bob connection");
    assert!(handle.log().local_track_ids.is_empty());
    assert_eq!(test.signaling.offers_to(&peer("bob")).await.len(), 1);
    assert!(test.errors.lock().unwrap().is_empty());
}
