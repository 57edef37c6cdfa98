use crate::room::RoomManager;
use crate::signaling::{roster_handler, ws_handler};
use axum::Router;
use axum::routing::get;
use huddle_core::utils::{ROSTER_PATH, WS_PATH};
use tokio::net::TcpListener;
use tracing::info;

pub fn router(manager: RoomManager) -> Router {
    Router::new()
        .route(&format!("/{WS_PATH}"), get(ws_handler))
        .route(&format!("/{ROSTER_PATH}/{{room_id}}"), get(roster_handler))
        .with_state(manager)
}

pub async fn serve(listener: TcpListener, manager: RoomManager) -> std::io::Result<()> {
    info!("Relay listening on {}", listener.local_addr()?);
    axum::serve(listener, router(manager)).await
}
