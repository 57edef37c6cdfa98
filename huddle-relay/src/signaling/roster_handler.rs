use crate::room::RoomManager;
use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use huddle_core::RoomId;
use tracing::debug;

/// `GET /roster/{room_id}`: участники комнаты в порядке входа, 404 для неизвестной комнаты.
pub async fn roster_handler(
    Path(room_id): Path<String>,
    State(manager): State<RoomManager>,
) -> Response {
    let room_id = RoomId::from(room_id);

    match manager.roster(&room_id).await {
        Some(names) => {
            debug!("Roster for {}: {} members", room_id, names.len());
            Json(names).into_response()
        }
        None => (StatusCode::NOT_FOUND, format!("room {room_id} not found")).into_response(),
    }
}
