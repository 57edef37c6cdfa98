use crate::room::{MemberOutput, RoomCommand, RoomManager};
use crate::signaling::WsMemberOutput;
use axum::extract::State;
use axum::extract::WebSocketUpgrade;
use axum::extract::ws::{Message, WebSocket};
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use huddle_core::{ConnectionId, SignalEvent};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(manager): State<RoomManager>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, manager))
}

async fn handle_socket(socket: WebSocket, manager: RoomManager) {
    let connection_id = ConnectionId::new();
    info!("New WebSocket connection: {}", connection_id);

    let (mut sender, mut receiver) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel();

    let mut send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(msg).await.is_err() {
                break;
            }
        }
    });

    let mut recv_task = tokio::spawn(async move {
        // Комната, в которую вошёл этот сокет
        let mut room_tx: Option<mpsc::Sender<RoomCommand>> = None;

        while let Some(Ok(msg)) = receiver.next().await {
            let text = match msg {
                Message::Text(text) => text,
                Message::Close(_) => break,
                _ => continue,
            };
            let event = match serde_json::from_str::<SignalEvent>(&text) {
                Ok(event) => event,
                Err(e) => {
                    warn!("Invalid signal event from {}: {}", connection_id, e);
                    continue;
                }
            };

            match event {
                SignalEvent::Join {
                    room_id,
                    display_name,
                } => {
                    if room_tx.is_some() {
                        warn!("Second join on connection {}, ignoring", connection_id);
                        continue;
                    }
                    if room_id.as_str().trim().is_empty() || display_name.is_blank() {
                        warn!("Join with blank room or name on {}", connection_id);
                        continue;
                    }
                    info!("{} wants to join room '{}'", display_name, room_id);

                    let output = || -> Box<dyn MemberOutput> {
                        Box::new(WsMemberOutput::new(tx.clone()))
                    };
                    match manager
                        .join(&room_id, display_name, connection_id, output)
                        .await
                    {
                        Some(room) => room_tx = Some(room),
                        None => {
                            error!("Could not join room {} on {}", room_id, connection_id);
                            break;
                        }
                    }
                }

                SignalEvent::Leave => {
                    if let Some(room) = room_tx.take() {
                        let _ = room.send(RoomCommand::Disconnect { connection_id }).await;
                    }
                }

                SignalEvent::Offer { .. }
                | SignalEvent::Answer { .. }
                | SignalEvent::Candidate { .. } => {
                    let Some(room) = &room_tx else {
                        warn!("{} before join on {}", event.name(), connection_id);
                        continue;
                    };
                    let cmd = RoomCommand::Relay {
                        connection_id,
                        event,
                    };
                    if let Err(e) = room.send(cmd).await {
                        error!("Room died: {}", e);
                        break;
                    }
                }

                SignalEvent::PeerJoined { .. } | SignalEvent::PeerLeft { .. } => {
                    debug!("Ignoring relay-only {} from {}", event.name(), connection_id);
                }
            }
        }

        if let Some(room) = room_tx {
            let _ = room.send(RoomCommand::Disconnect { connection_id }).await;
        }
    });

    tokio::select! {
        _ = (&mut send_task) => recv_task.abort(),
        _ = (&mut recv_task) => send_task.abort(),
    };

    info!("WebSocket disconnected: {}", connection_id);
}
