//! Per-connection handler: identity, lobby events, and room routing.
//!
//! Each accepted connection gets its own Tokio task running this handler,
//! plus a writer task that pumps the player's outbound channel into the
//! socket. The handler is the lobby-scoped half of the event router: it
//! resolves session → player, handles the events that exist outside any
//! room (naming, create/join/leave), and forwards everything else to the
//! player's room actor. Malformed frames are logged and dropped without
//! touching state.

use std::sync::Arc;

use tokio::sync::{mpsc, Mutex};
use tracing::{debug, info, warn};

use scrawl_engine::settings;
use scrawl_protocol::{ClientEvent, Codec, JsonCodec, PlayerId, ServerEvent};
use scrawl_registry::{PlayerRegistry, SessionHandle};
use scrawl_room::{PlayerSender, RoomDirectory};
use scrawl_transport::{Connection, WebSocketConnection};

use crate::ScrawlError;

/// Shared server state handed to every connection task.
pub(crate) struct ServerState {
    pub(crate) players: Mutex<PlayerRegistry>,
    pub(crate) rooms: Mutex<RoomDirectory>,
    pub(crate) codec: JsonCodec,
}

/// Handles a single connection from accept to close.
pub(crate) async fn handle_connection(
    conn: WebSocketConnection,
    state: Arc<ServerState>,
) -> Result<(), ScrawlError> {
    let session = SessionHandle(conn.id().into_inner());
    let conn = Arc::new(conn);

    // Outbound channel + writer task: room broadcasts and direct replies
    // all flow through here, so the actor never blocks on socket I/O.
    let (tx, mut rx) = mpsc::unbounded_channel::<ServerEvent>();
    let writer = {
        let conn = Arc::clone(&conn);
        let codec = state.codec;
        tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                let bytes = match codec.encode(&event) {
                    Ok(bytes) => bytes,
                    Err(e) => {
                        warn!(error = %e, "failed to encode outbound event");
                        continue;
                    }
                };
                if conn.send(&bytes).await.is_err() {
                    break;
                }
            }
        })
    };

    // Identity: mint the player and greet them.
    let player = {
        let mut players = state.players.lock().await;
        players.create(session).view()
    };
    let player_id = player.id;
    info!(%player_id, %session, "player connected");
    let _ = tx.send(ServerEvent::Connected { player });

    // Inbound loop.
    loop {
        let data = match conn.recv().await {
            Ok(Some(data)) => data,
            Ok(None) => {
                info!(%player_id, "connection closed");
                break;
            }
            Err(e) => {
                debug!(%player_id, error = %e, "recv error");
                break;
            }
        };

        let event: ClientEvent = match state.codec.decode(&data) {
            Ok(event) => event,
            Err(e) => {
                debug!(%player_id, error = %e, "dropping malformed frame");
                continue;
            }
        };

        dispatch(&state, player_id, &tx, event).await;
    }

    // Disconnect cleanup: leave any room (the room actor handles the
    // mid-game consequences), then forget the player.
    {
        let mut rooms = state.rooms.lock().await;
        let _ = rooms.leave(player_id).await;
    }
    state.players.lock().await.remove_by_session(session);
    writer.abort();
    Ok(())
}

/// Routes one inbound event: lobby events are handled here, room events
/// are forwarded to the player's room actor.
async fn dispatch(
    state: &Arc<ServerState>,
    player_id: PlayerId,
    tx: &PlayerSender,
    event: ClientEvent,
) {
    match event {
        ClientEvent::SetPlayerName { name } => {
            let result = {
                let mut players = state.players.lock().await;
                players.set_name(player_id, &name).map(|r| r.view())
            };
            match result {
                Ok(player) => {
                    let name = player.name.clone();
                    let _ = tx.send(ServerEvent::PlayerUpdated { player });
                    // Re-broadcast membership if they are in a room.
                    let rooms = state.rooms.lock().await;
                    let _ = rooms.rename(player_id, name).await;
                }
                Err(e) => {
                    let _ = tx.send(ServerEvent::RoomError {
                        code: e.code().into(),
                        error: e.to_string(),
                    });
                }
            }
        }

        ClientEvent::CreateRoom { settings: input } => {
            let Some(name) = player_name(state, player_id).await else {
                return;
            };
            let settings = settings::sanitize(&input.unwrap_or_default());
            let result = {
                let mut rooms = state.rooms.lock().await;
                rooms.create(player_id, name, settings, tx.clone())
            };
            match result {
                Ok(room) => {
                    let _ = tx.send(ServerEvent::RoomCreated { room });
                }
                Err(e) => {
                    let _ = tx.send(ServerEvent::RoomError {
                        code: e.code().into(),
                        error: e.to_string(),
                    });
                }
            }
        }

        ClientEvent::JoinRoom { room_id } => {
            let Some(name) = player_name(state, player_id).await else {
                return;
            };
            let result = {
                let mut rooms = state.rooms.lock().await;
                rooms.join(player_id, name, &room_id, tx.clone()).await
            };
            match result {
                Ok(room) => {
                    let _ = tx.send(ServerEvent::RoomJoined { room });
                }
                Err(e) => {
                    let _ = tx.send(ServerEvent::RoomError {
                        code: e.code().into(),
                        error: e.to_string(),
                    });
                }
            }
        }

        ClientEvent::LeaveRoom => {
            let result = {
                let mut rooms = state.rooms.lock().await;
                rooms.leave(player_id).await
            };
            match result {
                Ok(()) => {
                    let _ = tx.send(ServerEvent::RoomLeft);
                }
                Err(e) => {
                    let _ = tx.send(ServerEvent::RoomError {
                        code: e.code().into(),
                        error: e.to_string(),
                    });
                }
            }
        }

        // Everything else belongs to the player's room.
        room_event => {
            let handle = {
                let rooms = state.rooms.lock().await;
                rooms.handle_for_player(player_id).cloned()
            };
            match handle {
                Some(handle) => {
                    let _ = handle.client(player_id, room_event).await;
                }
                None => {
                    let reply = match &room_event {
                        ClientEvent::UpdateRoomSettings { .. } => {
                            ServerEvent::RoomSettingsError {
                                code: "not_found".into(),
                                error: "You are not in a room".into(),
                            }
                        }
                        _ => ServerEvent::GameError {
                            code: "not_found".into(),
                            error: "You are not in a room".into(),
                        },
                    };
                    let _ = tx.send(reply);
                }
            }
        }
    }
}

async fn player_name(
    state: &Arc<ServerState>,
    player_id: PlayerId,
) -> Option<String> {
    let players = state.players.lock().await;
    players.get(player_id).map(|r| r.name.clone())
}
