//! End-to-end tests: real server, real WebSocket clients, full event flow.
//!
//! These drive the wire contract the way a browser client would: named
//! JSON events in both directions. Round pacing is real time, so the
//! inter-round break (3 s) is the slowest thing here; drawing phases are
//! always cut short by guessing rather than waiting out the clock.

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio_tungstenite::tungstenite::Message;

use scrawl::prelude::*;

type Ws = tokio_tungstenite::WebSocketStream<
    tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
>;

// =========================================================================
// Helpers
// =========================================================================

async fn start() -> String {
    let server = ScrawlServer::builder()
        .bind("127.0.0.1:0")
        .build()
        .await
        .unwrap();
    let addr = server.local_addr().unwrap().to_string();
    tokio::spawn(async move {
        let _ = server.run().await;
    });
    tokio::time::sleep(Duration::from_millis(10)).await;
    addr
}

/// Connects and consumes the `connected` greeting.
async fn connect(addr: &str) -> (Ws, PlayerView) {
    let (mut ws, _) = tokio_tungstenite::connect_async(format!("ws://{addr}"))
        .await
        .expect("client should connect");
    match recv(&mut ws).await {
        ServerEvent::Connected { player } => (ws, player),
        other => panic!("expected connected, got {other:?}"),
    }
}

async fn send(ws: &mut Ws, event: &ClientEvent) {
    let bytes = serde_json::to_vec(event).unwrap();
    ws.send(Message::Binary(bytes.into())).await.unwrap();
}

async fn recv(ws: &mut Ws) -> ServerEvent {
    let msg = tokio::time::timeout(Duration::from_secs(15), ws.next())
        .await
        .expect("timed out waiting for event")
        .expect("stream ended")
        .expect("websocket error");
    serde_json::from_slice(&msg.into_data()).expect("decodable server event")
}

/// Receives events until one matches, discarding ticks and interleaved
/// broadcasts along the way.
async fn recv_until(
    ws: &mut Ws,
    mut pred: impl FnMut(&ServerEvent) -> bool,
) -> ServerEvent {
    loop {
        let event = recv(ws).await;
        if pred(&event) {
            return event;
        }
    }
}

/// Creates a room from `p1` and returns its code.
async fn create_room(p1: &mut Ws, settings: Option<SettingsInput>) -> String {
    send(p1, &ClientEvent::CreateRoom { settings }).await;
    match recv(p1).await {
        ServerEvent::RoomCreated { room } => room.code.as_str().to_string(),
        other => panic!("expected room_created, got {other:?}"),
    }
}

// =========================================================================
// Identity
// =========================================================================

#[tokio::test]
async fn test_connect_assigns_default_identity() {
    let addr = start().await;
    let (_ws, player) = connect(&addr).await;

    assert!(player.name.starts_with("Player"));
    assert_eq!(player.name.len(), "Player".len() + 3);
}

#[tokio::test]
async fn test_set_player_name_validation() {
    let addr = start().await;
    let (mut ws, _) = connect(&addr).await;

    send(
        &mut ws,
        &ClientEvent::SetPlayerName {
            name: "  Ada  ".into(),
        },
    )
    .await;
    match recv(&mut ws).await {
        ServerEvent::PlayerUpdated { player } => {
            assert_eq!(player.name, "Ada")
        }
        other => panic!("unexpected: {other:?}"),
    }

    send(
        &mut ws,
        &ClientEvent::SetPlayerName { name: "   ".into() },
    )
    .await;
    match recv(&mut ws).await {
        ServerEvent::RoomError { code, .. } => {
            assert_eq!(code, "invalid_name")
        }
        other => panic!("unexpected: {other:?}"),
    }
}

// =========================================================================
// Rooms
// =========================================================================

#[tokio::test]
async fn test_create_then_join_default_room() {
    let addr = start().await;
    let (mut p1, _) = connect(&addr).await;
    let (mut p2, _) = connect(&addr).await;

    let code = create_room(&mut p1, None).await;
    assert_eq!(code.len(), 6);

    send(
        &mut p2,
        &ClientEvent::JoinRoom {
            room_id: code.to_lowercase(),
        },
    )
    .await;
    match recv_until(&mut p2, |e| {
        matches!(e, ServerEvent::RoomJoined { .. })
    })
    .await
    {
        ServerEvent::RoomJoined { room } => {
            assert_eq!(room.players.len(), 2);
            assert_eq!(room.status, RoomStatus::Waiting);
            assert_eq!(room.settings, Settings::default());
            assert!(room.players[0].is_owner);
            assert!(!room.players[1].is_owner);
        }
        other => panic!("unexpected: {other:?}"),
    }

    // The owner sees the membership change.
    match recv(&mut p1).await {
        ServerEvent::RoomUpdated { room } => {
            assert_eq!(room.players.len(), 2)
        }
        other => panic!("unexpected: {other:?}"),
    }
}

#[tokio::test]
async fn test_join_unknown_room_is_not_found() {
    let addr = start().await;
    let (mut ws, _) = connect(&addr).await;

    send(
        &mut ws,
        &ClientEvent::JoinRoom {
            room_id: "NOPE99".into(),
        },
    )
    .await;
    match recv(&mut ws).await {
        ServerEvent::RoomError { code, .. } => assert_eq!(code, "not_found"),
        other => panic!("unexpected: {other:?}"),
    }
}

#[tokio::test]
async fn test_leave_room_and_leave_again() {
    let addr = start().await;
    let (mut ws, _) = connect(&addr).await;
    create_room(&mut ws, None).await;

    send(&mut ws, &ClientEvent::LeaveRoom).await;
    assert!(matches!(recv(&mut ws).await, ServerEvent::RoomLeft));

    send(&mut ws, &ClientEvent::LeaveRoom).await;
    match recv(&mut ws).await {
        ServerEvent::RoomError { code, .. } => assert_eq!(code, "not_found"),
        other => panic!("unexpected: {other:?}"),
    }
}

#[tokio::test]
async fn test_start_game_requires_owner_and_players() {
    let addr = start().await;
    let (mut p1, _) = connect(&addr).await;
    create_room(&mut p1, None).await;

    // Alone: too few players.
    send(&mut p1, &ClientEvent::StartGame).await;
    match recv(&mut p1).await {
        ServerEvent::GameError { code, .. } => {
            assert_eq!(code, "too_few_players")
        }
        other => panic!("unexpected: {other:?}"),
    }
}

// =========================================================================
// Full game
// =========================================================================

#[tokio::test]
async fn test_full_game_single_round() {
    let addr = start().await;
    let (mut p1, v1) = connect(&addr).await;
    let (mut p2, v2) = connect(&addr).await;

    let code = create_room(
        &mut p1,
        Some(SettingsInput {
            rounds: Some(1),
            ..SettingsInput::default()
        }),
    )
    .await;
    send(&mut p2, &ClientEvent::JoinRoom { room_id: code }).await;
    recv_until(&mut p2, |e| matches!(e, ServerEvent::RoomJoined { .. }))
        .await;

    // --- Round 1, drawer P1 ---
    send(&mut p1, &ClientEvent::StartGame).await;
    match recv_until(&mut p1, |e| {
        matches!(e, ServerEvent::GameStarted { .. })
    })
    .await
    {
        ServerEvent::GameStarted { game } => {
            assert_eq!(game.drawer_id, v1.id);
            assert_eq!(game.phase, GamePhase::WordSelect);
            assert_eq!(game.total_rounds, 1);
        }
        other => panic!("unexpected: {other:?}"),
    }
    match recv_until(&mut p1, |e| {
        matches!(e, ServerEvent::WordOptions { .. })
    })
    .await
    {
        ServerEvent::WordOptions { options, timeout } => {
            assert_eq!(options.len(), 3);
            assert_eq!(timeout, 15);
        }
        other => panic!("unexpected: {other:?}"),
    }

    send(
        &mut p1,
        &ClientEvent::SelectWord { word: "cat".into() },
    )
    .await;

    // The guesser sees the mask but never the word.
    match recv_until(&mut p2, |e| {
        matches!(e, ServerEvent::DrawingStarted { .. })
    })
    .await
    {
        ServerEvent::DrawingStarted {
            masked_word, word, ..
        } => {
            assert_eq!(masked_word, "_ _ _");
            assert!(word.is_none());
        }
        other => panic!("unexpected: {other:?}"),
    }

    // Guess is case-insensitive and trimmed.
    send(
        &mut p2,
        &ClientEvent::Guess {
            guess: " Cat ".into(),
        },
    )
    .await;
    match recv_until(&mut p2, |e| {
        matches!(e, ServerEvent::CorrectGuess { .. })
    })
    .await
    {
        ServerEvent::CorrectGuess {
            player_id, word, ..
        } => {
            assert_eq!(player_id, v2.id);
            assert_eq!(word, "cat");
        }
        other => panic!("unexpected: {other:?}"),
    }

    // The only guesser guessed: round ends, drawer collects 50.
    match recv_until(&mut p2, |e| {
        matches!(e, ServerEvent::RoundEnded { .. })
    })
    .await
    {
        ServerEvent::RoundEnded { word, leaderboard } => {
            assert_eq!(word, "cat");
            let drawer = leaderboard
                .iter()
                .find(|e| e.player_id == v1.id)
                .unwrap();
            assert_eq!(drawer.score, 50);
            let guesser = leaderboard
                .iter()
                .find(|e| e.player_id == v2.id)
                .unwrap();
            assert!(
                (190..=200).contains(&guesser.score),
                "near-instant guess scores close to 200, got {}",
                guesser.score
            );
        }
        other => panic!("unexpected: {other:?}"),
    }

    // --- After the 3s break: drawer rotates to P2, same round ---
    match recv_until(&mut p2, |e| {
        matches!(e, ServerEvent::WordOptions { .. })
    })
    .await
    {
        ServerEvent::WordOptions { .. } => {}
        other => panic!("unexpected: {other:?}"),
    }
    send(
        &mut p2,
        &ClientEvent::SelectWord { word: "dog".into() },
    )
    .await;

    // P1 is now a guesser; wait for its drawing_started (no word).
    match recv_until(&mut p1, |e| {
        matches!(
            e,
            ServerEvent::DrawingStarted { word: None, .. }
        )
    })
    .await
    {
        ServerEvent::DrawingStarted { masked_word, .. } => {
            assert_eq!(masked_word, "_ _ _")
        }
        other => panic!("unexpected: {other:?}"),
    }
    send(
        &mut p1,
        &ClientEvent::Guess { guess: "dog".into() },
    )
    .await;

    // Last drawer of the only round: the game ends.
    match recv_until(&mut p1, |e| {
        matches!(e, ServerEvent::GameEnded { .. })
    })
    .await
    {
        ServerEvent::GameEnded {
            leaderboard,
            rounds_played,
        } => {
            assert_eq!(rounds_played, 1);
            assert_eq!(leaderboard.len(), 2);
        }
        other => panic!("unexpected: {other:?}"),
    }

    // --- Rematch ---
    send(&mut p1, &ClientEvent::PlayAgain).await;
    match recv_until(&mut p1, |e| {
        matches!(e, ServerEvent::GameReset { .. })
    })
    .await
    {
        ServerEvent::GameReset { room } => {
            assert_eq!(room.status, RoomStatus::Waiting);
            assert!(room.players.iter().all(|p| p.score == 0));
        }
        other => panic!("unexpected: {other:?}"),
    }
}

// =========================================================================
// Drawing and guessing edges
// =========================================================================

/// Gets a two-player room into the drawing phase with the word "cat".
/// Returns both sockets with their streams positioned after
/// `drawing_started`.
async fn drawing_phase(addr: &str) -> (Ws, PlayerView, Ws, PlayerView) {
    let (mut p1, v1) = connect(addr).await;
    let (mut p2, v2) = connect(addr).await;

    let code = create_room(&mut p1, None).await;
    send(&mut p2, &ClientEvent::JoinRoom { room_id: code }).await;
    recv_until(&mut p2, |e| matches!(e, ServerEvent::RoomJoined { .. }))
        .await;

    send(&mut p1, &ClientEvent::StartGame).await;
    recv_until(&mut p1, |e| matches!(e, ServerEvent::WordOptions { .. }))
        .await;
    send(
        &mut p1,
        &ClientEvent::SelectWord { word: "cat".into() },
    )
    .await;
    recv_until(&mut p1, |e| {
        matches!(e, ServerEvent::DrawingStarted { .. })
    })
    .await;
    recv_until(&mut p2, |e| {
        matches!(e, ServerEvent::DrawingStarted { .. })
    })
    .await;

    (p1, v1, p2, v2)
}

#[tokio::test]
async fn test_non_drawer_draw_move_is_rejected() {
    let addr = start().await;
    let (_p1, _v1, mut p2, _v2) = drawing_phase(&addr).await;

    send(
        &mut p2,
        &ClientEvent::DrawMove {
            payload: serde_json::json!({"x": 3, "y": 4}),
        },
    )
    .await;
    match recv_until(&mut p2, |e| {
        matches!(e, ServerEvent::GameError { .. })
    })
    .await
    {
        ServerEvent::GameError { error, code } => {
            assert_eq!(error, "Only drawer can draw");
            assert_eq!(code, "not_drawer");
        }
        other => panic!("unexpected: {other:?}"),
    }
}

#[tokio::test]
async fn test_drawer_strokes_reach_guesser() {
    let addr = start().await;
    let (mut p1, _v1, mut p2, _v2) = drawing_phase(&addr).await;

    send(
        &mut p1,
        &ClientEvent::DrawStart {
            payload: serde_json::json!({"x": 0, "y": 0, "color": "#1a2b3c"}),
        },
    )
    .await;
    send(
        &mut p1,
        &ClientEvent::DrawMove {
            payload: serde_json::json!({"x": 5, "y": 5}),
        },
    )
    .await;

    match recv_until(&mut p2, |e| {
        matches!(e, ServerEvent::DrawStart { .. })
    })
    .await
    {
        ServerEvent::DrawStart { payload } => {
            assert_eq!(payload["color"], "#1a2b3c")
        }
        other => panic!("unexpected: {other:?}"),
    }
    match recv_until(&mut p2, |e| {
        matches!(e, ServerEvent::DrawMove { .. })
    })
    .await
    {
        ServerEvent::DrawMove { moves } => {
            assert_eq!(moves.len(), 1);
            assert_eq!(moves[0]["x"], 5);
        }
        other => panic!("unexpected: {other:?}"),
    }
}

#[tokio::test]
async fn test_wrong_guess_broadcast_as_masked_chat() {
    let addr = start().await;
    let (mut p1, _v1, mut p2, v2) = drawing_phase(&addr).await;

    send(
        &mut p2,
        &ClientEvent::Guess {
            guess: "zebra".into(),
        },
    )
    .await;

    // Both members see the masked chat line; no score changes.
    for ws in [&mut p1, &mut p2] {
        match recv_until(ws, |e| {
            matches!(e, ServerEvent::ChatMessage { .. })
        })
        .await
        {
            ServerEvent::ChatMessage {
                player_id,
                message,
                is_correct,
                ..
            } => {
                assert_eq!(player_id, v2.id);
                assert_eq!(message, "*****");
                assert!(!is_correct);
            }
            other => panic!("unexpected: {other:?}"),
        }
    }
}

#[tokio::test]
async fn test_guesser_disconnect_ends_two_player_game() {
    let addr = start().await;
    let (mut p1, _v1, p2, _v2) = drawing_phase(&addr).await;

    drop(p2);

    match recv_until(&mut p1, |e| {
        matches!(e, ServerEvent::GameEnded { .. })
    })
    .await
    {
        ServerEvent::GameEnded { rounds_played, .. } => {
            assert_eq!(rounds_played, 1)
        }
        other => panic!("unexpected: {other:?}"),
    }
}
