//! Room actor: an isolated Tokio task that owns one room.
//!
//! Each room runs in its own task, communicating with connection handlers
//! through an mpsc channel. This gives the per-room serialization contract
//! for free: every mutation — inbound client event, countdown tick, batch
//! flush — happens on the actor's single loop, in arrival order. The actor
//! is the room-scoped half of the event router: it invokes engine
//! operations and composes the resulting broadcasts.

use std::collections::HashMap;
use std::time::Instant;

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

use scrawl_engine::{
    GuessOutcome, LeaveGameEffect, Progress, Room,
};
use scrawl_protocol::{
    ClientEvent, PlayerId, Recipient, RoomCode, RoomView, ServerEvent,
};
use scrawl_timer::{
    Countdown, CountdownEvent, TimerKind, ROUND_BREAK_SECS,
    WORD_SELECTION_SECS,
};

/// Channel sender for delivering outbound events to one player's
/// connection writer.
pub type PlayerSender = mpsc::UnboundedSender<ServerEvent>;

/// Default command channel size for room actors.
const DEFAULT_CHANNEL_SIZE: usize = 64;

/// Commands sent to a room actor through its channel.
pub(crate) enum RoomCommand {
    /// Add a player to the room.
    Join {
        player: PlayerId,
        name: String,
        sender: PlayerSender,
        reply: oneshot::Sender<Result<RoomView, scrawl_engine::EngineError>>,
    },

    /// Remove a player (leave request or disconnect).
    Leave {
        player: PlayerId,
        reply: oneshot::Sender<LeaveReply>,
    },

    /// A member's display name changed.
    Rename { player: PlayerId, name: String },

    /// A game-scoped client event from a member.
    Client { player: PlayerId, event: ClientEvent },

    /// Request the current room serialization.
    View { reply: oneshot::Sender<RoomView> },

    /// Shut down the room.
    Shutdown,
}

/// Reply to a leave command.
#[derive(Debug, Clone, Copy)]
pub struct LeaveReply {
    /// False when the player was not a member.
    pub was_member: bool,
    /// True when the room is now empty and should be destroyed.
    pub empty: bool,
}

/// Handle to a running room actor. Cheap to clone.
#[derive(Clone)]
pub struct RoomHandle {
    code: RoomCode,
    sender: mpsc::Sender<RoomCommand>,
}

impl RoomHandle {
    pub fn code(&self) -> &RoomCode {
        &self.code
    }

    /// Sends a join request and waits for the room's decision.
    pub async fn join(
        &self,
        player: PlayerId,
        name: String,
        sender: PlayerSender,
    ) -> Result<RoomView, crate::RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(RoomCommand::Join {
                player,
                name,
                sender,
                reply: reply_tx,
            })
            .await
            .map_err(|_| crate::RoomError::Unavailable(self.code.clone()))?;
        reply_rx
            .await
            .map_err(|_| crate::RoomError::Unavailable(self.code.clone()))?
            .map_err(crate::RoomError::Engine)
    }

    /// Sends a leave request.
    pub async fn leave(
        &self,
        player: PlayerId,
    ) -> Result<LeaveReply, crate::RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(RoomCommand::Leave {
                player,
                reply: reply_tx,
            })
            .await
            .map_err(|_| crate::RoomError::Unavailable(self.code.clone()))?;
        reply_rx
            .await
            .map_err(|_| crate::RoomError::Unavailable(self.code.clone()))
    }

    /// Propagates a validated rename into the room (fire-and-forget).
    pub async fn rename(
        &self,
        player: PlayerId,
        name: String,
    ) -> Result<(), crate::RoomError> {
        self.sender
            .send(RoomCommand::Rename { player, name })
            .await
            .map_err(|_| crate::RoomError::Unavailable(self.code.clone()))
    }

    /// Routes a game-scoped client event to the room (fire-and-forget).
    pub async fn client(
        &self,
        player: PlayerId,
        event: ClientEvent,
    ) -> Result<(), crate::RoomError> {
        self.sender
            .send(RoomCommand::Client { player, event })
            .await
            .map_err(|_| crate::RoomError::Unavailable(self.code.clone()))
    }

    /// Requests the current room serialization.
    pub async fn view(&self) -> Result<RoomView, crate::RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(RoomCommand::View { reply: reply_tx })
            .await
            .map_err(|_| crate::RoomError::Unavailable(self.code.clone()))?;
        reply_rx
            .await
            .map_err(|_| crate::RoomError::Unavailable(self.code.clone()))
    }

    /// Tells the room to shut down.
    pub async fn shutdown(&self) -> Result<(), crate::RoomError> {
        self.sender
            .send(RoomCommand::Shutdown)
            .await
            .map_err(|_| crate::RoomError::Unavailable(self.code.clone()))
    }
}

/// Spawns a room actor for an already-constructed room and returns its
/// handle. The owner's outbound channel is registered immediately.
pub fn spawn_room(
    room: Room,
    owner: PlayerId,
    owner_sender: PlayerSender,
) -> RoomHandle {
    let (tx, rx) = mpsc::channel(DEFAULT_CHANNEL_SIZE);
    let code = room.code().clone();

    let mut senders = HashMap::new();
    senders.insert(owner, owner_sender);

    let actor = RoomActor {
        room,
        senders,
        countdown: Countdown::new(),
        relay: scrawl_engine::DrawRelay::new(),
        receiver: rx,
    };
    tokio::spawn(actor.run());

    RoomHandle { code, sender: tx }
}

// ---------------------------------------------------------------------------
// The actor
// ---------------------------------------------------------------------------

struct RoomActor {
    room: Room,
    /// Per-member outbound channels.
    senders: HashMap<PlayerId, PlayerSender>,
    countdown: Countdown,
    relay: scrawl_engine::DrawRelay,
    receiver: mpsc::Receiver<RoomCommand>,
}

/// Sleeps until the relay's batch deadline; pends forever when no batch is
/// buffered so `select!` simply services the other branches.
async fn batch_flush_due(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => {
            tokio::time::sleep_until(tokio::time::Instant::from_std(deadline))
                .await
        }
        None => std::future::pending().await,
    }
}

impl RoomActor {
    async fn run(mut self) {
        info!(room = %self.room.code(), "room actor started");

        loop {
            tokio::select! {
                cmd = self.receiver.recv() => match cmd {
                    Some(cmd) => {
                        if self.handle_command(cmd) {
                            break;
                        }
                    }
                    None => break,
                },
                event = self.countdown.wait() => self.handle_countdown(event),
                _ = batch_flush_due(self.relay.flush_deadline()) => {
                    self.flush_moves();
                }
            }
        }

        info!(room = %self.room.code(), "room actor stopped");
    }

    /// Processes one command; returns `true` on shutdown.
    fn handle_command(&mut self, cmd: RoomCommand) -> bool {
        match cmd {
            RoomCommand::Join {
                player,
                name,
                sender,
                reply,
            } => match self.room.join(player, name) {
                Ok(()) => {
                    self.senders.insert(player, sender);
                    info!(
                        room = %self.room.code(),
                        %player,
                        members = self.room.members().len(),
                        "player joined"
                    );
                    // Broadcast before resolving the reply so the joiner
                    // sees `room_updated` ahead of their `room_joined`.
                    self.broadcast(ServerEvent::RoomUpdated {
                        room: self.room.view(),
                    });
                    let _ = reply.send(Ok(self.room.view()));
                }
                Err(e) => {
                    let _ = reply.send(Err(e));
                }
            },
            RoomCommand::Leave { player, reply } => {
                let result = self.handle_leave(player);
                let _ = reply.send(result);
            }
            RoomCommand::Rename { player, name } => {
                if self.room.rename(player, name) {
                    self.broadcast(ServerEvent::RoomUpdated {
                        room: self.room.view(),
                    });
                }
            }
            RoomCommand::Client { player, event } => {
                if !self.room.is_member(player) {
                    debug!(
                        room = %self.room.code(),
                        %player,
                        "event from non-member, ignoring"
                    );
                    return false;
                }
                self.handle_client(player, event);
            }
            RoomCommand::View { reply } => {
                let _ = reply.send(self.room.view());
            }
            RoomCommand::Shutdown => {
                debug!(room = %self.room.code(), "room shutting down");
                self.countdown.clear();
                return true;
            }
        }
        false
    }

    // -----------------------------------------------------------------
    // Membership
    // -----------------------------------------------------------------

    fn handle_leave(&mut self, player: PlayerId) -> LeaveReply {
        let Some(departure) = self.room.leave(player) else {
            return LeaveReply {
                was_member: false,
                empty: false,
            };
        };
        self.senders.remove(&player);
        info!(
            room = %self.room.code(),
            %player,
            members = self.room.members().len(),
            "player left"
        );

        if departure.empty {
            self.countdown.clear();
            self.relay.reset();
            return LeaveReply {
                was_member: true,
                empty: true,
            };
        }

        self.broadcast(ServerEvent::RoomUpdated {
            room: self.room.view(),
        });

        match departure.effect {
            Some(LeaveGameEffect::GameBelowMinimum) => {
                self.relay.reset();
                self.finish_game();
            }
            Some(LeaveGameEffect::RoundAborted { revealed }) => {
                self.countdown.clear();
                self.relay.reset();
                match revealed {
                    // The round died mid-drawing: reveal the word and give
                    // the usual breather before the next drawer.
                    Some(word) => {
                        self.broadcast(ServerEvent::RoundEnded {
                            word,
                            leaderboard: self.room.leaderboard(),
                        });
                        self.countdown
                            .arm(TimerKind::RoundBreak, ROUND_BREAK_SECS);
                    }
                    // Nothing was drawn yet; hand over immediately.
                    None => self.advance_rotation(),
                }
            }
            Some(LeaveGameEffect::RoundComplete) => self.finish_round(),
            None => {}
        }

        LeaveReply {
            was_member: true,
            empty: false,
        }
    }

    // -----------------------------------------------------------------
    // Client events
    // -----------------------------------------------------------------

    fn handle_client(&mut self, player: PlayerId, event: ClientEvent) {
        match event {
            ClientEvent::UpdateRoomSettings { settings } => {
                match self.room.update_settings(player, &settings) {
                    Ok(settings) => {
                        let settings = settings.clone();
                        self.broadcast(ServerEvent::RoomSettingsUpdated {
                            settings,
                        });
                    }
                    Err(e) => self.direct(
                        player,
                        ServerEvent::RoomSettingsError {
                            code: e.code().into(),
                            error: e.to_string(),
                        },
                    ),
                }
            }

            ClientEvent::StartGame => match self.room.start_game(player) {
                Ok(()) => {
                    info!(room = %self.room.code(), "game started");
                    if let Some(game) = self.room.game_view() {
                        self.broadcast(ServerEvent::GameStarted { game });
                    }
                    self.begin_word_selection();
                }
                Err(e) => self.game_error(player, e),
            },

            ClientEvent::SelectWord { word } => {
                match self.room.select_word(player, &word, Instant::now()) {
                    Ok(masked) => self.enter_drawing(masked, false),
                    Err(e) => self.game_error(player, e),
                }
            }

            ClientEvent::DrawStart { payload } => {
                self.relay_stroke(player, |p| ServerEvent::DrawStart {
                    payload: p,
                }, payload);
            }
            ClientEvent::DrawEnd { payload } => {
                self.relay_stroke(player, |p| ServerEvent::DrawEnd {
                    payload: p,
                }, payload);
            }
            ClientEvent::ClearCanvas => {
                self.relay_stroke(
                    player,
                    |_| ServerEvent::ClearCanvas,
                    serde_json::Value::Null,
                );
            }

            ClientEvent::DrawMove { payload } => {
                if let Err(e) = self.room.check_drawer(player) {
                    self.game_error(player, e);
                    return;
                }
                if let Some(moves) =
                    self.relay.accept_move(payload, Instant::now())
                {
                    self.fan_out_moves(moves);
                }
            }

            ClientEvent::Guess { guess } => {
                self.handle_guess(player, &guess);
            }

            ClientEvent::PlayAgain => match self.room.reset_game(player) {
                Ok(()) => {
                    info!(room = %self.room.code(), "game reset for rematch");
                    self.countdown.clear();
                    self.relay.reset();
                    self.broadcast(ServerEvent::GameReset {
                        room: self.room.view(),
                    });
                }
                Err(e) => self.game_error(player, e),
            },

            // Lobby-scoped events are handled before the actor; seeing one
            // here is a routing bug worth logging, not acting on.
            other => {
                debug!(
                    room = %self.room.code(),
                    %player,
                    ?other,
                    "unexpected lobby event in room actor"
                );
            }
        }
    }

    fn handle_guess(&mut self, player: PlayerId, guess: &str) {
        let name = self
            .room
            .members()
            .iter()
            .find(|m| m.id == player)
            .map(|m| m.name.clone())
            .unwrap_or_default();

        match self.room.submit_guess(player, guess, Instant::now()) {
            Ok(GuessOutcome::Correct {
                award,
                word,
                all_guessed,
            }) => {
                debug!(
                    room = %self.room.code(),
                    %player,
                    award,
                    "correct guess"
                );
                self.broadcast(ServerEvent::CorrectGuess {
                    player_id: player,
                    name,
                    word,
                });
                self.broadcast(ServerEvent::LeaderboardUpdate {
                    leaderboard: self.room.leaderboard(),
                });
                if all_guessed {
                    self.finish_round();
                }
            }
            Ok(GuessOutcome::Incorrect { masked }) => {
                self.broadcast(ServerEvent::ChatMessage {
                    player_id: player,
                    name,
                    message: masked,
                    is_correct: false,
                });
            }
            Err(e) => self.game_error(player, e),
        }
    }

    /// Validates and fans out a non-batched stroke event (`draw_start`,
    /// `draw_end`, `clear_canvas`), flushing any pending move batch first
    /// so ordering is preserved.
    fn relay_stroke(
        &mut self,
        player: PlayerId,
        make_event: impl FnOnce(serde_json::Value) -> ServerEvent,
        payload: serde_json::Value,
    ) {
        if let Err(e) = self.room.check_drawer(player) {
            self.game_error(player, e);
            return;
        }
        if let Some(moves) = self.relay.interrupt(Instant::now()) {
            self.fan_out_moves(moves);
        }
        self.broadcast_except(player, make_event(payload));
    }

    /// Sends a move batch to everyone but the drawer.
    fn fan_out_moves(&self, moves: Vec<serde_json::Value>) {
        if let Some(game) = self.room.game() {
            self.broadcast_except(
                game.drawer_id(),
                ServerEvent::DrawMove { moves },
            );
        }
    }

    fn flush_moves(&mut self) {
        if let Some(moves) = self.relay.flush_due(Instant::now()) {
            self.fan_out_moves(moves);
        }
    }

    // -----------------------------------------------------------------
    // Countdown events
    // -----------------------------------------------------------------

    fn handle_countdown(&mut self, event: CountdownEvent) {
        match event {
            CountdownEvent::Tick { kind, remaining } => match kind {
                TimerKind::WordSelection | TimerKind::Drawing => {
                    self.broadcast(ServerEvent::TimerTick {
                        remaining,
                        kind: kind.label().into(),
                    });
                }
                // The inter-round breather is silent.
                TimerKind::RoundBreak => {}
            },
            CountdownEvent::Expired { kind } => match kind {
                TimerKind::WordSelection => self.auto_select(),
                TimerKind::Drawing => self.finish_round(),
                TimerKind::RoundBreak => self.advance_rotation(),
            },
        }
    }

    /// Word-selection window elapsed: pick for the drawer.
    fn auto_select(&mut self) {
        match self
            .room
            .auto_select_word(&mut rand::rng(), Instant::now())
        {
            Ok(masked) => self.enter_drawing(masked, true),
            Err(e) => warn!(
                room = %self.room.code(),
                error = %e,
                "auto-select fired outside word selection"
            ),
        }
    }

    // -----------------------------------------------------------------
    // Round flow
    // -----------------------------------------------------------------

    /// Announces the round and offers the drawer its word options.
    fn begin_word_selection(&mut self) {
        let Some(game) = self.room.game_view() else {
            return;
        };
        let drawer = game.drawer_id;
        self.broadcast(ServerEvent::RoundStarted { game });

        match self.room.word_options(&mut rand::rng()) {
            Ok(options) => self.direct(
                drawer,
                ServerEvent::WordOptions {
                    options,
                    timeout: WORD_SELECTION_SECS,
                },
            ),
            Err(e) => warn!(
                room = %self.room.code(),
                error = %e,
                "word options unavailable"
            ),
        }
        self.countdown
            .arm(TimerKind::WordSelection, WORD_SELECTION_SECS);
    }

    /// A word is set and the room is in the drawing phase: broadcast the
    /// selection, send the drawer its word, start the clock.
    fn enter_drawing(&mut self, masked: String, auto_selected: bool) {
        let Some(game) = self.room.game() else {
            return;
        };
        let drawer = game.drawer_id();
        let duration = self.room.settings().draw_time;

        self.broadcast(ServerEvent::WordSelected {
            masked_word: masked.clone(),
            auto_selected,
        });
        self.direct(
            drawer,
            ServerEvent::DrawingStarted {
                masked_word: masked.clone(),
                word: self.room.drawer_word(),
                duration,
            },
        );
        self.broadcast_except(
            drawer,
            ServerEvent::DrawingStarted {
                masked_word: masked,
                word: None,
                duration,
            },
        );

        self.relay.reset();
        self.countdown.arm(TimerKind::Drawing, duration);
    }

    /// Ends the drawing phase: reveal, drawer award, then either the
    /// inter-round break or the end of the game.
    fn finish_round(&mut self) {
        self.countdown.clear();
        self.relay.reset();

        match self.room.end_round() {
            Ok(summary) => {
                self.broadcast(ServerEvent::RoundEnded {
                    word: summary.word,
                    leaderboard: self.room.leaderboard(),
                });
                if summary.game_ended {
                    self.finish_game();
                } else {
                    self.countdown
                        .arm(TimerKind::RoundBreak, ROUND_BREAK_SECS);
                }
            }
            // A stale expiry racing a completed round is not a fault; the
            // room stays in its current phase.
            Err(e) => debug!(
                room = %self.room.code(),
                error = %e,
                "round end skipped"
            ),
        }
    }

    /// Moves to the next drawer after the break (or immediately after an
    /// aborted word selection).
    fn advance_rotation(&mut self) {
        match self.room.progress_round() {
            Ok(Progress::NextRound {
                round_incremented,
                drawer,
            }) => {
                debug!(
                    room = %self.room.code(),
                    %drawer,
                    round_incremented,
                    "next drawer"
                );
                self.begin_word_selection();
            }
            Ok(Progress::GameOver) => self.finish_game(),
            Err(e) => debug!(
                room = %self.room.code(),
                error = %e,
                "rotation skipped"
            ),
        }
    }

    fn finish_game(&mut self) {
        self.countdown.clear();
        match self.room.end_game() {
            Ok(rounds_played) => {
                info!(
                    room = %self.room.code(),
                    rounds_played,
                    "game ended"
                );
                self.broadcast(ServerEvent::GameEnded {
                    leaderboard: self.room.leaderboard(),
                    rounds_played,
                });
            }
            Err(e) => warn!(
                room = %self.room.code(),
                error = %e,
                "game end without a running game"
            ),
        }
    }

    // -----------------------------------------------------------------
    // Dispatch
    // -----------------------------------------------------------------

    fn game_error(&self, player: PlayerId, e: scrawl_engine::EngineError) {
        self.direct(
            player,
            ServerEvent::GameError {
                code: e.code().into(),
                error: e.to_string(),
            },
        );
    }

    /// Delivers an event to the addressed members.
    fn dispatch(&self, recipient: Recipient, event: ServerEvent) {
        match recipient {
            Recipient::All => {
                for member in self.room.members() {
                    self.send_to(member.id, event.clone());
                }
            }
            Recipient::Player(player) => self.send_to(player, event),
            Recipient::AllExcept(excluded) => {
                for member in self.room.members() {
                    if member.id != excluded {
                        self.send_to(member.id, event.clone());
                    }
                }
            }
        }
    }

    fn broadcast(&self, event: ServerEvent) {
        self.dispatch(Recipient::All, event);
    }

    fn broadcast_except(&self, excluded: PlayerId, event: ServerEvent) {
        self.dispatch(Recipient::AllExcept(excluded), event);
    }

    fn direct(&self, player: PlayerId, event: ServerEvent) {
        self.dispatch(Recipient::Player(player), event);
    }

    /// Delivers to a member's writer channel. Silently drops when the
    /// receiver is gone (connection already closed).
    fn send_to(&self, player: PlayerId, event: ServerEvent) {
        if let Some(sender) = self.senders.get(&player) {
            let _ = sender.send(event);
        }
    }
}
