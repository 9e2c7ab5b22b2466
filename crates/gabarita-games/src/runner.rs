//! Game actor: an isolated Tokio task that owns one game and its clock.
//!
//! The actor is the only place a game is mutated. Commands arrive over
//! an mpsc channel and answers go back on oneshot reply channels. Ticks
//! come from a [`TickScheduler`] in the same `select!` loop, so actions
//! and time never race.

use std::fmt;

use gabarita_tick::{ClockConfig, TickInfo, TickScheduler};
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, oneshot};

use crate::{Game, GameError};

/// A message from the actor to whoever renders the game.
#[derive(Debug)]
pub enum GameOutbound<G: Game> {
    /// The full game view after a change.
    Snapshot(G::Snapshot),
    /// One thing that happened, in order.
    Event(G::Event),
}

impl<G: Game> Clone for GameOutbound<G> {
    fn clone(&self) -> Self {
        match self {
            Self::Snapshot(s) => Self::Snapshot(s.clone()),
            Self::Event(e) => Self::Event(e.clone()),
        }
    }
}

/// Channel sender for pushing outbound messages to the UI.
pub type GameSender<G> = mpsc::UnboundedSender<GameOutbound<G>>;

/// Commands sent to a game actor through its channel.
pub(crate) enum GameCommand<G: Game> {
    /// Apply a player action.
    Act {
        action: G::Action,
        reply: oneshot::Sender<Result<Vec<G::Event>, GameError>>,
    },

    /// Start over with fresh data.
    Reset { reply: oneshot::Sender<G::Snapshot> },

    /// Read the current view.
    Snapshot { reply: oneshot::Sender<G::Snapshot> },

    /// Stop the actor.
    Shutdown,
}

/// Runner settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameRunnerConfig {
    /// Command channel capacity. Senders wait when it is full.
    pub channel_size: usize,
    pub clock: ClockConfig,
}

impl Default for GameRunnerConfig {
    fn default() -> Self {
        Self {
            channel_size: 32,
            clock: ClockConfig::default(),
        }
    }
}

/// Handle to a running game actor.
///
/// Cheap to clone. Every method fails with [`GameError::Unavailable`]
/// once the actor has stopped.
pub struct GameHandle<G: Game> {
    sender: mpsc::Sender<GameCommand<G>>,
}

impl<G: Game> Clone for GameHandle<G> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl<G: Game> fmt::Debug for GameHandle<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GameHandle")
            .field("closed", &self.sender.is_closed())
            .finish()
    }
}

impl<G: Game> GameHandle<G> {
    /// Applies a player action and returns the events it produced.
    pub async fn act(&self, action: G::Action) -> Result<Vec<G::Event>, GameError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(GameCommand::Act {
                action,
                reply: reply_tx,
            })
            .await
            .map_err(|_| GameError::Unavailable)?;
        reply_rx.await.map_err(|_| GameError::Unavailable)?
    }

    /// Resets the game and returns the fresh view.
    pub async fn reset(&self) -> Result<G::Snapshot, GameError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(GameCommand::Reset { reply: reply_tx })
            .await
            .map_err(|_| GameError::Unavailable)?;
        reply_rx.await.map_err(|_| GameError::Unavailable)
    }

    pub async fn snapshot(&self) -> Result<G::Snapshot, GameError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(GameCommand::Snapshot { reply: reply_tx })
            .await
            .map_err(|_| GameError::Unavailable)?;
        reply_rx.await.map_err(|_| GameError::Unavailable)
    }

    /// Tells the actor to stop. Pending commands ahead of it still run.
    pub async fn shutdown(&self) -> Result<(), GameError> {
        self.sender
            .send(GameCommand::Shutdown)
            .await
            .map_err(|_| GameError::Unavailable)
    }

    /// Returns `true` once the actor has stopped.
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

/// The internal actor state. Runs inside a Tokio task.
struct GameActor<G: Game> {
    game: G,
    rng: StdRng,
    clock: TickScheduler,
    subscriber: Option<GameSender<G>>,
    receiver: mpsc::Receiver<GameCommand<G>>,
}

impl<G: Game> GameActor<G> {
    async fn run(mut self) {
        let name = self.game.name();
        tracing::info!(game = name, status = %self.game.status(), "game actor started");
        self.sync_clock();
        self.publish_snapshot();

        loop {
            tokio::select! {
                cmd = self.receiver.recv() => {
                    let Some(cmd) = cmd else { break };
                    if !self.handle(cmd) {
                        break;
                    }
                }
                tick = self.clock.wait_for_tick() => {
                    self.on_tick(tick);
                }
            }
        }

        tracing::info!(game = name, status = %self.game.status(), "game actor stopped");
    }

    /// Handles one command. Returns `false` when the actor should stop.
    fn handle(&mut self, cmd: GameCommand<G>) -> bool {
        match cmd {
            GameCommand::Act { action, reply } => {
                let result = self.game.apply(action);
                match &result {
                    Ok(events) if !events.is_empty() => {
                        self.publish(events);
                        self.sync_clock();
                    }
                    Ok(_) => {}
                    Err(e) => {
                        tracing::debug!(game = self.game.name(), error = %e, "action rejected");
                    }
                }
                let _ = reply.send(result);
            }
            GameCommand::Reset { reply } => {
                self.game.reset(&mut self.rng);
                self.clock.reset();
                self.sync_clock();
                tracing::info!(game = self.game.name(), "game reset");
                let snapshot = self.game.snapshot();
                self.send(GameOutbound::Snapshot(snapshot.clone()));
                let _ = reply.send(snapshot);
            }
            GameCommand::Snapshot { reply } => {
                let _ = reply.send(self.game.snapshot());
            }
            GameCommand::Shutdown => {
                tracing::info!(game = self.game.name(), "game shutting down");
                return false;
            }
        }
        true
    }

    fn on_tick(&mut self, tick: TickInfo) {
        let dt = tick.dt * (tick.ticks_skipped as u32 + 1);
        let events = self.game.tick(dt);
        // The timer is part of every view, so each tick republishes it.
        self.publish(&events);
        self.sync_clock();
    }

    /// Pauses the clock while the game does not need time.
    fn sync_clock(&mut self) {
        if self.game.clock_running() {
            self.clock.resume();
        } else {
            self.clock.pause();
        }
    }

    fn publish(&self, events: &[G::Event]) {
        for event in events {
            self.send(GameOutbound::Event(event.clone()));
        }
        self.publish_snapshot();
    }

    fn publish_snapshot(&self) {
        self.send(GameOutbound::Snapshot(self.game.snapshot()));
    }

    /// Silently drops the message if nobody is listening.
    fn send(&self, msg: GameOutbound<G>) {
        if let Some(subscriber) = &self.subscriber {
            let _ = subscriber.send(msg);
        }
    }
}

/// Spawns a game actor and returns a handle to it.
///
/// A game still in `Setup` is reset first, using `rng`, so the handle
/// always controls a playable game. Every later reset draws from the
/// same generator: seed it to replay a session exactly.
pub fn spawn_game<G: Game>(
    mut game: G,
    config: GameRunnerConfig,
    mut rng: StdRng,
    subscriber: Option<GameSender<G>>,
) -> GameHandle<G> {
    let (tx, rx) = mpsc::channel(config.channel_size.max(1));

    if game.status() == crate::GameStatus::Setup {
        game.reset(&mut rng);
    }

    let actor = GameActor {
        game,
        rng,
        clock: TickScheduler::new(config.clock),
        subscriber,
        receiver: rx,
    };

    tokio::spawn(actor.run());

    GameHandle { sender: tx }
}
