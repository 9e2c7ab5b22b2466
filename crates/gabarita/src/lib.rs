//! # Gabarita
//!
//! Client core for the Gabarita exam-prep platform.
//!
//! An application builds one [`App`] at startup. It wires storage, the
//! backend client and the auth session together, restores any saved
//! session, and runs study games as actors until [`App::shutdown`].
//!
//! # How it fits in the stack
//!
//! ```text
//! ┌────────────────────────────────────────────┐
//! │  gabarita (this crate)                     │  App, AppConfig, tracing
//! ├─────────────────────┬──────────────────────┤
//! │  gabarita-session   │  gabarita-games      │  auth state / game actors
//! ├─────────────────────┼──────────────────────┤
//! │  gabarita-client    │  gabarita-tick       │  API calls + refresh / clock
//! ├─────────────────────┴──────────────────────┤
//! │  gabarita-store  ·  gabarita-protocol      │  session storage / wire types
//! ├────────────────────────────────────────────┤
//! │  gabarita-transport                        │  HTTP + cancellation
//! └────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use gabarita::prelude::*;
//!
//! # async fn run() -> Result<(), GabaritaError> {
//! let config = AppConfig::from_env()?;
//! init_tracing(&config.log);
//!
//! let app = App::init(config).await?;
//! let hangman = app.spawn_game(Hangman::new(), None)?;
//! hangman.act(HangmanAction::Guess('A')).await?;
//!
//! app.shutdown().await;
//! # Ok(())
//! # }
//! ```

mod app;
mod config;
mod error;
mod route;
mod telemetry;

pub use app::App;
pub use config::{
    AppConfig, ENV_API_BASE_URL, ENV_BYPASS_AUTH, ENV_GAME_SEED, ENV_LOG, ENV_STORAGE_PATH,
};
pub use error::GabaritaError;
pub use route::RouteTracker;
pub use telemetry::init_tracing;

pub use gabarita_client as client;
pub use gabarita_games as games;
pub use gabarita_protocol as protocol;
pub use gabarita_session as session;
pub use gabarita_store as store;
pub use gabarita_tick as tick;
pub use gabarita_transport as transport;

pub mod prelude {
    pub use crate::{App, AppConfig, GabaritaError, RouteTracker, init_tracing};

    pub use gabarita_client::{ApiClient, ClientConfig, ClientError, Navigator};
    pub use gabarita_games::{
        Crossword, CrosswordAction, Game, GameError, GameHandle, GameOutbound, GameRunnerConfig,
        GameStatus, Hangman, HangmanAction, Memory, MemoryAction, MockExam, MockExamAction, Quiz,
        QuizAction, Roulette, RouletteAction,
    };
    pub use gabarita_protocol::{SignupRequest, User, UserPatch};
    pub use gabarita_session::{AuthSession, AuthState, SessionConfig, SessionError};
    pub use gabarita_store::{FileStore, KeyValueStore, MemoryStore, SessionStorage};
    pub use gabarita_tick::ClockConfig;
    pub use gabarita_transport::{CancelToken, HttpTransport};
}
