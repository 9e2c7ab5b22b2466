//! Auth session management for Gabarita.
//!
//! This crate owns the lifecycle of a signed-in user:
//!
//! 1. **Hydration**: restoring a session from durable storage at startup
//!    ([`AuthSession::hydrate`], [`AuthSession::restore`]).
//! 2. **Credentials**: login, signup and logout against the backend.
//! 3. **Observation**: the current [`AuthState`] as a snapshot or a
//!    `watch` stream for pages that re-render on change.
//!
//! # How it fits in the stack
//!
//! ```text
//! App / pages (above)  ← subscribe to AuthState, call login/logout
//!     ↕
//! Session Layer (this crate)  ← in-memory user + persisted token set
//!     ↕
//! Client + Store (below)  ← backend calls, durable keys
//! ```

mod auth;
mod error;
mod state;

pub use auth::{AuthSession, dev_user};
pub use error::SessionError;
pub use state::{AuthState, SessionConfig};
