//! Durable storage for Gabarita.
//!
//! This crate owns everything that must survive a restart:
//!
//! 1. **Raw storage**: the [`KeyValueStore`] trait with an in-memory
//!    ([`MemoryStore`]) and a file-backed ([`FileStore`]) implementation.
//! 2. **Session view**: [`SessionStorage`], a typed wrapper over the three
//!    keys the auth flow uses (`user`, `authToken`, `refreshToken`).
//!
//! # How it fits in the stack
//!
//! ```text
//! Client / Session layers (above)  ← read tokens, persist logins
//!     ↕
//! Store Layer (this crate)  ← key-value persistence + typed session keys
//!     ↕
//! Protocol Layer (below)  ← provides User and the JSON codec
//! ```

mod error;
mod file;
mod memory;
mod session;

pub use error::StoreError;
pub use file::FileStore;
pub use memory::MemoryStore;
pub use session::{SessionStorage, ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, USER_KEY};

/// A string-to-string store that outlives the process (or at least the
/// session, for [`MemoryStore`]).
///
/// # Trait bounds
///
/// - `Send + Sync` → the store is shared by the client and the session
///   service, which may run on different Tokio worker threads.
///
/// Methods are synchronous: every implementation is either a map lookup
/// or a small file write, and callers hold no locks across `.await`.
pub trait KeyValueStore: Send + Sync {
    /// Returns the value stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Removes `key`. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<(), StoreError>;

    /// Writes several entries as one operation.
    ///
    /// Implementations must apply all entries or none of them.
    fn set_many(&self, entries: &[(&str, &str)]) -> Result<(), StoreError>;

    /// Removes several keys as one operation.
    fn remove_all(&self, keys: &[&str]) -> Result<(), StoreError>;
}
