//! Routing hook into the host application.
//!
//! The client never renders anything. When a session expires it asks the
//! host to show the login screen through this trait, and the host decides
//! what "navigate" means (a browser redirect, a TUI screen swap, a no-op
//! in tests).

/// The host's router, as seen by the client.
///
/// # Trait bounds
///
/// - `Send + Sync` → the client calls it from whichever task observed the
///   expired session.
pub trait Navigator: Send + Sync {
    /// The route currently shown, if the host tracks one.
    fn current_route(&self) -> Option<String>;

    /// Shows `route`.
    fn navigate(&self, route: &str);
}
