//! Session state and configuration.

use gabarita_protocol::User;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// SessionConfig
// ---------------------------------------------------------------------------

/// Configuration for [`AuthSession`](crate::AuthSession).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Skip real authentication and sign in a fixed development user
    /// whenever no stored session is found. Never enable in production.
    pub bypass_auth: bool,
}

// ---------------------------------------------------------------------------
// AuthState
// ---------------------------------------------------------------------------

/// Who is signed in, as far as this process knows.
///
/// ```text
///   Loading ──(hydrate / restore)──→ Authenticated(user)
///      │                                  │      ↑
///      └──────────→ Anonymous ←──(logout)─┘      │
///                       └────(login / signup)────┘
/// ```
///
/// `Loading` only exists between construction and the end of startup
/// hydration. In-flight login/logout calls do not change the state; they
/// are reported by [`AuthSession::is_loading`](crate::AuthSession::is_loading).
#[derive(Debug, Clone, PartialEq)]
pub enum AuthState {
    Loading,
    Anonymous,
    Authenticated(User),
}

impl AuthState {
    pub fn user(&self) -> Option<&User> {
        match self {
            Self::Authenticated(user) => Some(user),
            _ => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }
}
