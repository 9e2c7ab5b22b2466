//! The auth session service.
//!
//! [`AuthSession`] is created once by the app and shared. It keeps the
//! in-memory copy of the signed-in user in sync with the durable token set
//! in [`SessionStorage`]:
//!
//! - Successful login/signup writes storage first, then memory.
//! - Failed operations touch neither.
//! - Logout clears both, whatever the backend says.
//! - When the client reports an expired session (it has already cleared
//!   storage), memory follows and becomes [`AuthState::Anonymous`].

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use gabarita_client::{ApiClient, CancelToken, ClientError};
use gabarita_protocol::{SignupRequest, User, UserPatch};
use gabarita_store::{SessionStorage, StoreError};
use gabarita_transport::HttpTransport;
use tokio::sync::watch;

use crate::{AuthState, SessionConfig, SessionError};

/// Tracks login/signup/logout calls that are still running.
///
/// Dropping the guard restores the flag, so early returns, errors and
/// cancellation all leave `is_loading` accurate.
struct Busy<'a>(&'a AtomicUsize);

impl<'a> Busy<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for Busy<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// The signed-in user and the operations that change it.
///
/// Construct it explicitly and share it with `Arc<AuthSession<T>>`.
pub struct AuthSession<T: HttpTransport> {
    client: Arc<ApiClient<T>>,
    storage: SessionStorage,
    config: SessionConfig,
    state: Arc<watch::Sender<AuthState>>,
    in_flight: AtomicUsize,
}

impl<T: HttpTransport> AuthSession<T> {
    /// Creates a session in [`AuthState::Loading`]. Call
    /// [`hydrate`](Self::hydrate) next.
    ///
    /// The session listens for expiries on `client`, so a refresh failure
    /// in any call made through it signs the user out here too.
    pub fn new(client: Arc<ApiClient<T>>, config: SessionConfig) -> Self {
        let storage = client.storage().clone();
        let (state, _) = watch::channel(AuthState::Loading);
        let state = Arc::new(state);
        let weak = Arc::downgrade(&state);
        client.on_session_expired(move || {
            if let Some(state) = weak.upgrade() {
                state.send_replace(AuthState::Anonymous);
            }
        });
        Self {
            client,
            storage,
            config,
            state,
            in_flight: AtomicUsize::new(0),
        }
    }

    // -----------------------------------------------------------------------
    // Observation
    // -----------------------------------------------------------------------

    /// A snapshot of the current state.
    pub fn state(&self) -> AuthState {
        self.state.borrow().clone()
    }

    pub fn user(&self) -> Option<User> {
        self.state.borrow().user().cloned()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_authenticated()
    }

    /// `true` during startup hydration and while a login, signup or
    /// logout call is running.
    pub fn is_loading(&self) -> bool {
        self.state.borrow().is_loading() || self.in_flight.load(Ordering::SeqCst) > 0
    }

    /// A receiver that wakes on every state change.
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }

    pub fn client(&self) -> &Arc<ApiClient<T>> {
        &self.client
    }

    fn set_state(&self, next: AuthState) {
        self.state.send_replace(next);
    }

    /// Converts a client error, mirroring a client-side session expiry
    /// into memory.
    fn fail(&self, error: ClientError) -> SessionError {
        if error.is_auth_expired() {
            self.set_state(AuthState::Anonymous);
        }
        error.into()
    }

    // -----------------------------------------------------------------------
    // Startup
    // -----------------------------------------------------------------------

    /// Restores the session from storage without touching the network.
    ///
    /// - User record and access token present → `Authenticated`.
    /// - Corrupt user record → the stored session is discarded and
    ///   hydration continues as if it were absent.
    /// - Otherwise, with `bypass_auth`, the development user is signed in.
    /// - Otherwise, an access token without a user record leaves the state
    ///   `Loading`: call [`restore`](Self::restore) to fetch the profile.
    /// - Otherwise → `Anonymous`.
    ///
    /// # Errors
    /// [`SessionError::Storage`] on I/O failure; the state becomes
    /// `Anonymous`.
    pub fn hydrate(&self) -> Result<AuthState, SessionError> {
        let outcome = self.hydrate_from_storage();
        if outcome.is_err() {
            self.set_state(AuthState::Anonymous);
        }
        outcome
    }

    fn hydrate_from_storage(&self) -> Result<AuthState, SessionError> {
        let user = match self.storage.user() {
            Ok(user) => user,
            Err(StoreError::Codec(e)) => {
                tracing::warn!(error = %e, "stored user record is corrupt, discarding session");
                self.storage.clear()?;
                None
            }
            Err(e) => return Err(e.into()),
        };
        let token = self.storage.access_token()?;

        let next = match (user, token) {
            (Some(user), Some(_)) => {
                tracing::info!(user_id = %user.id, "session restored from storage");
                AuthState::Authenticated(user)
            }
            _ if self.config.bypass_auth => {
                tracing::warn!("auth bypass enabled, signing in development user");
                AuthState::Authenticated(self.persist_dev_user()?)
            }
            (None, Some(_)) => {
                tracing::debug!("access token without user record, profile restore pending");
                AuthState::Loading
            }
            _ => AuthState::Anonymous,
        };
        self.set_state(next.clone());
        Ok(next)
    }

    /// Fetches the profile for a stored access token that has no user
    /// record.
    ///
    /// On failure the stored session is cleared and the state ends
    /// `Anonymous`. Cancellation leaves state and storage untouched.
    pub async fn restore(&self, cancel: &CancelToken) -> Result<AuthState, SessionError> {
        if self.storage.access_token()?.is_none() {
            self.set_state(AuthState::Anonymous);
            return Ok(AuthState::Anonymous);
        }

        match self.client.profile(cancel).await {
            Ok(user) => {
                if cancel.is_cancelled() {
                    return Err(SessionError::Cancelled);
                }
                self.storage.set_user(&user)?;
                tracing::info!(user_id = %user.id, "profile restored");
                let next = AuthState::Authenticated(user);
                self.set_state(next.clone());
                Ok(next)
            }
            Err(ClientError::Cancelled) => Err(SessionError::Cancelled),
            Err(e) => {
                tracing::warn!(error = %e, "profile restore failed");
                self.storage.clear()?;
                self.set_state(AuthState::Anonymous);
                Err(e.into())
            }
        }
    }

    // -----------------------------------------------------------------------
    // Credentials
    // -----------------------------------------------------------------------

    /// Signs in with email and password.
    ///
    /// On success the user and token set are persisted, then the state
    /// becomes `Authenticated`. On failure nothing changes.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        cancel: &CancelToken,
    ) -> Result<User, SessionError> {
        let _busy = Busy::enter(&self.in_flight);
        let payload = self.client.login(email, password, cancel).await?;
        if cancel.is_cancelled() {
            return Err(SessionError::Cancelled);
        }
        self.storage.save_session(
            &payload.user,
            &payload.token,
            payload.refresh_token.as_deref(),
        )?;
        tracing::info!(user_id = %payload.user.id, "signed in");
        self.set_state(AuthState::Authenticated(payload.user.clone()));
        Ok(payload.user)
    }

    /// Creates an account and signs it in. Same contract as
    /// [`login`](Self::login).
    pub async fn signup(
        &self,
        request: &SignupRequest,
        cancel: &CancelToken,
    ) -> Result<User, SessionError> {
        let _busy = Busy::enter(&self.in_flight);
        let payload = self.client.signup(request, cancel).await?;
        if cancel.is_cancelled() {
            return Err(SessionError::Cancelled);
        }
        self.storage.save_session(
            &payload.user,
            &payload.token,
            payload.refresh_token.as_deref(),
        )?;
        tracing::info!(user_id = %payload.user.id, "account created");
        self.set_state(AuthState::Authenticated(payload.user.clone()));
        Ok(payload.user)
    }

    /// Signs out.
    ///
    /// The remote sign-out is best effort: its failure is logged and
    /// ignored. Storage and memory are cleared in every case.
    ///
    /// # Errors
    /// Only [`SessionError::Storage`], when clearing storage fails. The
    /// in-memory state is `Anonymous` even then.
    pub async fn logout(&self, cancel: &CancelToken) -> Result<(), SessionError> {
        let _busy = Busy::enter(&self.in_flight);
        if let Err(e) = self.client.logout(cancel).await {
            tracing::warn!(error = %e, "remote sign-out failed, clearing local session anyway");
        }
        let cleared = self.storage.clear();
        self.set_state(AuthState::Anonymous);
        tracing::info!("signed out");
        Ok(cleared?)
    }

    /// Applies a profile change once the backend has accepted it.
    ///
    /// # Errors
    /// - [`SessionError::NotAuthenticated`] with no signed-in user.
    /// - Any backend error, with the state unchanged (unless the session
    ///   expired, in which case it becomes `Anonymous`).
    pub async fn update_user(
        &self,
        patch: &UserPatch,
        cancel: &CancelToken,
    ) -> Result<User, SessionError> {
        if !self.is_authenticated() {
            return Err(SessionError::NotAuthenticated);
        }
        let user = self
            .client
            .update_profile(patch, cancel)
            .await
            .map_err(|e| self.fail(e))?;
        if cancel.is_cancelled() {
            return Err(SessionError::Cancelled);
        }
        self.storage.set_user(&user)?;
        tracing::info!(user_id = %user.id, "profile updated");
        self.set_state(AuthState::Authenticated(user.clone()));
        Ok(user)
    }

    // -----------------------------------------------------------------------
    // Development
    // -----------------------------------------------------------------------

    /// Signs in the fixed development user without contacting the backend.
    ///
    /// Any stored session is discarded first. Only the user record is
    /// persisted; no tokens are written, so any authenticated backend call
    /// will still be refused.
    pub fn simulate_auth(&self) -> Result<User, SessionError> {
        self.storage.clear()?;
        let user = self.persist_dev_user()?;
        tracing::warn!(user_id = %user.id, "simulated sign-in");
        self.set_state(AuthState::Authenticated(user.clone()));
        Ok(user)
    }

    fn persist_dev_user(&self) -> Result<User, SessionError> {
        let user = dev_user();
        self.storage.set_user(&user)?;
        Ok(user)
    }
}

/// The fixed user signed in by [`AuthSession::simulate_auth`] and by the
/// auth bypass.
pub fn dev_user() -> User {
    let now = chrono::Utc::now().to_rfc3339();
    User {
        id: "dev-user-123".to_string(),
        name: "Development User".to_string(),
        email: "dev@gabarita.ai".to_string(),
        cpf: None,
        phone: None,
        position: Some("Enfermeiro".to_string()),
        block: Some("Bloco 1 - Seguridade Social".to_string()),
        level: None,
        xp: None,
        accuracy: None,
        plan: "trial".to_string(),
        status: Some("active".to_string()),
        created_at: now.clone(),
        updated_at: now,
        questions_answered: None,
        syllabus_id: None,
        position_id: None,
        group_id: None,
    }
}
