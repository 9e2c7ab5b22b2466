//! Typed view over the three session keys.

use std::fmt;
use std::sync::Arc;

use gabarita_protocol::{Codec, JsonCodec, ProtocolError, User};

use crate::{KeyValueStore, StoreError};

/// Storage key of the JSON-encoded [`User`] record.
pub const USER_KEY: &str = "user";
/// Storage key of the access token.
pub const ACCESS_TOKEN_KEY: &str = "authToken";
/// Storage key of the refresh token.
pub const REFRESH_TOKEN_KEY: &str = "refreshToken";

const SESSION_KEYS: [&str; 3] = [USER_KEY, ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY];

/// The durable half of a login session.
///
/// Cloning is cheap: clones share the same underlying store, which is how
/// the client (token reads, refresh writes) and the auth session (login,
/// logout) see one consistent set of keys.
///
/// ## Invariants
///
/// - A refresh token is never stored without an access token.
/// - [`clear`](Self::clear) removes all three keys together.
#[derive(Clone)]
pub struct SessionStorage {
    store: Arc<dyn KeyValueStore>,
    codec: JsonCodec,
}

impl SessionStorage {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            codec: JsonCodec,
        }
    }

    /// The stored user record.
    ///
    /// # Errors
    /// [`StoreError::Codec`] when the record exists but does not decode.
    pub fn user(&self) -> Result<Option<User>, StoreError> {
        match self.store.get(USER_KEY)? {
            Some(raw) => Ok(Some(self.codec.decode(raw.as_bytes())?)),
            None => Ok(None),
        }
    }

    pub fn access_token(&self) -> Result<Option<String>, StoreError> {
        self.store.get(ACCESS_TOKEN_KEY)
    }

    pub fn refresh_token(&self) -> Result<Option<String>, StoreError> {
        self.store.get(REFRESH_TOKEN_KEY)
    }

    /// Persists a complete login: user record, access token, and the
    /// refresh token when the backend issued one.
    ///
    /// Without a new refresh token any previously stored one is dropped,
    /// so a stale refresh token never outlives the access token it was
    /// issued with.
    pub fn save_session(
        &self,
        user: &User,
        access_token: &str,
        refresh_token: Option<&str>,
    ) -> Result<(), StoreError> {
        let user_json = self.encode_user(user)?;
        match refresh_token {
            Some(refresh) => self.store.set_many(&[
                (USER_KEY, user_json.as_str()),
                (ACCESS_TOKEN_KEY, access_token),
                (REFRESH_TOKEN_KEY, refresh),
            ])?,
            None => {
                self.store.remove(REFRESH_TOKEN_KEY)?;
                self.store
                    .set_many(&[(USER_KEY, user_json.as_str()), (ACCESS_TOKEN_KEY, access_token)])?;
            }
        }
        tracing::debug!(user_id = %user.id, has_refresh = refresh_token.is_some(), "session persisted");
        Ok(())
    }

    /// Replaces the access token after a successful refresh.
    pub fn set_access_token(&self, token: &str) -> Result<(), StoreError> {
        self.store.set(ACCESS_TOKEN_KEY, token)
    }

    /// Replaces the user record, leaving the tokens alone.
    pub fn set_user(&self, user: &User) -> Result<(), StoreError> {
        let user_json = self.encode_user(user)?;
        self.store.set(USER_KEY, user_json.as_str())
    }

    /// Removes `user`, `authToken` and `refreshToken` as one operation.
    pub fn clear(&self) -> Result<(), StoreError> {
        self.store.remove_all(&SESSION_KEYS)?;
        tracing::debug!("session storage cleared");
        Ok(())
    }

    fn encode_user(&self, user: &User) -> Result<String, StoreError> {
        let bytes = self.codec.encode(user)?;
        String::from_utf8(bytes)
            .map_err(|e| ProtocolError::InvalidMessage(e.to_string()).into())
    }
}

impl fmt::Debug for SessionStorage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionStorage").finish_non_exhaustive()
    }
}
