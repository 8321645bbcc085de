//! Sole owner of the credentials and identity persisted for the current tab.
//!
//! Every multi key read or write happens under a single lock so other tasks of
//! the same tab never observe a half written session.

use std::{
    fmt::Debug,
    sync::{Arc, Mutex, MutexGuard},
};

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use ryde_shared::{
    errors::SessionError,
    token::{AccessToken, RefreshToken, TokenPair},
    uac::{AccessProfile, UserRecord, UserType},
};
use tracing::{info, warn};

use crate::storage::SessionStorage;

pub const KEY_ACCESS_TOKEN: &str = "access_token";
pub const KEY_REFRESH_TOKEN: &str = "refresh_token";
pub const KEY_USER: &str = "user";
pub const KEY_USER_TYPE: &str = "user_type";
pub const KEY_USER_ID: &str = "user_id";
pub const KEY_USER_NAME: &str = "user_name";
pub const KEY_IS_STAFF: &str = "is_staff";
pub const KEY_IS_SUPERUSER: &str = "is_superuser";

/// Every key owned by the session store
pub const SESSION_KEYS: [&str; 8] = [
    KEY_ACCESS_TOKEN,
    KEY_REFRESH_TOKEN,
    KEY_USER,
    KEY_USER_TYPE,
    KEY_USER_ID,
    KEY_USER_NAME,
    KEY_IS_STAFF,
    KEY_IS_SUPERUSER,
];

type Storage = Box<dyn SessionStorage>;

#[derive(Clone)]
pub struct SessionStore {
    storage: Arc<Mutex<Storage>>,
}

/// Never shows stored values, they include the tokens
impl Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore").finish_non_exhaustive()
    }
}

impl SessionStore {
    pub fn new<S: SessionStorage>(storage: S) -> Self {
        Self {
            storage: Arc::new(Mutex::new(Box::new(storage))),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Storage> {
        self.storage.lock().expect("mutex poisoned")
    }

    #[tracing::instrument(skip(self))]
    pub fn save_tokens(&self, access: &AccessToken, refresh: &RefreshToken) {
        write_tokens(self.lock().as_mut(), access, refresh);
    }

    /// Writes the user and the flat copies of its fields. Does nothing if
    /// `user` is `None`.
    #[tracing::instrument(skip(self))]
    pub fn save_identity(&self, user: Option<&UserRecord>) {
        if let Some(user) = user {
            write_identity(self.lock().as_mut(), user);
        }
    }

    /// Stores a freshly issued session (login or registration)
    #[tracing::instrument(skip(self))]
    pub fn establish(&self, tokens: &TokenPair, user: Option<&UserRecord>) {
        let mut guard = self.lock();
        let storage = guard.as_mut();
        write_tokens(storage, &tokens.access, &tokens.refresh);
        if let Some(user) = user {
            write_identity(storage, user);
        }
        info!(has_identity = user.is_some(), "session established");
    }

    /// Returns `None` if no user is stored or the stored value can not be
    /// parsed
    pub fn current_identity(&self) -> Option<UserRecord> {
        read_identity(self.lock().as_ref())
    }

    pub fn access_token(&self) -> Option<AccessToken> {
        read_access_token(self.lock().as_ref())
    }

    pub fn refresh_token(&self) -> Option<RefreshToken> {
        read_refresh_token(self.lock().as_ref())
    }

    /// Only the access token matters here. Losing the identity does not log
    /// the user out.
    pub fn is_authenticated(&self) -> bool {
        self.access_token().is_some()
    }

    /// Empty if there is no access token otherwise holds the bearer
    /// authorization header
    pub fn auth_header(&self) -> HeaderMap {
        let mut result = HeaderMap::new();
        let Some(token) = self.access_token() else {
            return result;
        };
        match HeaderValue::from_str(&format!("Bearer {}", token.as_str())) {
            Ok(mut value) => {
                value.set_sensitive(true);
                result.insert(AUTHORIZATION, value);
            }
            Err(err) => warn!(?err, "stored access token can not be used as a header"),
        }
        result
    }

    /// Returns `true` if the stored access token looks like a signed token
    /// (three non empty dot separated parts). Otherwise the session is
    /// cleared and `false` is returned.
    #[tracing::instrument(skip(self), ret)]
    pub fn verify_access_token_shape(&self) -> bool {
        let mut guard = self.lock();
        let is_valid = read_access_token(guard.as_ref())
            .is_some_and(|token| token.has_signed_token_shape());
        if !is_valid {
            warn!(
                mishap = %SessionError::InvalidAccessToken,
                "clearing session"
            );
            remove_all(guard.as_mut());
        }
        is_valid
    }

    /// The role inputs for access decisions, or `None` if not authenticated.
    ///
    /// Reads the flat copies first and only parses the stored user if those
    /// are missing.
    pub fn authenticated_profile(&self) -> Option<AccessProfile> {
        let guard = self.lock();
        let storage = guard.as_ref();
        read_access_token(storage)?;
        let profile = match storage.get_item(KEY_IS_STAFF) {
            Some(is_staff) => AccessProfile {
                user_type: storage
                    .get_item(KEY_USER_TYPE)
                    .filter(|user_type| !user_type.is_empty())
                    .map(UserType::from),
                is_staff: is_staff == "true",
                is_superuser: storage
                    .get_item(KEY_IS_SUPERUSER)
                    .is_some_and(|value| value == "true"),
            },
            None => read_identity(storage)
                .map(|user| AccessProfile::from(&user))
                .unwrap_or_default(),
        };
        Some(profile)
    }

    /// Replaces the access token only if `used` is still the stored refresh
    /// token. If it is not, the session was cleared or replaced while the
    /// refresh was in flight and the storage is left as is.
    pub(crate) fn replace_access_token(
        &self,
        used: &RefreshToken,
        access: &AccessToken,
    ) -> Result<(), SessionError> {
        let mut guard = self.lock();
        let storage = guard.as_mut();
        if read_refresh_token(storage).as_ref() != Some(used) {
            return Err(SessionError::Changed);
        }
        storage.set_item(KEY_ACCESS_TOKEN, access.as_str().to_string());
        Ok(())
    }

    /// Clears the session that `used` belongs to. A session established after
    /// `used` was read is left alone.
    pub(crate) fn clear_if_current(&self, used: &RefreshToken) {
        let mut guard = self.lock();
        let storage = guard.as_mut();
        match read_refresh_token(storage) {
            Some(stored) if &stored != used => {
                info!("newer session found, not clearing it");
            }
            _ => remove_all(storage),
        }
    }

    /// Removes every key owned by the store. Safe to call repeatedly.
    #[tracing::instrument(skip(self))]
    pub fn clear(&self) {
        remove_all(self.lock().as_mut());
    }
}

fn write_tokens(storage: &mut dyn SessionStorage, access: &AccessToken, refresh: &RefreshToken) {
    storage.set_item(KEY_ACCESS_TOKEN, access.as_str().to_string());
    storage.set_item(KEY_REFRESH_TOKEN, refresh.as_str().to_string());
}

fn write_identity(storage: &mut dyn SessionStorage, user: &UserRecord) {
    match serde_json::to_string(user) {
        Ok(serialized) => storage.set_item(KEY_USER, serialized),
        Err(err) => {
            // The flat fields are still written so routing keeps working
            tracing::error!(?err, "failed to serialize user");
            storage.remove_item(KEY_USER);
        }
    }
    match &user.user_type {
        Some(user_type) => storage.set_item(KEY_USER_TYPE, user_type.to_string()),
        None => storage.remove_item(KEY_USER_TYPE),
    }
    storage.set_item(KEY_USER_ID, user.id.to_string());
    storage.set_item(KEY_USER_NAME, user.full_name());
    storage.set_item(KEY_IS_STAFF, user.is_staff.to_string());
    storage.set_item(KEY_IS_SUPERUSER, user.is_superuser.to_string());
}

fn read_identity(storage: &dyn SessionStorage) -> Option<UserRecord> {
    let raw = storage.get_item(KEY_USER)?;
    match serde_json::from_str(&raw) {
        Ok(user) => Some(user),
        Err(mishap) => {
            warn!(?mishap, "stored user could not be parsed");
            None
        }
    }
}

fn read_access_token(storage: &dyn SessionStorage) -> Option<AccessToken> {
    storage.get_item(KEY_ACCESS_TOKEN)?.try_into().ok()
}

fn read_refresh_token(storage: &dyn SessionStorage) -> Option<RefreshToken> {
    storage.get_item(KEY_REFRESH_TOKEN)?.try_into().ok()
}

fn remove_all(storage: &mut dyn SessionStorage) {
    for key in SESSION_KEYS {
        storage.remove_item(key);
    }
}
