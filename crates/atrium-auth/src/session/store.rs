use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use atrium_state::repository::{Repository, RepositoryError};
use thiserror::Error;

use super::{Identity, Session};

/// Storage key of the single session record within the `auth_storage`
/// namespace. Absence of the record is the logged-out state, not an error.
const SESSION_KEY: &str = "current";

/// Top-level identity fields that must never reach persistence. The service
/// never includes these in a resolved identity; a record carrying one is
/// refused outright.
const SENSITIVE_FIELDS: &[&str] = &["password", "code", "totp", "otp"];

/// Errors from committing or clearing a session.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The identity carried a field that looks like a credential or one-time
    /// code. Nothing was stored.
    #[error("refusing to store identity field `{0}` in a session")]
    SensitiveField(String),
    /// The backing repository failed. The in-memory session already reflects
    /// the requested change.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// The durable record of the authenticated account.
///
/// All writes happen through [`commit`](Self::commit) and
/// [`clear`](Self::clear), both invoked only by the orchestrator; observers
/// read [`snapshot`](Self::snapshot).
pub struct SessionStore {
    current: RwLock<Session>,
    repository: Arc<dyn Repository<Session>>,
}

impl SessionStore {
    /// Rehydrates the store from persistence, falling back to the
    /// unauthenticated default when the record is absent or unreadable.
    pub async fn initialize(repository: Arc<dyn Repository<Session>>) -> Self {
        let current = match repository.get(SESSION_KEY.to_string()).await {
            Ok(Some(session)) if session.user.is_some() || !session.authenticated => session,
            Ok(Some(_)) => {
                log::warn!("persisted session claims authentication without a user, resetting");
                Session::default()
            }
            Ok(None) => Session::default(),
            Err(error) => {
                log::warn!("failed to rehydrate session, starting logged out: {error}");
                Session::default()
            }
        };

        Self {
            current: RwLock::new(current),
            repository,
        }
    }

    /// Marks `identity` as the authenticated account and persists the record.
    ///
    /// Identities carrying credential-like fields are refused before any
    /// state changes. A persistence failure propagates, but the in-memory
    /// commit stands.
    pub async fn commit(&self, identity: Identity) -> Result<(), SessionError> {
        if let Some(field) = identity
            .field_names()
            .find(|name| SENSITIVE_FIELDS.contains(name))
        {
            return Err(SessionError::SensitiveField(field.to_string()));
        }

        let session = Session {
            user: Some(identity),
            authenticated: true,
        };
        *self.write_lock() = session.clone();
        self.repository.set(SESSION_KEY.to_string(), session).await?;
        Ok(())
    }

    /// Returns the store to the logged-out state and removes the record.
    /// Idempotent.
    pub async fn clear(&self) -> Result<(), SessionError> {
        *self.write_lock() = Session::default();
        self.repository.remove(SESSION_KEY.to_string()).await?;
        Ok(())
    }

    /// The current `{user, authenticated}` view.
    pub fn snapshot(&self) -> Session {
        self.read_lock().clone()
    }

    fn read_lock(&self) -> RwLockReadGuard<'_, Session> {
        self.current
            .read()
            .expect("session lock should not be poisoned")
    }

    fn write_lock(&self) -> RwLockWriteGuard<'_, Session> {
        self.current
            .write()
            .expect("session lock should not be poisoned")
    }
}
