//! Client-side session state.
//!
//! [`SessionManager`] is the single writer of the authentication state:
//! tokens and user go in through [`SessionManager::set_credentials`],
//! [`SessionManager::update_user`] and [`SessionManager::log_out`], every
//! change is persisted through the [`SessionStore`] before the write lock is
//! released, and interested parties observe changes through
//! [`SessionManager::subscribe`].

mod store;

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::{RwLock, broadcast};
use tracing::{debug, warn};
use warden_core::Result;
use warden_core::types::User;

pub use store::{FileSessionStore, MemorySessionStore, SessionStore};

/// Buffer size for session event subscribers.
const EVENT_BUFFER_SIZE: usize = 64;

/// The authentication state of the client.
///
/// `is_authenticated` is derived state: it is `true` exactly when
/// `access_token` is present. The serialized field names (`token`,
/// `refreshToken`, `isAuthenticated`) are the storage format of the
/// original console, which keeps previously persisted records readable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// The signed-in account, when known.
    #[serde(default)]
    pub user: Option<User>,
    /// Bearer token attached to authenticated requests.
    #[serde(rename = "token", default)]
    pub access_token: Option<String>,
    /// Token exchanged for a replacement bearer token.
    #[serde(rename = "refreshToken", default)]
    pub refresh_token: Option<String>,
    /// Whether the session holds credentials.
    #[serde(rename = "isAuthenticated", default)]
    pub is_authenticated: bool,
}

impl Session {
    /// Re-derives `is_authenticated` from the token state.
    ///
    /// Persisted records are normalized on restore so a hand-edited flag
    /// cannot contradict the tokens.
    pub(crate) fn normalize(&mut self) {
        self.is_authenticated = self.access_token.is_some();
    }
}

/// Session lifecycle notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// A credential pair was stored (sign-in or refresh).
    CredentialsSet,
    /// The user record changed without touching tokens.
    UserUpdated,
    /// The session was cleared.
    LoggedOut,
}

/// Owner of the session state.
pub struct SessionManager {
    state: RwLock<Session>,
    store: Arc<dyn SessionStore>,
    events: broadcast::Sender<SessionEvent>,
}

impl SessionManager {
    /// Restores the session from the store.
    ///
    /// Absent, malformed, or unreadable records all start the client signed
    /// out; restore never fails.
    pub async fn restore(store: Arc<dyn SessionStore>) -> Self {
        let state = match store.load().await {
            Ok(Some(mut session)) => {
                session.normalize();
                session
            }
            Ok(None) => Session::default(),
            Err(err) => {
                warn!(error = %err, "session restore failed, starting signed out");
                Session::default()
            }
        };

        let (events, _) = broadcast::channel(EVENT_BUFFER_SIZE);
        Self {
            state: RwLock::new(state),
            store,
            events,
        }
    }

    /// Stores a fresh credential pair.
    ///
    /// `user` replaces the current account when `Some` and preserves it when
    /// `None`, which is what the refresh path wants. The write lock is held
    /// across the persist so memory and store cannot diverge.
    ///
    /// # Errors
    ///
    /// Returns [`warden_core::WardenError::Storage`] when persisting fails;
    /// the in-memory state is updated regardless.
    pub async fn set_credentials(
        &self,
        user: Option<User>,
        access_token: impl Into<String>,
        refresh_token: impl Into<String>,
    ) -> Result<()> {
        {
            let mut state = self.state.write().await;
            if let Some(user) = user {
                state.user = Some(user);
            }
            state.access_token = Some(access_token.into());
            state.refresh_token = Some(refresh_token.into());
            state.is_authenticated = true;
            self.store.save(&state).await?;
        }
        self.notify(SessionEvent::CredentialsSet);
        Ok(())
    }

    /// Replaces the user record, leaving tokens untouched.
    ///
    /// # Errors
    ///
    /// Returns [`warden_core::WardenError::Storage`] when persisting fails.
    pub async fn update_user(&self, user: User) -> Result<()> {
        {
            let mut state = self.state.write().await;
            state.user = Some(user);
            self.store.save(&state).await?;
        }
        self.notify(SessionEvent::UserUpdated);
        Ok(())
    }

    /// Clears the session and deletes the persisted record.
    ///
    /// # Errors
    ///
    /// Returns [`warden_core::WardenError::Storage`] when the record cannot
    /// be deleted; the in-memory state is cleared regardless.
    pub async fn log_out(&self) -> Result<()> {
        {
            let mut state = self.state.write().await;
            *state = Session::default();
            self.store.clear().await?;
        }
        self.notify(SessionEvent::LoggedOut);
        Ok(())
    }

    /// Returns a copy of the current session.
    pub async fn snapshot(&self) -> Session {
        self.state.read().await.clone()
    }

    /// Returns the current bearer token.
    pub async fn access_token(&self) -> Option<String> {
        self.state.read().await.access_token.clone()
    }

    /// Returns the current refresh token.
    pub async fn refresh_token(&self) -> Option<String> {
        self.state.read().await.refresh_token.clone()
    }

    /// Returns the signed-in account, when known.
    pub async fn current_user(&self) -> Option<User> {
        self.state.read().await.user.clone()
    }

    /// Returns `true` when the session holds credentials.
    pub async fn is_authenticated(&self) -> bool {
        self.state.read().await.is_authenticated
    }

    /// Subscribes to session lifecycle events.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    fn notify(&self, event: SessionEvent) {
        let receivers = self.events.send(event).unwrap_or(0);
        debug!(?event, receivers, "session event");
    }
}
