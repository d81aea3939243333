use async_trait::async_trait;
use drivebook_shared::NoticeKind;
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use crate::notify::Notifier;

/// Remote side of a session (identity provider, auth API).
#[async_trait]
pub trait SessionBackend: Send + Sync {
    /// Revoke the current session remotely
    async fn revoke(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}

/// Stand-in backend: a fixed round-trip delay, then success.
pub struct SimulatedBackend {
    delay: Duration,
}

impl SimulatedBackend {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl Default for SimulatedBackend {
    fn default() -> Self {
        Self::new(Duration::from_millis(300))
    }
}

#[async_trait]
impl SessionBackend for SimulatedBackend {
    async fn revoke(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        tracing::debug!(delay_ms = self.delay.as_millis() as u64, "Revoking session");
        tokio::time::sleep(self.delay).await;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionState {
    Anonymous,
    Authenticated,
    LoggingOut,
}

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("A logout is already in progress")]
    LogoutPending,

    #[error("Logout superseded by a newer login")]
    Superseded,

    #[error("Logout rejected: {0}")]
    Rejected(String),
}

#[derive(Debug, Default)]
struct Flags {
    authenticated: bool,
    logout_pending: bool,
    /// Bumped by every completed transition; a logout only applies if no
    /// login happened while it was in flight.
    generation: u64,
}

/// The single logical session of this process.
///
/// Cloning is cheap and every clone observes the same flag. `begin_session`
/// and `end_session` are the only mutators. At most one logout is in flight;
/// a login issued meanwhile wins over it.
#[derive(Clone)]
pub struct SessionGate {
    flags: Arc<Mutex<Flags>>,
    backend: Arc<dyn SessionBackend>,
    notifier: Notifier,
}

impl SessionGate {
    pub fn new(backend: Arc<dyn SessionBackend>, notifier: Notifier) -> Self {
        Self {
            flags: Arc::new(Mutex::new(Flags::default())),
            backend,
            notifier,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.flags().authenticated
    }

    pub fn state(&self) -> SessionState {
        let flags = self.flags();
        match (flags.authenticated, flags.logout_pending) {
            (true, true) => SessionState::LoggingOut,
            (true, false) => SessionState::Authenticated,
            (false, _) => SessionState::Anonymous,
        }
    }

    pub fn begin_session(&self) {
        let mut flags = self.flags();
        flags.authenticated = true;
        flags.generation += 1;
        tracing::info!(generation = flags.generation, "Session started");
    }

    /// End the session after a remote round trip.
    ///
    /// The round trip runs on its own task: dropping this future does not
    /// cancel the logout, which still applies once the backend answers.
    /// On failure the flag is left untouched and a `LogoutFailed` notice has
    /// already been published, so callers should not notify again.
    pub async fn end_session(&self) -> Result<(), SessionError> {
        let generation = {
            let mut flags = self.flags();
            if flags.logout_pending {
                tracing::warn!("Logout requested while another is pending");
                return Err(SessionError::LogoutPending);
            }
            flags.logout_pending = true;
            flags.generation
        };

        let gate = self.clone();
        let task = tokio::spawn(async move { gate.complete_logout(generation).await });

        match task.await {
            Ok(outcome) => outcome,
            Err(e) => {
                // The task died before clearing the pending marker
                self.flags().logout_pending = false;
                self.notifier.notify_kind(NoticeKind::LogoutFailed);
                Err(SessionError::Rejected(e.to_string()))
            }
        }
    }

    async fn complete_logout(&self, generation: u64) -> Result<(), SessionError> {
        let revoked = self.backend.revoke().await.map_err(|e| e.to_string());

        let outcome = {
            let mut flags = self.flags();
            flags.logout_pending = false;

            match revoked {
                Err(reason) => Err(SessionError::Rejected(reason)),
                Ok(()) if flags.generation != generation => Err(SessionError::Superseded),
                Ok(()) => {
                    flags.authenticated = false;
                    flags.generation += 1;
                    Ok(())
                }
            }
        };

        match &outcome {
            Ok(()) => {
                self.notifier.notify_kind(NoticeKind::LoggedOut);
            }
            Err(SessionError::Rejected(reason)) => {
                tracing::error!(%reason, "Logout error");
                self.notifier.notify_kind(NoticeKind::LogoutFailed);
            }
            Err(e) => tracing::info!("{}", e),
        }

        outcome
    }

    fn flags(&self) -> MutexGuard<'_, Flags> {
        self.flags.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for SessionGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionGate")
            .field("state", &self.state())
            .finish()
    }
}
