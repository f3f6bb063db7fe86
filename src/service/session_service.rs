//! Session gate: login/logout, the persisted session flag and the autosave
//! lifecycle.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;

use super::{AutosaveHandle, TallyService};
use crate::auth::CredentialCheck;
use crate::error::TallyError;
use crate::persistence::StatePersistence;

#[derive(Debug)]
struct SessionState {
    authenticated: bool,
    autosave: Option<AutosaveHandle>,
}

/// Owns the single operator session.
///
/// The autosave task runs exactly while a session is active, so it never
/// writes after logout.
#[derive(Debug)]
pub struct SessionService {
    tally: Arc<TallyService>,
    persistence: StatePersistence,
    credentials: Arc<dyn CredentialCheck>,
    autosave_period: Option<Duration>,
    state: Mutex<SessionState>,
}

impl SessionService {
    /// Creates the gate. `autosave_period = None` disables periodic saves.
    /// The persisted session flag is read once here.
    #[must_use]
    pub fn new(
        tally: Arc<TallyService>,
        persistence: StatePersistence,
        credentials: Arc<dyn CredentialCheck>,
        autosave_period: Option<Duration>,
    ) -> Self {
        let authenticated = persistence.is_authenticated();
        Self {
            tally,
            persistence,
            credentials,
            autosave_period,
            state: Mutex::new(SessionState {
                authenticated,
                autosave: None,
            }),
        }
    }

    /// Returns `true` while a session is active.
    pub async fn is_authenticated(&self) -> bool {
        self.state.lock().await.authenticated
    }

    /// Returns `true` while the autosave task is running.
    pub async fn autosave_running(&self) -> bool {
        self.state.lock().await.autosave.is_some()
    }

    /// Starts a session if `password` is accepted. Logging in again while
    /// signed in is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`TallyError::Unauthorized`] for a rejected password.
    pub async fn login(&self, password: &str) -> Result<(), TallyError> {
        if !self.credentials.verify(password) {
            tracing::warn!("login rejected");
            return Err(TallyError::Unauthorized);
        }

        let mut state = self.state.lock().await;
        state.authenticated = true;
        if let Err(e) = self.persistence.set_authenticated(true) {
            tracing::warn!(error = %e, "failed to persist session flag");
        }
        self.start_autosave(&mut state);
        tracing::info!("session started");
        Ok(())
    }

    /// Ends the session: stops autosave, saves once and clears the flag.
    pub async fn logout(&self) {
        let mut state = self.state.lock().await;
        if let Some(handle) = state.autosave.take() {
            handle.stop().await;
        }
        self.tally.save_now().await;
        state.authenticated = false;
        if let Err(e) = self.persistence.set_authenticated(false) {
            tracing::warn!(error = %e, "failed to clear session flag");
        }
        tracing::info!("session ended");
    }

    /// Restarts autosave for a session persisted by a previous run.
    pub async fn resume(&self) {
        let mut state = self.state.lock().await;
        if state.authenticated {
            self.start_autosave(&mut state);
            tracing::info!("session resumed");
        }
    }

    /// Stops autosave and saves once. The session flag is kept so the
    /// next start resumes it.
    pub async fn shutdown(&self) {
        let mut state = self.state.lock().await;
        if let Some(handle) = state.autosave.take() {
            handle.stop().await;
        }
        self.tally.save_now().await;
        tracing::info!("state flushed on shutdown");
    }

    fn start_autosave(&self, state: &mut SessionState) {
        if state.autosave.is_some() {
            return;
        }
        if let Some(period) = self.autosave_period {
            state.autosave = Some(AutosaveHandle::spawn(Arc::clone(&self.tally), period));
        }
    }
}
