//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::auth::{CredentialCheck, SharedSecret};
use crate::config::TallyConfig;
use crate::domain::EventBus;
use crate::error::TallyError;
use crate::persistence::{FileStore, KeyValueStore, MemoryStore, StatePersistence};
use crate::service::{SessionService, TallyService};

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Tally service for all business logic.
    pub tally_service: Arc<TallyService>,
    /// Session gate and autosave owner.
    pub session_service: Arc<SessionService>,
    /// Event bus for WebSocket subscriptions.
    pub event_bus: EventBus,
}

impl AppState {
    /// Wires storage, services and the event bus from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`TallyError::Io`] if the data directory cannot be
    /// created.
    pub fn build(config: &TallyConfig) -> Result<Self, TallyError> {
        let store: Arc<dyn KeyValueStore> = if config.persistence_enabled {
            Arc::new(FileStore::open(&config.data_dir)?)
        } else {
            tracing::warn!("persistence disabled, state is kept in memory only");
            Arc::new(MemoryStore::new())
        };
        let credentials = SharedSecret::new(config.admin_password.clone());
        if credentials.is_default() {
            tracing::warn!("ADMIN_PASSWORD not set, using the built-in default");
        }
        Ok(Self::assemble(store, Arc::new(credentials), config))
    }

    /// In-memory state with autosave disabled, for tests and embedding.
    #[must_use]
    pub fn in_memory(admin_password: &str) -> Self {
        let config = TallyConfig {
            persistence_enabled: false,
            autosave_interval_secs: 0,
            admin_password: admin_password.to_string(),
            ..TallyConfig::default()
        };
        Self::assemble(
            Arc::new(MemoryStore::new()),
            Arc::new(SharedSecret::new(admin_password)),
            &config,
        )
    }

    fn assemble(
        store: Arc<dyn KeyValueStore>,
        credentials: Arc<dyn CredentialCheck>,
        config: &TallyConfig,
    ) -> Self {
        let persistence = StatePersistence::new(store);
        let event_bus = EventBus::new(config.event_bus_capacity);
        let tally_service = Arc::new(TallyService::load(
            persistence.clone(),
            event_bus.clone(),
            Arc::clone(&credentials),
            config.top_drinks_limit,
        ));
        let session_service = Arc::new(SessionService::new(
            Arc::clone(&tally_service),
            persistence,
            credentials,
            config.autosave_period(),
        ));

        Self {
            tally_service,
            session_service,
            event_bus,
        }
    }
}
