//! Services behind the HTTP handlers, plus the shared state that carries them.

pub mod auth_service;
pub mod entity_store;
pub mod export_service;
pub mod stats_service;

use auth_service::AuthService;
use entity_store::EntityStore;
use export_service::RegistrationExporter;
use stats_service::StatsService;
use std::sync::Arc;

/// Shared state handed to every handler through `Router::with_state`.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<EntityStore>,
    pub stats: StatsService,
    pub auth: AuthService,
    pub exporter: Arc<dyn RegistrationExporter>,
}

impl AppState {
    pub fn new(
        store: Arc<EntityStore>,
        stats: StatsService,
        auth: AuthService,
        exporter: Arc<dyn RegistrationExporter>,
    ) -> Self {
        Self {
            store,
            stats,
            auth,
            exporter,
        }
    }
}
