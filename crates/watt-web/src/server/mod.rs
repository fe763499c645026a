//! Web server — Axum router + shared state.

pub mod api;
pub mod error;
pub mod ws;

use std::collections::HashMap;
use std::sync::Arc;

use axum::Router;
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use watt_core::appliances::ApplianceCatalog;
use watt_core::chat::SessionHandle;
use watt_core::config::Config;
use watt_core::profile::{IdentityProvider, Profile, StaticIdentity};

use error::{ApiError, ApiResult};

/// Shared application state. Chat sessions are keyed by session ID.
pub struct AppState {
    pub sessions: RwLock<HashMap<String, SessionHandle>>,
    pub catalog: RwLock<ApplianceCatalog>,
    pub profile: RwLock<Profile>,
    pub identity: Box<dyn IdentityProvider>,
    pub config: Config,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let identity = StaticIdentity::from_config(&config);
        let profile = Profile::for_viewer(&identity.viewer());
        Self {
            sessions: RwLock::new(HashMap::new()),
            catalog: RwLock::new(ApplianceCatalog::with_samples()),
            profile: RwLock::new(profile),
            identity: Box::new(identity),
            config,
        }
    }

    pub async fn session(&self, id: &str) -> ApiResult<SessionHandle> {
        self.sessions
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| ApiError::SessionNotFound(id.to_string()))
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::very_permissive();

    Router::new()
        .merge(api::routes())
        .merge(ws::routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
