//! pmatch-api library interface
//!
//! Exposes the router, state and adapters for the binary and for integration tests.

pub mod api;
pub mod cli;
pub mod error;
pub mod vision;

pub use crate::error::{ApiError, ApiResult};

use axum::extract::DefaultBodyLimit;
use axum::Router;
use chrono::{DateTime, Utc};
use pmatch_common::{CharacterCatalog, VisionAnalyzer};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// Module name reported by `/health`
pub const MODULE_NAME: &str = "pmatch-api";

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Image analysis port (Google Vision in production, stubs in tests)
    pub analyzer: Arc<dyn VisionAnalyzer>,
    /// Read-only character table
    pub catalog: CharacterCatalog,
    /// Directory served under `/static`
    pub static_dir: PathBuf,
    /// Largest accepted request body
    pub max_upload_bytes: usize,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
    /// Last analysis failure, for diagnostics
    pub last_error: Arc<RwLock<Option<String>>>,
}

impl AppState {
    pub fn new(analyzer: Arc<dyn VisionAnalyzer>, static_dir: PathBuf, max_upload_bytes: usize) -> Self {
        Self {
            analyzer,
            catalog: CharacterCatalog::builtin(),
            static_dir,
            max_upload_bytes,
            startup_time: Utc::now(),
            last_error: Arc::new(RwLock::new(None)),
        }
    }
}

/// Build application router
///
/// - `GET /` upload page
/// - `POST /api/analyze-face` photo → character
/// - `GET /static/*` character images
/// - `GET /health`
pub fn build_router(state: AppState) -> Router {
    let static_files = ServeDir::new(&state.static_dir);
    let body_limit = DefaultBodyLimit::max(state.max_upload_bytes);

    Router::new()
        .merge(api::ui_routes())
        .merge(api::analyze_routes())
        .merge(api::health_routes())
        .nest_service("/static", static_files)
        .layer(body_limit)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
