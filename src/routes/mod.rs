use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use axum::{routing::get, Router};
use serde::Deserialize;

use crate::error::ApiError;
use crate::models::Report;
use crate::report::ReportCache;

pub mod events;
pub mod health;
pub mod players;
pub mod raw;
pub mod series;
pub mod summary;
pub mod teams;

/// Shared handler state: the report cache, the configured default path and
/// the directory `?path=` requests are confined to.
#[derive(Clone)]
pub struct AppState {
    cache: Arc<ReportCache>,
    default_path: PathBuf,
    report_root: PathBuf,
    canonical_root: PathBuf,
}

impl AppState {
    /// Requested reports are confined to the default report's directory.
    pub fn new(default_path: PathBuf) -> Self {
        let root = default_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        Self::with_root(default_path, root)
    }

    pub fn with_root(default_path: PathBuf, report_root: PathBuf) -> Self {
        let report_root = std::path::absolute(&report_root).unwrap_or(report_root);
        let canonical_root = report_root
            .canonicalize()
            .unwrap_or_else(|_| report_root.clone());
        AppState {
            cache: Arc::new(ReportCache::new()),
            default_path,
            report_root,
            canonical_root,
        }
    }

    /// Load the report at `path`, or the default one when no path is given.
    /// File access runs on the blocking pool.
    pub async fn report(&self, path: Option<&str>) -> Result<Arc<Report>, ApiError> {
        let requested = path
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_string);
        let state = self.clone();

        let result = tokio::task::spawn_blocking(move || {
            let path = match requested {
                Some(p) => state.resolve(&p)?,
                None => state.default_path.clone(),
            };
            state.cache.get_or_load(&path).map_err(ApiError::from)
        })
        .await
        .unwrap_or_else(|join| Err(ApiError::from(join)));

        result.map_err(|e| {
            tracing::error!("Failed to load report: {}", e);
            e
        })
    }

    /// Map a requested path into the report directory. Relative paths are
    /// taken from the directory; `..` and anything that resolves outside it
    /// (symlinks included) are refused.
    fn resolve(&self, requested: &str) -> Result<PathBuf, ApiError> {
        let relative = Path::new(requested);
        if relative.components().any(|c| matches!(c, Component::ParentDir)) {
            return Err(ApiError::PathNotAllowed(requested.to_string()));
        }

        let candidate = self.report_root.join(relative);
        if !candidate.starts_with(&self.report_root) {
            return Err(ApiError::PathNotAllowed(requested.to_string()));
        }

        match candidate.canonicalize() {
            Ok(real) if real.starts_with(&self.canonical_root) => Ok(real),
            Ok(_) => Err(ApiError::PathNotAllowed(requested.to_string())),
            // missing files inside the directory surface as NotFound
            Err(_) => Ok(candidate),
        }
    }
}

/// Query parameters shared by views that take no other input.
#[derive(Debug, Default, Deserialize)]
pub struct ReportQuery {
    /// Report file to read instead of the configured default
    #[serde(default)]
    pub path: Option<String>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        // Root and health
        .route("/", get(|| async { "Game Report API - v1.0" }))
        .route("/health", get(health::health_check))

        // Report views
        .route("/api/summary", get(summary::get_summary))
        .route("/api/teams", get(teams::get_teams))
        .route("/api/players", get(players::get_players))
        .route("/api/players/select", get(players::select_player))
        .route("/api/players/{track_id}", get(players::get_player_by_track_id))
        .route("/api/series", get(series::get_series))
        .route("/api/events", get(events::get_events))
        .route("/api/raw", get(raw::get_raw))

        .with_state(state)
}
