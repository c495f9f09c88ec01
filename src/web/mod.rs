/*!
 * Browser front end.
 *
 * A single page with an upload form. Submitting it runs the whole pipeline
 * inside the request and answers with the status messages of the run and a
 * link to the finished document. Documents wait in memory until they are
 * downloaded once, or until `server.download_ttl_secs` has passed.
 */

mod handlers;
mod pages;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use bytes::Bytes;
use chrono::{DateTime, Duration, Local};
use log::{debug, info};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::app_config::Config;
use crate::app_controller::Controller;
use crate::translation::Translator;

pub use handlers::*;

/// A finished document waiting for its single download
#[derive(Debug, Clone)]
pub struct PreparedDownload {
    pub file_name: String,
    pub bytes: Bytes,
    pub created_at: DateTime<Local>,
}

/// State shared by all handlers
#[derive(Clone)]
pub struct AppState {
    /// Absent when the translator could not be set up at startup
    controller: Option<Arc<Controller>>,
    config: Arc<Config>,
    /// Shown as a banner on every page while the app cannot translate
    startup_error: Option<String>,
    downloads: Arc<Mutex<HashMap<Uuid, PreparedDownload>>>,
}

impl PreparedDownload {
    fn is_expired(&self, now: DateTime<Local>, ttl: Duration) -> bool {
        now - self.created_at >= ttl
    }
}

impl AppState {
    /// State for a fully configured app
    pub fn new(config: Config, translator: Arc<dyn Translator>) -> anyhow::Result<Self> {
        let controller = Controller::with_translator(config.clone(), translator)?;
        Ok(Self {
            controller: Some(Arc::new(controller)),
            config: Arc::new(config),
            startup_error: None,
            downloads: Arc::new(Mutex::new(HashMap::new())),
        })
    }

    /// State for an app that can show its page but must refuse every run
    pub fn unconfigured(config: Config, startup_error: impl Into<String>) -> Self {
        Self {
            controller: None,
            config: Arc::new(config),
            startup_error: Some(startup_error.into()),
            downloads: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn startup_error(&self) -> Option<&str> {
        self.startup_error.as_deref()
    }

    pub fn is_ready(&self) -> bool {
        self.controller.is_some()
    }

    /// Number of documents not yet downloaded
    pub fn pending_downloads(&self) -> usize {
        self.downloads.lock().len()
    }

    fn download_ttl(&self) -> Duration {
        // chrono caps a delta at i64::MAX milliseconds
        let max_secs = (i64::MAX / 1000) as u64;
        Duration::seconds(self.config.server.download_ttl_secs.min(max_secs) as i64)
    }

    fn store_download(&self, file_name: String, bytes: Vec<u8>) -> Uuid {
        let id = Uuid::new_v4();
        let now = Local::now();
        let mut downloads = self.downloads.lock();
        Self::evict_expired(&mut downloads, now, self.download_ttl());
        downloads.insert(
            id,
            PreparedDownload {
                file_name,
                bytes: Bytes::from(bytes),
                created_at: now,
            },
        );
        id
    }

    fn take_download(&self, id: &Uuid) -> Option<PreparedDownload> {
        let prepared = self.downloads.lock().remove(id)?;
        if prepared.is_expired(Local::now(), self.download_ttl()) {
            debug!("Download {} expired before it was fetched", id);
            return None;
        }
        Some(prepared)
    }

    // Documents nobody came back for
    fn evict_expired(downloads: &mut HashMap<Uuid, PreparedDownload>, now: DateTime<Local>, ttl: Duration) {
        let before = downloads.len();
        downloads.retain(|_, prepared| !prepared.is_expired(now, ttl));
        let evicted = before - downloads.len();
        if evicted > 0 {
            info!("Dropped {} expired download(s)", evicted);
        }
    }
}

/// Build the router with all endpoints
pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.server.max_upload_bytes;

    Router::new()
        .route("/", get(index))
        .route("/translate", post(translate))
        .route("/download/{id}", get(download))
        .route("/health", get(health_check))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

/// Serve on an already bound listener
pub async fn serve(listener: tokio::net::TcpListener, state: AppState) -> Result<(), std::io::Error> {
    if let Ok(addr) = listener.local_addr() {
        info!("Listening on http://{}", addr);
    }
    axum::serve(listener, build_router(state)).await
}

/// Bind `addr` and serve until the process stops
pub async fn start_server(addr: &str, state: AppState) -> Result<(), std::io::Error> {
    info!("Starting web server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    serve(listener, state).await
}
