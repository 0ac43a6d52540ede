//! HTTP front end for the synthesizer.
//!
//! `POST /generate_sound` renders a score at the submitted tempo and answers
//! with a WAV attachment. The page served at `/` is the matching browser
//! client.

mod handlers;

use crate::config::toml_config::TomlConfig;
use crate::core::score::{default_score, parse_score};
use crate::domain::model::{Score, SynthSettings};
use crate::utils::error::Result;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub use handlers::{parse_bpm, SCORE_FIELD};

/// Shared state for the handlers
#[derive(Clone)]
pub struct AppState {
    pub synth: Arc<SynthSettings>,
    pub default_score: Arc<Score>,
    pub default_bpm: u32,
    pub max_upload_bytes: usize,
    /// Longest mix the server agrees to render
    pub max_render_seconds: f64,
    pub save_renders: Option<PathBuf>,
    /// Fixed noise seed; `None` draws fresh noise for every render
    pub seed: Option<u64>,
}

impl AppState {
    pub fn new(synth: SynthSettings, default_score: Score) -> Self {
        Self {
            synth: Arc::new(synth),
            default_score: Arc::new(default_score),
            default_bpm: crate::config::toml_config::DEFAULT_BPM,
            max_upload_bytes: 1024 * 1024,
            max_render_seconds: crate::config::toml_config::DEFAULT_MAX_RENDER_SECONDS,
            save_renders: None,
            seed: None,
        }
    }

    pub fn from_config(config: &TomlConfig) -> Result<Self> {
        let score = match &config.server.default_score {
            Some(path) => {
                tracing::info!("🎼 Loading default score from {}", path);
                parse_score(&std::fs::read_to_string(path)?)?
            }
            None => default_score()?,
        };

        let mut state = Self::new(config.synth.clone(), score);
        state.default_bpm = config.server.default_bpm;
        state.max_upload_bytes = config.server.max_upload_bytes;
        state.max_render_seconds = config.server.max_render_seconds;
        state.save_renders = config.server.save_renders.as_ref().map(PathBuf::from);
        Ok(state)
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

pub fn router(state: AppState) -> Router {
    let body_limit = state.max_upload_bytes;

    Router::new()
        .route("/", get(handlers::serve_index))
        .route("/script.js", get(handlers::serve_script))
        .route("/health", get(handlers::health))
        .route("/generate_sound", post(handlers::generate_sound))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind `addr` and serve until the process is stopped.
pub async fn serve(addr: std::net::SocketAddr, state: AppState) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("🚀 Sound server listening on http://{}", listener.local_addr()?);
    axum::serve(listener, router(state)).await?;
    Ok(())
}
