//! CanShield Backend Server
//!
//! Real-time scoring backend for an in-vehicle network intrusion
//! detection system.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     CANSHIELD BACKEND                        │
//! ├──────────────────────────────────────────────────────────────┤
//! │  /read_dataset ──▶ paced replay ──▶ ingestion channel        │
//! │        │                                  │                  │
//! │        ▼                                  ▼                  │
//! │  display stream              detection worker (thread)       │
//! │  (colored lines)     windows ▶ buffer ▶ scorer ▶ classifier  │
//! │                                           │                  │
//! │                              result channel ▶ fan-out        │
//! │                                           │                  │
//! │  /detect_attack ◀─── broadcast ───────────┘                  │
//! └──────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod error;
mod handlers;
mod logic;

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::{routing::get, Router};
use tokio::sync::{broadcast, mpsc};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use logic::bridge::{self, DetectionEvent};
use logic::frame::CanFrame;
use logic::model::OnnxScorer;
use logic::worker::{self, FrameMessage};

pub use error::{AppError, AppResult};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "canshield_backend=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::from_env();

    tracing::info!("CanShield backend starting...");

    // Load capture datasets (missing files are logged and skipped)
    let datasets = logic::dataset::load_datasets(&config.data_dir);
    tracing::info!(
        "{} dataset(s) available: {:?}",
        datasets.len(),
        datasets.keys().collect::<Vec<_>>()
    );

    // Load the scorer: the one startup failure that aborts initialization
    let scorer = OnnxScorer::load(&config.model_path).context("scorer initialization failed")?;

    // Wire the pipeline: worker thread -> result channel -> fan-out
    let (sink, results_rx) = bridge::result_channel();
    let (events_tx, _) = broadcast::channel(1024);
    let _fanout = bridge::spawn_fanout(results_rx, events_tx.clone());
    let (ingest_tx, worker_handle) = worker::spawn(&config, Box::new(scorer), sink);

    // Build application state
    let state = AppState {
        datasets: Arc::new(datasets),
        ingest_tx: ingest_tx.clone(),
        events: events_tx,
    };

    // Build router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("🚀 Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("failed to bind server port")?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(ingest_tx))
        .await
        .context("server error")?;

    // The shutdown sentinel is already enqueued; let the worker drain
    if worker_handle.join().is_err() {
        tracing::error!("detection worker panicked");
    }
    tracing::info!("CanShield backend stopped");
    Ok(())
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Loaded capture datasets, immutable for the process lifetime
    pub datasets: Arc<HashMap<String, Arc<Vec<CanFrame>>>>,
    /// Write end of the ingestion channel feeding the detection worker
    pub ingest_tx: mpsc::UnboundedSender<FrameMessage>,
    /// Broadcast side of the result fan-out; listeners subscribe here
    pub events: broadcast::Sender<DetectionEvent>,
}

/// Create the main router with all routes
fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health::check))
        .route("/read_dataset", get(handlers::stream::read_dataset))
        .route("/detect_attack", get(handlers::detect::detect_attack))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

/// Resolves when shutdown is requested, after signaling the worker
async fn shutdown_signal(ingest_tx: mpsc::UnboundedSender<FrameMessage>) {
    if tokio::signal::ctrl_c().await.is_err() {
        tracing::error!("failed to install shutdown signal handler");
        return;
    }
    tracing::info!("shutdown requested; signaling detection worker");
    let _ = ingest_tx.send(FrameMessage::Shutdown);
}
