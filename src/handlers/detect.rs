//! Detection result stream handler
//!
//! Long-lived connection delivering classification results in production
//! order, one line per result, until the pipeline's terminal sentinel
//! arrives. Each listener gets its own subscription; a disconnect tears
//! down only that subscription.

use std::convert::Infallible;

use axum::body::{Body, Bytes};
use axum::extract::State;
use axum::http::header;
use axum::response::Response;
use tokio::sync::broadcast::error::RecvError;

use crate::error::{AppError, AppResult};
use crate::logic::bridge::DetectionEvent;
use crate::AppState;

pub async fn detect_attack(State(state): State<AppState>) -> AppResult<Response> {
    let mut events = state.events.subscribe();

    let stream = async_stream::stream! {
        tracing::info!("listener connected to detection stream");

        loop {
            match events.recv().await {
                Ok(DetectionEvent::Record(record)) => {
                    yield Ok::<_, Infallible>(Bytes::from(record.to_line()));
                }
                Ok(DetectionEvent::EndOfStream) => {
                    tracing::info!("detection stream ended");
                    break;
                }
                // Best-effort fan-out: a slow listener skips what it
                // missed and keeps receiving in order.
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!("detection listener lagging; skipped {} results", skipped);
                }
                Err(RecvError::Closed) => break,
            }
        }
    };

    Response::builder()
        .header(header::CONTENT_TYPE, "application/x-ndjson")
        .body(Body::from_stream(stream))
        .map_err(|e| AppError::InternalError(e.to_string()))
}
