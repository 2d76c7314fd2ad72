//! Dataset replay handler
//!
//! Streams a loaded dataset as human-readable colored lines, paced to the
//! recorded inter-arrival times, and simultaneously feeds every emitted
//! frame into the detection worker. The display path and the detection
//! path consume the same emission.

use std::convert::Infallible;
use std::time::{Duration, Instant};

use axum::body::{Body, Bytes};
use axum::extract::{Query, State};
use axum::http::header;
use axum::response::Response;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::logic::worker::FrameMessage;
use crate::AppState;

#[derive(Deserialize)]
pub struct StreamParams {
    pub data_type: String,
}

pub async fn read_dataset(
    State(state): State<AppState>,
    Query(params): Query<StreamParams>,
) -> AppResult<Response> {
    let frames = state
        .datasets
        .get(&params.data_type)
        .cloned()
        .ok_or_else(|| AppError::NotFound(format!("dataset '{}' is not loaded", params.data_type)))?;

    let ingest = state.ingest_tx.clone();
    let name = params.data_type;

    let stream = async_stream::stream! {
        tracing::info!("replay of '{}' started ({} frames)", name, frames.len());

        let mut previous_ts: Option<f64> = None;
        let mut last_emit = Instant::now();

        for frame in frames.iter() {
            // Pace to the recorded inter-arrival delta, corrected for the
            // time this loop itself has spent since the previous emission.
            let mut delay = 0.05;
            if let Some(previous) = previous_ts {
                let delta = frame.timestamp - previous;
                delay = (delta - last_emit.elapsed().as_secs_f64()).max(0.0);
            }
            tokio::time::sleep(Duration::from_secs_f64(delay)).await;
            last_emit = Instant::now();
            previous_ts = Some(frame.timestamp);

            if ingest.send(FrameMessage::Frame(frame.clone())).is_err() {
                tracing::warn!("ingestion channel closed; stopping replay of '{}'", name);
                break;
            }
            yield Ok::<_, Infallible>(Bytes::from(frame.display_line()));
        }

        tracing::info!("replay of '{}' finished", name);
    };

    Response::builder()
        .header(header::CONTENT_TYPE, "text/event-stream")
        .body(Body::from_stream(stream))
        .map_err(|e| AppError::InternalError(e.to_string()))
}
