//! Cross-context result delivery
//!
//! The detection worker runs on a plain thread and cannot suspend; its
//! results cross into the async side through a non-blocking sink, then a
//! fan-out task re-broadcasts them to however many listeners are attached.
//! Delivery to listeners is best-effort; delivery order is never reordered.

use serde::Serialize;
use tokio::sync::{broadcast, mpsc};

use super::frame::Label;

/// One completed classification, created once and consumed once.
#[derive(Debug, Clone, Serialize)]
pub struct DetectionRecord {
    /// Wall-clock time of classification, seconds.
    pub timestamp: f64,
    /// Reconstruction mean squared error.
    pub loss: f32,
    pub original_label: Label,
    pub predicted_label: Label,
}

impl DetectionRecord {
    /// Line-delimited wire form: `<ts>,<loss>,<original>,<predicted>`.
    pub fn to_line(&self) -> String {
        format!(
            "{},{},{},{}\n",
            self.timestamp,
            self.loss,
            self.original_label.as_bit(),
            self.predicted_label.as_bit()
        )
    }
}

#[derive(Debug, Clone)]
pub enum DetectionEvent {
    Record(DetectionRecord),
    /// Terminal sentinel: the worker has stopped, no further records
    /// will ever arrive.
    EndOfStream,
}

/// Write end of the result channel, safe to call from a context that
/// cannot suspend.
pub struct ResultSink {
    tx: mpsc::UnboundedSender<DetectionEvent>,
}

impl ResultSink {
    /// Enqueue without blocking. A write after the async side has been
    /// torn down is dropped, never retried.
    pub fn try_deliver(&self, event: DetectionEvent) {
        if self.tx.send(event).is_err() {
            tracing::debug!("result channel closed; dropping event");
        }
    }
}

pub fn result_channel() -> (ResultSink, mpsc::UnboundedReceiver<DetectionEvent>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (ResultSink { tx }, rx)
}

/// Forward worker results into the broadcast channel listeners subscribe
/// to. Stops after relaying the terminal sentinel. A send with no
/// listeners attached discards the record; a lagging listener skips.
pub fn spawn_fanout(
    mut rx: mpsc::UnboundedReceiver<DetectionEvent>,
    events: broadcast::Sender<DetectionEvent>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            let is_end = matches!(event, DetectionEvent::EndOfStream);
            let _ = events.send(event);
            if is_end {
                tracing::info!("result fan-out stopped");
                break;
            }
        }
    })
}
