//! Detection worker
//!
//! Single consumer of the ingestion channel. Owns the whole scoring
//! pipeline (window builder, sliding history, normalizer, scorer,
//! classifier) exclusively, so no locking is needed anywhere in the hot
//! path. Frames are processed strictly in arrival order; results leave in
//! production order through the result sink.

use tokio::sync::mpsc;

use super::bridge::{DetectionEvent, DetectionRecord, ResultSink};
use super::buffer::SlidingWindowBuffer;
use super::features::TrafficAggregate;
use super::frame::CanFrame;
use super::model::{Classifier, LikelihoodNormalizer, Scorer};
use super::window::WindowBuilder;
use crate::config::Config;

/// Ingestion channel message. `Shutdown` is the terminal sentinel: the
/// worker stops consuming and propagates a matching sentinel onto the
/// result channel.
#[derive(Debug)]
pub enum FrameMessage {
    Frame(CanFrame),
    Shutdown,
}

/// Everything one pipeline instance owns, constructed once at startup and
/// handed to the worker thread. No process-wide state.
pub struct DetectionPipeline {
    builder: WindowBuilder,
    buffer: SlidingWindowBuffer,
    normalizer: LikelihoodNormalizer,
    classifier: Classifier,
    scorer: Box<dyn Scorer>,
    sink: ResultSink,
}

impl DetectionPipeline {
    pub fn new(
        window_duration: f64,
        history_windows: usize,
        normalizer: LikelihoodNormalizer,
        classifier: Classifier,
        scorer: Box<dyn Scorer>,
        sink: ResultSink,
    ) -> Self {
        Self {
            builder: WindowBuilder::new(window_duration),
            buffer: SlidingWindowBuffer::new(history_windows),
            normalizer,
            classifier,
            scorer,
            sink,
        }
    }

    /// Consume the ingestion channel until the sentinel arrives or every
    /// producer is gone, then propagate the terminal sentinel exactly once.
    pub fn run(mut self, mut rx: mpsc::UnboundedReceiver<FrameMessage>) {
        tracing::info!("detection worker started");

        while let Some(message) = rx.blocking_recv() {
            match message {
                FrameMessage::Frame(frame) => self.handle_frame(frame),
                FrameMessage::Shutdown => {
                    tracing::info!("detection worker received shutdown sentinel");
                    break;
                }
            }
        }

        self.sink.try_deliver(DetectionEvent::EndOfStream);
        tracing::info!("detection worker stopped");
    }

    fn handle_frame(&mut self, frame: CanFrame) {
        for window in self.builder.accept(frame) {
            if let Some(aggregate) = self.buffer.admit(window) {
                self.score(aggregate);
            }
        }
    }

    /// One scoring cycle. Any failure here aborts this cycle only: the
    /// buffer keeps its state and the next admission scores normally.
    fn score(&mut self, aggregate: TrafficAggregate) {
        let input = match self.normalizer.transform(&aggregate.likelihoods) {
            Ok(tensor) => tensor,
            Err(e) => {
                tracing::warn!("normalization failed, skipping scoring cycle: {}", e);
                return;
            }
        };

        let reconstruction = match self.scorer.reconstruct(&input) {
            Ok(tensor) => tensor,
            Err(e) => {
                tracing::warn!("scorer failed, skipping scoring cycle: {}", e);
                return;
            }
        };

        let (loss, predicted_label) = match self.classifier.classify(&input, &reconstruction) {
            Ok(result) => result,
            Err(e) => {
                tracing::warn!("classification failed, skipping scoring cycle: {}", e);
                return;
            }
        };

        tracing::debug!(loss, "scored window history");

        self.sink.try_deliver(DetectionEvent::Record(DetectionRecord {
            timestamp: chrono::Utc::now().timestamp_micros() as f64 / 1e6,
            loss,
            original_label: aggregate.label,
            predicted_label,
        }));
    }
}

/// Spawn the worker on its own thread and hand back the ingestion sender.
pub fn spawn(
    config: &Config,
    scorer: Box<dyn Scorer>,
    sink: ResultSink,
) -> (mpsc::UnboundedSender<FrameMessage>, std::thread::JoinHandle<()>) {
    let (tx, rx) = mpsc::unbounded_channel();

    let pipeline = DetectionPipeline::new(
        config.window_duration,
        config.history_windows,
        LikelihoodNormalizer::new(config.likelihood_max),
        Classifier::new(config.loss_threshold, config.threshold_polarity),
        scorer,
        sink,
    );

    let handle = std::thread::spawn(move || pipeline.run(rx));
    (tx, handle)
}
