//! Configuration module

use std::env;
use std::path::PathBuf;

use crate::logic::model::ThresholdPolarity;

/// Application configuration. Every value is fixed for the lifetime of one
/// running pipeline instance.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,

    /// Directory holding the capture datasets
    pub data_dir: PathBuf,

    /// ONNX autoencoder model file
    pub model_path: PathBuf,

    /// Window duration in seconds
    pub window_duration: f64,

    /// Sliding buffer capacity (number of trailing windows per scoring
    /// decision)
    pub history_windows: usize,

    /// Calibration constant for likelihood normalization
    pub likelihood_max: f32,

    /// Reconstruction-loss classification threshold
    pub loss_threshold: f32,

    /// Which side of the threshold flips the predicted label
    pub threshold_polarity: ThresholdPolarity,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8000),

            data_dir: env::var("DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./data")),

            model_path: env::var("MODEL_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./models/lstm_autoencoder.onnx")),

            window_duration: env::var("WINDOW_DURATION_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|v: &f64| *v > 0.0)
                .unwrap_or(1.0),

            history_windows: env::var("HISTORY_WINDOWS")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|v: &usize| *v > 0)
                .unwrap_or(30),

            likelihood_max: env::var("LIKELIHOOD_MAX")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(0.108_617_84),

            loss_threshold: env::var("LOSS_THRESHOLD")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(0.000_736_085_1),

            threshold_polarity: env::var("THRESHOLD_POLARITY")
                .ok()
                .and_then(|v| ThresholdPolarity::parse(&v))
                .unwrap_or(ThresholdPolarity::Above),
        }
    }
}
