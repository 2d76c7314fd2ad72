//! Capture file parsing
//!
//! Two on-disk formats exist in the capture corpus:
//! - candump text: `Timestamp: <ts> ID: <id> 000 DLC: <n> <n hex bytes>`,
//!   all traffic normal,
//! - attack CSV: `ts,id,dlc,b0..b{dlc-1},label` where the label column
//!   shifts left for short payloads.
//!
//! Malformed lines are skipped and counted, never fatal.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;

use crate::logic::frame::{CanFrame, Label};

/// Dataset registry: stream name -> capture file under the data dir.
const REGISTRY: &[(&str, &str)] = &[
    ("normal", "normal_run_data.txt"),
    ("dos", "DoS_dataset.csv"),
    ("fuzzy", "Fuzzy_dataset.csv"),
    ("gear", "Gear_dataset.csv"),
    ("rpm", "RPM_dataset.csv"),
];

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Load every registered dataset that exists under `data_dir`. Missing or
/// unreadable files are logged and omitted; an empty map is not an error.
pub fn load_datasets(data_dir: &Path) -> HashMap<String, Arc<Vec<CanFrame>>> {
    let mut datasets = HashMap::new();

    for (name, file) in REGISTRY {
        let path = data_dir.join(file);
        if !path.exists() {
            tracing::warn!("dataset '{}' not found: {}", name, path.display());
            continue;
        }
        match load_file(&path) {
            Ok(frames) => {
                tracing::info!("dataset '{}' loaded ({} frames)", name, frames.len());
                datasets.insert(name.to_string(), Arc::new(frames));
            }
            Err(e) => tracing::warn!("dataset '{}' failed to load: {}", name, e),
        }
    }

    datasets
}

/// Parse one capture file, format chosen by extension (`.txt` = candump,
/// anything else = CSV).
pub fn load_file(path: &Path) -> Result<Vec<CanFrame>, DatasetError> {
    let content = std::fs::read_to_string(path).map_err(|source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let is_candump = path.extension().is_some_and(|e| e == "txt");
    let mut frames = Vec::new();
    let mut skipped = 0usize;

    for line in content.lines() {
        if line.trim().is_empty() {
            continue;
        }
        let parsed = if is_candump {
            parse_candump_line(line)
        } else {
            parse_csv_line(line)
        };
        match parsed {
            Some(frame) => frames.push(frame),
            None => skipped += 1,
        }
    }

    if skipped > 0 {
        tracing::warn!("{}: skipped {} malformed lines", path.display(), skipped);
    }

    Ok(frames)
}

pub(crate) fn parse_candump_line(line: &str) -> Option<CanFrame> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let timestamp: f64 = tokens.get(1)?.parse().ok()?;
    let can_id = (*tokens.get(3)?).to_string();
    let dlc: u8 = tokens.get(6)?.parse().ok()?;
    let payload = tokens.get(7..7 + dlc as usize)?.concat();

    Some(CanFrame {
        timestamp,
        can_id,
        dlc,
        payload,
        label: Label::Normal,
    })
}

pub(crate) fn parse_csv_line(line: &str) -> Option<CanFrame> {
    let fields: Vec<&str> = line.split(',').collect();
    let timestamp: f64 = fields.first()?.trim().parse().ok()?;
    let can_id = fields.get(1)?.trim().to_string();
    let dlc: u8 = fields.get(2)?.trim().parse().ok()?;

    // The label sits immediately after the last data byte, so a short DLC
    // shifts it left.
    let label_index = 3 + dlc as usize;
    let payload: String = fields.get(3..label_index)?.iter().map(|b| b.trim()).collect();
    let label = Label::from_flag(fields.get(label_index)?);

    Some(CanFrame {
        timestamp,
        can_id,
        dlc,
        payload,
        label,
    })
}
