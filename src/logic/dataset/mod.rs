//! Dataset Module - captured CAN traffic
//!
//! Loads the named capture files once at startup into immutable frame
//! sequences the replay endpoint streams from. The pipeline consumes
//! these sequences at its own pacing and never reloads them.

pub mod loader;

#[cfg(test)]
mod tests;

pub use loader::{load_datasets, load_file, DatasetError};
