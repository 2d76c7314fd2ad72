//! Logic Module - detection engine
//!
//! The scoring path, left to right:
//! frame -> window builder -> sliding buffer -> aggregate -> normalizer
//! -> scorer -> classifier -> result sink. The whole path is owned by the
//! detection worker; only the channels in `bridge` cross threads.

pub mod bridge;
pub mod buffer;
pub mod dataset;
pub mod features;
pub mod frame;
pub mod model;
pub mod window;
pub mod worker;
