//! Structured logging setup for plugstack processes.
//!
//! Console output (plain or JSON) plus an optional daily-rotated NDJSON file.

pub mod logger;

pub use logger::{LogSettings, init_from_config, init_logger};
