//! Event Sink Implementations
//!
//! - JsonEventSink: NDJSON output for CI/automation
//!
//! The human-readable sink lives with the terminal printer in
//! `presentation`.

mod json;

pub use json::JsonEventSink;
