//! Error types for host-level padforge operations.
//!
//! Script failures are not errors at this level: they are [`Fault`]s, which
//! the builder turns into a single error record. [`PadforgeError`] covers
//! what can go wrong around an evaluation, such as writing the records out.
//!
//! [`Fault`]: crate::Fault

use std::io;

use thiserror::Error;

/// The main error type for padforge host operations.
#[derive(Debug, Error)]
pub enum PadforgeError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}
