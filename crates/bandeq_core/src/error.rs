//! Core Error Types

use thiserror::Error;

/// Errors from settings storage and session setup
///
/// None of these escape the controller's user-facing operations; they are
/// logged and swallowed there.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Could not determine settings path")]
    NoSettingsPath,

    #[error("Settings I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Settings serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("DSP error: {0}")]
    Dsp(#[from] bandeq_dsp::DspError),
}

/// Result type alias for core operations
pub type CoreResult<T> = Result<T, CoreError>;
