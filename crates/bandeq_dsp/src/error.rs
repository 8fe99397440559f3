//! DSP Error Types

use thiserror::Error;

/// Errors that can occur while building or driving the filter chain
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DspError {
    #[error("Invalid filter coefficients for frequency {frequency}Hz at sample rate {sample_rate}Hz")]
    InvalidCoefficients { frequency: f32, sample_rate: f32 },

    #[error("Sample rate must be positive, got {0}")]
    InvalidSampleRate(f32),

    #[error("Channel count must be at least 1, got {0}")]
    InvalidChannelCount(usize),

    #[error("Unknown graph node: {0}")]
    UnknownNode(usize),

    #[error("Node {0} is not a filter")]
    NotAFilter(usize),

    #[error("Source {0} is already bridged into this graph")]
    SourceAlreadyBridged(u64),

    #[error("Source {0} is not bridged into this graph")]
    SourceNotBridged(u64),

    #[error("Invalid preset: {0}")]
    InvalidPreset(String),
}
