//! Session Configuration

use std::path::PathBuf;

use bandeq_dsp::{DspError, ProcessingGraph};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// Lowest sample rate that keeps the 15 kHz band below Nyquist
pub const MIN_SAMPLE_RATE: u32 = 32000;

pub const MAX_SAMPLE_RATE: u32 = 192000;

/// Audio graph configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphConfig {
    /// Sample rate in Hz (e.g., 44100, 48000, 96000)
    pub sample_rate: u32,

    /// Number of audio channels (1 = mono, 2 = stereo)
    pub channels: u16,

    /// Start the context suspended until the first user gesture resumes it
    pub start_suspended: bool,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            sample_rate: 48000,
            channels: 2,
            start_suspended: true,
        }
    }
}

impl GraphConfig {
    /// Validate configuration
    pub fn validate(&self) -> CoreResult<()> {
        if !(MIN_SAMPLE_RATE..=MAX_SAMPLE_RATE).contains(&self.sample_rate) {
            return Err(CoreError::Config(format!(
                "Invalid sample rate: {}",
                self.sample_rate
            )));
        }
        if self.channels == 0 || self.channels > 8 {
            return Err(CoreError::Config(format!(
                "Invalid channel count: {}",
                self.channels
            )));
        }
        Ok(())
    }

    /// Build the in-process graph described by this configuration
    pub fn build(&self) -> Result<ProcessingGraph, DspError> {
        let sample_rate = self.sample_rate as f32;
        let channels = self.channels as usize;
        if self.start_suspended {
            ProcessingGraph::suspended(sample_rate, channels)
        } else {
            ProcessingGraph::new(sample_rate, channels)
        }
    }
}

/// Overall session configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Audio graph configuration
    #[serde(default)]
    pub graph: GraphConfig,

    /// Settings file; the platform config dir is used when unset
    #[serde(default)]
    pub settings_path: Option<PathBuf>,
}

impl SessionConfig {
    pub fn validate(&self) -> CoreResult<()> {
        self.graph.validate()
    }
}
