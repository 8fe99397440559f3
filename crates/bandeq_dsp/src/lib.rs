//! Bandeq DSP - Filter Chain Engine
//!
//! This crate provides the audio side of the Bandeq equalizer:
//! - Fixed 8-band layout (60 Hz .. 15 kHz) with a ±12 dB gain range
//! - Peaking BiQuad filters chained in band order
//! - An [`AudioGraph`] seam plus an in-process [`ProcessingGraph`]
//! - Idempotent source bridging and click-free bypass
//! - The built-in preset catalog
//!
//! # Architecture
//!
//! [`FilterChain`] never reads persisted state. It is a sink driven by the
//! owning controller, which pushes gain vectors into it.

mod bands;
mod chain;
mod error;
mod filter;
mod graph;
mod presets;

pub use bands::{
    clamp_gain, clamp_gains, format_frequency, is_modified, Band, GainVector, BAND_COUNT,
    BAND_FREQUENCIES, BAND_Q, FLAT_GAINS, MAX_GAIN_DB, MIN_GAIN_DB,
};
pub use chain::FilterChain;
pub use error::DspError;
pub use filter::PeakingFilter;
pub use graph::{AudioGraph, ContextState, NodeId, ProcessingGraph, SourceId};
pub use presets::{Preset, PresetCatalog, CUSTOM, FLAT, PRESETS};
