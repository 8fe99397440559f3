//! Bandeq Core - Equalizer State Controller
//!
//! This crate provides the user-facing side of the Bandeq equalizer:
//! - The canonical gain curve, preset name and enabled flag
//! - Auto-enable, bypass and preset semantics on top of the filter chain
//! - Persistence through a string-keyed settings store
//! - Session setup from serializable configuration
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │                          UI events                            │
//! │      slider / toggle / preset ──▶ Equalizer ──▶ EqualizerState│
//! └───────────────────────────────────────────────────────────────┘
//!                  │ push curve             │ persist
//!                  ▼                        ▼
//!        FilterChain (bandeq_dsp)     SettingsStore
//!                  │
//!   Source ──▶ 8 peaking filters ──▶ Destination
//! ```
//!
//! Every operation is synchronous except resuming a suspended context.

mod codec;
mod config;
mod controller;
mod error;
mod session;
mod state;
mod store;

pub use codec::{
    decode_enabled, decode_gains, decode_preset_name, encode_enabled, encode_gains, DecodeError,
    BANDS_KEY, CUSTOM_PRESET_KEY, ENABLED_KEY, PRESET_KEY,
};
pub use config::{GraphConfig, SessionConfig, MAX_SAMPLE_RATE, MIN_SAMPLE_RATE};
pub use controller::Equalizer;
pub use error::{CoreError, CoreResult};
pub use session::Session;
pub use state::EqualizerState;
pub use store::{JsonFileStore, MemoryStore, SettingsStore};

// Re-export DSP types for convenience
pub use bandeq_dsp::{
    AudioGraph, Band, ContextState, FilterChain, GainVector, PresetCatalog, ProcessingGraph,
    SourceId, BAND_COUNT, BAND_FREQUENCIES, CUSTOM, FLAT,
};
