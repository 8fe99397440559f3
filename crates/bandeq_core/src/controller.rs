//! Equalizer State Controller
//!
//! The single source of truth for the user-facing equalizer configuration.
//! Every intent is clamped into range, applied to the canonical state,
//! pushed into the [`FilterChain`] when the equalizer is enabled, and then
//! mirrored into the settings store.
//!
//! ```text
//!   intent ──▶ Equalizer (clamp, update) ──▶ FilterChain (if enabled)
//!                       │
//!                       └──▶ SettingsStore (always, failures logged)
//! ```

use bandeq_dsp::{
    clamp_gain, is_modified, AudioGraph, FilterChain, GainVector, NodeId, PresetCatalog,
    SourceId, CUSTOM, FLAT, FLAT_GAINS,
};
use tracing::{debug, info, warn};

use crate::codec::{self, DecodeError};
use crate::codec::{BANDS_KEY, CUSTOM_PRESET_KEY, ENABLED_KEY, PRESET_KEY};
use crate::error::CoreResult;
use crate::state::EqualizerState;
use crate::store::SettingsStore;

/// Equalizer controller owning one engine and one settings store
pub struct Equalizer<G: AudioGraph, S: SettingsStore> {
    engine: FilterChain<G>,
    store: S,
    catalog: PresetCatalog,
    enabled: bool,
    bands: GainVector,
    current_preset: String,
}

impl<G: AudioGraph, S: SettingsStore> Equalizer<G, S> {
    /// Create a disabled, flat controller using the built-in presets
    pub fn new(engine: FilterChain<G>, store: S) -> Self {
        Self::with_catalog(engine, store, PresetCatalog::builtin())
    }

    pub fn with_catalog(engine: FilterChain<G>, store: S, catalog: PresetCatalog) -> Self {
        Self {
            engine,
            store,
            catalog,
            enabled: false,
            bands: FLAT_GAINS,
            current_preset: FLAT.to_string(),
        }
    }

    /// Set one band from a user edit
    ///
    /// A non-zero edit while disabled turns the equalizer on. Editing a band
    /// makes the curve "Custom".
    pub fn set_band_gain(&mut self, index: usize, gain_db: f32) {
        let Some(slot) = self.bands.get_mut(index) else {
            return;
        };

        let gain_db = clamp_gain(gain_db);
        if *slot != gain_db {
            *slot = gain_db;
            self.current_preset = CUSTOM.to_string();
        }

        if !self.enabled && gain_db != 0.0 {
            debug!("Auto-enabling EQ on band {} edit", index);
            self.enabled = true;
            self.engine.set_enabled(true);
        }
        // Only the edited band is pushed; other bands keep their live gains
        if self.enabled {
            self.engine.set_band_gain(index, gain_db);
        }

        self.persist();
    }

    /// Flip between enabled and bypassed
    ///
    /// The stored curve survives bypass and is pushed again on enable.
    pub fn toggle_enabled(&mut self) {
        self.enabled = !self.enabled;

        if self.enabled {
            self.engine.set_enabled(true);
            self.engine.set_all_bands(&self.bands);
        } else {
            self.engine.set_enabled(false);
        }

        self.persist();
    }

    /// Replace the curve with a catalog preset
    ///
    /// Unknown names load the catalog default's curve but are still recorded
    /// as the current preset. A non-flat preset turns the equalizer on.
    pub fn load_preset(&mut self, name: &str) {
        let preset = self.catalog.lookup(name);
        if preset.name != name {
            warn!("Unknown preset {:?}, using {:?} gains", name, preset.name);
        }
        self.bands = preset.gains;
        self.current_preset = name.to_string();

        if is_modified(&self.bands) && !self.enabled {
            self.enabled = true;
        }

        self.apply_if_enabled();
        self.persist();
    }

    /// Flatten the curve without touching the enabled flag
    pub fn reset(&mut self) {
        self.bands = FLAT_GAINS;
        self.current_preset = FLAT.to_string();

        if self.enabled {
            self.engine.set_all_bands(&self.bands);
        }

        self.persist();
    }

    /// Reload state from the settings store
    ///
    /// Each key is restored independently: a missing or malformed value
    /// leaves that field as it was.
    pub fn restore(&mut self) {
        if let Some(enabled) = self.read(ENABLED_KEY, codec::decode_enabled) {
            self.enabled = enabled;
        }
        if let Some(bands) = self.read(BANDS_KEY, codec::decode_gains) {
            self.bands = bands;
        }
        if let Some(name) = self.read(PRESET_KEY, codec::decode_preset_name) {
            self.current_preset = name;
        }

        self.apply_if_enabled();
        info!(
            "EQ settings restored (enabled: {}, preset: {})",
            self.enabled, self.current_preset
        );
    }

    /// Load the saved "Custom" curve, if one exists
    ///
    /// Returns false and leaves state untouched otherwise. Neither pushes to
    /// the engine nor persists.
    pub fn restore_custom_preset(&mut self) -> bool {
        match self.read(CUSTOM_PRESET_KEY, codec::decode_gains) {
            Some(gains) => {
                self.bands = gains;
                self.current_preset = CUSTOM.to_string();
                true
            }
            None => false,
        }
    }

    /// Bridge an audio source through the engine
    ///
    /// `None` means the source should be played unprocessed.
    pub fn connect_source(&mut self, source: SourceId) -> Option<NodeId> {
        self.engine.connect_source(source)
    }

    /// Resume the engine's audio context if it is suspended
    pub async fn resume(&mut self) {
        self.engine.resume_if_suspended().await;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// The canonical curve (not the live engine gains)
    pub fn bands(&self) -> &GainVector {
        &self.bands
    }

    /// Stored gain of one band; 0 dB for out-of-range indices
    pub fn band_gain(&self, index: usize) -> f32 {
        self.bands.get(index).copied().unwrap_or(0.0)
    }

    pub fn current_preset(&self) -> &str {
        &self.current_preset
    }

    /// True if any band deviates from 0 dB
    pub fn is_modified(&self) -> bool {
        is_modified(&self.bands)
    }

    /// Catalog preset names, in catalog order
    pub fn available_presets(&self) -> Vec<&str> {
        self.catalog.names()
    }

    pub fn catalog(&self) -> &PresetCatalog {
        &self.catalog
    }

    pub fn engine(&self) -> &FilterChain<G> {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut FilterChain<G> {
        &mut self.engine
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Snapshot for the UI
    pub fn state(&self) -> EqualizerState {
        EqualizerState::new(
            self.enabled,
            &self.bands,
            &self.current_preset,
            self.available_presets(),
        )
    }

    fn apply_if_enabled(&mut self) {
        if self.enabled {
            self.engine.set_enabled(true);
            self.engine.set_all_bands(&self.bands);
        }
    }

    fn read<T>(&self, key: &str, decode: fn(&str) -> Result<T, DecodeError>) -> Option<T> {
        let raw = match self.store.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!("Failed to read {} from settings: {}", key, e);
                return None;
            }
        };

        match decode(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Ignoring persisted {}: {}", key, e);
                None
            }
        }
    }

    fn persist(&mut self) {
        if let Err(e) = self.write_settings() {
            warn!("Failed to save EQ settings: {}", e);
        }
    }

    fn write_settings(&mut self) -> CoreResult<()> {
        let bands = codec::encode_gains(&self.bands)?;

        self.store
            .set(ENABLED_KEY, &codec::encode_enabled(self.enabled))?;
        self.store.set(BANDS_KEY, &bands)?;
        self.store.set(PRESET_KEY, &self.current_preset)?;

        if self.current_preset == CUSTOM {
            self.store.set(CUSTOM_PRESET_KEY, &bands)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use crate::store::MemoryStore;
    use bandeq_dsp::{ProcessingGraph, BAND_COUNT};

    type TestEqualizer = Equalizer<ProcessingGraph, MemoryStore>;

    fn equalizer() -> TestEqualizer {
        equalizer_with(MemoryStore::new())
    }

    fn equalizer_with(store: MemoryStore) -> TestEqualizer {
        let mut engine = FilterChain::new();
        engine.initialize(ProcessingGraph::new(48000.0, 2).unwrap());
        Equalizer::new(engine, store)
    }

    /// Store whose writes always fail
    #[derive(Default)]
    struct ReadOnlyStore;

    impl SettingsStore for ReadOnlyStore {
        fn get(&self, _key: &str) -> CoreResult<Option<String>> {
            Ok(None)
        }

        fn set(&mut self, _key: &str, _value: &str) -> CoreResult<()> {
            Err(CoreError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "read-only",
            )))
        }
    }

    #[test]
    fn test_defaults() {
        let eq = equalizer();
        assert!(!eq.is_enabled());
        assert_eq!(eq.bands(), &[0.0; BAND_COUNT]);
        assert_eq!(eq.current_preset(), "Flat");
        assert!(!eq.is_modified());
    }

    #[test]
    fn test_set_band_gain_clamps() {
        let mut eq = equalizer();
        for (input, expected) in [(5.0, 5.0), (40.0, 12.0), (-40.0, -12.0), (-7.25, -7.25)] {
            eq.set_band_gain(2, input);
            assert_eq!(eq.band_gain(2), expected);
        }
    }

    #[test]
    fn test_set_band_gain_out_of_range_index() {
        let mut eq = equalizer();
        eq.set_band_gain(8, 5.0);
        eq.set_band_gain(usize::MAX, 5.0);

        assert_eq!(eq.bands(), &[0.0; BAND_COUNT]);
        assert!(!eq.is_enabled());
        assert!(eq.store().is_empty());
    }

    #[test]
    fn test_auto_enable_on_first_edit() {
        let mut eq = equalizer();
        eq.set_band_gain(3, 5.0);

        assert!(eq.is_enabled());
        assert!(eq.engine().is_enabled());
        assert_eq!(eq.band_gain(3), 5.0);
        assert_eq!(eq.engine().band_gain(3), 5.0);
    }

    #[test]
    fn test_zero_edit_does_not_enable() {
        let mut eq = equalizer();
        eq.set_band_gain(3, 0.0);

        assert!(!eq.is_enabled());
        assert!(!eq.engine().is_enabled());
    }

    #[test]
    fn test_edits_while_enabled_reach_engine() {
        let mut eq = equalizer();
        eq.set_band_gain(0, 3.0);
        eq.set_band_gain(7, -4.0);
        eq.set_band_gain(0, 0.0);

        assert!(eq.is_enabled());
        assert_eq!(eq.engine().gains(), *eq.bands());
    }

    #[test]
    fn test_edit_marks_custom() {
        let mut eq = equalizer();
        eq.load_preset("Rock");
        eq.set_band_gain(4, 1.0);

        assert_eq!(eq.current_preset(), CUSTOM);
        assert_eq!(
            eq.store().get(CUSTOM_PRESET_KEY).unwrap().as_deref(),
            Some("[5.0,3.0,-1.0,-2.0,1.0,2.0,4.0,5.0]")
        );
    }

    #[test]
    fn test_toggle_bypasses_and_restores() {
        let mut eq = equalizer();
        eq.load_preset("Jazz");
        let jazz = *eq.bands();
        assert_eq!(eq.engine().gains(), jazz);

        eq.toggle_enabled();
        assert!(!eq.is_enabled());
        assert_eq!(eq.engine().gains(), [0.0; BAND_COUNT]);
        // Stored curve survives the bypass
        assert_eq!(eq.bands(), &jazz);

        eq.toggle_enabled();
        assert!(eq.is_enabled());
        assert_eq!(eq.engine().gains(), jazz);
    }

    #[test]
    fn test_auto_enable_pushes_only_edited_band() {
        let mut eq = equalizer();
        eq.set_band_gain(0, 6.0);
        eq.toggle_enabled();
        eq.set_band_gain(1, 2.0);

        assert!(eq.is_enabled());
        assert_eq!(eq.engine().gains(), [0.0, 2.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
        // The stored curve still holds the earlier edit
        assert_eq!(eq.band_gain(0), 6.0);
    }

    #[test]
    fn test_load_preset() {
        let mut eq = equalizer();
        eq.load_preset("Rock");

        assert_eq!(eq.bands(), &[5.0, 3.0, -1.0, -2.0, 0.0, 2.0, 4.0, 5.0]);
        assert_eq!(eq.current_preset(), "Rock");
        assert!(eq.is_enabled());
        assert!(eq.engine().is_enabled());
        assert_eq!(eq.engine().gains(), *eq.bands());
    }

    #[test]
    fn test_load_unknown_preset_uses_flat_curve() {
        let mut eq = equalizer();
        eq.load_preset("Rock");
        eq.load_preset("Nonexistent");

        assert_eq!(eq.bands(), &[0.0; BAND_COUNT]);
        assert_eq!(eq.current_preset(), "Nonexistent");
        assert_eq!(
            eq.store().get(PRESET_KEY).unwrap().as_deref(),
            Some("Nonexistent")
        );
        assert_eq!(eq.engine().gains(), [0.0; BAND_COUNT]);
        // Flat does not disable
        assert!(eq.is_enabled());
    }

    #[test]
    fn test_load_flat_preset_stays_disabled() {
        let mut eq = equalizer();
        eq.load_preset("Flat");
        assert!(!eq.is_enabled());
        assert_eq!(eq.current_preset(), "Flat");
    }

    #[test]
    fn test_reset() {
        let mut eq = equalizer();
        eq.load_preset("Bass Boost");
        assert!(eq.is_modified());

        eq.reset();
        assert_eq!(eq.bands(), &[0.0; BAND_COUNT]);
        assert_eq!(eq.current_preset(), "Flat");
        assert!(!eq.is_modified());
        assert!(eq.is_enabled());
        assert_eq!(eq.engine().gains(), [0.0; BAND_COUNT]);
    }

    #[test]
    fn test_reset_while_disabled_keeps_flag() {
        let mut eq = equalizer();
        eq.reset();
        assert!(!eq.is_enabled());
        assert!(!eq.engine().is_enabled());
    }

    #[test]
    fn test_every_change_is_persisted() {
        let mut eq = equalizer();
        eq.load_preset("Pop");

        let store = eq.store();
        assert_eq!(store.get(ENABLED_KEY).unwrap().as_deref(), Some("true"));
        assert_eq!(store.get(PRESET_KEY).unwrap().as_deref(), Some("Pop"));
        assert_eq!(
            codec::decode_gains(&store.get(BANDS_KEY).unwrap().unwrap()).unwrap(),
            [-1.0, 2.0, 4.0, 4.0, 2.0, -1.0, -2.0, -2.0]
        );
        // Only written for custom curves
        assert_eq!(store.get(CUSTOM_PRESET_KEY).unwrap(), None);
    }

    #[test]
    fn test_persistence_round_trip() {
        let mut eq = equalizer();
        eq.set_band_gain(0, 2.0);
        eq.set_band_gain(1, -2.0);
        let saved = eq.store().clone();

        let mut restored = equalizer_with(saved);
        restored.restore();

        assert!(restored.is_enabled());
        assert_eq!(restored.bands(), &[2.0, -2.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
        assert_eq!(restored.current_preset(), "Custom");
        assert_eq!(restored.engine().gains(), *restored.bands());
    }

    #[test]
    fn test_restore_skips_corrupt_bands_only() {
        let mut store = MemoryStore::new();
        store.set(ENABLED_KEY, "true").unwrap();
        store.set(BANDS_KEY, "[2, -2, 0, oops").unwrap();
        store.set(PRESET_KEY, "Custom").unwrap();

        let mut eq = equalizer_with(store);
        eq.restore();

        assert!(eq.is_enabled());
        assert_eq!(eq.current_preset(), "Custom");
        assert_eq!(eq.bands(), &[0.0; BAND_COUNT]);
    }

    #[test]
    fn test_restore_rejects_wrong_length() {
        let mut store = MemoryStore::new();
        store.set(BANDS_KEY, "[1, 2, 3]").unwrap();

        let mut eq = equalizer_with(store);
        eq.restore();
        assert_eq!(eq.bands(), &[0.0; BAND_COUNT]);
    }

    #[test]
    fn test_restore_keeps_prior_values_for_missing_keys() {
        let mut eq = equalizer();
        eq.load_preset("Rock");
        let mut store_only_flag = MemoryStore::new();
        store_only_flag.set(ENABLED_KEY, "false").unwrap();
        eq.store = store_only_flag;

        eq.restore();
        assert!(!eq.is_enabled());
        assert_eq!(eq.current_preset(), "Rock");
        assert_eq!(eq.bands(), &[5.0, 3.0, -1.0, -2.0, 0.0, 2.0, 4.0, 5.0]);
    }

    #[test]
    fn test_restore_disabled_does_not_push() {
        let mut store = MemoryStore::new();
        store.set(ENABLED_KEY, "false").unwrap();
        store.set(BANDS_KEY, "[6, 6, 6, 6, 6, 6, 6, 6]").unwrap();

        let mut eq = equalizer_with(store);
        eq.restore();

        assert_eq!(eq.bands(), &[6.0; BAND_COUNT]);
        assert_eq!(eq.engine().gains(), [0.0; BAND_COUNT]);
    }

    #[test]
    fn test_restore_custom_preset() {
        let mut store = MemoryStore::new();
        store
            .set(CUSTOM_PRESET_KEY, "[1, 1, 1, 1, -1, -1, -1, -1]")
            .unwrap();

        let mut eq = equalizer_with(store);
        assert!(eq.restore_custom_preset());
        assert_eq!(eq.current_preset(), CUSTOM);
        assert_eq!(eq.bands(), &[1.0, 1.0, 1.0, 1.0, -1.0, -1.0, -1.0, -1.0]);
        // Caller decides when to push
        assert_eq!(eq.engine().gains(), [0.0; BAND_COUNT]);
        assert_eq!(eq.store().len(), 1);
    }

    #[test]
    fn test_restore_custom_preset_missing_or_malformed() {
        let mut eq = equalizer();
        eq.load_preset("Rock");
        assert!(!eq.restore_custom_preset());
        assert_eq!(eq.current_preset(), "Rock");

        let mut store = MemoryStore::new();
        store.set(CUSTOM_PRESET_KEY, "[1, 2]").unwrap();
        let mut eq = equalizer_with(store);
        assert!(!eq.restore_custom_preset());
        assert_eq!(eq.current_preset(), "Flat");
    }

    #[test]
    fn test_storage_failure_does_not_block_changes() {
        let mut engine = FilterChain::new();
        engine.initialize(ProcessingGraph::new(48000.0, 2).unwrap());
        let mut eq = Equalizer::new(engine, ReadOnlyStore);

        eq.set_band_gain(5, 4.0);
        assert!(eq.is_enabled());
        assert_eq!(eq.band_gain(5), 4.0);
        assert_eq!(eq.engine().band_gain(5), 4.0);

        eq.restore();
        assert_eq!(eq.band_gain(5), 4.0);
    }

    #[test]
    fn test_available_presets() {
        let eq = equalizer();
        let names = eq.available_presets();
        assert_eq!(names.len(), bandeq_dsp::PRESETS.len());
        assert_eq!(names[0], "Flat");
        assert!(names.contains(&"Rock"));
    }

    #[test]
    fn test_connect_source_through_controller() {
        let mut eq = equalizer();
        let first = eq.connect_source(SourceId(1));
        assert!(first.is_some());
        assert_eq!(eq.connect_source(SourceId(1)), first);
    }

    #[test]
    fn test_uninitialized_engine_is_tolerated() {
        let mut eq: TestEqualizer = Equalizer::new(FilterChain::new(), MemoryStore::new());
        eq.set_band_gain(1, 3.0);
        eq.load_preset("Rock");

        assert_eq!(eq.current_preset(), "Rock");
        assert_eq!(eq.connect_source(SourceId(1)), None);
        assert_eq!(eq.engine().gains(), [0.0; BAND_COUNT]);
    }
}
