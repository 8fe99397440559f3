//! Session Setup
//!
//! Builds a ready-to-use equalizer for one audio session: a fresh graph,
//! an initialized engine, the on-disk settings store, and the restored
//! state from the previous session.

use bandeq_dsp::{FilterChain, ProcessingGraph};
use tracing::info;

use crate::config::SessionConfig;
use crate::controller::Equalizer;
use crate::error::CoreResult;
use crate::store::JsonFileStore;

/// An equalizer backed by the in-process graph and a settings file
pub type Session = Equalizer<ProcessingGraph, JsonFileStore>;

impl Equalizer<ProcessingGraph, JsonFileStore> {
    /// Open a session from configuration
    pub fn open(config: &SessionConfig) -> CoreResult<Self> {
        config.validate()?;

        let store = match &config.settings_path {
            Some(path) => JsonFileStore::open(path)?,
            None => JsonFileStore::open_default()?,
        };

        let mut engine = FilterChain::new();
        engine.initialize(config.graph.build()?);

        let mut equalizer = Equalizer::new(engine, store);
        equalizer.restore();

        info!("EQ session opened with settings at {:?}", equalizer.store().path());
        Ok(equalizer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GraphConfig;
    use crate::error::CoreError;

    #[test]
    fn test_open_rejects_invalid_config() {
        let config = SessionConfig {
            graph: GraphConfig {
                sample_rate: 8000,
                ..Default::default()
            },
            settings_path: None,
        };
        assert!(matches!(Session::open(&config), Err(CoreError::Config(_))));
    }

    #[test]
    fn test_open_fresh_session() {
        let dir = tempfile::tempdir().unwrap();
        let config = SessionConfig {
            settings_path: Some(dir.path().join("settings.json")),
            ..Default::default()
        };

        let session = Session::open(&config).unwrap();
        assert!(session.engine().is_initialized());
        assert!(!session.is_enabled());
        assert_eq!(session.current_preset(), "Flat");
    }
}
