//! 8-Band Filter Chain
//!
//! Owns eight peaking filters wired in series inside an [`AudioGraph`] and
//! routes bridged sources through them to the graph's destination.
//!
//! Bypass zeroes the live gains instead of rerouting around the chain, so
//! the graph topology never changes mid-stream.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use tracing::{debug, info, warn};

use crate::bands::{clamp_gain, GainVector, BAND_COUNT, BAND_FREQUENCIES, BAND_Q};
use crate::error::DspError;
use crate::graph::{AudioGraph, ContextState, NodeId, SourceId};

/// A graph together with the filter nodes built inside it
struct Wiring<G> {
    graph: G,
    filters: [NodeId; BAND_COUNT],
}

/// The equalizer engine
///
/// Holds no "desired" curve of its own. When bypassed the live gains read
/// back as 0 dB and the owner has to push the real curve again on enable.
pub struct FilterChain<G: AudioGraph> {
    wiring: Option<Wiring<G>>,
    bridges: HashMap<SourceId, NodeId>,
    enabled: bool,
}

impl<G: AudioGraph> Default for FilterChain<G> {
    fn default() -> Self {
        Self::new()
    }
}

impl<G: AudioGraph> FilterChain<G> {
    /// Create an engine with no graph attached
    pub fn new() -> Self {
        Self {
            wiring: None,
            bridges: HashMap::new(),
            enabled: false,
        }
    }

    /// Build the eight filters inside `graph` and wire them in series
    ///
    /// Replaces any previous graph along with its bridges. If the filters
    /// cannot be built the call has no effect.
    pub fn initialize(&mut self, graph: G) {
        match Self::build(graph) {
            Ok(wiring) => {
                info!(
                    "Filter chain initialized at {}Hz",
                    wiring.graph.sample_rate()
                );
                self.wiring = Some(wiring);
                self.bridges.clear();
            }
            Err(e) => warn!("Failed to build filter chain: {}", e),
        }
    }

    fn build(mut graph: G) -> Result<Wiring<G>, DspError> {
        let mut filters = Vec::with_capacity(BAND_COUNT);
        for frequency in BAND_FREQUENCIES {
            filters.push(graph.create_peaking_filter(frequency, BAND_Q)?);
        }
        for pair in filters.windows(2) {
            graph.connect(pair[0], pair[1])?;
        }

        let filters: [NodeId; BAND_COUNT] = core::array::from_fn(|i| filters[i]);
        Ok(Wiring { graph, filters })
    }

    pub fn is_initialized(&self) -> bool {
        self.wiring.is_some()
    }

    /// Route `source` through the chain to the destination
    ///
    /// Returns the bridge node, or the one created by an earlier call for the
    /// same source. `None` means the engine has no graph or bridging failed;
    /// the caller should play the source unprocessed.
    pub fn connect_source(&mut self, source: SourceId) -> Option<NodeId> {
        let wiring = self.wiring.as_mut()?;

        match self.bridges.entry(source) {
            Entry::Occupied(entry) => Some(*entry.get()),
            Entry::Vacant(entry) => match Self::bridge(wiring, source) {
                Ok(node) => {
                    debug!("Bridged source {:?} into filter chain", source);
                    Some(*entry.insert(node))
                }
                Err(e) => {
                    warn!("Failed to connect source {:?} to EQ: {}", source, e);
                    None
                }
            },
        }
    }

    fn bridge(wiring: &mut Wiring<G>, source: SourceId) -> Result<NodeId, DspError> {
        let head = wiring.filters[0];
        let tail = wiring.filters[BAND_COUNT - 1];
        let destination = wiring.graph.destination();

        // Existing nodes first, so a failure leaves no source registered
        wiring.graph.connect(tail, destination)?;
        let node = wiring.graph.create_source_node(source)?;
        wiring.graph.connect(node, head)?;
        Ok(node)
    }

    /// The bridge node previously created for `source`
    pub fn bridge_for(&self, source: SourceId) -> Option<NodeId> {
        self.bridges.get(&source).copied()
    }

    /// Set one band's live gain, clamped to the band range
    ///
    /// Out-of-range indices are ignored.
    pub fn set_band_gain(&mut self, index: usize, gain_db: f32) {
        let Some(wiring) = self.wiring.as_mut() else {
            return;
        };
        let Some(&node) = wiring.filters.get(index) else {
            return;
        };

        if let Err(e) = wiring.graph.set_filter_gain(node, clamp_gain(gain_db)) {
            warn!("Failed to set gain on band {}: {}", index, e);
        }
    }

    /// Set every band in order, clamping each value independently
    pub fn set_all_bands(&mut self, gains: &GainVector) {
        for (index, &gain) in gains.iter().enumerate() {
            self.set_band_gain(index, gain);
        }
    }

    /// Enable or bypass the chain
    ///
    /// Bypass forces every live gain to 0 dB immediately.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            for index in 0..BAND_COUNT {
                self.set_band_gain(index, 0.0);
            }
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Live gain of one band; 0 dB for out-of-range indices
    pub fn band_gain(&self, index: usize) -> f32 {
        self.wiring
            .as_ref()
            .and_then(|wiring| {
                let node = *wiring.filters.get(index)?;
                wiring.graph.filter_gain(node)
            })
            .unwrap_or(0.0)
    }

    /// Live gains of all bands
    pub fn gains(&self) -> GainVector {
        core::array::from_fn(|index| self.band_gain(index))
    }

    /// Resume the graph if it is suspended
    ///
    /// Audio does not flow through a suspended graph; await this before
    /// relying on output. Filter gains are unaffected.
    pub async fn resume_if_suspended(&mut self) {
        let Some(wiring) = self.wiring.as_mut() else {
            return;
        };
        if wiring.graph.state() == ContextState::Suspended {
            if let Err(e) = wiring.graph.resume().await {
                warn!("Failed to resume audio context: {}", e);
            }
        }
    }

    pub fn graph(&self) -> Option<&G> {
        self.wiring.as_ref().map(|wiring| &wiring.graph)
    }

    pub fn graph_mut(&mut self) -> Option<&mut G> {
        self.wiring.as_mut().map(|wiring| &mut wiring.graph)
    }

    /// Filter nodes in chain order
    pub fn filter_nodes(&self) -> Option<&[NodeId; BAND_COUNT]> {
        self.wiring.as_ref().map(|wiring| &wiring.filters)
    }
}
