//! Audio Graph
//!
//! The filter chain does not own an audio backend. It talks to an
//! [`AudioGraph`]: something that can create peaking filter nodes and source
//! bridge nodes, wire nodes together, and expose a terminal destination plus
//! a suspended/running state.
//!
//! [`ProcessingGraph`] is the in-process implementation. It renders
//! interleaved audio by walking a bridged source through its outgoing edges
//! until it reaches the destination.
//!
//! ```text
//!   Source ──▶ Filter(60) ──▶ Filter(150) ──▶ … ──▶ Filter(15k) ──▶ Destination
//! ```

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::DspError;
use crate::filter::PeakingFilter;

/// Identifier of a node inside one graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Identity of an external audio-producing handle (a player, a decoder, ...)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceId(pub u64);

/// Running state of an audio context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContextState {
    /// No audio flows until the context is resumed
    Suspended,
    Running,
}

/// Trait for the audio processing context the filter chain is built against
///
/// Implementations must never create a duplicate edge: connecting two nodes
/// that are already connected is a no-op.
#[allow(async_fn_in_trait)]
pub trait AudioGraph {
    /// Sample rate of the context in Hz
    fn sample_rate(&self) -> f32;

    fn state(&self) -> ContextState;

    /// Resume a suspended context
    async fn resume(&mut self) -> Result<(), DspError>;

    /// Create a peaking filter node at 0 dB
    fn create_peaking_filter(&mut self, frequency: f32, q: f32) -> Result<NodeId, DspError>;

    /// Set a filter node's live gain in dB
    fn set_filter_gain(&mut self, node: NodeId, gain_db: f32) -> Result<(), DspError>;

    /// Read a filter node's live gain in dB
    fn filter_gain(&self, node: NodeId) -> Option<f32>;

    /// Create the node that bridges `source` into the graph
    ///
    /// Fails if the source already has a bridge in this graph.
    fn create_source_node(&mut self, source: SourceId) -> Result<NodeId, DspError>;

    /// Connect the output of `from` to the input of `to`
    ///
    /// Must not fail for two nodes this graph has returned.
    fn connect(&mut self, from: NodeId, to: NodeId) -> Result<(), DspError>;

    /// The terminal output sink
    fn destination(&self) -> NodeId;
}

enum Node {
    Destination,
    Source(SourceId),
    Filter(PeakingFilter),
}

/// In-process audio graph rendering interleaved `f32` buffers
pub struct ProcessingGraph {
    sample_rate: f32,
    channels: usize,
    state: ContextState,
    nodes: Vec<Node>,
    edges: Vec<(NodeId, NodeId)>,
    sources: HashMap<SourceId, NodeId>,
}

impl ProcessingGraph {
    /// Create a running graph holding only its destination node
    pub fn new(sample_rate: f32, channels: usize) -> Result<Self, DspError> {
        if sample_rate.is_nan() || sample_rate <= 0.0 {
            return Err(DspError::InvalidSampleRate(sample_rate));
        }
        if channels == 0 {
            return Err(DspError::InvalidChannelCount(channels));
        }

        Ok(Self {
            sample_rate,
            channels,
            state: ContextState::Running,
            nodes: vec![Node::Destination],
            edges: Vec::new(),
            sources: HashMap::new(),
        })
    }

    /// Create a graph that starts suspended, as contexts do on platforms
    /// that wait for a user gesture
    pub fn suspended(sample_rate: f32, channels: usize) -> Result<Self, DspError> {
        let mut graph = Self::new(sample_rate, channels)?;
        graph.state = ContextState::Suspended;
        Ok(graph)
    }

    /// Put the context to sleep
    pub fn suspend(&mut self) {
        self.state = ContextState::Suspended;
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_connected(&self, from: NodeId, to: NodeId) -> bool {
        self.edges.contains(&(from, to))
    }

    /// Render one buffer of `source` audio in place
    ///
    /// The buffer is interleaved with [`channels`](Self::channels) channels.
    /// It is silenced when the context is suspended or when the source has
    /// no path to the destination.
    pub fn render(&mut self, source: SourceId, buffer: &mut [f32]) -> Result<(), DspError> {
        let start = *self
            .sources
            .get(&source)
            .ok_or(DspError::SourceNotBridged(source.0))?;

        if self.state == ContextState::Suspended {
            buffer.fill(0.0);
            return Ok(());
        }

        let mut current = start;
        // A path can visit each node at most once
        for _ in 0..self.nodes.len() {
            let Some(next) = self.next_node(current) else {
                break;
            };
            match &mut self.nodes[next.0] {
                Node::Destination => return Ok(()),
                Node::Filter(filter) => filter.process_interleaved(buffer),
                Node::Source(other) => {
                    debug!("Path of source {:?} runs into source {:?}", source, other);
                    break;
                }
            }
            current = next;
        }

        buffer.fill(0.0);
        Ok(())
    }

    fn next_node(&self, from: NodeId) -> Option<NodeId> {
        self.edges
            .iter()
            .find(|(output, _)| *output == from)
            .map(|(_, input)| *input)
    }

    fn filter(&self, node: NodeId) -> Result<&PeakingFilter, DspError> {
        match self.nodes.get(node.0) {
            Some(Node::Filter(filter)) => Ok(filter),
            Some(_) => Err(DspError::NotAFilter(node.0)),
            None => Err(DspError::UnknownNode(node.0)),
        }
    }

    fn filter_mut(&mut self, node: NodeId) -> Result<&mut PeakingFilter, DspError> {
        match self.nodes.get_mut(node.0) {
            Some(Node::Filter(filter)) => Ok(filter),
            Some(_) => Err(DspError::NotAFilter(node.0)),
            None => Err(DspError::UnknownNode(node.0)),
        }
    }

    fn push(&mut self, node: Node) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }
}

impl AudioGraph for ProcessingGraph {
    fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    fn state(&self) -> ContextState {
        self.state
    }

    async fn resume(&mut self) -> Result<(), DspError> {
        if self.state == ContextState::Suspended {
            debug!("Resuming processing graph");
            self.state = ContextState::Running;
        }
        Ok(())
    }

    fn create_peaking_filter(&mut self, frequency: f32, q: f32) -> Result<NodeId, DspError> {
        let filter = PeakingFilter::new(frequency, q, self.sample_rate, self.channels)?;
        Ok(self.push(Node::Filter(filter)))
    }

    fn set_filter_gain(&mut self, node: NodeId, gain_db: f32) -> Result<(), DspError> {
        self.filter_mut(node)?.set_gain_db(gain_db)
    }

    fn filter_gain(&self, node: NodeId) -> Option<f32> {
        self.filter(node).ok().map(PeakingFilter::gain_db)
    }

    fn create_source_node(&mut self, source: SourceId) -> Result<NodeId, DspError> {
        if self.sources.contains_key(&source) {
            return Err(DspError::SourceAlreadyBridged(source.0));
        }
        let node = self.push(Node::Source(source));
        self.sources.insert(source, node);
        Ok(node)
    }

    fn connect(&mut self, from: NodeId, to: NodeId) -> Result<(), DspError> {
        for node in [from, to] {
            if node.0 >= self.nodes.len() {
                return Err(DspError::UnknownNode(node.0));
            }
        }
        if !self.is_connected(from, to) {
            self.edges.push((from, to));
        }
        Ok(())
    }

    fn destination(&self) -> NodeId {
        NodeId(0)
    }
}
