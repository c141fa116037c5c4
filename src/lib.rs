//! Lineage tree inference over a directed ownership graph.
//!
//! A [`DirectedLineageGraph`] is built incrementally: observed ownerships add
//! edges, and [`DirectedLineageGraph::intervene`] slots a new node between an
//! existing owner and the subset of children it now owns. Once built, every
//! root-to-leaf lineage can be enumerated into a caller-supplied
//! [`PathSink`].

pub mod config;
pub mod error;
pub mod lineage;
pub mod reports;
pub mod telemetry;
pub mod types;

pub use config::{GraphSettings, LineageConfig, OutputSettings};
pub use error::{LineageError, Result};
pub use lineage::{
    DirectedLineageGraph, FileSink, GraphTraversal, LineageBuilder, LineageManifest, PathCollector,
    PathSink,
};
pub use types::{GraphStatistics, Intervention, LineageNode, Observation};
