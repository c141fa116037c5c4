pub mod builder;
pub mod graph;
pub mod sink;
pub mod storage;
pub mod traversal;

pub use builder::{BuildSummary, LineageBuilder, LineageManifest};
pub use graph::DirectedLineageGraph;
pub use sink::{ConsoleSink, DiscardSink, FileSink, PathCollector, PathSink, Tee};
pub use traversal::GraphTraversal;
