use crate::lineage::builder::BuildSummary;
use crate::lineage::graph::DirectedLineageGraph;
use crate::lineage::sink::PathSink;
use crate::reports::formatters::{JsonFormatter, MarkdownFormatter, ReportFormatter, TextFormatter};
use crate::types::{GraphStatistics, Intervention, LineageNode};
use anyhow::{Context, Result};
use serde::Serialize;

/// Everything known about one path enumeration.
#[derive(Debug, Clone, Serialize)]
pub struct PathReport<N> {
    pub root: N,
    pub paths: Vec<Vec<N>>,
    pub statistics: GraphStatistics,
    pub interventions: Vec<Intervention<N>>,
    pub unmatched: Vec<N>,
}

impl<N: LineageNode> PathReport<N> {
    /// Enumerate paths from `root` through `sink` and capture the result.
    pub fn collect<S>(graph: &DirectedLineageGraph<N>, root: &N, sink: &mut S) -> Result<Self>
    where
        S: PathSink<N> + ?Sized,
    {
        let paths = graph
            .enumerate_paths(root, sink)
            .with_context(|| format!("Failed to enumerate lineage paths from {}", root))?;

        Ok(Self {
            root: root.clone(),
            paths,
            statistics: graph.statistics(),
            interventions: Vec::new(),
            unmatched: Vec::new(),
        })
    }

    pub fn with_summary(mut self, summary: BuildSummary<N>) -> Self {
        self.interventions = summary.interventions;
        self.unmatched = summary.unmatched;
        self
    }

    pub fn leaf_count(&self) -> usize {
        self.paths.len()
    }

    /// First path of maximal length.
    pub fn longest_path(&self) -> Option<&[N]> {
        self.paths.iter().rev().max_by_key(|path| path.len()).map(Vec::as_slice)
    }
}

/// Report generator for creating various output formats
#[derive(Debug, Default)]
pub struct ReportGenerator;

impl ReportGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Generate report in the specified format
    pub fn generate<N>(&self, report: &PathReport<N>, format: &str) -> Result<String>
    where
        N: LineageNode + Serialize,
    {
        match format.to_lowercase().as_str() {
            "json" => JsonFormatter.format(report),
            "markdown" => MarkdownFormatter.format(report),
            "text" => TextFormatter.format(report),
            _ => Err(anyhow::anyhow!("Unsupported format: {}", format)),
        }
    }
}
