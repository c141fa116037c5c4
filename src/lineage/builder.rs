use crate::config::GraphSettings;
use crate::error::Result as LineageResult;
use crate::lineage::graph::DirectedLineageGraph;
use crate::types::{Intervention, LineageNode, Observation};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, warn};

/// Input document for building a lineage graph from observations.
///
/// `seed` edges are applied verbatim; `observations` are applied in order,
/// each one adding its edges and then inserting its parent beneath the first
/// node that already owns all of its children.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineageManifest {
    #[serde(default)]
    pub seed: Vec<Observation<String>>,
    #[serde(default)]
    pub observations: Vec<Observation<String>>,
}

impl LineageManifest {
    /// Load a manifest from a `.json` file, or YAML for any other extension.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading lineage manifest from: {:?}", path);

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read lineage manifest from {:?}", path))?;

        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        let manifest: LineageManifest = if is_json {
            serde_json::from_str(&content).with_context(|| "Failed to parse JSON lineage manifest")?
        } else {
            serde_yaml::from_str(&content).with_context(|| "Failed to parse YAML lineage manifest")?
        };

        info!(
            "Loaded lineage manifest with {} seed entries and {} observations",
            manifest.seed.len(),
            manifest.observations.len()
        );
        Ok(manifest)
    }
}

/// Outcome of applying a batch of observations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildSummary<N> {
    pub interventions: Vec<Intervention<N>>,
    /// Observation parents for which no owning ancestor existed.
    pub unmatched: Vec<N>,
}

impl<N> Default for BuildSummary<N> {
    fn default() -> Self {
        Self {
            interventions: Vec::new(),
            unmatched: Vec::new(),
        }
    }
}

/// Incrementally builds a lineage tree from ownership observations.
#[derive(Debug)]
pub struct LineageBuilder<N> {
    graph: DirectedLineageGraph<N>,
    summary: BuildSummary<N>,
}

impl<N: LineageNode> Default for LineageBuilder<N> {
    fn default() -> Self {
        Self::with_graph(DirectedLineageGraph::new())
    }
}

impl<N: LineageNode> LineageBuilder<N> {
    pub fn new(settings: &GraphSettings) -> Self {
        Self::with_graph(DirectedLineageGraph::from_settings(settings))
    }

    pub fn with_graph(graph: DirectedLineageGraph<N>) -> Self {
        Self {
            graph,
            summary: BuildSummary::default(),
        }
    }

    pub fn graph(&self) -> &DirectedLineageGraph<N> {
        &self.graph
    }

    /// Add `parent -> child` for every child without any rewiring.
    pub fn seed(&mut self, parent: N, children: &[N]) -> LineageResult<()> {
        self.graph.add_node(parent.clone());
        for child in children {
            self.graph.add_edge(parent.clone(), child.clone())?;
        }
        Ok(())
    }

    /// Apply one observation: `parent` owns every node in `children`.
    ///
    /// In the default mode the edges are added first and `intervene` then
    /// detaches the children from their previous owner. When no owner is
    /// found, the new edges to children that already had a parent are taken
    /// back out again. A strict graph forbids the transient double ownership,
    /// so the rewiring happens first and the edges are added afterwards.
    pub fn observe(
        &mut self,
        observation: Observation<N>,
    ) -> LineageResult<Option<Intervention<N>>> {
        let Observation { parent, children } = observation;

        let intervention = if self.graph.is_strict() {
            let intervention = self.graph.intervene(parent.clone(), &children);
            self.seed(parent.clone(), &children)?;
            intervention
        } else {
            let mut added: Vec<N> = Vec::new();
            for child in &children {
                if !self.graph.has_edge(&parent, child) && !added.contains(child) {
                    added.push(child.clone());
                }
            }

            self.seed(parent.clone(), &children)?;
            let intervention = self.graph.intervene(parent.clone(), &children);
            if intervention.is_none() {
                self.detach_contested(&parent, &added)?;
            }
            intervention
        };

        match &intervention {
            Some(applied) => self.summary.interventions.push(applied.clone()),
            None => {
                debug!("Observation for {} matched no ancestor", parent);
                self.summary.unmatched.push(parent);
            }
        }

        Ok(intervention)
    }

    /// Drop `parent -> child` for every child that is also owned elsewhere.
    fn detach_contested(&mut self, parent: &N, added: &[N]) -> LineageResult<()> {
        for child in added {
            if self.graph.parents(child).len() > 1 {
                warn!("Dropping edge {} -> {}: child already has a parent", parent, child);
                self.graph.remove_edge(parent, child)?;
            }
        }
        Ok(())
    }

    pub fn finish(self) -> (DirectedLineageGraph<N>, BuildSummary<N>) {
        info!(
            "Lineage graph built with {} nodes, {} edges and {} interventions",
            self.graph.node_count(),
            self.graph.edge_count(),
            self.summary.interventions.len()
        );
        (self.graph, self.summary)
    }
}

impl LineageBuilder<String> {
    /// Build a graph from a manifest, applying seed entries then observations.
    pub fn from_manifest(
        manifest: LineageManifest,
        settings: &GraphSettings,
    ) -> Result<(DirectedLineageGraph<String>, BuildSummary<String>)> {
        let mut builder = Self::new(settings);

        info!("Building lineage graph - applying seed edges");
        for entry in manifest.seed {
            builder
                .seed(entry.parent.clone(), &entry.children)
                .with_context(|| format!("Failed to seed edges for {}", entry.parent))?;
        }

        info!("Building lineage graph - applying observations");
        for observation in manifest.observations {
            if observation.children.is_empty() {
                warn!("Skipping observation for {} with no children", observation.parent);
                continue;
            }
            let parent = observation.parent.clone();
            builder
                .observe(observation)
                .with_context(|| format!("Failed to apply observation for {}", parent))?;
        }

        builder
            .graph
            .verify()
            .context("Lineage graph is not a single-parent forest")?;

        Ok(builder.finish())
    }
}
