use crate::config::GraphSettings;
use crate::error::{LineageError, Result};
use crate::lineage::storage::AdjacencyStore;
use crate::types::{GraphStatistics, Intervention, LineageNode};
use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::{HashMap, HashSet, VecDeque};
use tracing::{debug, info, warn};

/// Directed forest of parent -> children relationships built up from partial,
/// overlapping observations.
///
/// Every node has at most one parent once an observation has been fully
/// applied. Between adding `candidate -> child` edges and calling
/// [`intervene`](Self::intervene) a child may briefly be listed under two
/// parents; graphs created with `strict_single_parent` reject that state
/// instead.
#[derive(Debug, Clone)]
pub struct DirectedLineageGraph<N> {
    store: AdjacencyStore<N>,
    strict_single_parent: bool,
}

impl<N> Default for DirectedLineageGraph<N> {
    fn default() -> Self {
        Self {
            store: AdjacencyStore::default(),
            strict_single_parent: false,
        }
    }
}

impl<N: LineageNode> DirectedLineageGraph<N> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a graph that refuses edges giving a node a second parent.
    pub fn strict() -> Self {
        Self {
            store: AdjacencyStore::new(),
            strict_single_parent: true,
        }
    }

    pub fn from_settings(settings: &GraphSettings) -> Self {
        Self {
            store: AdjacencyStore::new(),
            strict_single_parent: settings.strict_single_parent,
        }
    }

    pub fn is_strict(&self) -> bool {
        self.strict_single_parent
    }

    /// Register `node` with no children. Does nothing if it already exists.
    pub fn add_node(&mut self, node: N) {
        if self.store.insert_node(node) {
            debug!("Registered node, {} nodes total", self.store.node_count());
        }
    }

    /// Add `parent -> child`, registering either endpoint on first reference.
    ///
    /// An edge that already exists is silently ignored.
    pub fn add_edge(&mut self, parent: N, child: N) -> Result<()> {
        if self.store.has_child(&parent, &child) {
            debug!("Edge {} -> {} already present", parent, child);
            return Ok(());
        }

        if parent == child || self.reaches(&child, &parent) {
            return Err(LineageError::cycle(&parent, &child));
        }

        if self.strict_single_parent {
            if let Some(existing) = self.find_parent(&child) {
                return Err(LineageError::MultipleParents {
                    child: child.to_string(),
                    existing: existing.to_string(),
                    parent: parent.to_string(),
                });
            }
        }

        self.add_node(parent.clone());
        self.add_node(child.clone());
        self.store.push_child(&parent, child);
        Ok(())
    }

    /// Remove `parent -> child`, keeping the order of `parent`'s other children.
    pub fn remove_edge(&mut self, parent: &N, child: &N) -> Result<()> {
        if self.store.remove_child(parent, child) {
            Ok(())
        } else {
            Err(LineageError::edge_not_found(parent, child))
        }
    }

    /// First node, in insertion order, listing `node` as a child.
    pub fn find_parent(&self, node: &N) -> Option<&N> {
        self.store
            .iter()
            .find(|(_, children)| children.contains(node))
            .map(|(parent, _)| parent)
    }

    /// Every node listing `node` as a child, in insertion order.
    pub fn parents(&self, node: &N) -> Vec<&N> {
        self.store
            .iter()
            .filter(|(_, children)| children.contains(node))
            .map(|(parent, _)| parent)
            .collect()
    }

    pub fn has_edge(&self, parent: &N, child: &N) -> bool {
        self.store.has_child(parent, child)
    }

    /// Insert `candidate` between the first node owning all of `child_subset`
    /// and those children.
    ///
    /// The first node (in insertion order) whose children are a superset of
    /// `child_subset` gains `candidate` as a child and loses its direct edges
    /// to the subset. Nodes that cannot legally become `candidate`'s parent
    /// are passed over: the candidate itself, its descendants, and any node
    /// other than the one already owning `candidate`. Returns `None` when
    /// nothing was rewired; the graph is then left untouched.
    pub fn intervene(&mut self, candidate: N, child_subset: &[N]) -> Option<Intervention<N>> {
        let mut subset: Vec<N> = Vec::with_capacity(child_subset.len());
        for child in child_subset {
            if !subset.contains(child) {
                subset.push(child.clone());
            }
        }

        if subset.is_empty() {
            debug!("Skipping intervention for {}: empty child subset", candidate);
            return None;
        }

        if subset.contains(&candidate) {
            warn!("Skipping intervention for {}: node listed among its own children", candidate);
            return None;
        }

        let ancestor = self
            .store
            .iter()
            .filter(|(node, children)| {
                **node != candidate && subset.iter().all(|child| children.contains(child))
            })
            .map(|(node, _)| node)
            .find(|node| self.can_link(node, &candidate))
            .cloned();

        let Some(ancestor) = ancestor else {
            debug!("No ancestor owns all children of {}; nothing rewired", candidate);
            return None;
        };

        self.add_node(candidate.clone());
        self.store.push_child(&ancestor, candidate.clone());
        for child in &subset {
            self.store.remove_child(&ancestor, child);
        }

        let intervention = Intervention {
            ancestor,
            parent: candidate,
            children: subset,
        };
        info!(
            ancestor = %intervention.ancestor,
            parent = %intervention.parent,
            children = ?intervention.children,
            "Rewired lineage"
        );
        Some(intervention)
    }

    /// Whether `parent -> child` may be added without breaking the forest.
    fn can_link(&self, parent: &N, child: &N) -> bool {
        if self.store.has_child(parent, child) {
            return true;
        }
        if parent == child || self.reaches(child, parent) {
            return false;
        }
        self.find_parent(child).is_none()
    }

    /// Whether `to` is reachable from `from` by following child edges.
    pub fn reaches(&self, from: &N, to: &N) -> bool {
        if !self.store.contains(from) {
            return false;
        }

        let mut visited = HashSet::new();
        let mut stack = vec![from];
        visited.insert(from);

        while let Some(current) = stack.pop() {
            if current == to {
                return true;
            }
            for child in self.store.children(current).unwrap_or_default() {
                if visited.insert(child) {
                    stack.push(child);
                }
            }
        }

        false
    }

    pub fn contains(&self, node: &N) -> bool {
        self.store.contains(node)
    }

    /// Direct children of `node`, in insertion order.
    pub fn children(&self, node: &N) -> Result<&[N]> {
        self.store
            .children(node)
            .ok_or_else(|| LineageError::node_not_found(node))
    }

    /// All nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &N> {
        self.store.nodes()
    }

    /// `(node, children)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&N, &[N])> {
        self.store.iter()
    }

    pub fn node_count(&self) -> usize {
        self.store.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.store.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Nodes nobody lists as a child.
    pub fn roots(&self) -> Vec<N> {
        let owned: HashSet<&N> = self.store.iter().flat_map(|(_, children)| children).collect();
        self.store
            .nodes()
            .filter(|node| !owned.contains(node))
            .cloned()
            .collect()
    }

    /// Nodes with no children.
    pub fn leaves(&self) -> Vec<N> {
        self.store
            .iter()
            .filter(|(_, children)| children.is_empty())
            .map(|(node, _)| node.clone())
            .collect()
    }

    /// Parent chain of `node`, nearest first.
    pub fn ancestors(&self, node: &N) -> Result<Vec<N>> {
        if !self.contains(node) {
            return Err(LineageError::node_not_found(node));
        }

        let mut ancestors = Vec::new();
        let mut seen = HashSet::from([node]);
        let mut current = node;
        while let Some(parent) = self.find_parent(current) {
            if !seen.insert(parent) {
                break;
            }
            ancestors.push(parent.clone());
            current = parent;
        }

        debug!("Found {} ancestors for node {}", ancestors.len(), node);
        Ok(ancestors)
    }

    /// Every node below `node`, breadth first.
    pub fn descendants(&self, node: &N) -> Result<Vec<N>> {
        let start = self.children(node)?;

        let mut visited: HashSet<&N> = HashSet::from([node]);
        let mut descendants = Vec::new();
        let mut queue: VecDeque<&N> = start.iter().collect();
        for child in start {
            visited.insert(child);
        }

        while let Some(current) = queue.pop_front() {
            descendants.push(current.clone());
            for child in self.store.children(current).unwrap_or_default() {
                if visited.insert(child) {
                    queue.push_back(child);
                }
            }
        }

        debug!("Found {} descendants for node {}", descendants.len(), node);
        Ok(descendants)
    }

    /// Number of edges between `node` and its root.
    pub fn depth(&self, node: &N) -> Result<usize> {
        Ok(self.ancestors(node)?.len())
    }

    /// Longest edge count from `node` down to any leaf.
    ///
    /// Heights are computed bottom-up with an explicit stack, so each node is
    /// measured once however many parents list it.
    pub fn max_depth(&self, node: &N) -> Result<usize> {
        self.children(node)?;

        let mut heights: HashMap<&N, usize> = HashMap::new();
        let mut entered: HashSet<&N> = HashSet::new();
        let mut stack: Vec<(&N, bool)> = vec![(node, false)];

        while let Some((current, expanded)) = stack.pop() {
            let children = self.store.children(current).unwrap_or_default();
            if expanded {
                let height = children
                    .iter()
                    .filter_map(|child| heights.get(child))
                    .map(|height| height + 1)
                    .max()
                    .unwrap_or(0);
                heights.insert(current, height);
                continue;
            }
            if !entered.insert(current) {
                continue;
            }
            stack.push((current, true));
            for child in children {
                if !entered.contains(child) {
                    stack.push((child, false));
                }
            }
        }

        Ok(heights.get(node).copied().unwrap_or(0))
    }

    pub fn statistics(&self) -> GraphStatistics {
        let total_nodes = self.node_count();
        let total_edges = self.edge_count();

        // Each edge adds one to an out-degree and one to an in-degree.
        let average_degree = if total_nodes > 0 {
            (2 * total_edges) as f64 / total_nodes as f64
        } else {
            0.0
        };

        GraphStatistics {
            total_nodes,
            total_edges,
            leaf_nodes: self.leaves().len(),
            root_nodes: self.roots().len(),
            average_degree,
        }
    }

    /// Check the single-parent and acyclicity invariants over the whole graph.
    pub fn verify(&self) -> Result<()> {
        let mut parents: HashMap<&N, &N> = HashMap::new();
        for (node, children) in self.store.iter() {
            for child in children {
                if let Some(existing) = parents.insert(child, node) {
                    return Err(LineageError::MultipleParents {
                        child: child.to_string(),
                        existing: existing.to_string(),
                        parent: node.to_string(),
                    });
                }
            }
        }

        let (graph, _) = self.to_petgraph();
        if let Err(cycle) = toposort(&graph, None) {
            let node = &graph[cycle.node_id()];
            let child = self
                .store
                .children(node)
                .unwrap_or_default()
                .iter()
                .find(|child| self.reaches(child, node))
                .unwrap_or(node);
            return Err(LineageError::cycle(node, child));
        }

        Ok(())
    }

    /// Export to a petgraph `DiGraph` plus the node -> index map.
    pub fn to_petgraph(&self) -> (DiGraph<N, ()>, HashMap<N, NodeIndex>) {
        let mut graph = DiGraph::with_capacity(self.node_count(), self.edge_count());
        let mut node_map = HashMap::with_capacity(self.node_count());

        for node in self.store.nodes() {
            let index = graph.add_node(node.clone());
            node_map.insert(node.clone(), index);
        }

        for (parent, children) in self.store.iter() {
            for child in children {
                if let (Some(&from), Some(&to)) = (node_map.get(parent), node_map.get(child)) {
                    graph.add_edge(from, to, ());
                } else {
                    warn!("Could not find node indices for edge: {} -> {}", parent, child);
                }
            }
        }

        (graph, node_map)
    }
}
