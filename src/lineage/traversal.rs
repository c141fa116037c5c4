use crate::error::{LineageError, Result};
use crate::lineage::graph::DirectedLineageGraph;
use crate::lineage::sink::PathSink;
use crate::types::LineageNode;
use std::collections::HashSet;
use tracing::{debug, info};

/// Graph traversal utilities for lineage analysis
pub struct GraphTraversal;

impl GraphTraversal {
    /// Enumerate every root-to-leaf path below `root`, depth first.
    ///
    /// Children are visited in insertion order. The discovered set spans the
    /// whole call, so a node reachable through two parents contributes paths
    /// only through the branch that reaches it first. Each completed path is
    /// handed to `sink` before being collected into the returned list.
    pub fn enumerate_paths<N, S>(
        graph: &DirectedLineageGraph<N>,
        root: &N,
        sink: &mut S,
    ) -> Result<Vec<Vec<N>>>
    where
        N: LineageNode,
        S: PathSink<N> + ?Sized,
    {
        if !graph.contains(root) {
            return Err(LineageError::node_not_found(root));
        }

        let mut discovered: HashSet<&N> = HashSet::from([root]);
        // Each frame is a node on the current path and the index of the next
        // child to inspect.
        let mut stack: Vec<(&N, usize)> = vec![(root, 0)];
        let mut paths = Vec::new();

        while let Some(frame) = stack.last_mut() {
            let (node, next) = *frame;
            let children = graph.children(node)?;

            if children.is_empty() {
                let path: Vec<N> = stack.iter().map(|(n, _)| (*n).clone()).collect();
                sink.on_path_found(&path)?;
                debug!("Completed lineage path ending at {}", node);
                paths.push(path);
                stack.pop();
                continue;
            }

            match children[next..].iter().position(|c| !discovered.contains(c)) {
                Some(offset) => {
                    let child = &children[next + offset];
                    frame.1 = next + offset + 1;
                    discovered.insert(child);
                    stack.push((child, 0));
                }
                None => {
                    stack.pop();
                }
            }
        }

        info!("Enumerated {} lineage paths from {}", paths.len(), root);
        Ok(paths)
    }

    /// Path from the root of `node`'s tree down to `node`.
    pub fn path_to<N: LineageNode>(graph: &DirectedLineageGraph<N>, node: &N) -> Result<Vec<N>> {
        let mut path = graph.ancestors(node)?;
        path.reverse();
        path.push(node.clone());
        Ok(path)
    }

    /// Copy of the subtree rooted at `root`, preserving child order.
    pub fn extract_subtree<N: LineageNode>(
        graph: &DirectedLineageGraph<N>,
        root: &N,
    ) -> Result<DirectedLineageGraph<N>> {
        let mut subtree = if graph.is_strict() {
            DirectedLineageGraph::strict()
        } else {
            DirectedLineageGraph::new()
        };
        subtree.add_node(root.clone());

        for node in std::iter::once(root.clone()).chain(graph.descendants(root)?) {
            for child in graph.children(&node)? {
                subtree.add_edge(node.clone(), child.clone())?;
            }
        }

        Ok(subtree)
    }
}

impl<N: LineageNode> DirectedLineageGraph<N> {
    /// See [`GraphTraversal::enumerate_paths`].
    pub fn enumerate_paths<S>(&self, root: &N, sink: &mut S) -> Result<Vec<Vec<N>>>
    where
        S: PathSink<N> + ?Sized,
    {
        GraphTraversal::enumerate_paths(self, root, sink)
    }
}
