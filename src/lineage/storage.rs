use indexmap::IndexMap;
use std::hash::Hash;

/// Insertion-ordered adjacency storage: node -> ordered child list.
///
/// This layer knows nothing about lineage rules. It keeps child lists free of
/// duplicates and preserves the order in which nodes and children were added,
/// which is what makes traversal output reproducible.
#[derive(Debug, Clone)]
pub struct AdjacencyStore<N> {
    adjacency: IndexMap<N, Vec<N>>,
}

impl<N> Default for AdjacencyStore<N> {
    fn default() -> Self {
        Self {
            adjacency: IndexMap::new(),
        }
    }
}

impl<N: Clone + Eq + Hash> AdjacencyStore<N> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `node` with an empty child list. Returns `false` if present.
    pub fn insert_node(&mut self, node: N) -> bool {
        if self.adjacency.contains_key(&node) {
            return false;
        }
        self.adjacency.insert(node, Vec::new());
        true
    }

    pub fn contains(&self, node: &N) -> bool {
        self.adjacency.contains_key(node)
    }

    pub fn children(&self, node: &N) -> Option<&[N]> {
        self.adjacency.get(node).map(Vec::as_slice)
    }

    /// Append `child` to `parent`'s list. Returns `false` when the child is
    /// already listed or `parent` is unknown.
    pub fn push_child(&mut self, parent: &N, child: N) -> bool {
        match self.adjacency.get_mut(parent) {
            Some(children) if !children.contains(&child) => {
                children.push(child);
                true
            }
            _ => false,
        }
    }

    /// Remove `child` from `parent`'s list, keeping the order of the rest.
    pub fn remove_child(&mut self, parent: &N, child: &N) -> bool {
        let Some(children) = self.adjacency.get_mut(parent) else {
            return false;
        };
        match children.iter().position(|c| c == child) {
            Some(pos) => {
                children.remove(pos);
                true
            }
            None => false,
        }
    }

    pub fn has_child(&self, parent: &N, child: &N) -> bool {
        self.adjacency
            .get(parent)
            .is_some_and(|children| children.contains(child))
    }

    /// Iterate `(node, children)` in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&N, &[N])> {
        self.adjacency.iter().map(|(node, children)| (node, children.as_slice()))
    }

    pub fn nodes(&self) -> impl Iterator<Item = &N> {
        self.adjacency.keys()
    }

    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    pub fn edge_count(&self) -> usize {
        self.adjacency.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.adjacency.is_empty()
    }
}
