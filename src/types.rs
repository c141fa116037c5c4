use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::Hash;

/// Core types for the lineage engine

/// Bound satisfied by anything usable as a lineage node identifier.
pub trait LineageNode: Clone + Eq + Hash + fmt::Debug + fmt::Display {}

impl<T> LineageNode for T where T: Clone + Eq + Hash + fmt::Debug + fmt::Display {}

/// Record of one rewiring performed by `intervene`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Intervention<N> {
    /// Node that previously owned the children directly.
    pub ancestor: N,
    /// Intermediate node inserted beneath `ancestor`.
    pub parent: N,
    /// Children detached from `ancestor`.
    pub children: Vec<N>,
}

impl<N: fmt::Display> fmt::Display for Intervention<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rewired ancestor={}, parent={}, children=[", self.ancestor, self.parent)?;
        for (i, child) in self.children.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", child)?;
        }
        f.write_str("]")
    }
}

/// One observed ownership: `parent` owns every node in `children`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observation<N> {
    pub parent: N,
    pub children: Vec<N>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphStatistics {
    pub total_nodes: usize,
    pub total_edges: usize,
    pub leaf_nodes: usize,
    pub root_nodes: usize,
    pub average_degree: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intervention_display() {
        let intervention = Intervention {
            ancestor: "A".to_string(),
            parent: "B".to_string(),
            children: vec!["m1".to_string(), "m2".to_string()],
        };

        assert_eq!(
            intervention.to_string(),
            "rewired ancestor=A, parent=B, children=[m1, m2]"
        );
    }

    #[test]
    fn test_observation_from_yaml() {
        let observation: Observation<String> =
            serde_yaml::from_str("parent: B\nchildren: [m1, m2]\n").unwrap();

        assert_eq!(observation.parent, "B");
        assert_eq!(observation.children, vec!["m1", "m2"]);
    }
}
