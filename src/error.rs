use std::io;

/// Structural errors raised by the lineage graph.
///
/// Node identifiers are rendered with `Display` so the error type stays
/// independent of the node type used by a particular graph.
#[derive(Debug, thiserror::Error)]
pub enum LineageError {
    /// Adding `parent -> child` would make `child` an ancestor of itself.
    #[error("edge {parent} -> {child} would create a cycle")]
    Cycle { parent: String, child: String },

    /// `child` is not a direct child of `parent`.
    #[error("edge {parent} -> {child} not found")]
    EdgeNotFound { parent: String, child: String },

    /// The node is not registered in the graph.
    #[error("node not found in graph: {0}")]
    NodeNotFound(String),

    /// `child` already has a parent other than `parent`.
    #[error("node {child} already has parent {existing}, refusing {parent}")]
    MultipleParents {
        child: String,
        existing: String,
        parent: String,
    },

    /// A path sink failed to accept a completed path.
    #[error("path sink failed: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T, E = LineageError> = std::result::Result<T, E>;

impl LineageError {
    pub(crate) fn cycle(parent: &impl ToString, child: &impl ToString) -> Self {
        Self::Cycle {
            parent: parent.to_string(),
            child: child.to_string(),
        }
    }

    pub(crate) fn edge_not_found(parent: &impl ToString, child: &impl ToString) -> Self {
        Self::EdgeNotFound {
            parent: parent.to_string(),
            child: child.to_string(),
        }
    }

    pub(crate) fn node_not_found(node: &impl ToString) -> Self {
        Self::NodeNotFound(node.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_name_the_nodes() {
        let err = LineageError::cycle(&"A", &"B");
        assert_eq!(err.to_string(), "edge A -> B would create a cycle");

        let err = LineageError::edge_not_found(&"A", &"m1");
        assert_eq!(err.to_string(), "edge A -> m1 not found");

        let err = LineageError::node_not_found(&42);
        assert_eq!(err.to_string(), "node not found in graph: 42");
    }

    #[test]
    fn test_io_error_converts() {
        let err: LineageError = io::Error::other("disk full").into();
        assert!(matches!(err, LineageError::Io(_)));
        assert!(err.to_string().contains("disk full"));
    }
}
