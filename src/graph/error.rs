use super::topology::NodeId;

/// Errors returned by topology edits.
///
/// Every edit that fails leaves the graph exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// The referenced node does not exist (never existed or was removed)
    UnknownNode(NodeId),
    /// Beat length must be at least one step
    InvalidBeatLength(usize),
}

impl std::fmt::Display for GraphError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GraphError::UnknownNode(id) => write!(f, "unknown node {}", id),
            GraphError::InvalidBeatLength(len) => {
                write!(f, "invalid beat length {} (must be at least 1)", len)
            }
        }
    }
}

impl std::error::Error for GraphError {}
