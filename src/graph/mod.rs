//! The pattern graph and the beat-row resolver.
//!
//! Topology edits (`add_node`, `connect`, ...) are the only writes. The beat
//! row is derived on demand from the current topology and never stored, so
//! it can't go stale.

/// Walk from the start node to the boolean pattern.
pub mod beat_row;
/// Rejected topology edits.
pub mod error;
/// Nodes, edges, start node and beat length.
pub mod topology;

pub use beat_row::{calculate_beat_row, calculate_beat_row_from, BeatRow};
pub use error::GraphError;
pub use topology::{Edge, GridPos, Node, NodeId, PatternGraph, DEFAULT_BEAT_LENGTH};
