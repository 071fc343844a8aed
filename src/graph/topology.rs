use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::GraphError;

/// Beat length of a freshly created graph.
pub const DEFAULT_BEAT_LENGTH: usize = 4;

/// Opaque node identity. Assigned in increasing order and never reused.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Integer grid coordinates: column `i`, row `j`.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct GridPos {
    pub i: i32,
    pub j: i32,
}

impl GridPos {
    pub const fn new(i: i32, j: i32) -> Self {
        Self { i, j }
    }

    /// `|Δi| + |Δj|`
    pub fn manhattan(self, other: GridPos) -> usize {
        (self.i.abs_diff(other.i) + self.j.abs_diff(other.j)) as usize
    }
}

/// A node placed on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Node {
    pub id: NodeId,
    pub pos: GridPos,
}

/// Directed connection used for pattern traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub from: NodeId,
    pub to: NodeId,
}

/// Nodes on a grid, directed edges between them, an optional start node
/// and the beat length that sets the period of the derived pattern.
///
/// Edges keep their insertion order; the resolver walks outgoing edges in
/// that order so results are reproducible.
#[derive(Debug, Clone)]
pub struct PatternGraph {
    nodes: BTreeMap<NodeId, Node>,
    edges: Vec<Edge>,
    next_id: u32,
    start: Option<NodeId>,
    beat_length: usize,
}

impl PatternGraph {
    pub fn new() -> Self {
        Self {
            nodes: BTreeMap::new(),
            edges: Vec::new(),
            next_id: 0,
            start: None,
            beat_length: DEFAULT_BEAT_LENGTH,
        }
    }

    /// Create an empty graph with a custom beat length.
    pub fn with_beat_length(beat_length: usize) -> Result<Self, GraphError> {
        let mut graph = Self::new();
        graph.set_beat_length(beat_length)?;
        Ok(graph)
    }

    /// Place a new node at `pos` and return its id.
    pub fn add_node(&mut self, pos: GridPos) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        self.nodes.insert(id, Node { id, pos });
        debug!(node = %id, i = pos.i, j = pos.j, "added node");
        id
    }

    /// Remove a node together with every edge touching it.
    ///
    /// Clears the start node if it was the one removed.
    pub fn remove_node(&mut self, id: NodeId) -> Result<Node, GraphError> {
        let node = self.nodes.remove(&id).ok_or(GraphError::UnknownNode(id))?;
        self.edges.retain(|e| e.from != id && e.to != id);
        if self.start == Some(id) {
            self.start = None;
            debug!(node = %id, "start node removed, start cleared");
        }
        debug!(node = %id, i = node.pos.i, j = node.pos.j, "removed node");
        Ok(node)
    }

    /// Add a directed edge. Returns `Ok(false)` if the edge already existed.
    pub fn connect(&mut self, from: NodeId, to: NodeId) -> Result<bool, GraphError> {
        self.require(from)?;
        self.require(to)?;

        if self.edges.iter().any(|e| e.from == from && e.to == to) {
            return Ok(false);
        }

        self.edges.push(Edge { from, to });
        debug!(%from, %to, "connected");
        Ok(true)
    }

    /// Remove a directed edge. Returns `Ok(false)` if there was no such edge.
    pub fn disconnect(&mut self, from: NodeId, to: NodeId) -> Result<bool, GraphError> {
        self.require(from)?;
        self.require(to)?;

        let before = self.edges.len();
        self.edges.retain(|e| !(e.from == from && e.to == to));
        let removed = self.edges.len() != before;
        if removed {
            debug!(%from, %to, "disconnected");
        }
        Ok(removed)
    }

    pub fn set_start_node(&mut self, id: NodeId) -> Result<(), GraphError> {
        self.require(id)?;
        self.start = Some(id);
        debug!(node = %id, "start node set");
        Ok(())
    }

    pub fn clear_start_node(&mut self) {
        self.start = None;
    }

    pub fn start_node(&self) -> Option<NodeId> {
        self.start
    }

    /// Set the pattern period. Zero is rejected.
    pub fn set_beat_length(&mut self, beat_length: usize) -> Result<(), GraphError> {
        if beat_length == 0 {
            return Err(GraphError::InvalidBeatLength(beat_length));
        }
        self.beat_length = beat_length;
        debug!(beat_length, "beat length set");
        Ok(())
    }

    pub fn beat_length(&self) -> usize {
        self.beat_length
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// First node (lowest id) placed at `pos`.
    pub fn node_at(&self, pos: GridPos) -> Option<NodeId> {
        self.nodes.values().find(|n| n.pos == pos).map(|n| n.id)
    }

    /// Nodes in creation order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Edges in insertion order.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Targets of the outgoing edges of `id`, in edge insertion order.
    pub fn successors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.edges.iter().filter(move |e| e.from == id).map(|e| e.to)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// True if any directed cycle exists anywhere in the graph.
    pub fn has_cycle(&self) -> bool {
        #[derive(Clone, Copy, PartialEq)]
        enum Mark {
            Unseen,
            OnStack,
            Done,
        }

        let mut marks: BTreeMap<NodeId, Mark> =
            self.nodes.keys().map(|&id| (id, Mark::Unseen)).collect();
        let mut adjacency: BTreeMap<NodeId, Vec<NodeId>> = BTreeMap::new();
        for edge in &self.edges {
            adjacency.entry(edge.from).or_default().push(edge.to);
        }

        for &root in self.nodes.keys() {
            if marks[&root] != Mark::Unseen {
                continue;
            }

            // (node, index of the next successor to look at)
            let mut stack = vec![(root, 0usize)];
            marks.insert(root, Mark::OnStack);

            while let Some(top) = stack.last_mut() {
                let (node, next) = *top;
                let succ = adjacency.get(&node).and_then(|out| out.get(next)).copied();
                match succ {
                    Some(succ) => {
                        top.1 += 1;
                        match marks[&succ] {
                            Mark::OnStack => return true,
                            Mark::Unseen => {
                                marks.insert(succ, Mark::OnStack);
                                stack.push((succ, 0));
                            }
                            Mark::Done => {}
                        }
                    }
                    None => {
                        marks.insert(node, Mark::Done);
                        stack.pop();
                    }
                }
            }
        }

        false
    }

    fn require(&self, id: NodeId) -> Result<(), GraphError> {
        if self.nodes.contains_key(&id) {
            Ok(())
        } else {
            Err(GraphError::UnknownNode(id))
        }
    }
}

impl Default for PatternGraph {
    fn default() -> Self {
        Self::new()
    }
}
