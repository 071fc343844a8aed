/*
Beat Row Resolution
===================

The beat row is the repeating on/off pattern a graph plays. It is derived
from topology alone: nothing about it is stored, every query walks the graph
again.

Vocabulary
----------

  origin      The node the walk starts from. Normally the graph's start node;
              drum rows may name their own.

  distance    Sum of grid (Manhattan) distances along the walked path. The
              origin sits at distance 0. A node two columns right and one row
              down from the origin, connected directly, sits at distance 3.

  step        `distance mod beat_length`. The walk marks that step active.


The Walk
--------

    S(0,0) ──→ A(1,0) ──→ B(1,1)          beat length 4
      0          1          2             [x x x .]

Depth-first from the origin, following each node's outgoing edges in the
order they were added. A node gets its distance the first time the walk
reaches it and keeps it. Reaching it again along another path changes
nothing, which also makes cycles terminate:

    S(0,0) ──→ A(3,0) ──→ C(1,1)
      │                     ↑
      └──────→ B(1,0) ──────┘

    S=0, A=3, C=3+3=6, B=1. C stays at 6 even though S→B→C is only 2 long.

Steps past the end of the row wrap around, so a long chain folds back over
the start of the pattern. When several nodes land on one step the step stays
active and the node visited last is reported for it.
*/

use std::collections::{BTreeMap, HashSet};

use tracing::trace;

use super::topology::{NodeId, PatternGraph};

/// A resolved pattern plus, for each active step, the node that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BeatRow {
    pattern: Vec<bool>,
    step_nodes: BTreeMap<usize, NodeId>,
}

impl BeatRow {
    /// All-false row of the given length.
    pub fn silent(len: usize) -> Self {
        Self {
            pattern: vec![false; len],
            step_nodes: BTreeMap::new(),
        }
    }

    pub fn pattern(&self) -> &[bool] {
        &self.pattern
    }

    pub fn into_pattern(self) -> Vec<bool> {
        self.pattern
    }

    pub fn len(&self) -> usize {
        self.pattern.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pattern.is_empty()
    }

    /// Out-of-range steps are inactive.
    pub fn is_active(&self, step: usize) -> bool {
        self.pattern.get(step).copied().unwrap_or(false)
    }

    /// Node reported for `step`, if the step is active.
    pub fn node_at(&self, step: usize) -> Option<NodeId> {
        self.step_nodes.get(&step).copied()
    }

    pub fn step_nodes(&self) -> &BTreeMap<usize, NodeId> {
        &self.step_nodes
    }

    pub fn active_steps(&self) -> impl Iterator<Item = usize> + '_ {
        self.pattern
            .iter()
            .enumerate()
            .filter_map(|(step, &on)| on.then_some(step))
    }
}

/// Resolve the pattern from the graph's start node.
///
/// Returns an all-false row when no start node is set.
pub fn calculate_beat_row(graph: &PatternGraph) -> BeatRow {
    match graph.start_node() {
        Some(start) => calculate_beat_row_from(graph, start),
        None => BeatRow::silent(graph.beat_length()),
    }
}

/// Resolve the pattern walking from an arbitrary origin node.
pub fn calculate_beat_row_from(graph: &PatternGraph, origin: NodeId) -> BeatRow {
    let len = graph.beat_length();
    let mut row = BeatRow::silent(len);

    let Some(origin_node) = graph.node(origin) else {
        return row;
    };
    if len == 0 {
        return row;
    }

    let mut visited: HashSet<NodeId> = HashSet::with_capacity(graph.len());
    // (node, its position, distance from origin)
    let mut stack = vec![(origin, origin_node.pos, 0usize)];

    while let Some((id, pos, distance)) = stack.pop() {
        if !visited.insert(id) {
            continue;
        }

        let step = distance % len;
        row.pattern[step] = true;
        row.step_nodes.insert(step, id);

        // Reverse so the first-added edge is popped first
        let successors: Vec<NodeId> = graph.successors(id).collect();
        for next in successors.into_iter().rev() {
            if visited.contains(&next) {
                continue;
            }
            if let Some(node) = graph.node(next) {
                stack.push((next, node.pos, distance + pos.manhattan(node.pos)));
            }
        }
    }

    trace!(
        %origin,
        reached = visited.len(),
        active = row.step_nodes.len(),
        len,
        "resolved beat row"
    );
    row
}

impl PatternGraph {
    /// Shorthand for [`calculate_beat_row`].
    pub fn beat_row(&self) -> BeatRow {
        calculate_beat_row(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::topology::GridPos;

    fn graph(len: usize) -> PatternGraph {
        PatternGraph::with_beat_length(len).unwrap()
    }

    #[test]
    fn no_start_node_is_silent() {
        let mut g = graph(6);
        let a = g.add_node(GridPos::new(0, 0));
        let b = g.add_node(GridPos::new(1, 0));
        g.connect(a, b).unwrap();

        let row = calculate_beat_row(&g);
        assert_eq!(row.pattern(), &[false; 6]);
        assert!(row.step_nodes().is_empty());
    }

    #[test]
    fn lone_start_node_lights_step_zero() {
        for len in 1..=9 {
            let mut g = graph(len);
            let s = g.add_node(GridPos::new(4, 4));
            g.set_start_node(s).unwrap();

            let row = calculate_beat_row(&g);
            assert_eq!(row.len(), len);
            assert!(row.is_active(0));
            assert_eq!(row.active_steps().count(), 1);
            assert_eq!(row.node_at(0), Some(s));
        }
    }

    #[test]
    fn chain_of_unit_hops() {
        let mut g = graph(4);
        let s = g.add_node(GridPos::new(0, 0));
        let a = g.add_node(GridPos::new(1, 0));
        let b = g.add_node(GridPos::new(1, 1));
        g.connect(s, a).unwrap();
        g.connect(a, b).unwrap();
        g.set_start_node(s).unwrap();

        let row = calculate_beat_row(&g);
        assert_eq!(row.pattern(), &[true, true, true, false]);
        assert_eq!(row.node_at(1), Some(a));
        assert_eq!(row.node_at(2), Some(b));
    }

    #[test]
    fn direct_neighbours_at_two_and_three() {
        let mut g = graph(8);
        let s = g.add_node(GridPos::new(0, 0));
        let a = g.add_node(GridPos::new(2, 0));
        let b = g.add_node(GridPos::new(0, 3));
        g.connect(s, a).unwrap();
        g.connect(s, b).unwrap();
        g.set_start_node(s).unwrap();

        let row = calculate_beat_row(&g);
        assert_eq!(
            row.pattern(),
            &[true, false, true, true, false, false, false, false]
        );
    }

    #[test]
    fn first_path_fixes_distance() {
        let mut g = graph(8);
        let s = g.add_node(GridPos::new(0, 0));
        let a = g.add_node(GridPos::new(3, 0));
        let c = g.add_node(GridPos::new(1, 1));
        let b = g.add_node(GridPos::new(1, 0));
        g.connect(s, a).unwrap();
        g.connect(a, c).unwrap();
        g.connect(s, b).unwrap();
        g.connect(b, c).unwrap();
        g.set_start_node(s).unwrap();

        let row = calculate_beat_row(&g);
        // S=0, A=3, C=6 via A, B=1; the shorter S→B→C (2) is ignored
        assert_eq!(
            row.pattern(),
            &[true, true, false, true, false, false, true, false]
        );
        assert_eq!(row.node_at(6), Some(c));
        assert_eq!(row.node_at(2), None);
    }

    #[test]
    fn cycles_terminate() {
        let mut g = graph(8);
        let s = g.add_node(GridPos::new(0, 0));
        let a = g.add_node(GridPos::new(1, 0));
        let b = g.add_node(GridPos::new(1, 1));
        g.connect(s, a).unwrap();
        g.connect(a, b).unwrap();
        g.connect(b, s).unwrap();
        g.set_start_node(s).unwrap();

        let row = calculate_beat_row(&g);
        assert_eq!(row.active_steps().collect::<Vec<_>>(), vec![0, 1, 2]);
        assert_eq!(row.node_at(0), Some(s));
    }

    #[test]
    fn long_distances_wrap() {
        let mut g = graph(4);
        let s = g.add_node(GridPos::new(0, 0));
        let a = g.add_node(GridPos::new(5, 0));
        g.connect(s, a).unwrap();
        g.set_start_node(s).unwrap();

        let row = calculate_beat_row(&g);
        assert_eq!(row.pattern(), &[true, true, false, false]);
        assert_eq!(row.node_at(1), Some(a));
    }

    #[test]
    fn collision_reports_last_visited_node() {
        let mut g = graph(4);
        let s = g.add_node(GridPos::new(0, 0));
        let a = g.add_node(GridPos::new(4, 0));
        g.connect(s, a).unwrap();
        g.set_start_node(s).unwrap();

        let row = calculate_beat_row(&g);
        assert_eq!(row.pattern(), &[true, false, false, false]);
        assert_eq!(row.node_at(0), Some(a));
    }

    #[test]
    fn unreachable_nodes_are_ignored() {
        let mut g = graph(4);
        let s = g.add_node(GridPos::new(0, 0));
        let a = g.add_node(GridPos::new(1, 0));
        let lone = g.add_node(GridPos::new(2, 0));
        // Edge points into the start, not out of it
        g.connect(a, s).unwrap();
        g.set_start_node(s).unwrap();

        let row = calculate_beat_row(&g);
        assert_eq!(row.pattern(), &[true, false, false, false]);
        assert!(!row.step_nodes().values().any(|&n| n == lone || n == a));
    }

    #[test]
    fn repeated_queries_are_identical() {
        let mut g = graph(8);
        let s = g.add_node(GridPos::new(0, 0));
        let a = g.add_node(GridPos::new(2, 1));
        let b = g.add_node(GridPos::new(2, 3));
        g.connect(s, a).unwrap();
        g.connect(a, b).unwrap();
        g.set_start_node(s).unwrap();

        assert_eq!(calculate_beat_row(&g), calculate_beat_row(&g));
    }

    #[test]
    fn removing_start_silences_row() {
        let mut g = graph(4);
        let s = g.add_node(GridPos::new(0, 0));
        let a = g.add_node(GridPos::new(1, 0));
        g.connect(s, a).unwrap();
        g.set_start_node(s).unwrap();
        assert!(calculate_beat_row(&g).is_active(0));

        g.remove_node(s).unwrap();
        assert_eq!(g.start_node(), None);
        assert_eq!(calculate_beat_row(&g).pattern(), &[false; 4]);
    }

    #[test]
    fn row_follows_beat_length_changes() {
        let mut g = graph(4);
        let s = g.add_node(GridPos::new(0, 0));
        let a = g.add_node(GridPos::new(5, 0));
        g.connect(s, a).unwrap();
        g.set_start_node(s).unwrap();

        assert_eq!(g.beat_row().pattern(), &[true, true, false, false]);
        g.set_beat_length(8).unwrap();
        assert_eq!(
            g.beat_row().pattern(),
            &[true, false, false, false, false, true, false, false]
        );
    }

    #[test]
    fn resolves_from_any_origin() {
        let mut g = graph(4);
        let s = g.add_node(GridPos::new(0, 0));
        let a = g.add_node(GridPos::new(1, 0));
        let b = g.add_node(GridPos::new(3, 0));
        g.connect(s, a).unwrap();
        g.connect(a, b).unwrap();
        g.set_start_node(s).unwrap();

        let from_a = calculate_beat_row_from(&g, a);
        assert_eq!(from_a.pattern(), &[true, false, true, false]);

        g.remove_node(b).unwrap();
        assert_eq!(calculate_beat_row_from(&g, b).pattern(), &[false; 4]);
    }
}
