/*
Drum Rows
=========

A drum row is one instrument lane: which sound plays, how loud, and where in
the graph its pattern comes from. Every row resolves its own beat row; the
scheduler walks the OR of all of them so it wakes on any step where at least
one row has a hit.

    graph ──► row 0 (snare, from start node)  [T F T F]
          ──► row 1 (kick,  from node #4)     [T F F F]
                                              ─────────
              combined pattern                [T F T F]

Which rows actually sound on a step:

    any row soloed?   yes → soloed rows that are not muted
                      no  → every row that is not muted

Mute always wins. Solo never un-mutes.
*/

use crate::graph::{calculate_beat_row, calculate_beat_row_from, BeatRow, NodeId, PatternGraph};

/// One instrument lane
#[derive(Debug, Clone, PartialEq)]
pub struct DrumRow {
    pub instrument: String,
    /// 0.0..=1.0; out-of-range values are clamped when a trigger is built
    pub volume: f32,
    pub muted: bool,
    pub solo: bool,
    /// Node the row's pattern is walked from; the graph's start node if None
    pub origin: Option<NodeId>,
}

impl DrumRow {
    pub fn new(instrument: impl Into<String>) -> Self {
        Self {
            instrument: instrument.into(),
            volume: 1.0,
            muted: false,
            solo: false,
            origin: None,
        }
    }

    /// Row gain, clamped to 0.0..=1.0
    pub fn with_volume(mut self, volume: f32) -> Self {
        self.volume = volume.clamp(0.0, 1.0);
        self
    }

    pub fn with_origin(mut self, origin: NodeId) -> Self {
        self.origin = Some(origin);
        self
    }

    /// Resolve this row's beat row against `graph`.
    ///
    /// An origin that has since been removed yields a silent row.
    pub fn beat_row(&self, graph: &PatternGraph) -> BeatRow {
        match self.origin {
            Some(origin) => calculate_beat_row_from(graph, origin),
            None => calculate_beat_row(graph),
        }
    }
}

/// A hit the transport should play
#[derive(Debug, Clone, PartialEq)]
pub struct Trigger {
    pub row: usize,
    pub instrument: String,
    pub volume: f32,
    /// Node that put the hit on this step
    pub node: Option<NodeId>,
}

/// The ordered list of rows. There is always at least one.
#[derive(Debug, Clone, PartialEq)]
pub struct DrumRows {
    rows: Vec<DrumRow>,
}

impl DrumRows {
    pub fn new(first: DrumRow) -> Self {
        Self { rows: vec![first] }
    }

    /// Append a row, returning its index
    pub fn add_row(&mut self, row: DrumRow) -> usize {
        self.rows.push(row);
        self.rows.len() - 1
    }

    /// Remove the row at `index`. The first row is permanent.
    pub fn remove_row(&mut self, index: usize) -> Option<DrumRow> {
        if index == 0 || index >= self.rows.len() {
            return None;
        }
        Some(self.rows.remove(index))
    }

    pub fn row(&self, index: usize) -> Option<&DrumRow> {
        self.rows.get(index)
    }

    pub fn row_mut(&mut self, index: usize) -> Option<&mut DrumRow> {
        self.rows.get_mut(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &DrumRow> {
        self.rows.iter()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Whether the row at `index` sounds under the mute/solo rule
    pub fn is_audible(&self, index: usize) -> bool {
        let Some(row) = self.rows.get(index) else {
            return false;
        };
        if row.muted {
            return false;
        }
        !self.any_solo() || row.solo
    }

    /// OR of every row's pattern, `graph.beat_length()` long
    pub fn combined_pattern(&self, graph: &PatternGraph) -> Vec<bool> {
        let mut combined = vec![false; graph.beat_length()];
        for row in &self.rows {
            let resolved = row.beat_row(graph);
            for (slot, &on) in combined.iter_mut().zip(resolved.pattern()) {
                *slot |= on;
            }
        }
        combined
    }

    /// Audible hits on `step`, in row order
    pub fn triggers_at(&self, graph: &PatternGraph, step: usize) -> Vec<Trigger> {
        self.rows
            .iter()
            .enumerate()
            .filter(|&(index, _)| self.is_audible(index))
            .filter_map(|(index, row)| {
                let resolved = row.beat_row(graph);
                resolved.is_active(step).then(|| Trigger {
                    row: index,
                    instrument: row.instrument.clone(),
                    volume: row.volume.clamp(0.0, 1.0),
                    node: resolved.node_at(step),
                })
            })
            .collect()
    }

    fn any_solo(&self) -> bool {
        self.rows.iter().any(|r| r.solo)
    }
}

impl Default for DrumRows {
    fn default() -> Self {
        Self::new(DrumRow::new("snare"))
    }
}

/// The graph and the rows that read it, edited together under one lock
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub graph: PatternGraph,
    pub rows: DrumRows,
}

impl Session {
    pub fn new(graph: PatternGraph) -> Self {
        Self {
            graph,
            rows: DrumRows::default(),
        }
    }

    pub fn combined_pattern(&self) -> Vec<bool> {
        self.rows.combined_pattern(&self.graph)
    }

    pub fn triggers_at(&self, step: usize) -> Vec<Trigger> {
        self.rows.triggers_at(&self.graph, step)
    }
}
