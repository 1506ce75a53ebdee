use serde::{Deserialize, Serialize};

use crate::node::{Node, NodeStatus};

/// Derived snapshot of graph-wide analysis progress. Never stored —
/// recomputed from node state whenever requested or after a mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AggregateStats {
    pub pending: usize,
    pub analyzing: usize,
    pub partial: usize,
    pub completed: usize,
    /// Mean per-node completion percent, `0..=100`.
    pub total_progress: u8,
}

impl AggregateStats {
    /// Recompute from scratch over the given nodes.
    ///
    /// Per-node contribution: completed → 100; pending → 0; analyzing →
    /// `100·(phase + progress/100) / required`; partial →
    /// `100·phase / required` (the finished phase's progress is already
    /// folded into the phase count).
    pub fn compute<'a, I>(nodes: I) -> Self
    where
        I: IntoIterator<Item = &'a Node>,
    {
        let mut stats = AggregateStats::default();
        let mut sum = 0.0f64;
        let mut count = 0usize;

        for node in nodes {
            count += 1;
            match node.status {
                NodeStatus::Pending => stats.pending += 1,
                NodeStatus::Analyzing => {
                    stats.analyzing += 1;
                    let phases = f64::from(node.required_phases.max(1));
                    sum += 100.0 * (f64::from(node.current_phase) + f64::from(node.progress) / 100.0)
                        / phases;
                }
                NodeStatus::Partial => {
                    stats.partial += 1;
                    let phases = f64::from(node.required_phases.max(1));
                    sum += 100.0 * f64::from(node.current_phase) / phases;
                }
                NodeStatus::Completed => {
                    stats.completed += 1;
                    sum += 100.0;
                }
            }
        }

        if count > 0 {
            stats.total_progress = (sum / count as f64).round().clamp(0.0, 100.0) as u8;
        }
        stats
    }

    /// True iff no node is pending, analyzing, or partial.
    pub fn all_completed(&self) -> bool {
        self.pending == 0 && self.analyzing == 0 && self.partial == 0
    }
}
