//! Node selection policies.
//!
//! Pure functions over eligibility snapshots; the engine filters out
//! claimed nodes before calling in, so policies only rank.

use rand::seq::SliceRandom;
use rand::Rng;

use pulse_core::{AnalysisMode, Node};

/// Pick the next node under the active policy.
///
/// Progressive: any pending node first (uniform among eligible), otherwise
/// the partial node with the lowest finished-phase count (uniform among
/// ties) — phases complete in roughly breadth-first order across the graph.
///
/// Complete: a partial node first (uniform among eligible), otherwise a
/// pending node — depth-first per node.
pub(crate) fn pick_next<R: Rng>(
    mode: AnalysisMode,
    pending: &[Node],
    partial: &[Node],
    rng: &mut R,
) -> Option<Node> {
    match mode {
        AnalysisMode::Progressive => {
            if let Some(node) = pending.choose(rng) {
                return Some(node.clone());
            }
            let lowest = partial.iter().map(|n| n.current_phase).min()?;
            let ties: Vec<&Node> = partial
                .iter()
                .filter(|n| n.current_phase == lowest)
                .collect();
            ties.choose(rng).map(|n| (*n).clone())
        }
        AnalysisMode::Complete => {
            if let Some(node) = partial.choose(rng) {
                return Some(node.clone());
            }
            pending.choose(rng).cloned()
        }
    }
}
