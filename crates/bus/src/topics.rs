//! Topic constants for event routing.
//!
//! Topics follow the pattern `pulse.<domain>.<event>` for consistent
//! namespace-qualified routing across all components.

// ── Scheduler topics ──────────────────────────────────────────────────────

/// Fired when an analysis run begins.
pub const ANALYSIS_STARTED: &str = "pulse.analysis.started";

/// Fired once every worker loop has drained and the reconciliation pass ran.
pub const ANALYSIS_STOPPED: &str = "pulse.analysis.stopped";

/// Fired when a priority request is accepted.
pub const NODE_PRIORITIZED: &str = "pulse.node.prioritized";

// ── Store topics ──────────────────────────────────────────────────────────

/// Fired when one node's lifecycle state changes.
pub const NODE_STATUS_UPDATED: &str = "pulse.node.status-updated";

/// Fired after every aggregate stats recomputation.
pub const STATS_UPDATED: &str = "pulse.stats.updated";

/// Fired after a full reset returned every node to pending.
pub const NODES_RESET: &str = "pulse.graph.reset";

/// Fired when a visibility filter was applied.
pub const VISIBILITY_UPDATED: &str = "pulse.graph.visibility";

/// Fired when the node collection is (re)generated.
pub const NODES_UPDATED: &str = "pulse.graph.nodes";

/// Fired when the edge collection is (re)generated.
pub const LINKS_UPDATED: &str = "pulse.graph.links";

// ── Render topics ─────────────────────────────────────────────────────────

/// Fired when the visualization backend fails; the core keeps running.
pub const VISUALIZATION_ERROR: &str = "pulse.render.error";
