//! Typed event payloads carried on the bus.
//!
//! Each variant maps to exactly one topic constant in [`crate::topics`];
//! subscribers register per topic and downcast by matching on the variant.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use pulse_core::{AggregateStats, Edge, Node, NodeId, NodeStatus};

use crate::topics;

/// An event published on the [`EventBus`](crate::EventBus).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Event {
    /// An analysis run began.
    AnalysisStarted {
        run_id: Uuid,
        worker_count: usize,
        started_at: DateTime<Utc>,
    },
    /// An analysis run fully drained: every worker exited and the
    /// reconciliation pass ran.
    AnalysisStopped { run_id: Uuid },
    /// One node's lifecycle changed. Values are post-reconciliation.
    NodeStatusUpdated {
        id: NodeId,
        status: NodeStatus,
        progress: u8,
        phase: u8,
    },
    /// Aggregate stats were recomputed.
    StatsUpdated { stats: AggregateStats },
    /// A full reset returned every node to pending.
    NodesReset,
    /// A priority request was accepted.
    NodePrioritized { id: NodeId },
    /// A visibility filter was applied; carries the full collections for
    /// the consumer to re-render.
    VisibilityUpdated { nodes: Vec<Node>, edges: Vec<Edge> },
    /// The node collection was (re)generated.
    NodesUpdated { nodes: Vec<Node> },
    /// The edge collection was (re)generated.
    LinksUpdated { edges: Vec<Edge> },
    /// The visualization backend failed; core components keep running.
    VisualizationError { message: String },
}

impl Event {
    /// The routing topic this event is delivered on.
    pub fn topic(&self) -> &'static str {
        match self {
            Event::AnalysisStarted { .. } => topics::ANALYSIS_STARTED,
            Event::AnalysisStopped { .. } => topics::ANALYSIS_STOPPED,
            Event::NodeStatusUpdated { .. } => topics::NODE_STATUS_UPDATED,
            Event::StatsUpdated { .. } => topics::STATS_UPDATED,
            Event::NodesReset => topics::NODES_RESET,
            Event::NodePrioritized { .. } => topics::NODE_PRIORITIZED,
            Event::VisibilityUpdated { .. } => topics::VISIBILITY_UPDATED,
            Event::NodesUpdated { .. } => topics::NODES_UPDATED,
            Event::LinksUpdated { .. } => topics::LINKS_UPDATED,
            Event::VisualizationError { .. } => topics::VISUALIZATION_ERROR,
        }
    }
}
