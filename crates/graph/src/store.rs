//! Authoritative owner of node and edge lifecycle state.
//!
//! Every external read and write of node lifecycle goes through this store.
//! Mutations hold the lock only while touching state; events are published
//! after the lock is released so subscribers can call back into the store.
//! Aggregate stats are recomputed and republished after every mutation.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use tracing::{debug, info, warn};

use pulse_bus::{Event, EventBus};
use pulse_core::{AggregateStats, Edge, Node, NodeId, NodeStatus, NodeType};

#[derive(Default)]
struct GraphState {
    nodes: HashMap<NodeId, Node>,
    edges: Vec<Edge>,
}

impl GraphState {
    /// Nodes sorted by id, for deterministic event payloads.
    fn ordered_nodes(&self) -> Vec<Node> {
        let mut nodes: Vec<Node> = self.nodes.values().cloned().collect();
        nodes.sort_by_key(|n| n.id);
        nodes
    }
}

/// Shared, internally synchronized graph store.
pub struct GraphStore {
    state: RwLock<GraphState>,
    bus: Arc<EventBus>,
}

impl GraphStore {
    pub fn new(bus: Arc<EventBus>) -> Self {
        Self {
            state: RwLock::new(GraphState::default()),
            bus,
        }
    }

    /// Replace the whole graph (startup or regeneration on a node-count
    /// change). Publishes the new collections and fresh stats.
    pub fn install(&self, nodes: Vec<Node>, edges: Vec<Edge>) {
        let (node_payload, edge_payload) = {
            let mut state = self.state.write().unwrap();
            state.nodes = nodes.into_iter().map(|n| (n.id, n)).collect();
            state.edges = edges;
            (state.ordered_nodes(), state.edges.clone())
        };
        info!(
            nodes = node_payload.len(),
            edges = edge_payload.len(),
            "graph installed"
        );
        self.bus.publish(Event::NodesUpdated { nodes: node_payload });
        self.bus.publish(Event::LinksUpdated { edges: edge_payload });
        self.publish_stats();
    }

    // ── Queries ─────────────────────────────────────────────────────

    pub fn node(&self, id: NodeId) -> Option<Node> {
        self.state.read().unwrap().nodes.get(&id).cloned()
    }

    /// Edges referencing the node as source or target.
    pub fn links_for(&self, id: NodeId) -> Vec<Edge> {
        self.state
            .read()
            .unwrap()
            .edges
            .iter()
            .filter(|e| e.touches(id))
            .cloned()
            .collect()
    }

    pub fn node_count(&self) -> usize {
        self.state.read().unwrap().nodes.len()
    }

    /// Snapshot of all nodes, sorted by id.
    pub fn snapshot_nodes(&self) -> Vec<Node> {
        self.state.read().unwrap().ordered_nodes()
    }

    /// Live snapshot of non-hidden pending nodes.
    pub fn pending_nodes(&self) -> Vec<Node> {
        self.filtered(|n| n.status == NodeStatus::Pending && !n.hidden)
    }

    /// Live snapshot of non-hidden partial nodes that still have phases left.
    pub fn partial_nodes(&self) -> Vec<Node> {
        self.filtered(|n| n.status == NodeStatus::Partial && !n.hidden && !n.is_fully_analyzed())
    }

    fn filtered<F: Fn(&Node) -> bool>(&self, pred: F) -> Vec<Node> {
        let state = self.state.read().unwrap();
        let mut nodes: Vec<Node> = state.nodes.values().filter(|n| pred(n)).cloned().collect();
        nodes.sort_by_key(|n| n.id);
        nodes
    }

    /// Recompute aggregate stats from scratch.
    pub fn stats(&self) -> AggregateStats {
        let state = self.state.read().unwrap();
        AggregateStats::compute(state.nodes.values())
    }

    // ── Mutations ───────────────────────────────────────────────────

    /// Commit one node's lifecycle fields.
    ///
    /// The store reconciles the completion invariant in both directions
    /// before publishing: a phase count reaching `required_phases` forces
    /// `Completed`, and a `Completed` commit forces the phase count up to
    /// `required_phases`. Unknown ids are tolerated (the scheduler and UI
    /// may race on node removal during filtering): logged, node state
    /// untouched, stats still republished.
    pub fn update_node_status(
        &self,
        id: NodeId,
        status: NodeStatus,
        progress: u8,
        phase: Option<u8>,
    ) {
        let event = {
            let mut state = self.state.write().unwrap();
            match state.nodes.get_mut(&id) {
                Some(node) => {
                    node.status = status;
                    node.progress = progress.min(100);
                    if let Some(phase) = phase {
                        node.current_phase = phase;
                    }
                    if node.is_fully_analyzed() {
                        node.status = NodeStatus::Completed;
                        node.progress = 100;
                    } else if node.status == NodeStatus::Completed {
                        node.current_phase = node.required_phases;
                        node.progress = 100;
                    }
                    Some(Event::NodeStatusUpdated {
                        id,
                        status: node.status,
                        progress: node.progress,
                        phase: node.current_phase,
                    })
                }
                None => {
                    warn!(node = %id, "status update for unknown node ignored");
                    None
                }
            }
        };

        if let Some(event) = event {
            self.bus.publish(event);
        }
        self.publish_stats();
    }

    /// Return every node to `{pending, progress 0, phase 0}`. Idempotent.
    pub fn reset_all(&self) {
        {
            let mut state = self.state.write().unwrap();
            for node in state.nodes.values_mut() {
                node.status = NodeStatus::Pending;
                node.progress = 0;
                node.current_phase = 0;
            }
        }
        debug!("all nodes reset to pending");
        self.bus.publish(Event::NodesReset);
        self.publish_stats();
    }

    /// Apply a visibility filter by node type. Status and progress are
    /// never touched; edge visibility mirrors the endpoints.
    pub fn set_visibility<F: Fn(NodeType) -> bool>(&self, visible: F) {
        let (nodes, edges) = {
            let mut state = self.state.write().unwrap();
            for node in state.nodes.values_mut() {
                node.hidden = !visible(node.node_type);
            }
            let hidden_by_id: HashMap<NodeId, bool> =
                state.nodes.values().map(|n| (n.id, n.hidden)).collect();
            for edge in &mut state.edges {
                edge.hidden = hidden_by_id.get(&edge.source).copied().unwrap_or(false)
                    || hidden_by_id.get(&edge.target).copied().unwrap_or(false);
            }
            (state.ordered_nodes(), state.edges.clone())
        };
        self.bus.publish(Event::VisibilityUpdated { nodes, edges });
    }

    /// Safety-net pass run at stop: force any node whose phase count is
    /// already satisfied into `Completed`, then republish stats.
    pub fn reconcile_completed(&self) {
        let forced: Vec<Event> = {
            let mut state = self.state.write().unwrap();
            state
                .nodes
                .values_mut()
                .filter(|n| n.is_fully_analyzed() && n.status != NodeStatus::Completed)
                .map(|node| {
                    node.status = NodeStatus::Completed;
                    node.progress = 100;
                    debug!(node = %node.id, "forced to completed during reconciliation");
                    Event::NodeStatusUpdated {
                        id: node.id,
                        status: node.status,
                        progress: node.progress,
                        phase: node.current_phase,
                    }
                })
                .collect()
        };

        for event in forced {
            self.bus.publish(event);
        }
        self.publish_stats();
    }

    fn publish_stats(&self) {
        let stats = self.stats();
        self.bus.publish(Event::StatsUpdated { stats });
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use pulse_bus::topics;
    use pulse_core::{EdgeKind, NodeType, Position};

    use super::*;

    fn test_node(id: u32, node_type: NodeType) -> Node {
        Node::new(NodeId(id), format!("e{id}"), node_type, Position::default())
    }

    fn store_with(nodes: Vec<Node>, edges: Vec<Edge>) -> (Arc<EventBus>, GraphStore) {
        let bus = Arc::new(EventBus::new());
        let store = GraphStore::new(bus.clone());
        store.install(nodes, edges);
        (bus, store)
    }

    fn collect_stats(bus: &Arc<EventBus>) -> Arc<Mutex<Vec<AggregateStats>>> {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        bus.subscribe(topics::STATS_UPDATED, move |ev| {
            if let Event::StatsUpdated { stats } = ev {
                sink.lock().unwrap().push(*stats);
            }
        });
        seen
    }

    #[test]
    fn update_publishes_status_and_stats() {
        let (bus, store) = store_with(vec![test_node(0, NodeType::Macro)], vec![]);
        let stats_seen = collect_stats(&bus);
        let status_seen = Arc::new(Mutex::new(Vec::new()));
        let sink = status_seen.clone();
        bus.subscribe(topics::NODE_STATUS_UPDATED, move |ev| {
            if let Event::NodeStatusUpdated { id, status, progress, phase } = ev {
                sink.lock().unwrap().push((*id, *status, *progress, *phase));
            }
        });

        store.update_node_status(NodeId(0), NodeStatus::Analyzing, 40, Some(0));

        assert_eq!(
            *status_seen.lock().unwrap(),
            vec![(NodeId(0), NodeStatus::Analyzing, 40, 0)]
        );
        let stats = stats_seen.lock().unwrap();
        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].analyzing, 1);
    }

    #[test]
    fn completion_invariant_forces_completed() {
        // Committing the final phase as Partial must still end Completed.
        let (_, store) = store_with(vec![test_node(0, NodeType::Variable)], vec![]);
        store.update_node_status(NodeId(0), NodeStatus::Partial, 100, Some(1));

        let node = store.node(NodeId(0)).unwrap();
        assert_eq!(node.status, NodeStatus::Completed);
        assert_eq!(node.progress, 100);
        assert_eq!(node.current_phase, 1);
    }

    #[test]
    fn completion_invariant_raises_phase() {
        // A Completed commit with a short phase count is reconciled upward.
        let (_, store) = store_with(vec![test_node(0, NodeType::Function)], vec![]);
        store.update_node_status(NodeId(0), NodeStatus::Completed, 100, Some(1));

        let node = store.node(NodeId(0)).unwrap();
        assert_eq!(node.status, NodeStatus::Completed);
        assert_eq!(node.current_phase, node.required_phases);
    }

    #[test]
    fn unknown_id_is_tolerated_but_stats_republished() {
        let (bus, store) = store_with(vec![test_node(0, NodeType::Variable)], vec![]);
        let stats_seen = collect_stats(&bus);

        store.update_node_status(NodeId(999), NodeStatus::Completed, 100, Some(1));

        let stats = stats_seen.lock().unwrap();
        assert_eq!(stats.len(), 1, "stats are recomputed even for unknown ids");
        assert_eq!(stats[0].pending, 1);
        assert_eq!(stats[0].completed, 0);
        assert_eq!(store.node(NodeId(0)).unwrap().status, NodeStatus::Pending);
    }

    #[test]
    fn reset_all_is_idempotent() {
        let (_bus, store) = store_with(
            vec![test_node(0, NodeType::Function), test_node(1, NodeType::Variable)],
            vec![],
        );
        store.update_node_status(NodeId(0), NodeStatus::Partial, 100, Some(1));
        store.update_node_status(NodeId(1), NodeStatus::Completed, 100, Some(1));

        store.reset_all();
        let first = store.snapshot_nodes();
        store.reset_all();
        let second = store.snapshot_nodes();

        assert_eq!(first, second);
        for node in second {
            assert_eq!(node.status, NodeStatus::Pending);
            assert_eq!(node.progress, 0);
            assert_eq!(node.current_phase, 0);
        }
    }

    #[test]
    fn visibility_filters_views_but_not_status() {
        let (bus, store) = store_with(
            vec![test_node(0, NodeType::Function), test_node(1, NodeType::Variable)],
            vec![Edge::new(NodeId(0), NodeId(1), EdgeKind::Reads)],
        );
        let seen = Arc::new(Mutex::new(None));
        let sink = seen.clone();
        bus.subscribe(topics::VISIBILITY_UPDATED, move |ev| {
            if let Event::VisibilityUpdated { nodes, edges } = ev {
                *sink.lock().unwrap() = Some((nodes.clone(), edges.clone()));
            }
        });

        store.set_visibility(|t| t == NodeType::Function);

        let pending = store.pending_nodes();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].id, NodeId(0));

        let hidden = store.node(NodeId(1)).unwrap();
        assert!(hidden.hidden);
        assert_eq!(hidden.status, NodeStatus::Pending);

        let (nodes, edges) = seen.lock().unwrap().clone().unwrap();
        assert_eq!(nodes.len(), 2);
        assert!(edges[0].hidden, "edge follows its hidden endpoint");

        // Clearing the filter restores everything.
        store.set_visibility(|_| true);
        assert_eq!(store.pending_nodes().len(), 2);
        assert!(!store.links_for(NodeId(0))[0].hidden);
    }

    #[test]
    fn partial_view_excludes_fully_analyzed() {
        let mut done = test_node(0, NodeType::Variable);
        done.status = NodeStatus::Partial;
        done.current_phase = 1; // required is also 1
        let mut halfway = test_node(1, NodeType::Typedef);
        halfway.status = NodeStatus::Partial;
        halfway.current_phase = 1; // required is 2

        let (_, store) = store_with(vec![done, halfway], vec![]);
        // Install keeps node fields as provided except id indexing, but the
        // fully-analyzed partial is excluded from the scheduler view.
        let partial = store.partial_nodes();
        assert_eq!(partial.len(), 1);
        assert_eq!(partial[0].id, NodeId(1));
    }

    #[test]
    fn reconcile_forces_satisfied_nodes() {
        let mut stuck = test_node(0, NodeType::Variable);
        stuck.status = NodeStatus::Partial;
        stuck.current_phase = 1; // required 1 → should be completed

        let (bus, store) = store_with(vec![stuck], vec![]);
        let stats_seen = collect_stats(&bus);

        store.reconcile_completed();

        assert_eq!(store.node(NodeId(0)).unwrap().status, NodeStatus::Completed);
        let stats = stats_seen.lock().unwrap();
        assert_eq!(stats.last().unwrap().completed, 1);
        assert_eq!(stats.last().unwrap().total_progress, 100);
    }

    #[test]
    fn links_for_matches_either_endpoint() {
        let (_, store) = store_with(
            vec![
                test_node(0, NodeType::Function),
                test_node(1, NodeType::Function),
                test_node(2, NodeType::Variable),
            ],
            vec![
                Edge::new(NodeId(0), NodeId(1), EdgeKind::Calls),
                Edge::new(NodeId(1), NodeId(2), EdgeKind::Reads),
            ],
        );
        assert_eq!(store.links_for(NodeId(0)).len(), 1);
        assert_eq!(store.links_for(NodeId(1)).len(), 2);
        assert_eq!(store.links_for(NodeId(2)).len(), 1);
    }

    #[test]
    fn stats_match_recomputation_after_updates() {
        let (bus, store) = store_with(
            vec![test_node(0, NodeType::Function), test_node(1, NodeType::Macro)],
            vec![],
        );
        let stats_seen = collect_stats(&bus);

        store.update_node_status(NodeId(0), NodeStatus::Analyzing, 50, Some(1));
        store.update_node_status(NodeId(1), NodeStatus::Completed, 100, Some(1));

        let last_published = *stats_seen.lock().unwrap().last().unwrap();
        assert_eq!(last_published, store.stats());
    }
}
