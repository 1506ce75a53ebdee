//! The simulated worker scheduler.
//!
//! Runs N cooperative worker loops as tokio tasks. Each loop claims a node
//! under the claim lock (so two idle workers can never pick the same node in
//! one scheduling tick), simulates one timed analysis phase in discrete
//! progress steps, and commits the phase through the store. Stop requests
//! are observed at suspension points; phases are the unit of atomicity —
//! an interrupted phase is abandoned, never half-committed.

use std::collections::{HashSet, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use chrono::Utc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use uuid::Uuid;

use pulse_bus::{Event, EventBus};
use pulse_core::{AnalysisMode, Node, NodeId, NodeStatus, PulseError};
use pulse_graph::GraphStore;

use crate::config::EngineConfig;
use crate::selection;

pub struct AnalysisEngine {
    store: Arc<GraphStore>,
    bus: Arc<EventBus>,
    config: EngineConfig,
    mode: RwLock<AnalysisMode>,
    running: AtomicBool,
    /// Bumped on every launch so workers from a superseded run exit even if
    /// a new run flips `running` back on before they notice the stop.
    epoch: AtomicU64,
    run_id: Mutex<Uuid>,
    claims: Mutex<HashSet<NodeId>>,
    priority: Mutex<VecDeque<NodeId>>,
    workers: Mutex<Vec<JoinHandle<()>>>,
}

impl AnalysisEngine {
    pub fn new(store: Arc<GraphStore>, bus: Arc<EventBus>, config: EngineConfig) -> Self {
        let mode = config.mode;
        Self {
            store,
            bus,
            config,
            mode: RwLock::new(mode),
            running: AtomicBool::new(false),
            epoch: AtomicU64::new(0),
            run_id: Mutex::new(Uuid::nil()),
            claims: Mutex::new(HashSet::new()),
            priority: Mutex::new(VecDeque::new()),
            workers: Mutex::new(Vec::new()),
        }
    }

    // ── Run control ─────────────────────────────────────────────────

    /// Begin a fresh analysis run: reset the graph, spawn `worker_count`
    /// loops, publish `started`. No-op if already running.
    pub fn start(self: &Arc<Self>, worker_count: usize) {
        self.launch(worker_count, true);
    }

    /// Resume work on nodes left partial by a prior stop, without resetting
    /// the graph. No-op if already running.
    pub fn continue_deep_analysis(self: &Arc<Self>, worker_count: usize) {
        self.launch(worker_count, false);
    }

    fn launch(self: &Arc<Self>, worker_count: usize, reset: bool) {
        if self.running.swap(true, Ordering::SeqCst) {
            debug!("scheduler already running; start request ignored");
            return;
        }
        let epoch = self.epoch.fetch_add(1, Ordering::SeqCst) + 1;
        if reset {
            self.store.reset_all();
            self.priority.lock().unwrap().clear();
        }

        let run_id = Uuid::new_v4();
        *self.run_id.lock().unwrap() = run_id;

        {
            let mut workers = self.workers.lock().unwrap();
            for worker in 0..worker_count {
                let this = Arc::clone(self);
                workers.push(tokio::spawn(this.worker_loop(worker, epoch)));
            }
        }

        self.bus.publish(Event::AnalysisStarted {
            run_id,
            worker_count,
            started_at: Utc::now(),
        });
        info!(run_id = %run_id, workers = worker_count, resumed = !reset, "analysis run started");
    }

    /// Request termination and return immediately. Workers exit at their
    /// next suspension point; a drain task joins them, runs the
    /// reconciliation pass, and only then publishes `stopped`. No-op if not
    /// running.
    pub fn stop(self: &Arc<Self>) {
        if !self.running.swap(false, Ordering::SeqCst) {
            debug!("scheduler not running; stop request ignored");
            return;
        }
        let handles: Vec<JoinHandle<()>> = self.workers.lock().unwrap().drain(..).collect();
        let run_id = *self.run_id.lock().unwrap();
        let stop_epoch = self.epoch.load(Ordering::SeqCst);
        let this = Arc::clone(self);
        tokio::spawn(async move {
            for handle in handles {
                if let Err(e) = handle.await {
                    warn!(error = %e, "worker task failed during drain");
                }
            }
            this.store.reconcile_completed();
            if this.epoch.load(Ordering::SeqCst) == stop_epoch {
                this.claims.lock().unwrap().clear();
            }
            this.bus.publish(Event::AnalysisStopped { run_id });
            info!(run_id = %run_id, "analysis run drained and stopped");
        });
    }

    // ── Queries ─────────────────────────────────────────────────────

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// True iff no node is pending, analyzing, or partial.
    pub fn is_complete(&self) -> bool {
        self.store.stats().all_completed()
    }

    /// True iff nothing is pending or in flight but partial work remains —
    /// the state a stop leaves behind that `continue_deep_analysis` picks up.
    pub fn needs_continuation(&self) -> bool {
        let stats = self.store.stats();
        stats.pending == 0 && stats.analyzing == 0 && stats.partial > 0
    }

    pub fn mode(&self) -> AnalysisMode {
        *self.mode.read().unwrap()
    }

    /// Switch the selection policy for subsequent selections.
    pub fn set_mode(&self, mode: AnalysisMode) {
        *self.mode.write().unwrap() = mode;
        debug!(%mode, "analysis mode changed");
    }

    /// Nodes currently claimed by a worker, sorted by id.
    pub fn active_claims(&self) -> Vec<NodeId> {
        let mut ids: Vec<NodeId> = self.claims.lock().unwrap().iter().copied().collect();
        ids.sort();
        ids
    }

    // ── Prioritization ──────────────────────────────────────────────

    /// Queue a node for selection ahead of the normal policy. Only pending
    /// and partial nodes qualify; the request is consumed when picked up.
    pub fn prioritize(&self, id: NodeId) {
        match self.store.node(id) {
            Some(node) if matches!(node.status, NodeStatus::Pending | NodeStatus::Partial) => {
                self.priority.lock().unwrap().push_back(id);
                self.bus.publish(Event::NodePrioritized { id });
                info!(node = %id, "node prioritized");
            }
            Some(node) => {
                debug!(node = %id, status = %node.status, "priority request ignored");
            }
            None => {
                warn!(node = %id, "priority request for unknown node ignored");
            }
        }
    }

    // ── Worker loops ────────────────────────────────────────────────

    fn should_stop(&self, epoch: u64) -> bool {
        !self.running.load(Ordering::SeqCst) || self.epoch.load(Ordering::SeqCst) != epoch
    }

    async fn worker_loop(self: Arc<Self>, worker: usize, epoch: u64) {
        debug!(worker, "worker loop started");
        while !self.should_stop(epoch) {
            let Some(node) = self.claim_next() else {
                tokio::time::sleep(self.config.scaled_backoff()).await;
                continue;
            };
            let id = node.id;
            if let Err(e) = self.run_node(id, epoch).await {
                warn!(worker, node = %id, error = %e, "analysis pass failed; moving on");
            }
            self.release(id);
        }
        debug!(worker, "worker loop stopped");
    }

    /// Select and claim the next node, or `None` if nothing is eligible.
    ///
    /// Runs entirely under the claim lock: concurrent idle workers
    /// serialize here, and each sees the other's claim before selecting.
    fn claim_next(&self) -> Option<Node> {
        let mut claims = self.claims.lock().unwrap();

        // Priority queue first. An entry whose node is mid-simulation on
        // another worker stays queued until that claim is released; entries
        // for completed or vanished nodes are consumed.
        {
            let mut queue = self.priority.lock().unwrap();
            let mut i = 0;
            while i < queue.len() {
                let id = queue[i];
                match self.store.node(id) {
                    None => {
                        queue.remove(i);
                    }
                    Some(node) if node.is_fully_analyzed() => {
                        queue.remove(i);
                    }
                    Some(_) if claims.contains(&id) => {
                        i += 1;
                    }
                    Some(node)
                        if matches!(node.status, NodeStatus::Pending | NodeStatus::Partial) =>
                    {
                        queue.remove(i);
                        claims.insert(id);
                        debug!(node = %id, "priority claim");
                        return Some(node);
                    }
                    Some(_) => {
                        i += 1;
                    }
                }
            }
        }

        let mode = *self.mode.read().unwrap();
        let pending: Vec<Node> = self
            .store
            .pending_nodes()
            .into_iter()
            .filter(|n| !claims.contains(&n.id))
            .collect();
        let partial: Vec<Node> = self
            .store
            .partial_nodes()
            .into_iter()
            .filter(|n| !claims.contains(&n.id))
            .collect();

        let chosen = selection::pick_next(mode, &pending, &partial, &mut rand::thread_rng())?;
        claims.insert(chosen.id);
        Some(chosen)
    }

    fn release(&self, id: NodeId) {
        self.claims.lock().unwrap().remove(&id);
    }

    /// Simulate one analysis phase for a claimed node.
    ///
    /// The stop flag is checked before every timed step; on stop the phase
    /// is abandoned and the node reverts to its pre-phase status with zero
    /// progress. The final commit (phase increment) is never interrupted.
    async fn run_node(&self, id: NodeId, epoch: u64) -> Result<(), PulseError> {
        let node = self.store.node(id).ok_or(PulseError::NodeNotFound(id))?;
        if node.is_fully_analyzed() {
            return Ok(());
        }

        let phase_index = node.current_phase + 1;
        let duration =
            self.config
                .phase_duration(node.complexity, phase_index, &mut rand::thread_rng());
        let steps = self.config.progress_steps.max(1);
        let step_time = duration / u32::from(steps);
        let step_size = 100 / steps;

        self.store
            .update_node_status(id, NodeStatus::Analyzing, 0, Some(node.current_phase));

        for step in 1..=steps {
            if self.should_stop(epoch) {
                let prior = if node.current_phase == 0 {
                    NodeStatus::Pending
                } else {
                    NodeStatus::Partial
                };
                self.store
                    .update_node_status(id, prior, 0, Some(node.current_phase));
                debug!(node = %id, phase = phase_index, "phase abandoned on stop");
                return Ok(());
            }
            tokio::time::sleep(step_time).await;
            if step < steps {
                self.store.update_node_status(
                    id,
                    NodeStatus::Analyzing,
                    step * step_size,
                    Some(node.current_phase),
                );
            }
        }

        let new_phase = node.current_phase + 1;
        if new_phase >= node.required_phases {
            self.store
                .update_node_status(id, NodeStatus::Completed, 100, Some(new_phase));
            info!(node = %id, "node fully analyzed");
        } else {
            self.store
                .update_node_status(id, NodeStatus::Partial, 100, Some(new_phase));
            debug!(
                node = %id,
                phase = new_phase,
                total = node.required_phases,
                "phase committed"
            );
        }
        Ok(())
    }
}
