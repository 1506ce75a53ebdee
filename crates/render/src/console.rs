use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tracing::{debug, info};

use pulse_core::{Edge, Node, NodeId, NodeStatus};

use crate::error::RenderError;
use crate::traits::Renderer;

/// Log-based backend: draws the graph as structured tracing output.
///
/// Per-step progress is high volume and logged at debug; lifecycle
/// transitions (phase commits, completions) land at info.
#[derive(Debug, Default)]
pub struct ConsoleRenderer {
    frames: AtomicUsize,
}

impl ConsoleRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of drawing calls handled so far.
    pub fn frame_count(&self) -> usize {
        self.frames.load(Ordering::Relaxed)
    }

    fn tick(&self) {
        self.frames.fetch_add(1, Ordering::Relaxed);
    }
}

#[async_trait]
impl Renderer for ConsoleRenderer {
    async fn update_nodes(&self, nodes: &[Node]) -> Result<(), RenderError> {
        self.tick();
        info!(nodes = nodes.len(), "graph nodes updated");
        Ok(())
    }

    async fn update_links(&self, edges: &[Edge]) -> Result<(), RenderError> {
        self.tick();
        info!(edges = edges.len(), "graph links updated");
        Ok(())
    }

    async fn update_node_status(
        &self,
        id: NodeId,
        status: NodeStatus,
        progress: u8,
        phase: u8,
    ) -> Result<(), RenderError> {
        self.tick();
        match status {
            NodeStatus::Analyzing => {
                debug!(node = %id, progress, phase, "analyzing");
            }
            status => {
                info!(node = %id, %status, progress, phase, "node state");
            }
        }
        Ok(())
    }

    async fn apply_filter(&self, nodes: &[Node], edges: &[Edge]) -> Result<(), RenderError> {
        self.tick();
        let visible_nodes = nodes.iter().filter(|n| !n.hidden).count();
        let visible_edges = edges.iter().filter(|e| !e.hidden).count();
        info!(
            visible_nodes,
            hidden_nodes = nodes.len() - visible_nodes,
            visible_edges,
            "filter applied"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pulse_core::{NodeType, Position};

    use super::*;

    #[tokio::test]
    async fn frame_count_tracks_calls() {
        let renderer = ConsoleRenderer::new();
        let nodes = vec![Node::new(NodeId(0), "getData()", NodeType::Function, Position::default())];

        renderer.update_nodes(&nodes).await.unwrap();
        renderer.update_links(&[]).await.unwrap();
        renderer
            .update_node_status(NodeId(0), NodeStatus::Analyzing, 10, 0)
            .await
            .unwrap();
        renderer.apply_filter(&nodes, &[]).await.unwrap();

        assert_eq!(renderer.frame_count(), 4);
    }
}
