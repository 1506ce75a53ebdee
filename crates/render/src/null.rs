use async_trait::async_trait;

use pulse_core::{Edge, Node, NodeId, NodeStatus};

use crate::error::RenderError;
use crate::traits::Renderer;

/// Headless backend: accepts everything and draws nothing. Keeps the core
/// fully usable with no visualization attached.
#[derive(Debug, Default)]
pub struct NullRenderer;

#[async_trait]
impl Renderer for NullRenderer {
    async fn update_nodes(&self, _nodes: &[Node]) -> Result<(), RenderError> {
        Ok(())
    }

    async fn update_links(&self, _edges: &[Edge]) -> Result<(), RenderError> {
        Ok(())
    }

    async fn update_node_status(
        &self,
        _id: NodeId,
        _status: NodeStatus,
        _progress: u8,
        _phase: u8,
    ) -> Result<(), RenderError> {
        Ok(())
    }

    async fn apply_filter(&self, _nodes: &[Node], _edges: &[Edge]) -> Result<(), RenderError> {
        Ok(())
    }
}
