use std::sync::Arc;

use async_trait::async_trait;

use pulse_core::{Edge, Node, NodeId, NodeStatus};

use crate::error::RenderError;

/// Capability set every visualization backend must provide.
///
/// The core never depends on a concrete rendering technology; it only
/// reaches a backend through this trait, driven by bus events via
/// [`RenderBridge`](crate::RenderBridge). Backends may block on I/O, so
/// the methods are async and run off the publishing path.
#[async_trait]
pub trait Renderer: Send + Sync {
    /// Replace the rendered node collection.
    async fn update_nodes(&self, nodes: &[Node]) -> Result<(), RenderError>;

    /// Replace the rendered edge collection.
    async fn update_links(&self, edges: &[Edge]) -> Result<(), RenderError>;

    /// Reflect one node's lifecycle change.
    async fn update_node_status(
        &self,
        id: NodeId,
        status: NodeStatus,
        progress: u8,
        phase: u8,
    ) -> Result<(), RenderError>;

    /// Re-render after a visibility filter changed.
    async fn apply_filter(&self, nodes: &[Node], edges: &[Edge]) -> Result<(), RenderError>;
}

/// Blanket implementation so `Arc<dyn Renderer>` can be used directly.
#[async_trait]
impl<T: Renderer + ?Sized> Renderer for Arc<T> {
    async fn update_nodes(&self, nodes: &[Node]) -> Result<(), RenderError> {
        (**self).update_nodes(nodes).await
    }

    async fn update_links(&self, edges: &[Edge]) -> Result<(), RenderError> {
        (**self).update_links(edges).await
    }

    async fn update_node_status(
        &self,
        id: NodeId,
        status: NodeStatus,
        progress: u8,
        phase: u8,
    ) -> Result<(), RenderError> {
        (**self).update_node_status(id, status, progress, phase).await
    }

    async fn apply_filter(&self, nodes: &[Node], edges: &[Edge]) -> Result<(), RenderError> {
        (**self).apply_filter(nodes, edges).await
    }
}
