//! Bus-to-renderer forwarding.
//!
//! Bus delivery is synchronous on the publisher's thread, while backends
//! may block on drawing. The bridge decouples the two: subscriptions push
//! events into an unbounded channel and a dedicated tokio task drives the
//! renderer. A backend failure degrades to a `pulse.render.error` event —
//! the store and scheduler never notice.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use pulse_bus::{topics, Event, EventBus, SubscriberId};

use crate::traits::Renderer;

/// Render-relevant topics the bridge forwards.
const FORWARDED_TOPICS: [&str; 4] = [
    topics::NODES_UPDATED,
    topics::LINKS_UPDATED,
    topics::NODE_STATUS_UPDATED,
    topics::VISIBILITY_UPDATED,
];

/// Connects an [`EventBus`] to a [`Renderer`] backend.
pub struct RenderBridge {
    bus: Arc<EventBus>,
    subscriptions: Vec<(&'static str, SubscriberId)>,
    shutdown: Arc<Notify>,
    task: JoinHandle<()>,
}

impl RenderBridge {
    /// Subscribe to the render topics and spawn the forwarding task.
    pub fn attach(bus: Arc<EventBus>, renderer: Arc<dyn Renderer>) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<Event>();

        let mut subscriptions = Vec::with_capacity(FORWARDED_TOPICS.len());
        for topic in FORWARDED_TOPICS {
            let tx = tx.clone();
            let id = bus.subscribe(topic, move |event| {
                let _ = tx.send(event.clone());
            });
            subscriptions.push((topic, id));
        }

        let shutdown = Arc::new(Notify::new());
        let loop_bus = bus.clone();
        let loop_shutdown = shutdown.clone();
        let task = tokio::spawn(async move {
            loop {
                tokio::select! {
                    received = rx.recv() => match received {
                        Some(event) => dispatch(&loop_bus, renderer.as_ref(), event).await,
                        None => break,
                    },
                    _ = loop_shutdown.notified() => break,
                }
            }
            debug!("render bridge loop exited");
        });

        Self {
            bus,
            subscriptions,
            shutdown,
            task,
        }
    }

    /// Unsubscribe and stop the forwarding task. Events already queued are
    /// dropped; the renderer itself is left untouched.
    pub async fn detach(self) {
        for (topic, id) in &self.subscriptions {
            self.bus.unsubscribe(topic, *id);
        }
        self.shutdown.notify_waiters();
        let _ = self.task.await;
    }
}

async fn dispatch(bus: &EventBus, renderer: &dyn Renderer, event: Event) {
    let result = match &event {
        Event::NodesUpdated { nodes } => renderer.update_nodes(nodes).await,
        Event::LinksUpdated { edges } => renderer.update_links(edges).await,
        Event::NodeStatusUpdated {
            id,
            status,
            progress,
            phase,
        } => renderer.update_node_status(*id, *status, *progress, *phase).await,
        Event::VisibilityUpdated { nodes, edges } => renderer.apply_filter(nodes, edges).await,
        _ => Ok(()),
    };

    if let Err(e) = result {
        warn!(error = %e, topic = event.topic(), "renderer failed; degrading to error event");
        bus.publish(Event::VisualizationError {
            message: e.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;

    use pulse_core::{Edge, Node, NodeId, NodeStatus, NodeType, Position};

    use super::*;
    use crate::error::RenderError;

    /// Records every call; optionally fails all of them.
    #[derive(Default)]
    struct MockRenderer {
        calls: Mutex<Vec<String>>,
        fail: bool,
    }

    impl MockRenderer {
        fn failing() -> Self {
            Self {
                fail: true,
                ..Self::default()
            }
        }

        fn outcome(&self, call: &str) -> Result<(), RenderError> {
            self.calls.lock().unwrap().push(call.to_string());
            if self.fail {
                Err(RenderError::Backend("library missing".into()))
            } else {
                Ok(())
            }
        }
    }

    #[async_trait]
    impl Renderer for MockRenderer {
        async fn update_nodes(&self, _nodes: &[Node]) -> Result<(), RenderError> {
            self.outcome("nodes")
        }

        async fn update_links(&self, _edges: &[Edge]) -> Result<(), RenderError> {
            self.outcome("links")
        }

        async fn update_node_status(
            &self,
            _id: NodeId,
            _status: NodeStatus,
            _progress: u8,
            _phase: u8,
        ) -> Result<(), RenderError> {
            self.outcome("status")
        }

        async fn apply_filter(&self, _nodes: &[Node], _edges: &[Edge]) -> Result<(), RenderError> {
            self.outcome("filter")
        }
    }

    async fn wait_for<F: Fn() -> bool>(cond: F) {
        tokio::time::timeout(Duration::from_secs(2), async {
            while !cond() {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("condition not met in time");
    }

    fn sample_node() -> Node {
        Node::new(NodeId(0), "getData()", NodeType::Function, Position::default())
    }

    #[tokio::test]
    async fn forwards_bus_events_to_renderer() {
        let bus = Arc::new(EventBus::new());
        let renderer = Arc::new(MockRenderer::default());
        let bridge = RenderBridge::attach(bus.clone(), renderer.clone());

        bus.publish(Event::NodesUpdated {
            nodes: vec![sample_node()],
        });
        bus.publish(Event::NodeStatusUpdated {
            id: NodeId(0),
            status: NodeStatus::Analyzing,
            progress: 10,
            phase: 0,
        });

        wait_for(|| renderer.calls.lock().unwrap().len() == 2).await;
        assert_eq!(*renderer.calls.lock().unwrap(), vec!["nodes", "status"]);

        bridge.detach().await;
    }

    #[tokio::test]
    async fn backend_failure_degrades_to_error_event() {
        let bus = Arc::new(EventBus::new());
        let renderer = Arc::new(MockRenderer::failing());
        let bridge = RenderBridge::attach(bus.clone(), renderer.clone());

        let errors = Arc::new(Mutex::new(Vec::new()));
        let sink = errors.clone();
        bus.subscribe(topics::VISUALIZATION_ERROR, move |ev| {
            if let Event::VisualizationError { message } = ev {
                sink.lock().unwrap().push(message.clone());
            }
        });

        bus.publish(Event::LinksUpdated { edges: Vec::new() });

        wait_for(|| !errors.lock().unwrap().is_empty()).await;
        assert!(errors.lock().unwrap()[0].contains("library missing"));

        bridge.detach().await;
    }

    #[tokio::test]
    async fn detach_stops_forwarding() {
        let bus = Arc::new(EventBus::new());
        let renderer = Arc::new(MockRenderer::default());
        let bridge = RenderBridge::attach(bus.clone(), renderer.clone());

        bridge.detach().await;
        assert_eq!(bus.subscriber_count(topics::NODE_STATUS_UPDATED), 0);

        bus.publish(Event::NodesUpdated { nodes: Vec::new() });
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(renderer.calls.lock().unwrap().is_empty());
    }
}
