//! pulse-demo — run a full simulated analysis session headlessly.
//!
//! Generates a synthetic code graph, attaches a renderer backend through
//! the bus bridge, starts the worker scheduler, and polls until every node
//! completes. Environment config (PULSE_*) provides defaults; CLI flags
//! override.

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing::{info, warn};

use pulse_bus::{topics, Event, EventBus};
use pulse_core::config::{load_dotenv, MAX_WORKERS, MIN_WORKERS};
use pulse_core::{AnalysisMode, Config};
use pulse_engine::{AnalysisEngine, EngineConfig};
use pulse_graph::{generate_graph, GraphStore};
use pulse_render::{create_renderer, RenderBridge, RendererKind};

// ── CLI ─────────────────────────────────────────────────────────────

/// Simulated concurrent code-analysis demo.
#[derive(Parser, Debug)]
#[command(name = "pulse-demo", version, about)]
struct Cli {
    /// Worker loop count (1-8).
    #[arg(long)]
    workers: Option<usize>,

    /// Total node count for the generated graph.
    #[arg(long)]
    nodes: Option<usize>,

    /// Selection policy: progressive | complete.
    #[arg(long)]
    mode: Option<AnalysisMode>,

    /// Renderer backend: console | null.
    #[arg(long)]
    renderer: Option<String>,

    /// Multiplier on simulated durations (below 1.0 speeds the demo up).
    #[arg(long)]
    time_scale: Option<f64>,
}

impl Cli {
    fn apply(self, config: &mut Config) {
        if let Some(workers) = self.workers {
            config.workers = workers.clamp(MIN_WORKERS, MAX_WORKERS);
        }
        if let Some(nodes) = self.nodes {
            config.nodes = nodes.max(1);
        }
        if let Some(mode) = self.mode {
            config.mode = mode;
        }
        if let Some(renderer) = self.renderer {
            config.renderer = renderer;
        }
        if let Some(time_scale) = self.time_scale {
            config.time_scale = time_scale.max(0.0);
        }
    }
}

// ── main ────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    load_dotenv();
    let mut config = Config::from_env();
    Cli::parse().apply(&mut config);
    config.log_summary();

    let bus = Arc::new(EventBus::new());
    let store = Arc::new(GraphStore::new(bus.clone()));

    // An unknown backend degrades to headless instead of aborting the run.
    let kind = match config.renderer.parse::<RendererKind>() {
        Ok(kind) => kind,
        Err(e) => {
            warn!(error = %e, "renderer unavailable, running headless");
            bus.publish(Event::VisualizationError {
                message: e.to_string(),
            });
            RendererKind::Null
        }
    };
    let renderer = create_renderer(kind);
    let bridge = RenderBridge::attach(bus.clone(), renderer);

    let (nodes, edges) = generate_graph(config.nodes, &mut rand::thread_rng());
    store.install(nodes, edges);

    let engine_config = EngineConfig {
        mode: config.mode,
        time_scale: config.time_scale,
        ..EngineConfig::default()
    };
    let engine = Arc::new(AnalysisEngine::new(store.clone(), bus.clone(), engine_config));

    engine.start(config.workers);
    while !engine.is_complete() {
        tokio::time::sleep(Duration::from_millis(250)).await;
    }

    let stats = store.stats();
    info!(
        completed = stats.completed,
        total_progress = stats.total_progress,
        "analysis complete"
    );

    // Wait for the drained-state confirmation before tearing down.
    let stopped = Arc::new(tokio::sync::Notify::new());
    let notify = stopped.clone();
    bus.subscribe_once(topics::ANALYSIS_STOPPED, move |_| {
        notify.notify_one();
    });
    engine.stop();
    if tokio::time::timeout(Duration::from_secs(10), stopped.notified())
        .await
        .is_err()
    {
        warn!("timed out waiting for scheduler drain");
    }

    bridge.detach().await;
    info!("demo finished");
    Ok(())
}
