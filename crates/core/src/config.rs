use std::env;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PulseError;

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_usize(key: &str, default: usize) -> usize {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn env_f64(key: &str, default: f64) -> f64 {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Node selection policy for the worker scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisMode {
    /// Spread phase work across all nodes before deepening any single one.
    Progressive,
    /// Finish one node's remaining phases before starting new nodes.
    Complete,
}

impl FromStr for AnalysisMode {
    type Err = PulseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "progressive" => Ok(AnalysisMode::Progressive),
            "complete" => Ok(AnalysisMode::Complete),
            other => Err(PulseError::Config(format!("unknown analysis mode: {other}"))),
        }
    }
}

impl fmt::Display for AnalysisMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisMode::Progressive => write!(f, "progressive"),
            AnalysisMode::Complete => write!(f, "complete"),
        }
    }
}

/// Bounds on the worker count, enforced at this boundary so the scheduler
/// can assume validated input.
pub const MIN_WORKERS: usize = 1;
pub const MAX_WORKERS: usize = 8;

/// Application configuration, read from environment variables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Number of simulated worker loops, clamped to `1..=8`.
    pub workers: usize,
    /// Total node count for graph generation.
    pub nodes: usize,
    /// Default selection policy.
    pub mode: AnalysisMode,
    /// Renderer backend name (resolved by the render factory).
    pub renderer: String,
    /// Multiplier on all simulated durations (useful below 1.0 for demos).
    pub time_scale: f64,
}

impl Config {
    /// Build config from environment variables (call `load_dotenv()` first).
    pub fn from_env() -> Self {
        let workers = env_usize("PULSE_WORKERS", 3).clamp(MIN_WORKERS, MAX_WORKERS);
        let nodes = env_usize("PULSE_NODES", 51).max(1);
        let mode = env_or("PULSE_MODE", "progressive")
            .parse()
            .unwrap_or(AnalysisMode::Progressive);
        Self {
            workers,
            nodes,
            mode,
            renderer: env_or("PULSE_RENDERER", "console"),
            time_scale: env_f64("PULSE_TIME_SCALE", 1.0).max(0.0),
        }
    }

    /// Print a summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Config loaded:");
        tracing::info!("  workers:    {}", self.workers);
        tracing::info!("  nodes:      {}", self.nodes);
        tracing::info!("  mode:       {}", self.mode);
        tracing::info!("  renderer:   {}", self.renderer);
        tracing::info!("  time_scale: {}", self.time_scale);
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            workers: 3,
            nodes: 51,
            mode: AnalysisMode::Progressive,
            renderer: "console".to_string(),
            time_scale: 1.0,
        }
    }
}
