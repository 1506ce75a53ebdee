//! Backend selection.
//!
//! Backends are interchangeable behind [`Renderer`]; the kind is chosen
//! once at startup from configuration.

use std::str::FromStr;
use std::sync::Arc;

use tracing::info;

use crate::console::ConsoleRenderer;
use crate::error::RenderError;
use crate::null::NullRenderer;
use crate::traits::Renderer;

/// Available renderer backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RendererKind {
    Console,
    Null,
}

impl FromStr for RendererKind {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "console" => Ok(RendererKind::Console),
            "null" | "headless" => Ok(RendererKind::Null),
            other => Err(RenderError::UnknownBackend(other.to_string())),
        }
    }
}

/// Build the backend for the given kind.
pub fn create_renderer(kind: RendererKind) -> Arc<dyn Renderer> {
    info!(?kind, "creating renderer backend");
    match kind {
        RendererKind::Console => Arc::new(ConsoleRenderer::new()),
        RendererKind::Null => Arc::new(NullRenderer),
    }
}
