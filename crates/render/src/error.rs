use thiserror::Error;

/// Errors raised by the render boundary.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("unknown renderer backend: {0}")]
    UnknownBackend(String),

    #[error("renderer backend failure: {0}")]
    Backend(String),
}
