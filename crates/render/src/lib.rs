pub mod bridge;
pub mod console;
pub mod error;
pub mod factory;
pub mod null;
pub mod traits;

pub use bridge::RenderBridge;
pub use console::ConsoleRenderer;
pub use error::RenderError;
pub use factory::{create_renderer, RendererKind};
pub use null::NullRenderer;
pub use traits::Renderer;
