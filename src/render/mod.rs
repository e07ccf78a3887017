//! CPU rendering of the dot field.

/// Renderer appearance settings.
pub mod config;
/// The dot-field renderer.
pub mod dots;

pub use config::RenderConfig;
pub use dots::{DotRenderer, dot_color, settledness};
