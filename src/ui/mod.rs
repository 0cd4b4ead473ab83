//! Drag preview: scoped ownership, rendering and the Win32 window

#[cfg(windows)]
pub mod layered;
pub mod overlay;
pub mod renderer;

pub use overlay::{PreviewOverlay, TransientMessage};
pub use renderer::{PreviewRenderer, PreviewStyle, RendererError};
