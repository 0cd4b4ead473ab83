//! Input handling: mouse gestures and layout hotkeys

pub mod gesture;
pub mod hotkeys;
#[cfg(windows)]
pub mod poller;

pub use gesture::{GestureEvent, GestureTracker, InputSample};
pub use hotkeys::{default_bindings, HotkeyError, LayoutBinding};
