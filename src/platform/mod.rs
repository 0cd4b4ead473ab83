//! Collaborator seams between the positioning core and the OS
//!
//! The core never touches the OS directly. It talks to these traits, which
//! the Win32 adapters in [`win32`] implement for real windows and monitors.

use std::time::Duration;

use thiserror::Error;

use crate::domain::core::Rect;
use crate::domain::registry::{MinMaxState, WindowId, WindowRef};
use crate::domain::topology::{PhysicalMonitor, SplitConfig};

#[cfg(windows)]
pub mod win32;

/// Error types for OS collaborator operations
#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("failed to enumerate monitors")]
    MonitorEnumerationFailed,
    #[error("no monitors found during enumeration")]
    NoMonitors,
    #[error("window {0:?} no longer exists")]
    WindowGone(WindowId),
    #[error("failed to restore window {0:?}")]
    RestoreFailed(WindowId),
    #[error("failed to position window {0:?}")]
    PositionFailed(WindowId),
}

/// Access to top-level windows
pub trait WindowSystem {
    fn exists(&self, id: WindowId) -> bool;

    /// Current outer rectangle, `None` if the window is gone
    fn rect(&self, id: WindowId) -> Option<Rect>;

    fn min_max_state(&self, id: WindowId) -> MinMaxState;

    /// Un-maximises the window
    fn restore(&mut self, id: WindowId) -> Result<(), PlatformError>;

    /// Moves and resizes the window in a single call
    fn set_rect(&mut self, id: WindowId, rect: Rect) -> Result<(), PlatformError>;

    /// Window class and owning process name, `None` if the window is gone
    fn class_and_process(&self, id: WindowId) -> Option<(String, String)>;

    /// Visible top-level windows, front to back
    fn top_level_windows(&self) -> Vec<WindowId>;

    /// Builds the transient copy of a window used by the registry
    fn window_ref(&self, id: WindowId) -> Option<WindowRef> {
        let rect = self.rect(id)?;
        let (class_name, process_name) = self.class_and_process(id)?;
        Some(WindowRef {
            id,
            rect,
            min_max_state: self.min_max_state(id),
            class_name,
            process_name,
        })
    }
}

/// Source of physical monitor geometry, stable for one tick
pub trait MonitorSource {
    fn enumerate_physical_monitors(&self) -> Result<Vec<PhysicalMonitor>, PlatformError>;
}

/// Read-only access to the resolved split configuration
pub trait SplitConfigStore {
    fn active_splits(&self) -> Vec<SplitConfig>;
}

/// Visual feedback during a drag
///
/// Show/hide calls are paired by [`crate::ui::overlay::PreviewOverlay`];
/// implementations never need to track ownership themselves.
pub trait FeedbackSink {
    fn show_preview(&mut self, rect: Rect);
    fn update_preview(&mut self, rect: Rect);
    fn hide_preview(&mut self);
    fn show_transient_message(&mut self, text: &str, duration: Duration);

    /// Called once per main-loop pass so time-based feedback can expire
    fn refresh(&mut self) {}
}

impl<T: FeedbackSink + ?Sized> FeedbackSink for &mut T {
    fn show_preview(&mut self, rect: Rect) {
        (**self).show_preview(rect)
    }

    fn update_preview(&mut self, rect: Rect) {
        (**self).update_preview(rect)
    }

    fn hide_preview(&mut self) {
        (**self).hide_preview()
    }

    fn show_transient_message(&mut self, text: &str, duration: Duration) {
        (**self).show_transient_message(text, duration)
    }

    fn refresh(&mut self) {
        (**self).refresh()
    }
}

impl<T: FeedbackSink + ?Sized> FeedbackSink for Box<T> {
    fn show_preview(&mut self, rect: Rect) {
        (**self).show_preview(rect)
    }

    fn update_preview(&mut self, rect: Rect) {
        (**self).update_preview(rect)
    }

    fn hide_preview(&mut self) {
        (**self).hide_preview()
    }

    fn show_transient_message(&mut self, text: &str, duration: Duration) {
        (**self).show_transient_message(text, duration)
    }

    fn refresh(&mut self) {
        (**self).refresh()
    }
}
