//! Read-only view of eligible top-level windows
//!
//! The registry never owns windows. It holds a per-tick copy of the rectangles
//! of windows that pass the eligibility predicate, and answers "which
//! neighbours could a dragged window snap to on this monitor".

use crate::domain::core::Rect;

/// Opaque, copyable window handle
///
/// Ownership of the real window always stays with the OS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WindowId(pub u64);

/// Minimised / maximised state reported by the window system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MinMaxState {
    #[default]
    Normal,
    Maximized,
    Minimized,
}

/// Transient copy of a window's state for one tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowRef {
    pub id: WindowId,
    pub rect: Rect,
    pub min_max_state: MinMaxState,
    pub class_name: String,
    pub process_name: String,
}

/// Decides whether a window takes part in positioning at all
pub trait EligibilityPredicate {
    fn is_eligible(&self, window: &WindowRef) -> bool;
}

impl<F> EligibilityPredicate for F
where
    F: Fn(&WindowRef) -> bool,
{
    fn is_eligible(&self, window: &WindowRef) -> bool {
        self(window)
    }
}

/// Default eligibility rules
///
/// Excludes shell windows by class, configured processes, minimised windows
/// and anything smaller than the minimum size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExclusionRules {
    pub excluded_classes: Vec<String>,
    pub excluded_processes: Vec<String>,
    pub min_width: i32,
    pub min_height: i32,
}

impl ExclusionRules {
    /// Shell window classes that are never positioned
    pub const DEFAULT_CLASSES: [&'static str; 6] = [
        "Shell_TrayWnd",
        "Shell_SecondaryTrayWnd",
        "Progman",
        "WorkerW",
        "NotifyIconOverflowWindow",
        "Windows.UI.Core.CoreWindow",
    ];
    pub const DEFAULT_MIN_SIZE: i32 = 50;
}

impl Default for ExclusionRules {
    fn default() -> Self {
        Self {
            excluded_classes: Self::DEFAULT_CLASSES.iter().map(|c| c.to_string()).collect(),
            excluded_processes: Vec::new(),
            min_width: Self::DEFAULT_MIN_SIZE,
            min_height: Self::DEFAULT_MIN_SIZE,
        }
    }
}

impl EligibilityPredicate for ExclusionRules {
    fn is_eligible(&self, window: &WindowRef) -> bool {
        if window.min_max_state == MinMaxState::Minimized {
            return false;
        }
        if window.rect.width() < self.min_width || window.rect.height() < self.min_height {
            return false;
        }
        if self.excluded_classes.iter().any(|class| class == &window.class_name) {
            return false;
        }
        !self
            .excluded_processes
            .iter()
            .any(|process| process.eq_ignore_ascii_case(&window.process_name))
    }
}

/// Eligible windows captured at the start of a tick
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WindowSnapshot {
    windows: Vec<WindowRef>,
}

impl WindowSnapshot {
    /// Keeps the windows accepted by `predicate`, preserving their order
    pub fn from_windows<I>(windows: I, predicate: &dyn EligibilityPredicate) -> Self
    where
        I: IntoIterator<Item = WindowRef>,
    {
        Self {
            windows: windows
                .into_iter()
                .filter(|window| predicate.is_eligible(window))
                .collect(),
        }
    }

    pub fn windows(&self) -> &[WindowRef] {
        &self.windows
    }

    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    pub fn get(&self, id: WindowId) -> Option<&WindowRef> {
        self.windows.iter().find(|window| window.id == id)
    }

    /// Rectangles of windows overlapping `monitor_bounds`, in snapshot order
    ///
    /// `exclude` (the dragged window) is never returned, and neither are
    /// degenerate rectangles.
    pub fn neighbors_on(&self, monitor_bounds: &Rect, exclude: WindowId) -> Vec<Rect> {
        self.windows
            .iter()
            .filter(|window| window.id != exclude)
            .map(|window| window.rect)
            .filter(|rect| !rect.is_degenerate() && rect.intersects(monitor_bounds))
            .collect()
    }
}
