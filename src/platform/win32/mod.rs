//! Win32 implementations of the collaborator traits
//!
//! Coordinates are physical pixels; the binary opts into per-monitor DPI
//! awareness before any of these are used.

pub mod monitors;
pub mod window;

use windows::Win32::Foundation::{HWND, RECT};

use crate::domain::core::Rect;
use crate::domain::registry::WindowId;

pub use monitors::Win32MonitorSource;
pub use window::Win32WindowSystem;

pub fn rect_from_win32(rect: &RECT) -> Rect {
    Rect::new(rect.left, rect.top, rect.right, rect.bottom)
}

pub fn hwnd_to_id(hwnd: HWND) -> WindowId {
    WindowId(hwnd.0 as u64)
}

pub fn id_to_hwnd(id: WindowId) -> HWND {
    HWND(id.0 as isize)
}
