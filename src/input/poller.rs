//! Win32 input polling
//!
//! Reads the asynchronous key state once per tick and builds an
//! [`InputSample`] for the gesture tracker.

use windows::Win32::Foundation::{POINT, RECT};
use windows::Win32::UI::Input::KeyboardAndMouse::{
    GetAsyncKeyState, VIRTUAL_KEY, VK_ESCAPE, VK_LBUTTON, VK_MENU, VK_RBUTTON,
};
use windows::Win32::UI::WindowsAndMessaging::{GetAncestor, GetCursorPos, GetWindowRect, WindowFromPoint, GA_ROOT};

use crate::domain::core::{Point, Rect};
use crate::domain::registry::WindowId;
use crate::input::gesture::InputSample;
use crate::platform::win32::{hwnd_to_id, rect_from_win32};

fn is_down(key: VIRTUAL_KEY) -> bool {
    let state = unsafe { GetAsyncKeyState(key.0 as i32) };
    (state as u16 & 0x8000) != 0
}

/// Polls mouse and keyboard state with Alt as the gesture modifier
#[derive(Debug, Default)]
pub struct InputPoller;

impl InputPoller {
    pub fn new() -> Self {
        Self
    }

    pub fn sample(&self) -> InputSample {
        let mut point = POINT::default();
        if unsafe { GetCursorPos(&mut point) }.is_err() {
            return InputSample::default();
        }
        let modifier_down = is_down(VK_MENU);

        InputSample {
            cursor: Point::new(point.x, point.y),
            modifier_down,
            left_down: is_down(VK_LBUTTON),
            right_down: is_down(VK_RBUTTON),
            escape_down: is_down(VK_ESCAPE),
            // Only needed to start a gesture, which requires the modifier
            target: if modifier_down { window_under(point) } else { None },
        }
    }
}

fn window_under(point: POINT) -> Option<(WindowId, Rect)> {
    unsafe {
        let hit = WindowFromPoint(point);
        if hit.0 == 0 {
            return None;
        }
        let root = GetAncestor(hit, GA_ROOT);
        let hwnd = if root.0 == 0 { hit } else { root };

        let mut rect = RECT::default();
        GetWindowRect(hwnd, &mut rect).ok()?;
        Some((hwnd_to_id(hwnd), rect_from_win32(&rect)))
    }
}
