//! Window queries and positioning
//!
//! All writes preserve focus and z-order: the drag never activates the
//! window it moves.

use std::path::Path;

use tracing::trace;
use windows::core::PWSTR;
use windows::Win32::Foundation::{CloseHandle, BOOL, HWND, LPARAM, RECT, TRUE};
use windows::Win32::System::Threading::{
    OpenProcess, QueryFullProcessImageNameW, PROCESS_NAME_WIN32, PROCESS_QUERY_LIMITED_INFORMATION,
};
use windows::Win32::UI::WindowsAndMessaging::{
    EnumWindows, GetClassNameW, GetForegroundWindow, GetWindow, GetWindowLongW, GetWindowRect, GetWindowThreadProcessId,
    IsIconic, IsWindow, IsWindowVisible, IsZoomed, SetWindowPos, ShowWindow, GWL_EXSTYLE, GW_OWNER,
    SWP_NOACTIVATE, SWP_NOZORDER, SW_RESTORE, WS_EX_TOOLWINDOW,
};

use crate::domain::core::Rect;
use crate::domain::registry::{MinMaxState, WindowId};
use crate::platform::win32::{hwnd_to_id, id_to_hwnd, rect_from_win32};
use crate::platform::{PlatformError, WindowSystem};

/// Window system backed by the live desktop
#[derive(Debug, Default, Clone, Copy)]
pub struct Win32WindowSystem;

impl WindowSystem for Win32WindowSystem {
    fn exists(&self, id: WindowId) -> bool {
        unsafe { IsWindow(id_to_hwnd(id)).as_bool() }
    }

    fn rect(&self, id: WindowId) -> Option<Rect> {
        let hwnd = id_to_hwnd(id);
        let mut rect = RECT::default();
        unsafe { GetWindowRect(hwnd, &mut rect) }.ok()?;
        Some(rect_from_win32(&rect))
    }

    fn min_max_state(&self, id: WindowId) -> MinMaxState {
        let hwnd = id_to_hwnd(id);
        unsafe {
            if IsIconic(hwnd).as_bool() {
                MinMaxState::Minimized
            } else if IsZoomed(hwnd).as_bool() {
                MinMaxState::Maximized
            } else {
                MinMaxState::Normal
            }
        }
    }

    fn restore(&mut self, id: WindowId) -> Result<(), PlatformError> {
        let hwnd = id_to_hwnd(id);
        if !self.exists(id) {
            return Err(PlatformError::WindowGone(id));
        }
        // ShowWindow reports the previous visibility, not success
        unsafe {
            let _ = ShowWindow(hwnd, SW_RESTORE);
        }
        if unsafe { IsZoomed(hwnd).as_bool() } {
            return Err(PlatformError::RestoreFailed(id));
        }
        Ok(())
    }

    fn set_rect(&mut self, id: WindowId, rect: Rect) -> Result<(), PlatformError> {
        let hwnd = id_to_hwnd(id);
        if !self.exists(id) {
            return Err(PlatformError::WindowGone(id));
        }
        trace!(?id, %rect, "SetWindowPos");
        unsafe {
            SetWindowPos(
                hwnd,
                HWND(0),
                rect.left,
                rect.top,
                rect.width(),
                rect.height(),
                SWP_NOACTIVATE | SWP_NOZORDER,
            )
        }
        .map_err(|_| PlatformError::PositionFailed(id))
    }

    fn class_and_process(&self, id: WindowId) -> Option<(String, String)> {
        let hwnd = id_to_hwnd(id);
        if !self.exists(id) {
            return None;
        }
        let mut class_buffer = [0u16; 256];
        let length = unsafe { GetClassNameW(hwnd, &mut class_buffer) };
        if length <= 0 {
            return None;
        }
        let class_name = String::from_utf16_lossy(&class_buffer[..length as usize]);
        // Elevated processes refuse the query; they still get a class
        let process_name = process_name(hwnd).unwrap_or_default();
        Some((class_name, process_name))
    }

    fn top_level_windows(&self) -> Vec<WindowId> {
        let mut windows: Vec<WindowId> = Vec::new();
        let result = unsafe {
            EnumWindows(
                Some(enum_window_proc),
                LPARAM(&mut windows as *mut Vec<WindowId> as isize),
            )
        };
        if result.is_err() {
            trace!("EnumWindows stopped early");
        }
        windows
    }
}

/// The window that currently has keyboard focus
pub fn foreground_window() -> Option<WindowId> {
    let hwnd = unsafe { GetForegroundWindow() };
    (hwnd.0 != 0).then(|| hwnd_to_id(hwnd))
}

/// Collects visible, unowned, non-tool windows in z-order
unsafe extern "system" fn enum_window_proc(hwnd: HWND, lparam: LPARAM) -> BOOL {
    let windows = unsafe { &mut *(lparam.0 as *mut Vec<WindowId>) };
    let visible = unsafe { IsWindowVisible(hwnd).as_bool() };
    let owned = unsafe { GetWindow(hwnd, GW_OWNER) }.0 != 0;
    let ex_style = unsafe { GetWindowLongW(hwnd, GWL_EXSTYLE) } as u32;
    let tool_window = ex_style & WS_EX_TOOLWINDOW.0 != 0;

    if visible && !owned && !tool_window {
        windows.push(hwnd_to_id(hwnd));
    }
    TRUE
}

/// Executable file name of the process owning `hwnd`
fn process_name(hwnd: HWND) -> Option<String> {
    let mut pid = 0u32;
    unsafe { GetWindowThreadProcessId(hwnd, Some(&mut pid)) };
    if pid == 0 {
        return None;
    }

    let process = unsafe { OpenProcess(PROCESS_QUERY_LIMITED_INFORMATION, false, pid) }.ok()?;
    let mut buffer = [0u16; 1024];
    let mut size = buffer.len() as u32;
    let queried = unsafe {
        QueryFullProcessImageNameW(process, PROCESS_NAME_WIN32, PWSTR(buffer.as_mut_ptr()), &mut size)
    };
    unsafe {
        let _ = CloseHandle(process);
    }
    queried.ok()?;

    let path = String::from_utf16_lossy(&buffer[..size as usize]);
    Path::new(&path)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
}
