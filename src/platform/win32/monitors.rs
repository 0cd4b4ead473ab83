//! Monitor enumeration
//!
//! Monitors are numbered in enumeration order; that index is the physical
//! monitor id the split settings refer to. Secondary monitors can sit at
//! negative coordinates.

use tracing::warn;
use windows::Win32::Foundation::{BOOL, FALSE, LPARAM, RECT, TRUE};
use windows::Win32::Graphics::Gdi::{EnumDisplayMonitors, GetMonitorInfoW, HDC, HMONITOR, MONITORINFO};

use crate::domain::topology::{MonitorId, PhysicalMonitor};
use crate::platform::win32::rect_from_win32;
use crate::platform::{MonitorSource, PlatformError};

/// MONITORINFOF_PRIMARY
const PRIMARY_FLAG: u32 = 1;

/// Reads the current monitor layout from the OS on every call
#[derive(Debug, Default, Clone, Copy)]
pub struct Win32MonitorSource;

impl MonitorSource for Win32MonitorSource {
    fn enumerate_physical_monitors(&self) -> Result<Vec<PhysicalMonitor>, PlatformError> {
        let mut monitors: Vec<PhysicalMonitor> = Vec::new();

        let ok = unsafe {
            EnumDisplayMonitors(
                None,
                None,
                Some(enum_monitor_proc),
                LPARAM(&mut monitors as *mut Vec<PhysicalMonitor> as isize),
            )
        };
        if ok == FALSE {
            return Err(PlatformError::MonitorEnumerationFailed);
        }
        if monitors.is_empty() {
            return Err(PlatformError::NoMonitors);
        }
        Ok(monitors)
    }
}

/// Appends one monitor per callback; a monitor whose info can't be read is
/// skipped rather than aborting the enumeration
unsafe extern "system" fn enum_monitor_proc(
    hmonitor: HMONITOR,
    _hdc: HDC,
    _rect: *mut RECT,
    lparam: LPARAM,
) -> BOOL {
    let monitors = unsafe { &mut *(lparam.0 as *mut Vec<PhysicalMonitor>) };
    let id = MonitorId(monitors.len() as u32);

    let mut info = MONITORINFO {
        cbSize: std::mem::size_of::<MONITORINFO>() as u32,
        ..Default::default()
    };
    if unsafe { GetMonitorInfoW(hmonitor, &mut info) } == FALSE {
        warn!(monitor = id.0, "failed to read monitor info, skipping");
        return TRUE;
    }

    monitors.push(PhysicalMonitor {
        id,
        bounds: rect_from_win32(&info.rcMonitor),
        work_area: rect_from_win32(&info.rcWork),
        is_primary: info.dwFlags & PRIMARY_FLAG != 0,
    });
    TRUE
}
