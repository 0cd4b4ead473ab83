//! Layered topmost window that displays the drag preview
//!
//! The window never takes focus and is transparent to input. Each frame is
//! rendered by [`PreviewRenderer`] and pushed with `UpdateLayeredWindow`, so
//! there is no WM_PAINT handling and no flicker.

use std::ffi::c_void;
use std::time::{Duration, Instant};

use tracing::{debug, warn};
use windows::core::w;
use windows::Win32::Foundation::{COLORREF, HWND, LPARAM, LRESULT, POINT, SIZE, WPARAM};
use windows::Win32::Graphics::Gdi::{
    CreateCompatibleDC, CreateDIBSection, DeleteDC, DeleteObject, GetDC, ReleaseDC, SelectObject,
    AC_SRC_ALPHA, AC_SRC_OVER, BITMAPINFO, BITMAPINFOHEADER, BI_RGB, BLENDFUNCTION, DIB_RGB_COLORS,
    HGDIOBJ,
};
use windows::Win32::System::LibraryLoader::GetModuleHandleW;
use windows::Win32::UI::WindowsAndMessaging::{
    CreateWindowExW, DefWindowProcW, DestroyWindow, RegisterClassW, ShowWindow, UpdateLayeredWindow,
    SW_HIDE, SW_SHOWNOACTIVATE, ULW_ALPHA, WNDCLASSW, WS_EX_LAYERED, WS_EX_NOACTIVATE,
    WS_EX_TOOLWINDOW, WS_EX_TOPMOST, WS_EX_TRANSPARENT, WS_POPUP,
};

use crate::domain::core::Rect;
use crate::platform::FeedbackSink;
use crate::ui::overlay::TransientMessage;
use crate::ui::renderer::{to_bgra_premultiplied, PreviewRenderer, RendererError};

/// Preview window errors
#[derive(Debug, thiserror::Error)]
pub enum OverlayError {
    #[error("Failed to get module handle")]
    ModuleHandleFailed,

    #[error("Failed to create preview window")]
    WindowCreationFailed,

    #[error("Failed to acquire screen device context")]
    DeviceContextFailed,

    #[error("Failed to create memory device context")]
    MemoryDeviceContextFailed,

    #[error("Failed to create DIB section for preview frame")]
    DibSectionCreationFailed,

    #[error("Failed to select bitmap into memory DC")]
    BitmapSelectionFailed,

    #[error("Failed to update layered window surface")]
    LayerUpdateFailed,

    #[error("Rendering failed: {0}")]
    Rendering(#[from] RendererError),
}

/// Win32 [`FeedbackSink`] drawing the preview in a layered window
pub struct LayeredPreview {
    hwnd: HWND,
    renderer: PreviewRenderer,
    rect: Option<Rect>,
    visible: bool,
    message: Option<TransientMessage>,
}

impl LayeredPreview {
    pub fn new(renderer: PreviewRenderer) -> Result<Self, OverlayError> {
        let class_name = w!("TactileSnapPreview");
        let hinstance = unsafe { GetModuleHandleW(None) }.map_err(|_| OverlayError::ModuleHandleFailed)?;

        unsafe extern "system" fn preview_window_proc(
            hwnd: HWND,
            msg: u32,
            wparam: WPARAM,
            lparam: LPARAM,
        ) -> LRESULT {
            unsafe { DefWindowProcW(hwnd, msg, wparam, lparam) }
        }

        let wc = WNDCLASSW {
            lpfnWndProc: Some(preview_window_proc),
            hInstance: hinstance.into(),
            lpszClassName: class_name,
            ..Default::default()
        };
        // A second registration fails harmlessly; creation below is what counts
        unsafe { RegisterClassW(&wc) };

        let hwnd = unsafe {
            CreateWindowExW(
                WS_EX_LAYERED | WS_EX_TOPMOST | WS_EX_NOACTIVATE | WS_EX_TOOLWINDOW | WS_EX_TRANSPARENT,
                class_name,
                w!("tactile-snap preview"),
                WS_POPUP,
                0,
                0,
                0,
                0,
                None,
                None,
                hinstance,
                None,
            )
        };
        if hwnd.0 == 0 {
            return Err(OverlayError::WindowCreationFailed);
        }

        Ok(Self {
            hwnd,
            renderer,
            rect: None,
            visible: false,
            message: None,
        })
    }

    fn redraw(&mut self) -> Result<(), OverlayError> {
        let Some(rect) = self.rect else {
            return Ok(());
        };
        let now = Instant::now();
        if self.message.as_ref().is_some_and(|m| m.is_expired(now)) {
            self.message = None;
        }
        let message = self.message.as_ref().and_then(|m| m.text_at(now));
        let layout = self.renderer.layout(rect, message)?;
        let pixmap = self.renderer.render(&layout)?;
        self.present(rect, &pixmap)
    }

    fn redraw_or_warn(&mut self) {
        if let Err(err) = self.redraw() {
            warn!(%err, "failed to draw preview");
        }
    }

    /// Pushes a rendered frame to the window at `rect`
    fn present(&self, rect: Rect, pixmap: &tiny_skia::Pixmap) -> Result<(), OverlayError> {
        let width = pixmap.width() as i32;
        let height = pixmap.height() as i32;
        let bgra = to_bgra_premultiplied(pixmap);

        unsafe {
            let screen_dc = GetDC(HWND(0));
            if screen_dc.0 == 0 {
                return Err(OverlayError::DeviceContextFailed);
            }

            let memory_dc = CreateCompatibleDC(screen_dc);
            if memory_dc.0 == 0 {
                ReleaseDC(HWND(0), screen_dc);
                return Err(OverlayError::MemoryDeviceContextFailed);
            }

            let mut bitmap_info = BITMAPINFO::default();
            bitmap_info.bmiHeader = BITMAPINFOHEADER {
                biSize: std::mem::size_of::<BITMAPINFOHEADER>() as u32,
                biWidth: width,
                biHeight: -height, // top-down
                biPlanes: 1,
                biBitCount: 32,
                biCompression: BI_RGB.0,
                ..Default::default()
            };

            let mut pixel_ptr: *mut c_void = std::ptr::null_mut();
            let dib = match CreateDIBSection(memory_dc, &bitmap_info, DIB_RGB_COLORS, &mut pixel_ptr, None, 0) {
                Ok(bitmap) => bitmap,
                Err(_) => {
                    DeleteDC(memory_dc);
                    ReleaseDC(HWND(0), screen_dc);
                    return Err(OverlayError::DibSectionCreationFailed);
                }
            };
            let dib_object: HGDIOBJ = dib.into();

            if pixel_ptr.is_null() {
                DeleteObject(dib_object);
                DeleteDC(memory_dc);
                ReleaseDC(HWND(0), screen_dc);
                return Err(OverlayError::DibSectionCreationFailed);
            }
            std::slice::from_raw_parts_mut(pixel_ptr as *mut u8, bgra.len()).copy_from_slice(&bgra);

            let old_bitmap = SelectObject(memory_dc, dib_object);
            if old_bitmap.0 == 0 {
                DeleteObject(dib_object);
                DeleteDC(memory_dc);
                ReleaseDC(HWND(0), screen_dc);
                return Err(OverlayError::BitmapSelectionFailed);
            }

            let size = SIZE { cx: width, cy: height };
            let dst_point = POINT {
                x: rect.left,
                y: rect.top,
            };
            let src_point = POINT { x: 0, y: 0 };
            let blend = BLENDFUNCTION {
                BlendOp: AC_SRC_OVER as u8,
                BlendFlags: 0,
                SourceConstantAlpha: 255,
                AlphaFormat: AC_SRC_ALPHA as u8,
            };

            let update_result = UpdateLayeredWindow(
                self.hwnd,
                screen_dc,
                Some(&dst_point),
                Some(&size),
                memory_dc,
                Some(&src_point),
                COLORREF(0),
                Some(&blend),
                ULW_ALPHA,
            );

            SelectObject(memory_dc, old_bitmap);
            DeleteObject(dib_object);
            DeleteDC(memory_dc);
            ReleaseDC(HWND(0), screen_dc);

            update_result.map_err(|_| OverlayError::LayerUpdateFailed)
        }
    }
}

impl FeedbackSink for LayeredPreview {
    fn show_preview(&mut self, rect: Rect) {
        self.rect = Some(rect);
        self.redraw_or_warn();
        unsafe {
            let _ = ShowWindow(self.hwnd, SW_SHOWNOACTIVATE);
        }
        self.visible = true;
    }

    fn update_preview(&mut self, rect: Rect) {
        self.rect = Some(rect);
        self.redraw_or_warn();
    }

    fn hide_preview(&mut self) {
        if self.visible {
            unsafe {
                let _ = ShowWindow(self.hwnd, SW_HIDE);
            }
        }
        self.visible = false;
        self.rect = None;
        self.message = None;
    }

    fn show_transient_message(&mut self, text: &str, duration: Duration) {
        debug!(text, ?duration, "preview message");
        self.message = Some(TransientMessage::new(text, duration, Instant::now()));
        if self.visible {
            self.redraw_or_warn();
        }
    }

    fn refresh(&mut self) {
        let expired = self
            .message
            .as_ref()
            .is_some_and(|m| m.is_expired(Instant::now()));
        if expired {
            self.message = None;
            if self.visible {
                self.redraw_or_warn();
            }
        }
    }
}

impl Drop for LayeredPreview {
    fn drop(&mut self) {
        unsafe {
            DestroyWindow(self.hwnd).ok();
        }
    }
}
