use std::process::ExitCode;

use tactile_snap::config::{ConfigError, Settings};
use thiserror::Error;
use tracing::{error, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Error)]
enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[cfg(windows)]
    #[error(transparent)]
    Renderer(#[from] tactile_snap::ui::RendererError),
    #[cfg(windows)]
    #[error(transparent)]
    Overlay(#[from] tactile_snap::ui::layered::OverlayError),
    #[cfg(not(windows))]
    #[error("tactile-snap only runs on Windows")]
    Unsupported,
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn load_settings() -> Result<Settings, AppError> {
    match Settings::default_path() {
        Some(path) => Ok(Settings::load(&path)?),
        None => {
            warn!("no config directory on this system, using default settings");
            Ok(Settings::default())
        }
    }
}

fn main() -> ExitCode {
    init_logging();
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(%err, "tactile-snap stopped");
            ExitCode::FAILURE
        }
    }
}

#[cfg(not(windows))]
fn run() -> Result<(), AppError> {
    let _settings = load_settings()?;
    Err(AppError::Unsupported)
}

#[cfg(windows)]
fn run() -> Result<(), AppError> {
    win32::run(load_settings()?)
}

#[cfg(windows)]
mod win32 {
    use std::thread;
    use std::time::Duration;

    use tactile_snap::app::GestureController;
    use tactile_snap::config::{Settings, StaticSplitStore};
    use tactile_snap::input::hotkeys::LayoutHotkeys;
    use tactile_snap::input::poller::InputPoller;
    use tactile_snap::input::{default_bindings, GestureTracker};
    use tactile_snap::platform::win32::window::foreground_window;
    use tactile_snap::platform::win32::{Win32MonitorSource, Win32WindowSystem};
    use tactile_snap::ui::layered::LayeredPreview;
    use tactile_snap::ui::{PreviewRenderer, PreviewStyle};
    use tracing::{debug, info, warn};
    use windows::Win32::Foundation::HWND;
    use windows::Win32::UI::HiDpi::{
        SetProcessDpiAwarenessContext, DPI_AWARENESS_CONTEXT_PER_MONITOR_AWARE_V2,
    };
    use windows::Win32::UI::WindowsAndMessaging::{
        DispatchMessageW, PeekMessageW, TranslateMessage, MSG, PM_REMOVE, WM_HOTKEY, WM_QUIT,
    };

    use super::AppError;

    const POLL_INTERVAL: Duration = Duration::from_millis(16);

    /// Dispatches queued messages other than hotkeys; `false` once WM_QUIT arrives
    fn pump_messages() -> bool {
        let mut msg = MSG::default();
        unsafe {
            while PeekMessageW(&mut msg, HWND(0), 0, WM_HOTKEY - 1, PM_REMOVE).as_bool()
                || PeekMessageW(&mut msg, HWND(0), WM_HOTKEY + 1, u32::MAX, PM_REMOVE).as_bool()
            {
                if msg.message == WM_QUIT {
                    return false;
                }
                let _ = TranslateMessage(&msg);
                DispatchMessageW(&msg);
            }
        }
        true
    }

    pub fn run(settings: Settings) -> Result<(), AppError> {
        // Geometry is in physical pixels on every monitor
        if unsafe { SetProcessDpiAwarenessContext(DPI_AWARENESS_CONTEXT_PER_MONITOR_AWARE_V2) }.is_err() {
            warn!("per-monitor DPI awareness unavailable");
        }

        let renderer = match &settings.feedback.font {
            Some(path) => PreviewRenderer::with_font_file(PreviewStyle::default(), path)?,
            None => PreviewRenderer::default(),
        };
        let preview = LayeredPreview::new(renderer)?;

        let mut controller = GestureController::new(
            Win32WindowSystem,
            Box::new(Win32MonitorSource),
            Box::new(StaticSplitStore::from_settings(&settings)),
            Box::new(settings.exclusion_rules()),
            preview,
        );
        let hotkeys = match LayoutHotkeys::register(default_bindings()) {
            Ok(hotkeys) => Some(hotkeys),
            Err(err) => {
                warn!(%err, "layout hotkeys disabled");
                None
            }
        };
        let poller = InputPoller::new();
        let mut tracker = GestureTracker::new();

        info!("running: Alt+drag moves, Alt+right-drag resizes, Esc cancels");
        while pump_messages() {
            if let Some(event) = tracker.update(poller.sample()) {
                match controller.handle(event, &settings) {
                    Ok(Some(outcome)) => debug!(?outcome, "gesture finished"),
                    Ok(None) => {}
                    Err(err) => warn!(%err, "gesture failed"),
                }
            }

            for binding in hotkeys.iter().flat_map(|hotkeys| hotkeys.poll()) {
                let Some(window) = foreground_window() else {
                    continue;
                };
                if let Err(err) = controller.apply_layout(window, binding.scheme, binding.slot) {
                    warn!(%err, slot = %binding.slot, "layout not applied");
                }
            }

            controller.refresh_feedback();
            thread::sleep(POLL_INTERVAL);
        }

        info!("quit requested");
        Ok(())
    }
}
