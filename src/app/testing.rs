//! In-memory collaborators for unit tests

use std::collections::BTreeMap;
use std::time::Duration;

use crate::domain::core::Rect;
use crate::domain::registry::{MinMaxState, WindowId};
use crate::domain::topology::{PhysicalMonitor, SplitConfig};
use crate::platform::{FeedbackSink, MonitorSource, PlatformError, SplitConfigStore, WindowSystem};

#[derive(Debug, Clone, PartialEq)]
pub enum FeedbackCall {
    Show(Rect),
    Update(Rect),
    Hide,
    Message(String, Duration),
    Refresh,
}

/// Feedback sink that records every call
#[derive(Debug, Default)]
pub struct RecordingFeedback {
    pub calls: Vec<FeedbackCall>,
}

impl RecordingFeedback {
    pub fn hide_count(&self) -> usize {
        self.calls.iter().filter(|call| **call == FeedbackCall::Hide).count()
    }

    pub fn messages(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                FeedbackCall::Message(text, _) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Every show is followed by exactly one hide before the next show
    pub fn is_balanced(&self) -> bool {
        let mut visible = false;
        for call in &self.calls {
            match call {
                FeedbackCall::Show(_) if visible => return false,
                FeedbackCall::Show(_) => visible = true,
                FeedbackCall::Update(_) if !visible => return false,
                FeedbackCall::Hide if !visible => return false,
                FeedbackCall::Hide => visible = false,
                _ => {}
            }
        }
        !visible
    }
}

impl FeedbackSink for RecordingFeedback {
    fn show_preview(&mut self, rect: Rect) {
        self.calls.push(FeedbackCall::Show(rect));
    }

    fn update_preview(&mut self, rect: Rect) {
        self.calls.push(FeedbackCall::Update(rect));
    }

    fn hide_preview(&mut self) {
        self.calls.push(FeedbackCall::Hide);
    }

    fn show_transient_message(&mut self, text: &str, duration: Duration) {
        self.calls.push(FeedbackCall::Message(text.to_string(), duration));
    }

    fn refresh(&mut self) {
        self.calls.push(FeedbackCall::Refresh);
    }
}

#[derive(Debug, Clone)]
pub struct FakeWindow {
    pub rect: Rect,
    pub state: MinMaxState,
    pub class_name: String,
    pub process_name: String,
    /// Rectangle the window takes when restored from maximised
    pub restored_rect: Option<Rect>,
}

/// Window system backed by a map; records every mutation
#[derive(Debug, Default)]
pub struct FakeWindowSystem {
    pub windows: BTreeMap<WindowId, FakeWindow>,
    /// Front-to-back order; ids missing from `windows` are skipped
    pub z_order: Vec<WindowId>,
    pub set_rect_calls: Vec<(WindowId, Rect)>,
    pub restore_calls: Vec<WindowId>,
    pub fail_set_rect: bool,
}

impl FakeWindowSystem {
    pub fn add(&mut self, id: u64, rect: Rect) -> WindowId {
        self.add_with_class(id, rect, "ApplicationFrame")
    }

    pub fn add_with_class(&mut self, id: u64, rect: Rect, class_name: &str) -> WindowId {
        let window_id = WindowId(id);
        self.windows.insert(
            window_id,
            FakeWindow {
                rect,
                state: MinMaxState::Normal,
                class_name: class_name.to_string(),
                process_name: "app.exe".to_string(),
                restored_rect: None,
            },
        );
        self.z_order.push(window_id);
        window_id
    }

    pub fn maximize(&mut self, id: WindowId, maximized_rect: Rect) {
        if let Some(window) = self.windows.get_mut(&id) {
            window.restored_rect = Some(window.rect);
            window.rect = maximized_rect;
            window.state = MinMaxState::Maximized;
        }
    }

    pub fn close(&mut self, id: WindowId) {
        self.windows.remove(&id);
    }
}

impl WindowSystem for FakeWindowSystem {
    fn exists(&self, id: WindowId) -> bool {
        self.windows.contains_key(&id)
    }

    fn rect(&self, id: WindowId) -> Option<Rect> {
        self.windows.get(&id).map(|window| window.rect)
    }

    fn min_max_state(&self, id: WindowId) -> MinMaxState {
        self.windows.get(&id).map(|window| window.state).unwrap_or_default()
    }

    fn restore(&mut self, id: WindowId) -> Result<(), PlatformError> {
        let window = self.windows.get_mut(&id).ok_or(PlatformError::WindowGone(id))?;
        self.restore_calls.push(id);
        if let Some(rect) = window.restored_rect.take() {
            window.rect = rect;
        }
        window.state = MinMaxState::Normal;
        Ok(())
    }

    fn set_rect(&mut self, id: WindowId, rect: Rect) -> Result<(), PlatformError> {
        if self.fail_set_rect {
            return Err(PlatformError::PositionFailed(id));
        }
        let window = self.windows.get_mut(&id).ok_or(PlatformError::WindowGone(id))?;
        self.set_rect_calls.push((id, rect));
        window.rect = rect;
        Ok(())
    }

    fn class_and_process(&self, id: WindowId) -> Option<(String, String)> {
        self.windows
            .get(&id)
            .map(|window| (window.class_name.clone(), window.process_name.clone()))
    }

    fn top_level_windows(&self) -> Vec<WindowId> {
        self.z_order
            .iter()
            .copied()
            .filter(|id| self.windows.contains_key(id))
            .collect()
    }
}

/// Monitor source returning a fixed list
#[derive(Debug, Clone, Default)]
pub struct FixedMonitors(pub Vec<PhysicalMonitor>);

impl MonitorSource for FixedMonitors {
    fn enumerate_physical_monitors(&self) -> Result<Vec<PhysicalMonitor>, PlatformError> {
        Ok(self.0.clone())
    }
}

/// Split store returning a fixed list
#[derive(Debug, Clone, Default)]
pub struct FixedSplits(pub Vec<SplitConfig>);

impl SplitConfigStore for FixedSplits {
    fn active_splits(&self) -> Vec<SplitConfig> {
        self.0.clone()
    }
}
