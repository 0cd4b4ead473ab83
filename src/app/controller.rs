//! Application controller and coordination layer
//!
//! The controller owns the OS collaborators and routes gesture events into at
//! most one [`DragSession`] at a time. Monitor topology and the window
//! snapshot are rebuilt on every tick, never cached between ticks, so monitor
//! hot-plug and windows closing mid-gesture are always seen.
//!
//! The feedback sink is handed to each session for its lifetime and taken
//! back when the session ends, so the preview is owned by exactly one place.

use thiserror::Error;
use tracing::{debug, info, trace, warn};

use crate::app::session::{DragSession, SessionError, SessionOutcome, SnapNotice, TickEnv, TickOutcome};
use crate::config::Settings;
use crate::domain::core::{Point, Rect};
use crate::domain::grid::{slot_rect, GridError, LayoutScheme, LayoutSlot};
use crate::domain::registry::{EligibilityPredicate, MinMaxState, WindowId, WindowSnapshot};
use crate::domain::snap::OperationKind;
use crate::domain::topology::MonitorTopology;
use crate::input::gesture::GestureEvent;
use crate::platform::{FeedbackSink, MonitorSource, PlatformError, SplitConfigStore, WindowSystem};

/// Errors surfaced by controller operations
#[derive(Debug, Error)]
pub enum ControllerError {
    #[error(transparent)]
    Platform(#[from] PlatformError),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Grid(#[from] GridError),
    #[error("no monitor available")]
    NoMonitor,
    #[error("window {0:?} does not exist")]
    WindowMissing(WindowId),
    #[error("window {0:?} is not eligible for positioning")]
    Ineligible(WindowId),
    #[error("a drag gesture is in progress")]
    Busy,
}

/// Routes gestures and layout requests to the positioning core
pub struct GestureController<W: WindowSystem, F: FeedbackSink> {
    windows: W,
    monitors: Box<dyn MonitorSource>,
    splits: Box<dyn SplitConfigStore>,
    eligibility: Box<dyn EligibilityPredicate>,
    /// Parked here between gestures, lent to the live session otherwise
    feedback: Option<F>,
    session: Option<DragSession<F>>,
}

impl<W: WindowSystem, F: FeedbackSink> GestureController<W, F> {
    pub fn new(
        windows: W,
        monitors: Box<dyn MonitorSource>,
        splits: Box<dyn SplitConfigStore>,
        eligibility: Box<dyn EligibilityPredicate>,
        feedback: F,
    ) -> Self {
        Self {
            windows,
            monitors,
            splits,
            eligibility,
            feedback: Some(feedback),
            session: None,
        }
    }

    pub fn windows(&self) -> &W {
        &self.windows
    }

    pub fn is_dragging(&self) -> bool {
        self.session.is_some()
    }

    /// The feedback sink, `None` while a session has it
    pub fn feedback(&self) -> Option<&F> {
        self.feedback.as_ref()
    }

    /// Handles one gesture event
    ///
    /// Returns the outcome when the event ended a session. Events that don't
    /// fit the current state (a move with no live gesture, a second start)
    /// are ignored.
    pub fn handle(
        &mut self,
        event: GestureEvent,
        settings: &Settings,
    ) -> Result<Option<SessionOutcome>, ControllerError> {
        match event {
            GestureEvent::Start { window, kind, cursor } => {
                self.start(window, kind, cursor);
                Ok(None)
            }
            GestureEvent::Move { cursor } => self.tick(cursor, settings),
            GestureEvent::End { commit } => self.end(commit),
        }
    }

    /// Forwards the periodic refresh to whoever holds the feedback sink
    pub fn refresh_feedback(&mut self) {
        match (self.session.as_mut(), self.feedback.as_mut()) {
            (Some(session), _) => session.refresh_feedback(),
            (None, Some(feedback)) => feedback.refresh(),
            (None, None) => {}
        }
    }

    fn start(&mut self, window: WindowId, kind: OperationKind, cursor: Point) {
        if self.session.is_some() {
            warn!(?window, "gesture start while another gesture is live, ignoring");
            return;
        }
        let Some(feedback) = self.feedback.take() else {
            return;
        };

        let mut session = DragSession::new(feedback);
        match session.start(window, kind, cursor, &mut self.windows, self.eligibility.as_ref()) {
            Ok(()) => self.session = Some(session),
            Err(rejection) => {
                debug!(%rejection, "gesture start rejected");
                self.feedback = Some(session.into_feedback());
            }
        }
    }

    fn tick(&mut self, cursor: Point, settings: &Settings) -> Result<Option<SessionOutcome>, ControllerError> {
        if self.session.is_none() {
            trace!(?cursor, "move without a live gesture");
            return Ok(None);
        }

        let topology = self.topology();
        let snapshot = self.snapshot();
        let snap = settings.snap_settings();
        let notice = settings.feedback.snapped_message().map(|text| SnapNotice {
            text,
            duration: settings.feedback.message_duration(),
        });
        let env = TickEnv {
            topology: &topology,
            snapshot: &snapshot,
            windows: &self.windows,
            snap: &snap,
            notice,
        };

        let Some(session) = self.session.as_mut() else {
            return Ok(None);
        };
        match session.tick(cursor, &env)? {
            TickOutcome::Updated { .. } => Ok(None),
            TickOutcome::Ended(outcome) => {
                self.finish();
                Ok(Some(outcome))
            }
        }
    }

    fn end(&mut self, commit: bool) -> Result<Option<SessionOutcome>, ControllerError> {
        let Some(mut session) = self.session.take() else {
            trace!(commit, "end without a live gesture");
            return Ok(None);
        };
        let result = session.end(commit, &mut self.windows);
        self.feedback = Some(session.into_feedback());
        Ok(Some(result?))
    }

    fn finish(&mut self) {
        if let Some(session) = self.session.take() {
            self.feedback = Some(session.into_feedback());
        }
    }

    /// Moves `window` to one named rectangle of `scheme` on its monitor
    ///
    /// The monitor is the one holding the window's center, resolved before a
    /// maximised window is restored.
    pub fn apply_layout(
        &mut self,
        window: WindowId,
        scheme: LayoutScheme,
        slot: LayoutSlot,
    ) -> Result<Rect, ControllerError> {
        if self.session.is_some() {
            return Err(ControllerError::Busy);
        }
        let window_ref = self
            .windows
            .window_ref(window)
            .ok_or(ControllerError::WindowMissing(window))?;
        if !self.eligibility.is_eligible(&window_ref) {
            return Err(ControllerError::Ineligible(window));
        }

        let topology = self.topology();
        let monitor = topology
            .resolve_for_window(&window_ref.rect, None)
            .ok_or(ControllerError::NoMonitor)?;
        let target = slot_rect(monitor.work_area, scheme, slot)?;

        if window_ref.min_max_state == MinMaxState::Maximized {
            self.windows.restore(window)?;
        }
        self.windows.set_rect(window, target)?;
        info!(?window, %slot, monitor = monitor.id.0, rect = %target, "applied layout");
        Ok(target)
    }

    fn topology(&self) -> MonitorTopology {
        let physical = self.monitors.enumerate_physical_monitors().unwrap_or_else(|err| {
            warn!(%err, "monitor enumeration failed, continuing without monitors");
            Vec::new()
        });
        MonitorTopology::build(physical, &self.splits.active_splits())
    }

    fn snapshot(&self) -> WindowSnapshot {
        WindowSnapshot::from_windows(
            self.windows
                .top_level_windows()
                .into_iter()
                .filter_map(|id| self.windows.window_ref(id)),
            self.eligibility.as_ref(),
        )
    }
}
