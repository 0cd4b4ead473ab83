//! Interactive drag session
//!
//! One session owns one move or resize gesture on one window. It is created
//! Idle, becomes Active on a successful [`DragSession::start`], is driven by
//! [`DragSession::tick`] and ends in exactly one terminal phase through
//! [`DragSession::end`] or a vanished target.
//!
//! The real window is never written to before the single commit in `end`. The
//! preview overlay lives inside the session and is torn down on every exit
//! path.

use std::fmt;
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, trace, warn};

use crate::domain::core::{Point, Rect};
use crate::domain::registry::{EligibilityPredicate, MinMaxState, WindowId, WindowSnapshot};
use crate::domain::snap::{compute_snap, Grip, OperationKind, SnapSettings, SnapState};
use crate::domain::topology::{MonitorTopology, VirtualMonitorId};
use crate::platform::{FeedbackSink, WindowSystem};
use crate::ui::overlay::PreviewOverlay;

/// Lifecycle phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionPhase {
    Idle,
    Active,
    /// Transient: the commit call is in flight
    Committing,
    Committed,
    Cancelled,
}

impl SessionPhase {
    pub fn is_terminal(self) -> bool {
        matches!(self, SessionPhase::Committed | SessionPhase::Cancelled)
    }
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionPhase::Idle => "idle",
            SessionPhase::Active => "active",
            SessionPhase::Committing => "committing",
            SessionPhase::Committed => "committed",
            SessionPhase::Cancelled => "cancelled",
        };
        f.write_str(name)
    }
}

/// Why `start` left the session Idle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StartRejection {
    #[error("session already left the idle phase ({0})")]
    NotIdle(SessionPhase),
    #[error("window {0:?} does not exist")]
    WindowMissing(WindowId),
    #[error("window {0:?} is not eligible for positioning")]
    Ineligible(WindowId),
    #[error("window {0:?} could not be restored from maximised")]
    RestoreFailed(WindowId),
}

/// Programmer errors: calls the current phase does not accept
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("{operation} is not valid in the {phase} phase")]
    InvalidPhase {
        operation: &'static str,
        phase: SessionPhase,
    },
}

/// Why a session ended without moving the window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelReason {
    /// The gesture ended with `commit = false`
    UserCancelled,
    /// The target window closed mid-gesture
    WindowVanished,
    /// The window system refused the final position
    CommitFailed,
}

/// Terminal result of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    Committed { window: WindowId, rect: Rect },
    Cancelled { window: WindowId, reason: CancelReason },
}

/// Result of one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Updated {
        rect: Rect,
        /// `None` only while no monitor is known at all
        monitor: Option<VirtualMonitorId>,
        snap: SnapState,
        newly_snapped: bool,
    },
    /// The session reached a terminal phase during this tick
    Ended(SessionOutcome),
}

/// Text shown when an axis becomes snapped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnapNotice<'a> {
    pub text: &'a str,
    pub duration: Duration,
}

/// Fresh per-tick view of the world handed to [`DragSession::tick`]
#[derive(Clone, Copy)]
pub struct TickEnv<'a> {
    pub topology: &'a MonitorTopology,
    pub snapshot: &'a WindowSnapshot,
    pub windows: &'a dyn WindowSystem,
    pub snap: &'a SnapSettings,
    pub notice: Option<SnapNotice<'a>>,
}

/// Data pinned at start
#[derive(Debug, Clone, Copy)]
struct Drag {
    window: WindowId,
    kind: OperationKind,
    grip: Grip,
    start_rect: Rect,
    start_cursor: Point,
    current_proposed: Rect,
    snap_state: SnapState,
    monitor: Option<VirtualMonitorId>,
}

impl Drag {
    fn raw_proposal(&self, cursor: Point) -> Rect {
        let (dx, dy) = cursor.delta_from(self.start_cursor);
        match self.kind {
            OperationKind::Move => self.start_rect.translate(dx, dy),
            _ => self.grip.resize(&self.start_rect, dx, dy),
        }
    }
}

/// One interactive move/resize gesture
pub struct DragSession<F: FeedbackSink> {
    phase: SessionPhase,
    drag: Option<Drag>,
    outcome: Option<SessionOutcome>,
    overlay: PreviewOverlay<F>,
}

impl<F: FeedbackSink> DragSession<F> {
    /// Creates an Idle session that will report through `feedback`
    pub fn new(feedback: F) -> Self {
        Self {
            phase: SessionPhase::Idle,
            drag: None,
            outcome: None,
            overlay: PreviewOverlay::new(feedback),
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn window(&self) -> Option<WindowId> {
        self.drag.map(|drag| drag.window)
    }

    /// Last proposed rectangle, the start rectangle before the first tick
    pub fn current_rect(&self) -> Option<Rect> {
        self.drag.map(|drag| drag.current_proposed)
    }

    pub fn snap_state(&self) -> SnapState {
        self.drag.map(|drag| drag.snap_state).unwrap_or_default()
    }

    pub fn outcome(&self) -> Option<SessionOutcome> {
        self.outcome
    }

    pub fn is_preview_visible(&self) -> bool {
        self.overlay.is_visible()
    }

    /// Pins the session to `window` and enters the Active phase
    ///
    /// A maximised window is restored first, and the restored rectangle is
    /// what the gesture moves. On any rejection the session stays Idle.
    pub fn start(
        &mut self,
        window: WindowId,
        kind: OperationKind,
        cursor: Point,
        windows: &mut dyn WindowSystem,
        predicate: &dyn EligibilityPredicate,
    ) -> Result<(), StartRejection> {
        if self.phase != SessionPhase::Idle {
            return Err(StartRejection::NotIdle(self.phase));
        }

        let window_ref = windows
            .window_ref(window)
            .ok_or(StartRejection::WindowMissing(window))?;
        if !predicate.is_eligible(&window_ref) {
            debug!(?window, class = %window_ref.class_name, "ignoring ineligible window");
            return Err(StartRejection::Ineligible(window));
        }

        if window_ref.min_max_state == MinMaxState::Maximized {
            windows.restore(window).map_err(|err| {
                warn!(?window, %err, "restore before drag failed");
                StartRejection::RestoreFailed(window)
            })?;
        }
        let start_rect = windows
            .rect(window)
            .ok_or(StartRejection::WindowMissing(window))?;

        let grip = Grip::for_operation(kind, &start_rect, cursor);
        self.drag = Some(Drag {
            window,
            kind,
            grip,
            start_rect,
            start_cursor: cursor,
            current_proposed: start_rect,
            snap_state: SnapState::default(),
            monitor: None,
        });
        self.phase = SessionPhase::Active;
        debug!(?window, ?kind, rect = %start_rect, "drag session started");
        Ok(())
    }

    /// Recomputes the proposed rectangle for a new cursor position
    pub fn tick(&mut self, cursor: Point, env: &TickEnv<'_>) -> Result<TickOutcome, SessionError> {
        let mut drag = match (self.phase, self.drag) {
            (SessionPhase::Active, Some(drag)) => drag,
            _ => return Err(self.invalid_phase("tick")),
        };

        if !env.windows.exists(drag.window) {
            warn!(window = ?drag.window, "target window vanished during drag");
            return Ok(TickOutcome::Ended(self.cancel(drag.window, CancelReason::WindowVanished)));
        }

        let proposed = drag.raw_proposal(cursor);
        let monitor = env.topology.resolve_for_window(&proposed, drag.monitor);
        let (monitor_id, monitor_bounds, neighbors) = match monitor {
            Some(vm) => (
                Some(vm.id),
                vm.bounds,
                env.snapshot.neighbors_on(&vm.bounds, drag.window),
            ),
            None => (None, Rect::default(), Vec::new()),
        };

        let snapped = compute_snap(
            proposed,
            drag.kind,
            &drag.grip,
            &neighbors,
            monitor_bounds,
            env.snap,
        );
        let newly_snapped = snapped.state.newly_snapped_since(&drag.snap_state);
        trace!(
            raw = %proposed,
            adjusted = %snapped.rect,
            monitor = ?monitor_id,
            neighbors = neighbors.len(),
            newly_snapped,
            "drag tick"
        );

        drag.current_proposed = snapped.rect;
        drag.snap_state = snapped.state;
        if monitor_id.is_some() {
            drag.monitor = monitor_id;
        }
        self.drag = Some(drag);

        self.overlay.present(snapped.rect);
        if newly_snapped {
            if let Some(notice) = env.notice {
                self.overlay.message(notice.text, notice.duration);
            }
        }

        Ok(TickOutcome::Updated {
            rect: snapped.rect,
            monitor: monitor_id,
            snap: snapped.state,
            newly_snapped,
        })
    }

    /// Ends the gesture, committing the last proposal if `commit` is set
    ///
    /// Calling `end` again on a finished session returns the recorded
    /// outcome and never touches the window a second time.
    pub fn end(
        &mut self,
        commit: bool,
        windows: &mut dyn WindowSystem,
    ) -> Result<SessionOutcome, SessionError> {
        if let Some(outcome) = self.outcome {
            return Ok(outcome);
        }
        let drag = match (self.phase, self.drag) {
            (SessionPhase::Active, Some(drag)) => drag,
            _ => return Err(self.invalid_phase("end")),
        };

        if !commit {
            return Ok(self.cancel(drag.window, CancelReason::UserCancelled));
        }
        if !windows.exists(drag.window) {
            warn!(window = ?drag.window, "target window vanished before commit");
            return Ok(self.cancel(drag.window, CancelReason::WindowVanished));
        }

        self.phase = SessionPhase::Committing;
        let rect = drag.current_proposed;
        match windows.set_rect(drag.window, rect) {
            Ok(()) => {
                self.overlay.release();
                self.phase = SessionPhase::Committed;
                let outcome = SessionOutcome::Committed {
                    window: drag.window,
                    rect,
                };
                self.outcome = Some(outcome);
                debug!(window = ?drag.window, %rect, "drag session committed");
                Ok(outcome)
            }
            Err(err) => {
                warn!(window = ?drag.window, %rect, %err, "commit failed");
                Ok(self.cancel(drag.window, CancelReason::CommitFailed))
            }
        }
    }

    /// Gives the preview a chance to drop an expired message
    pub fn refresh_feedback(&mut self) {
        self.overlay.refresh();
    }

    /// Consumes the session, tearing down the preview, and returns the sink
    pub fn into_feedback(self) -> F {
        self.overlay.into_inner()
    }

    fn cancel(&mut self, window: WindowId, reason: CancelReason) -> SessionOutcome {
        self.overlay.release();
        self.phase = SessionPhase::Cancelled;
        let outcome = SessionOutcome::Cancelled { window, reason };
        self.outcome = Some(outcome);
        debug!(?window, ?reason, "drag session cancelled");
        outcome
    }

    fn invalid_phase(&self, operation: &'static str) -> SessionError {
        debug_assert!(false, "{operation} called in the {} phase", self.phase);
        SessionError::InvalidPhase {
            operation,
            phase: self.phase,
        }
    }
}
