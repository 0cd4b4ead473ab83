//! Mouse+modifier gesture recognition
//!
//! The tracker turns periodic snapshots of input state into start / move /
//! end events. It holds no OS handles, so the same logic runs against the
//! Win32 poller and against scripted samples in tests.
//!
//! - Modifier + left button drags (Move).
//! - Modifier + right button resizes; the kind comes from where in the window
//!   the button went down.
//! - Releasing the button, or the modifier, commits.
//! - Escape cancels.

use tracing::trace;

use crate::domain::core::{Point, Rect};
use crate::domain::registry::WindowId;
use crate::domain::snap::OperationKind;

/// One gesture transition, fed to the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureEvent {
    Start {
        window: WindowId,
        kind: OperationKind,
        cursor: Point,
    },
    Move {
        cursor: Point,
    },
    End {
        commit: bool,
    },
}

/// Input state captured once per tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InputSample {
    pub cursor: Point,
    pub modifier_down: bool,
    pub left_down: bool,
    pub right_down: bool,
    pub escape_down: bool,
    /// Top-level window under the cursor and its rectangle
    pub target: Option<(WindowId, Rect)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Button {
    Left,
    Right,
}

impl Button {
    fn is_down(self, sample: &InputSample) -> bool {
        match self {
            Button::Left => sample.left_down,
            Button::Right => sample.right_down,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum TrackerState {
    #[default]
    Idle,
    Dragging {
        button: Button,
        last_cursor: Point,
    },
    /// Gesture ended while buttons were still held; wait for release
    Released,
}

/// Edge-triggered gesture recogniser
#[derive(Debug, Default)]
pub struct GestureTracker {
    state: TrackerState,
    previous: InputSample,
}

impl GestureTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, TrackerState::Dragging { .. })
    }

    /// Feeds one sample, returning the event it produces, if any
    pub fn update(&mut self, sample: InputSample) -> Option<GestureEvent> {
        let event = self.step(&sample);
        if let Some(event) = &event {
            trace!(?event, "gesture");
        }
        self.previous = sample;
        event
    }

    fn step(&mut self, sample: &InputSample) -> Option<GestureEvent> {
        match self.state {
            TrackerState::Idle => {
                if !sample.modifier_down {
                    return None;
                }
                let button = if sample.left_down && !self.previous.left_down {
                    Button::Left
                } else if sample.right_down && !self.previous.right_down {
                    Button::Right
                } else {
                    return None;
                };
                let (window, rect) = sample.target?;
                let kind = match button {
                    Button::Left => OperationKind::Move,
                    Button::Right => OperationKind::resize_for_cursor(&rect, sample.cursor),
                };
                self.state = TrackerState::Dragging {
                    button,
                    last_cursor: sample.cursor,
                };
                Some(GestureEvent::Start {
                    window,
                    kind,
                    cursor: sample.cursor,
                })
            }
            TrackerState::Dragging { button, last_cursor } => {
                if sample.escape_down {
                    self.state = self.after_end(sample);
                    Some(GestureEvent::End { commit: false })
                } else if !button.is_down(sample) || !sample.modifier_down {
                    self.state = self.after_end(sample);
                    Some(GestureEvent::End { commit: true })
                } else if sample.cursor != last_cursor {
                    self.state = TrackerState::Dragging {
                        button,
                        last_cursor: sample.cursor,
                    };
                    Some(GestureEvent::Move {
                        cursor: sample.cursor,
                    })
                } else {
                    None
                }
            }
            TrackerState::Released => {
                if !sample.left_down && !sample.right_down {
                    self.state = TrackerState::Idle;
                }
                None
            }
        }
    }

    fn after_end(&self, sample: &InputSample) -> TrackerState {
        if sample.left_down || sample.right_down {
            TrackerState::Released
        } else {
            TrackerState::Idle
        }
    }
}
