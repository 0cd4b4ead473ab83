//! Edge snapping for interactive move and resize
//!
//! Given a proposed rectangle, the edges being dragged, the neighbouring
//! window rectangles and the current virtual monitor, the engine picks at most
//! one snap per axis and applies it.
//!
//! ## Selection rules
//! - Only active edges take part: Move drags all four edges rigidly, resizes
//!   drag only the gripped edge(s).
//! - A candidate is kept when its distance is `<= threshold`.
//! - Per axis the minimum distance wins. On a tie, window edges beat monitor
//!   edges and earlier neighbours beat later ones (candidates are visited in
//!   that order and only a strictly smaller distance replaces the best).
//! - After snapping, width/height are clamped to the configured minimum by
//!   moving the dragged edge, never the opposite one.

use tracing::trace;

use crate::domain::core::{Axis, Edge, Point, Rect};

/// Kind of interactive operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    Move,
    ResizeWidth,
    ResizeHeight,
    ResizeBoth,
}

impl OperationKind {
    pub fn is_resize(self) -> bool {
        !matches!(self, OperationKind::Move)
    }

    /// Picks the resize kind from where the cursor sits inside the window
    ///
    /// The window is cut into thirds on both axes. The middle column resizes
    /// height only, the middle row resizes width only, everything else
    /// (corners and the dead center) resizes both.
    pub fn resize_for_cursor(rect: &Rect, cursor: Point) -> Self {
        let in_middle = |near: i32, extent: i32, value: i32| {
            let offset = value - near;
            extent >= 3 && offset >= extent / 3 && offset < extent - extent / 3
        };
        let middle_column = in_middle(rect.left, rect.width(), cursor.x);
        let middle_row = in_middle(rect.top, rect.height(), cursor.y);

        match (middle_column, middle_row) {
            (true, false) => OperationKind::ResizeHeight,
            (false, true) => OperationKind::ResizeWidth,
            _ => OperationKind::ResizeBoth,
        }
    }
}

/// Edges dragged by a resize, one optional edge per axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Grip {
    pub horizontal: Option<Edge>,
    pub vertical: Option<Edge>,
}

impl Grip {
    /// Chooses the dragged edges for `kind` from the cursor position at start
    ///
    /// Left of the window center grabs the left edge, otherwise the right;
    /// above the center grabs the top edge, otherwise the bottom. Move has no
    /// grip.
    pub fn for_operation(kind: OperationKind, rect: &Rect, cursor: Point) -> Self {
        let center = rect.center();
        let horizontal = if cursor.x < center.x { Edge::Near } else { Edge::Far };
        let vertical = if cursor.y < center.y { Edge::Near } else { Edge::Far };

        match kind {
            OperationKind::Move => Grip::default(),
            OperationKind::ResizeWidth => Grip {
                horizontal: Some(horizontal),
                vertical: None,
            },
            OperationKind::ResizeHeight => Grip {
                horizontal: None,
                vertical: Some(vertical),
            },
            OperationKind::ResizeBoth => Grip {
                horizontal: Some(horizontal),
                vertical: Some(vertical),
            },
        }
    }

    pub fn on(&self, axis: Axis) -> Option<Edge> {
        match axis {
            Axis::Horizontal => self.horizontal,
            Axis::Vertical => self.vertical,
        }
    }

    /// Applies a cursor delta to the gripped edges of `start`
    pub fn resize(&self, start: &Rect, dx: i32, dy: i32) -> Rect {
        let mut rect = *start;
        if let Some(edge) = self.horizontal {
            rect = rect.with_edge(Axis::Horizontal, edge, start.edge(Axis::Horizontal, edge) + dx);
        }
        if let Some(edge) = self.vertical {
            rect = rect.with_edge(Axis::Vertical, edge, start.edge(Axis::Vertical, edge) + dy);
        }
        rect
    }
}

/// Where a snap target came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapSource {
    /// Edge of the neighbour at this index in the supplied list
    WindowEdge { neighbor: usize },
    /// Edge of the current virtual monitor (external edge or split seam)
    VirtualMonitorEdge,
}

impl SnapSource {
    fn is_window(&self) -> bool {
        matches!(self, SnapSource::WindowEdge { .. })
    }
}

/// One possible edge alignment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnapCandidate {
    pub axis: Axis,
    /// Edge of the proposed rectangle that moves
    pub edge: Edge,
    pub target_coordinate: i32,
    pub distance: i32,
    pub source: SnapSource,
}

/// Winning candidate per axis, if any
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SnapState {
    pub horizontal: Option<SnapCandidate>,
    pub vertical: Option<SnapCandidate>,
}

impl SnapState {
    pub fn on(&self, axis: Axis) -> Option<&SnapCandidate> {
        match axis {
            Axis::Horizontal => self.horizontal.as_ref(),
            Axis::Vertical => self.vertical.as_ref(),
        }
    }

    fn slot(&mut self, axis: Axis) -> &mut Option<SnapCandidate> {
        match axis {
            Axis::Horizontal => &mut self.horizontal,
            Axis::Vertical => &mut self.vertical,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.horizontal.is_none() && self.vertical.is_none()
    }

    /// Returns true if an axis is snapped now but was not in `previous`
    pub fn newly_snapped_since(&self, previous: &SnapState) -> bool {
        (self.horizontal.is_some() && previous.horizontal.is_none())
            || (self.vertical.is_some() && previous.vertical.is_none())
    }
}

/// Tunables read from configuration each tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnapSettings {
    pub enabled: bool,
    /// Maximum pixel gap that still snaps
    pub threshold: i32,
    pub min_width: i32,
    pub min_height: i32,
}

impl SnapSettings {
    pub const DEFAULT_THRESHOLD: i32 = 10;
    pub const DEFAULT_MIN_WIDTH: i32 = 200;
    pub const DEFAULT_MIN_HEIGHT: i32 = 150;

    fn min_extent(&self, axis: Axis) -> i32 {
        match axis {
            Axis::Horizontal => self.min_width,
            Axis::Vertical => self.min_height,
        }
    }
}

impl Default for SnapSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            threshold: Self::DEFAULT_THRESHOLD,
            min_width: Self::DEFAULT_MIN_WIDTH,
            min_height: Self::DEFAULT_MIN_HEIGHT,
        }
    }
}

/// Adjusted rectangle plus the snaps that produced it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnapOutcome {
    pub rect: Rect,
    pub state: SnapState,
}

const AXES: [Axis; 2] = [Axis::Horizontal, Axis::Vertical];
static EDGES: [Edge; 2] = [Edge::Near, Edge::Far];

/// Active edges of `proposed` on one axis
fn active_edges(kind: OperationKind, grip: &Grip, axis: Axis) -> &'static [Edge] {
    match (kind, grip.on(axis)) {
        (OperationKind::Move, _) => &EDGES,
        (_, Some(Edge::Near)) => &EDGES[..1],
        (_, Some(Edge::Far)) => &EDGES[1..],
        (_, None) => &[],
    }
}

fn consider(best: &mut Option<SnapCandidate>, candidate: SnapCandidate, threshold: i32) {
    if candidate.distance > threshold {
        return;
    }
    let replace = match best {
        None => true,
        Some(current) => {
            candidate.distance < current.distance
                || (candidate.distance == current.distance
                    && candidate.source.is_window()
                    && !current.source.is_window())
        }
    };
    if replace {
        *best = Some(candidate);
    }
}

/// Finds the best candidate on one axis
fn best_on_axis(
    proposed: &Rect,
    axis: Axis,
    edges: &[Edge],
    neighbors: &[Rect],
    monitor_bounds: &Rect,
    threshold: i32,
) -> Option<SnapCandidate> {
    let mut best = None;

    for (index, neighbor) in neighbors.iter().enumerate() {
        if neighbor.is_degenerate() {
            continue;
        }
        for &edge in edges {
            let coordinate = proposed.edge(axis, edge);
            // Abutting (opposite edge) and aligning (same edge) both count
            for target_edge in [edge.opposite(), edge] {
                let target = neighbor.edge(axis, target_edge);
                consider(
                    &mut best,
                    SnapCandidate {
                        axis,
                        edge,
                        target_coordinate: target,
                        distance: (coordinate - target).abs(),
                        source: SnapSource::WindowEdge { neighbor: index },
                    },
                    threshold,
                );
            }
        }
    }

    if !monitor_bounds.is_degenerate() {
        for &edge in edges {
            let target = monitor_bounds.edge(axis, edge);
            consider(
                &mut best,
                SnapCandidate {
                    axis,
                    edge,
                    target_coordinate: target,
                    distance: (proposed.edge(axis, edge) - target).abs(),
                    source: SnapSource::VirtualMonitorEdge,
                },
                threshold,
            );
        }
    }

    best
}

/// Computes the snapped rectangle for one tick
///
/// `grip` is ignored for [`OperationKind::Move`]. Degenerate neighbours and a
/// degenerate `monitor_bounds` never produce candidates. Axes without a
/// candidate within `threshold` keep the raw proposed coordinates.
pub fn compute_snap(
    proposed: Rect,
    kind: OperationKind,
    grip: &Grip,
    neighbors: &[Rect],
    monitor_bounds: Rect,
    settings: &SnapSettings,
) -> SnapOutcome {
    let mut rect = proposed;
    let mut state = SnapState::default();

    for axis in AXES {
        let edges = active_edges(kind, grip, axis);
        if !settings.enabled || edges.is_empty() {
            continue;
        }
        let Some(candidate) = best_on_axis(
            &proposed,
            axis,
            edges,
            neighbors,
            &monitor_bounds,
            settings.threshold,
        ) else {
            continue;
        };

        rect = match kind {
            OperationKind::Move => {
                let delta = candidate.target_coordinate - proposed.edge(axis, candidate.edge);
                rect.translate_axis(axis, delta)
            }
            _ => rect.with_edge(axis, candidate.edge, candidate.target_coordinate),
        };
        trace!(?axis, ?candidate, "snap selected");
        *state.slot(axis) = Some(candidate);
    }

    if kind.is_resize() {
        for axis in AXES {
            let Some(dragged) = grip.on(axis) else {
                continue;
            };
            let min = settings.min_extent(axis);
            if rect.extent(axis) >= min {
                continue;
            }
            let anchor = rect.edge(axis, dragged.opposite());
            let clamped = match dragged {
                Edge::Near => anchor - min,
                Edge::Far => anchor + min,
            };
            rect = rect.with_edge(axis, dragged, clamped);
            // The clamp overrides any snap on this axis
            if state.on(axis).is_some_and(|c| c.target_coordinate != clamped) {
                *state.slot(axis) = None;
            }
        }
    }

    SnapOutcome { rect, state }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn settings() -> SnapSettings {
        SnapSettings {
            enabled: true,
            threshold: 10,
            min_width: 200,
            min_height: 150,
        }
    }

    /// Left virtual monitor of a 5120x2160 display split at 0.75
    fn left_piece() -> Rect {
        Rect::new(0, 0, 3840, 2160)
    }

    #[test]
    fn move_snaps_right_edge_to_seam() {
        let proposed = Rect::new(3035, 500, 3835, 1100);
        let outcome = compute_snap(proposed, OperationKind::Move, &Grip::default(), &[], left_piece(), &settings());

        assert_eq!(outcome.rect, Rect::new(3040, 500, 3840, 1100));
        let snap = outcome.state.horizontal.unwrap();
        assert_eq!(snap.edge, Edge::Far);
        assert_eq!(snap.target_coordinate, 3840);
        assert_eq!(snap.distance, 5);
        assert_eq!(snap.source, SnapSource::VirtualMonitorEdge);
        assert!(outcome.state.vertical.is_none());
    }

    #[test]
    fn move_outside_threshold_is_untouched() {
        let proposed = Rect::new(3000, 500, 3800, 1100);
        let outcome = compute_snap(proposed, OperationKind::Move, &Grip::default(), &[], left_piece(), &settings());

        assert_eq!(outcome.rect, proposed);
        assert!(outcome.state.is_empty());
    }

    #[test]
    fn move_snaps_to_neighbor_right_edge() {
        let neighbor = Rect::new(100, 100, 500, 400);
        let proposed = Rect::new(503, 600, 903, 900);
        let outcome = compute_snap(
            proposed,
            OperationKind::Move,
            &Grip::default(),
            &[neighbor],
            Rect::new(0, 0, 1920, 1080),
            &settings(),
        );

        assert_eq!(outcome.rect.left, 500);
        assert_eq!(outcome.rect.width(), 400);
        assert_eq!(
            outcome.state.horizontal.map(|c| c.source),
            Some(SnapSource::WindowEdge { neighbor: 0 })
        );
    }

    #[test]
    fn axes_snap_independently() {
        let neighbor = Rect::new(100, 100, 500, 400);
        // 4px right of the neighbour, 6px below the monitor top
        let proposed = Rect::new(504, 6, 904, 306);
        let outcome = compute_snap(
            proposed,
            OperationKind::Move,
            &Grip::default(),
            &[neighbor],
            Rect::new(0, 0, 1920, 1080),
            &settings(),
        );

        assert_eq!(outcome.rect, Rect::new(500, 0, 900, 300));
        assert!(outcome.state.horizontal.is_some());
        assert!(outcome.state.vertical.is_some());
    }

    #[test]
    fn closest_candidate_wins() {
        let near = Rect::new(0, 0, 498, 100); // right edge 2px away from 500
        let far = Rect::new(0, 0, 507, 100); // right edge 7px away
        let proposed = Rect::new(500, 300, 700, 500);
        let outcome = compute_snap(
            proposed,
            OperationKind::Move,
            &Grip::default(),
            &[far, near],
            Rect::new(-5000, -5000, -4000, -4000),
            &settings(),
        );

        assert_eq!(outcome.rect.left, 498);
        assert_eq!(
            outcome.state.horizontal.map(|c| c.source),
            Some(SnapSource::WindowEdge { neighbor: 1 })
        );
    }

    #[test]
    fn window_edge_beats_monitor_edge_on_tie() {
        let monitor = Rect::new(0, 0, 1920, 1080);
        let neighbor = Rect::new(1000, 200, 1920, 600); // right edge shares x with the monitor
        let proposed = Rect::new(1115, 700, 1915, 900);
        let outcome = compute_snap(
            proposed,
            OperationKind::Move,
            &Grip::default(),
            &[neighbor],
            monitor,
            &settings(),
        );

        let snap = outcome.state.horizontal.unwrap();
        assert_eq!(snap.target_coordinate, 1920);
        assert_eq!(snap.source, SnapSource::WindowEdge { neighbor: 0 });
    }

    #[test]
    fn first_neighbor_wins_among_equal_windows() {
        let first = Rect::new(0, 0, 495, 100);
        let second = Rect::new(0, 200, 505, 300);
        let proposed = Rect::new(500, 400, 700, 600);

        for _ in 0..5 {
            let outcome = compute_snap(
                proposed,
                OperationKind::Move,
                &Grip::default(),
                &[first, second],
                Rect::default(),
                &settings(),
            );
            let snap = outcome.state.horizontal.unwrap();
            assert_eq!(snap.source, SnapSource::WindowEdge { neighbor: 0 });
            assert_eq!(outcome.rect.left, 495);
        }
    }

    #[test]
    fn degenerate_geometry_is_ignored() {
        let degenerate = Rect::new(505, 0, 505, 100);
        let proposed = Rect::new(500, 400, 700, 600);
        let outcome = compute_snap(
            proposed,
            OperationKind::Move,
            &Grip::default(),
            &[degenerate],
            Rect::new(0, 0, 0, 0),
            &settings(),
        );
        assert_eq!(outcome.rect, proposed);
        assert!(outcome.state.is_empty());
    }

    #[test]
    fn resize_width_only_moves_gripped_edge() {
        let grip = Grip {
            horizontal: Some(Edge::Far),
            vertical: None,
        };
        let proposed = Rect::new(1000, 5, 1914, 600);
        let outcome = compute_snap(
            proposed,
            OperationKind::ResizeWidth,
            &grip,
            &[],
            Rect::new(0, 0, 1920, 1080),
            &settings(),
        );

        // Right edge snaps, left edge stays; the top is near the monitor
        // edge but vertical is not an active axis
        assert_eq!(outcome.rect, Rect::new(1000, 5, 1920, 600));
        assert!(outcome.state.vertical.is_none());
    }

    #[test]
    fn resize_ignores_non_gripped_edge_on_same_axis() {
        let grip = Grip {
            horizontal: Some(Edge::Far),
            vertical: None,
        };
        // Left edge is 3px from the monitor edge but only the right edge is dragged
        let proposed = Rect::new(3, 100, 900, 600);
        let outcome = compute_snap(
            proposed,
            OperationKind::ResizeWidth,
            &grip,
            &[],
            Rect::new(0, 0, 1920, 1080),
            &settings(),
        );
        assert_eq!(outcome.rect, proposed);
    }

    #[test]
    fn resize_both_snaps_each_gripped_edge() {
        let grip = Grip {
            horizontal: Some(Edge::Near),
            vertical: Some(Edge::Far),
        };
        let proposed = Rect::new(8, 100, 900, 1075);
        let outcome = compute_snap(
            proposed,
            OperationKind::ResizeBoth,
            &grip,
            &[],
            Rect::new(0, 0, 1920, 1080),
            &settings(),
        );
        assert_eq!(outcome.rect, Rect::new(0, 100, 900, 1080));
    }

    #[test]
    fn clamp_shrinks_from_dragged_edge_only() {
        let grip = Grip {
            horizontal: Some(Edge::Far),
            vertical: None,
        };
        let proposed = Rect::new(1000, 100, 1050, 600);
        let outcome = compute_snap(
            proposed,
            OperationKind::ResizeWidth,
            &grip,
            &[],
            Rect::new(0, 0, 1920, 1080),
            &settings(),
        );
        assert_eq!(outcome.rect.left, proposed.left);
        assert_eq!(outcome.rect.width(), 200);

        let grip = Grip {
            horizontal: Some(Edge::Near),
            vertical: None,
        };
        // Dragged past the opposite edge
        let proposed = Rect::new(1200, 100, 1050, 600);
        let outcome = compute_snap(
            proposed,
            OperationKind::ResizeWidth,
            &grip,
            &[],
            Rect::new(0, 0, 1920, 1080),
            &settings(),
        );
        assert_eq!(outcome.rect.right, 1050);
        assert_eq!(outcome.rect.left, 850);
    }

    #[test]
    fn clamp_drops_overridden_snap() {
        let grip = Grip {
            horizontal: None,
            vertical: Some(Edge::Far),
        };
        let neighbor = Rect::new(0, 0, 300, 152);
        let proposed = Rect::new(500, 100, 900, 155);
        let outcome = compute_snap(
            proposed,
            OperationKind::ResizeHeight,
            &grip,
            &[neighbor],
            Rect::default(),
            &settings(),
        );
        assert_eq!(outcome.rect, Rect::new(500, 100, 900, 250));
        assert!(outcome.state.vertical.is_none());
    }

    #[test]
    fn disabled_snapping_still_clamps() {
        let settings = SnapSettings {
            enabled: false,
            ..settings()
        };
        let grip = Grip {
            horizontal: Some(Edge::Far),
            vertical: None,
        };
        let proposed = Rect::new(0, 0, 1915, 50);
        let outcome = compute_snap(
            proposed,
            OperationKind::ResizeWidth,
            &grip,
            &[],
            Rect::new(0, 0, 1920, 1080),
            &settings,
        );
        assert_eq!(outcome.rect, proposed);
        assert!(outcome.state.is_empty());
    }

    #[test]
    fn grip_follows_cursor_quadrant() {
        let rect = Rect::new(0, 0, 900, 600);
        let grip = Grip::for_operation(OperationKind::ResizeBoth, &rect, Point::new(50, 550));
        assert_eq!(grip.horizontal, Some(Edge::Near));
        assert_eq!(grip.vertical, Some(Edge::Far));

        let grip = Grip::for_operation(OperationKind::ResizeHeight, &rect, Point::new(50, 10));
        assert_eq!(grip, Grip { horizontal: None, vertical: Some(Edge::Near) });

        assert_eq!(Grip::for_operation(OperationKind::Move, &rect, Point::new(1, 1)), Grip::default());
    }

    #[test]
    fn resize_kind_from_cursor_thirds() {
        let rect = Rect::new(0, 0, 900, 600);
        assert_eq!(OperationKind::resize_for_cursor(&rect, Point::new(450, 50)), OperationKind::ResizeHeight);
        assert_eq!(OperationKind::resize_for_cursor(&rect, Point::new(50, 300)), OperationKind::ResizeWidth);
        assert_eq!(OperationKind::resize_for_cursor(&rect, Point::new(850, 550)), OperationKind::ResizeBoth);
        assert_eq!(OperationKind::resize_for_cursor(&rect, Point::new(450, 300)), OperationKind::ResizeBoth);
    }

    #[test]
    fn grip_resize_applies_delta_to_gripped_edges() {
        let grip = Grip {
            horizontal: Some(Edge::Near),
            vertical: Some(Edge::Far),
        };
        let start = Rect::new(100, 100, 500, 400);
        assert_eq!(grip.resize(&start, -20, 30), Rect::new(80, 100, 500, 430));
    }

    #[test]
    fn newly_snapped_detection() {
        let candidate = SnapCandidate {
            axis: Axis::Horizontal,
            edge: Edge::Far,
            target_coordinate: 10,
            distance: 1,
            source: SnapSource::VirtualMonitorEdge,
        };
        let none = SnapState::default();
        let snapped = SnapState {
            horizontal: Some(candidate),
            vertical: None,
        };
        assert!(snapped.newly_snapped_since(&none));
        assert!(!snapped.newly_snapped_since(&snapped));
        assert!(!none.newly_snapped_since(&snapped));
    }
}
