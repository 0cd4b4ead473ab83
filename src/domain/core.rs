//! Core geometry types and operations
//!
//! This module defines pure geometry types in real pixel coordinates with no
//! knowledge of Win32 or DPI concepts. Rectangles are stored by their four
//! edges; width and height are always derived.

use std::fmt;

/// Point in real pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Component-wise difference `self - origin`
    pub fn delta_from(&self, origin: Point) -> (i32, i32) {
        (self.x - origin.x, self.y - origin.y)
    }
}

/// Axis along which an edge moves
///
/// `Horizontal` covers x coordinates (left/right edges), `Vertical` covers
/// y coordinates (top/bottom edges).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// Side of a rectangle on one axis
///
/// `Near` is left/top, `Far` is right/bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Edge {
    Near,
    Far,
}

impl Edge {
    pub fn opposite(self) -> Self {
        match self {
            Edge::Near => Edge::Far,
            Edge::Far => Edge::Near,
        }
    }
}

/// Rectangle in real pixel coordinates
///
/// `right` and `bottom` are exclusive. A well-formed rectangle has
/// `right >= left` and `bottom >= top`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Rect {
    /// Creates a new rectangle from its edges
    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Creates a rectangle from an origin and a size
    pub fn from_xywh(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self::new(x, y, x + w, y + h)
    }

    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }

    /// Returns the area of the rectangle in square pixels (0 for degenerate rects)
    pub fn area(&self) -> i64 {
        if self.is_degenerate() {
            0
        } else {
            self.width() as i64 * self.height() as i64
        }
    }

    /// Returns true if the rectangle has zero or negative extent on either axis
    pub fn is_degenerate(&self) -> bool {
        self.width() <= 0 || self.height() <= 0
    }

    /// Returns the center point, rounding toward negative infinity
    pub fn center(&self) -> Point {
        Point::new(
            (self.left + self.right).div_euclid(2),
            (self.top + self.bottom).div_euclid(2),
        )
    }

    /// Half-open containment: left/top edges are inside, right/bottom are not
    pub fn contains_point(&self, point: Point) -> bool {
        point.x >= self.left && point.x < self.right && point.y >= self.top && point.y < self.bottom
    }

    /// Closed containment: all four edges count as inside
    pub fn contains_point_inclusive(&self, point: Point) -> bool {
        point.x >= self.left
            && point.x <= self.right
            && point.y >= self.top
            && point.y <= self.bottom
    }

    /// Returns true if `other` lies entirely inside this rectangle
    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.left >= self.left
            && other.right <= self.right
            && other.top >= self.top
            && other.bottom <= self.bottom
    }

    /// Returns the intersection of two rectangles, or None if they don't overlap
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        let left = self.left.max(other.left);
        let top = self.top.max(other.top);
        let right = self.right.min(other.right);
        let bottom = self.bottom.min(other.bottom);

        if left < right && top < bottom {
            Some(Rect::new(left, top, right, bottom))
        } else {
            None
        }
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        self.intersection(other).is_some()
    }

    /// Returns the bounding box that contains both rectangles
    pub fn union(&self, other: &Rect) -> Rect {
        Rect::new(
            self.left.min(other.left),
            self.top.min(other.top),
            self.right.max(other.right),
            self.bottom.max(other.bottom),
        )
    }

    /// Returns this rectangle moved by `(dx, dy)`
    pub fn translate(&self, dx: i32, dy: i32) -> Rect {
        Rect::new(
            self.left + dx,
            self.top + dy,
            self.right + dx,
            self.bottom + dy,
        )
    }

    /// Returns this rectangle moved along a single axis
    pub fn translate_axis(&self, axis: Axis, delta: i32) -> Rect {
        match axis {
            Axis::Horizontal => self.translate(delta, 0),
            Axis::Vertical => self.translate(0, delta),
        }
    }

    /// Reads the coordinate of one edge
    pub fn edge(&self, axis: Axis, edge: Edge) -> i32 {
        match (axis, edge) {
            (Axis::Horizontal, Edge::Near) => self.left,
            (Axis::Horizontal, Edge::Far) => self.right,
            (Axis::Vertical, Edge::Near) => self.top,
            (Axis::Vertical, Edge::Far) => self.bottom,
        }
    }

    /// Returns a copy with one edge moved to `value`; the other edges are untouched
    pub fn with_edge(&self, axis: Axis, edge: Edge, value: i32) -> Rect {
        let mut rect = *self;
        match (axis, edge) {
            (Axis::Horizontal, Edge::Near) => rect.left = value,
            (Axis::Horizontal, Edge::Far) => rect.right = value,
            (Axis::Vertical, Edge::Near) => rect.top = value,
            (Axis::Vertical, Edge::Far) => rect.bottom = value,
        }
        rect
    }

    /// Extent along one axis
    pub fn extent(&self, axis: Axis) -> i32 {
        match axis {
            Axis::Horizontal => self.width(),
            Axis::Vertical => self.height(),
        }
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({},{})-({},{})",
            self.left, self.top, self.right, self.bottom
        )
    }
}
