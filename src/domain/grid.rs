//! Named layout rectangles for one-shot positioning
//!
//! This module partitions a virtual monitor's work area into a fixed scheme of
//! named rectangles (halves, thirds, quarters). The pieces of a scheme never
//! overlap and always cover the work area exactly; when the size doesn't
//! divide evenly the remainder goes to the later pieces.

use std::fmt;

use thiserror::Error;

use crate::domain::core::Rect;

/// Errors that can occur during layout calculation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    /// Work area has zero or negative extent
    #[error("work area {0} is empty")]
    DegenerateWorkArea(Rect),
    /// Work area is too small to give every piece at least one pixel
    #[error("work area {area} cannot be divided into {parts} parts")]
    TooSmall { area: Rect, parts: i32 },
    /// The requested slot is not part of the scheme
    #[error("slot {slot} is not part of the {scheme:?} scheme")]
    SlotNotInScheme { slot: LayoutSlot, scheme: LayoutScheme },
}

/// Supported layout schemes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayoutScheme {
    /// Two full-height columns
    Halves,
    /// Three full-height columns
    Thirds,
    /// Two columns by two rows
    Quarters,
}

impl LayoutScheme {
    /// (columns, rows) of the scheme
    pub fn dimensions(self) -> (i32, i32) {
        match self {
            LayoutScheme::Halves => (2, 1),
            LayoutScheme::Thirds => (3, 1),
            LayoutScheme::Quarters => (2, 2),
        }
    }

    /// Slot names in row-major order
    pub fn slots(self) -> &'static [LayoutSlot] {
        match self {
            LayoutScheme::Halves => &[LayoutSlot::Left, LayoutSlot::Right],
            LayoutScheme::Thirds => &[
                LayoutSlot::LeftThird,
                LayoutSlot::CenterThird,
                LayoutSlot::RightThird,
            ],
            LayoutScheme::Quarters => &[
                LayoutSlot::TopLeft,
                LayoutSlot::TopRight,
                LayoutSlot::BottomLeft,
                LayoutSlot::BottomRight,
            ],
        }
    }
}

/// Name of one layout rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayoutSlot {
    Left,
    Right,
    LeftThird,
    CenterThird,
    RightThird,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl fmt::Display for LayoutSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LayoutSlot::Left => "left",
            LayoutSlot::Right => "right",
            LayoutSlot::LeftThird => "left third",
            LayoutSlot::CenterThird => "center third",
            LayoutSlot::RightThird => "right third",
            LayoutSlot::TopLeft => "top left",
            LayoutSlot::TopRight => "top right",
            LayoutSlot::BottomLeft => "bottom left",
            LayoutSlot::BottomRight => "bottom right",
        };
        f.write_str(name)
    }
}

/// A layout rectangle with its name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NamedRect {
    pub slot: LayoutSlot,
    pub rect: Rect,
}

/// Splits `[start, start + length)` into `parts` contiguous spans
///
/// Boundaries sit at `start + length * i / parts`, so the spans are exact and
/// differ in length by at most one pixel.
pub fn split_span(start: i32, length: i32, parts: i32) -> Vec<(i32, i32)> {
    let boundary = |i: i32| start + ((length as i64 * i as i64) / parts as i64) as i32;
    (0..parts).map(|i| (boundary(i), boundary(i + 1))).collect()
}

/// Partitions a work area into the named rectangles of `scheme`
///
/// # Example
/// ```rust
/// use tactile_snap::domain::{core::Rect, grid::{layout_rects, LayoutScheme, LayoutSlot}};
///
/// let halves = layout_rects(Rect::new(0, 0, 1920, 1040), LayoutScheme::Halves)?;
/// assert_eq!(halves[0].slot, LayoutSlot::Left);
/// assert_eq!(halves[0].rect, Rect::new(0, 0, 960, 1040));
/// ```
pub fn layout_rects(work_area: Rect, scheme: LayoutScheme) -> Result<Vec<NamedRect>, GridError> {
    if work_area.is_degenerate() {
        return Err(GridError::DegenerateWorkArea(work_area));
    }

    let (cols, rows) = scheme.dimensions();
    if work_area.width() < cols || work_area.height() < rows {
        return Err(GridError::TooSmall {
            area: work_area,
            parts: cols * rows,
        });
    }

    let columns = split_span(work_area.left, work_area.width(), cols);
    let row_spans = split_span(work_area.top, work_area.height(), rows);

    let rects = row_spans
        .iter()
        .flat_map(|&(top, bottom)| {
            columns
                .iter()
                .map(move |&(left, right)| Rect::new(left, top, right, bottom))
        })
        .zip(scheme.slots())
        .map(|(rect, &slot)| NamedRect { slot, rect })
        .collect();

    Ok(rects)
}

/// Looks up one named rectangle of `scheme`
pub fn slot_rect(work_area: Rect, scheme: LayoutScheme, slot: LayoutSlot) -> Result<Rect, GridError> {
    layout_rects(work_area, scheme)?
        .into_iter()
        .find(|named| named.slot == slot)
        .map(|named| named.rect)
        .ok_or(GridError::SlotNotInScheme { slot, scheme })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn create_test_work_area() -> Rect {
        Rect::new(0, 0, 1920, 1040)
    }

    fn assert_exact_partition(area: Rect, rects: &[NamedRect]) {
        let total: i64 = rects.iter().map(|named| named.rect.area()).sum();
        assert_eq!(total, area.area());
        for (i, a) in rects.iter().enumerate() {
            assert!(area.contains_rect(&a.rect));
            for b in &rects[i + 1..] {
                assert!(a.rect.intersection(&b.rect).is_none(), "{} overlaps {}", a.slot, b.slot);
            }
        }
    }

    #[test]
    fn halves_are_exact_half_width() {
        let area = create_test_work_area();
        let rects = layout_rects(area, LayoutScheme::Halves).unwrap();

        assert_eq!(
            rects,
            vec![
                NamedRect { slot: LayoutSlot::Left, rect: Rect::new(0, 0, 960, 1040) },
                NamedRect { slot: LayoutSlot::Right, rect: Rect::new(960, 0, 1920, 1040) },
            ]
        );
    }

    #[test]
    fn thirds_cover_odd_widths() {
        let area = Rect::new(3840, 0, 5120, 2120); // 1280 wide
        let rects = layout_rects(area, LayoutScheme::Thirds).unwrap();

        assert_eq!(rects.len(), 3);
        assert_eq!(rects[0].rect, Rect::new(3840, 0, 4266, 2120));
        assert_eq!(rects[1].rect, Rect::new(4266, 0, 4693, 2120));
        assert_eq!(rects[2].rect, Rect::new(4693, 0, 5120, 2120));
        assert_exact_partition(area, &rects);
    }

    #[test]
    fn quarters_are_row_major() {
        let area = Rect::new(-1920, 0, 0, 1081);
        let rects = layout_rects(area, LayoutScheme::Quarters).unwrap();

        let slots: Vec<LayoutSlot> = rects.iter().map(|named| named.slot).collect();
        assert_eq!(slots, LayoutScheme::Quarters.slots().to_vec());
        assert_eq!(rects[0].rect, Rect::new(-1920, 0, -960, 540));
        assert_eq!(rects[3].rect, Rect::new(-960, 540, 0, 1081));
        assert_exact_partition(area, &rects);
    }

    #[test]
    fn degenerate_work_area_is_rejected() {
        let result = layout_rects(Rect::new(0, 0, 0, 100), LayoutScheme::Halves);
        assert!(matches!(result, Err(GridError::DegenerateWorkArea(_))));

        let result = layout_rects(Rect::new(0, 0, 2, 100), LayoutScheme::Thirds);
        assert!(matches!(result, Err(GridError::TooSmall { parts: 3, .. })));
    }

    #[test]
    fn slot_lookup() {
        let area = create_test_work_area();
        assert_eq!(
            slot_rect(area, LayoutScheme::Halves, LayoutSlot::Right).unwrap(),
            Rect::new(960, 0, 1920, 1040)
        );
        assert!(matches!(
            slot_rect(area, LayoutScheme::Halves, LayoutSlot::TopLeft),
            Err(GridError::SlotNotInScheme { .. })
        ));
    }

    #[test]
    fn split_span_is_contiguous() {
        let spans = split_span(10, 7, 3);
        assert_eq!(spans, vec![(10, 12), (12, 14), (14, 17)]);
    }
}
