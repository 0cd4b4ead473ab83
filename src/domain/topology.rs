//! Monitor topology and virtual monitor derivation
//!
//! A physical monitor may be split (picture-by-picture) into two virtual
//! monitors. Every positioning decision downstream works on virtual monitors
//! only; an unsplit physical monitor yields exactly one virtual monitor with
//! identical bounds.
//!
//! The topology is rebuilt from scratch on every tick so monitor hot-plug
//! never leaves stale geometry behind.

use tracing::{trace, warn};

use crate::domain::core::{Point, Rect};

/// Stable identifier of a physical monitor (enumeration index)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonitorId(pub u32);

/// Identifier of a derived virtual monitor
///
/// Ids are assigned in enumeration order with the left piece of a split
/// monitor first, so a lower id always means "left/primary" within one
/// physical monitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VirtualMonitorId(pub u32);

/// Snapshot of a hardware display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhysicalMonitor {
    pub id: MonitorId,
    /// Full monitor rectangle
    pub bounds: Rect,
    /// Usable rectangle excluding reserved OS chrome; always inside `bounds`
    pub work_area: Rect,
    pub is_primary: bool,
}

/// Picture-by-picture split of one physical monitor
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplitConfig {
    pub enabled: bool,
    /// Fraction of the width given to the left piece, strictly inside (0, 1)
    pub ratio: f64,
    pub anchor_monitor_id: MonitorId,
}

impl SplitConfig {
    pub fn new(anchor_monitor_id: MonitorId, ratio: f64) -> Self {
        Self {
            enabled: true,
            ratio,
            anchor_monitor_id,
        }
    }

    /// Returns true if the ratio can produce a valid cut
    pub fn has_valid_ratio(&self) -> bool {
        self.ratio.is_finite() && self.ratio > 0.0 && self.ratio < 1.0
    }
}

/// Logical work area derived from a physical monitor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VirtualMonitor {
    pub id: VirtualMonitorId,
    pub bounds: Rect,
    pub work_area: Rect,
    pub source_physical_id: MonitorId,
    pub is_primary: bool,
}

/// Returns the x coordinate where a monitor of the given bounds is cut
///
/// The cut is kept strictly inside the bounds so both pieces have width.
fn split_seam(bounds: &Rect, ratio: f64) -> Option<i32> {
    if bounds.width() < 2 {
        return None;
    }
    let offset = (bounds.width() as f64 * ratio).round() as i32;
    Some(bounds.left + offset.clamp(1, bounds.width() - 1))
}

/// Derives the virtual monitors for a set of physical monitors
///
/// Each physical monitor with an enabled split whose ratio lies in (0, 1)
/// produces exactly two virtual monitors cut vertically at
/// `left + round(width * ratio)`; every other monitor produces one virtual
/// monitor equal to itself. If several enabled splits name the same monitor
/// the first one wins.
pub fn virtual_monitors_for(
    physical_monitors: &[PhysicalMonitor],
    splits: &[SplitConfig],
) -> Vec<VirtualMonitor> {
    let mut virtual_monitors = Vec::with_capacity(physical_monitors.len() + 1);
    let mut next_id = 0u32;
    let mut push = |bounds: Rect, work_area: Rect, physical: &PhysicalMonitor, is_primary: bool| {
        virtual_monitors.push(VirtualMonitor {
            id: VirtualMonitorId(next_id),
            bounds,
            work_area,
            source_physical_id: physical.id,
            is_primary,
        });
        next_id += 1;
    };

    for physical in physical_monitors {
        let split = splits
            .iter()
            .find(|split| split.enabled && split.anchor_monitor_id == physical.id);

        let seam = match split {
            Some(split) if split.has_valid_ratio() => split_seam(&physical.bounds, split.ratio),
            Some(split) => {
                warn!(
                    monitor = physical.id.0,
                    ratio = split.ratio,
                    "ignoring split with ratio outside (0, 1)"
                );
                None
            }
            None => None,
        };

        match seam {
            Some(seam) => {
                let left = Rect { right: seam, ..physical.bounds };
                let right = Rect { left: seam, ..physical.bounds };
                trace!(monitor = physical.id.0, seam, "splitting physical monitor");
                push(left, clip_work_area(&physical.work_area, &left), physical, physical.is_primary);
                push(right, clip_work_area(&physical.work_area, &right), physical, false);
            }
            None => push(physical.bounds, physical.work_area, physical, physical.is_primary),
        }
    }

    virtual_monitors
}

fn clip_work_area(work_area: &Rect, piece: &Rect) -> Rect {
    work_area.intersection(piece).unwrap_or(*piece)
}

/// Returns the virtual monitor whose bounds contain the point
///
/// Containment is half-open, so on a partition exactly one monitor matches.
/// `None` means the point is outside every monitor; callers keep whatever
/// monitor they used before.
pub fn monitor_containing(
    point: Point,
    virtual_monitors: &[VirtualMonitor],
) -> Option<VirtualMonitorId> {
    virtual_monitors
        .iter()
        .find(|vm| vm.bounds.contains_point(point))
        .map(|vm| vm.id)
}

/// Assigns a window to a virtual monitor by its center point
///
/// A center lying exactly on a shared edge matches both neighbours; the
/// lower id (left/primary piece) wins.
pub fn monitor_for_window(
    rect: &Rect,
    virtual_monitors: &[VirtualMonitor],
) -> Option<VirtualMonitorId> {
    let center = rect.center();
    virtual_monitors
        .iter()
        .filter(|vm| vm.bounds.contains_point_inclusive(center))
        .map(|vm| vm.id)
        .min()
}

/// Physical and virtual monitors for one tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MonitorTopology {
    physical: Vec<PhysicalMonitor>,
    virtual_monitors: Vec<VirtualMonitor>,
}

impl MonitorTopology {
    /// Builds the topology, dropping physical monitors with degenerate bounds
    pub fn build(physical_monitors: Vec<PhysicalMonitor>, splits: &[SplitConfig]) -> Self {
        let physical: Vec<PhysicalMonitor> = physical_monitors
            .into_iter()
            .filter(|monitor| {
                if monitor.bounds.is_degenerate() {
                    warn!(monitor = monitor.id.0, bounds = %monitor.bounds, "skipping degenerate monitor");
                    false
                } else {
                    true
                }
            })
            .collect();
        let virtual_monitors = virtual_monitors_for(&physical, splits);
        Self {
            physical,
            virtual_monitors,
        }
    }

    pub fn physical_monitors(&self) -> &[PhysicalMonitor] {
        &self.physical
    }

    pub fn virtual_monitors(&self) -> &[VirtualMonitor] {
        &self.virtual_monitors
    }

    pub fn is_empty(&self) -> bool {
        self.virtual_monitors.is_empty()
    }

    pub fn get(&self, id: VirtualMonitorId) -> Option<&VirtualMonitor> {
        self.virtual_monitors.iter().find(|vm| vm.id == id)
    }

    pub fn primary(&self) -> Option<&VirtualMonitor> {
        self.virtual_monitors
            .iter()
            .find(|vm| vm.is_primary)
            .or_else(|| self.virtual_monitors.first())
    }

    pub fn containing(&self, point: Point) -> Option<&VirtualMonitor> {
        monitor_containing(point, &self.virtual_monitors).and_then(|id| self.get(id))
    }

    /// Resolves the monitor a window belongs to, with fallbacks
    ///
    /// Order: the monitor containing the window's center, then `previous` if
    /// it still exists, then the primary monitor. Only an empty topology
    /// yields `None`.
    pub fn resolve_for_window(
        &self,
        rect: &Rect,
        previous: Option<VirtualMonitorId>,
    ) -> Option<&VirtualMonitor> {
        monitor_for_window(rect, &self.virtual_monitors)
            .and_then(|id| self.get(id))
            .or_else(|| previous.and_then(|id| self.get(id)))
            .or_else(|| self.primary())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn physical(id: u32, bounds: Rect, is_primary: bool) -> PhysicalMonitor {
        PhysicalMonitor {
            id: MonitorId(id),
            bounds,
            work_area: Rect { bottom: bounds.bottom - 40, ..bounds },
            is_primary,
        }
    }

    fn ultrawide() -> PhysicalMonitor {
        physical(0, Rect::new(0, 0, 5120, 2160), true)
    }

    fn assert_partition(bounds: Rect, pieces: &[VirtualMonitor]) {
        assert_eq!(pieces.len(), 2);
        let (left, right) = (pieces[0].bounds, pieces[1].bounds);
        assert!(left.intersection(&right).is_none(), "pieces overlap");
        assert_eq!(left.union(&right), bounds);
        assert_eq!(left.area() + right.area(), bounds.area());
        assert_eq!(left.right, right.left);
    }

    #[test]
    fn split_partitions_bounds_exactly() {
        let monitor = ultrawide();
        let split = SplitConfig::new(MonitorId(0), 0.75);
        let vms = virtual_monitors_for(&[monitor.clone()], &[split]);

        assert_partition(monitor.bounds, &vms);
        assert_eq!(vms[0].bounds, Rect::new(0, 0, 3840, 2160));
        assert_eq!(vms[1].bounds, Rect::new(3840, 0, 5120, 2160));
    }

    #[test]
    fn partition_holds_across_ratios_and_odd_sizes() {
        let bounds_list = [
            Rect::new(0, 0, 5120, 2160),
            Rect::new(-1921, 13, 0, 1093),
            Rect::new(100, 100, 103, 200),
            Rect::new(7, 0, 9, 1),
        ];
        for bounds in bounds_list {
            for step in 1..100 {
                let ratio = step as f64 / 100.0;
                let monitor = physical(0, bounds, true);
                let vms = virtual_monitors_for(&[monitor], &[SplitConfig::new(MonitorId(0), ratio)]);
                assert_partition(bounds, &vms);
                assert!(!vms[0].bounds.is_degenerate());
                assert!(!vms[1].bounds.is_degenerate());
            }
        }
    }

    #[test]
    fn disabled_split_is_identity() {
        let monitor = ultrawide();
        let split = SplitConfig {
            enabled: false,
            ..SplitConfig::new(MonitorId(0), 0.75)
        };
        let vms = virtual_monitors_for(&[monitor.clone()], &[split]);

        assert_eq!(vms.len(), 1);
        assert_eq!(vms[0].bounds, monitor.bounds);
        assert_eq!(vms[0].work_area, monitor.work_area);
        assert!(vms[0].is_primary);
    }

    #[test]
    fn invalid_ratio_leaves_monitor_whole() {
        let monitor = ultrawide();
        for ratio in [0.0, 1.0, -0.5, 1.5, f64::NAN] {
            let vms = virtual_monitors_for(&[monitor.clone()], &[SplitConfig::new(MonitorId(0), ratio)]);
            assert_eq!(vms.len(), 1);
            assert_eq!(vms[0].bounds, monitor.bounds);
        }
    }

    #[test]
    fn split_applies_only_to_anchor_monitor() {
        let monitors = [
            physical(0, Rect::new(0, 0, 1920, 1080), true),
            physical(1, Rect::new(1920, 0, 7040, 2160), false),
        ];
        let vms = virtual_monitors_for(&monitors, &[SplitConfig::new(MonitorId(1), 0.5)]);

        assert_eq!(vms.len(), 3);
        assert_eq!(vms[0].bounds, monitors[0].bounds);
        assert_eq!(vms[1].bounds, Rect::new(1920, 0, 4480, 2160));
        assert_eq!(vms[2].bounds, Rect::new(4480, 0, 7040, 2160));
        assert_eq!(vms[1].source_physical_id, MonitorId(1));
        assert_eq!(
            vms.iter().map(|vm| vm.id.0).collect::<Vec<_>>(),
            vec![0, 1, 2]
        );
    }

    #[test]
    fn left_piece_keeps_primary_flag_and_work_area_is_clipped() {
        let vms = virtual_monitors_for(&[ultrawide()], &[SplitConfig::new(MonitorId(0), 0.75)]);

        assert!(vms[0].is_primary);
        assert!(!vms[1].is_primary);
        assert_eq!(vms[0].work_area, Rect::new(0, 0, 3840, 2120));
        assert_eq!(vms[1].work_area, Rect::new(3840, 0, 5120, 2120));
        for vm in &vms {
            assert!(vm.bounds.contains_rect(&vm.work_area));
        }
    }

    #[test]
    fn monitor_containing_point() {
        let vms = virtual_monitors_for(&[ultrawide()], &[SplitConfig::new(MonitorId(0), 0.75)]);

        assert_eq!(monitor_containing(Point::new(10, 10), &vms), Some(VirtualMonitorId(0)));
        assert_eq!(monitor_containing(Point::new(3840, 10), &vms), Some(VirtualMonitorId(1)));
        assert_eq!(monitor_containing(Point::new(3839, 10), &vms), Some(VirtualMonitorId(0)));
        assert_eq!(monitor_containing(Point::new(-5, 10), &vms), None);
        assert_eq!(monitor_containing(Point::new(5120, 10), &vms), None);
    }

    #[test]
    fn center_on_seam_goes_to_left_monitor() {
        let vms = virtual_monitors_for(&[ultrawide()], &[SplitConfig::new(MonitorId(0), 0.75)]);
        let window = Rect::new(3740, 500, 3940, 900);
        assert_eq!(window.center().x, 3840);

        for _ in 0..10 {
            assert_eq!(monitor_for_window(&window, &vms), Some(VirtualMonitorId(0)));
        }
    }

    #[test]
    fn straddling_window_uses_center_not_origin() {
        let vms = virtual_monitors_for(&[ultrawide()], &[SplitConfig::new(MonitorId(0), 0.75)]);
        // Top-left on the left piece, center on the right piece
        let window = Rect::new(3800, 100, 4200, 400);
        assert_eq!(monitor_for_window(&window, &vms), Some(VirtualMonitorId(1)));
    }

    #[test]
    fn resolve_falls_back_to_previous_then_primary() {
        let monitors = vec![
            physical(0, Rect::new(0, 0, 1920, 1080), false),
            physical(1, Rect::new(1920, 0, 3840, 1080), true),
        ];
        let topology = MonitorTopology::build(monitors, &[]);
        let offscreen = Rect::new(-5000, -5000, -4000, -4000);

        let with_previous = topology.resolve_for_window(&offscreen, Some(VirtualMonitorId(0)));
        assert_eq!(with_previous.map(|vm| vm.id), Some(VirtualMonitorId(0)));

        let first_tick = topology.resolve_for_window(&offscreen, None);
        assert_eq!(first_tick.map(|vm| vm.id), Some(VirtualMonitorId(1)));

        // A previous id that no longer exists is skipped
        let stale = topology.resolve_for_window(&offscreen, Some(VirtualMonitorId(9)));
        assert_eq!(stale.map(|vm| vm.id), Some(VirtualMonitorId(1)));
    }

    #[test]
    fn degenerate_monitors_are_dropped() {
        let monitors = vec![
            physical(0, Rect::new(0, 0, 0, 1080), false),
            physical(1, Rect::new(0, 0, 1920, 1080), true),
        ];
        let topology = MonitorTopology::build(monitors, &[]);
        assert_eq!(topology.physical_monitors().len(), 1);
        assert_eq!(topology.virtual_monitors().len(), 1);
        assert_eq!(topology.virtual_monitors()[0].source_physical_id, MonitorId(1));
    }

    #[test]
    fn empty_topology_resolves_nothing() {
        let topology = MonitorTopology::default();
        assert!(topology.is_empty());
        assert!(topology.resolve_for_window(&Rect::new(0, 0, 10, 10), None).is_none());
    }
}
