//! Read-only export of an agent's waypoints for renderers.

use bevy::prelude::Component;
use glam::Vec3;
use serde::Serialize;

/// Copy of an agent's waypoint path and cursor at one instant.
///
/// Renderers draw connecting segments, per-waypoint markers and index labels
/// from this value without touching the live controller.
///
/// # Examples
/// ```
/// use glam::Vec3;
/// use smooth_nav::snapshot::WaypointSnapshot;
///
/// let snapshot = WaypointSnapshot::new(vec![Vec3::ZERO, Vec3::X, Vec3::Z], 1);
/// assert_eq!(snapshot.segments().count(), 2);
/// assert_eq!(snapshot.remaining(), &[Vec3::X, Vec3::Z]);
/// ```
#[derive(Component, Debug, Clone, Default, PartialEq, Serialize)]
pub struct WaypointSnapshot {
    /// Waypoints in travel order.
    pub points: Vec<Vec3>,
    /// Index of the waypoint being sought; equals `points.len()` when idle.
    pub cursor: usize,
}

impl WaypointSnapshot {
    /// Builds a snapshot, clamping `cursor` to the number of points.
    #[must_use]
    pub fn new(points: Vec<Vec3>, cursor: usize) -> Self {
        Self {
            cursor: cursor.min(points.len()),
            points,
        }
    }

    /// Consecutive waypoint pairs.
    pub fn segments(&self) -> impl Iterator<Item = (Vec3, Vec3)> + '_ {
        self.points
            .iter()
            .copied()
            .zip(self.points.iter().copied().skip(1))
    }

    /// Waypoints paired with their index, for labelled markers.
    pub fn markers(&self) -> impl Iterator<Item = (usize, Vec3)> + '_ {
        self.points.iter().copied().enumerate()
    }

    /// Waypoints not yet reached.
    #[must_use]
    pub fn remaining(&self) -> &[Vec3] {
        self.points.get(self.cursor..).unwrap_or_default()
    }

    /// Whether every waypoint has been reached.
    #[must_use]
    pub const fn is_finished(&self) -> bool {
        self.cursor >= self.points.len()
    }
}
