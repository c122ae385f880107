//! Contract with the navigable surface.
//!
//! The crate never searches graphs itself. Corner sequences come from an
//! external pathfinding engine and waypoints are re-validated through its
//! nearest-point query; both are expressed by [`NavigationSurface`].
//! [`floor::FloorPlan`] is a small block-grid implementation used by the
//! headless simulation and tests.

pub mod floor;

use glam::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use floor::{Block, BlockSlope, FloorPlan};

/// Bit set of area types an agent may traverse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AreaMask(pub u32);

impl AreaMask {
    /// Every area is walkable.
    pub const ALL: Self = Self(u32::MAX);
    /// No area is walkable.
    pub const NONE: Self = Self(0);

    /// Mask containing a single area index. Indices above 31 yield
    /// [`AreaMask::NONE`].
    #[must_use]
    pub const fn only(area: u8) -> Self {
        if area < 32 {
            Self(1 << area)
        } else {
            Self::NONE
        }
    }

    /// Whether the area with index `area` is part of this mask.
    #[must_use]
    pub const fn allows(self, area: u8) -> bool {
        self.0 & Self::only(area).0 != 0
    }
}

impl Default for AreaMask {
    fn default() -> Self {
        Self::ALL
    }
}

/// Failures reported by a navigation surface.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SurfaceError {
    /// The surface could not connect the two points.
    #[error("no navigable path from {start} to {end}")]
    NoPath {
        /// Requested start.
        start: Vec3,
        /// Requested end.
        end: Vec3,
    },
    /// A corner sequence must contain at least a start and a destination.
    #[error("corner sequence needs at least 2 corners, got {0}")]
    DegenerateCorners(usize),
}

/// Raw polyline returned by a pathfinding query.
///
/// Always holds at least the start and the destination.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct CornerSequence(Vec<Vec3>);

impl CornerSequence {
    /// Wraps `corners`, rejecting sequences shorter than two points.
    ///
    /// # Errors
    /// Returns [`SurfaceError::DegenerateCorners`] for fewer than two
    /// corners.
    pub fn new(corners: Vec<Vec3>) -> Result<Self, SurfaceError> {
        if corners.len() < 2 {
            return Err(SurfaceError::DegenerateCorners(corners.len()));
        }
        Ok(Self(corners))
    }

    /// Straight path between two points.
    #[must_use]
    pub fn direct(start: Vec3, end: Vec3) -> Self {
        Self(vec![start, end])
    }

    /// The corners in travel order.
    #[must_use]
    pub fn as_slice(&self) -> &[Vec3] {
        &self.0
    }

    /// Number of corners, never below two.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    /// Always `false`; present for API symmetry with slices.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// First corner.
    #[must_use]
    pub fn start(&self) -> Vec3 {
        self.0.first().copied().unwrap_or(Vec3::ZERO)
    }

    /// Last corner.
    #[must_use]
    pub fn end(&self) -> Vec3 {
        self.0.last().copied().unwrap_or(Vec3::ZERO)
    }

    /// Releases the underlying corners.
    #[must_use]
    pub fn into_inner(self) -> Vec<Vec3> {
        self.0
    }
}

impl TryFrom<Vec<Vec3>> for CornerSequence {
    type Error = SurfaceError;

    fn try_from(corners: Vec<Vec3>) -> Result<Self, Self::Error> {
        Self::new(corners)
    }
}

/// Queries answered by the external navigable surface.
pub trait NavigationSurface {
    /// Computes the corner sequence from `start` to `end` across areas in
    /// `mask`.
    ///
    /// # Errors
    /// Returns [`SurfaceError`] when no path exists.
    fn compute_path(
        &self,
        start: Vec3,
        end: Vec3,
        mask: AreaMask,
    ) -> Result<CornerSequence, SurfaceError>;

    /// Closest walkable point to `point` within `max_radius`, if any.
    fn sample_nearest(&self, point: Vec3, max_radius: f32, mask: AreaMask) -> Option<Vec3>;
}

impl<S: NavigationSurface + ?Sized> NavigationSurface for &S {
    fn compute_path(
        &self,
        start: Vec3,
        end: Vec3,
        mask: AreaMask,
    ) -> Result<CornerSequence, SurfaceError> {
        (**self).compute_path(start, end, mask)
    }

    fn sample_nearest(&self, point: Vec3, max_radius: f32, mask: AreaMask) -> Option<Vec3> {
        (**self).sample_nearest(point, max_radius, mask)
    }
}

impl<S: NavigationSurface + ?Sized> NavigationSurface for Box<S> {
    fn compute_path(
        &self,
        start: Vec3,
        end: Vec3,
        mask: AreaMask,
    ) -> Result<CornerSequence, SurfaceError> {
        (**self).compute_path(start, end, mask)
    }

    fn sample_nearest(&self, point: Vec3, max_radius: f32, mask: AreaMask) -> Option<Vec3> {
        (**self).sample_nearest(point, max_radius, mask)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::empty(vec![], 0)]
    #[case::single(vec![Vec3::ONE], 1)]
    fn rejects_short_corner_sequences(#[case] corners: Vec<Vec3>, #[case] len: usize) {
        assert_eq!(
            CornerSequence::new(corners),
            Err(SurfaceError::DegenerateCorners(len))
        );
    }

    #[test]
    fn exposes_start_and_end() {
        let corners = CornerSequence::new(vec![Vec3::ZERO, Vec3::X, Vec3::Z])
            .unwrap_or_else(|e| panic!("valid corners rejected: {e}"));
        assert_eq!(corners.start(), Vec3::ZERO);
        assert_eq!(corners.end(), Vec3::Z);
        assert_eq!(corners.len(), 3);
        assert!(!corners.is_empty());
    }

    #[rstest]
    #[case(AreaMask::ALL, 0, true)]
    #[case(AreaMask::ALL, 31, true)]
    #[case(AreaMask::NONE, 0, false)]
    #[case(AreaMask::only(3), 3, true)]
    #[case(AreaMask::only(3), 4, false)]
    #[case(AreaMask::ALL, 40, false)]
    fn area_mask_membership(#[case] mask: AreaMask, #[case] area: u8, #[case] expected: bool) {
        assert_eq!(mask.allows(area), expected);
    }
}
