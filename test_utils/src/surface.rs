//! Navigation surface doubles.

use glam::Vec3;
use smooth_nav::surface::{AreaMask, CornerSequence, NavigationSurface, SurfaceError};

/// Infinite horizontal plane at `height`, optionally with rectangular holes.
///
/// Path queries return the configured interior corners between the actual
/// start and end, or a direct path when none are configured.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OpenSurface {
    /// Height of the plane.
    pub height: f32,
    /// Axis-aligned `(min, max)` XZ rectangles with no surface.
    pub holes: Vec<((f32, f32), (f32, f32))>,
    /// Interior corners inserted into every path.
    pub via: Vec<Vec3>,
}

impl OpenSurface {
    /// Plane at `height` with no holes.
    pub fn flat(height: f32) -> Self {
        Self {
            height,
            ..Self::default()
        }
    }

    /// Routes every path through `corners`.
    #[must_use]
    pub fn with_via(mut self, corners: impl IntoIterator<Item = Vec3>) -> Self {
        self.via = corners.into_iter().collect();
        self
    }

    /// Removes the surface inside the XZ rectangle `min..max`.
    #[must_use]
    pub fn with_hole(mut self, min: (f32, f32), max: (f32, f32)) -> Self {
        self.holes.push((min, max));
        self
    }

    fn in_hole(&self, point: Vec3) -> bool {
        self.holes.iter().any(|((x0, z0), (x1, z1))| {
            (*x0..=*x1).contains(&point.x) && (*z0..=*z1).contains(&point.z)
        })
    }
}

impl NavigationSurface for OpenSurface {
    fn compute_path(
        &self,
        start: Vec3,
        end: Vec3,
        _mask: AreaMask,
    ) -> Result<CornerSequence, SurfaceError> {
        if self.in_hole(end) {
            return Err(SurfaceError::NoPath { start, end });
        }
        let mut corners = Vec::with_capacity(self.via.len() + 2);
        corners.push(start);
        corners.extend(self.via.iter().copied());
        corners.push(end);
        CornerSequence::new(corners)
    }

    fn sample_nearest(&self, point: Vec3, max_radius: f32, _mask: AreaMask) -> Option<Vec3> {
        let projected = Vec3::new(point.x, self.height, point.z);
        (!self.in_hole(point) && projected.distance(point) <= max_radius).then_some(projected)
    }
}
