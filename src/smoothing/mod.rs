//! Corner-to-curve path smoothing.
//!
//! A [`PathSmoother`] turns the corner sequence of a pathfinding query into
//! a [`WaypointPath`]: curves are fitted through the corners, sampled, and
//! the samples are filtered for overshoot, crowding and surface validity.
//! Direct paths of two corners are passed through untouched.

mod bezier;
mod builder;
mod filter;
mod sampler;

use glam::Vec3;
use log::debug;
use serde::Serialize;
use thiserror::Error;

pub use bezier::{BezierCurve, CurveSamples};
pub use builder::{build_curves, CurveSet};
pub use filter::{merge_close_points, remove_oversmoothing, revalidate_on_surface, PathFilter};
pub use sampler::{sample_curves, SampledPath};

use crate::config::{ConfigError, SmoothingConfig};
use crate::surface::{AreaMask, CornerSequence, NavigationSurface, SurfaceError};

/// Failures while producing a smoothed path.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SmoothingError {
    /// The surface rejected the path query.
    #[error(transparent)]
    Surface(#[from] SurfaceError),
    /// The look-ahead correction needs a second curve to anticipate.
    #[error("look-ahead correction needs at least 2 curves, got {count}")]
    TooFewCurves {
        /// Number of curves that were built.
        count: usize,
    },
}

/// Ordered waypoints an agent steers through.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct WaypointPath(Vec<Vec3>);

impl WaypointPath {
    /// The waypoints in travel order.
    #[must_use]
    pub fn as_slice(&self) -> &[Vec3] {
        &self.0
    }

    /// Number of waypoints.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the path has no waypoints.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Waypoint at `index`, if any.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<Vec3> {
        self.0.get(index).copied()
    }

    /// Final waypoint.
    #[must_use]
    pub fn last(&self) -> Option<Vec3> {
        self.0.last().copied()
    }

    /// Releases the waypoints.
    #[must_use]
    pub fn into_inner(self) -> Vec<Vec3> {
        self.0
    }
}

impl From<Vec<Vec3>> for WaypointPath {
    fn from(points: Vec<Vec3>) -> Self {
        Self(points)
    }
}

impl From<CornerSequence> for WaypointPath {
    fn from(corners: CornerSequence) -> Self {
        Self(corners.into_inner())
    }
}

/// Builds, samples and filters curves for one smoothing configuration.
///
/// # Examples
/// ```
/// use glam::Vec3;
/// use smooth_nav::config::SmoothingConfig;
/// use smooth_nav::smoothing::PathSmoother;
/// use smooth_nav::surface::{AreaMask, CornerSequence, FloorPlan};
///
/// let mut floor = FloorPlan::default();
/// floor.add_rect((0, 0), (2, 2), 0);
/// let smoother = PathSmoother::new(SmoothingConfig::default())?;
///
/// let direct = CornerSequence::direct(Vec3::new(0.5, 1.0, 0.5), Vec3::new(1.5, 1.0, 1.5));
/// let path = smoother.smooth_corners(direct.clone(), &floor, AreaMask::ALL)?;
/// assert_eq!(path.as_slice(), direct.as_slice());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PathSmoother {
    config: SmoothingConfig,
}

impl PathSmoother {
    /// Validates `config` and wraps it.
    ///
    /// # Errors
    /// Returns [`ConfigError`] for out-of-range values.
    pub fn new(config: SmoothingConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The configuration in use.
    #[must_use]
    pub const fn config(&self) -> &SmoothingConfig {
        &self.config
    }

    /// Smooths an existing corner sequence.
    ///
    /// Sequences of two corners are returned verbatim without touching the
    /// surface.
    ///
    /// # Errors
    /// Returns [`SmoothingError::TooFewCurves`] if curve construction cannot
    /// apply its look-ahead correction.
    pub fn smooth_corners<S>(
        &self,
        corners: CornerSequence,
        surface: &S,
        mask: AreaMask,
    ) -> Result<WaypointPath, SmoothingError>
    where
        S: NavigationSurface + ?Sized,
    {
        if corners.len() <= 2 {
            debug!("direct path of {} corners; smoothing skipped", corners.len());
            return Ok(corners.into());
        }
        let curves = build_curves(&corners, self.config.tangent_length)?;
        let sampled = sample_curves(&curves, self.config.samples_per_curve);
        let filter = PathFilter::new(&self.config, mask);
        let waypoints = filter.apply(&curves, &sampled, surface);
        debug!(
            "smoothed {} corners into {} waypoints",
            corners.len(),
            waypoints.len()
        );
        Ok(WaypointPath(waypoints))
    }

    /// Queries `surface` for a path from `start` to `target` and smooths it.
    ///
    /// # Errors
    /// Returns [`SmoothingError::Surface`] when the surface finds no path.
    pub fn plan<S>(
        &self,
        surface: &S,
        start: Vec3,
        target: Vec3,
        mask: AreaMask,
    ) -> Result<WaypointPath, SmoothingError>
    where
        S: NavigationSurface + ?Sized,
    {
        let corners = surface.compute_path(start, target, mask)?;
        self.smooth_corners(corners, surface, mask)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn rejects_invalid_configuration() {
        let config = SmoothingConfig {
            samples_per_curve: 1,
            ..SmoothingConfig::default()
        };
        assert_eq!(
            PathSmoother::new(config),
            Err(ConfigError::TooFewSamples(1))
        );
    }

    #[rstest]
    fn waypoint_path_serializes_as_array() {
        let path = WaypointPath::from(vec![Vec3::ZERO, Vec3::X]);
        let json = serde_json::to_string(&path).unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(json, "[[0.0,0.0,0.0],[1.0,0.0,0.0]]");
    }
}
