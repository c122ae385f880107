//! Post-processing of sampled curves into usable waypoints.
//!
//! Three stages run in a fixed order: oversmoothing removal, proximity merge
//! and surface re-validation. Each stage reads the previous stage's output
//! and builds a fresh sequence from a keep/discard decision per point.

use glam::Vec3;
use log::{debug, warn};

use super::{CurveSet, SampledPath};
use crate::config::SmoothingConfig;
use crate::surface::{AreaMask, NavigationSurface};
use crate::vector_math::safe_normalize;

/// Drops samples that loop back against their curve's chord.
///
/// Every sample after the path's first is compared with the last kept point:
/// when the direction towards it dotted with the producing curve's chord is
/// at or below `threshold` the sample is discarded. Duplicated joint samples
/// fall out here because their direction is zero. The final curve's exact
/// end is appended when filtering removed it.
///
/// Sequences of two points or fewer are returned unchanged.
#[must_use]
pub fn remove_oversmoothing(
    curves: &CurveSet,
    sampled: &SampledPath,
    threshold: f32,
) -> Vec<Vec3> {
    let points = sampled.points();
    let first = match points {
        [first, _, _, ..] => *first,
        _ => return points.to_vec(),
    };

    let candidates = curves
        .iter()
        .zip(sampled.per_curve())
        .flat_map(|(curve, chunk)| {
            let chord = curve.chord_direction();
            chunk.iter().map(move |point| (*point, chord))
        })
        .skip(1);

    let mut kept = Vec::with_capacity(points.len());
    kept.push(first);
    let mut last_kept = first;
    for (point, chord) in candidates {
        if safe_normalize(point - last_kept).dot(chord) <= threshold {
            continue;
        }
        kept.push(point);
        last_kept = point;
    }

    if let Some(end) = curves.last().map(super::BezierCurve::end) {
        if kept.last() != Some(&end) {
            kept.push(end);
        }
    }
    kept
}

/// Collapses points lying within `min_distance` of the last kept point.
///
/// The first point is always kept and the last point is always appended as
/// the anchor, even when it lies closer than `min_distance` to its
/// predecessor. Sequences of two points or fewer are returned unchanged.
///
/// # Examples
/// ```
/// use glam::Vec3;
/// use smooth_nav::smoothing::merge_close_points;
///
/// let points = [Vec3::ZERO, Vec3::X * 0.2, Vec3::X * 1.5, Vec3::X * 1.6];
/// let merged = merge_close_points(&points, 1.0);
/// assert_eq!(merged, vec![Vec3::ZERO, Vec3::X * 1.5, Vec3::X * 1.6]);
/// ```
#[must_use]
pub fn merge_close_points(points: &[Vec3], min_distance: f32) -> Vec<Vec3> {
    let [first, interior @ .., last] = points else {
        return points.to_vec();
    };
    if interior.is_empty() {
        return points.to_vec();
    }

    let mut kept = Vec::with_capacity(points.len());
    kept.push(*first);
    let mut last_kept = *first;
    for point in interior {
        if point.distance(last_kept) > min_distance {
            kept.push(*point);
            last_kept = *point;
        }
    }
    kept.push(*last);
    kept
}

/// Snaps every point onto `surface` within `radius`.
///
/// Points without a nearby surface are dropped with a warning.
pub fn revalidate_on_surface<S>(
    points: &[Vec3],
    surface: &S,
    radius: f32,
    mask: AreaMask,
) -> Vec<Vec3>
where
    S: NavigationSurface + ?Sized,
{
    points
        .iter()
        .filter_map(|point| {
            let snapped = surface.sample_nearest(*point, radius, mask);
            if snapped.is_none() {
                warn!("dropping waypoint {point}: no navigable surface within {radius}");
            }
            snapped
        })
        .collect()
}

/// The three filter stages bound to one configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathFilter {
    /// Dot-product cut-off for oversmoothing removal.
    pub oversmoothing_threshold: f32,
    /// Minimum spacing kept by the proximity merge.
    pub merge_distance: f32,
    /// Search radius for surface re-validation.
    pub snap_radius: f32,
    /// Areas accepted during re-validation.
    pub mask: AreaMask,
}

impl PathFilter {
    /// Derives the filter stages from a smoothing configuration.
    #[must_use]
    pub fn new(config: &SmoothingConfig, mask: AreaMask) -> Self {
        Self {
            oversmoothing_threshold: config.oversmoothing_threshold,
            merge_distance: config.merge_distance,
            snap_radius: config.snap_radius(),
            mask,
        }
    }

    /// Runs all stages in order.
    pub fn apply<S>(&self, curves: &CurveSet, sampled: &SampledPath, surface: &S) -> Vec<Vec3>
    where
        S: NavigationSurface + ?Sized,
    {
        let trimmed = remove_oversmoothing(curves, sampled, self.oversmoothing_threshold);
        let merged = merge_close_points(&trimmed, self.merge_distance);
        let snapped = revalidate_on_surface(&merged, surface, self.snap_radius, self.mask);
        debug!(
            "filtered {} samples: {} after oversmoothing, {} after merge, {} on surface",
            sampled.len(),
            trimmed.len(),
            merged.len(),
            snapped.len()
        );
        snapped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::smoothing::{build_curves, sample_curves};
    use crate::surface::{CornerSequence, SurfaceError};
    use rstest::rstest;

    struct Plane;

    impl NavigationSurface for Plane {
        fn compute_path(
            &self,
            start: Vec3,
            end: Vec3,
            _: AreaMask,
        ) -> Result<CornerSequence, SurfaceError> {
            Ok(CornerSequence::direct(start, end))
        }

        fn sample_nearest(&self, point: Vec3, _: f32, _: AreaMask) -> Option<Vec3> {
            (point.x < 100.0).then_some(Vec3::new(point.x, 0.0, point.z))
        }
    }

    fn l_path(threshold: f32) -> (CurveSet, SampledPath, Vec<Vec3>) {
        let corners =
            CornerSequence::new(vec![Vec3::ZERO, Vec3::X * 5.0, Vec3::new(5.0, 0.0, 5.0)])
                .unwrap_or_else(|e| panic!("{e}"));
        let curves = build_curves(&corners, 0.25).unwrap_or_else(|e| panic!("{e}"));
        let sampled = sample_curves(&curves, 10);
        let kept = remove_oversmoothing(&curves, &sampled, threshold);
        (curves, sampled, kept)
    }

    #[rstest]
    fn oversmoothing_drops_duplicate_joints() {
        let (_, sampled, kept) = l_path(0.0);
        assert_eq!(kept.len(), sampled.len() - 1);
        assert!(kept.windows(2).all(|pair| pair[0] != pair[1]));
    }

    #[rstest]
    fn oversmoothing_keeps_exact_end() {
        let (curves, _, kept) = l_path(0.9);
        assert_eq!(kept.last(), curves.last().map(crate::smoothing::BezierCurve::end).as_ref());
    }

    #[rstest]
    fn strict_threshold_leaves_only_anchors() {
        let (_, _, kept) = l_path(1.0);
        assert_eq!(kept, vec![Vec3::ZERO, Vec3::new(5.0, 0.0, 5.0)]);
    }

    #[rstest]
    #[case::empty(vec![])]
    #[case::pair(vec![Vec3::ZERO, Vec3::X])]
    fn merge_leaves_short_sequences_alone(#[case] points: Vec<Vec3>) {
        assert_eq!(merge_close_points(&points, 10.0), points);
    }

    #[rstest]
    fn merge_separates_interior_points() {
        let points: Vec<Vec3> = (0..20_u8).map(|i| Vec3::X * (f32::from(i) * 0.3)).collect();
        let merged = merge_close_points(&points, 1.0);
        let (body, _) = merged.split_at(merged.len() - 1);
        assert!(body.windows(2).all(|pair| pair[0].distance(pair[1]) > 1.0));
        assert_eq!(merged.first(), points.first());
        assert_eq!(merged.last(), points.last());
    }

    #[rstest]
    fn revalidation_snaps_and_drops() {
        let points = [
            Vec3::new(1.0, 0.4, 1.0),
            Vec3::new(150.0, 0.0, 0.0),
            Vec3::new(2.0, -0.3, 0.0),
        ];
        let snapped = revalidate_on_surface(&points, &Plane, 1.0, AreaMask::ALL);
        assert_eq!(snapped, vec![Vec3::new(1.0, 0.0, 1.0), Vec3::new(2.0, 0.0, 0.0)]);
    }

    #[rstest]
    fn filter_runs_all_stages() {
        let (curves, sampled, _) = l_path(0.0);
        let filter = PathFilter::new(&SmoothingConfig::default(), AreaMask::ALL);
        let waypoints = filter.apply(&curves, &sampled, &Plane);
        assert_eq!(waypoints.first(), Some(&Vec3::ZERO));
        assert_eq!(waypoints.last(), Some(&Vec3::new(5.0, 0.0, 5.0)));
        assert!(waypoints.len() < sampled.len());
    }
}
