//! Builds one Bézier curve per pair of consecutive corners.

use std::ops::Index;

use glam::Vec3;

use super::{BezierCurve, SmoothingError};
use crate::surface::CornerSequence;
use crate::vector_math::safe_normalize;

/// Ordered curves whose joints coincide with the original corners.
#[derive(Debug, Clone, PartialEq)]
pub struct CurveSet(Vec<BezierCurve>);

impl CurveSet {
    /// The curves in travel order.
    #[must_use]
    pub fn as_slice(&self) -> &[BezierCurve] {
        &self.0
    }

    /// Number of curves.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the set holds no curves.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates the curves in order.
    pub fn iter(&self) -> std::slice::Iter<'_, BezierCurve> {
        self.0.iter()
    }

    /// The final curve, whose end is the destination.
    #[must_use]
    pub fn last(&self) -> Option<&BezierCurve> {
        self.0.last()
    }
}

impl Index<usize> for CurveSet {
    type Output = BezierCurve;

    #[expect(
        clippy::indexing_slicing,
        reason = "Indexing a curve set panics out of range, like a slice."
    )]
    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl<'a> IntoIterator for &'a CurveSet {
    type Item = &'a BezierCurve;
    type IntoIter = std::slice::Iter<'a, BezierCurve>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Fits curves through `corners` using handles of length `tangent_length`.
///
/// Each handle follows the sum of the incoming and outgoing corner
/// directions. The first curve's end handle is then corrected to anticipate
/// the turn into the second curve.
///
/// # Errors
/// Returns [`SmoothingError::TooFewCurves`] for sequences that produce fewer
/// than two curves; those take the direct-path bypass instead.
///
/// # Examples
/// ```
/// use glam::Vec3;
/// use smooth_nav::smoothing::build_curves;
/// use smooth_nav::surface::CornerSequence;
///
/// let corners = CornerSequence::new(vec![Vec3::ZERO, Vec3::X * 5.0, Vec3::new(5.0, 0.0, 5.0)])?;
/// let curves = build_curves(&corners, 0.25)?;
/// assert_eq!(curves.len(), 2);
/// assert_eq!(curves[0].end(), curves[1].start());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn build_curves(
    corners: &CornerSequence,
    tangent_length: f32,
) -> Result<CurveSet, SmoothingError> {
    let points = corners.as_slice();
    let mut curves: Vec<BezierCurve> = points
        .iter()
        .zip(points.iter().skip(1))
        .enumerate()
        .map(|(i, (&from, &to))| {
            let last_dir = i
                .checked_sub(1)
                .and_then(|prev| points.get(prev))
                .map_or(Vec3::ZERO, |prev| safe_normalize(from - *prev));
            let next_dir = safe_normalize(to - from);
            let handle = (last_dir + next_dir) * tangent_length;
            BezierCurve::new(from, from + handle, to - handle, to)
        })
        .collect();

    let count = curves.len();
    let [first, second, ..] = curves.as_mut_slice() else {
        return Err(SmoothingError::TooFewCurves { count });
    };
    let look_ahead = (second.chord_direction() + first.chord_direction()) * tangent_length;
    first.set_end_handle(first.end() - look_ahead);

    Ok(CurveSet(curves))
}
