//! Cubic Bézier curve with exact-endpoint sampling.

use std::iter::FusedIterator;

use glam::Vec3;

use crate::vector_math::safe_normalize;

/// Cubic Bézier curve described by four control points.
///
/// `points[0]` and `points[3]` are the endpoints; the inner two are the
/// tangent handles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BezierCurve {
    /// Control points `P0..P3`.
    pub points: [Vec3; 4],
}

impl BezierCurve {
    /// Creates a curve from its four control points.
    #[must_use]
    pub const fn new(start: Vec3, start_handle: Vec3, end_handle: Vec3, end: Vec3) -> Self {
        Self {
            points: [start, start_handle, end_handle, end],
        }
    }

    /// `P0`.
    #[must_use]
    pub const fn start(&self) -> Vec3 {
        self.points[0]
    }

    /// `P1`.
    #[must_use]
    pub const fn start_handle(&self) -> Vec3 {
        self.points[1]
    }

    /// `P2`.
    #[must_use]
    pub const fn end_handle(&self) -> Vec3 {
        self.points[2]
    }

    /// `P3`.
    #[must_use]
    pub const fn end(&self) -> Vec3 {
        self.points[3]
    }

    /// Replaces the end tangent handle.
    pub const fn set_end_handle(&mut self, handle: Vec3) {
        self.points[2] = handle;
    }

    /// Unit direction from start to end, or zero for a degenerate chord.
    #[must_use]
    pub fn chord_direction(&self) -> Vec3 {
        safe_normalize(self.end() - self.start())
    }

    /// Evaluates the curve at parameter `t`.
    ///
    /// `t = 0` and `t = 1` return the endpoints exactly; other values use the
    /// Bernstein blend.
    #[must_use]
    pub fn evaluate(&self, t: f32) -> Vec3 {
        if t <= 0.0 {
            return self.start();
        }
        if t >= 1.0 {
            return self.end();
        }
        let u = 1.0 - t;
        let [p0, p1, p2, p3] = self.points;
        p0 * (u * u * u) + p1 * (3.0 * u * u * t) + p2 * (3.0 * u * t * t) + p3 * (t * t * t)
    }

    /// Lazily samples `n` evenly spaced points along the curve.
    ///
    /// # Examples
    /// ```
    /// use glam::Vec3;
    /// use smooth_nav::smoothing::BezierCurve;
    ///
    /// let curve = BezierCurve::new(Vec3::ZERO, Vec3::X, Vec3::new(2.0, 0.0, 1.0), Vec3::new(3.0, 0.0, 1.0));
    /// let points: Vec<Vec3> = curve.sample(5).collect();
    /// assert_eq!(points.len(), 5);
    /// assert_eq!(points[0], curve.start());
    /// assert_eq!(points[4], curve.end());
    /// ```
    #[must_use]
    pub fn sample(&self, n: usize) -> CurveSamples {
        CurveSamples {
            curve: *self,
            count: n,
            next: 0,
        }
    }
}

/// Iterator over evenly spaced samples of a [`BezierCurve`].
///
/// A clone resumes from the same position, so clone before consuming to walk
/// the samples twice.
#[derive(Debug, Clone)]
pub struct CurveSamples {
    curve: BezierCurve,
    count: usize,
    next: usize,
}

impl Iterator for CurveSamples {
    type Item = Vec3;

    #[expect(
        clippy::cast_precision_loss,
        reason = "Sample counts are small configuration values."
    )]
    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.count {
            return None;
        }
        let index = self.next;
        let last = self.count - 1;
        self.next += 1;
        let point = if index == 0 {
            self.curve.start()
        } else if index == last {
            self.curve.end()
        } else {
            self.curve.evaluate(index as f32 / last as f32)
        };
        Some(point)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.count.saturating_sub(self.next);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for CurveSamples {}

impl FusedIterator for CurveSamples {}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::{fixture, rstest};

    #[fixture]
    fn arc() -> BezierCurve {
        BezierCurve::new(
            Vec3::new(0.1, 0.0, 0.3),
            Vec3::new(1.7, 0.2, 0.0),
            Vec3::new(2.9, 0.0, 1.3),
            Vec3::new(3.3, 0.1, 4.7),
        )
    }

    #[rstest]
    #[case(2)]
    #[case(3)]
    #[case(10)]
    #[case(97)]
    fn samples_hit_endpoints_exactly(arc: BezierCurve, #[case] n: usize) {
        let points: Vec<Vec3> = arc.sample(n).collect();
        assert_eq!(points.len(), n);
        assert_eq!(points.first(), Some(&arc.start()));
        assert_eq!(points.last(), Some(&arc.end()));
    }

    #[rstest]
    fn midpoint_matches_bernstein_blend(arc: BezierCurve) {
        let [p0, p1, p2, p3] = arc.points;
        let expected = (p0 + p1 * 3.0 + p2 * 3.0 + p3) / 8.0;
        let mid = arc.evaluate(0.5);
        assert_relative_eq!(mid.x, expected.x, epsilon = 1e-5);
        assert_relative_eq!(mid.y, expected.y, epsilon = 1e-5);
        assert_relative_eq!(mid.z, expected.z, epsilon = 1e-5);
    }

    #[rstest]
    fn sampling_is_restartable(arc: BezierCurve) {
        let samples = arc.sample(6);
        let first: Vec<Vec3> = samples.clone().collect();
        let second: Vec<Vec3> = samples.collect();
        assert_eq!(first, second);
    }

    #[rstest]
    fn reports_exact_length_while_consuming(arc: BezierCurve) {
        let mut samples = arc.sample(4);
        assert_eq!(samples.len(), 4);
        samples.next();
        assert_eq!(samples.len(), 3);
        samples.by_ref().for_each(drop);
        assert_eq!(samples.next(), None);
    }

    #[rstest]
    #[case(0, 0)]
    #[case(1, 1)]
    fn tiny_sample_counts(arc: BezierCurve, #[case] n: usize, #[case] expected: usize) {
        let points: Vec<Vec3> = arc.sample(n).collect();
        assert_eq!(points.len(), expected);
        if let Some(first) = points.first() {
            assert_eq!(*first, arc.start());
        }
    }

    #[test]
    fn end_handle_can_be_set_in_const_context() {
        const BENT: BezierCurve = {
            let mut curve = BezierCurve::new(
                Vec3::ZERO,
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(2.0, 0.0, 0.0),
                Vec3::new(3.0, 0.0, 0.0),
            );
            curve.set_end_handle(Vec3::new(3.0, 0.0, -1.0));
            curve
        };
        assert_eq!(BENT.end_handle(), Vec3::new(3.0, 0.0, -1.0));
        let points: Vec<Vec3> = BENT.sample(5).collect();
        assert_eq!(points.first(), Some(&Vec3::ZERO));
        assert_eq!(points.last(), Some(&Vec3::new(3.0, 0.0, 0.0)));
        assert!(points.get(1..4).unwrap_or_default().iter().all(|p| p.z < 0.0));
    }

    #[test]
    fn chord_direction_of_degenerate_curve_is_zero() {
        let curve = BezierCurve::new(Vec3::ONE, Vec3::ONE, Vec3::ONE, Vec3::ONE);
        assert_eq!(curve.chord_direction(), Vec3::ZERO);
    }
}
