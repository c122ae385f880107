//! Flattens a curve set into one ordered point sequence.

use glam::Vec3;

use super::CurveSet;

/// Samples of every curve, concatenated in travel order.
///
/// Joint points appear twice: once as the end of a curve and once as the
/// start of the next.
#[derive(Debug, Clone, PartialEq)]
pub struct SampledPath {
    points: Vec<Vec3>,
    samples_per_curve: usize,
}

impl SampledPath {
    /// All samples in order.
    #[must_use]
    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    /// Total number of samples.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether nothing was sampled.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Samples grouped by the curve that produced them.
    pub fn per_curve(&self) -> std::slice::Chunks<'_, Vec3> {
        self.points.chunks(self.samples_per_curve.max(1))
    }
}

/// Samples each curve at `samples_per_curve` evenly spaced parameters.
#[must_use]
pub fn sample_curves(curves: &CurveSet, samples_per_curve: usize) -> SampledPath {
    let points = curves
        .iter()
        .flat_map(|curve| curve.sample(samples_per_curve))
        .collect();
    SampledPath {
        points,
        samples_per_curve,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::smoothing::build_curves;
    use crate::surface::CornerSequence;
    use rstest::rstest;

    #[rstest]
    #[case(2)]
    #[case(10)]
    fn produces_samples_per_curve_for_every_curve(#[case] n: usize) {
        let corners = CornerSequence::new(vec![
            Vec3::ZERO,
            Vec3::X * 5.0,
            Vec3::new(5.0, 0.0, 5.0),
            Vec3::new(0.0, 0.0, 5.0),
        ])
        .unwrap_or_else(|e| panic!("{e}"));
        let curves = build_curves(&corners, 0.25).unwrap_or_else(|e| panic!("{e}"));
        let sampled = sample_curves(&curves, n);

        assert_eq!(sampled.len(), curves.len() * n);
        for (chunk, curve) in sampled.per_curve().zip(&curves) {
            assert_eq!(chunk.len(), n);
            assert_eq!(chunk.first(), Some(&curve.start()));
            assert_eq!(chunk.last(), Some(&curve.end()));
        }
    }
}
