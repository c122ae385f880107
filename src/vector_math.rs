//! Small vector helpers shared by the curve and steering code.
//! Normalisation never produces NaNs and rotations are only built from
//! usable directions.
use glam::{Mat3, Quat, Vec3};

/// Returns the unit vector pointing along `vector`.
///
/// Non-finite input and vectors too short to normalise yield
/// [`Vec3::ZERO`], mirroring how a zero direction is treated throughout the
/// smoothing pipeline.
///
/// # Examples
/// ```
/// use glam::Vec3;
/// use smooth_nav::vector_math::safe_normalize;
///
/// let unit = safe_normalize(Vec3::new(3.0, 0.0, 4.0));
/// assert!((unit - Vec3::new(0.6, 0.0, 0.8)).length() < 1e-6);
/// assert_eq!(safe_normalize(Vec3::ZERO), Vec3::ZERO);
/// ```
#[must_use]
pub fn safe_normalize(vector: Vec3) -> Vec3 {
    if !vector.is_finite() {
        return Vec3::ZERO;
    }
    vector.try_normalize().unwrap_or(Vec3::ZERO)
}

/// Clamps `value` into `[0, 1]`, mapping NaN to zero.
#[must_use]
pub const fn clamp01(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// Builds the rotation whose forward axis (`-Z`, as used by Bevy transforms)
/// points along `forward`, keeping `up` as close to vertical as possible.
///
/// Returns `None` when `forward` cannot be normalised. When `forward` is
/// parallel to `up` an arbitrary perpendicular is used as the right axis.
///
/// # Examples
/// ```
/// use glam::Vec3;
/// use smooth_nav::vector_math::look_rotation;
///
/// let rotation = look_rotation(Vec3::X, Vec3::Y).unwrap();
/// assert!((rotation * Vec3::NEG_Z - Vec3::X).length() < 1e-5);
/// assert!(look_rotation(Vec3::ZERO, Vec3::Y).is_none());
/// ```
#[must_use]
pub fn look_rotation(forward: Vec3, up: Vec3) -> Option<Quat> {
    let direction = safe_normalize(forward);
    if direction == Vec3::ZERO {
        return None;
    }
    let back = -direction;
    let right = up
        .cross(back)
        .try_normalize()
        .unwrap_or_else(|| back.any_orthonormal_vector());
    let true_up = back.cross(right);
    Some(Quat::from_mat3(&Mat3::from_cols(right, true_up, back)).normalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    #[rstest]
    #[case::axis(Vec3::new(0.0, 0.0, 2.0), Vec3::Z)]
    #[case::diagonal(Vec3::new(1.0, 1.0, 0.0), Vec3::new(1.0, 1.0, 0.0) / 2.0_f32.sqrt())]
    #[case::zero(Vec3::ZERO, Vec3::ZERO)]
    #[case::infinite(Vec3::new(f32::INFINITY, 0.0, 0.0), Vec3::ZERO)]
    #[case::nan(Vec3::new(f32::NAN, 1.0, 0.0), Vec3::ZERO)]
    fn normalises_or_falls_back_to_zero(#[case] input: Vec3, #[case] expected: Vec3) {
        let actual = safe_normalize(input);
        assert!(
            (actual - expected).length() < 1e-6,
            "expected {expected:?}, got {actual:?}"
        );
    }

    #[rstest]
    #[case(-0.5, 0.0)]
    #[case(0.25, 0.25)]
    #[case(7.0, 1.0)]
    #[case(f32::NAN, 0.0)]
    fn clamps_into_unit_interval(#[case] input: f32, #[case] expected: f32) {
        assert_relative_eq!(clamp01(input), expected);
    }

    #[test]
    fn clamps_in_const_context() {
        const SATURATED: f32 = clamp01(7.0);
        assert_relative_eq!(SATURATED, 1.0);
    }

    #[rstest]
    #[case::east(Vec3::X)]
    #[case::north(Vec3::Z)]
    #[case::sloped(Vec3::new(1.0, 0.5, -1.0))]
    #[case::straight_up(Vec3::Y)]
    fn look_rotation_faces_forward(#[case] forward: Vec3) {
        let rotation = look_rotation(forward, Vec3::Y).unwrap_or(Quat::IDENTITY);
        let facing = rotation * Vec3::NEG_Z;
        assert!(
            (facing - forward.normalize()).length() < 1e-4,
            "rotation faces {facing:?} instead of {forward:?}"
        );
    }

    #[test]
    fn look_rotation_keeps_up_vertical_for_level_directions() {
        let rotation = look_rotation(Vec3::new(1.0, 0.0, 1.0), Vec3::Y).unwrap_or(Quat::IDENTITY);
        assert!(((rotation * Vec3::Y) - Vec3::Y).length() < 1e-5);
    }
}
