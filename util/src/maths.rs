//! Utility maths functions

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use num_traits::Float;

/// Clip a value into the range `(min, max)`, returning the factor by which the
/// value was scaled.
///
/// If the value is already within the bounds it is untouched and `1` is
/// returned. Otherwise the value is set to the bound it exceeded and the
/// returned scale is `bound / original`, so that other quantities can be scaled
/// by the same factor to keep their ratio with this value.
///
/// # Notes
///
/// - `max` must be positive if the value is above it, and `min` must be
///   negative if the value is below it. This is asserted in debug builds. In
///   release builds a violation can never produce an infinite scale: a zero
///   original value gives a scale of zero.
pub fn clip<T>(value: &mut T, bounds: (T, T)) -> T
where
    T: Float
{
    let (min, max) = bounds;

    if *value > max {
        debug_assert!(max > T::zero(), "Upper clip bound must be positive");
        let scale = safe_ratio(max, *value);
        *value = max;
        return scale;
    }

    if *value < min {
        debug_assert!(min < T::zero(), "Lower clip bound must be negative");
        let scale = safe_ratio(min, *value);
        *value = min;
        return scale;
    }

    T::one()
}

/// Proportionally downscale a pair of values into their bounds.
///
/// `v1` is clipped first and its scale is applied to `v2`, then `v2` is clipped
/// and its scale applied back onto `v1`. The ratio `v1 : v2` is kept whenever
/// any clipping occurs, and a value which didn't need clipping is left exactly
/// as it was if the other one didn't either.
///
/// `v1` is always processed first.
///
/// Returns the overall scale applied to both values, which is `1` if neither
/// value was clipped.
///
/// An infinite value has a scale of zero, which takes the other value to zero
/// rather than to NaN. Callers which need the ratio kept for very large values
/// should `saturate` them first.
pub fn clip_both<T>(v1: &mut T, v1_bounds: (T, T), v2: &mut T, v2_bounds: (T, T)) -> T
where
    T: Float
{
    let v1_scale = clip(v1, v1_bounds);
    *v2 = scale_by(*v2, v1_scale);

    let v2_scale = clip(v2, v2_bounds);
    *v1 = scale_by(*v1, v2_scale);

    v1_scale * v2_scale
}

/// Proportionally downscale a pair of values which share the same bounds.
pub fn clip_both_sym<T>(v1: &mut T, v2: &mut T, bounds: (T, T)) -> T
where
    T: Float
{
    clip_both(v1, bounds, v2, bounds)
}

/// Saturate a value into the finite range of its type.
///
/// Infinities become the largest finite value of the same sign, finite values
/// are unchanged.
pub fn saturate<T>(value: T) -> T
where
    T: Float
{
    if value > T::max_value() {
        T::max_value()
    }
    else if value < T::min_value() {
        T::min_value()
    }
    else {
        value
    }
}

/// `value * scale`, or zero if `scale` is zero even when `value` is infinite.
fn scale_by<T>(value: T, scale: T) -> T
where
    T: Float
{
    if scale == T::zero() {
        T::zero()
    }
    else {
        value * scale
    }
}

/// `num / den`, or zero if `den` is zero.
fn safe_ratio<T>(num: T, den: T) -> T
where
    T: Float
{
    if den == T::zero() {
        T::zero()
    }
    else {
        num / den
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const EPS: f64 = 1e-12;

    #[test]
    fn test_clip() {
        // Within bounds
        let mut v = 0.5f64;
        assert_eq!(clip(&mut v, (-1.0, 1.0)), 1.0);
        assert_eq!(v, 0.5);

        // On the bound is not clipped
        let mut v = 1.0f64;
        assert_eq!(clip(&mut v, (-1.0, 1.0)), 1.0);
        assert_eq!(v, 1.0);

        // Above
        let mut v = 4.0f64;
        assert_eq!(clip(&mut v, (-1.0, 2.0)), 0.5);
        assert_eq!(v, 2.0);

        // Below
        let mut v = -4.0f64;
        assert_eq!(clip(&mut v, (-1.0, 2.0)), 0.25);
        assert_eq!(v, -1.0);

        // Also works on f32
        let mut v = 3.0f32;
        assert_eq!(clip(&mut v, (-1.5, 1.5)), 0.5);
        assert_eq!(v, 1.5);
    }

    #[test]
    fn test_clip_both_no_clipping() {
        let mut a = 0.3f64;
        let mut b = -0.7f64;
        assert_eq!(clip_both(&mut a, (-1.0, 1.0), &mut b, (-1.0, 1.0)), 1.0);
        assert_eq!(a, 0.3);
        assert_eq!(b, -0.7);
    }

    #[test]
    fn test_clip_both_first_binds() {
        // v1 is twice its bound, so v2 is halved too
        let mut a = 2.0f64;
        let mut b = 0.4f64;
        assert_eq!(clip_both(&mut a, (-1.0, 1.0), &mut b, (-10.0, 10.0)), 0.5);
        assert_eq!(a, 1.0);
        assert!((b - 0.2).abs() < EPS);
    }

    #[test]
    fn test_clip_both_second_binds() {
        // v2 is four times its bound, so v1 is quartered too
        let mut a = 0.8f64;
        let mut b = -8.0f64;
        clip_both(&mut a, (-1.0, 1.0), &mut b, (-2.0, 2.0));
        assert!((a - 0.2).abs() < EPS);
        assert_eq!(b, -2.0);
    }

    #[test]
    fn test_clip_both_both_bind() {
        // v1 clip halves v2 to 6, which is still over its bound of 2, so v1 is
        // reduced again by a third.
        let mut a = 2.0f64;
        let mut b = 12.0f64;
        let scale = clip_both(&mut a, (-1.0, 1.0), &mut b, (-2.0, 2.0));
        assert!((scale - 1.0 / 6.0).abs() < EPS);
        assert!((a - 1.0 / 3.0).abs() < EPS);
        assert_eq!(b, 2.0);

        // Ratio is preserved
        assert!((b / a - 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_clip_both_opposite_signs() {
        // v1 clips on its upper bound, which takes v2 beyond its lower bound
        let mut a = 3.0f64;
        let mut b = -3.0f64;
        clip_both(&mut a, (-1.0, 2.0), &mut b, (-1.0, 2.0));
        assert!((a - 1.0).abs() < EPS);
        assert!((b + 1.0).abs() < EPS);
    }

    #[test]
    fn test_clip_both_sym() {
        let mut a = 3.0f64;
        let mut b = 6.0f64;
        clip_both_sym(&mut a, &mut b, (-2.0, 2.0));
        assert!((a - 1.0).abs() < EPS);
        assert_eq!(b, 2.0);
    }

    #[test]
    fn test_clip_both_infinite() {
        let inf = std::f64::INFINITY;

        // The infinite value binds and takes the other to zero
        let mut a = inf;
        let mut b = 0.5f64;
        assert_eq!(clip_both(&mut a, (-1.0, 1.0), &mut b, (-1.0, 1.0)), 0.0);
        assert_eq!(a, 1.0);
        assert_eq!(b, 0.0);

        let mut a = -inf;
        let mut b = inf;
        clip_both(&mut a, (-1.0, 1.0), &mut b, (-1.0, 1.0));
        assert_eq!(a, -1.0);
        assert_eq!(b, 0.0);

        // An infinite second value scales the first to zero
        let mut a = 0.5f64;
        let mut b = -inf;
        clip_both(&mut a, (-1.0, 1.0), &mut b, (-2.0, 2.0));
        assert_eq!(a, 0.0);
        assert_eq!(b, -2.0);
    }

    #[test]
    fn test_clip_both_saturated() {
        // Saturating first keeps the ratio of the two values
        let mut a = saturate(std::f64::INFINITY);
        let mut b = saturate(-std::f64::INFINITY);
        clip_both_sym(&mut a, &mut b, (-1.0, 1.0));
        assert!((a - 1.0).abs() < EPS);
        assert!((b + 1.0).abs() < EPS);
    }

    #[test]
    fn test_saturate() {
        assert_eq!(saturate(std::f64::INFINITY), std::f64::MAX);
        assert_eq!(saturate(-std::f64::INFINITY), std::f64::MIN);
        assert_eq!(saturate(-2.5f64), -2.5);
        assert_eq!(saturate(std::f64::MAX), std::f64::MAX);
        assert_eq!(saturate(std::f32::INFINITY), std::f32::MAX);
    }

    #[test]
    fn test_safe_ratio() {
        assert_eq!(safe_ratio(1.0f64, 4.0), 0.25);
        assert_eq!(safe_ratio(-1.0f64, 0.0), 0.0);
        assert_eq!(safe_ratio(2.0f64, -0.0), 0.0);
        assert_eq!(safe_ratio(1.0f64, std::f64::INFINITY), 0.0);
    }

    #[test]
    #[cfg(not(debug_assertions))]
    fn test_clip_bad_bound_is_finite() {
        let mut v = 0.0f64;
        let scale = clip(&mut v, (-2.0, -1.0));
        assert_eq!(scale, 0.0);
        assert_eq!(v, -1.0);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "Upper clip bound must be positive")]
    fn test_clip_bad_bound_asserts() {
        let mut v = 0.0f64;
        clip(&mut v, (-2.0, -1.0));
    }
}
