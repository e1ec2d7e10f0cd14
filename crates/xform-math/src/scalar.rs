//! Scalar helpers used by the vector, matrix and quaternion types.
//!
//! # Usage
//!
//! ```rust
//! use xform_math::{clamp, lerp};
//!
//! assert_eq!(lerp(0.0, 10.0, 0.5), 5.0);
//! assert_eq!(clamp(1.5, -1.0, 1.0), 1.0);
//! ```

use std::hash::Hasher;

/// Linear interpolation between two values.
///
/// Returns `a` when `t = 0.0`, and `b` when `t = 1.0`.
/// For values outside [0, 1], the result is extrapolated.
///
/// # Formula
///
/// `a + (b - a) * t`
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Clamps a value to the range [min, max].
///
/// # Example
///
/// ```rust
/// use xform_math::clamp;
///
/// assert_eq!(clamp(-0.5, 0.0, 1.0), 0.0);
/// assert_eq!(clamp(0.5, 0.0, 1.0), 0.5);
/// assert_eq!(clamp(1.5, 0.0, 1.0), 1.0);
/// ```
#[inline]
pub fn clamp(value: f32, min: f32, max: f32) -> f32 {
    value.max(min).min(max)
}

/// Returns true if `a` and `b` differ by at most `epsilon`.
#[inline]
pub fn approx_eq(a: f32, b: f32, epsilon: f32) -> bool {
    (a - b).abs() <= epsilon
}

/// Feeds a float into a hasher consistently with `==`.
///
/// `0.0` and `-0.0` compare equal, so both hash as `+0.0`.
#[inline]
pub(crate) fn hash_f32<H: Hasher>(value: f32, state: &mut H) {
    let canonical = if value == 0.0 { 0.0f32 } else { value };
    state.write_u32(canonical.to_bits());
}
