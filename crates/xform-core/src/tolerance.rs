//! Numeric tolerances shared by the math types.
//!
//! All values are single precision. They define *policy*, not accuracy
//! guarantees: e.g. [`NORMALIZED_EPSILON`] decides both what counts as
//! "unit length" and below which squared length a normalisation gives up
//! and returns the canonical fallback.

/// Tolerance on squared length for unit-length checks.
///
/// A vector or quaternion is normalised iff `|length_squared - 1| < NORMALIZED_EPSILON`.
/// Normalisation of anything with `length_squared <= NORMALIZED_EPSILON`
/// returns the fallback value instead of dividing.
pub const NORMALIZED_EPSILON: f32 = 1e-6;

/// Below this `1 - cos(theta)` slerp falls back to normalised lerp.
///
/// `sin(theta)` is too close to zero to divide by when the two rotations
/// are (nearly) identical.
pub const SLERP_PARALLEL_EPSILON: f32 = 1e-6;

/// Below this `sin(theta)` (with `theta` near pi) slerp treats the inputs
/// as opposite and picks an orthogonal path.
///
/// Nearly opposite inputs above it still divide by `sin(theta)`, which is
/// what lets the interpolation end exactly at its second input.
pub const SLERP_OPPOSITE_EPSILON: f32 = 1e-6;

/// Absolute tolerance used for approximate comparisons in tests and
/// round-trip checks (matrix inversion, projection corners, rotations).
pub const DEFAULT_EPSILON: f32 = 1e-3;
