//! 3D vector type for positions, directions and rotation axes.
//!
//! # Usage
//!
//! ```rust
//! use xform_math::Vec3;
//!
//! let v = Vec3::new(3.0, 4.0, 0.0);
//! assert_eq!(v.length(), 5.0);
//! assert!(v.normalize().is_normalized());
//! ```

use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::{Add, AddAssign, Div, DivAssign, Index, IndexMut, Mul, MulAssign, Neg, Sub, SubAssign};

use approx::{AbsDiffEq, RelativeEq, UlpsEq};
use tracing::trace;
use xform_core::tolerance::NORMALIZED_EPSILON;
use xform_core::{Error, Result};

use crate::scalar::hash_f32;
use crate::Vec4;

/// A 3D vector of single-precision floats.
///
/// Plain value type: copied on assignment, most operations return a new
/// vector. [`Vec3::normalize_mut`] is the only in-place mutator beyond the
/// compound assignment operators.
///
/// # Example
///
/// ```rust
/// use xform_math::Vec3;
///
/// let a = Vec3::new(1.0, 0.0, 0.0);
/// let b = Vec3::new(0.0, 1.0, 0.0);
/// assert_eq!(a.cross(b), Vec3::Z);
/// assert_eq!(a[0], 1.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[repr(C)]
pub struct Vec3 {
    /// X component
    pub x: f32,
    /// Y component
    pub y: f32,
    /// Z component
    pub z: f32,
}

impl Vec3 {
    /// Zero vector (0, 0, 0).
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    /// One vector (1, 1, 1).
    pub const ONE: Self = Self::new(1.0, 1.0, 1.0);

    /// Unit X vector (1, 0, 0). Also the normalisation fallback.
    pub const X: Self = Self::new(1.0, 0.0, 0.0);

    /// Unit Y vector (0, 1, 0).
    pub const Y: Self = Self::new(0.0, 1.0, 0.0);

    /// Unit Z vector (0, 0, 1).
    pub const Z: Self = Self::new(0.0, 0.0, 1.0);

    /// Number of components.
    pub const LEN: usize = 3;

    /// Creates a new vector.
    #[inline]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Creates a vector with all components set to the same value.
    ///
    /// # Example
    ///
    /// ```rust
    /// use xform_math::Vec3;
    ///
    /// assert_eq!(Vec3::splat(0.5), Vec3::new(0.5, 0.5, 0.5));
    /// ```
    #[inline]
    pub const fn splat(v: f32) -> Self {
        Self::new(v, v, v)
    }

    /// Creates from an array.
    #[inline]
    pub const fn from_array(a: [f32; 3]) -> Self {
        Self::new(a[0], a[1], a[2])
    }

    /// Creates from a slice, which must hold exactly 3 values.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidLength`] if `values.len() != 3`.
    pub fn from_slice(values: &[f32]) -> Result<Self> {
        match values {
            &[x, y, z] => Ok(Self::new(x, y, z)),
            _ => Err(Error::invalid_length("Vec3", Self::LEN, values.len())),
        }
    }

    /// Converts to an array.
    #[inline]
    pub const fn to_array(self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }

    /// Returns component `index`.
    ///
    /// # Errors
    ///
    /// [`Error::IndexOutOfRange`] if `index >= 3`.
    #[inline]
    pub fn get(self, index: usize) -> Result<f32> {
        self.to_array()
            .get(index)
            .copied()
            .ok_or(Error::index_out_of_range("Vec3", index, Self::LEN))
    }

    /// Sets component `index`.
    ///
    /// # Errors
    ///
    /// [`Error::IndexOutOfRange`] if `index >= 3`.
    pub fn set(&mut self, index: usize, value: f32) -> Result<()> {
        match index {
            0 => self.x = value,
            1 => self.y = value,
            2 => self.z = value,
            _ => return Err(Error::index_out_of_range("Vec3", index, Self::LEN)),
        }
        Ok(())
    }

    /// Extends to a [`Vec4`] with the given `w`.
    #[inline]
    pub const fn extend(self, w: f32) -> Vec4 {
        Vec4::new(self.x, self.y, self.z, w)
    }

    /// Dot product with another vector.
    #[inline]
    pub fn dot(self, other: Self) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Cross product (right-handed).
    #[inline]
    pub fn cross(self, other: Self) -> Self {
        Self::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    /// Length (magnitude) of the vector.
    #[inline]
    pub fn length(self) -> f32 {
        self.dot(self).sqrt()
    }

    /// Squared length (avoids sqrt).
    #[inline]
    pub fn length_squared(self) -> f32 {
        self.dot(self)
    }

    /// Returns true if the squared length is within [`NORMALIZED_EPSILON`] of 1.
    #[inline]
    pub fn is_normalized(self) -> bool {
        (self.length_squared() - 1.0).abs() < NORMALIZED_EPSILON
    }

    /// Returns the vector scaled to unit length.
    ///
    /// Vectors with squared length at or below [`NORMALIZED_EPSILON`] have no
    /// usable direction; they yield [`Vec3::X`] rather than NaN.
    ///
    /// # Example
    ///
    /// ```rust
    /// use xform_math::Vec3;
    ///
    /// assert_eq!(Vec3::new(0.0, 0.0, 2.0).normalize(), Vec3::Z);
    /// assert_eq!(Vec3::ZERO.normalize(), Vec3::X);
    /// ```
    pub fn normalize(self) -> Self {
        let len_sq = self.length_squared();
        if len_sq > NORMALIZED_EPSILON {
            self * (1.0 / len_sq.sqrt())
        } else {
            trace!(x = self.x, y = self.y, z = self.z, "Vec3 normalize fallback");
            Self::X
        }
    }

    /// Normalises in place. See [`Vec3::normalize`].
    #[inline]
    pub fn normalize_mut(&mut self) {
        *self = self.normalize();
    }

    /// Euclidean distance to another point.
    #[inline]
    pub fn distance(self, other: Self) -> f32 {
        (other - self).length()
    }

    /// Squared euclidean distance to another point.
    #[inline]
    pub fn distance_squared(self, other: Self) -> f32 {
        (other - self).length_squared()
    }

    /// Linear interpolation between self and other.
    ///
    /// `t = 0.0` returns self, `t = 1.0` returns other.
    #[inline]
    pub fn lerp(self, other: Self, t: f32) -> Self {
        self + (other - self) * t
    }

    /// Component-wise minimum.
    #[inline]
    pub fn min(self, other: Self) -> Self {
        Self::new(self.x.min(other.x), self.y.min(other.y), self.z.min(other.z))
    }

    /// Component-wise maximum.
    #[inline]
    pub fn max(self, other: Self) -> Self {
        Self::new(self.x.max(other.x), self.y.max(other.y), self.z.max(other.z))
    }

    /// Component-wise absolute value.
    #[inline]
    pub fn abs(self) -> Self {
        Self::new(self.x.abs(), self.y.abs(), self.z.abs())
    }

    /// Returns true if all components are finite (not NaN or infinite).
    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    /// Exact component-wise equality. Same as `==`.
    #[inline]
    pub fn equals_exact(self, other: Self) -> bool {
        self == other
    }

    /// Returns true if every component differs by at most `epsilon`.
    #[inline]
    pub fn equals_within(self, other: Self, epsilon: f32) -> bool {
        self.abs_diff_eq(&other, epsilon)
    }

    /// Converts to glam Vec3.
    #[cfg(feature = "glam")]
    #[inline]
    pub fn to_glam(self) -> glam::Vec3 {
        glam::Vec3::new(self.x, self.y, self.z)
    }

    /// Creates from glam Vec3.
    #[cfg(feature = "glam")]
    #[inline]
    pub fn from_glam(v: glam::Vec3) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

impl fmt::Display for Vec3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

impl Hash for Vec3 {
    fn hash<H: Hasher>(&self, state: &mut H) {
        hash_f32(self.x, state);
        hash_f32(self.y, state);
        hash_f32(self.z, state);
    }
}

// Indexing
impl Index<usize> for Vec3 {
    type Output = f32;

    #[inline]
    fn index(&self, i: usize) -> &f32 {
        match i {
            0 => &self.x,
            1 => &self.y,
            2 => &self.z,
            _ => panic!("Vec3 index out of bounds: {}", i),
        }
    }
}

impl IndexMut<usize> for Vec3 {
    #[inline]
    fn index_mut(&mut self, i: usize) -> &mut f32 {
        match i {
            0 => &mut self.x,
            1 => &mut self.y,
            2 => &mut self.z,
            _ => panic!("Vec3 index out of bounds: {}", i),
        }
    }
}

// Vec3 + Vec3
impl Add for Vec3 {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl AddAssign for Vec3 {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

// Vec3 - Vec3
impl Sub for Vec3 {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl SubAssign for Vec3 {
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

// Vec3 * Vec3 (component-wise)
impl Mul for Vec3 {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: Self) -> Self {
        Self::new(self.x * rhs.x, self.y * rhs.y, self.z * rhs.z)
    }
}

// Vec3 * f32
impl Mul<f32> for Vec3 {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: f32) -> Self {
        Self::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

// f32 * Vec3
impl Mul<Vec3> for f32 {
    type Output = Vec3;

    #[inline]
    fn mul(self, rhs: Vec3) -> Vec3 {
        rhs * self
    }
}

impl MulAssign<f32> for Vec3 {
    #[inline]
    fn mul_assign(&mut self, rhs: f32) {
        *self = *self * rhs;
    }
}

// Vec3 / Vec3 (component-wise)
impl Div for Vec3 {
    type Output = Self;

    #[inline]
    fn div(self, rhs: Self) -> Self {
        Self::new(self.x / rhs.x, self.y / rhs.y, self.z / rhs.z)
    }
}

// Vec3 / f32
impl Div<f32> for Vec3 {
    type Output = Self;

    #[inline]
    fn div(self, rhs: f32) -> Self {
        Self::new(self.x / rhs, self.y / rhs, self.z / rhs)
    }
}

impl DivAssign<f32> for Vec3 {
    #[inline]
    fn div_assign(&mut self, rhs: f32) {
        *self = *self / rhs;
    }
}

impl Neg for Vec3 {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y, -self.z)
    }
}

impl From<[f32; 3]> for Vec3 {
    #[inline]
    fn from(a: [f32; 3]) -> Self {
        Self::from_array(a)
    }
}

impl From<Vec3> for [f32; 3] {
    #[inline]
    fn from(v: Vec3) -> [f32; 3] {
        v.to_array()
    }
}

impl TryFrom<&[f32]> for Vec3 {
    type Error = Error;

    #[inline]
    fn try_from(values: &[f32]) -> Result<Self> {
        Self::from_slice(values)
    }
}

#[cfg(feature = "glam")]
impl From<glam::Vec3> for Vec3 {
    #[inline]
    fn from(v: glam::Vec3) -> Self {
        Self::from_glam(v)
    }
}

#[cfg(feature = "glam")]
impl From<Vec3> for glam::Vec3 {
    #[inline]
    fn from(v: Vec3) -> glam::Vec3 {
        v.to_glam()
    }
}

impl AbsDiffEq for Vec3 {
    type Epsilon = f32;

    fn default_epsilon() -> f32 {
        f32::EPSILON
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f32) -> bool {
        self.x.abs_diff_eq(&other.x, epsilon)
            && self.y.abs_diff_eq(&other.y, epsilon)
            && self.z.abs_diff_eq(&other.z, epsilon)
    }
}

impl RelativeEq for Vec3 {
    fn default_max_relative() -> f32 {
        f32::EPSILON
    }

    fn relative_eq(&self, other: &Self, epsilon: f32, max_relative: f32) -> bool {
        self.x.relative_eq(&other.x, epsilon, max_relative)
            && self.y.relative_eq(&other.y, epsilon, max_relative)
            && self.z.relative_eq(&other.z, epsilon, max_relative)
    }
}

impl UlpsEq for Vec3 {
    fn default_max_ulps() -> u32 {
        4
    }

    fn ulps_eq(&self, other: &Self, epsilon: f32, max_ulps: u32) -> bool {
        self.x.ulps_eq(&other.x, epsilon, max_ulps)
            && self.y.ulps_eq(&other.y, epsilon, max_ulps)
            && self.z.ulps_eq(&other.z, epsilon, max_ulps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_vec3_new() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(v.x, 1.0);
        assert_eq!(v.y, 2.0);
        assert_eq!(v.z, 3.0);
    }

    #[test]
    fn test_vec3_from_slice() {
        assert_eq!(Vec3::from_slice(&[1.0, 2.0, 3.0]).unwrap(), Vec3::new(1.0, 2.0, 3.0));

        let err = Vec3::from_slice(&[1.0, 2.0]).unwrap_err();
        assert_eq!(err, Error::invalid_length("Vec3", 3, 2));
        assert!(Vec3::try_from(&[0.0f32; 4][..]).is_err());
    }

    #[test]
    fn test_vec3_get_set() {
        let mut v = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(v.get(2).unwrap(), 3.0);
        assert!(v.get(3).unwrap_err().is_index_error());

        v.set(1, 7.0).unwrap();
        assert_eq!(v, Vec3::new(1.0, 7.0, 3.0));
        assert!(v.set(9, 0.0).is_err());
    }

    #[test]
    #[should_panic(expected = "Vec3 index out of bounds")]
    fn test_vec3_index_panics() {
        let v = Vec3::ONE;
        let _ = v[3];
    }

    #[test]
    fn test_vec3_dot_cross() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(4.0, 5.0, 6.0);
        assert_eq!(a.dot(b), 32.0);
        assert_eq!(Vec3::X.cross(Vec3::Y), Vec3::Z);
        assert_eq!(Vec3::Y.cross(Vec3::Z), Vec3::X);
        assert_eq!(Vec3::Y.cross(Vec3::X), -Vec3::Z);
    }

    #[test]
    fn test_vec3_normalize() {
        let v = Vec3::new(3.0, 4.0, 12.0).normalize();
        assert!(v.is_normalized());
        assert_abs_diff_eq!(v, Vec3::new(3.0 / 13.0, 4.0 / 13.0, 12.0 / 13.0), epsilon = 1e-6);

        let mut w = Vec3::new(0.0, -5.0, 0.0);
        w.normalize_mut();
        assert_eq!(w, -Vec3::Y);
    }

    #[test]
    fn test_vec3_normalize_zero_fallback() {
        assert_eq!(Vec3::ZERO.normalize(), Vec3::X);
        // Below the squared-length threshold counts as zero
        assert_eq!(Vec3::new(0.0, 1e-4, 0.0).normalize(), Vec3::X);
    }

    #[test]
    fn test_vec3_distance() {
        let a = Vec3::new(1.0, 1.0, 1.0);
        let b = Vec3::new(4.0, 5.0, 1.0);
        assert_eq!(a.distance(b), 5.0);
        assert_eq!(a.distance_squared(b), 25.0);
    }

    #[test]
    fn test_vec3_lerp() {
        let a = Vec3::ZERO;
        let b = Vec3::new(2.0, 4.0, 6.0);
        assert_eq!(a.lerp(b, 0.5), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
    }

    #[test]
    fn test_vec3_ops() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(4.0, 5.0, 6.0);

        assert_eq!(a + b, Vec3::new(5.0, 7.0, 9.0));
        assert_eq!(b - a, Vec3::new(3.0, 3.0, 3.0));
        assert_eq!(a * 2.0, Vec3::new(2.0, 4.0, 6.0));
        assert_eq!(2.0 * a, a * 2.0);
        assert_eq!(a * b, Vec3::new(4.0, 10.0, 18.0));
        assert_eq!(b / 2.0, Vec3::new(2.0, 2.5, 3.0));

        let mut c = a;
        c += b;
        c -= a;
        c *= 2.0;
        c /= 4.0;
        assert_eq!(c, Vec3::new(2.0, 2.5, 3.0));
    }

    #[test]
    fn test_vec3_equality() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(1.0, 2.0005, 3.0);
        assert!(a.equals_exact(a));
        assert!(!a.equals_exact(b));
        assert!(a.equals_within(b, 1e-3));
        assert!(!a.equals_within(b, 1e-4));
    }

    #[test]
    fn test_vec3_display() {
        assert_eq!(Vec3::new(1.0, -2.5, 0.0).to_string(), "(1, -2.5, 0)");
    }
}
