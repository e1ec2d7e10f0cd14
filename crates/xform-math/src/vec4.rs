//! 4D vector type for homogeneous coordinates.
//!
//! [`Vec4`] is what [`crate::Mat4`] transforms: points carry `w = 1`,
//! directions `w = 0`, and projection output carries the clip-space `w`.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::{Add, AddAssign, Div, DivAssign, Index, IndexMut, Mul, MulAssign, Neg, Sub, SubAssign};

use approx::{AbsDiffEq, RelativeEq, UlpsEq};
use tracing::trace;
use xform_core::tolerance::NORMALIZED_EPSILON;
use xform_core::{Error, Result};

use crate::scalar::hash_f32;
use crate::Vec3;

/// A 4D vector of single-precision floats.
///
/// # Example
///
/// ```rust
/// use xform_math::{Vec3, Vec4};
///
/// let p = Vec3::new(1.0, 2.0, 3.0).extend(1.0);
/// assert_eq!(p, Vec4::new(1.0, 2.0, 3.0, 1.0));
/// assert_eq!(p.truncate(), Vec3::new(1.0, 2.0, 3.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[repr(C)]
pub struct Vec4 {
    /// X component
    pub x: f32,
    /// Y component
    pub y: f32,
    /// Z component
    pub z: f32,
    /// W component
    pub w: f32,
}

impl Vec4 {
    /// Zero vector (0, 0, 0, 0).
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    /// One vector (1, 1, 1, 1).
    pub const ONE: Self = Self::new(1.0, 1.0, 1.0, 1.0);

    /// Unit X vector (1, 0, 0, 0). Also the normalisation fallback.
    pub const X: Self = Self::new(1.0, 0.0, 0.0, 0.0);

    /// Unit Y vector (0, 1, 0, 0).
    pub const Y: Self = Self::new(0.0, 1.0, 0.0, 0.0);

    /// Unit Z vector (0, 0, 1, 0).
    pub const Z: Self = Self::new(0.0, 0.0, 1.0, 0.0);

    /// Unit W vector (0, 0, 0, 1).
    pub const W: Self = Self::new(0.0, 0.0, 0.0, 1.0);

    /// Number of components.
    pub const LEN: usize = 4;

    /// Creates a new vector.
    #[inline]
    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    /// Creates a vector with all components set to the same value.
    #[inline]
    pub const fn splat(v: f32) -> Self {
        Self::new(v, v, v, v)
    }

    /// Creates from an array.
    #[inline]
    pub const fn from_array(a: [f32; 4]) -> Self {
        Self::new(a[0], a[1], a[2], a[3])
    }

    /// Creates from a slice, which must hold exactly 4 values.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidLength`] if `values.len() != 4`.
    pub fn from_slice(values: &[f32]) -> Result<Self> {
        match values {
            &[x, y, z, w] => Ok(Self::new(x, y, z, w)),
            _ => Err(Error::invalid_length("Vec4", Self::LEN, values.len())),
        }
    }

    /// Converts to an array.
    #[inline]
    pub const fn to_array(self) -> [f32; 4] {
        [self.x, self.y, self.z, self.w]
    }

    /// Returns component `index`.
    ///
    /// # Errors
    ///
    /// [`Error::IndexOutOfRange`] if `index >= 4`.
    #[inline]
    pub fn get(self, index: usize) -> Result<f32> {
        self.to_array()
            .get(index)
            .copied()
            .ok_or(Error::index_out_of_range("Vec4", index, Self::LEN))
    }

    /// Sets component `index`.
    ///
    /// # Errors
    ///
    /// [`Error::IndexOutOfRange`] if `index >= 4`.
    pub fn set(&mut self, index: usize, value: f32) -> Result<()> {
        match index {
            0 => self.x = value,
            1 => self.y = value,
            2 => self.z = value,
            3 => self.w = value,
            _ => return Err(Error::index_out_of_range("Vec4", index, Self::LEN)),
        }
        Ok(())
    }

    /// Drops `w`.
    #[inline]
    pub const fn truncate(self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }

    /// Alias for [`Vec4::truncate`].
    #[inline]
    pub const fn xyz(self) -> Vec3 {
        self.truncate()
    }

    /// Homogeneous divide: `(x/w, y/w, z/w)`.
    ///
    /// No guard against `w == 0`; directions project to infinity.
    #[inline]
    pub fn project(self) -> Vec3 {
        self.truncate() / self.w
    }

    /// Dot product with another vector.
    #[inline]
    pub fn dot(self, other: Self) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z + self.w * other.w
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

    /// Returns the vector scaled to unit length, or [`Vec4::X`] when the
    /// squared length is at or below [`NORMALIZED_EPSILON`].
    pub fn normalize(self) -> Self {
        let len_sq = self.length_squared();
        if len_sq > NORMALIZED_EPSILON {
            self * (1.0 / len_sq.sqrt())
        } else {
            trace!(x = self.x, y = self.y, z = self.z, w = self.w, "Vec4 normalize fallback");
            Self::X
        }
    }

    /// Normalises in place. See [`Vec4::normalize`].
    #[inline]
    pub fn normalize_mut(&mut self) {
        *self = self.normalize();
    }

    /// Euclidean distance to another vector.
    #[inline]
    pub fn distance(self, other: Self) -> f32 {
        (other - self).length()
    }

    /// Squared euclidean distance to another vector.
    #[inline]
    pub fn distance_squared(self, other: Self) -> f32 {
        (other - self).length_squared()
    }

    /// Linear interpolation between self and other.
    #[inline]
    pub fn lerp(self, other: Self, t: f32) -> Self {
        self + (other - self) * t
    }

    /// Component-wise minimum.
    #[inline]
    pub fn min(self, other: Self) -> Self {
        Self::new(
            self.x.min(other.x),
            self.y.min(other.y),
            self.z.min(other.z),
            self.w.min(other.w),
        )
    }

    /// Component-wise maximum.
    #[inline]
    pub fn max(self, other: Self) -> Self {
        Self::new(
            self.x.max(other.x),
            self.y.max(other.y),
            self.z.max(other.z),
            self.w.max(other.w),
        )
    }

    /// Component-wise absolute value.
    #[inline]
    pub fn abs(self) -> Self {
        Self::new(self.x.abs(), self.y.abs(), self.z.abs(), self.w.abs())
    }

    /// Returns true if all components are finite (not NaN or infinite).
    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite() && self.w.is_finite()
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

    /// Converts to glam Vec4.
    #[cfg(feature = "glam")]
    #[inline]
    pub fn to_glam(self) -> glam::Vec4 {
        glam::Vec4::new(self.x, self.y, self.z, self.w)
    }

    /// Creates from glam Vec4.
    #[cfg(feature = "glam")]
    #[inline]
    pub fn from_glam(v: glam::Vec4) -> Self {
        Self::new(v.x, v.y, v.z, v.w)
    }
}

impl fmt::Display for Vec4 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {}, {})", self.x, self.y, self.z, self.w)
    }
}

impl Hash for Vec4 {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for c in self.to_array() {
            hash_f32(c, state);
        }
    }
}

impl Index<usize> for Vec4 {
    type Output = f32;

    #[inline]
    fn index(&self, i: usize) -> &f32 {
        match i {
            0 => &self.x,
            1 => &self.y,
            2 => &self.z,
            3 => &self.w,
            _ => panic!("Vec4 index out of bounds: {}", i),
        }
    }
}

impl IndexMut<usize> for Vec4 {
    #[inline]
    fn index_mut(&mut self, i: usize) -> &mut f32 {
        match i {
            0 => &mut self.x,
            1 => &mut self.y,
            2 => &mut self.z,
            3 => &mut self.w,
            _ => panic!("Vec4 index out of bounds: {}", i),
        }
    }
}

impl Add for Vec4 {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z, self.w + rhs.w)
    }
}

impl AddAssign for Vec4 {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for Vec4 {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z, self.w - rhs.w)
    }
}

impl SubAssign for Vec4 {
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

// Component-wise
impl Mul for Vec4 {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: Self) -> Self {
        Self::new(self.x * rhs.x, self.y * rhs.y, self.z * rhs.z, self.w * rhs.w)
    }
}

impl Mul<f32> for Vec4 {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: f32) -> Self {
        Self::new(self.x * rhs, self.y * rhs, self.z * rhs, self.w * rhs)
    }
}

impl Mul<Vec4> for f32 {
    type Output = Vec4;

    #[inline]
    fn mul(self, rhs: Vec4) -> Vec4 {
        rhs * self
    }
}

impl MulAssign<f32> for Vec4 {
    #[inline]
    fn mul_assign(&mut self, rhs: f32) {
        *self = *self * rhs;
    }
}

impl Div for Vec4 {
    type Output = Self;

    #[inline]
    fn div(self, rhs: Self) -> Self {
        Self::new(self.x / rhs.x, self.y / rhs.y, self.z / rhs.z, self.w / rhs.w)
    }
}

impl Div<f32> for Vec4 {
    type Output = Self;

    #[inline]
    fn div(self, rhs: f32) -> Self {
        Self::new(self.x / rhs, self.y / rhs, self.z / rhs, self.w / rhs)
    }
}

impl DivAssign<f32> for Vec4 {
    #[inline]
    fn div_assign(&mut self, rhs: f32) {
        *self = *self / rhs;
    }
}

impl Neg for Vec4 {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y, -self.z, -self.w)
    }
}

impl From<[f32; 4]> for Vec4 {
    #[inline]
    fn from(a: [f32; 4]) -> Self {
        Self::from_array(a)
    }
}

impl From<Vec4> for [f32; 4] {
    #[inline]
    fn from(v: Vec4) -> [f32; 4] {
        v.to_array()
    }
}

impl TryFrom<&[f32]> for Vec4 {
    type Error = Error;

    #[inline]
    fn try_from(values: &[f32]) -> Result<Self> {
        Self::from_slice(values)
    }
}

#[cfg(feature = "glam")]
impl From<glam::Vec4> for Vec4 {
    #[inline]
    fn from(v: glam::Vec4) -> Self {
        Self::from_glam(v)
    }
}

#[cfg(feature = "glam")]
impl From<Vec4> for glam::Vec4 {
    #[inline]
    fn from(v: Vec4) -> glam::Vec4 {
        v.to_glam()
    }
}

impl AbsDiffEq for Vec4 {
    type Epsilon = f32;

    fn default_epsilon() -> f32 {
        f32::EPSILON
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f32) -> bool {
        self.to_array()
            .iter()
            .zip(other.to_array().iter())
            .all(|(a, b)| a.abs_diff_eq(b, epsilon))
    }
}

impl RelativeEq for Vec4 {
    fn default_max_relative() -> f32 {
        f32::EPSILON
    }

    fn relative_eq(&self, other: &Self, epsilon: f32, max_relative: f32) -> bool {
        self.to_array()
            .iter()
            .zip(other.to_array().iter())
            .all(|(a, b)| a.relative_eq(b, epsilon, max_relative))
    }
}

impl UlpsEq for Vec4 {
    fn default_max_ulps() -> u32 {
        4
    }

    fn ulps_eq(&self, other: &Self, epsilon: f32, max_ulps: u32) -> bool {
        self.to_array()
            .iter()
            .zip(other.to_array().iter())
            .all(|(a, b)| a.ulps_eq(b, epsilon, max_ulps))
    }
}
