//! Quaternion type for rotations.
//!
//! [`Quat`] stores `(x, y, z)` as the vector (imaginary) part and `w` as the
//! scalar part. Only unit quaternions represent rotations. Component-wise
//! algebra (`+`, `-`, scaling) is available but does not preserve unit
//! length; rotation composition is the Hamilton product (`*`).
//!
//! # Convention
//!
//! `q.transform(v)` computes the vector part of `q * v * q^-1`. With that,
//! `(a * b).transform(v) == a.transform(b.transform(v))`: the right-hand
//! rotation is applied first, exactly like [`Mat4`] products, and
//! [`Quat::to_mat4`] maps one composition onto the other.
//!
//! # Usage
//!
//! ```rust
//! use xform_math::{Quat, Vec3};
//! use std::f32::consts::FRAC_PI_2;
//!
//! let q = Quat::rotate_axis(Vec3::Z, FRAC_PI_2);
//! let v = q.transform(Vec3::X);
//! assert!(v.equals_within(Vec3::Y, 1e-6));
//! ```

use std::f32::consts::PI;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::{Add, Index, IndexMut, Mul, MulAssign, Neg, Sub};

use approx::{AbsDiffEq, RelativeEq, UlpsEq};
use tracing::trace;
use xform_core::tolerance::{NORMALIZED_EPSILON, SLERP_OPPOSITE_EPSILON, SLERP_PARALLEL_EPSILON};
use xform_core::{Error, Result};

use crate::scalar::{clamp, hash_f32};
use crate::{Mat4, Vec3};

/// A quaternion `(x, y, z, w)` of single-precision floats.
#[derive(Debug, Clone, Copy, PartialEq)]
#[repr(C)]
pub struct Quat {
    /// X component of the vector part
    pub x: f32,
    /// Y component of the vector part
    pub y: f32,
    /// Z component of the vector part
    pub z: f32,
    /// Scalar part
    pub w: f32,
}

impl Quat {
    /// Identity rotation (0, 0, 0, 1).
    pub const IDENTITY: Self = Self::new(0.0, 0.0, 0.0, 1.0);

    /// All components zero. Not a rotation.
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    /// What [`Quat::normalize`] returns for a (near) zero-length input:
    /// `(1, 0, 0, 0)`.
    ///
    /// Note that this is a half turn around X, not the identity.
    pub const NORMALIZE_FALLBACK: Self = Self::new(1.0, 0.0, 0.0, 0.0);

    /// Number of components.
    pub const LEN: usize = 4;

    /// Creates a quaternion from its components.
    #[inline]
    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    /// Creates a quaternion with all components set to `v`.
    #[inline]
    pub const fn splat(v: f32) -> Self {
        Self::new(v, v, v, v)
    }

    /// Creates from a vector part and a scalar part.
    #[inline]
    pub const fn from_vec_w(v: Vec3, w: f32) -> Self {
        Self::new(v.x, v.y, v.z, w)
    }

    /// Creates from an `[x, y, z, w]` array.
    #[inline]
    pub const fn from_array(a: [f32; 4]) -> Self {
        Self::new(a[0], a[1], a[2], a[3])
    }

    /// Creates from an `[x, y, z, w]` slice of exactly 4 values.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidLength`] if `values.len() != 4`.
    pub fn from_slice(values: &[f32]) -> Result<Self> {
        match values {
            &[x, y, z, w] => Ok(Self::new(x, y, z, w)),
            _ => Err(Error::invalid_length("Quat", Self::LEN, values.len())),
        }
    }

    /// Converts to an `[x, y, z, w]` array.
    #[inline]
    pub const fn to_array(self) -> [f32; 4] {
        [self.x, self.y, self.z, self.w]
    }

    /// Returns component `index` in `x, y, z, w` order.
    ///
    /// # Errors
    ///
    /// [`Error::IndexOutOfRange`] if `index >= 4`.
    #[inline]
    pub fn get(self, index: usize) -> Result<f32> {
        self.to_array()
            .get(index)
            .copied()
            .ok_or(Error::index_out_of_range("Quat", index, Self::LEN))
    }

    /// Vector (imaginary) part.
    #[inline]
    pub const fn vector(self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }

    /// 4D dot product.
    #[inline]
    pub fn dot(self, other: Self) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z + self.w * other.w
    }

    /// Length (norm).
    #[inline]
    pub fn length(self) -> f32 {
        self.dot(self).sqrt()
    }

    /// Squared length.
    #[inline]
    pub fn length_squared(self) -> f32 {
        self.dot(self)
    }

    /// Returns true if the squared length is within [`NORMALIZED_EPSILON`] of 1.
    #[inline]
    pub fn is_normalized(self) -> bool {
        (self.length_squared() - 1.0).abs() < NORMALIZED_EPSILON
    }

    /// Returns the quaternion scaled to unit length.
    ///
    /// If the squared length is at or below [`NORMALIZED_EPSILON`] the
    /// result is [`Quat::NORMALIZE_FALLBACK`] instead.
    pub fn normalize(self) -> Self {
        let len_sq = self.length_squared();
        if len_sq > NORMALIZED_EPSILON {
            self * (1.0 / len_sq.sqrt())
        } else {
            trace!(x = self.x, y = self.y, z = self.z, w = self.w, "Quat normalize fallback");
            Self::NORMALIZE_FALLBACK
        }
    }

    /// Normalises in place. See [`Quat::normalize`].
    #[inline]
    pub fn normalize_mut(&mut self) {
        *self = self.normalize();
    }

    /// Negates the vector part.
    #[inline]
    pub fn conjugate(self) -> Self {
        Self::new(-self.x, -self.y, -self.z, self.w)
    }

    /// Conjugates in place.
    #[inline]
    pub fn conjugate_mut(&mut self) {
        *self = self.conjugate();
    }

    /// General inverse: conjugate divided by the squared length.
    ///
    /// Valid for non-unit quaternions; equals [`Quat::conjugate`] for unit
    /// ones. The zero quaternion yields non-finite components.
    #[inline]
    pub fn inverse(self) -> Self {
        self.conjugate() * (1.0 / self.length_squared())
    }

    /// Inverts in place.
    #[inline]
    pub fn invert_mut(&mut self) {
        *self = self.inverse();
    }

    /// Rotation of `angle` radians around `axis`.
    ///
    /// `axis` must be unit length; it is not normalised here.
    ///
    /// # Panics
    ///
    /// In debug builds, if `axis` is not unit length (see
    /// [`Vec3::is_normalized`]). Release builds do not check.
    ///
    /// # Example
    ///
    /// ```rust
    /// use xform_math::{Quat, Vec3};
    ///
    /// let q = Quat::rotate_axis(Vec3::Y, 0.5);
    /// assert!(q.is_normalized());
    /// ```
    pub fn rotate_axis(axis: Vec3, angle: f32) -> Self {
        debug_assert!(axis.is_normalized(), "rotate_axis expects a unit axis, got {axis}");

        let (s, c) = (0.5 * angle).sin_cos();
        Self::from_vec_w(axis * s, c)
    }

    /// Rotation of `angle` radians around the X axis.
    #[inline]
    pub fn rotate_x(angle: f32) -> Self {
        let (s, c) = (0.5 * angle).sin_cos();
        Self::new(s, 0.0, 0.0, c)
    }

    /// Rotation of `angle` radians around the Y axis.
    #[inline]
    pub fn rotate_y(angle: f32) -> Self {
        let (s, c) = (0.5 * angle).sin_cos();
        Self::new(0.0, s, 0.0, c)
    }

    /// Rotation of `angle` radians around the Z axis.
    #[inline]
    pub fn rotate_z(angle: f32) -> Self {
        let (s, c) = (0.5 * angle).sin_cos();
        Self::new(0.0, 0.0, s, c)
    }

    /// Euler rotation: `x` (yaw) is applied first, then `y` (pitch), then
    /// `z` (roll).
    ///
    /// Equivalent to `rotate_z(z) * rotate_y(y) * rotate_x(x)` and to
    /// [`Mat4::rotate_euler`].
    pub fn rotate_euler(x: f32, y: f32, z: f32) -> Self {
        let (sx, cx) = (0.5 * x).sin_cos();
        let (sy, cy) = (0.5 * y).sin_cos();
        let (sz, cz) = (0.5 * z).sin_cos();

        Self::new(
            sx * cy * cz - cx * sy * sz,
            cx * sy * cz + sx * cy * sz,
            cx * cy * sz - sx * sy * cz,
            cx * cy * cz + sx * sy * sz,
        )
    }

    /// Rotates a vector: the vector part of `self * v * self^-1`.
    ///
    /// Expanded form `v + 2w(u x v) + 2u x (u x v)` with `u` the vector
    /// part; `self` must be unit length.
    #[inline]
    pub fn transform(self, v: Vec3) -> Vec3 {
        let u = self.vector();
        let t = u.cross(v) * 2.0;
        v + t * self.w + u.cross(t)
    }

    /// Recovers `(axis, angle)` from a unit quaternion.
    ///
    /// `angle = 2 acos(w)` in `[0, 2pi]`, evaluated as `2 atan2(|xyz|, w)`
    /// so small angles keep their precision. The axis is `xyz / |xyz|`,
    /// which for a unit quaternion is `xyz / sin(angle / 2)`. When
    /// `|xyz|` is below [`NORMALIZED_EPSILON`] (no rotation, or a full
    /// turn) the axis is undefined and [`Vec3::X`] is returned.
    ///
    /// The returned pair can be fed straight back into
    /// [`Quat::rotate_axis`].
    pub fn axis_angle(self) -> (Vec3, f32) {
        let v = self.vector();
        let s = v.length();
        let angle = 2.0 * s.atan2(self.w);
        if s < NORMALIZED_EPSILON {
            (Vec3::X, angle)
        } else {
            (v / s, angle)
        }
    }

    /// Rotation angle in radians, `2 acos(w)` (see [`Quat::axis_angle`]).
    #[inline]
    pub fn angle(self) -> f32 {
        2.0 * self.vector().length().atan2(self.w)
    }

    /// Rotation matrix equivalent to this unit quaternion.
    pub fn to_mat4(self) -> Mat4 {
        let Self { x, y, z, w } = self;
        let (x2, y2, z2) = (x + x, y + y, z + z);
        let (xx, yy, zz) = (x * x2, y * y2, z * z2);
        let (xy, xz, yz) = (x * y2, x * z2, y * z2);
        let (wx, wy, wz) = (w * x2, w * y2, w * z2);

        Mat4::new(
            1.0 - (yy + zz), xy - wz, xz + wy, 0.0,
            xy + wz, 1.0 - (xx + zz), yz - wx, 0.0,
            xz - wy, yz + wx, 1.0 - (xx + yy), 0.0,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    /// Extracts the rotation from the upper 3x3 of a rotation matrix.
    ///
    /// Branches on the largest of trace and diagonal so the square root
    /// argument stays well away from zero. The sign of the result is
    /// arbitrary (`q` and `-q` are the same rotation).
    pub fn from_mat4(m: &Mat4) -> Self {
        let m = &m.m;
        let trace = m[0][0] + m[1][1] + m[2][2];

        if trace > 0.0 {
            let s = (1.0 + trace).sqrt() * 2.0; // 4w
            Self::new(
                (m[2][1] - m[1][2]) / s,
                (m[0][2] - m[2][0]) / s,
                (m[1][0] - m[0][1]) / s,
                0.25 * s,
            )
        } else if m[0][0] > m[1][1] && m[0][0] > m[2][2] {
            let s = (1.0 + m[0][0] - m[1][1] - m[2][2]).sqrt() * 2.0; // 4x
            Self::new(
                0.25 * s,
                (m[0][1] + m[1][0]) / s,
                (m[0][2] + m[2][0]) / s,
                (m[2][1] - m[1][2]) / s,
            )
        } else if m[1][1] > m[2][2] {
            let s = (1.0 + m[1][1] - m[0][0] - m[2][2]).sqrt() * 2.0; // 4y
            Self::new(
                (m[0][1] + m[1][0]) / s,
                0.25 * s,
                (m[1][2] + m[2][1]) / s,
                (m[0][2] - m[2][0]) / s,
            )
        } else {
            let s = (1.0 + m[2][2] - m[0][0] - m[1][1]).sqrt() * 2.0; // 4z
            Self::new(
                (m[0][2] + m[2][0]) / s,
                (m[1][2] + m[2][1]) / s,
                0.25 * s,
                (m[1][0] - m[0][1]) / s,
            )
        }
    }

    /// Component-wise linear interpolation.
    ///
    /// Not a rotation interpolation: the result is generally not unit
    /// length even for unit inputs.
    #[inline]
    pub fn lerp(self, other: Self, t: f32) -> Self {
        self * (1.0 - t) + other * t
    }

    /// Normalised lerp: cheap rotation interpolation without constant
    /// angular speed.
    #[inline]
    pub fn nlerp(self, other: Self, t: f32) -> Self {
        self.lerp(other, t).normalize()
    }

    /// Spherical linear interpolation between two unit quaternions.
    ///
    /// Follows the great-circle arc between `self` and `other` as given (no
    /// shortest-path flip) at constant angular speed:
    ///
    /// ```text
    /// theta = acos(a · b)
    /// slerp = sin((1 - t) theta) / sin(theta) * a + sin(t theta) / sin(theta) * b
    /// ```
    ///
    /// `theta` is evaluated as `2 atan2(|a - b|, |a + b|)`, which equals
    /// `acos(a · b)` for unit inputs but stays accurate near `0` and `pi`.
    ///
    /// When the inputs are nearly parallel `sin(theta)` is too small to divide
    /// by and [`Quat::nlerp`] is used. When they are opposite to within
    /// [`SLERP_OPPOSITE_EPSILON`] on `sin(theta)` the arc is not unique; the
    /// path then runs through the quaternion orthogonal to `self`, which
    /// keeps the result unit length and ends at `-self`, itself within that
    /// tolerance of `other`. Inputs that are merely close to opposite use
    /// the standard formula and end exactly at `other`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use xform_math::Quat;
    ///
    /// let a = Quat::IDENTITY;
    /// let b = Quat::rotate_z(1.0);
    /// let half = a.slerp(b, 0.5);
    /// assert!(half.equals_within(Quat::rotate_z(0.5), 1e-6));
    /// ```
    pub fn slerp(self, other: Self, t: f32) -> Self {
        let cos_theta = clamp(self.dot(other), -1.0, 1.0);

        if 1.0 - cos_theta < SLERP_PARALLEL_EPSILON {
            trace!(cos_theta, "slerp: near-parallel inputs, using nlerp");
            return self.nlerp(other, t);
        }

        let theta = 2.0 * (self - other).length().atan2((self + other).length());
        let sin_theta = theta.sin();

        if sin_theta < SLERP_OPPOSITE_EPSILON {
            trace!(cos_theta, "slerp: opposite inputs, routing through orthogonal");
            let ortho = Self::new(-self.y, self.x, -self.w, self.z);
            return self * ((0.5 - t) * PI).sin() + ortho * (t * PI).sin();
        }

        let inv_sin = 1.0 / sin_theta;
        self * (((1.0 - t) * theta).sin() * inv_sin) + other * ((t * theta).sin() * inv_sin)
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
    ///
    /// Component-wise: `q` and `-q` are the same rotation but not equal here.
    #[inline]
    pub fn equals_within(self, other: Self, epsilon: f32) -> bool {
        self.abs_diff_eq(&other, epsilon)
    }

    /// Converts to glam Quat.
    #[cfg(feature = "glam")]
    #[inline]
    pub fn to_glam(self) -> glam::Quat {
        glam::Quat::from_xyzw(self.x, self.y, self.z, self.w)
    }

    /// Creates from glam Quat.
    #[cfg(feature = "glam")]
    #[inline]
    pub fn from_glam(q: glam::Quat) -> Self {
        Self::new(q.x, q.y, q.z, q.w)
    }
}

impl Default for Quat {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl fmt::Display for Quat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {}, {})", self.x, self.y, self.z, self.w)
    }
}

impl Hash for Quat {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for c in self.to_array() {
            hash_f32(c, state);
        }
    }
}

impl Index<usize> for Quat {
    type Output = f32;

    #[inline]
    fn index(&self, i: usize) -> &f32 {
        match i {
            0 => &self.x,
            1 => &self.y,
            2 => &self.z,
            3 => &self.w,
            _ => panic!("Quat index out of bounds: {}", i),
        }
    }
}

impl IndexMut<usize> for Quat {
    #[inline]
    fn index_mut(&mut self, i: usize) -> &mut f32 {
        match i {
            0 => &mut self.x,
            1 => &mut self.y,
            2 => &mut self.z,
            3 => &mut self.w,
            _ => panic!("Quat index out of bounds: {}", i),
        }
    }
}

// Hamilton product
impl Mul for Quat {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: Self) -> Self {
        let (a, b) = (self, rhs);
        Self::new(
            a.w * b.x + a.x * b.w + a.y * b.z - a.z * b.y,
            a.w * b.y + a.y * b.w + a.z * b.x - a.x * b.z,
            a.w * b.z + a.z * b.w + a.x * b.y - a.y * b.x,
            a.w * b.w - a.x * b.x - a.y * b.y - a.z * b.z,
        )
    }
}

impl MulAssign for Quat {
    #[inline]
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

// Quat * f32 (algebraic scale, not a rotation)
impl Mul<f32> for Quat {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: f32) -> Self {
        Self::new(self.x * rhs, self.y * rhs, self.z * rhs, self.w * rhs)
    }
}

impl Mul<Quat> for f32 {
    type Output = Quat;

    #[inline]
    fn mul(self, rhs: Quat) -> Quat {
        rhs * self
    }
}

// Quat * Vec3
impl Mul<Vec3> for Quat {
    type Output = Vec3;

    #[inline]
    fn mul(self, rhs: Vec3) -> Vec3 {
        self.transform(rhs)
    }
}

impl Add for Quat {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z, self.w + rhs.w)
    }
}

impl Sub for Quat {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z, self.w - rhs.w)
    }
}

impl Neg for Quat {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y, -self.z, -self.w)
    }
}

impl From<[f32; 4]> for Quat {
    #[inline]
    fn from(a: [f32; 4]) -> Self {
        Self::from_array(a)
    }
}

impl From<Quat> for [f32; 4] {
    #[inline]
    fn from(q: Quat) -> [f32; 4] {
        q.to_array()
    }
}

impl TryFrom<&[f32]> for Quat {
    type Error = Error;

    #[inline]
    fn try_from(values: &[f32]) -> Result<Self> {
        Self::from_slice(values)
    }
}

impl From<Quat> for Mat4 {
    #[inline]
    fn from(q: Quat) -> Mat4 {
        q.to_mat4()
    }
}

#[cfg(feature = "glam")]
impl From<glam::Quat> for Quat {
    #[inline]
    fn from(q: glam::Quat) -> Self {
        Self::from_glam(q)
    }
}

#[cfg(feature = "glam")]
impl From<Quat> for glam::Quat {
    #[inline]
    fn from(q: Quat) -> glam::Quat {
        q.to_glam()
    }
}

impl AbsDiffEq for Quat {
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

impl RelativeEq for Quat {
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

impl UlpsEq for Quat {
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
