//! 4x4 matrix type for affine transforms and projections.
//!
//! # Convention
//!
//! Matrices are stored in **row-major** order and use **column vectors**:
//!
//! ```text
//! | m00 m01 m02 m03 |   | x |   | m00*x + m01*y + m02*z + m03*w |
//! | m10 m11 m12 m13 | * | y | = | m10*x + m11*y + m12*z + m13*w |
//! | m20 m21 m22 m23 |   | z |   | m20*x + m21*y + m22*z + m23*w |
//! | m30 m31 m32 m33 |   | w |   | m30*x + m31*y + m32*z + m33*w |
//! ```
//!
//! Translation lives in the last column. `a * b` applied to a vector
//! transforms by `b` first, then by `a`. Flat indices are row-major:
//! `index = row * 4 + column`.
//!
//! Projections are right-handed (camera looks down `-Z`) and map the view
//! volume to the OpenGL clip cube `[-1, 1]^3`.
//!
//! # Usage
//!
//! ```rust
//! use xform_math::{Mat4, Vec3};
//! use std::f32::consts::FRAC_PI_2;
//!
//! let model = Mat4::translate(0.0, 0.0, -5.0) * Mat4::rotate_y(FRAC_PI_2);
//! let p = model.transform_point(Vec3::new(1.0, 0.0, 0.0));
//! assert!(p.equals_within(Vec3::new(0.0, 0.0, -6.0), 1e-6));
//! ```

use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::{Add, AddAssign, Index, IndexMut, Mul, MulAssign, Neg, Sub, SubAssign};

use approx::{AbsDiffEq, RelativeEq, UlpsEq};
use tracing::debug;
use xform_core::{Error, Result};

use crate::scalar::hash_f32;
use crate::{Quat, Vec3, Vec4};

/// A 4x4 matrix of single-precision floats.
///
/// Stored in row-major order. Use [`Mat4::from_rows`], [`Mat4::from_cols`]
/// or [`Mat4::from_slice`] to construct from component arrays, or one of
/// the transform factories.
///
/// # Example
///
/// ```rust
/// use xform_math::{Mat4, Vec4};
///
/// let m = Mat4::scale(2.0, 3.0, 4.0);
/// assert_eq!(m * Vec4::ONE, Vec4::new(2.0, 3.0, 4.0, 1.0));
/// assert_eq!(m[(1, 1)], 3.0);
/// assert_eq!(m[5], 3.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[repr(C)]
pub struct Mat4 {
    /// Matrix elements in row-major order: [row0, row1, row2, row3]
    pub m: [[f32; 4]; 4],
}

impl Mat4 {
    /// Zero matrix.
    pub const ZERO: Self = Self { m: [[0.0; 4]; 4] };

    /// Identity matrix.
    pub const IDENTITY: Self = Self {
        m: [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ],
    };

    /// Number of elements.
    pub const LEN: usize = 16;

    /// Creates a matrix from its 16 elements, given row by row.
    #[allow(clippy::too_many_arguments)]
    #[inline]
    pub const fn new(
        m00: f32, m01: f32, m02: f32, m03: f32,
        m10: f32, m11: f32, m12: f32, m13: f32,
        m20: f32, m21: f32, m22: f32, m23: f32,
        m30: f32, m31: f32, m32: f32, m33: f32,
    ) -> Self {
        Self {
            m: [
                [m00, m01, m02, m03],
                [m10, m11, m12, m13],
                [m20, m21, m22, m23],
                [m30, m31, m32, m33],
            ],
        }
    }

    /// Creates a matrix with every element set to `v`.
    #[inline]
    pub const fn splat(v: f32) -> Self {
        Self { m: [[v; 4]; 4] }
    }

    /// Creates a matrix from row arrays.
    #[inline]
    pub const fn from_rows(rows: [[f32; 4]; 4]) -> Self {
        Self { m: rows }
    }

    /// Creates a matrix from column arrays.
    ///
    /// Transposes the input (columns become rows internally).
    #[inline]
    pub const fn from_cols(cols: [[f32; 4]; 4]) -> Self {
        Self {
            m: [
                [cols[0][0], cols[1][0], cols[2][0], cols[3][0]],
                [cols[0][1], cols[1][1], cols[2][1], cols[3][1]],
                [cols[0][2], cols[1][2], cols[2][2], cols[3][2]],
                [cols[0][3], cols[1][3], cols[2][3], cols[3][3]],
            ],
        }
    }

    /// Creates a matrix from Vec4 rows.
    #[inline]
    pub fn from_row_vecs(r0: Vec4, r1: Vec4, r2: Vec4, r3: Vec4) -> Self {
        Self::from_rows([r0.to_array(), r1.to_array(), r2.to_array(), r3.to_array()])
    }

    /// Creates a matrix from a row-major flat array.
    #[inline]
    pub const fn from_array(a: [f32; 16]) -> Self {
        Self::new(
            a[0], a[1], a[2], a[3],
            a[4], a[5], a[6], a[7],
            a[8], a[9], a[10], a[11],
            a[12], a[13], a[14], a[15],
        )
    }

    /// Creates a matrix from a row-major slice of exactly 16 values.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidLength`] if `values.len() != 16`.
    pub fn from_slice(values: &[f32]) -> Result<Self> {
        let array: [f32; 16] = values
            .try_into()
            .map_err(|_| Error::invalid_length("Mat4", Self::LEN, values.len()))?;
        Ok(Self::from_array(array))
    }

    /// Returns the elements as a row-major flat array.
    #[inline]
    pub fn to_array(&self) -> [f32; 16] {
        let mut out = [0.0; 16];
        for (i, v) in self.m.iter().flatten().enumerate() {
            out[i] = *v;
        }
        out
    }

    /// Returns a row as Vec4.
    ///
    /// # Panics
    ///
    /// If `i >= 4`.
    #[inline]
    pub fn row(&self, i: usize) -> Vec4 {
        assert!(i < 4, "Mat4 row out of bounds: {}", i);
        Vec4::from_array(self.m[i])
    }

    /// Returns a column as Vec4.
    ///
    /// # Panics
    ///
    /// If `i >= 4`.
    #[inline]
    pub fn col(&self, i: usize) -> Vec4 {
        assert!(i < 4, "Mat4 column out of bounds: {}", i);
        Vec4::new(self.m[0][i], self.m[1][i], self.m[2][i], self.m[3][i])
    }

    /// Replaces a row.
    ///
    /// # Panics
    ///
    /// If `i >= 4`.
    #[inline]
    pub fn set_row(&mut self, i: usize, row: Vec4) {
        assert!(i < 4, "Mat4 row out of bounds: {}", i);
        self.m[i] = row.to_array();
    }

    /// Returns the element at row-major flat `index`.
    ///
    /// # Errors
    ///
    /// [`Error::IndexOutOfRange`] if `index >= 16`.
    #[inline]
    pub fn get(&self, index: usize) -> Result<f32> {
        if index < Self::LEN {
            Ok(self.m[index / 4][index % 4])
        } else {
            Err(Error::index_out_of_range("Mat4", index, Self::LEN))
        }
    }

    /// Sets the element at row-major flat `index`.
    ///
    /// # Errors
    ///
    /// [`Error::IndexOutOfRange`] if `index >= 16`.
    pub fn set(&mut self, index: usize, value: f32) -> Result<()> {
        if index >= Self::LEN {
            return Err(Error::index_out_of_range("Mat4", index, Self::LEN));
        }
        self.m[index / 4][index % 4] = value;
        Ok(())
    }

    /// Returns the element at `(row, column)`.
    ///
    /// # Errors
    ///
    /// [`Error::CellOutOfRange`] if either coordinate is `>= 4`.
    #[inline]
    pub fn get_cell(&self, row: usize, column: usize) -> Result<f32> {
        if row < 4 && column < 4 {
            Ok(self.m[row][column])
        } else {
            Err(Error::cell_out_of_range(row, column))
        }
    }

    /// Sets the element at `(row, column)`.
    ///
    /// # Errors
    ///
    /// [`Error::CellOutOfRange`] if either coordinate is `>= 4`.
    pub fn set_cell(&mut self, row: usize, column: usize, value: f32) -> Result<()> {
        if row >= 4 || column >= 4 {
            return Err(Error::cell_out_of_range(row, column));
        }
        self.m[row][column] = value;
        Ok(())
    }

    /// Returns the transpose of this matrix.
    ///
    /// Builds a fresh matrix, so every source element is read before any
    /// destination element is written.
    #[inline]
    pub fn transpose(&self) -> Self {
        Self::from_cols(self.m)
    }

    /// Transposes in place.
    #[inline]
    pub fn transpose_mut(&mut self) {
        *self = self.transpose();
    }

    /// Sum of the diagonal.
    #[inline]
    pub fn trace(&self) -> f32 {
        self.m[0][0] + self.m[1][1] + self.m[2][2] + self.m[3][3]
    }

    /// 2x2 minors of the bottom two rows, indexed by column pair:
    /// `(0,1) (0,2) (0,3) (1,2) (1,3) (2,3)`.
    #[inline]
    fn lower_minors(&self) -> [f32; 6] {
        let [a, b, c, d] = self.m[2];
        let [e, f, g, h] = self.m[3];
        [
            a * f - b * e,
            a * g - c * e,
            a * h - d * e,
            b * g - c * f,
            b * h - d * f,
            c * h - d * g,
        ]
    }

    /// Computes the determinant.
    ///
    /// Laplace expansion along the first row; each 3x3 minor is expanded
    /// along the second row using the six 2x2 minors of rows 3-4. Exact
    /// algebraic form, no scaling. Zero means the matrix is singular.
    ///
    /// # Example
    ///
    /// ```rust
    /// use xform_math::Mat4;
    ///
    /// assert_eq!(Mat4::scale(2.0, 3.0, 4.0).determinant(), 24.0);
    /// ```
    pub fn determinant(&self) -> f32 {
        let [m00, m01, m02, m03] = self.m[0];
        let [m10, m11, m12, m13] = self.m[1];
        let [c0, c1, c2, c3, c4, c5] = self.lower_minors();

        m00 * (m11 * c5 - m12 * c4 + m13 * c3)
            - m01 * (m10 * c5 - m12 * c2 + m13 * c1)
            + m02 * (m10 * c4 - m11 * c2 + m13 * c0)
            - m03 * (m10 * c3 - m11 * c1 + m12 * c0)
    }

    /// Computes the inverse of this matrix.
    ///
    /// Analytic inverse: adjugate (transposed cofactors) divided by the
    /// determinant. The caller must ensure the matrix is non-singular. A
    /// matrix whose [`determinant`](Mat4::determinant) is exactly zero
    /// produces `±inf`/NaN elements; no fallback value is substituted.
    ///
    /// # Example
    ///
    /// ```rust
    /// use xform_math::Mat4;
    ///
    /// let m = Mat4::translate(1.0, 2.0, 3.0);
    /// assert_eq!(m.inverse(), Mat4::translate(-1.0, -2.0, -3.0));
    ///
    /// let singular = Mat4::ZERO;
    /// assert!(!singular.inverse().is_finite());
    /// ```
    pub fn inverse(&self) -> Self {
        let [a00, a01, a02, a03] = self.m[0];
        let [a10, a11, a12, a13] = self.m[1];
        let [a20, a21, a22, a23] = self.m[2];
        let [a30, a31, a32, a33] = self.m[3];

        // 2x2 minors of the top two rows
        let s0 = a00 * a11 - a01 * a10;
        let s1 = a00 * a12 - a02 * a10;
        let s2 = a00 * a13 - a03 * a10;
        let s3 = a01 * a12 - a02 * a11;
        let s4 = a01 * a13 - a03 * a11;
        let s5 = a02 * a13 - a03 * a12;

        let [c0, c1, c2, c3, c4, c5] = self.lower_minors();

        // First column of the adjugate doubles as the first-row cofactors
        let b00 = a11 * c5 - a12 * c4 + a13 * c3;
        let b10 = -a10 * c5 + a12 * c2 - a13 * c1;
        let b20 = a10 * c4 - a11 * c2 + a13 * c0;
        let b30 = -a10 * c3 + a11 * c1 - a12 * c0;

        let det = a00 * b00 + a01 * b10 + a02 * b20 + a03 * b30;
        if det == 0.0 {
            debug!("inverting singular Mat4, result will not be finite");
        }
        let inv_det = 1.0 / det;

        Self::new(
            b00 * inv_det,
            (-a01 * c5 + a02 * c4 - a03 * c3) * inv_det,
            (a31 * s5 - a32 * s4 + a33 * s3) * inv_det,
            (-a21 * s5 + a22 * s4 - a23 * s3) * inv_det,
            b10 * inv_det,
            (a00 * c5 - a02 * c2 + a03 * c1) * inv_det,
            (-a30 * s5 + a32 * s2 - a33 * s1) * inv_det,
            (a20 * s5 - a22 * s2 + a23 * s1) * inv_det,
            b20 * inv_det,
            (-a00 * c4 + a01 * c2 - a03 * c0) * inv_det,
            (a30 * s4 - a31 * s2 + a33 * s0) * inv_det,
            (-a20 * s4 + a21 * s2 - a23 * s0) * inv_det,
            b30 * inv_det,
            (a00 * c3 - a01 * c1 + a02 * c0) * inv_det,
            (-a30 * s3 + a31 * s1 - a32 * s0) * inv_det,
            (a20 * s3 - a21 * s1 + a22 * s0) * inv_det,
        )
    }

    /// Inverts in place. See [`Mat4::inverse`].
    #[inline]
    pub fn invert_mut(&mut self) {
        *self = self.inverse();
    }

    /// Transforms a Vec4 by this matrix.
    ///
    /// Equivalent to `matrix * vector`: component `i` is `row(i) · v`.
    #[inline]
    pub fn transform(&self, v: Vec4) -> Vec4 {
        Vec4::new(
            self.row(0).dot(v),
            self.row(1).dot(v),
            self.row(2).dot(v),
            self.row(3).dot(v),
        )
    }

    /// Transforms a point (`w = 1`).
    ///
    /// If the resulting `w` is not 1 (projective matrices), the result is
    /// divided by it.
    #[inline]
    pub fn transform_point(&self, p: Vec3) -> Vec3 {
        let out = self.transform(p.extend(1.0));
        if out.w == 1.0 { out.truncate() } else { out.project() }
    }

    /// Transforms a direction (`w = 0`): translation is ignored.
    #[inline]
    pub fn transform_vector(&self, v: Vec3) -> Vec3 {
        self.transform(v.extend(0.0)).truncate()
    }

    /// Multiplies two matrices: `result[r][c] = Σ self[r][k] * other[k][c]`.
    ///
    /// Not commutative.
    #[inline]
    pub fn mul_mat(&self, other: &Self) -> Self {
        let mut result = Self::ZERO;
        for i in 0..4 {
            for j in 0..4 {
                result.m[i][j] = self.m[i][0] * other.m[0][j]
                    + self.m[i][1] * other.m[1][j]
                    + self.m[i][2] * other.m[2][j]
                    + self.m[i][3] * other.m[3][j];
            }
        }
        result
    }

    /// Applies `f` to every element.
    #[inline]
    fn map(&self, f: impl Fn(f32) -> f32) -> Self {
        Self { m: self.m.map(|row| row.map(&f)) }
    }

    /// Combines two matrices element by element.
    #[inline]
    fn zip_with(&self, other: &Self, f: impl Fn(f32, f32) -> f32) -> Self {
        let mut result = Self::ZERO;
        for (i, row) in result.m.iter_mut().enumerate() {
            for (j, v) in row.iter_mut().enumerate() {
                *v = f(self.m[i][j], other.m[i][j]);
            }
        }
        result
    }

    /// Returns true if all elements are finite (not NaN or infinite).
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.m.iter().flatten().all(|x| x.is_finite())
    }

    /// Returns true if this is exactly the identity matrix.
    #[inline]
    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    /// Exact element-wise equality. Same as `==`.
    #[inline]
    pub fn equals_exact(&self, other: &Self) -> bool {
        self == other
    }

    /// Returns true if every element differs by at most `epsilon`.
    #[inline]
    pub fn equals_within(&self, other: &Self, epsilon: f32) -> bool {
        self.abs_diff_eq(other, epsilon)
    }

    // ------------------------------------------------------------------------
    // Factories
    // ------------------------------------------------------------------------

    /// Translation matrix: identity with `(x, y, z)` in the last column.
    #[inline]
    pub const fn translate(x: f32, y: f32, z: f32) -> Self {
        Self::new(
            1.0, 0.0, 0.0, x,
            0.0, 1.0, 0.0, y,
            0.0, 0.0, 1.0, z,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    /// Per-axis scale matrix.
    #[inline]
    pub const fn scale(x: f32, y: f32, z: f32) -> Self {
        Self::new(
            x, 0.0, 0.0, 0.0,
            0.0, y, 0.0, 0.0,
            0.0, 0.0, z, 0.0,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    /// Right-handed rotation of `angle` radians around the X axis.
    ///
    /// # Example
    ///
    /// ```rust
    /// use xform_math::{Mat4, Vec3};
    /// use std::f32::consts::FRAC_PI_2;
    ///
    /// let p = Mat4::rotate_x(FRAC_PI_2).transform_point(Vec3::Y);
    /// assert!(p.equals_within(Vec3::Z, 1e-6));
    /// ```
    pub fn rotate_x(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        Self::new(
            1.0, 0.0, 0.0, 0.0,
            0.0, c, -s, 0.0,
            0.0, s, c, 0.0,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    /// Right-handed rotation of `angle` radians around the Y axis.
    pub fn rotate_y(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        Self::new(
            c, 0.0, s, 0.0,
            0.0, 1.0, 0.0, 0.0,
            -s, 0.0, c, 0.0,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    /// Right-handed rotation of `angle` radians around the Z axis.
    pub fn rotate_z(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        Self::new(
            c, -s, 0.0, 0.0,
            s, c, 0.0, 0.0,
            0.0, 0.0, 1.0, 0.0,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    /// Rotation of `angle` radians around an arbitrary axis (Rodrigues).
    ///
    /// `axis` must already be unit length; it is not normalised here and
    /// the result is meaningless otherwise.
    ///
    /// # Panics
    ///
    /// In debug builds, if `axis` is not unit length (see
    /// [`Vec3::is_normalized`]). Release builds do not check.
    pub fn rotate_axis(axis: Vec3, angle: f32) -> Self {
        debug_assert!(axis.is_normalized(), "rotate_axis expects a unit axis, got {axis}");

        let (s, c) = angle.sin_cos();
        let t = 1.0 - c;
        let Vec3 { x, y, z } = axis;

        Self::new(
            t * x * x + c, t * x * y - s * z, t * x * z + s * y, 0.0,
            t * x * y + s * z, t * y * y + c, t * y * z - s * x, 0.0,
            t * x * z - s * y, t * y * z + s * x, t * z * z + c, 0.0,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    /// Euler rotation: X (yaw) first, then Y (pitch), then Z (roll).
    ///
    /// Same order as [`Quat::rotate_euler`].
    pub fn rotate_euler(x: f32, y: f32, z: f32) -> Self {
        Self::rotate_z(z) * Self::rotate_y(y) * Self::rotate_x(x)
    }

    /// Rotation matrix equivalent to a unit quaternion.
    #[inline]
    pub fn from_quat(q: Quat) -> Self {
        q.to_mat4()
    }

    /// Right-handed orthographic projection.
    ///
    /// Maps the box `[left, right] x [bottom, top] x [-near, -far]` to the
    /// clip cube, with `z = -near` going to depth `-1`. No validation:
    /// degenerate extents produce non-finite elements.
    ///
    /// # Example
    ///
    /// ```rust
    /// use xform_math::{Mat4, Vec4};
    ///
    /// let p = Mat4::orthographic_rh(0.0, 10.0, 0.0, 10.0, -1.0, 1.0);
    /// let corner = p * Vec4::new(10.0, 10.0, 1.0, 1.0);
    /// assert!(corner.equals_within(Vec4::new(1.0, 1.0, -1.0, 1.0), 1e-6));
    /// ```
    pub fn orthographic_rh(left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Self {
        let rl = 1.0 / (right - left);
        let tb = 1.0 / (top - bottom);
        let fl = 1.0 / (far - near);

        Self::new(
            2.0 * rl, 0.0, 0.0, -(right + left) * rl,
            0.0, 2.0 * tb, 0.0, -(top + bottom) * tb,
            0.0, 0.0, -2.0 * fl, -(far + near) * fl,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    /// Right-handed perspective projection from an off-centre frustum.
    ///
    /// `left`/`right`/`bottom`/`top` are the frustum extents on the near
    /// plane. Depth `z = -near` maps to `-1`, `z = -far` to `+1`.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidProjection`] if `near <= 0`, `far <= 0` or
    /// `near >= far`.
    pub fn perspective_rh(
        left: f32,
        right: f32,
        bottom: f32,
        top: f32,
        near: f32,
        far: f32,
    ) -> Result<Self> {
        validate_depth_range(near, far)?;

        let rl = 1.0 / (right - left);
        let tb = 1.0 / (top - bottom);
        let fl = 1.0 / (far - near);

        Ok(Self::new(
            2.0 * near * rl, 0.0, (right + left) * rl, 0.0,
            0.0, 2.0 * near * tb, (top + bottom) * tb, 0.0,
            0.0, 0.0, -(far + near) * fl, -2.0 * far * near * fl,
            0.0, 0.0, -1.0, 0.0,
        ))
    }

    /// Right-handed perspective projection from a vertical field of view.
    ///
    /// Symmetric frustum with `top = near * tan(fovy / 2)` and
    /// `right = top * aspect`.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidProjection`] if the depth range is invalid (see
    /// [`Mat4::perspective_rh`]), `fovy` is outside `(0, pi]`, or
    /// `aspect <= 0`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use xform_math::Mat4;
    /// use std::f32::consts::FRAC_PI_2;
    ///
    /// assert!(Mat4::perspective_fov_rh(FRAC_PI_2, 16.0 / 9.0, 0.1, 100.0).is_ok());
    /// assert!(Mat4::perspective_fov_rh(FRAC_PI_2, 0.0, 0.1, 100.0).is_err());
    /// ```
    pub fn perspective_fov_rh(fovy: f32, aspect: f32, near: f32, far: f32) -> Result<Self> {
        validate_depth_range(near, far)?;
        if !(fovy > 0.0 && fovy <= std::f32::consts::PI) {
            debug!(fovy, "rejecting perspective projection");
            return Err(Error::invalid_projection("fovy", fovy, "must be in (0, pi]"));
        }
        if !(aspect > 0.0) {
            debug!(aspect, "rejecting perspective projection");
            return Err(Error::invalid_projection("aspect", aspect, "must be positive"));
        }

        let f = 1.0 / (0.5 * fovy).tan();
        let fl = 1.0 / (near - far);

        Ok(Self::new(
            f / aspect, 0.0, 0.0, 0.0,
            0.0, f, 0.0, 0.0,
            0.0, 0.0, (far + near) * fl, 2.0 * far * near * fl,
            0.0, 0.0, -1.0, 0.0,
        ))
    }

    /// Right-handed view matrix looking from `eye` towards `target`.
    ///
    /// The camera looks down its local `-Z`, with `up` roughly along `+Y`.
    /// `up` must not be parallel to `target - eye`.
    pub fn look_at_rh(eye: Vec3, target: Vec3, up: Vec3) -> Self {
        let f = (target - eye).normalize();
        let s = f.cross(up).normalize();
        let u = s.cross(f);

        Self::new(
            s.x, s.y, s.z, -s.dot(eye),
            u.x, u.y, u.z, -u.dot(eye),
            -f.x, -f.y, -f.z, f.dot(eye),
            0.0, 0.0, 0.0, 1.0,
        )
    }

    /// Converts to glam Mat4 (column-major).
    #[cfg(feature = "glam")]
    #[inline]
    pub fn to_glam(&self) -> glam::Mat4 {
        // glam stores columns, so our transposed rows are its columns
        glam::Mat4::from_cols_array_2d(&self.transpose().m)
    }

    /// Creates from glam Mat4.
    #[cfg(feature = "glam")]
    #[inline]
    pub fn from_glam(m: glam::Mat4) -> Self {
        Self::from_cols(m.to_cols_array_2d())
    }
}

/// Shared near/far checks for the perspective factories.
fn validate_depth_range(near: f32, far: f32) -> Result<()> {
    let err = if !(near > 0.0) {
        Error::invalid_projection("near", near, "must be positive")
    } else if !(far > 0.0) {
        Error::invalid_projection("far", far, "must be positive")
    } else if near >= far {
        Error::invalid_projection("near", near, "must be less than far")
    } else {
        return Ok(());
    };
    debug!(near, far, %err, "rejecting perspective projection");
    Err(err)
}

impl Default for Mat4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl fmt::Display for Mat4 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.m.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "[{}, {}, {}, {}]", row[0], row[1], row[2], row[3])?;
        }
        Ok(())
    }
}

impl Hash for Mat4 {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for v in self.m.iter().flatten() {
            hash_f32(*v, state);
        }
    }
}

// Mat4 * Vec4
impl Mul<Vec4> for Mat4 {
    type Output = Vec4;

    #[inline]
    fn mul(self, rhs: Vec4) -> Vec4 {
        self.transform(rhs)
    }
}

// Mat4 * Mat4
impl Mul for Mat4 {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: Self) -> Self {
        self.mul_mat(&rhs)
    }
}

impl MulAssign for Mat4 {
    #[inline]
    fn mul_assign(&mut self, rhs: Self) {
        *self = self.mul_mat(&rhs);
    }
}

// Mat4 * f32
impl Mul<f32> for Mat4 {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: f32) -> Self {
        self.map(|v| v * rhs)
    }
}

// f32 * Mat4
impl Mul<Mat4> for f32 {
    type Output = Mat4;

    #[inline]
    fn mul(self, rhs: Mat4) -> Mat4 {
        rhs * self
    }
}

impl MulAssign<f32> for Mat4 {
    #[inline]
    fn mul_assign(&mut self, rhs: f32) {
        *self = *self * rhs;
    }
}

impl Add for Mat4 {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        self.zip_with(&rhs, |a, b| a + b)
    }
}

impl AddAssign for Mat4 {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for Mat4 {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        self.zip_with(&rhs, |a, b| a - b)
    }
}

impl SubAssign for Mat4 {
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl Neg for Mat4 {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        self.map(|v| -v)
    }
}

// Row-major flat index
impl Index<usize> for Mat4 {
    type Output = f32;

    #[inline]
    fn index(&self, i: usize) -> &f32 {
        assert!(i < Self::LEN, "Mat4 index out of bounds: {}", i);
        &self.m[i / 4][i % 4]
    }
}

impl IndexMut<usize> for Mat4 {
    #[inline]
    fn index_mut(&mut self, i: usize) -> &mut f32 {
        assert!(i < Self::LEN, "Mat4 index out of bounds: {}", i);
        &mut self.m[i / 4][i % 4]
    }
}

// (row, column)
impl Index<(usize, usize)> for Mat4 {
    type Output = f32;

    #[inline]
    fn index(&self, (row, column): (usize, usize)) -> &f32 {
        assert!(row < 4 && column < 4, "Mat4 cell out of bounds: ({}, {})", row, column);
        &self.m[row][column]
    }
}

impl IndexMut<(usize, usize)> for Mat4 {
    #[inline]
    fn index_mut(&mut self, (row, column): (usize, usize)) -> &mut f32 {
        assert!(row < 4 && column < 4, "Mat4 cell out of bounds: ({}, {})", row, column);
        &mut self.m[row][column]
    }
}

impl From<[[f32; 4]; 4]> for Mat4 {
    #[inline]
    fn from(rows: [[f32; 4]; 4]) -> Self {
        Self::from_rows(rows)
    }
}

impl From<[f32; 16]> for Mat4 {
    #[inline]
    fn from(a: [f32; 16]) -> Self {
        Self::from_array(a)
    }
}

impl TryFrom<&[f32]> for Mat4 {
    type Error = Error;

    #[inline]
    fn try_from(values: &[f32]) -> Result<Self> {
        Self::from_slice(values)
    }
}

#[cfg(feature = "glam")]
impl From<glam::Mat4> for Mat4 {
    #[inline]
    fn from(m: glam::Mat4) -> Self {
        Self::from_glam(m)
    }
}

#[cfg(feature = "glam")]
impl From<Mat4> for glam::Mat4 {
    #[inline]
    fn from(m: Mat4) -> glam::Mat4 {
        m.to_glam()
    }
}

impl AbsDiffEq for Mat4 {
    type Epsilon = f32;

    fn default_epsilon() -> f32 {
        f32::EPSILON
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f32) -> bool {
        self.m
            .iter()
            .flatten()
            .zip(other.m.iter().flatten())
            .all(|(a, b)| a.abs_diff_eq(b, epsilon))
    }
}

impl RelativeEq for Mat4 {
    fn default_max_relative() -> f32 {
        f32::EPSILON
    }

    fn relative_eq(&self, other: &Self, epsilon: f32, max_relative: f32) -> bool {
        self.m
            .iter()
            .flatten()
            .zip(other.m.iter().flatten())
            .all(|(a, b)| a.relative_eq(b, epsilon, max_relative))
    }
}

impl UlpsEq for Mat4 {
    fn default_max_ulps() -> u32 {
        4
    }

    fn ulps_eq(&self, other: &Self, epsilon: f32, max_ulps: u32) -> bool {
        self.m
            .iter()
            .flatten()
            .zip(other.m.iter().flatten())
            .all(|(a, b)| a.ulps_eq(b, epsilon, max_ulps))
    }
}
