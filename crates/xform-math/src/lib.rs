//! # xform-math
//!
//! Small linear-algebra kernel for 3D transforms.
//!
//! - [`Vec3`], [`Vec4`] - 3- and 4-component float vectors
//! - [`Mat4`] - 4x4 matrices: affine factories, projections, determinant
//!   and inverse
//! - [`Quat`] - Unit quaternions: rotation factories, composition,
//!   lerp/nlerp/slerp
//! - Scalar helpers ([`lerp`], [`clamp`], [`approx_eq`])
//!
//! # Design
//!
//! All types are plain `Copy` values of `f32`. Matrices use **row-major**
//! storage and **column vectors**:
//!
//! ```text
//! result = matrix * vector
//! (a * b) * v == a * (b * v)      // b is applied first
//! ```
//!
//! Projection factories produce right-handed matrices for the OpenGL clip
//! cube (depth mapped to `[-1, 1]`).
//!
//! # Usage
//!
//! ```rust
//! use xform_math::{Mat4, Quat, Vec3};
//!
//! let model = Mat4::translate(0.0, 1.0, -4.0) * Quat::rotate_y(0.5).to_mat4();
//! let proj = Mat4::perspective_fov_rh(1.0, 16.0 / 9.0, 0.1, 100.0)?;
//!
//! let ndc = (proj * model).transform_point(Vec3::ZERO);
//! assert!(ndc.z > -1.0 && ndc.z < 1.0);
//! # Ok::<(), xform_math::Error>(())
//! ```
//!
//! # Features
//!
//! - `glam` (default) - `to_glam`/`from_glam` and `From` conversions for
//!   every type
//!
//! # Dependencies
//!
//! - [`xform-core`] - Error type and tolerances
//! - [`approx`] - Tolerance comparisons for all types
//! - [`tracing`] - Diagnostics for degenerate inputs

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod mat4;
mod quat;
mod scalar;
mod vec3;
mod vec4;

pub use mat4::*;
pub use quat::*;
pub use scalar::{approx_eq, clamp, lerp};
pub use vec3::*;
pub use vec4::*;

pub use xform_core::{Error, Result};

/// Re-export glam types for direct use
#[cfg(feature = "glam")]
pub mod glam {
    pub use ::glam::{Mat4 as GlamMat4, Quat as GlamQuat, Vec3 as GlamVec3, Vec4 as GlamVec4};
}
