//! Error types for xform operations.
//!
//! The math layer is almost entirely infallible: arithmetic on vectors,
//! matrices and quaternions always produces a value, even when that value is
//! numerically degenerate (see [`crate::tolerance`]). Errors are reserved for
//! caller misuse that can be detected locally:
//!
//! - slices of the wrong length handed to a `from_slice` constructor
//! - flat or `(row, column)` indices outside the valid range
//! - projection frustum parameters that describe no valid volume
//!
//! # Usage
//!
//! ```rust
//! use xform_core::{Error, Result};
//!
//! fn component(values: &[f32; 3], index: usize) -> Result<f32> {
//!     values
//!         .get(index)
//!         .copied()
//!         .ok_or(Error::index_out_of_range("Vec3", index, 3))
//! }
//!
//! assert!(component(&[1.0, 2.0, 3.0], 7).is_err());
//! ```
//!
//! # Dependencies
//!
//! - [`thiserror`] - For derive macro error implementation

use thiserror::Error;

/// Result type alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors reported by the xform math types.
///
/// # Categories
///
/// - **Construction errors**: [`InvalidLength`](Error::InvalidLength)
/// - **Access errors**: [`IndexOutOfRange`](Error::IndexOutOfRange), [`CellOutOfRange`](Error::CellOutOfRange)
/// - **Projection errors**: [`InvalidProjection`](Error::InvalidProjection)
///
/// Numerical degeneracy (inverting a singular matrix, normalising a
/// zero-length vector) is deliberately *not* represented here.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// A slice passed to a fixed-size constructor has the wrong length.
    ///
    /// # Example
    ///
    /// ```rust
    /// use xform_core::Error;
    ///
    /// let err = Error::invalid_length("Mat4", 16, 9);
    /// assert!(err.to_string().contains("16"));
    /// assert!(err.to_string().contains("9"));
    /// ```
    #[error("{kind} requires exactly {expected} components, got {got}")]
    InvalidLength {
        /// Type being constructed
        kind: &'static str,
        /// Required component count
        expected: usize,
        /// Component count supplied
        got: usize,
    },

    /// Flat component index outside `0..len`.
    #[error("index {index} out of range for {kind} (valid: 0..{len})")]
    IndexOutOfRange {
        /// Type being indexed
        kind: &'static str,
        /// Index that was requested
        index: usize,
        /// Number of components
        len: usize,
    },

    /// Matrix `(row, column)` outside `0..4`.
    #[error("cell ({row}, {column}) out of range for Mat4 (valid: 0..4, 0..4)")]
    CellOutOfRange {
        /// Requested row
        row: usize,
        /// Requested column
        column: usize,
    },

    /// Projection parameters do not describe a valid view volume.
    ///
    /// Returned by the perspective factories for `near <= 0`, `far <= 0`,
    /// `near >= far`, `fovy` outside `(0, pi]` or `aspect <= 0`.
    #[error("invalid projection parameter {parameter} = {value}: {reason}")]
    InvalidProjection {
        /// Parameter name (`near`, `far`, `fovy`, `aspect`)
        parameter: &'static str,
        /// Value that was rejected
        value: f32,
        /// Constraint that was violated
        reason: &'static str,
    },
}

impl Error {
    /// Creates an [`Error::InvalidLength`] error.
    #[inline]
    pub fn invalid_length(kind: &'static str, expected: usize, got: usize) -> Self {
        Self::InvalidLength {
            kind,
            expected,
            got,
        }
    }

    /// Creates an [`Error::IndexOutOfRange`] error.
    #[inline]
    pub fn index_out_of_range(kind: &'static str, index: usize, len: usize) -> Self {
        Self::IndexOutOfRange { kind, index, len }
    }

    /// Creates an [`Error::CellOutOfRange`] error.
    #[inline]
    pub fn cell_out_of_range(row: usize, column: usize) -> Self {
        Self::CellOutOfRange { row, column }
    }

    /// Creates an [`Error::InvalidProjection`] error.
    ///
    /// # Arguments
    ///
    /// * `parameter` - Name of the offending argument
    /// * `value` - The rejected value
    /// * `reason` - Human-readable constraint, e.g. `"must be positive"`
    #[inline]
    pub fn invalid_projection(parameter: &'static str, value: f32, reason: &'static str) -> Self {
        Self::InvalidProjection {
            parameter,
            value,
            reason,
        }
    }

    /// Returns `true` if this is an index or cell access error.
    #[inline]
    pub fn is_index_error(&self) -> bool {
        matches!(self, Self::IndexOutOfRange { .. } | Self::CellOutOfRange { .. })
    }

    /// Returns `true` if this is a projection parameter error.
    #[inline]
    pub fn is_projection_error(&self) -> bool {
        matches!(self, Self::InvalidProjection { .. })
    }
}
