//! # xform-core
//!
//! Core types shared by the xform crates.
//!
//! - [`Error`], [`Result`] - Error taxonomy for caller misuse
//! - [`tolerance`] - Numeric tolerances that define normalisation and
//!   interpolation policy
//!
//! ## Crate Structure
//!
//! ```text
//! xform-core (this crate)
//!    ^
//!    |
//!    +-- xform-math (vectors, matrices, quaternions)
//!    +-- xform-tests (integration tests)
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod error;
pub mod tolerance;

pub use error::*;

/// Prelude module for convenient imports.
///
/// # Usage
///
/// ```
/// use xform_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::tolerance::{DEFAULT_EPSILON, NORMALIZED_EPSILON};
}
