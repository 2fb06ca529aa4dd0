//! numerics — shared tolerances and the covariance square root.
//!
//! Purpose
//! -------
//! Collect the small amount of dense linear algebra the forecast stack needs
//! beyond `ndarray` products: a rank-deficient-safe symmetric square root of
//! a shock covariance matrix, plus the tolerances that decide symmetry,
//! semi-definiteness, and degeneracy.
//!
//! Key behaviors
//! -------------
//! - Bridge `ndarray` matrices into `nalgebra::DMatrix` for symmetric
//!   eigendecomposition and back ([`matrix_sqrt`]).
//! - Centralize tolerances (`SYMMETRY_TOL`, `PSD_TOL`, `LOADING_EPS`) so the
//!   shock generator and the ZLB solver share one notion of "numerically zero".
//!
//! Conventions
//! -----------
//! - Tolerances are relative: each is scaled by `max(1, largest magnitude)`
//!   of the matrix or vector under test.
//! - This module never logs and performs no I/O.
//!
//! Testing notes
//! -------------
//! - Unit tests in [`matrix_sqrt`] cover diagonal, full-rank dense, and
//!   rank-deficient covariances, and every rejection path.

pub mod matrix_sqrt;

/// Relative tolerance for `|Q[i,j] - Q[j,i]|` before a covariance is rejected as asymmetric.
pub const SYMMETRY_TOL: f64 = 1e-10;

/// Relative tolerance below zero that an eigenvalue may reach before a
/// covariance is rejected as not positive semi-definite. Eigenvalues inside
/// the band are clamped to zero.
pub const PSD_TOL: f64 = 1e-10;

/// Relative magnitude under which a shock loading is treated as zero.
pub const LOADING_EPS: f64 = 1e-14;

pub use self::matrix_sqrt::sqrtm_psd;
