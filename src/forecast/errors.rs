//! Errors for state-space forecasting (shape validation, shock distributions,
//! horizon configuration, ZLB enforcement, and batch failures).
//!
//! This module defines the single crate error type, [`ForecastError`], and the
//! [`ForecastResult`] alias used by every fallible operation in the forecast
//! stack.
//!
//! ## Conventions
//! - **Indices are 0-based** (match Rust/NumPy).
//! - Errors are local to one draw. The batch driver either aborts on the first
//!   failing draw (wrapping it in [`ForecastError::DrawFailed`]) or records it
//!   and moves on, depending on the configured `DrawFailurePolicy`.
//! - No error is ever replaced by a default numeric value.
use thiserror::Error;

/// Crate-wide result alias for forecast operations that may produce [`ForecastError`].
pub type ForecastResult<T> = Result<T, ForecastError>;

/// Unified error type for state-space forecasting.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ForecastError {
    // ---- Dimensions ----
    /// Two objects that must agree on a dimension do not.
    #[error("Dimension mismatch for {what}: expected {expected}, got {actual}")]
    DimensionMismatch { what: &'static str, expected: usize, actual: usize },

    /// A dimension that must be strictly positive is zero.
    #[error("Dimension of {what} must be > 0")]
    EmptyDimension { what: &'static str },

    /// A configured index does not fit the dimension it addresses.
    #[error("Index {index} for {what} is out of range for length {len}")]
    IndexOutOfRange { what: &'static str, index: usize, len: usize },

    /// An input matrix or vector holds NaN/±inf.
    #[error("Input {what} has a non-finite entry at flat index {index}")]
    NonFiniteInput { what: &'static str, index: usize },

    // ---- Shock distributions ----
    /// Shock covariance must be square.
    #[error("Shock covariance must be square; got {rows}x{cols}")]
    CovarianceNotSquare { rows: usize, cols: usize },

    /// Shock covariance must be symmetric.
    #[error("Shock covariance is not symmetric: |Q[{row},{col}] - Q[{col},{row}]| = {gap}")]
    CovarianceNotSymmetric { row: usize, col: usize, gap: f64 },

    /// Shock covariance has a materially negative eigenvalue; no real square root.
    #[error("Shock covariance is not positive semi-definite (eigenvalue {eigenvalue})")]
    CovarianceNotPsd { eigenvalue: f64 },

    /// Student-t degrees of freedom must be finite and > 0.
    #[error("Student-t degrees of freedom must be finite and > 0; got {df}")]
    InvalidDegreesOfFreedom { df: f64 },

    /// Anticipated shock block must satisfy first <= last < n_shocks.
    #[error("Anticipated shock range [{first}, {last}] is invalid for {n_shocks} shocks")]
    InvalidAnticipatedRange { first: usize, last: usize, n_shocks: usize },

    /// Wrapper for a rejected `statrs` / `rand_distr` constructor.
    #[error("Shock sampler rejected its parameters: {reason}")]
    SamplerRejected { reason: String },

    // ---- Horizon / configuration ----
    /// Conditional periods consume the whole forecast horizon.
    #[error(
        "Forecast horizon must be >= 1: {horizons} horizons minus {n_cond_periods} conditional periods"
    )]
    InvalidHorizon { horizons: usize, n_cond_periods: usize },

    /// Batch has no draws.
    #[error("Batch contains no draws.")]
    EmptyBatch,

    /// ZLB enforcement requested but no constrained observable configured.
    #[error("ZLB enforcement requested but the model settings define no ZLB constraint.")]
    ZlbNotConfigured,

    /// ZLB tolerance must be finite and > 0.
    #[error("ZLB tolerance must be finite and > 0; got {value}")]
    InvalidTolerance { value: f64 },

    // ---- ZLB enforcement ----
    /// The driving shock has no effect on the constrained observable.
    #[error("ZLB correction at period {t} is unsolvable: shock loading on the constrained observable is {loading}")]
    ZlbUnsolvable { t: usize, loading: f64 },

    /// After correction the constrained observable still misses the floor.
    #[error("ZLB correction at period {t} failed: constrained observable {value} vs floor {floor}")]
    ZlbNotEnforced { t: usize, value: f64, floor: f64 },

    // ---- Batch ----
    /// A draw failed under the abort policy.
    #[error("Draw {draw} failed: {source}")]
    DrawFailed { draw: usize, source: Box<ForecastError> },
}

impl ForecastError {
    /// Wrap a per-draw error with the index of the failing draw.
    pub fn in_draw(self, draw: usize) -> ForecastError {
        ForecastError::DrawFailed { draw, source: Box::new(self) }
    }

    /// True for the ZLB failure family (unsolvable or not enforced).
    pub fn is_zlb_failure(&self) -> bool {
        match self {
            ForecastError::ZlbUnsolvable { .. } | ForecastError::ZlbNotEnforced { .. } => true,
            ForecastError::DrawFailed { source, .. } => source.is_zlb_failure(),
            _ => false,
        }
    }
}
