//! forecast::core::validation — shared input guards for the forecast stack.
//!
//! Purpose
//! -------
//! Centralize the shape and finiteness checks run on system matrices, initial
//! states, and caller-supplied shock paths, so every entry point rejects the
//! same malformed inputs with the same error variants.
//!
//! Invariants & assumptions
//! ------------------------
//! - Shapes must match exactly. Nothing here truncates, pads, or broadcasts.
//! - All numeric inputs must be finite (no NaN, no ±inf).
//!
//! Conventions
//! -----------
//! - Failures are reported as `ForecastError::DimensionMismatch`,
//!   `ForecastError::EmptyDimension`, or `ForecastError::NonFiniteInput`,
//!   with a static `what` label naming the offending object.
//! - Non-finite positions are reported as flat, row-major indices.
use crate::forecast::errors::{ForecastError, ForecastResult};
use ndarray::{ArrayBase, ArrayView1, ArrayView2, Data, Dimension};

/// Require `actual == expected` for the dimension labelled `what`.
pub fn validate_dim(what: &'static str, expected: usize, actual: usize) -> ForecastResult<()> {
    if expected != actual {
        return Err(ForecastError::DimensionMismatch { what, expected, actual });
    }
    Ok(())
}

/// Require a strictly positive dimension.
pub fn validate_nonzero(what: &'static str, n: usize) -> ForecastResult<()> {
    if n == 0 {
        return Err(ForecastError::EmptyDimension { what });
    }
    Ok(())
}

/// Reject any NaN/±inf entry of an array of any dimensionality.
pub fn validate_finite<S, D>(what: &'static str, values: &ArrayBase<S, D>) -> ForecastResult<()>
where
    S: Data<Elem = f64>,
    D: Dimension,
{
    match values.iter().position(|v| !v.is_finite()) {
        Some(index) => Err(ForecastError::NonFiniteInput { what, index }),
        None => Ok(()),
    }
}

/// Validate a caller-supplied shock path for one draw.
///
/// Parameters
/// ----------
/// - `shocks`: `ArrayView2<f64>`
///   Shock matrix with one row per shock and one column per forecast period.
/// - `n_shocks`: `usize`
///   Number of exogenous shocks of the draw's system.
/// - `horizon`: `usize`
///   Forecast horizon resolved for the batch.
///
/// Errors
/// ------
/// - `ForecastError::DimensionMismatch` with `what = "shock rows"` or
///   `"shock columns"` when the shape is not exactly `n_shocks × horizon`.
/// - `ForecastError::NonFiniteInput` when any entry is NaN/±inf.
///
/// Examples
/// --------
/// ```rust
/// # use ndarray::Array2;
/// # use statespace_forecast::forecast::core::validation::validate_shock_path;
/// let shocks = Array2::<f64>::zeros((2, 5));
/// assert!(validate_shock_path(shocks.view(), 2, 5).is_ok());
/// assert!(validate_shock_path(shocks.view(), 2, 4).is_err());
/// ```
pub fn validate_shock_path(
    shocks: ArrayView2<f64>, n_shocks: usize, horizon: usize,
) -> ForecastResult<()> {
    validate_dim("shock rows", n_shocks, shocks.nrows())?;
    validate_dim("shock columns", horizon, shocks.ncols())?;
    validate_finite("shock path", &shocks)
}

/// Validate an initial state vector against the system's state count.
pub fn validate_initial_state(z0: ArrayView1<f64>, n_states: usize) -> ForecastResult<()> {
    validate_dim("initial state", n_states, z0.len())?;
    validate_finite("initial state", &z0)
}
