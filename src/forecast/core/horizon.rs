//! Conditioning types and the forecast horizon they imply.
//!
//! Conditional forecasts (`Semi`, `Full`) treat the first `n_cond_periods`
//! forecast periods as already observed (they are appended to the history
//! before filtering, upstream of this crate), so the simulated horizon is
//! shortened by that many periods. Unconditional forecasts use the full
//! configured horizon.
use crate::forecast::{
    core::options::ModelSettings,
    errors::{ForecastError, ForecastResult},
};

/// Conditioning type of a forecast run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CondType {
    /// Unconditional forecast.
    #[default]
    None,
    /// Semi-conditional: conditional data on a subset of observables.
    Semi,
    /// Fully conditional: conditional data on all observables.
    Full,
}

impl CondType {
    /// True for `Semi` and `Full`.
    pub fn is_conditional(self) -> bool {
        !matches!(self, CondType::None)
    }
}

/// Resolve the number of simulated forecast periods.
///
/// # Returns
/// - `forecast_horizons` for [`CondType::None`].
/// - `forecast_horizons - n_cond_periods` for [`CondType::Semi`] and [`CondType::Full`].
///
/// # Errors
/// [`ForecastError::InvalidHorizon`] when the result would be zero (or
/// negative), i.e. the conditional periods consume the whole horizon.
pub fn forecast_horizon(model: &ModelSettings, cond_type: CondType) -> ForecastResult<usize> {
    let horizons = model.forecast_horizons;
    let consumed = if cond_type.is_conditional() { model.n_cond_periods } else { 0 };
    match horizons.checked_sub(consumed) {
        Some(h) if h > 0 => Ok(h),
        _ => Err(ForecastError::InvalidHorizon { horizons, n_cond_periods: consumed }),
    }
}
