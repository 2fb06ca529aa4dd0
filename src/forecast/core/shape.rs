//! Dimensions of a state-space system.
//!
//! - `n_states`: length of the state vector z_t.
//! - `n_shocks`: number of exogenous shocks ε_t.
//! - `n_obs`: number of observables y_t.
//! - `n_pseudo`: number of pseudo-observables (0 when none are configured).
use crate::forecast::{core::validation::validate_nonzero, errors::ForecastResult};

/// Dimensions shared by every matrix of a state-space system.
///
/// Invariant: `n_states`, `n_shocks`, and `n_obs` are > 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForecastShape {
    pub n_states: usize,
    pub n_shocks: usize,
    pub n_obs: usize,
    pub n_pseudo: usize,
}

impl ForecastShape {
    /// Construct a [`ForecastShape`] and validate the positive dimensions.
    ///
    /// # Errors
    /// - [`ForecastError::EmptyDimension`](crate::forecast::errors::ForecastError::EmptyDimension)
    ///   if `n_states`, `n_shocks`, or `n_obs` is zero.
    pub fn new(
        n_states: usize, n_shocks: usize, n_obs: usize, n_pseudo: usize,
    ) -> ForecastResult<Self> {
        validate_nonzero("states", n_states)?;
        validate_nonzero("shocks", n_shocks)?;
        validate_nonzero("observables", n_obs)?;
        Ok(ForecastShape { n_states, n_shocks, n_obs, n_pseudo })
    }
}
