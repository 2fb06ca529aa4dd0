//! Initial states for forecasting, taken from filter or smoother output.
//!
//! Forecasts start from the terminal filtered state `s_{T|T}` of each
//! parameter draw. [`TerminalState`] abstracts over where that vector comes
//! from so the batch driver can accept either plain vectors or whole filtered
//! paths without copying them first.
use crate::forecast::{
    core::validation::{validate_finite, validate_nonzero},
    errors::ForecastResult,
};
use ndarray::{Array1, Array2};

/// Anything that can hand out the state vector a forecast starts from.
pub trait TerminalState {
    /// The state at the last filtered period.
    ///
    /// # Errors
    /// Implementations return a `ForecastError` when no terminal state exists
    /// (for example, an empty filtered path).
    fn terminal_state(&self) -> ForecastResult<Array1<f64>>;
}

/// A filtered state path `ns × T`, oldest period in column 0.
#[derive(Debug, Clone, PartialEq)]
pub struct FilteredStates {
    states: Array2<f64>,
}

impl FilteredStates {
    /// # Errors
    /// - `ForecastError::EmptyDimension` if the path has no state rows.
    /// - `ForecastError::NonFiniteInput` if any entry is NaN/±inf.
    pub fn new(states: Array2<f64>) -> ForecastResult<Self> {
        validate_nonzero("filtered state rows", states.nrows())?;
        validate_finite("filtered states", &states)?;
        Ok(FilteredStates { states })
    }

    pub fn n_states(&self) -> usize {
        self.states.nrows()
    }

    pub fn n_periods(&self) -> usize {
        self.states.ncols()
    }

    pub fn states(&self) -> &Array2<f64> {
        &self.states
    }
}

impl TerminalState for FilteredStates {
    /// Last column of the path.
    ///
    /// # Errors
    /// `ForecastError::EmptyDimension` if the path covers zero periods.
    fn terminal_state(&self) -> ForecastResult<Array1<f64>> {
        validate_nonzero("filtered periods", self.n_periods())?;
        Ok(self.states.column(self.n_periods() - 1).to_owned())
    }
}

impl TerminalState for Array1<f64> {
    fn terminal_state(&self) -> ForecastResult<Array1<f64>> {
        Ok(self.clone())
    }
}
