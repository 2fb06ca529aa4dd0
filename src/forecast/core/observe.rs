//! Map simulated state paths to observables and pseudo-observables.
use crate::forecast::{
    core::{system::StateSpaceSystem, validation::validate_dim},
    errors::ForecastResult,
};
use ndarray::{Array1, Array2, Axis};

/// Observable and pseudo-observable paths for one draw.
///
/// `obs` is `n_obs × H`; `pseudo` is `n_pseudo × H`, or `0 × H` when the
/// system carries no pseudo-measurement equation.
#[derive(Debug, Clone, PartialEq)]
pub struct ObservablePaths {
    pub obs: Array2<f64>,
    pub pseudo: Array2<f64>,
}

/// Apply `y = D + Z z` and `p = D_pseudo + Z_pseudo z` to every column of `states`.
///
/// # Errors
/// [`ForecastError::DimensionMismatch`] if `states` does not have `n_states`
/// rows.
///
/// [`ForecastError::DimensionMismatch`]: crate::forecast::errors::ForecastError::DimensionMismatch
pub fn map_observables(
    system: &StateSpaceSystem, states: &Array2<f64>,
) -> ForecastResult<ObservablePaths> {
    validate_dim("state rows", system.shape().n_states, states.nrows())?;
    let horizon = states.ncols();

    let obs = add_offset(system.z().dot(states), system.d());
    let pseudo = match system.pseudo() {
        Some(pseudo) => add_offset(pseudo.z_pseudo.dot(states), &pseudo.d_pseudo),
        None => Array2::zeros((0, horizon)),
    };
    Ok(ObservablePaths { obs, pseudo })
}

fn add_offset(mut loadings: Array2<f64>, offset: &Array1<f64>) -> Array2<f64> {
    let offset_col = offset.view().insert_axis(Axis(1));
    loadings += &offset_col;
    loadings
}
