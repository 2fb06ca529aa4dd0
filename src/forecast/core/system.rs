//! State-space system matrices for one parameter draw.
//!
//! Purpose
//! -------
//! Hold the transition, measurement, and optional pseudo-measurement matrices
//! of a linear state-space model in validated, immutable form:
//!
//! - transition:          `z_t = C + T z_{t-1} + R ε_t`,  `ε_t ~ (0, Q)`
//! - measurement:         `y_t = D + Z z_t`
//! - pseudo-measurement:  `p_t = D_pseudo + Z_pseudo z_t`
//!
//! Key behaviors
//! -------------
//! - [`StateSpaceSystem::new`] checks every matrix against the dimensions
//!   implied by `T`, `R`, and `Z` and rejects non-finite entries, so the
//!   iteration and observation code can index without re-checking.
//! - A [`PseudoMeasurement`] with zero rows is normalized to "absent".
//!
//! Invariants & assumptions
//! ------------------------
//! - Systems are built upstream (estimation is out of scope) and are
//!   read-only here; nothing in the forecast stack mutates them.
//! - `Q` is only checked for shape here. Symmetry and semi-definiteness are
//!   checked when a shock sampler needs its square root, since a caller that
//!   supplies its own shocks never needs `Q` to be decomposable.
use crate::forecast::{
    core::{
        shape::ForecastShape,
        validation::{validate_dim, validate_finite},
    },
    errors::ForecastResult,
};
use ndarray::{Array1, Array2};

/// Pseudo-measurement equation `p_t = D_pseudo + Z_pseudo z_t`.
#[derive(Debug, Clone, PartialEq)]
pub struct PseudoMeasurement {
    /// Loadings of pseudo-observables on states (`n_pseudo × n_states`).
    pub z_pseudo: Array2<f64>,
    /// Pseudo-observable offsets (`n_pseudo`).
    pub d_pseudo: Array1<f64>,
}

impl PseudoMeasurement {
    /// Pair pseudo-measurement matrices, checking that their row counts agree.
    ///
    /// # Errors
    /// - `DimensionMismatch` if `d_pseudo.len() != z_pseudo.nrows()`.
    /// - `NonFiniteInput` if either holds NaN/±inf.
    pub fn new(z_pseudo: Array2<f64>, d_pseudo: Array1<f64>) -> ForecastResult<Self> {
        validate_dim("pseudo offset D_pseudo", z_pseudo.nrows(), d_pseudo.len())?;
        validate_finite("pseudo loadings Z_pseudo", &z_pseudo)?;
        validate_finite("pseudo offset D_pseudo", &d_pseudo)?;
        Ok(PseudoMeasurement { z_pseudo, d_pseudo })
    }

    /// Number of pseudo-observables.
    pub fn n_pseudo(&self) -> usize {
        self.z_pseudo.nrows()
    }
}

/// StateSpaceSystem — validated matrices of one draw's state-space model.
///
/// Fields
/// ------
/// - `t`: `Array2<f64>` transition matrix (`n_states × n_states`).
/// - `r`: `Array2<f64>` shock impact matrix (`n_states × n_shocks`).
/// - `c`: `Array1<f64>` state constant (`n_states`).
/// - `q`: `Array2<f64>` shock covariance (`n_shocks × n_shocks`).
/// - `z`: `Array2<f64>` measurement loadings (`n_obs × n_states`).
/// - `d`: `Array1<f64>` measurement constant (`n_obs`).
/// - `pseudo`: `Option<PseudoMeasurement>`; `None` when the model defines
///   no pseudo-observables (or defines zero of them).
///
/// Fields are private so that a constructed system is always consistent;
/// use the accessors to read them.
#[derive(Debug, Clone, PartialEq)]
pub struct StateSpaceSystem {
    t: Array2<f64>,
    r: Array2<f64>,
    c: Array1<f64>,
    q: Array2<f64>,
    z: Array2<f64>,
    d: Array1<f64>,
    pseudo: Option<PseudoMeasurement>,
    shape: ForecastShape,
}

impl StateSpaceSystem {
    /// Construct a [`StateSpaceSystem`] and validate all cross-matrix shapes.
    ///
    /// Parameters
    /// ----------
    /// - `t`, `r`, `c`: transition-equation matrices.
    /// - `q`: shock covariance.
    /// - `z`, `d`: measurement-equation matrices.
    /// - `pseudo`: optional pseudo-measurement equation.
    ///
    /// Returns
    /// -------
    /// `ForecastResult<StateSpaceSystem>`
    ///   A system whose dimensions are recorded in [`ForecastShape`].
    ///
    /// Errors
    /// ------
    /// - `EmptyDimension` if there are no states, shocks, or observables.
    /// - `DimensionMismatch` naming the first matrix whose shape disagrees
    ///   with `n_states = t.nrows()`, `n_shocks = r.ncols()`, or
    ///   `n_obs = z.nrows()`.
    /// - `NonFiniteInput` naming the first matrix holding NaN/±inf.
    ///
    /// Examples
    /// --------
    /// ```rust
    /// # use ndarray::array;
    /// # use statespace_forecast::forecast::core::system::StateSpaceSystem;
    /// let system = StateSpaceSystem::new(
    ///     array![[0.9, 0.0], [0.0, 0.5]],
    ///     array![[1.0], [0.0]],
    ///     array![0.0, 0.0],
    ///     array![[1.0]],
    ///     array![[1.0, 0.0]],
    ///     array![-0.2],
    ///     None,
    /// )
    /// .unwrap();
    /// assert_eq!(system.shape().n_states, 2);
    /// assert_eq!(system.shape().n_pseudo, 0);
    /// ```
    pub fn new(
        t: Array2<f64>, r: Array2<f64>, c: Array1<f64>, q: Array2<f64>, z: Array2<f64>,
        d: Array1<f64>, pseudo: Option<PseudoMeasurement>,
    ) -> ForecastResult<Self> {
        let n_states = t.nrows();
        let n_shocks = r.ncols();
        let n_obs = z.nrows();
        let pseudo = pseudo.filter(|p| p.n_pseudo() > 0);
        let n_pseudo = pseudo.as_ref().map_or(0, PseudoMeasurement::n_pseudo);
        let shape = ForecastShape::new(n_states, n_shocks, n_obs, n_pseudo)?;

        validate_dim("transition T columns", n_states, t.ncols())?;
        validate_dim("shock impact R rows", n_states, r.nrows())?;
        validate_dim("state constant C", n_states, c.len())?;
        validate_dim("shock covariance Q rows", n_shocks, q.nrows())?;
        validate_dim("shock covariance Q columns", n_shocks, q.ncols())?;
        validate_dim("measurement Z columns", n_states, z.ncols())?;
        validate_dim("measurement offset D", n_obs, d.len())?;
        if let Some(p) = &pseudo {
            validate_dim("pseudo loadings Z_pseudo columns", n_states, p.z_pseudo.ncols())?;
        }

        validate_finite("transition T", &t)?;
        validate_finite("shock impact R", &r)?;
        validate_finite("state constant C", &c)?;
        validate_finite("shock covariance Q", &q)?;
        validate_finite("measurement Z", &z)?;
        validate_finite("measurement offset D", &d)?;

        Ok(StateSpaceSystem { t, r, c, q, z, d, pseudo, shape })
    }

    pub fn shape(&self) -> ForecastShape {
        self.shape
    }

    pub fn t(&self) -> &Array2<f64> {
        &self.t
    }

    pub fn r(&self) -> &Array2<f64> {
        &self.r
    }

    pub fn c(&self) -> &Array1<f64> {
        &self.c
    }

    pub fn q(&self) -> &Array2<f64> {
        &self.q
    }

    pub fn z(&self) -> &Array2<f64> {
        &self.z
    }

    pub fn d(&self) -> &Array1<f64> {
        &self.d
    }

    pub fn pseudo(&self) -> Option<&PseudoMeasurement> {
        self.pseudo.as_ref()
    }
}
