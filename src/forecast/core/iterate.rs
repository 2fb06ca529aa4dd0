//! One-period state transition with zero-lower-bound enforcement.
//!
//! Purpose
//! -------
//! Advance a state vector one period through `z_t = C + T z_{t-1} + R ε_t`
//! and, when a ZLB rule is active, rewrite the driving shock so that the
//! constrained observable `y_r = D[r] + Z[r,:] z_t` never ends below the floor.
//!
//! Key behaviors
//! -------------
//! - If the unconstrained `y_r` is at or above the floor, the period is
//!   accepted as is (no correction, bit-for-bit identical to an
//!   unconstrained run).
//! - Otherwise the driving shock `ε_t[s]` is zeroed, the state recomputed,
//!   and `ε_t[s]` solved in closed form from
//!   `floor = D[r] + Z[r,:](C + T z_{t-1} + R ε_t)`, which is linear in
//!   `ε_t[s]` with slope `Z[r,:]·R[:,s]`. The state is recomputed with the
//!   solved shock.
//! - The corrected `y_r` is checked against the floor, with the tolerance
//!   scaled by the size of the terms summed into `y_r`; a miss beyond it is [`ForecastError::ZlbNotEnforced`], a zero slope is
//!   [`ForecastError::ZlbUnsolvable`].
//!
//! Invariants & assumptions
//! ------------------------
//! - `z_prev` and `eps_t` have lengths `n_states` and `n_shocks` of the
//!   system; [`ZlbRule::validate`] has been run against the system.
//! - The step is pure: inputs are borrowed, and the returned
//!   [`StateStep`] owns fresh vectors.
//!
//! Conventions
//! -----------
//! - `t` in error payloads is the 1-based forecast period.
use crate::{
    forecast::{
        core::{options::ZlbSpec, system::StateSpaceSystem},
        errors::{ForecastError, ForecastResult},
    },
    numerics::LOADING_EPS,
};
use ndarray::{Array1, ArrayView1};

/// ZLB rule resolved for a run: a [`ZlbSpec`] plus the tolerance of the postcondition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZlbRule {
    pub ind_r: usize,
    pub ind_r_sh: usize,
    pub floor: f64,
    pub tolerance: f64,
}

impl ZlbRule {
    pub fn new(spec: ZlbSpec, tolerance: f64) -> ZlbRule {
        ZlbRule { ind_r: spec.ind_r, ind_r_sh: spec.ind_r_sh, floor: spec.floor, tolerance }
    }

    /// Check the configured indices against a system's dimensions.
    ///
    /// # Errors
    /// [`ForecastError::IndexOutOfRange`] for a constrained-observable index
    /// `>= n_obs` or a driving-shock index `>= n_shocks`.
    pub fn validate(&self, system: &StateSpaceSystem) -> ForecastResult<()> {
        let shape = system.shape();
        if self.ind_r >= shape.n_obs {
            return Err(ForecastError::IndexOutOfRange {
                what: "constrained observable",
                index: self.ind_r,
                len: shape.n_obs,
            });
        }
        if self.ind_r_sh >= shape.n_shocks {
            return Err(ForecastError::IndexOutOfRange {
                what: "ZLB driving shock",
                index: self.ind_r_sh,
                len: shape.n_shocks,
            });
        }
        Ok(())
    }

    /// Largest accepted `|y_r - floor|` after a correction, given the
    /// magnitude of the terms summed into `y_r`.
    fn band(&self, magnitude: f64) -> f64 {
        self.tolerance * magnitude.max(self.floor.abs()).max(1.0)
    }
}

/// Result of one transition step.
#[derive(Debug, Clone, PartialEq)]
pub struct StateStep {
    /// State `z_t`.
    pub state: Array1<f64>,
    /// Realized shocks `ε_t`, including any ZLB rewrite.
    pub shocks: Array1<f64>,
    /// Whether the ZLB correction fired this period.
    pub zlb_corrected: bool,
}

/// Unconstrained transition `C + T z_{t-1} + R ε_t`.
pub fn transition(
    system: &StateSpaceSystem, z_prev: ArrayView1<f64>, eps_t: ArrayView1<f64>,
) -> Array1<f64> {
    system.c() + &system.t().dot(&z_prev) + &system.r().dot(&eps_t)
}

/// Advance the state one period, correcting the driving shock if the ZLB binds.
///
/// Parameters
/// ----------
/// - `system`: `&StateSpaceSystem`
///   The draw's system matrices.
/// - `z_prev`: `ArrayView1<f64>`
///   State at `t − 1`.
/// - `eps_t`: `ArrayView1<f64>`
///   Shocks for period `t` before any correction.
/// - `zlb`: `Option<&ZlbRule>`
///   Active ZLB rule, or `None` for an unconstrained step.
/// - `t`: `usize`
///   1-based period, used only in error payloads.
///
/// Returns
/// -------
/// `ForecastResult<StateStep>`
///   The new state, the realized shocks, and whether the ZLB fired.
///
/// Errors
/// ------
/// - `ForecastError::ZlbUnsolvable` when `Z[r,:]·R[:,s]` is zero (relative
///   to the magnitudes of the row and column) or not finite.
/// - `ForecastError::ZlbNotEnforced` when the corrected observable differs
///   from the floor by more than
///   `tolerance · max(1, |floor|, |D[r]|, Σ_j |Z[r,j]·z_t[j]|)`.
///
/// Examples
/// --------
/// ```rust
/// # use ndarray::array;
/// # use statespace_forecast::forecast::core::{
/// #     iterate::{iterate_state, ZlbRule},
/// #     system::StateSpaceSystem,
/// # };
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
/// let rule = ZlbRule { ind_r: 0, ind_r_sh: 0, floor: 0.0, tolerance: 1e-8 };
/// let z0 = array![0.0, 0.0];
/// let eps = array![0.0];
/// let step = iterate_state(&system, z0.view(), eps.view(), Some(&rule), 1).unwrap();
/// assert!(step.zlb_corrected);
/// assert!((step.shocks[0] - 0.2).abs() < 1e-12);
/// ```
pub fn iterate_state(
    system: &StateSpaceSystem, z_prev: ArrayView1<f64>, eps_t: ArrayView1<f64>,
    zlb: Option<&ZlbRule>, t: usize,
) -> ForecastResult<StateStep> {
    let z_t = transition(system, z_prev, eps_t);
    let rule = match zlb {
        Some(rule) => rule,
        None => return Ok(StateStep { state: z_t, shocks: eps_t.to_owned(), zlb_corrected: false }),
    };

    let z_row = system.z().row(rule.ind_r);
    let d_r = system.d()[rule.ind_r];
    let y_r = d_r + z_row.dot(&z_t);
    if y_r >= rule.floor {
        return Ok(StateStep { state: z_t, shocks: eps_t.to_owned(), zlb_corrected: false });
    }

    let r_col = system.r().column(rule.ind_r_sh);
    let loading = z_row.dot(&r_col);
    let loading_scale = z_row.iter().map(|v| v.abs()).sum::<f64>()
        * r_col.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()));
    if !loading.is_finite() || loading.abs() <= LOADING_EPS * loading_scale.max(1.0) {
        return Err(ForecastError::ZlbUnsolvable { t, loading });
    }

    let mut eps_corrected = eps_t.to_owned();
    eps_corrected[rule.ind_r_sh] = 0.0;
    let z_no_policy = transition(system, z_prev, eps_corrected.view());
    eps_corrected[rule.ind_r_sh] = (rule.floor - d_r - z_row.dot(&z_no_policy)) / loading;
    let z_corrected = transition(system, z_prev, eps_corrected.view());

    let y_corrected = d_r + z_row.dot(&z_corrected);
    let magnitude = z_row
        .iter()
        .zip(z_corrected.iter())
        .map(|(loading, state)| (loading * state).abs())
        .sum::<f64>()
        .max(d_r.abs());
    if !y_corrected.is_finite() || (y_corrected - rule.floor).abs() > rule.band(magnitude) {
        return Err(ForecastError::ZlbNotEnforced { t, value: y_corrected, floor: rule.floor });
    }
    Ok(StateStep { state: z_corrected, shocks: eps_corrected, zlb_corrected: true })
}
