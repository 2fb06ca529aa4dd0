//! Single-draw forecast: shocks → states (with ZLB) → observables.
//!
//! Purpose
//! -------
//! Run the full forecast pipeline for one parameter draw. Shocks are either
//! supplied by the caller or generated from the draw's covariance, the state
//! is iterated forward `H` periods with optional ZLB enforcement, and the
//! resulting state path is mapped to observables and pseudo-observables.
//!
//! Key behaviors
//! -------------
//! - [`ForecastPlan`] resolves everything that is constant across draws (the
//!   horizon, the ZLB rule, the shock distribution) exactly once, so a batch
//!   does not redo configuration work per draw.
//! - [`forecast_one_draw`] is the per-draw worker shared by the batch driver;
//!   [`single_draw_forecast`] is the convenience entry point for one system.
//! - The returned shock matrix holds the *realized* shocks, i.e. the driving
//!   shock after any ZLB rewrite, so replaying it without a ZLB rule
//!   reproduces the constrained path.
//!
//! Invariants & assumptions
//! ------------------------
//! - A draw either returns complete paths of width `H` or an error; partial
//!   paths are never returned.
//! - Supplied shocks are read, never modified.
//!
//! Conventions
//! -----------
//! - ZLB corrections are reported at `debug` level on the logger passed in.
use crate::forecast::{
    core::{
        horizon::forecast_horizon,
        iterate::{ZlbRule, iterate_state},
        observe::map_observables,
        options::ForecastSettings,
        shocks::{AnticipatedShocks, ShockDist, generate_shocks},
        system::StateSpaceSystem,
        validation::{validate_initial_state, validate_shock_path},
    },
    errors::{ForecastError, ForecastResult},
};
use ndarray::{Array2, ArrayView1, ArrayView2};
use rand::Rng;
use slog::{Logger, debug};

/// Forecast paths of one draw.
///
/// Fields
/// ------
/// - `states`: `n_states × H` state path, column `t` is `z_{t+1}`.
/// - `obs`: `n_obs × H` observables.
/// - `pseudo`: `n_pseudo × H` pseudo-observables (`0 × H` without a pseudo equation).
/// - `shocks`: `n_shocks × H` realized shocks, after any ZLB correction.
/// - `zlb_corrections`: number of periods in which the ZLB correction fired.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastOutput {
    pub states: Array2<f64>,
    pub obs: Array2<f64>,
    pub pseudo: Array2<f64>,
    pub shocks: Array2<f64>,
    pub zlb_corrections: usize,
}

/// Per-run configuration resolved once and shared by all draws.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastPlan {
    horizon: usize,
    zlb: Option<ZlbRule>,
    shock_dist: ShockDist,
    anticipated: Option<AnticipatedShocks>,
}

impl ForecastPlan {
    /// Resolve the horizon and ZLB rule from run settings.
    ///
    /// # Errors
    /// - `ForecastError::InvalidHorizon` from [`forecast_horizon`].
    /// - `ForecastError::ZlbNotConfigured` if `enforce_zlb` is set but the
    ///   model settings carry no `ZlbSpec`.
    pub fn new(settings: &ForecastSettings) -> ForecastResult<Self> {
        let horizon = forecast_horizon(&settings.model, settings.cond_type)?;
        let zlb = if settings.enforce_zlb {
            let spec = settings.model.zlb.ok_or(ForecastError::ZlbNotConfigured)?;
            Some(ZlbRule::new(spec, settings.zlb_tolerance()))
        } else {
            None
        };
        Ok(ForecastPlan {
            horizon,
            zlb,
            shock_dist: settings.model.shock_dist,
            anticipated: settings.model.anticipated,
        })
    }

    pub fn horizon(&self) -> usize {
        self.horizon
    }

    pub fn zlb(&self) -> Option<&ZlbRule> {
        self.zlb.as_ref()
    }
}

/// Forecast one draw under a resolved plan.
///
/// Parameters
/// ----------
/// - `plan`: `&ForecastPlan`
///   Horizon, ZLB rule and shock distribution for the run.
/// - `system`: `&StateSpaceSystem`
///   The draw's system matrices.
/// - `z0`: `ArrayView1<f64>`
///   Initial state `s_{T|T}` (length `n_states`).
/// - `shocks`: `Option<ArrayView2<f64>>`
///   Caller-supplied `n_shocks × H` shock path; generated from `Q` when `None`.
/// - `rng`: `&mut R`
///   Entropy source for generated shocks; untouched when shocks are supplied.
/// - `log`: `&Logger`
///   Receives one `debug` record per ZLB correction.
///
/// Returns
/// -------
/// `ForecastResult<ForecastOutput>`
///
/// Errors
/// ------
/// - Dimension errors for `z0` or the supplied shock path.
/// - `IndexOutOfRange` if the ZLB indices do not fit the system.
/// - Any shock-generation error (covariance, Student-t setup).
/// - `ZlbUnsolvable` / `ZlbNotEnforced` from [`iterate_state`].
pub fn forecast_one_draw<R: Rng + ?Sized>(
    plan: &ForecastPlan, system: &StateSpaceSystem, z0: ArrayView1<f64>,
    shocks: Option<ArrayView2<f64>>, rng: &mut R, log: &Logger,
) -> ForecastResult<ForecastOutput> {
    let shape = system.shape();
    let horizon = plan.horizon;
    validate_initial_state(z0, shape.n_states)?;
    if let Some(rule) = &plan.zlb {
        rule.validate(system)?;
    }

    let mut realized = match shocks {
        Some(supplied) => {
            validate_shock_path(supplied, shape.n_shocks, horizon)?;
            supplied.to_owned()
        }
        None => generate_shocks(
            system.q(),
            horizon,
            &plan.shock_dist,
            plan.anticipated.as_ref(),
            rng,
        )?,
    };

    let mut states = Array2::zeros((shape.n_states, horizon));
    let mut z_prev = z0.to_owned();
    let mut zlb_corrections = 0;
    for t in 0..horizon {
        let step = iterate_state(system, z_prev.view(), realized.column(t), plan.zlb.as_ref(), t + 1)?;
        if let (true, Some(rule)) = (step.zlb_corrected, &plan.zlb) {
            zlb_corrections += 1;
            debug!(log, "ZLB correction";
                "period" => t + 1,
                "original_shock" => realized[[rule.ind_r_sh, t]],
                "corrected_shock" => step.shocks[rule.ind_r_sh]
            );
        }
        states.column_mut(t).assign(&step.state);
        realized.column_mut(t).assign(&step.shocks);
        z_prev = step.state;
    }

    let paths = map_observables(system, &states)?;
    Ok(ForecastOutput {
        states,
        obs: paths.obs,
        pseudo: paths.pseudo,
        shocks: realized,
        zlb_corrections,
    })
}

/// Forecast a single draw from run settings.
///
/// Resolves a [`ForecastPlan`] from `settings` and runs [`forecast_one_draw`]
/// with the settings' logger.
///
/// # Errors
/// Configuration errors from [`ForecastPlan::new`] and every per-draw error
/// of [`forecast_one_draw`].
///
/// # Examples
/// ```rust
/// # use ndarray::array;
/// # use rand::{SeedableRng, rngs::StdRng};
/// # use statespace_forecast::forecast::prelude::*;
/// let system = StateSpaceSystem::new(
///     array![[0.5]], array![[1.0]], array![0.0], array![[1.0]],
///     array![[1.0]], array![0.0], None,
/// ).unwrap();
/// let settings = ForecastSettings::new(ModelSettings::new(3).unwrap(), CondType::None, false);
/// let z0 = array![2.0];
/// let shocks = array![[0.0, 0.0, 0.0]];
/// let mut rng = StdRng::seed_from_u64(0);
/// let out = single_draw_forecast(&system, z0.view(), &settings, Some(shocks.view()), &mut rng)
///     .unwrap();
/// assert_eq!(out.obs, array![[1.0, 0.5, 0.25]]);
/// ```
pub fn single_draw_forecast<R: Rng + ?Sized>(
    system: &StateSpaceSystem, z0: ArrayView1<f64>, settings: &ForecastSettings,
    shocks: Option<ArrayView2<f64>>, rng: &mut R,
) -> ForecastResult<ForecastOutput> {
    let plan = ForecastPlan::new(settings)?;
    forecast_one_draw(&plan, system, z0, shocks, rng, &settings.logger())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forecast::core::{
        horizon::CondType,
        options::{ModelSettings, ZlbSpec},
    };
    use ndarray::array;
    use rand::{SeedableRng, rngs::StdRng};
    use slog::{Discard, o};

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Plan resolution (horizon, ZLB configuration errors).
    // - The zero-shock deterministic path and shock round-trip.
    // - Realized shocks after ZLB correction.
    // - Generated shocks being reproducible for a fixed seed.
    // -------------------------------------------------------------------------

    fn ar1_system() -> StateSpaceSystem {
        StateSpaceSystem::new(
            array![[0.5, 0.0], [0.0, 0.8]],
            array![[1.0, 0.0], [0.0, 1.0]],
            array![0.1, 0.0],
            array![[1.0, 0.0], [0.0, 1.0]],
            array![[1.0, 1.0]],
            array![0.0],
            None,
        )
        .unwrap()
    }

    fn discard() -> Logger {
        Logger::root(Discard, o!())
    }

    #[test]
    // Purpose
    // -------
    // The plan shortens conditional horizons and requires a ZlbSpec when the
    // ZLB is enforced.
    //
    // Given
    // -----
    // - 6 horizons, Semi conditioning; enforce_zlb with and without a ZlbSpec.
    //
    // Expect
    // ------
    // - Horizon 5 with a rule; `ZlbNotConfigured` without one.
    fn forecast_plan_resolves_horizon_and_zlb() {
        // Arrange
        let model = ModelSettings::new(6).unwrap();
        let with_spec = model.clone().with_zlb(ZlbSpec::new(0, 0, 0.0).unwrap());

        // Act
        let plan = ForecastPlan::new(&ForecastSettings::new(with_spec, CondType::Semi, true)).unwrap();
        let missing = ForecastPlan::new(&ForecastSettings::new(model, CondType::None, true));

        // Assert
        assert_eq!(plan.horizon(), 5);
        assert!(plan.zlb().is_some());
        assert_eq!(missing, Err(ForecastError::ZlbNotConfigured));
    }

    #[test]
    // Purpose
    // -------
    // With zero shocks the forecast is the deterministic recursion
    // z_t = C + T z_{t-1}.
    //
    // Given
    // -----
    // - z0 = [1, 1], zero shocks over 3 periods.
    //
    // Expect
    // ------
    // - States [0.6, 0.8], [0.4, 0.64], [0.3, 0.512]; obs their sums.
    fn forecast_one_draw_zero_shocks_is_deterministic() {
        // Arrange
        let system = ar1_system();
        let settings = ForecastSettings::new(ModelSettings::new(3).unwrap(), CondType::None, false);
        let plan = ForecastPlan::new(&settings).unwrap();
        let z0 = array![1.0, 1.0];
        let shocks = Array2::zeros((2, 3));
        let mut rng = StdRng::seed_from_u64(1);

        // Act
        let out =
            forecast_one_draw(&plan, &system, z0.view(), Some(shocks.view()), &mut rng, &discard())
                .unwrap();

        // Assert
        let expected = array![[0.6, 0.4, 0.3], [0.8, 0.64, 0.512]];
        for (a, b) in out.states.iter().zip(expected.iter()) {
            assert!((a - b).abs() < 1e-12);
        }
        for t in 0..3 {
            assert!((out.obs[[0, t]] - expected.column(t).sum()).abs() < 1e-12);
        }
        assert_eq!(out.shocks, shocks);
        assert_eq!(out.zlb_corrections, 0);
        assert_eq!(out.pseudo.dim(), (0, 3));
    }

    #[test]
    // Purpose
    // -------
    // Realized shocks report the corrected driving shock, and replaying them
    // without a ZLB rule reproduces the constrained path.
    //
    // Given
    // -----
    // - Floor 0.5 on y = z_1 + z_2, driven by shock 0, from z0 = 0.
    //
    // Expect
    // ------
    // - Every period lands on the floor; replay matches states exactly.
    fn forecast_one_draw_realized_shocks_replay_constrained_path() {
        // Arrange
        let system = ar1_system();
        let model = ModelSettings::new(4).unwrap().with_zlb(ZlbSpec::new(0, 0, 0.5).unwrap());
        let constrained = ForecastPlan::new(&ForecastSettings::new(model.clone(), CondType::None, true)).unwrap();
        let free = ForecastPlan::new(&ForecastSettings::new(model, CondType::None, false)).unwrap();
        let z0 = array![0.0, 0.0];
        let shocks = array![[-0.1, 0.2, -0.3, 0.0], [0.0, 0.1, -0.2, 0.0]];
        let mut rng = StdRng::seed_from_u64(2);

        // Act
        let out = forecast_one_draw(&constrained, &system, z0.view(), Some(shocks.view()), &mut rng, &discard())
            .unwrap();
        let replay = forecast_one_draw(&free, &system, z0.view(), Some(out.shocks.view()), &mut rng, &discard())
            .unwrap();

        // Assert
        assert!(out.zlb_corrections > 0);
        for &y in out.obs.iter() {
            assert!(y >= 0.5 - 1e-8);
        }
        for (a, b) in out.states.iter().zip(replay.states.iter()) {
            assert!((a - b).abs() < 1e-12);
        }
        assert_eq!(out.shocks.row(1), shocks.row(1));
    }

    #[test]
    // Purpose
    // -------
    // Generated shocks depend only on the seed.
    //
    // Given
    // -----
    // - Two runs with StdRng seeded 11 and one seeded 12.
    //
    // Expect
    // ------
    // - Identical outputs for equal seeds, different outputs otherwise.
    fn single_draw_forecast_generated_shocks_follow_seed() {
        // Arrange
        let system = ar1_system();
        let settings = ForecastSettings::new(ModelSettings::new(5).unwrap(), CondType::None, false);
        let z0 = array![0.0, 0.0];

        // Act
        let a = single_draw_forecast(&system, z0.view(), &settings, None, &mut StdRng::seed_from_u64(11)).unwrap();
        let b = single_draw_forecast(&system, z0.view(), &settings, None, &mut StdRng::seed_from_u64(11)).unwrap();
        let c = single_draw_forecast(&system, z0.view(), &settings, None, &mut StdRng::seed_from_u64(12)).unwrap();

        // Assert
        assert_eq!(a, b);
        assert_ne!(a.shocks, c.shocks);
    }

    #[test]
    // Purpose
    // -------
    // Malformed inputs surface as dimension errors before any iteration.
    //
    // Given
    // -----
    // - A 3-element z0, then a 2 × 2 shock path for a 3-period horizon.
    //
    // Expect
    // ------
    // - `initial state` and `shock columns` dimension mismatches.
    fn single_draw_forecast_rejects_bad_inputs() {
        // Arrange
        let system = ar1_system();
        let settings = ForecastSettings::new(ModelSettings::new(3).unwrap(), CondType::None, false);
        let mut rng = StdRng::seed_from_u64(3);
        let bad_z0 = array![0.0, 0.0, 0.0];
        let z0 = array![0.0, 0.0];
        let short = Array2::zeros((2, 2));

        // Act
        let bad_state = single_draw_forecast(&system, bad_z0.view(), &settings, None, &mut rng);
        let bad_shocks = single_draw_forecast(&system, z0.view(), &settings, Some(short.view()), &mut rng);

        // Assert
        assert_eq!(
            bad_state,
            Err(ForecastError::DimensionMismatch { what: "initial state", expected: 2, actual: 3 })
        );
        assert_eq!(
            bad_shocks,
            Err(ForecastError::DimensionMismatch { what: "shock columns", expected: 3, actual: 2 })
        );
    }
}
