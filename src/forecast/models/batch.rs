//! Batch forecasting across parameter draws.
//!
//! Purpose
//! -------
//! Run [`forecast_one_draw`] for every draw of a posterior sample and stack
//! the results into `draws × variables × H` tensors.
//!
//! Key behaviors
//! -------------
//! - The horizon and ZLB rule are resolved once per batch ([`ForecastPlan`]).
//! - Draw `i` samples its shocks from a `StdRng` seeded with
//!   `settings.seed.wrapping_add(i)`, so a batch is reproducible and its
//!   results do not depend on whether draws run sequentially or on the
//!   `rayon` pool (`parallel` feature).
//! - Each draw fills a local [`ForecastOutput`]; results are copied into the
//!   output tensors in draw order afterwards.
//! - Failures follow [`DrawFailurePolicy`]: `Abort` returns the first failing
//!   draw (in draw order) as `ForecastError::DrawFailed`; `Skip` fills the
//!   draw's slices with NaN and records it in
//!   [`BatchForecastOutput::failures`].
//!
//! Invariants & assumptions
//! ------------------------
//! - All systems in a batch share `(n_states, n_shocks, n_obs, n_pseudo)`.
//! - Supplied shock tensors are `draws × n_shocks × H`.
//!
//! Conventions
//! -----------
//! - Logs batch start and completion at `info`, skipped draws at `warn`, and
//!   the aborting draw at `error`. Per-period ZLB corrections are logged at
//!   `debug` by the per-draw worker with a `draw` key attached.
use crate::forecast::{
    core::{
        filtered::TerminalState, options::DrawFailurePolicy, options::ForecastSettings,
        system::StateSpaceSystem, validation::validate_dim,
    },
    errors::{ForecastError, ForecastResult},
    models::single::{ForecastOutput, ForecastPlan, forecast_one_draw},
};
use ndarray::{Array1, Array3, ArrayView3, Axis};
use rand::{SeedableRng, rngs::StdRng};
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use slog::{error, info, o, warn};

/// A draw that failed under [`DrawFailurePolicy::Skip`].
#[derive(Debug, Clone, PartialEq)]
pub struct DrawFailure {
    pub draw: usize,
    pub error: ForecastError,
}

/// Stacked forecasts of a batch.
///
/// Fields
/// ------
/// - `states`: `draws × n_states × H`.
/// - `obs`: `draws × n_obs × H`.
/// - `pseudo`: `draws × n_pseudo × H` (middle axis empty without pseudo-observables).
/// - `shocks`: `draws × n_shocks × H`, realized shocks after ZLB correction.
/// - `failures`: draws skipped under [`DrawFailurePolicy::Skip`], in draw
///   order; their slices are NaN. Always empty under `Abort`.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchForecastOutput {
    pub states: Array3<f64>,
    pub obs: Array3<f64>,
    pub pseudo: Array3<f64>,
    pub shocks: Array3<f64>,
    pub failures: Vec<DrawFailure>,
}

impl BatchForecastOutput {
    pub fn n_draws(&self) -> usize {
        self.states.len_of(Axis(0))
    }

    pub fn horizon(&self) -> usize {
        self.states.len_of(Axis(2))
    }

    /// True when every draw produced a forecast.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Forecast every draw with generated shocks.
///
/// Parameters
/// ----------
/// - `systems`: `&[StateSpaceSystem]`
///   One system per draw, all with the same dimensions.
/// - `initial_states`: `&[Array1<f64>]`
///   One initial state `s_{T|T}` per draw.
/// - `settings`: `&ForecastSettings`
///
/// Errors
/// ------
/// - `EmptyBatch` for zero draws; `DimensionMismatch` when counts or system
///   dimensions disagree across draws.
/// - `InvalidHorizon` / `ZlbNotConfigured` from plan resolution.
/// - `DrawFailed { draw, source }` for the first failing draw under
///   `DrawFailurePolicy::Abort`.
pub fn batch_forecast(
    systems: &[StateSpaceSystem], initial_states: &[Array1<f64>], settings: &ForecastSettings,
) -> ForecastResult<BatchForecastOutput> {
    run_batch(systems, initial_states, settings, None, PARALLEL)
}

/// Forecast every draw with caller-supplied shocks (`draws × n_shocks × H`).
///
/// # Errors
/// As [`batch_forecast`], plus `DimensionMismatch` when the shock tensor
/// does not have one `n_shocks × H` slice per draw.
pub fn batch_forecast_with_shocks(
    systems: &[StateSpaceSystem], initial_states: &[Array1<f64>], settings: &ForecastSettings,
    shocks: &Array3<f64>,
) -> ForecastResult<BatchForecastOutput> {
    run_batch(systems, initial_states, settings, Some(shocks.view()), PARALLEL)
}

/// Forecast every draw starting from the terminal state of its filter output.
///
/// A draw whose filter output has no terminal state fails like any other
/// draw and is handled by the configured [`DrawFailurePolicy`].
///
/// # Errors
/// As [`batch_forecast_with_shocks`] when `shocks` is supplied, otherwise as
/// [`batch_forecast`].
pub fn batch_forecast_from_filtered<S: TerminalState + Sync>(
    systems: &[StateSpaceSystem], filtered: &[S], settings: &ForecastSettings,
    shocks: Option<&Array3<f64>>,
) -> ForecastResult<BatchForecastOutput> {
    run_batch(systems, filtered, settings, shocks.map(|s| s.view()), PARALLEL)
}

/// Whether batch drivers fan draws out on the rayon pool.
const PARALLEL: bool = cfg!(feature = "parallel");

fn run_batch<S: TerminalState + Sync>(
    systems: &[StateSpaceSystem], initial: &[S], settings: &ForecastSettings,
    shocks: Option<ArrayView3<f64>>, parallel: bool,
) -> ForecastResult<BatchForecastOutput> {
    let n_draws = systems.len();
    let shape = systems.first().ok_or(ForecastError::EmptyBatch)?.shape();
    validate_dim("initial states", n_draws, initial.len())?;
    for system in &systems[1..] {
        let other = system.shape();
        validate_dim("states per draw", shape.n_states, other.n_states)?;
        validate_dim("shocks per draw", shape.n_shocks, other.n_shocks)?;
        validate_dim("observables per draw", shape.n_obs, other.n_obs)?;
        validate_dim("pseudo-observables per draw", shape.n_pseudo, other.n_pseudo)?;
    }

    let plan = ForecastPlan::new(settings)?;
    let horizon = plan.horizon();
    if let Some(tensor) = &shocks {
        let (draws, rows, cols) = tensor.dim();
        validate_dim("shock draws", n_draws, draws)?;
        validate_dim("shock rows", shape.n_shocks, rows)?;
        validate_dim("shock columns", horizon, cols)?;
    }

    let log = settings.logger().new(o!("component" => "batch_forecast"));
    info!(log, "starting batch forecast";
        "draws" => n_draws,
        "horizon" => horizon,
        "cond_type" => ?settings.cond_type,
        "enforce_zlb" => settings.enforce_zlb
    );

    let run_draw = |draw: usize| -> ForecastResult<ForecastOutput> {
        let z0 = initial[draw].terminal_state()?;
        let mut rng = StdRng::seed_from_u64(settings.seed.wrapping_add(draw as u64));
        let draw_shocks = shocks.map(|tensor| tensor.index_axis_move(Axis(0), draw));
        let draw_log = log.new(o!("draw" => draw));
        forecast_one_draw(&plan, &systems[draw], z0.view(), draw_shocks, &mut rng, &draw_log)
    };

    let results = collect_draws(n_draws, parallel, run_draw);

    let mut out = BatchForecastOutput {
        states: Array3::zeros((n_draws, shape.n_states, horizon)),
        obs: Array3::zeros((n_draws, shape.n_obs, horizon)),
        pseudo: Array3::zeros((n_draws, shape.n_pseudo, horizon)),
        shocks: Array3::zeros((n_draws, shape.n_shocks, horizon)),
        failures: Vec::new(),
    };
    for (draw, result) in results.into_iter().enumerate() {
        match (result, settings.failure_policy) {
            (Ok(forecast), _) => {
                out.states.index_axis_mut(Axis(0), draw).assign(&forecast.states);
                out.obs.index_axis_mut(Axis(0), draw).assign(&forecast.obs);
                out.pseudo.index_axis_mut(Axis(0), draw).assign(&forecast.pseudo);
                out.shocks.index_axis_mut(Axis(0), draw).assign(&forecast.shocks);
            }
            (Err(err), DrawFailurePolicy::Abort) => {
                error!(log, "draw failed; aborting batch"; "draw" => draw, "error" => %err);
                return Err(err.in_draw(draw));
            }
            (Err(err), DrawFailurePolicy::Skip) => {
                warn!(log, "draw failed; skipping"; "draw" => draw, "error" => %err);
                out.states.index_axis_mut(Axis(0), draw).fill(f64::NAN);
                out.obs.index_axis_mut(Axis(0), draw).fill(f64::NAN);
                out.pseudo.index_axis_mut(Axis(0), draw).fill(f64::NAN);
                out.shocks.index_axis_mut(Axis(0), draw).fill(f64::NAN);
                out.failures.push(DrawFailure { draw, error: err });
            }
        }
    }

    info!(log, "finished batch forecast"; "draws" => n_draws, "failed" => out.failures.len());
    Ok(out)
}

/// Run `run_draw` for draws `0..n_draws` and return the results in draw order.
///
/// With `parallel` set, draws run on the rayon pool; otherwise sequentially.
#[cfg(feature = "parallel")]
fn collect_draws<T, F>(n_draws: usize, parallel: bool, run_draw: F) -> Vec<T>
where
    T: Send,
    F: Fn(usize) -> T + Sync + Send,
{
    if parallel {
        (0..n_draws).into_par_iter().map(run_draw).collect()
    } else {
        (0..n_draws).map(run_draw).collect()
    }
}

/// Run `run_draw` for draws `0..n_draws` in order; `parallel` is ignored
/// without the `parallel` feature.
#[cfg(not(feature = "parallel"))]
fn collect_draws<T, F>(n_draws: usize, _parallel: bool, run_draw: F) -> Vec<T>
where
    T: Send,
    F: Fn(usize) -> T + Sync + Send,
{
    (0..n_draws).map(run_draw).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forecast::core::{
        filtered::FilteredStates,
        horizon::CondType,
        options::{ModelSettings, ZlbSpec},
    };
    use ndarray::{Array2, array, s};

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Batch-level shape validation (empty batch, count and shape mismatches).
    // - Abort versus Skip failure handling.
    // - Reproducibility of generated shocks across calls, and identical
    //   results from sequential and parallel execution.
    // - Starting states taken from filtered paths.
    // -------------------------------------------------------------------------

    fn system(d: f64, r: Array2<f64>) -> StateSpaceSystem {
        StateSpaceSystem::new(
            array![[0.9, 0.0], [0.0, 0.5]],
            r,
            array![0.0, 0.0],
            array![[1.0]],
            array![[1.0, 0.0]],
            array![d],
            None,
        )
        .unwrap()
    }

    fn zlb_settings(policy: DrawFailurePolicy) -> ForecastSettings {
        let model = ModelSettings::new(3).unwrap().with_zlb(ZlbSpec::new(0, 0, 0.0).unwrap());
        ForecastSettings::new(model, CondType::None, true).with_failure_policy(policy)
    }

    #[test]
    // Purpose
    // -------
    // Inconsistent batch inputs are rejected before any draw runs.
    //
    // Given
    // -----
    // - No systems; two systems with one initial state; a shock tensor with
    //   the wrong horizon.
    //
    // Expect
    // ------
    // - EmptyBatch, then DimensionMismatch for "initial states" and
    //   "shock columns".
    fn run_batch_rejects_inconsistent_inputs() {
        // Arrange
        let settings = ForecastSettings::new(ModelSettings::new(3).unwrap(), CondType::None, false);
        let systems = vec![system(0.0, array![[1.0], [0.0]]), system(0.0, array![[1.0], [0.0]])];
        let z0s = vec![array![0.0, 0.0], array![0.0, 0.0]];
        let bad_shocks = Array3::zeros((2, 1, 4));

        // Act + Assert
        assert_eq!(batch_forecast(&[], &[], &settings), Err(ForecastError::EmptyBatch));
        assert_eq!(
            batch_forecast(&systems, &z0s[..1], &settings),
            Err(ForecastError::DimensionMismatch { what: "initial states", expected: 2, actual: 1 })
        );
        assert_eq!(
            batch_forecast_with_shocks(&systems, &z0s, &settings, &bad_shocks),
            Err(ForecastError::DimensionMismatch { what: "shock columns", expected: 3, actual: 4 })
        );
    }

    #[test]
    // Purpose
    // -------
    // Under Abort the first failing draw is returned with its index; under
    // Skip its slices are NaN and the other draws are intact.
    //
    // Given
    // -----
    // - Draw 0 solvable; draw 1 has R = [[0], [1]] so the ZLB is unsolvable
    //   once the floor binds (D = -0.2).
    //
    // Expect
    // ------
    // - Abort: DrawFailed { draw: 1, source: ZlbUnsolvable { t: 1, .. } }.
    // - Skip: one failure for draw 1, NaN slices there, finite draw 0.
    fn run_batch_failure_policy_abort_and_skip() {
        // Arrange
        let systems = vec![system(-0.2, array![[1.0], [0.0]]), system(-0.2, array![[0.0], [1.0]])];
        let z0s = vec![array![0.0, 0.0], array![0.0, 0.0]];
        let shocks = Array3::zeros((2, 1, 3));

        // Act
        let aborted =
            batch_forecast_with_shocks(&systems, &z0s, &zlb_settings(DrawFailurePolicy::Abort), &shocks);
        let skipped =
            batch_forecast_with_shocks(&systems, &z0s, &zlb_settings(DrawFailurePolicy::Skip), &shocks)
                .unwrap();

        // Assert
        match aborted {
            Err(ForecastError::DrawFailed { draw, source }) => {
                assert_eq!(draw, 1);
                assert!(matches!(*source, ForecastError::ZlbUnsolvable { t: 1, .. }));
            }
            other => panic!("expected DrawFailed, got {other:?}"),
        }
        assert!(!skipped.is_complete());
        assert_eq!(skipped.failures.len(), 1);
        assert_eq!(skipped.failures[0].draw, 1);
        assert!(skipped.failures[0].error.is_zlb_failure());
        assert!(skipped.states.slice(s![1, .., ..]).iter().all(|v| v.is_nan()));
        assert!(skipped.obs.slice(s![0, .., ..]).iter().all(|v| v.abs() < 1e-12));
    }

    #[test]
    // Purpose
    // -------
    // Generated shocks are reproducible for a fixed seed and differ across
    // draws.
    //
    // Given
    // -----
    // - Three identical systems, seed 7, two calls.
    //
    // Expect
    // ------
    // - Identical outputs; draw 0 and draw 1 shocks differ.
    fn batch_forecast_is_reproducible_per_seed() {
        // Arrange
        let systems = vec![system(0.0, array![[1.0], [0.0]]); 3];
        let z0s = vec![array![0.0, 0.0]; 3];
        let settings =
            ForecastSettings::new(ModelSettings::new(4).unwrap(), CondType::None, false).with_seed(7);

        // Act
        let first = batch_forecast(&systems, &z0s, &settings).unwrap();
        let second = batch_forecast(&systems, &z0s, &settings).unwrap();

        // Assert
        assert_eq!(first, second);
        assert_eq!((first.n_draws(), first.horizon()), (3, 4));
        assert_ne!(first.shocks.slice(s![0, .., ..]), first.shocks.slice(s![1, .., ..]));
    }

    #[test]
    // Purpose
    // -------
    // Filter output supplies the starting state, and an empty filtered path
    // is a per-draw failure.
    //
    // Given
    // -----
    // - Draw 0 ends at [1, 2]; draw 1 has zero periods; zero shocks; Skip.
    //
    // Expect
    // ------
    // - Draw 0 first-period state [0.9, 1.0]; draw 1 recorded as failed.
    fn batch_forecast_from_filtered_uses_terminal_state() {
        // Arrange
        let systems = vec![system(0.0, array![[1.0], [0.0]]); 2];
        let filtered = vec![
            FilteredStates::new(array![[0.0, 1.0], [0.0, 2.0]]).unwrap(),
            FilteredStates::new(Array2::zeros((2, 0))).unwrap(),
        ];
        let settings = ForecastSettings::new(ModelSettings::new(2).unwrap(), CondType::None, false)
            .with_failure_policy(DrawFailurePolicy::Skip);
        let shocks = Array3::zeros((2, 1, 2));

        // Act
        let out = batch_forecast_from_filtered(&systems, &filtered, &settings, Some(&shocks)).unwrap();

        // Assert
        assert!((out.states[[0, 0, 0]] - 0.9).abs() < 1e-12);
        assert!((out.states[[0, 1, 0]] - 1.0).abs() < 1e-12);
        assert_eq!(out.failures.len(), 1);
        assert_eq!(out.failures[0].draw, 1);
    }

    #[test]
    // Purpose
    // -------
    // Sequential and parallel execution produce bit-identical batches.
    //
    // Given
    // -----
    // - 16 draws with generated normal shocks, ZLB enforced on a binding
    //   floor, seed 31, run once sequentially and once in parallel.
    //
    // Expect
    // ------
    // - Equal `BatchForecastOutput`s, including realized shocks.
    fn run_batch_sequential_and_parallel_agree() {
        // Arrange
        let systems = vec![system(-0.2, array![[1.0], [0.0]]); 16];
        let z0s: Vec<Array1<f64>> = (0..16).map(|i| array![0.05 * i as f64, -0.1]).collect();
        let settings = zlb_settings(DrawFailurePolicy::Abort).with_seed(31);

        // Act
        let sequential = run_batch(&systems, &z0s, &settings, None, false).unwrap();
        let parallel = run_batch(&systems, &z0s, &settings, None, true).unwrap();

        // Assert
        assert!(sequential.is_complete());
        assert_eq!(sequential, parallel);
    }

    #[test]
    // Purpose
    // -------
    // The draw collector keeps draw order in both modes.
    //
    // Given
    // -----
    // - 100 draws mapping `i -> i * i`.
    //
    // Expect
    // ------
    // - Both modes return `[0, 1, 4, ..., 9801]`.
    fn collect_draws_preserves_draw_order() {
        // Arrange
        let expected: Vec<usize> = (0..100).map(|i| i * i).collect();

        // Act
        let sequential = collect_draws(100, false, |i| i * i);
        let parallel = collect_draws(100, true, |i| i * i);

        // Assert
        assert_eq!(sequential, expected);
        assert_eq!(parallel, expected);
    }
}
