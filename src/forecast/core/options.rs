//! Forecast options — model-level and run-level configuration.
//!
//! Purpose
//! -------
//! Collect every configuration value the forecast core reads, resolved to
//! plain integers, floats, and enums at construction time:
//!
//! - [`ModelSettings`]: what the model configuration says (forecast horizons,
//!   conditional periods, shock distribution, anticipated shock block, and the
//!   constrained observable / driving shock / floor for the ZLB).
//! - [`ForecastSettings`]: how a particular run is executed (conditioning
//!   type, whether to enforce the ZLB, its tolerance, RNG seed, failure
//!   policy, and logging).
//!
//! Key behaviors
//! -------------
//! - Indices such as "the nominal-rate observable" are stored as `usize`
//!   resolved once by whoever builds the settings; nothing here looks names up.
//! - Builders validate what can be validated without a system (tolerance,
//!   horizons, anticipated range ordering). Index-versus-dimension checks
//!   happen once per draw against that draw's [`StateSpaceSystem`].
//!
//! Conventions
//! -----------
//! - Plain data carriers, `Clone`, with `with_*` builders returning `Self`
//!   (or a result when validation is involved).
//! - `ForecastSettings::default_seed()` is 42, so runs are reproducible unless
//!   a caller opts into a different seed.
//!
//! [`StateSpaceSystem`]: crate::forecast::core::system::StateSpaceSystem
use crate::{
    forecast::{
        core::{
            horizon::CondType,
            shocks::{AnticipatedShocks, ShockDist},
        },
        errors::{ForecastError, ForecastResult},
    },
    logging::build_logger,
};
use slog::Logger;

/// Default relative tolerance of the post-correction ZLB check.
pub const DEFAULT_ZLB_TOLERANCE: f64 = 1e-8;

/// ZLB constraint: keep observable `ind_r` at or above `floor` using shock `ind_r_sh`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZlbSpec {
    /// Index of the constrained observable (e.g. the nominal policy rate).
    pub ind_r: usize,
    /// Index of the shock that drives it (e.g. the monetary policy shock).
    pub ind_r_sh: usize,
    /// Floor value in observable units.
    pub floor: f64,
}

impl ZlbSpec {
    /// # Errors
    /// [`ForecastError::NonFiniteInput`] if `floor` is NaN/±inf.
    pub fn new(ind_r: usize, ind_r_sh: usize, floor: f64) -> ForecastResult<Self> {
        if !floor.is_finite() {
            return Err(ForecastError::NonFiniteInput { what: "ZLB floor", index: 0 });
        }
        Ok(ZlbSpec { ind_r, ind_r_sh, floor })
    }
}

/// ModelSettings — model-configuration values read by the forecast core.
///
/// Fields
/// ------
/// - `forecast_horizons`: `usize`
///   Number of forecast periods for an unconditional run (> 0).
/// - `n_cond_periods`: `usize`
///   Periods covered by conditional data in `Semi`/`Full` runs (default 1).
/// - `shock_dist`: [`ShockDist`]
///   How shocks are generated when the caller does not supply them.
/// - `anticipated`: `Option<AnticipatedShocks>`
///   Block of anticipated-policy shocks zeroed in generated shock paths.
/// - `zlb`: `Option<ZlbSpec>`
///   The constrained observable, its driving shock, and the floor.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelSettings {
    pub forecast_horizons: usize,
    pub n_cond_periods: usize,
    pub shock_dist: ShockDist,
    pub anticipated: Option<AnticipatedShocks>,
    pub zlb: Option<ZlbSpec>,
}

impl ModelSettings {
    /// Settings with `forecast_horizons` periods, normal shocks, one
    /// conditional period, no anticipated shocks, and no ZLB constraint.
    ///
    /// # Errors
    /// [`ForecastError::EmptyDimension`] if `forecast_horizons == 0`.
    pub fn new(forecast_horizons: usize) -> ForecastResult<Self> {
        if forecast_horizons == 0 {
            return Err(ForecastError::EmptyDimension { what: "forecast horizons" });
        }
        Ok(ModelSettings {
            forecast_horizons,
            n_cond_periods: 1,
            shock_dist: ShockDist::Normal,
            anticipated: None,
            zlb: None,
        })
    }

    pub fn with_cond_periods(mut self, n_cond_periods: usize) -> Self {
        self.n_cond_periods = n_cond_periods;
        self
    }

    pub fn with_shock_dist(mut self, shock_dist: ShockDist) -> Self {
        self.shock_dist = shock_dist;
        self
    }

    pub fn with_anticipated(mut self, anticipated: AnticipatedShocks) -> Self {
        self.anticipated = Some(anticipated);
        self
    }

    pub fn with_zlb(mut self, zlb: ZlbSpec) -> Self {
        self.zlb = Some(zlb);
        self
    }
}

/// What the batch driver does when a single draw fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DrawFailurePolicy {
    /// Return the first failure (in draw order) as `ForecastError::DrawFailed`.
    #[default]
    Abort,
    /// Fill the failed draw's slices with NaN, record it, and keep going.
    Skip,
}

/// ForecastSettings — run-level configuration for single-draw and batch forecasts.
///
/// Purpose
/// -------
/// Bundle the model settings with the choices that vary per run, so that
/// public forecast entry points take one settings value instead of a list of
/// loosely related flags.
///
/// Fields
/// ------
/// - `model`: [`ModelSettings`].
/// - `cond_type`: [`CondType`], which fixes the horizon.
/// - `enforce_zlb`: `bool`; requires `model.zlb` to be set.
/// - `zlb_tolerance`: `f64`; relative tolerance of the post-correction check,
///   scaled by `max(1, |floor|, |D[r]|, Σ_j |Z[r,j]·z_t[j]|)`. Defaults to
///   [`DEFAULT_ZLB_TOLERANCE`].
/// - `seed`: `u64`; draw `i` samples shocks from a `StdRng` seeded with
///   `seed.wrapping_add(i)`.
/// - `failure_policy`: [`DrawFailurePolicy`].
/// - `verbose`: `bool`; when no logger is supplied, build a terminal logger
///   instead of discarding records.
///
/// Invariants
/// ----------
/// - `zlb_tolerance` is finite and > 0.
#[derive(Clone)]
pub struct ForecastSettings {
    pub model: ModelSettings,
    pub cond_type: CondType,
    pub enforce_zlb: bool,
    zlb_tolerance: f64,
    pub seed: u64,
    pub failure_policy: DrawFailurePolicy,
    pub verbose: bool,
    logger: Option<Logger>,
}

impl ForecastSettings {
    /// Run settings with default tolerance, seed 42, abort-on-failure, and
    /// logging disabled.
    pub fn new(model: ModelSettings, cond_type: CondType, enforce_zlb: bool) -> Self {
        ForecastSettings {
            model,
            cond_type,
            enforce_zlb,
            zlb_tolerance: DEFAULT_ZLB_TOLERANCE,
            seed: Self::default_seed(),
            failure_policy: DrawFailurePolicy::Abort,
            verbose: false,
            logger: None,
        }
    }

    pub const fn default_seed() -> u64 {
        42
    }

    /// # Errors
    /// [`ForecastError::InvalidTolerance`] unless `tolerance` is finite and > 0.
    pub fn with_zlb_tolerance(mut self, tolerance: f64) -> ForecastResult<Self> {
        if !tolerance.is_finite() || tolerance <= 0.0 {
            return Err(ForecastError::InvalidTolerance { value: tolerance });
        }
        self.zlb_tolerance = tolerance;
        Ok(self)
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_failure_policy(mut self, failure_policy: DrawFailurePolicy) -> Self {
        self.failure_policy = failure_policy;
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Route log records to a caller-owned logger (overrides `verbose`).
    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = Some(logger);
        self
    }

    pub fn zlb_tolerance(&self) -> f64 {
        self.zlb_tolerance
    }

    /// The caller's logger if one was supplied, otherwise one built from `verbose`.
    pub fn logger(&self) -> Logger {
        match &self.logger {
            Some(logger) => logger.clone(),
            None => build_logger(self.verbose),
        }
    }
}

impl std::fmt::Debug for ForecastSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ForecastSettings")
            .field("model", &self.model)
            .field("cond_type", &self.cond_type)
            .field("enforce_zlb", &self.enforce_zlb)
            .field("zlb_tolerance", &self.zlb_tolerance)
            .field("seed", &self.seed)
            .field("failure_policy", &self.failure_policy)
            .field("verbose", &self.verbose)
            .field("custom_logger", &self.logger.is_some())
            .finish()
    }
}
