//! forecast — draw-by-draw forecasting of linear state-space models.
//!
//! Purpose
//! -------
//! Given one state-space system per posterior draw and the terminal filtered
//! state of each draw, simulate `H` periods of states, observables and
//! pseudo-observables, optionally keeping a policy-rate observable at or
//! above a zero lower bound by rewriting its driving shock.
//!
//! Key behaviors
//! -------------
//! - [`core`] holds the building blocks: validated system matrices, run
//!   configuration, shock generation, the ZLB-aware transition, and the
//!   measurement mapping.
//! - [`models`] strings them into [`single_draw_forecast`] and the batch
//!   drivers [`batch_forecast`], [`batch_forecast_with_shocks`] and
//!   [`batch_forecast_from_filtered`].
//! - [`errors`] defines the single error type [`ForecastError`] shared by
//!   every layer.
//!
//! Invariants & assumptions
//! ------------------------
//! - Draws are independent: each has its own system, initial state, shock
//!   path and RNG stream; no state is shared between draws.
//! - A draw either produces complete paths or an error. Errors are never
//!   replaced by numeric defaults; skipped draws are NaN-filled and listed.
//!
//! Conventions
//! -----------
//! - Paths are variable-major (`variables × H`); batch tensors prepend the
//!   draw axis (`draws × variables × H`).
//! - Indexing is 0-based; forecast periods in error payloads and log records
//!   are 1-based.
//!
//! Downstream usage
//! ----------------
//! 1. Build one [`StateSpaceSystem`] per draw (and optionally a
//!    [`PseudoMeasurement`]).
//! 2. Build [`ModelSettings`] (horizons, shock distribution, ZLB constraint) and
//!    wrap it in [`ForecastSettings`] with a [`CondType`].
//! 3. Call a batch driver and read the tensors of [`BatchForecastOutput`].
//!
//! Testing notes
//! -------------
//! - Unit tests live next to each submodule; `tests/integration_forecast_pipeline.rs`
//!   exercises the public surface end to end.

pub mod core;
pub mod errors;
pub mod models;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::core::{
    AnticipatedShocks, CondType, DrawFailurePolicy, FilteredStates, ForecastSettings, ModelSettings,
    PseudoMeasurement, ShockDist, StateSpaceSystem, TerminalState, ZlbSpec,
};
pub use self::errors::{ForecastError, ForecastResult};
pub use self::models::{
    BatchForecastOutput, DrawFailure, ForecastOutput, batch_forecast, batch_forecast_from_filtered,
    batch_forecast_with_shocks, single_draw_forecast,
};

// ---- Optional convenience prelude for downstream crates -------------------
//
//     use statespace_forecast::forecast::prelude::*;

pub mod prelude {
    pub use super::core::prelude::*;
    pub use super::errors::{ForecastError, ForecastResult};
    pub use super::models::{
        BatchForecastOutput, DrawFailure, ForecastOutput, batch_forecast,
        batch_forecast_from_filtered, batch_forecast_with_shocks, single_draw_forecast,
    };
}
