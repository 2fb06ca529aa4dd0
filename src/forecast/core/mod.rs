//! core — state-space system, shocks, ZLB-aware transition, and measurement.
//!
//! Purpose
//! -------
//! Collect the per-draw building blocks of a linear state-space forecast:
//! the validated system matrices, the run configuration, shock generation,
//! the one-period transition with zero-lower-bound enforcement, and the
//! mapping from states to observables. The `models` layer strings these
//! together into single-draw and batch forecasts.
//!
//! Key behaviors
//! -------------
//! - Validate system matrices once per draw ([`StateSpaceSystem`],
//!   [`PseudoMeasurement`], [`ForecastShape`]) so downstream code can assume
//!   consistent, finite inputs.
//! - Resolve configuration to plain values ([`ModelSettings`],
//!   [`ForecastSettings`], [`ZlbSpec`], [`CondType`], [`forecast_horizon`]).
//! - Draw shock paths from a tagged distribution ([`ShockDist`],
//!   [`generate_shocks`]) with an optional zeroed anticipated block
//!   ([`AnticipatedShocks`]).
//! - Advance states with optional ZLB correction ([`iterate_state`],
//!   [`ZlbRule`]) and map them to observables ([`map_observables`]).
//! - Obtain starting states from filter output ([`TerminalState`],
//!   [`FilteredStates`]).
//!
//! Invariants & assumptions
//! ------------------------
//! - Matrix shapes follow `T: ns×ns`, `R: ns×ne`, `C: ns`, `Q: ne×ne`,
//!   `Z: ny×ns`, `D: ny`, `Z_pseudo: np×ns`, `D_pseudo: np`.
//! - Every path is stored variable-major: rows are states/shocks/observables,
//!   columns are forecast periods `1..=H`.
//! - Nothing here mutates a caller's arrays; transitions return fresh vectors.
//!
//! Conventions
//! -----------
//! - Indexing is 0-based; periods in error payloads are 1-based.
//! - This module performs no logging and no I/O. Randomness enters only
//!   through the `rng` argument of [`generate_shocks`].
//!
//! Testing notes
//! -------------
//! - Unit tests in each submodule cover shape validation, shock
//!   distributions and their precedence, horizon resolution, ZLB correction
//!   and its failure modes, and measurement mapping.

pub mod filtered;
pub mod horizon;
pub mod iterate;
pub mod observe;
pub mod options;
pub mod shape;
pub mod shocks;
pub mod system;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::filtered::{FilteredStates, TerminalState};
pub use self::horizon::{CondType, forecast_horizon};
pub use self::iterate::{StateStep, ZlbRule, iterate_state, transition};
pub use self::observe::{ObservablePaths, map_observables};
pub use self::options::{
    DEFAULT_ZLB_TOLERANCE, DrawFailurePolicy, ForecastSettings, ModelSettings, ZlbSpec,
};
pub use self::shape::ForecastShape;
pub use self::shocks::{AnticipatedShocks, ShockDist, generate_shocks};
pub use self::system::{PseudoMeasurement, StateSpaceSystem};
pub use self::validation::{validate_initial_state, validate_shock_path};

pub mod prelude {
    pub use super::filtered::{FilteredStates, TerminalState};
    pub use super::horizon::CondType;
    pub use super::options::{DrawFailurePolicy, ForecastSettings, ModelSettings, ZlbSpec};
    pub use super::shocks::{AnticipatedShocks, ShockDist};
    pub use super::system::{PseudoMeasurement, StateSpaceSystem};
}
