//! statespace_forecast — draw-by-draw forecasts of linear state-space models.
//!
//! Purpose
//! -------
//! Produce forecast paths of states, observables and pseudo-observables for
//! every parameter draw of an estimated linear state-space model (typically a
//! DSGE model), with optional enforcement of a zero lower bound on a
//! policy-rate observable.
//!
//! Key behaviors
//! -------------
//! - [`forecast`]: system matrices, configuration, shock generation, the
//!   ZLB-aware state transition, measurement mapping, and the single-draw and
//!   batch drivers.
//! - [`numerics`]: the covariance square root and shared tolerances.
//! - [`logging`]: default `slog` loggers used when a caller supplies none.
//!
//! Invariants & assumptions
//! ------------------------
//! - Inputs (system matrices, initial states, shock paths) are validated for
//!   shape and finiteness at the boundary; inner code assumes they hold.
//! - Randomness enters only through seeded `StdRng` streams, one per draw.
//!
//! Conventions
//! -----------
//! - Errors are reported as [`forecast::ForecastError`]; no operation panics
//!   on user input.
//! - Draws run on the `rayon` pool when the `parallel` feature (default) is
//!   enabled, sequentially otherwise, with identical results.
//!
//! Testing notes
//! -------------
//! - Unit tests live beside each module; `tests/integration_forecast_pipeline.rs`
//!   drives the public API end to end.

pub mod forecast;
pub mod logging;
pub mod numerics;
