//! models — single-draw and batch forecast drivers.
//!
//! - [`single`]: [`ForecastPlan`], the per-draw worker [`forecast_one_draw`],
//!   and the convenience entry point [`single_draw_forecast`].
//! - [`batch`]: [`batch_forecast`], [`batch_forecast_with_shocks`] and
//!   [`batch_forecast_from_filtered`], which run every draw of a posterior
//!   sample and stack the results into [`BatchForecastOutput`].

pub mod batch;
pub mod single;

pub use self::batch::{
    BatchForecastOutput, DrawFailure, batch_forecast, batch_forecast_from_filtered,
    batch_forecast_with_shocks,
};
pub use self::single::{ForecastOutput, ForecastPlan, forecast_one_draw, single_draw_forecast};
