//! Shock generation for one forecast draw.
//!
//! Purpose
//! -------
//! Produce the `n_shocks × horizon` matrix of structural shock innovations
//! that drives a draw's forecast when the caller does not supply one.
//!
//! Key behaviors
//! -------------
//! - [`ShockDist`] is the tagged choice between killed (all-zero) shocks,
//!   multivariate Student-t shocks, and multivariate normal shocks.
//!   [`ShockDist::from_flags`] maps the usual pair of model flags onto it with
//!   the precedence kill > Student-t > normal.
//! - Each time column is drawn i.i.d. as `S·x` (normal) or
//!   `S·x·sqrt(ν / w)` (Student-t), where `S` is the symmetric square root of
//!   `Q`, `x ~ N(0, I)`, and `w ~ χ²(ν)`. Using `S` instead of a Cholesky
//!   factor keeps degenerate (rank-deficient) `Q` valid.
//! - [`AnticipatedShocks`] rows are zeroed after sampling, so anticipated
//!   policy shocks never move a baseline stochastic forecast.
//!
//! Invariants & assumptions
//! ------------------------
//! - `Q` is square; symmetry and semi-definiteness are checked by
//!   [`sqrtm_psd`] only for the distributions that need it.
//! - Sampling consumes entropy only from the `rng` passed in; there is no
//!   global RNG, so a per-draw seeded generator makes draws reproducible.
//!
//! Conventions
//! -----------
//! - Rows index shocks, columns index forecast periods `t = 1..=horizon`
//!   (stored at column `t - 1`).
//! - Degrees of freedom are validated at construction of
//!   [`ShockDist::StudentT`] through [`ShockDist::student_t`] and again
//!   before sampling, since the enum fields are public.
use crate::{
    forecast::{
        core::validation::validate_nonzero,
        errors::{ForecastError, ForecastResult},
    },
    numerics::sqrtm_psd,
};
use ndarray::{Array1, Array2, s};
use rand::Rng;
use rand_distr::{Distribution, StandardNormal};
use statrs::distribution::ChiSquared;

/// Shock distribution used when shocks are generated rather than supplied.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ShockDist {
    /// All shocks set to zero (a "mean" forecast path).
    Kill,
    /// Multivariate Student-t with scale matrix `Q` and `df` degrees of freedom.
    StudentT { df: f64 },
    /// Multivariate (possibly degenerate) normal with covariance `Q`.
    #[default]
    Normal,
}

impl ShockDist {
    /// Student-t shocks with validated degrees of freedom.
    ///
    /// # Errors
    /// [`ForecastError::InvalidDegreesOfFreedom`] unless `df` is finite and > 0.
    pub fn student_t(df: f64) -> ForecastResult<Self> {
        validate_df(df)?;
        Ok(ShockDist::StudentT { df })
    }

    /// Map model flags onto a distribution with the precedence
    /// kill > Student-t > normal.
    ///
    /// `df` is only inspected (and validated) when `use_t` wins.
    ///
    /// # Examples
    /// ```rust
    /// # use statespace_forecast::forecast::core::shocks::ShockDist;
    /// assert_eq!(ShockDist::from_flags(true, true, 5.0).unwrap(), ShockDist::Kill);
    /// assert_eq!(ShockDist::from_flags(false, true, 5.0).unwrap(), ShockDist::StudentT { df: 5.0 });
    /// assert_eq!(ShockDist::from_flags(false, false, f64::NAN).unwrap(), ShockDist::Normal);
    /// ```
    pub fn from_flags(kill_shocks: bool, use_t: bool, df: f64) -> ForecastResult<Self> {
        if kill_shocks {
            Ok(ShockDist::Kill)
        } else if use_t {
            ShockDist::student_t(df)
        } else {
            Ok(ShockDist::Normal)
        }
    }
}

/// Inclusive, 0-based block `[first, last]` of anticipated shocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnticipatedShocks {
    first: usize,
    last: usize,
}

impl AnticipatedShocks {
    /// # Errors
    /// [`ForecastError::InvalidAnticipatedRange`] if `first > last`.
    pub fn new(first: usize, last: usize) -> ForecastResult<Self> {
        if first > last {
            return Err(ForecastError::InvalidAnticipatedRange { first, last, n_shocks: 0 });
        }
        Ok(AnticipatedShocks { first, last })
    }

    pub fn first(&self) -> usize {
        self.first
    }

    pub fn last(&self) -> usize {
        self.last
    }

    /// Check that the block fits inside `n_shocks` shocks.
    pub fn validate(&self, n_shocks: usize) -> ForecastResult<()> {
        if self.last >= n_shocks {
            return Err(ForecastError::InvalidAnticipatedRange {
                first: self.first,
                last: self.last,
                n_shocks,
            });
        }
        Ok(())
    }
}

/// Generate a shock matrix for one draw.
///
/// Parameters
/// ----------
/// - `q`: `&Array2<f64>`
///   The draw's shock covariance (`n_shocks × n_shocks`).
/// - `horizon`: `usize`
///   Number of forecast periods (columns), > 0.
/// - `dist`: `&ShockDist`
///   Which distribution to draw from.
/// - `anticipated`: `Option<&AnticipatedShocks>`
///   Block of rows zeroed after sampling.
/// - `rng`: `&mut R`
///   Entropy source; the only side effect of this function.
///
/// Returns
/// -------
/// `ForecastResult<Array2<f64>>`
///   An `n_shocks × horizon` matrix with i.i.d. columns.
///
/// Errors
/// ------
/// - `EmptyDimension` if `horizon == 0` or `Q` is `0×0`.
/// - `CovarianceNotSquare` if `Q` is not square.
/// - `InvalidAnticipatedRange` if the anticipated block exceeds `n_shocks`.
/// - `CovarianceNotSymmetric` / `CovarianceNotPsd` / `NonFiniteInput` from
///   [`sqrtm_psd`] for the normal and Student-t distributions.
/// - `InvalidDegreesOfFreedom` / `SamplerRejected` for a bad Student-t setup.
///
/// Examples
/// --------
/// ```rust
/// # use ndarray::array;
/// # use rand::{SeedableRng, rngs::StdRng};
/// # use statespace_forecast::forecast::core::shocks::{generate_shocks, ShockDist};
/// let q = array![[1.0, 0.0], [0.0, 0.25]];
/// let mut rng = StdRng::seed_from_u64(7);
/// let shocks = generate_shocks(&q, 4, &ShockDist::Normal, None, &mut rng).unwrap();
/// assert_eq!(shocks.dim(), (2, 4));
/// ```
pub fn generate_shocks<R: Rng + ?Sized>(
    q: &Array2<f64>, horizon: usize, dist: &ShockDist, anticipated: Option<&AnticipatedShocks>,
    rng: &mut R,
) -> ForecastResult<Array2<f64>> {
    let (rows, cols) = q.dim();
    if rows != cols {
        return Err(ForecastError::CovarianceNotSquare { rows, cols });
    }
    let n_shocks = rows;
    validate_nonzero("shocks", n_shocks)?;
    validate_nonzero("forecast horizon", horizon)?;
    if let Some(block) = anticipated {
        block.validate(n_shocks)?;
    }

    let mut shocks = match dist {
        ShockDist::Kill => Array2::zeros((n_shocks, horizon)),
        ShockDist::Normal => {
            let root = sqrtm_psd(q)?;
            let mut shocks = Array2::zeros((n_shocks, horizon));
            for mut column in shocks.columns_mut() {
                column.assign(&root.dot(&standard_normal_vector(n_shocks, rng)));
            }
            shocks
        }
        ShockDist::StudentT { df } => {
            validate_df(*df)?;
            let root = sqrtm_psd(q)?;
            let chi2 = ChiSquared::new(*df)
                .map_err(|err| ForecastError::SamplerRejected { reason: err.to_string() })?;
            let mut shocks = Array2::zeros((n_shocks, horizon));
            for mut column in shocks.columns_mut() {
                let mixing = (df / chi2.sample(&mut *rng)).sqrt();
                if !mixing.is_finite() {
                    return Err(ForecastError::SamplerRejected {
                        reason: format!("chi-squared mixing draw produced {mixing}"),
                    });
                }
                column.assign(&(root.dot(&standard_normal_vector(n_shocks, rng)) * mixing));
            }
            shocks
        }
    };

    if let Some(block) = anticipated {
        shocks.slice_mut(s![block.first..=block.last, ..]).fill(0.0);
    }
    Ok(shocks)
}

// ---- Helper methods ----

fn standard_normal_vector<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Array1<f64> {
    Array1::from_shape_fn(n, |_| rng.sample::<f64, _>(StandardNormal))
}

fn validate_df(df: f64) -> ForecastResult<()> {
    if !df.is_finite() || df <= 0.0 {
        return Err(ForecastError::InvalidDegreesOfFreedom { df });
    }
    Ok(())
}
