//! numerics::matrix_sqrt — symmetric square root of a PSD covariance.
//!
//! Purpose
//! -------
//! Compute `S = V diag(sqrt(λ)) Vᵀ` for a symmetric positive semi-definite
//! matrix `Q = V diag(λ) Vᵀ`, so that `S·S = Q` and `S·x` with `x ~ N(0, I)`
//! has covariance `Q`. Unlike a Cholesky factor this exists for singular
//! `Q`, which is the usual case when some structural shocks are switched off.
//!
//! Invariants & assumptions
//! ------------------------
//! - Input is square, finite, and symmetric up to [`SYMMETRY_TOL`].
//! - Eigenvalues in `[-PSD_TOL·scale, 0)` are rounding noise and are clamped
//!   to zero; anything more negative is a genuine failure.
//!
//! Conventions
//! -----------
//! - Input and output are `ndarray` matrices; `nalgebra` is used only for the
//!   eigendecomposition.
use crate::{
    forecast::errors::{ForecastError, ForecastResult},
    numerics::{PSD_TOL, SYMMETRY_TOL},
};
use nalgebra::DMatrix;
use ndarray::Array2;

/// sqrtm_psd — symmetric square root of a positive semi-definite matrix.
///
/// Parameters
/// ----------
/// - `q`: `&Array2<f64>`
///   Square, finite, symmetric `n×n` matrix (typically a shock covariance).
///
/// Returns
/// -------
/// `ForecastResult<Array2<f64>>`
///   The symmetric PSD matrix `S` with `S·S = Q` (to rounding error).
///
/// Errors
/// ------
/// - `ForecastError::CovarianceNotSquare` if `q` is not square.
/// - `ForecastError::EmptyDimension` if `q` is `0×0`.
/// - `ForecastError::NonFiniteInput` if any entry is NaN/±inf.
/// - `ForecastError::CovarianceNotSymmetric` if `q` is not symmetric.
/// - `ForecastError::CovarianceNotPsd` if an eigenvalue is materially negative.
///
/// Notes
/// -----
/// - The eigendecomposition is computed on the exactly symmetrized matrix
///   `(Q + Qᵀ)/2` so tolerated asymmetry cannot leak into `S`.
///
/// Examples
/// --------
/// ```rust
/// # use ndarray::array;
/// # use statespace_forecast::numerics::sqrtm_psd;
/// let q = array![[4.0, 0.0], [0.0, 0.0]];
/// let s = sqrtm_psd(&q).unwrap();
/// assert!((s[[0, 0]] - 2.0).abs() < 1e-12);
/// assert!(s[[1, 1]].abs() < 1e-12);
/// ```
pub fn sqrtm_psd(q: &Array2<f64>) -> ForecastResult<Array2<f64>> {
    let (rows, cols) = q.dim();
    if rows != cols {
        return Err(ForecastError::CovarianceNotSquare { rows, cols });
    }
    if rows == 0 {
        return Err(ForecastError::EmptyDimension { what: "shock covariance" });
    }
    if let Some(index) = q.iter().position(|v| !v.is_finite()) {
        return Err(ForecastError::NonFiniteInput { what: "shock covariance", index });
    }

    let scale = q.iter().fold(1.0_f64, |acc, v| acc.max(v.abs()));
    check_symmetry(q, scale)?;

    let mut q_nalg = DMatrix::<f64>::zeros(rows, cols);
    fill_symmetrized(q, &mut q_nalg);

    let eigen = q_nalg.symmetric_eigen();
    let mut root = Array2::<f64>::zeros((rows, cols));
    for (k, &lambda) in eigen.eigenvalues.iter().enumerate() {
        if lambda < -PSD_TOL * scale {
            return Err(ForecastError::CovarianceNotPsd { eigenvalue: lambda });
        }
        if lambda <= 0.0 {
            continue;
        }
        let sqrt_lambda = lambda.sqrt();
        for j in 0..cols {
            let vj = eigen.eigenvectors[(j, k)] * sqrt_lambda;
            if vj == 0.0 {
                continue;
            }
            for i in 0..rows {
                root[[i, j]] += eigen.eigenvectors[(i, k)] * vj;
            }
        }
    }
    Ok(root)
}

// ---- Helper methods ----

fn check_symmetry(q: &Array2<f64>, scale: f64) -> ForecastResult<()> {
    let n = q.nrows();
    for row in 0..n {
        for col in (row + 1)..n {
            let gap = (q[[row, col]] - q[[col, row]]).abs();
            if gap > SYMMETRY_TOL * scale {
                return Err(ForecastError::CovarianceNotSymmetric { row, col, gap });
            }
        }
    }
    Ok(())
}

/// Copy `(Q + Qᵀ)/2` into a preallocated column-major `DMatrix`.
fn fill_symmetrized(q: &Array2<f64>, q_nalg: &mut DMatrix<f64>) {
    let n = q.ncols();
    for j in 0..n {
        for i in j..n {
            if i == j {
                q_nalg[(i, i)] = q[[i, i]];
            } else {
                let avg = 0.5 * (q[[i, j]] + q[[j, i]]);
                q_nalg[(i, j)] = avg;
                q_nalg[(j, i)] = avg;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Diagonal and dense full-rank square roots (S·S = Q, S symmetric).
    // - Rank-deficient covariances, where Cholesky would fail.
    // - Every rejection branch of `sqrtm_psd`.
    //
    // They intentionally DO NOT cover:
    // - Sampling with the resulting factor; see `forecast::core::shocks`.
    // -------------------------------------------------------------------------

    fn assert_squares_to(s: &Array2<f64>, q: &Array2<f64>) {
        let back = s.dot(s);
        for (a, b) in back.iter().zip(q.iter()) {
            assert!((a - b).abs() < 1e-10, "S·S = {back:?} differs from Q = {q:?}");
        }
        for i in 0..s.nrows() {
            for j in 0..s.ncols() {
                assert!((s[[i, j]] - s[[j, i]]).abs() < 1e-12);
            }
        }
    }

    #[test]
    // Purpose
    // -------
    // A diagonal covariance has the elementwise square root as its root.
    //
    // Given
    // -----
    // - Q = diag(4, 9, 0.25).
    //
    // Expect
    // ------
    // - S = diag(2, 3, 0.5).
    fn sqrtm_psd_diagonal_is_elementwise_sqrt() {
        // Arrange
        let q = array![[4.0, 0.0, 0.0], [0.0, 9.0, 0.0], [0.0, 0.0, 0.25]];

        // Act
        let s = sqrtm_psd(&q).expect("diagonal PSD matrix should have a root");

        // Assert
        assert!((s[[0, 0]] - 2.0).abs() < 1e-12);
        assert!((s[[1, 1]] - 3.0).abs() < 1e-12);
        assert!((s[[2, 2]] - 0.5).abs() < 1e-12);
        assert_squares_to(&s, &q);
    }

    #[test]
    // Purpose
    // -------
    // Dense full-rank and rank-deficient matrices both square back to Q.
    //
    // Given
    // -----
    // - A dense SPD 2×2 matrix.
    // - A rank-one 2×2 matrix `v vᵀ` with v = (1, 2).
    //
    // Expect
    // ------
    // - `S·S ≈ Q` and `S` symmetric in both cases.
    fn sqrtm_psd_dense_and_rank_deficient_square_back() {
        // Arrange
        let spd = array![[2.0, 0.6], [0.6, 1.0]];
        let rank_one = array![[1.0, 2.0], [2.0, 4.0]];

        // Act
        let s_spd = sqrtm_psd(&spd).expect("SPD matrix should have a root");
        let s_rank_one = sqrtm_psd(&rank_one).expect("rank-one PSD matrix should have a root");

        // Assert
        assert_squares_to(&s_spd, &spd);
        assert_squares_to(&s_rank_one, &rank_one);
    }

    #[test]
    // Purpose
    // -------
    // Invalid covariances are rejected with the matching variant.
    //
    // Given
    // -----
    // - A 2×3 matrix, an asymmetric matrix, an indefinite matrix, a matrix
    //   holding NaN, and a 0×0 matrix.
    //
    // Expect
    // ------
    // - `CovarianceNotSquare`, `CovarianceNotSymmetric`, `CovarianceNotPsd`,
    //   `NonFiniteInput`, and `EmptyDimension` respectively.
    fn sqrtm_psd_rejects_invalid_covariances() {
        // Arrange
        let not_square = Array2::<f64>::zeros((2, 3));
        let asymmetric = array![[1.0, 0.5], [0.0, 1.0]];
        let indefinite = array![[1.0, 0.0], [0.0, -1.0]];
        let non_finite = array![[1.0, f64::NAN], [f64::NAN, 1.0]];
        let empty = Array2::<f64>::zeros((0, 0));

        // Act + Assert
        assert_eq!(
            sqrtm_psd(&not_square),
            Err(ForecastError::CovarianceNotSquare { rows: 2, cols: 3 })
        );
        assert!(matches!(
            sqrtm_psd(&asymmetric),
            Err(ForecastError::CovarianceNotSymmetric { row: 0, col: 1, .. })
        ));
        match sqrtm_psd(&indefinite) {
            Err(ForecastError::CovarianceNotPsd { eigenvalue }) => {
                assert!((eigenvalue + 1.0).abs() < 1e-12)
            }
            other => panic!("expected CovarianceNotPsd, got {other:?}"),
        }
        assert!(matches!(sqrtm_psd(&non_finite), Err(ForecastError::NonFiniteInput { .. })));
        assert!(matches!(sqrtm_psd(&empty), Err(ForecastError::EmptyDimension { .. })));
    }
}
