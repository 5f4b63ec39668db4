use crate::linalg::{inverse, mat_vec, matmul, solve_least_squares, transpose, RankPolicy};
use crate::{ColumnMajorMatrix, FitError, FitResult, DEFAULT_LAMBDA};
use log::debug;

/// General interface for an estimator of the coefficients of a linear model.
///
/// `x` is the design matrix, intercept column included, and `y` the target.
/// The returned vector has one coefficient per column of `x`.
pub trait Estimator: std::marker::Sync {
    fn fit(&self, x: &ColumnMajorMatrix<f64>, y: &[f64]) -> FitResult<Vec<f64>>;
    fn name(&self) -> &'static str;
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct OlsParams {
    pub rank_policy: RankPolicy,
}

impl OlsParams {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Ordinary least squares, solved with a QR decomposition of the design matrix.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct OrdinaryLeastSquares {
    pub params: OlsParams,
}

impl OrdinaryLeastSquares {
    pub fn new(params: OlsParams) -> Self {
        Self { params }
    }
}

impl Estimator for OrdinaryLeastSquares {
    fn fit(&self, x: &ColumnMajorMatrix<f64>, y: &[f64]) -> FitResult<Vec<f64>> {
        ols_with(x, y, self.params.rank_policy)
    }

    fn name(&self) -> &'static str {
        "ordinary least squares"
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RidgeParams {
    /// Strength of the L2 penalty on every coefficient except the intercept.
    pub lambda: f64,
}

impl RidgeParams {
    pub fn new() -> Self {
        Self {
            lambda: DEFAULT_LAMBDA,
        }
    }
}

impl Default for RidgeParams {
    fn default() -> Self {
        Self::new()
    }
}

/// Ridge regression, with the closed form `(XᵗX + λD)⁻¹ Xᵗy`.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Ridge {
    pub params: RidgeParams,
}

impl Ridge {
    pub fn new(params: RidgeParams) -> Self {
        Self { params }
    }
}

impl Estimator for Ridge {
    fn fit(&self, x: &ColumnMajorMatrix<f64>, y: &[f64]) -> FitResult<Vec<f64>> {
        ridge(x, y, self.params.lambda)
    }

    fn name(&self) -> &'static str {
        "ridge regression"
    }
}

/// Ordinary least squares on a design matrix with its intercept column.
///
/// Fails with `SingularMatrix` if `x` does not have full column rank.
pub fn ols(x: &ColumnMajorMatrix<f64>, y: &[f64]) -> FitResult<Vec<f64>> {
    ols_with(x, y, RankPolicy::Error)
}

pub fn ols_with(
    x: &ColumnMajorMatrix<f64>,
    y: &[f64],
    rank_policy: RankPolicy,
) -> FitResult<Vec<f64>> {
    check_target(x, y)?;
    debug!(
        "OLS fit on {} rows, {} columns, rank policy {:?}",
        x.n_rows(),
        x.n_cols(),
        rank_policy
    );
    solve_least_squares(x, y, rank_policy)
}

/// Ridge regression on a design matrix whose first column is the intercept.
///
/// The penalty matrix `D` is the identity with `D[0,0] = 0`: the intercept is not shrunk.
/// With `lambda = 0` this is OLS through the normal equations.
pub fn ridge(x: &ColumnMajorMatrix<f64>, y: &[f64], lambda: f64) -> FitResult<Vec<f64>> {
    if !lambda.is_finite() || lambda < 0. {
        return Err(FitError::InvalidParameter(format!(
            "lambda must be finite and non-negative, got {}",
            lambda
        )));
    }
    check_target(x, y)?;
    if x.n_cols() == 0 {
        return Err(FitError::EmptyInput("design matrix without columns".to_string()));
    }
    debug!(
        "ridge fit on {} rows, {} columns, lambda {}",
        x.n_rows(),
        x.n_cols(),
        lambda
    );

    let xt = transpose(x);
    let mut gram = matmul(&xt, x)?;
    for i in 1..gram.n_cols() {
        gram[(i, i)] += lambda;
    }
    let inv = inverse(&gram)?;
    let xty = mat_vec(&xt, y)?;
    mat_vec(&inv, &xty)
}

fn check_target(x: &ColumnMajorMatrix<f64>, y: &[f64]) -> FitResult<()> {
    if x.n_rows() != y.len() {
        return Err(FitError::mismatch("length of target", x.n_rows(), y.len()));
    }
    if y.is_empty() {
        return Err(FitError::EmptyInput("no sample to fit".to_string()));
    }
    Ok(())
}
