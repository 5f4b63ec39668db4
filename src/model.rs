use crate::{with_intercept, ColumnMajorMatrix, Dataset, Estimator, FitError, FitResult};
use log::debug;

/// Prediction of a linear model on a row of features, without the intercept.
pub fn predict(row: &[f64], coefficients: &[f64]) -> FitResult<f64> {
    if row.len() + 1 != coefficients.len() {
        return Err(FitError::mismatch(
            "number of coefficients",
            row.len() + 1,
            coefficients.len(),
        ));
    }
    let intercept = coefficients[0];
    Ok(intercept
        + row
            .iter()
            .zip(&coefficients[1..])
            .map(|(x, b)| x * b)
            .sum::<f64>())
}

/// A fitted linear model. The first coefficient is the intercept.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(try_from = "RawLinearModel")]
pub struct LinearModel {
    coefficients: Vec<f64>,
}

// Deserialized form, checked by `from_coefficients`
#[derive(Deserialize)]
struct RawLinearModel {
    coefficients: Vec<f64>,
}

impl TryFrom<RawLinearModel> for LinearModel {
    type Error = FitError;

    fn try_from(raw: RawLinearModel) -> FitResult<Self> {
        Self::from_coefficients(raw.coefficients)
    }
}

impl LinearModel {
    pub fn from_coefficients(coefficients: Vec<f64>) -> FitResult<Self> {
        if coefficients.is_empty() {
            return Err(FitError::EmptyInput("a model needs an intercept".to_string()));
        }
        Ok(Self { coefficients })
    }

    /// Fit the estimator on the dataset, adding the intercept column first.
    pub fn fit(train: &Dataset, estimator: &impl Estimator) -> FitResult<Self> {
        let x = with_intercept(&train.features);
        let coefficients = estimator.fit(&x, &train.target)?;
        debug!("{} coefficients: {:?}", estimator.name(), coefficients);
        Self::from_coefficients(coefficients)
    }

    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    pub fn intercept(&self) -> f64 {
        self.coefficients[0]
    }

    pub fn n_features(&self) -> usize {
        self.coefficients.len() - 1
    }

    pub fn predict(&self, row: &[f64]) -> FitResult<f64> {
        predict(row, &self.coefficients)
    }

    /// Predict every row of a feature matrix, without intercept column.
    pub fn predict_matrix(&self, features: &ColumnMajorMatrix<f64>) -> FitResult<Vec<f64>> {
        if features.n_cols() != self.n_features() {
            return Err(FitError::mismatch(
                "number of features",
                self.n_features(),
                features.n_cols(),
            ));
        }
        let mut predictions = vec![self.intercept(); features.n_rows()];
        for (column, &b) in features.columns().zip(&self.coefficients[1..]) {
            for (p, &x) in predictions.iter_mut().zip(column) {
                *p += x * b;
            }
        }
        Ok(predictions)
    }
}
