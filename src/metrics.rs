//! Regression error metrics.
//!
//! Every metric takes the predictions first and the targets second. Percentage metrics
//! are returned as fractions: multiply by 100 to display a percentage.

use crate::{mean, FitError, FitResult};
use itertools::Itertools;
use std::fmt;

fn check_lengths(predictions: &[f64], targets: &[f64]) -> FitResult<()> {
    if predictions.len() != targets.len() {
        return Err(FitError::mismatch(
            "number of targets",
            predictions.len(),
            targets.len(),
        ));
    }
    if predictions.is_empty() {
        return Err(FitError::EmptyInput("no prediction to score".to_string()));
    }
    Ok(())
}

/// Relative errors `(prediction - target) / target`, failing on the first zero target.
fn relative_errors(predictions: &[f64], targets: &[f64]) -> FitResult<Vec<f64>> {
    check_lengths(predictions, targets)?;
    predictions
        .iter()
        .zip_eq(targets)
        .enumerate()
        .map(|(index, (&pred, &target))| {
            if target == 0. {
                Err(FitError::DivisionByZero { index })
            } else {
                Ok((pred - target) / target)
            }
        })
        .collect()
}

/// Mean absolute percentage error.
pub fn mape(predictions: &[f64], targets: &[f64]) -> FitResult<f64> {
    let errors: Vec<f64> = relative_errors(predictions, targets)?
        .iter()
        .map(|e| e.abs())
        .collect();
    Ok(mean(&errors))
}

/// Mean squared error.
pub fn mse(predictions: &[f64], targets: &[f64]) -> FitResult<f64> {
    check_lengths(predictions, targets)?;
    let errors: Vec<f64> = predictions
        .iter()
        .zip_eq(targets)
        .map(|(&a, &b)| (a - b).powi(2))
        .collect();
    Ok(mean(&errors))
}

/// Root mean squared error.
pub fn rmse(predictions: &[f64], targets: &[f64]) -> FitResult<f64> {
    Ok(mse(predictions, targets)?.sqrt())
}

/// Root mean squared percentage error.
pub fn rmspe(predictions: &[f64], targets: &[f64]) -> FitResult<f64> {
    let errors: Vec<f64> = relative_errors(predictions, targets)?
        .iter()
        .map(|e| e.powi(2))
        .collect();
    Ok(mean(&errors).sqrt())
}

/// All the metrics of a set of predictions.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct RegressionReport {
    pub mape: f64,
    pub mse: f64,
    pub rmse: f64,
    pub rmspe: f64,
}

impl RegressionReport {
    pub fn compute(predictions: &[f64], targets: &[f64]) -> FitResult<Self> {
        Ok(Self {
            mape: mape(predictions, targets)?,
            mse: mse(predictions, targets)?,
            rmse: rmse(predictions, targets)?,
            rmspe: rmspe(predictions, targets)?,
        })
    }
}

impl fmt::Display for RegressionReport {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Mean Absolute Percentage Error (MAPE): {:.2}%", self.mape * 100.)?;
        writeln!(f, "Mean Squared Error (MSE): {:.2}", self.mse)?;
        writeln!(f, "Root Mean Squared Error (RMSE): {:.2}", self.rmse)?;
        write!(
            f,
            "Root Mean Squared Percentage Error (RMSPE): {:.2}%",
            self.rmspe * 100.
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn test_known_values() {
        let predictions = [110., 45., 20.];
        let targets = [100., 50., 25.];
        // Relative errors: 0.1, -0.1, -0.2
        assert_approx_eq!(mape(&predictions, &targets).unwrap(), 0.4 / 3.);
        assert_approx_eq!(rmspe(&predictions, &targets).unwrap(), (0.06f64 / 3.).sqrt());
        // Squared errors: 100, 25, 25
        assert_approx_eq!(mse(&predictions, &targets).unwrap(), 50.);
        assert_approx_eq!(rmse(&predictions, &targets).unwrap(), 50f64.sqrt());
    }

    #[test]
    fn test_rmse_is_sqrt_of_mse() {
        let predictions = [1.3, -2.7, 8.1, 0.02, 4.];
        let targets = [1., 3., 7.5, -0.5, 4.4];
        let mse = mse(&predictions, &targets).unwrap();
        let rmse = rmse(&predictions, &targets).unwrap();
        assert_eq!(rmse, mse.sqrt());
    }

    #[test]
    fn test_perfect_predictions() {
        let values = [24., 21.6, 34.7, 33.4, 36.2];
        let report = RegressionReport::compute(&values, &values).unwrap();
        assert_eq!(
            report,
            RegressionReport {
                mape: 0.,
                mse: 0.,
                rmse: 0.,
                rmspe: 0.
            }
        );
    }

    #[test]
    fn test_length_mismatch() {
        let predictions = [1., 2.];
        let targets = [1., 2., 3.];
        let metrics: [fn(&[f64], &[f64]) -> FitResult<f64>; 4] = [mape, mse, rmse, rmspe];
        for metric in &metrics {
            assert!(matches!(
                metric(&predictions, &targets),
                Err(FitError::DimensionMismatch(_))
            ));
        }
    }

    #[test]
    fn test_zero_target() {
        let predictions = [1., 2., 3.];
        let targets = [1., 0., 3.];
        assert_eq!(
            mape(&predictions, &targets),
            Err(FitError::DivisionByZero { index: 1 })
        );
        assert_eq!(
            rmspe(&predictions, &targets),
            Err(FitError::DivisionByZero { index: 1 })
        );
        // Absolute metrics are still defined
        assert_approx_eq!(mse(&predictions, &targets).unwrap(), 4. / 3.);
    }

    #[test]
    fn test_empty() {
        assert!(matches!(mse(&[], &[]), Err(FitError::EmptyInput(_))));
        assert!(matches!(mape(&[], &[]), Err(FitError::EmptyInput(_))));
    }

    #[test]
    fn test_display() {
        let report = RegressionReport {
            mape: 0.1234,
            mse: 20.,
            rmse: 20f64.sqrt(),
            rmspe: 0.2,
        };
        let text = report.to_string();
        assert!(text.contains("(MAPE): 12.34%"));
        assert!(text.contains("(RMSPE): 20.00%"));
        assert!(text.contains("(MSE): 20.00"));
    }
}
