use crate::math::mean_vectors;
use crate::{
    ColumnMajorMatrix, Dataset, Estimator, FitError, FitResult, LinearModel,
    DEFAULT_N_ITERATIONS,
};
use log::{debug, info, warn};
use rand::prelude::Rng;
use rayon::prelude::*;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct EnsembleParams {
    /// Number of models to average.
    pub n_iterations: usize,
    /// Fit every model on a bootstrap sample of the train set. Without it every
    /// iteration would fit the exact same model, so only one is fitted.
    pub bootstrap: bool,
}

impl EnsembleParams {
    pub fn new() -> Self {
        Self {
            n_iterations: DEFAULT_N_ITERATIONS,
            bootstrap: false,
        }
    }
}

impl Default for EnsembleParams {
    fn default() -> Self {
        Self::new()
    }
}

/// Average of linear models fitted with the same estimator.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct BaggedRegressor<E: Estimator> {
    models: Vec<LinearModel>,
    params: EnsembleParams,
    estimator: E,
}

impl<E: Estimator> BaggedRegressor<E> {
    pub fn build(
        train: &Dataset,
        estimator: E,
        params: &EnsembleParams,
        rng: &mut impl Rng,
    ) -> FitResult<BaggedRegressor<E>> {
        if params.n_iterations == 0 {
            return Err(FitError::InvalidParameter(
                "an ensemble needs at least one iteration".to_string(),
            ));
        }
        if train.n_rows() == 0 {
            return Err(FitError::EmptyInput("no sample to fit".to_string()));
        }

        let models = if params.bootstrap {
            // We draw the samples first because they depend on &mut rng
            let n_rows = train.n_rows();
            let samples: Vec<Vec<usize>> = (0..params.n_iterations)
                .map(|_| (0..n_rows).map(|_| rng.gen_range(0..n_rows)).collect())
                .collect();
            info!(
                "fitting {} {} models on bootstrap samples",
                params.n_iterations,
                estimator.name()
            );
            let fits: Vec<FitResult<LinearModel>> = samples
                .par_iter()
                .map(|rows| LinearModel::fit(&train.select(rows), &estimator))
                .collect();
            keep_regular_fits(fits)?
        } else {
            debug!(
                "{} iterations without resampling give identical models, fitting once",
                params.n_iterations
            );
            vec![LinearModel::fit(train, &estimator)?]
        };

        Ok(BaggedRegressor {
            models,
            params: params.clone(),
            estimator,
        })
    }

    pub fn models(&self) -> &[LinearModel] {
        &self.models
    }

    pub fn params(&self) -> &EnsembleParams {
        &self.params
    }

    pub fn estimator(&self) -> &E {
        &self.estimator
    }

    /// A linear model is linear in its coefficients, so averaging the predictions of the
    /// models is predicting with their averaged coefficients.
    pub fn mean_model(&self) -> FitResult<LinearModel> {
        let coefficients: Vec<Vec<f64>> = self
            .models
            .iter()
            .map(|model| model.coefficients().to_vec())
            .collect();
        LinearModel::from_coefficients(mean_vectors(&coefficients)?)
    }

    pub fn predict(&self, row: &[f64]) -> FitResult<f64> {
        let mut o = 0.;
        for model in &self.models {
            o += model.predict(row)?;
        }
        Ok(o / self.models.len() as f64)
    }

    pub fn predict_matrix(&self, features: &ColumnMajorMatrix<f64>) -> FitResult<Vec<f64>> {
        let predictions = self
            .models
            .iter()
            .map(|model| model.predict_matrix(features))
            .collect::<FitResult<Vec<_>>>()?;
        mean_vectors(&predictions)
    }
}

/// Drop the models of bootstrap samples that came out singular, for example when a rare
/// binary feature was never drawn. Any other error is returned.
fn keep_regular_fits(fits: Vec<FitResult<LinearModel>>) -> FitResult<Vec<LinearModel>> {
    let n_samples = fits.len();
    let mut models = Vec::with_capacity(n_samples);
    for fit in fits {
        match fit {
            Ok(model) => models.push(model),
            Err(FitError::SingularMatrix) => {}
            Err(e) => return Err(e),
        }
    }
    if models.is_empty() {
        return Err(FitError::SingularMatrix);
    }
    if models.len() < n_samples {
        warn!(
            "{} of {} bootstrap samples are singular and were skipped",
            n_samples - models.len(),
            n_samples
        );
    }
    Ok(models)
}
