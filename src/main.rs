// Fit OLS and ridge regressions on a housing dataset and report their test errors.

use clap::Parser;
use itertools::Itertools;
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rlinear::{
    load_csv, BaggedRegressor, Dataset, EnsembleParams, Estimator, OrdinaryLeastSquares,
    RegressionReport, Ridge, RidgeParams, DEFAULT_LAMBDA, DEFAULT_N_ITERATIONS,
    DEFAULT_TRAIN_RATIO,
};
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;

#[derive(Debug, Parser)]
#[command(name = "rlinear", about = "Linear and ridge regression on a CSV dataset")]
struct Args {
    /// CSV file with a header, an identifier column first and the target column last
    #[arg(long, default_value = "boston.csv")]
    data: PathBuf,

    /// Share of the rows, taken from the top of the file, used for training
    #[arg(long, default_value_t = DEFAULT_TRAIN_RATIO)]
    train_ratio: f64,

    /// Number of models averaged per regression
    #[arg(long, default_value_t = DEFAULT_N_ITERATIONS)]
    iterations: usize,

    /// Ridge penalty
    #[arg(long, default_value_t = DEFAULT_LAMBDA)]
    lambda: f64,

    /// Fit each model on a bootstrap sample of the train set
    #[arg(long)]
    bootstrap: bool,

    /// Seed of the bootstrap sampling
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Don't print the dataset
    #[arg(long)]
    quiet: bool,

    /// Write both averaged models as JSON to this file
    #[arg(long)]
    model_out: Option<PathBuf>,
}

fn run_variant<E: Estimator>(
    train: &Dataset,
    test: &Dataset,
    estimator: E,
    params: &EnsembleParams,
    rng: &mut StdRng,
) -> Result<BaggedRegressor<E>, Box<dyn std::error::Error>> {
    let fit_start_time = Instant::now();
    let name = estimator.name();
    let ensemble = BaggedRegressor::build(train, estimator, params, rng)?;
    info!(
        "{} fit in {:.3} secs",
        name,
        fit_start_time.elapsed().as_secs_f64()
    );

    let predictions = ensemble.predict_matrix(&test.features)?;
    println!("Average Predicted Home Prices ({}):", name);
    for price in &predictions {
        println!("{:.2}", price);
    }
    println!("{}", RegressionReport::compute(&predictions, &test.target)?);
    Ok(ensemble)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();
    let start_time = Instant::now();

    let dataset = load_csv(&args.data)?;
    if !args.quiet {
        println!("Loaded Data:");
        for (row, target) in dataset.features.rows_to_vec().iter().zip(&dataset.target) {
            println!("[{}] -> {}", row.iter().format(" "), target);
        }
    }

    let (train, test) = dataset.split(args.train_ratio)?;
    info!("{} train samples, {} test samples", train.n_rows(), test.n_rows());

    let params = EnsembleParams {
        n_iterations: args.iterations,
        bootstrap: args.bootstrap,
    };
    let mut rng = StdRng::seed_from_u64(args.seed);

    let ols = run_variant(
        &train,
        &test,
        OrdinaryLeastSquares::default(),
        &params,
        &mut rng,
    )?;
    let ridge = run_variant(
        &train,
        &test,
        Ridge::new(RidgeParams {
            lambda: args.lambda,
        }),
        &params,
        &mut rng,
    )?;

    if let Some(path) = &args.model_out {
        let models = serde_json::json!({
            "ols": ols.mean_model()?,
            "ridge": ridge.mean_model()?,
        });
        let mut file = File::create(path)?;
        file.write_all(serde_json::to_string_pretty(&models)?.as_bytes())?;
        println!("Models written to {}", path.display());
    }

    println!("Time to execute code: {:?}", start_time.elapsed());
    Ok(())
}
