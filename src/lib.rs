//! Linear regression on tabular data: ordinary least squares, ridge, and the
//! usual regression error metrics.

#[macro_use]
extern crate serde_derive;

mod data;
mod ensemble;
mod error;
mod estimator;
mod linalg;
mod math;
mod matrix;
mod metrics;
mod model;

pub use crate::data::*;
pub use crate::ensemble::*;
pub use crate::error::*;
pub use crate::estimator::*;
pub use crate::linalg::*;
pub use crate::math::*;
pub use crate::matrix::*;
pub use crate::metrics::*;
pub use crate::model::*;

pub static DEFAULT_LAMBDA: f64 = 0.1;
pub static DEFAULT_N_ITERATIONS: usize = 100;
pub static DEFAULT_TRAIN_RATIO: f64 = 0.7;
/// Relative tolerance under which a pivot or a residual column norm is treated as zero.
pub(crate) static DEFAULT_RANK_TOLERANCE: f64 = 1e-10;
