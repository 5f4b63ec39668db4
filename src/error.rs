use thiserror::Error;

/// Error raised by the numeric core: solvers, estimators, predictions and metrics.
///
/// Every variant is plain data so the error is `Send + Sync` and can cross Rayon workers.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
pub enum FitError {
    #[error("dimension mismatch: {0}")]
    DimensionMismatch(String),

    #[error("underdetermined system: {n_rows} rows for {n_cols} columns")]
    Underdetermined { n_rows: usize, n_cols: usize },

    #[error("matrix is singular or does not have full column rank")]
    SingularMatrix,

    #[error("target at index {index} is zero, percentage error is undefined")]
    DivisionByZero { index: usize },

    #[error("empty input: {0}")]
    EmptyInput(String),

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

impl FitError {
    pub(crate) fn mismatch(what: &str, expected: usize, got: usize) -> FitError {
        FitError::DimensionMismatch(format!("{}: expected {}, got {}", what, expected, got))
    }
}

pub type FitResult<T> = Result<T, FitError>;

/// Error raised while loading or splitting a dataset.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("cannot read dataset: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("line {line}, column {column}: cannot parse {value:?} as a number")]
    Parse {
        line: usize,
        column: usize,
        value: String,
    },

    #[error("line {line} has {got} columns, expected {expected}")]
    Ragged {
        line: usize,
        expected: usize,
        got: usize,
    },

    #[error("{got} column(s) per row, need an identifier, features and a target")]
    TooFewColumns { got: usize },

    #[error("dataset is empty: {0}")]
    Empty(String),

    #[error("invalid split: {0}")]
    InvalidSplit(String),

    #[error(transparent)]
    Fit(#[from] FitError),
}

pub type DataResult<T> = Result<T, DataError>;
