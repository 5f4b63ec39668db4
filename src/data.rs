use crate::{ColumnMajorMatrix, DataError, DataResult};
use log::info;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Store the raw data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    /// Predictors, one row per sample, without intercept column
    pub features: ColumnMajorMatrix<f64>,
    /// Target, used for the learning
    pub target: Vec<f64>,
}

/// Util for parsing a CSV with a header row into a dataset.
///
/// The first column is an identifier and is ignored. The last column is the target, every
/// column in between is a feature.
pub fn parse_csv(data: &str) -> DataResult<Dataset> {
    Dataset::from_reader(data.as_bytes())
}

/// Same as `parse_csv`, reading the file at `path`.
pub fn load_csv(path: impl AsRef<Path>) -> DataResult<Dataset> {
    let path = path.as_ref();
    let dataset = Dataset::from_reader(File::open(path)?)?;
    info!(
        "loaded {} samples with {} features from {}",
        dataset.n_rows(),
        dataset.n_features(),
        path.display()
    );
    Ok(dataset)
}

/// Design matrix: a column of ones followed by the features.
pub fn with_intercept(features: &ColumnMajorMatrix<f64>) -> ColumnMajorMatrix<f64> {
    ColumnMajorMatrix::from_function(features.n_rows(), features.n_cols() + 1, |row, col| {
        if col == 0 {
            1.
        } else {
            features[(row, col - 1)]
        }
    })
}

impl Dataset {
    pub fn from_reader(reader: impl Read) -> DataResult<Dataset> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let n_columns = reader.headers()?.len();
        if n_columns < 3 {
            return Err(DataError::TooFewColumns { got: n_columns });
        }

        let mut target: Vec<f64> = Vec::new();
        let mut features: Vec<Vec<f64>> = Vec::new();
        for (n_row, record) in reader.records().enumerate() {
            let record = record?;
            // The header is on line 1
            let line = record.position().map_or(n_row + 2, |p| p.line() as usize);
            if record.len() == 1 && record[0].is_empty() {
                continue;
            }
            if record.len() != n_columns {
                return Err(DataError::Ragged {
                    line,
                    expected: n_columns,
                    got: record.len(),
                });
            }

            let mut values = Vec::with_capacity(n_columns - 1);
            for column in 1..n_columns {
                let value = &record[column];
                let value = value.parse::<f64>().map_err(|_| DataError::Parse {
                    line,
                    column,
                    value: value.to_string(),
                })?;
                values.push(value);
            }
            target.extend(values.pop());
            features.push(values);
        }

        if target.is_empty() {
            return Err(DataError::Empty("no sample after the header".to_string()));
        }
        let features = ColumnMajorMatrix::from_rows(features)?;
        Ok(Dataset { features, target })
    }

    pub fn n_rows(&self) -> usize {
        self.target.len()
    }

    pub fn n_features(&self) -> usize {
        self.features.n_cols()
    }

    /// Rows `[start, end)` of the dataset.
    pub fn slice(&self, start: usize, end: usize) -> Dataset {
        let rows: Vec<usize> = (start..end).collect();
        self.select(&rows)
    }

    /// Dataset made of the given rows, in order. Rows can be repeated.
    pub fn select(&self, rows: &[usize]) -> Dataset {
        Dataset {
            features: self.features.select_rows(rows),
            target: rows.iter().map(|&row| self.target[row]).collect(),
        }
    }

    /// Split into a train set with the first `floor(train_ratio * n)` rows and a test set
    /// with the rest. There is no shuffling.
    pub fn split(&self, train_ratio: f64) -> DataResult<(Dataset, Dataset)> {
        if !(train_ratio > 0. && train_ratio < 1.) {
            return Err(DataError::InvalidSplit(format!(
                "train ratio must be in (0, 1), got {}",
                train_ratio
            )));
        }
        let n_rows = self.n_rows();
        let n_train = (train_ratio * n_rows as f64) as usize;
        if n_train == 0 || n_train == n_rows {
            return Err(DataError::InvalidSplit(format!(
                "a ratio of {} leaves an empty side with {} samples",
                train_ratio, n_rows
            )));
        }
        Ok((self.slice(0, n_train), self.slice(n_train, n_rows)))
    }
}
