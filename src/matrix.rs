use crate::{FitError, FitResult};
use core::ops::{Index, IndexMut};

/// Slice of data with a stride, used to look at a row of a column-major matrix.
pub struct StridedVecView<'a, A: 'a> {
    pub data: &'a [A],
    pub start: usize,
    pub stride: usize,
    len: usize,
}

impl<'a, A: 'a> StridedVecView<'a, A> {
    pub fn new(data: &'a [A], start: usize, stride: usize, len: usize) -> Self {
        Self {
            data,
            start,
            stride,
            len,
        }
    }

    pub fn from_slice(data: &'a [A]) -> Self {
        Self {
            data,
            start: 0,
            stride: 1,
            len: data.len(),
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = &A> + '_ {
        (0..self.len).map(move |pos| &self[pos])
    }
}

impl<'a, A: 'a + Clone> StridedVecView<'a, A> {
    pub fn to_vec(&self) -> Vec<A> {
        self.iter().cloned().collect()
    }
}

impl<'a, A: 'a> Index<usize> for StridedVecView<'a, A> {
    type Output = A;
    fn index(&self, pos: usize) -> &A {
        assert!(pos < self.len, "index {} out of a view of {}", pos, self.len);
        &self.data[self.start + pos * self.stride]
    }
}

/// Store a dense matrix in a column-major way.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnMajorMatrix<A> {
    /// Number of rows in the matrix
    n_rows: usize,
    /// Number of columns in the matrix
    n_cols: usize,
    /// Values, one column after the other
    values: Vec<A>,
}

impl<A> ColumnMajorMatrix<A> {
    /// Build a matrix from its columns. All the columns must have the same length.
    pub fn from_columns(columns: Vec<Vec<A>>) -> FitResult<Self> {
        let n_cols = columns.len();
        let n_rows = columns.first().map_or(0, |c| c.len());
        let mut values = Vec::with_capacity(n_rows * n_cols);
        for (n_col, column) in columns.into_iter().enumerate() {
            if column.len() != n_rows {
                return Err(FitError::mismatch(
                    &format!("length of column {}", n_col),
                    n_rows,
                    column.len(),
                ));
            }
            values.extend(column);
        }
        Ok(Self {
            n_rows,
            n_cols,
            values,
        })
    }

    /// Build a matrix from its rows. All the rows must have the same length.
    pub fn from_rows(rows: Vec<Vec<A>>) -> FitResult<Self> {
        let n_rows = rows.len();
        let n_cols = rows.first().map_or(0, |r| r.len());
        for (n_row, row) in rows.iter().enumerate() {
            if row.len() != n_cols {
                return Err(FitError::mismatch(
                    &format!("length of row {}", n_row),
                    n_cols,
                    row.len(),
                ));
            }
        }

        // We transpose by pulling one item of each row per column
        let mut values: Vec<A> = Vec::with_capacity(n_rows * n_cols);
        let mut rows: Vec<_> = rows.into_iter().map(|r| r.into_iter()).collect();
        for _ in 0..n_cols {
            for row in &mut rows {
                values.extend(row.next());
            }
        }
        debug_assert_eq!(n_rows * n_cols, values.len());
        Ok(Self {
            n_rows,
            n_cols,
            values,
        })
    }

    pub fn from_function(
        n_rows: usize,
        n_cols: usize,
        mut f: impl FnMut(usize, usize) -> A,
    ) -> Self {
        let mut values = Vec::with_capacity(n_rows * n_cols);
        for col in 0..n_cols {
            for row in 0..n_rows {
                values.push(f(row, col));
            }
        }
        Self {
            n_rows,
            n_cols,
            values,
        }
    }

    pub fn column(&self, col: usize) -> &[A] {
        let start = col * self.n_rows;
        &self.values[start..start + self.n_rows]
    }

    pub fn column_mut(&mut self, col: usize) -> &mut [A] {
        let start = col * self.n_rows;
        &mut self.values[start..start + self.n_rows]
    }

    /// One slice per column, empty slices when the matrix has no row.
    pub fn columns(&self) -> impl Iterator<Item = &[A]> {
        (0..self.n_cols).map(move |col| self.column(col))
    }

    pub fn row(&self, row: usize) -> StridedVecView<'_, A> {
        assert!(row < self.n_rows, "row {} out of {}", row, self.n_rows);
        StridedVecView::new(&self.values, row, self.n_rows, self.n_cols)
    }

    pub fn flat(&self) -> &[A] {
        &self.values
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    pub fn n_cols(&self) -> usize {
        self.n_cols
    }

    pub fn is_square(&self) -> bool {
        self.n_rows == self.n_cols
    }
}

impl<A: Clone> ColumnMajorMatrix<A> {
    /// Copy of the given rows, in the given order. Rows can be repeated.
    pub fn select_rows(&self, rows: &[usize]) -> Self {
        Self::from_function(rows.len(), self.n_cols, |row, col| {
            self[(rows[row], col)].clone()
        })
    }

    pub fn rows_to_vec(&self) -> Vec<Vec<A>> {
        (0..self.n_rows).map(|row| self.row(row).to_vec()).collect()
    }
}

impl ColumnMajorMatrix<f64> {
    pub fn zeros(n_rows: usize, n_cols: usize) -> Self {
        Self::from_function(n_rows, n_cols, |_, _| 0.)
    }

    pub fn identity(n: usize) -> Self {
        Self::from_function(n, n, |row, col| if row == col { 1. } else { 0. })
    }
}

impl<A> Index<(usize, usize)> for ColumnMajorMatrix<A> {
    type Output = A;
    fn index(&self, (row, col): (usize, usize)) -> &A {
        // No need to check for col because it will be out of the buffer
        assert!(row < self.n_rows);
        &self.values[row + col * self.n_rows]
    }
}

impl<A> IndexMut<(usize, usize)> for ColumnMajorMatrix<A> {
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut A {
        assert!(row < self.n_rows);
        &mut self.values[row + col * self.n_rows]
    }
}
