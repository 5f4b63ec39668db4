use crate::math::squared_norm;
use crate::{ColumnMajorMatrix, FitError, FitResult, DEFAULT_RANK_TOLERANCE};
use log::trace;

type Matrix = ColumnMajorMatrix<f64>;

/// What a least-squares solve does with a column that is a linear combination of the
/// columns before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RankPolicy {
    /// Fail with `FitError::SingularMatrix`.
    #[default]
    Error,
    /// Give the column a coefficient of 0 and solve with the remaining ones.
    DropDependent,
}

pub fn transpose(a: &Matrix) -> Matrix {
    ColumnMajorMatrix::from_function(a.n_cols(), a.n_rows(), |row, col| a[(col, row)])
}

pub fn matmul(a: &Matrix, b: &Matrix) -> FitResult<Matrix> {
    if a.n_cols() != b.n_rows() {
        return Err(FitError::mismatch("rows of right operand", a.n_cols(), b.n_rows()));
    }
    let mut o = ColumnMajorMatrix::zeros(a.n_rows(), b.n_cols());
    for col in 0..b.n_cols() {
        let b_col = b.column(col);
        let o_col = o.column_mut(col);
        // Accumulate column by column so every access is contiguous
        for (k, &b_kc) in b_col.iter().enumerate() {
            if b_kc == 0. {
                continue;
            }
            for (o, &a_ik) in o_col.iter_mut().zip(a.column(k)) {
                *o += a_ik * b_kc;
            }
        }
    }
    Ok(o)
}

pub fn mat_vec(a: &Matrix, v: &[f64]) -> FitResult<Vec<f64>> {
    if a.n_cols() != v.len() {
        return Err(FitError::mismatch("length of vector", a.n_cols(), v.len()));
    }
    let mut o = vec![0.; a.n_rows()];
    for (column, &v_k) in a.columns().zip(v) {
        for (o, &a_ik) in o.iter_mut().zip(column) {
            *o += a_ik * v_k;
        }
    }
    Ok(o)
}

/// Inverse of a square matrix by Gauss-Jordan elimination with partial pivoting.
///
/// A pivot is negligible when it is small relative to the largest entry of its own column
/// in `a`, so columns of very different magnitudes are judged separately.
pub fn inverse(a: &Matrix) -> FitResult<Matrix> {
    if !a.is_square() {
        return Err(FitError::mismatch("columns of a square matrix", a.n_rows(), a.n_cols()));
    }
    let n = a.n_rows();
    let col_scales: Vec<f64> = a
        .columns()
        .map(|c| c.iter().fold(0., |acc: f64, e| acc.max(e.abs())))
        .collect();
    if n == 0 || col_scales.iter().any(|&s| s == 0.) {
        return Err(FitError::SingularMatrix);
    }

    let mut a = a.clone();
    let mut inv = ColumnMajorMatrix::identity(n);
    for k in 0..n {
        let mut pivot_row = k;
        for row in k + 1..n {
            if a[(row, k)].abs() > a[(pivot_row, k)].abs() {
                pivot_row = row;
            }
        }
        let pivot = a[(pivot_row, k)];
        if pivot.abs() <= DEFAULT_RANK_TOLERANCE * col_scales[k] {
            trace!("pivot {} at step {} is negligible", pivot, k);
            return Err(FitError::SingularMatrix);
        }
        if pivot_row != k {
            swap_rows(&mut a, k, pivot_row);
            swap_rows(&mut inv, k, pivot_row);
        }

        for col in 0..n {
            a[(k, col)] /= pivot;
            inv[(k, col)] /= pivot;
        }
        for row in 0..n {
            if row == k {
                continue;
            }
            let factor = a[(row, k)];
            if factor == 0. {
                continue;
            }
            for col in 0..n {
                let (a_kc, inv_kc) = (a[(k, col)], inv[(k, col)]);
                a[(row, col)] -= factor * a_kc;
                inv[(row, col)] -= factor * inv_kc;
            }
        }
    }
    Ok(inv)
}

fn swap_rows(a: &mut Matrix, r1: usize, r2: usize) {
    for col in 0..a.n_cols() {
        a.column_mut(col).swap(r1, r2);
    }
}

/// Solve the square system `a x = b`.
pub fn solve(a: &Matrix, b: &[f64]) -> FitResult<Vec<f64>> {
    if !a.is_square() {
        return Err(FitError::mismatch("columns of a square matrix", a.n_rows(), a.n_cols()));
    }
    solve_least_squares(a, b, RankPolicy::Error)
}

/// Find `x` minimizing `||a x - b||²` with a Householder QR decomposition of `a`.
///
/// The columns are processed in order. When the part of a column that is orthogonal to
/// the previous columns is negligible relative to its norm, the column is rank deficient
/// and `policy` decides what happens.
pub fn solve_least_squares(a: &Matrix, b: &[f64], policy: RankPolicy) -> FitResult<Vec<f64>> {
    let (n_rows, n_cols) = (a.n_rows(), a.n_cols());
    if b.len() != n_rows {
        return Err(FitError::mismatch("length of right-hand side", n_rows, b.len()));
    }
    if n_cols == 0 {
        return Err(FitError::EmptyInput("matrix without columns".to_string()));
    }
    if n_rows < n_cols {
        return Err(FitError::Underdetermined { n_rows, n_cols });
    }

    let col_norms: Vec<f64> = a.columns().map(|c| squared_norm(c).sqrt()).collect();
    let mut r = a.clone();
    let mut qtb = b.to_vec();
    // Columns kept in the triangular factor; the position in `kept` is the row of R.
    let mut kept: Vec<usize> = Vec::with_capacity(n_cols);

    for col in 0..n_cols {
        let rank = kept.len();
        let norm = squared_norm(&r.column(col)[rank..]).sqrt();
        if norm <= DEFAULT_RANK_TOLERANCE * col_norms[col] || norm == 0. {
            match policy {
                RankPolicy::Error => return Err(FitError::SingularMatrix),
                RankPolicy::DropDependent => {
                    trace!("column {} is linearly dependent, dropped", col);
                    continue;
                }
            }
        }

        // Reflector v such that (I - 2 v vᵗ / vᵗv) maps the sub-column to alpha * e_0
        let head = r[(rank, col)];
        let alpha = if head > 0. { -norm } else { norm };
        let mut v = r.column(col)[rank..].to_vec();
        v[0] -= alpha;
        let v_norm2 = squared_norm(&v);

        {
            let column = r.column_mut(col);
            column[rank] = alpha;
            column[rank + 1..].iter_mut().for_each(|e| *e = 0.);
        }
        if v_norm2 > 0. {
            for other in col + 1..n_cols {
                reflect(&v, v_norm2, &mut r.column_mut(other)[rank..]);
            }
            reflect(&v, v_norm2, &mut qtb[rank..]);
        }
        kept.push(col);
    }

    // Back substitution on the triangular factor
    let mut x = vec![0.; n_cols];
    for (row, &col) in kept.iter().enumerate().rev() {
        let mut s = qtb[row];
        for &other in &kept[row + 1..] {
            s -= r[(row, other)] * x[other];
        }
        x[col] = s / r[(row, col)];
    }
    Ok(x)
}

fn reflect(v: &[f64], v_norm2: f64, target: &mut [f64]) {
    let d: f64 = v.iter().zip(target.iter()).map(|(a, b)| a * b).sum();
    let f = 2. * d / v_norm2;
    for (t, &v) in target.iter_mut().zip(v) {
        *t -= f * v;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! assert_vec_close {
        ($a: expr, $b: expr, $delta: expr) => {{
            let (a, b, delta): (&[f64], &[f64], f64) = (&$a, &$b, $delta);
            assert_eq!(a.len(), b.len(), "{:?} and {:?} differ in length", a, b);
            for (x, y) in a.iter().zip(b.iter()) {
                assert!((x - y).abs() <= delta, "{:?} != {:?} at +-{}", a, b, delta);
            }
        }};
    }

    fn matrix(rows: Vec<Vec<f64>>) -> Matrix {
        ColumnMajorMatrix::from_rows(rows).unwrap()
    }

    #[test]
    fn test_transpose_and_matmul() {
        let a = matrix(vec![vec![1., 2., 3.], vec![4., 5., 6.]]);
        let at = transpose(&a);
        assert_eq!(at.rows_to_vec(), vec![vec![1., 4.], vec![2., 5.], vec![3., 6.]]);

        let ata = matmul(&at, &a).unwrap();
        assert_eq!(
            ata.rows_to_vec(),
            vec![vec![17., 22., 27.], vec![22., 29., 36.], vec![27., 36., 45.]]
        );
        assert!(matmul(&a, &a).is_err());
    }

    #[test]
    fn test_mat_vec() {
        let a = matrix(vec![vec![1., 2.], vec![3., 4.]]);
        assert_eq!(mat_vec(&a, &[1., -1.]).unwrap(), vec![-1., -1.]);
        assert!(mat_vec(&a, &[1.]).is_err());
    }

    #[test]
    fn test_inverse() {
        // Needs a row swap: the first pivot is 0
        let a = matrix(vec![vec![0., 2., 1.], vec![1., 1., 0.], vec![3., 0., 1.]]);
        let inv = inverse(&a).unwrap();
        let product = matmul(&a, &inv).unwrap();
        let identity = ColumnMajorMatrix::identity(3);
        assert_vec_close!(product.flat(), identity.flat(), 1e-12);
    }

    #[test]
    fn test_inverse_singular() {
        let a = matrix(vec![vec![1., 2.], vec![2., 4.]]);
        assert_eq!(inverse(&a), Err(FitError::SingularMatrix));
        let not_square = matrix(vec![vec![1., 2.]]);
        assert!(matches!(
            inverse(&not_square),
            Err(FitError::DimensionMismatch(_))
        ));
    }

    #[test]
    fn test_inverse_mixed_scales() {
        let a = matrix(vec![vec![1e12, 0.], vec![0., 1.]]);
        let inv = inverse(&a).unwrap();
        assert_vec_close!(inv.flat(), [1e-12, 0., 0., 1.], 1e-15);

        // Gram matrix of an intercept, a large feature and a 0/1 flag
        let a = matrix(vec![
            vec![200., 2.5e6, 3.],
            vec![2.5e6, 3.4e10, 3.6e4],
            vec![3., 3.6e4, 3.],
        ]);
        let inv = inverse(&a).unwrap();
        // 1 / Schur complement of the flag
        assert!((inv[(2, 2)] - 0.338503).abs() < 1e-5, "{:?}", inv);
    }

    #[test]
    fn test_solve_square() {
        // 2x + y = 5, x - y = 1
        let a = matrix(vec![vec![2., 1.], vec![1., -1.]]);
        let x = solve(&a, &[5., 1.]).unwrap();
        assert_vec_close!(x, [2., 1.], 1e-12);
    }

    #[test]
    fn test_least_squares_line() {
        // Best line through (0, 1), (1, 3), (2, 4): y = 7/6 + 3/2 x
        let a = matrix(vec![vec![1., 0.], vec![1., 1.], vec![1., 2.]]);
        let x = solve_least_squares(&a, &[1., 3., 4.], RankPolicy::Error).unwrap();
        assert_vec_close!(x, [7. / 6., 1.5], 1e-12);
    }

    #[test]
    fn test_least_squares_errors() {
        let a = matrix(vec![vec![1., 2., 3.], vec![4., 5., 6.]]);
        assert_eq!(
            solve_least_squares(&a, &[1., 2.], RankPolicy::Error),
            Err(FitError::Underdetermined { n_rows: 2, n_cols: 3 })
        );
        assert!(matches!(
            solve_least_squares(&a, &[1.], RankPolicy::Error),
            Err(FitError::DimensionMismatch(_))
        ));
    }

    #[test]
    fn test_least_squares_rank_deficient() {
        let a = matrix(vec![
            vec![1., 1., 2.],
            vec![1., 2., 3.],
            vec![1., 3., 4.],
            vec![1., 4., 5.],
        ]);
        let b = [2., 3., 4., 5.];
        assert_eq!(
            solve_least_squares(&a, &b, RankPolicy::Error),
            Err(FitError::SingularMatrix)
        );
        let x = solve_least_squares(&a, &b, RankPolicy::DropDependent).unwrap();
        assert_vec_close!(x, [1., 1., 0.], 1e-10);
    }

    #[test]
    fn test_zero_column() {
        let a = matrix(vec![vec![1., 0.], vec![1., 0.]]);
        assert_eq!(
            solve_least_squares(&a, &[1., 1.], RankPolicy::Error),
            Err(FitError::SingularMatrix)
        );
        let x = solve_least_squares(&a, &[1., 3.], RankPolicy::DropDependent).unwrap();
        assert_vec_close!(x, [2., 0.], 1e-12);
    }
}
