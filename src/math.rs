use crate::{FitError, FitResult};
use itertools::Itertools;

pub fn sum(v: &[f64]) -> f64 {
    let mut o = 0.;
    for e in v.iter() {
        o += *e;
    }
    o
}

pub fn mean(v: &[f64]) -> f64 {
    sum(v) / (v.len() as f64)
}

/// Dot product of two vectors of the same length.
pub fn dot(a: &[f64], b: &[f64]) -> FitResult<f64> {
    if a.len() != b.len() {
        return Err(FitError::mismatch("length of dot product operand", a.len(), b.len()));
    }
    Ok(a.iter().zip_eq(b).map(|(&a, &b)| a * b).sum())
}

pub(crate) fn squared_norm(v: &[f64]) -> f64 {
    v.iter().map(|e| e.powi(2)).sum()
}

/// Element-wise `a * x + b * y`.
pub fn linear_combination(a: f64, x: &[f64], b: f64, y: &[f64]) -> FitResult<Vec<f64>> {
    if x.len() != y.len() {
        return Err(FitError::mismatch("length of combined vectors", x.len(), y.len()));
    }
    Ok(x.iter().zip_eq(y).map(|(&x, &y)| a * x + b * y).collect())
}

/// Column-wise mean of vectors of the same length.
pub(crate) fn mean_vectors(vectors: &[Vec<f64>]) -> FitResult<Vec<f64>> {
    let first = vectors
        .first()
        .ok_or_else(|| FitError::EmptyInput("no vector to average".to_string()))?;
    let mut o = vec![0.; first.len()];
    for v in vectors {
        if v.len() != o.len() {
            return Err(FitError::mismatch("length of averaged vector", o.len(), v.len()));
        }
        for (o, e) in o.iter_mut().zip(v) {
            *o += e;
        }
    }
    let n = vectors.len() as f64;
    o.iter_mut().for_each(|e| *e /= n);
    Ok(o)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn test_dot() {
        assert_approx_eq!(dot(&[1., 2., 3.], &[4., -5., 6.]).unwrap(), 12.);
        assert!(dot(&[1., 2.], &[1.]).is_err());
    }

    #[test]
    fn test_mean_vectors() {
        let m = mean_vectors(&[vec![1., 2.], vec![3., 6.]]).unwrap();
        assert_eq!(m, vec![2., 4.]);
        assert_eq!(
            mean_vectors(&[]),
            Err(FitError::EmptyInput("no vector to average".to_string()))
        );
    }

    #[test]
    fn test_linear_combination() {
        let v = linear_combination(2., &[1., 0.], -1., &[0., 3.]).unwrap();
        assert_eq!(v, vec![2., -3.]);
    }
}
