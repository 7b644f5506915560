use crate::error::{ClusterError, Result};
use crate::Matrix;
use ndarray::ArrayView1;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Distance and norm over fixed-length feature vectors.
///
/// Every variant satisfies `distance(v, v) == 0` and returns non-negative
/// values. Only the L-norm checks that both vectors have the same length;
/// the other variants compare the common prefix.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Metric {
    /// [Minkowski distance](https://en.wikipedia.org/wiki/Minkowski_distance) with exponent `p >= 1`.
    LNorm(f64),
    /// [Hamming distance](https://en.wikipedia.org/wiki/Hamming_distance): number of differing coordinates.
    Hamming,
    /// Categorical coordinates looked up in a square cost table.
    Indexed(Matrix),
}

impl Default for Metric {
    fn default() -> Self {
        Metric::LNorm(2.0)
    }
}

impl Metric {
    pub fn lnorm(p: f64) -> Result<Self> {
        check_exponent(p, "Metric::lnorm")?;
        Ok(Metric::LNorm(p))
    }

    pub fn euclidean() -> Self {
        Metric::LNorm(2.0)
    }

    pub fn manhattan() -> Self {
        Metric::LNorm(1.0)
    }

    pub fn hamming() -> Self {
        Metric::Hamming
    }

    /// Builds a table metric. `table[[x, y]]` is the cost of coordinate value
    /// `x` against value `y`.
    pub fn indexed(table: Matrix) -> Result<Self> {
        if table.is_empty() || table.nrows() != table.ncols() {
            return Err(ClusterError::invalid(
                "Metric::indexed",
                format!(
                    "table must be a non-empty square matrix, got {}x{}",
                    table.nrows(),
                    table.ncols()
                ),
            ));
        }
        Ok(Metric::Indexed(table))
    }

    /// Magnitude of a single vector.
    pub fn norm(&self, v: &ArrayView1<f64>) -> Result<f64> {
        match self {
            Metric::LNorm(p) => {
                check_exponent(*p, "Metric::norm")?;
                Ok(lnorm_norm(*p, v))
            }
            Metric::Hamming => Ok(v.iter().filter(|&&x| x != 0.0).count() as f64),
            Metric::Indexed(table) => {
                let mut sum = 0.0;
                for &x in v.iter() {
                    sum += table[[0, category(table, x, "Metric::norm")?]];
                }
                Ok(sum)
            }
        }
    }

    /// Dissimilarity between two vectors.
    #[inline]
    pub fn distance(&self, u: &ArrayView1<f64>, v: &ArrayView1<f64>) -> Result<f64> {
        match self {
            Metric::LNorm(p) => {
                check_exponent(*p, "Metric::distance")?;
                if u.len() != v.len() {
                    return Err(ClusterError::invalid(
                        "Metric::distance",
                        format!("vectors have different lengths ({} vs {})", u.len(), v.len()),
                    ));
                }
                Ok(lnorm_distance(*p, u, v))
            }
            Metric::Hamming => Ok(u
                .iter()
                .zip(v.iter())
                .filter(|(x, y)| x != y)
                .count() as f64),
            Metric::Indexed(table) => {
                let mut sum = 0.0;
                for (&x, &y) in u.iter().zip(v.iter()) {
                    let i = category(table, x, "Metric::distance")?;
                    let j = category(table, y, "Metric::distance")?;
                    sum += table[[i, j]];
                }
                Ok(sum)
            }
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Metric::LNorm(p) => write!(f, "lnorm({})", p),
            Metric::Hamming => write!(f, "hamming"),
            Metric::Indexed(table) => write!(f, "indexed({}x{})", table.nrows(), table.ncols()),
        }
    }
}

fn check_exponent(p: f64, operation: &'static str) -> Result<()> {
    if !p.is_finite() || p < 1.0 {
        return Err(ClusterError::invalid(
            operation,
            format!("exponent must be a finite value >= 1, got {}", p),
        ));
    }
    Ok(())
}

fn lnorm_norm(p: f64, v: &ArrayView1<f64>) -> f64 {
    if p == 1.0 {
        return v.iter().map(|x| x.abs()).sum();
    }
    if p == 2.0 {
        return v.iter().map(|x| x * x).sum::<f64>().sqrt();
    }
    v.iter().map(|x| x.abs().powf(p)).sum::<f64>().powf(1.0 / p)
}

fn lnorm_distance(p: f64, u: &ArrayView1<f64>, v: &ArrayView1<f64>) -> f64 {
    if p == 1.0 {
        return u.iter().zip(v.iter()).map(|(x, y)| (x - y).abs()).sum();
    }
    if p == 2.0 {
        return u
            .iter()
            .zip(v.iter())
            .map(|(x, y)| (x - y) * (x - y))
            .sum::<f64>()
            .sqrt();
    }
    u.iter()
        .zip(v.iter())
        .map(|(x, y)| (x - y).abs().powf(p))
        .sum::<f64>()
        .powf(1.0 / p)
}

/// Converts a coordinate into a row/column of the cost table.
fn category(table: &Matrix, x: f64, operation: &'static str) -> Result<usize> {
    if x < 0.0 || x.fract() != 0.0 || x >= table.nrows() as f64 {
        return Err(ClusterError::invalid(
            operation,
            format!(
                "coordinate {} is not a category of the {}x{} table",
                x,
                table.nrows(),
                table.ncols()
            ),
        ));
    }
    Ok(x as usize)
}
