//! The linear assignment problem (LAP) seam.
//!
//! Cluster comparison needs an optimal one-to-one matching between the
//! clusters of two partitions. The matching itself is delegated to an
//! [`AssignmentSolver`]; [`KuhnMunkres`] wraps the Hungarian method from the
//! `pathfinding` crate.

use crate::error::{ClusterError, Result};
use crate::Matrix;
use log::trace;
use pathfinding::prelude::{kuhn_munkres_min, Matrix as WeightMatrix};

/// An optimal bijection between the rows and columns of a square cost matrix.
#[derive(Clone, Debug, PartialEq)]
pub struct Assignment {
    /// Sum of the costs of the chosen cells.
    pub cost: f64,
    /// `row_solution[i]` is the column assigned to row `i`.
    pub row_solution: Vec<usize>,
    /// `col_solution[j]` is the row assigned to column `j`.
    pub col_solution: Vec<usize>,
}

/// Solves the linear assignment problem on a square cost matrix.
pub trait AssignmentSolver {
    /// Returns a bijection minimizing the total cost.
    fn solve(&self, cost: &Matrix) -> Result<Assignment>;
}

impl<S: AssignmentSolver + ?Sized> AssignmentSolver for &S {
    fn solve(&self, cost: &Matrix) -> Result<Assignment> {
        (**self).solve(cost)
    }
}

/// Hungarian method on integer weights.
///
/// Integral costs are solved exactly. Fractional costs are quantized to
/// 2^-40 of the largest magnitude before solving; the reported cost is always
/// summed from the original matrix.
#[derive(Clone, Copy, Debug, Default)]
pub struct KuhnMunkres;

impl KuhnMunkres {
    const RESOLUTION: f64 = (1u64 << 40) as f64;

    fn quantize(cost: &Matrix) -> Vec<i64> {
        let max_abs = cost.iter().fold(0.0_f64, |acc, x| acc.max(x.abs()));
        let integral = cost.iter().all(|x| x.fract() == 0.0);

        let scale = if integral && max_abs <= Self::RESOLUTION {
            1.0
        } else if max_abs > 0.0 {
            Self::RESOLUTION / max_abs
        } else {
            1.0
        };

        cost.iter().map(|&x| (x * scale).round() as i64).collect()
    }
}

impl AssignmentSolver for KuhnMunkres {
    fn solve(&self, cost: &Matrix) -> Result<Assignment> {
        if cost.nrows() != cost.ncols() {
            return Err(ClusterError::solver(format!(
                "cost matrix must be square, got {}x{}",
                cost.nrows(),
                cost.ncols()
            )));
        }
        if cost.iter().any(|x| !x.is_finite()) {
            return Err(ClusterError::solver("cost matrix contains non-finite values"));
        }

        let n = cost.nrows();
        if n == 0 {
            return Ok(Assignment {
                cost: 0.0,
                row_solution: Vec::new(),
                col_solution: Vec::new(),
            });
        }

        // row-major iteration matches the layout WeightMatrix expects
        let weights = WeightMatrix::from_vec(n, n, Self::quantize(cost))
            .map_err(|e| ClusterError::solver(e.to_string()))?;
        trace!("solving {}x{} assignment problem", n, n);
        let (_, row_solution) = kuhn_munkres_min(&weights);

        let mut col_solution = vec![0; n];
        for (row, &col) in row_solution.iter().enumerate() {
            col_solution[col] = row;
        }
        let total = row_solution
            .iter()
            .enumerate()
            .map(|(row, &col)| cost[[row, col]])
            .sum();

        Ok(Assignment {
            cost: total,
            row_solution,
            col_solution,
        })
    }
}

/// Embeds `matrix` in a square matrix, filling the new cells with `fill`.
pub fn pad_square(matrix: &Matrix, fill: f64) -> Matrix {
    let size = matrix.nrows().max(matrix.ncols());
    let mut padded = Matrix::from_elem((size, size), fill);
    padded
        .slice_mut(ndarray::s![..matrix.nrows(), ..matrix.ncols()])
        .assign(matrix);
    padded
}
