use crate::assignment::AssignmentSolver;
use crate::error::{ClusterError, Result};
use crate::hitlist::Clustering;
use crate::set_util::{count_intersection, count_union};
use crate::Matrix;

/// `K1 × K2` matrix of normalized symmetric differences
/// `|A_i Δ B_j| / |A_i ∪ B_j|`, 0 where both clusters are empty.
pub fn symmetric_difference_matrix(a: &Clustering, b: &Clustering) -> Matrix {
    let mut matrix = Matrix::zeros((a.len(), b.len()));
    for (i, left) in a.iter().enumerate() {
        for (j, right) in b.iter().enumerate() {
            let union = count_union(left, right);
            if union > 0 {
                let common = count_intersection(left, right);
                matrix[[i, j]] = (union - common) as f64 / union as f64;
            }
        }
    }
    matrix
}

/// Mean normalized symmetric difference over the best one-to-one matching
/// of the clusters. 0 for identical partitions, at most 1.
///
/// Both partitions must have the same number of clusters.
pub fn symmetric_difference<S: AssignmentSolver>(a: &Clustering, b: &Clustering, solver: &S) -> Result<f64> {
    if a.len() != b.len() {
        return Err(ClusterError::invalid(
            "symmetric_difference",
            format!("cluster counts differ: {} vs {}", a.len(), b.len()),
        ));
    }
    if a.is_empty() {
        return Err(ClusterError::invalid("symmetric_difference", "partitions have no clusters"));
    }

    let assignment = solver.solve(&symmetric_difference_matrix(a, b))?;
    Ok(assignment.cost / a.len() as f64)
}
