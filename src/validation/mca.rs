use super::contingency::{check_partitions, intersection_matrix};
use crate::assignment::{pad_square, AssignmentSolver};
use crate::error::{ClusterError, Result};
use crate::hitlist::Clustering;
use log::debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Maximum cluster assignment score with the matching that achieves it.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct McaSolution {
    /// Fraction of samples on the diagonal of the best matching, in `(0, 1]`.
    pub score: f64,
    /// Cluster of the second partition matched to each cluster of the first;
    /// `None` when the cluster has no partner.
    pub row_solution: Vec<Option<usize>>,
    /// Cluster of the first partition matched to each cluster of the second.
    pub col_solution: Vec<Option<usize>>,
}

/// Maximum cluster assignment of two partitions over `n` samples.
///
/// The intersection matrix is mirrored (`max − m`) so that the minimum-cost
/// assignment maximizes the matched overlap. Partitions with different
/// cluster counts are padded with dummy clusters that overlap nothing.
pub fn mca_with_solution<S: AssignmentSolver>(
    a: &Clustering,
    b: &Clustering,
    n: usize,
    solver: &S,
) -> Result<McaSolution> {
    check_partitions(a, b, n, "mca")?;
    let (k1, k2) = (a.len(), b.len());
    if k1 == 0 || k2 == 0 {
        return Err(ClusterError::invalid("mca", "both partitions need at least one cluster"));
    }

    let overlap = intersection_matrix(a, b).mapv(|m| m as f64);
    let max = overlap.fold(0.0_f64, |acc, &m| acc.max(m));
    let mirrored = pad_square(&overlap.mapv(|m| max - m), max);
    let k = mirrored.nrows();

    let assignment = solver.solve(&mirrored)?;
    let matched = max * k as f64 - assignment.cost;
    debug!("mca: {}x{} clusters, {} of {} samples matched", k1, k2, matched, n);

    let real = |partner: usize, limit: usize| (partner < limit).then_some(partner);
    Ok(McaSolution {
        score: matched / n as f64,
        row_solution: assignment.row_solution[..k1].iter().map(|&j| real(j, k2)).collect(),
        col_solution: assignment.col_solution[..k2].iter().map(|&i| real(i, k1)).collect(),
    })
}

/// Maximum cluster assignment score of two partitions over `n` samples.
pub fn mca<S: AssignmentSolver>(a: &Clustering, b: &Clustering, n: usize, solver: &S) -> Result<f64> {
    Ok(mca_with_solution(a, b, n, solver)?.score)
}

/// Maximum cluster assignment of two integer label vectors.
///
/// Both vectors are shifted by their common minimum label, so any contiguous
/// labelling (0-based, 1-based, negative) is accepted. A label range wider
/// than the total number of labels is rejected.
pub fn mca_from_labels<S: AssignmentSolver>(labels_a: &[i64], labels_b: &[i64], solver: &S) -> Result<McaSolution> {
    if labels_a.len() != labels_b.len() {
        return Err(ClusterError::invalid(
            "mca_from_labels",
            format!(
                "label vectors differ in length: {} vs {}",
                labels_a.len(),
                labels_b.len()
            ),
        ));
    }
    let (Some(min), Some(max)) = (
        labels_a.iter().chain(labels_b).min().copied(),
        labels_a.iter().chain(labels_b).max().copied(),
    ) else {
        return Err(ClusterError::invalid("mca_from_labels", "label vectors are empty"));
    };

    // a contiguous labelling never spans more clusters than there are labels
    let labels = labels_a.len() + labels_b.len();
    let k = max
        .checked_sub(min)
        .and_then(|range| usize::try_from(range).ok())
        .filter(|&range| range < labels)
        .map(|range| range + 1)
        .ok_or_else(|| {
            ClusterError::invalid(
                "mca_from_labels",
                format!("labels span [{}, {}], more clusters than the {} labels", min, max, labels),
            )
        })?;

    let shift = |labels: &[i64]| -> Vec<usize> { labels.iter().map(|&l| (l - min) as usize).collect() };
    let a = Clustering::with_clusters(&shift(labels_a), k)?;
    let b = Clustering::with_clusters(&shift(labels_b), k)?;

    mca_with_solution(&a, &b, labels_a.len(), solver)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assignment::KuhnMunkres;

    #[test]
    fn test_identical_partitions() {
        let a = Clustering::from_hit_lists(vec![vec![0, 1, 2], vec![3, 4, 5]]);
        let solution = mca_with_solution(&a, &a, 6, &KuhnMunkres).unwrap();

        assert!((solution.score - 1.0).abs() < 1e-12);
        assert_eq!(solution.row_solution, vec![Some(0), Some(1)]);
    }

    #[test]
    fn test_permuted_partitions() {
        let a = Clustering::from_labels(&[0, 0, 1, 1, 2, 2]);
        let b = Clustering::from_labels(&[2, 2, 0, 0, 1, 1]);
        let solution = mca_with_solution(&a, &b, 6, &KuhnMunkres).unwrap();

        assert!((solution.score - 1.0).abs() < 1e-12);
        assert_eq!(solution.row_solution, vec![Some(2), Some(0), Some(1)]);
        assert_eq!(solution.col_solution, vec![Some(1), Some(2), Some(0)]);
    }

    #[test]
    fn test_partial_overlap() {
        let a = Clustering::from_hit_lists(vec![vec![0, 1], vec![2, 3]]);
        let b = Clustering::from_hit_lists(vec![vec![0, 1, 2], vec![3]]);
        // best matching keeps {0,1} and {3}
        assert!((mca(&a, &b, 4, &KuhnMunkres).unwrap() - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_unequal_cluster_counts() {
        let a = Clustering::from_labels(&[0, 0, 0, 1, 1, 1]);
        let b = Clustering::from_labels(&[0, 0, 1, 1, 2, 2]);
        let solution = mca_with_solution(&a, &b, 6, &KuhnMunkres).unwrap();

        // two clusters of b can be matched, each overlapping two samples
        assert!((solution.score - 4.0 / 6.0).abs() < 1e-12);
        assert_eq!(solution.row_solution.len(), 2);
        assert_eq!(solution.col_solution.len(), 3);
        assert_eq!(solution.col_solution.iter().filter(|c| c.is_none()).count(), 1);
    }

    #[test]
    fn test_from_labels_shifts_by_common_minimum() {
        let solution = mca_from_labels(&[1, 1, 2, 2], &[2, 2, 1, 1], &KuhnMunkres).unwrap();
        assert!((solution.score - 1.0).abs() < 1e-12);
        assert_eq!(solution.row_solution, vec![Some(1), Some(0)]);

        let negative = mca_from_labels(&[-1, -1, 0], &[0, 0, -1], &KuhnMunkres).unwrap();
        assert!((negative.score - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_from_labels_rejects_bad_input() {
        assert!(mca_from_labels(&[0, 1], &[0], &KuhnMunkres).is_err());
        assert!(mca_from_labels(&[], &[], &KuhnMunkres).is_err());
    }

    #[test]
    fn test_from_labels_rejects_wide_label_range() {
        assert!(mca_from_labels(&[i64::MIN, 0], &[i64::MAX, 0], &KuhnMunkres).is_err());
        assert!(mca_from_labels(&[0, 1 << 40], &[0, 0], &KuhnMunkres).is_err());
        assert!(mca_from_labels(&[0, 5], &[0, 5], &KuhnMunkres).is_err());

        // disjoint labellings may use up to one cluster per label
        let disjoint = mca_from_labels(&[0, 1], &[2, 3], &KuhnMunkres).unwrap();
        assert_eq!(disjoint.score, 0.0);
    }

    #[test]
    fn test_rejects_empty_partition() {
        let a = Clustering::from_labels(&[0, 0]);
        assert!(mca(&a, &Clustering::new(0), 2, &KuhnMunkres).is_err());
    }
}
