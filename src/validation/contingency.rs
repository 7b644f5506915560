use crate::error::{ClusterError, Result};
use crate::hitlist::Clustering;
use crate::set_util::count_intersection;
use ndarray::Array2;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// `K1 × K2` matrix with `m[[i, j]] = |A_i ∩ B_j|`.
///
/// Row sums are the cluster sizes of `a`, column sums those of `b`.
pub fn intersection_matrix(a: &Clustering, b: &Clustering) -> Array2<usize> {
    let mut matrix = Array2::zeros((a.len(), b.len()));
    for (i, left) in a.iter().enumerate() {
        for (j, right) in b.iter().enumerate() {
            matrix[[i, j]] = count_intersection(left, right);
        }
    }
    matrix
}

/// Sample pairs classified by co-membership in two partitions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PairCounts {
    /// Together in both partitions.
    pub a: u64,
    /// Together in the first partition only.
    pub b: u64,
    /// Together in the second partition only.
    pub c: u64,
    /// Separated in both partitions.
    pub d: u64,
}

impl PairCounts {
    pub fn total(&self) -> u64 {
        self.a + self.b + self.c + self.d
    }

    /// `a / (a + b + c)`, or 1.0 when no pair is together in either partition.
    pub fn jaccard(&self) -> f64 {
        let together = self.a + self.b + self.c;
        if together == 0 {
            return 1.0;
        }
        self.a as f64 / together as f64
    }

    /// `(a + d) / (a + b + c + d)`, or 1.0 when there are no pairs.
    pub fn rand(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 1.0;
        }
        (self.a + self.d) as f64 / total as f64
    }
}

fn pairs(m: usize) -> u64 {
    let m = m as u64;
    m * m.saturating_sub(1) / 2
}

pub(crate) fn check_partitions(a: &Clustering, b: &Clustering, n: usize, operation: &'static str) -> Result<()> {
    if n == 0 {
        return Err(ClusterError::invalid(operation, "number of samples must be > 0"));
    }
    a.validate(n, operation)?;
    b.validate(n, operation)
}

/// Counts the `n·(n−1)/2` sample pairs by co-membership in `a` and `b`.
pub fn pair_counts(a: &Clustering, b: &Clustering, n: usize) -> Result<PairCounts> {
    check_partitions(a, b, n, "pair_counts")?;

    let both: u64 = intersection_matrix(a, b).iter().map(|&m| pairs(m)).sum();
    let in_a: u64 = a.iter().map(|list| pairs(list.len())).sum();
    let in_b: u64 = b.iter().map(|list| pairs(list.len())).sum();

    let counts = PairCounts {
        a: both,
        b: in_a - both,
        c: in_b - both,
        d: pairs(n) + both - in_a - in_b,
    };
    Ok(counts)
}

/// Jaccard coefficient of two partitions over `n` samples.
pub fn jaccard(a: &Clustering, b: &Clustering, n: usize) -> Result<f64> {
    Ok(pair_counts(a, b, n)?.jaccard())
}

/// Rand index of two partitions over `n` samples.
pub fn rand_index(a: &Clustering, b: &Clustering, n: usize) -> Result<f64> {
    Ok(pair_counts(a, b, n)?.rand())
}

/// Fraction of the `n²` ordered sample pairs whose co-membership differs
/// between `a` and `b`. 0 for identical partitions.
pub fn figure_of_merit(a: &Clustering, b: &Clustering, n: usize) -> Result<f64> {
    let counts = pair_counts(a, b, n)?;
    let n = n as f64;
    Ok(2.0 * (counts.b + counts.c) as f64 / (n * n))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn partitions() -> (Clustering, Clustering) {
        (
            Clustering::from_hit_lists(vec![vec![0, 1], vec![2, 3]]),
            Clustering::from_hit_lists(vec![vec![0, 1, 2], vec![3]]),
        )
    }

    #[test]
    fn test_intersection_matrix() {
        let (a, b) = partitions();
        let m = intersection_matrix(&a, &b);
        assert_eq!(m, array![[2, 0], [1, 1]]);
        assert_eq!(m.sum(), 4);
    }

    #[test]
    fn test_pair_counts() {
        let (a, b) = partitions();
        let counts = pair_counts(&a, &b, 4).unwrap();

        // {0,1} together in both; {2,3} only in a; {0,2}, {1,2} only in b
        assert_eq!(counts, PairCounts { a: 1, b: 1, c: 2, d: 2 });
        assert_eq!(counts.total(), 6);
        assert!((counts.jaccard() - 0.25).abs() < 1e-12);
        assert!((counts.rand() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_identical_partitions() {
        let a = Clustering::from_hit_lists(vec![vec![0, 1, 2], vec![3, 4, 5]]);
        let counts = pair_counts(&a, &a, 6).unwrap();
        assert_eq!(counts.b + counts.c, 0);
        assert_eq!(counts.jaccard(), 1.0);
        assert_eq!(counts.rand(), 1.0);
        assert_eq!(figure_of_merit(&a, &a, 6).unwrap(), 0.0);
    }

    #[test]
    fn test_all_singletons() {
        let a = Clustering::from_labels(&[0, 1, 2]);
        let counts = pair_counts(&a, &a, 3).unwrap();
        assert_eq!(counts.d, 3);
        assert_eq!(counts.jaccard(), 1.0);
        assert_eq!(counts.rand(), 1.0);
    }

    #[test]
    fn test_single_sample() {
        let a = Clustering::from_labels(&[0]);
        assert_eq!(rand_index(&a, &a, 1).unwrap(), 1.0);
        assert_eq!(jaccard(&a, &a, 1).unwrap(), 1.0);
    }

    #[test]
    fn test_figure_of_merit() {
        let (a, b) = partitions();
        // three unordered pairs differ, six ordered ones
        assert!((figure_of_merit(&a, &b, 4).unwrap() - 6.0 / 16.0).abs() < 1e-12);
    }

    #[test]
    fn test_rejects_invalid_partitions() {
        let (a, b) = partitions();
        assert!(pair_counts(&a, &b, 3).is_err());
        assert!(pair_counts(&a, &b, 0).is_err());
    }
}
