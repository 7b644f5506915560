use super::contingency::{check_partitions, intersection_matrix};
use crate::error::{ClusterError, Result};
use crate::hitlist::Clustering;

/// Shannon entropy in bits of the cluster size distribution, `p_i = |C_i| / n`.
///
/// Empty clusters contribute nothing.
pub fn self_information(c: &Clustering, n: usize) -> Result<f64> {
    if n == 0 {
        return Err(ClusterError::invalid("self_information", "number of samples must be > 0"));
    }
    let entropy = c
        .iter()
        .filter(|list| !list.is_empty())
        .map(|list| {
            let p = list.len() as f64 / n as f64;
            -p * p.log2()
        })
        .sum();
    Ok(entropy)
}

/// Mutual information of two partitions in bits, normalized by the
/// geometric mean of their self-information.
///
/// Returns 0 when the mutual information is not positive or either
/// partition has zero self-information.
pub fn transinformation(a: &Clustering, b: &Clustering, n: usize) -> Result<f64> {
    check_partitions(a, b, n, "transinformation")?;

    let overlap = intersection_matrix(a, b);
    let size_a = a.sizes();
    let size_b = b.sizes();
    let nf = n as f64;

    let mut mutual = 0.0;
    for ((i, j), &m) in overlap.indexed_iter() {
        if m > 0 {
            let m = m as f64;
            mutual += m / nf * (m * nf / (size_a[i] as f64 * size_b[j] as f64)).log2();
        }
    }

    let norm = (self_information(a, n)? * self_information(b, n)?).sqrt();
    if mutual <= 0.0 || norm <= 0.0 {
        return Ok(0.0);
    }
    Ok(mutual / norm)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_self_information() {
        let c = Clustering::from_labels(&[0, 0, 1, 1]);
        assert!((self_information(&c, 4).unwrap() - 1.0).abs() < 1e-12);

        let skewed = Clustering::from_hit_lists(vec![vec![0, 1, 2, 3], vec![]]);
        assert_eq!(self_information(&skewed, 4).unwrap(), 0.0);

        let quarters = Clustering::from_labels(&[0, 1, 2, 3]);
        assert!((self_information(&quarters, 4).unwrap() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_transinformation_identical() {
        let c = Clustering::from_labels(&[0, 0, 1, 1, 2, 2]);
        assert!((transinformation(&c, &c, 6).unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_transinformation_independent() {
        // every cluster of a splits evenly over b
        let a = Clustering::from_labels(&[0, 0, 1, 1]);
        let b = Clustering::from_labels(&[0, 1, 0, 1]);
        assert_eq!(transinformation(&a, &b, 4).unwrap(), 0.0);
    }

    #[test]
    fn test_transinformation_single_cluster() {
        let a = Clustering::from_labels(&[0, 0, 0]);
        let b = Clustering::from_labels(&[0, 1, 2]);
        assert_eq!(transinformation(&a, &b, 3).unwrap(), 0.0);
    }

    #[test]
    fn test_transinformation_partial() {
        let a = Clustering::from_hit_lists(vec![vec![0, 1], vec![2, 3]]);
        let b = Clustering::from_hit_lists(vec![vec![0, 1, 2], vec![3]]);
        let t = transinformation(&a, &b, 4).unwrap();
        assert!(t > 0.0 && t < 1.0);
    }
}
