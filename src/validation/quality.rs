use crate::error::{ClusterError, Result};
use crate::hitlist::Clustering;
use crate::metric::Metric;
use crate::stats::pearson;
use crate::Matrix;

/// Reproducibility index of two codebooks trained on the same data.
///
/// `labels_a[i]` and `labels_b[i]` name the prototype sample `i` maps to in
/// `codebook_a` and `codebook_b`; the result is the mean distance between
/// these prototype pairs.
pub fn cross_quantization_error(
    labels_a: &[usize],
    labels_b: &[usize],
    codebook_a: &Matrix,
    codebook_b: &Matrix,
    metric: &Metric,
) -> Result<f64> {
    const OP: &str = "cross_quantization_error";

    if labels_a.len() != labels_b.len() {
        return Err(ClusterError::invalid(
            OP,
            format!(
                "label vectors differ in length: {} vs {}",
                labels_a.len(),
                labels_b.len()
            ),
        ));
    }
    if labels_a.is_empty() {
        return Err(ClusterError::invalid(OP, "label vectors are empty"));
    }

    let mut sum = 0.0;
    for (&i, &j) in labels_a.iter().zip(labels_b) {
        if i >= codebook_a.nrows() || j >= codebook_b.nrows() {
            return Err(ClusterError::invalid(
                OP,
                format!(
                    "label pair ({}, {}) outside codebooks of {} and {} prototypes",
                    i,
                    j,
                    codebook_a.nrows(),
                    codebook_b.nrows()
                ),
            ));
        }
        sum += metric.distance(&codebook_a.row(i), &codebook_b.row(j))?;
    }
    Ok(sum / labels_a.len() as f64)
}

fn check_members(c: &Clustering, data: &Matrix, operation: &'static str) -> Result<()> {
    let n = data.nrows();
    match c.iter().flatten().find(|&&sample| sample >= n) {
        Some(sample) => Err(ClusterError::invalid(
            operation,
            format!("sample {} out of range for {} rows", sample, n),
        )),
        None => Ok(()),
    }
}

/// Mean absolute Pearson correlation between members of the same cluster,
/// averaged over all clusters. Empty and singleton clusters count as 1.
pub fn intra_cluster_correlation(c: &Clustering, data: &Matrix) -> Result<f64> {
    check_members(c, data, "intra_cluster_correlation")?;

    let mut sum = 0.0;
    for members in c.iter() {
        if members.len() <= 1 {
            sum += 1.0;
            continue;
        }

        let mut subsum = 0.0;
        for (u, &x) in members.iter().enumerate() {
            for &y in &members[u + 1..] {
                subsum += pearson(&data.row(x), &data.row(y))?.abs();
            }
        }
        let m = members.len() as f64;
        sum += subsum * 2.0 / (m * (m - 1.0));
    }

    if c.is_empty() {
        return Ok(0.0);
    }
    Ok(sum / c.len() as f64)
}

/// Mean absolute Pearson correlation between members of different clusters,
/// averaged over all pairs of non-empty clusters. 0 with fewer than two
/// non-empty clusters.
pub fn inter_cluster_correlation(c: &Clustering, data: &Matrix) -> Result<f64> {
    check_members(c, data, "inter_cluster_correlation")?;

    let clusters: Vec<&[usize]> = c
        .iter()
        .filter(|list| !list.is_empty())
        .map(|list| list.as_slice())
        .collect();
    if clusters.len() < 2 {
        return Ok(0.0);
    }

    let mut sum = 0.0;
    for (i, left) in clusters.iter().enumerate() {
        for right in &clusters[i + 1..] {
            let mut subsum = 0.0;
            for &x in left.iter() {
                for &y in right.iter() {
                    subsum += pearson(&data.row(x), &data.row(y))?.abs();
                }
            }
            sum += subsum / (left.len() * right.len()) as f64;
        }
    }

    let k = clusters.len() as f64;
    Ok(sum * 2.0 / (k * (k - 1.0)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_cross_quantization_error() {
        let cod_a = array![[0.0], [10.0]];
        let cod_b = array![[1.0], [10.0]];
        let metric = Metric::euclidean();

        let error = cross_quantization_error(&[0, 0, 1, 1], &[0, 0, 1, 1], &cod_a, &cod_b, &metric).unwrap();
        assert!((error - 0.5).abs() < 1e-12);

        let same = cross_quantization_error(&[0, 1], &[0, 1], &cod_a, &cod_a, &metric).unwrap();
        assert_eq!(same, 0.0);
    }

    #[test]
    fn test_cross_quantization_error_rejects_bad_labels() {
        let cod = array![[0.0], [1.0]];
        let metric = Metric::euclidean();
        assert!(cross_quantization_error(&[0, 1], &[0], &cod, &cod, &metric).is_err());
        assert!(cross_quantization_error(&[], &[], &cod, &cod, &metric).is_err());
        assert!(cross_quantization_error(&[2], &[0], &cod, &cod, &metric).is_err());
    }

    #[test]
    fn test_intra_cluster_correlation() {
        let data = array![
            [1.0, 2.0, 3.0],
            [2.0, 4.0, 6.0],
            [3.0, 2.0, 1.0],
            [5.0, 5.0, 5.0]
        ];
        // rows 0 and 1 correlate perfectly, row 2 anti-correlates with both
        let c = Clustering::from_hit_lists(vec![vec![0, 1, 2], vec![3]]);
        assert!((intra_cluster_correlation(&c, &data).unwrap() - 1.0).abs() < 1e-12);

        // a constant row correlates with nothing
        let mixed = Clustering::from_hit_lists(vec![vec![0, 3]]);
        assert_eq!(intra_cluster_correlation(&mixed, &data).unwrap(), 0.0);
    }

    #[test]
    fn test_intra_cluster_correlation_counts_empty_clusters() {
        let data = array![[1.0, 2.0, 3.0], [1.0, 3.0, 2.0]];

        let c = Clustering::from_hit_lists(vec![vec![0, 1]]);
        assert!((intra_cluster_correlation(&c, &data).unwrap() - 0.5).abs() < 1e-12);

        let with_empty = Clustering::from_hit_lists(vec![vec![0, 1], vec![]]);
        assert!((intra_cluster_correlation(&with_empty, &data).unwrap() - 0.75).abs() < 1e-12);

        assert_eq!(intra_cluster_correlation(&Clustering::new(0), &data).unwrap(), 0.0);
    }

    #[test]
    fn test_inter_cluster_correlation() {
        let data = array![[1.0, 2.0, 3.0], [3.0, 2.0, 1.0], [5.0, 5.0, 5.0]];

        let c = Clustering::from_hit_lists(vec![vec![0], vec![1], vec![]]);
        assert!((inter_cluster_correlation(&c, &data).unwrap() - 1.0).abs() < 1e-12);

        let with_constant = Clustering::from_hit_lists(vec![vec![0], vec![2]]);
        assert_eq!(inter_cluster_correlation(&with_constant, &data).unwrap(), 0.0);

        let single = Clustering::from_hit_lists(vec![vec![0, 1, 2]]);
        assert_eq!(inter_cluster_correlation(&single, &data).unwrap(), 0.0);
    }

    #[test]
    fn test_correlation_rejects_out_of_range_members() {
        let data = array![[1.0, 2.0]];
        let c = Clustering::from_hit_lists(vec![vec![0, 4]]);
        assert!(intra_cluster_correlation(&c, &data).is_err());
        assert!(inter_cluster_correlation(&c, &data).is_err());
    }
}
