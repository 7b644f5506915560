//! Comparison of two partitions of the same samples.
//!
//! External indices (Jaccard, Rand, figure of merit, maximum cluster
//! assignment, transinformation, symmetric difference) look at cluster
//! membership only. Cross-quantization error needs the codebooks, and the
//! correlation indices need the data itself.
//!
//! # Examples
//!
//! ```rust
//! use protoclust::{compare_partitions, Clustering, KuhnMunkres};
//!
//! let a = Clustering::from_labels(&[0, 0, 1, 1, 2, 2]);
//! let b = Clustering::from_labels(&[1, 1, 0, 0, 2, 2]);
//!
//! let agreement = compare_partitions(&a, &b, 6, &KuhnMunkres).unwrap();
//! assert!((agreement.mca - 1.0).abs() < 1e-12);
//! assert_eq!(agreement.symmetric_difference, Some(0.0));
//! ```

mod contingency;
mod information;
mod mca;
mod quality;
mod symdiff;

pub use contingency::{figure_of_merit, intersection_matrix, jaccard, pair_counts, rand_index, PairCounts};
pub use information::{self_information, transinformation};
pub use mca::{mca, mca_from_labels, mca_with_solution, McaSolution};
pub use quality::{cross_quantization_error, inter_cluster_correlation, intra_cluster_correlation};
pub use symdiff::{symmetric_difference, symmetric_difference_matrix};

use crate::assignment::AssignmentSolver;
use crate::error::{ClusterError, Result};
use crate::hitlist::{assign, Clustering};
use crate::metric::Metric;
use crate::Matrix;
use log::debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Membership-based agreement between two partitions.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PartitionAgreement {
    pub mca: f64,
    pub jaccard: f64,
    pub rand: f64,
    pub transinformation: f64,
    pub self_information: [f64; 2],
    /// `None` when the partitions have different cluster counts.
    pub symmetric_difference: Option<f64>,
}

/// Every comparison index for two codebooks over one data set.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ComparisonReport {
    pub mca: f64,
    pub jaccard: f64,
    pub rand: f64,
    pub transinformation: f64,
    pub self_information: [f64; 2],
    pub symmetric_difference: Option<f64>,
    pub cross_quantization_error: f64,
    pub intra_cluster_correlation: [f64; 2],
    pub inter_cluster_correlation: [f64; 2],
}

/// Computes all membership-based indices of `a` against `b`.
pub fn compare_partitions<S: AssignmentSolver>(
    a: &Clustering,
    b: &Clustering,
    n: usize,
    solver: &S,
) -> Result<PartitionAgreement> {
    let counts = pair_counts(a, b, n)?;
    let symmetric_difference = if a.len() == b.len() {
        Some(symmetric_difference(a, b, solver)?)
    } else {
        None
    };

    Ok(PartitionAgreement {
        mca: mca(a, b, n, solver)?,
        jaccard: counts.jaccard(),
        rand: counts.rand(),
        transinformation: transinformation(a, b, n)?,
        self_information: [self_information(a, n)?, self_information(b, n)?],
        symmetric_difference,
    })
}

/// Assigns `data` to both codebooks and compares the resulting clusterings.
pub fn compare_clusterings<S: AssignmentSolver>(
    data: &Matrix,
    codebook_a: &Matrix,
    codebook_b: &Matrix,
    metric: &Metric,
    solver: &S,
) -> Result<ComparisonReport> {
    let n = data.nrows();
    if n == 0 {
        return Err(ClusterError::invalid("compare_clusterings", "data has no samples"));
    }

    let a = assign(data, codebook_a, metric)?;
    let b = assign(data, codebook_b, metric)?;
    debug!(
        "comparing clusterings of {} samples: {} vs {} clusters",
        n,
        a.len(),
        b.len()
    );

    let agreement = compare_partitions(&a, &b, n, solver)?;
    let cross_quantization_error =
        cross_quantization_error(&a.to_labels(n), &b.to_labels(n), codebook_a, codebook_b, metric)?;

    Ok(ComparisonReport {
        mca: agreement.mca,
        jaccard: agreement.jaccard,
        rand: agreement.rand,
        transinformation: agreement.transinformation,
        self_information: agreement.self_information,
        symmetric_difference: agreement.symmetric_difference,
        cross_quantization_error,
        intra_cluster_correlation: [
            intra_cluster_correlation(&a, data)?,
            intra_cluster_correlation(&b, data)?,
        ],
        inter_cluster_correlation: [
            inter_cluster_correlation(&a, data)?,
            inter_cluster_correlation(&b, data)?,
        ],
    })
}
