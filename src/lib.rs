//! Prototype-based clustering and partition comparison.
//!
//! The crate clusters feature vectors with hard k-means and fuzzy c-means and
//! measures how well two partitions of the same samples agree.
//!
//! # Examples
//!
//! ```rust
//! use protoclust::{compare_partitions, kmeans, KuhnMunkres, Metric};
//! use ndarray::array;
//!
//! let x = array![[0.0], [1.0], [10.0], [11.0]];
//! let seeds = array![[0.0], [10.0]];
//!
//! let fit = kmeans(&x, &seeds, 100, &Metric::euclidean()).unwrap();
//! assert_eq!(fit.steps, 1);
//! assert_eq!(fit.codebook, array![[0.5], [10.5]]);
//!
//! let agreement = compare_partitions(&fit.clustering, &fit.clustering, 4, &KuhnMunkres).unwrap();
//! assert!((agreement.mca - 1.0).abs() < 1e-12);
//! ```

pub use ndarray::{Array1, Array2, ArrayView1, ArrayView2};

pub mod assignment;
pub mod baseline;
pub mod cluster;
pub mod error;
pub mod hitlist;
pub mod init;
pub mod metric;
pub mod set_util;
pub mod stats;
pub mod validation;

pub type Vector = Array1<f64>;
pub type Matrix = Array2<f64>;

pub use assignment::{Assignment, AssignmentSolver, KuhnMunkres};
pub use baseline::{Hypothesis, McaBaseline};
pub use cluster::{fcmeans, kmeans, FuzzyCMeans, FuzzyCMeansResult, KMeans, KMeansResult};
pub use error::{ClusterError, Result};
pub use hitlist::{assign, predict, update, Clustering, HitList, Labels};
pub use init::Initialization;
pub use metric::Metric;
pub use validation::{
    compare_clusterings, compare_partitions, mca_from_labels, ComparisonReport, McaSolution,
    PairCounts, PartitionAgreement,
};
