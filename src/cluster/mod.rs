//! Prototype-based clustering engines.
//!
//! This module provides:
//! - `KMeans`: hard k-means, each sample belongs to its nearest prototype
//! - `FuzzyCMeans`: fuzzy c-means with graded memberships
//!
//! Both engines refine a caller-supplied codebook. Use [`crate::init`] to
//! build one.
//!
//! # Examples
//!
//! ## K-Means Clustering
//! ```rust
//! use protoclust::{KMeans, Metric};
//! use ndarray::array;
//!
//! let x = array![
//!     [1.0, 1.0],
//!     [1.5, 2.0],
//!     [3.0, 4.0],
//!     [5.0, 7.0],
//!     [3.5, 5.0],
//!     [4.5, 5.0]
//! ];
//!
//! let mut kmeans = KMeans::new().metric(Metric::euclidean()).max_steps(100);
//! let labels = kmeans.fit_predict(&x, &array![[1.0, 1.0], [5.0, 7.0]]).unwrap();
//! assert_eq!(labels.len(), 6);
//!
//! let centers = kmeans.cluster_centers.as_ref().unwrap();
//! println!("Cluster centers: {:?}", centers);
//! ```
//!
//! ## Fuzzy C-Means Clustering
//! ```rust
//! use protoclust::FuzzyCMeans;
//! use ndarray::array;
//!
//! let x = array![[0.0, 0.0], [0.2, 0.1], [4.0, 4.0], [4.1, 3.9]];
//!
//! let mut fcm = FuzzyCMeans::new().fuzziness(2.0).tolerance(1e-6);
//! fcm.fit(&x, &array![[0.0, 0.0], [4.0, 4.0]]).unwrap();
//!
//! let membership = fcm.membership.as_ref().unwrap();
//! assert!((membership.row(0).sum() - 1.0).abs() < 1e-9);
//! ```

mod fcmeans;
mod kmeans;

pub use fcmeans::{fcmeans, fcmeans_objective, FuzzyCMeans, FuzzyCMeansResult};
pub use kmeans::{kmeans, KMeans, KMeansResult};
