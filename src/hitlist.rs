//! Nearest-prototype assignment and the hit-list representation of a
//! partition.
//!
//! A [`Clustering`] stores, for every prototype, the ascending list of sample
//! indices assigned to it. [`Labels`] is the flattened inverse: one cluster
//! index per sample.

use crate::error::{ClusterError, Result};
use crate::metric::Metric;
use crate::set_util::count_symmetric_difference;
use crate::Matrix;
use log::trace;
use ndarray::ArrayView1;
use std::ops::Index;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Sample indices of one cluster, ascending.
pub type HitList = Vec<usize>;

/// Cluster index of every sample.
pub type Labels = Vec<usize>;

/// A partition of sample indices into hit lists, one per prototype.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "Vec<HitList>", into = "Vec<HitList>"))]
pub struct Clustering {
    clusters: Vec<HitList>,
}

impl Clustering {
    /// `k` empty hit lists.
    pub fn new(k: usize) -> Self {
        Self {
            clusters: vec![HitList::new(); k],
        }
    }

    /// Wraps raw hit lists, sorting and deduplicating each of them.
    pub fn from_hit_lists(mut clusters: Vec<HitList>) -> Self {
        for list in clusters.iter_mut() {
            list.sort_unstable();
            list.dedup();
        }
        Self { clusters }
    }

    /// Groups samples by label; produces `max(label) + 1` hit lists.
    pub fn from_labels(labels: &[usize]) -> Self {
        let k = labels.iter().max().map_or(0, |&max| max + 1);
        let mut clustering = Self::new(k);
        for (sample, &label) in labels.iter().enumerate() {
            clustering.clusters[label].push(sample);
        }
        clustering
    }

    /// Groups samples into exactly `k` hit lists.
    pub fn with_clusters(labels: &[usize], k: usize) -> Result<Self> {
        if let Some(&label) = labels.iter().find(|&&label| label >= k) {
            return Err(ClusterError::invalid(
                "Clustering::with_clusters",
                format!("label {} out of range for {} clusters", label, k),
            ));
        }
        let mut clustering = Self::new(k);
        for (sample, &label) in labels.iter().enumerate() {
            clustering.clusters[label].push(sample);
        }
        Ok(clustering)
    }

    /// Flattens the partition into one label per sample.
    ///
    /// The result has at least `n` entries. A member index `>= n` grows the
    /// vector, and samples that no hit list mentions keep label `0`.
    pub fn to_labels(&self, n: usize) -> Labels {
        let mut labels = vec![0; n];
        for (cluster, list) in self.clusters.iter().enumerate() {
            for &sample in list {
                if sample >= labels.len() {
                    labels.resize(sample + 1, 0);
                }
                labels[sample] = cluster;
            }
        }
        labels
    }

    /// Checks that every member is below `n` and belongs to one cluster only.
    pub fn validate(&self, n: usize, operation: &'static str) -> Result<()> {
        let mut seen = vec![false; n];
        for (cluster, list) in self.clusters.iter().enumerate() {
            for &sample in list {
                if sample >= n {
                    return Err(ClusterError::invalid(
                        operation,
                        format!(
                            "cluster {} references sample {} but only {} samples exist",
                            cluster, sample, n
                        ),
                    ));
                }
                if seen[sample] {
                    return Err(ClusterError::invalid(
                        operation,
                        format!("sample {} belongs to more than one cluster", sample),
                    ));
                }
                seen[sample] = true;
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.clusters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }

    pub fn get(&self, cluster: usize) -> Option<&[usize]> {
        self.clusters.get(cluster).map(|list| list.as_slice())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, HitList> {
        self.clusters.iter()
    }

    pub fn as_slice(&self) -> &[HitList] {
        &self.clusters
    }

    pub fn into_inner(self) -> Vec<HitList> {
        self.clusters
    }

    /// Number of members of every cluster.
    pub fn sizes(&self) -> Vec<usize> {
        self.clusters.iter().map(|list| list.len()).collect()
    }

    /// Total number of members over all clusters.
    pub fn n_members(&self) -> usize {
        self.clusters.iter().map(|list| list.len()).sum()
    }
}

impl Index<usize> for Clustering {
    type Output = HitList;

    fn index(&self, cluster: usize) -> &HitList {
        &self.clusters[cluster]
    }
}

impl From<Vec<HitList>> for Clustering {
    fn from(clusters: Vec<HitList>) -> Self {
        Self::from_hit_lists(clusters)
    }
}

impl From<Clustering> for Vec<HitList> {
    fn from(clustering: Clustering) -> Self {
        clustering.clusters
    }
}

impl<'a> IntoIterator for &'a Clustering {
    type Item = &'a HitList;
    type IntoIter = std::slice::Iter<'a, HitList>;

    fn into_iter(self) -> Self::IntoIter {
        self.clusters.iter()
    }
}

/// Index of the prototype nearest to `v` and its distance.
///
/// Ties resolve to the first prototype reaching the minimum.
pub fn find_nearest(codebook: &Matrix, v: &ArrayView1<f64>, metric: &Metric) -> Result<(usize, f64)> {
    if codebook.nrows() == 0 {
        return Err(ClusterError::invalid("find_nearest", "codebook is empty"));
    }

    let mut best = 0;
    let mut best_distance = f64::INFINITY;
    for (j, prototype) in codebook.rows().into_iter().enumerate() {
        let distance = metric.distance(&prototype, v)?;
        if j == 0 || distance < best_distance {
            best = j;
            best_distance = distance;
        }
    }
    Ok((best, best_distance))
}

fn check_shapes(data: &Matrix, codebook: &Matrix, operation: &'static str) -> Result<()> {
    if codebook.nrows() == 0 {
        return Err(ClusterError::invalid(operation, "codebook is empty"));
    }
    if data.ncols() != codebook.ncols() {
        return Err(ClusterError::invalid(
            operation,
            format!(
                "data has {} features but the codebook has {}",
                data.ncols(),
                codebook.ncols()
            ),
        ));
    }
    Ok(())
}

/// Assigns every sample to its nearest prototype.
///
/// The result holds exactly `codebook.nrows()` hit lists, some possibly
/// empty.
pub fn assign(data: &Matrix, codebook: &Matrix, metric: &Metric) -> Result<Clustering> {
    check_shapes(data, codebook, "assign")?;

    let mut clustering = Clustering::new(codebook.nrows());
    for (sample, row) in data.rows().into_iter().enumerate() {
        let (nearest, _) = find_nearest(codebook, &row, metric)?;
        clustering.clusters[nearest].push(sample);
    }
    Ok(clustering)
}

/// Recomputes the assignment and counts how many memberships changed.
///
/// The count is the summed symmetric difference between the old and new hit
/// list of every cluster. A `previous` clustering of the wrong length counts
/// as `k` empty lists.
pub fn update(
    data: &Matrix,
    codebook: &Matrix,
    metric: &Metric,
    previous: &Clustering,
) -> Result<(Clustering, usize)> {
    let current = assign(data, codebook, metric)?;

    let changed = if previous.len() == current.len() {
        previous
            .iter()
            .zip(current.iter())
            .map(|(old, new)| count_symmetric_difference(old, new))
            .sum()
    } else {
        current.n_members()
    };

    trace!("hit list update: {} membership changes", changed);
    Ok((current, changed))
}

/// Label of the nearest prototype for every sample.
pub fn predict(data: &Matrix, codebook: &Matrix, metric: &Metric) -> Result<Labels> {
    check_shapes(data, codebook, "predict")?;

    data.rows()
        .into_iter()
        .map(|row| find_nearest(codebook, &row, metric).map(|(nearest, _)| nearest))
        .collect()
}
