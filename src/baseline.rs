//! Null distributions of the maximum cluster assignment score.
//!
//! An MCA value only means something against the scores random partitions
//! reach by chance. The generators here draw such partitions, and
//! [`McaBaseline`] collects their pairwise scores.

use crate::assignment::AssignmentSolver;
use crate::error::{ClusterError, Result};
use crate::hitlist::{assign, Clustering, HitList};
use crate::init::Initialization;
use crate::metric::Metric;
use crate::validation::mca;
use crate::Matrix;
use log::{debug, info};
use rand::seq::SliceRandom;
use rand::Rng;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

fn check_sizes(n: usize, k: usize, operation: &'static str) -> Result<()> {
    if k == 0 || k > n {
        return Err(ClusterError::invalid(
            operation,
            format!("need 1 <= k <= n, got k = {} and n = {}", k, n),
        ));
    }
    Ok(())
}

/// Uniform random labels with no empty cluster.
///
/// Every sample draws a cluster uniformly; each cluster left empty then takes
/// the smallest member of a random cluster holding more than one.
pub fn random_unique_partition<R: Rng + ?Sized>(n: usize, k: usize, rng: &mut R) -> Result<Clustering> {
    check_sizes(n, k, "random_unique_partition")?;

    let mut clusters = vec![HitList::new(); k];
    for sample in 0..n {
        clusters[rng.gen_range(0..k)].push(sample);
    }

    for i in 0..k {
        if !clusters[i].is_empty() {
            continue;
        }
        // k <= n guarantees a donor while any cluster is empty
        loop {
            let j = rng.gen_range(0..k);
            if clusters[j].len() > 1 {
                let moved = clusters[j].remove(0);
                clusters[i].push(moved);
                break;
            }
        }
    }
    Ok(Clustering::from_hit_lists(clusters))
}

/// Random partition with random cluster sizes.
///
/// Cluster sizes are drawn one after another, each leaving room for at least
/// one member per remaining cluster; members are drawn at random and the
/// cluster order is shuffled.
pub fn random_stirling_partition<R: Rng + ?Sized>(n: usize, k: usize, rng: &mut R) -> Result<Clustering> {
    check_sizes(n, k, "random_stirling_partition")?;

    let mut samples: Vec<usize> = (0..n).collect();
    samples.shuffle(rng);

    let mut clusters = Vec::with_capacity(k);
    let mut rest = samples.as_slice();
    for i in 0..k - 1 {
        let size = rng.gen_range(1..=rest.len() - (k - 1 - i));
        let (head, tail) = rest.split_at(size);
        clusters.push(head.to_vec());
        rest = tail;
    }
    clusters.push(rest.to_vec());
    clusters.shuffle(rng);

    Ok(Clustering::from_hit_lists(clusters))
}

/// Partition of `data` induced by a random codebook and Euclidean assignment.
pub fn random_data_partition<R: Rng + ?Sized>(
    data: &Matrix,
    k: usize,
    init: &Initialization,
    rng: &mut R,
) -> Result<Clustering> {
    let codebook = init.codebook(data, k, rng)?;
    assign(data, &codebook, &Metric::euclidean())
}

/// Expected MCA of two random partitions of `n` samples into `k` clusters.
pub fn theoretical_mca(n: usize, k: usize) -> Result<f64> {
    check_sizes(n, k, "theoretical_mca")?;

    let nf = n as f64;
    let kf = k as f64;
    let value = if kf < (nf / 2.0).ceil() {
        (nf / kf).ceil() / nf
    } else {
        (nf / (nf - kf + 1.0)).ceil() / nf
    };
    Ok(value)
}

/// The null hypothesis random partitions are drawn under.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Hypothesis {
    /// Uniform random labels ([`random_unique_partition`]).
    #[default]
    Label,
    /// Random cluster sizes ([`random_stirling_partition`]).
    Partition,
    /// Data-driven partitions from a random codebook ([`random_data_partition`]).
    Cluster(Initialization),
    /// The closed-form value of [`theoretical_mca`], repeated.
    Theoretical,
}

/// Builder for MCA baseline runs.
///
/// ```rust
/// use protoclust::{Hypothesis, KuhnMunkres, McaBaseline};
/// use ndarray::Array2;
/// use rand::rngs::StdRng;
/// use rand::SeedableRng;
///
/// let data = Array2::<f64>::zeros((30, 2));
/// let mut rng = StdRng::seed_from_u64(42);
///
/// let scores = McaBaseline::new(3)
///     .runs(5)
///     .hypothesis(Hypothesis::Label)
///     .run(&data, &mut rng, &KuhnMunkres)
///     .unwrap();
/// assert_eq!(scores.len(), 10);
/// ```
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct McaBaseline {
    n_clusters: usize,
    runs: usize,
    pairwise: bool,
    hypothesis: Hypothesis,
}

impl McaBaseline {
    pub fn new(n_clusters: usize) -> Self {
        Self {
            n_clusters,
            runs: 10,
            pairwise: true,
            hypothesis: Hypothesis::Label,
        }
    }

    pub fn runs(mut self, runs: usize) -> Self {
        self.runs = runs;
        self
    }

    /// Compare every pair of `runs` partitions instead of drawing a fresh
    /// pair per run.
    pub fn pairwise(mut self, pairwise: bool) -> Self {
        self.pairwise = pairwise;
        self
    }

    pub fn hypothesis(mut self, hypothesis: Hypothesis) -> Self {
        self.hypothesis = hypothesis;
        self
    }

    /// Draws the baseline scores for the samples of `data`.
    ///
    /// Pairwise mode yields `runs·(runs−1)/2` values, paired mode `runs`.
    pub fn run<R, S>(&self, data: &Matrix, rng: &mut R, solver: &S) -> Result<Vec<f64>>
    where
        R: Rng + ?Sized,
        S: AssignmentSolver,
    {
        let n = data.nrows();
        check_sizes(n, self.n_clusters, "McaBaseline::run")?;
        if self.runs == 0 {
            return Err(ClusterError::invalid("McaBaseline::run", "runs must be > 0"));
        }

        let scores = if self.pairwise {
            self.run_pairwise(data, rng, solver)?
        } else {
            self.run_paired(data, rng, solver)?
        };

        info!(
            "mca baseline: {} values for n = {}, k = {}",
            scores.len(),
            n,
            self.n_clusters
        );
        Ok(scores)
    }

    fn run_pairwise<R, S>(&self, data: &Matrix, rng: &mut R, solver: &S) -> Result<Vec<f64>>
    where
        R: Rng + ?Sized,
        S: AssignmentSolver,
    {
        let n = data.nrows();
        let pairs = self.runs * (self.runs - 1) / 2;

        if let Hypothesis::Theoretical = self.hypothesis {
            return Ok(vec![theoretical_mca(n, self.n_clusters)?; pairs]);
        }

        let partitions = (0..self.runs)
            .map(|_| self.draw(data, rng))
            .collect::<Result<Vec<_>>>()?;

        let mut scores = Vec::with_capacity(pairs);
        for (i, a) in partitions.iter().enumerate() {
            for b in &partitions[i + 1..] {
                scores.push(mca(a, b, n, solver)?);
            }
        }
        Ok(scores)
    }

    fn run_paired<R, S>(&self, data: &Matrix, rng: &mut R, solver: &S) -> Result<Vec<f64>>
    where
        R: Rng + ?Sized,
        S: AssignmentSolver,
    {
        let n = data.nrows();
        if let Hypothesis::Theoretical = self.hypothesis {
            return Ok(vec![theoretical_mca(n, self.n_clusters)?; self.runs]);
        }

        let mut scores = Vec::with_capacity(self.runs);
        for run in 0..self.runs {
            let a = self.draw(data, rng)?;
            let b = self.draw(data, rng)?;
            let score = mca(&a, &b, n, solver)?;
            debug!("mca baseline run {}: {:.4}", run, score);
            scores.push(score);
        }
        Ok(scores)
    }

    fn draw<R: Rng + ?Sized>(&self, data: &Matrix, rng: &mut R) -> Result<Clustering> {
        let (n, k) = (data.nrows(), self.n_clusters);
        match &self.hypothesis {
            Hypothesis::Label => random_unique_partition(n, k, rng),
            Hypothesis::Partition => random_stirling_partition(n, k, rng),
            Hypothesis::Cluster(init) => random_data_partition(data, k, init, rng),
            Hypothesis::Theoretical => Err(ClusterError::invalid(
                "McaBaseline::run",
                "the theoretical hypothesis draws no partitions",
            )),
        }
    }
}
