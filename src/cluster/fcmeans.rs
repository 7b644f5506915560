use crate::error::{ClusterError, Result};
use crate::hitlist::{assign, Clustering, Labels};
use crate::metric::Metric;
use crate::Matrix;
use log::{debug, info};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Outcome of a fuzzy c-means run.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FuzzyCMeansResult {
    /// Number of prototype updates performed.
    pub steps: usize,
    /// `true` when the relative objective change fell below the tolerance.
    pub converged: bool,
    pub codebook: Matrix,
    /// `n × k` memberships; every row sums to 1.
    pub membership: Matrix,
    /// Hard assignment of the data to the final codebook.
    pub clustering: Clustering,
    /// Weighted squared error of the last step.
    pub objective: f64,
}

/// Fuzzy c-means (Bezdek) with fuzzifier `m > 1`.
///
/// Each step recomputes the memberships
/// `u_ij = 1 / Σ_l (d(x_i, c_j) / d(x_i, c_l))^(2/(m-1))`, moves every
/// prototype to the `u^m`-weighted mean of the data and evaluates
/// `E = Σ_i Σ_j u_ij^m d(x_i, c_j)^2`. A sample whose transformed distance to
/// some prototype drops below `epsilon` belongs to the first such prototype
/// only.
#[derive(Clone, Debug)]
pub struct FuzzyCMeans {
    pub cluster_centers: Option<Matrix>,
    pub membership: Option<Matrix>,
    pub clustering: Option<Clustering>,
    pub steps: Option<usize>,
    pub converged: Option<bool>,
    pub objective: Option<f64>,
    metric: Metric,
    fuzziness: f64,
    max_steps: usize,
    tolerance: f64,
    epsilon: f64,
}

impl Default for FuzzyCMeans {
    fn default() -> Self {
        Self::new()
    }
}

impl FuzzyCMeans {
    pub fn new() -> Self {
        Self {
            cluster_centers: None,
            membership: None,
            clustering: None,
            steps: None,
            converged: None,
            objective: None,
            metric: Metric::default(),
            fuzziness: 2.0,
            max_steps: 100,
            tolerance: 1e-5,
            epsilon: 1e-15,
        }
    }

    pub fn metric(mut self, metric: Metric) -> Self {
        self.metric = metric;
        self
    }

    pub fn fuzziness(mut self, m: f64) -> Self {
        self.fuzziness = m;
        self
    }

    pub fn max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    /// Relative objective change below which the run stops.
    pub fn tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Transformed distance below which a sample snaps to a prototype.
    pub fn epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    pub fn fit(&mut self, x: &Matrix, codebook: &Matrix) -> Result<()> {
        let result = self.run(x, codebook)?;

        self.cluster_centers = Some(result.codebook);
        self.membership = Some(result.membership);
        self.clustering = Some(result.clustering);
        self.steps = Some(result.steps);
        self.converged = Some(result.converged);
        self.objective = Some(result.objective);

        Ok(())
    }

    /// Hard labels of the training samples after `fit`.
    pub fn labels(&self) -> Option<Labels> {
        let clustering = self.clustering.as_ref()?;
        Some(clustering.to_labels(clustering.n_members()))
    }

    /// Runs fuzzy c-means on `codebook` in place and writes the memberships
    /// into `membership`, which is reshaped to `n × k` when needed.
    ///
    /// Returns the number of prototype updates, whether the objective
    /// converged, and the final objective.
    pub fn fit_codebook(
        &self,
        x: &Matrix,
        codebook: &mut Matrix,
        membership: &mut Matrix,
    ) -> Result<(usize, bool, f64)> {
        self.check_input(x, codebook)?;

        let (n, k) = (x.nrows(), codebook.nrows());
        if membership.dim() != (n, k) {
            *membership = Matrix::zeros((n, k));
        }

        if self.max_steps == 0 {
            // memberships of the seeds, codebook untouched
            self.update_membership(x, codebook, membership)?;
            let objective = fcmeans_objective(x, codebook, membership, &self.metric, self.fuzziness)?;
            return Ok((0, false, objective));
        }

        let mut objective = 0.0;
        for step in 0..self.max_steps {
            self.update_membership(x, codebook, membership)?;
            self.update_prototypes(x, codebook, membership);

            let previous = objective;
            objective = fcmeans_objective(x, codebook, membership, &self.metric, self.fuzziness)?;
            debug!("fuzzy c-means step {}: objective {:.6e}", step, objective);

            // the first objective has nothing to compare against
            if step > 0 && (objective == 0.0 || (previous - objective).abs() / objective < self.tolerance) {
                info!("fuzzy c-means converged after {} steps", step + 1);
                return Ok((step + 1, true, objective));
            }
        }

        info!(
            "fuzzy c-means stopped after {} steps without converging",
            self.max_steps
        );
        Ok((self.max_steps, false, objective))
    }

    fn update_membership(&self, x: &Matrix, codebook: &Matrix, membership: &mut Matrix) -> Result<()> {
        let exponent = 2.0 / (self.fuzziness - 1.0);
        let mut distances = vec![0.0; codebook.nrows()];

        for (i, sample) in x.rows().into_iter().enumerate() {
            for (j, prototype) in codebook.rows().into_iter().enumerate() {
                distances[j] = self.metric.distance(&sample, &prototype)?;
            }

            let mut row = membership.row_mut(i);
            let degenerate = distances
                .iter()
                .position(|&d| d == 0.0 || d.powf(exponent) < self.epsilon);

            if let Some(hit) = degenerate {
                row.fill(0.0);
                row[hit] = 1.0;
                continue;
            }

            // ratios before the power keep large exponents finite
            for (j, &dj) in distances.iter().enumerate() {
                let sum: f64 = distances.iter().map(|&dl| (dj / dl).powf(exponent)).sum();
                row[j] = 1.0 / sum;
            }
        }
        Ok(())
    }

    fn update_prototypes(&self, x: &Matrix, codebook: &mut Matrix, membership: &Matrix) {
        for j in 0..codebook.nrows() {
            let weights = membership.column(j).mapv(|u| u.powf(self.fuzziness));
            let total = weights.sum();
            // a prototype nobody belongs to stays where it is
            if total > 0.0 {
                let centroid = weights.dot(x) / total;
                codebook.row_mut(j).assign(&centroid);
            }
        }
    }

    fn run(&self, x: &Matrix, codebook: &Matrix) -> Result<FuzzyCMeansResult> {
        let mut codebook = codebook.clone();
        let mut membership = Matrix::zeros((0, 0));
        let (steps, converged, objective) = self.fit_codebook(x, &mut codebook, &mut membership)?;
        let clustering = assign(x, &codebook, &self.metric)?;

        Ok(FuzzyCMeansResult {
            steps,
            converged,
            codebook,
            membership,
            clustering,
            objective,
        })
    }

    fn check_input(&self, x: &Matrix, codebook: &Matrix) -> Result<()> {
        if x.nrows() == 0 || x.ncols() == 0 {
            return Err(ClusterError::invalid(
                "fcmeans",
                "Input matrix must have at least one sample and one feature",
            ));
        }
        if codebook.nrows() == 0 {
            return Err(ClusterError::invalid("fcmeans", "codebook must contain at least one prototype"));
        }
        if codebook.ncols() != x.ncols() {
            return Err(ClusterError::invalid(
                "fcmeans",
                format!(
                    "codebook has {} features but the data has {}",
                    codebook.ncols(),
                    x.ncols()
                ),
            ));
        }
        if !self.fuzziness.is_finite() || self.fuzziness <= 1.0 {
            return Err(ClusterError::invalid(
                "fcmeans",
                format!("fuzziness must be > 1, got {}", self.fuzziness),
            ));
        }
        if self.tolerance.is_nan() || self.tolerance <= 0.0 {
            return Err(ClusterError::invalid(
                "fcmeans",
                format!("tolerance must be > 0, got {}", self.tolerance),
            ));
        }
        if self.epsilon.is_nan() || self.epsilon < 0.0 {
            return Err(ClusterError::invalid(
                "fcmeans",
                format!("epsilon must be >= 0, got {}", self.epsilon),
            ));
        }
        Ok(())
    }
}

/// Fuzzy c-means objective `Σ_i Σ_j u_ij^m d(x_i, c_j)^2`.
pub fn fcmeans_objective(
    x: &Matrix,
    codebook: &Matrix,
    membership: &Matrix,
    metric: &Metric,
    m: f64,
) -> Result<f64> {
    if x.ncols() != codebook.ncols() {
        return Err(ClusterError::invalid(
            "fcmeans_objective",
            format!(
                "codebook has {} features but the data has {}",
                codebook.ncols(),
                x.ncols()
            ),
        ));
    }
    if membership.dim() != (x.nrows(), codebook.nrows()) {
        return Err(ClusterError::invalid(
            "fcmeans_objective",
            format!(
                "membership matrix is {}x{}, expected {}x{}",
                membership.nrows(),
                membership.ncols(),
                x.nrows(),
                codebook.nrows()
            ),
        ));
    }

    let mut sum = 0.0;
    for (i, sample) in x.rows().into_iter().enumerate() {
        for (j, prototype) in codebook.rows().into_iter().enumerate() {
            let d = metric.distance(&sample, &prototype)?;
            sum += membership[[i, j]].powf(m) * d * d;
        }
    }
    Ok(sum)
}

/// Fuzzy c-means with Euclidean distance starting from `codebook`.
pub fn fcmeans(data: &Matrix, codebook: &Matrix, m: f64, max_steps: usize, eps: f64) -> Result<FuzzyCMeansResult> {
    FuzzyCMeans::new()
        .fuzziness(m)
        .max_steps(max_steps)
        .tolerance(eps)
        .run(data, codebook)
}
