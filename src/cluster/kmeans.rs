use crate::error::{ClusterError, Result};
use crate::hitlist::{assign, predict, update, Clustering, Labels};
use crate::metric::Metric;
use crate::Matrix;
use log::{debug, info};
use ndarray::Axis;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Outcome of a hard k-means run.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct KMeansResult {
    /// Number of prototype updates performed.
    pub steps: usize,
    /// `true` when a step left every membership unchanged.
    pub converged: bool,
    pub codebook: Matrix,
    /// Assignment of the data to the final codebook.
    pub clustering: Clustering,
    /// Sum of squared distances between samples and their prototypes.
    pub inertia: f64,
}

#[derive(Clone, Debug)]
pub struct KMeans {
    pub cluster_centers: Option<Matrix>,
    pub clustering: Option<Clustering>,
    pub steps: Option<usize>,
    pub converged: Option<bool>,
    pub inertia: Option<f64>,
    metric: Metric,
    max_steps: usize,
}

impl Default for KMeans {
    fn default() -> Self {
        Self::new()
    }
}

impl KMeans {
    pub fn new() -> Self {
        Self {
            cluster_centers: None,
            clustering: None,
            steps: None,
            converged: None,
            inertia: None,
            metric: Metric::default(),
            max_steps: 100,
        }
    }

    pub fn metric(mut self, metric: Metric) -> Self {
        self.metric = metric;
        self
    }

    pub fn max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    /// Refines a copy of `codebook` and stores the fitted state.
    pub fn fit(&mut self, x: &Matrix, codebook: &Matrix) -> Result<()> {
        let result = self.run(x, codebook)?;

        self.cluster_centers = Some(result.codebook);
        self.clustering = Some(result.clustering);
        self.steps = Some(result.steps);
        self.converged = Some(result.converged);
        self.inertia = Some(result.inertia);

        Ok(())
    }

    pub fn fit_predict(&mut self, x: &Matrix, codebook: &Matrix) -> Result<Labels> {
        self.fit(x, codebook)?;
        self.labels()
            .ok_or_else(|| ClusterError::invalid("KMeans::fit_predict", "fit produced no clustering"))
    }

    /// Runs k-means on `codebook` in place.
    ///
    /// Returns the number of prototype updates and whether the assignment
    /// converged before `max_steps` ran out.
    pub fn fit_codebook(&self, x: &Matrix, codebook: &mut Matrix) -> Result<(usize, bool)> {
        self.check_input(x, codebook)?;

        let mut clustering = Clustering::default();
        for step in 0..self.max_steps {
            let (current, changed) = update(x, codebook, &self.metric, &clustering)?;
            clustering = current;
            debug!("k-means step {}: {} membership changes", step, changed);

            if changed == 0 {
                info!("k-means converged after {} steps", step);
                return Ok((step, true));
            }

            // empty clusters keep their prototype
            for (j, members) in clustering.iter().enumerate() {
                if let Some(centroid) = x.select(Axis(0), members).mean_axis(Axis(0)) {
                    codebook.row_mut(j).assign(&centroid);
                }
            }
        }

        info!(
            "k-means stopped after {} steps without converging",
            self.max_steps
        );
        Ok((self.max_steps, false))
    }

    pub fn predict(&self, x: &Matrix) -> Result<Labels> {
        let centers = self
            .cluster_centers
            .as_ref()
            .ok_or_else(|| ClusterError::invalid("KMeans::predict", "KMeans not fitted. Call fit() first."))?;
        predict(x, centers, &self.metric)
    }

    /// Distance of every sample to every fitted prototype.
    pub fn transform(&self, x: &Matrix) -> Result<Matrix> {
        let centers = self
            .cluster_centers
            .as_ref()
            .ok_or_else(|| ClusterError::invalid("KMeans::transform", "KMeans not fitted. Call fit() first."))?;

        if x.ncols() != centers.ncols() {
            return Err(ClusterError::invalid(
                "KMeans::transform",
                format!(
                    "Number of features in X ({}) doesn't match the codebook ({})",
                    x.ncols(),
                    centers.ncols()
                ),
            ));
        }

        let mut distances = Matrix::zeros((x.nrows(), centers.nrows()));
        for (i, row) in x.rows().into_iter().enumerate() {
            for (j, center) in centers.rows().into_iter().enumerate() {
                distances[[i, j]] = self.metric.distance(&row, &center)?;
            }
        }
        Ok(distances)
    }

    /// Fitted labels, one per training sample.
    pub fn labels(&self) -> Option<Labels> {
        let clustering = self.clustering.as_ref()?;
        Some(clustering.to_labels(clustering.n_members()))
    }

    fn run(&self, x: &Matrix, codebook: &Matrix) -> Result<KMeansResult> {
        let mut codebook = codebook.clone();
        let (steps, converged) = self.fit_codebook(x, &mut codebook)?;
        let clustering = assign(x, &codebook, &self.metric)?;
        let inertia = inertia(x, &codebook, &clustering, &self.metric)?;

        Ok(KMeansResult {
            steps,
            converged,
            codebook,
            clustering,
            inertia,
        })
    }

    fn check_input(&self, x: &Matrix, codebook: &Matrix) -> Result<()> {
        if x.nrows() == 0 || x.ncols() == 0 {
            return Err(ClusterError::invalid(
                "kmeans",
                "Input matrix must have at least one sample and one feature",
            ));
        }
        if codebook.nrows() == 0 {
            return Err(ClusterError::invalid("kmeans", "codebook must contain at least one prototype"));
        }
        if codebook.ncols() != x.ncols() {
            return Err(ClusterError::invalid(
                "kmeans",
                format!(
                    "codebook has {} features but the data has {}",
                    codebook.ncols(),
                    x.ncols()
                ),
            ));
        }
        Ok(())
    }
}

fn inertia(x: &Matrix, codebook: &Matrix, clustering: &Clustering, metric: &Metric) -> Result<f64> {
    let mut sum = 0.0;
    for (j, members) in clustering.iter().enumerate() {
        for &i in members {
            let d = metric.distance(&x.row(i), &codebook.row(j))?;
            sum += d * d;
        }
    }
    Ok(sum)
}

/// Hard k-means starting from `codebook`.
pub fn kmeans(data: &Matrix, codebook: &Matrix, max_steps: usize, metric: &Metric) -> Result<KMeansResult> {
    KMeans::new()
        .metric(metric.clone())
        .max_steps(max_steps)
        .run(data, codebook)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_kmeans_basic() {
        let x = array![[0.0], [1.0], [10.0], [11.0]];
        let seeds = array![[0.0], [10.0]];

        let result = kmeans(&x, &seeds, 100, &Metric::euclidean()).unwrap();

        assert_eq!(result.steps, 1);
        assert!(result.converged);
        assert_eq!(result.codebook, array![[0.5], [10.5]]);
        assert_eq!(result.clustering[0], vec![0, 1]);
        assert_eq!(result.clustering[1], vec![2, 3]);
        assert!((result.inertia - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_kmeans_fit_and_predict() {
        let x_train = array![[0.0, 0.0], [1.0, 1.0], [10.0, 10.0], [11.0, 11.0]];
        let x_test = array![[0.5, 0.5], [10.5, 10.5]];

        let mut model = KMeans::new().max_steps(50);
        model.fit(&x_train, &array![[0.0, 0.0], [11.0, 11.0]]).unwrap();

        assert_eq!(model.labels().unwrap(), vec![0, 0, 1, 1]);
        assert_eq!(model.predict(&x_test).unwrap(), vec![0, 1]);
        assert_eq!(model.converged, Some(true));
    }

    #[test]
    fn test_kmeans_fit_codebook_in_place() {
        let x = array![[0.0], [2.0], [10.0], [12.0]];
        let mut codebook = array![[0.0], [12.0]];

        let (steps, converged) = KMeans::new().fit_codebook(&x, &mut codebook).unwrap();
        assert_eq!(steps, 1);
        assert!(converged);
        assert_eq!(codebook, array![[1.0], [11.0]]);
    }

    #[test]
    fn test_kmeans_empty_cluster_keeps_prototype() {
        let x = array![[0.0], [1.0], [2.0]];
        let seeds = array![[1.0], [100.0]];

        let result = kmeans(&x, &seeds, 10, &Metric::euclidean()).unwrap();
        assert_eq!(result.codebook[[1, 0]], 100.0);
        assert!(result.clustering[1].is_empty());
        assert!((result.codebook[[0, 0]] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_kmeans_stops_at_max_steps() {
        let x = array![[0.0], [1.0], [10.0], [11.0]];
        let seeds = array![[0.0], [10.0]];

        let result = kmeans(&x, &seeds, 1, &Metric::euclidean()).unwrap();
        assert_eq!(result.steps, 1);
        assert!(!result.converged);
        // the final clustering still reflects the updated codebook
        assert_eq!(result.clustering[0], vec![0, 1]);
    }

    #[test]
    fn test_kmeans_zero_steps_keeps_codebook() {
        let x = array![[0.0], [1.0], [10.0], [11.0]];
        let seeds = array![[0.0], [10.0]];

        let result = kmeans(&x, &seeds, 0, &Metric::euclidean()).unwrap();
        assert_eq!(result.steps, 0);
        assert!(!result.converged);
        assert_eq!(result.codebook, seeds);
        assert_eq!(result.clustering[0], vec![0, 1]);
        assert_eq!(result.clustering[1], vec![2, 3]);
    }

    #[test]
    fn test_kmeans_transform() {
        let x = array![[0.0, 0.0], [1.0, 1.0], [10.0, 10.0]];
        let mut model = KMeans::new();
        model.fit(&x, &array![[0.0, 0.0], [10.0, 10.0]]).unwrap();

        let distances = model.transform(&x).unwrap();
        assert_eq!(distances.shape(), &[3, 2]);
        for distance in distances.iter() {
            assert!(*distance >= 0.0);
        }
    }

    #[test]
    fn test_kmeans_hamming() {
        let x = array![[0.0, 0.0, 1.0], [0.0, 0.0, 0.0], [1.0, 1.0, 1.0], [1.0, 1.0, 0.0]];
        let seeds = array![[0.0, 0.0, 0.0], [1.0, 1.0, 1.0]];

        let result = kmeans(&x, &seeds, 10, &Metric::hamming()).unwrap();
        assert_eq!(result.clustering[0], vec![0, 1]);
        assert_eq!(result.clustering[1], vec![2, 3]);
    }

    #[test]
    fn test_kmeans_predict_without_fit() {
        let x = array![[1.0, 2.0], [3.0, 4.0]];
        assert!(KMeans::new().predict(&x).is_err());
    }

    #[test]
    fn test_kmeans_dimension_mismatch() {
        let x = array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]];
        let seeds = array![[1.0, 2.0], [3.0, 4.0]];
        let err = kmeans(&x, &seeds, 10, &Metric::euclidean()).unwrap_err();
        assert_eq!(err.operation(), Some("kmeans"));
    }

    #[test]
    fn test_kmeans_invalid_input() {
        let metric = Metric::euclidean();
        assert!(kmeans(&Matrix::zeros((0, 2)), &array![[0.0, 0.0]], 10, &metric).is_err());
        assert!(kmeans(&array![[0.0, 0.0]], &Matrix::zeros((0, 2)), 10, &metric).is_err());
    }
}
