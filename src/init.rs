//! Codebook initialization.
//!
//! Every strategy draws from a caller-supplied random number generator, so a
//! seeded `StdRng` reproduces the same codebook.

use crate::error::{ClusterError, Result};
use crate::metric::Metric;
use crate::Matrix;
use ndarray::Axis;
use ndarray_rand::rand_distr::Uniform;
use ndarray_rand::RandomExt;
use rand::seq::index::sample;
use rand::Rng;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How to pick the `k` starting prototypes.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Initialization {
    /// Points drawn uniformly inside the bounding box of the data.
    Even,
    /// `k` distinct data rows, kept in data order.
    #[default]
    Random,
    /// Max-min (farthest point) selection: a random first row, then always
    /// the row farthest from every prototype chosen so far.
    MaxMin { metric: Metric },
    /// `k` rows drawn with replacement.
    Resample,
    /// Rows drawn with replacement, duplicates dropped. May yield fewer than
    /// `k` prototypes.
    ResampleDistinct,
}

impl Initialization {
    /// Builds a codebook for `data`.
    pub fn codebook<R: Rng + ?Sized>(&self, data: &Matrix, k: usize, rng: &mut R) -> Result<Matrix> {
        let n = data.nrows();
        if n == 0 || data.ncols() == 0 {
            return Err(ClusterError::invalid("init", "data must have at least one sample and one feature"));
        }
        if k == 0 {
            return Err(ClusterError::invalid("init", "k must be > 0"));
        }

        match self {
            Initialization::Even => Ok(even(data, k, rng)),
            Initialization::Random => {
                check_k(n, k)?;
                let mut rows = sample(rng, n, k).into_vec();
                rows.sort_unstable();
                Ok(data.select(Axis(0), &rows))
            }
            Initialization::MaxMin { metric } => {
                check_k(n, k)?;
                maxmin(data, k, metric, rng)
            }
            Initialization::Resample => {
                let rows: Vec<usize> = (0..k).map(|_| rng.gen_range(0..n)).collect();
                Ok(data.select(Axis(0), &rows))
            }
            Initialization::ResampleDistinct => {
                let mut taken = vec![false; n];
                let mut rows = Vec::with_capacity(k);
                for _ in 0..k {
                    let row = rng.gen_range(0..n);
                    if !taken[row] {
                        taken[row] = true;
                        rows.push(row);
                    }
                }
                Ok(data.select(Axis(0), &rows))
            }
        }
    }
}

fn check_k(n: usize, k: usize) -> Result<()> {
    if k > n {
        return Err(ClusterError::invalid(
            "init",
            format!("cannot pick {} distinct prototypes from {} samples", k, n),
        ));
    }
    Ok(())
}

fn even<R: Rng + ?Sized>(data: &Matrix, k: usize, rng: &mut R) -> Matrix {
    let lower = data.fold_axis(Axis(0), f64::INFINITY, |&acc, &x| acc.min(x));
    let upper = data.fold_axis(Axis(0), f64::NEG_INFINITY, |&acc, &x| acc.max(x));
    let span = &upper - &lower;

    let unit = Matrix::random_using((k, data.ncols()), Uniform::new(0.0, 1.0), rng);
    unit * &span + &lower
}

fn maxmin<R: Rng + ?Sized>(data: &Matrix, k: usize, metric: &Metric, rng: &mut R) -> Result<Matrix> {
    let n = data.nrows();
    let mut marked = vec![false; n];
    // distance of every sample to the nearest chosen prototype
    let mut nearest = vec![f64::INFINITY; n];
    let mut rows = Vec::with_capacity(k);

    let mut q = rng.gen_range(0..n);
    for _ in 0..k {
        marked[q] = true;
        rows.push(q);

        let mut farthest: Option<(usize, f64)> = None;
        for p in 0..n {
            if marked[p] {
                continue;
            }
            let d = metric.distance(&data.row(q), &data.row(p))?;
            if d < nearest[p] {
                nearest[p] = d;
            }
            if farthest.is_none_or(|(_, best)| nearest[p] > best) {
                farthest = Some((p, nearest[p]));
            }
        }

        match farthest {
            Some((p, _)) => q = p,
            None => break,
        }
    }

    Ok(data.select(Axis(0), &rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn data() -> Matrix {
        array![[0.0, 5.0], [1.0, 6.0], [2.0, 7.0], [3.0, 8.0], [10.0, 20.0]]
    }

    #[test]
    fn test_even_stays_in_bounding_box() {
        let mut rng = StdRng::seed_from_u64(7);
        let codebook = Initialization::Even.codebook(&data(), 20, &mut rng).unwrap();

        assert_eq!(codebook.shape(), &[20, 2]);
        for row in codebook.rows() {
            assert!(row[0] >= 0.0 && row[0] <= 10.0);
            assert!(row[1] >= 5.0 && row[1] <= 20.0);
        }
    }

    #[test]
    fn test_random_picks_distinct_rows() {
        let x = data();
        let mut rng = StdRng::seed_from_u64(1);
        let codebook = Initialization::Random.codebook(&x, 5, &mut rng).unwrap();

        // all rows taken, in data order
        assert_eq!(codebook, x);
        assert!(Initialization::Random.codebook(&x, 6, &mut rng).is_err());
    }

    #[test]
    fn test_maxmin_spreads_prototypes() {
        let x = array![[0.0], [0.1], [0.2], [5.0], [10.0]];
        let init = Initialization::MaxMin {
            metric: Metric::euclidean(),
        };

        for seed in 0..10 {
            let mut rng = StdRng::seed_from_u64(seed);
            let codebook = init.codebook(&x, 3, &mut rng).unwrap();
            let mut values: Vec<f64> = codebook.iter().copied().collect();
            values.sort_by(|a, b| a.partial_cmp(b).unwrap());

            // both extremes and the middle point always end up in the codebook
            assert!(values.contains(&10.0) || values.contains(&0.0));
            assert!(values.contains(&5.0));
            assert_eq!(codebook.nrows(), 3);
        }
    }

    #[test]
    fn test_maxmin_with_duplicates_stays_distinct() {
        let x = array![[1.0], [1.0], [1.0]];
        let init = Initialization::MaxMin {
            metric: Metric::euclidean(),
        };
        let mut rng = StdRng::seed_from_u64(3);
        let codebook = init.codebook(&x, 3, &mut rng).unwrap();
        assert_eq!(codebook.nrows(), 3);
    }

    #[test]
    fn test_resample_variants() {
        let x = data();
        let mut rng = StdRng::seed_from_u64(11);

        let codebook = Initialization::Resample.codebook(&x, 12, &mut rng).unwrap();
        assert_eq!(codebook.nrows(), 12);

        let distinct = Initialization::ResampleDistinct.codebook(&x, 12, &mut rng).unwrap();
        assert!(distinct.nrows() >= 1 && distinct.nrows() <= 5);
        for (i, a) in distinct.rows().into_iter().enumerate() {
            for b in distinct.rows().into_iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_invalid_arguments() {
        let mut rng = StdRng::seed_from_u64(0);
        assert!(Initialization::Even.codebook(&data(), 0, &mut rng).is_err());
        assert!(Initialization::Resample.codebook(&Matrix::zeros((0, 2)), 1, &mut rng).is_err());
    }
}
