use crate::error::{ClusterError, Result};
use ndarray::ArrayView1;

/// Mean and population variance of a non-empty sequence.
pub fn mean_var(x: &ArrayView1<f64>) -> Result<(f64, f64)> {
    if x.is_empty() {
        return Err(ClusterError::invalid("mean_var", "sequence is empty"));
    }

    let n = x.len() as f64;
    let mean = x.sum() / n;
    let var = x.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n;
    Ok((mean, var))
}

/// [Pearson correlation](https://en.wikipedia.org/wiki/Pearson_correlation_coefficient)
/// of two equally long sequences.
///
/// A constant sequence carries no linear relationship, so the correlation is
/// 0.0 whenever either variance vanishes.
pub fn pearson(x: &ArrayView1<f64>, y: &ArrayView1<f64>) -> Result<f64> {
    if x.len() != y.len() {
        return Err(ClusterError::invalid(
            "pearson",
            format!("sequences have different lengths ({} vs {})", x.len(), y.len()),
        ));
    }

    let (mean_x, var_x) = mean_var(x)?;
    let (mean_y, var_y) = mean_var(y)?;
    if var_x <= 0.0 || var_y <= 0.0 {
        return Ok(0.0);
    }

    let n = x.len() as f64;
    let cov = x
        .iter()
        .zip(y.iter())
        .map(|(a, b)| (a - mean_x) * (b - mean_y))
        .sum::<f64>()
        / n;

    Ok((cov / (var_x * var_y).sqrt()).clamp(-1.0, 1.0))
}
