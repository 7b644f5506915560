use ndarray::Array2;
use ndarray_rand::rand_distr::Uniform;
use ndarray_rand::RandomExt;
use protoclust::baseline::theoretical_mca;
use protoclust::init::Initialization;
use protoclust::{Hypothesis, KuhnMunkres, McaBaseline, Metric};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn summary(scores: &[f64]) -> (f64, f64, f64) {
    let n = scores.len() as f64;
    let mean = scores.iter().sum::<f64>() / n;
    let min = scores.iter().copied().fold(f64::INFINITY, f64::min);
    let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    (mean, min, max)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut rng = StdRng::seed_from_u64(7);
    let data = Array2::random_using((60, 3), Uniform::new(0.0, 1.0), &mut rng);
    let k = 4;

    println!("=== MCA Baseline: n = {}, k = {} ===\n", data.nrows(), k);
    println!("Theoretical value: {:.4}\n", theoretical_mca(data.nrows(), k)?);

    let hypotheses = vec![
        ("label", Hypothesis::Label),
        ("partition", Hypothesis::Partition),
        ("cluster/random", Hypothesis::Cluster(Initialization::Random)),
        ("cluster/even", Hypothesis::Cluster(Initialization::Even)),
        (
            "cluster/maxmin",
            Hypothesis::Cluster(Initialization::MaxMin {
                metric: Metric::euclidean(),
            }),
        ),
    ];

    for (name, hypothesis) in hypotheses {
        let scores = McaBaseline::new(k)
            .runs(20)
            .hypothesis(hypothesis)
            .run(&data, &mut rng, &KuhnMunkres)?;
        let (mean, min, max) = summary(&scores);
        println!(
            "{:<16} {:>3} values  mean={:.4}  min={:.4}  max={:.4}",
            name,
            scores.len(),
            mean,
            min,
            max
        );
    }

    Ok(())
}
