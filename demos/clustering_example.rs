use ndarray::array;
use protoclust::init::Initialization;
use protoclust::{fcmeans, kmeans, Matrix, Metric};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    println!("=== Prototype Clustering ===\n");

    // Three natural clusters plus a few stragglers
    let x = array![
        // Cluster 1: around (2, 2)
        [1.5, 1.8], [2.0, 2.2], [2.3, 1.9], [1.8, 2.5], [2.1, 1.7],
        // Cluster 2: around (8, 8)
        [7.8, 8.2], [8.1, 7.9], [8.3, 8.1], [7.9, 8.4], [8.2, 7.7],
        // Cluster 3: around (2, 8)
        [1.9, 7.8], [2.2, 8.1], [1.7, 8.3], [2.4, 7.9], [2.0, 8.2],
        // Stragglers
        [5.0, 5.0], [0.0, 0.0], [10.0, 0.0]
    ];

    println!("Dataset: {} samples, {} features", x.nrows(), x.ncols());
    println!("Expected: 3 natural clusters + some stragglers\n");

    let mut rng = StdRng::seed_from_u64(42);

    println!("=== K-Means ===");
    for init in [
        Initialization::Even,
        Initialization::Random,
        Initialization::MaxMin {
            metric: Metric::euclidean(),
        },
    ] {
        for &k in &[2, 3, 4] {
            let seeds = init.codebook(&x, k, &mut rng)?;
            let result = kmeans(&x, &seeds, 100, &Metric::euclidean())?;
            println!(
                "{:<24} k={}  steps={:>2}  converged={}  inertia={:.4}  sizes={:?}",
                format!("{:?}", init),
                k,
                result.steps,
                result.converged,
                result.inertia,
                result.clustering.sizes()
            );
        }
    }

    println!("\n=== Fuzzy C-Means ===");
    let max_min = Initialization::MaxMin {
        metric: Metric::euclidean(),
    };
    let seeds = max_min.codebook(&x, 3, &mut rng)?;
    for &m in &[1.2, 2.0, 3.0] {
        let result = fcmeans(&x, &seeds, m, 100, 1e-6)?;
        println!(
            "m={:.1}  steps={:>3}  objective={:.4}  sizes={:?}",
            m,
            result.steps,
            result.objective,
            result.clustering.sizes()
        );
        print_fuzziest(&result.membership);
    }

    Ok(())
}

fn print_fuzziest(membership: &Matrix) {
    // the sample whose strongest membership is weakest
    let (sample, strongest) = membership
        .rows()
        .into_iter()
        .map(|row| row.fold(0.0_f64, |acc, &u| acc.max(u)))
        .enumerate()
        .fold((0, f64::INFINITY), |best, (i, u)| if u < best.1 { (i, u) } else { best });

    println!(
        "        most ambiguous sample: {} (max membership {:.3}, row {:?})",
        sample,
        strongest,
        membership.row(sample).to_vec()
    );
}
