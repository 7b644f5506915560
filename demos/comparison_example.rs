use ndarray::array;
use protoclust::validation::{figure_of_merit, intersection_matrix, pair_counts};
use protoclust::{compare_clusterings, kmeans, mca_from_labels, Clustering, KuhnMunkres, Metric};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    println!("=== Comparing Partitions ===\n");

    let a = Clustering::from_hit_lists(vec![vec![0, 1], vec![2, 3]]);
    let b = Clustering::from_hit_lists(vec![vec![0, 1, 2], vec![3]]);

    println!("A = {:?}", a.as_slice());
    println!("B = {:?}", b.as_slice());
    println!("Intersection matrix:\n{}", intersection_matrix(&a, &b));

    let counts = pair_counts(&a, &b, 4)?;
    println!("Pair counts: {:?}", counts);
    println!("Jaccard: {:.4}", counts.jaccard());
    println!("Rand:    {:.4}", counts.rand());
    println!("FOM:     {:.4}", figure_of_merit(&a, &b, 4)?);

    let from_labels = mca_from_labels(&[1, 1, 2, 2, 3, 3], &[2, 2, 3, 3, 1, 1], &KuhnMunkres)?;
    println!(
        "\nMCA of relabelled partitions: {:.4} (matching {:?})",
        from_labels.score, from_labels.row_solution
    );

    println!("\n=== Comparing Two K-Means Runs ===\n");

    let x = array![
        [1.0, 1.0], [1.2, 0.8], [0.9, 1.1],
        [5.0, 5.0], [5.1, 4.8], [4.9, 5.2],
        [9.0, 1.0], [9.2, 1.1], [8.8, 0.9]
    ];
    let metric = Metric::euclidean();

    let first = kmeans(&x, &array![[1.0, 1.0], [5.0, 5.0], [9.0, 1.0]], 100, &metric)?;
    let second = kmeans(&x, &array![[0.0, 0.0], [10.0, 10.0]], 100, &metric)?;

    let report = compare_clusterings(&x, &first.codebook, &second.codebook, &metric, &KuhnMunkres)?;
    println!("MCA:                      {:.4}", report.mca);
    println!("Jaccard:                  {:.4}", report.jaccard);
    println!("Rand:                     {:.4}", report.rand);
    println!("Transinformation:         {:.4}", report.transinformation);
    println!("Self-information:         {:.4?}", report.self_information);
    match report.symmetric_difference {
        Some(value) => println!("Symmetric difference:     {:.4}", value),
        None => println!("Symmetric difference:     n/a (cluster counts differ)"),
    }
    println!("Cross-quantization error: {:.4}", report.cross_quantization_error);
    println!("Intra-cluster correlation {:.4?}", report.intra_cluster_correlation);
    println!("Inter-cluster correlation {:.4?}", report.inter_cluster_correlation);

    Ok(())
}
