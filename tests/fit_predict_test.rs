use nalgebra::{DMatrix, DVector};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rusty_tree::data::dataset::{numeric_matrix, FeatureValue};
use rusty_tree::errors::TreeError;
use rusty_tree::metrics::confusion::ClassificationMetrics;
use rusty_tree::trees::classifier::ClassificationTree;
use rusty_tree::trees::criterion::Entropy;
use rusty_tree::trees::node::TreeNode;
use rusty_tree::trees::regressor::RegressionTree;

fn pets() -> (DMatrix<FeatureValue>, DVector<String>) {
    let rows: [(&str, f64); 8] = [
        ("dog", 37.0),
        ("dog", 38.4),
        ("dog", 40.2),
        ("dog", 38.9),
        ("human", 36.2),
        ("human", 37.4),
        ("human", 38.8),
        ("human", 36.2),
    ];
    let cells: Vec<FeatureValue> = rows
        .iter()
        .flat_map(|&(species, temperature)| {
            [FeatureValue::from(species), FeatureValue::from(temperature)]
        })
        .collect();
    let labels = [
        "healthy", "healthy", "sick", "healthy", "healthy", "sick", "sick", "healthy",
    ];
    (
        DMatrix::from_row_slice(rows.len(), 2, &cells),
        DVector::from_iterator(labels.len(), labels.iter().map(|label| label.to_string())),
    )
}

fn random_classification(
    seed: u64,
    nrows: usize,
    ncols: usize,
) -> (DMatrix<FeatureValue>, DVector<u8>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let values: Vec<f64> = (0..nrows * ncols)
        .map(|_| f64::from(rng.gen_range(0..10u8)))
        .collect();
    let labels: Vec<u8> = (0..nrows).map(|_| rng.gen_range(0..3)).collect();
    (numeric_matrix(nrows, ncols, &values), DVector::from_vec(labels))
}

fn depth_of_deepest_leaf<T>(node: &TreeNode<T>, depth: usize) -> usize {
    match node {
        TreeNode::Internal { left, right, .. } => {
            depth_of_deepest_leaf(left, depth + 1).max(depth_of_deepest_leaf(right, depth + 1))
        }
        TreeNode::Leaf { .. } => depth,
    }
}

/// Checks that every internal node's sample count equals the sum over its leaves.
fn check_partition<T>(node: &TreeNode<T>) -> usize {
    match node {
        TreeNode::Internal {
            n_samples,
            left,
            right,
            ..
        } => {
            let reached = check_partition(left) + check_partition(right);
            assert_eq!(reached, *n_samples);
            reached
        }
        TreeNode::Leaf { labels } => {
            assert!(!labels.is_empty());
            labels.len()
        }
    }
}

#[test]
fn test_pets_walkthrough() {
    let (data, labels) = pets();
    let mut tree = ClassificationTree::new(data.clone(), labels.clone()).unwrap();
    tree.fit().unwrap();

    let test_data = DMatrix::from_row_slice(
        2,
        2,
        &["dog".into(), 38.0.into(), "human".into(), 38.0.into()],
    );
    let prediction = tree.predict(&test_data).unwrap();
    assert_eq!(prediction.as_slice(), &["healthy".to_string(), "sick".to_string()]);

    let other_tree = ClassificationTree::with_params(Some(3), 2, data, labels);
    assert!(other_tree.is_ok());
}

#[test]
fn test_pets_training_accuracy() {
    let (data, labels) = pets();
    let mut tree = ClassificationTree::new(data.clone(), labels.clone()).unwrap();
    tree.fit().unwrap();

    let predictions = tree.predict(&data).unwrap();
    assert_eq!(tree.accuracy(&labels, &predictions).unwrap(), 1.0);
}

#[test]
fn test_single_class_predicts_that_class() {
    let (data, _) = random_classification(7, 20, 3);
    let labels = DVector::from_element(20, "only");
    let mut tree = ClassificationTree::new(data, labels).unwrap();
    tree.fit().unwrap();
    assert_eq!(tree.node_count().unwrap(), 1);

    let (samples, _) = random_classification(8, 5, 3);
    let predictions = tree.predict(&samples).unwrap();
    assert!(predictions.iter().all(|&label| label == "only"));
}

#[test]
fn test_leaves_partition_training_rows() {
    for seed in 0..5 {
        let (data, labels) = random_classification(seed, 60, 4);
        let mut tree = ClassificationTree::new(data, labels.clone()).unwrap();
        tree.fit().unwrap();

        let root = tree.root().unwrap();
        assert_eq!(check_partition(root), labels.len());

        let mut class_counts = vec![0usize; tree.classes().len()];
        for leaf in root.leaves() {
            for &class_id in leaf {
                class_counts[class_id] += 1;
            }
        }
        for (class_id, class) in tree.classes().iter().enumerate() {
            let expected = labels.iter().filter(|&label| label == class).count();
            assert_eq!(class_counts[class_id], expected);
        }
    }
}

#[test]
fn test_depth_bound() {
    let (data, labels) = random_classification(42, 80, 3);
    for max_depth in 1..6 {
        let mut tree =
            ClassificationTree::with_params(Some(max_depth), 2, data.clone(), labels.clone())
                .unwrap();
        tree.fit().unwrap();
        assert!(depth_of_deepest_leaf(tree.root().unwrap(), 0) <= max_depth);
    }
}

#[test]
fn test_predict_is_idempotent() {
    let (data, labels) = random_classification(3, 50, 3);
    let mut tree = ClassificationTree::new(data, labels).unwrap().with_criterion(Entropy);
    tree.fit().unwrap();

    let (samples, _) = random_classification(4, 25, 3);
    let first = tree.predict(&samples).unwrap();
    let second = tree.predict(&samples).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_concurrent_predictions() {
    let (data, labels) = random_classification(5, 50, 3);
    let mut tree = ClassificationTree::new(data, labels).unwrap();
    tree.fit().unwrap();

    let (samples, _) = random_classification(6, 25, 3);
    let expected = tree.predict(&samples).unwrap();
    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(|| tree.predict(&samples).unwrap()))
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    });
}

#[test]
fn test_prediction_errors() {
    let (data, labels) = pets();
    let mut tree = ClassificationTree::new(data, labels).unwrap();

    let samples = DMatrix::from_row_slice(1, 2, &["dog".into(), 38.0.into()]);
    assert_eq!(tree.predict(&samples), Err(TreeError::NotFitted));

    tree.fit().unwrap();
    let samples = DMatrix::from_row_slice(1, 1, &["dog".into()]);
    assert_eq!(
        tree.predict(&samples),
        Err(TreeError::DimensionMismatch {
            expected: 2,
            found: 1
        })
    );
}

#[test]
fn test_construction_errors() {
    let (data, _) = pets();
    let short_labels = DVector::from_vec(vec!["healthy".to_string()]);
    assert!(matches!(
        ClassificationTree::new(data, short_labels),
        Err(TreeError::InvalidInput(_))
    ));

    let empty = numeric_matrix(0, 2, &[]);
    assert!(matches!(
        ClassificationTree::new(empty, DVector::<u8>::from_vec(vec![])),
        Err(TreeError::InvalidInput(_))
    ));
}

#[test]
fn test_regression_tree_separates_clusters() {
    let mut rng = StdRng::seed_from_u64(11);
    let values: Vec<f64> = (0..40)
        .map(|i| if i < 20 { rng.gen_range(0.0..1.0) } else { rng.gen_range(5.0..6.0) })
        .collect();
    let targets: Vec<f64> = (0..40).map(|i| if i < 20 { -1.0 } else { 1.0 }).collect();

    let mut tree =
        RegressionTree::new(numeric_matrix(40, 1, &values), DVector::from_vec(targets)).unwrap();
    tree.fit().unwrap();
    assert_eq!(tree.node_count().unwrap(), 3);

    let predictions = tree.predict(&numeric_matrix(2, 1, &[0.5, 5.5])).unwrap();
    assert_eq!(predictions, DVector::from_vec(vec![-1.0, 1.0]));
}
