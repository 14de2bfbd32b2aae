//! Decision Tree Classifier
use super::builder::build_tree;
use super::criterion::{Gini, SplitCriterion};
use super::node::TreeNode;
use super::params::TreeParams;
use crate::data::dataset::{check_samples, ClassLabel, Dataset, FeatureKind, FeatureValue};
use crate::errors::TreeError;
use crate::metrics::confusion::ClassificationMetrics;
use log::info;
use nalgebra::{DMatrix, DVector};
use std::collections::HashMap;
use std::fmt::{self, Display, Formatter};

/// Decision Tree Classifier
///
/// Owns its training data. Labels are encoded as class ids in order of first
/// appearance, so majority-vote ties resolve to the class seen first in the
/// training labels.
///
/// # Examples
///
/// ```
/// use rusty_tree::trees::classifier::ClassificationTree;
/// use nalgebra::{DMatrix, DVector};
///
/// let data = DMatrix::from_row_slice(
///     8,
///     2,
///     &[
///         "dog".into(), 37.0.into(),
///         "dog".into(), 38.4.into(),
///         "dog".into(), 40.2.into(),
///         "dog".into(), 38.9.into(),
///         "human".into(), 36.2.into(),
///         "human".into(), 37.4.into(),
///         "human".into(), 38.8.into(),
///         "human".into(), 36.2.into(),
///     ],
/// );
/// let labels = DVector::from_vec(vec![
///     "healthy", "healthy", "sick", "healthy", "healthy", "sick", "sick", "healthy",
/// ]);
///
/// let mut tree = ClassificationTree::new(data, labels).unwrap();
/// tree.fit().unwrap();
///
/// let test_data = DMatrix::from_row_slice(
///     2,
///     2,
///     &["dog".into(), 38.0.into(), "human".into(), 38.0.into()],
/// );
/// let prediction = tree.predict(&test_data).unwrap();
/// assert_eq!(prediction.as_slice(), &["healthy", "sick"]);
/// ```
#[derive(Clone, Debug)]
pub struct ClassificationTree<L: ClassLabel, C: SplitCriterion<usize> = Gini> {
    root: Option<Box<TreeNode<usize>>>,
    data: DMatrix<FeatureValue>,
    labels: DVector<L>,
    feature_kinds: Vec<FeatureKind>,
    classes: Vec<L>,
    targets: Vec<usize>,
    tree_params: TreeParams,
    criterion: C,
}

impl<L: ClassLabel> ClassificationTree<L, Gini> {
    /// Creates an unfitted tree with unlimited depth and `min_samples_split = 2`.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::InvalidInput`] if `data` has no rows, if the number
    /// of labels differs from the number of rows, or if a column mixes numeric
    /// and categorical values.
    pub fn new(data: DMatrix<FeatureValue>, labels: DVector<L>) -> Result<Self, TreeError> {
        Self::with_params(None, 2, data, labels)
    }

    /// Creates an unfitted tree with custom stopping rules.
    ///
    /// # Arguments
    ///
    /// * `max_depth` - The maximum depth of the tree, `None` for unlimited.
    /// * `min_samples_split` - The minimum number of samples required to split a node.
    /// * `data` - The training features, one row per sample.
    /// * `labels` - The class label of every row.
    ///
    /// # Errors
    ///
    /// Same as [`ClassificationTree::new`], and additionally if `max_depth` is
    /// `Some(0)` or `min_samples_split` is 0.
    pub fn with_params(
        max_depth: Option<usize>,
        min_samples_split: usize,
        data: DMatrix<FeatureValue>,
        labels: DVector<L>,
    ) -> Result<Self, TreeError> {
        let tree_params = TreeParams::with_params(max_depth, min_samples_split)?;
        let dataset = Dataset::new(data, labels);
        let feature_kinds = dataset.validate()?;
        let (classes, targets) = encode_classes(dataset.y.as_slice());

        Ok(Self {
            root: None,
            data: dataset.x,
            labels: dataset.y,
            feature_kinds,
            classes,
            targets,
            tree_params,
            criterion: Gini,
        })
    }
}

impl<L: ClassLabel, C: SplitCriterion<usize>> ClassificationTree<L, C> {
    /// Replaces the split criterion. The returned tree is unfitted.
    pub fn with_criterion<D: SplitCriterion<usize>>(
        self,
        criterion: D,
    ) -> ClassificationTree<L, D> {
        ClassificationTree {
            root: None,
            data: self.data,
            labels: self.labels,
            feature_kinds: self.feature_kinds,
            classes: self.classes,
            targets: self.targets,
            tree_params: self.tree_params,
            criterion,
        }
    }

    /// Sets the maximum depth. Takes effect on the next [`fit`](Self::fit).
    pub fn set_max_depth(&mut self, max_depth: Option<usize>) -> Result<(), TreeError> {
        self.tree_params.set_max_depth(max_depth)
    }

    /// Sets the minimum number of samples to split. Takes effect on the next [`fit`](Self::fit).
    pub fn set_min_samples_split(&mut self, min_samples_split: usize) -> Result<(), TreeError> {
        self.tree_params.set_min_samples_split(min_samples_split)
    }

    pub fn max_depth(&self) -> Option<usize> {
        self.tree_params.max_depth()
    }

    pub fn min_samples_split(&self) -> usize {
        self.tree_params.min_samples_split()
    }

    pub fn criterion(&self) -> &C {
        &self.criterion
    }

    pub fn data(&self) -> &DMatrix<FeatureValue> {
        &self.data
    }

    pub fn labels(&self) -> &DVector<L> {
        &self.labels
    }

    /// Distinct labels in order of first appearance; a class id indexes this slice.
    pub fn classes(&self) -> &[L] {
        &self.classes
    }

    pub fn is_fitted(&self) -> bool {
        self.root.is_some()
    }

    /// The root node, whose leaves hold class ids into [`classes`](Self::classes).
    pub fn root(&self) -> Option<&TreeNode<usize>> {
        self.root.as_deref()
    }

    /// Builds the tree from the training data, replacing any previous tree.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::InvalidInput`] if the stopping rules were set to
    /// invalid values. The previous tree is kept on error.
    pub fn fit(&mut self) -> Result<(), TreeError> {
        let root = build_tree(&self.data, &self.targets, &self.tree_params, &self.criterion)?;
        info!(
            "Finished building the tree: {} nodes, {} leaves, depth {}.",
            root.node_count(),
            root.leaf_count(),
            root.depth()
        );
        self.root = Some(Box::new(root));
        Ok(())
    }

    /// Predicts the label of every row of `samples`.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::NotFitted`] if the tree wasn't built yet,
    /// [`TreeError::DimensionMismatch`] if `samples` has a different number of
    /// columns than the training data, and [`TreeError::InvalidInput`] if a
    /// value doesn't match the kind of its training column.
    pub fn predict(&self, samples: &DMatrix<FeatureValue>) -> Result<DVector<L>, TreeError> {
        let root = self.fitted_root()?;
        check_samples(samples, &self.feature_kinds)?;

        let predictions: Vec<L> = (0..samples.nrows())
            .map(|row| {
                let leaf = root.leaf_for(|feature_index| &samples[(row, feature_index)]);
                self.classes[majority_class(leaf, self.classes.len())].clone()
            })
            .collect();

        Ok(DVector::from_vec(predictions))
    }

    /// Prints the tree structure to stdout. Meant for debugging; the format may change.
    pub fn print_tree(&self) -> Result<(), TreeError> {
        self.fitted_root()?;
        print!("{}", self);
        Ok(())
    }

    pub fn node_count(&self) -> Result<usize, TreeError> {
        Ok(self.fitted_root()?.node_count())
    }

    pub fn leaf_count(&self) -> Result<usize, TreeError> {
        Ok(self.fitted_root()?.leaf_count())
    }

    pub fn depth(&self) -> Result<usize, TreeError> {
        Ok(self.fitted_root()?.depth())
    }

    fn fitted_root(&self) -> Result<&TreeNode<usize>, TreeError> {
        self.root.as_deref().ok_or(TreeError::NotFitted)
    }

    fn describe_leaf(&self, class_ids: &[usize]) -> String {
        let mut counts = vec![0usize; self.classes.len()];
        for &class_id in class_ids {
            counts[class_id] += 1;
        }
        counts
            .iter()
            .enumerate()
            .filter(|(_, count)| **count > 0)
            .map(|(class_id, count)| format!("{:?}: {}", self.classes[class_id], count))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl<L: ClassLabel, C: SplitCriterion<usize>> ClassificationMetrics<L>
    for ClassificationTree<L, C>
{
}

impl<L: ClassLabel, C: SplitCriterion<usize>> Display for ClassificationTree<L, C> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match &self.root {
            Some(root) => {
                root.render(f, 0, &|class_ids: &[usize]| self.describe_leaf(class_ids))
            }
            None => writeln!(f, "<unfitted tree>"),
        }
    }
}

/// Maps labels to class ids in order of first appearance.
fn encode_classes<L: ClassLabel>(labels: &[L]) -> (Vec<L>, Vec<usize>) {
    let mut classes = Vec::new();
    let mut ids: HashMap<L, usize> = HashMap::new();
    let targets = labels
        .iter()
        .map(|label| {
            *ids.entry(label.clone()).or_insert_with(|| {
                classes.push(label.clone());
                classes.len() - 1
            })
        })
        .collect();
    (classes, targets)
}

/// Most frequent class id; ties go to the lowest id.
fn majority_class(class_ids: &[usize], n_classes: usize) -> usize {
    let mut counts = vec![0usize; n_classes];
    for &class_id in class_ids {
        counts[class_id] += 1;
    }
    let mut best = 0;
    for (class_id, &count) in counts.iter().enumerate() {
        if count > counts[best] {
            best = class_id;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::dataset::numeric_matrix;
    use crate::trees::criterion::Entropy;

    fn pets() -> (DMatrix<FeatureValue>, DVector<&'static str>) {
        let data = DMatrix::from_row_slice(
            8,
            2,
            &[
                "dog".into(),
                37.0.into(),
                "dog".into(),
                38.4.into(),
                "dog".into(),
                40.2.into(),
                "dog".into(),
                38.9.into(),
                "human".into(),
                36.2.into(),
                "human".into(),
                37.4.into(),
                "human".into(),
                38.8.into(),
                "human".into(),
                36.2.into(),
            ],
        );
        let labels = DVector::from_vec(vec![
            "healthy", "healthy", "sick", "healthy", "healthy", "sick", "sick", "healthy",
        ]);
        (data, labels)
    }

    fn pets_test_data() -> DMatrix<FeatureValue> {
        DMatrix::from_row_slice(2, 2, &["dog".into(), 38.0.into(), "human".into(), 38.0.into()])
    }

    #[test]
    fn test_encode_classes() {
        let (classes, targets) = encode_classes(&["b", "a", "b", "c"]);
        assert_eq!(classes, vec!["b", "a", "c"]);
        assert_eq!(targets, vec![0, 1, 0, 2]);
    }

    #[test]
    fn test_majority_class_tie_goes_to_first_class() {
        assert_eq!(majority_class(&[1, 0, 1, 0], 2), 0);
        assert_eq!(majority_class(&[2, 1, 2], 3), 2);
    }

    #[test]
    fn test_fit_and_predict_pets() {
        let (data, labels) = pets();
        let mut tree = ClassificationTree::new(data, labels).unwrap();
        tree.fit().unwrap();

        let predictions = tree.predict(&pets_test_data()).unwrap();
        assert_eq!(predictions, DVector::from_vec(vec!["healthy", "sick"]));
        assert_eq!(tree.node_count().unwrap(), 7);
        assert_eq!(tree.depth().unwrap(), 3);
    }

    #[test]
    fn test_fit_and_predict_pets_with_entropy() {
        let (data, labels) = pets();
        let mut tree = ClassificationTree::new(data, labels)
            .unwrap()
            .with_criterion(Entropy);
        tree.fit().unwrap();

        let predictions = tree.predict(&tree.data().clone()).unwrap();
        assert_eq!(&predictions, tree.labels());
    }

    #[test]
    fn test_predict_unfitted() {
        let (data, labels) = pets();
        let tree = ClassificationTree::new(data, labels).unwrap();
        assert_eq!(tree.predict(&pets_test_data()), Err(TreeError::NotFitted));
        assert_eq!(tree.print_tree(), Err(TreeError::NotFitted));
        assert_eq!(tree.depth(), Err(TreeError::NotFitted));
    }

    #[test]
    fn test_predict_dimension_mismatch() {
        let (data, labels) = pets();
        let mut tree = ClassificationTree::new(data, labels).unwrap();
        tree.fit().unwrap();

        let samples = numeric_matrix(1, 3, &[1.0, 2.0, 3.0]);
        assert_eq!(
            tree.predict(&samples),
            Err(TreeError::DimensionMismatch {
                expected: 2,
                found: 3
            })
        );
    }

    #[test]
    fn test_max_depth_one_is_a_stump() {
        let (data, labels) = pets();
        let mut tree = ClassificationTree::with_params(Some(1), 2, data, labels).unwrap();
        tree.fit().unwrap();
        assert_eq!(tree.depth().unwrap(), 1);
        assert_eq!(tree.leaf_count().unwrap(), 2);
    }

    #[test]
    fn test_refit_replaces_tree() {
        let (data, labels) = pets();
        let mut tree = ClassificationTree::new(data, labels).unwrap();
        tree.fit().unwrap();
        assert_eq!(tree.depth().unwrap(), 3);

        tree.set_max_depth(Some(1)).unwrap();
        tree.fit().unwrap();
        assert_eq!(tree.depth().unwrap(), 1);
    }

    #[test]
    fn test_invalid_hyperparameters() {
        let (data, labels) = pets();
        assert!(matches!(
            ClassificationTree::with_params(Some(0), 2, data.clone(), labels.clone()),
            Err(TreeError::InvalidInput(_))
        ));
        assert!(matches!(
            ClassificationTree::with_params(None, 0, data, labels),
            Err(TreeError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_no_feature_columns_fit_a_single_leaf() {
        let data = numeric_matrix(3, 0, &[]);
        let labels = DVector::from_vec(vec!["sick", "healthy", "sick"]);
        let mut tree = ClassificationTree::new(data, labels).unwrap();
        tree.fit().unwrap();
        assert_eq!(tree.node_count().unwrap(), 1);

        let prediction = tree.predict(&numeric_matrix(2, 0, &[])).unwrap();
        assert_eq!(prediction.as_slice(), &["sick", "sick"]);
    }

    #[test]
    fn test_display_lists_every_node() {
        let (data, labels) = pets();
        let mut tree = ClassificationTree::new(data, labels).unwrap();
        tree.fit().unwrap();

        let rendering = tree.to_string();
        assert_eq!(rendering.lines().count(), 7);
        assert!(rendering.starts_with("feature[1] <= 37.2 (8 samples)"));
        assert!(rendering.contains("feature[0] == \"dog\" (5 samples)"));
        assert!(rendering.contains("leaf: \"healthy\": 3 (3 samples)"));
    }
}
