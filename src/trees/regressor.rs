//! Decision Tree Regressor
use super::builder::build_tree;
use super::criterion::{SplitCriterion, VarianceReduction};
use super::node::TreeNode;
use super::params::TreeParams;
use crate::data::dataset::{check_samples, Dataset, FeatureKind, FeatureValue, RealNumber};
use crate::errors::TreeError;
use crate::metrics::errors::RegressionMetrics;
use log::info;
use nalgebra::{DMatrix, DVector};
use std::fmt::{self, Display, Formatter};

/// Decision Tree Regressor
///
/// Splits by variance reduction unless another criterion is supplied, and
/// predicts the mean target of the leaf a sample lands in.
#[derive(Clone, Debug)]
pub struct RegressionTree<T: RealNumber, C: SplitCriterion<T> = VarianceReduction> {
    root: Option<Box<TreeNode<T>>>,
    data: DMatrix<FeatureValue>,
    targets: DVector<T>,
    feature_kinds: Vec<FeatureKind>,
    tree_params: TreeParams,
    criterion: C,
}

impl<T: RealNumber> RegressionTree<T, VarianceReduction> {
    /// Creates an unfitted tree with unlimited depth and `min_samples_split = 2`.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::InvalidInput`] if `data` has no rows, if the number
    /// of targets differs from the number of rows, if a column mixes numeric
    /// and categorical values, or if a target is not finite.
    pub fn new(data: DMatrix<FeatureValue>, targets: DVector<T>) -> Result<Self, TreeError> {
        Self::with_params(None, 2, data, targets)
    }

    /// Creates an unfitted tree with custom stopping rules.
    ///
    /// # Errors
    ///
    /// Same as [`RegressionTree::new`], and additionally if `max_depth` is
    /// `Some(0)` or `min_samples_split` is 0.
    pub fn with_params(
        max_depth: Option<usize>,
        min_samples_split: usize,
        data: DMatrix<FeatureValue>,
        targets: DVector<T>,
    ) -> Result<Self, TreeError> {
        let tree_params = TreeParams::with_params(max_depth, min_samples_split)?;
        let dataset = Dataset::new(data, targets);
        let feature_kinds = dataset.validate()?;
        if let Some(target) = dataset.y.iter().find(|target| !target.is_finite()) {
            return Err(TreeError::InvalidInput(format!(
                "targets contain the non-finite value {}",
                target
            )));
        }

        Ok(Self {
            root: None,
            data: dataset.x,
            targets: dataset.y,
            feature_kinds,
            tree_params,
            criterion: VarianceReduction,
        })
    }
}

impl<T: RealNumber, C: SplitCriterion<T>> RegressionTree<T, C> {
    /// Replaces the split criterion. The returned tree is unfitted.
    pub fn with_criterion<D: SplitCriterion<T>>(self, criterion: D) -> RegressionTree<T, D> {
        RegressionTree {
            root: None,
            data: self.data,
            targets: self.targets,
            feature_kinds: self.feature_kinds,
            tree_params: self.tree_params,
            criterion,
        }
    }

    pub fn set_max_depth(&mut self, max_depth: Option<usize>) -> Result<(), TreeError> {
        self.tree_params.set_max_depth(max_depth)
    }

    pub fn set_min_samples_split(&mut self, min_samples_split: usize) -> Result<(), TreeError> {
        self.tree_params.set_min_samples_split(min_samples_split)
    }

    pub fn max_depth(&self) -> Option<usize> {
        self.tree_params.max_depth()
    }

    pub fn min_samples_split(&self) -> usize {
        self.tree_params.min_samples_split()
    }

    pub fn data(&self) -> &DMatrix<FeatureValue> {
        &self.data
    }

    pub fn targets(&self) -> &DVector<T> {
        &self.targets
    }

    pub fn is_fitted(&self) -> bool {
        self.root.is_some()
    }

    pub fn root(&self) -> Option<&TreeNode<T>> {
        self.root.as_deref()
    }

    /// Builds the tree from the training data, replacing any previous tree.
    pub fn fit(&mut self) -> Result<(), TreeError> {
        let root = build_tree(
            &self.data,
            self.targets.as_slice(),
            &self.tree_params,
            &self.criterion,
        )?;
        info!(
            "Finished building the tree: {} nodes, {} leaves, depth {}.",
            root.node_count(),
            root.leaf_count(),
            root.depth()
        );
        self.root = Some(Box::new(root));
        Ok(())
    }

    /// Predicts the target of every row of `samples` as the mean of its leaf.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::NotFitted`] if the tree wasn't built yet,
    /// [`TreeError::DimensionMismatch`] if `samples` has a different number of
    /// columns than the training data, and [`TreeError::InvalidInput`] if a
    /// value doesn't match the kind of its training column.
    pub fn predict(&self, samples: &DMatrix<FeatureValue>) -> Result<DVector<T>, TreeError> {
        let root = self.fitted_root()?;
        check_samples(samples, &self.feature_kinds)?;

        let predictions: Vec<T> = (0..samples.nrows())
            .map(|row| mean(root.leaf_for(|feature_index| &samples[(row, feature_index)])))
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

    fn fitted_root(&self) -> Result<&TreeNode<T>, TreeError> {
        self.root.as_deref().ok_or(TreeError::NotFitted)
    }
}

impl<T: RealNumber, C: SplitCriterion<T>> RegressionMetrics<T> for RegressionTree<T, C> {}

impl<T: RealNumber, C: SplitCriterion<T>> Display for RegressionTree<T, C> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match &self.root {
            Some(root) => root.render(f, 0, &|targets: &[T]| format!("mean {}", mean(targets))),
            None => writeln!(f, "<unfitted tree>"),
        }
    }
}

/// Incremental mean; 0 for an empty slice.
fn mean<T: RealNumber>(values: &[T]) -> T {
    let mut mean = T::zero();
    let mut count = T::zero();
    for &value in values {
        count = count + T::one();
        mean = mean + (value - mean) / count;
    }
    mean
}
