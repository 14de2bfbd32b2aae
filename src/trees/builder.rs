//! Recursive tree construction
use super::criterion::SplitCriterion;
use super::node::TreeNode;
use super::params::TreeParams;
use super::splitter::{find_best_split, partition_rows};
use crate::data::dataset::FeatureValue;
use crate::errors::TreeError;
use log::{debug, warn};
use nalgebra::DMatrix;

/// Grows a tree over row indices of a borrowed feature matrix.
pub struct TreeBuilder<'a, T, C: ?Sized> {
    x: &'a DMatrix<FeatureValue>,
    y: &'a [T],
    params: &'a TreeParams,
    criterion: &'a C,
}

impl<'a, T, C> TreeBuilder<'a, T, C>
where
    T: Copy + PartialEq + Send + Sync,
    C: SplitCriterion<T> + ?Sized,
{
    /// # Errors
    ///
    /// Returns [`TreeError::InvalidInput`] if `x` and `y` differ in length, if
    /// `x` has no rows, or if `params` holds non-positive values.
    pub fn new(
        x: &'a DMatrix<FeatureValue>,
        y: &'a [T],
        params: &'a TreeParams,
        criterion: &'a C,
    ) -> Result<Self, TreeError> {
        if x.nrows() != y.len() {
            return Err(TreeError::InvalidInput(format!(
                "data has {} rows but {} labels were provided",
                x.nrows(),
                y.len()
            )));
        }
        if x.nrows() == 0 {
            return Err(TreeError::InvalidInput("data has no rows".into()));
        }
        params.validate()?;

        Ok(Self {
            x,
            y,
            params,
            criterion,
        })
    }

    /// Builds the tree over all rows, starting at depth 0.
    pub fn build(&self) -> TreeNode<T> {
        self.build_node((0..self.x.nrows()).collect(), 0)
    }

    fn build_node(&self, rows: Vec<usize>, depth: usize) -> TreeNode<T> {
        if self.params.max_depth().is_some_and(|max_depth| depth >= max_depth) {
            debug!("depth {}: leaf with {} samples, depth limit", depth, rows.len());
            return self.leaf(&rows);
        }
        if rows.len() < self.params.min_samples_split() {
            debug!("depth {}: leaf with {} samples, too few to split", depth, rows.len());
            return self.leaf(&rows);
        }
        if self.is_pure(&rows) {
            debug!("depth {}: leaf with {} samples, pure node", depth, rows.len());
            return self.leaf(&rows);
        }

        let Some(best_split) = find_best_split(self.x, self.y, &rows, self.criterion) else {
            debug!("depth {}: leaf with {} samples, no viable split", depth, rows.len());
            return self.leaf(&rows);
        };

        let (left_rows, right_rows) =
            partition_rows(self.x, &rows, best_split.feature_index, &best_split.split_value);
        if left_rows.is_empty() || right_rows.is_empty() {
            warn!(
                "depth {}: split on feature {} left one side empty, making a leaf",
                depth, best_split.feature_index
            );
            return self.leaf(&rows);
        }

        debug!(
            "depth {}: split {} samples on feature[{}] {} ({} = {:.6}) into {} | {}",
            depth,
            rows.len(),
            best_split.feature_index,
            best_split.split_value,
            self.criterion.name(),
            best_split.score,
            left_rows.len(),
            right_rows.len()
        );

        let n_samples = rows.len();
        let left = self.build_node(left_rows, depth + 1);
        let right = self.build_node(right_rows, depth + 1);
        TreeNode::Internal {
            feature_index: best_split.feature_index,
            split_value: best_split.split_value,
            n_samples,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    fn is_pure(&self, rows: &[usize]) -> bool {
        match rows.split_first() {
            Some((&first, rest)) => rest.iter().all(|&row| self.y[row] == self.y[first]),
            None => true,
        }
    }

    fn leaf(&self, rows: &[usize]) -> TreeNode<T> {
        TreeNode::leaf(rows.iter().map(|&row| self.y[row]).collect())
    }
}

/// Validates the inputs and builds a tree over all rows of `x`.
pub fn build_tree<T, C>(
    x: &DMatrix<FeatureValue>,
    y: &[T],
    params: &TreeParams,
    criterion: &C,
) -> Result<TreeNode<T>, TreeError>
where
    T: Copy + PartialEq + Send + Sync,
    C: SplitCriterion<T> + ?Sized,
{
    Ok(TreeBuilder::new(x, y, params, criterion)?.build())
}
