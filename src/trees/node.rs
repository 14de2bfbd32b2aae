use crate::data::dataset::FeatureValue;
use std::fmt::{self, Display, Formatter};

/// The value an internal node splits on.
#[derive(Clone, Debug, PartialEq)]
pub enum SplitValue {
    /// Numeric feature: `value <= threshold` goes left.
    Threshold(f64),
    /// Categorical feature: `value == category` goes left.
    Category(String),
}

impl SplitValue {
    /// Returns `true` if a sample with `value` in the split feature goes to the left child.
    pub fn goes_left(&self, value: &FeatureValue) -> bool {
        match (self, value) {
            (SplitValue::Threshold(threshold), FeatureValue::Numeric(value)) => value <= threshold,
            (SplitValue::Category(category), FeatureValue::Categorical(value)) => value == category,
            _ => false,
        }
    }
}

impl Display for SplitValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            SplitValue::Threshold(threshold) => write!(f, "<= {}", threshold),
            SplitValue::Category(category) => write!(f, "== {:?}", category),
        }
    }
}

/// Decision tree node
#[derive(Clone, Debug, PartialEq)]
pub enum TreeNode<T> {
    Internal {
        feature_index: usize,
        split_value: SplitValue,
        /// Number of training rows that reached this node.
        n_samples: usize,
        left: Box<TreeNode<T>>,
        right: Box<TreeNode<T>>,
    },
    Leaf {
        /// Targets of the training rows that reached this leaf, in training order.
        labels: Vec<T>,
    },
}

impl<T> TreeNode<T> {
    pub fn leaf(labels: Vec<T>) -> Self {
        TreeNode::Leaf { labels }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, TreeNode::Leaf { .. })
    }

    pub fn n_samples(&self) -> usize {
        match self {
            TreeNode::Internal { n_samples, .. } => *n_samples,
            TreeNode::Leaf { labels } => labels.len(),
        }
    }

    pub fn node_count(&self) -> usize {
        match self {
            TreeNode::Internal { left, right, .. } => 1 + left.node_count() + right.node_count(),
            TreeNode::Leaf { .. } => 1,
        }
    }

    pub fn leaf_count(&self) -> usize {
        match self {
            TreeNode::Internal { left, right, .. } => left.leaf_count() + right.leaf_count(),
            TreeNode::Leaf { .. } => 1,
        }
    }

    /// Depth of the deepest leaf; a lone leaf has depth 0.
    pub fn depth(&self) -> usize {
        match self {
            TreeNode::Internal { left, right, .. } => 1 + left.depth().max(right.depth()),
            TreeNode::Leaf { .. } => 0,
        }
    }

    /// Label sets of all leaves, left to right.
    pub fn leaves(&self) -> Vec<&[T]> {
        let mut leaves = Vec::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            match node {
                TreeNode::Internal { left, right, .. } => {
                    stack.push(right);
                    stack.push(left);
                }
                TreeNode::Leaf { labels } => leaves.push(labels.as_slice()),
            }
        }
        leaves
    }

    /// Follows the splits for one sample and returns the labels of the leaf it lands in.
    pub fn leaf_for<'a, I>(&self, features: I) -> &[T]
    where
        I: Fn(usize) -> &'a FeatureValue,
    {
        let mut node = self;
        loop {
            match node {
                TreeNode::Internal {
                    feature_index,
                    split_value,
                    left,
                    right,
                    ..
                } => {
                    node = if split_value.goes_left(features(*feature_index)) {
                        left.as_ref()
                    } else {
                        right.as_ref()
                    };
                }
                TreeNode::Leaf { labels } => return labels.as_slice(),
            }
        }
    }

    /// Writes an indented rendering of the subtree, one line per node.
    pub(crate) fn render<F>(
        &self,
        f: &mut Formatter<'_>,
        indent: usize,
        describe_leaf: &F,
    ) -> fmt::Result
    where
        F: Fn(&[T]) -> String,
    {
        let pad = "    ".repeat(indent);
        match self {
            TreeNode::Internal {
                feature_index,
                split_value,
                n_samples,
                left,
                right,
            } => {
                writeln!(
                    f,
                    "{}feature[{}] {} ({} samples)",
                    pad, feature_index, split_value, n_samples
                )?;
                left.render(f, indent + 1, describe_leaf)?;
                right.render(f, indent + 1, describe_leaf)
            }
            TreeNode::Leaf { labels } => writeln!(
                f,
                "{}leaf: {} ({} samples)",
                pad,
                describe_leaf(labels.as_slice()),
                labels.len()
            ),
        }
    }
}
