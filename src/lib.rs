//! # Rusty-tree
//!
//! `rusty-tree` builds binary decision trees from labeled tabular data and
//! uses them to classify (or regress on) new samples.
//!
//! Features are [`FeatureValue`](data::dataset::FeatureValue)s: every column
//! is either numeric, split on `value <= threshold`, or categorical, split on
//! `value == category`. Splits are chosen by a pluggable
//! [`SplitCriterion`](trees::criterion::SplitCriterion); classification trees
//! default to Gini impurity and regression trees to variance reduction.
//!
//! ## Example Usage
//!
//! ```rust
//! use rusty_tree::trees::classifier::ClassificationTree;
//! use rusty_tree::trees::criterion::Entropy;
//! use nalgebra::{DMatrix, DVector};
//!
//! let data = DMatrix::from_row_slice(
//!     4,
//!     2,
//!     &[
//!         "dog".into(), 37.0.into(),
//!         "dog".into(), 40.2.into(),
//!         "human".into(), 36.2.into(),
//!         "human".into(), 38.8.into(),
//!     ],
//! );
//! let labels = DVector::from_vec(vec!["healthy", "sick", "healthy", "sick"]);
//!
//! let mut tree = ClassificationTree::with_params(Some(3), 2, data, labels)
//!     .unwrap()
//!     .with_criterion(Entropy);
//! tree.fit().unwrap();
//!
//! let test_data = DMatrix::from_row_slice(1, 2, &["human".into(), 39.5.into()]);
//! let predictions = tree.predict(&test_data).unwrap();
//! assert_eq!(predictions[0], "sick");
//! ```

/// Dataset and input validation utilities
pub mod data;
/// Error type
pub mod errors;
/// Functions for evaluating model performance
pub mod metrics;
/// Decision trees
pub mod trees;
