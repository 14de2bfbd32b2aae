use nalgebra::{DMatrix, DVector, Scalar};
use num_traits::{Float, FromPrimitive};
use std::fmt::{self, Debug, Display, Formatter};
use std::hash::Hash;

use crate::errors::TreeError;

/// Types usable as class labels of a
/// [`ClassificationTree`](crate::trees::classifier::ClassificationTree).
pub trait ClassLabel: Clone + Eq + Hash + Debug + Send + Sync + 'static {}
impl<T> ClassLabel for T where T: Clone + Eq + Hash + Debug + Send + Sync + 'static {}

/// Types usable as continuous targets of a
/// [`RegressionTree`](crate::trees::regressor::RegressionTree).
pub trait RealNumber: Float + FromPrimitive + Debug + Display + Send + Sync + 'static {}
impl<T> RealNumber for T where
    T: Float + FromPrimitive + Debug + Display + Send + Sync + 'static
{
}

/// Whether a feature column holds numbers or categories.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FeatureKind {
    Numeric,
    Categorical,
}

impl Display for FeatureKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            FeatureKind::Numeric => write!(f, "numeric"),
            FeatureKind::Categorical => write!(f, "categorical"),
        }
    }
}

/// A single cell of the feature matrix.
///
/// Numeric columns are split on `value <= threshold`, categorical columns on
/// `value == category`.
#[derive(Clone, Debug, PartialEq)]
pub enum FeatureValue {
    Numeric(f64),
    Categorical(String),
}

impl FeatureValue {
    pub fn kind(&self) -> FeatureKind {
        match self {
            FeatureValue::Numeric(_) => FeatureKind::Numeric,
            FeatureValue::Categorical(_) => FeatureKind::Categorical,
        }
    }

    pub fn as_numeric(&self) -> Option<f64> {
        match self {
            FeatureValue::Numeric(value) => Some(*value),
            FeatureValue::Categorical(_) => None,
        }
    }

    pub fn as_category(&self) -> Option<&str> {
        match self {
            FeatureValue::Categorical(value) => Some(value.as_str()),
            FeatureValue::Numeric(_) => None,
        }
    }
}

impl Display for FeatureValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            FeatureValue::Numeric(value) => write!(f, "{}", value),
            FeatureValue::Categorical(value) => write!(f, "{:?}", value),
        }
    }
}

impl From<f64> for FeatureValue {
    fn from(value: f64) -> Self {
        FeatureValue::Numeric(value)
    }
}

impl From<i32> for FeatureValue {
    fn from(value: i32) -> Self {
        FeatureValue::Numeric(value.into())
    }
}

impl From<&str> for FeatureValue {
    fn from(value: &str) -> Self {
        FeatureValue::Categorical(value.to_string())
    }
}

impl From<String> for FeatureValue {
    fn from(value: String) -> Self {
        FeatureValue::Categorical(value)
    }
}

/// Builds a feature matrix from row-major numeric values.
///
/// # Panics
///
/// Panics if `values` holds fewer than `nrows * ncols` elements.
pub fn numeric_matrix(nrows: usize, ncols: usize, values: &[f64]) -> DMatrix<FeatureValue> {
    DMatrix::from_row_iterator(
        nrows,
        ncols,
        values.iter().map(|&value| FeatureValue::Numeric(value)),
    )
}

/// Training data: one feature row per label.
pub struct Dataset<L: Scalar> {
    pub x: DMatrix<FeatureValue>,
    pub y: DVector<L>,
}

impl<L: Scalar> Dataset<L> {
    pub fn new(x: DMatrix<FeatureValue>, y: DVector<L>) -> Self {
        Self { x, y }
    }

    pub fn nrows(&self) -> usize {
        self.x.nrows()
    }

    pub fn ncols(&self) -> usize {
        self.x.ncols()
    }

    /// Checks the data/label shapes and returns the kind of every feature column.
    ///
    /// Data without feature columns is accepted; a tree trained on it is a
    /// single leaf.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::InvalidInput`] if the dataset has no rows, if the
    /// number of labels differs from the number of rows, if a column mixes
    /// numeric and categorical cells, or if a numeric cell is not finite.
    pub fn validate(&self) -> Result<Vec<FeatureKind>, TreeError> {
        if self.nrows() != self.y.len() {
            return Err(TreeError::InvalidInput(format!(
                "data has {} rows but {} labels were provided",
                self.nrows(),
                self.y.len()
            )));
        }
        if self.nrows() == 0 {
            return Err(TreeError::InvalidInput("data has no rows".into()));
        }

        let mut kinds = Vec::with_capacity(self.ncols());
        for (feature_index, column) in self.x.column_iter().enumerate() {
            let kind = column[0].kind();
            for value in column.iter() {
                check_cell(value, kind, feature_index)?;
            }
            kinds.push(kind);
        }
        Ok(kinds)
    }
}

/// Checks that every sample matches the column layout seen during training.
///
/// # Errors
///
/// Returns [`TreeError::DimensionMismatch`] if the column count differs and
/// [`TreeError::InvalidInput`] if a cell has the wrong kind or is not finite.
pub fn check_samples(
    samples: &DMatrix<FeatureValue>,
    kinds: &[FeatureKind],
) -> Result<(), TreeError> {
    if samples.ncols() != kinds.len() {
        return Err(TreeError::DimensionMismatch {
            expected: kinds.len(),
            found: samples.ncols(),
        });
    }
    for (feature_index, (column, &kind)) in samples.column_iter().zip(kinds).enumerate() {
        for value in column.iter() {
            check_cell(value, kind, feature_index)?;
        }
    }
    Ok(())
}

fn check_cell(
    value: &FeatureValue,
    kind: FeatureKind,
    feature_index: usize,
) -> Result<(), TreeError> {
    if value.kind() != kind {
        return Err(TreeError::InvalidInput(format!(
            "feature {} is {}, but the value {} is {}",
            feature_index,
            kind,
            value,
            value.kind()
        )));
    }
    if let FeatureValue::Numeric(number) = value {
        if !number.is_finite() {
            return Err(TreeError::InvalidInput(format!(
                "feature {} contains the non-finite value {}",
                feature_index, number
            )));
        }
    }
    Ok(())
}
