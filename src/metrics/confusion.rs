use nalgebra::{DMatrix, DVector};

use crate::data::dataset::ClassLabel;
use crate::errors::TreeError;

/// Row `i` counts the samples of class `classes[i]`, column `j` the predictions of `classes[j]`.
#[derive(Clone, Debug, PartialEq)]
pub struct ConfusionMatrix<L: ClassLabel> {
    pub classes: Vec<L>,
    pub matrix: DMatrix<usize>,
}

impl<L: ClassLabel> ConfusionMatrix<L> {
    pub fn correct(&self) -> usize {
        self.matrix.diagonal().iter().sum()
    }

    pub fn total(&self) -> usize {
        self.matrix.iter().sum()
    }
}

pub trait ClassificationMetrics<L: ClassLabel> {
    /// Computes the confusion matrix based on the true labels and predicted labels.
    ///
    /// Classes are ordered by first appearance in `y_true`, then in `y_pred`.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::InvalidInput`] if the vectors differ in length.
    fn confusion_matrix(
        &self,
        y_true: &DVector<L>,
        y_pred: &DVector<L>,
    ) -> Result<ConfusionMatrix<L>, TreeError> {
        if y_true.len() != y_pred.len() {
            return Err(TreeError::InvalidInput(
                "Predictions and labels are of different sizes.".into(),
            ));
        }

        let mut classes: Vec<L> = Vec::new();
        for label in y_true.iter().chain(y_pred.iter()) {
            if !classes.contains(label) {
                classes.push(label.clone());
            }
        }

        let mut matrix = DMatrix::zeros(classes.len(), classes.len());
        let position = |label: &L| classes.iter().position(|class| class == label).unwrap_or(0);
        for (y_t, y_p) in y_true.iter().zip(y_pred.iter()) {
            matrix[(position(y_t), position(y_p))] += 1;
        }

        Ok(ConfusionMatrix { classes, matrix })
    }

    /// Fraction of predictions equal to the true label.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::InvalidInput`] if the vectors differ in length or are empty.
    fn accuracy(&self, y_true: &DVector<L>, y_pred: &DVector<L>) -> Result<f64, TreeError> {
        let confusion = self.confusion_matrix(y_true, y_pred)?;
        if confusion.total() == 0 {
            return Err(TreeError::InvalidInput("No predictions to evaluate.".into()));
        }
        Ok(confusion.correct() as f64 / confusion.total() as f64)
    }
}
