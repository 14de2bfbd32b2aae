use nalgebra::DVector;

use crate::data::dataset::RealNumber;
use crate::errors::TreeError;

fn check_lengths<T: RealNumber>(y_true: &DVector<T>, y_pred: &DVector<T>) -> Result<T, TreeError> {
    if y_true.len() != y_pred.len() {
        return Err(TreeError::InvalidInput(
            "Predictions and labels are of different sizes.".into(),
        ));
    }
    if y_true.is_empty() {
        return Err(TreeError::InvalidInput("No predictions to evaluate.".into()));
    }
    T::from_usize(y_true.len())
        .ok_or_else(|| TreeError::InvalidInput("Couldn't transform from usize".into()))
}

pub trait RegressionMetrics<T: RealNumber> {
    /// Mean squared error.
    fn mse(&self, y_true: &DVector<T>, y_pred: &DVector<T>) -> Result<T, TreeError> {
        let n = check_lengths(y_true, y_pred)?;
        let squared_errors_sum = y_pred
            .iter()
            .zip(y_true.iter())
            .map(|(&y_p, &y_t)| (y_p - y_t) * (y_p - y_t))
            .fold(T::zero(), |acc, x| acc + x);

        Ok(squared_errors_sum / n)
    }

    /// Mean absolute error.
    fn mae(&self, y_true: &DVector<T>, y_pred: &DVector<T>) -> Result<T, TreeError> {
        let n = check_lengths(y_true, y_pred)?;
        let abs_errors_sum = y_pred
            .iter()
            .zip(y_true.iter())
            .map(|(&y_p, &y_t)| (y_p - y_t).abs())
            .fold(T::zero(), |acc, x| acc + x);

        Ok(abs_errors_sum / n)
    }

    /// Coefficient of determination.
    fn r2(&self, y_true: &DVector<T>, y_pred: &DVector<T>) -> Result<T, TreeError> {
        let n = check_lengths(y_true, y_pred)?;

        let y_true_mean = y_true.iter().fold(T::zero(), |acc, &x| acc + x) / n;
        let y_true_mean_vec = DVector::from_element(y_true.len(), y_true_mean);

        let mse_model = self.mse(y_true, y_pred)?;
        let mse_base = self.mse(y_true, &y_true_mean_vec)?;

        Ok(T::one() - (mse_model / mse_base))
    }
}
