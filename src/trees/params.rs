use crate::errors::TreeError;

/// Stopping rules shared by the classification and regression trees.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TreeParams {
    /// `None` lets the tree grow until the other stopping rules apply.
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
}

impl Default for TreeParams {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeParams {
    pub fn new() -> Self {
        Self {
            max_depth: None,
            min_samples_split: 2,
        }
    }

    /// Creates validated parameters.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::InvalidInput`] if `max_depth` is `Some(0)` or
    /// `min_samples_split` is 0.
    pub fn with_params(
        max_depth: Option<usize>,
        min_samples_split: usize,
    ) -> Result<Self, TreeError> {
        let mut params = Self::new();
        params.set_max_depth(max_depth)?;
        params.set_min_samples_split(min_samples_split)?;
        Ok(params)
    }

    pub fn set_min_samples_split(&mut self, min_samples_split: usize) -> Result<(), TreeError> {
        if min_samples_split < 1 {
            return Err(TreeError::InvalidInput(
                "The minimum number of samples to split must be greater than 0.".into(),
            ));
        }
        self.min_samples_split = min_samples_split;
        Ok(())
    }

    pub fn set_max_depth(&mut self, max_depth: Option<usize>) -> Result<(), TreeError> {
        if max_depth.is_some_and(|depth| depth < 1) {
            return Err(TreeError::InvalidInput(
                "The maximum depth must be greater than 0.".into(),
            ));
        }
        self.max_depth = max_depth;
        Ok(())
    }

    /// Re-checks fields that may have been assigned directly.
    pub fn validate(&self) -> Result<(), TreeError> {
        Self::with_params(self.max_depth, self.min_samples_split).map(|_| ())
    }

    pub fn min_samples_split(&self) -> usize {
        self.min_samples_split
    }

    pub fn max_depth(&self) -> Option<usize> {
        self.max_depth
    }
}
