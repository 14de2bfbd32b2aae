/// Classification metrics
pub mod confusion;
/// Regression error metrics
pub mod errors;
