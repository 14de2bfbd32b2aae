/// Feature matrices, labels and input validation
pub mod dataset;
