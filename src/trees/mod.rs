/// Recursive tree construction
pub mod builder;
/// Decision tree classifier
pub mod classifier;
/// Split criteria: Gini impurity, information gain and variance reduction
pub mod criterion;
/// Tree nodes and split values
pub mod node;
/// Hyperparameters
pub mod params;
/// Decision tree regressor
pub mod regressor;
/// Best split search
pub mod splitter;
