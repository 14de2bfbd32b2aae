//! Split criteria
//!
//! Every criterion scores a candidate split from the labels of the parent node
//! and of the two partitions. Whether a higher or a lower score is better is
//! given by [`SplitCriterion::direction`].
use num_traits::ToPrimitive;
use std::collections::HashMap;
use std::hash::Hash;

/// Smallest change over the unsplit baseline that counts as an improvement.
pub const MIN_IMPROVEMENT: f64 = 1e-12;

/// Comparison direction of a criterion score.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Minimize,
    Maximize,
}

impl Direction {
    /// Returns `true` if `candidate` is strictly better than `current`.
    pub fn is_better(&self, candidate: f64, current: f64) -> bool {
        match self {
            Direction::Minimize => candidate < current,
            Direction::Maximize => candidate > current,
        }
    }

    /// The worst possible score, used to seed a best-so-far search.
    pub fn worst(&self) -> f64 {
        match self {
            Direction::Minimize => f64::INFINITY,
            Direction::Maximize => f64::NEG_INFINITY,
        }
    }
}

/// Strategy for evaluating candidate splits.
pub trait SplitCriterion<T>: Send + Sync {
    /// Scores splitting `parent` into `left` and `right`.
    fn score(&self, parent: &[T], left: &[T], right: &[T]) -> f64;

    fn direction(&self) -> Direction;

    /// Score of leaving `parent` unsplit.
    fn baseline(&self, parent: &[T]) -> f64;

    fn name(&self) -> &'static str;

    /// Returns `true` if `score` beats the unsplit `baseline` by more than [`MIN_IMPROVEMENT`].
    fn improves(&self, score: f64, baseline: f64) -> bool {
        match self.direction() {
            Direction::Minimize => score < baseline - MIN_IMPROVEMENT,
            Direction::Maximize => score > baseline + MIN_IMPROVEMENT,
        }
    }
}

/// Weighted Gini impurity of the partitions; lower is better.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Gini;

/// Information gain measured with Shannon entropy; higher is better.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Entropy;

/// Reduction of the target variance; higher is better.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct VarianceReduction;

impl<T: Eq + Hash + Send + Sync> SplitCriterion<T> for Gini {
    fn score(&self, parent: &[T], left: &[T], right: &[T]) -> f64 {
        weighted_gini(parent.len(), left, right)
    }

    fn direction(&self) -> Direction {
        Direction::Minimize
    }

    fn baseline(&self, parent: &[T]) -> f64 {
        gini_impurity(parent)
    }

    fn name(&self) -> &'static str {
        "gini"
    }
}

impl<T: Eq + Hash + Send + Sync> SplitCriterion<T> for Entropy {
    fn score(&self, parent: &[T], left: &[T], right: &[T]) -> f64 {
        information_gain(parent, left, right)
    }

    fn direction(&self) -> Direction {
        Direction::Maximize
    }

    fn baseline(&self, _parent: &[T]) -> f64 {
        0.0
    }

    fn name(&self) -> &'static str {
        "entropy"
    }
}

impl<T: ToPrimitive + Send + Sync> SplitCriterion<T> for VarianceReduction {
    fn score(&self, parent: &[T], left: &[T], right: &[T]) -> f64 {
        variance_reduction(parent, left, right)
    }

    fn direction(&self) -> Direction {
        Direction::Maximize
    }

    fn baseline(&self, _parent: &[T]) -> f64 {
        0.0
    }

    fn name(&self) -> &'static str {
        "variance_reduction"
    }
}

fn class_counts<T: Eq + Hash>(labels: &[T]) -> HashMap<&T, usize> {
    labels.iter().fold(HashMap::new(), |mut counts, label| {
        *counts.entry(label).or_insert(0) += 1;
        counts
    })
}

/// Gini impurity `1 - Σ p_i²` of a set of labels. An empty set has impurity 0.
pub fn gini_impurity<T: Eq + Hash>(labels: &[T]) -> f64 {
    if labels.is_empty() {
        return 0.0;
    }
    let total = labels.len() as f64;
    1.0 - class_counts(labels)
        .values()
        .map(|&count| {
            let p_class = count as f64 / total;
            p_class * p_class
        })
        .sum::<f64>()
}

/// Size-weighted Gini impurity of the two sides of a split of `total` rows.
pub fn weighted_gini<T: Eq + Hash>(total: usize, left: &[T], right: &[T]) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let total = total as f64;
    (left.len() as f64 / total) * gini_impurity(left)
        + (right.len() as f64 / total) * gini_impurity(right)
}

/// Shannon entropy `-Σ p_i log2 p_i` of a set of labels, with `0 log2 0 = 0`.
pub fn entropy<T: Eq + Hash>(labels: &[T]) -> f64 {
    if labels.is_empty() {
        return 0.0;
    }
    let total = labels.len() as f64;
    class_counts(labels)
        .values()
        .map(|&count| count as f64 / total)
        .filter(|&p_class| p_class > 0.0)
        .map(|p_class| -p_class * p_class.log2())
        .sum()
}

pub fn information_gain<T: Eq + Hash>(parent: &[T], left: &[T], right: &[T]) -> f64 {
    if parent.is_empty() {
        return 0.0;
    }
    let total = parent.len() as f64;
    entropy(parent)
        - (left.len() as f64 / total) * entropy(left)
        - (right.len() as f64 / total) * entropy(right)
}

/// Population variance of a set of values. An empty set has variance 0.
pub fn variance<T: ToPrimitive>(values: &[T]) -> f64 {
    let values: Vec<f64> = values.iter().filter_map(ToPrimitive::to_f64).collect();
    if values.is_empty() {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    values.iter().map(|x| (x - mean) * (x - mean)).sum::<f64>() / n
}

pub fn variance_reduction<T: ToPrimitive>(parent: &[T], left: &[T], right: &[T]) -> f64 {
    if parent.is_empty() {
        return 0.0;
    }
    let num_samples = parent.len() as f64;
    variance(parent)
        - (variance(left) * left.len() as f64 / num_samples)
        - (variance(right) * right.len() as f64 / num_samples)
}
