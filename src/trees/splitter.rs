//! Best split search
//!
//! Candidate split values per feature:
//! * numeric columns: the midpoints between consecutive sorted distinct values
//!   observed at the node,
//! * categorical columns: every distinct category observed at the node, in
//!   lexicographic order.
//!
//! Ties keep the first candidate found, i.e. the lowest feature index and then
//! the lowest threshold or category.
use super::criterion::SplitCriterion;
use super::node::SplitValue;
use crate::data::dataset::FeatureValue;
use nalgebra::DMatrix;
use rayon::iter::{IntoParallelIterator, ParallelIterator};

/// The best split found for a node.
#[derive(Clone, Debug, PartialEq)]
pub struct Split {
    pub feature_index: usize,
    pub split_value: SplitValue,
    pub score: f64,
}

/// Splits `rows` into the rows going left and the rows going right, keeping their order.
pub fn partition_rows(
    x: &DMatrix<FeatureValue>,
    rows: &[usize],
    feature_index: usize,
    split_value: &SplitValue,
) -> (Vec<usize>, Vec<usize>) {
    rows.iter()
        .copied()
        .partition(|&row| split_value.goes_left(&x[(row, feature_index)]))
}

/// Candidate split values of one feature over `rows`.
pub fn candidate_values(
    x: &DMatrix<FeatureValue>,
    rows: &[usize],
    feature_index: usize,
) -> Vec<SplitValue> {
    let Some(&first) = rows.first() else {
        return Vec::new();
    };

    match &x[(first, feature_index)] {
        FeatureValue::Numeric(_) => {
            let mut unique_values: Vec<f64> = rows
                .iter()
                .filter_map(|&row| x[(row, feature_index)].as_numeric())
                .collect();
            unique_values.sort_by(|a, b| a.total_cmp(b));
            unique_values.dedup();

            unique_values
                .windows(2)
                .map(|pair| {
                    let midpoint = pair[0] + (pair[1] - pair[0]) / 2.0;
                    // Adjacent floats can round the midpoint up to the larger value.
                    if midpoint < pair[1] {
                        SplitValue::Threshold(midpoint)
                    } else {
                        SplitValue::Threshold(pair[0])
                    }
                })
                .collect()
        }
        FeatureValue::Categorical(_) => {
            let mut categories: Vec<&str> = rows
                .iter()
                .filter_map(|&row| x[(row, feature_index)].as_category())
                .collect();
            categories.sort_unstable();
            categories.dedup();

            if categories.len() < 2 {
                return Vec::new();
            }
            categories
                .into_iter()
                .map(|category| SplitValue::Category(category.to_string()))
                .collect()
        }
    }
}

fn best_split_for_feature<T, C>(
    x: &DMatrix<FeatureValue>,
    y: &[T],
    rows: &[usize],
    parent: &[T],
    feature_index: usize,
    criterion: &C,
) -> Option<Split>
where
    T: Copy,
    C: SplitCriterion<T> + ?Sized,
{
    let direction = criterion.direction();
    let mut best_split: Option<Split> = None;
    let mut best_score = direction.worst();

    for split_value in candidate_values(x, rows, feature_index) {
        let (left, right): (Vec<T>, Vec<T>) = {
            let (left_rows, right_rows) = partition_rows(x, rows, feature_index, &split_value);
            (
                left_rows.iter().map(|&row| y[row]).collect(),
                right_rows.iter().map(|&row| y[row]).collect(),
            )
        };

        if left.is_empty() || right.is_empty() {
            continue;
        }

        let score = criterion.score(parent, &left, &right);
        if direction.is_better(score, best_score) {
            best_score = score;
            best_split = Some(Split {
                feature_index,
                split_value,
                score,
            });
        }
    }
    best_split
}

/// Finds the split of `rows` that scores best under `criterion`.
///
/// Returns `None` if every candidate leaves one side empty or no candidate
/// improves on keeping the rows together; the caller then makes a leaf.
pub fn find_best_split<T, C>(
    x: &DMatrix<FeatureValue>,
    y: &[T],
    rows: &[usize],
    criterion: &C,
) -> Option<Split>
where
    T: Copy + Send + Sync,
    C: SplitCriterion<T> + ?Sized,
{
    let parent: Vec<T> = rows.iter().map(|&row| y[row]).collect();
    let baseline = criterion.baseline(&parent);
    let direction = criterion.direction();

    let splits = (0..x.ncols())
        .into_par_iter()
        .map(|feature_index| {
            best_split_for_feature(x, y, rows, &parent, feature_index, criterion)
        })
        .collect::<Vec<_>>();

    let best_split = splits
        .into_iter()
        .flatten()
        .fold(None, |best: Option<Split>, split| match best {
            Some(best) if !direction.is_better(split.score, best.score) => Some(best),
            _ => Some(split),
        })?;

    if criterion.improves(best_split.score, baseline) {
        Some(best_split)
    } else {
        None
    }
}
