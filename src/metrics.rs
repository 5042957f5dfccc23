//! Evaluation metrics computed from 2x2 confusion counts.

use crate::data::RecommendationResult;
use crate::types::ItemId;

/// Confusion cells for one evaluation trial.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ConfusionCounts {
    /// Recommended items that are in the held-out truth.
    pub true_positive: usize,
    /// Recommended items that are not in the truth.
    pub false_positive: usize,
    /// Truth items the recommendation missed.
    pub false_negative: usize,
    /// Universe items in neither set.
    pub true_negative: usize,
}

impl ConfusionCounts {
    /// Count the cells for a recommendation against a held-out truth set,
    /// over a universe of `universe` items.
    ///
    /// `truth` items are assumed distinct. A universe smaller than the two
    /// sets clamps the true-negative cell at zero.
    pub fn from_result(result: &RecommendationResult, truth: &[ItemId], universe: usize) -> Self {
        let true_positive = truth.iter().filter(|item| result.contains(item)).count();
        let false_positive = result.len() - true_positive;
        let false_negative = truth.len() - true_positive;
        let true_negative =
            universe.saturating_sub(true_positive + false_positive + false_negative);
        Self {
            true_positive,
            false_positive,
            false_negative,
            true_negative,
        }
    }

    /// Total item count across all four cells.
    pub fn universe(&self) -> usize {
        self.true_positive + self.false_positive + self.false_negative + self.true_negative
    }
}

/// One evaluation metric over confusion counts.
///
/// Every metric maps a degenerate denominator to 0 instead of failing, so
/// one pathological trial cannot abort a multi-trial run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Metric {
    /// TP / (TP + FP).
    Precision,
    /// TP / (TP + FN).
    Recall,
    /// Weighted harmonic mean of precision and recall.
    FScore {
        /// Relative weight of recall against precision.
        beta: f64,
    },
    /// (TP + TN) / universe.
    Accuracy,
    /// FP / (FP + TN).
    FalsePositiveRate,
}

impl Metric {
    /// The metric sequence used by the stock evaluation runs.
    pub fn standard_set() -> Vec<Metric> {
        vec![
            Metric::Precision,
            Metric::Recall,
            Metric::FScore {
                beta: crate::constants::evaluation::DEFAULT_FSCORE_BETA,
            },
            Metric::Accuracy,
            Metric::FalsePositiveRate,
        ]
    }

    /// Column name used in report headers.
    pub fn name(&self) -> String {
        match self {
            Metric::Precision => "precision".to_string(),
            Metric::Recall => "recall".to_string(),
            Metric::FScore { beta } => format!("f_score({beta})"),
            Metric::Accuracy => "accuracy".to_string(),
            Metric::FalsePositiveRate => "fpr".to_string(),
        }
    }

    /// Metric value for one trial's counts.
    pub fn compute(&self, counts: &ConfusionCounts) -> f64 {
        let tp = counts.true_positive;
        let fp = counts.false_positive;
        let tn = counts.true_negative;
        match self {
            Metric::Precision => ratio(tp, tp + fp),
            Metric::Recall => ratio(tp, tp + counts.false_negative),
            Metric::FScore { beta } => {
                let precision = Metric::Precision.compute(counts);
                let recall = Metric::Recall.compute(counts);
                let denominator = beta * beta * precision + recall;
                if denominator == 0.0 {
                    0.0
                } else {
                    (1.0 + beta * beta) * precision * recall / denominator
                }
            }
            Metric::Accuracy => ratio(tp + tn, counts.universe()),
            Metric::FalsePositiveRate => ratio(fp, fp + tn),
        }
    }
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::ItemScore;

    fn result_of(items: &[&str]) -> RecommendationResult {
        let scores = ItemScore::uniform(items.iter().map(|item| item.to_string()), 1.0);
        RecommendationResult::new(scores)
    }

    fn truth_of(items: &[&str]) -> Vec<ItemId> {
        items.iter().map(|item| item.to_string()).collect()
    }

    #[test]
    fn counts_partition_the_universe() {
        let counts = ConfusionCounts::from_result(
            &result_of(&["a", "b", "c"]),
            &truth_of(&["b", "c", "d"]),
            10,
        );
        assert_eq!(counts.true_positive, 2);
        assert_eq!(counts.false_positive, 1);
        assert_eq!(counts.false_negative, 1);
        assert_eq!(counts.true_negative, 6);
        assert_eq!(counts.universe(), 10);
    }

    #[test]
    fn set_ratio_metrics_are_zero_when_both_sets_are_empty() {
        let counts = ConfusionCounts::from_result(&result_of(&[]), &truth_of(&[]), 10);
        assert_eq!(Metric::Precision.compute(&counts), 0.0);
        assert_eq!(Metric::Recall.compute(&counts), 0.0);
        assert_eq!(Metric::FScore { beta: 0.5 }.compute(&counts), 0.0);
        assert_eq!(Metric::FalsePositiveRate.compute(&counts), 0.0);
    }

    #[test]
    fn accuracy_is_one_when_recommendation_matches_truth() {
        for size in [1, 3, 7] {
            let items: Vec<String> = (0..size).map(|idx| format!("pkg{idx}")).collect();
            let refs: Vec<&str> = items.iter().map(|item| item.as_str()).collect();
            let counts = ConfusionCounts::from_result(&result_of(&refs), &truth_of(&refs), 10);
            assert_eq!(Metric::Accuracy.compute(&counts), 1.0);
        }
    }

    #[test]
    fn precision_and_recall_match_hand_counts() {
        let counts = ConfusionCounts::from_result(
            &result_of(&["a", "b", "c", "d"]),
            &truth_of(&["a", "b", "e"]),
            20,
        );
        assert_eq!(Metric::Precision.compute(&counts), 0.5);
        assert!((Metric::Recall.compute(&counts) - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn fscore_is_balanced_when_precision_equals_recall() {
        let counts = ConfusionCounts {
            true_positive: 1,
            false_positive: 1,
            false_negative: 1,
            true_negative: 7,
        };
        // precision = recall = 0.5, so every beta yields 0.5.
        let f1 = Metric::FScore { beta: 1.0 }.compute(&counts);
        assert!((f1 - 0.5).abs() < 1e-12);
        let f05 = Metric::FScore { beta: 0.5 }.compute(&counts);
        assert!((f05 - 0.5).abs() < 1e-12);
    }

    #[test]
    fn false_positive_rate_counts_against_negatives() {
        let counts = ConfusionCounts {
            true_positive: 0,
            false_positive: 2,
            false_negative: 0,
            true_negative: 8,
        };
        assert!((Metric::FalsePositiveRate.compute(&counts) - 0.2).abs() < 1e-12);
    }

    #[test]
    fn standard_set_keeps_the_report_order() {
        let names: Vec<String> = Metric::standard_set()
            .iter()
            .map(|metric| metric.name())
            .collect();
        assert_eq!(
            names,
            vec!["precision", "recall", "f_score(0.5)", "accuracy", "fpr"]
        );
    }
}
