//! Holdout cross-validation of a recommender against one user's profile.

use std::fmt;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::constants::profile::INSTALLED_ITEM_WEIGHT;
use crate::data::ItemScore;
use crate::errors::RecommenderError;
use crate::metrics::{ConfusionCounts, Metric};
use crate::profile::UserProfile;
use crate::recommender::Recommender;
use crate::types::ItemId;

/// One train/test partition of a user's package profile.
///
/// Train and test are disjoint and their union is the drawn profile.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EvaluationSplit {
    /// Items the trial profile keeps.
    pub train: Vec<ItemId>,
    /// Held-out items the recommender must rediscover.
    pub test: Vec<ItemId>,
}

impl EvaluationSplit {
    /// Draw a random split at `ratio` train share, without replacement.
    ///
    /// The train side gets `floor(ratio * len)` items. A ratio that leaves
    /// either side empty is a configuration error, not a silent degenerate
    /// trial.
    pub fn draw(
        items: &[ItemId],
        ratio: f64,
        rng: &mut StdRng,
    ) -> Result<Self, RecommenderError> {
        let train_len = (ratio * items.len() as f64).floor() as usize;
        if train_len == 0 || train_len >= items.len() {
            return Err(RecommenderError::Configuration(format!(
                "ratio {ratio} cannot split {} profile items into non-empty train and test sets",
                items.len()
            )));
        }
        let mut train: Vec<ItemId> = items.to_vec();
        train.shuffle(rng);
        let test = train.split_off(train_len);
        Ok(Self { train, test })
    }
}

/// Repeated-holdout harness: hides part of a known-good profile and scores
/// how much of it the recommender rediscovers.
pub struct CrossValidation<'rec> {
    ratio: f64,
    rounds: usize,
    recommender: &'rec Recommender,
    metrics: Vec<Metric>,
    verbose: bool,
    seed: Option<u64>,
}

impl<'rec> CrossValidation<'rec> {
    /// Build a harness over `recommender`.
    ///
    /// `ratio` is the train share per round and must lie strictly between
    /// 0 and 1; `rounds` and `metrics` must be non-empty. `verbose` lifts
    /// the per-round log lines from debug to info.
    pub fn new(
        ratio: f64,
        rounds: usize,
        recommender: &'rec Recommender,
        metrics: Vec<Metric>,
        verbose: bool,
    ) -> Result<Self, RecommenderError> {
        if !(ratio > 0.0 && ratio < 1.0) {
            return Err(RecommenderError::Configuration(format!(
                "holdout ratio must lie strictly between 0 and 1, got {ratio}"
            )));
        }
        if rounds == 0 {
            return Err(RecommenderError::Configuration(
                "cross-validation needs at least one round".to_string(),
            ));
        }
        if metrics.is_empty() {
            return Err(RecommenderError::Configuration(
                "cross-validation needs at least one metric".to_string(),
            ));
        }
        Ok(Self {
            ratio,
            rounds,
            recommender,
            metrics,
            verbose,
            seed: None,
        })
    }

    /// Fix the shuffle seed for reproducible runs.
    ///
    /// Without this, every `run` draws a fresh seed from the process RNG.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Run all rounds against `user` and collect one report.
    ///
    /// Each round draws a fresh split, builds a transient profile from the
    /// train side, asks the recommender for as many items as the test side
    /// holds, and scores the result with every configured metric. The
    /// universe size is the item index document count.
    pub fn run(&self, user: &UserProfile) -> Result<CrossValidationReport, RecommenderError> {
        let items: Vec<ItemId> = user.pkg_profile().iter().cloned().collect();
        let seed = self.seed.unwrap_or_else(|| rand::rng().random());
        debug!("[apprec:evaluation] shuffling splits with seed {seed}");
        let mut rng = StdRng::seed_from_u64(seed);

        let mut columns: Vec<MetricColumn> = self
            .metrics
            .iter()
            .map(|metric| MetricColumn::new(metric.name()))
            .collect();

        for round in 0..self.rounds {
            let split = EvaluationSplit::draw(&items, self.ratio, &mut rng)?;
            let trial = UserProfile::with_user_id(
                ItemScore::uniform(split.train.iter().cloned(), INSTALLED_ITEM_WEIGHT),
                user.user_id(),
            );
            let recommendation =
                self.recommender
                    .get_recommendation(&trial, split.test.len(), None)?;
            let counts = ConfusionCounts::from_result(
                &recommendation,
                &split.test,
                self.recommender.universe_size(),
            );
            for (metric, column) in self.metrics.iter().zip(columns.iter_mut()) {
                column.push(metric.compute(&counts));
            }
            let line = format!(
                "[apprec:evaluation] round {round}: tp {} fp {} fn {} tn {}",
                counts.true_positive,
                counts.false_positive,
                counts.false_negative,
                counts.true_negative
            );
            if self.verbose {
                info!("{line}");
            } else {
                debug!("{line}");
            }
        }

        Ok(CrossValidationReport {
            rounds: self.rounds,
            columns,
        })
    }
}

/// Per-trial values of one metric across a cross-validation run.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MetricColumn {
    name: String,
    values: Vec<f64>,
}

impl MetricColumn {
    fn new(name: String) -> Self {
        Self {
            name,
            values: Vec::new(),
        }
    }

    fn push(&mut self, value: f64) {
        self.values.push(value);
    }

    /// Metric name used as the column header.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// One value per round, in round order.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Arithmetic mean over all rounds, 0 when no round ran.
    pub fn mean(&self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        self.values.iter().sum::<f64>() / self.values.len() as f64
    }

    /// Sample standard deviation, 0 below two rounds.
    pub fn std_dev(&self) -> f64 {
        if self.values.len() < 2 {
            return 0.0;
        }
        let mean = self.mean();
        let variance = self
            .values
            .iter()
            .map(|value| (value - mean).powi(2))
            .sum::<f64>()
            / (self.values.len() - 1) as f64;
        variance.sqrt()
    }
}

/// The full per-round metric matrix of one cross-validation run.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CrossValidationReport {
    rounds: usize,
    columns: Vec<MetricColumn>,
}

impl CrossValidationReport {
    /// Number of rounds the harness ran.
    pub fn rounds(&self) -> usize {
        self.rounds
    }

    /// Metric columns in the configured metric order.
    pub fn columns(&self) -> &[MetricColumn] {
        &self.columns
    }

    /// Look up one column by its header name.
    pub fn column(&self, name: &str) -> Option<&MetricColumn> {
        self.columns.iter().find(|column| column.name == name)
    }
}

impl fmt::Display for CrossValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:>8}", "round")?;
        for column in &self.columns {
            write!(f, "{:>14}", column.name)?;
        }
        writeln!(f)?;
        for round in 0..self.rounds {
            write!(f, "{round:>8}")?;
            for column in &self.columns {
                let value = column.values.get(round).copied().unwrap_or(0.0);
                write!(f, "{value:>14.4}")?;
            }
            writeln!(f)?;
        }
        write!(f, "{:>8}", "mean")?;
        for column in &self.columns {
            write!(f, "{:>14.4}", column.mean())?;
        }
        writeln!(f)
    }
}
