//! Recommendation ranking: score every occupation, sort, trim, summarize

use crate::catalog::occupation::{Occupation, UserScores};
use crate::error::{MatcherError, Result};
use crate::scoring::similarity::SimilarityEngine;
use crate::scoring::trend::{TrendReport, TrendSummarizer};
use log::{debug, info};
use serde::{Deserialize, Serialize};

/// Fraction of the sorted list above the cut-off index
pub const DEFAULT_CUTOFF_FRACTION: f64 = 0.2;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedResult {
    pub occupation_name: String,
    pub similarity: f64,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendations {
    /// Every occupation, sorted by descending similarity
    pub all: Vec<RankedResult>,
    /// Entries at or above `threshold`
    pub filtered: Vec<RankedResult>,
    pub threshold: f64,
    pub trend: TrendReport,
}

impl Recommendations {
    pub fn empty(trend: TrendReport) -> Self {
        Self {
            all: Vec::new(),
            filtered: Vec::new(),
            threshold: 0.0,
            trend,
        }
    }

    pub fn top(&self, n: usize) -> &[RankedResult] {
        &self.filtered[..n.min(self.filtered.len())]
    }
}

pub struct Recommender {
    engine: SimilarityEngine,
    summarizer: TrendSummarizer,
    cutoff_fraction: f64,
}

impl Recommender {
    pub fn new(engine: SimilarityEngine) -> Self {
        Self {
            engine,
            summarizer: TrendSummarizer::new(),
            cutoff_fraction: DEFAULT_CUTOFF_FRACTION,
        }
    }

    pub fn with_cutoff_fraction(mut self, fraction: f64) -> Self {
        self.cutoff_fraction = fraction;
        self
    }

    pub fn engine(&self) -> &SimilarityEngine {
        &self.engine
    }

    /// Scores the whole catalog before any filtering. A non-finite similarity
    /// means the occupation data is malformed and fails the whole run.
    pub fn recommend(&self, user: &UserScores, occupations: &[Occupation]) -> Result<Recommendations> {
        let mut all = Vec::with_capacity(occupations.len());
        for occupation in occupations {
            let similarity = self.engine.similarity(user, &occupation.scores);
            if !similarity.is_finite() {
                return Err(MatcherError::Computation(format!(
                    "Similarity for '{}' is not a number",
                    occupation.name
                )));
            }
            debug!("{}: {:.4}", occupation.name, similarity);
            all.push(RankedResult {
                occupation_name: occupation.name.clone(),
                similarity,
                description: occupation.description.clone(),
            });
        }

        // Stable: equal scores keep catalog order.
        all.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));

        let threshold = self.threshold(&all);
        let filtered: Vec<RankedResult> = all
            .iter()
            .filter(|r| r.similarity >= threshold)
            .cloned()
            .collect();

        info!(
            "Ranked {} occupations with {} metric, kept {} at threshold {:.4}",
            all.len(),
            self.engine.metric(),
            filtered.len(),
            threshold
        );

        let similarities: Vec<f64> = filtered.iter().map(|r| r.similarity).collect();
        let trend = self.summarizer.summarize(&similarities, user);

        Ok(Recommendations {
            all,
            filtered,
            threshold,
            trend,
        })
    }

    /// Similarity at index `floor(cutoff_fraction * N)` of the descending list
    pub fn threshold(&self, sorted: &[RankedResult]) -> f64 {
        if sorted.is_empty() {
            return 0.0;
        }
        let index = ((self.cutoff_fraction * sorted.len() as f64).floor() as usize).min(sorted.len() - 1);
        sorted[index].similarity
    }
}

impl Default for Recommender {
    fn default() -> Self {
        Self::new(SimilarityEngine::default())
    }
}
