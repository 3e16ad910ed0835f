//! Similarity metrics between a user's interest profile and an occupation

use crate::catalog::occupation::{OccupationScores, UserScores, CATEGORY_COUNT, MAX_SCORE};
use crate::error::{MatcherError, Result};
use crate::scoring::normalizer::{normalize, normalize_user};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Share of the hybrid score taken by the weighted cosine term
pub const HYBRID_COSINE_WEIGHT: f64 = 0.7;
/// Share of the hybrid score taken by the closeness term
pub const HYBRID_DIFFERENCE_WEIGHT: f64 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SimilarityMetric {
    /// Cosine over raw scores
    Cosine,
    /// Cosine over normalized, weighted scores
    #[serde(alias = "weighted_cosine")]
    Weighted,
    /// Weighted cosine blended with mean absolute difference of raw scores
    #[default]
    Hybrid,
}

impl SimilarityMetric {
    pub fn parse(value: &str) -> Result<Self> {
        match value.trim().to_lowercase().as_str() {
            "cosine" => Ok(SimilarityMetric::Cosine),
            "weighted" | "weighted-cosine" | "weighted_cosine" => Ok(SimilarityMetric::Weighted),
            "hybrid" => Ok(SimilarityMetric::Hybrid),
            other => Err(MatcherError::InvalidInput(format!(
                "Invalid metric: {}. Supported: cosine, weighted, hybrid",
                other
            ))),
        }
    }
}

impl fmt::Display for SimilarityMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SimilarityMetric::Cosine => "cosine",
            SimilarityMetric::Weighted => "weighted",
            SimilarityMetric::Hybrid => "hybrid",
        };
        f.write_str(name)
    }
}

/// Per-category emphasis applied uniformly across one run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightProfile(pub [f64; CATEGORY_COUNT]);

impl WeightProfile {
    pub const UNIFORM: WeightProfile = WeightProfile([1.0; CATEGORY_COUNT]);
    pub const SKEWED: WeightProfile = WeightProfile([1.2, 1.1, 1.0, 1.0, 0.9, 0.8]);

    /// Accepts a preset name (`uniform`, `skewed`) or six comma-separated numbers
    pub fn parse(value: &str) -> Result<Self> {
        let value = value.trim();
        let profile = match value.to_lowercase().as_str() {
            "uniform" => Self::UNIFORM,
            "skewed" => Self::SKEWED,
            _ => {
                let parsed: Vec<f64> = value
                    .split(',')
                    .map(|w| w.trim().parse::<f64>())
                    .collect::<std::result::Result<_, _>>()
                    .map_err(|e| MatcherError::InvalidInput(format!("Invalid weight in '{}': {}", value, e)))?;
                let weights: [f64; CATEGORY_COUNT] = parsed.try_into().map_err(|v: Vec<f64>| {
                    MatcherError::InvalidInput(format!("Expected {} weights, got {}", CATEGORY_COUNT, v.len()))
                })?;
                WeightProfile(weights)
            }
        };
        profile.validate()?;
        Ok(profile)
    }

    pub fn validate(&self) -> Result<()> {
        match self.0.iter().find(|w| !w.is_finite() || **w < 0.0) {
            Some(bad) => Err(MatcherError::Configuration(format!(
                "Weights must be finite and non-negative, got {}",
                bad
            ))),
            None => Ok(()),
        }
    }

    pub fn weight(&self, index: usize) -> f64 {
        self.0[index]
    }
}

impl Default for WeightProfile {
    fn default() -> Self {
        Self::UNIFORM
    }
}

/// Computes one match strength per (user, occupation) pair. Pure; holds only configuration.
#[derive(Debug, Clone)]
pub struct SimilarityEngine {
    metric: SimilarityMetric,
    weights: WeightProfile,
}

impl SimilarityEngine {
    pub fn new(metric: SimilarityMetric, weights: WeightProfile) -> Self {
        Self { metric, weights }
    }

    pub fn metric(&self) -> SimilarityMetric {
        self.metric
    }

    pub fn weights(&self) -> &WeightProfile {
        &self.weights
    }

    /// Only categories the occupation actually measures take part in the comparison.
    /// An occupation with no measured category scores 0.
    pub fn similarity(&self, user: &UserScores, occupation: &OccupationScores) -> f64 {
        let valid: Vec<usize> = occupation
            .values()
            .iter()
            .enumerate()
            .filter_map(|(i, v)| v.map(|_| i))
            .collect();

        if valid.is_empty() {
            return 0.0;
        }

        let raw_user = user.values();
        let raw_occupation: Vec<f64> = occupation.values().iter().map(|v| v.unwrap_or(0.0)).collect();

        match self.metric {
            SimilarityMetric::Cosine => cosine(raw_user, &raw_occupation, &valid),
            SimilarityMetric::Weighted => {
                self.weighted_cosine(&normalize_user(user), &normalize(occupation.values()), &valid)
            }
            SimilarityMetric::Hybrid => {
                let directional = self.weighted_cosine(&normalize_user(user), &normalize(occupation.values()), &valid);
                let closeness = 1.0 - mean_absolute_difference(raw_user, &raw_occupation, &valid) / MAX_SCORE;
                (HYBRID_COSINE_WEIGHT * directional + HYBRID_DIFFERENCE_WEIGHT * closeness).clamp(-1.0, 1.0)
            }
        }
    }

    fn weighted_cosine(&self, user: &[f64], occupation: &[f64], valid: &[usize]) -> f64 {
        let mut dot = 0.0;
        let mut user_sq = 0.0;
        let mut occupation_sq = 0.0;

        for &i in valid {
            let w = self.weights.weight(i);
            let u = user[i] * w;
            let o = occupation[i] * w;
            dot += u * o;
            user_sq += u * u;
            occupation_sq += o * o;
        }

        let user_mag = user_sq.sqrt();
        let occupation_mag = occupation_sq.sqrt();

        // Two flat profiles agree perfectly; one flat profile agrees with nothing.
        match (user_mag == 0.0, occupation_mag == 0.0) {
            (true, true) => 1.0,
            (true, false) | (false, true) => 0.0,
            (false, false) => (dot / (user_mag * occupation_mag)).clamp(-1.0, 1.0),
        }
    }
}

impl Default for SimilarityEngine {
    fn default() -> Self {
        Self::new(SimilarityMetric::default(), WeightProfile::default())
    }
}

fn cosine(a: &[f64], b: &[f64], valid: &[usize]) -> f64 {
    let dot: f64 = valid.iter().map(|&i| a[i] * b[i]).sum();
    let norm_a: f64 = valid.iter().map(|&i| a[i] * a[i]).sum::<f64>().sqrt();
    let norm_b: f64 = valid.iter().map(|&i| b[i] * b[i]).sum::<f64>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        (dot / (norm_a * norm_b)).clamp(-1.0, 1.0)
    }
}

fn mean_absolute_difference(a: &[f64], b: &[f64], valid: &[usize]) -> f64 {
    let total: f64 = valid.iter().map(|&i| (a[i] - b[i]).abs()).sum();
    total / valid.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn occupation(values: [f64; 6]) -> OccupationScores {
        OccupationScores::new(values.map(Some))
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_identical_flat_vectors_score_one() {
        let user = UserScores::new([50.0; 6]);
        let occ = occupation([50.0; 6]);

        for metric in [SimilarityMetric::Cosine, SimilarityMetric::Weighted, SimilarityMetric::Hybrid] {
            let engine = SimilarityEngine::new(metric, WeightProfile::UNIFORM);
            assert!(approx(engine.similarity(&user, &occ), 1.0), "metric {}", metric);
        }
    }

    #[test]
    fn test_identical_peaked_vectors_score_one() {
        let user = UserScores::new([90.0, 10.0, 10.0, 10.0, 10.0, 10.0]);
        let occ = occupation([90.0, 10.0, 10.0, 10.0, 10.0, 10.0]);
        let engine = SimilarityEngine::default();
        assert!(approx(engine.similarity(&user, &occ), 1.0));
    }

    #[test]
    fn test_all_absent_scores_zero() {
        let user = UserScores::new([70.0, 20.0, 30.0, 40.0, 50.0, 60.0]);
        let occ = OccupationScores::new([None; 6]);

        for metric in [SimilarityMetric::Cosine, SimilarityMetric::Weighted, SimilarityMetric::Hybrid] {
            let engine = SimilarityEngine::new(metric, WeightProfile::SKEWED);
            assert_eq!(engine.similarity(&user, &occ), 0.0);
        }
    }

    #[test]
    fn test_plain_cosine_uses_raw_scores_and_masks_absent() {
        let engine = SimilarityEngine::new(SimilarityMetric::Cosine, WeightProfile::UNIFORM);
        let user = UserScores::new([100.0, 0.0, 50.0, 50.0, 50.0, 50.0]);
        let occ = OccupationScores::new([Some(100.0), Some(0.0), None, None, None, None]);
        assert!(approx(engine.similarity(&user, &occ), 1.0));

        let zero_user = UserScores::new([0.0; 6]);
        assert_eq!(engine.similarity(&zero_user, &occupation([10.0; 6])), 0.0);
    }

    #[test]
    fn test_weighted_cosine_flat_cases() {
        let engine = SimilarityEngine::new(SimilarityMetric::Weighted, WeightProfile::UNIFORM);
        let flat_user = UserScores::new([40.0; 6]);

        // Both normalize to all ones.
        assert!(approx(engine.similarity(&flat_user, &occupation([80.0; 6])), 1.0));

        // User normalizes to zero on the only valid index; occupation to one.
        let user = UserScores::new([0.0, 100.0, 100.0, 100.0, 100.0, 100.0]);
        let occ = OccupationScores::new([Some(30.0), None, None, None, None, None]);
        assert_eq!(engine.similarity(&user, &occ), 0.0);

        // Both normalize to zero on the valid indices.
        let occ = OccupationScores::new([Some(0.0), Some(100.0), None, None, None, None]);
        let user = UserScores::new([0.0, 0.0, 100.0, 100.0, 100.0, 100.0]);
        let engine_masked = SimilarityEngine::new(SimilarityMetric::Weighted, WeightProfile([1.0, 0.0, 1.0, 1.0, 1.0, 1.0]));
        assert_eq!(engine_masked.similarity(&user, &occ), 1.0);
    }

    #[test]
    fn test_hybrid_blends_direction_and_distance() {
        let engine = SimilarityEngine::new(SimilarityMetric::Hybrid, WeightProfile::UNIFORM);
        let user = UserScores::new([100.0; 6]);
        let occ = occupation([50.0; 6]);
        // Direction agrees fully, raw scores differ by 50 everywhere.
        assert!(approx(engine.similarity(&user, &occ), 0.7 + 0.3 * 0.5));
    }

    #[test]
    fn test_skewed_weights_with_absent_categories() {
        // User normalizes to [1, 0, 0.5, 0, 1, 0]; occupation to [1, 0, -, 0.5, 1, -].
        let user = UserScores::new([100.0, 0.0, 50.0, 0.0, 100.0, 0.0]);
        let occ = OccupationScores::new([Some(100.0), Some(0.0), None, Some(50.0), Some(100.0), None]);
        let w = WeightProfile::SKEWED;

        // Valid indices are 0, 1, 3, 4 and each side carries the squared weight.
        let dot = (1.0 * w.weight(0)).powi(2) + (1.0 * w.weight(4)).powi(2);
        let user_mag = ((1.0 * w.weight(0)).powi(2) + (1.0 * w.weight(4)).powi(2)).sqrt();
        let occ_mag = ((1.0 * w.weight(0)).powi(2) + (0.5 * w.weight(3)).powi(2) + (1.0 * w.weight(4)).powi(2)).sqrt();
        let expected_weighted = dot / (user_mag * occ_mag);
        assert!(approx(expected_weighted, 1.5 / 2.5_f64.sqrt()));

        let weighted = SimilarityEngine::new(SimilarityMetric::Weighted, w).similarity(&user, &occ);
        assert!(approx(weighted, expected_weighted), "weighted {}", weighted);

        // Raw differences on the valid indices are 0, 0, 50, 0; absent ones do not count.
        let closeness = 1.0 - (50.0 / 4.0) / 100.0;
        let expected_hybrid = 0.7 * expected_weighted + 0.3 * closeness;
        let hybrid = SimilarityEngine::new(SimilarityMetric::Hybrid, w).similarity(&user, &occ);
        assert!(approx(hybrid, expected_hybrid), "hybrid {}", hybrid);
    }

    #[test]
    fn test_results_stay_in_range() {
        let profiles = [
            [0.0, 100.0, 0.0, 100.0, 0.0, 100.0],
            [100.0, 0.0, 100.0, 0.0, 100.0, 0.0],
            [12.0, 87.0, 45.0, 3.0, 66.0, 91.0],
        ];
        for metric in [SimilarityMetric::Cosine, SimilarityMetric::Weighted, SimilarityMetric::Hybrid] {
            let engine = SimilarityEngine::new(metric, WeightProfile::SKEWED);
            for u in &profiles {
                for o in &profiles {
                    let s = engine.similarity(&UserScores::new(*u), &occupation(*o));
                    assert!((-1.0..=1.0).contains(&s), "{} out of range for {}", s, metric);
                }
            }
        }
    }

    #[test]
    fn test_weight_profile_parsing() {
        assert_eq!(WeightProfile::parse("skewed").unwrap(), WeightProfile::SKEWED);
        assert_eq!(
            WeightProfile::parse("1, 2, 3, 4, 5, 6").unwrap(),
            WeightProfile([1.0, 2.0, 3.0, 4.0, 5.0, 6.0])
        );
        assert!(WeightProfile::parse("1,2,3").is_err());
        assert!(WeightProfile::parse("1,2,3,4,5,-6").is_err());
        assert!(WeightProfile::parse("1,2,x,4,5,6").is_err());
    }

    #[test]
    fn test_metric_parsing() {
        assert_eq!(SimilarityMetric::parse("Hybrid").unwrap(), SimilarityMetric::Hybrid);
        assert_eq!(SimilarityMetric::parse("weighted-cosine").unwrap(), SimilarityMetric::Weighted);
        assert!(SimilarityMetric::parse("euclidean").is_err());
    }
}
