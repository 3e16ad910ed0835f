//! Rule-based narrative describing how well the recommendations fit
//!
//! The narrative has a header sentence and two paragraphs. Each paragraph is
//! picked from an ordered rule table: the first rule whose predicate holds wins.
//! Thresholds are fixed business rules.

use crate::catalog::occupation::{Category, UserScores};
use log::debug;
use serde::{Deserialize, Serialize};

pub const NO_DATA_MESSAGE: &str =
    "No occupation data is available, so no match trend can be described yet.";

pub const NO_VALID_SCORES_MESSAGE: &str =
    "Similarity scores were produced but none of them are valid numbers, so no match trend can be described.";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendStats {
    pub sample_size: usize,
    pub similarity_mean: f64,
    pub similarity_std_dev: f64,
    pub user_mean: f64,
    pub user_min: f64,
    pub user_max: f64,
    pub user_range: f64,
    pub dominant_category: Category,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendReport {
    pub narrative: String,
    pub stats: Option<TrendStats>,
}

impl TrendReport {
    fn message(narrative: &str) -> Self {
        Self {
            narrative: narrative.to_string(),
            stats: None,
        }
    }
}

pub struct TrendRule {
    pub name: &'static str,
    pub applies: fn(&TrendStats) -> bool,
    pub render: fn(&TrendStats) -> String,
}

pub static INTEREST_RULES: &[TrendRule] = &[
    TrendRule {
        name: "focused-narrow",
        applies: |s| s.user_range > 50.0 && s.user_mean < 30.0,
        render: |s| {
            format!(
                "Your interests are clearly focused on the {} area. Your other scores are low, so concentrating your search on {} occupations is likely to pay off most.",
                s.dominant_category, s.dominant_category
            )
        },
    },
    TrendRule {
        name: "focused-broad",
        applies: |s| s.user_range > 50.0,
        render: |s| {
            format!(
                "Your interests are clearly focused on the {} area. You also show real interest elsewhere, so roles that combine {} work with neighbouring fields are worth a look.",
                s.dominant_category, s.dominant_category
            )
        },
    },
    TrendRule {
        name: "high",
        applies: |s| s.user_mean > 75.0,
        render: |_| {
            "You report strong interest across most areas, so a wide range of occupations could suit you. Use the ranking to narrow down what excites you most.".to_string()
        },
    },
    TrendRule {
        name: "above-average",
        applies: |s| s.user_mean > 50.0,
        render: |_| {
            "You report balanced, above-average interest across areas, which leaves room to explore several career directions.".to_string()
        },
    },
    TrendRule {
        name: "moderate",
        applies: |s| s.user_mean > 25.0,
        render: |_| {
            "Your interest scores are moderate overall. Short projects or job shadowing can help clarify which areas appeal to you.".to_string()
        },
    },
    TrendRule {
        name: "low",
        applies: |_| true,
        render: |_| {
            "Your interest scores are low across the board. Revisiting the inventory after exploring a few fields may give a clearer picture.".to_string()
        },
    },
];

pub static MATCH_RULES: &[TrendRule] = &[
    TrendRule {
        name: "strong-consistent",
        applies: |s| s.similarity_mean > 0.8 && s.similarity_std_dev < 0.1,
        render: |_| {
            "The recommended occupations match your profile strongly and consistently, so any of the top entries is a sound starting point.".to_string()
        },
    },
    TrendRule {
        name: "strong-varied",
        applies: |s| s.similarity_mean > 0.8,
        render: |_| {
            "The recommendations match strongly overall but vary in closeness, so compare the top few entries before deciding.".to_string()
        },
    },
    TrendRule {
        name: "good-consistent",
        applies: |s| s.similarity_mean > 0.6 && s.similarity_std_dev < 0.15,
        render: |_| {
            "The recommendations are a good and consistent fit. The leading occupations differ only slightly from one another.".to_string()
        },
    },
    TrendRule {
        name: "good-varied",
        applies: |s| s.similarity_mean > 0.6,
        render: |_| {
            "The recommendations are a good fit on average with a broad spread, so the highest-ranked entries deserve the most attention.".to_string()
        },
    },
    TrendRule {
        name: "moderate-consistent",
        applies: |s| s.similarity_mean > 0.4 && s.similarity_std_dev < 0.2,
        render: |_| {
            "The recommendations are a moderate, fairly uniform fit. No single occupation stands out, so weigh your other priorities as well.".to_string()
        },
    },
    TrendRule {
        name: "moderate-varied",
        applies: |s| s.similarity_mean > 0.4,
        render: |_| {
            "The recommendations are a moderate fit with wide variation. Focus on the few entries that score noticeably higher.".to_string()
        },
    },
    TrendRule {
        name: "weak",
        applies: |_| true,
        render: |_| {
            "The recommendations match your profile only weakly. Consider adjusting your scores or exploring occupations outside this catalog.".to_string()
        },
    },
];

/// First rule in `rules` whose predicate holds
pub fn select_rule<'a>(rules: &'a [TrendRule], stats: &TrendStats) -> Option<&'a TrendRule> {
    rules.iter().find(|rule| (rule.applies)(stats))
}

#[derive(Debug, Clone, Default)]
pub struct TrendSummarizer;

impl TrendSummarizer {
    pub fn new() -> Self {
        Self
    }

    pub fn summarize(&self, similarities: &[f64], user: &UserScores) -> TrendReport {
        if similarities.is_empty() {
            return TrendReport::message(NO_DATA_MESSAGE);
        }

        let Some(stats) = Self::compute_stats(similarities, user) else {
            return TrendReport::message(NO_VALID_SCORES_MESSAGE);
        };

        let header = format!(
            "Across the recommended occupations the average match strength is {:.2} (standard deviation {:.2}). Your average interest score is {:.2}.",
            stats.similarity_mean, stats.similarity_std_dev, stats.user_mean
        );

        let mut paragraphs = vec![header];
        for rules in [INTEREST_RULES, MATCH_RULES] {
            if let Some(rule) = select_rule(rules, &stats) {
                debug!("Trend rule selected: {}", rule.name);
                paragraphs.push((rule.render)(&stats));
            }
        }

        // Header and interest paragraph read as one block.
        let narrative = match paragraphs.as_slice() {
            [header, interest, rest @ ..] => {
                let mut blocks = vec![format!("{} {}", header, interest)];
                blocks.extend(rest.iter().cloned());
                blocks.join("\n\n")
            }
            _ => paragraphs.join("\n\n"),
        };

        TrendReport {
            narrative,
            stats: Some(stats),
        }
    }

    /// Statistics over the finite similarities; `None` when there are none
    pub fn compute_stats(similarities: &[f64], user: &UserScores) -> Option<TrendStats> {
        let valid: Vec<f64> = similarities.iter().copied().filter(|s| s.is_finite()).collect();
        if valid.is_empty() {
            return None;
        }

        let n = valid.len() as f64;
        let similarity_mean = valid.iter().sum::<f64>() / n;
        let variance = valid.iter().map(|s| (s - similarity_mean).powi(2)).sum::<f64>() / n;

        let scores = user.values();
        let user_mean = scores.iter().sum::<f64>() / scores.len() as f64;
        let user_min = scores.iter().copied().fold(f64::INFINITY, f64::min);
        let user_max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        Some(TrendStats {
            sample_size: valid.len(),
            similarity_mean,
            similarity_std_dev: variance.sqrt(),
            user_mean,
            user_min,
            user_max,
            user_range: user_max - user_min,
            dominant_category: user.dominant_category(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(similarity_mean: f64, similarity_std_dev: f64, user_mean: f64, user_range: f64) -> TrendStats {
        TrendStats {
            sample_size: 3,
            similarity_mean,
            similarity_std_dev,
            user_mean,
            user_min: 0.0,
            user_max: user_range,
            user_range,
            dominant_category: Category::Artistic,
        }
    }

    fn interest_rule(s: &TrendStats) -> &'static str {
        select_rule(INTEREST_RULES, s).unwrap().name
    }

    fn match_rule(s: &TrendStats) -> &'static str {
        select_rule(MATCH_RULES, s).unwrap().name
    }

    #[test]
    fn test_stats_use_population_std_dev() {
        let user = UserScores::new([60.0; 6]);
        let s = TrendSummarizer::compute_stats(&[0.9, 0.85, 0.88], &user).unwrap();
        assert!((s.similarity_mean - 0.876_666).abs() < 1e-3);
        assert!((s.similarity_std_dev - 0.0205).abs() < 1e-3);
        assert_eq!(s.user_range, 0.0);
    }

    #[test]
    fn test_high_similarity_branch() {
        let user = UserScores::new([60.0; 6]);
        let report = TrendSummarizer::new().summarize(&[0.9, 0.85, 0.88], &user);
        assert!(report.narrative.contains("0.88"));
        assert!(report.narrative.contains("0.02"));
        assert!(report.narrative.contains("strongly and consistently"));
        assert_eq!(match_rule(report.stats.as_ref().unwrap()), "strong-consistent");
    }

    #[test]
    fn test_no_data_messages() {
        let user = UserScores::default();
        let summarizer = TrendSummarizer::new();

        let empty = summarizer.summarize(&[], &user);
        assert_eq!(empty.narrative, NO_DATA_MESSAGE);
        assert!(empty.stats.is_none());

        let invalid = summarizer.summarize(&[f64::NAN, f64::INFINITY], &user);
        assert_eq!(invalid.narrative, NO_VALID_SCORES_MESSAGE);
    }

    #[test]
    fn test_non_finite_values_are_ignored() {
        let user = UserScores::new([50.0; 6]);
        let s = TrendSummarizer::compute_stats(&[0.5, f64::NAN, 0.7], &user).unwrap();
        assert_eq!(s.sample_size, 2);
        assert!((s.similarity_mean - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_interest_band_boundaries() {
        assert_eq!(interest_rule(&stats(0.5, 0.1, 20.0, 80.0)), "focused-narrow");
        assert_eq!(interest_rule(&stats(0.5, 0.1, 30.0, 80.0)), "focused-broad");
        assert_eq!(interest_rule(&stats(0.5, 0.1, 80.0, 50.0)), "high");
        assert_eq!(interest_rule(&stats(0.5, 0.1, 75.0, 10.0)), "above-average");
        assert_eq!(interest_rule(&stats(0.5, 0.1, 50.0, 10.0)), "moderate");
        assert_eq!(interest_rule(&stats(0.5, 0.1, 25.0, 10.0)), "low");
    }

    #[test]
    fn test_match_band_boundaries() {
        assert_eq!(match_rule(&stats(0.85, 0.05, 50.0, 0.0)), "strong-consistent");
        assert_eq!(match_rule(&stats(0.85, 0.1, 50.0, 0.0)), "strong-varied");
        assert_eq!(match_rule(&stats(0.8, 0.05, 50.0, 0.0)), "good-consistent");
        assert_eq!(match_rule(&stats(0.7, 0.15, 50.0, 0.0)), "good-varied");
        assert_eq!(match_rule(&stats(0.6, 0.19, 50.0, 0.0)), "moderate-consistent");
        assert_eq!(match_rule(&stats(0.5, 0.2, 50.0, 0.0)), "moderate-varied");
        assert_eq!(match_rule(&stats(0.4, 0.0, 50.0, 0.0)), "weak");
    }

    #[test]
    fn test_focused_narrative_names_dominant_category() {
        let user = UserScores::new([90.0, 10.0, 10.0, 10.0, 10.0, 10.0]);
        let report = TrendSummarizer::new().summarize(&[1.0], &user);
        assert!(report.narrative.contains("focused on the realistic area"));
        // Mean interest is 23.33, below 30.
        assert!(report.narrative.contains("other scores are low"));
        assert_eq!(report.narrative.split("\n\n").count(), 2);
    }
}
