//! Report structures shared by every output format

use crate::catalog::occupation::{Category, UserScores};
use crate::scoring::ranker::RankedResult;
use crate::scoring::similarity::{SimilarityMetric, WeightProfile};
use crate::scoring::trend::TrendReport;
use crate::session::{SessionStatus, SessionView};
use serde::{Deserialize, Serialize};
use std::time::SystemTime;

/// Everything a formatter needs to render one recommendation run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationReport {
    pub metadata: ReportMetadata,

    /// The user's interest profile as entered (after clamping)
    pub user_scores: Vec<CategoryScore>,

    /// Rows to display, already limited to top-N unless `showing_all`
    pub results: Vec<ReportRow>,

    pub total_ranked: usize,
    pub total_recommended: usize,
    pub showing_all: bool,
    pub threshold: f64,

    pub trend: TrendReport,
    pub status: SessionStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub generated_at: SystemTime,
    pub matcher_version: String,
    pub metric: SimilarityMetric,
    pub weights: WeightProfile,
    pub catalog_source: String,
    pub catalog_size: usize,
    pub processing_time_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryScore {
    pub category: Category,
    pub score: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportRow {
    pub rank: usize,
    pub occupation_name: String,
    pub similarity: f64,
    pub description: String,
}

impl ReportRow {
    fn from_ranked(rank: usize, result: &RankedResult) -> Self {
        Self {
            rank,
            occupation_name: result.occupation_name.clone(),
            similarity: result.similarity,
            description: result.description.clone(),
        }
    }
}

impl RecommendationReport {
    pub fn from_view(
        view: &SessionView,
        scores: &UserScores,
        metadata: ReportMetadata,
        top_n: usize,
        show_all: bool,
    ) -> Self {
        let recs = &view.recommendations;
        let shown = if show_all { recs.filtered.as_slice() } else { recs.top(top_n) };

        Self {
            metadata,
            user_scores: Category::ALL
                .iter()
                .map(|&category| CategoryScore {
                    category,
                    score: scores.get(category),
                })
                .collect(),
            results: shown
                .iter()
                .enumerate()
                .map(|(i, r)| ReportRow::from_ranked(i + 1, r))
                .collect(),
            total_ranked: recs.all.len(),
            total_recommended: recs.filtered.len(),
            showing_all: show_all,
            threshold: recs.threshold,
            trend: recs.trend.clone(),
            status: view.status.clone(),
        }
    }

    /// Message for failed runs; `None` when the run succeeded
    pub fn error_message(&self) -> Option<String> {
        match &self.status {
            SessionStatus::LoadFailed { message, can_retry } => Some(if *can_retry {
                format!("Could not load the occupation catalog: {} (retry is possible)", message)
            } else {
                format!("Could not load the occupation catalog: {}", message)
            }),
            SessionStatus::ComputationFailed { message } => Some(message.clone()),
            SessionStatus::Idle | SessionStatus::Ready => None,
        }
    }

    pub fn is_truncated(&self) -> bool {
        !self.showing_all && self.results.len() < self.total_recommended
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::ranker::Recommendations;

    fn metadata() -> ReportMetadata {
        ReportMetadata {
            generated_at: SystemTime::now(),
            matcher_version: "0.1.0".to_string(),
            metric: SimilarityMetric::Hybrid,
            weights: WeightProfile::UNIFORM,
            catalog_source: "test.json".to_string(),
            catalog_size: 12,
            processing_time_ms: 1,
        }
    }

    fn view(count: usize) -> SessionView {
        let results: Vec<RankedResult> = (0..count)
            .map(|i| RankedResult {
                occupation_name: format!("Job {}", i),
                similarity: 1.0 - i as f64 * 0.01,
                description: String::new(),
            })
            .collect();
        SessionView {
            status: SessionStatus::Ready,
            recommendations: Recommendations {
                all: results.clone(),
                filtered: results,
                threshold: 0.5,
                trend: TrendReport {
                    narrative: "ok".to_string(),
                    stats: None,
                },
            },
        }
    }

    #[test]
    fn test_top_n_toggle() {
        let scores = UserScores::new([50.0; 6]);
        let top = RecommendationReport::from_view(&view(12), &scores, metadata(), 10, false);
        assert_eq!(top.results.len(), 10);
        assert!(top.is_truncated());
        assert_eq!(top.results[0].rank, 1);

        let all = RecommendationReport::from_view(&view(12), &scores, metadata(), 10, true);
        assert_eq!(all.results.len(), 12);
        assert!(!all.is_truncated());
        assert_eq!(all.user_scores.len(), 6);
    }

    #[test]
    fn test_error_message_mentions_retry() {
        let mut failed = view(0);
        failed.status = SessionStatus::LoadFailed {
            message: "HTTP 404".to_string(),
            can_retry: true,
        };
        let report = RecommendationReport::from_view(&failed, &UserScores::default(), metadata(), 10, false);
        assert!(report.error_message().unwrap().contains("retry"));
    }
}
