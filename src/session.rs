//! Per-request session state: current scores, catalog, and error status

use crate::catalog::loader::{CatalogLoader, LoadReport};
use crate::catalog::occupation::{Catalog, Category, Occupation, UserScores};
use crate::catalog::source::CatalogSource;
use crate::error::Result;
use crate::scoring::ranker::{Recommendations, Recommender};
use crate::scoring::trend::{TrendReport, NO_DATA_MESSAGE};
use log::{error, info, warn};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SessionStatus {
    Idle,
    Ready,
    LoadFailed { message: String, can_retry: bool },
    ComputationFailed { message: String },
}

/// What the caller renders after a recompute
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionView {
    pub status: SessionStatus,
    pub recommendations: Recommendations,
}

impl SessionView {
    pub fn can_retry(&self) -> bool {
        matches!(self.status, SessionStatus::LoadFailed { can_retry: true, .. })
    }

    pub fn is_error(&self) -> bool {
        matches!(
            self.status,
            SessionStatus::LoadFailed { .. } | SessionStatus::ComputationFailed { .. }
        )
    }
}

pub struct Session {
    scores: UserScores,
    catalog: Option<Catalog>,
    load_report: Option<LoadReport>,
    status: SessionStatus,
    recommender: Recommender,
}

impl Session {
    pub fn new(recommender: Recommender) -> Self {
        Self {
            scores: UserScores::default(),
            catalog: None,
            load_report: None,
            status: SessionStatus::Idle,
            recommender,
        }
    }

    pub fn scores(&self) -> &UserScores {
        &self.scores
    }

    pub fn set_scores(&mut self, scores: UserScores) {
        self.scores = scores;
    }

    /// Raw text from an input field. Out-of-range values are clamped, unparsable ones ignored.
    pub fn set_score_input(&mut self, category: Category, input: &str) {
        match input.trim().parse::<f64>() {
            Ok(value) => self.scores.set(category, value),
            Err(_) => warn!("Ignoring non-numeric {} score: {:?}", category, input),
        }
    }

    pub fn catalog(&self) -> Option<&Catalog> {
        self.catalog.as_ref()
    }

    pub fn load_report(&self) -> Option<&LoadReport> {
        self.load_report.as_ref()
    }

    pub fn recommender(&self) -> &Recommender {
        &self.recommender
    }

    pub fn status(&self) -> &SessionStatus {
        &self.status
    }

    pub fn set_catalog(&mut self, catalog: Catalog) {
        self.catalog = Some(catalog);
        self.status = SessionStatus::Ready;
    }

    /// Load the catalog, retrying load failures up to `retries` extra times.
    /// Failure is recorded in the session status rather than returned.
    pub async fn load_catalog(&mut self, loader: &mut CatalogLoader, source: &CatalogSource, retries: u32) {
        let mut attempt = 0;
        loop {
            match loader.load(source).await {
                Ok(loaded) => {
                    self.load_report = Some(loaded.report);
                    self.set_catalog(loaded.catalog);
                    return;
                }
                Err(e) if e.is_retryable() && attempt < retries => {
                    attempt += 1;
                    warn!("Catalog load failed ({}), retry {}/{}", e, attempt, retries);
                }
                Err(e) => {
                    error!("Catalog load failed: {}", e);
                    self.catalog = None;
                    self.load_report = None;
                    self.status = SessionStatus::LoadFailed {
                        message: e.to_string(),
                        can_retry: e.is_retryable(),
                    };
                    return;
                }
            }
        }
    }

    /// Rank the current catalog against the current scores. Never fails:
    /// every problem becomes a status with an empty result set.
    pub fn recompute(&mut self) -> SessionView {
        if let SessionStatus::LoadFailed { .. } = self.status {
            return self.view(Recommendations::empty(TrendReport {
                narrative: NO_DATA_MESSAGE.to_string(),
                stats: None,
            }));
        }

        let occupations = self.catalog.as_ref().map(|c| c.occupations()).unwrap_or_default();
        match self.run(occupations) {
            Ok(recommendations) => {
                if self.catalog.is_some() {
                    self.status = SessionStatus::Ready;
                }
                self.view(recommendations)
            }
            Err(e) => {
                error!("Scoring failed: {}", e);
                self.status = SessionStatus::ComputationFailed {
                    message: format!("A computational error occurred: {}", e),
                };
                self.view(Recommendations::empty(TrendReport {
                    narrative: NO_DATA_MESSAGE.to_string(),
                    stats: None,
                }))
            }
        }
    }

    fn run(&self, occupations: &[Occupation]) -> Result<Recommendations> {
        info!("Recomputing recommendations for {:?}", self.scores.values());
        self.recommender.recommend(&self.scores, occupations)
    }

    fn view(&self, recommendations: Recommendations) -> SessionView {
        SessionView {
            status: self.status.clone(),
            recommendations,
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(Recommender::default())
    }
}
