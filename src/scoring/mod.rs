//! Scoring engine: normalization, similarity, ranking and trend narrative

pub mod normalizer;
pub mod similarity;
pub mod trend;
pub mod ranker;

pub use ranker::{RankedResult, Recommendations, Recommender};
pub use similarity::{SimilarityEngine, SimilarityMetric, WeightProfile};
pub use trend::{TrendReport, TrendSummarizer};
