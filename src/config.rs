//! Configuration management for the interest matcher

use crate::error::{MatcherError, Result};
use crate::scoring::ranker::DEFAULT_CUTOFF_FRACTION;
use crate::scoring::similarity::{SimilarityEngine, SimilarityMetric, WeightProfile};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub catalog: CatalogConfig,
    pub scoring: ScoringConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Local .json path or http(s) URL
    pub source: String,
    pub timeout_secs: u64,
    pub enable_cache: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub metric: SimilarityMetric,
    pub weights: WeightProfile,
    pub cutoff_fraction: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub top_n: usize,
    pub show_all: bool,
    pub color_output: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    Console,
    Json,
    Markdown,
    Html,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog: CatalogConfig {
                source: "data/occupations.json".to_string(),
                timeout_secs: 10,
                enable_cache: true,
            },
            scoring: ScoringConfig {
                metric: SimilarityMetric::Hybrid,
                weights: WeightProfile::UNIFORM,
                cutoff_fraction: DEFAULT_CUTOFF_FRACTION,
            },
            output: OutputConfig {
                format: OutputFormat::Console,
                top_n: 10,
                show_all: false,
                color_output: true,
            },
        }
    }
}

impl Config {
    /// Load from `config_path`, writing defaults on first use
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            let content = std::fs::read_to_string(config_path)?;
            let config: Config = toml::from_str(&content)
                .map_err(|e| MatcherError::Configuration(format!("Failed to parse config: {}", e)))?;
            config.validate()?;
            Ok(config)
        } else {
            let config = Self::default();
            config.save_to(config_path)?;
            Ok(config)
        }
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| MatcherError::Configuration(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("interest-matcher")
            .join("config.toml")
    }

    pub fn validate(&self) -> Result<()> {
        self.scoring.weights.validate()?;

        if !(0.0..1.0).contains(&self.scoring.cutoff_fraction) {
            return Err(MatcherError::Configuration(format!(
                "scoring.cutoff_fraction must be in [0, 1), got {}",
                self.scoring.cutoff_fraction
            )));
        }

        if self.output.top_n == 0 {
            return Err(MatcherError::Configuration("output.top_n must be at least 1".to_string()));
        }

        Ok(())
    }

    pub fn catalog_timeout(&self) -> Duration {
        Duration::from_secs(self.catalog.timeout_secs)
    }

    pub fn similarity_engine(&self) -> SimilarityEngine {
        SimilarityEngine::new(self.scoring.metric, self.scoring.weights)
    }
}
