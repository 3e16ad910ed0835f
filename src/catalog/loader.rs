//! Catalog loading from local files or HTTP

use crate::catalog::occupation::{Catalog, Category, Occupation, OccupationScores, CATEGORY_COUNT};
use crate::catalog::source::CatalogSource;
use crate::error::{MatcherError, Result};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;

pub struct CatalogLoader {
    client: reqwest::Client,
    cache: HashMap<String, LoadedCatalog>,
    enable_cache: bool,
}

#[derive(Debug, Clone)]
pub struct LoadedCatalog {
    pub source: CatalogSource,
    pub catalog: Catalog,
    pub report: LoadReport,
}

/// What had to be repaired while reading the catalog
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoadReport {
    pub entries: usize,
    pub coerced_values: Vec<CoercedValue>,
    pub padded_entries: Vec<String>,
    pub truncated_entries: Vec<String>,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.coerced_values.is_empty() && self.padded_entries.is_empty() && self.truncated_entries.is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoercedValue {
    pub occupation: String,
    pub category: Category,
    pub raw: String,
}

#[derive(Deserialize)]
struct RawOccupation {
    name: String,
    #[serde(default)]
    scores: Option<Vec<Value>>,
    #[serde(default)]
    description: Option<String>,
}

impl CatalogLoader {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            cache: HashMap::new(),
            enable_cache: true,
        })
    }

    pub fn with_cache(mut self, enable: bool) -> Self {
        self.enable_cache = enable;
        self
    }

    pub async fn load(&mut self, source: &CatalogSource) -> Result<LoadedCatalog> {
        let key = source.cache_key();

        if self.enable_cache {
            if let Some(cached) = self.cache.get(&key) {
                info!("Using cached catalog for: {}", source);
                return Ok(cached.clone());
            }
        }

        let body = match source {
            CatalogSource::Local(path) => {
                info!("Reading catalog file: {}", path.display());
                tokio::fs::read_to_string(path).await.map_err(|e| {
                    MatcherError::CatalogLoad(format!("Failed to read '{}': {}", path.display(), e))
                })?
            }
            CatalogSource::Remote(url) => {
                info!("Fetching catalog: {}", url);
                self.fetch(url).await?
            }
        };

        let (catalog, report) = parse_catalog(&body)?;
        info!("Loaded {} occupations from {}", catalog.len(), source);

        let loaded = LoadedCatalog {
            source: source.clone(),
            catalog,
            report,
        };

        if self.enable_cache {
            self.cache.insert(key, loaded.clone());
        }

        Ok(loaded)
    }

    async fn fetch(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| MatcherError::CatalogLoad(format!("Request to {} failed: {}", url, e)))?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(MatcherError::CatalogLoad(format!("HTTP {} from {}", status, url)));
        }

        Ok(response.text().await?)
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    pub fn cache_size(&self) -> usize {
        self.cache.len()
    }
}

/// Parse a catalog body. Bad individual scores become absent instead of failing the load.
pub fn parse_catalog(body: &str) -> Result<(Catalog, LoadReport)> {
    let raw: Vec<RawOccupation> = serde_json::from_str(body)
        .map_err(|e| MatcherError::CatalogData(format!("Failed to parse catalog: {}", e)))?;

    let mut report = LoadReport {
        entries: raw.len(),
        ..LoadReport::default()
    };

    let occupations = raw
        .into_iter()
        .map(|entry| {
            let raw_scores = entry.scores.unwrap_or_default();
            if raw_scores.len() < CATEGORY_COUNT {
                warn!("'{}' has {} scores, padding with absent values", entry.name, raw_scores.len());
                report.padded_entries.push(entry.name.clone());
            } else if raw_scores.len() > CATEGORY_COUNT {
                warn!("'{}' has {} scores, ignoring the extra values", entry.name, raw_scores.len());
                report.truncated_entries.push(entry.name.clone());
            }

            let mut scores = [None; CATEGORY_COUNT];
            for (category, value) in Category::ALL.iter().zip(raw_scores.iter()) {
                scores[category.index()] = coerce_score(value).unwrap_or_else(|| {
                    warn!("'{}' has a non-numeric {} score ({}), treating it as absent", entry.name, category, value);
                    report.coerced_values.push(CoercedValue {
                        occupation: entry.name.clone(),
                        category: *category,
                        raw: value.to_string(),
                    });
                    None
                });
            }

            debug!("Parsed occupation '{}': {:?}", entry.name, scores);
            Occupation::new(entry.name, OccupationScores::new(scores), entry.description.unwrap_or_default())
        })
        .collect();

    Ok((Catalog::new(occupations), report))
}

/// `Some(None)` is a legitimately absent value, `None` a value that needed coercion
fn coerce_score(value: &Value) -> Option<Option<f64>> {
    match value {
        Value::Null => Some(None),
        Value::Number(n) => n.as_f64().filter(|v| v.is_finite()).map(Some),
        _ => None,
    }
}
