//! Catalog source detection

use crate::error::{MatcherError, Result};
use std::fmt;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq)]
pub enum CatalogSource {
    Local(PathBuf),
    Remote(String),
}

impl CatalogSource {
    pub fn detect(location: &str) -> Result<Self> {
        let location = location.trim();
        if location.is_empty() {
            return Err(MatcherError::InvalidInput("Catalog location is empty".to_string()));
        }

        let lower = location.to_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            return Ok(CatalogSource::Remote(location.to_string()));
        }

        let path = Path::new(location);
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Ok(CatalogSource::Local(path.to_path_buf())),
            _ => Err(MatcherError::UnsupportedSource(format!(
                "Expected a .json file or an http(s) URL: {}",
                location
            ))),
        }
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, CatalogSource::Remote(_))
    }

    /// Key used by the loader cache
    pub fn cache_key(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for CatalogSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogSource::Local(path) => write!(f, "{}", path.display()),
            CatalogSource::Remote(url) => f.write_str(url),
        }
    }
}
