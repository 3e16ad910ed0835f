//! Occupation catalog data model

use serde::{Deserialize, Serialize};
use std::fmt;
use strsim::jaro_winkler;

/// Number of RIASEC categories in every score vector
pub const CATEGORY_COUNT: usize = 6;

/// Lowest and highest score a user may report
pub const MIN_SCORE: f64 = 0.0;
pub const MAX_SCORE: f64 = 100.0;

const FUZZY_NAME_THRESHOLD: f64 = 0.8;

/// The six vocational-interest categories, in catalog order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Realistic,
    Investigative,
    Artistic,
    Social,
    Enterprising,
    Conventional,
}

impl Category {
    pub const ALL: [Category; CATEGORY_COUNT] = [
        Category::Realistic,
        Category::Investigative,
        Category::Artistic,
        Category::Social,
        Category::Enterprising,
        Category::Conventional,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Category::Realistic => "realistic",
            Category::Investigative => "investigative",
            Category::Artistic => "artistic",
            Category::Social => "social",
            Category::Enterprising => "enterprising",
            Category::Conventional => "conventional",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The user's six interest scores, always defined and clamped to [0, 100]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UserScores([f64; CATEGORY_COUNT]);

impl UserScores {
    pub fn new(values: [f64; CATEGORY_COUNT]) -> Self {
        Self(values.map(clamp_score))
    }

    pub fn get(&self, category: Category) -> f64 {
        self.0[category.index()]
    }

    /// Stores a clamped value; non-finite input leaves the previous value in place
    pub fn set(&mut self, category: Category, value: f64) {
        if value.is_finite() {
            self.0[category.index()] = clamp_score(value);
        }
    }

    pub fn values(&self) -> &[f64; CATEGORY_COUNT] {
        &self.0
    }

    /// Present-value view used by the normalizer
    pub fn as_present(&self) -> [Option<f64>; CATEGORY_COUNT] {
        self.0.map(Some)
    }

    /// First category holding the highest score
    pub fn dominant_category(&self) -> Category {
        let mut best = Category::Realistic;
        for category in Category::ALL {
            if self.get(category) > self.get(best) {
                best = category;
            }
        }
        best
    }
}

impl Default for UserScores {
    fn default() -> Self {
        Self([MIN_SCORE; CATEGORY_COUNT])
    }
}

fn clamp_score(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(MIN_SCORE, MAX_SCORE)
    } else {
        MIN_SCORE
    }
}

/// An occupation's per-category scores; `None` means unmeasured, not zero
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct OccupationScores([Option<f64>; CATEGORY_COUNT]);

impl OccupationScores {
    pub fn new(values: [Option<f64>; CATEGORY_COUNT]) -> Self {
        Self(values)
    }

    pub fn get(&self, category: Category) -> Option<f64> {
        self.0[category.index()]
    }

    pub fn values(&self) -> &[Option<f64>; CATEGORY_COUNT] {
        &self.0
    }

    pub fn present_count(&self) -> usize {
        self.0.iter().filter(|v| v.is_some()).count()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Occupation {
    pub name: String,
    pub scores: OccupationScores,
    pub description: String,
}

impl Occupation {
    pub fn new(name: impl Into<String>, scores: OccupationScores, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            scores,
            description: description.into(),
        }
    }
}

/// The in-memory occupation list held for one session
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    occupations: Vec<Occupation>,
}

impl Catalog {
    pub fn new(occupations: Vec<Occupation>) -> Self {
        Self { occupations }
    }

    pub fn occupations(&self) -> &[Occupation] {
        &self.occupations
    }

    pub fn len(&self) -> usize {
        self.occupations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.occupations.is_empty()
    }

    pub fn find(&self, name: &str) -> Option<&Occupation> {
        let needle = name.trim().to_lowercase();
        self.occupations.iter().find(|o| o.name.to_lowercase() == needle)
    }

    /// Closest occupation by Jaro-Winkler similarity, if any clears the threshold
    pub fn closest(&self, name: &str) -> Option<(&Occupation, f64)> {
        let needle = name.trim().to_lowercase();
        self.occupations
            .iter()
            .map(|o| (o, jaro_winkler(&needle, &o.name.to_lowercase())))
            .filter(|(_, score)| *score >= FUZZY_NAME_THRESHOLD)
            .max_by(|a, b| a.1.total_cmp(&b.1))
    }
}
