//! Occupation catalog: data model, source detection and loading

pub mod occupation;
pub mod source;
pub mod loader;

pub use occupation::{Catalog, Category, Occupation, OccupationScores, UserScores};
