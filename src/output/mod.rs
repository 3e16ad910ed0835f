//! Report model and output formatters

pub mod report;
pub mod formatter;
