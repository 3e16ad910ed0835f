//! Interest matcher library

pub mod cli;
pub mod config;
pub mod error;
pub mod catalog;
pub mod scoring;
pub mod session;
pub mod output;

pub use error::{Result, MatcherError};
pub use config::Config;
