//! Interest matcher: RIASEC interest profile to occupation recommendations

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use interest_matcher::catalog::loader::{CatalogLoader, LoadedCatalog};
use interest_matcher::catalog::occupation::Category;
use interest_matcher::catalog::source::CatalogSource;
use interest_matcher::cli::{self, Cli, Commands, ConfigAction};
use anyhow::{Context, Result};
use interest_matcher::error::is_retryable_report;
use interest_matcher::output::formatter::{save_report_to_file, suggest_filename, ReportGenerator};
use interest_matcher::output::report::{RecommendationReport, ReportMetadata};
use interest_matcher::scoring::ranker::Recommender;
use interest_matcher::scoring::similarity::{SimilarityMetric, WeightProfile};
use interest_matcher::session::{Session, SessionStatus};
use interest_matcher::{Config, MatcherError};
use log::{error, info, warn};
use std::path::PathBuf;
use std::process;
use std::time::{Duration, Instant, SystemTime};

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    // Load configuration
    let config_path = cli.config.clone().unwrap_or_else(Config::config_path);
    let config = match Config::load_from(&config_path) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = run_command(cli.command, config, config_path).await {
        error!("Command failed: {:#}", e);
        if is_retryable_report(&e) {
            println!("💡 Run again (or pass --retries) to retry loading the catalog");
        }
        process::exit(1);
    }
}

async fn run_command(command: Commands, mut config: Config, config_path: PathBuf) -> Result<()> {
    match command {
        Commands::Recommend {
            scores,
            catalog,
            metric,
            weights,
            all,
            top,
            output,
            save,
            retries,
        } => {
            let raw_scores = cli::split_scores(&scores).map_err(MatcherError::InvalidInput)?;

            let output_format = match output {
                Some(format) => cli::parse_output_format(&format).map_err(MatcherError::InvalidInput)?,
                None => config.output.format,
            };

            if let Some(m) = metric {
                config.scoring.metric = SimilarityMetric::parse(&m)?;
            }
            if let Some(w) = weights {
                config.scoring.weights = WeightProfile::parse(&w)?;
            }

            let top_n = top.unwrap_or(config.output.top_n);
            if top_n == 0 {
                return Err(MatcherError::InvalidInput("--top must be at least 1".to_string()).into());
            }

            let source = CatalogSource::detect(catalog.as_deref().unwrap_or(config.catalog.source.as_str()))?;
            info!("Recommending with {} metric against {}", config.scoring.metric, source);

            let recommender =
                Recommender::new(config.similarity_engine()).with_cutoff_fraction(config.scoring.cutoff_fraction);
            let mut session = Session::new(recommender);
            for (category, raw) in Category::ALL.iter().zip(raw_scores) {
                session.set_score_input(*category, raw);
            }

            let mut loader = CatalogLoader::new(config.catalog_timeout())?.with_cache(config.catalog.enable_cache);
            let spinner = start_spinner(&source);
            session.load_catalog(&mut loader, &source, retries).await;
            if let Some(spinner) = spinner {
                spinner.finish_and_clear();
            }
            if let Some(load_report) = session.load_report() {
                if !load_report.is_clean() {
                    warn!(
                        "Catalog needed repairs: {} coerced values, {} padded and {} truncated entries (see `catalog --validate`)",
                        load_report.coerced_values.len(),
                        load_report.padded_entries.len(),
                        load_report.truncated_entries.len()
                    );
                }
            }

            let start_time = Instant::now();
            let view = session.recompute();

            let metadata = ReportMetadata {
                generated_at: SystemTime::now(),
                matcher_version: env!("CARGO_PKG_VERSION").to_string(),
                metric: session.recommender().engine().metric(),
                weights: *session.recommender().engine().weights(),
                catalog_source: source.to_string(),
                catalog_size: session.catalog().map(|c| c.len()).unwrap_or(0),
                processing_time_ms: start_time.elapsed().as_millis() as u64,
            };

            let report = RecommendationReport::from_view(
                &view,
                session.scores(),
                metadata,
                top_n,
                all || config.output.show_all,
            );

            let generator = ReportGenerator::with_options(
                config.output.color_output && save.is_none(),
                true,
                true,
                true,
            );
            let content = generator.generate_report(&report, &output_format)?;

            match save {
                Some(path) => {
                    let path = path.unwrap_or_else(|| PathBuf::from(suggest_filename(&output_format, true)));
                    save_report_to_file(&content, &path)?;
                    println!("✅ Report saved to {}", path.display());
                }
                None => println!("{}", content),
            }

            match view.status {
                SessionStatus::LoadFailed { message, can_retry } => {
                    if can_retry {
                        println!("💡 Run again (or pass --retries) to retry loading the catalog");
                    }
                    return Err(anyhow::anyhow!(message).context(format!("Could not load catalog from {}", source)));
                }
                SessionStatus::ComputationFailed { message } => {
                    return Err(anyhow::anyhow!(message).context("Could not rank occupations"));
                }
                SessionStatus::Idle | SessionStatus::Ready => {}
            }
        }

        Commands::Occupation { name, catalog } => {
            let loaded = load_catalog(catalog.as_deref(), &config).await?;

            let occupation = match loaded.catalog.find(&name) {
                Some(occupation) => occupation,
                None => match loaded.catalog.closest(&name) {
                    Some((occupation, score)) => {
                        println!("🔍 No exact match for '{}', closest is '{}' ({:.0}% similar)\n", name, occupation.name, score * 100.0);
                        occupation
                    }
                    None => {
                        return Err(MatcherError::InvalidInput(format!("Occupation not found: {}", name)).into());
                    }
                },
            };

            println!("📋 {}\n", occupation.name);
            if !occupation.description.is_empty() {
                println!("{}\n", occupation.description);
            }
            for category in Category::ALL {
                match occupation.scores.get(category) {
                    Some(score) => println!("  {:<14} {:>5.1}", category.to_string(), score),
                    None => println!("  {:<14} {:>5}", category.to_string(), "n/a"),
                }
            }
        }

        Commands::Catalog { catalog, validate } => {
            let loaded = load_catalog(catalog.as_deref(), &config).await?;
            let report = &loaded.report;

            if !validate {
                println!("📚 {} occupations in {}\n", loaded.catalog.len(), loaded.source);
                for occupation in loaded.catalog.occupations() {
                    println!(
                        "  • {} ({}/{} categories measured)",
                        occupation.name,
                        occupation.scores.present_count(),
                        Category::ALL.len()
                    );
                }
                println!();
            }

            if report.is_clean() {
                println!("✅ Catalog is clean: {} entries, no repaired values", report.entries);
            } else {
                println!("⚠️  Repaired values in {} entries:", report.entries);
                for coerced in &report.coerced_values {
                    println!("  • {}: {} score {} treated as absent", coerced.occupation, coerced.category, coerced.raw);
                }
                for name in &report.padded_entries {
                    println!("  • {}: fewer than six scores, missing ones treated as absent", name);
                }
                for name in &report.truncated_entries {
                    println!("  • {}: more than six scores, extra values ignored", name);
                }
            }
        }

        Commands::Config { action } => match action {
            Some(ConfigAction::Show) | None => {
                println!("⚙️  Current Configuration\n");
                println!("Catalog Source: {}", config.catalog.source);
                println!("Catalog Timeout: {}s", config.catalog.timeout_secs);
                println!("\nScoring:");
                println!("  Metric: {}", config.scoring.metric);
                println!("  Weights: {:?}", config.scoring.weights.0);
                println!("  Cut-off Fraction: {:.2}", config.scoring.cutoff_fraction);
                println!("\nOutput:");
                println!("  Format: {:?}", config.output.format);
                println!("  Top N: {}", config.output.top_n);
                println!("  Show All: {}", config.output.show_all);
            }

            Some(ConfigAction::Reset) => {
                println!("🔄 Resetting configuration to defaults...");
                Config::default()
                    .save_to(&config_path)
                    .with_context(|| format!("Could not write {}", config_path.display()))?;
                println!("✅ Configuration reset successfully!");
            }

            Some(ConfigAction::Path) => {
                println!("{}", config_path.display());
            }
        },
    }

    Ok(())
}

async fn load_catalog(location: Option<&str>, config: &Config) -> Result<LoadedCatalog> {
    let source = CatalogSource::detect(location.unwrap_or(config.catalog.source.as_str()))?;
    let mut loader = CatalogLoader::new(config.catalog_timeout())?;

    let spinner = start_spinner(&source);
    let loaded = loader.load(&source).await;
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }
    loaded.with_context(|| format!("Could not load catalog from {}", source))
}

/// Spinner for remote catalogs only; local reads are instant
fn start_spinner(source: &CatalogSource) -> Option<ProgressBar> {
    if !source.is_remote() {
        return None;
    }

    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(format!("Fetching catalog from {}", source));
    spinner.enable_steady_tick(Duration::from_millis(100));
    Some(spinner)
}
