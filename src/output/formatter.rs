//! Output formatters: console, JSON, Markdown and HTML

use crate::config::OutputFormat;
use crate::error::{MatcherError, Result};
use crate::output::report::*;
use askama::Template;
use colored::{Color, Colorize};
use std::path::Path;

/// Trait for formatting recommendation reports
pub trait OutputFormatter {
    fn format_report(&self, report: &RecommendationReport) -> Result<String>;
    fn supports_format(&self) -> OutputFormat;
}

/// Console formatter with optional colors
pub struct ConsoleFormatter {
    use_colors: bool,
}

/// JSON formatter for scripting and integration
pub struct JsonFormatter {
    pretty: bool,
}

pub struct MarkdownFormatter {
    include_metadata: bool,
}

pub struct HtmlFormatter {
    include_styles: bool,
}

/// Report generator that coordinates the formatters
pub struct ReportGenerator {
    console_formatter: ConsoleFormatter,
    json_formatter: JsonFormatter,
    markdown_formatter: MarkdownFormatter,
    html_formatter: HtmlFormatter,
}

#[derive(Template)]
#[template(source = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Occupation Recommendations</title>
    {% if include_styles %}
    <style>
        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
            line-height: 1.6;
            color: #333;
            max-width: 960px;
            margin: 0 auto;
            padding: 20px;
            background: #f8f9fa;
        }
        .container {
            background: white;
            padding: 30px;
            border-radius: 8px;
            box-shadow: 0 2px 10px rgba(0,0,0,0.1);
        }
        h1 { color: #007acc; }
        table { width: 100%; border-collapse: collapse; margin: 20px 0; }
        th, td { text-align: left; padding: 8px 10px; border-bottom: 1px solid #e9ecef; }
        th { background: #f1f3f5; }
        td.score { font-family: monospace; }
        .profile { display: grid; grid-template-columns: repeat(6, 1fr); gap: 10px; }
        .profile div { background: #f8f9fa; padding: 10px; border-radius: 6px; text-align: center; }
        .narrative { background: #f8f9fa; padding: 15px; border-left: 4px solid #17a2b8; border-radius: 6px; }
        .error { background: #f8d7da; color: #721c24; padding: 15px; border-radius: 6px; }
        .metadata { background: #e9ecef; padding: 15px; border-radius: 6px; margin-top: 30px; font-size: 0.9em; color: #6c757d; }
    </style>
    {% endif %}
</head>
<body>
    <div class="container">
        <h1>Occupation Recommendations</h1>
        <p>Generated: {{ generated_at }} | Processing time: {{ processing_time }}ms</p>

        {% if has_error %}
        <div class="error">{{ error_message }}</div>
        {% endif %}

        <h2>Your Interest Profile</h2>
        <div class="profile">
            {% for score in profile %}
            <div><strong>{{ score.category }}</strong><br>{{ score.value }}</div>
            {% endfor %}
        </div>

        <h2>Recommended Occupations</h2>
        {% if rows.is_empty() %}
        <p>No recommendations available.</p>
        {% else %}
        <table>
            <tr><th>Rank</th><th>Occupation</th><th>Similarity</th><th>Description</th></tr>
            {% for row in rows %}
            <tr><td>{{ row.rank }}</td><td>{{ row.name }}</td><td class="score">{{ row.similarity }}</td><td>{{ row.description }}</td></tr>
            {% endfor %}
        </table>
        <p>{{ coverage }}</p>
        {% endif %}

        <h2>Match Trend</h2>
        <div class="narrative">
            {% for paragraph in narrative %}
            <p>{{ paragraph }}</p>
            {% endfor %}
        </div>

        <div class="metadata">
            <p><strong>Generated by Interest Matcher v{{ version }}</strong></p>
            <p><strong>Metric:</strong> {{ metric }} | <strong>Weights:</strong> {{ weights }}</p>
            <p><strong>Catalog:</strong> {{ catalog_source }} ({{ catalog_size }} occupations)</p>
        </div>
    </div>
</body>
</html>"#, ext = "html")]
struct HtmlTemplate {
    include_styles: bool,
    generated_at: String,
    processing_time: u64,
    has_error: bool,
    error_message: String,
    profile: Vec<ProfileCell>,
    rows: Vec<HtmlRow>,
    coverage: String,
    narrative: Vec<String>,
    version: String,
    metric: String,
    weights: String,
    catalog_source: String,
    catalog_size: usize,
}

struct ProfileCell {
    category: String,
    value: String,
}

struct HtmlRow {
    rank: usize,
    name: String,
    similarity: String,
    description: String,
}

fn format_timestamp(report: &RecommendationReport) -> String {
    chrono::DateTime::<chrono::Utc>::from(report.metadata.generated_at)
        .format("%Y-%m-%d %H:%M:%S UTC")
        .to_string()
}

fn format_weights(report: &RecommendationReport) -> String {
    report
        .metadata
        .weights
        .0
        .iter()
        .map(|w| format!("{:.1}", w))
        .collect::<Vec<_>>()
        .join(", ")
}

fn coverage_line(report: &RecommendationReport) -> String {
    if report.is_truncated() {
        format!(
            "Showing top {} of {} recommendations ({} occupations ranked, threshold {:.4})",
            report.results.len(),
            report.total_recommended,
            report.total_ranked,
            report.threshold
        )
    } else {
        format!(
            "Showing all {} recommendations ({} occupations ranked, threshold {:.4})",
            report.total_recommended, report.total_ranked, report.threshold
        )
    }
}

impl ConsoleFormatter {
    pub fn new(use_colors: bool) -> Self {
        Self { use_colors }
    }

    fn colorize(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn format_header(&self, title: &str, level: u8) -> String {
        let prefix = match level {
            1 => "█",
            2 => "▓",
            _ => "▒",
        };

        let color = match level {
            1 => Color::Blue,
            2 => Color::Green,
            _ => Color::Yellow,
        };

        if self.use_colors {
            format!("\n{} {}\n", prefix.color(color).bold(), title.color(color).bold())
        } else {
            format!("\n{} {}\n", prefix, title)
        }
    }

    fn format_similarity(&self, similarity: f64) -> String {
        let color = match similarity {
            s if s > 0.8 => Color::Green,
            s if s > 0.6 => Color::BrightGreen,
            s if s > 0.4 => Color::Yellow,
            _ => Color::Red,
        };
        self.colorize(&format!("{:.4}", similarity), color)
    }

    fn score_bar(score: f64) -> String {
        let filled = (score / 10.0).round() as usize;
        format!("{}{}", "■".repeat(filled), "·".repeat(10 - filled.min(10)))
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_report(&self, report: &RecommendationReport) -> Result<String> {
        let mut output = String::new();

        output.push_str(&self.format_header("🧭 OCCUPATION RECOMMENDATIONS", 1));
        output.push_str(&format!(
            "Generated: {} | Processing time: {}ms\n",
            format_timestamp(report),
            report.metadata.processing_time_ms
        ));

        if let Some(message) = report.error_message() {
            output.push_str(&format!("\n{}\n", self.colorize(&format!("❌ {}", message), Color::Red)));
        }

        output.push_str(&self.format_header("Your Interest Profile", 2));
        for entry in &report.user_scores {
            output.push_str(&format!(
                "  {:<14} {:>5.1}  {}\n",
                entry.category.to_string(),
                entry.score,
                Self::score_bar(entry.score)
            ));
        }

        output.push_str(&self.format_header("Recommended Occupations", 2));
        if report.results.is_empty() {
            output.push_str("  No recommendations available.\n");
        } else {
            output.push_str(&format!("  {:>4}  {:<32} {:>10}  {}\n", "Rank", "Occupation", "Similarity", "Description"));
            for row in &report.results {
                output.push_str(&format!(
                    "  {:>4}  {:<32} {:>10}  {}\n",
                    row.rank,
                    row.occupation_name,
                    self.format_similarity(row.similarity),
                    row.description
                ));
            }
            output.push_str(&format!("\n  {}\n", coverage_line(report)));
        }

        output.push_str(&self.format_header("📈 Match Trend", 2));
        for paragraph in report.trend.narrative.split("\n\n") {
            output.push_str(&format!("{}\n\n", self.colorize(paragraph, Color::Cyan)));
        }

        output.push_str(&format!(
            "Metric: {} | Weights: [{}] | Catalog: {} ({} occupations)\n",
            report.metadata.metric,
            format_weights(report),
            report.metadata.catalog_source,
            report.metadata.catalog_size
        ));

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Console
    }
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_report(&self, report: &RecommendationReport) -> Result<String> {
        if self.pretty {
            Ok(serde_json::to_string_pretty(report)?)
        } else {
            Ok(serde_json::to_string(report)?)
        }
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Json
    }
}

impl MarkdownFormatter {
    pub fn new(include_metadata: bool) -> Self {
        Self { include_metadata }
    }

    fn escape_cell(text: &str) -> String {
        text.replace('|', "\\|").replace('\n', " ")
    }
}

impl OutputFormatter for MarkdownFormatter {
    fn format_report(&self, report: &RecommendationReport) -> Result<String> {
        let mut output = String::new();

        output.push_str("# 🧭 Occupation Recommendations\n\n");

        if self.include_metadata {
            output.push_str(&format!(
                "**Generated:** {} | **Processing Time:** {}ms\n",
                format_timestamp(report),
                report.metadata.processing_time_ms
            ));
            output.push_str(&format!(
                "**Metric:** {} | **Weights:** [{}] | **Catalog:** `{}` ({} occupations)\n\n",
                report.metadata.metric,
                format_weights(report),
                report.metadata.catalog_source,
                report.metadata.catalog_size
            ));
        }

        if let Some(message) = report.error_message() {
            output.push_str(&format!("> ❌ {}\n\n", message));
        }

        output.push_str("## Your Interest Profile\n\n");
        output.push_str("| Category | Score |\n");
        output.push_str("|----------|-------|\n");
        for entry in &report.user_scores {
            output.push_str(&format!("| {} | {:.1} |\n", entry.category, entry.score));
        }
        output.push('\n');

        output.push_str("## Recommended Occupations\n\n");
        if report.results.is_empty() {
            output.push_str("_No recommendations available._\n\n");
        } else {
            output.push_str("| Rank | Occupation | Similarity | Description |\n");
            output.push_str("|------|------------|------------|-------------|\n");
            for row in &report.results {
                output.push_str(&format!(
                    "| {} | {} | {:.4} | {} |\n",
                    row.rank,
                    Self::escape_cell(&row.occupation_name),
                    row.similarity,
                    Self::escape_cell(&row.description)
                ));
            }
            output.push_str(&format!("\n_{}_\n\n", coverage_line(report)));
        }

        output.push_str("## Match Trend\n\n");
        output.push_str(&report.trend.narrative);
        output.push('\n');

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Markdown
    }
}

impl HtmlFormatter {
    pub fn new(include_styles: bool) -> Self {
        Self { include_styles }
    }

    fn create_template_data(&self, report: &RecommendationReport) -> HtmlTemplate {
        let error_message = report.error_message();

        HtmlTemplate {
            include_styles: self.include_styles,
            generated_at: format_timestamp(report),
            processing_time: report.metadata.processing_time_ms,
            has_error: error_message.is_some(),
            error_message: error_message.unwrap_or_default(),
            profile: report
                .user_scores
                .iter()
                .map(|s| ProfileCell {
                    category: s.category.to_string(),
                    value: format!("{:.1}", s.score),
                })
                .collect(),
            rows: report
                .results
                .iter()
                .map(|row| HtmlRow {
                    rank: row.rank,
                    name: row.occupation_name.clone(),
                    similarity: format!("{:.4}", row.similarity),
                    description: row.description.clone(),
                })
                .collect(),
            coverage: coverage_line(report),
            narrative: report.trend.narrative.split("\n\n").map(str::to_string).collect(),
            version: report.metadata.matcher_version.clone(),
            metric: report.metadata.metric.to_string(),
            weights: format_weights(report),
            catalog_source: report.metadata.catalog_source.clone(),
            catalog_size: report.metadata.catalog_size,
        }
    }
}

impl OutputFormatter for HtmlFormatter {
    fn format_report(&self, report: &RecommendationReport) -> Result<String> {
        let template_data = self.create_template_data(report);
        template_data
            .render()
            .map_err(|e| MatcherError::OutputFormatting(e.to_string()))
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Html
    }
}

impl ReportGenerator {
    pub fn new() -> Self {
        Self::with_options(true, true, true, true)
    }

    pub fn with_options(use_colors: bool, pretty_json: bool, include_metadata: bool, include_html_styles: bool) -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(use_colors),
            json_formatter: JsonFormatter::new(pretty_json),
            markdown_formatter: MarkdownFormatter::new(include_metadata),
            html_formatter: HtmlFormatter::new(include_html_styles),
        }
    }

    pub fn generate_report(&self, report: &RecommendationReport, format: &OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Console => self.console_formatter.format_report(report),
            OutputFormat::Json => self.json_formatter.format_report(report),
            OutputFormat::Markdown => self.markdown_formatter.format_report(report),
            OutputFormat::Html => self.html_formatter.format_report(report),
        }
    }
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new()
    }
}

pub fn save_report_to_file(content: &str, file_path: &Path) -> Result<()> {
    use std::fs;
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(file_path, content)?;
    Ok(())
}

pub fn suggest_filename(format: &OutputFormat, timestamp: bool) -> String {
    let timestamp_suffix = if timestamp {
        format!("_{}", chrono::Utc::now().format("%Y%m%d_%H%M%S"))
    } else {
        String::new()
    };

    match format {
        OutputFormat::Console => format!("recommendations{}.txt", timestamp_suffix),
        OutputFormat::Json => format!("recommendations{}.json", timestamp_suffix),
        OutputFormat::Markdown => format!("recommendations{}.md", timestamp_suffix),
        OutputFormat::Html => format!("recommendations{}.html", timestamp_suffix),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::occupation::UserScores;
    use crate::scoring::ranker::{RankedResult, Recommendations};
    use crate::scoring::similarity::{SimilarityMetric, WeightProfile};
    use crate::scoring::trend::TrendReport;
    use crate::session::{SessionStatus, SessionView};
    use std::time::SystemTime;

    fn report() -> RecommendationReport {
        let results = vec![
            RankedResult {
                occupation_name: "Electrician".to_string(),
                similarity: 0.987654,
                description: "Installs <wiring>".to_string(),
            },
            RankedResult {
                occupation_name: "Carpenter".to_string(),
                similarity: 0.9,
                description: "Builds | frames".to_string(),
            },
        ];
        let view = SessionView {
            status: SessionStatus::Ready,
            recommendations: Recommendations {
                all: results.clone(),
                filtered: results,
                threshold: 0.9,
                trend: TrendReport {
                    narrative: "First paragraph.\n\nSecond paragraph.".to_string(),
                    stats: None,
                },
            },
        };
        let metadata = ReportMetadata {
            generated_at: SystemTime::now(),
            matcher_version: "0.1.0".to_string(),
            metric: SimilarityMetric::Hybrid,
            weights: WeightProfile::UNIFORM,
            catalog_source: "tests/fixtures/occupations.json".to_string(),
            catalog_size: 2,
            processing_time_ms: 3,
        };
        RecommendationReport::from_view(&view, &UserScores::new([90.0, 10.0, 10.0, 10.0, 10.0, 10.0]), metadata, 10, false)
    }

    #[test]
    fn test_console_plain_output() {
        let output = ConsoleFormatter::new(false).format_report(&report()).unwrap();
        assert!(output.contains("Electrician"));
        assert!(output.contains("0.9877"));
        assert!(output.contains("realistic"));
        assert!(output.contains("Second paragraph."));
    }

    #[test]
    fn test_json_output_parses() {
        let output = JsonFormatter::new(false).format_report(&report()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["results"][0]["occupation_name"], "Electrician");
        assert_eq!(value["metadata"]["metric"], "hybrid");
    }

    #[test]
    fn test_markdown_escapes_cells() {
        let output = MarkdownFormatter::new(true).format_report(&report()).unwrap();
        assert!(output.contains("| 1 | Electrician | 0.9877 |"));
        assert!(output.contains("Builds \\| frames"));
    }

    #[test]
    fn test_html_escapes_content() {
        let output = HtmlFormatter::new(false).format_report(&report()).unwrap();
        assert!(output.contains("Electrician"));
        assert!(output.contains("0.9877"));
        assert!(!output.contains("<wiring>"));
        assert!(!output.contains("<style>"));
    }

    #[test]
    fn test_suggest_filename() {
        assert_eq!(suggest_filename(&OutputFormat::Markdown, false), "recommendations.md");
        assert!(suggest_filename(&OutputFormat::Json, true).ends_with(".json"));
    }
}
