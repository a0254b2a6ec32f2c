//! CLI entry point for the survey analysis tool.

use anyhow::{Result, anyhow};
use clap::Parser;
use std::path::Path;
use survey_processing::{
    AnalysisReport, AnalyzerConfig, CrossTabAnalysis, Dataset, DatasetLoader, PatternDetector,
    ReportGenerator, ReportParams, SentimentAnalyzer, StatsAnalyzer, SurveySummary,
    dataset::loader::export_sample_data,
    utils::{format_percentage, format_table, truncate_text},
};
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Survey Data Analyzer",
    long_about = "Descriptive analysis of survey CSV data: demographic breakdowns,\n\
                  keyword-based sentiment scoring, chi-square association tests and\n\
                  heuristic pattern detection, rendered into a text report.\n\n\
                  EXAMPLES:\n  \
                  # Full analysis with a written report\n  \
                  survey-processing -i survey.csv -o report.txt\n\n  \
                  # Add a cross-tabulation of two columns\n  \
                  survey-processing -i survey.csv --crosstab gender satisfaction\n\n  \
                  # Machine-readable output\n  \
                  survey-processing -i survey.csv --json | jq .patterns\n\n  \
                  # Write a demo dataset to try the tool\n  \
                  survey-processing --export-sample sample_survey.csv"
)]
struct Args {
    /// Path to the survey CSV file to analyze
    #[arg(short, long, required_unless_present = "export_sample")]
    input: Option<String>,

    /// Output path for the text report
    #[arg(short, long, default_value = "survey_report.txt")]
    output: String,

    /// Cross-tabulate two columns and run the chi-square test
    #[arg(long, num_args = 2, value_names = ["COL1", "COL2"])]
    crosstab: Option<Vec<String>>,

    /// Run chi-square tests between this column and every other column
    #[arg(long, value_name = "COLUMN")]
    associate: Option<String>,

    /// Output JSON to stdout instead of writing the text report
    ///
    /// Disables all logging; only the JSON document is written to stdout.
    #[arg(long)]
    json: bool,

    /// Suppress progress output (only show warnings and errors)
    #[arg(short, long)]
    quiet: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Write a demo survey CSV to this path and exit
    #[arg(long, value_name = "PATH")]
    export_sample: Option<String>,
}

/// Initialize the tracing subscriber for logging.
///
/// When `json_output` is true, logging is completely disabled to ensure
/// only JSON is written to stdout.
fn init_logging(level: &str, quiet: bool, json_output: bool) {
    if json_output {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args.log_level, args.quiet, args.json);

    if let Some(path) = &args.export_sample {
        export_sample_data(Path::new(path))?;
        return Ok(());
    }

    let input = args
        .input
        .as_deref()
        .ok_or_else(|| anyhow!("no input file provided"))?;

    let dataset = DatasetLoader::new().load(Path::new(input))?;
    let config = AnalyzerConfig::default();

    let report = run_analysis(&dataset, &config, input, &args)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    ReportGenerator::new().write(&report, Path::new(&args.output))?;

    print_summary(&report, &args);

    Ok(())
}

/// Run every analysis and assemble the report.
fn run_analysis(
    dataset: &Dataset,
    config: &AnalyzerConfig,
    input: &str,
    args: &Args,
) -> Result<AnalysisReport> {
    info!("Generating summary statistics...");
    let overview = SurveySummary::new(dataset, config.clone()).generate();

    info!("Scoring sentiment of text columns...");
    let sentiment = SentimentAnalyzer::new(config.clone()).analyze_all_text_columns(dataset);

    info!("Detecting response patterns...");
    let patterns = PatternDetector::new(dataset, config.clone()).find_patterns();

    let stats = StatsAnalyzer::new(dataset, config.clone());
    let column_classification = stats.column_classification();

    let crosstab = match &args.crosstab {
        Some(columns) => {
            let (col1, col2) = (columns[0].as_str(), columns[1].as_str());
            info!("Cross-tabulating {} vs {}...", col1, col2);
            Some(CrossTabAnalysis {
                column1: col1.to_string(),
                column2: col2.to_string(),
                table: stats.cross_tabulate(col1, col2)?,
                chi_square: stats.chi_square_test(col1, col2)?,
                correlation: stats.correlation_analysis(col1, col2),
            })
        }
        None => None,
    };

    let associations = match &args.associate {
        Some(target) => {
            info!("Testing associations against {}...", target);
            Some(stats.chi_square_all(target)?)
        }
        None => None,
    };

    Ok(ReportGenerator::build_report(ReportParams {
        input_file: input,
        overview,
        sentiment,
        patterns,
        column_classification,
        crosstab,
        associations,
    }))
}

/// Print a human-readable summary of the analysis results.
///
/// Uses `println!` intentionally: unlike logging, this output is the primary
/// purpose of the run and should be visible regardless of log level.
fn print_summary(report: &AnalysisReport, args: &Args) {
    println!();
    println!("{}", "=".repeat(80));
    println!("SURVEY ANALYSIS COMPLETE");
    println!("{}", "=".repeat(80));
    println!();

    println!(
        "Input: {} ({} responses x {} columns)",
        report.input_file,
        report.overview.total_responses,
        report.column_classification.total_columns
    );
    println!("Report: {}", args.output);
    println!();

    println!(
        "Columns: {} numeric, {} categorical",
        report.column_classification.numeric_columns.len(),
        report.column_classification.categorical_columns.len()
    );
    println!();

    if !report.sentiment.is_empty() {
        println!("Sentiment:");
        for results in &report.sentiment {
            let total = results.total_responses as f64;
            println!(
                "  {}: {} positive / {} negative / {} neutral (avg score {:.2})",
                results.column,
                format_percentage(results.positive as f64, total),
                format_percentage(results.negative as f64, total),
                format_percentage(results.neutral as f64, total),
                results.avg_score
            );
        }
        println!();
    }

    if let Some(crosstab) = &report.crosstab {
        println!("Cross-tabulation: {} vs {}", crosstab.column1, crosstab.column2);
        println!("{}", format_table(&crosstab.table.to_table(), true));
        let chi = &crosstab.chi_square;
        match &chi.error {
            Some(error) => println!("Chi-square: {}", error),
            None => println!(
                "Chi-square: {:.4} (p = {:.4}, df = {}, significant: {})",
                chi.chi_square,
                chi.p_value,
                chi.df,
                if chi.significant { "Yes" } else { "No" }
            ),
        }
        println!();
    }

    if report.patterns.is_empty() {
        println!("No patterns detected.");
    } else {
        println!("Top patterns:");
        for pattern in report.patterns.iter().take(5) {
            println!(
                "  [{:>5.1}%] {} (n={})",
                pattern.confidence,
                truncate_text(&pattern.description, 90),
                pattern.sample_size
            );
        }
        if report.patterns.len() > 5 {
            println!("  ... and {} more in the report", report.patterns.len() - 5);
        }
    }
    println!();

    println!("Use --json for machine-readable output");
    println!("Use --crosstab COL1 COL2 to test a column pair");
    println!("{}", "=".repeat(80));
}
