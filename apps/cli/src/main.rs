//! Command-line shell for the Dealscope IRR pipeline.
//!
//! Translates flags into one `AnalysisRequest`, runs the pipeline once,
//! prints the tables, and writes the export files. All logic lives in
//! `dealscope-core`; this binary only moves bytes and renders text.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, ValueEnum};

use dealscope_core::analysis::{AnalysisRequest, AnalysisService, AnalysisServiceTrait};
use dealscope_core::cashflows::LiquidationStatus;
use dealscope_core::grouping::{CategoryDimension, DateRange, FilterSelection};
use dealscope_core::report::{
    category_table_csv, deal_table_csv, format_rate, report_workbook, skipped_table_csv,
    AnalysisReport,
};

#[derive(Parser, Debug)]
#[command(name = "dealscope")]
#[command(about = "Deal and category IRR analysis for cash-flow spreadsheets")]
struct Args {
    /// Input spreadsheet (.xlsx) or CSV file
    input: PathBuf,

    /// Keep only these industries (repeatable; empty keeps all)
    #[arg(long)]
    industry: Vec<String>,

    /// Keep only these regions (repeatable; empty keeps all)
    #[arg(long)]
    region: Vec<String>,

    /// Keep only these funds (repeatable; empty keeps all)
    #[arg(long)]
    fund: Vec<String>,

    /// Keep only these liquidation statuses (repeatable; empty keeps all)
    #[arg(long)]
    status: Vec<LiquidationStatus>,

    /// Inclusive lower date bound (YYYY-MM-DD)
    #[arg(long)]
    from: Option<NaiveDate>,

    /// Inclusive upper date bound (YYYY-MM-DD)
    #[arg(long)]
    to: Option<NaiveDate>,

    /// Category dimensions to aggregate over (repeatable; empty means all)
    #[arg(long)]
    dimension: Vec<CategoryDimension>,

    /// Directory for export files
    #[arg(long, default_value = "exports")]
    out_dir: PathBuf,

    /// Which export files to write
    #[arg(long, value_enum, default_value = "both")]
    format: ExportFormat,

    /// Print the full report as JSON instead of tables
    #[arg(long)]
    json: bool,

    /// Skip writing export files
    #[arg(long)]
    no_export: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ExportFormat {
    Csv,
    Xlsx,
    Both,
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let content = fs::read(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))?;
    let request = build_request(&args);

    let service = AnalysisService::new();
    let report = match extension_of(&args.input).as_deref() {
        Some("xlsx") | Some("xlsm") => service.analyze_workbook(&content, &request)?,
        Some("csv") => service.analyze_csv(&content, &request)?,
        other => bail!(
            "unsupported input format '{}'; expected .xlsx or .csv",
            other.unwrap_or("<none>")
        ),
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    if !args.no_export {
        write_exports(&report, &args.out_dir, args.format)?;
    }
    Ok(())
}

fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
}

fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}

fn build_request(args: &Args) -> AnalysisRequest {
    AnalysisRequest {
        selection: FilterSelection {
            industries: args.industry.clone(),
            regions: args.region.clone(),
            funds: args.fund.clone(),
            statuses: args.status.clone(),
            date_range: DateRange {
                start: args.from,
                end: args.to,
            },
        },
        dimensions: args.dimension.clone(),
    }
}

fn print_report(report: &AnalysisReport) {
    println!("Category IRRs");
    println!("  {:<10} {:<28} {:>12}", "Dimension", "Value", "Rate");
    for row in &report.category_irr {
        println!(
            "  {:<10} {:<28} {:>12}",
            row.dimension,
            row.group_value,
            format_rate(&row.rate)
        );
    }

    println!();
    println!("Deal IRRs");
    println!("  {:<28} {:>12}", "Deal Code", "Rate");
    for row in &report.deal_irr {
        println!("  {:<28} {:>12}", row.deal_id, format_rate(&row.rate));
    }

    if !report.skipped.is_empty() {
        println!();
        println!("Skipped");
        println!("  {:<28} {:>24}", "Identifier", "Reason");
        for row in &report.skipped {
            println!("  {:<28} {:>24}", row.identifier, row.reason.as_str());
        }
    }

    println!();
    let average = report
        .summary
        .average_deal_irr
        .map(|r| r.to_string())
        .unwrap_or_else(|| "N/A".to_string());
    println!(
        "{} rows analyzed ({} filtered out, {} skipped) - average deal IRR: {}",
        report.summary.included_rows,
        report.summary.excluded_by_filter,
        report.summary.skipped_rows,
        average
    );
}

fn write_exports(report: &AnalysisReport, out_dir: &Path, format: ExportFormat) -> Result<()> {
    fs::create_dir_all(out_dir)
        .with_context(|| format!("failed to create {}", out_dir.display()))?;

    if format != ExportFormat::Xlsx {
        fs::write(out_dir.join("category_irrs.csv"), category_table_csv(report)?)?;
        fs::write(out_dir.join("deal_irrs.csv"), deal_table_csv(report)?)?;
        fs::write(out_dir.join("skipped.csv"), skipped_table_csv(report)?)?;
    }
    if format != ExportFormat::Csv {
        fs::write(out_dir.join("irr_results.xlsx"), report_workbook(report)?)?;
    }

    tracing::info!("Exports written to {}", out_dir.display());
    Ok(())
}
