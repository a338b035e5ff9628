//! Report module - result tables, chart data, and export writers.

mod export;
mod report_model;
mod report_service;

#[cfg(test)]
mod report_service_tests;

pub use export::{
    category_table_csv, deal_table_csv, report_workbook, skipped_table_csv, SHEET_CATEGORY_IRR,
    SHEET_DEAL_IRR, SHEET_SKIPPED,
};
pub use report_model::{
    format_rate, AnalysisReport, AnalysisSummary, CategoryIrrRow, ChartPoint, DealIrrRow,
    SkippedRow,
};
pub use report_service::{build_report, RowAccounting};
