//! Report domain models.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::NOT_AVAILABLE;
use crate::grouping::SkipReason;

/// One line of the Category IRR table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryIrrRow {
    pub dimension: String,
    pub group_value: String,
    pub rate: Option<Decimal>,
}

/// One line of the Deal IRR table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DealIrrRow {
    pub deal_id: String,
    pub rate: Option<Decimal>,
}

/// One line of the Skipped table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkippedRow {
    pub identifier: String,
    pub reason: SkipReason,
}

/// One bar of the deal-IRR chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartPoint {
    pub label: String,
    pub value: Decimal,
}

/// Row accounting and headline numbers for one analysis run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisSummary {
    pub total_rows: usize,
    pub included_rows: usize,
    pub excluded_by_filter: usize,
    pub skipped_rows: usize,
    /// Mean of the solved deal rates; `None` when no deal solved.
    pub average_deal_irr: Option<Decimal>,
}

/// Everything one request produces.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub run_id: String,
    pub category_irr: Vec<CategoryIrrRow>,
    pub deal_irr: Vec<DealIrrRow>,
    pub skipped: Vec<SkippedRow>,
    pub chart: Vec<ChartPoint>,
    pub summary: AnalysisSummary,
}

/// Renders a rate cell: plain decimal, or "N/A" for unsolved groups.
pub fn format_rate(rate: &Option<Decimal>) -> String {
    match rate {
        Some(value) => value.to_string(),
        None => NOT_AVAILABLE.to_string(),
    }
}
