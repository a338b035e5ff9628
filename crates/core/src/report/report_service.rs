//! The Report Builder: turns IRR results and the skip ledger into the
//! three exportable tables plus chart data, with guaranteed ordering.

use log::debug;
use num_traits::Zero;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::constants::RATE_DECIMAL_PRECISION;
use crate::grouping::SkipRecord;
use crate::irr::IrrResult;

use super::{
    AnalysisReport, AnalysisSummary, CategoryIrrRow, ChartPoint, DealIrrRow, SkippedRow,
};

/// Row accounting carried over from the Validator/Grouper.
#[derive(Debug, Clone, Copy, Default)]
pub struct RowAccounting {
    pub total_rows: usize,
    pub included_rows: usize,
    pub excluded_by_filter: usize,
}

/// Assembles the final report.
///
/// Tables are sorted byte-wise alphabetically by key - category rows by
/// `(dimension, group value)`, deal rows by deal id, skipped rows by
/// identifier then reason - independent of insertion order. The chart is
/// drawn from the deal table, solved rates only, in table order.
pub fn build_report(
    deal_results: Vec<IrrResult>,
    category_results: Vec<IrrResult>,
    skipped: Vec<SkipRecord>,
    accounting: RowAccounting,
) -> AnalysisReport {
    let mut category_irr: Vec<CategoryIrrRow> = category_results
        .into_iter()
        .map(|result| CategoryIrrRow {
            dimension: result
                .dimension
                .map(|d| d.as_str().to_string())
                .unwrap_or_default(),
            group_value: result.group_key,
            rate: result.rate,
        })
        .collect();
    category_irr.sort_by(|a, b| {
        (a.dimension.as_str(), a.group_value.as_str())
            .cmp(&(b.dimension.as_str(), b.group_value.as_str()))
    });

    let mut deal_irr: Vec<DealIrrRow> = deal_results
        .into_iter()
        .map(|result| DealIrrRow {
            deal_id: result.group_key,
            rate: result.rate,
        })
        .collect();
    deal_irr.sort_by(|a, b| a.deal_id.cmp(&b.deal_id));

    let mut skipped: Vec<SkippedRow> = skipped
        .into_iter()
        .map(|record| SkippedRow {
            identifier: record.identifier,
            reason: record.reason,
        })
        .collect();
    skipped.sort_by(|a, b| {
        (a.identifier.as_str(), a.reason).cmp(&(b.identifier.as_str(), b.reason))
    });

    let chart: Vec<ChartPoint> = deal_irr
        .iter()
        .filter_map(|row| {
            row.rate.map(|rate| ChartPoint {
                label: row.deal_id.clone(),
                value: rate,
            })
        })
        .collect();

    let summary = AnalysisSummary {
        total_rows: accounting.total_rows,
        included_rows: accounting.included_rows,
        excluded_by_filter: accounting.excluded_by_filter,
        skipped_rows: skipped.len(),
        average_deal_irr: average_rate(&deal_irr),
    };

    let run_id = Uuid::new_v4().to_string();
    debug!(
        "Report {}: {} category rows, {} deal rows, {} skipped",
        run_id,
        category_irr.len(),
        deal_irr.len(),
        skipped.len()
    );

    AnalysisReport {
        run_id,
        category_irr,
        deal_irr,
        skipped,
        chart,
        summary,
    }
}

fn average_rate(deal_irr: &[DealIrrRow]) -> Option<Decimal> {
    let solved: Vec<Decimal> = deal_irr.iter().filter_map(|row| row.rate).collect();
    if solved.is_empty() {
        return None;
    }
    let sum: Decimal = solved.iter().sum();
    let count = Decimal::from(solved.len() as u64);
    if count.is_zero() {
        return None;
    }
    Some((sum / count).round_dp(RATE_DECIMAL_PRECISION))
}
