//! The Validator/Grouper: routes bad rows to the skip ledger, applies the
//! user's filter selection, and partitions surviving rows into deal groups
//! and per-dimension category groups.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use log::debug;
use rust_decimal::Decimal;

use crate::cashflows::{CashFlowImport, CashFlowRow};

use super::{CategoryDimension, FilterSelection, GroupedRows, SkipReason, SkipRecord};

/// Validates, filters, and partitions one request's rows.
///
/// Rows with an unparseable date or amount go to the skip ledger and leave
/// the pipeline (a row missing both reports the date first). Valid rows
/// that fail the selection are counted, not skipped: exclusion by filter
/// is a user decision, not a data problem. Each surviving row lands in
/// exactly one deal group and one group per requested dimension.
pub fn validate_and_group(
    rows: Vec<CashFlowImport>,
    selection: &FilterSelection,
    dimensions: &[CategoryDimension],
) -> GroupedRows {
    let mut grouped = GroupedRows {
        total_rows: rows.len(),
        ..GroupedRows::default()
    };

    for import in rows {
        let row = match validate(import) {
            Ok(row) => row,
            Err(skip) => {
                grouped.skipped.push(skip);
                continue;
            }
        };

        if !selection.matches(&row) {
            grouped.excluded_by_filter += 1;
            continue;
        }
        grouped.included_rows += 1;

        for dimension in dimensions {
            grouped
                .category_groups
                .entry(*dimension)
                .or_default()
                .entry(dimension.value_of(&row))
                .or_default()
                .push(row.clone());
        }

        grouped
            .deal_groups
            .entry(row.deal_id.clone())
            .or_default()
            .push(row);
    }

    debug!(
        "Grouped {} rows into {} deals across {} dimensions ({} skipped, {} filtered out)",
        grouped.included_rows,
        grouped.deal_groups.len(),
        grouped.category_groups.len(),
        grouped.skipped.len(),
        grouped.excluded_by_filter
    );
    grouped
}

fn validate(import: CashFlowImport) -> std::result::Result<CashFlowRow, SkipRecord> {
    match (import.date, import.amount) {
        (Some(date), Some(amount)) => Ok(CashFlowRow {
            deal_id: import.deal_id,
            date,
            amount,
            industry: import.industry,
            region: import.region,
            fund: import.fund,
            status: import.status,
        }),
        (None, _) => {
            debug!(
                "Skipping row {}: unparseable date '{}'",
                import.line_number, import.raw_date
            );
            Err(SkipRecord::for_row(
                import.line_number,
                SkipReason::MissingDate,
            ))
        }
        (_, None) => {
            debug!(
                "Skipping row {}: unparseable amount '{}'",
                import.line_number, import.raw_amount
            );
            Err(SkipRecord::for_row(
                import.line_number,
                SkipReason::MissingAmount,
            ))
        }
    }
}

/// Collapses a group's rows into one flow per date, ordered by date.
///
/// Same-dated amounts are summed before the solver sees them, so a deal
/// that draws and distributes on one day contributes its net movement.
pub fn aggregate_flows(rows: &[CashFlowRow]) -> Vec<(NaiveDate, Decimal)> {
    let mut by_date: BTreeMap<NaiveDate, Decimal> = BTreeMap::new();
    for row in rows {
        *by_date.entry(row.date).or_insert(Decimal::ZERO) += row.amount;
    }
    by_date.into_iter().collect()
}

/// Whether an aggregated flow sequence admits a mathematically meaningful
/// IRR: at least two flows, at least one negative and one positive.
pub fn admits_irr(flows: &[(NaiveDate, Decimal)]) -> bool {
    flows.len() >= 2
        && flows.iter().any(|(_, amount)| *amount > Decimal::ZERO)
        && flows.iter().any(|(_, amount)| *amount < Decimal::ZERO)
}
