//! The analysis pipeline: one request in, one report out.
//!
//! Validator -> per-group solver -> report builder, in a single
//! synchronous pass. Shells call [`AnalysisServiceTrait::analyze`] (or one
//! of the ingestion entry points) and render what comes back; no other
//! surface exists.

use log::debug;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;

use crate::cashflows::{
    parse_cash_flow_csv, parse_cash_flow_workbook, CashFlowImport, CashFlowRow, CsvParseOptions,
};
use crate::constants::RATE_DECIMAL_PRECISION;
use crate::grouping::{
    admits_irr, aggregate_flows, validate_and_group, SkipReason, SkipRecord,
};
use crate::irr::{solve_irr, DatedFlow, IrrResult};
use crate::report::{build_report, AnalysisReport, RowAccounting};

use super::AnalysisRequest;

/// The compute seam shells program against.
pub trait AnalysisServiceTrait {
    /// Runs the full pipeline over already-parsed rows.
    fn analyze(
        &self,
        rows: Vec<CashFlowImport>,
        request: &AnalysisRequest,
    ) -> crate::Result<AnalysisReport>;

    /// Parses XLSX bytes, then runs the pipeline.
    fn analyze_workbook(
        &self,
        content: &[u8],
        request: &AnalysisRequest,
    ) -> crate::Result<AnalysisReport>;

    /// Parses CSV bytes, then runs the pipeline.
    fn analyze_csv(
        &self,
        content: &[u8],
        request: &AnalysisRequest,
    ) -> crate::Result<AnalysisReport>;
}

/// Stateless pipeline implementation.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnalysisService;

impl AnalysisService {
    pub fn new() -> Self {
        AnalysisService
    }
}

impl AnalysisServiceTrait for AnalysisService {
    fn analyze(
        &self,
        rows: Vec<CashFlowImport>,
        request: &AnalysisRequest,
    ) -> crate::Result<AnalysisReport> {
        request.validate()?;
        let dimensions = request.effective_dimensions();
        debug!(
            "Analyzing {} rows across {} dimensions",
            rows.len(),
            dimensions.len()
        );

        let mut grouped = validate_and_group(rows, &request.selection, &dimensions);
        let mut skipped = std::mem::take(&mut grouped.skipped);

        let mut deal_results = Vec::new();
        for (deal_id, group_rows) in &grouped.deal_groups {
            if let Some(rate) = rate_for_group(deal_id, group_rows, &mut skipped) {
                deal_results.push(IrrResult::deal(deal_id.clone(), rate));
            }
        }

        let mut category_results = Vec::new();
        for (dimension, groups) in &grouped.category_groups {
            for (value, group_rows) in groups {
                let key = format!("{}:{}", dimension, value);
                if let Some(rate) = rate_for_group(&key, group_rows, &mut skipped) {
                    category_results.push(IrrResult::category(*dimension, value.clone(), rate));
                }
            }
        }

        let accounting = RowAccounting {
            total_rows: grouped.total_rows,
            included_rows: grouped.included_rows,
            excluded_by_filter: grouped.excluded_by_filter,
        };
        Ok(build_report(
            deal_results,
            category_results,
            skipped,
            accounting,
        ))
    }

    fn analyze_workbook(
        &self,
        content: &[u8],
        request: &AnalysisRequest,
    ) -> crate::Result<AnalysisReport> {
        let rows = parse_cash_flow_workbook(content)?;
        self.analyze(rows, request)
    }

    fn analyze_csv(
        &self,
        content: &[u8],
        request: &AnalysisRequest,
    ) -> crate::Result<AnalysisReport> {
        let rows = parse_cash_flow_csv(content, &CsvParseOptions::default())?;
        self.analyze(rows, request)
    }
}

/// Solves one group, maintaining the skip ledger.
///
/// `None` means the group never reached the solver (no sign change) and
/// gets no table row. `Some(None)` means the solver ran and failed: the
/// group keeps an "N/A" row and the ledger explains why.
fn rate_for_group(
    key: &str,
    rows: &[CashFlowRow],
    skipped: &mut Vec<SkipRecord>,
) -> Option<Option<Decimal>> {
    let flows = aggregate_flows(rows);
    if !admits_irr(&flows) {
        skipped.push(SkipRecord::for_group(key, SkipReason::NoSignChange));
        return None;
    }

    let dated: Vec<DatedFlow> = flows
        .iter()
        .map(|(date, amount)| DatedFlow::new(*date, amount.to_f64().unwrap_or_default()))
        .collect();

    match solve_irr(&dated) {
        Ok(rate) => match Decimal::from_f64(rate) {
            Some(decimal) => Some(Some(decimal.round_dp(RATE_DECIMAL_PRECISION))),
            None => {
                skipped.push(SkipRecord::for_group(key, SkipReason::SolverNonConvergence));
                Some(None)
            }
        },
        Err(e) => {
            debug!("Group '{}' did not solve: {}", key, e);
            skipped.push(SkipRecord::for_group(key, SkipReason::SolverNonConvergence));
            Some(None)
        }
    }
}
