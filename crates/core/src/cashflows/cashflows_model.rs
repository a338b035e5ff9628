//! Cash-flow domain models.

use chrono::{DateTime, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::cashflows::cashflows_constants::{
    COLUMN_AMOUNT, COLUMN_DATE, COLUMN_DEAL_ID, COLUMN_FUND, COLUMN_INDUSTRY, COLUMN_REGION,
    COLUMN_STATUS, DATE_FORMATS,
};

/// Deal lifecycle state carried on every row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LiquidationStatus {
    #[default]
    Active,
    Liquidated,
}

impl LiquidationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LiquidationStatus::Active => "ACTIVE",
            LiquidationStatus::Liquidated => "LIQUIDATED",
        }
    }

    /// Parses spreadsheet text into a status, falling back to `Active`.
    ///
    /// Cells come from hand-maintained files, so matching is loose:
    /// "Active", "active", "open" all map to `Active`; "Liquidated",
    /// "exited", "closed" map to `Liquidated`. Anything else keeps the
    /// default and is logged.
    pub fn parse_tolerant(value: &str) -> Self {
        match Self::from_str(value) {
            Ok(status) => status,
            Err(_) => {
                if !value.trim().is_empty() {
                    log::debug!(
                        "Unrecognized liquidation status '{}', defaulting to ACTIVE",
                        value
                    );
                }
                LiquidationStatus::Active
            }
        }
    }
}

impl FromStr for LiquidationStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "active" | "open" => Ok(LiquidationStatus::Active),
            "liquidated" | "exited" | "closed" => Ok(LiquidationStatus::Liquidated),
            other => Err(format!("Unknown liquidation status: {}", other)),
        }
    }
}

impl std::fmt::Display for LiquidationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated cash-flow record: date and amount are known good.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CashFlowRow {
    pub deal_id: String,
    pub date: NaiveDate,
    pub amount: Decimal,
    pub industry: String,
    pub region: String,
    pub fund: String,
    pub status: LiquidationStatus,
}

/// The pre-validation image of one spreadsheet line.
///
/// Parsers never reject a data row: fields that fail to parse are `None`
/// here (with the raw text kept for diagnostics) and the validator routes
/// the row to the skip ledger.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CashFlowImport {
    /// 1-based row number within the sheet, header included.
    pub line_number: usize,
    pub deal_id: String,
    pub date: Option<NaiveDate>,
    pub amount: Option<Decimal>,
    pub raw_date: String,
    pub raw_amount: String,
    pub industry: String,
    pub region: String,
    pub fund: String,
    pub status: LiquidationStatus,
}

/// Resolved positions of the required columns within one header row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMap {
    pub deal_id: usize,
    pub date: usize,
    pub amount: usize,
    pub industry: usize,
    pub region: usize,
    pub fund: usize,
    pub status: usize,
}

impl ColumnMap {
    /// Locates every required column in `headers`.
    ///
    /// Returns the names still missing when the header row does not carry
    /// the full contract, so the caller can report them all at once.
    pub fn resolve(headers: &[String]) -> std::result::Result<ColumnMap, Vec<String>> {
        let position = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
        };

        let deal_id = position(COLUMN_DEAL_ID);
        let date = position(COLUMN_DATE);
        let amount = position(COLUMN_AMOUNT);
        let industry = position(COLUMN_INDUSTRY);
        let region = position(COLUMN_REGION);
        let fund = position(COLUMN_FUND);
        let status = position(COLUMN_STATUS);

        match (deal_id, date, amount, industry, region, fund, status) {
            (
                Some(deal_id),
                Some(date),
                Some(amount),
                Some(industry),
                Some(region),
                Some(fund),
                Some(status),
            ) => Ok(ColumnMap {
                deal_id,
                date,
                amount,
                industry,
                region,
                fund,
                status,
            }),
            _ => {
                let missing = [
                    (deal_id, COLUMN_DEAL_ID),
                    (date, COLUMN_DATE),
                    (amount, COLUMN_AMOUNT),
                    (industry, COLUMN_INDUSTRY),
                    (region, COLUMN_REGION),
                    (fund, COLUMN_FUND),
                    (status, COLUMN_STATUS),
                ]
                .iter()
                .filter(|(found, _)| found.is_none())
                .map(|(_, name)| name.to_string())
                .collect();
                Err(missing)
            }
        }
    }
}

/// Parses a date cell given as text.
///
/// Tries the fixed spreadsheet formats first, then an RFC 3339 timestamp.
/// Blank or unparseable text yields `None`.
pub fn parse_flow_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return Some(date);
        }
    }
    DateTime::parse_from_rfc3339(trimmed)
        .ok()
        .map(|dt| dt.date_naive())
}

/// Parses an amount cell given as text.
///
/// Accepts plain decimals, thousands separators ("1,234.56") and scientific
/// notation. Blank or unparseable text yields `None` so the validator can
/// route the row to the skip ledger.
pub fn parse_flow_amount(value: &str) -> Option<Decimal> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    let normalized: String = trimmed.chars().filter(|c| *c != ',').collect();
    Decimal::from_str(&normalized)
        .or_else(|_| Decimal::from_scientific(&normalized))
        .ok()
}
