//! Validation and grouping domain models.

use std::collections::BTreeMap;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::cashflows::{CashFlowRow, LiquidationStatus};

/// A grouping axis over which deals are aggregated before computing IRR.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CategoryDimension {
    Industry,
    Region,
    Fund,
    Status,
}

impl CategoryDimension {
    pub const ALL: [CategoryDimension; 4] = [
        CategoryDimension::Industry,
        CategoryDimension::Region,
        CategoryDimension::Fund,
        CategoryDimension::Status,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryDimension::Industry => "industry",
            CategoryDimension::Region => "region",
            CategoryDimension::Fund => "fund",
            CategoryDimension::Status => "status",
        }
    }

    /// Extracts this dimension's value from a row.
    pub fn value_of(&self, row: &CashFlowRow) -> String {
        match self {
            CategoryDimension::Industry => row.industry.clone(),
            CategoryDimension::Region => row.region.clone(),
            CategoryDimension::Fund => row.fund.clone(),
            CategoryDimension::Status => row.status.as_str().to_string(),
        }
    }
}

impl FromStr for CategoryDimension {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "industry" => Ok(CategoryDimension::Industry),
            "region" => Ok(CategoryDimension::Region),
            "fund" => Ok(CategoryDimension::Fund),
            "status" => Ok(CategoryDimension::Status),
            other => Err(format!("Unknown category dimension: {}", other)),
        }
    }
}

impl std::fmt::Display for CategoryDimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inclusive date bounds; either side may be open.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn contains(&self, date: NaiveDate) -> bool {
        if let Some(start) = self.start {
            if date < start {
                return false;
            }
        }
        if let Some(end) = self.end {
            if date > end {
                return false;
            }
        }
        true
    }
}

/// The user's filter selection. Empty lists leave a dimension unfiltered.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterSelection {
    #[serde(default)]
    pub industries: Vec<String>,
    #[serde(default)]
    pub regions: Vec<String>,
    #[serde(default)]
    pub funds: Vec<String>,
    #[serde(default)]
    pub statuses: Vec<LiquidationStatus>,
    #[serde(default)]
    pub date_range: DateRange,
}

impl FilterSelection {
    /// Whether a validated row passes this selection.
    pub fn matches(&self, row: &CashFlowRow) -> bool {
        let in_list = |values: &[String], value: &str| {
            values.is_empty() || values.iter().any(|v| v == value)
        };

        in_list(&self.industries, &row.industry)
            && in_list(&self.regions, &row.region)
            && in_list(&self.funds, &row.fund)
            && (self.statuses.is_empty() || self.statuses.contains(&row.status))
            && self.date_range.contains(row.date)
    }
}

/// Why a row or group was excluded from IRR computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SkipReason {
    MissingDate,
    MissingAmount,
    NoSignChange,
    SolverNonConvergence,
}

impl SkipReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkipReason::MissingDate => "MISSING_DATE",
            SkipReason::MissingAmount => "MISSING_AMOUNT",
            SkipReason::NoSignChange => "NO_SIGN_CHANGE",
            SkipReason::SolverNonConvergence => "SOLVER_NON_CONVERGENCE",
        }
    }
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry in the skip ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkipRecord {
    pub identifier: String,
    pub reason: SkipReason,
}

impl SkipRecord {
    /// Record for a single spreadsheet row.
    pub fn for_row(line_number: usize, reason: SkipReason) -> Self {
        SkipRecord {
            identifier: format!("row {}", line_number),
            reason,
        }
    }

    /// Record for a whole group (deal id, or `dimension:value`).
    pub fn for_group(key: impl Into<String>, reason: SkipReason) -> Self {
        SkipRecord {
            identifier: key.into(),
            reason,
        }
    }
}

/// Output of the Validator/Grouper: partitioned rows plus full accounting.
///
/// `BTreeMap` keys give deterministic iteration; the report builder still
/// sorts its tables so ordering is guaranteed end to end.
#[derive(Debug, Default)]
pub struct GroupedRows {
    pub deal_groups: BTreeMap<String, Vec<CashFlowRow>>,
    pub category_groups: BTreeMap<CategoryDimension, BTreeMap<String, Vec<CashFlowRow>>>,
    pub skipped: Vec<SkipRecord>,
    /// Rows that passed validation and the filter.
    pub included_rows: usize,
    /// Valid rows the user's selection excluded. Not skipped - intentional.
    pub excluded_by_filter: usize,
    /// All data rows seen, valid or not.
    pub total_rows: usize,
}
