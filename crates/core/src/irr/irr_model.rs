//! IRR domain models.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::grouping::CategoryDimension;

/// Which granularity a rate was computed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IrrBasis {
    Deal,
    Category,
}

/// One cash movement as the solver sees it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DatedFlow {
    pub date: NaiveDate,
    pub amount: f64,
}

impl DatedFlow {
    pub fn new(date: NaiveDate, amount: f64) -> Self {
        DatedFlow { date, amount }
    }
}

/// The solved (or unsolvable) rate for one group.
///
/// `rate: None` means the group reached the solver and failed; it renders
/// as "N/A" in every export and is explained in the skip ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IrrResult {
    pub group_key: String,
    pub rate: Option<Decimal>,
    pub basis: IrrBasis,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimension: Option<CategoryDimension>,
}

impl IrrResult {
    pub fn deal(deal_id: impl Into<String>, rate: Option<Decimal>) -> Self {
        IrrResult {
            group_key: deal_id.into(),
            rate,
            basis: IrrBasis::Deal,
            dimension: None,
        }
    }

    pub fn category(
        dimension: CategoryDimension,
        value: impl Into<String>,
        rate: Option<Decimal>,
    ) -> Self {
        IrrResult {
            group_key: value.into(),
            rate,
            basis: IrrBasis::Category,
            dimension: Some(dimension),
        }
    }
}

/// Solver failure modes. Neither aborts the request; the caller converts
/// them into an "N/A" result plus a skip record.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IrrError {
    #[error("at least two dated flows are required")]
    InsufficientFlows,

    #[error("discounted sum has no sign change over [{min}, {max}]")]
    NoRootInBracket { min: f64, max: f64 },

    #[error("no convergence after {0} iterations")]
    IterationsExhausted(u32),
}
