//! The fixed column contract for input spreadsheets.
//!
//! Header matching is case-insensitive and whitespace-trimmed; column order
//! is free. The first sheet carrying all seven columns is ingested.

pub const COLUMN_DEAL_ID: &str = "Deal Code";
pub const COLUMN_DATE: &str = "Date";
pub const COLUMN_AMOUNT: &str = "Amount";
pub const COLUMN_INDUSTRY: &str = "Industry";
pub const COLUMN_REGION: &str = "Region";
pub const COLUMN_FUND: &str = "Fund";
pub const COLUMN_STATUS: &str = "Liquidation Status";

/// Every column an input sheet must provide.
pub const REQUIRED_COLUMNS: [&str; 7] = [
    COLUMN_DEAL_ID,
    COLUMN_DATE,
    COLUMN_AMOUNT,
    COLUMN_INDUSTRY,
    COLUMN_REGION,
    COLUMN_FUND,
    COLUMN_STATUS,
];

/// Date formats accepted for text date cells, tried in order.
pub const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%m/%d/%Y", "%d.%m.%Y"];
