//! XLSX ingestion for cash-flow workbooks.
//!
//! Scans the workbook for the first sheet carrying the full column
//! contract and turns its data rows into raw [`CashFlowImport`] records.
//! Native date and numeric cells are taken as-is; text cells go through
//! the same tolerant parsers as CSV input.

use std::io::Cursor;

use calamine::{Data, Reader, Xlsx};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;

use crate::cashflows::cashflows_model::{
    parse_flow_amount, parse_flow_date, CashFlowImport, ColumnMap, LiquidationStatus,
};
use crate::cashflows::cashflows_constants::REQUIRED_COLUMNS;
use crate::errors::{Error, IngestError};
use crate::Result;

/// Parses XLSX content into raw cash-flow rows.
///
/// Sheets are tried in workbook order; the first one whose header row
/// resolves every required column wins. When none does, the error carries
/// the smallest missing set seen, so the user fixes the closest sheet.
pub fn parse_cash_flow_workbook(content: &[u8]) -> Result<Vec<CashFlowImport>> {
    let mut workbook = Xlsx::new(Cursor::new(content))
        .map_err(|e| Error::Ingest(IngestError::Workbook(e.to_string())))?;

    let sheet_names = workbook.sheet_names().to_owned();
    if sheet_names.is_empty() {
        return Err(Error::Ingest(IngestError::Empty));
    }

    let mut closest_missing: Option<Vec<String>> = None;

    for name in &sheet_names {
        let range = workbook
            .worksheet_range(name)
            .map_err(|e| Error::Ingest(IngestError::Workbook(format!("sheet '{}': {}", name, e))))?;

        let mut rows = range.rows().enumerate();

        // Header is the first row with any non-empty cell.
        let Some((header_idx, header_cells)) = rows.find(|(_, row)| {
            row.iter()
                .any(|cell| !matches!(cell, Data::Empty) && !cell.to_string().trim().is_empty())
        }) else {
            continue;
        };

        let headers: Vec<String> = header_cells.iter().map(text_from_cell).collect();
        match ColumnMap::resolve(&headers) {
            Ok(columns) => {
                let imports: Vec<CashFlowImport> = rows
                    .filter(|(_, row)| {
                        !row.iter()
                            .all(|cell| matches!(cell, Data::Empty))
                    })
                    .map(|(idx, row)| import_from_cells(idx + 1, row, &columns))
                    .collect();

                if imports.is_empty() {
                    return Err(Error::Ingest(IngestError::Empty));
                }
                log::debug!(
                    "Parsed {} rows from sheet '{}' (header at row {})",
                    imports.len(),
                    name,
                    header_idx + 1
                );
                return Ok(imports);
            }
            Err(missing) => {
                let fewer = closest_missing
                    .as_ref()
                    .map(|prev| missing.len() < prev.len())
                    .unwrap_or(true);
                if fewer {
                    closest_missing = Some(missing);
                }
            }
        }
    }

    Err(Error::Ingest(IngestError::MissingColumns(
        closest_missing.unwrap_or_else(|| {
            REQUIRED_COLUMNS.iter().map(|c| c.to_string()).collect()
        }),
    )))
}

fn import_from_cells(line_number: usize, cells: &[Data], columns: &ColumnMap) -> CashFlowImport {
    let cell = |idx: usize| cells.get(idx).unwrap_or(&Data::Empty);

    let (date, raw_date) = date_from_cell(cell(columns.date));
    let (amount, raw_amount) = amount_from_cell(cell(columns.amount));

    CashFlowImport {
        line_number,
        deal_id: text_from_cell(cell(columns.deal_id)),
        date,
        amount,
        raw_date,
        raw_amount,
        industry: text_from_cell(cell(columns.industry)),
        region: text_from_cell(cell(columns.region)),
        fund: text_from_cell(cell(columns.fund)),
        status: LiquidationStatus::parse_tolerant(&text_from_cell(cell(columns.status))),
    }
}

fn date_from_cell(cell: &Data) -> (Option<chrono::NaiveDate>, String) {
    match cell {
        Data::DateTime(dt) => (dt.as_datetime().map(|ndt| ndt.date()), cell.to_string()),
        Data::DateTimeIso(s) => (parse_flow_date(s), s.clone()),
        Data::String(s) => (parse_flow_date(s), s.trim().to_string()),
        Data::Empty => (None, String::new()),
        other => (None, other.to_string()),
    }
}

fn amount_from_cell(cell: &Data) -> (Option<Decimal>, String) {
    match cell {
        Data::Float(f) => (Decimal::from_f64(*f), cell.to_string()),
        Data::Int(i) => (Some(Decimal::from(*i)), cell.to_string()),
        Data::String(s) => (parse_flow_amount(s), s.trim().to_string()),
        Data::Empty => (None, String::new()),
        other => (None, other.to_string()),
    }
}

fn text_from_cell(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.trim().to_string(),
        Data::Empty => String::new(),
        other => other.to_string().trim().to_string(),
    }
}
