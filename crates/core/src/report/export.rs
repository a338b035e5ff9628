//! Export writers: one CSV per table, and a single multi-sheet workbook.

use rust_xlsxwriter::{Format, Workbook};

use crate::errors::Error;
use crate::Result;

use super::report_model::{format_rate, AnalysisReport};

pub const SHEET_CATEGORY_IRR: &str = "Category IRR";
pub const SHEET_DEAL_IRR: &str = "Deal IRR";
pub const SHEET_SKIPPED: &str = "Skipped";

/// Category IRR table as CSV text.
pub fn category_table_csv(report: &AnalysisReport) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(["Dimension", "Value", "Rate"])
        .map_err(|e| Error::Export(e.to_string()))?;
    for row in &report.category_irr {
        let rate = format_rate(&row.rate);
        writer
            .write_record([
                row.dimension.as_str(),
                row.group_value.as_str(),
                rate.as_str(),
            ])
            .map_err(|e| Error::Export(e.to_string()))?;
    }
    finish_csv(writer)
}

/// Deal IRR table as CSV text.
pub fn deal_table_csv(report: &AnalysisReport) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(["Deal Code", "Rate"])
        .map_err(|e| Error::Export(e.to_string()))?;
    for row in &report.deal_irr {
        let rate = format_rate(&row.rate);
        writer
            .write_record([row.deal_id.as_str(), rate.as_str()])
            .map_err(|e| Error::Export(e.to_string()))?;
    }
    finish_csv(writer)
}

/// Skipped table as CSV text.
pub fn skipped_table_csv(report: &AnalysisReport) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(["Identifier", "Reason"])
        .map_err(|e| Error::Export(e.to_string()))?;
    for row in &report.skipped {
        writer
            .write_record([row.identifier.as_str(), row.reason.as_str()])
            .map_err(|e| Error::Export(e.to_string()))?;
    }
    finish_csv(writer)
}

fn finish_csv(writer: csv::Writer<Vec<u8>>) -> Result<String> {
    let bytes = writer
        .into_inner()
        .map_err(|e| Error::Export(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| Error::Export(e.to_string()))
}

/// All three tables as one XLSX workbook, returned as bytes.
///
/// Solved rates land as numeric cells so the sheets stay usable for
/// follow-on spreadsheet work; unsolved groups render as "N/A" text.
pub fn report_workbook(report: &AnalysisReport) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();

    {
        let sheet = workbook.add_worksheet();
        sheet.set_name(SHEET_CATEGORY_IRR)?;
        sheet.write_string_with_format(0, 0, "Dimension", &bold)?;
        sheet.write_string_with_format(0, 1, "Value", &bold)?;
        sheet.write_string_with_format(0, 2, "Rate", &bold)?;
        for (idx, row) in report.category_irr.iter().enumerate() {
            let r = (idx + 1) as u32;
            sheet.write_string(r, 0, &row.dimension)?;
            sheet.write_string(r, 1, &row.group_value)?;
            write_rate(sheet, r, 2, &row.rate)?;
        }
    }

    {
        let sheet = workbook.add_worksheet();
        sheet.set_name(SHEET_DEAL_IRR)?;
        sheet.write_string_with_format(0, 0, "Deal Code", &bold)?;
        sheet.write_string_with_format(0, 1, "Rate", &bold)?;
        for (idx, row) in report.deal_irr.iter().enumerate() {
            let r = (idx + 1) as u32;
            sheet.write_string(r, 0, &row.deal_id)?;
            write_rate(sheet, r, 1, &row.rate)?;
        }
    }

    {
        let sheet = workbook.add_worksheet();
        sheet.set_name(SHEET_SKIPPED)?;
        sheet.write_string_with_format(0, 0, "Identifier", &bold)?;
        sheet.write_string_with_format(0, 1, "Reason", &bold)?;
        for (idx, row) in report.skipped.iter().enumerate() {
            let r = (idx + 1) as u32;
            sheet.write_string(r, 0, &row.identifier)?;
            sheet.write_string(r, 1, row.reason.as_str())?;
        }
    }

    let bytes = workbook.save_to_buffer()?;
    Ok(bytes)
}

fn write_rate(
    sheet: &mut rust_xlsxwriter::Worksheet,
    row: u32,
    col: u16,
    rate: &Option<rust_decimal::Decimal>,
) -> Result<()> {
    use num_traits::ToPrimitive;

    match rate {
        Some(value) => {
            let numeric = value.to_f64().unwrap_or_default();
            sheet.write_number(row, col, numeric)?;
        }
        None => {
            sheet.write_string(row, col, crate::constants::NOT_AVAILABLE)?;
        }
    }
    Ok(())
}
