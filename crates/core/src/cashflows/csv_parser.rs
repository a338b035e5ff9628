//! CSV ingestion for cash-flow files.
//!
//! Parses a CSV byte stream carrying the fixed column contract into raw
//! [`CashFlowImport`] rows. The delimiter is auto-detected unless pinned,
//! a UTF-8 BOM is tolerated, and data rows are never rejected here: cell
//! values that fail to parse surface as `None` fields for the validator.

use csv::ReaderBuilder;

use crate::cashflows::cashflows_model::{
    parse_flow_amount, parse_flow_date, CashFlowImport, ColumnMap, LiquidationStatus,
};
use crate::errors::{Error, IngestError};
use crate::Result;

/// Configuration for CSV parsing.
#[derive(Debug, Clone, Default)]
pub struct CsvParseOptions {
    /// Delimiter override; `None` auto-detects over `,`, `;` and tab.
    pub delimiter: Option<char>,
    /// Keep rows whose cells are all blank instead of dropping them.
    pub keep_empty_rows: bool,
}

/// Parses CSV content into raw cash-flow rows.
///
/// Fails only for request-fatal conditions: undecodable/empty input or a
/// header row missing required columns.
pub fn parse_cash_flow_csv(content: &[u8], options: &CsvParseOptions) -> Result<Vec<CashFlowImport>> {
    let text = decode_content(content);
    let delimiter = options
        .delimiter
        .map(|c| c as u8)
        .unwrap_or_else(|| detect_delimiter(&text));

    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut records: Vec<(usize, Vec<String>)> = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        let line_number = idx + 1;
        match result {
            Ok(record) => {
                let cells: Vec<String> = record.iter().map(|s| s.to_string()).collect();
                records.push((line_number, cells));
            }
            Err(e) => {
                return Err(Error::Ingest(IngestError::Csv(format!(
                    "row {}: {}",
                    line_number, e
                ))));
            }
        }
    }

    if !options.keep_empty_rows {
        records.retain(|(_, cells)| !cells.iter().all(|cell| cell.trim().is_empty()));
    }

    let Some((_, header_cells)) = records.first() else {
        return Err(Error::Ingest(IngestError::Empty));
    };

    let columns = ColumnMap::resolve(header_cells)
        .map_err(|missing| Error::Ingest(IngestError::MissingColumns(missing)))?;

    let rows = records
        .iter()
        .skip(1)
        .map(|(line_number, cells)| import_from_cells(*line_number, cells, &columns))
        .collect::<Vec<_>>();

    if rows.is_empty() {
        return Err(Error::Ingest(IngestError::Empty));
    }

    log::debug!("Parsed {} CSV cash-flow rows", rows.len());
    Ok(rows)
}

fn import_from_cells(line_number: usize, cells: &[String], columns: &ColumnMap) -> CashFlowImport {
    let cell = |idx: usize| cells.get(idx).map(|s| s.trim()).unwrap_or_default();

    let raw_date = cell(columns.date).to_string();
    let raw_amount = cell(columns.amount).to_string();

    CashFlowImport {
        line_number,
        deal_id: cell(columns.deal_id).to_string(),
        date: parse_flow_date(&raw_date),
        amount: parse_flow_amount(&raw_amount),
        raw_date,
        raw_amount,
        industry: cell(columns.industry).to_string(),
        region: cell(columns.region).to_string(),
        fund: cell(columns.fund).to_string(),
        status: LiquidationStatus::parse_tolerant(cell(columns.status)),
    }
}

/// Decodes content bytes to a UTF-8 string, handling a BOM if present.
fn decode_content(content: &[u8]) -> String {
    let without_bom =
        if content.len() >= 3 && content[0] == 0xEF && content[1] == 0xBB && content[2] == 0xBF {
            &content[3..]
        } else {
            content
        };

    match std::str::from_utf8(without_bom) {
        Ok(s) => s.to_string(),
        Err(e) => {
            log::warn!(
                "Invalid UTF-8 in CSV input at byte {}; replacing bad sequences",
                e.valid_up_to()
            );
            String::from_utf8_lossy(without_bom).into_owned()
        }
    }
}

/// Auto-detects the delimiter by scoring column-count consistency.
fn detect_delimiter(content: &str) -> u8 {
    let candidates = [b',', b';', b'\t'];
    let mut best = b',';
    let mut best_score = 0usize;

    for candidate in candidates {
        let score = score_delimiter(content, candidate as char);
        if score > best_score {
            best_score = score;
            best = candidate;
        }
    }
    best
}

fn score_delimiter(content: &str, delimiter: char) -> usize {
    let counts: Vec<usize> = content
        .lines()
        .take(10)
        .map(|line| line.matches(delimiter).count())
        .collect();

    let Some(&first) = counts.first() else {
        return 0;
    };
    if first == 0 {
        return 0;
    }
    let consistent = counts.iter().filter(|&&c| c == first).count();
    first * consistent
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    const HEADER: &str = "Deal Code,Date,Amount,Industry,Region,Fund,Liquidation Status";

    fn csv_bytes(rows: &[&str]) -> Vec<u8> {
        let mut text = String::from(HEADER);
        for row in rows {
            text.push('\n');
            text.push_str(row);
        }
        text.into_bytes()
    }

    #[test]
    fn test_parse_simple_file() {
        let content = csv_bytes(&[
            "D-001,2020-01-01,-1000,Tech,Europe,Fund I,Active",
            "D-001,2021-01-01,1100,Tech,Europe,Fund I,Active",
        ]);

        let rows = parse_cash_flow_csv(&content, &CsvParseOptions::default()).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].deal_id, "D-001");
        assert_eq!(rows[0].line_number, 2);
        assert_eq!(rows[0].date, NaiveDate::from_ymd_opt(2020, 1, 1));
        assert_eq!(rows[0].amount, Some(dec!(-1000)));
        assert_eq!(rows[1].status, LiquidationStatus::Active);
    }

    #[test]
    fn test_semicolon_delimiter_detected() {
        let content = b"Deal Code;Date;Amount;Industry;Region;Fund;Liquidation Status\n\
                        D-1;2020-01-01;-5;Tech;Asia;F1;Liquidated";

        let rows = parse_cash_flow_csv(content, &CsvParseOptions::default()).unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].status, LiquidationStatus::Liquidated);
    }

    #[test]
    fn test_unparseable_cells_become_none() {
        let content = csv_bytes(&[
            "D-1,not-a-date,100,Tech,Asia,F1,Active",
            "D-1,2020-01-01,oops,Tech,Asia,F1,Active",
            "D-1,,100,Tech,Asia,F1,Active",
        ]);

        let rows = parse_cash_flow_csv(&content, &CsvParseOptions::default()).unwrap();

        assert_eq!(rows[0].date, None);
        assert_eq!(rows[0].raw_date, "not-a-date");
        assert_eq!(rows[1].amount, None);
        assert_eq!(rows[2].date, None);
    }

    #[test]
    fn test_missing_columns_is_fatal() {
        let content = b"Deal Code,Date,Amount\nD-1,2020-01-01,100";

        let err = parse_cash_flow_csv(content, &CsvParseOptions::default()).unwrap_err();

        match err {
            Error::Ingest(IngestError::MissingColumns(missing)) => {
                assert!(missing.contains(&"Industry".to_string()));
                assert!(missing.contains(&"Liquidation Status".to_string()));
                assert_eq!(missing.len(), 4);
            }
            other => panic!("expected MissingColumns, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_file_is_fatal() {
        let err = parse_cash_flow_csv(b"", &CsvParseOptions::default()).unwrap_err();
        assert!(matches!(err, Error::Ingest(IngestError::Empty)));
    }

    #[test]
    fn test_header_only_is_fatal() {
        let content = csv_bytes(&[]);
        let err = parse_cash_flow_csv(&content, &CsvParseOptions::default()).unwrap_err();
        assert!(matches!(err, Error::Ingest(IngestError::Empty)));
    }

    #[test]
    fn test_utf8_bom_is_stripped() {
        let mut content = vec![0xEF, 0xBB, 0xBF];
        content.extend_from_slice(&csv_bytes(&["D-1,2020-01-01,100,Tech,Asia,F1,Active"]));

        let rows = parse_cash_flow_csv(&content, &CsvParseOptions::default()).unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].deal_id, "D-1");
    }

    #[test]
    fn test_empty_rows_skipped_by_default() {
        let content = csv_bytes(&[
            "D-1,2020-01-01,100,Tech,Asia,F1,Active",
            ",,,,,,",
            "D-2,2020-02-01,200,Tech,Asia,F1,Active",
        ]);

        let rows = parse_cash_flow_csv(&content, &CsvParseOptions::default()).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].deal_id, "D-2");
    }

    #[test]
    fn test_quoted_fields_and_thousands_separator() {
        let content = csv_bytes(&["D-1,2020-01-01,\"1,234.56\",Tech,Asia,F1,Active"]);

        let rows = parse_cash_flow_csv(&content, &CsvParseOptions::default()).unwrap();

        assert_eq!(rows[0].amount, Some(dec!(1234.56)));
    }

    #[test]
    fn test_case_insensitive_headers() {
        let content = b"deal code,DATE,amount,industry,region,fund,liquidation status\n\
                        D-1,2020-01-01,100,Tech,Asia,F1,Active";

        let rows = parse_cash_flow_csv(content, &CsvParseOptions::default()).unwrap();

        assert_eq!(rows.len(), 1);
    }
}
