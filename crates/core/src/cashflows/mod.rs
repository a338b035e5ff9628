//! Cash-flow module - row models, column contract, and ingestion parsers.

mod cashflows_constants;
mod cashflows_model;
mod csv_parser;
mod workbook_parser;


pub use cashflows_constants::*;
pub use cashflows_model::{
    parse_flow_amount, parse_flow_date, CashFlowImport, CashFlowRow, ColumnMap, LiquidationStatus,
};
pub use csv_parser::{parse_cash_flow_csv, CsvParseOptions};
pub use workbook_parser::parse_cash_flow_workbook;
