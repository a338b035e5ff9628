//! Dealscope Core - cash-flow ingestion, grouping, IRR and reporting.
//!
//! One request is one linear pass: parse a workbook or CSV into raw rows,
//! validate and filter them, partition them into deal and category groups,
//! solve each eligible group for its internal rate of return, and assemble
//! the result tables plus the skip ledger. Everything is synchronous and
//! request-scoped; nothing persists between calls.

pub mod analysis;
pub mod cashflows;
pub mod constants;
pub mod errors;
pub mod grouping;
pub mod irr;
pub mod report;

// Re-export the request/report surface used by shells
pub use analysis::{AnalysisRequest, AnalysisService, AnalysisServiceTrait};
pub use report::{AnalysisReport, AnalysisSummary};

// Re-export error types
pub use errors::Error;
pub use errors::Result;
