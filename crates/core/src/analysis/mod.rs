//! Analysis module - the compute(filters) -> tables pipeline.

mod analysis_model;
mod analysis_service;

#[cfg(test)]
mod analysis_service_tests;

pub use analysis_model::AnalysisRequest;
pub use analysis_service::{AnalysisService, AnalysisServiceTrait};
