//! Analysis request model.

use serde::{Deserialize, Serialize};

use crate::errors::ValidationError;
use crate::grouping::{CategoryDimension, FilterSelection};

/// One analysis request: the filter selection plus the category dimensions
/// to aggregate over. An empty dimension list means all four.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRequest {
    #[serde(default)]
    pub selection: FilterSelection,
    #[serde(default)]
    pub dimensions: Vec<CategoryDimension>,
}

impl AnalysisRequest {
    pub fn effective_dimensions(&self) -> Vec<CategoryDimension> {
        if self.dimensions.is_empty() {
            CategoryDimension::ALL.to_vec()
        } else {
            self.dimensions.clone()
        }
    }

    /// Validates the request before the pipeline runs.
    pub fn validate(&self) -> std::result::Result<(), ValidationError> {
        let range = &self.selection.date_range;
        if let (Some(start), Some(end)) = (range.start, range.end) {
            if start > end {
                return Err(ValidationError::InvalidInput(format!(
                    "date range starts {} but ends {}",
                    start, end
                )));
            }
        }
        Ok(())
    }
}
