//! Grouping module - row validation, filter selection, and group partitioning.

mod grouping_model;
mod grouping_service;


pub use grouping_model::{
    CategoryDimension, DateRange, FilterSelection, GroupedRows, SkipReason, SkipRecord,
};
pub use grouping_service::{aggregate_flows, admits_irr, validate_and_group};
