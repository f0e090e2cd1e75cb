// Domain layer - records, queries, panel view model
pub mod error;
pub mod format;
pub mod panel;
pub mod query;
pub mod records;
