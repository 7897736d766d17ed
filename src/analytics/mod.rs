//! Client-side aggregation behind the surveillance views.
//!
//! Pure functions from case/AST rows to plain aggregate structs; a chart
//! layer renders them elsewhere.

pub mod amr;
pub mod dashboard;

pub use amr::{aggregate_by_antibiotic, parse_rows, resistance_timeseries, AmrRow};
pub use dashboard::{summarize, CaseFilters, DashboardSummary};
