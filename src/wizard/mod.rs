//! Sequential form-wizard core for the case report.
//!
//! The engine owns the form snapshot and drives validation, navigation
//! locking, case-id resolution, and submission. Steps are recomputed from
//! the snapshot on every use; only step ids are stable identifiers.

pub mod case_id;
pub mod engine;
pub mod steps;
pub mod validate;

pub use engine::WizardEngine;
pub use steps::{compute_steps, Step, StepId};

use thiserror::Error;

use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum WizardError {
    /// Validation failure: user-correctable, names the first missing field.
    #[error("please fill in: {label}")]
    MissingField { field: &'static str, label: String },

    /// Attempt to jump to a step whose predecessor is not complete.
    #[error("please complete the previous section first")]
    LockedStep { index: usize },

    /// Loading an unknown case id. Distinct from a validation failure.
    #[error("case not found: {0}")]
    CaseNotFound(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}
