use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::SopCategory;

/// Subcategories under the procedure SOP group.
pub const PROCEDURE_SUBCATEGORIES: &[&str] = &[
    "Bacteriology",
    "Clinical Pathology",
    "Parasitology",
    "Virology",
    "Molecular Diagnostics",
    "Serology & Immunology",
    "Sample Collection & Handling",
    "Quality Assurance & Biosafety",
    "Waste Management",
    "Laboratory Information Management",
];

/// One registered standard-operating-procedure document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SopRecord {
    pub id: Uuid,
    pub name: String,
    pub category: SopCategory,
    pub subcategory: Option<String>,
    pub uploaded_at: DateTime<Utc>,
    pub file_url: String,
}

/// A deleted SOP waiting out the trash retention window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrashedSop {
    #[serde(flatten)]
    pub record: SopRecord,
    pub deleted_at: DateTime<Utc>,
}
