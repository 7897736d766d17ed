use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Well-known form field names, as written by the step inputs.
pub mod fields {
    pub const OFFICER_ID: &str = "officerId";
    pub const OFFICER_NAME: &str = "officerName";
    pub const JOB_DESCRIPTION: &str = "jobDescription";
    pub const PLACE_OF_WORK: &str = "placeOfWork";
    pub const CONTACT_NUMBER: &str = "contactNumber";
    pub const DATE_REPORTED: &str = "dateReported";
    pub const PRIORITY_DISEASES: &str = "priorityDiseases";
    pub const TYPE_OF_CASE: &str = "typeOfCase";
    pub const NUMBER_OF_CASES: &str = "numberOfCases";
    pub const REGION: &str = "region";
    pub const DISTRICT: &str = "district";
    pub const COMMUNITY: &str = "community";
    pub const GPS_LOCATION: &str = "gpsLocation";
    pub const SPECIES: &str = "species";
    pub const VACCINATION_STATUS: &str = "vaccinationStatus";
    pub const OWNERSHIP: &str = "ownership";
    pub const ONSET_DATE: &str = "onsetDate";
    pub const CASE_CLASSIFICATION: &str = "caseClassification";
    pub const LAB_SAMPLE_TYPE: &str = "labSampleType";
    pub const LAB_TEST: &str = "labTest";
    pub const LAB_RESULT: &str = "labResult";
    pub const SEND_TO_LAB: &str = "sendToLab";
    pub const SAMPLE_TYPE: &str = "sampleType";
    pub const SELECTED_LAB: &str = "selectedLab";
    pub const CASE_ID: &str = "caseID";
}

/// A single form field value.
///
/// Step inputs write strings, multi-select inputs write string lists, and
/// composite widgets may write nested maps. Serialized untagged so a
/// persisted snapshot reads back exactly as it was written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    List(Vec<String>),
    Map(BTreeMap<String, FieldValue>),
}

impl FieldValue {
    /// Empty means: trimmed-empty string, zero-length list, or empty map.
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Text(s) => s.trim().is_empty(),
            FieldValue::List(items) => items.is_empty(),
            FieldValue::Map(entries) => entries.is_empty(),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(items: Vec<String>) -> Self {
        FieldValue::List(items)
    }
}

/// The shared form state mutated field-by-field by the step inputs.
///
/// No field is intrinsically required; requiredness is decided per active
/// step by the validator. Never partially rolled back.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormSnapshot {
    entries: BTreeMap<String, FieldValue>,
}

impl FormSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, field: impl Into<String>, value: impl Into<FieldValue>) {
        self.entries.insert(field.into(), value.into());
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.entries.get(field)
    }

    /// The field as a string, if present and textual.
    pub fn text(&self, field: &str) -> Option<&str> {
        match self.entries.get(field) {
            Some(FieldValue::Text(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    /// The field as a string list, if present and list-valued.
    pub fn list(&self, field: &str) -> Option<&[String]> {
        match self.entries.get(field) {
            Some(FieldValue::List(items)) => Some(items.as_slice()),
            _ => None,
        }
    }

    /// Absent fields count as empty, as do blank strings and empty lists.
    pub fn is_field_empty(&self, field: &str) -> bool {
        self.entries.get(field).map_or(true, FieldValue::is_empty)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FieldValue)> {
        self.entries.iter()
    }
}
