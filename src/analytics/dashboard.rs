use std::collections::BTreeMap;

use crate::models::snapshot::{fields, FieldValue, FormSnapshot};
use crate::store::{ns, FieldStore, StoreError};

/// Optional dashboard filters; `None` means no restriction.
#[derive(Debug, Clone, Default)]
pub struct CaseFilters {
    pub region: Option<String>,
    pub disease: Option<String>,
    pub classification: Option<String>,
}

/// Aggregates the dashboard charts are drawn from.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSummary {
    pub total: usize,
    pub by_region: BTreeMap<String, u64>,
    pub by_species: BTreeMap<String, u64>,
    pub by_classification: BTreeMap<String, u64>,
    pub by_disease: BTreeMap<String, u64>,
}

/// All locally saved cases, in key order.
pub fn load_cases<S: FieldStore + ?Sized>(store: &S) -> Result<Vec<FormSnapshot>, StoreError> {
    let mut cases = Vec::new();
    for key in store.keys(ns::CASES)? {
        if let Some(value) = store.get(ns::CASES, &key)? {
            cases.push(serde_json::from_value(value)?);
        }
    }
    Ok(cases)
}

fn matches(case: &FormSnapshot, filters: &CaseFilters) -> bool {
    if let Some(region) = &filters.region {
        if case.text(fields::REGION) != Some(region.as_str()) {
            return false;
        }
    }
    if let Some(disease) = &filters.disease {
        let listed = case
            .list(fields::PRIORITY_DISEASES)
            .is_some_and(|diseases| diseases.iter().any(|d| d == disease));
        if !listed {
            return false;
        }
    }
    if let Some(classification) = &filters.classification {
        if case.text(fields::CASE_CLASSIFICATION) != Some(classification.as_str()) {
            return false;
        }
    }
    true
}

/// Group label for one field of one case. List values collapse to a
/// comma-joined label; anything missing or empty counts as "Unknown".
fn group_label(case: &FormSnapshot, field: &str) -> String {
    match case.get(field) {
        Some(FieldValue::Text(s)) if !s.trim().is_empty() => s.clone(),
        Some(FieldValue::List(items)) if !items.is_empty() => items.join(","),
        _ => "Unknown".to_string(),
    }
}

/// Occurrences of each value of `field` across the cases.
pub fn count_by<'a, I>(cases: I, field: &str) -> BTreeMap<String, u64>
where
    I: IntoIterator<Item = &'a FormSnapshot>,
{
    let mut counts = BTreeMap::new();
    for case in cases {
        *counts.entry(group_label(case, field)).or_insert(0) += 1;
    }
    counts
}

/// Disease tallies, counting each listed priority disease once per case.
pub fn disease_counts<'a, I>(cases: I) -> BTreeMap<String, u64>
where
    I: IntoIterator<Item = &'a FormSnapshot>,
{
    let mut counts = BTreeMap::new();
    for case in cases {
        for disease in case.list(fields::PRIORITY_DISEASES).unwrap_or_default() {
            *counts.entry(disease.clone()).or_insert(0) += 1;
        }
    }
    counts
}

/// Filter and aggregate the full case list for the dashboard.
pub fn summarize(cases: &[FormSnapshot], filters: &CaseFilters) -> DashboardSummary {
    let filtered: Vec<&FormSnapshot> = cases.iter().filter(|c| matches(c, filters)).collect();

    DashboardSummary {
        total: filtered.len(),
        by_region: count_by(filtered.iter().copied(), fields::REGION),
        by_species: count_by(filtered.iter().copied(), fields::SPECIES),
        by_classification: count_by(filtered.iter().copied(), fields::CASE_CLASSIFICATION),
        by_disease: disease_counts(filtered.iter().copied()),
    }
}
