use std::sync::OnceLock;

use regex::Regex;

use crate::models::snapshot::{fields, FormSnapshot};

use super::steps::{StepId, PLACE_LABORATORY};

/// Required fields per step, checked in declared order.
fn required_fields(step: StepId) -> &'static [&'static str] {
    match step {
        StepId::Intro => &[
            fields::OFFICER_ID,
            fields::OFFICER_NAME,
            fields::JOB_DESCRIPTION,
            fields::PLACE_OF_WORK,
            fields::CONTACT_NUMBER,
        ],
        StepId::General => &[
            fields::DATE_REPORTED,
            fields::PRIORITY_DISEASES,
            fields::TYPE_OF_CASE,
            fields::NUMBER_OF_CASES,
            fields::REGION,
            fields::DISTRICT,
        ],
        StepId::Animal => &[
            fields::SPECIES,
            fields::VACCINATION_STATUS,
            fields::OWNERSHIP,
        ],
        StepId::Lab => &[fields::LAB_SAMPLE_TYPE, fields::LAB_TEST, fields::LAB_RESULT],
        StepId::Clinical => &[fields::ONSET_DATE, fields::CASE_CLASSIFICATION],
        // These steps may still mark sub-fields mandatory in their own
        // inputs; nothing is enforced at this layer.
        StepId::Control | StepId::Referral | StepId::Postmortem => &[],
    }
}

/// Fail-fast check of the step's required fields against the snapshot.
///
/// Returns the first empty required field. The lab step only applies to
/// laboratory officers: for anyone else it passes unconditionally, even
/// though the step never appears in their sequence.
pub fn validate(step: StepId, snapshot: &FormSnapshot) -> Result<(), &'static str> {
    if step == StepId::Lab && snapshot.text(fields::PLACE_OF_WORK) != Some(PLACE_LABORATORY) {
        return Ok(());
    }

    for field in required_fields(step) {
        if snapshot.is_field_empty(field) {
            return Err(field);
        }
    }
    Ok(())
}

/// Human-readable form of a camelCase field name, for warning messages.
/// `"labSampleType"` becomes `"lab Sample Type"`.
pub fn display_name(field: &str) -> String {
    static UPPERCASE: OnceLock<Regex> = OnceLock::new();
    let re = UPPERCASE.get_or_init(|| Regex::new("([A-Z])").expect("valid pattern"));
    re.replace_all(field, " $1").into_owned()
}
