use serde::{Deserialize, Serialize};

use super::enums::Role;

/// A reporting officer account, provisioned by a superuser.
///
/// Wire format is camelCase to match the form field names the account
/// pre-fills on the intro step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Officer {
    pub staff_id: String,
    pub name: String,
    pub job_description: String,
    pub contact_number: String,
    pub pin: String,
    pub role: Role,
}
