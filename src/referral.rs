//! Referral notifications to the receiving laboratory.
//!
//! Sent once, at submission, after the case id is finalized. The notifier
//! never generates ids itself and its failures never fail a submission;
//! the engine logs the outcome and moves on.

use std::collections::HashMap;

use serde::Serialize;
use thiserror::Error;

use crate::config;
use crate::models::snapshot::fields;
use crate::models::CaseRecord;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("relay request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("relay rejected the notification: HTTP {0}")]
    Rejected(reqwest::StatusCode),
}

/// What happened to a referral, reported back to the caller for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferralOutcome {
    Sent,
    /// The officer answered anything other than "yes" to sending a sample.
    NotRequested,
    /// A referral was requested but the selected laboratory is unset or
    /// not in the directory.
    UnknownLab,
}

/// The structured notification delivered to the laboratory's address.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReferralPayload {
    pub to_email: String,
    pub case_id: String,
    pub case_type: String,
    pub sample_type: String,
    pub district: String,
    pub region: String,
    pub officer_name: String,
    pub contact_number: String,
    pub lab_name: String,
}

/// Decide whether a record warrants a notification, and build it.
///
/// `Err` carries the skip reason. The payload always uses the record's
/// already-finalized case id.
pub fn referral_payload(
    record: &CaseRecord,
    labs: &HashMap<String, String>,
) -> Result<ReferralPayload, ReferralOutcome> {
    if !record.field(fields::SEND_TO_LAB).eq_ignore_ascii_case("yes") {
        return Err(ReferralOutcome::NotRequested);
    }

    let lab_name = record.field(fields::SELECTED_LAB);
    let Some(to_email) = labs.get(lab_name) else {
        return Err(ReferralOutcome::UnknownLab);
    };

    Ok(ReferralPayload {
        to_email: to_email.clone(),
        case_id: record.case_id.clone(),
        case_type: record.field(fields::TYPE_OF_CASE).to_string(),
        sample_type: record.field(fields::SAMPLE_TYPE).to_string(),
        district: record.field(fields::DISTRICT).to_string(),
        region: record.field(fields::REGION).to_string(),
        officer_name: record.field(fields::OFFICER_NAME).to_string(),
        contact_number: record.field(fields::CONTACT_NUMBER).to_string(),
        lab_name: lab_name.to_string(),
    })
}

/// Registered laboratories and their relay addresses.
pub fn default_laboratories() -> HashMap<String, String> {
    [
        ("Takoradi Veterinary Lab", "takoradi.lab@vsd.gov.gh"),
        ("Kumasi Veterinary Lab", "kumasi.lab@vsd.gov.gh"),
        ("Accra Veterinary Lab", "accra.lab@vsd.gov.gh"),
        ("Central Veterinary Lab Pong Tamale", "pongtamale.lab@vsd.gov.gh"),
    ]
    .into_iter()
    .map(|(name, email)| (name.to_string(), email.to_string()))
    .collect()
}

/// Port the wizard engine talks to at submission time.
pub trait ReferralNotifier {
    fn notify(
        &self,
        record: &CaseRecord,
    ) -> impl std::future::Future<Output = Result<ReferralOutcome, NotifyError>> + Send;
}

/// Delivers referrals through a mail-relay HTTP API.
pub struct EmailRelayNotifier {
    http: reqwest::Client,
    relay_url: String,
    service_id: String,
    template_id: String,
    public_key: String,
    labs: HashMap<String, String>,
}

impl EmailRelayNotifier {
    pub fn new(
        service_id: impl Into<String>,
        template_id: impl Into<String>,
        public_key: impl Into<String>,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            relay_url: config::DEFAULT_MAIL_RELAY_URL.to_string(),
            service_id: service_id.into(),
            template_id: template_id.into(),
            public_key: public_key.into(),
            labs: default_laboratories(),
        }
    }

    pub fn with_relay_url(mut self, url: impl Into<String>) -> Self {
        self.relay_url = url.into();
        self
    }

    pub fn with_laboratories(mut self, labs: HashMap<String, String>) -> Self {
        self.labs = labs;
        self
    }
}

impl ReferralNotifier for EmailRelayNotifier {
    async fn notify(&self, record: &CaseRecord) -> Result<ReferralOutcome, NotifyError> {
        let payload = match referral_payload(record, &self.labs) {
            Ok(payload) => payload,
            Err(outcome) => return Ok(outcome),
        };

        let body = serde_json::json!({
            "service_id": self.service_id,
            "template_id": self.template_id,
            "user_id": self.public_key,
            "template_params": payload,
        });

        let response = self.http.post(&self.relay_url).json(&body).send().await?;
        if !response.status().is_success() {
            return Err(NotifyError::Rejected(response.status()));
        }

        tracing::info!(case_id = %payload.case_id, lab = %payload.lab_name, "referral sent");
        Ok(ReferralOutcome::Sent)
    }
}

/// Notifier that never sends anything. For sessions without a configured
/// relay, and for tests.
pub struct NullNotifier;

impl ReferralNotifier for NullNotifier {
    async fn notify(&self, record: &CaseRecord) -> Result<ReferralOutcome, NotifyError> {
        Ok(referral_payload(record, &default_laboratories())
            .err()
            .unwrap_or(ReferralOutcome::NotRequested))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FormSnapshot;

    fn referred_record(lab: &str) -> CaseRecord {
        let mut snapshot = FormSnapshot::new();
        snapshot.set(fields::SEND_TO_LAB, "yes");
        snapshot.set(fields::SELECTED_LAB, lab);
        snapshot.set(fields::TYPE_OF_CASE, "animal");
        snapshot.set(fields::SAMPLE_TYPE, "Serum Sample");
        snapshot.set(fields::REGION, "Ashanti");
        snapshot.set(fields::DISTRICT, "Obuasi");
        snapshot.set(fields::OFFICER_NAME, "Ama Mensah");
        snapshot.set(fields::CONTACT_NUMBER, "+233200000000");
        CaseRecord::new("ASH-OBU-20250110-001", snapshot)
    }

    #[test]
    fn not_requested_when_send_to_lab_no() {
        let mut snapshot = FormSnapshot::new();
        snapshot.set(fields::SEND_TO_LAB, "no");
        let record = CaseRecord::new("ASH-OBU-20250110-001", snapshot);
        assert_eq!(
            referral_payload(&record, &default_laboratories()),
            Err(ReferralOutcome::NotRequested)
        );
    }

    #[test]
    fn yes_is_case_insensitive() {
        let mut snapshot = FormSnapshot::new();
        snapshot.set(fields::SEND_TO_LAB, "Yes");
        snapshot.set(fields::SELECTED_LAB, "Kumasi Veterinary Lab");
        let record = CaseRecord::new("ASH-OBU-20250110-001", snapshot);
        assert!(referral_payload(&record, &default_laboratories()).is_ok());
    }

    #[test]
    fn unknown_lab_skips() {
        let record = referred_record("Village Clinic");
        assert_eq!(
            referral_payload(&record, &default_laboratories()),
            Err(ReferralOutcome::UnknownLab)
        );
    }

    #[test]
    fn unset_lab_skips() {
        let mut snapshot = FormSnapshot::new();
        snapshot.set(fields::SEND_TO_LAB, "yes");
        let record = CaseRecord::new("ASH-OBU-20250110-001", snapshot);
        assert_eq!(
            referral_payload(&record, &default_laboratories()),
            Err(ReferralOutcome::UnknownLab)
        );
    }

    #[test]
    fn payload_carries_finalized_case_id_and_address() {
        let record = referred_record("Kumasi Veterinary Lab");
        let payload = referral_payload(&record, &default_laboratories()).unwrap();
        assert_eq!(payload.case_id, "ASH-OBU-20250110-001");
        assert_eq!(payload.to_email, "kumasi.lab@vsd.gov.gh");
        assert_eq!(payload.lab_name, "Kumasi Veterinary Lab");
        assert_eq!(payload.officer_name, "Ama Mensah");
    }
}
