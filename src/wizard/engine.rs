use std::collections::BTreeSet;

use crate::models::snapshot::{fields, FieldValue, FormSnapshot};
use crate::models::CaseRecord;
use crate::referral::ReferralNotifier;
use crate::store::{ns, FieldStore, StoreError};

use super::steps::{self, Step, StepId};
use super::{case_id, validate, WizardError};

/// The sequential form state machine.
///
/// Owns the snapshot and the navigation state; the store and notifier are
/// injected. One engine instance is one reporting session.
pub struct WizardEngine<S, N> {
    store: S,
    notifier: N,
    snapshot: FormSnapshot,
    current: usize,
    completed: BTreeSet<StepId>,
    read_only: bool,
}

impl<S: FieldStore, N: ReferralNotifier> WizardEngine<S, N> {
    /// Start a fresh session with an empty snapshot.
    pub fn new(store: S, notifier: N) -> Self {
        Self {
            store,
            notifier,
            snapshot: FormSnapshot::new(),
            current: 0,
            completed: BTreeSet::new(),
            read_only: false,
        }
    }

    pub fn snapshot(&self) -> &FormSnapshot {
        &self.snapshot
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    pub fn completed_steps(&self) -> &BTreeSet<StepId> {
        &self.completed
    }

    /// The active step sequence, recomputed from the snapshot on every
    /// call. Editing `placeOfWork` reshapes this list, so indices held
    /// across edits are meaningless; hold on to step ids instead.
    pub fn steps(&self) -> Vec<Step> {
        steps::compute_steps(&self.snapshot)
    }

    /// Current position, clamped into the active sequence.
    pub fn current_index(&self) -> usize {
        self.clamp(&self.steps())
    }

    pub fn current_step(&self) -> Step {
        let steps = self.steps();
        steps[self.clamp(&steps)]
    }

    fn clamp(&self, steps: &[Step]) -> usize {
        self.current.min(steps.len().saturating_sub(1))
    }

    /// Apply a field edit from a step input. Read-only sessions ignore
    /// edits, mirroring the disabled inputs.
    pub fn set_field(&mut self, field: impl Into<String>, value: impl Into<FieldValue>) {
        if self.read_only {
            return;
        }
        self.snapshot.set(field, value);
    }

    /// Advance to the next step.
    ///
    /// The current step must validate; otherwise no transition happens and
    /// the error names the first missing field. On success the current
    /// step is marked complete and the index advances, clamped to the last
    /// step.
    pub fn go_next(&mut self) -> Result<usize, WizardError> {
        let steps = self.steps();
        let index = self.clamp(&steps);
        let step = steps[index];

        validate::validate(step.id, &self.snapshot).map_err(|field| {
            WizardError::MissingField {
                field,
                label: validate::display_name(field),
            }
        })?;

        self.completed.insert(step.id);
        if index + 1 < steps.len() {
            self.current = index + 1;
        } else {
            self.current = index;
        }
        Ok(self.current)
    }

    /// Step back one page. Never validated, floored at the first step.
    pub fn go_back(&mut self) -> usize {
        let steps = self.steps();
        self.current = self.clamp(&steps).saturating_sub(1);
        self.current
    }

    /// Jump directly to a step, if it is unlocked. A locked target leaves
    /// the position unchanged and surfaces a warning to the caller.
    pub fn jump_to(&mut self, target: usize) -> Result<usize, WizardError> {
        let steps = self.steps();
        let current = self.clamp(&steps);

        if target >= steps.len()
            || !steps::is_unlocked(target, current, &steps, &self.completed)
        {
            return Err(WizardError::LockedStep { index: target });
        }

        self.current = target;
        Ok(self.current)
    }

    /// Replace the session with a previously submitted case.
    ///
    /// The snapshot is populated wholesale, the session becomes read-only,
    /// and the wizard positions just past the intro step.
    pub fn load_case(&mut self, case_id: &str) -> Result<(), WizardError> {
        let value = self
            .store
            .get(ns::CASES, case_id)?
            .ok_or_else(|| WizardError::CaseNotFound(case_id.to_string()))?;

        let snapshot: FormSnapshot =
            serde_json::from_value(value).map_err(|e| StoreError::Corrupt {
                namespace: ns::CASES.to_string(),
                key: case_id.to_string(),
                reason: e.to_string(),
            })?;

        self.snapshot = snapshot;
        self.read_only = true;
        let steps = self.steps();
        self.current = 1.min(steps.len().saturating_sub(1));
        Ok(())
    }

    /// Final submission.
    ///
    /// Resolves the case id (generating and writing it back if absent),
    /// persists the record keyed by that id, and triggers the referral
    /// notification. Notification failures are logged and never fail the
    /// submission. Returns the finalized record for the confirmation view.
    pub async fn submit(&mut self) -> Result<CaseRecord, WizardError> {
        let case_id = case_id::resolve(&self.snapshot, &mut self.store)?;
        self.snapshot.set(fields::CASE_ID, case_id.clone());

        let record = CaseRecord::new(case_id, self.snapshot.clone());
        let value = serde_json::to_value(&record.snapshot).map_err(StoreError::from)?;
        self.store.put(ns::CASES, &record.case_id, &value)?;

        match self.notifier.notify(&record).await {
            Ok(outcome) => {
                tracing::debug!(case_id = %record.case_id, ?outcome, "referral notification");
            }
            Err(err) => {
                tracing::warn!(case_id = %record.case_id, error = %err, "referral notification failed");
            }
        }

        Ok(record)
    }
}
