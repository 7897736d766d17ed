use super::snapshot::{fields, FormSnapshot};

/// A finalized case report: the form snapshot with its assigned case id.
///
/// Created once at submission. The snapshot carries the id in its own
/// `caseID` field so the persisted form reads back byte-for-byte.
#[derive(Debug, Clone, PartialEq)]
pub struct CaseRecord {
    pub case_id: String,
    pub snapshot: FormSnapshot,
}

impl CaseRecord {
    /// Build a record from a snapshot, writing the id into the snapshot.
    pub fn new(case_id: impl Into<String>, mut snapshot: FormSnapshot) -> Self {
        let case_id = case_id.into();
        snapshot.set(fields::CASE_ID, case_id.clone());
        Self { case_id, snapshot }
    }

    /// Rebuild a record from a persisted snapshot. `None` when the snapshot
    /// carries no case id, which means it was never submitted.
    pub fn from_snapshot(snapshot: FormSnapshot) -> Option<Self> {
        let case_id = snapshot.text(fields::CASE_ID)?.trim();
        if case_id.is_empty() {
            return None;
        }
        let case_id = case_id.to_string();
        Some(Self { case_id, snapshot })
    }

    pub fn field(&self, name: &str) -> &str {
        self.snapshot.text(name).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_writes_id_into_snapshot() {
        let record = CaseRecord::new("ASH-OBU-20250110-001", FormSnapshot::new());
        assert_eq!(record.snapshot.text(fields::CASE_ID), Some("ASH-OBU-20250110-001"));
    }

    #[test]
    fn from_snapshot_requires_id() {
        assert!(CaseRecord::from_snapshot(FormSnapshot::new()).is_none());

        let mut snapshot = FormSnapshot::new();
        snapshot.set(fields::CASE_ID, "ASH-OBU-20250110-001");
        let record = CaseRecord::from_snapshot(snapshot).unwrap();
        assert_eq!(record.case_id, "ASH-OBU-20250110-001");
    }
}
