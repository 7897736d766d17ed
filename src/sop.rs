//! SOP document registry with a time-limited trash.
//!
//! Deleted documents sit in the trash for 30 days and can be restored;
//! anything older is purged every time the repository loads.

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::models::{SopCategory, SopRecord, TrashedSop};
use crate::store::{ns, FieldStore, StoreError};

/// Trash retention window.
pub const TRASH_RETENTION_DAYS: i64 = 30;

/// Store-backed SOP collection. Construct via [`SopRepository::load`],
/// which also purges expired trash entries.
pub struct SopRepository<S> {
    store: S,
}

impl<S: FieldStore> SopRepository<S> {
    /// Open the repository and purge trash entries past retention.
    pub fn load(store: S) -> Result<Self, StoreError> {
        let mut repo = Self { store };
        repo.purge_expired(Utc::now())?;
        Ok(repo)
    }

    /// Register an uploaded SOP document.
    pub fn upload(
        &mut self,
        name: impl Into<String>,
        category: SopCategory,
        subcategory: Option<String>,
        file_url: impl Into<String>,
    ) -> Result<SopRecord, StoreError> {
        let record = SopRecord {
            id: Uuid::new_v4(),
            name: name.into(),
            category,
            subcategory,
            uploaded_at: Utc::now(),
            file_url: file_url.into(),
        };
        let value = serde_json::to_value(&record)?;
        self.store.put(ns::SOPS, &record.id.to_string(), &value)?;
        Ok(record)
    }

    /// All registered SOPs in a category.
    pub fn list(&self, category: SopCategory) -> Result<Vec<SopRecord>, StoreError> {
        let mut records = Vec::new();
        for key in self.store.keys(ns::SOPS)? {
            if let Some(value) = self.store.get(ns::SOPS, &key)? {
                let record: SopRecord = serde_json::from_value(value)?;
                if record.category == category {
                    records.push(record);
                }
            }
        }
        Ok(records)
    }

    /// Move a document to the trash. Unknown ids are ignored.
    pub fn delete(&mut self, id: Uuid) -> Result<(), StoreError> {
        self.delete_at(id, Utc::now())
    }

    fn delete_at(&mut self, id: Uuid, now: DateTime<Utc>) -> Result<(), StoreError> {
        let key = id.to_string();
        let Some(value) = self.store.get(ns::SOPS, &key)? else {
            return Ok(());
        };
        let record: SopRecord = serde_json::from_value(value)?;

        let trashed = TrashedSop { record, deleted_at: now };
        let value = serde_json::to_value(&trashed)?;
        self.store.put(ns::SOP_TRASH, &key, &value)?;
        self.store.remove(ns::SOPS, &key)
    }

    /// Bring a trashed document back into its category.
    pub fn restore(&mut self, id: Uuid) -> Result<(), StoreError> {
        let key = id.to_string();
        let Some(value) = self.store.get(ns::SOP_TRASH, &key)? else {
            return Ok(());
        };
        let trashed: TrashedSop = serde_json::from_value(value)?;

        let value = serde_json::to_value(&trashed.record)?;
        self.store.put(ns::SOPS, &key, &value)?;
        self.store.remove(ns::SOP_TRASH, &key)
    }

    /// Current trash contents, newest deletion first.
    pub fn trash(&self) -> Result<Vec<TrashedSop>, StoreError> {
        let mut entries = Vec::new();
        for key in self.store.keys(ns::SOP_TRASH)? {
            if let Some(value) = self.store.get(ns::SOP_TRASH, &key)? {
                entries.push(serde_json::from_value::<TrashedSop>(value)?);
            }
        }
        entries.sort_by(|a, b| b.deleted_at.cmp(&a.deleted_at));
        Ok(entries)
    }

    fn purge_expired(&mut self, now: DateTime<Utc>) -> Result<(), StoreError> {
        let cutoff = now - Duration::days(TRASH_RETENTION_DAYS);
        for key in self.store.keys(ns::SOP_TRASH)? {
            if let Some(value) = self.store.get(ns::SOP_TRASH, &key)? {
                let trashed: TrashedSop = serde_json::from_value(value)?;
                if trashed.deleted_at < cutoff {
                    tracing::debug!(sop = %trashed.record.name, "purging expired SOP from trash");
                    self.store.remove(ns::SOP_TRASH, &key)?;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryFieldStore;

    fn repo() -> SopRepository<MemoryFieldStore> {
        SopRepository::load(MemoryFieldStore::new()).unwrap()
    }

    #[test]
    fn upload_then_list_by_category() {
        let mut repo = repo();
        repo.upload(
            "bacteriology-v2.pdf",
            SopCategory::Procedures,
            Some("Bacteriology".into()),
            "file:///sops/bacteriology-v2.pdf",
        )
        .unwrap();
        repo.upload("autoclave.pdf", SopCategory::Equipment, None, "file:///sops/autoclave.pdf")
            .unwrap();

        let procedures = repo.list(SopCategory::Procedures).unwrap();
        assert_eq!(procedures.len(), 1);
        assert_eq!(procedures[0].name, "bacteriology-v2.pdf");
        assert_eq!(repo.list(SopCategory::Policies).unwrap().len(), 0);
    }

    #[test]
    fn delete_moves_to_trash_and_restore_brings_back() {
        let mut repo = repo();
        let record = repo
            .upload("waste.pdf", SopCategory::Procedures, Some("Waste Management".into()), "file:///waste.pdf")
            .unwrap();

        repo.delete(record.id).unwrap();
        assert!(repo.list(SopCategory::Procedures).unwrap().is_empty());
        assert_eq!(repo.trash().unwrap().len(), 1);

        repo.restore(record.id).unwrap();
        assert_eq!(repo.list(SopCategory::Procedures).unwrap().len(), 1);
        assert!(repo.trash().unwrap().is_empty());
    }

    #[test]
    fn purge_drops_only_entries_past_retention() {
        let mut repo = repo();
        let old = repo
            .upload("old.pdf", SopCategory::Policies, None, "file:///old.pdf")
            .unwrap();
        let recent = repo
            .upload("recent.pdf", SopCategory::Policies, None, "file:///recent.pdf")
            .unwrap();

        let now = Utc::now();
        repo.delete_at(old.id, now - Duration::days(31)).unwrap();
        repo.delete_at(recent.id, now - Duration::days(29)).unwrap();

        repo.purge_expired(now).unwrap();
        let trash = repo.trash().unwrap();
        assert_eq!(trash.len(), 1);
        assert_eq!(trash[0].record.id, recent.id);
    }
}
