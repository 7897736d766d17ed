use chrono::{Local, NaiveDate};

use crate::models::snapshot::{fields, FormSnapshot};
use crate::store::{self, FieldStore, StoreError};

/// Resolve the case id for a snapshot, generating one if absent.
///
/// Idempotent once set: a non-empty `caseID` already on the snapshot is
/// returned unchanged. Callers must write a freshly generated id back to
/// the snapshot before resolving again; no de-duplication happens here.
pub fn resolve<S: FieldStore + ?Sized>(
    snapshot: &FormSnapshot,
    store: &mut S,
) -> Result<String, StoreError> {
    resolve_on(snapshot, store, Local::now().date_naive())
}

/// Same as [`resolve`] with an explicit date, for deterministic callers.
pub fn resolve_on<S: FieldStore + ?Sized>(
    snapshot: &FormSnapshot,
    store: &mut S,
    date: NaiveDate,
) -> Result<String, StoreError> {
    if let Some(existing) = snapshot.text(fields::CASE_ID) {
        if !existing.trim().is_empty() {
            return Ok(existing.to_string());
        }
    }

    let region = short_code(snapshot.text(fields::REGION).unwrap_or_default(), "REG");
    let district = short_code(snapshot.text(fields::DISTRICT).unwrap_or_default(), "UNK");
    let key = format!("{region}-{district}-{}", date.format("%Y%m%d"));

    // Sequence numbers are monotonic per composite key for this store's
    // lifetime. Nothing reserves them centrally; two devices can mint the
    // same id on the same day.
    let seq = store::next_count(store, &key)?;
    Ok(format!("{key}-{seq:03}"))
}

/// 3-letter uppercase code from a user-entered name. Whitespace is
/// stripped first; blank input falls back to the default code.
fn short_code(name: &str, default: &str) -> String {
    let stripped: String = name.chars().filter(|c| !c.is_whitespace()).collect();
    if stripped.is_empty() {
        return default.to_string();
    }
    stripped.chars().take(3).collect::<String>().to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryFieldStore;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 10).unwrap()
    }

    fn snapshot(region: &str, district: &str) -> FormSnapshot {
        let mut snapshot = FormSnapshot::new();
        snapshot.set(fields::REGION, region);
        snapshot.set(fields::DISTRICT, district);
        snapshot
    }

    #[test]
    fn formats_region_district_date_sequence() {
        let mut store = MemoryFieldStore::new();
        let id = resolve_on(&snapshot("Ashanti", "Obuasi"), &mut store, day()).unwrap();
        assert_eq!(id, "ASH-OBU-20250110-001");
    }

    #[test]
    fn consecutive_submissions_differ_by_one() {
        let mut store = MemoryFieldStore::new();
        let first = resolve_on(&snapshot("Ashanti", "Obuasi"), &mut store, day()).unwrap();
        let second = resolve_on(&snapshot("Ashanti", "Obuasi"), &mut store, day()).unwrap();
        assert_eq!(first, "ASH-OBU-20250110-001");
        assert_eq!(second, "ASH-OBU-20250110-002");
    }

    #[test]
    fn defaults_apply_when_names_blank() {
        let mut store = MemoryFieldStore::new();
        let id = resolve_on(&FormSnapshot::new(), &mut store, day()).unwrap();
        assert_eq!(id, "REG-UNK-20250110-001");
    }

    #[test]
    fn whitespace_in_names_is_stripped() {
        let mut store = MemoryFieldStore::new();
        let id = resolve_on(
            &snapshot("Greater Accra", " O b u a s i "),
            &mut store,
            day(),
        )
        .unwrap();
        assert_eq!(id, "GRE-OBU-20250110-001");
    }

    #[test]
    fn existing_id_returned_unchanged() {
        let mut store = MemoryFieldStore::new();
        let mut form = snapshot("Ashanti", "Obuasi");
        let first = resolve_on(&form, &mut store, day()).unwrap();
        form.set(fields::CASE_ID, first.clone());

        let second = resolve_on(&form, &mut store, day()).unwrap();
        assert_eq!(first, second);
        // and the counter did not advance
        let fresh = resolve_on(&snapshot("Ashanti", "Obuasi"), &mut store, day()).unwrap();
        assert_eq!(fresh, "ASH-OBU-20250110-002");
    }

    #[test]
    fn different_districts_use_independent_sequences() {
        let mut store = MemoryFieldStore::new();
        let a = resolve_on(&snapshot("Ashanti", "Obuasi"), &mut store, day()).unwrap();
        let b = resolve_on(&snapshot("Ashanti", "Ejisu"), &mut store, day()).unwrap();
        assert_eq!(a, "ASH-OBU-20250110-001");
        assert_eq!(b, "ASH-EJI-20250110-001");
    }
}
