//! Snapshot comparison: form-id set difference plus field-level diffing.
//!
//! Grounded on `fo76datamine/diff/engine.py`'s `DiffEngine`: same
//! `data_hash`-driven added/removed/modified split, same deterministic
//! ascending form-id iteration, same cross-store comparison support (an old
//! snapshot read from one `Store`, a new snapshot read from another, with no
//! shared cursors).

pub mod filters;

use crate::store::{DbRecord, FieldChange, Result, Store};

/// Result of comparing two snapshots.
#[derive(Debug, Default)]
pub struct DiffResult {
    pub old_snapshot_id: i64,
    pub new_snapshot_id: i64,
    pub added: Vec<DbRecord>,
    pub removed: Vec<DbRecord>,
    pub modified: Vec<(DbRecord, DbRecord)>,
    pub field_changes: std::collections::HashMap<u32, Vec<FieldChange>>,
}

impl DiffResult {
    pub fn total_changes(&self) -> usize {
        self.added.len() + self.removed.len() + self.modified.len()
    }
}

/// Compares two snapshots, optionally held in different stores.
pub struct DiffEngine<'a> {
    old_store: &'a Store,
    new_store: &'a Store,
}

impl<'a> DiffEngine<'a> {
    pub fn new(store: &'a Store) -> Self {
        DiffEngine { old_store: store, new_store: store }
    }

    pub fn cross_store(old_store: &'a Store, new_store: &'a Store) -> Self {
        DiffEngine { old_store, new_store }
    }

    /// Compare `old_id` against `new_id`, optionally restricted to one record type.
    pub fn compare(&self, old_id: i64, new_id: i64, record_type: Option<&str>) -> Result<DiffResult> {
        let mut result = DiffResult { old_snapshot_id: old_id, new_snapshot_id: new_id, ..Default::default() };

        let old_hashes = self.old_store.get_record_hashes(old_id)?;
        let new_hashes = self.new_store.get_record_hashes(new_id)?;

        let old_ids: std::collections::BTreeSet<u32> = old_hashes.keys().copied().collect();
        let new_ids: std::collections::BTreeSet<u32> = new_hashes.keys().copied().collect();

        for &fid in new_ids.difference(&old_ids) {
            if let Some(rec) = self.new_store.get_record(new_id, fid)? {
                if record_type.map_or(true, |rt| rec.record_type == rt) {
                    result.added.push(rec);
                }
            }
        }

        for &fid in old_ids.difference(&new_ids) {
            if let Some(rec) = self.old_store.get_record(old_id, fid)? {
                if record_type.map_or(true, |rt| rec.record_type == rt) {
                    result.removed.push(rec);
                }
            }
        }

        for &fid in old_ids.intersection(&new_ids) {
            if old_hashes[&fid] == new_hashes[&fid] {
                continue;
            }
            let old_rec = self.old_store.get_record(old_id, fid)?;
            let new_rec = self.new_store.get_record(new_id, fid)?;
            if let (Some(old_rec), Some(new_rec)) = (old_rec, new_rec) {
                if record_type.map_or(true, |rt| old_rec.record_type == rt) {
                    let changes = self.diff_fields(old_id, new_id, fid)?;
                    if !changes.is_empty() {
                        result.field_changes.insert(fid, changes);
                    }
                    result.modified.push((old_rec, new_rec));
                }
            }
        }

        Ok(result)
    }

    fn diff_fields(&self, old_id: i64, new_id: i64, form_id: u32) -> Result<Vec<FieldChange>> {
        let old_fields: std::collections::HashMap<String, (String, String)> = self
            .old_store
            .get_decoded_fields(old_id, form_id)?
            .into_iter()
            .map(|f| (f.field_name, (f.field_value, f.field_type)))
            .collect();
        let new_fields: std::collections::HashMap<String, (String, String)> = self
            .new_store
            .get_decoded_fields(new_id, form_id)?
            .into_iter()
            .map(|f| (f.field_name, (f.field_value, f.field_type)))
            .collect();

        let mut names: Vec<&String> = old_fields.keys().chain(new_fields.keys()).collect();
        names.sort();
        names.dedup();

        let mut changes = Vec::new();
        for name in names {
            let old = old_fields.get(name);
            let new = new_fields.get(name);
            let old_val = old.map(|(v, _)| v.clone());
            let new_val = new.map(|(v, _)| v.clone());
            if old_val == new_val {
                continue;
            }
            let field_type = new
                .map(|(_, t)| t.clone())
                .or_else(|| old.map(|(_, t)| t.clone()))
                .unwrap_or_else(|| "str".to_string());
            changes.push(FieldChange { form_id, field_name: name.clone(), old_value: old_val, new_value: new_val, field_type });
        }
        Ok(changes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::DbRecord;

    fn rec(form_id: u32, hash: &str) -> DbRecord {
        DbRecord {
            snapshot_id: 0,
            form_id,
            record_type: "WEAP".into(),
            editor_id: None,
            full_name: None,
            full_name_id: None,
            desc_text: None,
            desc_id: None,
            data_hash: hash.into(),
            flags: 0,
            data_size: 0,
        }
    }

    #[test]
    fn detects_added_removed_modified() {
        let mut store = Store::open_in_memory().unwrap();
        let old = store.create_snapshot("old", "h", 0).unwrap();
        let new = store.create_snapshot("new", "h", 0).unwrap();
        store.insert_records(old, &[rec(0x1, "h1"), rec(0x2, "h2")]).unwrap();
        store.insert_records(new, &[rec(0x2, "h2_changed"), rec(0x3, "h3")]).unwrap();

        let engine = DiffEngine::new(&store);
        let result = engine.compare(old, new, None).unwrap();

        assert_eq!(result.added.len(), 1);
        assert_eq!(result.added[0].form_id, 0x3);
        assert_eq!(result.removed.len(), 1);
        assert_eq!(result.removed[0].form_id, 0x1);
        assert_eq!(result.modified.len(), 1);
        assert_eq!(result.modified[0].0.form_id, 0x2);
    }

    #[test]
    fn unchanged_hash_is_not_reported_modified() {
        let mut store = Store::open_in_memory().unwrap();
        let old = store.create_snapshot("old", "h", 0).unwrap();
        let new = store.create_snapshot("new", "h", 0).unwrap();
        store.insert_records(old, &[rec(0x1, "same")]).unwrap();
        store.insert_records(new, &[rec(0x1, "same")]).unwrap();

        let result = DiffEngine::new(&store).compare(old, new, None).unwrap();
        assert_eq!(result.total_changes(), 0);
    }

    #[test]
    fn field_level_diff_reports_changed_values_only() {
        let mut store = Store::open_in_memory().unwrap();
        let old = store.create_snapshot("old", "h", 0).unwrap();
        let new = store.create_snapshot("new", "h", 0).unwrap();
        store.insert_records(old, &[rec(0x1, "h1")]).unwrap();
        store.insert_records(new, &[rec(0x1, "h2")]).unwrap();
        store
            .insert_decoded_fields(
                old,
                &[crate::store::DecodedField {
                    snapshot_id: old,
                    form_id: 0x1,
                    field_name: "damage".into(),
                    field_value: "10".into(),
                    field_type: "float".into(),
                }],
            )
            .unwrap();
        store
            .insert_decoded_fields(
                new,
                &[crate::store::DecodedField {
                    snapshot_id: new,
                    form_id: 0x1,
                    field_name: "damage".into(),
                    field_value: "20".into(),
                    field_type: "float".into(),
                }],
            )
            .unwrap();

        let result = DiffEngine::new(&store).compare(old, new, None).unwrap();
        let changes = &result.field_changes[&0x1];
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].old_value.as_deref(), Some("10"));
        assert_eq!(changes[0].new_value.as_deref(), Some("20"));
    }

    #[test]
    fn record_type_filter_restricts_results() {
        let mut store = Store::open_in_memory().unwrap();
        let old = store.create_snapshot("old", "h", 0).unwrap();
        let new = store.create_snapshot("new", "h", 0).unwrap();
        store.insert_records(old, &[]).unwrap();
        let mut armo = rec(0x5, "h5");
        armo.record_type = "ARMO".into();
        store.insert_records(new, &[rec(0x4, "h4"), armo]).unwrap();

        let result = DiffEngine::new(&store).compare(old, new, Some("WEAP")).unwrap();
        assert_eq!(result.added.len(), 1);
        assert_eq!(result.added[0].form_id, 0x4);
    }
}
