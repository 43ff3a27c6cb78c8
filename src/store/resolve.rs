//! Display-time FormID name resolution.
//!
//! Grounded on `fo76datamine/db/resolve.py`: resolves opaque
//! `0x003AB2C1`-style hex strings to a human-readable name by looking up the
//! record's `full_name` or `editor_id`. Resolution happens at *display*
//! time only, never at storage time, so the diff engine keeps comparing raw
//! `field_value` strings across snapshots.

use std::cell::RefCell;
use std::collections::HashMap;

use super::models::DecodedField;
use super::{Result, Store};

/// Lazy-loading FormID -> display name resolver, scoped to one snapshot.
pub struct FormIdResolver<'a> {
    store: &'a Store,
    snapshot_id: i64,
    cache: RefCell<Option<HashMap<u32, String>>>,
}

impl<'a> FormIdResolver<'a> {
    pub fn new(store: &'a Store, snapshot_id: i64) -> Self {
        FormIdResolver { store, snapshot_id, cache: RefCell::new(None) }
    }

    /// Bulk-load every `form_id -> name` mapping for the snapshot in one query.
    fn load(&self) -> Result<()> {
        let mut stmt = self
            .store
            .conn
            .prepare("SELECT form_id, full_name, editor_id FROM records WHERE snapshot_id=?1")?;
        let mut rows = stmt.query([self.snapshot_id])?;
        let mut cache = HashMap::new();
        while let Some(row) = rows.next()? {
            let form_id: i64 = row.get(0)?;
            let full_name: Option<String> = row.get(1)?;
            let editor_id: Option<String> = row.get(2)?;
            if let Some(name) = full_name.or(editor_id) {
                cache.insert(form_id as u32, name);
            }
        }
        *self.cache.borrow_mut() = Some(cache);
        Ok(())
    }

    /// Parse a `"0x003AB2C1"` string and return the record's display name, if any.
    pub fn resolve_name(&self, hex_str: &str) -> Option<String> {
        if self.cache.borrow().is_none() {
            self.load().ok()?;
        }
        let form_id = u32::from_str_radix(hex_str.trim_start_matches("0x"), 16).ok()?;
        self.cache.borrow().as_ref()?.get(&form_id).cloned()
    }

    /// Display string for a decoded field: appends `" (Name)"` for formid-typed fields.
    pub fn format_field_value(&self, field: &DecodedField) -> String {
        if field.field_type == "formid" {
            if let Some(name) = self.resolve_name(&field.field_value) {
                return format!("{} ({})", field.field_value, name);
            }
        }
        field.field_value.clone()
    }

    /// Format a raw value string given its field type.
    pub fn format_value(&self, value: &str, field_type: &str) -> String {
        if field_type == "formid" {
            if let Some(name) = self.resolve_name(value) {
                return format!("{value} ({name})");
            }
        }
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::DbRecord;

    fn rec(form_id: u32, full_name: Option<&str>, editor_id: Option<&str>) -> DbRecord {
        DbRecord {
            snapshot_id: 0,
            form_id,
            record_type: "MISC".into(),
            editor_id: editor_id.map(String::from),
            full_name: full_name.map(String::from),
            full_name_id: None,
            desc_text: None,
            desc_id: None,
            data_hash: "h".into(),
            flags: 0,
            data_size: 0,
        }
    }

    #[test]
    fn resolves_full_name_over_editor_id() {
        let mut store = Store::open_in_memory().unwrap();
        let id = store.create_snapshot("t", "h", 0).unwrap();
        store.insert_records(id, &[rec(0x100, Some("Rusty Gun"), Some("EditorName"))]).unwrap();
        let resolver = FormIdResolver::new(&store, id);
        assert_eq!(resolver.resolve_name("0x00000100"), Some("Rusty Gun".to_string()));
    }

    #[test]
    fn falls_back_to_editor_id_when_no_full_name() {
        let mut store = Store::open_in_memory().unwrap();
        let id = store.create_snapshot("t", "h", 0).unwrap();
        store.insert_records(id, &[rec(0x100, None, Some("EditorName"))]).unwrap();
        let resolver = FormIdResolver::new(&store, id);
        assert_eq!(resolver.resolve_name("0x100"), Some("EditorName".to_string()));
    }

    #[test]
    fn format_field_value_appends_name_only_for_formid_type() {
        let mut store = Store::open_in_memory().unwrap();
        let id = store.create_snapshot("t", "h", 0).unwrap();
        store.insert_records(id, &[rec(0x100, Some("Thing"), None)]).unwrap();
        let resolver = FormIdResolver::new(&store, id);
        let formid_field = DecodedField {
            snapshot_id: id,
            form_id: 1,
            field_name: "keyword_0".into(),
            field_value: "0x00000100".into(),
            field_type: "formid".into(),
        };
        assert_eq!(resolver.format_field_value(&formid_field), "0x00000100 (Thing)");

        let str_field = DecodedField { field_type: "str".into(), ..formid_field };
        assert_eq!(resolver.format_field_value(&str_field), "0x00000100");
    }

    #[test]
    fn unresolvable_form_id_returns_plain_value() {
        let store = Store::open_in_memory().unwrap();
        let resolver = FormIdResolver::new(&store, 1);
        assert_eq!(resolver.resolve_name("0xDEADBEEF"), None);
    }
}
