//! Row types returned by `Store` queries.
//!
//! Ground truth is `fo76datamine/db/models.py`'s dataclasses: same field
//! sets, same optional/required split.

/// One persisted datamining run.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub id: i64,
    pub label: String,
    pub created_at: String,
    pub esm_hash: String,
    pub esm_size: i64,
    pub record_count: i64,
    pub string_count: i64,
    pub has_subrecords: bool,
}

impl Snapshot {
    /// Parses the stored `datetime('now')` string (`YYYY-MM-DD HH:MM:SS`, UTC)
    /// into a `chrono` timestamp for display. `None` if the column ever holds
    /// something else, e.g. a hand-inserted row in a test fixture.
    pub fn created_at_utc(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        chrono::NaiveDateTime::parse_from_str(&self.created_at, "%Y-%m-%d %H:%M:%S")
            .ok()
            .map(|naive| naive.and_utc())
    }
}

/// A record stored in the database.
#[derive(Debug, Clone, PartialEq)]
pub struct DbRecord {
    pub snapshot_id: i64,
    pub form_id: u32,
    pub record_type: String,
    pub editor_id: Option<String>,
    pub full_name: Option<String>,
    pub full_name_id: Option<u32>,
    pub desc_text: Option<String>,
    pub desc_id: Option<u32>,
    pub data_hash: String,
    pub flags: u32,
    pub data_size: u32,
}

impl DbRecord {
    pub fn form_id_hex(&self) -> String {
        format!("0x{:08X}", self.form_id)
    }
}

/// A decoded named field value.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedField {
    pub snapshot_id: i64,
    pub form_id: u32,
    pub field_name: String,
    pub field_value: String,
    pub field_type: String,
}

/// A localized string stored in the database.
#[derive(Debug, Clone, PartialEq)]
pub struct DbString {
    pub snapshot_id: i64,
    pub string_id: u32,
    pub text: String,
    pub source: String,
}

/// A single field-level change between two record versions.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldChange {
    pub form_id: u32,
    pub field_name: String,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
    pub field_type: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot_with_created_at(created_at: &str) -> Snapshot {
        Snapshot {
            id: 1,
            label: "t".into(),
            created_at: created_at.into(),
            esm_hash: "h".into(),
            esm_size: 0,
            record_count: 0,
            string_count: 0,
            has_subrecords: false,
        }
    }

    #[test]
    fn created_at_utc_parses_sqlite_datetime_format() {
        let snap = snapshot_with_created_at("2026-03-05 14:30:00");
        let parsed = snap.created_at_utc().unwrap();
        assert_eq!(parsed.format("%Y-%m-%d").to_string(), "2026-03-05");
    }

    #[test]
    fn created_at_utc_returns_none_for_unparseable_string() {
        let snap = snapshot_with_created_at("not a timestamp");
        assert!(snap.created_at_utc().is_none());
    }
}
