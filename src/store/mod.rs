//! Snapshot store: durable persistence for parsed/decoded ESM content.
//!
//! Grounded on `fo76datamine/db/store.py`'s `Store` class: same pragmas
//! (WAL, `synchronous=NORMAL`, `foreign_keys=ON`, ~64 MiB cache), same table
//! set (`schema`), same operation contract. Batch inserts chunk at 50,000
//! rows per `SPEC_FULL.md` §4.I rather than `store.py`'s unbounded
//! `executemany`, since `rusqlite` has no driver-level limit to lean on.

pub mod leveled_list;
pub mod models;
pub mod resolve;
mod schema;

use std::path::{Path, PathBuf};

use rusqlite::{params, Connection};
use thiserror::Error;

pub use models::{DbRecord, DbString, DecodedField, FieldChange, Snapshot};
pub use resolve::FormIdResolver;

const BATCH_SIZE: usize = 50_000;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("snapshot {0} not found")]
    SnapshotNotFound(i64),
}

pub type Result<T> = std::result::Result<T, Error>;

/// A raw subrecord row, persisted only when the driver runs in "full" mode.
pub struct SubrecordRow {
    pub form_id: u32,
    pub sub_type: String,
    pub sub_index: i64,
    pub data: Vec<u8>,
}

/// Database access layer for the datamining database.
pub struct Store {
    conn: Connection,
    db_path: PathBuf,
}

impl Store {
    pub fn open(db_path: impl AsRef<Path>) -> Result<Self> {
        let db_path = db_path.as_ref().to_path_buf();
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(&db_path)?;
        conn.execute_batch(
            "PRAGMA journal_mode=WAL;
             PRAGMA synchronous=NORMAL;
             PRAGMA foreign_keys=ON;
             PRAGMA cache_size=-64000;",
        )?;
        schema::init_schema(&conn)?;
        Ok(Store { conn, db_path })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        schema::init_schema(&conn)?;
        Ok(Store { conn, db_path: PathBuf::new() })
    }

    // -- Snapshots --

    pub fn create_snapshot(&self, label: &str, esm_hash: &str, esm_size: u64) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO snapshots (label, esm_hash, esm_size) VALUES (?1, ?2, ?3)",
            params![label, esm_hash, esm_size as i64],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn update_snapshot_counts(
        &self,
        snapshot_id: i64,
        record_count: i64,
        string_count: i64,
        has_subrecords: bool,
    ) -> Result<()> {
        self.conn.execute(
            "UPDATE snapshots SET record_count=?1, string_count=?2, has_subrecords=?3 WHERE id=?4",
            params![record_count, string_count, has_subrecords as i64, snapshot_id],
        )?;
        Ok(())
    }

    fn row_to_snapshot(row: &rusqlite::Row) -> rusqlite::Result<Snapshot> {
        Ok(Snapshot {
            id: row.get(0)?,
            label: row.get(1)?,
            created_at: row.get(2)?,
            esm_hash: row.get(3)?,
            esm_size: row.get(4)?,
            record_count: row.get(5)?,
            string_count: row.get(6)?,
            has_subrecords: row.get::<_, i64>(7)? != 0,
        })
    }

    const SNAPSHOT_COLUMNS: &'static str =
        "id, label, created_at, esm_hash, esm_size, record_count, string_count, has_subrecords";

    pub fn get_snapshot(&self, snapshot_id: i64) -> Result<Option<Snapshot>> {
        let sql = format!("SELECT {} FROM snapshots WHERE id=?1", Self::SNAPSHOT_COLUMNS);
        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query_map(params![snapshot_id], Self::row_to_snapshot)?;
        rows.next().transpose().map_err(Error::from)
    }

    pub fn get_latest_snapshot(&self) -> Result<Option<Snapshot>> {
        let sql = format!("SELECT {} FROM snapshots ORDER BY id DESC LIMIT 1", Self::SNAPSHOT_COLUMNS);
        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query_map([], Self::row_to_snapshot)?;
        rows.next().transpose().map_err(Error::from)
    }

    /// Returns `(older, newer)`, or `None` if fewer than two snapshots exist.
    pub fn get_two_latest_snapshots(&self) -> Result<Option<(Snapshot, Snapshot)>> {
        let sql = format!("SELECT {} FROM snapshots ORDER BY id DESC LIMIT 2", Self::SNAPSHOT_COLUMNS);
        let mut stmt = self.conn.prepare(&sql)?;
        let rows: Vec<Snapshot> = stmt
            .query_map([], Self::row_to_snapshot)?
            .collect::<rusqlite::Result<_>>()?;
        if rows.len() < 2 {
            return Ok(None);
        }
        Ok(Some((rows[1].clone(), rows[0].clone())))
    }

    pub fn list_snapshots(&self) -> Result<Vec<Snapshot>> {
        let sql = format!("SELECT {} FROM snapshots ORDER BY id", Self::SNAPSHOT_COLUMNS);
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([], Self::row_to_snapshot)?.collect::<rusqlite::Result<_>>()?;
        Ok(rows)
    }

    pub fn delete_snapshot(&self, snapshot_id: i64) -> Result<()> {
        self.conn.execute("DELETE FROM snapshots WHERE id=?1", params![snapshot_id])?;
        Ok(())
    }

    // -- Batch inserts --

    pub fn insert_records(&mut self, snapshot_id: i64, records: &[DbRecord]) -> Result<()> {
        for chunk in records.chunks(BATCH_SIZE) {
            let tx = self.conn.transaction()?;
            {
                let mut stmt = tx.prepare(
                    "INSERT OR REPLACE INTO records
                     (snapshot_id, form_id, record_type, editor_id, full_name, full_name_id,
                      desc_text, desc_id, data_hash, flags, data_size)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
                )?;
                for r in chunk {
                    stmt.execute(params![
                        snapshot_id,
                        r.form_id,
                        r.record_type,
                        r.editor_id,
                        r.full_name,
                        r.full_name_id,
                        r.desc_text,
                        r.desc_id,
                        r.data_hash,
                        r.flags,
                        r.data_size,
                    ])?;
                }
            }
            tx.commit()?;
        }
        Ok(())
    }

    pub fn insert_decoded_fields(&mut self, snapshot_id: i64, fields: &[DecodedField]) -> Result<()> {
        for chunk in fields.chunks(BATCH_SIZE) {
            let tx = self.conn.transaction()?;
            {
                let mut stmt = tx.prepare(
                    "INSERT OR REPLACE INTO decoded_fields
                     (snapshot_id, form_id, field_name, field_value, field_type)
                     VALUES (?1, ?2, ?3, ?4, ?5)",
                )?;
                for f in chunk {
                    stmt.execute(params![snapshot_id, f.form_id, f.field_name, f.field_value, f.field_type])?;
                }
            }
            tx.commit()?;
        }
        Ok(())
    }

    pub fn insert_strings(&mut self, snapshot_id: i64, strings: &[DbString]) -> Result<()> {
        for chunk in strings.chunks(BATCH_SIZE) {
            let tx = self.conn.transaction()?;
            {
                let mut stmt = tx.prepare(
                    "INSERT OR REPLACE INTO strings (snapshot_id, string_id, text, source)
                     VALUES (?1, ?2, ?3, ?4)",
                )?;
                for s in chunk {
                    stmt.execute(params![snapshot_id, s.string_id, s.text, s.source])?;
                }
            }
            tx.commit()?;
        }
        Ok(())
    }

    pub fn insert_keywords(&mut self, snapshot_id: i64, keywords: &[(u32, String)]) -> Result<()> {
        for chunk in keywords.chunks(BATCH_SIZE) {
            let tx = self.conn.transaction()?;
            {
                let mut stmt =
                    tx.prepare("INSERT OR REPLACE INTO keywords (snapshot_id, form_id, editor_id) VALUES (?1, ?2, ?3)")?;
                for (form_id, editor_id) in chunk {
                    stmt.execute(params![snapshot_id, form_id, editor_id])?;
                }
            }
            tx.commit()?;
        }
        Ok(())
    }

    pub fn insert_subrecords(&mut self, snapshot_id: i64, subrecords: &[SubrecordRow]) -> Result<()> {
        for chunk in subrecords.chunks(BATCH_SIZE) {
            let tx = self.conn.transaction()?;
            {
                let mut stmt = tx.prepare(
                    "INSERT INTO subrecords (snapshot_id, form_id, sub_type, sub_index, data)
                     VALUES (?1, ?2, ?3, ?4, ?5)",
                )?;
                for s in chunk {
                    stmt.execute(params![snapshot_id, s.form_id, s.sub_type, s.sub_index, s.data])?;
                }
            }
            tx.commit()?;
        }
        Ok(())
    }

    // -- Queries --

    fn row_to_record(row: &rusqlite::Row) -> rusqlite::Result<DbRecord> {
        Ok(DbRecord {
            snapshot_id: row.get(0)?,
            form_id: row.get::<_, i64>(1)? as u32,
            record_type: row.get(2)?,
            editor_id: row.get(3)?,
            full_name: row.get(4)?,
            full_name_id: row.get::<_, Option<i64>>(5)?.map(|v| v as u32),
            desc_text: row.get(6)?,
            desc_id: row.get::<_, Option<i64>>(7)?.map(|v| v as u32),
            data_hash: row.get(8)?,
            flags: row.get::<_, i64>(9)? as u32,
            data_size: row.get::<_, i64>(10)? as u32,
        })
    }

    const RECORD_COLUMNS: &'static str = "snapshot_id, form_id, record_type, editor_id, full_name, full_name_id, \
         desc_text, desc_id, data_hash, flags, data_size";

    pub fn get_records_by_type(&self, snapshot_id: i64, record_type: &str) -> Result<Vec<DbRecord>> {
        let sql = format!(
            "SELECT {} FROM records WHERE snapshot_id=?1 AND record_type=?2 ORDER BY form_id",
            Self::RECORD_COLUMNS
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params![snapshot_id, record_type], Self::row_to_record)?
            .collect::<rusqlite::Result<_>>()?;
        Ok(rows)
    }

    pub fn get_record(&self, snapshot_id: i64, form_id: u32) -> Result<Option<DbRecord>> {
        let sql = format!("SELECT {} FROM records WHERE snapshot_id=?1 AND form_id=?2", Self::RECORD_COLUMNS);
        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query_map(params![snapshot_id, form_id], Self::row_to_record)?;
        rows.next().transpose().map_err(Error::from)
    }

    /// Search records by name, editor id, or form id. `edid_pattern` accepts
    /// `*`/`?` glob wildcards, translated to SQL `LIKE` the way `store.py`
    /// does it (`*` -> `%`, `?` -> `_`).
    pub fn search_records(
        &self,
        snapshot_id: i64,
        query: &str,
        record_type: Option<&str>,
        edid_pattern: Option<&str>,
    ) -> Result<Vec<DbRecord>> {
        let mut conditions = vec!["snapshot_id = ?".to_string()];
        let mut params: Vec<Box<dyn rusqlite::ToSql>> = vec![Box::new(snapshot_id)];

        if let Some(rt) = record_type {
            conditions.push("record_type = ?".to_string());
            params.push(Box::new(rt.to_string()));
        }

        if let Some(pat) = edid_pattern {
            let like = pat.replace('*', "%").replace('?', "_");
            conditions.push("editor_id LIKE ?".to_string());
            params.push(Box::new(like));
        }

        if !query.is_empty() {
            let hex_form_id = regex::Regex::new(r"^0[xX][0-9a-fA-F]{1,8}$").expect("static pattern is valid regex");
            let parsed_form_id = if hex_form_id.is_match(query) {
                u32::from_str_radix(&query[2..], 16).ok()
            } else {
                query.parse::<u32>().ok()
            };
            if let Some(fid) = parsed_form_id {
                conditions.push("(full_name LIKE ? OR editor_id LIKE ? OR form_id = ?)".to_string());
                params.push(Box::new(format!("%{query}%")));
                params.push(Box::new(format!("%{query}%")));
                params.push(Box::new(fid));
            } else {
                conditions.push("(full_name LIKE ? OR editor_id LIKE ?)".to_string());
                params.push(Box::new(format!("%{query}%")));
                params.push(Box::new(format!("%{query}%")));
            }
        }

        let where_clause = conditions.join(" AND ");
        let sql = format!(
            "SELECT {} FROM records WHERE {} ORDER BY record_type, form_id LIMIT 500",
            Self::RECORD_COLUMNS,
            where_clause
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let param_refs: Vec<&dyn rusqlite::ToSql> = params.iter().map(|b| b.as_ref()).collect();
        let rows = stmt.query_map(param_refs.as_slice(), Self::row_to_record)?.collect::<rusqlite::Result<_>>()?;
        Ok(rows)
    }

    /// Batch-fetch icon texture paths for the given form ids, 500 at a time
    /// to stay under SQLite's bound-variable limit.
    pub fn get_icon_paths(&self, snapshot_id: i64, form_ids: &[u32]) -> Result<std::collections::HashMap<u32, String>> {
        self.get_field_paths(snapshot_id, form_ids, "icon")
    }

    pub fn get_model_paths(&self, snapshot_id: i64, form_ids: &[u32]) -> Result<std::collections::HashMap<u32, String>> {
        self.get_field_paths(snapshot_id, form_ids, "model")
    }

    fn get_field_paths(
        &self,
        snapshot_id: i64,
        form_ids: &[u32],
        field_name: &str,
    ) -> Result<std::collections::HashMap<u32, String>> {
        let mut result = std::collections::HashMap::new();
        for batch in form_ids.chunks(500) {
            let placeholders = vec!["?"; batch.len()].join(",");
            let sql = format!(
                "SELECT form_id, field_value FROM decoded_fields \
                 WHERE snapshot_id=? AND field_name=? AND form_id IN ({placeholders})"
            );
            let mut stmt = self.conn.prepare(&sql)?;
            let mut params: Vec<Box<dyn rusqlite::ToSql>> = vec![Box::new(snapshot_id), Box::new(field_name.to_string())];
            params.extend(batch.iter().map(|fid| Box::new(*fid) as Box<dyn rusqlite::ToSql>));
            let param_refs: Vec<&dyn rusqlite::ToSql> = params.iter().map(|b| b.as_ref()).collect();
            let mut rows = stmt.query(param_refs.as_slice())?;
            while let Some(row) = rows.next()? {
                let form_id: i64 = row.get(0)?;
                let value: String = row.get(1)?;
                result.insert(form_id as u32, value);
            }
        }
        Ok(result)
    }

    pub fn get_decoded_fields(&self, snapshot_id: i64, form_id: u32) -> Result<Vec<DecodedField>> {
        let mut stmt = self.conn.prepare(
            "SELECT snapshot_id, form_id, field_name, field_value, field_type \
             FROM decoded_fields WHERE snapshot_id=?1 AND form_id=?2",
        )?;
        let rows = stmt
            .query_map(params![snapshot_id, form_id], |row| {
                Ok(DecodedField {
                    snapshot_id: row.get(0)?,
                    form_id: row.get::<_, i64>(1)? as u32,
                    field_name: row.get(2)?,
                    field_value: row.get(3)?,
                    field_type: row.get(4)?,
                })
            })?
            .collect::<rusqlite::Result<_>>()?;
        Ok(rows)
    }

    /// Get all `form_id -> data_hash` pairs for a snapshot, for diffing.
    pub fn get_record_hashes(&self, snapshot_id: i64) -> Result<std::collections::HashMap<u32, String>> {
        let mut stmt = self.conn.prepare("SELECT form_id, data_hash FROM records WHERE snapshot_id=?1")?;
        let mut rows = stmt.query(params![snapshot_id])?;
        let mut out = std::collections::HashMap::new();
        while let Some(row) = rows.next()? {
            let form_id: i64 = row.get(0)?;
            let hash: String = row.get(1)?;
            out.insert(form_id as u32, hash);
        }
        Ok(out)
    }

    pub fn get_record_type_counts(&self, snapshot_id: i64) -> Result<Vec<(String, i64)>> {
        let mut stmt = self.conn.prepare(
            "SELECT record_type, COUNT(*) FROM records WHERE snapshot_id=?1 \
             GROUP BY record_type ORDER BY COUNT(*) DESC",
        )?;
        let rows = stmt
            .query_map(params![snapshot_id], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<rusqlite::Result<_>>()?;
        Ok(rows)
    }

    pub fn get_string(&self, snapshot_id: i64, string_id: u32) -> Result<Option<String>> {
        let mut stmt = self.conn.prepare("SELECT text FROM strings WHERE snapshot_id=?1 AND string_id=?2")?;
        let mut rows = stmt.query_map(params![snapshot_id, string_id], |row| row.get(0))?;
        rows.next().transpose().map_err(Error::from)
    }

    pub fn search_strings(&self, snapshot_id: i64, query: &str) -> Result<Vec<(u32, String)>> {
        let mut stmt = self.conn.prepare(
            "SELECT string_id, text FROM strings WHERE snapshot_id=?1 AND text LIKE ?2 LIMIT 200",
        )?;
        let rows = stmt
            .query_map(params![snapshot_id, format!("%{query}%")], |row| {
                Ok((row.get::<_, i64>(0)? as u32, row.get(1)?))
            })?
            .collect::<rusqlite::Result<_>>()?;
        Ok(rows)
    }

    pub fn db_size(&self) -> u64 {
        std::fs::metadata(&self.db_path).map(|m| m.len()).unwrap_or(0)
    }

    // -- Diff storage --

    pub fn save_diff(
        &mut self,
        old_id: i64,
        new_id: i64,
        added: &[(u32, String, Option<String>, Option<String>, String)],
        removed: &[(u32, String, Option<String>, Option<String>, String)],
        modified: &[(u32, String, Option<String>, Option<String>, String, String)],
    ) -> Result<i64> {
        let tx = self.conn.transaction()?;
        tx.execute(
            "INSERT INTO diffs (old_snapshot_id, new_snapshot_id, added_count, removed_count, modified_count) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![old_id, new_id, added.len() as i64, removed.len() as i64, modified.len() as i64],
        )?;
        let diff_id = tx.last_insert_rowid();

        {
            let mut stmt = tx.prepare(
                "INSERT INTO diff_entries \
                 (diff_id, form_id, change_type, record_type, editor_id, full_name, old_hash, new_hash) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            )?;
            for (form_id, rec_type, edid, name, new_hash) in added {
                stmt.execute(params![diff_id, form_id, "added", rec_type, edid, name, Option::<String>::None, new_hash])?;
            }
            for (form_id, rec_type, edid, name, old_hash) in removed {
                stmt.execute(params![diff_id, form_id, "removed", rec_type, edid, name, old_hash, Option::<String>::None])?;
            }
            for (form_id, rec_type, edid, name, old_hash, new_hash) in modified {
                stmt.execute(params![diff_id, form_id, "modified", rec_type, edid, name, old_hash, new_hash])?;
            }
        }
        tx.commit()?;
        Ok(diff_id)
    }

    pub fn purge_old_snapshots(&mut self, keep: i64) -> Result<usize> {
        let old_ids: Vec<i64> = {
            let mut stmt = self.conn.prepare("SELECT id FROM snapshots ORDER BY id DESC LIMIT -1 OFFSET ?1")?;
            stmt.query_map(params![keep], |row| row.get(0))?.collect::<rusqlite::Result<_>>()?
        };
        if old_ids.is_empty() {
            return Ok(0);
        }
        let placeholders = vec!["?"; old_ids.len()].join(",");
        let param_refs: Vec<&dyn rusqlite::ToSql> = old_ids.iter().map(|id| id as &dyn rusqlite::ToSql).collect();
        let tx = self.conn.transaction()?;
        tx.execute(&format!("DELETE FROM snapshots WHERE id IN ({placeholders})"), param_refs.as_slice())?;
        for table in ["records", "decoded_fields", "strings", "keywords", "subrecords"] {
            let sql = format!("DELETE FROM {table} WHERE snapshot_id IN ({placeholders})");
            tx.execute(&sql, param_refs.as_slice())?;
        }
        tx.commit()?;
        self.conn.execute_batch("VACUUM")?;
        Ok(old_ids.len())
    }

    pub fn clear_all_snapshots(&mut self) -> Result<i64> {
        let count: i64 = self.conn.query_row("SELECT COUNT(*) FROM snapshots", [], |row| row.get(0))?;
        if count > 0 {
            let tx = self.conn.transaction()?;
            for table in ["diff_entries", "diffs", "decoded_fields", "strings", "keywords", "subrecords", "records", "snapshots"] {
                tx.execute(&format!("DELETE FROM {table}"), [])?;
            }
            tx.commit()?;
            self.conn.execute_batch("VACUUM")?;
        }
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(form_id: u32, record_type: &str, editor_id: &str, hash: &str) -> DbRecord {
        DbRecord {
            snapshot_id: 0,
            form_id,
            record_type: record_type.into(),
            editor_id: Some(editor_id.into()),
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
    fn create_and_fetch_snapshot_roundtrips() {
        let store = Store::open_in_memory().unwrap();
        let id = store.create_snapshot("test", "abc123", 1024).unwrap();
        let snap = store.get_snapshot(id).unwrap().unwrap();
        assert_eq!(snap.label, "test");
        assert_eq!(snap.esm_hash, "abc123");
        assert_eq!(snap.esm_size, 1024);
        assert!(!snap.has_subrecords);
    }

    #[test]
    fn insert_and_get_record_by_form_id() {
        let mut store = Store::open_in_memory().unwrap();
        let id = store.create_snapshot("test", "h", 0).unwrap();
        store.insert_records(id, &[rec(0x100, "WEAP", "TestGun", "h1")]).unwrap();
        let found = store.get_record(id, 0x100).unwrap().unwrap();
        assert_eq!(found.editor_id.as_deref(), Some("TestGun"));
    }

    #[test]
    fn insert_or_replace_updates_existing_row() {
        let mut store = Store::open_in_memory().unwrap();
        let id = store.create_snapshot("test", "h", 0).unwrap();
        store.insert_records(id, &[rec(0x100, "WEAP", "Old", "h1")]).unwrap();
        store.insert_records(id, &[rec(0x100, "WEAP", "New", "h2")]).unwrap();
        let all = store.get_records_by_type(id, "WEAP").unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].editor_id.as_deref(), Some("New"));
    }

    #[test]
    fn get_record_hashes_returns_full_map() {
        let mut store = Store::open_in_memory().unwrap();
        let id = store.create_snapshot("test", "h", 0).unwrap();
        store
            .insert_records(id, &[rec(0x100, "WEAP", "A", "h1"), rec(0x101, "ARMO", "B", "h2")])
            .unwrap();
        let hashes = store.get_record_hashes(id).unwrap();
        assert_eq!(hashes.len(), 2);
        assert_eq!(hashes[&0x100], "h1");
    }

    #[test]
    fn search_records_by_query_distinguishes_hex_and_decimal_form_ids() {
        let mut store = Store::open_in_memory().unwrap();
        let id = store.create_snapshot("test", "h", 0).unwrap();
        store
            .insert_records(id, &[rec(0x100, "WEAP", "A", "h1"), rec(999, "WEAP", "B", "h2")])
            .unwrap();

        let by_hex = store.search_records(id, "0x100", None, None).unwrap();
        assert_eq!(by_hex.len(), 1);
        assert_eq!(by_hex[0].form_id, 0x100);

        let by_decimal = store.search_records(id, "999", None, None).unwrap();
        assert_eq!(by_decimal.len(), 1);
        assert_eq!(by_decimal[0].form_id, 999);
    }

    #[test]
    fn search_records_by_editor_id_glob() {
        let mut store = Store::open_in_memory().unwrap();
        let id = store.create_snapshot("test", "h", 0).unwrap();
        store
            .insert_records(id, &[rec(0x100, "WEAP", "ATX_Gun", "h1"), rec(0x101, "WEAP", "Normal", "h2")])
            .unwrap();
        let found = store.search_records(id, "", None, Some("ATX_*")).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].editor_id.as_deref(), Some("ATX_Gun"));
    }

    #[test]
    fn clear_all_snapshots_removes_everything() {
        let mut store = Store::open_in_memory().unwrap();
        let id = store.create_snapshot("test", "h", 0).unwrap();
        store.insert_records(id, &[rec(0x100, "WEAP", "A", "h1")]).unwrap();
        let removed = store.clear_all_snapshots().unwrap();
        assert_eq!(removed, 1);
        assert!(store.list_snapshots().unwrap().is_empty());
    }

    #[test]
    fn purge_old_snapshots_keeps_most_recent() {
        let mut store = Store::open_in_memory().unwrap();
        store.create_snapshot("a", "h", 0).unwrap();
        store.create_snapshot("b", "h", 0).unwrap();
        let newest = store.create_snapshot("c", "h", 0).unwrap();
        let purged = store.purge_old_snapshots(1).unwrap();
        assert_eq!(purged, 2);
        let remaining = store.list_snapshots().unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, newest);
    }
}
