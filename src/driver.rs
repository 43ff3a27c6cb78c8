//! Parse-driver glue: orchestrates the full snapshot pipeline.
//!
//! Grounded on `fo76datamine/cli.py`'s `snapshot` command, which is the
//! original tool's only place that wires parsing, string loading, decoding,
//! and storage together end to end. The CLI in `src/bin/fo76mine.rs` stays
//! thin and calls straight into this module, per `SPEC_FULL.md` §1/§4.I.

use std::path::Path;

use log::info;
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::archive;
use crate::esm::decode::{self, ValueKind};
use crate::esm::{EsmReader, Record};
use crate::store::{DbRecord, DbString, DecodedField, Store, SubrecordRow};
use crate::strings::StringTable;

const BATCH_SIZE: usize = 50_000;
const FIRST_BYTES_HASHED: usize = 1024 * 1024;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Esm(#[from] crate::esm::Error),
    #[error(transparent)]
    Archive(#[from] crate::archive::Error),
    #[error(transparent)]
    Strings(#[from] crate::strings::Error),
    #[error(transparent)]
    Store(#[from] crate::store::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

fn value_kind_tag(kind: ValueKind) -> &'static str {
    match kind {
        ValueKind::Integer => "int",
        ValueKind::Float => "float",
        ValueKind::String => "str",
        ValueKind::FormId => "formid",
        ValueKind::Flags => "flags",
        ValueKind::Enum => "str",
    }
}

fn hash_first_mebibyte(path: &Path) -> std::io::Result<String> {
    use std::io::Read;
    let mut file = std::fs::File::open(path)?;
    let mut buf = vec![0u8; FIRST_BYTES_HASHED];
    let mut total = 0usize;
    loop {
        let n = file.read(&mut buf[total..])?;
        if n == 0 {
            break;
        }
        total += n;
        if total == buf.len() {
            break;
        }
    }
    buf.truncate(total);
    let mut hasher = Sha256::new();
    hasher.update(&buf);
    Ok(hex::encode(hasher.finalize()))
}

/// Parse `esm_path` and `ba2_path`, decode every record, and persist the
/// result as a new snapshot labeled `label`. When `full` is set, every raw
/// subrecord is also persisted (substantially larger database).
///
/// Returns the new snapshot id.
pub fn run_snapshot(store: &mut Store, esm_path: &Path, ba2_path: &Path, label: &str, full: bool) -> Result<i64> {
    let esm_size = std::fs::metadata(esm_path)?.len();
    let esm_hash = hash_first_mebibyte(esm_path)?;
    let snapshot_id = store.create_snapshot(label, &esm_hash, esm_size)?;
    info!("snapshot #{snapshot_id} ({label}): {esm_size} byte ESM, hash {esm_hash}");

    info!("parsing ESM records");
    let reader = EsmReader::open(esm_path)?;
    let records = reader.parse_all()?;
    info!("{} records parsed", records.len());

    info!("loading string tables");
    let mut strings = StringTable::new();
    if archive::general::Reader::open(ba2_path).is_ok() {
        strings.load_from_archive(ba2_path, "en")?;
    }
    info!("{} strings loaded", strings.count());

    let mut db_rows = Vec::with_capacity(records.len());
    let mut keyword_rows = Vec::new();
    let mut subrecord_rows = Vec::new();
    let mut decoded_rows = Vec::new();

    for rec in &records {
        let full_name_id = rec.full_name_id();
        let full_name = full_name_id.and_then(|id| strings.lookup(id)).map(str::to_string);

        let desc_id = rec.desc_id();
        let desc_text = desc_id.and_then(|id| strings.lookup(id)).map(str::to_string);

        db_rows.push(DbRecord {
            snapshot_id,
            form_id: rec.form_id,
            record_type: rec.record_type.clone(),
            editor_id: rec.editor_id(),
            full_name,
            full_name_id,
            desc_text,
            desc_id,
            data_hash: rec.data_hash(),
            flags: rec.flags,
            data_size: rec.data_size,
        });

        if rec.record_type == "KYWD" {
            if let Some(edid) = rec.editor_id() {
                keyword_rows.push((rec.form_id, edid));
            }
        }

        if full {
            for (idx, sub) in rec.subrecords.iter().enumerate() {
                subrecord_rows.push(SubrecordRow {
                    form_id: rec.form_id,
                    sub_type: sub.tag_str(),
                    sub_index: idx as i64,
                    data: sub.data.clone(),
                });
            }
        }

        decoded_rows.extend(decode_record_fields(snapshot_id, rec));
    }

    info!("writing {} records to database", db_rows.len());
    for chunk in db_rows.chunks(BATCH_SIZE) {
        store.insert_records(snapshot_id, chunk)?;
    }

    if !keyword_rows.is_empty() {
        store.insert_keywords(snapshot_id, &keyword_rows)?;
    }

    let string_rows: Vec<DbString> = strings
        .iter()
        .map(|(id, text)| DbString { snapshot_id, string_id: id, text: text.to_string(), source: String::new() })
        .collect();
    for chunk in string_rows.chunks(BATCH_SIZE) {
        store.insert_strings(snapshot_id, chunk)?;
    }

    if !subrecord_rows.is_empty() {
        for chunk in subrecord_rows.chunks(BATCH_SIZE) {
            store.insert_subrecords(snapshot_id, chunk)?;
        }
    }

    info!("decoding {} typed fields", decoded_rows.len());
    for chunk in decoded_rows.chunks(BATCH_SIZE) {
        store.insert_decoded_fields(snapshot_id, chunk)?;
    }

    store.update_snapshot_counts(snapshot_id, db_rows.len() as i64, string_rows.len() as i64, full)?;
    info!("snapshot #{snapshot_id} complete");

    Ok(snapshot_id)
}

fn decode_record_fields(snapshot_id: i64, rec: &Record) -> Vec<DecodedField> {
    decode::decode(rec)
        .into_iter()
        .map(|f| DecodedField {
            snapshot_id,
            form_id: rec.form_id,
            field_name: f.name,
            field_value: f.value,
            field_type: value_kind_tag(f.kind).to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_kind_tags_match_store_convention() {
        assert_eq!(value_kind_tag(ValueKind::FormId), "formid");
        assert_eq!(value_kind_tag(ValueKind::Float), "float");
        assert_eq!(value_kind_tag(ValueKind::Enum), "str");
    }

    #[test]
    fn hash_first_mebibyte_handles_small_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tiny.bin");
        std::fs::write(&path, b"hello world").unwrap();
        let hash = hash_first_mebibyte(&path).unwrap();
        assert_eq!(hash.len(), 64);
    }
}
