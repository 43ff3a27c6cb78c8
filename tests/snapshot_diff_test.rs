//! End-to-end coverage of the parse -> snapshot -> diff pipeline, wiring the
//! driver and store together the way `src/bin/fo76mine.rs` does. Mirrors the
//! literal scenarios in `spec.md` §8: added/removed form ids, a field-level
//! modification, and a cross-store diff whose old/new rows never mix.

use fo76mine::diff::DiffEngine;
use fo76mine::driver;
use fo76mine::store::Store;

fn tes4() -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(b"TES4");
    out.extend_from_slice(&0u32.to_le_bytes());
    out.extend_from_slice(&[0u8; 16]);
    out
}

fn grup(label: &[u8; 4], contents: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(b"GRUP");
    let size = 24 + contents.len() as u32;
    out.extend_from_slice(&size.to_le_bytes());
    out.extend_from_slice(label);
    out.extend_from_slice(&0u32.to_le_bytes());
    out.extend_from_slice(&[0u8; 8]);
    out.extend_from_slice(contents);
    out
}

fn record(record_type: &[u8; 4], form_id: u32, subrecords: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(record_type);
    out.extend_from_slice(&(subrecords.len() as u32).to_le_bytes());
    out.extend_from_slice(&0u32.to_le_bytes());
    out.extend_from_slice(&form_id.to_le_bytes());
    out.extend_from_slice(&1u32.to_le_bytes());
    out.extend_from_slice(&44u16.to_le_bytes());
    out.extend_from_slice(&[0u8; 2]);
    out.extend_from_slice(subrecords);
    out
}

fn sub(tag: &[u8; 4], data: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(tag);
    out.extend_from_slice(&(data.len() as u16).to_le_bytes());
    out.extend_from_slice(data);
    out
}

/// A minimal WEAP DNAM blob with `damage` (offset 60) set as given; long
/// enough to reach `num_projectiles` at offset 101 like `decode_weap` expects.
fn weap_dnam(damage: f32) -> Vec<u8> {
    let mut d = vec![0u8; 170];
    d[60..64].copy_from_slice(&damage.to_le_bytes());
    d
}

fn weap_record(form_id: u32, editor_id: &str, damage: f32) -> Vec<u8> {
    let mut subrecords = sub(b"EDID", format!("{editor_id}\0").as_bytes());
    subrecords.extend_from_slice(&sub(b"DNAM", &weap_dnam(damage)));
    record(b"WEAP", form_id, &subrecords)
}

fn write_esm(path: &std::path::Path, records: &[Vec<u8>]) {
    let mut archive = tes4();
    let mut group_contents = Vec::new();
    for r in records {
        group_contents.extend_from_slice(r);
    }
    archive.extend_from_slice(&grup(b"WEAP", &group_contents));
    std::fs::write(path, archive).unwrap();
}

#[test]
fn snapshot_and_diff_detects_added_and_modified_records() {
    let dir = tempfile::tempdir().unwrap();
    let esm_old = dir.path().join("old.esm");
    let esm_new = dir.path().join("new.esm");
    let missing_ba2 = dir.path().join("strings.ba2");
    let db_path = dir.path().join("mine.db");

    write_esm(&esm_old, &[weap_record(0x00010001, "BaseGun", 10.0)]);
    write_esm(
        &esm_new,
        &[weap_record(0x00010001, "BaseGun", 12.0), weap_record(0xCAFEBABE, "ExtraGun", 5.0)],
    );

    let mut store = Store::open(&db_path).unwrap();
    let old_id = driver::run_snapshot(&mut store, &esm_old, &missing_ba2, "old", false).unwrap();
    let new_id = driver::run_snapshot(&mut store, &esm_new, &missing_ba2, "new", false).unwrap();

    let result = DiffEngine::new(&store).compare(old_id, new_id, None).unwrap();

    assert_eq!(result.added.len(), 1);
    assert_eq!(result.added[0].form_id, 0xCAFEBABE);
    assert!(result.removed.is_empty());
    assert_eq!(result.modified.len(), 1);
    assert_eq!(result.modified[0].0.form_id, 0x00010001);

    let changes = &result.field_changes[&0x00010001];
    let damage_change = changes.iter().find(|c| c.field_name == "damage").unwrap();
    assert_eq!(damage_change.old_value.as_deref(), Some("10.0"));
    assert_eq!(damage_change.new_value.as_deref(), Some("12.0"));
}

#[test]
fn diff_between_a_snapshot_and_itself_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    let esm = dir.path().join("same.esm");
    let missing_ba2 = dir.path().join("strings.ba2");
    write_esm(&esm, &[weap_record(0x100, "Gun", 1.0)]);

    let mut store = Store::open_in_memory().unwrap();
    let id = driver::run_snapshot(&mut store, &esm, &missing_ba2, "s", false).unwrap();

    let result = DiffEngine::new(&store).compare(id, id, None).unwrap();
    assert_eq!(result.total_changes(), 0);
}

#[test]
fn cross_store_diff_reads_old_rows_from_first_store_and_new_from_second() {
    let mut old_store = Store::open_in_memory().unwrap();
    let mut new_store = Store::open_in_memory().unwrap();

    let old_id = old_store.create_snapshot("old", "h", 0).unwrap();
    let new_id = new_store.create_snapshot("new", "h", 0).unwrap();

    old_store
        .insert_records(
            old_id,
            &[fo76mine::store::DbRecord {
                snapshot_id: old_id,
                form_id: 0x1,
                record_type: "WEAP".into(),
                editor_id: Some("SentinelOld".into()),
                full_name: None,
                full_name_id: None,
                desc_text: None,
                desc_id: None,
                data_hash: "hash_old".into(),
                flags: 0,
                data_size: 0,
            }],
        )
        .unwrap();
    new_store
        .insert_records(
            new_id,
            &[fo76mine::store::DbRecord {
                snapshot_id: new_id,
                form_id: 0x1,
                record_type: "WEAP".into(),
                editor_id: Some("SentinelNew".into()),
                full_name: None,
                full_name_id: None,
                desc_text: None,
                desc_id: None,
                data_hash: "hash_new".into(),
                flags: 0,
                data_size: 0,
            }],
        )
        .unwrap();

    let result = DiffEngine::cross_store(&old_store, &new_store).compare(old_id, new_id, None).unwrap();

    assert_eq!(result.modified.len(), 1);
    let (old_rec, new_rec) = &result.modified[0];
    assert_eq!(old_rec.editor_id.as_deref(), Some("SentinelOld"));
    assert_eq!(new_rec.editor_id.as_deref(), Some("SentinelNew"));
}
