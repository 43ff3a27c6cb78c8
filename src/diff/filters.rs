//! Unreleased-content detection heuristics.
//!
//! Grounded on `fo76datamine/diff/filters.py`'s `find_unreleased`: same four
//! buckets, same prefixes, same top-0.5%-of-form-ids heuristic restricted to
//! the same record types.

use crate::store::{DbRecord, Result, Store};

const CUT_TEST_PATTERNS: &[&str] = &["zzz_%", "CUT_%", "TEST_%", "test_%", "DEBUG_%", "DVLP_%"];
const HIGH_FORMID_RECORD_TYPES: &[&str] = &["WEAP", "ARMO", "ALCH", "MISC", "NPC_", "QUST", "BOOK", "COBJ", "OMOD"];

/// Heuristic buckets of likely-unreleased content found in a snapshot.
pub struct UnreleasedContent {
    pub atomic_shop: Vec<DbRecord>,
    pub cut_test: Vec<DbRecord>,
    pub high_form_ids: Vec<DbRecord>,
    pub disabled_quests: Vec<DbRecord>,
}

/// Scan a snapshot for unreleased content using multiple heuristics.
pub fn find_unreleased(store: &Store, snapshot_id: i64) -> Result<UnreleasedContent> {
    let atomic_shop = {
        let mut rows = store.search_records(snapshot_id, "", None, Some("ATX_*"))?;
        rows.sort_by(|a, b| b.form_id.cmp(&a.form_id));
        rows
    };

    let mut cut_test = Vec::new();
    for pattern in CUT_TEST_PATTERNS {
        let edid_glob = pattern.replace('%', "*");
        cut_test.extend(store.search_records(snapshot_id, "", None, Some(&edid_glob))?);
    }
    cut_test.sort_by_key(|r| r.form_id);

    let high_form_ids = {
        let all_hashes = store.get_record_hashes(snapshot_id)?;
        let max_fid = all_hashes.keys().copied().max();
        let mut rows = Vec::new();
        if let Some(max_fid) = max_fid {
            let threshold = (max_fid as f64 * 0.995) as u32;
            for record_type in HIGH_FORMID_RECORD_TYPES {
                for rec in store.get_records_by_type(snapshot_id, record_type)? {
                    if rec.form_id > threshold {
                        rows.push(rec);
                    }
                }
            }
        }
        rows.sort_by(|a, b| b.form_id.cmp(&a.form_id));
        rows
    };

    let disabled_quests = {
        let mut rows: Vec<DbRecord> = store
            .get_records_by_type(snapshot_id, "QUST")?
            .into_iter()
            .filter(|r| r.editor_id.as_deref().is_some_and(|e| e.starts_with("ATX_")))
            .collect();
        rows.sort_by(|a, b| b.form_id.cmp(&a.form_id));
        rows
    };

    Ok(UnreleasedContent { atomic_shop, cut_test, high_form_ids, disabled_quests })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(form_id: u32, record_type: &str, editor_id: &str) -> DbRecord {
        DbRecord {
            snapshot_id: 0,
            form_id,
            record_type: record_type.into(),
            editor_id: Some(editor_id.into()),
            full_name: None,
            full_name_id: None,
            desc_text: None,
            desc_id: None,
            data_hash: "h".into(),
            flags: 0,
            data_size: 0,
        }
    }

    #[test]
    fn finds_atx_prefixed_records() {
        let mut store = Store::open_in_memory().unwrap();
        let id = store.create_snapshot("t", "h", 0).unwrap();
        store
            .insert_records(id, &[rec(0x100, "MISC", "ATX_Hat"), rec(0x101, "MISC", "Normal")])
            .unwrap();
        let found = find_unreleased(&store, id).unwrap();
        assert_eq!(found.atomic_shop.len(), 1);
        assert_eq!(found.atomic_shop[0].editor_id.as_deref(), Some("ATX_Hat"));
    }

    #[test]
    fn finds_cut_and_test_prefixed_records() {
        let mut store = Store::open_in_memory().unwrap();
        let id = store.create_snapshot("t", "h", 0).unwrap();
        store
            .insert_records(id, &[rec(0x100, "MISC", "CUT_Item"), rec(0x101, "MISC", "zzz_Old"), rec(0x102, "MISC", "Ship")])
            .unwrap();
        let found = find_unreleased(&store, id).unwrap();
        assert_eq!(found.cut_test.len(), 2);
    }

    #[test]
    fn disabled_quests_require_atx_prefix_and_qust_type() {
        let mut store = Store::open_in_memory().unwrap();
        let id = store.create_snapshot("t", "h", 0).unwrap();
        store
            .insert_records(id, &[rec(0x100, "QUST", "ATX_PromoQuest"), rec(0x101, "QUST", "MainQuest")])
            .unwrap();
        let found = find_unreleased(&store, id).unwrap();
        assert_eq!(found.disabled_quests.len(), 1);
        assert_eq!(found.disabled_quests[0].editor_id.as_deref(), Some("ATX_PromoQuest"));
    }
}
