//! Recursive leveled-list tree expansion and text formatting.
//!
//! Grounded on `fo76datamine/db/leveled_list.py`: same `entry_N_ref` /
//! `entry_N_level` / `entry_N_count` field scan, same depth limit and
//! visited-set cycle guard, same indented-text renderer.

use std::collections::HashMap;

use super::{DecodedField, Result, Store};

const DEFAULT_MAX_DEPTH: u32 = 10;

/// A single entry in a leveled list, possibly itself a nested leveled list.
#[derive(Debug, Clone, PartialEq)]
pub struct LeveledEntry {
    pub level: i64,
    pub count: i64,
    pub form_id: u32,
    pub record_type: String,
    pub editor_id: Option<String>,
    pub full_name: Option<String>,
    pub children: Vec<LeveledEntry>,
}

impl LeveledEntry {
    pub fn form_id_hex(&self) -> String {
        format!("0x{:08X}", self.form_id)
    }
}

/// Root of an expanded leveled list tree.
#[derive(Debug, Clone, PartialEq)]
pub struct LeveledTree {
    pub form_id: u32,
    pub record_type: String,
    pub editor_id: Option<String>,
    pub full_name: Option<String>,
    pub chance_none: i64,
    pub use_all: bool,
    pub entries: Vec<LeveledEntry>,
}

impl LeveledTree {
    pub fn form_id_hex(&self) -> String {
        format!("0x{:08X}", self.form_id)
    }
}

fn field_map(fields: &[DecodedField]) -> HashMap<&str, &str> {
    fields.iter().map(|f| (f.field_name.as_str(), f.field_value.as_str())).collect()
}

/// Recursively expand a leveled list into a tree. Returns `None` if `form_id`
/// isn't an `LVLI`/`LVLN` record in the given snapshot.
pub fn expand(store: &Store, snapshot_id: i64, form_id: u32, max_depth: u32) -> Result<Option<LeveledTree>> {
    let Some(rec) = store.get_record(snapshot_id, form_id)? else { return Ok(None) };
    if rec.record_type != "LVLI" && rec.record_type != "LVLN" {
        return Ok(None);
    }

    let fields = store.get_decoded_fields(snapshot_id, form_id)?;
    let map = field_map(&fields);

    let chance_none = map.get("chance_none").and_then(|v| v.parse().ok()).unwrap_or(0);
    let use_all = map.get("use_all").copied() == Some("True");

    let mut visited = std::collections::HashSet::new();
    visited.insert(form_id);
    let entries = expand_entries(store, snapshot_id, &map, max_depth, &mut visited)?;

    Ok(Some(LeveledTree {
        form_id,
        record_type: rec.record_type,
        editor_id: rec.editor_id,
        full_name: rec.full_name,
        chance_none,
        use_all,
        entries,
    }))
}

pub fn expand_default(store: &Store, snapshot_id: i64, form_id: u32) -> Result<Option<LeveledTree>> {
    expand(store, snapshot_id, form_id, DEFAULT_MAX_DEPTH)
}

fn expand_entries(
    store: &Store,
    snapshot_id: i64,
    field_map: &HashMap<&str, &str>,
    depth: u32,
    visited: &mut std::collections::HashSet<u32>,
) -> Result<Vec<LeveledEntry>> {
    let mut entries = Vec::new();
    let mut i = 0usize;
    loop {
        let ref_key = format!("entry_{i}_ref");
        let Some(ref_hex) = field_map.get(ref_key.as_str()) else { break };

        let level = field_map.get(format!("entry_{i}_level").as_str()).and_then(|v| v.parse().ok()).unwrap_or(0);
        let count = field_map.get(format!("entry_{i}_count").as_str()).and_then(|v| v.parse().ok()).unwrap_or(1);

        let Ok(ref_fid) = u32::from_str_radix(ref_hex.trim_start_matches("0x"), 16) else {
            i += 1;
            continue;
        };

        let ref_rec = store.get_record(snapshot_id, ref_fid)?;
        let record_type = ref_rec.as_ref().map(|r| r.record_type.clone()).unwrap_or_default();
        let editor_id = ref_rec.as_ref().and_then(|r| r.editor_id.clone());
        let full_name = ref_rec.as_ref().and_then(|r| r.full_name.clone());

        let mut entry = LeveledEntry {
            level,
            count,
            form_id: ref_fid,
            record_type: record_type.clone(),
            editor_id,
            full_name,
            children: Vec::new(),
        };

        if depth > 0 && (record_type == "LVLI" || record_type == "LVLN") && !visited.contains(&ref_fid) {
            visited.insert(ref_fid);
            let child_fields = store.get_decoded_fields(snapshot_id, ref_fid)?;
            let child_map = field_map_from(&child_fields);
            entry.children = expand_entries(store, snapshot_id, &child_map, depth - 1, visited)?;
        }

        entries.push(entry);
        i += 1;
    }
    Ok(entries)
}

fn field_map_from(fields: &[DecodedField]) -> HashMap<&str, &str> {
    field_map(fields)
}

pub fn format_tree_text(tree: &LeveledTree) -> String {
    let mut lines = Vec::new();
    let name = tree.full_name.clone().or_else(|| tree.editor_id.clone()).unwrap_or_else(|| tree.form_id_hex());
    lines.push(format!("{} ({}) [{}]", name, tree.form_id_hex(), tree.record_type));
    lines.push(format!("  Chance None: {}%  Use All: {}", tree.chance_none, tree.use_all));

    for entry in &tree.entries {
        format_entry(entry, &mut lines, 1);
    }

    lines.join("\n")
}

fn format_entry(entry: &LeveledEntry, lines: &mut Vec<String>, indent: usize) {
    let prefix = "  ".repeat(indent);
    let name = entry.full_name.clone().or_else(|| entry.editor_id.clone()).unwrap_or_else(|| entry.form_id_hex());
    let type_tag = if entry.record_type.is_empty() { String::new() } else { format!("[{}]", entry.record_type) };
    let qty = if entry.count > 1 { format!(" x{}", entry.count) } else { String::new() };
    let lvl = if entry.level > 0 { format!(" (lvl {})", entry.level) } else { String::new() };
    lines.push(format!("{prefix}- {name}{qty}{lvl} {type_tag} {}", entry.form_id_hex()));

    for child in &entry.children {
        format_entry(child, lines, indent + 1);
    }
}
