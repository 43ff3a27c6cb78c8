//! Localized string-table loader.
//!
//! Loads `.strings`/`.dlstrings`/`.ilstrings` blobs out of the localization
//! general-archive (see `archive::general`) and merges them into a single
//! `string_id -> text` table. Grounded on `fo76datamine/strings/loader.py`:
//! same three-variant layout, same `en`-default language, same `nw_<lang>`
//! secondary prefix, same last-write-wins merge policy.

use std::collections::HashMap;
use std::path::Path;

use thiserror::Error;

use crate::archive::general::Reader as ArchiveReader;
use crate::primitives;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Archive(#[from] crate::archive::Error),
}

type Result<T> = std::result::Result<T, Error>;

/// Merged id -> text lookup table for one language.
#[derive(Debug, Default)]
pub struct StringTable {
    strings: HashMap<u32, String>,
    source_counts: HashMap<String, usize>,
}

impl StringTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every string file for `language` from the localization archive,
    /// plus the `nw_<language>` variants if present. Later loads overwrite
    /// earlier ones on id collision (no dedup, no collision detection).
    pub fn load_from_archive(&mut self, archive_path: &Path, language: &str) -> Result<()> {
        let reader = ArchiveReader::open(archive_path)?;

        let prefix = format!("strings/seventysix_{language}");
        self.load_prefix(&reader, &prefix);

        let nw_prefix = format!("strings/nw_{language}");
        self.load_prefix(&reader, &nw_prefix);

        Ok(())
    }

    fn load_prefix(&mut self, reader: &ArchiveReader, prefix: &str) {
        for (suffix, kind) in [
            (".strings", Kind::NullTerminated),
            (".dlstrings", Kind::LengthPrefixed),
            (".ilstrings", Kind::LengthPrefixed),
        ] {
            let name = format!("{prefix}{suffix}");
            let Some(entry) = reader.find_by_path(&name) else {
                continue;
            };
            let Ok(raw) = reader.extract(entry) else {
                continue;
            };
            let parsed = match kind {
                Kind::NullTerminated => parse_strings(&raw),
                Kind::LengthPrefixed => parse_dlstrings(&raw),
            };
            self.source_counts.insert(entry.name.clone(), parsed.len());
            self.strings.extend(parsed);
        }
    }

    pub fn lookup(&self, string_id: u32) -> Option<&str> {
        self.strings.get(&string_id).map(String::as_str)
    }

    pub fn search(&self, query: &str) -> Vec<(u32, &str)> {
        let needle = query.to_lowercase();
        self.strings
            .iter()
            .filter(|(_, text)| text.to_lowercase().contains(&needle))
            .map(|(id, text)| (*id, text.as_str()))
            .collect()
    }

    pub fn count(&self) -> usize {
        self.strings.len()
    }

    pub fn source_counts(&self) -> &HashMap<String, usize> {
        &self.source_counts
    }

    /// Iterate (string_id, text, source) rows ready for a batch store insert.
    /// Source is left blank here; the parse-driver tags it per archive load.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &str)> {
        self.strings.iter().map(|(id, text)| (*id, text.as_str()))
    }
}

enum Kind {
    NullTerminated,
    LengthPrefixed,
}

/// Parse a `.strings` file: `count:u32, data_size:u32`, a directory of
/// `(string_id:u32, data_offset:u32)` pairs, then a data section of
/// NUL-terminated UTF-8 strings addressed relative to the data section start.
fn parse_strings(data: &[u8]) -> HashMap<u32, String> {
    parse_table(data, |buf, str_start| primitives::read_cstr(buf, str_start))
}

/// Parse a `.dlstrings`/`.ilstrings` file: same header/directory, but each
/// data-section entry is `length:u32` followed by `length` bytes (trailing
/// NULs stripped).
fn parse_dlstrings(data: &[u8]) -> HashMap<u32, String> {
    parse_table(data, |buf, str_start| {
        primitives::read_pstr32(buf, str_start)
            .map(|(s, _)| s)
            .unwrap_or_default()
    })
}

fn parse_table(data: &[u8], read_entry: impl Fn(&[u8], usize) -> String) -> HashMap<u32, String> {
    let mut out = HashMap::new();
    if data.len() < 8 {
        return out;
    }
    let Ok(count) = primitives::read_u32le(data, 0) else {
        return out;
    };
    let header_size = 8 + (count as usize) * 8;
    let data_len = data.len();

    for i in 0..count as usize {
        let entry_offset = 8 + i * 8;
        let (Ok(string_id), Ok(string_offset)) = (
            primitives::read_u32le(data, entry_offset),
            primitives::read_u32le(data, entry_offset + 4),
        ) else {
            break;
        };
        let str_start = header_size + string_offset as usize;
        if str_start >= data_len {
            continue;
        }
        out.insert(string_id, read_entry(data, str_start));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings_blob(entries: &[(u32, &str)]) -> Vec<u8> {
        let header_size = 8 + entries.len() * 8;
        let mut data_section = Vec::new();
        let mut dir = Vec::new();
        for (id, text) in entries {
            dir.push((*id, data_section.len() as u32));
            data_section.extend_from_slice(text.as_bytes());
            data_section.push(0);
        }
        let mut out = Vec::new();
        out.extend_from_slice(&(entries.len() as u32).to_le_bytes());
        out.extend_from_slice(&(data_section.len() as u32).to_le_bytes());
        for (id, offset) in dir {
            out.extend_from_slice(&id.to_le_bytes());
            out.extend_from_slice(&offset.to_le_bytes());
        }
        out.extend_from_slice(&data_section);
        assert_eq!(out.len(), header_size + data_section.len());
        out
    }

    fn dlstrings_blob(entries: &[(u32, &str)]) -> Vec<u8> {
        let mut data_section = Vec::new();
        let mut dir = Vec::new();
        for (id, text) in entries {
            dir.push((*id, data_section.len() as u32));
            data_section.extend_from_slice(&(text.len() as u32).to_le_bytes());
            data_section.extend_from_slice(text.as_bytes());
        }
        let mut out = Vec::new();
        out.extend_from_slice(&(entries.len() as u32).to_le_bytes());
        out.extend_from_slice(&(data_section.len() as u32).to_le_bytes());
        for (id, offset) in dir {
            out.extend_from_slice(&id.to_le_bytes());
            out.extend_from_slice(&offset.to_le_bytes());
        }
        out.extend_from_slice(&data_section);
        out
    }

    #[test]
    fn parses_strings_variant() {
        let blob = strings_blob(&[(0x1000, "Hello"), (0x1001, "World")]);
        let parsed = parse_strings(&blob);
        assert_eq!(parsed.get(&0x1000).map(String::as_str), Some("Hello"));
        assert_eq!(parsed.get(&0x1001).map(String::as_str), Some("World"));
    }

    #[test]
    fn parses_dlstrings_variant() {
        let blob = dlstrings_blob(&[(0x2000, "Hello")]);
        let parsed = parse_dlstrings(&blob);
        assert_eq!(parsed.get(&0x2000).map(String::as_str), Some("Hello"));
    }

    #[test]
    fn short_buffer_yields_empty_table_not_panic() {
        assert!(parse_strings(&[1, 2, 3]).is_empty());
        assert!(parse_dlstrings(&[]).is_empty());
    }

    #[test]
    fn at_most_declared_count_entries_produced() {
        let blob = strings_blob(&[(1, "a"), (2, "b"), (3, "c")]);
        let parsed = parse_strings(&blob);
        assert!(parsed.len() <= 3);
    }
}
