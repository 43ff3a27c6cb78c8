//! Group/record/subrecord tree walker.
//!
//! Grounded on `fo76datamine/esm/reader.py`'s `ESMReader`: same TES4 skip,
//! same top-level skip-by-label shortcut, same group-type 8/9 (cell
//! persistent/temporary children) skip, same recoverable per-record error
//! policy. The fixed-size headers are `binrw` structs; the recursive
//! group/record walk stays hand-written since `binrw` has no way to express
//! "skip N bytes and reinterpret at the new offset."

use std::collections::HashSet;
use std::io::Cursor;
use std::path::Path;

use binrw::BinRead;
use log::{debug, warn};

use super::record::{Record, Subrecord, FLAG_COMPRESSED};
use super::{Error, Result};

pub const SKIP_TYPES: &[&str] = &["REFR", "NAVM", "ACHR", "PGRE", "PMIS", "PHZD", "PARW"];

fn is_skip_type(tag: &str) -> bool {
    SKIP_TYPES.contains(&tag)
}

#[derive(BinRead, Debug, Clone)]
#[br(little, magic = b"GRUP")]
struct GrupHeader {
    group_size: u32,
    label: [u8; 4],
    group_type: u32,
    _timestamp: u32,
    _padding: u32,
}

#[derive(BinRead, Debug, Clone)]
#[br(little)]
struct RecordHeader {
    record_type: [u8; 4],
    data_size: u32,
    flags: u32,
    form_id: u32,
    revision: u32,
    version: u16,
    _padding: u16,
}

#[derive(BinRead, Debug, Clone)]
#[br(little)]
struct SubrecordHeader {
    tag: [u8; 4],
    size: u16,
}

/// Reads all non-placement records out of a master archive file.
pub struct EsmReader {
    data: Vec<u8>,
}

impl EsmReader {
    pub fn open(path: &Path) -> Result<Self> {
        let data = std::fs::read(path)?;
        Ok(Self { data })
    }

    pub fn from_bytes(data: Vec<u8>) -> Self {
        Self { data }
    }

    /// Parse the whole archive into a flat, ordered record sequence.
    pub fn parse_all(&self) -> Result<Vec<Record>> {
        let data = &self.data;
        let file_size = data.len();

        if data.len() < 24 || &data[0..4] != b"TES4" {
            return Err(Error::NotAnEsm);
        }
        let tes4_size = u32::from_le_bytes(data[4..8].try_into().unwrap());
        let mut pos = 24usize + tes4_size as usize;

        let mut out = Vec::new();

        while pos < file_size {
            if pos + 24 > file_size {
                break;
            }
            if &data[pos..pos + 4] != b"GRUP" {
                break;
            }
            let mut cursor = Cursor::new(&data[pos..]);
            let Ok(header) = GrupHeader::read(&mut cursor) else {
                break;
            };
            let group_end = pos + header.group_size as usize;
            if group_end > file_size {
                break;
            }

            let label = String::from_utf8_lossy(&header.label).into_owned();
            if header.group_type == 0 && is_skip_type(&label) {
                pos = group_end;
                continue;
            }

            self.parse_group_contents(pos + 24, group_end, &mut out);
            pos = group_end;
        }

        Ok(out)
    }

    fn parse_group_contents(&self, mut pos: usize, end: usize, out: &mut Vec<Record>) {
        let data = &self.data;
        while pos < end {
            if pos + 4 > end {
                break;
            }

            if &data[pos..pos + 4] == b"GRUP" {
                if pos + 24 > end {
                    break;
                }
                let mut cursor = Cursor::new(&data[pos..]);
                let Ok(header) = GrupHeader::read(&mut cursor) else {
                    break;
                };
                let sub_end = pos + header.group_size as usize;
                if sub_end > end {
                    break;
                }

                if header.group_type == 8 || header.group_type == 9 {
                    pos = sub_end;
                    continue;
                }

                self.parse_group_contents(pos + 24, sub_end, out);
                pos = sub_end;
                continue;
            }

            if pos + 24 > end {
                break;
            }
            let mut cursor = Cursor::new(&data[pos..]);
            let Ok(header) = RecordHeader::read(&mut cursor) else {
                break;
            };
            pos += 24;

            let record_type = String::from_utf8_lossy(&header.record_type)
                .trim_end_matches('\0')
                .to_string();

            if is_skip_type(&record_type) {
                pos += header.data_size as usize;
                continue;
            }

            let payload_end = pos + header.data_size as usize;
            if payload_end > end {
                debug!("record {record_type} data_size exceeds containing group, dropping");
                break;
            }
            let raw_payload = &data[pos..payload_end];
            pos = payload_end;

            let decompressed;
            let payload: &[u8] = if header.flags & FLAG_COMPRESSED != 0 {
                match inflate_record(raw_payload) {
                    Some(bytes) => {
                        decompressed = bytes;
                        &decompressed
                    }
                    None => {
                        warn!(
                            "record {record_type} @ {:#010x}: inflate failed, dropping",
                            header.form_id
                        );
                        continue;
                    }
                }
            } else {
                raw_payload
            };

            let subrecords = parse_subrecords(payload);

            out.push(Record {
                record_type,
                data_size: header.data_size,
                flags: header.flags,
                form_id: header.form_id,
                revision: header.revision,
                version: header.version,
                subrecords,
            });
        }
    }
}

fn inflate_record(raw: &[u8]) -> Option<Vec<u8>> {
    if raw.len() < 4 {
        return None;
    }
    let uncompressed_size = u32::from_le_bytes(raw[0..4].try_into().unwrap()) as usize;
    use flate2::read::ZlibDecoder;
    use std::io::Read;
    let mut decoder = ZlibDecoder::new(&raw[4..]);
    let mut out = Vec::with_capacity(uncompressed_size);
    decoder.read_to_end(&mut out).ok()?;
    if out.len() != uncompressed_size {
        return None;
    }
    Some(out)
}

fn parse_subrecords(data: &[u8]) -> Vec<Subrecord> {
    let mut subrecords = Vec::new();
    let mut offset = 0usize;
    let len = data.len();

    while offset + 6 <= len {
        let mut cursor = Cursor::new(&data[offset..]);
        let Ok(header) = SubrecordHeader::read(&mut cursor) else {
            break;
        };
        offset += 6;
        let size = header.size as usize;
        if offset + size > len {
            break;
        }
        subrecords.push(Subrecord {
            tag: header.tag,
            data: data[offset..offset + size].to_vec(),
        });
        offset += size;
    }

    subrecords
}

/// Unused in production but kept for symmetry with the original tool's
/// configurable skip set (tests exercise a custom skip set directly).
#[allow(dead_code)]
pub fn default_skip_types() -> HashSet<&'static str> {
    SKIP_TYPES.iter().copied().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tes4(size: u32) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(b"TES4");
        out.extend_from_slice(&size.to_le_bytes());
        out.extend_from_slice(&[0u8; 16]);
        out.extend_from_slice(&vec![0u8; size as usize]);
        out
    }

    fn grup(label: &[u8; 4], group_type: u32, contents: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(b"GRUP");
        let size = 24 + contents.len() as u32;
        out.extend_from_slice(&size.to_le_bytes());
        out.extend_from_slice(label);
        out.extend_from_slice(&group_type.to_le_bytes());
        out.extend_from_slice(&[0u8; 8]);
        out.extend_from_slice(contents);
        out
    }

    fn record(record_type: &[u8; 4], form_id: u32, flags: u32, subrecords: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(record_type);
        out.extend_from_slice(&(subrecords.len() as u32).to_le_bytes());
        out.extend_from_slice(&flags.to_le_bytes());
        out.extend_from_slice(&form_id.to_le_bytes());
        out.extend_from_slice(&1u32.to_le_bytes()); // revision
        out.extend_from_slice(&44u16.to_le_bytes()); // version
        out.extend_from_slice(&[0u8; 2]); // padding
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

    #[test]
    fn parses_simple_archive() {
        let mut edid = sub(b"EDID", b"TestGun\0");
        let data_sub = sub(b"DATA", &[1, 0, 0, 0]);
        edid.extend_from_slice(&data_sub);
        let rec = record(b"WEAP", 0x100, 0, &edid);
        let group = grup(b"WEAP", 0, &rec);

        let mut archive = tes4(0);
        archive.extend_from_slice(&group);

        let reader = EsmReader::from_bytes(archive);
        let records = reader.parse_all().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].editor_id(), Some("TestGun".to_string()));
    }

    #[test]
    fn skips_placement_top_level_group() {
        let rec = record(b"REFR", 0x200, 0, &[]);
        let group = grup(b"REFR", 0, &rec);
        let mut archive = tes4(0);
        archive.extend_from_slice(&group);

        let reader = EsmReader::from_bytes(archive);
        assert!(reader.parse_all().unwrap().is_empty());
    }

    #[test]
    fn skips_cell_children_group_types_8_and_9() {
        let placed = record(b"ACHR", 0x300, 0, &[]);
        let inner = grup(&[0; 4], 8, &placed);
        let outer_rec = record(b"CELL", 0x301, 0, &[]);
        let mut outer_contents = outer_rec;
        outer_contents.extend_from_slice(&inner);
        let group = grup(b"CELL", 0, &outer_contents);

        let mut archive = tes4(0);
        archive.extend_from_slice(&group);

        let reader = EsmReader::from_bytes(archive);
        let records = reader.parse_all().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].record_type, "CELL");
    }

    #[test]
    fn oversized_record_data_size_is_dropped_not_panicking() {
        let mut rec = record(b"WEAP", 0x400, 0, &[]);
        // Lie about data_size so it exceeds the group.
        rec[4..8].copy_from_slice(&9999u32.to_le_bytes());
        let group = grup(b"WEAP", 0, &rec);
        let mut archive = tes4(0);
        archive.extend_from_slice(&group);

        let reader = EsmReader::from_bytes(archive);
        assert!(reader.parse_all().unwrap().is_empty());
    }

    #[test]
    fn truncated_subrecord_is_dropped_previous_ones_retained() {
        let mut subs = sub(b"EDID", b"X\0");
        subs.extend_from_slice(b"DATA");
        subs.extend_from_slice(&100u16.to_le_bytes()); // claims 100 bytes, none present
        let rec = record(b"WEAP", 0x500, 0, &subs);
        let group = grup(b"WEAP", 0, &rec);
        let mut archive = tes4(0);
        archive.extend_from_slice(&group);

        let reader = EsmReader::from_bytes(archive);
        let records = reader.parse_all().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].subrecords.len(), 1);
        assert_eq!(records[0].subrecords[0].tag_str(), "EDID");
    }
}
