//! `Record`/`Subrecord` types and content hashing.
//!
//! Grounded on `fo76datamine/esm/records.py`'s `Record`/`Subrecord`
//! dataclasses: same field set, same cached-accessor shape (`editor_id`,
//! `full_name_id`, `desc_id`, `get_subrecord(s)`, `get_keywords`), same
//! hash definition (tag + size + payload per subrecord, in order).

use sha2::{Digest, Sha256};

use crate::primitives;

pub const FLAG_COMPRESSED: u32 = 0x0004_0000;

/// A single tagged, sized byte payload inside a record. Tags repeat within
/// a record (EFID/EFIT pairs, CTDA/CIS1/CIS2 triples); order is significant.
#[derive(Debug, Clone)]
pub struct Subrecord {
    pub tag: [u8; 4],
    pub data: Vec<u8>,
}

impl Subrecord {
    pub fn tag_str(&self) -> String {
        String::from_utf8_lossy(&self.tag).into_owned()
    }

    pub fn as_string(&self) -> String {
        let end = self.data.iter().position(|&b| b == 0).unwrap_or(self.data.len());
        String::from_utf8_lossy(&self.data[..end]).into_owned()
    }

    pub fn as_u32(&self) -> Option<u32> {
        primitives::read_u32le(&self.data, 0).ok()
    }

    pub fn as_i32(&self) -> Option<i32> {
        primitives::read_i32le(&self.data, 0).ok()
    }

    pub fn as_f32(&self) -> Option<f32> {
        primitives::read_f32le(&self.data, 0).ok()
    }

    pub fn as_u16(&self) -> Option<u16> {
        primitives::read_u16le(&self.data, 0).ok()
    }

    pub fn as_u8(&self) -> Option<u8> {
        self.data.first().copied()
    }

    /// Decode the payload as an array of little-endian u32 form-id refs.
    pub fn as_formid_array(&self) -> Vec<u32> {
        primitives::read_u32_array(&self.data)
    }
}

/// A parsed ESM record with its ordered subrecords.
#[derive(Debug, Clone)]
pub struct Record {
    pub record_type: String,
    pub data_size: u32,
    pub flags: u32,
    pub form_id: u32,
    pub revision: u32,
    pub version: u16,
    pub subrecords: Vec<Subrecord>,
}

impl Record {
    pub fn is_compressed(&self) -> bool {
        self.flags & FLAG_COMPRESSED != 0
    }

    pub fn form_id_hex(&self) -> String {
        format!("0x{:08X}", self.form_id)
    }

    pub fn editor_id(&self) -> Option<String> {
        self.get_subrecord("EDID").map(Subrecord::as_string)
    }

    pub fn full_name_id(&self) -> Option<u32> {
        self.subrecords
            .iter()
            .find(|s| s.tag_str() == "FULL" && s.data.len() == 4)
            .and_then(Subrecord::as_u32)
    }

    pub fn desc_id(&self) -> Option<u32> {
        self.subrecords
            .iter()
            .find(|s| s.tag_str() == "DESC" && s.data.len() == 4)
            .and_then(Subrecord::as_u32)
    }

    pub fn get_subrecord(&self, tag: &str) -> Option<&Subrecord> {
        self.subrecords.iter().find(|s| s.tag_str() == tag)
    }

    pub fn get_subrecords<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a Subrecord> {
        self.subrecords.iter().filter(move |s| s.tag_str() == tag)
    }

    pub fn get_keywords(&self) -> Vec<u32> {
        self.get_subrecord("KWDA")
            .map(Subrecord::as_formid_array)
            .unwrap_or_default()
    }

    /// SHA-256 over the concatenation of (tag, size, payload) for every
    /// subrecord in order. Excludes record-level flags/revision/version —
    /// the sole change-detection signal the diff engine relies on.
    pub fn data_hash(&self) -> String {
        let mut hasher = Sha256::new();
        for sub in &self.subrecords {
            hasher.update(sub.tag);
            hasher.update((sub.data.len() as u16).to_le_bytes());
            hasher.update(&sub.data);
        }
        hex::encode(hasher.finalize())
    }
}
