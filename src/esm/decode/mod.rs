//! Type-dispatched subrecord decoder.
//!
//! A registry maps a 4-char record type to a decoder function producing
//! `(field_name, value_string, value_kind)` rows; this is the "decoder
//! registry as a dispatch table" design note, realized as a flat array of
//! `(tag, fn)` pairs rather than a `HashMap`, matching the source's intent
//! without paying for hashing on every record.

pub mod condition;
mod types;

use crate::esm::Record;

/// How a decoded field's string value should be interpreted at display time.
/// The value itself is always text, uniformly, for diffing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Integer,
    Float,
    String,
    FormId,
    Flags,
    Enum,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub value: String,
    pub kind: ValueKind,
}

impl Field {
    pub fn new(name: impl Into<String>, value: impl Into<String>, kind: ValueKind) -> Self {
        Field { name: name.into(), value: value.into(), kind }
    }
}

pub fn format_formid(fid: u32) -> String {
    format!("0x{fid:08X}")
}

pub fn format_flags32(flags: u32) -> String {
    format!("0x{flags:08X}")
}

pub fn format_flags16(flags: u16) -> String {
    format!("0x{flags:04X}")
}

type DecoderFn = fn(&Record) -> Vec<Field>;

const DECODERS: &[(&str, DecoderFn)] = &[
    ("WEAP", types::decode_weap),
    ("ARMO", types::decode_armo),
    ("ALCH", types::decode_alch),
    ("NPC_", types::decode_npc),
    ("QUST", types::decode_qust),
    ("COBJ", types::decode_cobj),
    ("AMMO", types::decode_ammo),
    ("MISC", types::decode_misc_book_keym),
    ("BOOK", types::decode_misc_book_keym),
    ("KEYM", types::decode_misc_book_keym),
    ("GMST", types::decode_gmst),
    ("GLOB", types::decode_glob),
    ("CONT", types::decode_cont),
    ("FLOR", types::decode_flor),
    ("LVLI", types::decode_lvli_lvln),
    ("LVLN", types::decode_lvli_lvln),
    ("PERK", types::decode_perk),
    ("ENCH", types::decode_ench_spel),
    ("SPEL", types::decode_ench_spel),
    ("MGEF", types::decode_mgef),
    ("OMOD", types::decode_omod),
    ("FACT", types::decode_fact),
    ("RACE", types::decode_race),
    ("TERM", types::decode_term),
    ("AVIF", types::decode_avif),
    ("ACTI", types::decode_acti),
    ("LSCR", types::decode_lscr),
    ("MESG", types::decode_mesg),
    ("FURN", types::decode_furn),
    ("STAT", types::decode_stat),
    ("MSTT", types::decode_mstt),
    ("AACT", types::decode_aact),
    ("CELL", types::decode_cell),
    ("WRLD", types::decode_wrld),
    ("LCTN", types::decode_lctn),
    ("REGN", types::decode_regn),
    ("WTHR", types::decode_wthr),
    ("DIAL", types::decode_dial),
    ("INFO", types::decode_info),
    ("IDLE", types::decode_idle),
    ("ENTM", types::decode_entm),
    ("SCOL", types::decode_scol),
    ("EXPL", types::decode_expl),
    ("PROJ", types::decode_proj),
    ("HAZD", types::decode_hazd),
    ("WATR", types::decode_watr),
    ("CURV", types::decode_curv),
    ("CNCY", types::decode_cncy),
];

fn lookup_decoder(record_type: &str) -> Option<DecoderFn> {
    DECODERS.iter().find(|(tag, _)| *tag == record_type).map(|(_, f)| *f)
}

/// Universal fields emitted for every record regardless of type: icon,
/// icon_small, model, keyword_N, and CTDA condition blocks.
fn universal_fields(record: &Record) -> Vec<Field> {
    let mut fields = Vec::new();

    if let Some(sub) = record.get_subrecord("ICON") {
        let v = sub.as_string();
        if !v.is_empty() {
            fields.push(Field::new("icon", v, ValueKind::String));
        }
    }
    if let Some(sub) = record.get_subrecord("MICO") {
        let v = sub.as_string();
        if !v.is_empty() {
            fields.push(Field::new("icon_small", v, ValueKind::String));
        }
    }
    if let Some(sub) = record.get_subrecord("MODL") {
        let v = sub.as_string();
        if !v.is_empty() {
            fields.push(Field::new("model", v, ValueKind::String));
        }
    }
    for (i, fid) in record.get_keywords().into_iter().enumerate() {
        fields.push(Field::new(format!("keyword_{i}"), format_formid(fid), ValueKind::FormId));
    }

    fields.extend(condition::decode_conditions(record));

    fields
}

/// Decode one record into its full set of named fields: universal fields
/// plus whatever its type-specific decoder contributes, if registered.
pub fn decode(record: &Record) -> Vec<Field> {
    let mut fields = universal_fields(record);
    if let Some(decoder) = lookup_decoder(&record.record_type) {
        fields.extend(decoder(record));
    }
    fields
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::esm::record::Subrecord;

    fn sub(tag: &[u8; 4], data: &[u8]) -> Subrecord {
        Subrecord { tag: *tag, data: data.to_vec() }
    }

    fn record(record_type: &str, subrecords: Vec<Subrecord>) -> Record {
        Record {
            record_type: record_type.into(),
            data_size: 0,
            flags: 0,
            form_id: 1,
            revision: 0,
            version: 1,
            subrecords,
        }
    }

    #[test]
    fn icon_and_model_emitted_when_nonempty() {
        let r = record("MISC", vec![sub(b"ICON", b"icon.dds\0"), sub(b"MODL", b"mesh.nif\0")]);
        let fields = decode(&r);
        assert!(fields.iter().any(|f| f.name == "icon" && f.value == "icon.dds"));
        assert!(fields.iter().any(|f| f.name == "model" && f.value == "mesh.nif"));
    }

    #[test]
    fn empty_icon_not_emitted() {
        let r = record("MISC", vec![sub(b"ICON", b"\0")]);
        let fields = decode(&r);
        assert!(!fields.iter().any(|f| f.name == "icon"));
    }

    #[test]
    fn unregistered_type_still_gets_universal_fields() {
        let r = record("ZZZZ", vec![sub(b"MODL", b"x.nif\0")]);
        let fields = decode(&r);
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].name, "model");
    }
}
