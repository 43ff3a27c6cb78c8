//! Per-record-type decoders.
//!
//! Each decoder reads a fixed list of subrecords at fixed offsets, as laid
//! out in `spec.md` §4.F. Every offset read goes through `primitives`, which
//! bounds-checks against the subrecord's actual payload length, so a short
//! or malformed subrecord silently yields fewer fields rather than a panic
//! or garbage value.
//!
//! The long tail (STAT, MSTT, AACT, CELL, WRLD, LCTN, REGN, WTHR, DIAL,
//! INFO, IDLE, ENTM, SCOL, EXPL, PROJ, HAZD, WATR, CURV, CNCY) reads the
//! subrecords implied by `esm::enums`' lookup tables, which the original
//! tool carried but never wired a decoder to.

use crate::esm::{enums, Record, Subrecord};
use crate::primitives;

use super::{format_flags16, format_flags32, format_formid, Field, ValueKind};

fn push_u32(fields: &mut Vec<Field>, data: &[u8], offset: usize, name: &str) {
    if let Ok(v) = primitives::read_u32le(data, offset) {
        fields.push(Field::new(name, v.to_string(), ValueKind::Integer));
    }
}

fn push_i32(fields: &mut Vec<Field>, data: &[u8], offset: usize, name: &str) {
    if let Ok(v) = primitives::read_i32le(data, offset) {
        fields.push(Field::new(name, v.to_string(), ValueKind::Integer));
    }
}

fn push_u16(fields: &mut Vec<Field>, data: &[u8], offset: usize, name: &str) {
    if let Ok(v) = primitives::read_u16le(data, offset) {
        fields.push(Field::new(name, v.to_string(), ValueKind::Integer));
    }
}

fn push_u8(fields: &mut Vec<Field>, data: &[u8], offset: usize, name: &str) {
    if let Ok(v) = primitives::read_u8(data, offset) {
        fields.push(Field::new(name, v.to_string(), ValueKind::Integer));
    }
}

fn push_f32(fields: &mut Vec<Field>, data: &[u8], offset: usize, name: &str, decimals: usize) {
    if let Ok(v) = primitives::read_f32le(data, offset) {
        fields.push(Field::new(name, format!("{v:.decimals$}"), ValueKind::Float));
    }
}

fn push_formid(fields: &mut Vec<Field>, data: &[u8], offset: usize, name: &str) {
    if let Ok(v) = primitives::read_u32le(data, offset) {
        if v != 0 {
            fields.push(Field::new(name, format_formid(v), ValueKind::FormId));
        }
    }
}

fn push_enum_u32(fields: &mut Vec<Field>, data: &[u8], offset: usize, name: &str, table: &[(u32, &str)]) {
    if let Ok(v) = primitives::read_u32le(data, offset) {
        fields.push(Field::new(name, enums::lookup(table, v), ValueKind::Enum));
    }
}

fn push_enum_u8(fields: &mut Vec<Field>, data: &[u8], offset: usize, name: &str, table: &[(u32, &str)]) {
    if let Ok(v) = primitives::read_u8(data, offset) {
        fields.push(Field::new(name, enums::lookup(table, v as u32), ValueKind::Enum));
    }
}

fn push_string(fields: &mut Vec<Field>, sub: Option<&Subrecord>, name: &str) {
    if let Some(s) = sub {
        let v = s.as_string();
        if !v.is_empty() {
            fields.push(Field::new(name, v, ValueKind::String));
        }
    }
}

/// Shared `EFID`(u32 fid)/`EFIT`(12 B: magnitude, area, duration) pairing
/// used by ALCH, ENCH, and SPEL alike.
fn decode_effects(record: &Record) -> Vec<Field> {
    let mut fields = Vec::new();
    let efids: Vec<&Subrecord> = record.get_subrecords("EFID").collect();
    let efits: Vec<&Subrecord> = record.get_subrecords("EFIT").collect();

    for (i, (efid, efit)) in efids.iter().zip(efits.iter()).enumerate() {
        let Some(id) = efid.as_u32() else { continue };
        fields.push(Field::new(format!("effect_{i}_id"), format_formid(id), ValueKind::FormId));
        push_f32(&mut fields, &efit.data, 0, &format!("effect_{i}_magnitude"), 2);
        push_u32(&mut fields, &efit.data, 4, &format!("effect_{i}_area"));
        push_u32(&mut fields, &efit.data, 8, &format!("effect_{i}_duration"));
    }

    fields
}

pub fn decode_weap(record: &Record) -> Vec<Field> {
    let mut fields = Vec::new();
    if let Some(dnam) = record.get_subrecord("DNAM") {
        let d = &dnam.data;
        push_enum_u32(&mut fields, d, 0, "animation_type", enums::WEAP_ANIMATION_TYPE);
        push_f32(&mut fields, d, 4, "speed", 4);
        push_f32(&mut fields, d, 8, "reach", 2);
        push_f32(&mut fields, d, 24, "min_range", 2);
        push_f32(&mut fields, d, 28, "max_range", 2);
        push_f32(&mut fields, d, 32, "attack_delay", 2);
        push_f32(&mut fields, d, 44, "out_of_range_dmg_mult", 2);
        push_f32(&mut fields, d, 48, "secondary_damage", 2);
        push_f32(&mut fields, d, 52, "weight", 2);
        push_u32(&mut fields, d, 56, "value");
        push_f32(&mut fields, d, 60, "damage", 1);
        push_u8(&mut fields, d, 101, "num_projectiles");
        push_enum_u32(&mut fields, d, 112, "sound_level", enums::WEAP_SOUND_LEVEL);
    }
    if let Some(crdt) = record.get_subrecord("CRDT") {
        push_f32(&mut fields, &crdt.data, 0, "crit_damage", 2);
        push_f32(&mut fields, &crdt.data, 4, "crit_multiplier", 2);
    }
    if let Some(dama) = record.get_subrecord("DAMA") {
        for (i, chunk) in dama.data.chunks_exact(8).enumerate() {
            push_formid(&mut fields, chunk, 0, &format!("damage_type_{i}_id"));
            push_f32(&mut fields, chunk, 4, &format!("damage_type_{i}_value"), 2);
        }
    }
    fields
}

pub fn decode_armo(record: &Record) -> Vec<Field> {
    let mut fields = Vec::new();
    if let Some(data) = record.get_subrecord("DATA") {
        push_i32(&mut fields, &data.data, 0, "value");
        push_f32(&mut fields, &data.data, 4, "weight", 2);
        push_u32(&mut fields, &data.data, 8, "health");
    }
    if let Some(dnam) = record.get_subrecord("DNAM") {
        push_u32(&mut fields, &dnam.data, 0, "armor_rating");
    }
    if let Some(bod2) = record.get_subrecord("BOD2") {
        if let Ok(v) = primitives::read_u32le(&bod2.data, 0) {
            fields.push(Field::new("biped_slots", format_flags32(v), ValueKind::Flags));
        }
    }
    fields
}

pub fn decode_alch(record: &Record) -> Vec<Field> {
    let mut fields = Vec::new();
    if let Some(data) = record.get_subrecord("DATA") {
        push_f32(&mut fields, &data.data, 0, "weight", 2);
    }
    if let Some(enit) = record.get_subrecord("ENIT") {
        let d = &enit.data;
        push_i32(&mut fields, d, 0, "value");
        if let Ok(flags) = primitives::read_u32le(d, 4) {
            fields.push(Field::new("enit_flags", format_flags32(flags), ValueKind::Flags));
            fields.push(Field::new("is_food", (flags & (1 << 1) != 0).to_string(), ValueKind::Integer));
            fields.push(Field::new("is_medicine", (flags & (1 << 16) != 0).to_string(), ValueKind::Integer));
            fields.push(Field::new("is_poison", (flags & (1 << 17) != 0).to_string(), ValueKind::Integer));
        }
        push_formid(&mut fields, d, 8, "addiction");
        push_formid(&mut fields, d, 16, "consume_sound");
    }
    fields.extend(decode_effects(record));
    fields
}

pub fn decode_npc(record: &Record) -> Vec<Field> {
    let mut fields = Vec::new();
    if let Some(acbs) = record.get_subrecord("ACBS") {
        let d = &acbs.data;
        if let Ok(flags) = primitives::read_u32le(d, 0) {
            fields.push(Field::new("npc_flags", format_flags32(flags), ValueKind::Flags));
        }
        push_u16(&mut fields, d, 6, "npc_level");
        push_u16(&mut fields, d, 8, "calc_min_level");
        push_u16(&mut fields, d, 10, "calc_max_level");
    }
    if let Some(dnam) = record.get_subrecord("DNAM") {
        push_u16(&mut fields, &dnam.data, 0, "base_health");
        push_u16(&mut fields, &dnam.data, 2, "base_action_points");
    }
    if let Some(rnam) = record.get_subrecord("RNAM") {
        push_formid(&mut fields, &rnam.data, 0, "race");
    }
    fields
}

pub fn decode_qust(record: &Record) -> Vec<Field> {
    let mut fields = Vec::new();
    if let Some(data) = record.get_subrecord("DATA") {
        let d = &data.data;
        if let Ok(flags) = primitives::read_u16le(d, 0) {
            fields.push(Field::new("quest_flags", format_flags16(flags), ValueKind::Flags));
        }
        push_u8(&mut fields, d, 2, "priority");
        push_enum_u8(&mut fields, d, 3, "quest_type", enums::QUST_TYPE);
    }
    fields
}

pub fn decode_cobj(record: &Record) -> Vec<Field> {
    let mut fields = Vec::new();
    if let Some(cnam) = record.get_subrecord("CNAM") {
        push_formid(&mut fields, &cnam.data, 0, "created_object");
    }
    if let Some(bnam) = record.get_subrecord("BNAM") {
        push_formid(&mut fields, &bnam.data, 0, "workbench_keyword");
    }
    if let Some(dnam) = record.get_subrecord("DNAM") {
        push_u32(&mut fields, &dnam.data, 4, "created_count");
    }
    if let Some(fvpa) = record.get_subrecord("FVPA") {
        for (i, chunk) in fvpa.data.chunks_exact(8).enumerate() {
            push_formid(&mut fields, chunk, 0, &format!("component_{i}_id"));
            push_u32(&mut fields, chunk, 4, &format!("component_{i}_count"));
        }
    }
    fields
}

pub fn decode_ammo(record: &Record) -> Vec<Field> {
    let mut fields = Vec::new();
    if let Some(data) = record.get_subrecord("DATA") {
        push_i32(&mut fields, &data.data, 0, "projectile_count");
        push_f32(&mut fields, &data.data, 4, "weight", 2);
    }
    if let Some(dnam) = record.get_subrecord("DNAM") {
        push_formid(&mut fields, &dnam.data, 0, "projectile");
        push_u32(&mut fields, &dnam.data, 4, "ammo_flags");
        push_f32(&mut fields, &dnam.data, 8, "speed", 2);
    }
    fields
}

pub fn decode_misc_book_keym(record: &Record) -> Vec<Field> {
    let mut fields = Vec::new();
    if let Some(data) = record.get_subrecord("DATA") {
        push_i32(&mut fields, &data.data, 0, "value");
        push_f32(&mut fields, &data.data, 4, "weight", 2);
    }
    fields
}

pub fn decode_gmst(record: &Record) -> Vec<Field> {
    let mut fields = Vec::new();
    let Some(edid) = record.editor_id() else { return fields };
    let Some(data) = record.get_subrecord("DATA") else { return fields };
    let Some(first_char) = edid.chars().next() else { return fields };

    match first_char {
        'f' => push_f32(&mut fields, &data.data, 0, "value", 4),
        'i' | 'u' => push_i32(&mut fields, &data.data, 0, "value"),
        's' => {
            let v = data.as_string();
            fields.push(Field::new("value", v, ValueKind::String));
        }
        'b' => {
            if let Ok(v) = primitives::read_u32le(&data.data, 0) {
                fields.push(Field::new("value", (v != 0).to_string(), ValueKind::Integer));
            }
        }
        _ => {}
    }
    fields
}

pub fn decode_glob(record: &Record) -> Vec<Field> {
    let mut fields = Vec::new();
    let type_code = record.get_subrecord("FNAM").and_then(Subrecord::as_u8);
    if let Some(fltv) = record.get_subrecord("FLTV") {
        if let Ok(v) = primitives::read_f32le(&fltv.data, 0) {
            match type_code {
                Some(0x73) | Some(0x6C) => {
                    fields.push(Field::new("value", format!("{}", v as i64), ValueKind::Integer));
                }
                _ => fields.push(Field::new("value", format!("{v:.4}"), ValueKind::Float)),
            }
        }
    }
    fields
}

pub fn decode_cont(record: &Record) -> Vec<Field> {
    let mut fields = Vec::new();
    for (i, cnto) in record.get_subrecords("CNTO").enumerate() {
        push_formid(&mut fields, &cnto.data, 0, &format!("item_{i}_id"));
        push_i32(&mut fields, &cnto.data, 4, &format!("item_{i}_count"));
    }
    fields
}

pub fn decode_flor(record: &Record) -> Vec<Field> {
    let mut fields = Vec::new();
    if let Some(pfig) = record.get_subrecord("PFIG") {
        push_formid(&mut fields, &pfig.data, 0, "harvest_ingredient");
    }
    fields
}

pub fn decode_lvli_lvln(record: &Record) -> Vec<Field> {
    let mut fields = Vec::new();
    if let Some(lvld) = record.get_subrecord("LVLD") {
        push_u8(&mut fields, &lvld.data, 0, "chance_none");
    }
    if let Some(lvlf) = record.get_subrecord("LVLF") {
        if let Some(flags) = lvlf.data.first() {
            fields.push(Field::new("calculate_all", (flags & 0x01 != 0).to_string(), ValueKind::Integer));
            fields.push(Field::new("calculate_all_lte_pc", (flags & 0x02 != 0).to_string(), ValueKind::Integer));
            fields.push(Field::new("use_all", (flags & 0x04 != 0).to_string(), ValueKind::Integer));
        }
    }
    if let Some(llct) = record.get_subrecord("LLCT") {
        push_u8(&mut fields, &llct.data, 0, "entry_count");
    }
    for (i, lvlo) in record.get_subrecords("LVLO").enumerate() {
        push_u16(&mut fields, &lvlo.data, 0, &format!("entry_{i}_level"));
        push_formid(&mut fields, &lvlo.data, 4, &format!("entry_{i}_ref"));
        push_u16(&mut fields, &lvlo.data, 8, &format!("entry_{i}_count"));
    }
    fields
}

pub fn decode_perk(record: &Record) -> Vec<Field> {
    let mut fields = Vec::new();
    if let Some(data) = record.get_subrecord("DATA") {
        let d = &data.data;
        if let Ok(v) = primitives::read_u8(d, 0) {
            fields.push(Field::new("is_playable", (v != 0).to_string(), ValueKind::Integer));
        }
        push_u8(&mut fields, d, 1, "trait");
        push_u8(&mut fields, d, 2, "level");
        push_u8(&mut fields, d, 3, "num_ranks");
        if let Ok(v) = primitives::read_u8(d, 4) {
            fields.push(Field::new("hidden", (v != 0).to_string(), ValueKind::Integer));
        }
    }
    if let Some(nnam) = record.get_subrecord("NNAM") {
        push_formid(&mut fields, &nnam.data, 0, "next_perk");
    }
    fields
}

/// Approximate layout: the source never decoded ENIT/SPIT. Offsets follow
/// `spec.md`'s field order at 4-byte strides, the same documented-assumption
/// style as OMOD's property offset.
pub fn decode_ench_spel(record: &Record) -> Vec<Field> {
    let mut fields = Vec::new();
    let sub = record.get_subrecord("ENIT").or_else(|| record.get_subrecord("SPIT"));
    if let Some(sub) = sub {
        let d = &sub.data;
        push_u32(&mut fields, d, 0, "cost");
        push_u32(&mut fields, d, 4, "flags");
        push_enum_u32(&mut fields, d, 8, "cast_type", enums::CASTING_TYPE);
        push_u32(&mut fields, d, 12, "charge_amount");
        push_enum_u32(&mut fields, d, 16, "target_type", enums::TARGET_TYPE);
        if record.record_type == "SPEL" {
            push_enum_u32(&mut fields, d, 20, "spell_type", enums::SPEL_TYPE);
        } else {
            push_enum_u32(&mut fields, d, 20, "enchant_type", enums::ENCH_TYPE);
        }
        push_f32(&mut fields, d, 24, "charge_time", 2);
        push_formid(&mut fields, d, 28, "base_enchantment_or_perk");
    }
    fields.extend(decode_effects(record));
    fields
}

pub fn decode_mgef(record: &Record) -> Vec<Field> {
    let mut fields = Vec::new();
    if let Some(data) = record.get_subrecord("DATA") {
        let d = &data.data;
        push_u32(&mut fields, d, 0, "mgef_flags");
        push_f32(&mut fields, d, 4, "base_cost", 2);
        push_formid(&mut fields, d, 8, "related_id");
        push_u32(&mut fields, d, 12, "magic_skill");
        push_u32(&mut fields, d, 16, "resist_value");
        push_u32(&mut fields, d, 20, "casting_light");
        push_f32(&mut fields, d, 24, "taper_weight", 2);
        push_enum_u32(&mut fields, d, 48, "archetype", enums::MGEF_ARCHETYPE);
        push_enum_u32(&mut fields, d, 52, "casting_type", enums::CASTING_TYPE);
        push_enum_u32(&mut fields, d, 56, "delivery", enums::TARGET_TYPE);
    }
    fields
}

pub fn decode_omod(record: &Record) -> Vec<Field> {
    let mut fields = Vec::new();
    let Some(data) = record.get_subrecord("DATA") else { return fields };
    let d = &data.data;
    push_u8(&mut fields, d, 0, "include_count");
    let Some(property_count) = primitives::read_u8(d, 1).ok() else { return fields };
    fields.push(Field::new("property_count", property_count.to_string(), ValueKind::Integer));

    for i in 0..property_count as usize {
        let offset = 8 + i * 24;
        if offset + 24 > d.len() {
            break;
        }
        push_enum_u8(&mut fields, d, offset, &format!("property_{i}_value_type"), enums::OMOD_VALUE_TYPE);
        push_enum_u8(&mut fields, d, offset + 1, &format!("property_{i}_function_type"), enums::OMOD_FUNCTION_TYPE);
        push_formid(&mut fields, d, offset + 4, &format!("property_{i}_keyword"));
        push_f32(&mut fields, d, offset + 8, &format!("property_{i}_value1"), 4);
        push_f32(&mut fields, d, offset + 12, &format!("property_{i}_value2"), 4);
        push_f32(&mut fields, d, offset + 16, &format!("property_{i}_step"), 4);
    }
    fields
}

pub fn decode_fact(record: &Record) -> Vec<Field> {
    let mut fields = Vec::new();
    if let Some(data) = record.get_subrecord("DATA") {
        if let Ok(flags) = primitives::read_u32le(&data.data, 0) {
            fields.push(Field::new("faction_flags", format_flags32(flags), ValueKind::Flags));
        }
    }
    for (i, xnam) in record.get_subrecords("XNAM").enumerate() {
        push_formid(&mut fields, &xnam.data, 0, &format!("faction_{i}_id"));
        push_i32(&mut fields, &xnam.data, 4, &format!("faction_{i}_modifier"));
        push_enum_u32(&mut fields, &xnam.data, 8, &format!("faction_{i}_reaction"), enums::FACT_REACTION);
    }
    fields
}

pub fn decode_race(record: &Record) -> Vec<Field> {
    let mut fields = Vec::new();
    if let Some(data) = record.get_subrecord("DATA") {
        let d = &data.data;
        push_u32(&mut fields, d, 0, "race_flags");
        push_f32(&mut fields, d, 36, "starting_health", 2);
        push_f32(&mut fields, d, 40, "starting_magicka", 2);
        push_f32(&mut fields, d, 44, "starting_stamina", 2);
    }
    if let Some(dnam) = record.get_subrecord("DNAM") {
        push_formid(&mut fields, &dnam.data, 0, "default_hair");
    }
    fields
}

pub fn decode_term(record: &Record) -> Vec<Field> {
    let mut fields = Vec::new();
    push_string(&mut fields, record.get_subrecord("DNAM"), "terminal_header");
    for (i, btxt) in record.get_subrecords("BTXT").enumerate() {
        let v = btxt.as_string();
        if !v.is_empty() {
            fields.push(Field::new(format!("menu_item_{i}"), v, ValueKind::String));
        }
    }
    for (i, itxt) in record.get_subrecords("ITXT").enumerate() {
        let v = itxt.as_string();
        if !v.is_empty() {
            fields.push(Field::new(format!("item_text_{i}"), v, ValueKind::String));
        }
    }
    fields
}

pub fn decode_avif(record: &Record) -> Vec<Field> {
    let mut fields = Vec::new();
    push_string(&mut fields, record.get_subrecord("ANAM"), "abbreviation");
    if let Some(avfl) = record.get_subrecord("AVFL") {
        push_f32(&mut fields, &avfl.data, 0, "default_value", 2);
    }
    if let Some(data) = record.get_subrecord("DATA") {
        if let Ok(flags) = primitives::read_u32le(&data.data, 0) {
            fields.push(Field::new("avif_flags", format_flags32(flags), ValueKind::Flags));
        }
    }
    fields
}

pub fn decode_acti(record: &Record) -> Vec<Field> {
    let mut fields = Vec::new();
    if let Some(fnam) = record.get_subrecord("FNAM") {
        if let Ok(flags) = primitives::read_u16le(&fnam.data, 0) {
            fields.push(Field::new("activator_flags", format_flags16(flags), ValueKind::Flags));
        }
    }
    if let Some(wnam) = record.get_subrecord("WNAM") {
        push_formid(&mut fields, &wnam.data, 0, "water_type");
    }
    if let Some(rnam) = record.get_subrecord("RNAM") {
        push_formid(&mut fields, &rnam.data, 0, "sound");
    }
    // Localized id is resolved against the string table at the driver/store
    // layer, same as FULL/DESC; the decoder only exposes the raw id here.
    if let Some(vnam) = record.get_subrecord("VNAM") {
        push_u32(&mut fields, &vnam.data, 0, "verb_override_string_id");
    }
    fields
}

pub fn decode_lscr(record: &Record) -> Vec<Field> {
    let mut fields = Vec::new();
    push_string(&mut fields, record.get_subrecord("NNAM"), "loading_screen_nif");
    if let Some(onam) = record.get_subrecord("ONAM") {
        let d = &onam.data;
        push_f32(&mut fields, d, 0, "rotation_min", 2);
        push_f32(&mut fields, d, 4, "rotation_max", 2);
        push_f32(&mut fields, d, 8, "zoom", 2);
    }
    fields
}

pub fn decode_mesg(record: &Record) -> Vec<Field> {
    let mut fields = Vec::new();
    if let Some(dnam) = record.get_subrecord("DNAM") {
        if let Ok(flags) = primitives::read_u32le(&dnam.data, 0) {
            fields.push(Field::new("message_flags", format_flags32(flags), ValueKind::Flags));
            fields.push(Field::new("is_message_box", (flags & 0x01 != 0).to_string(), ValueKind::Integer));
        }
    }
    if let Some(tnam) = record.get_subrecord("TNAM") {
        push_f32(&mut fields, &tnam.data, 0, "display_time", 2);
    }
    for (i, itxt) in record.get_subrecords("ITXT").enumerate() {
        let v = itxt.as_string();
        if !v.is_empty() {
            fields.push(Field::new(format!("button_{i}"), v, ValueKind::String));
        }
    }
    fields
}

pub fn decode_furn(record: &Record) -> Vec<Field> {
    let mut fields = Vec::new();
    if let Some(fnam) = record.get_subrecord("FNAM") {
        if let Ok(flags) = primitives::read_u16le(&fnam.data, 0) {
            fields.push(Field::new("furniture_flags", format_flags16(flags), ValueKind::Flags));
        }
    }
    if let Some(wbdt) = record.get_subrecord("WBDT") {
        push_enum_u8(&mut fields, &wbdt.data, 0, "bench_type", enums::FURN_BENCH_TYPE);
        push_u8(&mut fields, &wbdt.data, 1, "uses_skill");
    }
    if let Some(knam) = record.get_subrecord("KNAM") {
        push_formid(&mut fields, &knam.data, 0, "interact_keyword");
    }
    fields
}

// --- Long tail: shapes implied by esm::enums' tables, never wired up by the
// original tool's decoders.py. ---

pub fn decode_stat(record: &Record) -> Vec<Field> {
    let mut fields = Vec::new();
    if let Some(dnam) = record.get_subrecord("DNAM") {
        push_f32(&mut fields, &dnam.data, 0, "max_angle_30_to_60", 2);
    }
    fields
}

pub fn decode_mstt(record: &Record) -> Vec<Field> {
    let mut fields = Vec::new();
    if let Some(data) = record.get_subrecord("DATA") {
        if let Some(flags) = data.data.first() {
            fields.push(Field::new("mstt_flags", format!("0x{flags:02X}"), ValueKind::Flags));
        }
    }
    if let Some(snam) = record.get_subrecord("SNAM") {
        push_formid(&mut fields, &snam.data, 0, "sound");
    }
    fields
}

pub fn decode_aact(record: &Record) -> Vec<Field> {
    let mut fields = Vec::new();
    if let Some(cnam) = record.get_subrecord("CNAM") {
        if let Ok(color) = primitives::read_u32le(&cnam.data, 0) {
            fields.push(Field::new("color", format_flags32(color), ValueKind::Flags));
        }
    }
    fields
}

pub fn decode_cell(record: &Record) -> Vec<Field> {
    let mut fields = Vec::new();
    if let Some(data) = record.get_subrecord("DATA") {
        if let Ok(flags) = primitives::read_u16le(&data.data, 0) {
            let names: Vec<&str> = enums::CELL_FLAGS
                .iter()
                .filter(|(bit, _)| flags as u32 & bit != 0)
                .map(|(_, name)| *name)
                .collect();
            fields.push(Field::new("cell_flags", format_flags16(flags), ValueKind::Flags));
            fields.push(Field::new("cell_flag_names", names.join("|"), ValueKind::String));
        }
    }
    fields
}

pub fn decode_wrld(record: &Record) -> Vec<Field> {
    let mut fields = Vec::new();
    if let Some(dnam) = record.get_subrecord("DNAM") {
        push_f32(&mut fields, &dnam.data, 0, "default_land_height", 2);
        push_f32(&mut fields, &dnam.data, 4, "default_water_height", 2);
    }
    fields
}

pub fn decode_lctn(record: &Record) -> Vec<Field> {
    let mut fields = Vec::new();
    if let Some(pnam) = record.get_subrecord("PNAM") {
        push_formid(&mut fields, &pnam.data, 0, "parent_location");
    }
    fields
}

pub fn decode_regn(record: &Record) -> Vec<Field> {
    let mut fields = Vec::new();
    for (i, rdat) in record.get_subrecords("RDAT").enumerate() {
        let d = &rdat.data;
        push_enum_u32(&mut fields, d, 0, &format!("region_entry_{i}_type"), enums::REGN_DATA_TYPE);
        push_u8(&mut fields, d, 4, &format!("region_entry_{i}_flags"));
        push_u8(&mut fields, d, 5, &format!("region_entry_{i}_priority"));
    }
    fields
}

pub fn decode_wthr(record: &Record) -> Vec<Field> {
    let mut fields = Vec::new();
    if let Some(fnam) = record.get_subrecord("FNAM") {
        push_f32(&mut fields, &fnam.data, 0, "fog_distance_near", 2);
    }
    fields
}

pub fn decode_dial(record: &Record) -> Vec<Field> {
    let mut fields = Vec::new();
    if let Some(data) = record.get_subrecord("DATA") {
        push_enum_u8(&mut fields, &data.data, 0, "dial_type", enums::DIAL_TYPE);
        push_enum_u8(&mut fields, &data.data, 1, "dial_subtype", enums::DIAL_SUBTYPE);
    }
    fields
}

pub fn decode_info(record: &Record) -> Vec<Field> {
    let mut fields = Vec::new();
    if let Some(enam) = record.get_subrecord("ENAM") {
        if let Ok(flags) = primitives::read_u16le(&enam.data, 0) {
            fields.push(Field::new("info_flags", format_flags16(flags), ValueKind::Flags));
        }
    }
    fields
}

pub fn decode_idle(record: &Record) -> Vec<Field> {
    let mut fields = Vec::new();
    push_string(&mut fields, record.get_subrecord("ANAM"), "animation_event");
    fields
}

pub fn decode_entm(record: &Record) -> Vec<Field> {
    let mut fields = Vec::new();
    if let Some(data) = record.get_subrecord("DATA") {
        if let Ok(flags) = primitives::read_u32le(&data.data, 0) {
            fields.push(Field::new("entm_flags", format_flags32(flags), ValueKind::Flags));
        }
    }
    fields
}

pub fn decode_scol(record: &Record) -> Vec<Field> {
    let mut fields = Vec::new();
    let count = record.get_subrecords("ONAM").count();
    if count > 0 {
        fields.push(Field::new("placement_count", count.to_string(), ValueKind::Integer));
    }
    fields
}

pub fn decode_expl(record: &Record) -> Vec<Field> {
    let mut fields = Vec::new();
    if let Some(data) = record.get_subrecord("DATA") {
        let d = &data.data;
        if let Ok(flags) = primitives::read_u32le(d, 0) {
            let names: Vec<&str> = enums::EXPL_FLAGS
                .iter()
                .filter(|(bit, _)| flags & bit != 0)
                .map(|(_, name)| *name)
                .collect();
            fields.push(Field::new("explosion_flags", format_flags32(flags), ValueKind::Flags));
            fields.push(Field::new("explosion_flag_names", names.join("|"), ValueKind::String));
        }
        push_f32(&mut fields, d, 4, "force", 2);
        push_f32(&mut fields, d, 8, "damage", 2);
        push_f32(&mut fields, d, 12, "radius", 2);
    }
    fields
}

pub fn decode_proj(record: &Record) -> Vec<Field> {
    let mut fields = Vec::new();
    if let Some(data) = record.get_subrecord("DATA") {
        let d = &data.data;
        if let Ok(flags) = primitives::read_u16le(d, 0) {
            fields.push(Field::new("projectile_flags", format_flags16(flags), ValueKind::Flags));
        }
        push_enum_u32(&mut fields, d, 2, "projectile_type", enums::PROJ_TYPE);
        push_f32(&mut fields, d, 4, "gravity", 2);
        push_f32(&mut fields, d, 8, "speed", 2);
    }
    fields
}

pub fn decode_hazd(record: &Record) -> Vec<Field> {
    let mut fields = Vec::new();
    if let Some(data) = record.get_subrecord("DATA") {
        let d = &data.data;
        push_u32(&mut fields, d, 0, "limit");
        push_f32(&mut fields, d, 4, "radius", 2);
        push_f32(&mut fields, d, 8, "lifetime", 2);
        push_f32(&mut fields, d, 12, "image_space_radius", 2);
    }
    fields
}

pub fn decode_watr(record: &Record) -> Vec<Field> {
    let mut fields = Vec::new();
    push_string(&mut fields, record.get_subrecord("NNAM"), "noise_texture");
    fields
}

pub fn decode_curv(record: &Record) -> Vec<Field> {
    let mut fields = Vec::new();
    push_string(&mut fields, record.get_subrecord("CNAM"), "curve_name");
    fields
}

pub fn decode_cncy(record: &Record) -> Vec<Field> {
    let mut fields = Vec::new();
    if let Some(data) = record.get_subrecord("DATA") {
        push_i32(&mut fields, &data.data, 0, "value");
    }
    fields
}
