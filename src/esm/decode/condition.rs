//! CTDA condition-block grouping and formatting.
//!
//! `spec.md` Design Notes calls for "a one-pass iterator adapter that emits
//! `(CTDA, Option<CIS1>, Option<CIS2>)` triples," preserving the source's
//! sequential-scan-with-state approach to subrecord grouping (the source has
//! no CTDA decoder of its own; this grouping and the CTDA layout come
//! straight from `spec.md` §4.F).

use crate::esm::{Record, Subrecord};
use crate::primitives;

use super::{format_formid, Field, ValueKind};

/// One CTDA subrecord plus its optional trailing CIS1/CIS2 string annotations.
pub struct ConditionGroup<'a> {
    pub ctda: &'a Subrecord,
    pub cis1: Option<&'a Subrecord>,
    pub cis2: Option<&'a Subrecord>,
}

/// Scan `record`'s subrecords once, grouping each CTDA with any CIS1/CIS2
/// that immediately follow it before the next CTDA (or end of record).
pub fn group_conditions(record: &Record) -> Vec<ConditionGroup<'_>> {
    let mut groups = Vec::new();
    let mut iter = record.subrecords.iter().peekable();

    while let Some(sub) = iter.next() {
        if sub.tag_str() != "CTDA" {
            continue;
        }
        let mut cis1 = None;
        let mut cis2 = None;
        while let Some(next) = iter.peek() {
            match next.tag_str().as_str() {
                "CIS1" => {
                    cis1 = Some(*next);
                    iter.next();
                }
                "CIS2" => {
                    cis2 = Some(*next);
                    iter.next();
                }
                _ => break,
            }
        }
        groups.push(ConditionGroup { ctda: sub, cis1, cis2 });
    }

    groups
}

struct Ctda {
    op_byte: u8,
    comparison: f32,
    function_index: u16,
    param1: u32,
    param2: u32,
    run_on: u32,
    reference: u32,
}

fn parse_ctda(data: &[u8]) -> Option<Ctda> {
    if data.len() < 32 {
        return None;
    }
    Some(Ctda {
        op_byte: primitives::read_u8(data, 0).ok()?,
        comparison: primitives::read_f32le(data, 4).ok()?,
        function_index: primitives::read_u16le(data, 8).ok()?,
        param1: primitives::read_u32le(data, 12).ok()?,
        param2: primitives::read_u32le(data, 16).ok()?,
        run_on: primitives::read_u32le(data, 20).ok()?,
        reference: primitives::read_u32le(data, 24).ok()?,
    })
}

fn operator_str(op_byte: u8) -> &'static str {
    match op_byte & 0x07 {
        0 => "==",
        1 => "!=",
        2 => ">",
        3 => ">=",
        4 => "<",
        5 => "<=",
        _ => "==",
    }
}

/// Condition function names, keyed by the Construction-Set function index.
/// Unknown indices fall back to their decimal form, per the `UnknownEnum`
/// policy.
const FUNCTION_NAMES: &[(u16, &str)] = &[
    (1, "get_distance"),
    (5, "get_locked"),
    (6, "get_pos"),
    (7, "get_angle"),
    (8, "get_starting_pos"),
    (9, "get_starting_angle"),
    (10, "get_seconds_passed"),
    (14, "get_actor_value"),
    (18, "get_current_time"),
    (24, "get_is_id"),
    (25, "get_is_class"),
    (27, "get_is_race"),
    (32, "get_is_sex"),
    (39, "get_in_faction"),
    (40, "get_item_count"),
    (41, "get_is_playable"),
    (42, "get_is_spell_target"),
    (48, "get_dead"),
    (56, "get_disabled"),
    (57, "get_global_value"),
    (67, "get_is_current_weather"),
    (69, "get_quest_running"),
    (72, "get_stage"),
    (73, "get_stage_done"),
    (74, "get_random_percent"),
    (98, "get_level"),
    (104, "get_health_percentage"),
    (123, "get_is_objective_completed"),
    (125, "get_quest_completed"),
    (449, "get_is_aligned_to_faction"),
    (530, "get_vats_value"),
];

fn function_name(index: u16) -> String {
    FUNCTION_NAMES
        .iter()
        .find(|(code, _)| *code == index)
        .map(|(_, name)| name.to_string())
        .unwrap_or_else(|| index.to_string())
}

/// Emit the full set of `condition_<i>_*` fields plus `condition_count`.
pub fn decode_conditions(record: &Record) -> Vec<Field> {
    let groups = group_conditions(record);
    let mut fields = Vec::new();

    for (i, group) in groups.iter().enumerate() {
        let Some(ctda) = parse_ctda(&group.ctda.data) else {
            continue;
        };
        let prefix = format!("condition_{i}");

        fields.push(Field::new(
            format!("{prefix}_raw"),
            hex::encode(&group.ctda.data),
            ValueKind::String,
        ));
        fields.push(Field::new(format!("{prefix}_function"), ctda.function_index.to_string(), ValueKind::Integer));
        fields.push(Field::new(
            format!("{prefix}_function_name"),
            function_name(ctda.function_index),
            ValueKind::Enum,
        ));
        fields.push(Field::new(format!("{prefix}_operator"), operator_str(ctda.op_byte), ValueKind::String));
        fields.push(Field::new(
            format!("{prefix}_comparison"),
            format!("{:.6}", ctda.comparison),
            ValueKind::Float,
        ));
        fields.push(Field::new(format!("{prefix}_param1_hex"), format_formid(ctda.param1), ValueKind::FormId));
        if let Some(cis1) = group.cis1 {
            fields.push(Field::new(format!("{prefix}_param1_string"), cis1.as_string(), ValueKind::String));
        }
        fields.push(Field::new(format!("{prefix}_param2_hex"), format_formid(ctda.param2), ValueKind::FormId));
        if let Some(cis2) = group.cis2 {
            fields.push(Field::new(format!("{prefix}_param2_string"), cis2.as_string(), ValueKind::String));
        }
        fields.push(Field::new(
            format!("{prefix}_run_on"),
            crate::esm::enums::lookup(crate::esm::enums::CTDA_RUN_ON, ctda.run_on),
            ValueKind::Enum,
        ));
        if ctda.reference != 0 && ctda.reference != 0xFFFF_FFFF {
            fields.push(Field::new(format!("{prefix}_reference"), format_formid(ctda.reference), ValueKind::FormId));
        }
        fields.push(Field::new(
            format!("{prefix}_summary"),
            format!(
                "{} {} {:.2}",
                function_name(ctda.function_index),
                operator_str(ctda.op_byte),
                ctda.comparison
            ),
            ValueKind::String,
        ));
    }

    if !groups.is_empty() {
        fields.push(Field::new("condition_count", groups.len().to_string(), ValueKind::Integer));
    }

    fields
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctda_bytes(op_byte: u8, comparison: f32, function_index: u16, param1: u32, param2: u32, run_on: u32, reference: u32) -> Vec<u8> {
        let mut out = vec![op_byte, 0, 0, 0];
        out.extend_from_slice(&comparison.to_le_bytes());
        out.extend_from_slice(&function_index.to_le_bytes());
        out.extend_from_slice(&[0, 0]);
        out.extend_from_slice(&param1.to_le_bytes());
        out.extend_from_slice(&param2.to_le_bytes());
        out.extend_from_slice(&run_on.to_le_bytes());
        out.extend_from_slice(&reference.to_le_bytes());
        out.extend_from_slice(&[0u8; 4]);
        out
    }

    fn sub(tag: &[u8; 4], data: Vec<u8>) -> Subrecord {
        Subrecord { tag: *tag, data }
    }

    #[test]
    fn groups_ctda_with_trailing_cis_strings() {
        let record = Record {
            record_type: "QUST".into(),
            data_size: 0,
            flags: 0,
            form_id: 1,
            revision: 0,
            version: 1,
            subrecords: vec![
                sub(b"CTDA", ctda_bytes(0, 1.0, 57, 0x100, 0, 0, 0)),
                sub(b"CIS1", b"GlobalA\0".to_vec()),
                sub(b"CIS2", b"GlobalB\0".to_vec()),
            ],
        };
        let groups = group_conditions(&record);
        assert_eq!(groups.len(), 1);
        assert!(groups[0].cis1.is_some());
        assert!(groups[0].cis2.is_some());
    }

    #[test]
    fn decodes_operator_and_function_name() {
        // 0xA2 = 1010_0010: high 3 bits (101) would decode as "<=" if the
        // operator were read from the high bits, but the low 3 bits (010)
        // decode as ">", which is what the spec's low-bit reading requires.
        let record = Record {
            record_type: "QUST".into(),
            data_size: 0,
            flags: 0,
            form_id: 1,
            revision: 0,
            version: 1,
            subrecords: vec![sub(b"CTDA", ctda_bytes(0xA2, 3.5, 57, 1, 2, 0, 0))],
        };
        let fields = decode_conditions(&record);
        let operator = fields.iter().find(|f| f.name == "condition_0_operator").unwrap();
        assert_eq!(operator.value, ">");
        let func_name = fields.iter().find(|f| f.name == "condition_0_function_name").unwrap();
        assert_eq!(func_name.value, "get_global_value");
    }

    #[test]
    fn zero_reference_is_omitted() {
        let record = Record {
            record_type: "QUST".into(),
            data_size: 0,
            flags: 0,
            form_id: 1,
            revision: 0,
            version: 1,
            subrecords: vec![sub(b"CTDA", ctda_bytes(0, 0.0, 1, 0, 0, 0, 0))],
        };
        let fields = decode_conditions(&record);
        assert!(!fields.iter().any(|f| f.name == "condition_0_reference"));
    }
}
