//! Enum lookup tables for integer-coded subrecord fields.
//!
//! Ported verbatim (same codes, same names) from `fo76datamine/esm/enums.py`.
//! Every table is a flat array of `(code, name)` pairs rather than a `match`,
//! so a new code can be appended without touching `lookup`.

/// Look up `value` in `table`, falling back to its decimal form when absent.
pub fn lookup(table: &[(u32, &str)], value: u32) -> String {
    table
        .iter()
        .find(|(code, _)| *code == value)
        .map(|(_, name)| name.to_string())
        .unwrap_or_else(|| value.to_string())
}

pub const WEAP_ANIMATION_TYPE: &[(u32, &str)] = &[
    (0, "hand_to_hand"),
    (1, "melee_1h"),
    (2, "melee_2h"),
    (3, "pistol_ballistic"),
    (4, "pistol_automatic"),
    (5, "rifle_ballistic"),
    (6, "rifle_automatic"),
    (7, "shotgun"),
    (8, "thrown"),
    (9, "mine"),
    (10, "bow"),
    (11, "crossbow"),
    (12, "cryolator"),
];

pub const WEAP_SOUND_LEVEL: &[(u32, &str)] = &[
    (0, "loud"),
    (1, "normal"),
    (2, "silent"),
    (3, "very_loud"),
];

pub const MGEF_ARCHETYPE: &[(u32, &str)] = &[
    (0, "value_modifier"),
    (1, "script"),
    (2, "dispel"),
    (3, "cure_disease"),
    (4, "absorb"),
    (5, "dual_value_modifier"),
    (6, "calm"),
    (7, "demoralize"),
    (8, "frenzy"),
    (9, "disarm"),
    (10, "command_summoned"),
    (11, "invisibility"),
    (12, "light"),
    (13, "darkness"),
    (14, "nighteye"),
    (15, "lock"),
    (16, "open"),
    (17, "bound_weapon"),
    (18, "summon_creature"),
    (19, "detect_life"),
    (20, "telekinesis"),
    (21, "paralysis"),
    (22, "reanimate"),
    (23, "soul_trap"),
    (24, "turn_undead"),
    (25, "guide"),
    (26, "werewolf_feed"),
    (27, "cure_paralysis"),
    (28, "cure_addiction"),
    (29, "cure_poison"),
    (30, "concussion"),
    (31, "stimpak"),
    (32, "accumulate_magnitude"),
    (33, "stagger"),
    (34, "peak_value_modifier"),
    (35, "cloak"),
    (36, "werewolf"),
    (37, "slow_time"),
    (38, "rally"),
    (39, "enhance_weapon"),
    (40, "spawn_hazard"),
    (41, "etherealize"),
    (42, "banish"),
    (43, "spawn_scripted_ref"),
    (44, "disguise"),
    (45, "grab_actor"),
    (46, "vampire_lord"),
];

/// MGEF/ENCH/SPEL `cast_type`.
pub const CASTING_TYPE: &[(u32, &str)] = &[
    (0, "constant_effect"),
    (1, "fire_and_forget"),
    (2, "concentration"),
];

/// MGEF `delivery` / ENCH/SPEL `target_type`.
pub const TARGET_TYPE: &[(u32, &str)] = &[
    (0, "self"),
    (1, "touch"),
    (2, "aimed"),
    (3, "target_actor"),
    (4, "target_location"),
];

pub const SPEL_TYPE: &[(u32, &str)] = &[
    (0, "spell"),
    (1, "disease"),
    (2, "power"),
    (3, "lesser_power"),
    (4, "ability"),
    (5, "addiction"),
];

pub const ENCH_TYPE: &[(u32, &str)] = &[(6, "enchantment"), (12, "staff_enchantment")];

pub const OMOD_VALUE_TYPE: &[(u32, &str)] = &[
    (0, "int"),
    (1, "float"),
    (2, "bool"),
    (3, "formid_int"),
    (4, "formid_float"),
    (5, "enum"),
];

pub const OMOD_FUNCTION_TYPE: &[(u32, &str)] = &[(0, "set"), (1, "mul_add"), (2, "add")];

pub const FACT_REACTION: &[(u32, &str)] = &[
    (0, "neutral"),
    (1, "enemy"),
    (2, "ally"),
    (3, "friend"),
];

pub const QUST_TYPE: &[(u32, &str)] = &[
    (0, "none"),
    (1, "main_quest"),
    (2, "side_quest"),
    (3, "misc"),
    (4, "daily"),
    (5, "event"),
    (6, "dungeon"),
    (7, "challenge"),
    (8, "world_event"),
];

pub const FURN_BENCH_TYPE: &[(u32, &str)] = &[
    (0, "none"),
    (1, "create_object"),
    (2, "smithing_armor"),
    (3, "enchanting"),
    (4, "alchemy"),
    (5, "smithing_weapon"),
    (6, "power_armor"),
];

/// CELL `DATA` flags bitfield (not a dense code, looked up bit-by-bit by callers).
pub const CELL_FLAGS: &[(u32, &str)] = &[
    (0x0001, "is_interior"),
    (0x0002, "has_water"),
    (0x0004, "cant_travel_from"),
    (0x0008, "no_lod_water"),
    (0x0020, "public_area"),
    (0x0040, "hand_changed"),
    (0x0080, "show_sky"),
    (0x0100, "use_sky_lighting"),
];

pub const DIAL_TYPE: &[(u32, &str)] = &[
    (0, "topic"),
    (1, "conversation"),
    (2, "combat"),
    (3, "persuasion"),
    (4, "detection"),
    (5, "service"),
    (6, "misc"),
    (7, "scene_dialog"),
];

pub const DIAL_SUBTYPE: &[(u32, &str)] = &[
    (0, "custom"),
    (1, "force_greet"),
    (2, "rumors"),
    (3, "custom_2"),
    (4, "call"),
    (5, "follow"),
    (6, "move"),
    (7, "attack"),
    (8, "inspect"),
    (9, "retrieve"),
    (10, "stay"),
    (11, "release"),
    (12, "show_relationships"),
    (13, "reject"),
    (14, "heal"),
    (15, "assign"),
    (16, "enter"),
    (17, "custom_3"),
    (18, "custom_4"),
    (19, "custom_5"),
];

pub const REGN_DATA_TYPE: &[(u32, &str)] = &[
    (2, "objects"),
    (3, "weather"),
    (4, "map"),
    (5, "land"),
    (6, "grass"),
    (7, "sound"),
    (8, "imposter"),
];

pub const PROJ_TYPE: &[(u32, &str)] = &[
    (1, "missile"),
    (2, "lobber"),
    (3, "beam"),
    (4, "flame"),
    (5, "cone"),
    (6, "barrier"),
    (7, "arrow"),
];

/// EXPL `DATA` flags bitfield.
pub const EXPL_FLAGS: &[(u32, &str)] = &[
    (0x0001, "always_use_world_orientation"),
    (0x0002, "knock_down_always"),
    (0x0004, "knock_down_by_formula"),
    (0x0008, "ignore_los_check"),
    (0x0010, "no_visual"),
    (0x0020, "no_sound"),
];

/// CTDA `run_on` target.
pub const CTDA_RUN_ON: &[(u32, &str)] = &[
    (0, "subject"),
    (1, "target"),
    (2, "reference"),
    (3, "combat_target"),
    (4, "linked_reference"),
    (5, "quest_alias"),
    (6, "package_data"),
    (7, "event_data"),
];
