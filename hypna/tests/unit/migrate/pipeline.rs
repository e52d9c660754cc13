use super::*;
use crate::path::set_at;
use crate::schema::model::{ExportMode, PaletteMode, PromptCompileMode};
use crate::schema::validate::validate_schema;
use serde_json::json;

fn defaults() -> Value {
    default_schema().to_value().unwrap()
}

fn assert_valid(schema: &Schema) {
    let report = validate_schema(&schema.to_value().unwrap());
    assert!(report.valid, "{:?}", report.errors);
}

#[test]
fn valid_input_is_returned_unchanged() {
    let mut s = default_schema();
    s.input.subject = "a salt flat at noon".to_owned();
    let (out, outcome) = migrate_with_outcome(&s.to_value().unwrap());
    assert_eq!(outcome, MigrationOutcome::Current);
    assert_eq!(out, s);
}

#[test]
fn non_objects_resolve_to_defaults() {
    for v in [json!(null), json!(7), json!("{}"), json!([{}])] {
        let (out, outcome) = migrate_with_outcome(&v);
        assert_eq!(outcome, MigrationOutcome::Defaulted);
        assert_eq!(out, default_schema());
    }
}

#[test]
fn legacy_subject_is_recovered_and_rest_defaults() {
    let (out, outcome) = migrate_with_outcome(&json!({ "subject": "Legacy subject" }));
    assert_eq!(outcome, MigrationOutcome::Legacy);
    assert_eq!(out.input.subject, "Legacy subject");
    assert_eq!(out.palette.mode, PaletteMode::Descriptive);
    assert_eq!(out.hypna_matrix, default_schema().hypna_matrix);
}

#[test]
fn empty_object_keeps_default_module_toggles() {
    let (out, outcome) = migrate_with_outcome(&json!({}));
    assert_eq!(outcome, MigrationOutcome::Legacy);
    assert_eq!(out.modules, default_schema().modules);
    assert!(out.ignore_rules.hard_disable);
    assert!(out.ignore_rules.preserve_state);
}

#[test]
fn legacy_aliases_ignore_unlisted_keys() {
    let out = migrate(&json!({ "intent": 42, "hh": "fractal bloom", "mood": "grim" }));
    assert_eq!(out.input.subject, "42");
    assert_eq!(out.hallucination.profile, "fractal bloom");
    assert_eq!(out.input.notes, default_schema().input.notes);
}

#[test]
fn version_two_gains_prompt_manager_and_keeps_values() {
    let mut v2 = defaults();
    let map = v2.as_object_mut().unwrap();
    map.remove("PROMPT_MANAGER");
    map.insert("version".to_owned(), json!(2));
    let v2 = set_at(&v2, "HALLUCINATION.drift", json!(12)).unwrap();

    let (out, outcome) = migrate_with_outcome(&v2);
    assert_eq!(outcome, MigrationOutcome::Upgraded { from: 2 });
    assert_eq!(out.version, SCHEMA_VERSION);
    assert_eq!(out.hallucination.drift, 12.0);
    assert_eq!(out.prompt_manager.compile_mode, PromptCompileMode::Balanced);
    assert_valid(&out);
}

#[test]
fn hyphen_era_document_is_upgraded() {
    let v1 = json!({
        "schemaVersion": 2,
        "MODULES": { "PALETTE": false, "ANIMATION": true },
        "INPUT": { "subject": "tidal archive", "styleTokens": ["xerox", "halftone"] },
        "STATE-MAP": { "state-name": "hypnopompic", "flow": "loop" },
        "HALLUCINATION": { "level": 64 },
        "HYPNA-MATRIX": { "temporal": 10, "material": 20 },
        "CONSTRAINTS": { "forbid": ["text", "watermark"], "require": [] },
        "ANIMATION": {
            "enabled": true,
            "fps": 8,
            "duration_s": 3,
            "export_mode": "BOTH",
            "keyframes": [
                { "t": 0, "curves": { "HALLUCINATION.level": 10 } },
                { "t": 1, "curves": { "HALLUCINATION.level": 90 } }
            ]
        }
    });
    let (out, outcome) = migrate_with_outcome(&v1);
    assert_eq!(outcome, MigrationOutcome::Upgraded { from: 1 });
    assert_eq!(out.input.subject, "tidal archive");
    assert_eq!(out.prompt_genome.style_tokens, vec!["xerox", "halftone"]);
    assert_eq!(out.state_map.primary_state, "hypnopompic");
    assert_eq!(out.hallucination.drift, 64.0);
    assert_eq!(out.constraints.avoid, "text, watermark");
    assert!(!out.modules.palette);
    assert!(out.modules.animation);
    assert_eq!(out.animation.fps, 8.0);
    assert_eq!(out.animation.duration, 3.0);
    assert_eq!(out.animation.export_mode, ExportMode::AllFrames);
    assert!(out.animation.keyframes[0].curves.contains_key("HALLUCINATION.drift"));
    assert_valid(&out);
}

#[test]
fn out_of_range_values_are_clamped_not_discarded() {
    let v = set_at(&defaults(), "INFLUENCE_ENGINE.weights.inkSpray", json!(150)).unwrap();
    let v = set_at(&v, "INPUT.subject", json!("kept")).unwrap();
    let (out, outcome) = migrate_with_outcome(&v);
    assert_eq!(outcome, MigrationOutcome::Upgraded { from: 3 });
    assert_eq!(out.influence_engine.weights.ink_spray, 100.0);
    assert_eq!(out.input.subject, "kept");
    assert_valid(&out);
}

#[test]
fn wrong_kinds_fall_back_to_default_leaves() {
    let v = set_at(&defaults(), "HALLUCINATION.drift", json!("high")).unwrap();
    let v = set_at(&v, "PALETTE.mode", json!("NEON")).unwrap();
    let v = set_at(&v, "IGNORE_RULES.hard_disable", json!(false)).unwrap();
    let out = migrate(&v);
    let d = default_schema();
    assert_eq!(out.hallucination.drift, d.hallucination.drift);
    assert_eq!(out.palette.mode, d.palette.mode);
    assert!(out.ignore_rules.hard_disable);
    assert_valid(&out);
}

#[test]
fn plate_list_is_truncated_to_four() {
    let plate = json!({ "hex": "#101010", "role": "accent", "opacity": 40, "misregistration": 3 });
    let plates = json!([plate.clone(), plate.clone(), plate.clone(), plate.clone(), plate]);
    let v = set_at(&defaults(), "PALETTE.riso_plates", plates).unwrap();
    let out = migrate(&v);
    assert_eq!(out.palette.riso_plates.len(), 4);
    assert_eq!(out.palette.riso_plates[3].hex, "#101010");
    assert_valid(&out);
}

#[test]
fn undecodable_block_falls_back_alone() {
    let v = set_at(&defaults(), "PROMPT_GENOME.style_tokens", json!([1, 2])).unwrap();
    let v = set_at(&v, "STATE_MAP.intensity", json!(5)).unwrap();
    let out = migrate(&v);
    assert_eq!(out.prompt_genome, default_schema().prompt_genome);
    assert_eq!(out.state_map.intensity, 5.0);
    assert_valid(&out);
}

#[test]
fn one_bad_keyframe_state_keeps_the_rest_of_the_animation() {
    let v = set_at(&defaults(), "ANIMATION.fps", json!(24)).unwrap();
    let v = set_at(&v, "ANIMATION.duration", json!(6.5)).unwrap();
    let keyframes = json!([
        { "t": 0.0, "curves": { "HALLUCINATION.drift": 10 }, "state": "open" },
        { "t": 0.5, "curves": {}, "state": 7 },
        { "t": 1.0, "curves": { "HALLUCINATION.drift": 90 } },
    ]);
    let v = set_at(&v, "ANIMATION.keyframes", keyframes).unwrap();
    assert!(!validate_schema(&v).valid);

    let (out, outcome) = migrate_with_outcome(&v);
    assert_eq!(outcome, MigrationOutcome::Upgraded { from: 3 });
    assert_eq!(out.animation.fps, 24.0);
    assert_eq!(out.animation.duration, 6.5);
    let kfs = &out.animation.keyframes;
    assert_eq!(kfs.len(), 3);
    assert_eq!(kfs[0].state.as_deref(), Some("open"));
    assert_eq!(kfs[1].t, 0.5);
    assert_eq!(kfs[1].state, None);
    assert_eq!(kfs[2].t, 1.0);
    assert_valid(&out);
}

#[test]
fn prompt_without_id_is_dropped_not_the_whole_library() {
    let mut v = defaults();
    v["PROMPT_MANAGER"]["prompts"]
        .as_array_mut()
        .unwrap()
        .push(json!({ "name": "orphan" }));
    v["PROMPT_MANAGER"]["compile_mode"] = json!("MAX_CONTROL");
    assert!(!validate_schema(&v).valid);

    let out = migrate(&v);
    let d = default_schema();
    assert_eq!(out.prompt_manager.prompts, d.prompt_manager.prompts);
    assert_eq!(out.prompt_manager.compile_mode, PromptCompileMode::MaxControl);
    assert_valid(&out);
}

#[test]
fn migration_is_idempotent() {
    let inputs = [
        json!(null),
        json!({}),
        json!({ "subject": "x", "palette": ["a"] }),
        json!({ "version": 2, "MODULES": { "PALETTE": "yes" }, "PALETTE": { "riso_plates": "none" } }),
        json!({ "schemaVersion": 2, "MODULES": {}, "HALLUCINATION": { "level": 400 } }),
        set_at(&defaults(), "ANIMATION.keyframes.0.t", json!(-3)).unwrap(),
        set_at(&defaults(), "PALETTE.color_wheel.count", json!(12.5)).unwrap(),
        defaults(),
    ];
    for input in inputs {
        let once = migrate(&input);
        assert_valid(&once);
        let (twice, outcome) = migrate_with_outcome(&once.to_value().unwrap());
        assert_eq!(outcome, MigrationOutcome::Current, "input: {input}");
        assert_eq!(once, twice, "input: {input}");
    }
}

#[test]
fn versions_are_detected_only_with_a_module_map() {
    assert_eq!(detect_version(&json!({ "version": 3, "MODULES": {} })), Some(3));
    assert_eq!(detect_version(&json!({ "version": 2, "MODULES": {} })), Some(2));
    assert_eq!(detect_version(&json!({ "schemaVersion": 2, "MODULES": {} })), Some(1));
    assert_eq!(detect_version(&json!({ "version": 2 })), None);
    assert_eq!(detect_version(&json!({ "version": 9, "MODULES": {} })), None);
    assert_eq!(detect_version(&json!({ "version": 2, "MODULES": [] })), None);
}

#[test]
fn overlay_is_type_directed() {
    let base = json!({ "a": 1, "b": { "c": "x", "d": [1] }, "n": null });
    let input = json!({ "a": "one", "b": { "c": "y", "d": [], "e": true }, "n": 5, "z": 0 });
    assert_eq!(
        overlay(base, &input),
        json!({ "a": 1, "b": { "c": "y", "d": [], "e": true }, "n": 5, "z": 0 })
    );
}
