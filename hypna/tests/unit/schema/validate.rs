use super::*;
use crate::path::set_at;
use crate::schema::defaults::default_schema;
use serde_json::json;

fn defaults() -> Value {
    default_schema().to_value().unwrap()
}

fn with(path: &str, v: Value) -> Value {
    set_at(&defaults(), path, v).unwrap()
}

#[test]
fn catches_out_of_range_influence_weights() {
    let report = validate_schema(&with("INFLUENCE_ENGINE.weights.inkSpray", json!(101)));
    assert!(!report.valid);
    assert!(
        report
            .errors
            .iter()
            .any(|e| e.contains("INFLUENCE_ENGINE.weights.inkSpray out of range")),
        "{:?}",
        report.errors
    );
    assert_eq!(
        report.errors,
        vec!["INFLUENCE_ENGINE.weights.inkSpray out of range 0..100".to_owned()]
    );
}

#[test]
fn non_object_is_rejected_with_a_single_error() {
    for v in [json!(null), json!(3), json!("schema"), json!([1, 2])] {
        let report = validate_schema(&v);
        assert!(!report.valid);
        assert_eq!(report.errors, vec!["schema must be an object".to_owned()]);
    }
}

#[test]
fn version_tag_must_match_exactly() {
    for v in [json!(2), json!("3"), json!(3.5), Value::Null] {
        let report = validate_schema(&with("version", v));
        assert_eq!(report.errors, vec!["version must be 3".to_owned()]);
    }
}

#[test]
fn module_flags_must_be_booleans() {
    let report = validate_schema(&with("MODULES.PALETTE", json!(1)));
    assert_eq!(report.errors, vec!["MODULES.PALETTE must be boolean".to_owned()]);
}

#[test]
fn ignore_rules_must_be_literally_true() {
    let report = validate_schema(&with("IGNORE_RULES.hard_disable", json!(false)));
    assert_eq!(
        report.errors,
        vec!["IGNORE_RULES.hard_disable must be true".to_owned()]
    );

    let mut v = defaults();
    v.as_object_mut().unwrap().remove("IGNORE_RULES");
    let report = validate_schema(&v);
    assert!(report.errors.contains(&"IGNORE_RULES.preserve_state must be true".to_owned()));
}

#[test]
fn numbers_are_not_coerced_from_strings() {
    let report = validate_schema(&with("HALLUCINATION.drift", json!("50")));
    assert_eq!(
        report.errors,
        vec!["HALLUCINATION.drift out of range 0..100".to_owned()]
    );
}

#[test]
fn bounds_are_inclusive() {
    assert!(is_valid_schema(&with("ANIMATION.fps", json!(120))));
    assert!(is_valid_schema(&with("ANIMATION.fps", json!(1))));
    assert!(!is_valid_schema(&with("ANIMATION.fps", json!(0.5))));
    assert!(is_valid_schema(&with("PALETTE.color_wheel.rotate_deg", json!(360))));
}

#[test]
fn enum_fields_reject_unknown_literals() {
    let report = validate_schema(&with("PALETTE.mode", json!("NEON")));
    assert_eq!(report.errors, vec!["PALETTE.mode invalid".to_owned()]);

    let report = validate_schema(&with("ANIMATION.export_mode", json!("ALL_FRAMES")));
    assert_eq!(report.errors, vec!["ANIMATION.export_mode invalid".to_owned()]);

    let report = validate_schema(&with("PROMPT_MANAGER.compile_mode", json!("LOUD")));
    assert_eq!(report.errors, vec!["PROMPT_MANAGER.compile_mode invalid".to_owned()]);
}

#[test]
fn plate_list_is_capped_at_four() {
    let plate = json!({ "hex": "#000000", "role": "accent", "opacity": 50, "misregistration": 0 });
    let report = validate_schema(&with(
        "PALETTE.riso_plates",
        json!([plate.clone(), plate.clone(), plate.clone(), plate.clone(), plate]),
    ));
    assert_eq!(
        report.errors,
        vec!["PALETTE.riso_plates must have max length 4".to_owned()]
    );
}

#[test]
fn plate_elements_are_checked_individually() {
    let v = with("PALETTE.riso_plates.1.hex", json!("#fff"));
    let v = set_at(&v, "PALETTE.riso_plates.0.misregistration", json!(21)).unwrap();
    let report = validate_schema(&v);
    assert_eq!(
        report.errors,
        vec![
            "PALETTE.riso_plates[0].misregistration out of range 0..20".to_owned(),
            "PALETTE.riso_plates[1].hex invalid".to_owned(),
        ]
    );
}

#[test]
fn hex_colors_are_case_insensitive() {
    assert!(is_hex_color("#A0b1C2"));
    assert!(!is_hex_color("A0b1C2"));
    assert!(!is_hex_color("#A0b1C"));
    assert!(!is_hex_color("#A0b1CZ"));
}

#[test]
fn keyframe_contracts_are_checked() {
    let v = with("ANIMATION.keyframes.0.t", json!(1.5));
    let report = validate_schema(&v);
    assert_eq!(
        report.errors,
        vec!["ANIMATION.keyframes[0].t out of range 0..1".to_owned()]
    );

    let mut v = defaults();
    v["ANIMATION"]["keyframes"][1]["curves"]["HALLUCINATION.drift"] = json!([1]);
    let report = validate_schema(&v);
    assert_eq!(
        report.errors,
        vec![
            "ANIMATION.keyframes[1].curves.HALLUCINATION.drift must be a number or string"
                .to_owned()
        ]
    );
}

#[test]
fn keyframe_state_must_be_a_string_when_present() {
    let v = with("ANIMATION.keyframes.0.state", json!(7));
    let report = validate_schema(&v);
    assert_eq!(
        report.errors,
        vec!["ANIMATION.keyframes[0].state must be a string".to_owned()]
    );

    assert!(is_valid_schema(&with("ANIMATION.keyframes.0.state", json!(null))));
    let mut v = defaults();
    v["ANIMATION"]["keyframes"][0]
        .as_object_mut()
        .unwrap()
        .remove("state");
    assert!(is_valid_schema(&v));
}

#[test]
fn prompt_entries_need_their_identifying_strings() {
    let mut v = defaults();
    v["PROMPT_MANAGER"]["prompts"][0]
        .as_object_mut()
        .unwrap()
        .remove("id");
    assert_eq!(
        validate_schema(&v).errors,
        vec!["PROMPT_MANAGER.prompts[0].id is required and must be a string".to_owned()]
    );

    let v = with("PROMPT_MANAGER.style_packs", json!([{ "id": "sp", "name": "Grain" }]));
    assert_eq!(
        validate_schema(&v).errors,
        vec!["PROMPT_MANAGER.style_packs[0].snippet is required and must be a string".to_owned()]
    );

    let v = with("PROMPT_MANAGER.history", json!([{ "id": "h", "name": "n", "compiled": "c" }]));
    assert_eq!(
        validate_schema(&v).errors,
        vec!["PROMPT_MANAGER.history[0].prompt_id is required and must be a string".to_owned()]
    );
}

#[test]
fn prompt_blocks_are_shape_checked() {
    let v = with("PROMPT_MANAGER.prompts.0.blocks.1.kind", json!("POETRY"));
    assert_eq!(
        validate_schema(&v).errors,
        vec![
            "PROMPT_MANAGER.prompts[0].blocks[1].kind is required and must be a known block kind"
                .to_owned()
        ]
    );

    let v = with("PROMPT_MANAGER.prompts.0.blocks.0.enabled", json!("yes"));
    assert_eq!(
        validate_schema(&v).errors,
        vec!["PROMPT_MANAGER.prompts[0].blocks[0].enabled is required and must be boolean".to_owned()]
    );
}

#[test]
fn prompt_manager_lists_and_optional_members_are_typed() {
    let v = with("PROMPT_MANAGER.templates", json!({}));
    assert_eq!(
        validate_schema(&v).errors,
        vec!["PROMPT_MANAGER.templates must be an array".to_owned()]
    );

    let v = with("PROMPT_MANAGER.prompts.0.tags", json!(["ok", 3]));
    assert_eq!(
        validate_schema(&v).errors,
        vec!["PROMPT_MANAGER.prompts[0].tags must be an array of strings".to_owned()]
    );

    let v = with("PROMPT_MANAGER.active_prompt_id", json!(1));
    let v = set_at(&v, "PROMPT_MANAGER.enabled", json!("on")).unwrap();
    assert_eq!(
        validate_schema(&v).errors,
        vec![
            "PROMPT_MANAGER.enabled must be boolean".to_owned(),
            "PROMPT_MANAGER.active_prompt_id must be a string".to_owned(),
        ]
    );

    let mut v = defaults();
    let pm = v["PROMPT_MANAGER"].as_object_mut().unwrap();
    pm.remove("templates");
    pm.remove("active_prompt_id");
    assert!(is_valid_schema(&v));
}

#[test]
fn unlisted_curve_paths_are_still_valid() {
    let mut v = defaults();
    v["ANIMATION"]["keyframes"][0]["curves"]["INPUT.subject"] = json!("a cathedral");
    assert!(is_valid_schema(&v));
}

#[test]
fn counts_must_be_unsigned_integers() {
    let report = validate_schema(&with("CONSTRAINTS.max_tokens", json!(-1)));
    assert_eq!(
        report.errors,
        vec!["CONSTRAINTS.max_tokens must be a non-negative integer".to_owned()]
    );
    let report = validate_schema(&with("PALETTE.color_wheel.count", json!(2.5)));
    assert!(
        report
            .errors
            .contains(&"PALETTE.color_wheel.count must be a non-negative integer".to_owned())
    );
}

#[test]
fn missing_block_is_reported_once_per_rule() {
    let mut v = defaults();
    v.as_object_mut().unwrap().remove("PROMPT_MANAGER");
    let report = validate_schema(&v);
    assert_eq!(
        report.errors,
        vec![
            "PROMPT_MANAGER must be an object".to_owned(),
            "PROMPT_MANAGER.compile_mode invalid".to_owned(),
        ]
    );
}

#[test]
fn approved_schema_survives_a_text_round_trip() {
    let v = defaults();
    assert!(is_valid_schema(&v));
    let text = serde_json::to_string(&v).unwrap();
    let back: Value = serde_json::from_str(&text).unwrap();
    let report = validate_schema(&back);
    assert!(report.valid);
    assert!(report.errors.is_empty());
}

#[test]
fn every_rule_path_parses() {
    for rule in RANGE_RULES {
        DottedPath::parse(rule.path).unwrap();
    }
    for (p, _) in ENUM_RULES {
        DottedPath::parse(p).unwrap();
    }
    for (p, _) in COUNT_RULES {
        DottedPath::parse(p).unwrap();
    }
    for p in HEX_RULES {
        DottedPath::parse(p).unwrap();
    }
}
