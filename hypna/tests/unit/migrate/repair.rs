use super::*;
use crate::path::set_at;
use crate::schema::defaults::default_schema;
use crate::schema::validate::is_valid_schema;
use serde_json::json;

fn defaults() -> Value {
    default_schema().to_value().unwrap()
}

#[test]
fn valid_document_needs_no_fixes() {
    let d = defaults();
    let mut doc = d.clone();
    assert_eq!(repair(&mut doc, &d), 0);
    assert_eq!(doc, d);
}

#[test]
fn numbers_clamp_to_the_nearest_bound() {
    let d = defaults();
    let mut doc = set_at(&d, "ANIMATION.fps", json!(500)).unwrap();
    doc = set_at(&doc, "PALETTE.riso_plates.0.opacity", json!(-4.5)).unwrap();
    assert_eq!(repair(&mut doc, &d), 2);
    assert_eq!(doc["ANIMATION"]["fps"], json!(120));
    assert_eq!(doc["PALETTE"]["riso_plates"][0]["opacity"], json!(0));
    assert!(is_valid_schema(&doc));
}

#[test]
fn keyframe_times_clamp_into_unit_range() {
    let d = defaults();
    let mut doc = set_at(&d, "ANIMATION.keyframes.1.t", json!(1.25)).unwrap();
    repair(&mut doc, &d);
    assert_eq!(doc["ANIMATION"]["keyframes"][1]["t"], json!(1));
    assert!(is_valid_schema(&doc));
}

#[test]
fn plates_beyond_the_defaults_borrow_the_first_default_plate() {
    let d = defaults();
    let plate = json!({ "hex": "nope", "role": "ghost", "opacity": 10, "misregistration": 1 });
    let mut doc = d.clone();
    let plates = doc["PALETTE"]["riso_plates"].as_array_mut().unwrap();
    plates.push(Value::Null);
    plates.push(plate);
    // The null at index 2 is dropped.
    repair(&mut doc, &d);
    let plates = doc["PALETTE"]["riso_plates"].as_array().unwrap();
    assert_eq!(plates.len(), 3);
    assert_eq!(plates[2]["hex"], d["PALETTE"]["riso_plates"][0]["hex"]);
    assert_eq!(plates[2]["role"], d["PALETTE"]["riso_plates"][0]["role"]);
    assert_eq!(plates[2]["opacity"], json!(10));
    assert!(is_valid_schema(&doc));
}

#[test]
fn bad_curve_values_are_dropped() {
    let d = defaults();
    let mut doc = d.clone();
    doc["ANIMATION"]["keyframes"][0]["curves"]["HALLUCINATION.drift"] = json!({ "x": 1 });
    doc["ANIMATION"]["keyframes"][1]["curves"] = json!("drift");
    repair(&mut doc, &d);
    let kfs = &doc["ANIMATION"]["keyframes"];
    assert!(kfs[0]["curves"].get("HALLUCINATION.drift").is_none());
    assert!(kfs[0]["curves"].get("PALETTE.color_wheel.rotate_deg").is_some());
    assert_eq!(kfs[1]["curves"], json!({}));
    assert!(is_valid_schema(&doc));
}

#[test]
fn non_object_block_takes_the_default_block() {
    let d = defaults();
    let mut doc = set_at(&d, "VISUAL_GRAMMAR", json!(3)).unwrap();
    repair(&mut doc, &d);
    assert_eq!(doc["VISUAL_GRAMMAR"], d["VISUAL_GRAMMAR"]);
    assert!(is_valid_schema(&doc));
}

#[test]
fn fixes_inside_a_replaced_block_are_skipped() {
    let d = defaults();
    let mut doc = set_at(&d, "VISUAL_GRAMMAR", json!(3)).unwrap();
    let violations = collect_violations(&doc);
    assert!(violations.len() > 1, "{violations:?}");
    repair_pass(&mut doc, &d, &violations);
    assert_eq!(doc, d);
}

#[test]
fn removed_elements_are_not_repaired_first() {
    let d = defaults();
    let mut doc = d.clone();
    doc["ANIMATION"]["keyframes"][0] = json!(5);
    repair(&mut doc, &d);
    let kfs = doc["ANIMATION"]["keyframes"].as_array().unwrap();
    assert_eq!(kfs.len(), 1);
    assert_eq!(kfs[0], d["ANIMATION"]["keyframes"][1]);
}

#[test]
fn mistyped_keyframe_state_is_dropped() {
    let d = defaults();
    let mut doc = set_at(&d, "ANIMATION.keyframes.1.state", json!(7)).unwrap();
    repair(&mut doc, &d);
    let kf = &doc["ANIMATION"]["keyframes"][1];
    assert!(kf.get("state").is_none());
    assert_eq!(kf["t"], d["ANIMATION"]["keyframes"][1]["t"]);
    assert_eq!(kf["curves"], d["ANIMATION"]["keyframes"][1]["curves"]);
    assert!(is_valid_schema(&doc));
}

#[test]
fn prompt_entries_missing_required_members_are_dropped() {
    let d = defaults();
    let kept = json!({ "id": "p2", "name": "Kept" });
    let prompts = json!([{ "name": "no id" }, kept.clone(), { "id": 4, "name": "bad id" }]);
    let mut doc = set_at(&d, "PROMPT_MANAGER.prompts", prompts).unwrap();
    repair(&mut doc, &d);
    assert_eq!(doc["PROMPT_MANAGER"]["prompts"], json!([kept]));
    assert!(is_valid_schema(&doc));
}

#[test]
fn bad_block_goes_without_taking_its_prompt() {
    let d = defaults();
    let mut doc = d.clone();
    doc["PROMPT_MANAGER"]["prompts"][0]["blocks"][1]["kind"] = json!("POETRY");
    doc["PROMPT_MANAGER"]["prompts"][0]["blocks"][1]["enabled"] = json!(1);
    doc["PROMPT_MANAGER"]["prompts"][0]["tags"] = json!([1]);
    repair(&mut doc, &d);

    let prompt = &doc["PROMPT_MANAGER"]["prompts"][0];
    let before = d["PROMPT_MANAGER"]["prompts"][0]["blocks"].as_array().unwrap();
    let after = prompt["blocks"].as_array().unwrap();
    assert_eq!(after.len(), before.len() - 1);
    assert_eq!(after[0], before[0]);
    assert_eq!(after[1], before[2]);
    assert!(prompt.get("tags").is_none());
    assert_eq!(prompt["id"], d["PROMPT_MANAGER"]["prompts"][0]["id"]);
    assert!(is_valid_schema(&doc));
}

#[test]
fn nested_and_outer_removals_do_not_collide() {
    let d = defaults();
    let mut doc = d.clone();
    let mut second = d["PROMPT_MANAGER"]["prompts"][0].clone();
    second["id"] = json!("p2");
    second["blocks"][0]["content"] = json!(null);
    let prompts = json!([{ "name": "no id" }, second, { "id": "p3", "name": "Third" }]);
    doc["PROMPT_MANAGER"]["prompts"] = prompts;
    repair(&mut doc, &d);

    let prompts = doc["PROMPT_MANAGER"]["prompts"].as_array().unwrap();
    assert_eq!(prompts.len(), 2);
    assert_eq!(prompts[0]["id"], json!("p2"));
    assert_eq!(
        prompts[0]["blocks"].as_array().unwrap().len(),
        d["PROMPT_MANAGER"]["prompts"][0]["blocks"].as_array().unwrap().len() - 1
    );
    assert_eq!(prompts[1], json!({ "id": "p3", "name": "Third" }));
    assert!(is_valid_schema(&doc));
}

#[test]
fn integral_clamp_is_written_as_integer() {
    assert_eq!(number(8.0), json!(8));
    assert_eq!(number(0.5), json!(0.5));
}
