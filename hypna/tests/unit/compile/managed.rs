use super::*;
use crate::schema::defaults::default_schema;
use crate::schema::model::PromptBlockKind;

fn block(content: &str) -> PromptBlock {
    PromptBlock {
        id: "b".to_owned(),
        kind: PromptBlockKind::Core,
        enabled: true,
        content: content.to_owned(),
    }
}

fn managed(mode: PromptCompileMode) -> Schema {
    let mut s = default_schema();
    s.prompt_manager.enabled = true;
    s.prompt_manager.compile_mode = mode;
    s
}

#[test]
fn minimal_is_just_the_enabled_blocks() {
    let mut s = managed(PromptCompileMode::Minimal);
    s.prompt_manager.prompts[0].blocks[1].enabled = false;
    let out = compile_managed_prompt(&s);
    assert_eq!(
        out.text,
        "Prompt directives:\n- Subject: monumental surreal portrait\n\
         - Render constraints: flat ink fields, visible overprint\n\
         Negative prompt: oversaturated colors, cartoon style"
    );
}

#[test]
fn balanced_appends_palette_and_suffix() {
    let out = compile_managed_prompt(&managed(PromptCompileMode::Balanced));
    let lines: Vec<&str> = out.text.lines().collect();
    assert_eq!(lines[lines.len() - 2], "Palette: graphite, bone white, silver.");
    assert_eq!(lines[lines.len() - 1], "avoid cheerful palette");
}

#[test]
fn max_control_appends_the_wizard_prompt() {
    let s = managed(PromptCompileMode::MaxControl);
    let out = compile_managed_prompt(&s);
    let wizard = compile_wizard_prompt(&s).text;
    assert!(out.text.contains(
        "Constraints: max_tokens=220; avoid=oversaturated colors, cartoon style.\n---\n"
    ));
    assert!(out.text.ends_with(&wizard));
}

#[test]
fn unknown_active_id_uses_first_prompt() {
    let mut s = managed(PromptCompileMode::Minimal);
    s.prompt_manager.active_prompt_id = "gone".to_owned();
    assert!(compile_managed_prompt(&s).text.starts_with("Prompt directives:"));

    s.prompt_manager.prompts.clear();
    assert_eq!(compile_managed_prompt(&s).text, "");
}

#[test]
fn no_gradients_alone_is_not_a_contradiction() {
    let s = default_schema();
    assert!(lint_managed_prompt(&s, &[block("Flat inks, no gradients.")]).is_empty());
    assert_eq!(
        lint_managed_prompt(&s, &[block("No gradients."), block("soft gradient sky")]),
        vec!["You asked for no gradients but the prompt mentions gradients.".to_owned()]
    );
}

#[test]
fn disabled_blocks_are_not_linted() {
    let s = default_schema();
    let mut b = block("landscape vista");
    b.enabled = false;
    assert!(lint_managed_prompt(&s, &[b]).is_empty());
}

#[test]
fn palette_and_framing_conflicts_are_reported() {
    let mut s = default_schema();
    s.palette.mode = PaletteMode::ImageExtract;
    s.palette.image_extract.max_colors = 8;
    let warnings = lint_managed_prompt(
        &s,
        &[block("Limited palette, octane look, wide landscape")],
    );
    assert_eq!(warnings.len(), 3);
    assert!(warnings[0].starts_with("Limited palette + image extract"));
    assert!(warnings[1].starts_with("Limited palette + 3D"));
    assert!(warnings[2].starts_with("Portrait framing"));
}
