use crate::compile::CompiledPrompt;
use crate::compile::palette::managed_palette_line;
use crate::compile::wizard::compile_wizard_prompt;
use crate::schema::model::{Framing, PaletteMode, PromptBlock, PromptCompileMode, Schema};

const LIMITED_PALETTE_MAX_COLORS: u32 = 6;

/// Compile the active managed prompt according to `PROMPT_MANAGER.compile_mode`.
///
/// - `MINIMAL`: enabled block contents only.
/// - `BALANCED`: blocks, palette line, genome suffix.
/// - `MAX_CONTROL`: blocks, palette line, constraints line, then the full wizard prompt as an
///   appendix after a `---` rule.
pub fn compile_managed_prompt(schema: &Schema) -> CompiledPrompt {
    let pm = &schema.prompt_manager;
    let blocks: &[PromptBlock] = pm
        .active_prompt()
        .map(|p| p.blocks.as_slice())
        .unwrap_or_default();
    let body = join_clean(
        blocks
            .iter()
            .filter(|b| b.enabled)
            .map(|b| b.content.as_str()),
    );
    let warnings = lint_managed_prompt(schema, blocks);

    let text = match pm.compile_mode {
        PromptCompileMode::Minimal => body,
        PromptCompileMode::Balanced => join_clean([
            body.as_str(),
            managed_palette_line(&schema.palette).as_str(),
            schema.prompt_genome.suffix.as_str(),
        ]),
        PromptCompileMode::MaxControl => {
            let constraints = format!(
                "Constraints: max_tokens={}; avoid={}.",
                schema.constraints.max_tokens, schema.constraints.avoid
            );
            let wizard = compile_wizard_prompt(schema).text;
            join_clean([
                body.as_str(),
                managed_palette_line(&schema.palette).as_str(),
                constraints.as_str(),
                "---",
                wizard.as_str(),
            ])
        }
    };

    CompiledPrompt { text, warnings }
}

/// Advisory checks over the enabled blocks of a managed prompt.
pub fn lint_managed_prompt(schema: &Schema, blocks: &[PromptBlock]) -> Vec<String> {
    let text = blocks
        .iter()
        .filter(|b| b.enabled)
        .map(|b| b.content.as_str())
        .collect::<Vec<_>>()
        .join("\n")
        .to_lowercase();

    let has_limited = text.contains("limited palette");
    let has_no_gradient = text.contains("no gradient");
    // The negation itself must not count as a gradient mention.
    let without_negation = text.replace("no gradients", "").replace("no gradient", "");
    let mentions_gradient = without_negation.contains("gradient");
    let has_3d = ["3d render", "octane", "unreal engine"]
        .iter()
        .any(|w| text.contains(w));

    let mut warnings = Vec::new();
    if has_limited
        && schema.palette.mode == PaletteMode::ImageExtract
        && schema.palette.image_extract.max_colors > LIMITED_PALETTE_MAX_COLORS
    {
        warnings.push(
            "Limited palette + image extract max_colors > 6. Consider reducing to 4-6 for consistency."
                .to_owned(),
        );
    }
    if has_no_gradient && mentions_gradient {
        warnings.push("You asked for no gradients but the prompt mentions gradients.".to_owned());
    }
    if has_limited && has_3d {
        warnings.push(
            "Limited palette + 3D render language can fight each other. Consider removing 3D terms."
                .to_owned(),
        );
    }
    if schema.visual_grammar.framing == Framing::Portrait && text.contains("landscape") {
        warnings.push("Portrait framing set but prompt mentions landscape.".to_owned());
    }
    warnings
}

/// Trim each part, drop empties, join with newlines.
fn join_clean<'a>(parts: impl IntoIterator<Item = &'a str>) -> String {
    parts
        .into_iter()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
#[path = "../../tests/unit/compile/managed.rs"]
mod tests;
