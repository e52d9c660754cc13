use crate::compile::influence::{Punctuation, render_influence_behaviors};
use crate::compile::palette::render_palette_footer;
use crate::schema::model::Schema;
use crate::schema::module::ModuleKey;
use serde::Serialize;

const MAX_ACTIONS: usize = 3;
const MAX_PLATES: usize = 4;
const MAX_STYLE_TOKENS: usize = 6;

/// Whether a wizard section was emitted, and why.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DebugSection {
    /// Section heading, e.g. `"3) Diagram/structure"`.
    pub title: String,
    /// `included (...)` or `skipped (...)`.
    pub text: String,
}

/// Output of [`compile_wizard_prompt`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct WizardPrompt {
    /// Newline-joined prompt lines.
    pub text: String,
    /// One entry per gated section, in prompt order.
    pub debug_sections: Vec<DebugSection>,
}

struct Section {
    title: &'static str,
    requires: &'static [ModuleKey],
    included: &'static str,
    skipped: &'static str,
}

const INTENT: Section = Section {
    title: "1) Intent/Subject",
    requires: &[ModuleKey::Input, ModuleKey::PromptGenome],
    included: "included (INPUT + PROMPT_GENOME)",
    skipped: "skipped (INPUT or PROMPT_GENOME disabled)",
};

const PERCEPTION: Section = Section {
    title: "2) Hallucination physics + perception",
    requires: &[
        ModuleKey::Hallucination,
        ModuleKey::PromptGenome,
        ModuleKey::HypnaMatrix,
    ],
    included: "included (HALLUCINATION + PROMPT_GENOME + HYPNA_MATRIX)",
    skipped: "skipped (required module disabled)",
};

const DIAGRAM: Section = Section {
    title: "3) Diagram/structure",
    requires: &[ModuleKey::VisualGrammar],
    included: "included (VISUAL_GRAMMAR)",
    skipped: "skipped (VISUAL_GRAMMAR disabled)",
};

const INFLUENCE: Section = Section {
    title: "4) Influence/material behaviors",
    requires: &[ModuleKey::InfluenceEngine],
    included: "included (INFLUENCE_ENGINE)",
    skipped: "skipped (INFLUENCE_ENGINE disabled)",
};

const PALETTE: Section = Section {
    title: "5) Palette footer",
    requires: &[ModuleKey::Palette],
    included: "included (PALETTE)",
    skipped: "skipped (PALETTE disabled)",
};

const CONSTRAINTS: Section = Section {
    title: "6) Constraints footer",
    requires: &[ModuleKey::Constraints],
    included: "included (CONSTRAINTS)",
    skipped: "skipped (CONSTRAINTS disabled)",
};

struct Builder<'a> {
    schema: &'a Schema,
    lines: Vec<String>,
    debug: Vec<DebugSection>,
}

impl Builder<'_> {
    /// Record the gate outcome for `section` and return whether it is open.
    fn open(&mut self, section: &Section) -> bool {
        let on = section
            .requires
            .iter()
            .all(|k| self.schema.module_enabled(*k));
        let text = if on { section.included } else { section.skipped };
        self.debug.push(DebugSection {
            title: section.title.to_owned(),
            text: text.to_owned(),
        });
        on
    }
}

/// Module-gated prompt: each section is emitted only when every module it reads is enabled.
pub fn compile_wizard_prompt(schema: &Schema) -> WizardPrompt {
    let mut b = Builder {
        schema,
        lines: Vec::new(),
        debug: Vec::new(),
    };
    let genome = &schema.prompt_genome;

    if b.open(&INTENT) {
        b.lines.push(genome.prefix.clone());
        b.lines.push(format!(
            "Intent: {} in {}. Structure: {}.",
            schema.input.subject, schema.input.medium, genome.structure
        ));
    }

    if b.open(&PERCEPTION) {
        let h = &schema.hallucination;
        let m = &schema.hypna_matrix;
        b.lines.push(format!(
            "Perception physics: {}, drift={}; {}; matrix({}/{}) depth={}.",
            h.profile,
            round(h.drift),
            genome.perception,
            m.axis_x,
            m.axis_y,
            round(m.depth)
        ));
    }

    if b.open(&DIAGRAM) {
        let v = &schema.visual_grammar;
        b.lines.push(format!(
            "Diagram: {} frame, {} lens, detail={}.",
            v.framing,
            v.lens,
            round(v.detail)
        ));
    }

    if b.open(&INFLUENCE) {
        let actions: Vec<String> = render_influence_behaviors(
            &schema.influence_engine.weights,
            100.0,
            Punctuation::Period,
        )
        .into_iter()
        .take(MAX_ACTIONS)
        .collect();
        if !actions.is_empty() {
            b.lines.push(format!("Actions: {}", actions.join(" ")));
        }
    }

    if b.open(&PALETTE) {
        let p = &schema.palette;
        let plates = p
            .riso_plates
            .iter()
            .take(MAX_PLATES)
            .map(|plate| format!("{}:{}", plate.role, plate.hex))
            .collect::<Vec<_>>()
            .join(", ");
        let plates = if plates.is_empty() { "auto".to_owned() } else { plates };
        b.lines.push(format!(
            "Palette: {}; plates={plates}. {}",
            p.mode,
            render_palette_footer(p)
        ));
    }

    if b.open(&CONSTRAINTS) {
        let c = &schema.constraints;
        b.lines.push(format!(
            "Constraints: require tactile ink overlap; forbid {}; max_tokens={}.",
            c.avoid, c.max_tokens
        ));
    }

    if schema.module_enabled(ModuleKey::PromptGenome) {
        let tokens = genome
            .style_tokens
            .iter()
            .take(MAX_STYLE_TOKENS)
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        b.lines
            .push(format!("Style tokens: {tokens}. Seed={}.", genome.seed));
        b.lines.push(genome.suffix.clone());
    }

    WizardPrompt {
        text: b.lines.join("\n"),
        debug_sections: b.debug,
    }
}

fn round(v: f64) -> i64 {
    v.round() as i64
}

#[cfg(test)]
#[path = "../../tests/unit/compile/wizard.rs"]
mod tests;
