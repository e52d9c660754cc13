//! Schema snapshot -> prompt text.
//!
//! The timeline engine depends only on [`PromptCompiler`]; [`DefaultCompiler`] is the
//! implementation shipped with the crate. It dispatches between the managed prompt (when
//! `PROMPT_MANAGER.enabled`) and the module-gated wizard prompt.

pub(crate) mod influence;
pub(crate) mod managed;
pub(crate) mod palette;
pub(crate) mod wizard;

pub use influence::{Punctuation, render_influence_behaviors};
pub use managed::{compile_managed_prompt, lint_managed_prompt};
pub use palette::render_palette_footer;
pub use wizard::{DebugSection, WizardPrompt, compile_wizard_prompt};

use crate::schema::model::Schema;
use serde::Serialize;

/// Compiled text plus advisory lint warnings.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CompiledPrompt {
    /// Prompt text.
    pub text: String,
    /// Advisory warnings; never fatal.
    pub warnings: Vec<String>,
}

/// Compile with the managed prompt when enabled, otherwise with the wizard.
pub fn compile_prompt(schema: &Schema) -> CompiledPrompt {
    if schema.prompt_manager.enabled {
        return compile_managed_prompt(schema);
    }
    CompiledPrompt {
        text: compile_wizard_prompt(schema).text,
        warnings: Vec::new(),
    }
}

/// Turns a schema snapshot into text.
///
/// Implementations must be pure: identical schema content yields identical text. The frame
/// series calls this once per frame.
pub trait PromptCompiler {
    /// Compile one snapshot.
    fn compile(&self, schema: &Schema) -> String;
}

impl<F> PromptCompiler for F
where
    F: Fn(&Schema) -> String,
{
    fn compile(&self, schema: &Schema) -> String {
        self(schema)
    }
}

/// [`compile_prompt`] as a [`PromptCompiler`], discarding warnings.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultCompiler;

impl PromptCompiler for DefaultCompiler {
    fn compile(&self, schema: &Schema) -> String {
        compile_prompt(schema).text
    }
}
