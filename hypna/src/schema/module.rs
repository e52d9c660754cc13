use serde::{Deserialize, Serialize};

/// A named, independently toggleable group of schema fields.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ModuleKey {
    /// Subject, medium and free-text notes.
    Input,
    /// Primary/secondary perceptual state.
    StateMap,
    /// Hallucination profile and drift.
    Hallucination,
    /// Two-axis matrix with depth.
    HypnaMatrix,
    /// Prompt prefix/suffix, structure and style tokens.
    PromptGenome,
    /// Framing, lens, detail.
    VisualGrammar,
    /// Material influence weights.
    InfluenceEngine,
    /// Palette modes and plates.
    Palette,
    /// Token budget and avoid list.
    Constraints,
    /// Keyframe timeline.
    Animation,
}

impl ModuleKey {
    /// Every module, in schema order.
    pub const ALL: [ModuleKey; 10] = [
        Self::Input,
        Self::StateMap,
        Self::Hallucination,
        Self::HypnaMatrix,
        Self::PromptGenome,
        Self::VisualGrammar,
        Self::InfluenceEngine,
        Self::Palette,
        Self::Constraints,
        Self::Animation,
    ];

    /// Block name as it appears in the schema JSON (also the `MODULES` key).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Input => "INPUT",
            Self::StateMap => "STATE_MAP",
            Self::Hallucination => "HALLUCINATION",
            Self::HypnaMatrix => "HYPNA_MATRIX",
            Self::PromptGenome => "PROMPT_GENOME",
            Self::VisualGrammar => "VISUAL_GRAMMAR",
            Self::InfluenceEngine => "INFLUENCE_ENGINE",
            Self::Palette => "PALETTE",
            Self::Constraints => "CONSTRAINTS",
            Self::Animation => "ANIMATION",
        }
    }

    /// Inverse of [`ModuleKey::as_str`].
    pub fn from_block_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == name)
    }
}

impl std::fmt::Display for ModuleKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Module-enablement map. Every module key is always present.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
#[allow(missing_docs)]
pub struct Modules {
    #[serde(rename = "INPUT")]
    pub input: bool,
    #[serde(rename = "STATE_MAP")]
    pub state_map: bool,
    #[serde(rename = "HALLUCINATION")]
    pub hallucination: bool,
    #[serde(rename = "HYPNA_MATRIX")]
    pub hypna_matrix: bool,
    #[serde(rename = "PROMPT_GENOME")]
    pub prompt_genome: bool,
    #[serde(rename = "VISUAL_GRAMMAR")]
    pub visual_grammar: bool,
    #[serde(rename = "INFLUENCE_ENGINE")]
    pub influence_engine: bool,
    #[serde(rename = "PALETTE")]
    pub palette: bool,
    #[serde(rename = "CONSTRAINTS")]
    pub constraints: bool,
    #[serde(rename = "ANIMATION")]
    pub animation: bool,
}

impl Modules {
    /// Whether `key` is enabled.
    pub fn get(&self, key: ModuleKey) -> bool {
        *self.slot(key)
    }

    /// Enable or disable `key`.
    pub fn set(&mut self, key: ModuleKey, enabled: bool) {
        *self.slot_mut(key) = enabled;
    }

    /// Disabled modules in schema order.
    pub fn disabled(&self) -> Vec<ModuleKey> {
        ModuleKey::ALL
            .into_iter()
            .filter(|k| !self.get(*k))
            .collect()
    }

    fn slot(&self, key: ModuleKey) -> &bool {
        match key {
            ModuleKey::Input => &self.input,
            ModuleKey::StateMap => &self.state_map,
            ModuleKey::Hallucination => &self.hallucination,
            ModuleKey::HypnaMatrix => &self.hypna_matrix,
            ModuleKey::PromptGenome => &self.prompt_genome,
            ModuleKey::VisualGrammar => &self.visual_grammar,
            ModuleKey::InfluenceEngine => &self.influence_engine,
            ModuleKey::Palette => &self.palette,
            ModuleKey::Constraints => &self.constraints,
            ModuleKey::Animation => &self.animation,
        }
    }

    fn slot_mut(&mut self, key: ModuleKey) -> &mut bool {
        match key {
            ModuleKey::Input => &mut self.input,
            ModuleKey::StateMap => &mut self.state_map,
            ModuleKey::Hallucination => &mut self.hallucination,
            ModuleKey::HypnaMatrix => &mut self.hypna_matrix,
            ModuleKey::PromptGenome => &mut self.prompt_genome,
            ModuleKey::VisualGrammar => &mut self.visual_grammar,
            ModuleKey::InfluenceEngine => &mut self.influence_engine,
            ModuleKey::Palette => &mut self.palette,
            ModuleKey::Constraints => &mut self.constraints,
            ModuleKey::Animation => &mut self.animation,
        }
    }
}
