use crate::foundation::error::{HypnaError, HypnaResult};
use crate::schema::module::{ModuleKey, Modules};
use crate::schema::validate::validate_schema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

// ----------------------------
// Closed string sets
// ----------------------------

macro_rules! literal_enum {
    (
        $(#[$meta:meta])*
        $name:ident { $($variant:ident => $text:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[allow(missing_docs)]
        pub enum $name {
            $(#[serde(rename = $text)] $variant,)+
        }

        impl $name {
            /// Every accepted literal, in declaration order.
            pub const VALUES: &'static [&'static str] = &[$($text),+];

            /// Literal form as stored in JSON.
            pub fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $text,)+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

literal_enum! {
    /// Image framing.
    Framing { Portrait => "portrait", Landscape => "landscape", Square => "square" }
}

literal_enum! {
    /// Lens character.
    Lens { Wide => "wide", Normal => "normal", Tele => "tele" }
}

literal_enum! {
    /// How the palette block is turned into text.
    PaletteMode {
        RisoPlates => "RISO_PLATES",
        Descriptive => "DESCRIPTIVE",
        ImageExtract => "IMAGE_EXTRACT",
        ColorWheel => "COLOR_WHEEL",
    }
}

literal_enum! {
    /// Colour-wheel harmony scheme.
    Harmony {
        Complementary => "complementary",
        Analogous => "analogous",
        Triadic => "triadic",
        SplitComplementary => "split_complementary",
        Tetradic => "tetradic",
        Monochrome => "monochrome",
    }
}

literal_enum! {
    /// Role of a riso plate in the print stack.
    PlateRole {
        Keyline => "keyline",
        Shadow => "shadow",
        Midtone => "midtone",
        Highlight => "highlight",
        Accent => "accent",
    }
}

literal_enum! {
    /// Colour extraction method recorded alongside extracted swatches.
    ExtractMethod { Kmeans => "kmeans", MedianCut => "median_cut" }
}

literal_enum! {
    /// Motion preset label.
    AnimationPreset { Static => "static", Pulse => "pulse", Drift => "drift" }
}

literal_enum! {
    /// Which grid times are materialized into frames.
    ExportMode {
        KeyframesOnly => "keyframes_only",
        AllFrames => "all_frames",
        EveryN => "every_n",
    }
}

literal_enum! {
    /// Managed prompt compile mode.
    PromptCompileMode { Minimal => "MINIMAL", Balanced => "BALANCED", MaxControl => "MAX_CONTROL" }
}

literal_enum! {
    /// Kind of a managed prompt block.
    PromptBlockKind {
        Core => "CORE",
        StylePacks => "STYLE_PACKS",
        PalettePack => "PALETTE_PACK",
        Constraints => "CONSTRAINTS",
        Process => "PROCESS",
        OutputSpec => "OUTPUT_SPEC",
        Negatives => "NEGATIVES",
    }
}

// ----------------------------
// Module blocks
// ----------------------------

/// Invariant flags. Both must be `true` for a schema to validate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IgnoreRules {
    /// Disabled modules suppress their animation curves.
    pub hard_disable: bool,
    /// Toggling a module keeps its block values.
    pub preserve_state: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
#[allow(missing_docs)]
pub struct InputBlock {
    pub subject: String,
    pub medium: String,
    pub notes: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
#[allow(missing_docs)]
pub struct StateMapBlock {
    pub primary_state: String,
    pub secondary_state: String,
    /// 0..=100
    pub intensity: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
#[allow(missing_docs)]
pub struct HallucinationBlock {
    pub profile: String,
    /// 0..=100, animatable.
    pub drift: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
#[allow(missing_docs)]
pub struct HypnaMatrixBlock {
    pub axis_x: String,
    pub axis_y: String,
    /// 0..=100, animatable.
    pub depth: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
#[allow(missing_docs)]
pub struct PromptGenomeBlock {
    pub prefix: String,
    pub structure: String,
    pub perception: String,
    pub style_tokens: Vec<String>,
    pub suffix: String,
    pub seed: u64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
#[allow(missing_docs)]
pub struct VisualGrammarBlock {
    pub framing: Framing,
    pub lens: Lens,
    /// 0..=100
    pub detail: f64,
}

/// Material influence weights, each 0..=100 and animatable.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
#[allow(missing_docs)]
pub struct InfluenceWeights {
    pub ink_spray: f64,
    pub meat_brush: f64,
    pub collage_break: f64,
    pub network_map: f64,
    pub occult_diagram: f64,
    pub graphic_novel: f64,
    pub print_material: f64,
    pub hand_drawn: f64,
}

impl InfluenceWeights {
    /// `(json name, value)` pairs in declaration order.
    pub fn entries(&self) -> [(&'static str, f64); 8] {
        [
            ("inkSpray", self.ink_spray),
            ("meatBrush", self.meat_brush),
            ("collageBreak", self.collage_break),
            ("networkMap", self.network_map),
            ("occultDiagram", self.occult_diagram),
            ("graphicNovel", self.graphic_novel),
            ("printMaterial", self.print_material),
            ("handDrawn", self.hand_drawn),
        ]
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
#[allow(missing_docs)]
pub struct InfluenceBehavior {
    pub density: f64,
    pub turbulence: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
#[allow(missing_docs)]
pub struct InfluenceEngineBlock {
    pub weights: InfluenceWeights,
    pub behavior: InfluenceBehavior,
}

/// One weighted colour.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub struct PaletteSwatch {
    pub hex: String,
    pub weight: f64,
}

/// One riso plate. At most four per palette.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub struct RisoPlate {
    /// `#RRGGBB`
    pub hex: String,
    pub role: PlateRole,
    /// 0..=100, animatable for the first four plates.
    pub opacity: f64,
    /// 0..=20
    pub misregistration: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
#[allow(missing_docs)]
pub struct ImageExtract {
    pub enabled: bool,
    /// 1..=8
    pub max_colors: u32,
    pub method: ExtractMethod,
    pub extracted: Vec<PaletteSwatch>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
#[allow(missing_docs)]
pub struct ColorWheel {
    pub base_hex: String,
    pub scheme: Harmony,
    /// 1..=8
    pub count: u32,
    /// 0..=360, animatable.
    pub rotate_deg: f64,
    pub generated: Vec<PaletteSwatch>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
#[allow(missing_docs)]
pub struct PaletteBlock {
    pub mode: PaletteMode,
    pub lock_palette: bool,
    pub riso_plates: Vec<RisoPlate>,
    pub descriptive: String,
    pub descriptive_keywords: Vec<String>,
    pub image_extract: ImageExtract,
    pub color_wheel: ColorWheel,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
#[allow(missing_docs)]
pub struct ConstraintsBlock {
    pub max_tokens: u32,
    pub avoid: String,
    /// 0..=100
    pub safety_level: f64,
}

/// Value of one animation curve at a keyframe.
///
/// Numbers blend between keyframes; strings snap to the nearest keyframe.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CurveValue {
    /// Blended linearly.
    Number(f64),
    /// Categorical; never blended.
    Text(String),
}

impl CurveValue {
    /// JSON form written into derived schemas.
    pub fn to_json(&self) -> Value {
        match self {
            Self::Number(n) => serde_json::Number::from_f64(*n)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            Self::Text(s) => Value::String(s.clone()),
        }
    }
}

/// A `(time, {path: value})` anchor.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    /// Normalized time in `[0, 1]`.
    pub t: f64,
    /// Dotted field path -> value at this keyframe.
    #[serde(default)]
    pub curves: BTreeMap<String, CurveValue>,
    /// Optional display label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
#[allow(missing_docs)]
pub struct AnimationBlock {
    pub preset: AnimationPreset,
    /// 0..=100
    pub speed: f64,
    pub frame_count: u32,
    /// 1..=120
    pub fps: f64,
    /// Seconds, 1..=60.
    pub duration: f64,
    pub export_mode: ExportMode,
    /// 1..=60, rounded when used.
    pub every_n: f64,
    pub keyframes: Vec<Keyframe>,
}

// ----------------------------
// Prompt manager
// ----------------------------

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub struct PromptBlock {
    pub id: String,
    pub kind: PromptBlockKind,
    pub enabled: bool,
    pub content: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub struct PromptEntity {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub blocks: Vec<PromptBlock>,
    #[serde(default)]
    pub created_at: u64,
    #[serde(default)]
    pub updated_at: u64,
}

/// A compiled prompt recorded for recall/diff.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub struct PromptSnapshot {
    pub id: String,
    pub prompt_id: String,
    pub name: String,
    pub compiled: String,
    #[serde(default)]
    pub created_at: u64,
    #[serde(default)]
    pub blocks: Vec<PromptBlock>,
    #[serde(default)]
    pub warnings: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub struct StylePack {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub snippet: String,
    #[serde(default)]
    pub created_at: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<u64>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub struct TemplateEntity {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub blocks: Vec<PromptBlock>,
    #[serde(default)]
    pub created_at: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<u64>,
}

/// Block-based prompt authoring. Not a toggleable module; `enabled` selects it as the primary
/// compiler.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
#[allow(missing_docs)]
pub struct PromptManagerBlock {
    pub enabled: bool,
    pub active_prompt_id: String,
    pub compile_mode: PromptCompileMode,
    pub prompts: Vec<PromptEntity>,
    pub templates: Vec<TemplateEntity>,
    pub style_packs: Vec<StylePack>,
    pub history: Vec<PromptSnapshot>,
}

impl PromptManagerBlock {
    /// The active prompt, or the first one when the id does not match.
    pub fn active_prompt(&self) -> Option<&PromptEntity> {
        self.prompts
            .iter()
            .find(|p| p.id == self.active_prompt_id)
            .or_else(|| self.prompts.first())
    }
}

// ----------------------------
// Schema root
// ----------------------------

/// Current-version schema instance.
///
/// Instances are produced by [`crate::migrate()`] (or [`Schema::default`]) and are treated as
/// values: operations return new instances and never retain references.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub struct Schema {
    /// Always [`crate::SCHEMA_VERSION`] for instances produced by this crate.
    pub version: u32,
    #[serde(rename = "MODULES")]
    pub modules: Modules,
    #[serde(rename = "IGNORE_RULES")]
    pub ignore_rules: IgnoreRules,
    #[serde(rename = "INPUT")]
    pub input: InputBlock,
    #[serde(rename = "STATE_MAP")]
    pub state_map: StateMapBlock,
    #[serde(rename = "HALLUCINATION")]
    pub hallucination: HallucinationBlock,
    #[serde(rename = "HYPNA_MATRIX")]
    pub hypna_matrix: HypnaMatrixBlock,
    #[serde(rename = "PROMPT_GENOME")]
    pub prompt_genome: PromptGenomeBlock,
    #[serde(rename = "VISUAL_GRAMMAR")]
    pub visual_grammar: VisualGrammarBlock,
    #[serde(rename = "INFLUENCE_ENGINE")]
    pub influence_engine: InfluenceEngineBlock,
    #[serde(rename = "PALETTE")]
    pub palette: PaletteBlock,
    #[serde(rename = "CONSTRAINTS")]
    pub constraints: ConstraintsBlock,
    #[serde(rename = "ANIMATION")]
    pub animation: AnimationBlock,
    #[serde(rename = "PROMPT_MANAGER")]
    pub prompt_manager: PromptManagerBlock,
}

impl Schema {
    /// Encode as a JSON tree.
    pub fn to_value(&self) -> HypnaResult<Value> {
        serde_json::to_value(self).map_err(|e| HypnaError::serde(format!("encode schema: {e}")))
    }

    /// Decode a JSON tree without migrating it.
    ///
    /// Prefer [`crate::migrate()`] for anything that did not come from this crate.
    pub fn from_value(value: Value) -> HypnaResult<Self> {
        serde_json::from_value(value).map_err(|e| HypnaError::serde(format!("decode schema: {e}")))
    }

    /// Pretty JSON text.
    pub fn to_json_pretty(&self) -> HypnaResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| HypnaError::serde(format!("encode schema: {e}")))
    }

    /// Whether `key` is enabled.
    pub fn module_enabled(&self, key: ModuleKey) -> bool {
        self.modules.get(key)
    }

    /// Check the instance against the current contract.
    pub fn validate(&self) -> HypnaResult<()> {
        let report = validate_schema(&self.to_value()?);
        if report.valid {
            Ok(())
        } else {
            Err(HypnaError::validation(format!(
                "schema validation failed: {}",
                report.errors.join("; ")
            )))
        }
    }
}
