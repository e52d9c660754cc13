//! Hypna is the core of a prompt-schema toolkit.
//!
//! A [`Schema`] is a versioned document of toggleable modules that compiles to prompt text.
//! The crate covers everything between untyped JSON and that text:
//!
//! - Dotted-path reads and copy-on-write writes over JSON trees ([`get_at`], [`set_at`])
//! - Migration of any input, legacy or malformed, to a valid current schema ([`migrate()`])
//! - Contract checks with human-readable errors ([`validate_schema`])
//! - Keyframe interpolation and frame series ([`interpolate_at_time`], [`build_frame_series`])
//! - Prompt compilation behind the [`PromptCompiler`] seam
//! - A [`Store`] plus persistence and export helpers
//!
//! The core is synchronous and pure; file I/O belongs to callers such as the `hypna` CLI.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

pub(crate) mod animation;
pub(crate) mod compile;
pub(crate) mod migrate;
pub(crate) mod path;
pub(crate) mod schema;
pub(crate) mod state;

pub use crate::foundation::error::{HypnaError, HypnaResult};
pub use crate::foundation::fingerprint::FrameFingerprint;

pub use crate::path::{DottedPath, PathError, Segment, get, get_at, get_or, set, set_at};

pub use crate::schema::curves::{ALLOWED_CURVE_PATHS, is_curve_path_allowed, module_for_curve_path};
pub use crate::schema::defaults::default_schema;
pub use crate::schema::model::{
    AnimationBlock, AnimationPreset, ColorWheel, ConstraintsBlock, CurveValue, ExportMode,
    ExtractMethod, Framing, HallucinationBlock, Harmony, HypnaMatrixBlock, IgnoreRules,
    ImageExtract, InfluenceBehavior, InfluenceEngineBlock, InfluenceWeights, InputBlock, Keyframe,
    Lens, PaletteBlock, PaletteMode, PaletteSwatch, PlateRole, PromptBlock, PromptBlockKind,
    PromptCompileMode, PromptEntity, PromptGenomeBlock, PromptManagerBlock, PromptSnapshot,
    RisoPlate, Schema, StateMapBlock, StylePack, TemplateEntity, VisualGrammarBlock,
};
pub use crate::schema::module::{ModuleKey, Modules};
pub use crate::schema::validate::{ValidationReport, is_valid_schema, validate_schema};
pub use crate::schema::version::{SCHEMA_VERSION, STORAGE_VERSION};

pub use crate::migrate::{MigrationOutcome, detect_version, migrate, migrate_with_outcome};

pub use crate::compile::{
    CompiledPrompt, DebugSection, DefaultCompiler, PromptCompiler, Punctuation, WizardPrompt,
    compile_managed_prompt, compile_prompt, compile_wizard_prompt, lint_managed_prompt,
    render_influence_behaviors, render_palette_footer,
};

pub use crate::animation::{
    Frame, FrameSeries, SeriesStatus, SheetOpts, TimelineOpts, build_frame_series,
    export_frame_prompt_sheet, export_timeline_json, interpolate_at_time, interpolated_value,
    state_at, timeline_times,
};

pub use crate::state::{
    Derived, Store, StoreOpts, StoredState, build_enabled_only_schema, decode_stored_payload,
    encode_stored_state, load_schema, load_schema_with_outcome,
};
