use crate::schema::model::{
    AnimationBlock, AnimationPreset, ColorWheel, ConstraintsBlock, CurveValue, ExportMode,
    ExtractMethod, Framing, HallucinationBlock, Harmony, HypnaMatrixBlock, IgnoreRules,
    ImageExtract, InfluenceBehavior, InfluenceEngineBlock, InfluenceWeights, InputBlock, Keyframe,
    Lens, PaletteBlock, PaletteMode, PlateRole, PromptBlock, PromptBlockKind, PromptCompileMode,
    PromptEntity, PromptGenomeBlock, PromptManagerBlock, RisoPlate, Schema, StateMapBlock,
    VisualGrammarBlock,
};
use crate::schema::module::Modules;
use crate::schema::version::SCHEMA_VERSION;
use std::collections::BTreeMap;

/// A fresh default schema. Every call builds an independent instance.
pub fn default_schema() -> Schema {
    Schema {
        version: SCHEMA_VERSION,
        modules: Modules::default(),
        ignore_rules: IgnoreRules::default(),
        input: InputBlock::default(),
        state_map: StateMapBlock::default(),
        hallucination: HallucinationBlock::default(),
        hypna_matrix: HypnaMatrixBlock::default(),
        prompt_genome: PromptGenomeBlock::default(),
        visual_grammar: VisualGrammarBlock::default(),
        influence_engine: InfluenceEngineBlock::default(),
        palette: PaletteBlock::default(),
        constraints: ConstraintsBlock::default(),
        animation: AnimationBlock::default(),
        prompt_manager: PromptManagerBlock::default(),
    }
}

impl Default for Schema {
    fn default() -> Self {
        default_schema()
    }
}

impl Default for Modules {
    /// Everything on except the timeline.
    fn default() -> Self {
        Self {
            input: true,
            state_map: true,
            hallucination: true,
            hypna_matrix: true,
            prompt_genome: true,
            visual_grammar: true,
            influence_engine: true,
            palette: true,
            constraints: true,
            animation: false,
        }
    }
}

impl Default for IgnoreRules {
    fn default() -> Self {
        Self {
            hard_disable: true,
            preserve_state: true,
        }
    }
}

impl Default for InputBlock {
    fn default() -> Self {
        Self {
            subject: "Monumental surreal portrait".to_owned(),
            medium: "analog photo".to_owned(),
            notes: "stillness, concrete, breath".to_owned(),
        }
    }
}

impl Default for StateMapBlock {
    fn default() -> Self {
        Self {
            primary_state: "ritual calm".to_owned(),
            secondary_state: "anticipation".to_owned(),
            intensity: 70.0,
        }
    }
}

impl Default for HallucinationBlock {
    fn default() -> Self {
        Self {
            profile: "light geometry drift".to_owned(),
            drift: 45.0,
        }
    }
}

impl Default for HypnaMatrixBlock {
    fn default() -> Self {
        Self {
            axis_x: "memory".to_owned(),
            axis_y: "symbol".to_owned(),
            depth: 65.0,
        }
    }
}

impl Default for PromptGenomeBlock {
    fn default() -> Self {
        Self {
            prefix: "HYPNAGNOSIS ORACLE V3".to_owned(),
            structure: "single subject, 3-part spatial read, one focal rupture".to_owned(),
            perception: "parallax drift, peripheral noise, tactile depth cues".to_owned(),
            style_tokens: vec![
                "brutalist".to_owned(),
                "high-contrast".to_owned(),
                "film-grain".to_owned(),
            ],
            suffix: "avoid cheerful palette".to_owned(),
            seed: 42,
        }
    }
}

impl Default for VisualGrammarBlock {
    fn default() -> Self {
        Self {
            framing: Framing::Portrait,
            lens: Lens::Normal,
            detail: 75.0,
        }
    }
}

impl Default for InfluenceWeights {
    fn default() -> Self {
        Self {
            ink_spray: 55.0,
            meat_brush: 38.0,
            collage_break: 52.0,
            network_map: 60.0,
            occult_diagram: 44.0,
            graphic_novel: 50.0,
            print_material: 66.0,
            hand_drawn: 58.0,
        }
    }
}

impl Default for InfluenceBehavior {
    fn default() -> Self {
        Self {
            density: 70.0,
            turbulence: 48.0,
        }
    }
}

impl Default for InfluenceEngineBlock {
    fn default() -> Self {
        Self {
            weights: InfluenceWeights::default(),
            behavior: InfluenceBehavior::default(),
        }
    }
}

impl Default for ImageExtract {
    fn default() -> Self {
        Self {
            enabled: false,
            max_colors: 4,
            method: ExtractMethod::Kmeans,
            extracted: Vec::new(),
        }
    }
}

impl Default for ColorWheel {
    fn default() -> Self {
        Self {
            base_hex: "#6a5cff".to_owned(),
            scheme: Harmony::Triadic,
            count: 4,
            rotate_deg: 0.0,
            generated: Vec::new(),
        }
    }
}

impl Default for PaletteBlock {
    fn default() -> Self {
        Self {
            mode: PaletteMode::Descriptive,
            lock_palette: false,
            riso_plates: vec![
                RisoPlate {
                    hex: "#1f1f1f".to_owned(),
                    role: PlateRole::Keyline,
                    opacity: 100.0,
                    misregistration: 2.0,
                },
                RisoPlate {
                    hex: "#f3f3ef".to_owned(),
                    role: PlateRole::Highlight,
                    opacity: 82.0,
                    misregistration: 1.0,
                },
            ],
            descriptive: "graphite, bone white, silver".to_owned(),
            descriptive_keywords: vec![
                "graphite".to_owned(),
                "bone".to_owned(),
                "silver".to_owned(),
            ],
            image_extract: ImageExtract::default(),
            color_wheel: ColorWheel::default(),
        }
    }
}

impl Default for ConstraintsBlock {
    fn default() -> Self {
        Self {
            max_tokens: 220,
            avoid: "oversaturated colors, cartoon style".to_owned(),
            safety_level: 80.0,
        }
    }
}

impl Default for AnimationBlock {
    fn default() -> Self {
        fn keyframe(t: f64, drift: f64, rotate: f64, state: &str) -> Keyframe {
            let mut curves = BTreeMap::new();
            curves.insert("HALLUCINATION.drift".to_owned(), CurveValue::Number(drift));
            curves.insert(
                "PALETTE.color_wheel.rotate_deg".to_owned(),
                CurveValue::Number(rotate),
            );
            Keyframe {
                t,
                curves,
                state: Some(state.to_owned()),
            }
        }

        Self {
            preset: AnimationPreset::Pulse,
            speed: 40.0,
            frame_count: 12,
            fps: 12.0,
            duration: 2.0,
            export_mode: ExportMode::AllFrames,
            every_n: 2.0,
            keyframes: vec![
                keyframe(0.0, 20.0, 0.0, "cold-open"),
                keyframe(1.0, 70.0, 180.0, "crescendo"),
            ],
        }
    }
}

impl Default for PromptManagerBlock {
    fn default() -> Self {
        fn block(id: &str, kind: PromptBlockKind, content: &str) -> PromptBlock {
            PromptBlock {
                id: id.to_owned(),
                kind,
                enabled: true,
                content: content.to_owned(),
            }
        }

        Self {
            enabled: false,
            active_prompt_id: "prompt-default".to_owned(),
            compile_mode: PromptCompileMode::Balanced,
            prompts: vec![PromptEntity {
                id: "prompt-default".to_owned(),
                name: "Default directives".to_owned(),
                description: "Starter block set for managed prompts".to_owned(),
                tags: vec!["starter".to_owned()],
                blocks: vec![
                    block(
                        "blk-core",
                        PromptBlockKind::Core,
                        "Prompt directives:\n- Subject: monumental surreal portrait",
                    ),
                    block(
                        "blk-style",
                        PromptBlockKind::StylePacks,
                        "- Style: brutalist, high-contrast, film-grain",
                    ),
                    block(
                        "blk-constraints",
                        PromptBlockKind::Constraints,
                        "- Render constraints: flat ink fields, visible overprint",
                    ),
                    block(
                        "blk-negatives",
                        PromptBlockKind::Negatives,
                        "Negative prompt: oversaturated colors, cartoon style",
                    ),
                ],
                created_at: 0,
                updated_at: 0,
            }],
            templates: Vec::new(),
            style_packs: Vec::new(),
            history: Vec::new(),
        }
    }
}
