use crate::schema::module::ModuleKey;

/// Dotted paths that keyframe curves may animate.
///
/// Adding an animatable field means adding it here; the interpolation engine ignores every other
/// path even when it appears in keyframe data.
pub const ALLOWED_CURVE_PATHS: &[&str] = &[
    "HALLUCINATION.drift",
    "HYPNA_MATRIX.depth",
    "INFLUENCE_ENGINE.weights.inkSpray",
    "INFLUENCE_ENGINE.weights.meatBrush",
    "INFLUENCE_ENGINE.weights.collageBreak",
    "INFLUENCE_ENGINE.weights.networkMap",
    "INFLUENCE_ENGINE.weights.occultDiagram",
    "INFLUENCE_ENGINE.weights.graphicNovel",
    "INFLUENCE_ENGINE.weights.printMaterial",
    "INFLUENCE_ENGINE.weights.handDrawn",
    "PALETTE.color_wheel.rotate_deg",
    "PALETTE.riso_plates.0.opacity",
    "PALETTE.riso_plates.1.opacity",
    "PALETTE.riso_plates.2.opacity",
    "PALETTE.riso_plates.3.opacity",
];

/// Whether `path` is on the animatable allow-list.
pub fn is_curve_path_allowed(path: &str) -> bool {
    ALLOWED_CURVE_PATHS.contains(&path)
}

/// Module owning a curve path, by block-name prefix (`"PALETTE."` -> palette).
pub fn module_for_curve_path(path: &str) -> Option<ModuleKey> {
    ModuleKey::ALL.into_iter().find(|k| {
        path.strip_prefix(k.as_str())
            .is_some_and(|rest| rest.starts_with('.'))
    })
}
