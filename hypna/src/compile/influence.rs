use crate::schema::model::InfluenceWeights;

/// Sentence terminator for rendered behaviours.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Punctuation {
    /// `.`
    #[default]
    Period,
    /// `;`
    Semicolon,
}

impl Punctuation {
    fn as_char(self) -> char {
        match self {
            Self::Period => '.',
            Self::Semicolon => ';',
        }
    }
}

fn action_verb(weight: &str) -> &'static str {
    match weight {
        "inkSpray" => "spray and splatter pigment clouds",
        "meatBrush" => "smear, scrape, and drag flesh-like strokes",
        "collageBreak" => "graft torn collage seams and fracture edges",
        "networkMap" => "arc evidence lines between indexed nodes",
        "occultDiagram" => "inscribe correspondences in concentric sigils",
        "graphicNovel" => "frame memory as panel cuts and hard gutters",
        "printMaterial" => "overprint riso/gelli/screen textures with plate drift",
        "handDrawn" => "trace hesitant hand-drawn contours and corrections",
        _ => "apply material influence",
    }
}

/// One sentence per positive weight, strongest first, with force scaled by `intensity`
/// (percent).
///
/// Equal weights keep declaration order.
pub fn render_influence_behaviors(
    weights: &InfluenceWeights,
    intensity: f64,
    punctuation: Punctuation,
) -> Vec<String> {
    let mut entries: Vec<(&str, f64)> = weights
        .entries()
        .into_iter()
        .filter(|(_, v)| *v > 0.0)
        .collect();
    entries.sort_by(|a, b| b.1.total_cmp(&a.1));

    entries
        .into_iter()
        .map(|(key, value)| {
            let scaled = (value * intensity / 100.0).round() as i64;
            format!("{} at force {scaled}{}", action_verb(key), punctuation.as_char())
        })
        .collect()
}
