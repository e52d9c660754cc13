use crate::path::{DottedPath, get};
use crate::path::access::set_in_place;
use crate::schema::defaults::default_schema;
use serde_json::{Map, Value};

/// Oldest version a document can be recognized as.
pub(crate) const OLDEST_VERSION: u32 = 1;

/// A pure `v_n -> v_n+1` step, keyed by the version it upgrades from.
pub(crate) struct Step {
    pub(crate) from: u32,
    pub(crate) apply: fn(&Value) -> Value,
}

pub(crate) const STEPS: &[Step] = &[
    Step {
        from: 1,
        apply: hyphen_blocks_to_v2,
    },
    Step {
        from: 2,
        apply: add_prompt_manager,
    },
];

/// Run every step from `from` up to the current version.
pub(crate) fn upgrade(doc: &Value, from: u32) -> Value {
    let mut cur = doc.clone();
    for step in STEPS.iter().filter(|s| s.from >= from) {
        tracing::debug!(from = step.from, to = step.from + 1, "applying migration step");
        cur = (step.apply)(&cur);
    }
    cur
}

/// Block names used by version 1 documents.
const BLOCK_RENAMES: &[(&str, &str)] = &[
    ("STATE-MAP", "STATE_MAP"),
    ("HYPNA-MATRIX", "HYPNA_MATRIX"),
    ("PROMPT-GENOME", "PROMPT_GENOME"),
    ("VISUAL-GRAMMAR", "VISUAL_GRAMMAR"),
    ("INFLUENCE-ENGINE", "INFLUENCE_ENGINE"),
];

#[derive(Clone, Copy)]
enum Transform {
    Copy,
    /// String list joined with `", "`.
    JoinList,
}

/// Fields whose shape or location changed between version 1 and 2.
const FIELD_MAP: &[(&str, &str, Transform)] = &[
    ("HALLUCINATION.level", "HALLUCINATION.drift", Transform::Copy),
    ("STATE-MAP.state-name", "STATE_MAP.primary_state", Transform::Copy),
    ("STATE-MAP.flow", "STATE_MAP.secondary_state", Transform::Copy),
    ("INPUT.styleTokens", "PROMPT_GENOME.style_tokens", Transform::Copy),
    ("CONSTRAINTS.forbid", "CONSTRAINTS.avoid", Transform::JoinList),
    (
        "INFLUENCE-ENGINE.INFLUENCE-WEIGHTS.ink-spray-field",
        "INFLUENCE_ENGINE.weights.inkSpray",
        Transform::Copy,
    ),
    (
        "INFLUENCE-ENGINE.INFLUENCE-WEIGHTS.meat-brush-field",
        "INFLUENCE_ENGINE.weights.meatBrush",
        Transform::Copy,
    ),
    (
        "INFLUENCE-ENGINE.INFLUENCE-WEIGHTS.collage-break-field",
        "INFLUENCE_ENGINE.weights.collageBreak",
        Transform::Copy,
    ),
    (
        "INFLUENCE-ENGINE.INFLUENCE-WEIGHTS.network-map-field",
        "INFLUENCE_ENGINE.weights.networkMap",
        Transform::Copy,
    ),
    (
        "INFLUENCE-ENGINE.INFLUENCE-WEIGHTS.occult-diagram-field",
        "INFLUENCE_ENGINE.weights.occultDiagram",
        Transform::Copy,
    ),
    (
        "INFLUENCE-ENGINE.INFLUENCE-WEIGHTS.graphic-novel-field",
        "INFLUENCE_ENGINE.weights.graphicNovel",
        Transform::Copy,
    ),
    (
        "INFLUENCE-ENGINE.INFLUENCE-WEIGHTS.print-material-field",
        "INFLUENCE_ENGINE.weights.printMaterial",
        Transform::Copy,
    ),
    (
        "INFLUENCE-ENGINE.INFLUENCE-WEIGHTS.hand-drawn-field",
        "INFLUENCE_ENGINE.weights.handDrawn",
        Transform::Copy,
    ),
    ("PALETTE.riso.plates", "PALETTE.riso_plates", Transform::Copy),
    ("PALETTE.descriptive.text", "PALETTE.descriptive", Transform::Copy),
    (
        "PALETTE.descriptive.keywords",
        "PALETTE.descriptive_keywords",
        Transform::Copy,
    ),
    ("PALETTE.image_extract.k", "PALETTE.image_extract.max_colors", Transform::Copy),
    ("PALETTE.wheel.base_hex", "PALETTE.color_wheel.base_hex", Transform::Copy),
    ("PALETTE.wheel.harmony", "PALETTE.color_wheel.scheme", Transform::Copy),
    ("PALETTE.wheel.count", "PALETTE.color_wheel.count", Transform::Copy),
    ("PALETTE.wheel.rotate_deg", "PALETTE.color_wheel.rotate_deg", Transform::Copy),
    ("ANIMATION.duration_s", "ANIMATION.duration", Transform::Copy),
];

fn hyphen_blocks_to_v2(doc: &Value) -> Value {
    let Value::Object(src) = doc else {
        return doc.clone();
    };

    let mut out = Map::new();
    for (name, block) in src {
        if name == "schemaVersion" {
            continue;
        }
        let target = rename_block(name);
        let block = if target == "MODULES" {
            rename_module_keys(block)
        } else {
            block.clone()
        };
        out.insert(target.to_owned(), block);
    }
    out.insert("version".to_owned(), Value::from(2));

    let mut out = Value::Object(out);
    for (from, to, transform) in FIELD_MAP {
        let (Ok(from), Ok(to)) = (DottedPath::parse(from), DottedPath::parse(to)) else {
            continue;
        };
        let Some(v) = get(doc, &from) else {
            continue;
        };
        let v = match transform {
            Transform::Copy => v.clone(),
            Transform::JoinList => join_list(v),
        };
        // A stale scalar sitting where a container is now expected is dropped; the overlay
        // onto defaults fills the gap.
        if let Err(e) = set_in_place(&mut out, &to, v) {
            tracing::debug!(error = %e, "skipping unmappable field");
        }
    }

    rewrite_curve_keys(&mut out);
    out
}

fn add_prompt_manager(doc: &Value) -> Value {
    let mut out = doc.clone();
    if let Value::Object(map) = &mut out {
        if !map.contains_key("PROMPT_MANAGER") {
            let pm = serde_json::to_value(default_schema().prompt_manager).unwrap_or(Value::Null);
            map.insert("PROMPT_MANAGER".to_owned(), pm);
        }
        map.insert("version".to_owned(), Value::from(3));
    }
    out
}

fn rename_block(name: &str) -> &str {
    BLOCK_RENAMES
        .iter()
        .find(|(old, _)| *old == name)
        .map_or(name, |(_, new)| *new)
}

fn rename_module_keys(modules: &Value) -> Value {
    match modules {
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (rename_block(k).to_owned(), v.clone()))
                .collect(),
        ),
        other => other.clone(),
    }
}

fn join_list(v: &Value) -> Value {
    match v {
        Value::Array(items) => Value::String(
            items
                .iter()
                .filter_map(Value::as_str)
                .collect::<Vec<_>>()
                .join(", "),
        ),
        other => other.clone(),
    }
}

/// Re-target curve keys inside keyframes through the same tables as block fields.
fn rewrite_curve_keys(doc: &mut Value) {
    let Some(Value::Array(keyframes)) = doc
        .get_mut("ANIMATION")
        .and_then(|a| a.get_mut("keyframes"))
    else {
        return;
    };
    for kf in keyframes {
        let Some(Value::Object(curves)) = kf.get_mut("curves") else {
            continue;
        };
        let old = std::mem::take(curves);
        for (key, v) in old {
            curves.insert(rename_curve_key(&key), v);
        }
    }
}

fn rename_curve_key(key: &str) -> String {
    if let Some((_, to, _)) = FIELD_MAP.iter().find(|(from, _, _)| *from == key) {
        return (*to).to_owned();
    }
    match key.split_once('.') {
        Some((block, rest)) => format!("{}.{rest}", rename_block(block)),
        None => key.to_owned(),
    }
}
