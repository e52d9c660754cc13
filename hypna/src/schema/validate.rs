use crate::path::{DottedPath, Segment, get};
use crate::schema::model::{
    AnimationPreset, ExportMode, ExtractMethod, Framing, Harmony, Lens, PaletteMode, PlateRole,
    PromptBlockKind, PromptCompileMode,
};
use crate::schema::module::ModuleKey;
use crate::schema::version::SCHEMA_VERSION;
use serde::Serialize;
use serde_json::Value;
use std::fmt;

pub(crate) const MAX_RISO_PLATES: usize = 4;

/// Non-toggleable block that must still be present as an object.
pub(crate) const PROMPT_MANAGER_BLOCK: &str = "PROMPT_MANAGER";

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Constraint {
    NotObject,
    Version,
    NotBoolean,
    MustBeTrue,
    NotArray,
    OutOfRange { min: f64, max: f64 },
    NotOneOf,
    BadHex,
    TooMany { max: usize },
    BadCurveValue,
    NotCount,
    /// Optional member of the wrong JSON kind.
    WrongType { expected: &'static str },
    /// Required member of a list entry is absent or of the wrong kind.
    MissingField { expected: &'static str },
}

#[derive(Debug, Clone)]
pub(crate) struct Violation {
    pub(crate) path: Vec<Segment>,
    pub(crate) constraint: Constraint,
}

impl Violation {
    fn at(path: &[Segment], constraint: Constraint) -> Self {
        Self {
            path: path.to_vec(),
            constraint,
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let p = format_path(&self.path);
        match self.constraint {
            Constraint::NotObject if self.path.is_empty() => write!(f, "schema must be an object"),
            Constraint::NotObject => write!(f, "{p} must be an object"),
            Constraint::Version => write!(f, "version must be {SCHEMA_VERSION}"),
            Constraint::NotBoolean => write!(f, "{p} must be boolean"),
            Constraint::MustBeTrue => write!(f, "{p} must be true"),
            Constraint::NotArray => write!(f, "{p} must be an array"),
            Constraint::OutOfRange { min, max } => write!(f, "{p} out of range {min}..{max}"),
            Constraint::NotOneOf | Constraint::BadHex => write!(f, "{p} invalid"),
            Constraint::TooMany { max } => write!(f, "{p} must have max length {max}"),
            Constraint::BadCurveValue => write!(f, "{p} must be a number or string"),
            Constraint::NotCount => write!(f, "{p} must be a non-negative integer"),
            Constraint::WrongType { expected } => write!(f, "{p} must be {expected}"),
            Constraint::MissingField { expected } => {
                write!(f, "{p} is required and must be {expected}")
            }
        }
    }
}

fn format_path(path: &[Segment]) -> String {
    let mut s = String::new();
    for seg in path {
        match seg {
            Segment::Key(k) => {
                if !s.is_empty() {
                    s.push('.');
                }
                s.push_str(k);
            }
            Segment::Index(i) => {
                s.push('[');
                s.push_str(&i.to_string());
                s.push(']');
            }
        }
    }
    s
}

/// Outcome of [`validate_schema`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    /// `true` exactly when `errors` is empty.
    pub valid: bool,
    /// One line per violated constraint, naming the path.
    pub errors: Vec<String>,
}

/// Check an untyped candidate against the current schema contract.
///
/// Performs no coercion: `"50"` is not a number and `1` is not a boolean.
pub fn validate_schema(value: &Value) -> ValidationReport {
    let errors: Vec<String> = collect_violations(value)
        .iter()
        .map(ToString::to_string)
        .collect();
    ValidationReport {
        valid: errors.is_empty(),
        errors,
    }
}

/// Shorthand for `validate_schema(value).valid`.
pub fn is_valid_schema(value: &Value) -> bool {
    collect_violations(value).is_empty()
}

struct RangeRule {
    path: &'static str,
    min: f64,
    max: f64,
}

const fn range(path: &'static str, min: f64, max: f64) -> RangeRule {
    RangeRule { path, min, max }
}

const RANGE_RULES: &[RangeRule] = &[
    range("STATE_MAP.intensity", 0.0, 100.0),
    range("HALLUCINATION.drift", 0.0, 100.0),
    range("HYPNA_MATRIX.depth", 0.0, 100.0),
    range("VISUAL_GRAMMAR.detail", 0.0, 100.0),
    range("INFLUENCE_ENGINE.weights.inkSpray", 0.0, 100.0),
    range("INFLUENCE_ENGINE.weights.meatBrush", 0.0, 100.0),
    range("INFLUENCE_ENGINE.weights.collageBreak", 0.0, 100.0),
    range("INFLUENCE_ENGINE.weights.networkMap", 0.0, 100.0),
    range("INFLUENCE_ENGINE.weights.occultDiagram", 0.0, 100.0),
    range("INFLUENCE_ENGINE.weights.graphicNovel", 0.0, 100.0),
    range("INFLUENCE_ENGINE.weights.printMaterial", 0.0, 100.0),
    range("INFLUENCE_ENGINE.weights.handDrawn", 0.0, 100.0),
    range("INFLUENCE_ENGINE.behavior.density", 0.0, 100.0),
    range("INFLUENCE_ENGINE.behavior.turbulence", 0.0, 100.0),
    range("PALETTE.image_extract.max_colors", 1.0, 8.0),
    range("PALETTE.color_wheel.count", 1.0, 8.0),
    range("PALETTE.color_wheel.rotate_deg", 0.0, 360.0),
    range("CONSTRAINTS.safety_level", 0.0, 100.0),
    range("ANIMATION.speed", 0.0, 100.0),
    range("ANIMATION.fps", 1.0, 120.0),
    range("ANIMATION.duration", 1.0, 60.0),
    range("ANIMATION.every_n", 1.0, 60.0),
];

const ENUM_RULES: &[(&str, &[&str])] = &[
    ("VISUAL_GRAMMAR.framing", Framing::VALUES),
    ("VISUAL_GRAMMAR.lens", Lens::VALUES),
    ("PALETTE.mode", PaletteMode::VALUES),
    ("PALETTE.image_extract.method", ExtractMethod::VALUES),
    ("PALETTE.color_wheel.scheme", Harmony::VALUES),
    ("ANIMATION.preset", AnimationPreset::VALUES),
    ("ANIMATION.export_mode", ExportMode::VALUES),
    ("PROMPT_MANAGER.compile_mode", PromptCompileMode::VALUES),
];

/// Fields stored as unsigned integers.
const COUNT_RULES: &[(&str, u64)] = &[
    ("PROMPT_GENOME.seed", u64::MAX),
    ("PALETTE.image_extract.max_colors", u32::MAX as u64),
    ("PALETTE.color_wheel.count", u32::MAX as u64),
    ("CONSTRAINTS.max_tokens", u32::MAX as u64),
    ("ANIMATION.frame_count", u32::MAX as u64),
];

const HEX_RULES: &[&str] = &["PALETTE.color_wheel.base_hex"];

pub(crate) fn collect_violations(value: &Value) -> Vec<Violation> {
    let mut errors = Vec::new();
    let Value::Object(root) = value else {
        errors.push(Violation::at(&[], Constraint::NotObject));
        return errors;
    };

    if root.get("version").and_then(Value::as_u64) != Some(u64::from(SCHEMA_VERSION)) {
        errors.push(Violation::at(&[key("version")], Constraint::Version));
    }

    for k in ModuleKey::ALL {
        let path = [key("MODULES"), key(k.as_str())];
        if !matches!(lookup(value, &path), Some(Value::Bool(_))) {
            errors.push(Violation::at(&path, Constraint::NotBoolean));
        }
    }

    for flag in ["hard_disable", "preserve_state"] {
        let path = [key("IGNORE_RULES"), key(flag)];
        if lookup(value, &path) != Some(&Value::Bool(true)) {
            errors.push(Violation::at(&path, Constraint::MustBeTrue));
        }
    }

    let block_names = ModuleKey::ALL
        .iter()
        .map(|k| k.as_str())
        .chain([PROMPT_MANAGER_BLOCK]);
    for name in block_names {
        if !root.get(name).is_some_and(Value::is_object) {
            errors.push(Violation::at(&[key(name)], Constraint::NotObject));
        }
    }

    for rule in RANGE_RULES {
        let Ok(path) = DottedPath::parse(rule.path) else {
            continue;
        };
        check_range(value, path.segments(), rule.min, rule.max, &mut errors);
    }

    for (rule_path, allowed) in ENUM_RULES {
        let Ok(path) = DottedPath::parse(rule_path) else {
            continue;
        };
        check_one_of(value, path.segments(), allowed, &mut errors);
    }

    for (rule_path, max) in COUNT_RULES {
        let Ok(path) = DottedPath::parse(rule_path) else {
            continue;
        };
        let ok = lookup(value, path.segments())
            .and_then(Value::as_u64)
            .is_some_and(|n| n <= *max);
        if !ok {
            errors.push(Violation::at(path.segments(), Constraint::NotCount));
        }
    }

    for rule_path in HEX_RULES {
        let Ok(path) = DottedPath::parse(rule_path) else {
            continue;
        };
        check_hex(value, path.segments(), &mut errors);
    }

    validate_plates(value, &mut errors);
    validate_keyframes(value, &mut errors);
    validate_prompt_manager(value, &mut errors);

    errors
}

fn validate_plates(value: &Value, errors: &mut Vec<Violation>) {
    let base = [key("PALETTE"), key("riso_plates")];
    let Some(Value::Array(plates)) = lookup(value, &base) else {
        errors.push(Violation::at(&base, Constraint::NotArray));
        return;
    };

    if plates.len() > MAX_RISO_PLATES {
        errors.push(Violation::at(
            &base,
            Constraint::TooMany {
                max: MAX_RISO_PLATES,
            },
        ));
    }

    for (i, plate) in plates.iter().enumerate() {
        let elem = child(&base, Segment::Index(i));
        if !plate.is_object() {
            errors.push(Violation::at(&elem, Constraint::NotObject));
            continue;
        }
        check_hex(value, &child(&elem, key("hex")), errors);
        check_one_of(
            value,
            &child(&elem, key("role")),
            PlateRole::VALUES,
            errors,
        );
        check_range(
            value,
            &child(&elem, key("opacity")),
            0.0,
            100.0,
            errors,
        );
        check_range(
            value,
            &child(&elem, key("misregistration")),
            0.0,
            20.0,
            errors,
        );
    }
}

fn validate_keyframes(value: &Value, errors: &mut Vec<Violation>) {
    let base = [key("ANIMATION"), key("keyframes")];
    let Some(Value::Array(keyframes)) = lookup(value, &base) else {
        errors.push(Violation::at(&base, Constraint::NotArray));
        return;
    };

    for (i, kf) in keyframes.iter().enumerate() {
        let elem = child(&base, Segment::Index(i));
        let Value::Object(kf) = kf else {
            errors.push(Violation::at(&elem, Constraint::NotObject));
            continue;
        };
        check_range(value, &child(&elem, key("t")), 0.0, 1.0, errors);

        // Curve keys contain dots, so they are addressed as single segments.
        match kf.get("curves") {
            None => {}
            Some(Value::Object(curves)) => {
                for (curve, v) in curves {
                    if !(v.is_number() || v.is_string()) {
                        errors.push(Violation::at(
                            &child(&child(&elem, key("curves")), key(curve)),
                            Constraint::BadCurveValue,
                        ));
                    }
                }
            }
            Some(_) => errors.push(Violation::at(
                &child(&elem, key("curves")),
                Constraint::NotObject,
            )),
        }

        if let Some(state) = kf.get("state")
            && !(state.is_null() || state.is_string())
        {
            errors.push(Violation::at(
                &child(&elem, key("state")),
                Constraint::WrongType {
                    expected: "a string",
                },
            ));
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum FieldKind {
    Text,
    Texts,
    Flag,
    BlockKind,
    Stamp,
    OptStamp,
    Blocks,
}

impl FieldKind {
    fn expected(self) -> &'static str {
        match self {
            Self::Text => "a string",
            Self::Texts => "an array of strings",
            Self::Flag => "boolean",
            Self::BlockKind => "a known block kind",
            Self::Stamp => "a non-negative integer",
            Self::OptStamp => "a non-negative integer or null",
            Self::Blocks => "an array",
        }
    }

    fn accepts(self, v: &Value) -> bool {
        match self {
            Self::Text => v.is_string(),
            Self::Texts => v
                .as_array()
                .is_some_and(|items| items.iter().all(Value::is_string)),
            Self::Flag => v.is_boolean(),
            Self::BlockKind => v
                .as_str()
                .is_some_and(|s| PromptBlockKind::VALUES.contains(&s)),
            Self::Stamp => v.is_u64(),
            Self::OptStamp => v.is_null() || v.is_u64(),
            Self::Blocks => v.is_array(),
        }
    }
}

struct Field {
    name: &'static str,
    kind: FieldKind,
    required: bool,
}

const fn req(name: &'static str, kind: FieldKind) -> Field {
    Field {
        name,
        kind,
        required: true,
    }
}

const fn opt(name: &'static str, kind: FieldKind) -> Field {
    Field {
        name,
        kind,
        required: false,
    }
}

const PROMPT_FIELDS: &[Field] = &[
    req("id", FieldKind::Text),
    req("name", FieldKind::Text),
    opt("description", FieldKind::Text),
    opt("tags", FieldKind::Texts),
    opt("blocks", FieldKind::Blocks),
    opt("created_at", FieldKind::Stamp),
    opt("updated_at", FieldKind::Stamp),
];

const TEMPLATE_FIELDS: &[Field] = &[
    req("id", FieldKind::Text),
    req("name", FieldKind::Text),
    opt("description", FieldKind::Text),
    opt("tags", FieldKind::Texts),
    opt("blocks", FieldKind::Blocks),
    opt("created_at", FieldKind::Stamp),
    opt("updated_at", FieldKind::OptStamp),
];

const STYLE_PACK_FIELDS: &[Field] = &[
    req("id", FieldKind::Text),
    req("name", FieldKind::Text),
    req("snippet", FieldKind::Text),
    opt("tags", FieldKind::Texts),
    opt("created_at", FieldKind::Stamp),
    opt("updated_at", FieldKind::OptStamp),
];

const SNAPSHOT_FIELDS: &[Field] = &[
    req("id", FieldKind::Text),
    req("prompt_id", FieldKind::Text),
    req("name", FieldKind::Text),
    req("compiled", FieldKind::Text),
    opt("created_at", FieldKind::Stamp),
    opt("blocks", FieldKind::Blocks),
    opt("warnings", FieldKind::Texts),
];

const BLOCK_FIELDS: &[Field] = &[
    req("id", FieldKind::Text),
    req("kind", FieldKind::BlockKind),
    req("enabled", FieldKind::Flag),
    req("content", FieldKind::Text),
];

const ENTRY_LISTS: &[(&str, &[Field])] = &[
    ("prompts", PROMPT_FIELDS),
    ("templates", TEMPLATE_FIELDS),
    ("style_packs", STYLE_PACK_FIELDS),
    ("history", SNAPSHOT_FIELDS),
];

/// Shape of the prompt library. Lists and scalar members may be absent; present ones must
/// decode.
fn validate_prompt_manager(value: &Value, errors: &mut Vec<Violation>) {
    let base = [key(PROMPT_MANAGER_BLOCK)];
    let Some(Value::Object(pm)) = lookup(value, &base) else {
        return;
    };

    if pm.get("enabled").is_some_and(|v| !v.is_boolean()) {
        errors.push(Violation::at(
            &child(&base, key("enabled")),
            Constraint::NotBoolean,
        ));
    }
    if pm.get("active_prompt_id").is_some_and(|v| !v.is_string()) {
        errors.push(Violation::at(
            &child(&base, key("active_prompt_id")),
            Constraint::WrongType {
                expected: "a string",
            },
        ));
    }

    for (list, fields) in ENTRY_LISTS {
        let path = child(&base, key(list));
        match pm.get(*list) {
            None => {}
            Some(Value::Array(entries)) => check_entries(entries, &path, fields, errors),
            Some(_) => errors.push(Violation::at(&path, Constraint::NotArray)),
        }
    }
}

/// Required members are checked before optional ones and nested blocks last, so an entry
/// that must be dropped is reported before anything inside it.
fn check_entries(
    entries: &[Value],
    base: &[Segment],
    fields: &[Field],
    errors: &mut Vec<Violation>,
) {
    for (i, entry) in entries.iter().enumerate() {
        let elem = child(base, Segment::Index(i));
        let Value::Object(entry) = entry else {
            errors.push(Violation::at(&elem, Constraint::NotObject));
            continue;
        };

        for field in fields {
            let expected = field.kind.expected();
            let constraint = match entry.get(field.name) {
                Some(v) if field.kind.accepts(v) => continue,
                None if !field.required => continue,
                _ if field.required => Constraint::MissingField { expected },
                _ => Constraint::WrongType { expected },
            };
            errors.push(Violation::at(&child(&elem, key(field.name)), constraint));
        }

        let has_blocks = fields.iter().any(|f| matches!(f.kind, FieldKind::Blocks));
        if has_blocks && let Some(Value::Array(blocks)) = entry.get("blocks") {
            check_entries(blocks, &child(&elem, key("blocks")), BLOCK_FIELDS, errors);
        }
    }
}

fn check_range(value: &Value, path: &[Segment], min: f64, max: f64, errors: &mut Vec<Violation>) {
    let ok = lookup(value, path)
        .and_then(Value::as_f64)
        .is_some_and(|n| n >= min && n <= max);
    if !ok {
        errors.push(Violation::at(path, Constraint::OutOfRange { min, max }));
    }
}

fn check_one_of(value: &Value, path: &[Segment], allowed: &[&str], errors: &mut Vec<Violation>) {
    let ok = lookup(value, path)
        .and_then(Value::as_str)
        .is_some_and(|s| allowed.contains(&s));
    if !ok {
        errors.push(Violation::at(path, Constraint::NotOneOf));
    }
}

fn check_hex(value: &Value, path: &[Segment], errors: &mut Vec<Violation>) {
    let ok = lookup(value, path).and_then(Value::as_str).is_some_and(is_hex_color);
    if !ok {
        errors.push(Violation::at(path, Constraint::BadHex));
    }
}

/// `#RRGGBB`, case-insensitive.
pub(crate) fn is_hex_color(s: &str) -> bool {
    s.len() == 7 && s.starts_with('#') && s[1..].bytes().all(|b| b.is_ascii_hexdigit())
}

fn child(base: &[Segment], seg: Segment) -> Vec<Segment> {
    let mut path = base.to_vec();
    path.push(seg);
    path
}

fn key(name: &str) -> Segment {
    Segment::Key(name.to_owned())
}

pub(crate) fn lookup<'a>(value: &'a Value, path: &[Segment]) -> Option<&'a Value> {
    let path = DottedPath::from_segments(path.iter().cloned())?;
    get(value, &path)
}

#[cfg(test)]
#[path = "../../tests/unit/schema/validate.rs"]
mod tests;
