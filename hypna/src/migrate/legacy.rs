use crate::path::DottedPath;
use crate::path::access::set_in_place;
use serde_json::{Map, Value};

/// Target path and the historical top-level keys it may be recovered from, in priority order.
const ALIASES: &[(&str, &[&str])] = &[
    ("INPUT.subject", &["subject", "intent"]),
    ("INPUT.notes", &["notes", "stateNotes"]),
    ("HALLUCINATION.profile", &["hh", "hallucinationProfile"]),
    ("PALETTE.descriptive", &["palette", "paletteSeed"]),
];

/// Copy every recoverable alias from `raw` onto `base`.
///
/// The first non-null candidate wins. Returns how many targets were filled.
pub(crate) fn apply_aliases(base: &mut Value, raw: &Map<String, Value>) -> usize {
    let mut applied = 0;
    for (target, candidates) in ALIASES {
        let Some(found) = candidates
            .iter()
            .find_map(|k| raw.get(*k).filter(|v| !v.is_null()))
        else {
            continue;
        };
        let Ok(path) = DottedPath::parse(target) else {
            continue;
        };
        match set_in_place(base, &path, Value::String(coerce_to_string(found))) {
            Ok(()) => applied += 1,
            Err(e) => tracing::warn!(path = *target, error = %e, "legacy alias not applied"),
        }
    }
    applied
}

/// Strings pass through; scalars use their display form; containers become compact JSON.
pub(crate) fn coerce_to_string(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        Value::Array(_) | Value::Object(_) => v.to_string(),
    }
}
