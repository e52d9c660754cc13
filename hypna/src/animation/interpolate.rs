use crate::foundation::error::{HypnaError, HypnaResult};
use crate::path::access::{kind_name, set_in_place};
use crate::path::{DottedPath, get};
use crate::schema::curves::{is_curve_path_allowed, module_for_curve_path};
use crate::schema::model::{CurveValue, Keyframe, Schema};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

const MIN_SPAN: f64 = 1e-9;

/// A derived snapshot and the curve values that were written into it.
pub(crate) struct Interpolated {
    pub(crate) schema: Schema,
    pub(crate) curves: BTreeMap<String, CurveValue>,
}

/// Derived schema at normalized time `t`.
///
/// Numeric curves blend linearly between the bracketing keyframes and clamp outside them;
/// string curves snap to the nearest keyframe. `schema` is left untouched.
pub fn interpolate_at_time(schema: &Schema, t: f64) -> HypnaResult<Schema> {
    interpolate(schema, t).map(|i| i.schema)
}

/// Value at `path` of the snapshot at `t`, or `None` when the path does not resolve.
pub fn interpolated_value(schema: &Schema, t: f64, path: &str) -> HypnaResult<Option<Value>> {
    let path = DottedPath::parse(path)?;
    let doc = interpolate_at_time(schema, t)?.to_value()?;
    Ok(get(&doc, &path).cloned())
}

/// Label of the keyframe nearest to `t`; ties go to the earlier keyframe in list order.
pub fn state_at(keyframes: &[Keyframe], t: f64) -> Option<&str> {
    nearest(keyframes.iter().map(|k| (k.t, k)), t).and_then(|k| k.state.as_deref())
}

pub(crate) fn interpolate(schema: &Schema, t: f64) -> HypnaResult<Interpolated> {
    if !t.is_finite() {
        return Err(HypnaError::timeline(format!("time must be finite, got {t}")));
    }

    let mut doc = schema.to_value()?;
    let mut applied = BTreeMap::new();
    let keyframes = &schema.animation.keyframes;

    let paths: BTreeSet<&str> = keyframes
        .iter()
        .flat_map(|k| k.curves.keys().map(String::as_str))
        .collect();

    for path in paths {
        if !is_curve_path_allowed(path) {
            tracing::trace!(path, "curve path not animatable");
            continue;
        }
        if schema.ignore_rules.hard_disable
            && let Some(module) = module_for_curve_path(path)
            && !schema.module_enabled(module)
        {
            tracing::trace!(path, %module, "curve owned by disabled module");
            continue;
        }

        let Some(value) = sample_curve(keyframes, path, t) else {
            continue;
        };

        let parsed = DottedPath::parse(path)?;
        let json = value.to_json();
        // Only existing leaves of the same kind are written, so curves never grow new
        // structure (such as a plate that is not in the palette).
        match get(&doc, &parsed) {
            Some(leaf) if kind_name(leaf) == kind_name(&json) => {}
            _ => {
                tracing::trace!(path, "curve target missing or of another kind");
                continue;
            }
        }
        set_in_place(&mut doc, &parsed, json)?;
        applied.insert(path.to_owned(), value);
    }

    Ok(Interpolated {
        schema: Schema::from_value(doc)?,
        curves: applied,
    })
}

/// Resolve one curve at `t`, or `None` when no keyframe carries `path`.
///
/// The kind of the nearest sample decides the mode: a string snaps verbatim, a number blends
/// over the numeric samples only.
pub(crate) fn sample_curve(keyframes: &[Keyframe], path: &str, t: f64) -> Option<CurveValue> {
    let samples = keyframes
        .iter()
        .filter_map(|k| k.curves.get(path).map(|v| (k.t, v)));
    match nearest(samples, t)? {
        CurveValue::Text(s) => Some(CurveValue::Text(s.clone())),
        CurveValue::Number(_) => {
            let mut points: Vec<(f64, f64)> = keyframes
                .iter()
                .filter_map(|k| match k.curves.get(path) {
                    Some(CurveValue::Number(v)) => Some((k.t, *v)),
                    _ => None,
                })
                .collect();
            points.sort_by(|a, b| a.0.total_cmp(&b.0));
            blend(&points, t).map(CurveValue::Number)
        }
    }
}

/// Item whose time is nearest to `t`. Strict comparison keeps the first of equals.
fn nearest<T>(items: impl Iterator<Item = (f64, T)>, t: f64) -> Option<T> {
    let mut best: Option<(f64, T)> = None;
    for (at, item) in items {
        let d = (at - t).abs();
        if best.as_ref().is_none_or(|(bd, _)| d < *bd) {
            best = Some((d, item));
        }
    }
    best.map(|(_, item)| item)
}

/// Piecewise-linear value over time-sorted `points`, clamped at both ends.
fn blend(points: &[(f64, f64)], t: f64) -> Option<f64> {
    let (first, last) = (points.first()?, points.last()?);
    if t <= first.0 {
        return Some(first.1);
    }
    if t >= last.0 {
        return Some(last.1);
    }
    let (left, right) = points
        .windows(2)
        .map(|w| (w[0], w[1]))
        .find(|(l, r)| t >= l.0 && t <= r.0)
        .unwrap_or((*first, *last));
    let alpha = (t - left.0) / (right.0 - left.0).max(MIN_SPAN);
    Some(left.1 + (right.1 - left.1) * alpha)
}

#[cfg(test)]
#[path = "../../tests/unit/animation/interpolate.rs"]
mod tests;
