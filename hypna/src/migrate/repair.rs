use crate::foundation::error::{HypnaError, HypnaResult};
use crate::path::access::set_in_place;
use crate::path::{DottedPath, Segment};
use crate::schema::validate::{Constraint, Violation, collect_violations, lookup};
use crate::schema::version::SCHEMA_VERSION;
use serde_json::{Map, Value};

const REPAIR_PASSES: usize = 2;

/// Rewrite `doc` until it satisfies the validator, using `defaults` as the source of
/// replacement values.
///
/// Returns the number of violations that were fixed. Any violation the passes could not fix
/// resets its whole top-level block to the default.
pub(crate) fn repair(doc: &mut Value, defaults: &Value) -> usize {
    let mut fixed = 0;
    for _ in 0..REPAIR_PASSES {
        let violations = collect_violations(doc);
        if violations.is_empty() {
            return fixed;
        }
        fixed += violations.len();
        repair_pass(doc, defaults, &violations);
    }

    let leftover = collect_violations(doc);
    for v in &leftover {
        tracing::warn!(violation = %v, "repair did not converge; resetting block");
        reset_block(doc, defaults, &v.path);
    }
    fixed + leftover.len()
}

enum Removal {
    Key { object: Vec<Segment>, key: String },
    Element { array: Vec<Segment>, index: usize },
}

fn repair_pass(doc: &mut Value, defaults: &Value, violations: &[Violation]) {
    let mut removals = Vec::new();
    // Subtrees already rewritten in this pass. Violations beneath them were collected against
    // the old contents and are stale.
    let mut replaced: Vec<Vec<Segment>> = Vec::new();
    for v in violations {
        if replaced.iter().any(|r| v.path.starts_with(r)) {
            tracing::trace!(violation = %v, "inside a replaced subtree; skipping");
            continue;
        }
        match fix(doc, defaults, v, &mut removals) {
            Ok(()) => match v.constraint {
                Constraint::NotObject => replaced.push(v.path.clone()),
                Constraint::MissingField { .. } => {
                    replaced.push(v.path[..v.path.len().saturating_sub(1)].to_vec());
                }
                _ => {}
            },
            Err(e) => {
                tracing::warn!(violation = %v, error = %e, "could not repair field; resetting block");
                reset_block(doc, defaults, &v.path);
                replaced.push(v.path.iter().take(1).cloned().collect());
            }
        }
    }

    // Keys first, then elements deepest first and from the highest index down so pending
    // paths stay valid.
    removals.sort_by_key(|r| match r {
        Removal::Key { .. } => (0, 0, 0),
        Removal::Element { array, index } => (1, usize::MAX - array.len(), usize::MAX - index),
    });
    for r in removals {
        match r {
            Removal::Key { object, key } => {
                if let Some(Value::Object(map)) = lookup_mut(doc, &object) {
                    map.remove(&key);
                }
            }
            Removal::Element { array, index } => {
                if let Some(Value::Array(items)) = lookup_mut(doc, &array)
                    && index < items.len()
                {
                    items.remove(index);
                }
            }
        }
    }
}

fn fix(
    doc: &mut Value,
    defaults: &Value,
    v: &Violation,
    removals: &mut Vec<Removal>,
) -> HypnaResult<()> {
    match v.constraint {
        Constraint::NotObject => match v.path.split_last() {
            None => {
                *doc = defaults.clone();
                Ok(())
            }
            Some((Segment::Index(i), parent)) => {
                removals.push(Removal::Element {
                    array: parent.to_vec(),
                    index: *i,
                });
                Ok(())
            }
            Some((Segment::Key(k), _)) if k == "curves" => {
                write(doc, &v.path, Value::Object(Map::new()))
            }
            Some(_) => write(doc, &v.path, default_at(defaults, &v.path)?),
        },
        Constraint::Version => write(doc, &v.path, Value::from(SCHEMA_VERSION)),
        Constraint::MustBeTrue => write(doc, &v.path, Value::Bool(true)),
        Constraint::NotBoolean
        | Constraint::NotArray
        | Constraint::NotOneOf
        | Constraint::BadHex
        | Constraint::NotCount => write(doc, &v.path, default_at(defaults, &v.path)?),
        Constraint::OutOfRange { min, max } => {
            let replacement = match lookup(doc, &v.path).and_then(Value::as_f64) {
                Some(n) => number(n.clamp(min, max)),
                None => default_at(defaults, &v.path).unwrap_or_else(|_| number(min)),
            };
            write(doc, &v.path, replacement)
        }
        Constraint::TooMany { max } => {
            if let Some(Value::Array(items)) = lookup_mut(doc, &v.path) {
                items.truncate(max);
            }
            Ok(())
        }
        Constraint::BadCurveValue | Constraint::WrongType { .. } => {
            if let Some((Segment::Key(key), parent)) = v.path.split_last() {
                removals.push(Removal::Key {
                    object: parent.to_vec(),
                    key: key.clone(),
                });
            }
            Ok(())
        }
        Constraint::MissingField { .. } => {
            let entry = v.path.split_last().map(|(_, entry)| entry);
            let Some((Segment::Index(i), list)) = entry.and_then(<[Segment]>::split_last) else {
                return Err(HypnaError::migration(format!(
                    "{} is not a list entry member",
                    display(&v.path)
                )));
            };
            removals.push(Removal::Element {
                array: list.to_vec(),
                index: *i,
            });
            Ok(())
        }
    }
}

fn write(doc: &mut Value, path: &[Segment], value: Value) -> HypnaResult<()> {
    let path = DottedPath::from_segments(path.iter().cloned())
        .ok_or_else(|| HypnaError::migration("cannot write at the document root"))?;
    set_in_place(doc, &path, value)?;
    Ok(())
}

/// Default value at `path`. Array positions missing from the defaults fall back to the
/// first element.
fn default_at(defaults: &Value, path: &[Segment]) -> HypnaResult<Value> {
    if let Some(v) = lookup(defaults, path) {
        return Ok(v.clone());
    }
    let first: Vec<Segment> = path
        .iter()
        .map(|s| match s {
            Segment::Index(_) => Segment::Index(0),
            other => other.clone(),
        })
        .collect();
    lookup(defaults, &first)
        .cloned()
        .ok_or_else(|| HypnaError::migration(format!("no default for {}", display(path))))
}

fn reset_block(doc: &mut Value, defaults: &Value, path: &[Segment]) {
    let Some(Segment::Key(block)) = path.first() else {
        *doc = defaults.clone();
        return;
    };
    if let (Value::Object(map), Some(d)) = (&mut *doc, defaults.get(block)) {
        map.insert(block.clone(), d.clone());
    }
}

fn lookup_mut<'a>(doc: &'a mut Value, path: &[Segment]) -> Option<&'a mut Value> {
    let mut cur = doc;
    for seg in path {
        cur = match (cur, seg) {
            (Value::Array(items), Segment::Index(i)) => items.get_mut(*i)?,
            (Value::Object(map), seg) => map.get_mut(seg.as_key().as_ref())?,
            _ => return None,
        };
    }
    Some(cur)
}

/// Integral values are written as JSON integers so counts survive a clamp.
fn number(n: f64) -> Value {
    if n.fract() == 0.0 && n.abs() < 9_007_199_254_740_992.0 {
        Value::from(n as i64)
    } else {
        serde_json::Number::from_f64(n).map_or(Value::Null, Value::Number)
    }
}

fn display(path: &[Segment]) -> String {
    path.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(".")
}

#[cfg(test)]
#[path = "../../tests/unit/migrate/repair.rs"]
mod tests;
