use crate::path::segment::{DottedPath, PathError, Segment};
use serde_json::Value;

/// Read the value at `path`.
///
/// Returns `None` as soon as the walk reaches a missing member, an out-of-bounds index, or a
/// node that cannot be descended into (a primitive, or an array addressed by a non-numeric key).
/// An explicit `null` leaf is returned as `Some(Value::Null)`.
pub fn get<'a>(root: &'a Value, path: &DottedPath) -> Option<&'a Value> {
    let mut cur = root;
    for seg in path.segments() {
        cur = match (cur, seg) {
            (Value::Array(items), Segment::Index(i)) => items.get(*i)?,
            (Value::Object(map), seg) => map.get(seg.as_key().as_ref())?,
            _ => return None,
        };
    }
    Some(cur)
}

/// Read the value at `path`, or `fallback` when it cannot be reached.
pub fn get_or<'a>(root: &'a Value, path: &DottedPath, fallback: &'a Value) -> &'a Value {
    get(root, path).unwrap_or(fallback)
}

/// String-keyed form of [`get`]. Fails only on path syntax.
pub fn get_at<'a>(root: &'a Value, path: &str) -> Result<Option<&'a Value>, PathError> {
    let path = DottedPath::parse(path)?;
    Ok(get(root, &path))
}

/// Return a copy of `root` with `value` written at `path`.
///
/// `root` is never modified. Missing or `null` intermediates are created as an array when the
/// following segment is an index and as an object otherwise. An index equal to an array's
/// length appends; anything further is [`PathError::IndexOutOfRange`].
pub fn set(root: &Value, path: &DottedPath, value: Value) -> Result<Value, PathError> {
    let mut out = root.clone();
    set_in_place(&mut out, path, value)?;
    Ok(out)
}

/// String-keyed form of [`set`].
pub fn set_at(root: &Value, path: &str, value: Value) -> Result<Value, PathError> {
    let path = DottedPath::parse(path)?;
    set(root, &path, value)
}

pub(crate) fn set_in_place(
    root: &mut Value,
    path: &DottedPath,
    value: Value,
) -> Result<(), PathError> {
    let segs = path.segments();
    let Some((last, parents)) = segs.split_last() else {
        return Err(PathError::Empty);
    };

    if root.is_null() {
        *root = empty_container_for(&segs[0]);
    }

    let mut cur = root;
    for (depth, seg) in parents.iter().enumerate() {
        let slot = child_slot(cur, seg, path, depth)?;
        if slot.is_null() {
            *slot = empty_container_for(&segs[depth + 1]);
        }
        cur = slot;
    }
    *child_slot(cur, last, path, parents.len())? = value;
    Ok(())
}

fn child_slot<'a>(
    node: &'a mut Value,
    seg: &Segment,
    path: &DottedPath,
    depth: usize,
) -> Result<&'a mut Value, PathError> {
    match node {
        Value::Object(map) => Ok(map.entry(seg.as_key().into_owned()).or_insert(Value::Null)),
        Value::Array(items) => match seg {
            Segment::Index(i) => {
                let len = items.len();
                if *i > len {
                    return Err(PathError::IndexOutOfRange {
                        path: path.to_string(),
                        at: path.prefix_text(depth),
                        index: *i,
                        len,
                    });
                }
                if *i == len {
                    items.push(Value::Null);
                }
                Ok(&mut items[*i])
            }
            Segment::Key(k) => Err(PathError::KeyOnArray {
                path: path.to_string(),
                at: path.prefix_text(depth),
                segment: k.clone(),
            }),
        },
        other => Err(PathError::Conflict {
            path: path.to_string(),
            at: path.prefix_text(depth),
            found: kind_name(other),
        }),
    }
}

fn empty_container_for(next: &Segment) -> Value {
    if next.is_index() {
        Value::Array(Vec::new())
    } else {
        Value::Object(serde_json::Map::new())
    }
}

pub(crate) fn kind_name(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
#[path = "../../tests/unit/path/access.rs"]
mod tests;
