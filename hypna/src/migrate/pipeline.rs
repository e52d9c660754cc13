use crate::migrate::{legacy, repair, steps};
use crate::schema::defaults::default_schema;
use crate::schema::model::Schema;
use crate::schema::module::ModuleKey;
use crate::schema::validate::{PROMPT_MANAGER_BLOCK, is_valid_schema};
use crate::schema::version::SCHEMA_VERSION;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// How [`migrate_with_outcome`] resolved its input.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MigrationOutcome {
    /// Already valid; decoded unchanged.
    Current,
    /// Recognized version, upgraded and repaired. `from` equals the current version when
    /// the document carried the current tag but broke the contract.
    Upgraded {
        /// Detected source version.
        from: u32,
    },
    /// Unrecognized object; defaults plus legacy aliases.
    Legacy,
    /// Not an object; plain defaults.
    Defaulted,
}

/// Resolve arbitrary input to a valid current-version schema.
pub fn migrate(input: &Value) -> Schema {
    migrate_with_outcome(input).0
}

/// [`migrate`], also reporting which path the input took.
#[tracing::instrument(skip(input))]
pub fn migrate_with_outcome(input: &Value) -> (Schema, MigrationOutcome) {
    let Value::Object(raw) = input else {
        tracing::debug!("input is not an object; using defaults");
        return (default_schema(), MigrationOutcome::Defaulted);
    };

    if is_valid_schema(input) {
        match Schema::deserialize(input) {
            Ok(schema) => return (schema, MigrationOutcome::Current),
            Err(e) => tracing::debug!(error = %e, "valid document did not decode; repairing"),
        }
    }

    match detect_version(input) {
        Some(from) => {
            tracing::debug!(from, "upgrading recognized document");
            (upgrade(input, from), MigrationOutcome::Upgraded { from })
        }
        None => {
            tracing::debug!("unrecognized document; recovering legacy aliases");
            (from_legacy(raw), MigrationOutcome::Legacy)
        }
    }
}

/// Version marker of a recognized document, or `None`.
///
/// A document is recognized only when it also carries a `MODULES` object.
///
/// | marker             | version |
/// |--------------------|---------|
/// | `version: 3`       | 3       |
/// | `version: 2`       | 2       |
/// | `schemaVersion: 2` | 1       |
pub fn detect_version(input: &Value) -> Option<u32> {
    if !input.get("MODULES").is_some_and(Value::is_object) {
        return None;
    }
    let version = input.get("version").and_then(Value::as_u64);
    let legacy_tag = input.get("schemaVersion").and_then(Value::as_u64);
    match (version, legacy_tag) {
        (Some(v), _) if v == u64::from(SCHEMA_VERSION) => Some(SCHEMA_VERSION),
        (Some(2), _) => Some(2),
        (None, Some(2)) => Some(steps::OLDEST_VERSION),
        _ => None,
    }
}

fn upgrade(input: &Value, from: u32) -> Schema {
    let Ok(defaults) = default_schema().to_value() else {
        return default_schema();
    };

    let upgraded = steps::upgrade(input, from);
    let mut doc = overlay(defaults.clone(), &upgraded);
    if let Value::Object(map) = &mut doc {
        map.insert("version".to_owned(), Value::from(SCHEMA_VERSION));
    }

    let fixed = repair::repair(&mut doc, &defaults);
    if fixed > 0 {
        tracing::warn!(from, fixed, "repaired fields of migrated document");
    }
    decode_per_block(&doc, defaults)
}

fn from_legacy(raw: &serde_json::Map<String, Value>) -> Schema {
    let Ok(mut doc) = default_schema().to_value() else {
        return default_schema();
    };
    let applied = legacy::apply_aliases(&mut doc, raw);
    tracing::debug!(applied, "legacy aliases recovered");
    Schema::deserialize(&doc).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "legacy document did not decode; using defaults");
        default_schema()
    })
}

/// Layer `input` over `base`.
///
/// Objects merge recursively and keep members unknown to `base`. Arrays are taken whole from
/// `input`. A leaf from `input` replaces the base leaf only when both have the same JSON kind,
/// so stale-shaped values never displace current ones.
pub(crate) fn overlay(base: Value, input: &Value) -> Value {
    match (base, input) {
        (Value::Object(mut b), Value::Object(i)) => {
            for (k, v) in i {
                let merged = match b.remove(k) {
                    Some(bv) => overlay(bv, v),
                    None => v.clone(),
                };
                b.insert(k.clone(), merged);
            }
            Value::Object(b)
        }
        (Value::Null, v) => v.clone(),
        (b, v) if same_kind(&b, v) => v.clone(),
        (b, _) => b,
    }
}

fn same_kind(a: &Value, b: &Value) -> bool {
    std::mem::discriminant(a) == std::mem::discriminant(b)
}

/// Decode block by block so one undecodable block falls back to its default alone.
fn decode_per_block(doc: &Value, defaults: Value) -> Schema {
    let blocks = ["MODULES", "IGNORE_RULES"]
        .into_iter()
        .chain(ModuleKey::ALL.iter().map(|k| k.as_str()))
        .chain([PROMPT_MANAGER_BLOCK]);

    let mut accepted = defaults;
    for name in blocks {
        let Some(block) = doc.get(name) else {
            continue;
        };
        let mut candidate = accepted.clone();
        if let Value::Object(map) = &mut candidate {
            map.insert(name.to_owned(), block.clone());
        }
        match Schema::deserialize(&candidate) {
            Ok(_) => accepted = candidate,
            Err(e) => tracing::warn!(block = name, error = %e, "block did not decode; using default"),
        }
    }

    Schema::deserialize(&accepted).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "migrated document did not decode; using defaults");
        default_schema()
    })
}

#[cfg(test)]
#[path = "../../tests/unit/migrate/pipeline.rs"]
mod tests;
