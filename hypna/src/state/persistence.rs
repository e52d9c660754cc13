use crate::foundation::error::{HypnaError, HypnaResult};
use crate::migrate::{MigrationOutcome, migrate_with_outcome};
use crate::schema::defaults::default_schema;
use crate::schema::model::Schema;
use crate::schema::version::STORAGE_VERSION;
use serde::Serialize;
use serde_json::Value;

const STORAGE_VERSION_KEY: &str = "storageVersion";

/// Storage envelope written by [`encode_stored_state`].
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredState<'a> {
    /// Envelope shape version ([`STORAGE_VERSION`]).
    pub storage_version: u32,
    /// Caller-supplied timestamp, conventionally RFC 3339.
    pub saved_at: &'a str,
    /// Payload.
    pub schema: &'a Schema,
}

/// Wrap `schema` in the storage envelope and encode it as pretty JSON.
pub fn encode_stored_state(schema: &Schema, saved_at: &str) -> HypnaResult<String> {
    let envelope = StoredState {
        storage_version: STORAGE_VERSION,
        saved_at,
        schema,
    };
    serde_json::to_string_pretty(&envelope)
        .map_err(|e| HypnaError::serde(format!("encode stored state: {e}")))
}

/// Parse stored text and return the schema payload, unmigrated.
///
/// Envelopes are recognized by the `storageVersion` key; anything else is treated as a bare
/// schema from before the envelope existed. An envelope without `schema` yields `null`.
pub fn decode_stored_payload(text: &str) -> HypnaResult<Value> {
    let value: Value = serde_json::from_str(text)
        .map_err(|e| HypnaError::serde(format!("decode stored state: {e}")))?;
    match value {
        Value::Object(mut map) if map.contains_key(STORAGE_VERSION_KEY) => {
            tracing::debug!(
                storage_version = ?map.get(STORAGE_VERSION_KEY),
                "stored envelope"
            );
            Ok(map.remove("schema").unwrap_or(Value::Null))
        }
        other => Ok(other),
    }
}

/// Load and migrate stored text. Unreadable input yields the defaults.
pub fn load_schema(text: &str) -> Schema {
    load_schema_with_outcome(text).0
}

/// [`load_schema`] plus the migration outcome.
pub fn load_schema_with_outcome(text: &str) -> (Schema, MigrationOutcome) {
    match decode_stored_payload(text) {
        Ok(payload) => migrate_with_outcome(&payload),
        Err(e) => {
            tracing::warn!(error = %e, "stored state unreadable; using defaults");
            (default_schema(), MigrationOutcome::Defaulted)
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/state/persistence.rs"]
mod tests;
