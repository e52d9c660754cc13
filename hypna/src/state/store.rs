use crate::animation::{FrameSeries, TimelineOpts, build_frame_series};
use crate::compile::{DefaultCompiler, PromptCompiler, compile_prompt};
use crate::foundation::error::HypnaResult;
use crate::migrate::{MigrationOutcome, migrate_with_outcome};
use crate::path::set_at;
use crate::schema::defaults::default_schema;
use crate::schema::model::Schema;
use crate::schema::module::ModuleKey;
use serde_json::Value;

/// Options applied on every [`Store::recompute`].
#[derive(Clone, Copy, Debug, Default)]
pub struct StoreOpts {
    /// Frame-series options.
    pub timeline: TimelineOpts,
}

/// Outputs derived from the current schema.
#[derive(Clone, Debug, PartialEq)]
pub struct Derived {
    /// Compiled prompt for the current (non-interpolated) schema.
    pub compiled: String,
    /// Advisory lint warnings.
    pub warnings: Vec<String>,
    /// Frame series, or the disabled sentinel.
    pub series: FrameSeries,
}

/// Holds one schema and its derived outputs.
///
/// Every mutation goes through a method here and marks the derived outputs stale;
/// [`Store::recompute`] is the single place that rebuilds them. Failed mutations leave the
/// store unchanged.
pub struct Store<C = DefaultCompiler> {
    schema: Schema,
    derived: Option<Derived>,
    compiler: C,
    opts: StoreOpts,
}

impl Default for Store {
    fn default() -> Self {
        Self::new(default_schema())
    }
}

impl Store {
    /// Store using [`DefaultCompiler`] and default options.
    pub fn new(schema: Schema) -> Self {
        Self::with_compiler(schema, DefaultCompiler, StoreOpts::default())
    }
}

impl<C: PromptCompiler> Store<C> {
    /// Store with an injected compiler.
    pub fn with_compiler(schema: Schema, compiler: C, opts: StoreOpts) -> Self {
        Self {
            schema,
            derived: None,
            compiler,
            opts,
        }
    }

    /// Current schema.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Outputs of the last [`Store::recompute`], or `None` when stale.
    pub fn derived(&self) -> Option<&Derived> {
        self.derived.as_ref()
    }

    /// Write `value` at a dotted path.
    ///
    /// Structural conflicts and values that do not fit the typed model are errors. Range
    /// checks are left to [`Schema::validate`].
    pub fn set(&mut self, path: &str, value: Value) -> HypnaResult<()> {
        let doc = set_at(&self.schema.to_value()?, path, value)?;
        self.replace(Schema::from_value(doc)?);
        Ok(())
    }

    /// Deep-merge a partial document: objects merge recursively, anything else replaces.
    pub fn merge(&mut self, partial: &Value) -> HypnaResult<()> {
        let mut doc = self.schema.to_value()?;
        deep_merge(&mut doc, partial);
        self.replace(Schema::from_value(doc)?);
        Ok(())
    }

    /// Flip a module flag and return its new state. Block values are kept.
    pub fn toggle_module(&mut self, key: ModuleKey) -> bool {
        let enabled = !self.schema.module_enabled(key);
        let mut next = self.schema.clone();
        next.modules.set(key, enabled);
        self.replace(next);
        enabled
    }

    /// Replace the schema with the defaults.
    pub fn reset_to_defaults(&mut self) {
        self.replace(default_schema());
    }

    /// Migrate arbitrary input and make it current. Never fails.
    pub fn import(&mut self, input: &Value) -> MigrationOutcome {
        let (schema, outcome) = migrate_with_outcome(input);
        tracing::debug!(?outcome, "imported schema");
        self.replace(schema);
        outcome
    }

    /// Rebuild compiled text, warnings and the frame series from the current schema.
    pub fn recompute(&mut self) -> HypnaResult<&Derived> {
        let compiled = self.compiler.compile(&self.schema);
        let warnings = compile_prompt(&self.schema).warnings;
        let series = build_frame_series(&self.schema, &self.compiler, &self.opts.timeline)?;
        Ok(&*self.derived.insert(Derived {
            compiled,
            warnings,
            series,
        }))
    }

    fn replace(&mut self, schema: Schema) {
        self.schema = schema;
        self.derived = None;
    }
}

fn deep_merge(base: &mut Value, patch: &Value) {
    match (base, patch) {
        (Value::Object(b), Value::Object(p)) => {
            for (k, v) in p {
                match b.get_mut(k) {
                    Some(slot) if slot.is_object() && v.is_object() => deep_merge(slot, v),
                    _ => {
                        b.insert(k.clone(), v.clone());
                    }
                }
            }
        }
        (b, p) => *b = p.clone(),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/state/store.rs"]
mod tests;
