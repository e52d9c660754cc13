use crate::foundation::error::HypnaResult;
use crate::schema::model::Schema;
use crate::schema::module::ModuleKey;
use crate::schema::validate::PROMPT_MANAGER_BLOCK;
use serde_json::{Map, Value};

/// Export-safe JSON holding only the enabled module blocks.
///
/// `MODULES` lists only the enabled keys. `version`, `IGNORE_RULES` and `PROMPT_MANAGER` are
/// always carried. The result is not a valid schema on its own; running it through
/// [`crate::migrate()`] restores the disabled blocks from defaults.
pub fn build_enabled_only_schema(schema: &Schema) -> HypnaResult<Value> {
    let Value::Object(mut full) = schema.to_value()? else {
        return Ok(Value::Null);
    };

    let mut out = Map::new();
    out.insert("version".into(), Value::from(schema.version));
    if let Some(rules) = full.remove("IGNORE_RULES") {
        out.insert("IGNORE_RULES".into(), rules);
    }

    let mut modules = Map::new();
    for key in ModuleKey::ALL {
        if !schema.module_enabled(key) {
            continue;
        }
        modules.insert(key.as_str().into(), Value::Bool(true));
        if let Some(block) = full.remove(key.as_str()) {
            out.insert(key.as_str().into(), block);
        }
    }
    out.insert("MODULES".into(), Value::Object(modules));

    if let Some(pm) = full.remove(PROMPT_MANAGER_BLOCK) {
        out.insert(PROMPT_MANAGER_BLOCK.into(), pm);
    }
    Ok(Value::Object(out))
}
