use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

use serde_json::Value;

use super::{ComponentMap, read, write};
use crate::error::{LintError, LintResult};
use crate::fixer::{Fixer, FixerFactory};

/// Fixers keyed by the IR type they handle, built per request.
pub struct FixerManager {
    fixers: ComponentMap<FixerFactory>,
    configured: RwLock<HashMap<String, Value>>,
}

impl Default for FixerManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Shallow merge of two option objects; keys in `overrides` win.
fn merge_options(base: Option<&Value>, overrides: Option<&Value>) -> Value {
    match (base, overrides) {
        (Some(Value::Object(base)), Some(Value::Object(over))) => {
            let mut merged = base.clone();
            merged.extend(over.iter().map(|(k, v)| (k.clone(), v.clone())));
            Value::Object(merged)
        }
        (_, Some(over)) => over.clone(),
        (Some(base), None) => base.clone(),
        (None, None) => Value::Null,
    }
}

impl FixerManager {
    pub fn new() -> Self {
        Self {
            fixers: ComponentMap::new("fixer"),
            configured: RwLock::new(HashMap::new()),
        }
    }

    /// Register fixer factories. Each is built once with no options to check
    /// that the instance handles the IR type it was registered for.
    pub fn add(&self, registrant: &str, factories: Vec<FixerFactory>) -> LintResult<()> {
        for factory in factories {
            let probe = (factory.construct)(&Value::Null).map_err(|err| {
                LintError::invalid(
                    "fixer",
                    format!("fixer for {} from {registrant} failed to build: {err:#}", factory.ir_type),
                )
            })?;
            if probe.ir_type() != factory.ir_type {
                return Err(LintError::invalid(
                    "fixer",
                    format!(
                        "fixer from {registrant} was registered for type {} but handles type {}",
                        factory.ir_type,
                        probe.ir_type()
                    ),
                ));
            }
            let ir_type = factory.ir_type.clone();
            let description = factory.description.clone();
            self.fixers.insert(&ir_type, &description, registrant, factory)?;
        }
        Ok(())
    }

    /// Default options for the fixer of `ir_type`, from configuration.
    pub fn configure(&self, ir_type: &str, options: Value) {
        write(&self.configured).insert(ir_type.to_string(), options);
    }

    /// A fresh fixer for `ir_type`, or `None` if no plugin provides one.
    pub fn get(&self, ir_type: &str, options: Option<&Value>) -> LintResult<Option<Box<dyn Fixer>>> {
        let Some(factory) = self.fixers.get(ir_type) else {
            return Ok(None);
        };
        let merged = {
            let configured = read(&self.configured);
            merge_options(configured.get(ir_type), options)
        };
        let fixer = (factory.construct)(&merged).map_err(|err| {
            LintError::invalid("fixer", format!("fixer for {ir_type} rejected its options: {err:#}"))
        })?;
        Ok(Some(fixer))
    }

    pub fn descriptions(&self) -> BTreeMap<String, String> {
        self.fixers.descriptions()
    }

    pub fn clear(&self) {
        self.fixers.clear();
        write(&self.configured).clear();
    }
}
