use std::collections::BTreeMap;

use serde_json::Value;

use super::ComponentMap;
use crate::error::{LintError, LintResult};
use crate::serializer::{Serializer, SerializerFactory};

/// Serializers by name, built per request with caller options.
pub struct SerializerManager {
    serializers: ComponentMap<SerializerFactory>,
}

impl Default for SerializerManager {
    fn default() -> Self {
        Self::new()
    }
}

impl SerializerManager {
    pub fn new() -> Self {
        Self {
            serializers: ComponentMap::new("serializer"),
        }
    }

    pub fn add(&self, registrant: &str, factories: Vec<SerializerFactory>) -> LintResult<()> {
        for factory in factories {
            let probe = (factory.construct)(&Value::Null).map_err(|err| {
                LintError::invalid(
                    "serializer",
                    format!("serializer {} from {registrant} failed to build: {err:#}", factory.name),
                )
            })?;
            if probe.name() != factory.name {
                return Err(LintError::invalid(
                    "serializer",
                    format!(
                        "serializer registered as {} from {registrant} calls itself {}",
                        factory.name,
                        probe.name()
                    ),
                ));
            }
            let name = factory.name.clone();
            let description = factory.description.clone();
            self.serializers.insert(&name, &description, registrant, factory)?;
        }
        Ok(())
    }

    pub fn get(&self, name: &str, options: &Value) -> LintResult<Option<Box<dyn Serializer>>> {
        let Some(factory) = self.serializers.get(name) else {
            return Ok(None);
        };
        let serializer = (factory.construct)(options).map_err(|err| {
            LintError::invalid("serializer", format!("serializer {name} rejected its options: {err:#}"))
        })?;
        Ok(Some(serializer))
    }

    /// First registered serializer (by name order) handling `ir_type`, with
    /// default options. Used for file types that name no serializer.
    pub fn default_for_type(&self, ir_type: &str) -> Option<Box<dyn Serializer>> {
        self.serializers
            .values()
            .into_iter()
            .filter_map(|factory| (factory.construct)(&Value::Null).ok())
            .find(|serializer| serializer.ir_type() == ir_type)
    }

    pub fn descriptions(&self) -> BTreeMap<String, String> {
        self.serializers.descriptions()
    }

    pub fn clear(&self) {
        self.serializers.clear();
    }
}
