use std::collections::BTreeMap;
use std::sync::Arc;

use super::ComponentMap;
use crate::error::{LintError, LintResult};
use crate::transformer::Transformer;

/// Transformers by name. Transformers are stateless and shared.
pub struct TransformerManager {
    transformers: ComponentMap<Arc<dyn Transformer>>,
}

impl Default for TransformerManager {
    fn default() -> Self {
        Self::new()
    }
}

impl TransformerManager {
    pub fn new() -> Self {
        Self {
            transformers: ComponentMap::new("transformer"),
        }
    }

    pub fn add(&self, registrant: &str, transformers: Vec<Arc<dyn Transformer>>) -> LintResult<()> {
        for transformer in transformers {
            if transformer.ir_type().is_empty() {
                return Err(LintError::invalid(
                    "transformer",
                    format!(
                        "transformer {} from {registrant} declares no IR type",
                        transformer.name()
                    ),
                ));
            }
            self.transformers.insert(
                transformer.name(),
                transformer.description(),
                registrant,
                Arc::clone(&transformer),
            )?;
        }
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Transformer>> {
        self.transformers.get(name)
    }

    pub fn get_type(&self, name: &str) -> Option<String> {
        self.get(name).map(|t| t.ir_type().to_string())
    }

    pub fn descriptions(&self) -> BTreeMap<String, String> {
        self.transformers.descriptions()
    }

    pub fn clear(&self) {
        self.transformers.clear();
    }
}
