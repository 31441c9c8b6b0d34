use std::collections::BTreeMap;
use std::sync::Arc;

use super::ComponentMap;
use crate::config::FormatterDefinition;
use crate::error::LintResult;
use crate::formatter::{Formatter, TemplateFormatter};

/// Formatters by name.
pub struct FormatterManager {
    formatters: ComponentMap<Arc<dyn Formatter>>,
}

impl Default for FormatterManager {
    fn default() -> Self {
        Self::new()
    }
}

impl FormatterManager {
    pub fn new() -> Self {
        Self {
            formatters: ComponentMap::new("formatter"),
        }
    }

    pub fn add(&self, registrant: &str, formatters: Vec<Arc<dyn Formatter>>) -> LintResult<()> {
        for formatter in formatters {
            self.formatters.insert(
                formatter.name(),
                formatter.description(),
                registrant,
                Arc::clone(&formatter),
            )?;
        }
        Ok(())
    }

    /// Register template formatters declared in configuration.
    pub fn add_declarative(&self, registrant: &str, definitions: &[FormatterDefinition]) -> LintResult<()> {
        let formatters = definitions
            .iter()
            .map(|def| Arc::new(TemplateFormatter::new(def)) as Arc<dyn Formatter>)
            .collect();
        self.add(registrant, formatters)
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Formatter>> {
        self.formatters.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.formatters.contains(name)
    }

    pub fn descriptions(&self) -> BTreeMap<String, String> {
        self.formatters.descriptions()
    }

    pub fn clear(&self) {
        self.formatters.clear();
    }
}
