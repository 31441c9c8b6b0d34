use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, RwLock};

use tracing::trace;

use super::{ComponentMap, read, write};
use crate::error::{LintError, LintResult};
use crate::parser::Parser;

/// Parsers by name and by file extension. Parsers are stateless and shared.
pub struct ParserManager {
    by_name: ComponentMap<Arc<dyn Parser>>,
    by_extension: RwLock<HashMap<String, Vec<Arc<dyn Parser>>>>,
}

impl Default for ParserManager {
    fn default() -> Self {
        Self::new()
    }
}

fn normalize_extension(ext: &str) -> String {
    ext.trim_start_matches('.').to_ascii_lowercase()
}

impl ParserManager {
    pub fn new() -> Self {
        Self {
            by_name: ComponentMap::new("parser"),
            by_extension: RwLock::new(HashMap::new()),
        }
    }

    pub fn add(&self, registrant: &str, parsers: Vec<Arc<dyn Parser>>) -> LintResult<()> {
        for parser in parsers {
            if parser.ir_type().is_empty() {
                return Err(LintError::invalid(
                    "parser",
                    format!("parser {} from {registrant} declares no IR type", parser.name()),
                ));
            }
            self.by_name.insert(
                parser.name(),
                parser.description(),
                registrant,
                Arc::clone(&parser),
            )?;
            let mut by_ext = write(&self.by_extension);
            for ext in parser.extensions() {
                by_ext
                    .entry(normalize_extension(ext))
                    .or_default()
                    .push(Arc::clone(&parser));
            }
            trace!(parser = parser.name(), registrant, "registered parser");
        }
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Parser>> {
        self.by_name.get(name)
    }

    /// Every parser registered for `extension`, in registration order.
    pub fn get_by_extension(&self, extension: &str) -> Vec<Arc<dyn Parser>> {
        read(&self.by_extension)
            .get(&normalize_extension(extension))
            .cloned()
            .unwrap_or_default()
    }

    /// IR type produced by the named parser.
    pub fn get_type(&self, name: &str) -> Option<String> {
        self.get(name).map(|p| p.ir_type().to_string())
    }

    pub fn descriptions(&self) -> BTreeMap<String, String> {
        self.by_name.descriptions()
    }

    pub fn clear(&self) {
        self.by_name.clear();
        write(&self.by_extension).clear();
    }
}
