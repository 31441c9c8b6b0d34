//! Name-indexed registries for plugin-supplied components.
//!
//! Registries are populated while plugins load and are only read
//! afterwards. They are internally synchronised so a single
//! `Arc<PluginManager>` can be shared by every project and file type.

mod fixers;
mod formatters;
mod parsers;
mod rules;
mod serializers;
mod transformers;

pub use fixers::FixerManager;
pub use formatters::FormatterManager;
pub use parsers::ParserManager;
pub use rules::RuleManager;
pub use serializers::SerializerManager;
pub use transformers::TransformerManager;

use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::error::{LintError, LintResult};

pub(crate) fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

pub(crate) fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

struct Registered<T> {
    value: T,
    description: String,
    registrant: String,
}

/// Shared storage for one kind of component, keyed by identifier.
pub(crate) struct ComponentMap<T> {
    kind: &'static str,
    entries: RwLock<BTreeMap<String, Registered<T>>>,
}

impl<T: Clone> ComponentMap<T> {
    pub(crate) fn new(kind: &'static str) -> Self {
        Self {
            kind,
            entries: RwLock::new(BTreeMap::new()),
        }
    }

    /// Register `value` under `name`; duplicates are rejected.
    pub(crate) fn insert(
        &self,
        name: &str,
        description: &str,
        registrant: &str,
        value: T,
    ) -> LintResult<()> {
        if name.trim().is_empty() {
            return Err(LintError::invalid(
                self.kind,
                format!("{registrant} supplied a {} without a name", self.kind),
            ));
        }
        let mut entries = write(&self.entries);
        if let Some(existing) = entries.get(name) {
            return Err(LintError::duplicate(
                self.kind,
                name,
                format!("{registrant}; already provided by {}", existing.registrant),
            ));
        }
        entries.insert(
            name.to_string(),
            Registered {
                value,
                description: description.to_string(),
                registrant: registrant.to_string(),
            },
        );
        Ok(())
    }

    pub(crate) fn get(&self, name: &str) -> Option<T> {
        read(&self.entries).get(name).map(|r| r.value.clone())
    }

    pub(crate) fn contains(&self, name: &str) -> bool {
        read(&self.entries).contains_key(name)
    }

    pub(crate) fn values(&self) -> Vec<T> {
        read(&self.entries).values().map(|r| r.value.clone()).collect()
    }

    pub(crate) fn len(&self) -> usize {
        read(&self.entries).len()
    }

    /// Identifier to description, sorted by identifier.
    pub(crate) fn descriptions(&self) -> BTreeMap<String, String> {
        read(&self.entries)
            .iter()
            .map(|(k, r)| (k.clone(), r.description.clone()))
            .collect()
    }

    pub(crate) fn clear(&self) {
        write(&self.entries).clear();
    }
}
