//! Plugins and the manager that owns every component registry.
//!
//! Rust has no runtime module loading, so plugins are linked into the binary
//! and made discoverable by name through a [`PluginCatalog`]. Configuration
//! still refers to them by name, and loading stays an explicit, fallible
//! step that must finish before any configuration is resolved.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, Mutex, PoisonError};

use tracing::{debug, info};

use crate::error::{LintError, LintResult};
use crate::fixer::FixerFactory;
use crate::formatter::Formatter;
use crate::parser::Parser;
use crate::registry::{
    FixerManager, FormatterManager, ParserManager, RuleManager, SerializerManager,
    TransformerManager,
};
use crate::rule::{DeclarativeRuleKind, RuleConstructor};
use crate::ruleset::RuleSetDefinition;
use crate::serializer::SerializerFactory;
use crate::transformer::Transformer;

/// A bundle of components contributed under one name.
pub trait Plugin: Send + Sync {
    fn name(&self) -> &str;

    /// Deferred setup, run once before any component is requested.
    fn init(&mut self) -> anyhow::Result<()> {
        Ok(())
    }

    fn parsers(&self) -> Vec<Arc<dyn Parser>> {
        Vec::new()
    }

    fn rules(&self) -> Vec<RuleConstructor> {
        Vec::new()
    }

    fn rule_sets(&self) -> Vec<(String, RuleSetDefinition)> {
        Vec::new()
    }

    fn declarative_rule_kinds(&self) -> Vec<DeclarativeRuleKind> {
        Vec::new()
    }

    fn fixers(&self) -> Vec<FixerFactory> {
        Vec::new()
    }

    fn transformers(&self) -> Vec<Arc<dyn Transformer>> {
        Vec::new()
    }

    fn serializers(&self) -> Vec<SerializerFactory> {
        Vec::new()
    }

    fn formatters(&self) -> Vec<Arc<dyn Formatter>> {
        Vec::new()
    }
}

type PluginFactory = Arc<dyn Fn() -> Box<dyn Plugin> + Send + Sync>;

/// Plugins available to configurations, by name.
#[derive(Clone, Default)]
pub struct PluginCatalog {
    factories: BTreeMap<String, PluginFactory>,
}

impl PluginCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<F>(&mut self, name: impl Into<String>, factory: F)
    where
        F: Fn() -> Box<dyn Plugin> + Send + Sync + 'static,
    {
        self.factories.insert(name.into(), Arc::new(factory));
    }

    pub fn with<F>(mut self, name: impl Into<String>, factory: F) -> Self
    where
        F: Fn() -> Box<dyn Plugin> + Send + Sync + 'static,
    {
        self.register(name, factory);
        self
    }

    /// Look a plugin up by its exact name, then with the `loclint-` and
    /// `loclint-plugin-` prefixes.
    pub fn resolve(&self, name: &str) -> Option<Box<dyn Plugin>> {
        [
            name.to_string(),
            format!("loclint-{name}"),
            format!("loclint-plugin-{name}"),
        ]
        .iter()
        .find_map(|candidate| self.factories.get(candidate))
        .map(|factory| factory())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }
}

/// Owns the component registries and loads plugins into them.
///
/// One manager is shared, by `Arc`, between a project and all of its nested
/// projects.
pub struct PluginManager {
    catalog: PluginCatalog,
    loaded: Mutex<BTreeSet<String>>,
    parsers: ParserManager,
    rules: RuleManager,
    fixers: FixerManager,
    transformers: TransformerManager,
    serializers: SerializerManager,
    formatters: FormatterManager,
}

impl PluginManager {
    /// A manager with empty registries.
    pub fn new(catalog: PluginCatalog) -> Self {
        Self {
            catalog,
            loaded: Mutex::new(BTreeSet::new()),
            parsers: ParserManager::new(),
            rules: RuleManager::new(),
            fixers: FixerManager::new(),
            transformers: TransformerManager::new(),
            serializers: SerializerManager::new(),
            formatters: FormatterManager::new(),
        }
    }

    /// A manager with the built-in plugin already registered.
    pub fn with_builtins(catalog: PluginCatalog) -> LintResult<Self> {
        let manager = Self::new(catalog);
        let mut builtin = crate::builtin::BuiltinPlugin;
        builtin.init().map_err(|err| LintError::plugin(builtin.name(), format!("{err:#}")))?;
        manager.register(&builtin)?;
        manager.mark_loaded(builtin.name());
        Ok(manager)
    }

    fn mark_loaded(&self, name: &str) -> bool {
        self.loaded
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.to_string())
    }

    pub fn is_loaded(&self, name: &str) -> bool {
        self.loaded
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(name)
    }

    /// Resolve, initialise and register the named plugins. Plugins already
    /// loaded are skipped, so nested projects may name the same plugin.
    pub fn load(&self, names: &[String]) -> LintResult<()> {
        for name in names {
            if self.is_loaded(name) {
                debug!(plugin = %name, "plugin already loaded");
                continue;
            }
            let mut plugin = self
                .catalog
                .resolve(name)
                .ok_or_else(|| LintError::unknown("plugin", name, "the configuration"))?;
            plugin
                .init()
                .map_err(|err| LintError::plugin(name, format!("{err:#}")))?;
            self.register(plugin.as_ref())?;
            self.mark_loaded(name);
            info!(plugin = %name, "loaded plugin");
        }
        Ok(())
    }

    /// Register every component a plugin contributes.
    pub fn register(&self, plugin: &dyn Plugin) -> LintResult<()> {
        let name = plugin.name();
        self.parsers.add(name, plugin.parsers())?;
        self.rules.add(name, plugin.rules())?;
        for kind in plugin.declarative_rule_kinds() {
            self.rules.add_declarative_kind(name, kind)?;
        }
        for (set_name, definition) in plugin.rule_sets() {
            self.rules.add_rule_set_definition(&set_name, definition);
        }
        self.fixers.add(name, plugin.fixers())?;
        self.transformers.add(name, plugin.transformers())?;
        self.serializers.add(name, plugin.serializers())?;
        self.formatters.add(name, plugin.formatters())?;
        Ok(())
    }

    pub fn parsers(&self) -> &ParserManager {
        &self.parsers
    }

    pub fn rules(&self) -> &RuleManager {
        &self.rules
    }

    pub fn fixers(&self) -> &FixerManager {
        &self.fixers
    }

    pub fn transformers(&self) -> &TransformerManager {
        &self.transformers
    }

    pub fn serializers(&self) -> &SerializerManager {
        &self.serializers
    }

    pub fn formatters(&self) -> &FormatterManager {
        &self.formatters
    }

    /// Empty every registry and forget loaded plugins.
    pub fn clear(&self) {
        self.parsers.clear();
        self.rules.clear();
        self.fixers.clear();
        self.transformers.clear();
        self.serializers.clear();
        self.formatters.clear();
        self.loaded
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}
