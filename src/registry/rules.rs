use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use serde_json::Value;
use tracing::{debug, trace};

use super::{ComponentMap, read, write};
use crate::config::DeclarativeRuleDefinition;
use crate::error::{LintError, LintResult};
use crate::rule::{DeclarativeRuleKind, Rule, RuleConstructor, rule_constructor};
use crate::ruleset::RuleSetDefinition;

#[derive(Clone)]
struct RuleEntry {
    construct: RuleConstructor,
    default: Arc<dyn Rule>,
}

/// Rules, declarative rule kinds, and named rule set definitions.
pub struct RuleManager {
    rules: ComponentMap<RuleEntry>,
    kinds: ComponentMap<DeclarativeRuleKind>,
    rule_sets: RwLock<BTreeMap<String, RuleSetDefinition>>,
}

impl Default for RuleManager {
    fn default() -> Self {
        Self::new()
    }
}

impl RuleManager {
    pub fn new() -> Self {
        Self {
            rules: ComponentMap::new("rule"),
            kinds: ComponentMap::new("declarative rule kind"),
            rule_sets: RwLock::new(BTreeMap::new()),
        }
    }

    /// Register rule constructors. Each is invoked once without options to
    /// validate it and to learn the rule's name; that instance is cached as
    /// the rule's default.
    pub fn add(&self, registrant: &str, constructors: Vec<RuleConstructor>) -> LintResult<()> {
        for construct in constructors {
            let default = construct(None).map_err(|err| {
                LintError::invalid("rule", format!("rule from {registrant} failed to build: {err:#}"))
            })?;
            if default.rule_type().is_empty() {
                return Err(LintError::invalid(
                    "rule",
                    format!("rule {} from {registrant} declares no IR type", default.name()),
                ));
            }
            let name = default.name().to_string();
            let description = default.description().to_string();
            self.rules
                .insert(&name, &description, registrant, RuleEntry { construct, default })?;
            trace!(rule = %name, registrant, "registered rule");
        }
        Ok(())
    }

    pub fn add_declarative_kind(&self, registrant: &str, kind: DeclarativeRuleKind) -> LintResult<()> {
        let name = kind.kind.clone();
        self.kinds.insert(&name, "", registrant, kind)
    }

    /// Build and register rules defined in configuration. An unknown `type`
    /// is a configuration error.
    pub fn add_declarative(
        &self,
        registrant: &str,
        definitions: &[DeclarativeRuleDefinition],
    ) -> LintResult<()> {
        for def in definitions {
            let Some(kind) = self.kinds.get(&def.kind) else {
                return Err(LintError::unknown(
                    "rule type",
                    &def.kind,
                    format!("the definition of rule {}", def.name),
                ));
            };
            let rule = (kind.build)(def).map_err(|err| {
                LintError::invalid("rule", format!("rule {} is malformed: {err:#}", def.name))
            })?;
            let shared = Arc::clone(&rule);
            let construct = rule_constructor(move |_| Ok(Arc::clone(&shared)));
            let description = rule.description().to_string();
            self.rules.insert(
                &def.name,
                &description,
                registrant,
                RuleEntry {
                    construct,
                    default: rule,
                },
            )?;
        }
        Ok(())
    }

    /// Named rule set definitions may be redefined (e.g. by a nested
    /// project); the latest definition wins.
    pub fn add_rule_set_definition(&self, name: &str, definition: RuleSetDefinition) {
        let mut sets = write(&self.rule_sets);
        if sets.contains_key(name) {
            debug!(ruleset = name, "replacing rule set definition");
        }
        sets.insert(name.to_string(), definition);
    }

    pub fn add_rule_set_definitions<'a>(
        &self,
        definitions: impl IntoIterator<Item = (&'a str, &'a RuleSetDefinition)>,
    ) {
        for (name, def) in definitions {
            self.add_rule_set_definition(name, def.clone());
        }
    }

    pub fn get_rule_set_definition(&self, name: &str) -> Option<RuleSetDefinition> {
        read(&self.rule_sets).get(name).cloned()
    }

    /// The cached default instance, or a fresh one configured with `options`.
    pub fn get(&self, name: &str, options: Option<&Value>) -> LintResult<Arc<dyn Rule>> {
        let entry = self
            .rules
            .get(name)
            .ok_or_else(|| LintError::unknown("rule", name, "a rule set"))?;
        match options {
            None => Ok(entry.default),
            Some(options) => (entry.construct)(Some(options)).map_err(|err| {
                LintError::invalid("rule", format!("rule {name} rejected its options: {err:#}"))
            }),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.rules.contains(name)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn descriptions(&self) -> BTreeMap<String, String> {
        self.rules.descriptions()
    }

    /// Rule set name to the rules it mentions.
    pub fn rule_set_summaries(&self) -> BTreeMap<String, String> {
        read(&self.rule_sets)
            .iter()
            .map(|(name, def)| (name.clone(), def.keys().collect::<Vec<_>>().join(", ")))
            .collect()
    }

    pub fn clear(&self) {
        self.rules.clear();
        self.kinds.clear();
        write(&self.rule_sets).clear();
    }
}
