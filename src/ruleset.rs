use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::OrderedMap;
use crate::rule::Rule;

/// How a rule set entry treats its rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RuleSetting {
    /// `true` includes the rule with its defaults, `false` removes it.
    Enabled(bool),
    /// Include the rule configured with these options.
    Options(Value),
}

/// Named mapping from rule name to setting.
pub type RuleSetDefinition = OrderedMap<RuleSetting>;

/// Running, duplicate-free list of rule instances, keyed by rule name.
#[derive(Default, Clone)]
pub struct RuleSet {
    rules: Vec<Arc<dyn Rule>>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a rule; an existing rule of the same name is replaced in place.
    pub fn add(&mut self, rule: Arc<dyn Rule>) {
        match self.rules.iter_mut().find(|r| r.name() == rule.name()) {
            Some(slot) => *slot = rule,
            None => self.rules.push(rule),
        }
    }

    pub fn remove(&mut self, name: &str) {
        self.rules.retain(|r| r.name() != name);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.rules.iter().any(|r| r.name() == name)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn into_rules(self) -> Vec<Arc<dyn Rule>> {
        self.rules
    }
}

impl std::fmt::Debug for RuleSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.rules.iter().map(|r| r.name()))
            .finish()
    }
}
