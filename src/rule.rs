use std::path::Path;
use std::sync::Arc;

use serde_json::Value;

use crate::config::DeclarativeRuleDefinition;
use crate::diagnostics::Diagnostic;
use crate::ir::IntermediateRepresentation;

/// Inputs to a single rule check.
#[derive(Debug, Clone, Copy)]
pub struct MatchParams<'a> {
    pub ir: &'a IntermediateRepresentation,
    pub file: &'a Path,
    pub locale: Option<&'a str>,
}

/// A lint rule operating on one IR type.
///
/// Returning an error is tolerated by the engine: the failure is logged
/// and the rule contributes nothing for that pass.
pub trait Rule: Send + Sync {
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    /// IR type this rule can inspect.
    fn rule_type(&self) -> &str;

    fn link(&self) -> Option<&str> {
        None
    }

    fn check(&self, params: &MatchParams<'_>) -> anyhow::Result<Vec<Diagnostic>>;
}

/// Builds a rule, optionally configured with options from a rule set.
pub type RuleConstructor =
    Arc<dyn Fn(Option<&Value>) -> anyhow::Result<Arc<dyn Rule>> + Send + Sync>;

/// Wrap a closure as a [`RuleConstructor`].
pub fn rule_constructor<F>(f: F) -> RuleConstructor
where
    F: Fn(Option<&Value>) -> anyhow::Result<Arc<dyn Rule>> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Builds rules from declarative configuration entries of one `type`.
#[derive(Clone)]
pub struct DeclarativeRuleKind {
    pub kind: String,
    pub build: Arc<dyn Fn(&DeclarativeRuleDefinition) -> anyhow::Result<Arc<dyn Rule>> + Send + Sync>,
}

impl DeclarativeRuleKind {
    pub fn new<F>(kind: impl Into<String>, build: F) -> Self
    where
        F: Fn(&DeclarativeRuleDefinition) -> anyhow::Result<Arc<dyn Rule>> + Send + Sync + 'static,
    {
        Self {
            kind: kind.into(),
            build: Arc::new(build),
        }
    }
}
