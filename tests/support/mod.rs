#![allow(dead_code)]

use std::fs;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::Context;
use loclint::builtin::STRING_IR;
use loclint::diagnostics::Diagnostic;
use loclint::fix::Fix;
use loclint::fixer::Fixer;
use loclint::ir::IntermediateRepresentation;
use loclint::level::Severity;
use loclint::parser::Parser;
use loclint::plugin::{Plugin, PluginCatalog, PluginManager};
use loclint::rule::{MatchParams, Rule, RuleConstructor, rule_constructor};
use loclint::ruleset::{RuleSetDefinition, RuleSetting};
use loclint::source_file::SourceFile;
use loclint::transformer::Transformer;
use tempfile::TempDir;

/// IR type whose representation is a bare `i32`.
pub const COUNTER_IR: &str = "counter";

pub const TEST_PLUGIN: &str = "loclint-plugin-test";
pub const GENERIC_RULE_COUNT: usize = 21;
/// The rule the `no-state-checker` rule set switches off.
pub const STATE_CHECKER: &str = "generic-rule-07";

pub fn generic_rule_name(i: usize) -> String {
    format!("generic-rule-{i:02}")
}

/// Creates a throwaway project tree from `(relative path, content)` pairs.
pub fn create_temp_project(files: &[(&str, &str)]) -> std::io::Result<TempDir> {
    let tmp = tempfile::tempdir()?;
    for (path, content) in files {
        let full = tmp.path().join(path);
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(full, content)?;
    }
    Ok(tmp)
}

/// Rule that finds nothing.
pub struct SilentRule {
    name: String,
    ir_type: String,
}

impl SilentRule {
    pub fn new(name: impl Into<String>, ir_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ir_type: ir_type.into(),
        }
    }
}

impl Rule for SilentRule {
    fn name(&self) -> &str {
        &self.name
    }
    fn description(&self) -> &str {
        "Never reports anything"
    }
    fn rule_type(&self) -> &str {
        &self.ir_type
    }
    fn check(&self, _params: &MatchParams<'_>) -> anyhow::Result<Vec<Diagnostic>> {
        Ok(Vec::new())
    }
}

/// Patch understood by [`CountingFixer`].
#[derive(Debug)]
pub struct Decrement;

/// Reports one fixable error while the counter is positive.
pub struct Countdown;

impl Rule for Countdown {
    fn name(&self) -> &str {
        "countdown"
    }
    fn description(&self) -> &str {
        "Counter must reach zero"
    }
    fn rule_type(&self) -> &str {
        COUNTER_IR
    }
    fn check(&self, params: &MatchParams<'_>) -> anyhow::Result<Vec<Diagnostic>> {
        let value = *params
            .ir
            .representation::<i32>()
            .context("counter representation expected")?;
        if value <= 0 {
            return Ok(Vec::new());
        }
        let result = Diagnostic::new(
            Severity::Error,
            "countdown",
            params.file.display().to_string(),
            format!("counter is {value}"),
        )
        .with_fix(Fix::new(COUNTER_IR, Decrement));
        Ok(vec![result])
    }
}

/// Reports two fixable errors while the counter is positive.
pub struct Pair;

impl Rule for Pair {
    fn name(&self) -> &str {
        "pair"
    }
    fn description(&self) -> &str {
        "Counter must reach zero, two steps at a time"
    }
    fn rule_type(&self) -> &str {
        COUNTER_IR
    }
    fn check(&self, params: &MatchParams<'_>) -> anyhow::Result<Vec<Diagnostic>> {
        let value = *params
            .ir
            .representation::<i32>()
            .context("counter representation expected")?;
        if value <= 0 {
            return Ok(Vec::new());
        }
        let result = |half: &str| {
            Diagnostic::new(
                Severity::Error,
                "pair",
                params.file.display().to_string(),
                format!("counter is {value} ({half})"),
            )
            .with_fix(Fix::new(COUNTER_IR, Decrement))
        };
        Ok(vec![result("first"), result("second")])
    }
}

/// Always reports one suggestion without a fix.
pub struct Nag;

impl Rule for Nag {
    fn name(&self) -> &str {
        "nag"
    }
    fn description(&self) -> &str {
        "Always has something to say"
    }
    fn rule_type(&self) -> &str {
        COUNTER_IR
    }
    fn check(&self, params: &MatchParams<'_>) -> anyhow::Result<Vec<Diagnostic>> {
        Ok(vec![Diagnostic::new(
            Severity::Suggestion,
            "nag",
            params.file.display().to_string(),
            "consider counting differently",
        )])
    }
}

/// Fails on every call.
pub struct Broken;

impl Rule for Broken {
    fn name(&self) -> &str {
        "broken"
    }
    fn description(&self) -> &str {
        "Always fails"
    }
    fn rule_type(&self) -> &str {
        COUNTER_IR
    }
    fn check(&self, _params: &MatchParams<'_>) -> anyhow::Result<Vec<Diagnostic>> {
        anyhow::bail!("rule exploded")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixerMode {
    Apply,
    /// Applies only the first fix offered in each call.
    ApplyFirst,
    Decline,
    Fail,
}

/// Counter fixer that records how often it was invoked.
pub struct CountingFixer {
    pub calls: Arc<AtomicUsize>,
    pub mode: FixerMode,
}

impl CountingFixer {
    pub fn boxed(mode: FixerMode) -> (Box<dyn Fixer>, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let fixer = Self {
            calls: Arc::clone(&calls),
            mode,
        };
        (Box::new(fixer), calls)
    }
}

impl Fixer for CountingFixer {
    fn ir_type(&self) -> &str {
        COUNTER_IR
    }

    fn apply_fixes(
        &self,
        ir: &mut IntermediateRepresentation,
        fixes: &mut [Fix],
    ) -> anyhow::Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.mode {
            FixerMode::Fail => anyhow::bail!("fixer exploded"),
            FixerMode::Decline => Ok(()),
            FixerMode::Apply | FixerMode::ApplyFirst => {
                let limit = match self.mode {
                    FixerMode::ApplyFirst => 1,
                    _ => usize::MAX,
                };
                for fix in fixes.iter_mut().take(limit) {
                    if fix.patch::<Decrement>().is_some() {
                        *ir.representation_mut::<i32>()
                            .context("counter representation expected")? -= 1;
                        fix.set_applied(true);
                    }
                }
                Ok(())
            }
        }
    }
}

pub fn counter_ir(value: i32) -> IntermediateRepresentation {
    IntermediateRepresentation::new(COUNTER_IR, value, "counter.txt")
}

/// Parser name that fails on every file.
pub const BROKEN_PARSER: &str = "broken-text";
/// Transformer that appends the number of results to a string IR.
pub const ANNOTATE_TRANSFORMER: &str = "annotate";

pub struct BrokenParser;

impl Parser for BrokenParser {
    fn name(&self) -> &str {
        BROKEN_PARSER
    }
    fn description(&self) -> &str {
        "Fails on every file"
    }
    fn ir_type(&self) -> &str {
        STRING_IR
    }
    fn extensions(&self) -> &[&str] {
        &[]
    }
    fn parse(&self, file: &SourceFile) -> anyhow::Result<Vec<IntermediateRepresentation>> {
        anyhow::bail!("cannot parse {}", file.path().display())
    }
}

pub struct AnnotateTransformer;

impl Transformer for AnnotateTransformer {
    fn name(&self) -> &str {
        ANNOTATE_TRANSFORMER
    }
    fn description(&self) -> &str {
        "Appends a trailer counting the results"
    }
    fn ir_type(&self) -> &str {
        STRING_IR
    }
    fn transform(
        &self,
        ir: &IntermediateRepresentation,
        results: &[Diagnostic],
    ) -> anyhow::Result<Option<IntermediateRepresentation>> {
        let text = ir
            .representation::<String>()
            .context("string representation expected")?;
        let annotated = format!("{text}<!-- {} issues -->\n", results.len());
        let mut replacement =
            IntermediateRepresentation::new(STRING_IR, annotated, ir.file_path());
        if let Some(stats) = ir.stats() {
            replacement = replacement.with_stats(*stats);
        }
        replacement.set_dirty(true);
        Ok(Some(replacement))
    }
}

/// Contributes 21 silent string rules, the `generic` rule set enabling all
/// of them and `no-state-checker` switching one off.
pub struct TestPlugin;

impl Plugin for TestPlugin {
    fn name(&self) -> &str {
        TEST_PLUGIN
    }

    fn parsers(&self) -> Vec<Arc<dyn Parser>> {
        vec![Arc::new(BrokenParser)]
    }

    fn transformers(&self) -> Vec<Arc<dyn Transformer>> {
        vec![Arc::new(AnnotateTransformer)]
    }

    fn rules(&self) -> Vec<RuleConstructor> {
        (1..=GENERIC_RULE_COUNT)
            .map(|i| {
                let name = generic_rule_name(i);
                rule_constructor(move |_| {
                    Ok(Arc::new(SilentRule::new(name.clone(), STRING_IR)) as Arc<dyn Rule>)
                })
            })
            .collect()
    }

    fn rule_sets(&self) -> Vec<(String, RuleSetDefinition)> {
        let generic: RuleSetDefinition = (1..=GENERIC_RULE_COUNT)
            .map(|i| (generic_rule_name(i), RuleSetting::Enabled(true)))
            .collect();
        let no_state: RuleSetDefinition = [(STATE_CHECKER, RuleSetting::Enabled(false))]
            .into_iter()
            .collect();
        vec![
            ("generic".to_string(), generic),
            ("no-state-checker".to_string(), no_state),
        ]
    }
}

pub fn catalog() -> PluginCatalog {
    PluginCatalog::new().with(TEST_PLUGIN, || Box::new(TestPlugin))
}

/// Builtins plus the test plugin, already loaded.
pub fn plugins_with_test_plugin() -> Arc<PluginManager> {
    let plugins = PluginManager::with_builtins(catalog()).expect("builtins register");
    plugins
        .load(&["test".to_string()])
        .expect("test plugin loads");
    Arc::new(plugins)
}

/// Builtins only; the test plugin is available by name.
pub fn plugins() -> Arc<PluginManager> {
    Arc::new(PluginManager::with_builtins(catalog()).expect("builtins register"))
}
