//! Rule application and the bounded autofix loop for a single IR.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, error, trace};

use crate::diagnostics::Diagnostic;
use crate::error::{LintError, LintResult};
use crate::fix::Fix;
use crate::fixer::Fixer;
use crate::ir::IntermediateRepresentation;
use crate::rule::{MatchParams, Rule};

pub const DEFAULT_MAX_AUTOFIX_ITERATIONS: usize = 10;

/// Applies a fixed list of rules, and optionally a fixer, to one IR type.
pub struct LintingStrategy {
    ir_type: String,
    rules: Vec<Arc<dyn Rule>>,
    fixer: Option<Box<dyn Fixer>>,
    max_autofix_iterations: usize,
}

impl LintingStrategy {
    /// Every rule and the fixer must handle `ir_type`.
    pub fn new(
        ir_type: &str,
        rules: Vec<Arc<dyn Rule>>,
        fixer: Option<Box<dyn Fixer>>,
    ) -> LintResult<Self> {
        let mismatch = |kind, name: &str, actual: &str| LintError::TypeMismatch {
            kind,
            name: name.to_string(),
            actual: actual.to_string(),
            file_type: "(linting strategy)".to_string(),
            expected: ir_type.to_string(),
        };
        if let Some(rule) = rules.iter().find(|r| r.rule_type() != ir_type) {
            return Err(mismatch("rule", rule.name(), rule.rule_type()));
        }
        if let Some(fixer) = fixer.as_ref().filter(|f| f.ir_type() != ir_type) {
            return Err(mismatch("fixer", fixer.ir_type(), fixer.ir_type()));
        }
        Ok(Self {
            ir_type: ir_type.to_string(),
            rules,
            fixer,
            max_autofix_iterations: DEFAULT_MAX_AUTOFIX_ITERATIONS,
        })
    }

    /// Cap on fix rounds; values below 1 are raised to 1.
    pub fn with_max_autofix_iterations(mut self, max: usize) -> Self {
        self.max_autofix_iterations = max.max(1);
        self
    }

    pub fn max_autofix_iterations(&self) -> usize {
        self.max_autofix_iterations
    }

    pub fn ir_type(&self) -> &str {
        &self.ir_type
    }

    /// One pass of every rule. A failing rule is logged and contributes
    /// nothing.
    fn run_rules(
        &self,
        ir: &IntermediateRepresentation,
        file: &Path,
        locale: Option<&str>,
    ) -> Vec<Diagnostic> {
        let params = MatchParams { ir, file, locale };
        let mut results = Vec::new();
        for rule in &self.rules {
            match rule.check(&params) {
                Ok(found) => results.extend(found),
                Err(err) => error!(
                    rule = rule.name(),
                    file = %file.display(),
                    "rule failed: {err:#}"
                ),
            }
        }
        results
    }

    /// Lint `ir`, fixing it in place when a fixer is configured.
    ///
    /// Without a fixer this is exactly one rule pass. With one, passes
    /// repeat while the fixer keeps applying fixes, up to the iteration
    /// cap. Results of intermediate passes are kept only for fixes that
    /// were applied; the final pass contributes everything it found. This
    /// never fails: rule or fixer errors and non-convergence are logged.
    pub fn apply(
        &self,
        ir: &mut IntermediateRepresentation,
        file: &Path,
        locale: Option<&str>,
    ) -> Vec<Diagnostic> {
        let Some(fixer) = &self.fixer else {
            return self.run_rules(ir, file, locale);
        };

        let mut accumulated = Vec::new();
        for iteration in 0..self.max_autofix_iterations {
            let mut results = self.run_rules(ir, file, locale);

            let fixable: Vec<usize> = results
                .iter()
                .enumerate()
                .filter(|(_, r)| r.has_fix())
                .map(|(i, _)| i)
                .collect();
            if fixable.is_empty() {
                accumulated.extend(results);
                return accumulated;
            }

            let mut fixes: Vec<Fix> = fixable
                .iter()
                .filter_map(|&i| results[i].fix.take())
                .collect();
            let outcome = fixer.apply_fixes(ir, &mut fixes);
            for (&i, fix) in fixable.iter().zip(fixes) {
                results[i].fix = Some(fix);
            }

            if let Err(err) = outcome {
                error!(file = %file.display(), iteration, "fixer failed: {err:#}");
                accumulated.extend(results);
                return accumulated;
            }

            if !results.iter().any(Diagnostic::fix_applied) {
                trace!(file = %file.display(), iteration, "fixer applied nothing");
                accumulated.extend(results);
                return accumulated;
            }

            let applied = results.into_iter().filter(Diagnostic::fix_applied);
            let before = accumulated.len();
            accumulated.extend(applied);
            debug!(
                file = %file.display(),
                iteration,
                applied = accumulated.len() - before,
                "applied fixes"
            );
            ir.set_dirty(true);
        }

        error!(
            file = %file.display(),
            max = self.max_autofix_iterations,
            "autofix did not converge; giving up"
        );
        accumulated
    }
}
