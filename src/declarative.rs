//! Rules defined entirely in configuration.
//!
//! The `source-checker` kind runs a list of regular expressions over the
//! text of a file and reports every match:
//!
//! ```toml
//! [[rules]]
//! type = "source-checker"
//! name = "no-hardcoded-quotes"
//! description = "Use typographic quotes in user-visible text"
//! note = "Found ASCII quote in {matchString}"
//! regexps = ['"[^"]+"']
//! severity = "warning"
//! fixes = [{ search = '"([^"]+)"', replace = '“$1”' }]
//! ```

use std::sync::Arc;

use anyhow::Context;
use regex::Regex;
use serde::Deserialize;

use crate::builtin::STRING_IR;
use crate::config::DeclarativeRuleDefinition;
use crate::diagnostics::Diagnostic;
use crate::fix::TextEdit;
use crate::fixer::StringFix;
use crate::level::Severity;
use crate::rule::{DeclarativeRuleKind, MatchParams, Rule};

pub const SOURCE_CHECKER: &str = "source-checker";

#[derive(Debug, Deserialize)]
struct SourceCheckerOptions {
    description: String,
    note: String,
    regexps: Vec<String>,
    #[serde(default)]
    severity: Option<String>,
    #[serde(default)]
    link: Option<String>,
    #[serde(default)]
    fixes: Vec<FixOptions>,
}

#[derive(Debug, Deserialize)]
struct FixOptions {
    search: String,
    replace: String,
}

/// Regex-driven rule over `string` representations.
#[derive(Debug)]
pub struct SourceChecker {
    name: String,
    description: String,
    note: String,
    regexps: Vec<Regex>,
    severity: Severity,
    link: Option<String>,
    fixes: Vec<(Regex, String)>,
}

impl SourceChecker {
    pub fn from_definition(def: &DeclarativeRuleDefinition) -> anyhow::Result<Self> {
        let opts: SourceCheckerOptions =
            serde_json::from_value(serde_json::Value::Object(def.options.clone()))
                .with_context(|| format!("invalid definition for rule {}", def.name))?;

        let compile = |pattern: &str| {
            Regex::new(pattern).with_context(|| format!("bad regular expression {pattern:?}"))
        };
        let regexps = opts
            .regexps
            .iter()
            .map(|p| compile(p))
            .collect::<anyhow::Result<Vec<_>>>()?;
        anyhow::ensure!(!regexps.is_empty(), "rule {} has no regexps", def.name);
        let fixes = opts
            .fixes
            .iter()
            .map(|f| Ok((compile(&f.search)?, f.replace.clone())))
            .collect::<anyhow::Result<Vec<_>>>()?;

        Ok(Self {
            name: def.name.clone(),
            description: opts.description,
            note: opts.note,
            regexps,
            severity: opts
                .severity
                .as_deref()
                .map(Severity::from_str_lossy)
                .unwrap_or_default(),
            link: opts.link,
            fixes,
        })
    }

    fn replacement(&self, matched: &str) -> String {
        self.fixes
            .iter()
            .fold(matched.to_string(), |text, (search, replace)| {
                search.replace_all(&text, replace.as_str()).into_owned()
            })
    }
}

/// Line number (1-based) and the full line around `start..end`, with the
/// matched part wrapped in highlight markers.
fn locate(text: &str, start: usize, end: usize) -> (usize, usize, String) {
    let line_number = text[..start].matches('\n').count() + 1;
    let line_start = text[..start].rfind('\n').map_or(0, |i| i + 1);
    let line_end = text[end..].find('\n').map_or(text.len(), |i| end + i);
    let column = text[line_start..start].chars().count() + 1;
    let highlight = format!(
        "{}<e0>{}</e0>{}",
        &text[line_start..start],
        &text[start..end],
        text[end..line_end].trim_end_matches('\r')
    );
    (line_number, column, highlight)
}

impl Rule for SourceChecker {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn rule_type(&self) -> &str {
        STRING_IR
    }

    fn link(&self) -> Option<&str> {
        self.link.as_deref()
    }

    fn check(&self, params: &MatchParams<'_>) -> anyhow::Result<Vec<Diagnostic>> {
        let Some(text) = params.ir.representation::<String>() else {
            anyhow::bail!("rule {} expects a text representation", self.name);
        };
        let path = params.file.display().to_string();

        let mut results = Vec::new();
        for re in &self.regexps {
            for m in re.find_iter(text).filter(|m| !m.as_str().is_empty()) {
                let (line, column, highlight) = locate(text, m.start(), m.end());
                let mut result = Diagnostic::new(
                    self.severity,
                    &self.name,
                    &path,
                    self.note.replace("{matchString}", m.as_str()),
                )
                .with_line(line)
                .with_char(column)
                .with_highlight(highlight)
                .with_link(self.link.clone())
                .with_locale(params.locale.map(str::to_string));

                if !self.fixes.is_empty() {
                    let replacement = self.replacement(m.as_str());
                    if replacement != m.as_str() {
                        result = result.with_fix(StringFix::fix(TextEdit::new(
                            m.start(),
                            m.end(),
                            replacement,
                        )));
                    }
                }
                results.push(result);
            }
        }
        Ok(results)
    }
}

pub fn source_checker_kind() -> DeclarativeRuleKind {
    DeclarativeRuleKind::new(SOURCE_CHECKER, |def| {
        Ok(Arc::new(SourceChecker::from_definition(def)?) as Arc<dyn Rule>)
    })
}
