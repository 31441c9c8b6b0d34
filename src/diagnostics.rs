use std::cmp::Ordering;

use serde::Serialize;

use crate::fix::Fix;
use crate::level::Severity;

/// A single finding produced by a rule.
///
/// Only the attached fix's `applied` flag changes after creation; the
/// fixer sets it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
#[must_use]
pub struct Diagnostic {
    pub severity: Severity,
    pub description: String,
    pub highlight: String,
    pub path_name: String,
    /// Name of the rule that produced this finding.
    pub rule: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_number: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub char_number: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_line_number: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_char_number: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
    #[serde(skip)]
    pub fix: Option<Fix>,
}

impl Diagnostic {
    pub fn new(
        severity: Severity,
        rule: impl Into<String>,
        path_name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            severity,
            description: description.into(),
            highlight: String::new(),
            path_name: path_name.into(),
            rule: rule.into(),
            link: None,
            id: None,
            source: None,
            line_number: None,
            char_number: None,
            end_line_number: None,
            end_char_number: None,
            locale: None,
            fix: None,
        }
    }

    pub fn with_highlight(mut self, highlight: impl Into<String>) -> Self {
        self.highlight = highlight.into();
        self
    }

    pub fn with_line(mut self, line: usize) -> Self {
        self.line_number = Some(line);
        self
    }

    pub fn with_char(mut self, char_number: usize) -> Self {
        self.char_number = Some(char_number);
        self
    }

    pub fn with_end(mut self, line: usize, char_number: usize) -> Self {
        self.end_line_number = Some(line);
        self.end_char_number = Some(char_number);
        self
    }

    pub fn with_link(mut self, link: Option<String>) -> Self {
        self.link = link;
        self
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn with_locale(mut self, locale: Option<String>) -> Self {
        self.locale = locale;
        self
    }

    pub fn with_fix(mut self, fix: Fix) -> Self {
        self.fix = Some(fix);
        self
    }

    pub fn has_fix(&self) -> bool {
        self.fix.is_some()
    }

    pub fn fix_applied(&self) -> bool {
        self.fix.as_ref().is_some_and(Fix::is_applied)
    }
}

/// Orders findings so a file can be worked through top to bottom: path,
/// then line (absent first), then character, then rule name. Use with a
/// stable sort.
pub fn line_order(a: &Diagnostic, b: &Diagnostic) -> Ordering {
    a.path_name
        .cmp(&b.path_name)
        .then_with(|| a.line_number.cmp(&b.line_number))
        .then_with(|| a.char_number.cmp(&b.char_number))
        .then_with(|| a.rule.cmp(&b.rule))
}
