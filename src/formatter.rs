//! Result formatters and the end-of-run summary table.

use std::time::Duration;

use serde::Serialize;

use crate::config::FormatterDefinition;
use crate::diagnostics::Diagnostic;
use crate::level::Severity;
use crate::stats::{FileStats, ResultStats};

/// Everything a formatter may want to know about a finished run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<&'a str>,
    pub file_stats: FileStats,
    pub result_stats: ResultStats,
    pub results: &'a [Diagnostic],
    pub score: f64,
    #[serde(rename = "time", serialize_with = "seconds")]
    pub elapsed: Duration,
    pub errors_only: bool,
}

fn seconds<S: serde::Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_f64(d.as_secs_f64())
}

/// Renders findings for people or machines.
pub trait Formatter: Send + Sync {
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    /// Render one finding; `None` suppresses it.
    fn format(&self, result: &Diagnostic) -> Option<String>;

    /// Render a whole run at once. Formatters that return `Some` here
    /// replace the per-result output and the summary table.
    fn format_output(&self, _summary: &RunSummary<'_>) -> Option<String> {
        None
    }
}

pub const ANSI_CONSOLE_FORMATTER: &str = "ansi-console-formatter";
pub const JSON_FORMATTER: &str = "json-formatter";

const HIGHLIGHT_START: &str = "<e0>";
const HIGHLIGHT_END: &str = "</e0>";

/// Multi-line console output with the highlighted excerpt in color.
#[derive(Debug, Default)]
pub struct AnsiConsoleFormatter;

impl AnsiConsoleFormatter {
    fn severity_color(severity: Severity) -> &'static str {
        match severity {
            Severity::Error => "\x1b[91m",
            Severity::Warning => "\x1b[33m",
            Severity::Suggestion => "\x1b[36m",
        }
    }
}

impl Formatter for AnsiConsoleFormatter {
    fn name(&self) -> &str {
        ANSI_CONSOLE_FORMATTER
    }

    fn description(&self) -> &str {
        "Formats results for a terminal, with ANSI colors"
    }

    fn format(&self, result: &Diagnostic) -> Option<String> {
        let color = Self::severity_color(result.severity);
        let mut out = result.path_name.clone();
        if let Some(line) = result.line_number {
            out.push_str(&format!("({line})"));
        }
        out.push_str(":\n");
        out.push_str(&format!("  {color}{}\x1b[0m\n", result.description));
        if !result.highlight.is_empty() {
            let highlight = result
                .highlight
                .replace(HIGHLIGHT_START, color)
                .replace(HIGHLIGHT_END, "\x1b[0m");
            out.push_str(&format!("  {highlight}\n"));
        }
        if result.fix_applied() {
            out.push_str("  Auto-fix applied\n");
        }
        out.push_str(&format!("  Rule ({})", result.rule));
        if let Some(link) = &result.link {
            out.push_str(&format!("\n  More info: {link}"));
        }
        Some(out)
    }
}

/// One JSON document for the whole run.
#[derive(Debug, Default)]
pub struct JsonFormatter;

impl Formatter for JsonFormatter {
    fn name(&self) -> &str {
        JSON_FORMATTER
    }

    fn description(&self) -> &str {
        "Formats the whole run as a single JSON document"
    }

    fn format(&self, result: &Diagnostic) -> Option<String> {
        serde_json::to_string(result).ok()
    }

    fn format_output(&self, summary: &RunSummary<'_>) -> Option<String> {
        if summary.errors_only {
            let errors: Vec<Diagnostic> = summary
                .results
                .iter()
                .filter(|r| r.severity == Severity::Error)
                .cloned()
                .collect();
            let filtered = RunSummary {
                results: &errors,
                ..summary.clone()
            };
            return serde_json::to_string_pretty(&filtered).ok();
        }
        serde_json::to_string_pretty(summary).ok()
    }
}

/// Formatter defined in configuration by a `{field}` template.
#[derive(Debug, Clone)]
pub struct TemplateFormatter {
    name: String,
    description: String,
    template: String,
    highlight_start: String,
    highlight_end: String,
}

impl TemplateFormatter {
    pub fn new(def: &FormatterDefinition) -> Self {
        Self {
            name: def.name.clone(),
            description: def
                .description
                .clone()
                .unwrap_or_else(|| format!("Formats results using the template of {}", def.name)),
            template: def.template.clone(),
            highlight_start: def.highlight_start.clone().unwrap_or_default(),
            highlight_end: def.highlight_end.clone().unwrap_or_default(),
        }
    }
}

impl Formatter for TemplateFormatter {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn format(&self, result: &Diagnostic) -> Option<String> {
        let highlight = result
            .highlight
            .replace(HIGHLIGHT_START, &self.highlight_start)
            .replace(HIGHLIGHT_END, &self.highlight_end);
        let opt = |v: &Option<String>| v.clone().unwrap_or_default();
        let out = self
            .template
            .replace("{pathName}", &result.path_name)
            .replace(
                "{lineNumber}",
                &result.line_number.map(|l| l.to_string()).unwrap_or_default(),
            )
            .replace("{severity}", result.severity.as_str())
            .replace("{description}", &result.description)
            .replace("{highlight}", &highlight)
            .replace("{ruleName}", &result.rule)
            .replace("{source}", &opt(&result.source))
            .replace("{locale}", &opt(&result.locale))
            .replace("{link}", &opt(&result.link));
        Some(out)
    }
}

/// Up to two fraction digits, trailing zeros trimmed.
pub fn format_number(n: f64) -> String {
    let s = format!("{n:.2}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s.is_empty() || s == "-" {
        "0".to_string()
    } else {
        s.to_string()
    }
}

/// Summary table printed after per-result output.
pub fn summary_lines(summary: &RunSummary<'_>) -> Vec<String> {
    let files = summary.file_stats;
    let stats = summary.result_stats;
    let col = |s: String| format!("{s:<15}");

    let mut lines = vec![
        format!("Total Elapse Time: {} seconds", summary.elapsed.as_secs_f64()),
        format!(
            "{:29}{}{}{}",
            "",
            col("Average over".into()),
            col("Average over".into()),
            col("Average over".into())
        ),
        format!(
            "{:19}{:10}{}{}{}",
            "",
            "Total",
            col(format!("{} Files", files.files)),
            col(format!("{} Modules", files.modules)),
            col(format!("{} Lines", files.lines))
        ),
    ];

    if !summary.results.is_empty() {
        let per = |count: u64, base: u64| format_number(count as f64 / base.max(1) as f64);
        let mut row = |label: &str, count: u64| {
            lines.push(format!(
                "{:19}{:<10}{}{}{}",
                label,
                count,
                col(per(count, files.files)),
                col(per(count, files.modules)),
                col(per(count, files.lines))
            ));
        };
        row("Errors:", stats.errors);
        if !summary.errors_only {
            row("Warnings:", stats.warnings);
            row("Suggestions:", stats.suggestions);
        }
    }

    lines.push(format!("I18N Score (0-100) {}", format_number(summary.score)));
    lines.into_iter().map(|l| l.trim_end().to_string()).collect()
}
