use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, error, trace, warn};

use crate::diagnostics::Diagnostic;
use crate::filetype::FileType;
use crate::ir::IntermediateRepresentation;
use crate::locale_path::locale_from_path;
use crate::plugin::PluginManager;
use crate::rule::Rule;
use crate::source_file::SourceFile;
use crate::stats::FileStats;
use crate::strategy::{DEFAULT_MAX_AUTOFIX_ITERATIONS, LintingStrategy};

/// Settings shared by every file of a project.
#[derive(Debug, Clone)]
pub struct LintSettings {
    pub source_locale: String,
    pub autofix: bool,
    pub max_autofix_iterations: usize,
}

impl Default for LintSettings {
    fn default() -> Self {
        Self {
            source_locale: "en-US".to_string(),
            autofix: false,
            max_autofix_iterations: DEFAULT_MAX_AUTOFIX_ITERATIONS,
        }
    }
}

/// One file on disk bound to a file type, plus its current IRs.
pub struct LintableFile {
    path: PathBuf,
    /// Path relative to the owning project's root, with `/` separators.
    relative_path: String,
    file_type: Arc<FileType>,
    template: Option<String>,
    settings: Arc<LintSettings>,
    plugins: Arc<PluginManager>,
    irs: Vec<IntermediateRepresentation>,
}

impl LintableFile {
    pub fn new(
        path: impl Into<PathBuf>,
        relative_path: impl Into<String>,
        file_type: Arc<FileType>,
        template: Option<String>,
        settings: Arc<LintSettings>,
        plugins: Arc<PluginManager>,
    ) -> Self {
        Self {
            path: path.into(),
            relative_path: relative_path.into(),
            file_type,
            template,
            settings,
            plugins,
            irs: Vec::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn relative_path(&self) -> &str {
        &self.relative_path
    }

    pub fn file_type(&self) -> &Arc<FileType> {
        &self.file_type
    }

    pub fn irs(&self) -> &[IntermediateRepresentation] {
        &self.irs
    }

    /// Size statistics summed over the current IRs. A file that was never
    /// parsed, or was skipped by the locale filter, counts for nothing.
    pub fn stats(&self) -> FileStats {
        let mut total = FileStats::default();
        for stats in self.irs.iter().filter_map(IntermediateRepresentation::stats) {
            total.add(stats);
        }
        total
    }

    pub fn is_dirty(&self) -> bool {
        self.irs.iter().any(IntermediateRepresentation::is_dirty)
    }

    /// Locale encoded in the path, per the path-mapping template or the file
    /// type's template.
    pub fn path_locale(&self) -> Option<String> {
        let template = self.template.as_deref().or(self.file_type.template())?;
        locale_from_path(template, &self.relative_path)
    }

    /// Replace the IRs with whatever the applicable parsers produce. A
    /// failing parser is logged and skipped.
    pub fn parse(&mut self) {
        let extension = self.path.extension().and_then(|e| e.to_str());
        let parsers = self.file_type.parsers_for(extension);
        self.irs.clear();

        if parsers.is_empty() {
            debug!(file = %self.path.display(), "no parser available");
            return;
        }

        let source = SourceFile::new(&self.path);
        let mut failures = 0;
        for parser in &parsers {
            match parser.parse(&source) {
                Ok(irs) => {
                    trace!(file = %self.path.display(), parser = parser.name(), count = irs.len(), "parsed");
                    self.irs.extend(irs);
                }
                Err(err) => {
                    failures += 1;
                    warn!(file = %self.path.display(), parser = parser.name(), "parser failed: {err:#}");
                }
            }
        }
        if failures == parsers.len() {
            error!(file = %self.path.display(), "every applicable parser failed; file not linted");
        }
    }

    /// Parse and lint this file.
    ///
    /// Returns nothing when the path names a locale outside `locales` (an
    /// empty list means no restriction). The fixer is only offered while
    /// the file is still clean, so one IR's fixes are never mixed with
    /// another's in a single pass.
    pub fn find_issues(&mut self, locales: &[String]) -> Result<Vec<Diagnostic>> {
        let path_locale = self.path_locale();
        if let Some(locale) = &path_locale
            && !locales.is_empty()
            && !locales.contains(locale)
        {
            debug!(file = %self.path.display(), %locale, "locale not requested; skipping");
            return Ok(Vec::new());
        }
        let locale = path_locale.unwrap_or_else(|| self.settings.source_locale.clone());

        self.parse();

        let rules = self.file_type.rules();
        let mut results = Vec::new();
        for idx in 0..self.irs.len() {
            let ir_type = self.irs[idx].ir_type().to_string();
            let applicable: Vec<Arc<dyn Rule>> = rules
                .iter()
                .filter(|r| r.rule_type() == ir_type)
                .cloned()
                .collect();
            let fixer = if self.settings.autofix && !self.is_dirty() {
                self.plugins.fixers().get(&ir_type, None).unwrap_or_else(|err| {
                    error!(file = %self.path.display(), %err, "could not create fixer");
                    None
                })
            } else {
                None
            };

            let strategy = LintingStrategy::new(&ir_type, applicable, fixer)
                .with_context(|| format!("cannot lint {}", self.path.display()))?
                .with_max_autofix_iterations(self.settings.max_autofix_iterations);
            results.extend(strategy.apply(&mut self.irs[idx], &self.path, Some(&locale)));
        }
        Ok(results)
    }

    /// Give each matching transformer a chance to replace an IR.
    pub fn apply_transformers(&mut self, results: &[Diagnostic]) {
        let file_type = Arc::clone(&self.file_type);
        for ir in &mut self.irs {
            for transformer in file_type.transformers() {
                if transformer.ir_type() != ir.ir_type() {
                    continue;
                }
                match transformer.transform(ir, results) {
                    Ok(Some(mut replacement)) => {
                        replacement.set_dirty(replacement.is_dirty() || ir.is_dirty());
                        *ir = replacement;
                    }
                    Ok(None) => {}
                    Err(err) => error!(
                        file = %self.path.display(),
                        transformer = transformer.name(),
                        "transformer failed: {err:#}"
                    ),
                }
            }
        }
    }

    /// New file content for a dirty file, from the file type's serializer or
    /// the default serializer for the IR type. `None` when clean or when no
    /// serializer applies.
    pub fn serialize(&self) -> Result<Option<SourceFile>> {
        if !self.is_dirty() {
            return Ok(None);
        }
        let file = match self.file_type.serializer() {
            Some(serializer) => serializer.serialize(&self.irs)?,
            None => {
                let Some(serializer) = self
                    .plugins
                    .serializers()
                    .default_for_type(self.file_type.ir_type())
                else {
                    warn!(file = %self.path.display(), "no serializer for modified file");
                    return Ok(None);
                };
                serializer.serialize(&self.irs)?
            }
        };
        Ok(Some(file))
    }
}

impl std::fmt::Debug for LintableFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LintableFile")
            .field("path", &self.path)
            .field("file_type", &self.file_type.name())
            .field("irs", &self.irs.len())
            .finish_non_exhaustive()
    }
}
