//! Projects: a root directory, its configuration, and everything found
//! beneath it.
//!
//! A directory containing its own configuration file becomes a nested
//! project. Nested projects share the parent's [`PluginManager`] but resolve
//! their own globs and file types.

use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use globset::{Glob, GlobBuilder, GlobMatcher, GlobSet, GlobSetBuilder};
use itertools::Itertools;
use tracing::{debug, error, info, trace, warn};
use walkdir::WalkDir;

use crate::config::{self, LintConfig, PathMapping};
use crate::diagnostics::{Diagnostic, line_order};
use crate::error::{LintError, LintResult};
use crate::filetype::{FileType, UNKNOWN_FILE_TYPE};
use crate::formatter::{ANSI_CONSOLE_FORMATTER, Formatter, RunSummary, summary_lines};
use crate::level::Severity;
use crate::lintable::{LintSettings, LintableFile};
use crate::plugin::PluginManager;
use crate::stats::{FileStats, ResultStats, score};
use crate::strategy::DEFAULT_MAX_AUTOFIX_ITERATIONS;

/// Options for a run, mostly from the command line. Nested projects inherit
/// them from their parent.
#[derive(Debug, Clone)]
pub struct ProjectOptions {
    /// Explicit configuration file for the root project.
    pub config_path: Option<PathBuf>,
    pub name: Option<String>,
    pub formatter: String,
    pub source_locale: Option<String>,
    pub locales: Option<Vec<String>>,
    pub autofix: bool,
    pub max_autofix_iterations: Option<usize>,
    pub errors_only: bool,
    pub max_errors: u64,
    pub max_warnings: u64,
    pub max_suggestions: Option<u64>,
    pub min_score: Option<f64>,
    pub write: bool,
    pub overwrite: bool,
    pub output: Option<PathBuf>,
    pub progress_info: bool,
    pub quiet: bool,
}

impl Default for ProjectOptions {
    fn default() -> Self {
        Self {
            config_path: None,
            name: None,
            formatter: ANSI_CONSOLE_FORMATTER.to_string(),
            source_locale: None,
            locales: None,
            autofix: false,
            max_autofix_iterations: None,
            errors_only: false,
            max_errors: 0,
            max_warnings: 0,
            max_suggestions: None,
            min_score: None,
            write: false,
            overwrite: false,
            output: None,
            progress_info: false,
            quiet: false,
        }
    }
}

/// Process exit status of a run, ordered by severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ExitStatus {
    Success = 0,
    Warning = 1,
    Error = 2,
}

impl ExitStatus {
    pub fn code(self) -> u8 {
        self as u8
    }
}

/// Initialisation state; see [`Project::load_plugins`] and
/// [`Project::resolve_config`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectPhase {
    Created,
    PluginsLoaded,
    Resolved,
}

/// A traversable unit of the discovery tree.
#[derive(Debug)]
pub enum DirItem {
    File(LintableFile),
    Project(Box<Project>),
}

/// One `paths` entry, compiled.
struct PathRule {
    glob: String,
    matcher: GlobMatcher,
    file_type: String,
    excludes: Option<GlobSet>,
    template: Option<String>,
    /// No wildcards: names exactly one path.
    literal: bool,
}

/// Outcome of [`Project::run`].
#[derive(Debug)]
pub struct RunReport {
    pub results: Vec<Diagnostic>,
    pub result_stats: ResultStats,
    pub file_stats: FileStats,
    pub score: f64,
    pub status: ExitStatus,
    /// Formatted output; already written out when an output file was given.
    pub output: String,
}

pub struct Project {
    root: PathBuf,
    name: Option<String>,
    config: LintConfig,
    options: ProjectOptions,
    plugins: Arc<PluginManager>,
    settings: Arc<LintSettings>,
    phase: ProjectPhase,
    file_types: BTreeMap<String, Arc<FileType>>,
    mappings: Vec<PathRule>,
    excludes: Option<GlobSet>,
    formatter: Option<Arc<dyn Formatter>>,
    items: Vec<DirItem>,
    file_stats: Option<FileStats>,
    result_stats: ResultStats,
}

fn compile_glob(glob: &str) -> LintResult<Glob> {
    GlobBuilder::new(glob)
        .literal_separator(true)
        .build()
        .map_err(|err| LintError::config(format!("invalid glob {glob}: {err}")))
}

fn compile_set(globs: &[String]) -> LintResult<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for glob in globs {
        builder.add(compile_glob(glob)?);
    }
    builder
        .build()
        .map_err(|err| LintError::config(format!("invalid exclude list: {err}")))
}

fn is_literal(glob: &str) -> bool {
    !glob.contains(['*', '?', '[', '{'])
}

/// `path` relative to `root` with `/` separators; `path` itself when it is
/// not under `root`.
fn relative_to(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .join("/")
}

impl Project {
    /// A project over `root` using an already loaded configuration.
    pub fn new(
        root: impl Into<PathBuf>,
        config: LintConfig,
        options: ProjectOptions,
        plugins: Arc<PluginManager>,
    ) -> Self {
        let source_locale = config
            .source_locale
            .clone()
            .or_else(|| options.source_locale.clone())
            .unwrap_or_else(|| "en-US".to_string());
        let settings = LintSettings {
            source_locale,
            autofix: options.autofix || config.autofix == Some(true),
            max_autofix_iterations: options
                .max_autofix_iterations
                .or(config.max_autofix_iterations)
                .unwrap_or(DEFAULT_MAX_AUTOFIX_ITERATIONS),
        };
        Self {
            root: root.into(),
            name: config.name.clone(),
            config,
            options,
            plugins,
            settings: Arc::new(settings),
            phase: ProjectPhase::Created,
            file_types: BTreeMap::new(),
            mappings: Vec::new(),
            excludes: None,
            formatter: None,
            items: Vec::new(),
            file_stats: None,
            result_stats: ResultStats::default(),
        }
    }

    /// A project over `root`, reading its configuration from the explicit
    /// path in `options` or from `root`. Without a configuration file an
    /// empty one is used.
    pub fn open(
        root: impl Into<PathBuf>,
        options: ProjectOptions,
        plugins: Arc<PluginManager>,
    ) -> Result<Self> {
        let root = root.into();
        let config = match config::load_config(options.config_path.as_deref(), &root)? {
            Some((path, cfg)) => {
                debug!(config = %path.display(), "loaded configuration");
                cfg
            }
            None => {
                debug!(root = %root.display(), "no configuration file; using defaults");
                LintConfig::default()
            }
        };
        Ok(Self::new(root, config, options, plugins))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn phase(&self) -> ProjectPhase {
        self.phase
    }

    pub fn config(&self) -> &LintConfig {
        &self.config
    }

    pub fn options(&self) -> &ProjectOptions {
        &self.options
    }

    pub fn plugins(&self) -> &Arc<PluginManager> {
        &self.plugins
    }

    pub fn settings(&self) -> &LintSettings {
        &self.settings
    }

    /// Requested locales: the command line's, else the configuration's.
    pub fn locales(&self) -> Vec<String> {
        self.options
            .locales
            .clone()
            .or_else(|| self.config.locales.clone())
            .unwrap_or_default()
    }

    fn registrant(&self) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| format!("project {}", self.root.display()))
    }

    /// Both initialisation phases.
    pub fn init(&mut self) -> LintResult<()> {
        self.load_plugins()?;
        self.resolve_config()
    }

    /// Phase one: load every plugin the configuration names. Must succeed
    /// before [`resolve_config`](Self::resolve_config), since plugins supply
    /// the components the configuration refers to.
    pub fn load_plugins(&mut self) -> LintResult<()> {
        if self.phase != ProjectPhase::Created {
            return Ok(());
        }
        self.plugins.load(&self.config.plugins)?;
        for item in &mut self.items {
            if let DirItem::Project(nested) = item {
                nested.load_plugins()?;
            }
        }
        self.phase = ProjectPhase::PluginsLoaded;
        Ok(())
    }

    /// Phase two: register declared rules, rule sets, formatters and fixer
    /// options, then build file types, path mappings and the formatter.
    pub fn resolve_config(&mut self) -> LintResult<()> {
        match self.phase {
            ProjectPhase::Created => {
                return Err(LintError::config(format!(
                    "project {} resolved before its plugins were loaded",
                    self.root.display()
                )));
            }
            ProjectPhase::Resolved => return Ok(()),
            ProjectPhase::PluginsLoaded => {}
        }
        for item in &mut self.items {
            if let DirItem::Project(nested) = item {
                nested.resolve_config()?;
            }
        }

        self.register_declared()?;

        let locales = self.locales();
        let mut file_types = BTreeMap::new();
        file_types.insert(
            UNKNOWN_FILE_TYPE.to_string(),
            Arc::new(FileType::unknown(Arc::clone(&self.plugins), &locales)),
        );
        for (name, def) in self.config.filetypes.iter() {
            let file_type = FileType::new(name, def, Arc::clone(&self.plugins), &locales)?;
            file_types.insert(name.to_string(), Arc::new(file_type));
        }

        let mut mappings = Vec::new();
        if self.config.paths.is_empty() {
            mappings.push(PathRule {
                glob: "**".to_string(),
                matcher: compile_glob("**")?.compile_matcher(),
                file_type: UNKNOWN_FILE_TYPE.to_string(),
                excludes: None,
                template: None,
                literal: false,
            });
        }
        for (glob, mapping) in self.config.paths.iter() {
            let file_type = match mapping {
                PathMapping::Named(name) => {
                    if !file_types.contains_key(name) {
                        return Err(LintError::config(format!(
                            "Mapping {glob} is configured to use unknown filetype {name}"
                        )));
                    }
                    name.clone()
                }
                PathMapping::Inline(def) => {
                    let file_type =
                        FileType::new(glob, def, Arc::clone(&self.plugins), &locales)?;
                    file_types.insert(glob.to_string(), Arc::new(file_type));
                    glob.to_string()
                }
            };
            mappings.push(PathRule {
                glob: glob.to_string(),
                matcher: compile_glob(glob)?.compile_matcher(),
                file_type,
                excludes: mapping.excludes().map(compile_set).transpose()?,
                template: mapping.template().map(str::to_string),
                literal: is_literal(glob),
            });
        }

        self.excludes = self.config.excludes.as_deref().map(compile_set).transpose()?;
        self.file_types = file_types;
        self.mappings = mappings;

        let formatter_name = &self.options.formatter;
        let formatter = self
            .plugins
            .formatters()
            .get(formatter_name)
            .ok_or_else(|| LintError::unknown("formatter", formatter_name, "the options"))?;
        self.formatter = Some(formatter);

        self.phase = ProjectPhase::Resolved;
        debug!(
            root = %self.root.display(),
            filetypes = self.file_types.len(),
            mappings = self.mappings.len(),
            "resolved project configuration"
        );
        Ok(())
    }

    /// Config-declared rules and formatters, rule sets and fixer options.
    /// Names a nested project already registered are left alone.
    fn register_declared(&self) -> LintResult<()> {
        let registrant = self.registrant();
        let rules = self.plugins.rules();
        let (known, fresh): (Vec<_>, Vec<_>) = self
            .config
            .rules
            .iter()
            .cloned()
            .partition(|def| rules.contains(&def.name));
        for def in &known {
            debug!(rule = %def.name, "rule already declared; keeping the first definition");
        }
        rules.add_declarative(&registrant, &fresh)?;
        rules.add_rule_set_definitions(self.config.rulesets.iter());

        let formatters = self.plugins.formatters();
        let fresh: Vec<_> = self
            .config
            .formatters
            .iter()
            .filter(|def| {
                let known = formatters.contains(&def.name);
                if known {
                    debug!(formatter = %def.name, "formatter already declared; keeping the first definition");
                }
                !known
            })
            .cloned()
            .collect();
        formatters.add_declarative(&registrant, &fresh)?;

        for (ir_type, options) in self.config.fixers.iter() {
            self.plugins.fixers().configure(ir_type, options.clone());
        }
        Ok(())
    }

    fn ensure_resolved(&self) -> LintResult<()> {
        if self.phase == ProjectPhase::Resolved {
            Ok(())
        } else {
            Err(LintError::config(format!(
                "project {} used before initialisation",
                self.root.display()
            )))
        }
    }

    /// File type for a path relative to this project's root: the first
    /// matching path mapping decides, else `unknown`.
    pub fn file_type_for_path(&self, relative: &str) -> Arc<FileType> {
        let relative = relative.replace('\\', "/");
        self.mappings
            .iter()
            .find(|rule| rule.matcher.is_match(&relative))
            .and_then(|rule| self.file_types.get(&rule.file_type))
            .or_else(|| self.file_types.get(UNKNOWN_FILE_TYPE))
            .cloned()
            .unwrap_or_else(|| {
                Arc::new(FileType::unknown(Arc::clone(&self.plugins), &self.locales()))
            })
    }

    pub fn file_type(&self, name: &str) -> Option<&Arc<FileType>> {
        self.file_types.get(name)
    }

    /// Walk each path, collecting files and nested projects.
    pub fn scan(&mut self, paths: &[PathBuf]) -> LintResult<()> {
        self.ensure_resolved()?;
        for path in paths {
            self.walk(path)?;
        }
        Ok(())
    }

    fn is_excluded_dir(&self, relative: &str) -> bool {
        let Some(excludes) = &self.excludes else {
            return false;
        };
        if !excludes.is_match(relative) {
            return false;
        }
        let prefix = format!("{relative}/");
        !self
            .mappings
            .iter()
            .any(|rule| rule.literal && rule.glob.starts_with(&prefix))
    }

    /// The path mapping that includes `relative`, honouring excludes.
    fn including_rule(&self, relative: &str) -> Option<&PathRule> {
        let rule = self
            .mappings
            .iter()
            .find(|rule| rule.matcher.is_match(relative))?;
        let excluded = match (&rule.excludes, rule.literal) {
            (Some(excludes), _) => excludes.is_match(relative),
            (None, true) => false,
            (None, false) => self
                .excludes
                .as_ref()
                .is_some_and(|excludes| excludes.is_match(relative)),
        };
        (!excluded).then_some(rule)
    }

    fn walk(&mut self, path: &Path) -> LintResult<()> {
        if !path.exists() {
            warn!(path = %path.display(), "path does not exist");
            return Ok(());
        }
        let mut entries = WalkDir::new(path).sort_by_file_name().into_iter();
        while let Some(entry) = entries.next() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    error!(%err, "could not read directory entry");
                    continue;
                }
            };
            let relative = relative_to(&self.root, entry.path());

            if entry.file_type().is_dir() {
                if !relative.is_empty() && self.is_excluded_dir(&relative) {
                    trace!(dir = %relative, "excluded");
                    entries.skip_current_dir();
                } else if entry.path() != self.root
                    && config::find_config_in_dir(entry.path()).is_some()
                {
                    entries.skip_current_dir();
                    self.add_nested(entry.path())?;
                }
            } else if entry.file_type().is_file() {
                self.add_file(entry.path(), relative);
            }
        }
        Ok(())
    }

    fn add_file(&mut self, path: &Path, relative: String) {
        let Some(rule) = self.including_rule(&relative) else {
            trace!(file = %relative, "excluded");
            return;
        };
        trace!(file = %relative, glob = %rule.glob, "included");
        let file_type = self
            .file_types
            .get(&rule.file_type)
            .cloned()
            .unwrap_or_else(|| self.file_type_for_path(&relative));
        let template = rule.template.clone();
        self.items.push(DirItem::File(LintableFile::new(
            path,
            relative,
            file_type,
            template,
            Arc::clone(&self.settings),
            Arc::clone(&self.plugins),
        )));
    }

    fn add_nested(&mut self, dir: &Path) -> LintResult<()> {
        let options = ProjectOptions {
            config_path: None,
            ..self.options.clone()
        };
        let mut nested = Project::open(dir, options, Arc::clone(&self.plugins))?;
        debug!(root = %dir.display(), name = ?nested.name(), "found nested project");
        nested.init()?;
        nested.scan(&[dir.to_path_buf()])?;
        self.items.push(DirItem::Project(Box::new(nested)));
        Ok(())
    }

    pub fn items(&self) -> &[DirItem] {
        &self.items
    }

    /// Every lintable file, including those of nested projects.
    pub fn files(&self) -> Vec<&LintableFile> {
        let mut files = Vec::new();
        for item in &self.items {
            match item {
                DirItem::File(file) => files.push(file),
                DirItem::Project(nested) => files.extend(nested.files()),
            }
        }
        files
    }

    pub fn files_mut(&mut self) -> Vec<&mut LintableFile> {
        let mut files = Vec::new();
        for item in &mut self.items {
            match item {
                DirItem::File(file) => files.push(file),
                DirItem::Project(nested) => files.extend(nested.files_mut()),
            }
        }
        files
    }

    /// Lint every file. A file that fails is logged and left out; the run
    /// goes on.
    pub fn find_issues(&mut self, locales: &[String]) -> Vec<Diagnostic> {
        let progress = self.options.progress_info && !self.options.quiet;
        let mut total = FileStats::default();
        let mut results = Vec::new();
        for file in self.files_mut() {
            if progress {
                info!(file = %file.path().display(), "finding issues");
            }
            match file.find_issues(locales) {
                Ok(found) => {
                    total.add(&file.stats());
                    results.extend(found);
                }
                Err(err) => error!(file = %file.path().display(), "could not lint file: {err:#}"),
            }
        }
        self.file_stats = Some(total);
        results
    }

    pub fn apply_transformers(&mut self, results: &[Diagnostic]) {
        for file in self.files_mut() {
            file.apply_transformers(results);
        }
    }

    /// Write modified files when writing is enabled, to `<path>.modified`
    /// unless overwriting. Failures are logged per file.
    pub fn serialize(&self) {
        if !self.options.write {
            return;
        }
        for file in self.files() {
            if let Err(err) = self.serialize_file(file) {
                error!(file = %file.path().display(), "could not write file: {err:#}");
            }
        }
    }

    fn serialize_file(&self, file: &LintableFile) -> Result<()> {
        let Some(mut source) = file.serialize()? else {
            return Ok(());
        };
        if !self.options.overwrite {
            let target = format!("{}.modified", source.path().display());
            source = source.relocated(target);
        }
        if source.write()? {
            debug!(file = %source.path().display(), "wrote modified file");
        }
        Ok(())
    }

    pub fn file_stats(&self) -> Option<&FileStats> {
        self.file_stats.as_ref()
    }

    pub fn result_stats(&self) -> &ResultStats {
        &self.result_stats
    }

    /// Localization readiness score, 0 to 100. Only meaningful once issues
    /// have been found.
    pub fn score(&self) -> LintResult<f64> {
        let files = self
            .file_stats
            .as_ref()
            .ok_or_else(|| LintError::other("cannot compute a score before finding issues"))?;
        Ok(score(&self.result_stats, files))
    }

    pub fn exit_status(&self) -> ExitStatus {
        let stats = &self.result_stats;
        if stats.errors > self.options.max_errors {
            return ExitStatus::Error;
        }
        if let Some(min) = self.options.min_score
            && self.score().is_ok_and(|s| s < min)
        {
            return ExitStatus::Error;
        }
        if !self.options.errors_only {
            if stats.warnings > self.options.max_warnings {
                return ExitStatus::Warning;
            }
            if self
                .options
                .max_suggestions
                .is_some_and(|max| stats.suggestions > max)
            {
                return ExitStatus::Warning;
            }
        }
        ExitStatus::Success
    }

    /// Lint, transform, write and report.
    pub fn run(&mut self) -> Result<RunReport> {
        self.ensure_resolved()?;
        let formatter = self
            .formatter
            .clone()
            .context("project has no formatter")?;

        let start = Instant::now();
        let locales = self.locales();
        let mut results = self.find_issues(&locales);
        self.apply_transformers(&results);
        self.serialize();
        let elapsed = start.elapsed();

        results.sort_by(line_order);
        self.result_stats = ResultStats::from_results(&results);
        let score = self.score()?;
        let file_stats = self.file_stats.unwrap_or_default();

        let summary = RunSummary {
            name: self.options.name.as_deref().or(self.name.as_deref()),
            file_stats,
            result_stats: self.result_stats,
            results: &results,
            score,
            elapsed,
            errors_only: self.options.errors_only,
        };
        let output = match formatter.format_output(&summary) {
            Some(whole) => whole,
            None => {
                let errors_only = self.options.errors_only;
                results
                    .iter()
                    .filter(|r| !errors_only || r.severity == Severity::Error)
                    .filter_map(|r| formatter.format(r))
                    .chain(summary_lines(&summary))
                    .join("\n")
            }
        };

        if let Some(path) = &self.options.output {
            if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
                std::fs::create_dir_all(dir)
                    .with_context(|| format!("failed to create {}", dir.display()))?;
            }
            std::fs::write(path, &output)
                .with_context(|| format!("failed to write {}", path.display()))?;
            if self.options.progress_info && !self.options.quiet {
                info!(output = %path.display(), "wrote results");
            }
        }

        let status = self.exit_status();
        Ok(RunReport {
            result_stats: self.result_stats,
            file_stats,
            score,
            status,
            output,
            results,
        })
    }
}

impl std::fmt::Debug for Project {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Project")
            .field("root", &self.root)
            .field("name", &self.name)
            .field("phase", &self.phase)
            .field("file_types", &self.file_types.keys().collect::<Vec<_>>())
            .field("items", &self.items.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugin::PluginCatalog;

    fn plugins() -> Arc<PluginManager> {
        Arc::new(PluginManager::with_builtins(PluginCatalog::new()).unwrap())
    }

    #[test]
    fn relative_paths_use_forward_slashes() {
        assert_eq!(relative_to(Path::new("."), Path::new("./a/b.json")), "a/b.json");
        assert_eq!(relative_to(Path::new("/p"), Path::new("/p/x/y")), "x/y");
        assert_eq!(relative_to(Path::new("/p"), Path::new("/p")), "");
    }

    #[test]
    fn literal_globs_have_no_wildcards() {
        assert!(is_literal("config.json"));
        assert!(is_literal("src/res/strings.xml"));
        assert!(!is_literal("**/*.json"));
        assert!(!is_literal("src/{a,b}.js"));
    }

    #[test]
    fn resolve_before_loading_plugins_fails() {
        let mut project = Project::new(".", LintConfig::default(), ProjectOptions::default(), plugins());
        assert!(project.resolve_config().is_err());
        project.init().unwrap();
        assert_eq!(project.phase(), ProjectPhase::Resolved);
    }

    #[test]
    fn unknown_formatter_is_fatal() {
        let options = ProjectOptions {
            formatter: "no-such-formatter".to_string(),
            ..ProjectOptions::default()
        };
        let mut project = Project::new(".", LintConfig::default(), options, plugins());
        let err = project.init().unwrap_err();
        assert!(err.to_string().contains("no-such-formatter"));
    }

    #[test]
    fn mapping_to_missing_filetype_is_fatal() {
        let config: LintConfig = toml::from_str("[paths]\n\"**/*.js\" = \"javascript\"\n").unwrap();
        let mut project = Project::new(".", config, ProjectOptions::default(), plugins());
        let err = project.init().unwrap_err();
        assert!(err.to_string().contains("unknown filetype javascript"));
    }

    #[test]
    fn first_matching_mapping_wins() {
        let config: LintConfig = toml::from_str(
            r#"
            [filetypes.json]
            parsers = ["string"]

            [paths]
            "res/**/*.json" = "json"
            "**/*.json" = { parsers = ["line"] }
            "#,
        )
        .unwrap();
        let mut project = Project::new(".", config, ProjectOptions::default(), plugins());
        project.init().unwrap();

        assert_eq!(project.file_type_for_path("res/de/a.json").name(), "json");
        assert_eq!(project.file_type_for_path("b.json").name(), "**/*.json");
        assert_eq!(project.file_type_for_path("b.json").ir_type(), "line");
        assert_eq!(project.file_type_for_path("a.txt").name(), UNKNOWN_FILE_TYPE);
    }

    #[test]
    fn score_needs_issues_first() {
        let mut project = Project::new(".", LintConfig::default(), ProjectOptions::default(), plugins());
        project.init().unwrap();
        assert!(project.score().is_err());
        assert_eq!(project.exit_status(), ExitStatus::Success);
    }
}
