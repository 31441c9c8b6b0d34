//! Plugin-extensible linting engine for localization problems in source and
//! resource files.
//!
//! Files are classified into file types by path globs, parsed into typed
//! intermediate representations, checked by rule sets, and optionally
//! auto-fixed and written back. [`LintEngine`] is the entry point.

#![allow(clippy::type_complexity)] // Factory closures stored in registries

pub mod builtin;
pub mod cli;
pub mod config;
pub mod declarative;
pub mod diagnostics;
pub mod error;
pub mod filetype;
pub mod fix;
pub mod fixer;
pub mod formatter;
pub mod ir;
pub mod level;
pub mod lintable;
pub mod locale_path;
pub mod parser;
pub mod plugin;
pub mod project;
pub mod registry;
pub mod rule;
pub mod ruleset;
pub mod serializer;
pub mod source_file;
pub mod stats;
pub mod strategy;
pub mod telemetry;
pub mod transformer;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;

use crate::error::LintResult;
use crate::plugin::{PluginCatalog, PluginManager};
use crate::project::{Project, ProjectOptions, RunReport};

/// Owns the shared plugin manager and builds projects on top of it.
pub struct LintEngine {
    plugins: Arc<PluginManager>,
}

impl LintEngine {
    /// An engine with the built-in components plus whatever plugins in
    /// `catalog` configurations ask for.
    pub fn new(catalog: PluginCatalog) -> LintResult<Self> {
        Ok(Self {
            plugins: Arc::new(PluginManager::with_builtins(catalog)?),
        })
    }

    pub fn plugins(&self) -> &Arc<PluginManager> {
        &self.plugins
    }

    /// Open and fully initialise the project rooted at `root`.
    pub fn project(&self, root: impl Into<PathBuf>, options: ProjectOptions) -> Result<Project> {
        let mut project = Project::open(root, options, Arc::clone(&self.plugins))?;
        project.init()?;
        Ok(project)
    }

    /// Scan `paths` under the project at `root` and run it.
    pub fn lint(&self, root: &Path, paths: &[PathBuf], options: ProjectOptions) -> Result<RunReport> {
        let mut project = self.project(root, options)?;
        project.scan(paths)?;
        project.run()
    }
}
