use clap::Parser;
use std::path::PathBuf;

use crate::formatter::ANSI_CONSOLE_FORMATTER;
use crate::project::ProjectOptions;

/// Locales checked when none are given: the most common locales on the
/// internet by traffic.
pub const DEFAULT_LOCALES: &str = "en-AU,en-CA,en-GB,en-IN,en-NG,en-PH,en-PK,en-US,en-ZA,de-DE,\
fr-CA,fr-FR,es-AR,es-ES,es-MX,id-ID,it-IT,ja-JP,ko-KR,pt-BR,ru-RU,tr-TR,vi-VN,zxx-XX,zh-Hans-CN,\
zh-Hant-HK,zh-Hant-TW,zh-Hans-SG";

/// loclint CLI options.
#[derive(Debug, Parser)]
#[command(
    name = "loclint",
    version,
    about = "Lint source and resource files for localization problems"
)]
pub struct Args {
    /// Files/directories to lint.
    #[arg(value_name = "PATH", default_value = ".")]
    pub paths: Vec<PathBuf>,

    /// Explicit configuration file instead of looking in the current directory.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Only report errors; warnings and suggestions are suppressed.
    #[arg(short, long)]
    pub errors_only: bool,

    /// Formatter used for the output.
    #[arg(short, long, value_name = "NAME", default_value = ANSI_CONSOLE_FORMATTER)]
    pub formatter: String,

    /// Load all plugins, list the available components, and exit.
    #[arg(long)]
    pub list: bool,

    /// Locales the application supports (comma-separated BCP-47 tags).
    #[arg(short, long, value_delimiter = ',', default_value = DEFAULT_LOCALES)]
    pub locales: Vec<String>,

    /// Locale of the source strings.
    #[arg(short, long, default_value = "en-US")]
    pub source_locale: String,

    /// Log each file as it is checked.
    #[arg(short = 'i', long)]
    pub progress_info: bool,

    /// Only log errors.
    #[arg(short, long)]
    pub quiet: bool,

    /// Log debugging detail.
    #[arg(short, long)]
    pub verbose: bool,

    /// Write files changed by fixes or transformers back to disk.
    #[arg(long)]
    pub write: bool,

    /// Apply available auto-fixes. Implies --write.
    #[arg(long)]
    pub fix: bool,

    /// Overwrite original files instead of writing `<file>.modified`.
    /// Implies --write.
    #[arg(long)]
    pub overwrite: bool,

    /// Maximum number of errors that still passes.
    #[arg(long, value_name = "NUMBER", default_value_t = 0)]
    pub max_errors: u64,

    /// Maximum number of warnings that still passes.
    #[arg(long, value_name = "NUMBER", default_value_t = 0)]
    pub max_warnings: u64,

    /// Maximum number of suggestions that still passes (default: no limit).
    #[arg(long, value_name = "NUMBER")]
    pub max_suggestions: Option<u64>,

    /// Minimum I18N score (0-100) that still passes (default: no minimum).
    #[arg(long, value_name = "NUMBER")]
    pub min_score: Option<f64>,

    /// Always exit with status 0.
    #[arg(long)]
    pub no_return_value: bool,

    /// Write the output to this file instead of stdout.
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Project name shown in the output.
    #[arg(short, long, value_name = "NAME")]
    pub name: Option<String>,
}

impl Args {
    /// Whether modified files are written out at all.
    pub fn writes(&self) -> bool {
        self.write || self.fix || self.overwrite
    }

    pub fn project_options(&self) -> ProjectOptions {
        let locales = self
            .locales
            .iter()
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty())
            .collect();
        ProjectOptions {
            config_path: self.config.clone(),
            name: self.name.clone(),
            formatter: self.formatter.clone(),
            source_locale: Some(self.source_locale.clone()),
            locales: Some(locales),
            autofix: self.fix,
            max_autofix_iterations: None,
            errors_only: self.errors_only,
            max_errors: self.max_errors,
            max_warnings: self.max_warnings,
            max_suggestions: self.max_suggestions,
            min_score: self.min_score,
            write: self.writes(),
            overwrite: self.overwrite,
            output: self.output.clone(),
            progress_info: self.progress_info,
            quiet: self.quiet,
        }
    }
}
