use clap::Parser;
use loclint::LintEngine;
use loclint::cli::Args;
use loclint::plugin::{PluginCatalog, PluginManager};
use loclint::telemetry::{Verbosity, init_tracing};
use std::collections::BTreeMap;
use std::process::ExitCode;

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(Verbosity::from_flags(args.quiet, args.verbose));
    match run(args) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{err:#}");
            ExitCode::from(2)
        }
    }
}

fn run(args: Args) -> anyhow::Result<ExitCode> {
    let engine = LintEngine::new(PluginCatalog::new())?;
    let mut project = engine.project(".", args.project_options())?;

    if args.list {
        print!("{}", list_components(engine.plugins()));
        return Ok(ExitCode::SUCCESS);
    }

    tracing::debug!(paths = ?args.paths, "scanning input paths");
    project.scan(&args.paths)?;
    let report = project.run()?;

    if args.output.is_none() {
        println!("{}", report.output);
    }

    if args.no_return_value {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::from(report.status.code()))
    }
}

fn section(out: &mut String, title: &str, entries: &BTreeMap<String, String>) {
    if entries.is_empty() {
        return;
    }
    out.push('\n');
    out.push_str(title);
    out.push_str(":\n");
    for (name, description) in entries {
        out.push_str(&format!("  {name} - {description}\n"));
    }
}

fn list_components(plugins: &PluginManager) -> String {
    let mut out = String::from("These items are available to use in your configuration\n");
    section(&mut out, "Parsers", &plugins.parsers().descriptions());
    section(&mut out, "Rules", &plugins.rules().descriptions());
    section(&mut out, "Rulesets", &plugins.rules().rule_set_summaries());
    section(&mut out, "Fixers", &plugins.fixers().descriptions());
    section(&mut out, "Formatters", &plugins.formatters().descriptions());
    section(&mut out, "Transformers", &plugins.transformers().descriptions());
    section(&mut out, "Serializers", &plugins.serializers().descriptions());
    out
}
