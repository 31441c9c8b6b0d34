mod support;

use std::fs;
use std::path::Path;

use loclint::project::{DirItem, ExitStatus, Project, ProjectOptions};
use support::{ANNOTATE_TRANSFORMER, BROKEN_PARSER, create_temp_project, plugins};
use tempfile::TempDir;

const TODO_RULE: &str = r#"
[[rules]]
type = "source-checker"
name = "no-todo"
description = "No leftover TODO markers"
note = "Found {matchString}"
regexps = ["TODO"]
severity = "error"
"#;

fn open(dir: &TempDir, options: ProjectOptions) -> Project {
    let mut project = Project::open(dir.path(), options, plugins()).expect("project opens");
    project.init().expect("project initialises");
    project
        .scan(&[dir.path().to_path_buf()])
        .expect("project scans");
    project
}

fn relative_paths(project: &Project) -> Vec<String> {
    let mut paths: Vec<String> = project
        .files()
        .iter()
        .map(|f| {
            f.path()
                .strip_prefix(project.root())
                .unwrap_or(f.path())
                .to_string_lossy()
                .replace('\\', "/")
        })
        .collect();
    paths.sort();
    paths
}

#[test]
fn nested_projects_use_their_own_mappings() {
    let dir = create_temp_project(&[
        (
            "loclint.toml",
            "name = \"root\"\n\n[paths.\"**/*.txt\"]\nparsers = [\"string\"]\n",
        ),
        ("a.txt", "root text\n"),
        ("b.json", "{}\n"),
        (
            "test/x/loclint.toml",
            "name = \"nested\"\n\n[paths.\"**/*.json\"]\nparsers = [\"string\"]\n",
        ),
        ("test/x/d.json", "{\"a\": 1}\n"),
        ("test/x/e.txt", "nested text\n"),
    ])
    .expect("temp project");

    let project = open(&dir, ProjectOptions::default());

    assert_eq!(relative_paths(&project), ["a.txt", "test/x/d.json"]);
    let nested = project
        .files()
        .into_iter()
        .find(|f| f.relative_path() == "d.json")
        .expect("nested file is relative to its own project");
    assert_eq!(nested.file_type().name(), "**/*.json");
}

#[test]
fn literal_include_beats_global_exclude() {
    let dir = create_temp_project(&[
        (
            "loclint.json",
            r#"{
                "excludes": ["**/*.json"],
                "paths": {
                    "config.json": {"parsers": ["string"]},
                    "**": "unknown"
                }
            }"#,
        ),
        ("config.json", "{}\n"),
        ("other.json", "{}\n"),
        ("readme.txt", "hello\n"),
    ])
    .expect("temp project");

    let project = open(&dir, ProjectOptions::default());

    assert_eq!(relative_paths(&project), ["config.json", "readme.txt"]);
    let config = project
        .files()
        .into_iter()
        .find(|f| f.relative_path() == "config.json")
        .expect("config.json is included");
    assert_eq!(config.file_type().name(), "config.json");
}

#[test]
fn any_error_fails_the_run_by_default() {
    let config = format!(
        "{TODO_RULE}\n[paths.\"**/*.txt\"]\nparsers = [\"string\"]\nruleset = {{ no-todo = true }}\n"
    );
    let dir = create_temp_project(&[("loclint.toml", config.as_str()), ("a.txt", "x\nTODO\n")])
        .expect("temp project");

    let mut project = open(&dir, ProjectOptions::default());
    let report = project.run().expect("run completes");

    assert_eq!(report.result_stats.errors, 1);
    assert_eq!(report.results[0].line_number, Some(2));
    assert_eq!(report.status, ExitStatus::Error);
    assert_eq!(report.status.code(), 2);
    let expected = 100.0 / (1.0 + 5.0 / 2.0);
    assert!((report.score - expected).abs() < 1e-9);
}

#[test]
fn error_budget_keeps_the_run_green() {
    let config = format!(
        "{TODO_RULE}\n[paths.\"**/*.txt\"]\nparsers = [\"string\"]\nruleset = {{ no-todo = true }}\n"
    );
    let dir = create_temp_project(&[("loclint.toml", config.as_str()), ("a.txt", "TODO\n")])
        .expect("temp project");

    let options = ProjectOptions {
        max_errors: 1,
        ..ProjectOptions::default()
    };
    let mut project = open(&dir, options);
    let report = project.run().expect("run completes");

    assert_eq!(report.result_stats.errors, 1);
    assert_eq!(report.status, ExitStatus::Success);
}

#[test]
fn files_in_unrequested_locales_are_skipped() {
    let config = format!(
        "{TODO_RULE}\n[paths.\"res/**/*.txt\"]\nparsers = [\"string\"]\ntemplate = \"[dir]/[locale]/[basename].txt\"\nruleset = {{ no-todo = true }}\n"
    );
    let dir = create_temp_project(&[
        ("loclint.toml", config.as_str()),
        ("res/de-DE/strings.txt", "TODO\n"),
        ("res/xx-YY/strings.txt", "TODO\n"),
    ])
    .expect("temp project");

    let options = ProjectOptions {
        locales: Some(vec!["de-DE".to_string()]),
        max_errors: 10,
        ..ProjectOptions::default()
    };
    let mut project = open(&dir, options);
    let report = project.run().expect("run completes");

    assert_eq!(report.results.len(), 1);
    assert_eq!(report.results[0].locale.as_deref(), Some("de-DE"));
    assert!(report.results[0].path_name.contains("de-DE"));
    // The skipped file was never parsed and adds nothing to the totals.
    assert_eq!(report.file_stats.files, 1);
    assert_eq!(report.file_stats.lines, 1);
}

#[test]
fn autofix_writes_a_modified_copy() {
    let config = r#"
[[rules]]
type = "source-checker"
name = "us-spelling"
description = "Use US spelling"
note = "Use US spelling instead of {matchString}"
regexps = ["colour"]
severity = "warning"
fixes = [{ search = "colour", replace = "color" }]

[paths."**/*.txt"]
parsers = ["string"]
ruleset = { us-spelling = true }
"#;
    let dir = create_temp_project(&[("loclint.toml", config), ("a.txt", "the colour of colour\n")])
        .expect("temp project");

    let options = ProjectOptions {
        autofix: true,
        write: true,
        ..ProjectOptions::default()
    };
    let mut project = open(&dir, options);
    let report = project.run().expect("run completes");

    assert_eq!(report.results.len(), 2);
    assert!(report.results.iter().all(|r| r.fix_applied()));
    assert_eq!(report.status, ExitStatus::Warning);

    let modified = fs::read_to_string(dir.path().join("a.txt.modified")).expect("modified copy");
    assert_eq!(modified, "the color of color\n");
    let original = fs::read_to_string(dir.path().join("a.txt")).expect("original");
    assert_eq!(original, "the colour of colour\n");
}

#[test]
fn without_write_nothing_touches_disk() {
    let config = r#"
[[rules]]
type = "source-checker"
name = "us-spelling"
description = "Use US spelling"
note = "Use US spelling instead of {matchString}"
regexps = ["colour"]
fixes = [{ search = "colour", replace = "color" }]

[paths."**/*.txt"]
parsers = ["string"]
ruleset = { us-spelling = true }
"#;
    let dir = create_temp_project(&[("loclint.toml", config), ("a.txt", "colour\n")])
        .expect("temp project");

    let options = ProjectOptions {
        autofix: true,
        ..ProjectOptions::default()
    };
    let mut project = open(&dir, options);
    project.run().expect("run completes");

    assert!(!Path::new(&dir.path().join("a.txt.modified")).exists());
}

#[test]
fn output_file_receives_the_formatted_report() {
    let config = format!(
        "{TODO_RULE}\n[paths.\"**/*.txt\"]\nparsers = [\"string\"]\nruleset = {{ no-todo = true }}\n"
    );
    let dir = create_temp_project(&[("loclint.toml", config.as_str()), ("a.txt", "TODO\n")])
        .expect("temp project");
    let output = dir.path().join("out/report.txt");

    let options = ProjectOptions {
        output: Some(output.clone()),
        ..ProjectOptions::default()
    };
    let mut project = open(&dir, options);
    let report = project.run().expect("run completes");

    let written = fs::read_to_string(&output).expect("report written");
    assert_eq!(written, report.output);
    assert!(written.contains("no-todo"));
}

#[test]
fn plugins_named_in_config_are_loaded() {
    let dir = create_temp_project(&[
        (
            "loclint.toml",
            "plugins = [\"test\"]\n\n[paths.\"**/*.txt\"]\nruleset = \"generic\"\n",
        ),
        ("a.txt", "text\n"),
    ])
    .expect("temp project");

    let project = open(&dir, ProjectOptions::default());

    assert!(project.plugins().is_loaded(support::TEST_PLUGIN));
    let file_type = project.file_type_for_path("a.txt");
    assert_eq!(file_type.rules().len(), support::GENERIC_RULE_COUNT);
}

#[test]
fn unknown_plugin_is_fatal() {
    let dir = create_temp_project(&[("loclint.toml", "plugins = [\"nope\"]\n")])
        .expect("temp project");

    let mut project =
        Project::open(dir.path(), ProjectOptions::default(), plugins()).expect("project opens");
    let err = project.init().expect_err("unknown plugin is rejected");
    assert!(err.to_string().contains("plugin nope"));
}

#[test]
fn excluded_directory_is_not_a_nested_project() {
    let dir = create_temp_project(&[
        (
            "loclint.toml",
            "excludes = [\"vendor\"]\n\n[paths.\"**/*.txt\"]\nparsers = [\"string\"]\n",
        ),
        ("a.txt", "root text\n"),
        ("vendor/loclint.toml", "[paths.\"**/*.txt\"]\nparsers = [\"string\"]\n"),
        ("vendor/b.txt", "vendored text\n"),
    ])
    .expect("temp project");

    let project = open(&dir, ProjectOptions::default());

    assert_eq!(relative_paths(&project), ["a.txt"]);
    assert!(project.items().iter().all(|item| !matches!(item, DirItem::Project(_))));
}

fn todo_project(parsers: &str, extra: &str) -> String {
    format!(
        "plugins = [\"test\"]\n{TODO_RULE}\n[paths.\"**/*.txt\"]\nparsers = {parsers}\nruleset = {{ no-todo = true }}\n{extra}"
    )
}

#[test]
fn failing_parser_is_skipped_when_another_succeeds() {
    let config = todo_project(&format!("[\"{BROKEN_PARSER}\", \"string\"]"), "");
    let dir = create_temp_project(&[("loclint.toml", config.as_str()), ("a.txt", "TODO\n")])
        .expect("temp project");

    let options = ProjectOptions {
        max_errors: 10,
        ..ProjectOptions::default()
    };
    let mut project = open(&dir, options);
    let report = project.run().expect("run completes");

    assert_eq!(report.results.len(), 1);
    assert_eq!(report.results[0].rule, "no-todo");
    assert_eq!(project.files()[0].irs().len(), 1);
}

#[test]
fn file_whose_parsers_all_fail_has_no_irs() {
    let config = todo_project(&format!("[\"{BROKEN_PARSER}\"]"), "");
    let dir = create_temp_project(&[("loclint.toml", config.as_str()), ("a.txt", "TODO\n")])
        .expect("temp project");

    let mut project = open(&dir, ProjectOptions::default());
    let report = project.run().expect("a parse failure does not fail the run");

    assert!(report.results.is_empty());
    assert!(project.files()[0].irs().is_empty());
    assert_eq!(report.file_stats.files, 0);
    assert_eq!(report.status, ExitStatus::Success);
}

#[test]
fn unreadable_file_does_not_hide_the_others() {
    let config = todo_project("[\"string\"]", "");
    let dir = create_temp_project(&[
        ("loclint.toml", config.as_str()),
        ("a.txt", "TODO\n"),
        ("c.txt", "TODO again\n"),
    ])
    .expect("temp project");
    fs::write(dir.path().join("b.txt"), [0xffu8, 0xfe, b'\n']).expect("binary file");

    let options = ProjectOptions {
        max_errors: 10,
        ..ProjectOptions::default()
    };
    let mut project = open(&dir, options);
    let report = project.run().expect("run completes");

    assert_eq!(project.files().len(), 3);
    let mut paths: Vec<_> = report
        .results
        .iter()
        .map(|r| Path::new(&r.path_name).file_name().map(|n| n.to_string_lossy().into_owned()))
        .collect();
    paths.sort();
    assert_eq!(
        paths,
        [Some("a.txt".to_string()), Some("c.txt".to_string())]
    );
    assert_eq!(report.file_stats.files, 2);
}

#[test]
fn transformer_replaces_the_ir_before_writing() {
    let config = todo_project(
        "[\"string\"]",
        &format!("transformers = [\"{ANNOTATE_TRANSFORMER}\"]\n"),
    );
    let dir = create_temp_project(&[("loclint.toml", config.as_str()), ("a.txt", "TODO\n")])
        .expect("temp project");

    let options = ProjectOptions {
        write: true,
        max_errors: 10,
        ..ProjectOptions::default()
    };
    let mut project = open(&dir, options);
    let report = project.run().expect("run completes");

    assert_eq!(report.results.len(), 1);
    assert!(project.files()[0].is_dirty());
    let modified = fs::read_to_string(dir.path().join("a.txt.modified")).expect("modified copy");
    assert_eq!(modified, "TODO\n<!-- 1 issues -->\n");
}
