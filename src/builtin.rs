//! Components that ship with the linter and are always available.

use std::sync::Arc;

use anyhow::Context;
use serde_json::Value;

use crate::declarative::source_checker_kind;
use crate::fixer::{Fixer, FixerFactory, StringFixer};
use crate::formatter::{AnsiConsoleFormatter, Formatter, JsonFormatter};
use crate::ir::IntermediateRepresentation;
use crate::parser::Parser;
use crate::plugin::Plugin;
use crate::serializer::{Serializer, SerializerFactory};
use crate::source_file::SourceFile;
use crate::stats::FileStats;

pub const BUILTIN_PLUGIN: &str = "builtin";

pub const STRING_IR: &str = "string";
pub const LINE_IR: &str = "line";
pub const BYTE_IR: &str = "byte";

/// Extensions the string parser claims when a file type names no parsers.
const TEXT_EXTENSIONS: &[&str] = &[
    "txt", "md", "markdown", "html", "htm", "js", "jsx", "mjs", "cjs", "ts", "tsx", "java", "kt",
    "swift", "m", "c", "cc", "cpp", "h", "hpp", "cs", "go", "rs", "py", "rb", "php", "json", "yml",
    "yaml", "xml", "properties", "strings", "po", "pot", "xliff", "xlf", "csv", "tmpl", "hbs",
];

fn text_stats(text: &str) -> FileStats {
    FileStats::for_file(text.lines().count() as u64, text.len() as u64)
}

/// Whole file as one `String`.
#[derive(Debug, Default)]
pub struct StringParser;

impl Parser for StringParser {
    fn name(&self) -> &str {
        "string"
    }

    fn description(&self) -> &str {
        "Reads the whole file as a single string"
    }

    fn ir_type(&self) -> &str {
        STRING_IR
    }

    fn extensions(&self) -> &[&str] {
        TEXT_EXTENSIONS
    }

    fn parse(&self, file: &SourceFile) -> anyhow::Result<Vec<IntermediateRepresentation>> {
        let text = file.content()?.to_string();
        let stats = text_stats(&text);
        Ok(vec![
            IntermediateRepresentation::new(STRING_IR, text, file.path()).with_stats(stats),
        ])
    }
}

/// File split into lines, each keeping its terminator.
#[derive(Debug, Default)]
pub struct LineParser;

impl Parser for LineParser {
    fn name(&self) -> &str {
        "line"
    }

    fn description(&self) -> &str {
        "Reads the file as a list of lines"
    }

    fn ir_type(&self) -> &str {
        LINE_IR
    }

    fn extensions(&self) -> &[&str] {
        &[]
    }

    fn parse(&self, file: &SourceFile) -> anyhow::Result<Vec<IntermediateRepresentation>> {
        let text = file.content()?;
        let lines: Vec<String> = text.split_inclusive('\n').map(str::to_string).collect();
        Ok(vec![
            IntermediateRepresentation::new(LINE_IR, lines, file.path()).with_stats(text_stats(text)),
        ])
    }
}

/// Raw bytes, for rules that care about encodings.
#[derive(Debug, Default)]
pub struct ByteParser;

impl Parser for ByteParser {
    fn name(&self) -> &str {
        "byte"
    }

    fn description(&self) -> &str {
        "Reads the file as raw bytes"
    }

    fn ir_type(&self) -> &str {
        BYTE_IR
    }

    fn extensions(&self) -> &[&str] {
        &[]
    }

    fn parse(&self, file: &SourceFile) -> anyhow::Result<Vec<IntermediateRepresentation>> {
        let bytes = file.raw()?.to_vec();
        let stats = FileStats {
            files: 1,
            bytes: bytes.len() as u64,
            ..FileStats::default()
        };
        Ok(vec![
            IntermediateRepresentation::new(BYTE_IR, bytes, file.path()).with_stats(stats),
        ])
    }
}

fn first_of_type<'a>(
    irs: &'a [IntermediateRepresentation],
    ir_type: &str,
) -> anyhow::Result<&'a IntermediateRepresentation> {
    irs.iter()
        .find(|ir| ir.ir_type() == ir_type)
        .with_context(|| format!("no {ir_type} representation to serialize"))
}

#[derive(Debug, Default)]
pub struct StringSerializer;

impl Serializer for StringSerializer {
    fn name(&self) -> &str {
        "string"
    }

    fn ir_type(&self) -> &str {
        STRING_IR
    }

    fn serialize(&self, irs: &[IntermediateRepresentation]) -> anyhow::Result<SourceFile> {
        let ir = first_of_type(irs, STRING_IR)?;
        let text = ir
            .representation::<String>()
            .context("string representation has an unexpected shape")?;
        Ok(SourceFile::with_content(ir.file_path(), text.as_bytes()))
    }
}

#[derive(Debug, Default)]
pub struct LineSerializer;

impl Serializer for LineSerializer {
    fn name(&self) -> &str {
        "line"
    }

    fn ir_type(&self) -> &str {
        LINE_IR
    }

    fn serialize(&self, irs: &[IntermediateRepresentation]) -> anyhow::Result<SourceFile> {
        let ir = first_of_type(irs, LINE_IR)?;
        let lines = ir
            .representation::<Vec<String>>()
            .context("line representation has an unexpected shape")?;
        Ok(SourceFile::with_content(ir.file_path(), lines.concat()))
    }
}

/// Plugin bundling every built-in component.
#[derive(Debug, Default)]
pub struct BuiltinPlugin;

impl Plugin for BuiltinPlugin {
    fn name(&self) -> &str {
        BUILTIN_PLUGIN
    }

    fn parsers(&self) -> Vec<Arc<dyn Parser>> {
        vec![Arc::new(StringParser), Arc::new(LineParser), Arc::new(ByteParser)]
    }

    fn declarative_rule_kinds(&self) -> Vec<crate::rule::DeclarativeRuleKind> {
        vec![source_checker_kind()]
    }

    fn fixers(&self) -> Vec<FixerFactory> {
        vec![FixerFactory::new(
            STRING_IR,
            "Applies positional text edits to string representations",
            |_: &Value| Ok(Box::new(StringFixer) as Box<dyn Fixer>),
        )]
    }

    fn serializers(&self) -> Vec<SerializerFactory> {
        vec![
            SerializerFactory::new("string", "Writes a string representation back out", |_| {
                Ok(Box::new(StringSerializer) as Box<dyn Serializer>)
            }),
            SerializerFactory::new("line", "Writes a line representation back out", |_| {
                Ok(Box::new(LineSerializer) as Box<dyn Serializer>)
            }),
        ]
    }

    fn formatters(&self) -> Vec<Arc<dyn Formatter>> {
        vec![Arc::new(AnsiConsoleFormatter), Arc::new(JsonFormatter)]
    }
}
