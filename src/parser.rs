use crate::ir::IntermediateRepresentation;
use crate::source_file::SourceFile;

/// Turns a file into one or more intermediate representations.
pub trait Parser: Send + Sync {
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    /// IR type produced by this parser.
    fn ir_type(&self) -> &str;

    /// File extensions (without the dot) this parser handles by default.
    fn extensions(&self) -> &[&str];

    /// A parser may emit several IRs for one file, e.g. a structured view
    /// and a raw byte view.
    fn parse(&self, file: &SourceFile) -> anyhow::Result<Vec<IntermediateRepresentation>>;
}
