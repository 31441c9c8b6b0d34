use crate::diagnostics::Diagnostic;
use crate::ir::IntermediateRepresentation;

/// Post-lint rewrite of an IR, given every finding of the run as context.
pub trait Transformer: Send + Sync {
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    fn ir_type(&self) -> &str;

    /// Return a replacement IR, or `None` to keep the current one.
    fn transform(
        &self,
        ir: &IntermediateRepresentation,
        results: &[Diagnostic],
    ) -> anyhow::Result<Option<IntermediateRepresentation>>;
}
