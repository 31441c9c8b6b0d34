//! Fixers and the built-in string fixer.

use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use crate::fix::{Fix, TextEdit, apply_edits};
use crate::ir::IntermediateRepresentation;

/// Applies rule-supplied fixes to an IR of one type.
///
/// Implementations mutate `ir` and set `applied` on every fix they actually
/// carried out. Fixes left unapplied are simply offered again on the next
/// pass if the rule still reports them.
pub trait Fixer: Send + Sync {
    fn ir_type(&self) -> &str;

    fn apply_fixes(
        &self,
        ir: &mut IntermediateRepresentation,
        fixes: &mut [Fix],
    ) -> anyhow::Result<()>;
}

pub type FixerConstructor = Arc<dyn Fn(&Value) -> anyhow::Result<Box<dyn Fixer>> + Send + Sync>;

/// Registration entry for a fixer, keyed by the IR type it handles.
#[derive(Clone)]
pub struct FixerFactory {
    pub ir_type: String,
    pub description: String,
    pub construct: FixerConstructor,
}

impl FixerFactory {
    pub fn new<F>(ir_type: impl Into<String>, description: impl Into<String>, construct: F) -> Self
    where
        F: Fn(&Value) -> anyhow::Result<Box<dyn Fixer>> + Send + Sync + 'static,
    {
        Self {
            ir_type: ir_type.into(),
            description: description.into(),
            construct: Arc::new(construct),
        }
    }
}

/// Patch understood by [`StringFixer`]: a group of edits that must be
/// applied together or not at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringFix {
    pub edits: Vec<TextEdit>,
}

impl StringFix {
    pub fn new(edits: Vec<TextEdit>) -> Self {
        Self { edits }
    }

    /// Convenience for the common single-edit case.
    pub fn fix(edit: TextEdit) -> Fix {
        Fix::new(crate::builtin::STRING_IR, Self::new(vec![edit]))
    }
}

/// Applies [`StringFix`] patches to `String` representations.
///
/// Fixes are accepted greedily in the order given; a fix whose edits
/// overlap an already accepted one, or that does not fit the current text,
/// is skipped and stays unapplied.
#[derive(Debug, Default)]
pub struct StringFixer;

impl Fixer for StringFixer {
    fn ir_type(&self) -> &str {
        crate::builtin::STRING_IR
    }

    fn apply_fixes(
        &self,
        ir: &mut IntermediateRepresentation,
        fixes: &mut [Fix],
    ) -> anyhow::Result<()> {
        let path = ir.file_path().display().to_string();
        let Some(text) = ir.representation_mut::<String>() else {
            anyhow::bail!("string fixer cannot handle the representation of {path}");
        };

        let mut accepted: Vec<TextEdit> = Vec::new();
        let mut accepted_fixes = Vec::new();
        for (idx, fix) in fixes.iter().enumerate() {
            let Some(patch) = fix.patch::<StringFix>() else {
                continue;
            };
            let fits = patch.edits.iter().enumerate().all(|(i, edit)| {
                edit.validate(text).is_ok()
                    && !accepted.iter().any(|a| a.overlaps_with(edit))
                    && !patch.edits[i + 1..].iter().any(|b| b.overlaps_with(edit))
            });
            if fits {
                accepted.extend(patch.edits.iter().cloned());
                accepted_fixes.push(idx);
            } else {
                debug!(fix = idx, "skipping conflicting string fix");
            }
        }

        if accepted.is_empty() {
            return Ok(());
        }

        *text = apply_edits(text, &accepted)?;
        for idx in accepted_fixes {
            fixes[idx].set_applied(true);
        }
        Ok(())
    }
}
