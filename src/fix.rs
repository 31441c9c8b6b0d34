//! Fix payloads and positional text edits.
//!
//! A [`Fix`] is opaque to the engine: a rule attaches a patch of whatever
//! shape its fixer understands, and the fixer reports back through the
//! `applied` flag. [`TextEdit`] is the patch shape used by the built-in
//! string fixer.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use thiserror::Error;

/// Rule-defined patch plus the outcome reported by the fixer that saw it.
#[derive(Clone)]
pub struct Fix {
    ir_type: String,
    patch: Arc<dyn Any + Send + Sync>,
    applied: bool,
}

impl Fix {
    pub fn new<P: Any + Send + Sync>(ir_type: impl Into<String>, patch: P) -> Self {
        Self {
            ir_type: ir_type.into(),
            patch: Arc::new(patch),
            applied: false,
        }
    }

    /// IR type of the fixer expected to understand this patch.
    pub fn ir_type(&self) -> &str {
        &self.ir_type
    }

    /// Downcast the patch to the concrete type a fixer expects.
    pub fn patch<P: Any>(&self) -> Option<&P> {
        (*self.patch).downcast_ref::<P>()
    }

    pub fn is_applied(&self) -> bool {
        self.applied
    }

    pub fn set_applied(&mut self, applied: bool) {
        self.applied = applied;
    }
}

impl fmt::Debug for Fix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fix")
            .field("ir_type", &self.ir_type)
            .field("applied", &self.applied)
            .finish_non_exhaustive()
    }
}

/// Error type for text edit validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FixError {
    #[error("Overlapping edits detected at byte {0}")]
    OverlappingEdits(usize),

    #[error("Edit range [{start}..{end}) exceeds source length {source_len}")]
    InvalidRange {
        start: usize,
        end: usize,
        source_len: usize,
    },

    #[error("Edit start {start} is after edit end {end}")]
    InvalidEditOrder { start: usize, end: usize },

    #[error("Edit boundary {0} does not fall on a character boundary")]
    NotCharBoundary(usize),
}

/// Replace the byte range `[start_byte..end_byte)` with `replacement`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEdit {
    pub start_byte: usize,
    pub end_byte: usize,
    pub replacement: String,
}

impl TextEdit {
    pub fn new(start_byte: usize, end_byte: usize, replacement: impl Into<String>) -> Self {
        Self {
            start_byte,
            end_byte,
            replacement: replacement.into(),
        }
    }

    pub fn delete(start_byte: usize, end_byte: usize) -> Self {
        Self::new(start_byte, end_byte, String::new())
    }

    pub fn insert(byte_offset: usize, text: impl Into<String>) -> Self {
        Self::new(byte_offset, byte_offset, text)
    }

    pub fn range(&self) -> std::ops::Range<usize> {
        self.start_byte..self.end_byte
    }

    fn is_insertion(&self) -> bool {
        self.start_byte == self.end_byte
    }

    /// Ranges intersect, or both edits insert at the same offset (their
    /// relative order would be ambiguous).
    pub fn overlaps_with(&self, other: &TextEdit) -> bool {
        if self.is_insertion() && other.is_insertion() {
            return self.start_byte == other.start_byte;
        }
        self.start_byte < other.end_byte && other.start_byte < self.end_byte
    }

    pub fn validate(&self, source: &str) -> Result<(), FixError> {
        if self.start_byte > self.end_byte {
            return Err(FixError::InvalidEditOrder {
                start: self.start_byte,
                end: self.end_byte,
            });
        }
        if self.end_byte > source.len() {
            return Err(FixError::InvalidRange {
                start: self.start_byte,
                end: self.end_byte,
                source_len: source.len(),
            });
        }
        for b in [self.start_byte, self.end_byte] {
            if !source.is_char_boundary(b) {
                return Err(FixError::NotCharBoundary(b));
            }
        }
        Ok(())
    }
}

/// Validate that a list of edits are non-overlapping and within bounds.
pub fn validate_edits(edits: &[TextEdit], source: &str) -> Result<(), FixError> {
    for edit in edits {
        edit.validate(source)?;
    }
    for (i, a) in edits.iter().enumerate() {
        if let Some(b) = edits[i + 1..].iter().find(|b| a.overlaps_with(b)) {
            return Err(FixError::OverlappingEdits(a.start_byte.max(b.start_byte)));
        }
    }
    Ok(())
}

/// Apply a list of non-overlapping edits, back to front so offsets stay valid.
pub fn apply_edits(source: &str, edits: &[TextEdit]) -> Result<String, FixError> {
    validate_edits(edits, source)?;

    let mut sorted: Vec<&TextEdit> = edits.iter().collect();
    // Back to front; at a shared start the longer edit goes first so an
    // insertion lands in front of the replaced span.
    sorted.sort_by(|a, b| {
        b.start_byte
            .cmp(&a.start_byte)
            .then_with(|| b.end_byte.cmp(&a.end_byte))
    });

    let mut result = source.to_string();
    for edit in sorted {
        result.replace_range(edit.range(), &edit.replacement);
    }
    Ok(result)
}
