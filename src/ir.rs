use std::any::Any;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::stats::FileStats;

/// Typed, parsed view of a file's content.
///
/// `ir_type` names the shape of `representation`; rules, fixers,
/// transformers and serializers only ever touch representations whose type
/// tag they declare.
pub struct IntermediateRepresentation {
    ir_type: String,
    representation: Box<dyn Any + Send + Sync>,
    file_path: PathBuf,
    stats: Option<FileStats>,
    dirty: bool,
}

impl IntermediateRepresentation {
    pub fn new<R: Any + Send + Sync>(
        ir_type: impl Into<String>,
        representation: R,
        file_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            ir_type: ir_type.into(),
            representation: Box::new(representation),
            file_path: file_path.into(),
            stats: None,
            dirty: false,
        }
    }

    pub fn with_stats(mut self, stats: FileStats) -> Self {
        self.stats = Some(stats);
        self
    }

    pub fn ir_type(&self) -> &str {
        &self.ir_type
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    pub fn stats(&self) -> Option<&FileStats> {
        self.stats.as_ref()
    }

    pub fn representation<R: Any>(&self) -> Option<&R> {
        self.representation.downcast_ref::<R>()
    }

    pub fn representation_mut<R: Any>(&mut self) -> Option<&mut R> {
        self.representation.downcast_mut::<R>()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn set_dirty(&mut self, dirty: bool) {
        self.dirty = dirty;
    }
}

impl fmt::Debug for IntermediateRepresentation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IntermediateRepresentation")
            .field("ir_type", &self.ir_type)
            .field("file_path", &self.file_path)
            .field("dirty", &self.dirty)
            .finish_non_exhaustive()
    }
}
