use std::sync::Arc;

use serde_json::Value;

use crate::ir::IntermediateRepresentation;
use crate::source_file::SourceFile;

/// Turns the IRs of one file back into file content.
pub trait Serializer: Send + Sync {
    fn name(&self) -> &str;

    fn ir_type(&self) -> &str;

    fn serialize(&self, irs: &[IntermediateRepresentation]) -> anyhow::Result<SourceFile>;
}

pub type SerializerConstructor =
    Arc<dyn Fn(&Value) -> anyhow::Result<Box<dyn Serializer>> + Send + Sync>;

/// Registration entry for a serializer; instances are built per request so
/// each file type can pass its own options.
#[derive(Clone)]
pub struct SerializerFactory {
    pub name: String,
    pub description: String,
    pub construct: SerializerConstructor,
}

impl SerializerFactory {
    pub fn new<F>(name: impl Into<String>, description: impl Into<String>, construct: F) -> Self
    where
        F: Fn(&Value) -> anyhow::Result<Box<dyn Serializer>> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            description: description.into(),
            construct: Arc::new(construct),
        }
    }
}
