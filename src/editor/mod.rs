pub mod array_editor;
pub mod instance;
pub mod object_editor;

use serde_json::Value;
use thiserror::Error;

pub use array_editor::ArrayEditor;
pub use object_editor::{ChildView, NodeView, ObjectEditor, RemovalOutcome};

/// Contract violations on editor operations. Returned, never panicked;
/// the editor survives any sequence of calls.
#[derive(Debug, Clone, Error)]
pub enum EditorError {
    #[error("Index {index} is out of bounds for {len} items")]
    IndexOutOfBounds { index: usize, len: usize },
    #[error("Schema '{child}' is not an addable child of '{parent}'")]
    IllegalChildType { parent: String, child: String },
    #[error("Property '{property}' of schema '{schema}' is not a containment array")]
    NotAContainment { schema: String, property: String },
    #[error("Instance has no children array")]
    MissingChildren,
    #[error("Instance is not an object")]
    NotAnObject,
    #[error("Field '{field}' is reserved and cannot be edited directly")]
    ReservedField { field: String },
    #[error("Instance type could not be determined")]
    UnknownInstanceType,
}

/// The persistence collaborator's view of the editors.
///
/// Called synchronously after every successful mutation; implementations
/// own debouncing and storage. The editors never await a result.
pub trait ChangeSink {
    /// A single field of an instance changed.
    fn field_changed(&mut self, _instance_id: &str, _field: &str, _value: &Value) {}

    /// A top-level item array changed (append, remove, update, reorder).
    fn items_changed(&mut self, _items: &[Value]) {}
}

/// A sink that ignores every notification.
pub struct NullSink;

impl ChangeSink for NullSink {}
