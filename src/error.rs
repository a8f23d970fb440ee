use crate::editor::EditorError;
use crate::schema::types::SchemaError;

/// Unified error type for the sopform crate.
///
/// Centralizes the errors the crate can surface so callers embedding both
/// the registry and the editors have a single type to propagate.
#[derive(Debug, thiserror::Error)]
pub enum FormError {
    /// Errors related to schema definitions and registry operations
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    /// Contract violations on editor operations
    #[error("Editor error: {0}")]
    Editor(#[from] EditorError),

    /// Errors serializing or deserializing schema and instance JSON
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for operations that can produce a `FormError`
pub type FormResult<T> = Result<T, FormError>;
