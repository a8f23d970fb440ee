use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum SchemaError {
    #[error("Schema not found: {0}")]
    NotFound(String),
    #[error("Invalid field: {0}")]
    InvalidField(String),
    #[error("Invalid data: {0}")]
    InvalidData(String),
}
