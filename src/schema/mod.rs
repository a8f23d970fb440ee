pub mod discover;
pub mod introspect;
pub mod registry;
pub mod types;

pub use registry::{global, install_global, RegistryEntry, SchemaRegistry};

// Re-export the commonly used types at the schema module level
pub use types::{
    Cardinality, FieldConstraints, FieldValidation, PropertyDefinition, RelationshipKind,
    SchemaDefinition, SchemaError, SchemaNode, SchemaRelationship, UiHint, ValueKind, WidgetKind,
};
