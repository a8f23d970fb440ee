pub mod errors;
pub mod node;
pub mod property;
pub mod relationship;
pub mod schema;

pub use errors::SchemaError;
pub use node::{
    Modifiers, NumberConstraints, ObjectField, SchemaNode, StringConstraints, StringFormat,
};
pub use property::{FieldConstraints, FieldValidation, PropertyDefinition, ValueKind, WidgetKind};
pub use relationship::{Cardinality, RelationshipKind, SchemaRelationship};
pub use schema::{SchemaDefinition, UiHint};
