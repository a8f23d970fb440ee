use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipKind {
    /// The parent schema holds instances of the target schema
    Contains,
    /// The schema names the target schema without owning instances of it
    References,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cardinality {
    One,
    Many,
}

/// A discovered edge between two schemas, attributed to a specific field.
///
/// Relationships are derived by the discoverer, never authored directly,
/// and are recomputed in full whenever the schema set changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaRelationship {
    pub kind: RelationshipKind,
    pub target_schema: String,
    /// The field on the owning schema that carries this relationship
    pub property_name: String,
    pub cardinality: Cardinality,
    /// Whether the editor offers an add action for this edge
    pub can_create: bool,
    /// Whether the editor offers a remove action for this edge
    pub can_delete: bool,
}

impl SchemaRelationship {
    pub fn contains(target_schema: &str, property_name: &str) -> Self {
        Self {
            kind: RelationshipKind::Contains,
            target_schema: target_schema.to_string(),
            property_name: property_name.to_string(),
            cardinality: Cardinality::Many,
            can_create: true,
            can_delete: true,
        }
    }

    pub fn references(target_schema: &str, property_name: &str) -> Self {
        Self {
            kind: RelationshipKind::References,
            target_schema: target_schema.to_string(),
            property_name: property_name.to_string(),
            cardinality: Cardinality::One,
            can_create: false,
            can_delete: false,
        }
    }
}
