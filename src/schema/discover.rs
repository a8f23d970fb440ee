//! Relationship discovery: computing the directed graph of containment and
//! reference edges between registered schemas.
//!
//! Two passes over the full schema set. Pass 1 walks every declared field
//! forward, looking for arrays whose elements resolve to registered
//! schemas. Pass 2 walks the designated back-reference field and fills in
//! containment discoverable only from the child side, plus the inverse
//! reference edge. Results are independent of registration order.

use std::collections::{HashMap, HashSet};

use log::debug;
use serde_json::Value;

use crate::config::RegistryConfig;
use crate::schema::types::{RelationshipKind, SchemaDefinition, SchemaNode, SchemaRelationship};

/// Computes the relationship lists for every schema in the set.
///
/// Fields whose targets cannot be resolved to any registered schema
/// contribute no relationship; most fields are plain values, so this is
/// the expected case, not an error.
pub fn discover(
    schemas: &[SchemaDefinition],
    config: &RegistryConfig,
) -> HashMap<String, Vec<SchemaRelationship>> {
    let by_name: HashMap<&str, &SchemaDefinition> =
        schemas.iter().map(|s| (s.name.as_str(), s)).collect();
    let mut map: HashMap<String, Vec<SchemaRelationship>> = schemas
        .iter()
        .map(|s| (s.name.clone(), Vec::new()))
        .collect();

    // Pass 1: forward containment from declared array fields.
    for schema in schemas {
        let Some(fields) = schema.object_fields() else {
            continue;
        };
        for field in fields {
            if field.name == config.back_reference_field {
                continue;
            }
            for target in array_element_targets(&field.node, &by_name) {
                if let Some(relationships) = map.get_mut(&schema.name) {
                    push_unique(
                        relationships,
                        SchemaRelationship::contains(&target, &field.name),
                    );
                }
            }
        }
    }

    // Pass 2: containment and references declared from the child side.
    for schema in schemas {
        let Some(fields) = schema.object_fields() else {
            continue;
        };
        let Some(back) = fields
            .iter()
            .find(|f| f.name == config.back_reference_field)
        else {
            continue;
        };
        for parent in back_reference_parents(&back.node) {
            if !by_name.contains_key(parent.as_str()) {
                debug!(
                    "Schema '{}' names unregistered parent '{}'; skipping",
                    schema.name, parent
                );
                continue;
            }
            let already_contained = map
                .get(&parent)
                .is_some_and(|relationships| {
                    relationships.iter().any(|r| {
                        r.kind == RelationshipKind::Contains && r.target_schema == schema.name
                    })
                });
            if !already_contained {
                if let Some(relationships) = map.get_mut(&parent) {
                    push_unique(
                        relationships,
                        SchemaRelationship::contains(&schema.name, &config.children_field),
                    );
                }
            }
            if let Some(relationships) = map.get_mut(&schema.name) {
                push_unique(
                    relationships,
                    SchemaRelationship::references(&parent, &config.back_reference_field),
                );
            }
        }
    }

    map
}

fn push_unique(relationships: &mut Vec<SchemaRelationship>, relationship: SchemaRelationship) {
    let duplicate = relationships.iter().any(|r| {
        r.kind == relationship.kind
            && r.target_schema == relationship.target_schema
            && r.property_name == relationship.property_name
    });
    if !duplicate {
        relationships.push(relationship);
    }
}

/// The registered schemas a field's array elements resolve to. Handles
/// both an array of a union and a union of arrays; anything else resolves
/// to nothing.
fn array_element_targets(
    node: &SchemaNode,
    by_name: &HashMap<&str, &SchemaDefinition>,
) -> Vec<String> {
    let mut targets = Vec::new();
    match node.base() {
        SchemaNode::Array { items } => {
            collect_element_targets(items, by_name, &mut Vec::new(), &mut targets);
        }
        SchemaNode::Union { variants } => {
            for variant in variants {
                if let SchemaNode::Array { items } = variant.base() {
                    collect_element_targets(items, by_name, &mut Vec::new(), &mut targets);
                }
            }
        }
        _ => {}
    }

    let mut seen = HashSet::new();
    targets.retain(|t| seen.insert(t.clone()));
    targets
}

/// Resolves an array-element node to registered schema names, expanding
/// alias schemas (whose root is itself a reference or union) transitively.
/// `path` holds the schema names currently being expanded; a name already
/// on the path stops the descent and still counts as a target, so
/// recursive schemas get their self-edge without looping forever.
fn collect_element_targets(
    node: &SchemaNode,
    by_name: &HashMap<&str, &SchemaDefinition>,
    path: &mut Vec<String>,
    out: &mut Vec<String>,
) {
    match node.base() {
        SchemaNode::Reference { schema } => {
            if path.iter().any(|p| p == schema) {
                out.push(schema.clone());
                return;
            }
            match by_name.get(schema.as_str()) {
                None => {
                    debug!("Array element references unregistered schema '{}'", schema);
                }
                Some(definition) => match definition.root.base() {
                    SchemaNode::Object { .. } => out.push(schema.clone()),
                    alias_root => {
                        path.push(schema.clone());
                        collect_element_targets(alias_root, by_name, path, out);
                        path.pop();
                    }
                },
            }
        }
        SchemaNode::Union { variants } => {
            for variant in variants {
                collect_element_targets(variant, by_name, path, out);
            }
        }
        // Plain-value elements carry no relationship.
        _ => {}
    }
}

/// The parent-schema names declared by a back-reference field: an array of
/// enum options, string literals, or a union of those.
fn back_reference_parents(node: &SchemaNode) -> Vec<String> {
    let SchemaNode::Array { items } = node.base() else {
        return Vec::new();
    };
    let mut names = Vec::new();
    collect_name_values(items, &mut names);

    let mut seen = HashSet::new();
    names.retain(|n| seen.insert(n.clone()));
    names
}

fn collect_name_values(node: &SchemaNode, out: &mut Vec<String>) {
    match node.base() {
        SchemaNode::Enum { options } => out.extend(options.iter().cloned()),
        SchemaNode::Literal {
            value: Value::String(name),
        } => out.push(name.clone()),
        SchemaNode::Union { variants } => {
            for variant in variants {
                collect_name_values(variant, out);
            }
        }
        _ => {}
    }
}
