//! Property introspection: deriving field-level editing metadata from a
//! schema's own structure plus the optional author-supplied hint sidecar.
//!
//! Pure functions of the definition; no side effects and no validation.

use crate::schema::types::{
    FieldConstraints, ObjectField, PropertyDefinition, SchemaDefinition, SchemaNode, StringFormat,
    ValueKind, WidgetKind,
};

/// Strings this long or longer get a textarea instead of a one-line input.
const TEXTAREA_MIN_LENGTH: usize = 120;

/// Produces the field descriptions of an object-shaped schema, in
/// declaration order. Empty for alias schemas, which have no fields of
/// their own.
pub fn fields(definition: &SchemaDefinition) -> Vec<PropertyDefinition> {
    let Some(object_fields) = definition.object_fields() else {
        return Vec::new();
    };
    object_fields
        .iter()
        .map(|field| property_for(definition, field))
        .collect()
}

fn property_for(definition: &SchemaDefinition, field: &ObjectField) -> PropertyDefinition {
    let (base, modifiers) = field.node.base_with_modifiers();
    let hint = definition.ui_hints.get(&field.name);

    let shape = classify(base);
    let widget = hint.and_then(|h| h.widget).unwrap_or(shape.widget);
    let required = hint
        .and_then(|h| h.required)
        .unwrap_or(!(modifiers.optional || modifiers.default.is_some()));
    let options = hint
        .and_then(|h| h.options.clone())
        .unwrap_or(shape.options);

    PropertyDefinition {
        name: field.name.clone(),
        value_kind: shape.value_kind,
        widget,
        title: hint.and_then(|h| h.title.clone()),
        description: hint.and_then(|h| h.description.clone()),
        required,
        options,
        constraints: shape.constraints,
    }
}

struct Shape {
    value_kind: ValueKind,
    widget: WidgetKind,
    options: Vec<String>,
    constraints: FieldConstraints,
}

impl Shape {
    fn plain(value_kind: ValueKind, widget: WidgetKind) -> Self {
        Self {
            value_kind,
            widget,
            options: Vec::new(),
            constraints: FieldConstraints::default(),
        }
    }
}

/// Structural widget inference for a base (unwrapped) node.
fn classify(node: &SchemaNode) -> Shape {
    match node {
        SchemaNode::String { constraints } => {
            let widget = match constraints.format {
                Some(StringFormat::Email) => WidgetKind::EmailInput,
                Some(StringFormat::Url) => WidgetKind::UrlInput,
                None => {
                    if constraints
                        .max_length
                        .is_some_and(|max| max >= TEXTAREA_MIN_LENGTH)
                    {
                        WidgetKind::Textarea
                    } else {
                        WidgetKind::Input
                    }
                }
            };
            Shape {
                value_kind: ValueKind::String,
                widget,
                options: Vec::new(),
                constraints: FieldConstraints {
                    min_length: constraints.min_length,
                    max_length: constraints.max_length,
                    pattern: constraints.pattern.clone(),
                    format: constraints.format,
                    ..FieldConstraints::default()
                },
            }
        }
        SchemaNode::Number { constraints } => Shape {
            value_kind: ValueKind::Number,
            widget: WidgetKind::NumberInput,
            options: Vec::new(),
            constraints: FieldConstraints {
                min: constraints.min,
                max: constraints.max,
                ..FieldConstraints::default()
            },
        },
        SchemaNode::Boolean => Shape::plain(ValueKind::Boolean, WidgetKind::Checkbox),
        SchemaNode::Date => Shape::plain(ValueKind::Date, WidgetKind::DatePicker),
        SchemaNode::Enum { options } => Shape {
            value_kind: ValueKind::Enum,
            widget: WidgetKind::Select,
            options: options.clone(),
            constraints: FieldConstraints::default(),
        },
        // Safe default for element arrays; containment arrays are excluded
        // from the properties panel before rendering.
        SchemaNode::Array { .. } => Shape::plain(ValueKind::Array, WidgetKind::TagInput),
        SchemaNode::Object { .. } | SchemaNode::Reference { .. } => {
            Shape::plain(ValueKind::NestedObject, WidgetKind::NestedObject)
        }
        SchemaNode::Literal { .. } => Shape::plain(ValueKind::Literal, WidgetKind::Input),
        SchemaNode::Union { variants } => classify_union(variants),
        SchemaNode::Optional { inner }
        | SchemaNode::Nullable { inner }
        | SchemaNode::WithDefault { inner, .. } => classify(inner.base()),
    }
}

/// A union of string literals reads as a closed option set; anything else
/// is treated as a nested object for the editor to descend into.
fn classify_union(variants: &[SchemaNode]) -> Shape {
    let mut literals = Vec::with_capacity(variants.len());
    for variant in variants {
        match variant.base() {
            SchemaNode::Literal { value } if value.is_string() => {
                if let Some(text) = value.as_str() {
                    literals.push(text.to_string());
                }
            }
            _ => return Shape::plain(ValueKind::NestedObject, WidgetKind::NestedObject),
        }
    }
    Shape {
        value_kind: ValueKind::Enum,
        widget: WidgetKind::Select,
        options: literals,
        constraints: FieldConstraints::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::types::{StringConstraints, UiHint};
    use serde_json::json;

    fn definition_with(field: ObjectField) -> SchemaDefinition {
        SchemaDefinition::new("Sample", SchemaNode::object(vec![field]))
    }

    fn single_property(definition: &SchemaDefinition) -> PropertyDefinition {
        let mut properties = fields(definition);
        assert_eq!(properties.len(), 1);
        properties.remove(0)
    }

    #[test]
    fn test_email_constraint_infers_email_input() {
        let definition = definition_with(ObjectField::new(
            "contact",
            SchemaNode::string_with(StringConstraints {
                format: Some(StringFormat::Email),
                ..StringConstraints::default()
            }),
        ));
        let property = single_property(&definition);
        assert_eq!(property.widget, WidgetKind::EmailInput);
        assert_eq!(property.value_kind, ValueKind::String);
    }

    #[test]
    fn test_url_constraint_infers_url_input() {
        let definition = definition_with(ObjectField::new(
            "homepage",
            SchemaNode::string_with(StringConstraints {
                format: Some(StringFormat::Url),
                ..StringConstraints::default()
            }),
        ));
        assert_eq!(single_property(&definition).widget, WidgetKind::UrlInput);
    }

    #[test]
    fn test_long_string_infers_textarea() {
        let definition = definition_with(ObjectField::new(
            "notes",
            SchemaNode::string_with(StringConstraints {
                max_length: Some(500),
                ..StringConstraints::default()
            }),
        ));
        assert_eq!(single_property(&definition).widget, WidgetKind::Textarea);
    }

    #[test]
    fn test_plain_string_infers_input() {
        let definition = definition_with(ObjectField::new("name", SchemaNode::string()));
        let property = single_property(&definition);
        assert_eq!(property.widget, WidgetKind::Input);
        assert!(property.required);
    }

    #[test]
    fn test_structural_fallbacks() {
        let definition = SchemaDefinition::new(
            "Sample",
            SchemaNode::object(vec![
                ObjectField::new("done", SchemaNode::boolean()),
                ObjectField::new("count", SchemaNode::number()),
                ObjectField::new("due", SchemaNode::date()),
                ObjectField::new("unit", SchemaNode::enumeration(&["ml", "ul"])),
                ObjectField::new("tags", SchemaNode::array(SchemaNode::string())),
                ObjectField::new("meta", SchemaNode::object(vec![])),
            ]),
        );
        let widgets: Vec<WidgetKind> = fields(&definition).iter().map(|p| p.widget).collect();
        assert_eq!(
            widgets,
            vec![
                WidgetKind::Checkbox,
                WidgetKind::NumberInput,
                WidgetKind::DatePicker,
                WidgetKind::Select,
                WidgetKind::TagInput,
                WidgetKind::NestedObject,
            ]
        );
    }

    #[test]
    fn test_hint_beats_inference() {
        let definition = definition_with(ObjectField::new("name", SchemaNode::string()))
            .with_ui_hint(
                "name",
                UiHint {
                    widget: Some(WidgetKind::Textarea),
                    title: Some("Sample name".to_string()),
                    required: Some(false),
                    ..UiHint::default()
                },
            );
        let property = single_property(&definition);
        assert_eq!(property.widget, WidgetKind::Textarea);
        assert_eq!(property.display_title(), "Sample name");
        assert!(!property.required);
    }

    #[test]
    fn test_optional_and_defaulted_fields_are_not_required() {
        let definition = SchemaDefinition::new(
            "Sample",
            SchemaNode::object(vec![
                ObjectField::new("a", SchemaNode::string().optional()),
                ObjectField::new("b", SchemaNode::string().with_default(json!("x"))),
                ObjectField::new("c", SchemaNode::string().nullable()),
            ]),
        );
        let required: Vec<bool> = fields(&definition).iter().map(|p| p.required).collect();
        assert_eq!(required, vec![false, false, true]);
    }

    #[test]
    fn test_union_of_string_literals_reads_as_select() {
        let definition = definition_with(ObjectField::new(
            "status",
            SchemaNode::union(vec![
                SchemaNode::literal(json!("draft")),
                SchemaNode::literal(json!("final")),
            ]),
        ));
        let property = single_property(&definition);
        assert_eq!(property.widget, WidgetKind::Select);
        assert_eq!(property.options, vec!["draft", "final"]);
    }

    #[test]
    fn test_constraints_surface_verbatim() {
        let definition = definition_with(ObjectField::new(
            "code",
            SchemaNode::string_with(StringConstraints {
                min_length: Some(2),
                max_length: Some(8),
                pattern: Some("^[A-Z]+$".to_string()),
                format: None,
            }),
        ));
        let property = single_property(&definition);
        assert_eq!(property.constraints.min_length, Some(2));
        assert_eq!(property.constraints.max_length, Some(8));
        assert_eq!(property.constraints.pattern.as_deref(), Some("^[A-Z]+$"));
    }

    #[test]
    fn test_alias_schema_has_no_properties() {
        let definition =
            SchemaDefinition::new("Entry", SchemaNode::reference("Task"));
        assert!(fields(&definition).is_empty());
    }
}
