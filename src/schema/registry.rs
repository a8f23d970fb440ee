//! The schema registry: a closed, pre-populated lookup from schema name to
//! everything the editor needs to know about it.
//!
//! Built exactly once per process from the full schema set; read-only
//! afterward. Callers degrade gracefully on unknown names (schema sets
//! evolve, and stale documents outlive the schemas that produced them), so
//! every query returns an empty result rather than failing.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, NaiveDate};
use log::{debug, warn};
use once_cell::sync::{Lazy, OnceCell};
use regex::Regex;
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::config::RegistryConfig;
use crate::schema::discover::discover;
use crate::schema::introspect;
use crate::schema::types::{
    FieldValidation, PropertyDefinition, RelationshipKind, SchemaDefinition, SchemaError,
    SchemaRelationship, ValueKind,
};

static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap());
static URL_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^https?://\S+$").unwrap());

static GLOBAL_REGISTRY: OnceCell<SchemaRegistry> = OnceCell::new();

/// Everything the registry knows about one schema: the definition itself,
/// its introspected field descriptions, and its discovered relationships.
#[derive(Debug, Clone)]
pub struct RegistryEntry {
    pub definition: SchemaDefinition,
    pub properties: Vec<PropertyDefinition>,
    pub relationships: Vec<SchemaRelationship>,
}

/// The long-lived schema index. Immutable after construction; if the
/// schema set ever changes, rebuild the whole registry rather than
/// patching it, since inverse-edge discovery depends on having seen every
/// schema's back-references.
pub struct SchemaRegistry {
    entries: HashMap<String, RegistryEntry>,
    order: Vec<String>,
    config: RegistryConfig,
}

impl SchemaRegistry {
    pub fn build(schemas: Vec<SchemaDefinition>) -> Self {
        Self::build_with_config(schemas, RegistryConfig::default())
    }

    pub fn build_with_config(schemas: Vec<SchemaDefinition>, config: RegistryConfig) -> Self {
        let mut relationships = discover(&schemas, &config);
        let mut entries = HashMap::new();
        let mut order = Vec::new();
        for definition in schemas {
            let name = definition.name.clone();
            let entry = RegistryEntry {
                properties: introspect::fields(&definition),
                relationships: relationships.remove(&name).unwrap_or_default(),
                definition,
            };
            if entries.insert(name.clone(), entry).is_some() {
                warn!("Duplicate schema '{}' replaces the earlier registration", name);
            } else {
                order.push(name);
            }
        }
        Self {
            entries,
            order,
            config,
        }
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    pub fn contains(&self, schema_name: &str) -> bool {
        self.entries.contains_key(schema_name)
    }

    pub fn definition(&self, schema_name: &str) -> Option<&SchemaDefinition> {
        self.entries.get(schema_name).map(|e| &e.definition)
    }

    /// The schema names this schema may add as children, in declaration
    /// order. Empty for unknown names.
    pub fn addable_children(&self, schema_name: &str) -> Vec<String> {
        let Some(entry) = self.entries.get(schema_name) else {
            debug!("addable_children: unknown schema '{}'", schema_name);
            return Vec::new();
        };
        let mut seen = HashSet::new();
        entry
            .relationships
            .iter()
            .filter(|r| r.kind == RelationshipKind::Contains && r.can_create)
            .map(|r| r.target_schema.clone())
            .filter(|t| seen.insert(t.clone()))
            .collect()
    }

    /// The field descriptions of a schema. Empty for unknown names.
    pub fn property_definitions(&self, schema_name: &str) -> Vec<PropertyDefinition> {
        match self.entries.get(schema_name) {
            Some(entry) => entry.properties.clone(),
            None => {
                debug!("property_definitions: unknown schema '{}'", schema_name);
                Vec::new()
            }
        }
    }

    /// The discovered relationships of a schema. Empty for unknown names.
    pub fn relationships(&self, schema_name: &str) -> Vec<SchemaRelationship> {
        match self.entries.get(schema_name) {
            Some(entry) => entry.relationships.clone(),
            None => {
                debug!("relationships: unknown schema '{}'", schema_name);
                Vec::new()
            }
        }
    }

    /// Every registered schema name, in registration order.
    pub fn all_schema_names(&self) -> Vec<String> {
        self.order.clone()
    }

    /// Schemas that never appear as a containment target anywhere: the
    /// natural top-level entry points for authoring.
    pub fn root_schema_names(&self) -> Vec<String> {
        let mut contained = HashSet::new();
        for entry in self.entries.values() {
            for relationship in &entry.relationships {
                if relationship.kind == RelationshipKind::Contains {
                    contained.insert(relationship.target_schema.as_str());
                }
            }
        }
        self.order
            .iter()
            .filter(|name| !contained.contains(name.as_str()))
            .cloned()
            .collect()
    }

    /// Builds a fresh instance of a schema: a unique id, the type tag, any
    /// declared field defaults, and an empty children array when (and only
    /// when) the schema declares a `children` field. `None` for unknown
    /// names.
    pub fn default_instance(&self, schema_name: &str) -> Option<Value> {
        let Some(entry) = self.entries.get(schema_name) else {
            warn!("default_instance: unknown schema '{}'", schema_name);
            return None;
        };
        let mut object = Map::new();
        object.insert(
            self.config.id_field.clone(),
            Value::String(Uuid::new_v4().to_string()),
        );
        object.insert(
            self.config.type_tag_field.clone(),
            Value::String(schema_name.to_string()),
        );
        if let Some(fields) = entry.definition.object_fields() {
            for field in fields {
                let (_, modifiers) = field.node.base_with_modifiers();
                if let Some(default) = modifiers.default {
                    object.insert(field.name.clone(), default);
                }
            }
        }
        let declares_children = entry
            .properties
            .iter()
            .any(|p| p.name == self.config.children_field);
        if declares_children && !object.contains_key(&self.config.children_field) {
            object.insert(self.config.children_field.clone(), Value::Array(Vec::new()));
        }
        Some(Value::Object(object))
    }

    /// Reads the explicit type tag off an instance and returns it when it
    /// names a registered schema.
    ///
    /// A missing tag usually means the object is a plain configuration
    /// payload rather than an authored instance; a present but
    /// unregistered tag means the document outlived its schema. Both are
    /// data-quality signals, logged distinctly, never errors.
    pub fn detect_type(&self, instance: &Value) -> Option<String> {
        match instance
            .get(&self.config.type_tag_field)
            .and_then(Value::as_str)
        {
            None => {
                debug!(
                    "Instance carries no '{}' tag; treating as a configuration payload",
                    self.config.type_tag_field
                );
                None
            }
            Some(tag) if self.entries.contains_key(tag) => Some(tag.to_string()),
            Some(tag) => {
                warn!("Instance tag '{}' does not name a registered schema", tag);
                None
            }
        }
    }

    /// Checks a value against a field's declared constraints, reporting
    /// the first failure. Advisory only; the editor keeps invalid values
    /// and the surrounding application enforces at submit time.
    pub fn validate_field(
        &self,
        property: &PropertyDefinition,
        value: &Value,
    ) -> FieldValidation {
        let label = property.display_title();
        let empty = matches!(value, Value::Null)
            || value.as_str().is_some_and(str::is_empty)
            || value.as_array().is_some_and(Vec::is_empty);
        if empty {
            if property.required {
                return FieldValidation::invalid(format!("{label} is required"));
            }
            return FieldValidation::valid();
        }

        match property.value_kind {
            ValueKind::String => self.validate_string(property, value, label),
            ValueKind::Enum => match value.as_str() {
                Some(text) if property.options.iter().any(|o| o == text) => {
                    FieldValidation::valid()
                }
                Some(text) => FieldValidation::invalid(format!(
                    "{label} must be one of [{}], got '{text}'",
                    property.options.join(", ")
                )),
                None => FieldValidation::invalid(format!("{label} must be a string")),
            },
            ValueKind::Number => match value.as_f64() {
                Some(number) => {
                    if let Some(min) = property.constraints.min {
                        if number < min {
                            return FieldValidation::invalid(format!(
                                "{label} must be at least {min}"
                            ));
                        }
                    }
                    if let Some(max) = property.constraints.max {
                        if number > max {
                            return FieldValidation::invalid(format!(
                                "{label} must be at most {max}"
                            ));
                        }
                    }
                    FieldValidation::valid()
                }
                None => FieldValidation::invalid(format!("{label} must be a number")),
            },
            ValueKind::Boolean => {
                if value.is_boolean() {
                    FieldValidation::valid()
                } else {
                    FieldValidation::invalid(format!("{label} must be a boolean"))
                }
            }
            ValueKind::Date => match value.as_str() {
                Some(text)
                    if NaiveDate::parse_from_str(text, "%Y-%m-%d").is_ok()
                        || DateTime::parse_from_rfc3339(text).is_ok() =>
                {
                    FieldValidation::valid()
                }
                _ => FieldValidation::invalid(format!("{label} must be a valid date")),
            },
            ValueKind::Array => {
                if value.is_array() {
                    FieldValidation::valid()
                } else {
                    FieldValidation::invalid(format!("{label} must be an array"))
                }
            }
            ValueKind::NestedObject => {
                if value.is_object() {
                    FieldValidation::valid()
                } else {
                    FieldValidation::invalid(format!("{label} must be an object"))
                }
            }
            ValueKind::Literal => FieldValidation::valid(),
        }
    }

    fn validate_string(
        &self,
        property: &PropertyDefinition,
        value: &Value,
        label: &str,
    ) -> FieldValidation {
        let Some(text) = value.as_str() else {
            return FieldValidation::invalid(format!("{label} must be a string"));
        };
        let constraints = &property.constraints;
        let length = text.chars().count();
        if let Some(min) = constraints.min_length {
            if length < min {
                return FieldValidation::invalid(format!(
                    "{label} must be at least {min} characters"
                ));
            }
        }
        if let Some(max) = constraints.max_length {
            if length > max {
                return FieldValidation::invalid(format!(
                    "{label} must be at most {max} characters"
                ));
            }
        }
        if let Some(pattern) = &constraints.pattern {
            match Regex::new(pattern) {
                Ok(regex) => {
                    if !regex.is_match(text) {
                        return FieldValidation::invalid(format!(
                            "{label} does not match the required pattern"
                        ));
                    }
                }
                // An unparseable authored pattern is that field's failure,
                // never a crash.
                Err(error) => {
                    return FieldValidation::invalid(format!(
                        "{label} has an invalid pattern constraint: {error}"
                    ));
                }
            }
        }
        match constraints.format {
            Some(crate::schema::types::StringFormat::Email) => {
                if !EMAIL_PATTERN.is_match(text) {
                    return FieldValidation::invalid(format!(
                        "{label} must be a valid email address"
                    ));
                }
            }
            Some(crate::schema::types::StringFormat::Url) => {
                if !URL_PATTERN.is_match(text) {
                    return FieldValidation::invalid(format!("{label} must be a valid URL"));
                }
            }
            None => {}
        }
        FieldValidation::valid()
    }
}

/// Installs the process-wide registry. Fails if one is already installed:
/// partial or repeated registration is not supported; rebuild wholesale
/// and restart instead.
pub fn install_global(registry: SchemaRegistry) -> Result<(), SchemaError> {
    GLOBAL_REGISTRY.set(registry).map_err(|_| {
        SchemaError::InvalidData("Global schema registry is already installed".to_string())
    })
}

/// The process-wide registry, if one has been installed.
pub fn global() -> Option<&'static SchemaRegistry> {
    GLOBAL_REGISTRY.get()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::types::{ObjectField, SchemaNode, StringConstraints, StringFormat, WidgetKind};
    use serde_json::json;

    fn build_registry() -> SchemaRegistry {
        SchemaRegistry::build(vec![
            SchemaDefinition::new(
                "Group",
                SchemaNode::object(vec![
                    ObjectField::new("name", SchemaNode::string()),
                    ObjectField::new(
                        "children",
                        SchemaNode::array(SchemaNode::union(vec![
                            SchemaNode::reference("Group"),
                            SchemaNode::reference("Task"),
                        ])),
                    ),
                ]),
            ),
            SchemaDefinition::new(
                "Task",
                SchemaNode::object(vec![
                    ObjectField::new("title", SchemaNode::string()),
                    ObjectField::new(
                        "ordinal",
                        SchemaNode::number().with_default(json!(0)),
                    ),
                    ObjectField::new(
                        "children",
                        SchemaNode::array(SchemaNode::reference("Field")),
                    ),
                ]),
            ),
            SchemaDefinition::new(
                "Field",
                SchemaNode::object(vec![ObjectField::new("type", SchemaNode::string())]),
            ),
        ])
    }

    #[test]
    fn test_addable_children() {
        let registry = build_registry();
        assert_eq!(registry.addable_children("Group"), vec!["Group", "Task"]);
        assert_eq!(registry.addable_children("Task"), vec!["Field"]);
        assert!(registry.addable_children("Field").is_empty());
        assert!(registry.addable_children("Missing").is_empty());
    }

    #[test]
    fn test_root_schema_names() {
        let mut schemas = vec![SchemaDefinition::new(
            "Sop",
            SchemaNode::object(vec![ObjectField::new(
                "taskgroups",
                SchemaNode::array(SchemaNode::reference("Group")),
            )]),
        )];
        schemas.extend([
            SchemaDefinition::new(
                "Group",
                SchemaNode::object(vec![ObjectField::new(
                    "children",
                    SchemaNode::array(SchemaNode::reference("Task")),
                )]),
            ),
            SchemaDefinition::new("Task", SchemaNode::object(vec![])),
        ]);
        let registry = SchemaRegistry::build(schemas);
        assert_eq!(registry.root_schema_names(), vec!["Sop"]);
    }

    #[test]
    fn test_default_instance_shape() {
        let registry = build_registry();
        let instance = registry.default_instance("Task").unwrap();
        assert!(instance["id"].as_str().is_some());
        assert_eq!(instance["@type"], json!("Task"));
        assert_eq!(instance["children"], json!([]));
        assert_eq!(instance["ordinal"], json!(0));

        let field = registry.default_instance("Field").unwrap();
        assert!(field.get("children").is_none());
    }

    #[test]
    fn test_default_instance_ids_are_unique() {
        let registry = build_registry();
        let a = registry.default_instance("Field").unwrap();
        let b = registry.default_instance("Field").unwrap();
        assert_ne!(a["id"], b["id"]);
    }

    #[test]
    fn test_detect_type_round_trips_default_instance() {
        let registry = build_registry();
        let instance = registry.default_instance("Group").unwrap();
        assert_eq!(registry.detect_type(&instance).as_deref(), Some("Group"));
    }

    #[test]
    fn test_detect_type_missing_and_stale_tags() {
        let registry = build_registry();
        assert_eq!(registry.detect_type(&json!({"filename_component": true})), None);
        assert_eq!(registry.detect_type(&json!({"@type": "Retired"})), None);
    }

    #[test]
    fn test_unknown_schema_degrades_to_empty() {
        let registry = build_registry();
        assert!(registry.property_definitions("Missing").is_empty());
        assert!(registry.relationships("Missing").is_empty());
        assert!(registry.default_instance("Missing").is_none());
    }

    fn string_property(constraints: StringConstraints, required: bool) -> PropertyDefinition {
        let definition = SchemaDefinition::new(
            "Sample",
            SchemaNode::object(vec![ObjectField::new(
                "value",
                if required {
                    SchemaNode::string_with(constraints)
                } else {
                    SchemaNode::string_with(constraints).optional()
                },
            )]),
        );
        crate::schema::introspect::fields(&definition).remove(0)
    }

    #[test]
    fn test_validate_field_required() {
        let registry = build_registry();
        let property = string_property(StringConstraints::default(), true);
        let result = registry.validate_field(&property, &json!(""));
        assert!(!result.is_ok());
        assert!(result.message.unwrap().contains("required"));
    }

    #[test]
    fn test_validate_field_optional_empty_is_valid() {
        let registry = build_registry();
        let property = string_property(StringConstraints::default(), false);
        assert!(registry.validate_field(&property, &Value::Null).is_ok());
    }

    #[test]
    fn test_validate_field_length_and_pattern() {
        let registry = build_registry();
        let property = string_property(
            StringConstraints {
                min_length: Some(3),
                pattern: Some("^[a-z]+$".to_string()),
                ..StringConstraints::default()
            },
            true,
        );
        assert!(!registry.validate_field(&property, &json!("ab")).is_ok());
        assert!(!registry.validate_field(&property, &json!("ABCD")).is_ok());
        assert!(registry.validate_field(&property, &json!("abcd")).is_ok());
    }

    #[test]
    fn test_validate_field_email() {
        let registry = build_registry();
        let property = string_property(
            StringConstraints {
                format: Some(StringFormat::Email),
                ..StringConstraints::default()
            },
            true,
        );
        assert_eq!(property.widget, WidgetKind::EmailInput);
        assert!(registry.validate_field(&property, &json!("kim@pwbio.ai")).is_ok());
        assert!(!registry.validate_field(&property, &json!("not-an-email")).is_ok());
    }

    #[test]
    fn test_validate_field_bad_pattern_reports_instead_of_panicking() {
        let registry = build_registry();
        let property = string_property(
            StringConstraints {
                pattern: Some("([unclosed".to_string()),
                ..StringConstraints::default()
            },
            true,
        );
        let result = registry.validate_field(&property, &json!("anything"));
        assert!(!result.is_ok());
        assert!(result.message.unwrap().contains("pattern"));
    }

    #[test]
    fn test_validate_field_number_range() {
        let registry = build_registry();
        let definition = SchemaDefinition::new(
            "Sample",
            SchemaNode::object(vec![ObjectField::new(
                "ordinal",
                SchemaNode::number_with(crate::schema::types::NumberConstraints {
                    min: Some(0.0),
                    max: Some(10.0),
                }),
            )]),
        );
        let property = crate::schema::introspect::fields(&definition).remove(0);
        assert!(registry.validate_field(&property, &json!(5)).is_ok());
        assert!(!registry.validate_field(&property, &json!(-1)).is_ok());
        assert!(!registry.validate_field(&property, &json!(11)).is_ok());
        assert!(!registry.validate_field(&property, &json!("five")).is_ok());
    }

    #[test]
    fn test_validate_field_date() {
        let registry = build_registry();
        let definition = SchemaDefinition::new(
            "Sample",
            SchemaNode::object(vec![ObjectField::new("due", SchemaNode::date())]),
        );
        let property = crate::schema::introspect::fields(&definition).remove(0);
        assert!(registry.validate_field(&property, &json!("2025-03-14")).is_ok());
        assert!(registry
            .validate_field(&property, &json!("2025-03-14T09:30:00Z"))
            .is_ok());
        assert!(!registry.validate_field(&property, &json!("yesterday")).is_ok());
    }
}
