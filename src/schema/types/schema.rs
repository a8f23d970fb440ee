use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::schema::types::node::{ObjectField, SchemaNode};
use crate::schema::types::property::WidgetKind;

/// Author-supplied editing hints for one field.
///
/// Absence of a hint (or of any individual hint attribute) is not an
/// error; the introspector falls back to structural inference.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UiHint {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub widget: Option<WidgetKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
}

/// One registered schema: a unique name, the type structure, and the
/// optional sidecar of author-supplied UI hints keyed by field name.
///
/// Definitions are constructed once at process start and are immutable
/// thereafter. Containment relationships are derived by the discoverer and
/// bundled into the registry entry, never stored here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaDefinition {
    pub name: String,
    pub root: SchemaNode,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub ui_hints: HashMap<String, UiHint>,
    /// Whether the editor presents instances of this schema collapsed
    #[serde(default)]
    pub start_collapsed: bool,
}

impl SchemaDefinition {
    pub fn new(name: &str, root: SchemaNode) -> Self {
        Self {
            name: name.to_string(),
            root,
            ui_hints: HashMap::new(),
            start_collapsed: false,
        }
    }

    pub fn with_ui_hint(mut self, field_name: &str, hint: UiHint) -> Self {
        self.ui_hints.insert(field_name.to_string(), hint);
        self
    }

    pub fn with_start_collapsed(mut self, start_collapsed: bool) -> Self {
        self.start_collapsed = start_collapsed;
        self
    }

    /// The declared fields of an object-shaped schema, in declaration
    /// order. `None` when the root (after unwrapping) is not an object;
    /// alias schemas have no fields of their own.
    pub fn object_fields(&self) -> Option<&[ObjectField]> {
        match self.root.base() {
            SchemaNode::Object { fields } => Some(fields),
            _ => None,
        }
    }
}
