use serde::{Deserialize, Serialize};

use crate::schema::types::node::StringFormat;

/// The underlying value kind of an editable field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ValueKind {
    String,
    Number,
    Boolean,
    Date,
    Enum,
    Array,
    NestedObject,
    Literal,
}

/// The editing widget a leaf renderer should present for a field.
///
/// Serialized in kebab-case so renderers consume the same vocabulary the
/// authoring tool writes (`email-input`, `date-picker`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WidgetKind {
    Input,
    Textarea,
    EmailInput,
    UrlInput,
    NumberInput,
    Checkbox,
    Select,
    DatePicker,
    TagInput,
    NestedObject,
}

/// Validation constraints surfaced from a field's schema declaration.
///
/// Carried verbatim for the editor to display; enforcement is advisory and
/// lives in `SchemaRegistry::validate_field`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldConstraints {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<StringFormat>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
}

impl FieldConstraints {
    pub fn is_empty(&self) -> bool {
        self.min_length.is_none()
            && self.max_length.is_none()
            && self.pattern.is_none()
            && self.format.is_none()
            && self.min.is_none()
            && self.max.is_none()
    }
}

/// One editable field of a schema instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyDefinition {
    pub name: String,
    pub value_kind: ValueKind,
    pub widget: WidgetKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub required: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    #[serde(default, skip_serializing_if = "FieldConstraints::is_empty")]
    pub constraints: FieldConstraints,
}

impl PropertyDefinition {
    /// The label a renderer should show: the hinted title, else the name.
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.name)
    }
}

/// Advisory result of validating a field value.
///
/// Validation never blocks the editor from holding an invalid value;
/// enforcement happens at export/submit time in the surrounding
/// application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldValidation {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl FieldValidation {
    pub fn valid() -> Self {
        Self {
            ok: true,
            message: None,
        }
    }

    pub fn invalid(message: String) -> Self {
        Self {
            ok: false,
            message: Some(message),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.ok
    }
}
