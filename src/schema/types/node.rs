use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Constraints declared on a string-shaped node.
///
/// Surfaced verbatim through introspection; enforcement happens in
/// `SchemaRegistry::validate_field`, never here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StringConstraints {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<StringFormat>,
}

/// Well-known string formats that imply a specialized input widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StringFormat {
    Email,
    Url,
}

/// Constraints declared on a number-shaped node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NumberConstraints {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
}

/// One declared field of an object-shaped node.
///
/// Fields are kept as an ordered list, not a map: declaration order is the
/// order the editor presents properties in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectField {
    pub name: String,
    pub node: SchemaNode,
}

impl ObjectField {
    pub fn new(name: &str, node: SchemaNode) -> Self {
        Self {
            name: name.to_string(),
            node,
        }
    }
}

/// The type structure of a schema.
///
/// Schemas compose from these nodes the way the authoring tool composes
/// them: plain value kinds, arrays, unions, object shapes, named references
/// (the lazy indirection that makes recursive schemas expressible), and the
/// optional/nullable/default wrappers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SchemaNode {
    String {
        #[serde(default)]
        constraints: StringConstraints,
    },
    Number {
        #[serde(default)]
        constraints: NumberConstraints,
    },
    Boolean,
    Date,
    /// A fixed JSON value
    Literal { value: Value },
    /// A closed set of string options
    Enum { options: Vec<String> },
    Array { items: Box<SchemaNode> },
    Union { variants: Vec<SchemaNode> },
    Object { fields: Vec<ObjectField> },
    /// A deferred reference to a registered schema, by name
    Reference { schema: String },
    Optional { inner: Box<SchemaNode> },
    Nullable { inner: Box<SchemaNode> },
    WithDefault {
        inner: Box<SchemaNode>,
        default: Value,
    },
}

/// Wrappers peeled off a node by `base_with_modifiers`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Modifiers {
    pub optional: bool,
    pub nullable: bool,
    pub default: Option<Value>,
}

impl SchemaNode {
    /// Peels optional/nullable/default wrappers down to the base node,
    /// reporting which wrappers were present. The outermost declared
    /// default wins when wrappers nest.
    pub fn base_with_modifiers(&self) -> (&Self, Modifiers) {
        let mut node = self;
        let mut modifiers = Modifiers::default();
        loop {
            match node {
                Self::Optional { inner } => {
                    modifiers.optional = true;
                    node = inner;
                }
                Self::Nullable { inner } => {
                    modifiers.nullable = true;
                    node = inner;
                }
                Self::WithDefault { inner, default } => {
                    if modifiers.default.is_none() {
                        modifiers.default = Some(default.clone());
                    }
                    node = inner;
                }
                _ => return (node, modifiers),
            }
        }
    }

    /// The base node with all wrappers peeled.
    pub fn base(&self) -> &Self {
        self.base_with_modifiers().0
    }

    pub fn string() -> Self {
        Self::String {
            constraints: StringConstraints::default(),
        }
    }

    pub fn string_with(constraints: StringConstraints) -> Self {
        Self::String { constraints }
    }

    pub fn number() -> Self {
        Self::Number {
            constraints: NumberConstraints::default(),
        }
    }

    pub fn number_with(constraints: NumberConstraints) -> Self {
        Self::Number { constraints }
    }

    pub fn boolean() -> Self {
        Self::Boolean
    }

    pub fn date() -> Self {
        Self::Date
    }

    pub fn literal(value: Value) -> Self {
        Self::Literal { value }
    }

    pub fn enumeration(options: &[&str]) -> Self {
        Self::Enum {
            options: options.iter().map(|o| o.to_string()).collect(),
        }
    }

    pub fn array(items: Self) -> Self {
        Self::Array {
            items: Box::new(items),
        }
    }

    pub fn union(variants: Vec<Self>) -> Self {
        Self::Union { variants }
    }

    pub fn object(fields: Vec<ObjectField>) -> Self {
        Self::Object { fields }
    }

    pub fn reference(schema: &str) -> Self {
        Self::Reference {
            schema: schema.to_string(),
        }
    }

    pub fn optional(self) -> Self {
        Self::Optional {
            inner: Box::new(self),
        }
    }

    pub fn nullable(self) -> Self {
        Self::Nullable {
            inner: Box::new(self),
        }
    }

    pub fn with_default(self, default: Value) -> Self {
        Self::WithDefault {
            inner: Box::new(self),
            default,
        }
    }
}
