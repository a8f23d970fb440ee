use serde::{Deserialize, Serialize};

use crate::constants;

/// Configuration for a schema registry instance.
///
/// Names the reserved fields of an authored instance. Saved documents from
/// older deployments carried different tag names, so these are configurable
/// rather than hard-coded; every field has a sensible default and a config
/// deserialized from an empty object is equivalent to `Default::default()`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Field holding an instance's unique id
    #[serde(default = "default_id_field")]
    pub id_field: String,
    /// Field naming the schema an instance was built from
    #[serde(default = "default_type_tag_field")]
    pub type_tag_field: String,
    /// Field holding an instance's nested child instances
    #[serde(default = "default_children_field")]
    pub children_field: String,
    /// Field on a child schema naming the schemas allowed to contain it
    #[serde(default = "default_back_reference_field")]
    pub back_reference_field: String,
}

fn default_id_field() -> String {
    constants::DEFAULT_ID_FIELD.to_string()
}

fn default_type_tag_field() -> String {
    constants::DEFAULT_TYPE_TAG_FIELD.to_string()
}

fn default_children_field() -> String {
    constants::DEFAULT_CHILDREN_FIELD.to_string()
}

fn default_back_reference_field() -> String {
    constants::DEFAULT_BACK_REFERENCE_FIELD.to_string()
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            id_field: default_id_field(),
            type_tag_field: default_type_tag_field(),
            children_field: default_children_field(),
            back_reference_field: default_back_reference_field(),
        }
    }
}
