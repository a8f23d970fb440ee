/// Common constants used across the sopform crate.
///
/// These defaults name the reserved fields of an authored instance and are
/// used when explicit configuration is not provided.
pub const DEFAULT_ID_FIELD: &str = "id";
pub const DEFAULT_TYPE_TAG_FIELD: &str = "@type";
pub const DEFAULT_CHILDREN_FIELD: &str = "children";
pub const DEFAULT_BACK_REFERENCE_FIELD: &str = "parents";
