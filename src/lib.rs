//! # sopform
//!
//! The schema registry and recursive object editor behind a forms-based
//! lab-notebook application. The authoring tool composes structured
//! procedure definitions out of declarative schemas; this crate discovers
//! which schema can legally contain which other schema, exposes per-field
//! editing metadata, detects which schema an arbitrary untyped data
//! object was built from, and drives a headless editor over arbitrarily
//! deep, partly-recursive trees of those objects.
//!
//! ## Core Components
//!
//! * `schema::introspect` - Field-level editing metadata derived from a
//!   schema's own structure plus optional author-supplied UI hints
//! * `schema::discover` - The directed graph of containment and reference
//!   edges between registered schemas
//! * `schema::registry` - The construct-once, read-only index every editor
//!   query goes through
//! * `editor` - Recursive object editor and array editor over authored
//!   instances
//! * `config` - Reserved instance field names
//! * `error` - Unified error type
//!
//! ## Architecture
//!
//! Everything flows one direction at startup: the introspector and the
//! relationship discoverer run once over the full schema set to populate
//! the registry. At edit time the editors mutate the authored tree through
//! registry lookups only - no editor ever special-cases a schema by name
//! or inspects a schema's internal shape at a call site. Persistence and
//! rendering stay outside: collaborators receive plain data
//! (`PropertyDefinition` lists, `NodeView` trees, changed-value
//! callbacks) and own everything from widgets to storage.

pub mod config;
pub mod constants;
pub mod editor;
pub mod error;
pub mod schema;

// Re-export main types for convenience
pub use config::RegistryConfig;
pub use editor::{
    ArrayEditor, ChangeSink, ChildView, EditorError, NodeView, NullSink, ObjectEditor,
    RemovalOutcome,
};
pub use error::{FormError, FormResult};
pub use schema::types::{
    Cardinality, FieldConstraints, FieldValidation, Modifiers, NumberConstraints, ObjectField,
    PropertyDefinition, RelationshipKind, SchemaDefinition, SchemaError, SchemaNode,
    SchemaRelationship, StringConstraints, StringFormat, UiHint, ValueKind, WidgetKind,
};
pub use schema::{global, install_global, RegistryEntry, SchemaRegistry};
