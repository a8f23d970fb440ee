//! The array-of-typed-item editor: add/remove/reorder over one property of
//! one parent schema that the registry knows to be a containment array.
//!
//! Owns its item array (top-level collections are not nested inside any
//! instance) and reports the whole new array to the change sink after
//! every successful mutation.

use log::warn;
use serde_json::Value;

use crate::editor::instance::move_item;
use crate::editor::object_editor::{ChildView, NodeView, ObjectEditor};
use crate::editor::{ChangeSink, EditorError};
use crate::schema::{Cardinality, RelationshipKind, SchemaRegistry};

pub struct ArrayEditor<'r> {
    registry: &'r SchemaRegistry,
    parent_schema: String,
    property_name: String,
    /// Every schema declared as a containment target for this property,
    /// in declaration order
    valid_targets: Vec<String>,
    /// The first declared target; used for untagged items and plain
    /// appends
    nominal: String,
    items: Vec<Value>,
    sink: Option<Box<dyn ChangeSink>>,
}

impl<'r> std::fmt::Debug for ArrayEditor<'r> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArrayEditor")
            .field("parent_schema", &self.parent_schema)
            .field("property_name", &self.property_name)
            .field("valid_targets", &self.valid_targets)
            .field("nominal", &self.nominal)
            .field("items", &self.items)
            .finish()
    }
}

impl<'r> ArrayEditor<'r> {
    /// Binds an editor to the `parent_schema.property_name` containment
    /// edge. Fails when the registry knows no contains/many relationship
    /// for that property.
    pub fn new(
        registry: &'r SchemaRegistry,
        parent_schema: &str,
        property_name: &str,
        items: Vec<Value>,
    ) -> Result<Self, EditorError> {
        let valid_targets: Vec<String> = registry
            .relationships(parent_schema)
            .iter()
            .filter(|r| {
                r.kind == RelationshipKind::Contains
                    && r.cardinality == Cardinality::Many
                    && r.property_name == property_name
            })
            .map(|r| r.target_schema.clone())
            .collect();
        let Some(nominal) = valid_targets.first().cloned() else {
            return Err(EditorError::NotAContainment {
                schema: parent_schema.to_string(),
                property: property_name.to_string(),
            });
        };
        Ok(Self {
            registry,
            parent_schema: parent_schema.to_string(),
            property_name: property_name.to_string(),
            valid_targets,
            nominal,
            items,
            sink: None,
        })
    }

    pub fn with_sink(mut self, sink: Box<dyn ChangeSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn parent_schema(&self) -> &str {
        &self.parent_schema
    }

    pub fn property_name(&self) -> &str {
        &self.property_name
    }

    /// The item schema used when an item carries no usable type tag.
    pub fn nominal_item_schema(&self) -> &str {
        &self.nominal
    }

    pub fn items(&self) -> &[Value] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn into_items(self) -> Vec<Value> {
        self.items
    }

    /// The effective schema of one item: its detected type when that type
    /// is a valid target for this property, else the nominal type.
    pub fn item_schema(&self, item: &Value) -> String {
        match self.registry.detect_type(item) {
            Some(detected) if self.valid_targets.contains(&detected) => detected,
            Some(detected) => {
                warn!(
                    "Item type '{}' is not a valid target for {}.{}; using '{}'",
                    detected, self.parent_schema, self.property_name, self.nominal
                );
                self.nominal.clone()
            }
            None => self.nominal.clone(),
        }
    }

    /// Appends a fresh default instance of the nominal item schema and
    /// returns its index.
    pub fn append(&mut self) -> Result<usize, EditorError> {
        let nominal = self.nominal.clone();
        self.append_of(&nominal)
    }

    /// Appends a fresh default instance of any valid target schema.
    pub fn append_of(&mut self, schema_name: &str) -> Result<usize, EditorError> {
        if !self.valid_targets.iter().any(|t| t == schema_name) {
            return Err(EditorError::IllegalChildType {
                parent: self.parent_schema.clone(),
                child: schema_name.to_string(),
            });
        }
        let item = self.registry.default_instance(schema_name).ok_or_else(|| {
            EditorError::IllegalChildType {
                parent: self.parent_schema.clone(),
                child: schema_name.to_string(),
            }
        })?;
        self.items.push(item);
        self.notify();
        Ok(self.items.len() - 1)
    }

    pub fn remove(&mut self, index: usize) -> Result<Value, EditorError> {
        let len = self.items.len();
        if index >= len {
            return Err(EditorError::IndexOutOfBounds { index, len });
        }
        let removed = self.items.remove(index);
        self.notify();
        Ok(removed)
    }

    /// Replaces the item at `index` wholesale.
    pub fn update(&mut self, index: usize, item: Value) -> Result<(), EditorError> {
        let len = self.items.len();
        if index >= len {
            return Err(EditorError::IndexOutOfBounds { index, len });
        }
        self.items[index] = item;
        self.notify();
        Ok(())
    }

    /// Moves the item at `from` to position `to`, leaving every other
    /// item's relative order unchanged.
    pub fn reorder(&mut self, from: usize, to: usize) -> Result<(), EditorError> {
        move_item(&mut self.items, from, to)?;
        self.notify();
        Ok(())
    }

    /// Renders every item through the recursive object editor at depth 0,
    /// with this editor's parent schema as the recursion frame.
    pub fn views(&self, editor: &ObjectEditor<'_>) -> Vec<ChildView> {
        self.items
            .iter()
            .enumerate()
            .map(|(index, item)| ChildView {
                index,
                view: editor.view_under_parent(item, 0, &self.parent_schema),
            })
            .collect()
    }

    /// Renders one item; `None` when the item is an untagged payload.
    pub fn item_view(&self, editor: &ObjectEditor<'_>, index: usize) -> Option<NodeView> {
        self.items
            .get(index)
            .and_then(|item| editor.view_under_parent(item, 0, &self.parent_schema))
    }

    fn notify(&mut self) {
        if let Some(sink) = self.sink.as_mut() {
            sink.items_changed(&self.items);
        }
    }
}
