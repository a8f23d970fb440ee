//! The recursive object editor: a headless tree of editing views, one per
//! schema-typed node, driven entirely by registry queries.
//!
//! The editor holds per-node UI state (expanded or collapsed, keyed by
//! instance id) and mutates the instance it is handed; it never keeps an
//! authoritative copy of the data. Every successful mutation is reported
//! to the change sink, whose owner produces whatever updated copy it
//! needs.

use std::collections::HashMap;

use serde::Serialize;
use serde_json::Value;

use crate::editor::instance::{
    children, children_mut, instance_id, is_empty_value, move_item,
};
use crate::editor::{ChangeSink, EditorError};
use crate::schema::{PropertyDefinition, SchemaRegistry};

/// One rendered node of the editing tree.
///
/// A collapsed node renders only its header; properties, children and add
/// actions appear on expand.
#[derive(Debug, Clone, Serialize)]
pub struct NodeView {
    pub schema: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance_id: Option<String>,
    pub depth: usize,
    /// Whether this node's schema equals its parent frame's schema (pure
    /// recursion), so renderers can distinguish Group-in-Group from
    /// Task-in-Group.
    pub recursive: bool,
    pub collapsed: bool,
    pub properties: Vec<PropertyDefinition>,
    pub children: Vec<ChildView>,
    pub addable_children: Vec<String>,
}

/// One entry of a node's children array. `view` is `None` for untagged
/// configuration payloads, which are preserved in place but never
/// rendered as nested editors.
#[derive(Debug, Clone, Serialize)]
pub struct ChildView {
    pub index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub view: Option<NodeView>,
}

/// Outcome of a content-aware remove request.
#[derive(Debug)]
pub enum RemovalOutcome {
    Removed(Value),
    /// The child holds non-default content; nothing was mutated. Call
    /// `remove_child_confirmed` once the user has agreed. Declining is a
    /// no-op.
    ConfirmationRequired,
}

pub struct ObjectEditor<'r> {
    registry: &'r SchemaRegistry,
    expanded: HashMap<String, bool>,
    sink: Option<Box<dyn ChangeSink>>,
}

impl<'r> ObjectEditor<'r> {
    pub fn new(registry: &'r SchemaRegistry) -> Self {
        Self {
            registry,
            expanded: HashMap::new(),
            sink: None,
        }
    }

    pub fn with_sink(mut self, sink: Box<dyn ChangeSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn registry(&self) -> &'r SchemaRegistry {
        self.registry
    }

    /// Whether the node with this instance id is currently expanded,
    /// falling back to the schema's declared starting state.
    pub fn is_expanded(&self, id: &str, schema: &str) -> bool {
        match self.expanded.get(id) {
            Some(expanded) => *expanded,
            None => !self
                .registry
                .definition(schema)
                .map(|d| d.start_collapsed)
                .unwrap_or(false),
        }
    }

    pub fn expand(&mut self, id: &str) {
        self.expanded.insert(id.to_string(), true);
    }

    pub fn collapse(&mut self, id: &str) {
        self.expanded.insert(id.to_string(), false);
    }

    /// Flips the expansion state of an instance's node.
    pub fn toggle(&mut self, instance: &Value) {
        let registry = self.registry;
        let config = registry.config();
        let (Some(id), Some(schema)) = (
            instance_id(instance, config).map(str::to_string),
            registry.detect_type(instance),
        ) else {
            return;
        };
        let current = self.is_expanded(&id, &schema);
        self.expanded.insert(id, !current);
    }

    /// Builds the view of a top-level node.
    pub fn view(&self, instance: &Value, depth: usize) -> Option<NodeView> {
        self.view_in_frame(instance, depth, None)
    }

    /// Builds the view of a node whose parent frame is known, so recursion
    /// detection compares against the right schema.
    pub fn view_under_parent(
        &self,
        instance: &Value,
        depth: usize,
        parent_schema: &str,
    ) -> Option<NodeView> {
        self.view_in_frame(instance, depth, Some(parent_schema))
    }

    fn view_in_frame(
        &self,
        instance: &Value,
        depth: usize,
        parent_schema: Option<&str>,
    ) -> Option<NodeView> {
        let registry = self.registry;
        let config = registry.config();
        let schema = registry.detect_type(instance)?;
        let id = instance_id(instance, config).map(str::to_string);
        let recursive = parent_schema == Some(schema.as_str());
        let expanded = match &id {
            Some(id) => self.is_expanded(id, &schema),
            None => !registry
                .definition(&schema)
                .map(|d| d.start_collapsed)
                .unwrap_or(false),
        };

        if !expanded {
            return Some(NodeView {
                schema,
                instance_id: id,
                depth,
                recursive,
                collapsed: true,
                properties: Vec::new(),
                children: Vec::new(),
                addable_children: Vec::new(),
            });
        }

        let properties = registry
            .property_definitions(&schema)
            .into_iter()
            .filter(|p| {
                p.name != config.children_field && p.name != config.back_reference_field
            })
            .collect();

        let mut child_views = Vec::new();
        if let Some(child_instances) = children(instance, config) {
            for (index, child) in child_instances.iter().enumerate() {
                child_views.push(ChildView {
                    index,
                    view: self.view_in_frame(child, depth + 1, Some(&schema)),
                });
            }
        }

        Some(NodeView {
            addable_children: registry.addable_children(&schema),
            schema,
            instance_id: id,
            depth,
            recursive,
            collapsed: false,
            properties,
            children: child_views,
        })
    }

    /// Applies a leaf property edit and reports it to the change sink.
    /// Reserved structural fields cannot be edited through this path.
    pub fn set_field(
        &mut self,
        instance: &mut Value,
        field: &str,
        value: Value,
    ) -> Result<(), EditorError> {
        let registry = self.registry;
        let config = registry.config();
        if field == config.id_field
            || field == config.type_tag_field
            || field == config.children_field
            || field == config.back_reference_field
        {
            return Err(EditorError::ReservedField {
                field: field.to_string(),
            });
        }
        let id = instance_id(instance, config).map(str::to_string);
        let object = instance.as_object_mut().ok_or(EditorError::NotAnObject)?;
        object.insert(field.to_string(), value.clone());
        self.notify_field(id.as_deref(), field, &value);
        Ok(())
    }

    /// Appends a fresh default instance of `child_schema` to the
    /// instance's children array. Only schemas the registry reports as
    /// addable children of the instance's type are accepted.
    pub fn add_child(
        &mut self,
        instance: &mut Value,
        child_schema: &str,
    ) -> Result<(), EditorError> {
        let registry = self.registry;
        let config = registry.config();
        let schema = registry
            .detect_type(instance)
            .ok_or(EditorError::UnknownInstanceType)?;
        if !registry
            .addable_children(&schema)
            .iter()
            .any(|s| s == child_schema)
        {
            return Err(EditorError::IllegalChildType {
                parent: schema,
                child: child_schema.to_string(),
            });
        }
        let child = registry
            .default_instance(child_schema)
            .ok_or_else(|| EditorError::IllegalChildType {
                parent: schema,
                child: child_schema.to_string(),
            })?;
        let id = instance_id(instance, config).map(str::to_string);
        let child_instances =
            children_mut(instance, config).ok_or(EditorError::MissingChildren)?;
        child_instances.push(child);
        let snapshot = Value::Array(child_instances.clone());
        self.notify_field(id.as_deref(), &config.children_field, &snapshot);
        Ok(())
    }

    /// Whether removing this child would discard non-default content. A
    /// child whose type cannot be detected always requires confirmation,
    /// since its content cannot be proven default.
    pub fn requires_confirmation(&self, child: &Value) -> bool {
        has_non_default_content(self.registry, child)
    }

    /// Removes the child at `index` if its content is still default;
    /// otherwise asks for confirmation without mutating anything.
    pub fn remove_child(
        &mut self,
        instance: &mut Value,
        index: usize,
    ) -> Result<RemovalOutcome, EditorError> {
        let registry = self.registry;
        let config = registry.config();
        {
            let child_instances = children(instance, config).ok_or(EditorError::MissingChildren)?;
            let len = child_instances.len();
            let child = child_instances
                .get(index)
                .ok_or(EditorError::IndexOutOfBounds { index, len })?;
            if has_non_default_content(registry, child) {
                return Ok(RemovalOutcome::ConfirmationRequired);
            }
        }
        self.remove_child_confirmed(instance, index)
            .map(RemovalOutcome::Removed)
    }

    /// Removes the child at `index` unconditionally.
    pub fn remove_child_confirmed(
        &mut self,
        instance: &mut Value,
        index: usize,
    ) -> Result<Value, EditorError> {
        let registry = self.registry;
        let config = registry.config();
        let id = instance_id(instance, config).map(str::to_string);
        let child_instances =
            children_mut(instance, config).ok_or(EditorError::MissingChildren)?;
        let len = child_instances.len();
        if index >= len {
            return Err(EditorError::IndexOutOfBounds { index, len });
        }
        let removed = child_instances.remove(index);
        let snapshot = Value::Array(child_instances.clone());
        self.notify_field(id.as_deref(), &config.children_field, &snapshot);
        Ok(removed)
    }

    /// Moves the child at `from` to position `to`, leaving every other
    /// member unchanged.
    pub fn reorder_children(
        &mut self,
        instance: &mut Value,
        from: usize,
        to: usize,
    ) -> Result<(), EditorError> {
        let registry = self.registry;
        let config = registry.config();
        let id = instance_id(instance, config).map(str::to_string);
        let child_instances =
            children_mut(instance, config).ok_or(EditorError::MissingChildren)?;
        move_item(child_instances, from, to)?;
        let snapshot = Value::Array(child_instances.clone());
        self.notify_field(id.as_deref(), &config.children_field, &snapshot);
        Ok(())
    }

    fn notify_field(&mut self, id: Option<&str>, field: &str, value: &Value) {
        if let Some(sink) = self.sink.as_mut() {
            sink.field_changed(id.unwrap_or(""), field, value);
        }
    }
}

/// Compares a child against its own schema's default instance, ignoring
/// the id. Any present field that differs from the default and is not
/// empty counts as content worth confirming over.
fn has_non_default_content(registry: &SchemaRegistry, child: &Value) -> bool {
    let config = registry.config();
    let Some(schema) = registry.detect_type(child) else {
        return true;
    };
    let Some(default) = registry.default_instance(&schema) else {
        return true;
    };
    let (Some(object), Some(default_object)) = (child.as_object(), default.as_object()) else {
        return true;
    };
    for (key, value) in object {
        if *key == config.id_field || *key == config.type_tag_field {
            continue;
        }
        let matches_default = default_object.get(key).is_some_and(|d| d == value);
        if !matches_default && !is_empty_value(value) {
            return true;
        }
    }
    false
}
