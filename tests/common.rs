//! Common test fixtures shared by the registry and editor integration
//! tests: a small SOP-flavored schema set with recursive groupings,
//! back-referenced child schemas, and hinted fields.

use serde_json::json;
use sopform::{
    ObjectField, SchemaDefinition, SchemaNode, SchemaRegistry, StringConstraints, StringFormat,
    UiHint,
};

/// Initializes test logging; safe to call from every test, first caller
/// wins.
pub fn init_test_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// The minimal recursive set from the containment scenario: a grouping
/// that may hold more groupings or tasks, tasks that hold fields.
pub fn grouping_schemas() -> Vec<SchemaDefinition> {
    vec![
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
                    "children",
                    SchemaNode::array(SchemaNode::reference("Field")),
                ),
            ]),
        ),
        SchemaDefinition::new(
            "Field",
            SchemaNode::object(vec![ObjectField::new("type", SchemaNode::string())]),
        ),
    ]
}

/// The full fixture: a top-level SOP document over the grouping set, an
/// email-constrained contact field, a defaulted ordinal, a UI-hinted
/// title, and a `Table` schema discoverable only through its
/// back-reference field.
pub struct SopFixture {
    pub registry: SchemaRegistry,
}

impl SopFixture {
    pub fn new() -> Self {
        let schemas = vec![
            SchemaDefinition::new(
                "Sop",
                SchemaNode::object(vec![
                    ObjectField::new("title", SchemaNode::string()),
                    ObjectField::new(
                        "author",
                        SchemaNode::string_with(StringConstraints {
                            format: Some(StringFormat::Email),
                            ..StringConstraints::default()
                        })
                        .optional(),
                    ),
                    ObjectField::new(
                        "taskgroups",
                        SchemaNode::array(SchemaNode::reference("Group")),
                    ),
                ]),
            )
            .with_ui_hint(
                "title",
                UiHint {
                    title: Some("Procedure title".to_string()),
                    description: Some("Shown on the submission form header".to_string()),
                    ..UiHint::default()
                },
            ),
            SchemaDefinition::new(
                "Group",
                SchemaNode::object(vec![
                    ObjectField::new("name", SchemaNode::string()),
                    ObjectField::new("description", SchemaNode::string().optional()),
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
                    ObjectField::new("ordinal", SchemaNode::number().with_default(json!(0))),
                    ObjectField::new(
                        "children",
                        SchemaNode::array(SchemaNode::reference("Field")),
                    ),
                ]),
            ),
            SchemaDefinition::new(
                "Field",
                SchemaNode::object(vec![
                    ObjectField::new("label", SchemaNode::string().optional()),
                    ObjectField::new("type", SchemaNode::string()),
                    ObjectField::new(
                        "parents",
                        SchemaNode::array(SchemaNode::enumeration(&["Task"])),
                    ),
                ]),
            ),
            SchemaDefinition::new(
                "Table",
                SchemaNode::object(vec![
                    ObjectField::new("caption", SchemaNode::string()),
                    ObjectField::new(
                        "parents",
                        SchemaNode::array(SchemaNode::enumeration(&["Group"])),
                    ),
                ]),
            )
            .with_start_collapsed(true),
        ];
        Self {
            registry: SchemaRegistry::build(schemas),
        }
    }
}
