//! Self-referential many-to-many: topic groups nesting other topic groups.

use std::fmt;

use relmap_core::{EntityDef, Error, FieldDef, FieldType, Fields, RelationDef, ScalarType};

use crate::require_str;

/// Entity name.
pub const TOPIC_GROUP: &str = "TopicGroup";

/// Relation name. Links run from a group to its children.
pub const TOPIC_CHILDREN: &str = "topic_children";

/// Declare the TopicGroup entity.
pub fn topic_group_entity() -> EntityDef {
    EntityDef::new(TOPIC_GROUP).with_field(FieldDef::new(
        "name",
        FieldType::scalar(ScalarType::String),
    ))
}

/// Groups hold a set of child groups; a group can appear under several
/// parents.
pub fn topic_children_relation() -> RelationDef {
    RelationDef::many_to_many(TOPIC_CHILDREN, TOPIC_GROUP, TOPIC_GROUP)
}

/// A topic group row.
#[derive(Debug, Clone, PartialEq)]
pub struct TopicGroup {
    pub name: String,
}

impl TopicGroup {
    pub fn fields(&self) -> Fields {
        vec![("name".into(), self.name.clone().into())]
    }

    pub fn from_fields(fields: &Fields) -> Result<Self, Error> {
        Ok(Self {
            name: require_str(fields, "name")?,
        })
    }
}

impl fmt::Display for TopicGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
