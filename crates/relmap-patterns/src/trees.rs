//! Self-referential many-to-one: tree nodes with a nullable parent.
//!
//! Deleting a parent clears the reference on its children instead of
//! removing them.

use std::fmt;

use relmap_core::{
    DeleteBehavior, EntityDef, Error, FieldDef, FieldType, Fields, RecordId, RelationDef,
    ScalarType,
};

use crate::{optional_id, require_str};

/// Entity name.
pub const TREE: &str = "Tree";

/// Relation name.
pub const TREE_PARENT: &str = "tree_parent";

/// Declare the Tree entity.
pub fn tree_entity() -> EntityDef {
    EntityDef::new(TREE)
        .with_field(FieldDef::new(
            "name",
            FieldType::scalar(ScalarType::String),
        ))
        .with_field(FieldDef::optional("parent_id", ScalarType::Id))
}

/// Nodes reference their parent; deleting the parent orphans the children.
pub fn tree_parent_relation() -> RelationDef {
    RelationDef::many_to_one(TREE_PARENT, TREE, "parent_id", TREE)
        .with_on_delete(DeleteBehavior::SetNull)
}

/// A tree node row.
#[derive(Debug, Clone, PartialEq)]
pub struct Tree {
    pub name: String,
    pub parent_id: Option<RecordId>,
}

impl Tree {
    /// A root node.
    pub fn root(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent_id: None,
        }
    }

    /// A child of an existing node.
    pub fn child_of(name: impl Into<String>, parent: RecordId) -> Self {
        Self {
            name: name.into(),
            parent_id: Some(parent),
        }
    }

    pub fn fields(&self) -> Fields {
        vec![
            ("name".into(), self.name.clone().into()),
            ("parent_id".into(), self.parent_id.into()),
        ]
    }

    pub fn from_fields(fields: &Fields) -> Result<Self, Error> {
        Ok(Self {
            name: require_str(fields, "name")?,
            parent_id: optional_id(fields, "parent_id"),
        })
    }
}

impl fmt::Display for Tree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relmap_core::Database;

    #[test]
    fn test_build_a_chain() {
        let db = Database::temporary(crate::schema()).unwrap();

        let root = db.insert(TREE, Tree::root("root").fields()).unwrap();
        let child = db
            .insert(TREE, Tree::child_of("child", root).fields())
            .unwrap();
        let grandchild = db
            .insert(TREE, Tree::child_of("grandchild", child).fields())
            .unwrap();

        let node = Tree::from_fields(&db.get(TREE, grandchild).unwrap()).unwrap();
        assert_eq!(node.parent_id, Some(child));
    }

    #[test]
    fn test_deleting_parent_orphans_children() {
        let db = Database::temporary(crate::schema()).unwrap();

        let root = db.insert(TREE, Tree::root("root").fields()).unwrap();
        let child = db
            .insert(TREE, Tree::child_of("child", root).fields())
            .unwrap();

        let outcome = db.delete(TREE, root).unwrap();

        assert!(outcome.deleted.is_empty());
        assert_eq!(outcome.cleared.len(), 1);

        let orphan = Tree::from_fields(&db.get(TREE, child).unwrap()).unwrap();
        assert_eq!(orphan.parent_id, None);
    }
}
