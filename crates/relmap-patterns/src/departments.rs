//! Self-referential one-to-one: a department chain.
//!
//! Each department may sit under at most one parent, and a parent carries at
//! most one child. Deleting the parent detaches the child.

use std::fmt;

use relmap_core::{
    ConstraintDef, DeleteBehavior, EntityDef, Error, FieldDef, FieldType, Fields, RecordId,
    RelationDef, ScalarType,
};

use crate::{optional_id, require_str};

/// Entity name.
pub const DEPARTMENT: &str = "Department";

/// Relation name.
pub const DEPARTMENT_PARENT: &str = "department_parent";

/// Declare the Department entity.
pub fn department_entity() -> EntityDef {
    EntityDef::new(DEPARTMENT)
        .with_field(FieldDef::new(
            "name",
            FieldType::scalar(ScalarType::String),
        ))
        .with_field(FieldDef::optional("parent_id", ScalarType::Id))
}

/// Child departments reference their parent; deleting the parent detaches
/// them.
pub fn department_parent_relation() -> RelationDef {
    RelationDef::one_to_one(DEPARTMENT_PARENT, DEPARTMENT, "parent_id", DEPARTMENT)
        .with_on_delete(DeleteBehavior::SetNull)
}

/// A parent carries at most one child. Detached departments (null parent)
/// are exempt.
pub fn department_parent_unique() -> ConstraintDef {
    ConstraintDef::unique("department_parent_unique", DEPARTMENT, "parent_id")
}

/// A department row.
#[derive(Debug, Clone, PartialEq)]
pub struct Department {
    pub name: String,
    pub parent_id: Option<RecordId>,
}

impl Department {
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

impl fmt::Display for Department {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relmap_core::{ConstraintError, Database};

    #[test]
    fn test_deleting_parent_detaches_child() {
        let db = Database::temporary(crate::schema()).unwrap();

        let hr = db
            .insert(
                DEPARTMENT,
                Department {
                    name: "HR".into(),
                    parent_id: None,
                }
                .fields(),
            )
            .unwrap();
        let recruiting = db
            .insert(
                DEPARTMENT,
                Department {
                    name: "Recruiting".into(),
                    parent_id: Some(hr),
                }
                .fields(),
            )
            .unwrap();

        db.delete(DEPARTMENT, hr).unwrap();

        let child = Department::from_fields(&db.get(DEPARTMENT, recruiting).unwrap()).unwrap();
        assert_eq!(child.parent_id, None);
    }

    #[test]
    fn test_parent_carries_one_child() {
        let db = Database::temporary(crate::schema()).unwrap();

        let hr = db
            .insert(
                DEPARTMENT,
                Department {
                    name: "HR".into(),
                    parent_id: None,
                }
                .fields(),
            )
            .unwrap();
        db.insert(
            DEPARTMENT,
            Department {
                name: "Recruiting".into(),
                parent_id: Some(hr),
            }
            .fields(),
        )
        .unwrap();

        let result = db.insert(
            DEPARTMENT,
            Department {
                name: "Onboarding".into(),
                parent_id: Some(hr),
            }
            .fields(),
        );

        assert!(matches!(
            result,
            Err(Error::Constraint(ConstraintError::UniqueViolation { .. }))
        ));
    }

    #[test]
    fn test_many_roots_allowed() {
        let db = Database::temporary(crate::schema()).unwrap();

        // Null parents do not collide on the unique constraint
        for name in ["HR", "Finance", "Legal"] {
            db.insert(
                DEPARTMENT,
                Department {
                    name: name.into(),
                    parent_id: None,
                }
                .fields(),
            )
            .unwrap();
        }

        assert_eq!(db.list(DEPARTMENT).unwrap().len(), 3);
    }
}
