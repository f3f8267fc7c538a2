//! Schema bundle: the assembled entity/relation/constraint declarations.

use std::collections::HashMap;

use super::{ConstraintDef, DefaultValue, DeleteBehavior, EntityDef, FieldType, RelationDef, ScalarType};
use crate::error::Error;

/// The assembled schema: every entity, relation, and constraint declaration.
///
/// A schema is declared in code and validated once when a database opens;
/// there is no persistence or versioning of the declarations themselves.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schema {
    /// Entity definitions keyed by name.
    pub entities: HashMap<String, EntityDef>,
    /// Relation definitions keyed by name.
    pub relations: HashMap<String, RelationDef>,
    /// Constraint definitions.
    pub constraints: Vec<ConstraintDef>,
}

impl Schema {
    /// Create an empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entity to the schema.
    pub fn with_entity(mut self, entity: EntityDef) -> Self {
        self.entities.insert(entity.name.clone(), entity);
        self
    }

    /// Add a relation to the schema.
    pub fn with_relation(mut self, relation: RelationDef) -> Self {
        self.relations.insert(relation.name.clone(), relation);
        self
    }

    /// Add a constraint to the schema.
    pub fn with_constraint(mut self, constraint: ConstraintDef) -> Self {
        self.constraints.push(constraint);
        self
    }

    /// Get an entity by name.
    pub fn entity(&self, name: &str) -> Option<&EntityDef> {
        self.entities.get(name)
    }

    /// Get a relation by name.
    pub fn relation(&self, name: &str) -> Option<&RelationDef> {
        self.relations.get(name)
    }

    /// Get all relations declared by an entity (as the owning side).
    pub fn relations_from(&self, entity: &str) -> Vec<&RelationDef> {
        self.relations
            .values()
            .filter(|r| r.entity == entity)
            .collect()
    }

    /// Get all relations pointing at an entity (as the target).
    pub fn relations_to(&self, entity: &str) -> Vec<&RelationDef> {
        self.relations
            .values()
            .filter(|r| r.target == entity)
            .collect()
    }

    /// Get all constraints for an entity.
    pub fn constraints_for(&self, entity: &str) -> Vec<&ConstraintDef> {
        self.constraints
            .iter()
            .filter(|c| c.entity() == entity)
            .collect()
    }

    /// List all entity names.
    pub fn entity_names(&self) -> Vec<&str> {
        self.entities.keys().map(|s| s.as_str()).collect()
    }

    /// Check the declarations for internal consistency.
    ///
    /// Relations must join declared entities through declared `Id` fields,
    /// set-null requires the foreign key to be nullable, constraints must
    /// name declared fields, and defaults must match their field types.
    pub fn validate(&self) -> Result<(), Error> {
        for relation in self.relations.values() {
            let owner = self.entities.get(&relation.entity).ok_or_else(|| {
                Error::Schema(format!(
                    "relation {} declared by unknown entity {}",
                    relation.name, relation.entity
                ))
            })?;
            if !self.entities.contains_key(&relation.target) {
                return Err(Error::Schema(format!(
                    "relation {} targets unknown entity {}",
                    relation.name, relation.target
                )));
            }

            match &relation.field {
                Some(field_name) => {
                    let field = owner.field(field_name).ok_or_else(|| {
                        Error::Schema(format!(
                            "relation {} uses undeclared field {}.{}",
                            relation.name, relation.entity, field_name
                        ))
                    })?;
                    if field.field_type.scalar_type() != Some(&ScalarType::Id) {
                        return Err(Error::Schema(format!(
                            "relation {} field {}.{} is not an Id",
                            relation.name, relation.entity, field_name
                        )));
                    }
                    if relation.on_delete == DeleteBehavior::SetNull && !field.is_nullable() {
                        return Err(Error::Schema(format!(
                            "relation {} clears {}.{} on delete but the field is not nullable",
                            relation.name, relation.entity, field_name
                        )));
                    }
                }
                None => {
                    if !relation.is_many_to_many() {
                        return Err(Error::Schema(format!(
                            "relation {} has no foreign-key field",
                            relation.name
                        )));
                    }
                }
            }
        }

        for constraint in &self.constraints {
            let entity = self.entities.get(constraint.entity()).ok_or_else(|| {
                Error::Schema(format!(
                    "constraint {} applies to unknown entity {}",
                    constraint.name(),
                    constraint.entity()
                ))
            })?;
            for field in constraint.fields() {
                if entity.field(field).is_none() {
                    return Err(Error::Schema(format!(
                        "constraint {} names undeclared field {}.{}",
                        constraint.name(),
                        constraint.entity(),
                        field
                    )));
                }
            }
        }

        for entity in self.entities.values() {
            for field in &entity.fields {
                if let Some(default) = &field.default {
                    Self::check_default(&entity.name, &field.name, &field.field_type, default)?;
                }
            }
            if let Some(order) = &entity.default_order {
                for spec in order {
                    if entity.field(&spec.field).is_none() {
                        return Err(Error::Schema(format!(
                            "default order on {} names undeclared field {}",
                            entity.name, spec.field
                        )));
                    }
                }
            }
        }

        Ok(())
    }

    fn check_default(
        entity: &str,
        field: &str,
        field_type: &FieldType,
        default: &DefaultValue,
    ) -> Result<(), Error> {
        let mismatch = || {
            Err(Error::Schema(format!(
                "default for {}.{} does not match its declared type",
                entity, field
            )))
        };

        match default {
            DefaultValue::Bool(_) => match field_type.scalar_type() {
                Some(ScalarType::Bool) => Ok(()),
                _ => mismatch(),
            },
            DefaultValue::Int(_) => match field_type.scalar_type() {
                Some(s) if s.is_numeric() => Ok(()),
                _ => mismatch(),
            },
            DefaultValue::Float(_) => match field_type.scalar_type() {
                Some(ScalarType::Float64) | Some(ScalarType::Decimal { .. }) => Ok(()),
                _ => mismatch(),
            },
            DefaultValue::String(s) => match field_type {
                FieldType::Scalar(t) | FieldType::OptionalScalar(t) if t.is_string_like() => Ok(()),
                FieldType::Enum { variants, .. } | FieldType::OptionalEnum { variants, .. } => {
                    if variants.iter().any(|v| v == s) {
                        Ok(())
                    } else {
                        mismatch()
                    }
                }
                _ => mismatch(),
            },
            DefaultValue::CurrentDate => match field_type.scalar_type() {
                Some(ScalarType::Date) => Ok(()),
                _ => mismatch(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{FieldDef, OrderBy};

    fn sample_schema() -> Schema {
        let category = EntityDef::new("Category").with_field(FieldDef::new(
            "name",
            FieldType::scalar(ScalarType::String),
        ));

        let product = EntityDef::new("Product")
            .with_field(FieldDef::new(
                "name",
                FieldType::scalar(ScalarType::String),
            ))
            .with_field(FieldDef::new(
                "category_id",
                FieldType::scalar(ScalarType::Id),
            ));

        let relation =
            RelationDef::many_to_one("product_category", "Product", "category_id", "Category")
                .with_on_delete(DeleteBehavior::Cascade);

        Schema::new()
            .with_entity(category)
            .with_entity(product)
            .with_relation(relation)
            .with_constraint(ConstraintDef::unique("category_name_unique", "Category", "name"))
    }

    #[test]
    fn test_schema_builder() {
        let schema = sample_schema();

        assert_eq!(schema.entities.len(), 2);
        assert_eq!(schema.relations.len(), 1);
        assert_eq!(schema.constraints.len(), 1);
        assert!(schema.entity("Category").is_some());
        assert!(schema.entity("NonExistent").is_none());
    }

    #[test]
    fn test_relations_for_entity() {
        let schema = sample_schema();

        assert_eq!(schema.relations_from("Product").len(), 1);
        assert_eq!(schema.relations_to("Category").len(), 1);
        assert!(schema.relations_to("Product").is_empty());
    }

    #[test]
    fn test_validate_ok() {
        sample_schema().validate().unwrap();
    }

    #[test]
    fn test_validate_unknown_target() {
        let schema = Schema::new()
            .with_entity(
                EntityDef::new("Product").with_field(FieldDef::new(
                    "category_id",
                    FieldType::scalar(ScalarType::Id),
                )),
            )
            .with_relation(RelationDef::many_to_one(
                "product_category",
                "Product",
                "category_id",
                "Category",
            ));

        assert!(matches!(schema.validate(), Err(Error::Schema(_))));
    }

    #[test]
    fn test_validate_set_null_requires_nullable() {
        let schema = Schema::new()
            .with_entity(
                EntityDef::new("Tree")
                    .with_field(FieldDef::new(
                        "name",
                        FieldType::scalar(ScalarType::String),
                    ))
                    .with_field(FieldDef::new(
                        "parent_id",
                        FieldType::scalar(ScalarType::Id),
                    )),
            )
            .with_relation(
                RelationDef::many_to_one("tree_parent", "Tree", "parent_id", "Tree")
                    .with_on_delete(DeleteBehavior::SetNull),
            );

        assert!(matches!(schema.validate(), Err(Error::Schema(_))));
    }

    #[test]
    fn test_validate_default_mismatch() {
        use crate::catalog::DefaultValue;

        let schema = Schema::new().with_entity(
            EntityDef::new("Car").with_field(
                FieldDef::new("doors", FieldType::scalar(ScalarType::Int32))
                    .with_default(DefaultValue::String("four".into())),
            ),
        );

        assert!(matches!(schema.validate(), Err(Error::Schema(_))));
    }

    #[test]
    fn test_validate_order_field() {
        let schema = Schema::new().with_entity(
            EntityDef::new("Book")
                .with_field(FieldDef::new(
                    "title",
                    FieldType::scalar(ScalarType::String),
                ))
                .with_default_order([OrderBy::asc("missing")]),
        );

        assert!(matches!(schema.validate(), Err(Error::Schema(_))));
    }
}
