//! Many-to-one: products grouped under a category, removed with it.

use std::fmt;

use relmap_core::{
    DeleteBehavior, EntityDef, Error, FieldDef, FieldType, Fields, RecordId, RelationDef,
    ScalarType,
};

use crate::{require_id, require_str};

/// Entity names.
pub const CATEGORY: &str = "Category";
pub const PRODUCT: &str = "Product";

/// Relation name.
pub const PRODUCT_CATEGORY: &str = "product_category";

/// Declare the Category entity.
pub fn category_entity() -> EntityDef {
    EntityDef::new(CATEGORY).with_field(FieldDef::new(
        "name",
        FieldType::scalar(ScalarType::String),
    ))
}

/// Declare the Product entity.
pub fn product_entity() -> EntityDef {
    EntityDef::new(PRODUCT)
        .with_field(FieldDef::new(
            "name",
            FieldType::scalar(ScalarType::String),
        ))
        .with_field(FieldDef::new(
            "category_id",
            FieldType::scalar(ScalarType::Id),
        ))
}

/// Products reference their category; deleting the category removes them.
pub fn product_category_relation() -> RelationDef {
    RelationDef::many_to_one(PRODUCT_CATEGORY, PRODUCT, "category_id", CATEGORY)
        .with_on_delete(DeleteBehavior::Cascade)
}

/// A category row.
#[derive(Debug, Clone, PartialEq)]
pub struct Category {
    pub name: String,
}

impl Category {
    pub fn fields(&self) -> Fields {
        vec![("name".into(), self.name.clone().into())]
    }

    pub fn from_fields(fields: &Fields) -> Result<Self, Error> {
        Ok(Self {
            name: require_str(fields, "name")?,
        })
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// A product row.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub name: String,
    pub category_id: RecordId,
}

impl Product {
    pub fn fields(&self) -> Fields {
        vec![
            ("name".into(), self.name.clone().into()),
            ("category_id".into(), self.category_id.into()),
        ]
    }

    pub fn from_fields(fields: &Fields) -> Result<Self, Error> {
        Ok(Self {
            name: require_str(fields, "name")?,
            category_id: require_id(fields, "category_id")?,
        })
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relmap_core::{ConstraintError, Database};

    #[test]
    fn test_product_requires_existing_category() {
        let db = Database::temporary(crate::schema()).unwrap();

        let result = db.insert(
            PRODUCT,
            Product {
                name: "Atlas".into(),
                category_id: RecordId::generate(),
            }
            .fields(),
        );

        assert!(matches!(
            result,
            Err(relmap_core::Error::Constraint(
                ConstraintError::ForeignKeyViolation { .. }
            ))
        ));
    }

    #[test]
    fn test_category_delete_cascades_to_products() {
        let db = Database::temporary(crate::schema()).unwrap();

        let category = db
            .insert(CATEGORY, Category { name: "Books".into() }.fields())
            .unwrap();
        let product = db
            .insert(
                PRODUCT,
                Product {
                    name: "Atlas".into(),
                    category_id: category,
                }
                .fields(),
            )
            .unwrap();

        let outcome = db.delete(CATEGORY, category).unwrap();

        assert_eq!(outcome.deleted, vec![(PRODUCT.to_string(), product)]);
        assert!(db.list(PRODUCT).unwrap().is_empty());
    }

    #[test]
    fn test_labels() {
        let category = Category { name: "Books".into() };
        assert_eq!(category.to_string(), "Books");

        let product = Product {
            name: "Atlas".into(),
            category_id: RecordId::generate(),
        };
        assert_eq!(product.to_string(), "Atlas");
    }
}
