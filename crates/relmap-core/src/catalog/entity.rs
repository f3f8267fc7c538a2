//! Entity definitions.

use super::field::FieldDef;

/// An entity definition (table schema).
///
/// Every entity is identified by an implicit store-generated `id`; the
/// declared fields describe the rest of the row.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityDef {
    /// Entity name (unique within schema).
    pub name: String,
    /// Field definitions.
    pub fields: Vec<FieldDef>,
    /// Default ordering for listings without an explicit order.
    pub default_order: Option<Vec<OrderBy>>,
}

/// Order specification for default ordering.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderBy {
    /// Field name to order by.
    pub field: String,
    /// Sort direction.
    pub direction: OrderDirection,
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderDirection {
    /// Ascending order.
    Asc,
    /// Descending order.
    Desc,
}

impl EntityDef {
    /// Create a new entity definition.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            default_order: None,
        }
    }

    /// Add a field to the entity.
    pub fn with_field(mut self, field: FieldDef) -> Self {
        self.fields.push(field);
        self
    }

    /// Add multiple fields.
    pub fn with_fields(mut self, fields: impl IntoIterator<Item = FieldDef>) -> Self {
        self.fields.extend(fields);
        self
    }

    /// Set the default ordering.
    pub fn with_default_order(mut self, order: impl IntoIterator<Item = OrderBy>) -> Self {
        self.default_order = Some(order.into_iter().collect());
        self
    }

    /// Get a field by name.
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }
}

impl OrderBy {
    /// Create ascending order.
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: OrderDirection::Asc,
        }
    }

    /// Create descending order.
    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: OrderDirection::Desc,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{FieldType, ScalarType};

    #[test]
    fn test_entity_builder() {
        let entity = EntityDef::new("Customer")
            .with_field(FieldDef::new(
                "name",
                FieldType::scalar(ScalarType::String),
            ))
            .with_field(FieldDef::optional("email", ScalarType::String))
            .with_default_order([OrderBy::asc("name")]);

        assert_eq!(entity.name, "Customer");
        assert_eq!(entity.fields.len(), 2);
        assert!(entity.default_order.is_some());
    }

    #[test]
    fn test_field_lookup() {
        let entity = EntityDef::new("Customer")
            .with_field(FieldDef::new(
                "name",
                FieldType::scalar(ScalarType::String),
            ));

        assert!(entity.field("name").is_some());
        assert!(entity.field("nonexistent").is_none());
    }
}
