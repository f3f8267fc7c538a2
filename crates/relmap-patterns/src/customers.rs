//! A flat record with no relations.

use std::fmt;

use relmap_core::{EntityDef, Error, FieldDef, FieldType, Fields, ScalarType};

use crate::{optional_str, require_i32, require_str};

/// Entity name.
pub const CUSTOMER: &str = "Customer";

/// Declare the Customer entity.
pub fn customer_entity() -> EntityDef {
    EntityDef::new(CUSTOMER)
        .with_field(FieldDef::new(
            "first_name",
            FieldType::scalar(ScalarType::String),
        ))
        .with_field(FieldDef::new(
            "last_name",
            FieldType::scalar(ScalarType::String),
        ))
        .with_field(FieldDef::optional("email", ScalarType::String))
        .with_field(FieldDef::new(
            "year_of_birth",
            FieldType::scalar(ScalarType::Int32),
        ))
}

/// A customer row.
#[derive(Debug, Clone, PartialEq)]
pub struct Customer {
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub year_of_birth: i32,
}

impl Customer {
    /// Convert to row fields.
    pub fn fields(&self) -> Fields {
        vec![
            ("first_name".into(), self.first_name.clone().into()),
            ("last_name".into(), self.last_name.clone().into()),
            ("email".into(), self.email.clone().into()),
            ("year_of_birth".into(), self.year_of_birth.into()),
        ]
    }

    /// Parse from row fields.
    pub fn from_fields(fields: &Fields) -> Result<Self, Error> {
        Ok(Self {
            first_name: require_str(fields, "first_name")?,
            last_name: require_str(fields, "last_name")?,
            email: optional_str(fields, "email"),
            year_of_birth: require_i32(fields, "year_of_birth")?,
        })
    }
}

impl fmt::Display for Customer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.first_name, self.last_name)
    }
}
