//! Field definitions for entities.

use super::types::{FieldType, ScalarType};

/// A field definition within an entity.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDef {
    /// Field name.
    pub name: String,
    /// Field data type.
    pub field_type: FieldType,
    /// Whether the field must be provided on insert.
    pub required: bool,
    /// Default value applied when the field is not provided.
    pub default: Option<DefaultValue>,
}

/// Default value for a field.
#[derive(Debug, Clone, PartialEq)]
pub enum DefaultValue {
    /// Boolean value.
    Bool(bool),
    /// Integer value.
    Int(i64),
    /// Floating point value.
    Float(f64),
    /// String value.
    String(String),
    /// Current date (evaluated at insert time).
    CurrentDate,
}

impl FieldDef {
    /// Create a new required field.
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            required: true,
            default: None,
        }
    }

    /// Create an optional field (nullable, not required).
    pub fn optional(name: impl Into<String>, scalar: ScalarType) -> Self {
        Self {
            name: name.into(),
            field_type: FieldType::OptionalScalar(scalar),
            required: false,
            default: None,
        }
    }

    /// Set the default value. A field with a default no longer has to be
    /// provided on insert.
    pub fn with_default(mut self, default: DefaultValue) -> Self {
        self.default = Some(default);
        self.required = false;
        self
    }

    /// Check if this field has a default value.
    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }

    /// Check if this field accepts null.
    pub fn is_nullable(&self) -> bool {
        self.field_type.is_nullable()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_def_builder() {
        let field = FieldDef::new("year", FieldType::scalar(ScalarType::Int32));

        assert_eq!(field.name, "year");
        assert!(field.required);
        assert!(!field.has_default());
        assert!(!field.is_nullable());
    }

    #[test]
    fn test_optional_field() {
        let field = FieldDef::optional("email", ScalarType::String);

        assert!(!field.required);
        assert!(field.is_nullable());
    }

    #[test]
    fn test_default_clears_required() {
        let field = FieldDef::new("has_trunk", FieldType::scalar(ScalarType::Bool))
            .with_default(DefaultValue::Bool(true));

        assert!(field.has_default());
        assert!(!field.required);
    }
}
