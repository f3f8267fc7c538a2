//! Core type definitions for the catalog.

/// Scalar column types supported by the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScalarType {
    /// Boolean value.
    Bool,
    /// 32-bit signed integer.
    Int32,
    /// 64-bit signed integer.
    Int64,
    /// 64-bit floating point.
    Float64,
    /// Fixed-precision decimal. Declaration-level only: runtime values are
    /// carried as 64-bit floats.
    Decimal {
        /// Total number of digits.
        precision: u8,
        /// Number of digits after the decimal point.
        scale: u8,
    },
    /// Short UTF-8 text.
    String,
    /// Long-form UTF-8 text.
    Text,
    /// Calendar date.
    Date,
    /// Timestamp.
    Timestamp,
    /// Reference to another record.
    Id,
}

/// Field types: a scalar, its nullable variant, or an enumeration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldType {
    /// A scalar value.
    Scalar(ScalarType),
    /// An optional scalar value (nullable).
    OptionalScalar(ScalarType),
    /// An enumeration over a closed set of string variants.
    Enum {
        /// Name of the enum type.
        name: String,
        /// Allowed variant values.
        variants: Vec<String>,
    },
    /// An optional enumeration.
    OptionalEnum {
        /// Name of the enum type.
        name: String,
        /// Allowed variant values.
        variants: Vec<String>,
    },
}

impl ScalarType {
    /// Check if this type is numeric.
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            ScalarType::Int32
                | ScalarType::Int64
                | ScalarType::Float64
                | ScalarType::Decimal { .. }
        )
    }

    /// Check if this type is string-like.
    pub fn is_string_like(&self) -> bool {
        matches!(self, ScalarType::String | ScalarType::Text)
    }
}

impl FieldType {
    /// Create a scalar field type.
    pub fn scalar(scalar: ScalarType) -> Self {
        FieldType::Scalar(scalar)
    }

    /// Create an optional scalar field type.
    pub fn optional_scalar(scalar: ScalarType) -> Self {
        FieldType::OptionalScalar(scalar)
    }

    /// Create an enum field type.
    pub fn enum_type(
        name: impl Into<String>,
        variants: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        FieldType::Enum {
            name: name.into(),
            variants: variants.into_iter().map(Into::into).collect(),
        }
    }

    /// Check if this type is nullable.
    pub fn is_nullable(&self) -> bool {
        matches!(
            self,
            FieldType::OptionalScalar(_) | FieldType::OptionalEnum { .. }
        )
    }

    /// Get the inner scalar type if this is a scalar-based type.
    pub fn scalar_type(&self) -> Option<&ScalarType> {
        match self {
            FieldType::Scalar(s) | FieldType::OptionalScalar(s) => Some(s),
            _ => None,
        }
    }
}
