//! Constraint definitions for entities.
//!
//! Foreign-key integrity is implied by relation declarations; the only
//! standalone constraint kind is uniqueness.

/// A constraint declaration.
#[derive(Debug, Clone, PartialEq)]
pub enum ConstraintDef {
    /// Uniqueness constraint (single or composite). Rows whose constrained
    /// values include null are exempt, as in SQL.
    Unique {
        /// Constraint name.
        name: String,
        /// Entity this constraint applies to.
        entity: String,
        /// Fields that must be unique together.
        fields: Vec<String>,
    },
}

impl ConstraintDef {
    /// Create a unique constraint on a single field.
    pub fn unique(
        name: impl Into<String>,
        entity: impl Into<String>,
        field: impl Into<String>,
    ) -> Self {
        ConstraintDef::Unique {
            name: name.into(),
            entity: entity.into(),
            fields: vec![field.into()],
        }
    }

    /// Create a composite unique constraint.
    pub fn unique_composite(
        name: impl Into<String>,
        entity: impl Into<String>,
        fields: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        ConstraintDef::Unique {
            name: name.into(),
            entity: entity.into(),
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }

    /// Get the constraint name.
    pub fn name(&self) -> &str {
        match self {
            ConstraintDef::Unique { name, .. } => name,
        }
    }

    /// Get the entity this constraint applies to.
    pub fn entity(&self) -> &str {
        match self {
            ConstraintDef::Unique { entity, .. } => entity,
        }
    }

    /// Get the constrained fields.
    pub fn fields(&self) -> &[String] {
        match self {
            ConstraintDef::Unique { fields, .. } => fields,
        }
    }
}
