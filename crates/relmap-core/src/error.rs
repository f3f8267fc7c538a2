//! Core error types.

use thiserror::Error;

/// Core errors for the store and schema layers.
#[derive(Debug, Error)]
pub enum Error {
    /// Storage layer error.
    #[error("storage error: {0}")]
    Storage(#[from] sled::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Deserialization error.
    #[error("deserialization error: {0}")]
    Deserialization(String),

    /// Invalid data format.
    #[error("invalid data: {0}")]
    InvalidData(String),

    /// Record not found.
    #[error("record not found")]
    NotFound,

    /// Schema declaration error.
    #[error("schema error: {0}")]
    Schema(String),

    /// Constraint violation.
    #[error("constraint violation: {0}")]
    Constraint(#[from] ConstraintError),

    /// Cascade processing error.
    #[error("cascade error: {0}")]
    Cascade(#[from] CascadeError),
}

/// Violations of declared constraints during writes.
#[derive(Debug, Error)]
pub enum ConstraintError {
    /// A unique constraint matched an existing row.
    #[error("unique constraint {constraint} violated on {entity} ({fields:?})")]
    UniqueViolation {
        /// Constraint name.
        constraint: String,
        /// Entity the constraint applies to.
        entity: String,
        /// Fields that must be unique together.
        fields: Vec<String>,
    },

    /// A required field was not provided and has no default.
    #[error("required field {field} missing on {entity}")]
    MissingField {
        /// Entity being written.
        entity: String,
        /// Missing field name.
        field: String,
    },

    /// A foreign key points at a row that does not exist.
    #[error("foreign key {field} on {entity} references a missing {references} row")]
    ForeignKeyViolation {
        /// Entity being written.
        entity: String,
        /// Foreign key field.
        field: String,
        /// Referenced entity.
        references: String,
    },

    /// The named entity is not declared in the schema.
    #[error("unknown entity {0}")]
    UnknownEntity(String),

    /// The named relation is not declared in the schema.
    #[error("unknown relation {0}")]
    UnknownRelation(String),
}

/// Failures while applying delete policies.
#[derive(Debug, Error)]
pub enum CascadeError {
    /// A restrict relation still has referencing rows.
    #[error("cannot delete {entity}: {count} {referencing_entity} row(s) still reference it")]
    RestrictViolation {
        /// Entity being deleted.
        entity: String,
        /// Entity holding the references.
        referencing_entity: String,
        /// Number of referencing rows.
        count: usize,
    },

    /// The cascade recursed past the depth limit.
    #[error("cascade depth {depth} exceeds limit")]
    MaxDepthExceeded {
        /// Depth reached.
        depth: usize,
    },
}
