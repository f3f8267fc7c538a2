//! Declarative schema metadata.
//!
//! The catalog describes entities, their fields, the relations joining them,
//! and standalone constraints. It is metadata only: storage behavior lives
//! in the store and cascade layers.

mod constraint;
mod entity;
mod field;
mod relation;
mod schema;
mod types;

pub use constraint::ConstraintDef;
pub use entity::{EntityDef, OrderBy, OrderDirection};
pub use field::{DefaultValue, FieldDef};
pub use relation::{Cardinality, DeleteBehavior, RelationDef};
pub use schema::Schema;
pub use types::{FieldType, ScalarType};
