//! relmap core - schema metadata, row store, and referential integrity.
//!
//! The catalog declares entities, fields, relations, and constraints; the
//! store keeps rows and many-to-many link pairs in sled; the database facade
//! enforces the declarations on every write, including the per-relation
//! delete policies (cascade, restrict, set-null).

#[cfg(feature = "mimalloc")]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

pub mod cascade;
pub mod catalog;
pub mod database;
pub mod error;
pub mod store;
pub mod value;

pub use cascade::{CascadeExecutor, CascadeOutcome};
pub use catalog::{
    Cardinality, ConstraintDef, DefaultValue, DeleteBehavior, EntityDef, FieldDef, FieldType,
    OrderBy, OrderDirection, RelationDef, ScalarType, Schema,
};
pub use database::{Database, Fields};
pub use error::{CascadeError, ConstraintError, Error};
pub use store::{RecordId, Store, StoreConfig};
pub use value::Value;
