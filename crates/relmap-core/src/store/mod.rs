//! Row storage for relmap.
//!
//! A sled-backed single-version store: rows keyed by id, a type index for
//! per-entity scans, and mirrored link trees for many-to-many memberships.

pub mod codec;

mod config;
mod engine;
mod id;
mod row;

pub use config::StoreConfig;
pub use engine::Store;
pub use id::{RecordId, RECORD_ID_SIZE};
pub use row::{current_date, current_timestamp, Row};
