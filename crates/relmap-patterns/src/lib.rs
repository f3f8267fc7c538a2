//! relmap-patterns - a catalogue of relational mapping patterns.
//!
//! Each module declares one mapping pattern against the relmap core: a flat
//! record, a foreign key, self-referential relations, many-to-many
//! memberships with and without an explicit join entity, one-to-one links,
//! a shared field set reused across entities, multi-table extension, proxy
//! behavior as a plain function, and field composition. The modules carry
//! typed record structs alongside the declarations so rows convert to and
//! from plain Rust values.

pub mod articles;
pub mod composite;
pub mod customers;
pub mod departments;
pub mod lending;
pub mod library;
pub mod orders;
pub mod profiles;
pub mod shop;
pub mod taxonomy;
pub mod trees;
pub mod vehicles;

use relmap_core::{Error, Fields, RecordId, Schema, Value};

/// Assemble the whole catalogue into one schema.
pub fn schema() -> Schema {
    let mut schema = Schema::new();

    for entity in [
        customers::customer_entity(),
        shop::category_entity(),
        shop::product_entity(),
        trees::tree_entity(),
        articles::tag_entity(),
        articles::article_entity(),
        taxonomy::topic_group_entity(),
        lending::book_entity(),
        lending::reader_entity(),
        lending::loan_entity(),
        profiles::account_entity(),
        profiles::profile_entity(),
        departments::department_entity(),
        library::booknew_entity(),
        library::magazine_entity(),
        library::dvd_entity(),
        vehicles::vehicle_entity(),
        vehicles::car_entity(),
        orders::order_item_entity(),
        composite::user_entity(),
        composite::custom_entity(),
        composite::user_account_profile_entity(),
    ] {
        schema = schema.with_entity(entity);
    }

    for relation in [
        shop::product_category_relation(),
        trees::tree_parent_relation(),
        articles::article_tags_relation(),
        taxonomy::topic_children_relation(),
        lending::loan_book_relation(),
        lending::loan_reader_relation(),
        profiles::profile_account_relation(),
        departments::department_parent_relation(),
        vehicles::car_vehicle_relation(),
    ] {
        schema = schema.with_relation(relation);
    }

    for constraint in [
        profiles::profile_account_unique(),
        departments::department_parent_unique(),
        vehicles::car_vehicle_unique(),
    ] {
        schema = schema.with_constraint(constraint);
    }

    schema
}

// Field extraction helpers shared by the record structs.

pub(crate) fn lookup<'a>(fields: &'a Fields, name: &str) -> Option<&'a Value> {
    fields.iter().find(|(n, _)| n == name).map(|(_, v)| v)
}

pub(crate) fn require_str(fields: &Fields, name: &str) -> Result<String, Error> {
    lookup(fields, name)
        .and_then(|v| v.as_str())
        .map(str::to_string)
        .ok_or_else(|| missing(name))
}

pub(crate) fn optional_str(fields: &Fields, name: &str) -> Option<String> {
    lookup(fields, name)
        .and_then(|v| v.as_str())
        .map(str::to_string)
}

pub(crate) fn require_i32(fields: &Fields, name: &str) -> Result<i32, Error> {
    lookup(fields, name)
        .and_then(|v| v.as_i32())
        .ok_or_else(|| missing(name))
}

pub(crate) fn require_f64(fields: &Fields, name: &str) -> Result<f64, Error> {
    lookup(fields, name)
        .and_then(|v| v.as_f64())
        .ok_or_else(|| missing(name))
}

pub(crate) fn require_bool(fields: &Fields, name: &str) -> Result<bool, Error> {
    lookup(fields, name)
        .and_then(|v| v.as_bool())
        .ok_or_else(|| missing(name))
}

pub(crate) fn require_date(fields: &Fields, name: &str) -> Result<i32, Error> {
    lookup(fields, name)
        .and_then(|v| v.as_date())
        .ok_or_else(|| missing(name))
}

pub(crate) fn optional_date(fields: &Fields, name: &str) -> Option<i32> {
    lookup(fields, name).and_then(|v| v.as_date())
}

pub(crate) fn require_id(fields: &Fields, name: &str) -> Result<RecordId, Error> {
    lookup(fields, name)
        .and_then(|v| v.as_id())
        .ok_or_else(|| missing(name))
}

pub(crate) fn optional_id(fields: &Fields, name: &str) -> Option<RecordId> {
    lookup(fields, name).and_then(|v| v.as_id())
}

fn missing(name: &str) -> Error {
    Error::InvalidData(format!("missing or mistyped field {}", name))
}
