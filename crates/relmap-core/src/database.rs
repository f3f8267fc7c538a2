//! Database facade combining the row store and the declared schema.
//!
//! All writes flow through here so the declared shape is enforced: required
//! fields and defaults on insert, foreign-key existence, unique constraints,
//! and delete policies via the cascade executor.

use std::cmp::Ordering;

use tracing::{debug, info};

use crate::cascade::{CascadeExecutor, CascadeOutcome};
use crate::catalog::{
    DefaultValue, EntityDef, FieldDef, FieldType, OrderDirection, RelationDef, ScalarType, Schema,
};
use crate::error::{ConstraintError, Error};
use crate::store::{codec, current_date, RecordId, Row, Store, StoreConfig};
use crate::value::Value;

/// Decoded row fields in declaration order.
pub type Fields = Vec<(String, Value)>;

/// An embedded database: a row store plus the schema that governs it.
pub struct Database {
    store: Store,
    schema: Schema,
}

impl Database {
    /// Open a database with the given configuration and schema.
    ///
    /// The schema is validated before the store opens.
    pub fn open(config: StoreConfig, schema: Schema) -> Result<Self, Error> {
        schema.validate()?;
        let store = Store::open(config)?;
        Ok(Self { store, schema })
    }

    /// Open a throwaway database for tests and demos.
    pub fn temporary(schema: Schema) -> Result<Self, Error> {
        Self::open(StoreConfig::temporary(), schema)
    }

    /// Get the governing schema.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Get the underlying store.
    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Flush pending writes to disk.
    pub fn flush(&self) -> Result<(), Error> {
        self.store.flush()
    }

    /// Insert a row, returning its generated id.
    ///
    /// Fields not provided fall back to their declared default or to null
    /// when nullable; a required field with neither is an error.
    pub fn insert(&self, entity: &str, fields: Fields) -> Result<RecordId, Error> {
        let def = self.entity_def(entity)?;
        self.reject_unknown_fields(def, &fields)?;

        let mut row_fields: Fields = Vec::with_capacity(def.fields.len());
        for field in &def.fields {
            let provided = fields
                .iter()
                .find(|(name, _)| name == &field.name)
                .map(|(_, value)| value.clone());

            let value = match provided {
                Some(value) => value,
                None => match &field.default {
                    Some(default) => materialize_default(field, default),
                    None => Value::Null,
                },
            };

            if value.is_null() {
                if field.required {
                    return Err(ConstraintError::MissingField {
                        entity: entity.to_string(),
                        field: field.name.clone(),
                    }
                    .into());
                }
            } else {
                check_value_type(entity, field, &value)?;
            }

            row_fields.push((field.name.clone(), value));
        }

        self.check_foreign_keys(entity, &row_fields, None)?;
        self.check_unique(entity, &row_fields, None)?;

        let id = RecordId::generate();
        let data = codec::encode_fields(&row_fields)?;
        self.store.put(entity, id, Row::new(data))?;
        debug!(entity, id = %id, "inserted row");
        Ok(id)
    }

    /// Read a row's fields.
    pub fn get(&self, entity: &str, id: RecordId) -> Result<Fields, Error> {
        let row = self.fetch(entity, id)?;
        codec::decode_fields(&row.data)
    }

    /// Read a single field of a row.
    pub fn field(&self, entity: &str, id: RecordId, name: &str) -> Result<Option<Value>, Error> {
        let row = self.fetch(entity, id)?;
        codec::get_field(&row.data, name)
    }

    /// Update a row with the given field changes.
    pub fn update(&self, entity: &str, id: RecordId, changes: Fields) -> Result<(), Error> {
        let def = self.entity_def(entity)?;
        self.reject_unknown_fields(def, &changes)?;

        let row = self.fetch(entity, id)?;
        let mut row_fields = codec::decode_fields(&row.data)?;

        let mut changed_names = Vec::with_capacity(changes.len());
        for (name, value) in changes {
            let field = def.field(&name).ok_or_else(|| {
                Error::InvalidData(format!("unknown field {}.{}", entity, name))
            })?;
            if value.is_null() {
                if field.required {
                    return Err(ConstraintError::MissingField {
                        entity: entity.to_string(),
                        field: name,
                    }
                    .into());
                }
            } else {
                check_value_type(entity, field, &value)?;
            }

            match row_fields.iter().position(|(n, _)| *n == name) {
                Some(i) => row_fields[i].1 = value,
                None => row_fields.push((name.clone(), value)),
            }
            changed_names.push(name);
        }

        self.check_foreign_keys(entity, &row_fields, Some(&changed_names))?;
        self.check_unique_excluding(entity, &row_fields, Some(&changed_names), id)?;

        let data = codec::encode_fields(&row_fields)?;
        self.store.put(entity, id, Row::new(data))?;
        debug!(entity, id = %id, "updated row");
        Ok(())
    }

    /// Delete a row, applying the declared delete policies.
    pub fn delete(&self, entity: &str, id: RecordId) -> Result<CascadeOutcome, Error> {
        if !self.store.contains(entity, id)? {
            return Err(Error::NotFound);
        }

        let cascade = CascadeExecutor::new(&self.schema, &self.store);
        cascade.can_delete(entity, id)?;
        let outcome = cascade.process_delete(entity, id)?;
        self.store.remove(entity, id)?;
        info!(
            entity,
            id = %id,
            affected = outcome.affected_count(),
            "deleted row"
        );
        Ok(outcome)
    }

    /// List all rows of an entity, sorted by its declared default order.
    pub fn list(&self, entity: &str) -> Result<Vec<(RecordId, Fields)>, Error> {
        let def = self.entity_def(entity)?;

        let mut rows = Vec::new();
        for result in self.store.scan(entity) {
            let (id, row) = result?;
            rows.push((id, codec::decode_fields(&row.data)?));
        }

        if let Some(order) = &def.default_order {
            rows.sort_by(|(_, a), (_, b)| {
                for spec in order {
                    let left = field_value(a, &spec.field);
                    let right = field_value(b, &spec.field);
                    let mut ord = compare_values(left, right);
                    if spec.direction == OrderDirection::Desc {
                        ord = ord.reverse();
                    }
                    if ord != Ordering::Equal {
                        return ord;
                    }
                }
                Ordering::Equal
            });
        }

        Ok(rows)
    }

    /// Add a many-to-many membership. Idempotent.
    pub fn link(&self, relation: &str, from: RecordId, to: RecordId) -> Result<(), Error> {
        let rel = self.membership_relation(relation)?;
        if !self.store.contains(&rel.entity, from)? || !self.store.contains(&rel.target, to)? {
            return Err(Error::NotFound);
        }
        self.store.link(relation, from, to)?;
        debug!(relation, from = %from, to = %to, "linked");
        Ok(())
    }

    /// Remove a many-to-many membership.
    pub fn unlink(&self, relation: &str, from: RecordId, to: RecordId) -> Result<(), Error> {
        self.membership_relation(relation)?;
        self.store.unlink(relation, from, to)
    }

    /// Ids linked from `from` under a many-to-many relation, each exactly
    /// once.
    pub fn related(&self, relation: &str, from: RecordId) -> Result<Vec<RecordId>, Error> {
        self.membership_relation(relation)?;
        self.store.linked(relation, from)
    }

    /// Ids linking to `to` under a many-to-many relation.
    pub fn related_rev(&self, relation: &str, to: RecordId) -> Result<Vec<RecordId>, Error> {
        self.membership_relation(relation)?;
        self.store.linked_rev(relation, to)
    }

    fn entity_def(&self, entity: &str) -> Result<&EntityDef, Error> {
        self.schema
            .entity(entity)
            .ok_or_else(|| ConstraintError::UnknownEntity(entity.to_string()).into())
    }

    fn membership_relation(&self, relation: &str) -> Result<&RelationDef, Error> {
        let rel = self
            .schema
            .relation(relation)
            .ok_or_else(|| Error::from(ConstraintError::UnknownRelation(relation.to_string())))?;
        if !rel.is_many_to_many() {
            return Err(Error::InvalidData(format!(
                "relation {} is not many-to-many",
                relation
            )));
        }
        Ok(rel)
    }

    fn fetch(&self, entity: &str, id: RecordId) -> Result<Row, Error> {
        if !self.store.contains(entity, id)? {
            return Err(Error::NotFound);
        }
        self.store.get(id)?.ok_or(Error::NotFound)
    }

    fn reject_unknown_fields(&self, def: &EntityDef, fields: &Fields) -> Result<(), Error> {
        for (name, _) in fields {
            if def.field(name).is_none() {
                return Err(Error::InvalidData(format!(
                    "unknown field {}.{}",
                    def.name, name
                )));
            }
        }
        Ok(())
    }

    /// Verify that foreign keys point at existing rows.
    ///
    /// With `changed` set, only relations whose field is in the list are
    /// checked (update path).
    fn check_foreign_keys(
        &self,
        entity: &str,
        row_fields: &Fields,
        changed: Option<&[String]>,
    ) -> Result<(), Error> {
        for relation in self.schema.relations_from(entity) {
            let Some(field) = relation.field.as_deref() else {
                continue;
            };
            if let Some(changed) = changed {
                if !changed.iter().any(|name| name == field) {
                    continue;
                }
            }

            let value = field_value(row_fields, field);
            let Some(value) = value else { continue };
            if value.is_null() {
                continue;
            }

            let target_id = value.as_id().ok_or_else(|| {
                Error::InvalidData(format!("field {}.{} expects an id", entity, field))
            })?;
            if !self.store.contains(&relation.target, target_id)? {
                return Err(ConstraintError::ForeignKeyViolation {
                    entity: entity.to_string(),
                    field: field.to_string(),
                    references: relation.target.clone(),
                }
                .into());
            }
        }
        Ok(())
    }

    fn check_unique(
        &self,
        entity: &str,
        row_fields: &Fields,
        changed: Option<&[String]>,
    ) -> Result<(), Error> {
        self.check_unique_inner(entity, row_fields, changed, None)
    }

    fn check_unique_excluding(
        &self,
        entity: &str,
        row_fields: &Fields,
        changed: Option<&[String]>,
        exclude: RecordId,
    ) -> Result<(), Error> {
        self.check_unique_inner(entity, row_fields, changed, Some(exclude))
    }

    /// Scan-based unique enforcement. Rows whose constrained values include
    /// null are exempt, as in SQL.
    fn check_unique_inner(
        &self,
        entity: &str,
        row_fields: &Fields,
        changed: Option<&[String]>,
        exclude: Option<RecordId>,
    ) -> Result<(), Error> {
        for constraint in self.schema.constraints_for(entity) {
            if let Some(changed) = changed {
                if !constraint
                    .fields()
                    .iter()
                    .any(|f| changed.iter().any(|name| name == f))
                {
                    continue;
                }
            }

            let values: Vec<&Value> = constraint
                .fields()
                .iter()
                .filter_map(|f| field_value(row_fields, f))
                .collect();
            if values.len() != constraint.fields().len() || values.iter().any(|v| v.is_null()) {
                continue;
            }

            for result in self.store.scan(entity) {
                let (other_id, row) = result?;
                if exclude == Some(other_id) {
                    continue;
                }
                let mut all_equal = true;
                for (field, value) in constraint.fields().iter().zip(&values) {
                    if codec::get_field(&row.data, field)?.as_ref() != Some(*value) {
                        all_equal = false;
                        break;
                    }
                }
                if all_equal {
                    return Err(ConstraintError::UniqueViolation {
                        constraint: constraint.name().to_string(),
                        entity: entity.to_string(),
                        fields: constraint.fields().to_vec(),
                    }
                    .into());
                }
            }
        }
        Ok(())
    }
}

fn field_value<'a>(fields: &'a Fields, name: &str) -> Option<&'a Value> {
    fields.iter().find(|(n, _)| n == name).map(|(_, v)| v)
}

/// Turn a declared default into a runtime value matching the field's type.
fn materialize_default(field: &FieldDef, default: &DefaultValue) -> Value {
    match default {
        DefaultValue::Bool(b) => Value::Bool(*b),
        DefaultValue::Int(n) => match field.field_type.scalar_type() {
            Some(ScalarType::Int64) => Value::Int64(*n),
            Some(ScalarType::Float64) | Some(ScalarType::Decimal { .. }) => {
                Value::Float64(*n as f64)
            }
            _ => Value::Int32(*n as i32),
        },
        DefaultValue::Float(f) => Value::Float64(*f),
        DefaultValue::String(s) => Value::String(s.clone()),
        DefaultValue::CurrentDate => Value::Date(current_date()),
    }
}

/// Check a non-null value against the declared field type.
fn check_value_type(entity: &str, field: &FieldDef, value: &Value) -> Result<(), Error> {
    let mismatch = || {
        Err(Error::InvalidData(format!(
            "value for {}.{} does not match its declared type",
            entity, field.name
        )))
    };

    match &field.field_type {
        FieldType::Enum { variants, .. } | FieldType::OptionalEnum { variants, .. } => {
            match value.as_str() {
                Some(s) if variants.iter().any(|v| v == s) => Ok(()),
                _ => mismatch(),
            }
        }
        FieldType::Scalar(scalar) | FieldType::OptionalScalar(scalar) => {
            let ok = match scalar {
                ScalarType::Bool => matches!(value, Value::Bool(_)),
                ScalarType::Int32 => matches!(value, Value::Int32(_)),
                ScalarType::Int64 => matches!(value, Value::Int32(_) | Value::Int64(_)),
                ScalarType::Float64 | ScalarType::Decimal { .. } => {
                    matches!(value, Value::Float64(_))
                }
                ScalarType::String | ScalarType::Text => matches!(value, Value::String(_)),
                ScalarType::Date => matches!(value, Value::Date(_)),
                ScalarType::Timestamp => matches!(value, Value::Timestamp(_)),
                ScalarType::Id => matches!(value, Value::Id(_)),
            };
            if ok {
                Ok(())
            } else {
                mismatch()
            }
        }
    }
}

/// Ordering between two optional values, nulls first; values of different
/// shapes compare equal.
fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    let (a, b) = match (a, b) {
        (None, None) => return Ordering::Equal,
        (None, Some(_)) => return Ordering::Less,
        (Some(_), None) => return Ordering::Greater,
        (Some(a), Some(b)) => (a, b),
    };

    match (a, b) {
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::Null, _) => Ordering::Less,
        (_, Value::Null) => Ordering::Greater,
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Int32(x), Value::Int32(y)) => x.cmp(y),
        (Value::Int64(x), Value::Int64(y)) => x.cmp(y),
        (Value::Float64(x), Value::Float64(y)) => x.partial_cmp(y).unwrap_or(Ordering::Equal),
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Date(x), Value::Date(y)) => x.cmp(y),
        (Value::Timestamp(x), Value::Timestamp(y)) => x.cmp(y),
        (Value::Id(x), Value::Id(y)) => x.cmp(y),
        _ => Ordering::Equal,
    }
}
