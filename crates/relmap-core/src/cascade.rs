//! Delete-policy execution.
//!
//! Applies the declared behavior for every relation pointing at a deleted
//! row: CASCADE removes referencing rows recursively, SET NULL clears the
//! foreign key on them, RESTRICT refuses the delete while references exist.
//! Many-to-many memberships need no handling here: the store drops link
//! pairs together with either endpoint.

use std::collections::HashSet;

use tracing::debug;

use crate::catalog::{DeleteBehavior, Schema};
use crate::error::{CascadeError, Error};
use crate::store::{codec, RecordId, Row, Store};
use crate::value::Value;

/// Maximum cascade depth, guards against runaway recursion.
const MAX_CASCADE_DEPTH: usize = 32;

/// What a cascade pass did.
#[derive(Debug, Default)]
pub struct CascadeOutcome {
    /// Rows that were deleted, as (entity, id).
    pub deleted: Vec<(String, RecordId)>,
    /// Foreign keys that were cleared, as (entity, id, field).
    pub cleared: Vec<(String, RecordId, String)>,
}

impl CascadeOutcome {
    /// Total number of affected rows.
    pub fn affected_count(&self) -> usize {
        self.deleted.len() + self.cleared.len()
    }
}

/// Executes delete policies against the store.
pub struct CascadeExecutor<'a> {
    schema: &'a Schema,
    store: &'a Store,
}

impl<'a> CascadeExecutor<'a> {
    /// Create a new cascade executor.
    pub fn new(schema: &'a Schema, store: &'a Store) -> Self {
        Self { schema, store }
    }

    /// Apply delete policies for the removal of `entity`/`id`.
    ///
    /// The row itself is not removed; the caller does that after this
    /// returns. Fails without touching restrict-protected rows when a
    /// restrict relation still has references.
    pub fn process_delete(&self, entity: &str, id: RecordId) -> Result<CascadeOutcome, Error> {
        let mut outcome = CascadeOutcome::default();
        let mut visited = HashSet::new();
        self.process_recursive(entity, id, &mut outcome, &mut visited, 0)?;
        Ok(outcome)
    }

    /// Check whether a delete would pass restrict relations, without
    /// mutating anything.
    pub fn can_delete(&self, entity: &str, id: RecordId) -> Result<(), Error> {
        for relation in self.schema.relations_to(entity) {
            if relation.on_delete != DeleteBehavior::Restrict {
                continue;
            }
            let Some(field) = relation.field.as_deref() else {
                continue;
            };
            let referencing = self.find_referencing(&relation.entity, field, id)?;
            if !referencing.is_empty() {
                return Err(CascadeError::RestrictViolation {
                    entity: entity.to_string(),
                    referencing_entity: relation.entity.clone(),
                    count: referencing.len(),
                }
                .into());
            }
        }
        Ok(())
    }

    fn process_recursive(
        &self,
        entity: &str,
        id: RecordId,
        outcome: &mut CascadeOutcome,
        visited: &mut HashSet<RecordId>,
        depth: usize,
    ) -> Result<(), Error> {
        if depth > MAX_CASCADE_DEPTH {
            return Err(CascadeError::MaxDepthExceeded { depth }.into());
        }

        // Cycle guard for self-referential relations
        if !visited.insert(id) {
            return Ok(());
        }

        for relation in self.schema.relations_to(entity) {
            let Some(field) = relation.field.as_deref() else {
                continue; // many-to-many, handled by link purging
            };

            let referencing = self.find_referencing(&relation.entity, field, id)?;
            if referencing.is_empty() {
                continue;
            }

            match relation.on_delete {
                DeleteBehavior::Restrict => {
                    return Err(CascadeError::RestrictViolation {
                        entity: entity.to_string(),
                        referencing_entity: relation.entity.clone(),
                        count: referencing.len(),
                    }
                    .into());
                }
                DeleteBehavior::Cascade => {
                    for ref_id in referencing {
                        self.process_recursive(
                            &relation.entity,
                            ref_id,
                            outcome,
                            visited,
                            depth + 1,
                        )?;
                        self.store.remove(&relation.entity, ref_id)?;
                        debug!(
                            entity = relation.entity.as_str(),
                            id = %ref_id,
                            "cascade delete"
                        );
                        outcome.deleted.push((relation.entity.clone(), ref_id));
                    }
                }
                DeleteBehavior::SetNull => {
                    for ref_id in referencing {
                        self.clear_field(&relation.entity, ref_id, field)?;
                        debug!(
                            entity = relation.entity.as_str(),
                            id = %ref_id,
                            field,
                            "cleared reference"
                        );
                        outcome
                            .cleared
                            .push((relation.entity.clone(), ref_id, field.to_string()));
                    }
                }
            }
        }

        Ok(())
    }

    /// All rows of `entity` whose `field` references `target`.
    fn find_referencing(
        &self,
        entity: &str,
        field: &str,
        target: RecordId,
    ) -> Result<Vec<RecordId>, Error> {
        let mut referencing = Vec::new();
        for result in self.store.scan(entity) {
            let (id, row) = result?;
            if codec::get_field(&row.data, field)? == Some(Value::Id(target)) {
                referencing.push(id);
            }
        }
        Ok(referencing)
    }

    /// Rewrite a row with one field set to null.
    fn clear_field(&self, entity: &str, id: RecordId, field: &str) -> Result<(), Error> {
        let Some(row) = self.store.get(id)? else {
            return Ok(()); // already gone
        };

        let mut fields = codec::decode_fields(&row.data)?;
        match fields.iter_mut().find(|(name, _)| name == field) {
            Some((_, value)) => *value = Value::Null,
            None => fields.push((field.to_string(), Value::Null)),
        }

        let encoded = codec::encode_fields(&fields)?;
        self.store.put(entity, id, Row::new(encoded))?;
        Ok(())
    }
}
