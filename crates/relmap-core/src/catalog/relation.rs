//! Relation definitions between entities.

/// Cardinality of a relation, declared from the owning side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    /// Many rows of the owning entity reference one target row (foreign key).
    ManyToOne,
    /// At most one owning row references a target row (unique foreign key).
    OneToOne,
    /// Unordered set membership between the two sides (link store).
    ManyToMany,
}

/// Behavior when a referenced row is deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteBehavior {
    /// Delete referencing rows.
    Cascade,
    /// Prevent deletion while referencing rows exist.
    Restrict,
    /// Clear the foreign key on referencing rows.
    SetNull,
}

/// A relation declaration between two entities.
///
/// Foreign-key relations (`ManyToOne`, `OneToOne`) name the field on the
/// owning entity that carries the reference. Many-to-many relations have no
/// field: their memberships live in the link store under the relation name.
#[derive(Debug, Clone, PartialEq)]
pub struct RelationDef {
    /// Relation name (unique within schema).
    pub name: String,
    /// Owning entity.
    pub entity: String,
    /// Foreign-key field on the owning entity, absent for many-to-many.
    pub field: Option<String>,
    /// Target entity.
    pub target: String,
    /// Relation cardinality.
    pub cardinality: Cardinality,
    /// Delete behavior applied when a target row is deleted.
    pub on_delete: DeleteBehavior,
}

impl RelationDef {
    /// Declare a many-to-one relation (foreign key on the owning side).
    pub fn many_to_one(
        name: impl Into<String>,
        entity: impl Into<String>,
        field: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            entity: entity.into(),
            field: Some(field.into()),
            target: target.into(),
            cardinality: Cardinality::ManyToOne,
            on_delete: DeleteBehavior::Restrict,
        }
    }

    /// Declare a one-to-one relation (unique foreign key).
    pub fn one_to_one(
        name: impl Into<String>,
        entity: impl Into<String>,
        field: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            entity: entity.into(),
            field: Some(field.into()),
            target: target.into(),
            cardinality: Cardinality::OneToOne,
            on_delete: DeleteBehavior::Restrict,
        }
    }

    /// Declare a many-to-many relation with an implicit join.
    ///
    /// Memberships are stored as link pairs under the relation name, so
    /// deleting a row on either side drops its memberships with it.
    pub fn many_to_many(
        name: impl Into<String>,
        entity: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            entity: entity.into(),
            field: None,
            target: target.into(),
            cardinality: Cardinality::ManyToMany,
            on_delete: DeleteBehavior::Cascade,
        }
    }

    /// Set the delete behavior.
    pub fn with_on_delete(mut self, on_delete: DeleteBehavior) -> Self {
        self.on_delete = on_delete;
        self
    }

    /// Check if this is a many-to-many relation.
    pub fn is_many_to_many(&self) -> bool {
        self.cardinality == Cardinality::ManyToMany
    }

    /// Check if this relation is carried by a foreign-key field.
    pub fn is_foreign_key(&self) -> bool {
        self.field.is_some()
    }

    /// Check if this relation points back at its owning entity.
    pub fn is_self_referential(&self) -> bool {
        self.entity == self.target
    }
}
