//! Multi-table extension: a car row extending a vehicle row by reference.
//!
//! Car's table holds only its own fields plus a link to the Vehicle row;
//! reading a whole car is an application-level join of the two.

use relmap_core::{
    ConstraintDef, Database, DefaultValue, DeleteBehavior, EntityDef, Error, FieldDef, FieldType,
    Fields, RecordId, RelationDef, ScalarType,
};

use crate::{require_bool, require_i32, require_id, require_str};

/// Entity names.
pub const VEHICLE: &str = "Vehicle";
pub const CAR: &str = "Car";

/// Relation name.
pub const CAR_VEHICLE: &str = "car_vehicle";

/// Declare the Vehicle base entity.
pub fn vehicle_entity() -> EntityDef {
    EntityDef::new(VEHICLE)
        .with_field(FieldDef::new(
            "model",
            FieldType::scalar(ScalarType::String),
        ))
        .with_field(FieldDef::new(
            "year",
            FieldType::scalar(ScalarType::Int32),
        ))
}

/// Declare the Car extension entity.
pub fn car_entity() -> EntityDef {
    EntityDef::new(CAR)
        .with_field(FieldDef::new(
            "vehicle_id",
            FieldType::scalar(ScalarType::Id),
        ))
        .with_field(FieldDef::new(
            "doors",
            FieldType::scalar(ScalarType::Int32),
        ))
        .with_field(
            FieldDef::new("has_trunk", FieldType::scalar(ScalarType::Bool))
                .with_default(DefaultValue::Bool(true)),
        )
}

/// The extension row goes down with its base row.
pub fn car_vehicle_relation() -> RelationDef {
    RelationDef::one_to_one(CAR_VEHICLE, CAR, "vehicle_id", VEHICLE)
        .with_on_delete(DeleteBehavior::Cascade)
}

/// One extension row per base row.
pub fn car_vehicle_unique() -> ConstraintDef {
    ConstraintDef::unique("car_vehicle_unique", CAR, "vehicle_id")
}

/// A vehicle base row.
#[derive(Debug, Clone, PartialEq)]
pub struct Vehicle {
    pub model: String,
    pub year: i32,
}

impl Vehicle {
    pub fn fields(&self) -> Fields {
        vec![
            ("model".into(), self.model.clone().into()),
            ("year".into(), self.year.into()),
        ]
    }

    pub fn from_fields(fields: &Fields) -> Result<Self, Error> {
        Ok(Self {
            model: require_str(fields, "model")?,
            year: require_i32(fields, "year")?,
        })
    }
}

/// A car extension row.
#[derive(Debug, Clone, PartialEq)]
pub struct Car {
    pub vehicle_id: RecordId,
    pub doors: i32,
    pub has_trunk: bool,
}

impl Car {
    pub fn fields(&self) -> Fields {
        vec![
            ("vehicle_id".into(), self.vehicle_id.into()),
            ("doors".into(), self.doors.into()),
            ("has_trunk".into(), self.has_trunk.into()),
        ]
    }

    pub fn from_fields(fields: &Fields) -> Result<Self, Error> {
        Ok(Self {
            vehicle_id: require_id(fields, "vehicle_id")?,
            doors: require_i32(fields, "doors")?,
            has_trunk: require_bool(fields, "has_trunk")?,
        })
    }
}

/// Join a car with its vehicle base row.
pub fn car_with_base(db: &Database, car_id: RecordId) -> Result<(Car, Vehicle), Error> {
    let car = Car::from_fields(&db.get(CAR, car_id)?)?;
    let vehicle = Vehicle::from_fields(&db.get(VEHICLE, car.vehicle_id)?)?;
    Ok((car, vehicle))
}

#[cfg(test)]
mod tests {
    use super::*;
    use relmap_core::ConstraintError;

    fn hatchback(db: &Database) -> (RecordId, RecordId) {
        let vehicle = db
            .insert(
                VEHICLE,
                Vehicle {
                    model: "Niva".into(),
                    year: 1994,
                }
                .fields(),
            )
            .unwrap();
        let car = db
            .insert(
                CAR,
                vec![
                    ("vehicle_id".into(), vehicle.into()),
                    ("doors".into(), relmap_core::Value::Int32(3)),
                ],
            )
            .unwrap();
        (vehicle, car)
    }

    #[test]
    fn test_join_reads_both_rows() {
        let db = Database::temporary(crate::schema()).unwrap();
        let (vehicle, car) = hatchback(&db);

        let (car_row, base) = car_with_base(&db, car).unwrap();

        assert_eq!(car_row.vehicle_id, vehicle);
        assert_eq!(car_row.doors, 3);
        assert_eq!(base.model, "Niva");
        assert_eq!(base.year, 1994);
    }

    #[test]
    fn test_has_trunk_defaults_to_true() {
        let db = Database::temporary(crate::schema()).unwrap();
        let (_, car) = hatchback(&db);

        let car = Car::from_fields(&db.get(CAR, car).unwrap()).unwrap();
        assert!(car.has_trunk);
    }

    #[test]
    fn test_one_extension_per_base() {
        let db = Database::temporary(crate::schema()).unwrap();
        let (vehicle, _) = hatchback(&db);

        let result = db.insert(
            CAR,
            vec![
                ("vehicle_id".into(), vehicle.into()),
                ("doors".into(), relmap_core::Value::Int32(5)),
            ],
        );

        assert!(matches!(
            result,
            Err(Error::Constraint(ConstraintError::UniqueViolation { .. }))
        ));
    }

    #[test]
    fn test_deleting_base_deletes_extension() {
        let db = Database::temporary(crate::schema()).unwrap();
        let (vehicle, car) = hatchback(&db);

        db.delete(VEHICLE, vehicle).unwrap();

        assert!(matches!(db.get(CAR, car), Err(Error::NotFound)));
    }
}
