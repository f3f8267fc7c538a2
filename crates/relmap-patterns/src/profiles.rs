//! One-to-one: a profile extending an account, removed with it.

use std::fmt;

use relmap_core::{
    ConstraintDef, Database, DeleteBehavior, EntityDef, Error, FieldDef, FieldType, Fields,
    RecordId, RelationDef, ScalarType, Value,
};

use crate::{optional_date, optional_str, require_id, require_str};

/// Entity names.
pub const ACCOUNT: &str = "Account";
pub const PROFILE: &str = "Profile";

/// Relation name.
pub const PROFILE_ACCOUNT: &str = "profile_account";

/// Declare the Account entity.
pub fn account_entity() -> EntityDef {
    EntityDef::new(ACCOUNT)
        .with_field(FieldDef::new(
            "username",
            FieldType::scalar(ScalarType::String),
        ))
        .with_field(FieldDef::optional("email", ScalarType::String))
        .with_field(FieldDef::new(
            "password",
            FieldType::scalar(ScalarType::String),
        ))
}

/// Declare the Profile entity.
pub fn profile_entity() -> EntityDef {
    EntityDef::new(PROFILE)
        .with_field(FieldDef::new(
            "account_id",
            FieldType::scalar(ScalarType::Id),
        ))
        .with_field(FieldDef::optional("bio", ScalarType::Text))
        .with_field(FieldDef::optional("birth_date", ScalarType::Date))
}

/// Each profile belongs to one account and goes down with it.
pub fn profile_account_relation() -> RelationDef {
    RelationDef::one_to_one(PROFILE_ACCOUNT, PROFILE, "account_id", ACCOUNT)
        .with_on_delete(DeleteBehavior::Cascade)
}

/// One profile per account.
pub fn profile_account_unique() -> ConstraintDef {
    ConstraintDef::unique("profile_account_unique", PROFILE, "account_id")
}

/// An account row.
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    pub username: String,
    pub email: Option<String>,
    pub password: String,
}

impl Account {
    pub fn fields(&self) -> Fields {
        vec![
            ("username".into(), self.username.clone().into()),
            ("email".into(), self.email.clone().into()),
            ("password".into(), self.password.clone().into()),
        ]
    }

    pub fn from_fields(fields: &Fields) -> Result<Self, Error> {
        Ok(Self {
            username: require_str(fields, "username")?,
            email: optional_str(fields, "email"),
            password: require_str(fields, "password")?,
        })
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.username)
    }
}

/// A profile row.
#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    pub account_id: RecordId,
    pub bio: Option<String>,
    /// Days since the Unix epoch.
    pub birth_date: Option<i32>,
}

impl Profile {
    pub fn fields(&self) -> Fields {
        vec![
            ("account_id".into(), self.account_id.into()),
            ("bio".into(), self.bio.clone().into()),
            (
                "birth_date".into(),
                self.birth_date.map(Value::Date).unwrap_or(Value::Null),
            ),
        ]
    }

    pub fn from_fields(fields: &Fields) -> Result<Self, Error> {
        Ok(Self {
            account_id: require_id(fields, "account_id")?,
            bio: optional_str(fields, "bio"),
            birth_date: optional_date(fields, "birth_date"),
        })
    }
}

/// A profile is labeled by its account's username.
pub fn profile_label(db: &Database, profile_id: RecordId) -> Result<String, Error> {
    let profile = Profile::from_fields(&db.get(PROFILE, profile_id)?)?;
    let account = Account::from_fields(&db.get(ACCOUNT, profile.account_id)?)?;
    Ok(account.username)
}

#[cfg(test)]
mod tests {
    use super::*;
    use relmap_core::ConstraintError;

    fn admin(db: &Database) -> (RecordId, RecordId) {
        let account = db
            .insert(
                ACCOUNT,
                Account {
                    username: "admin".into(),
                    email: Some("admin@example.com".into()),
                    password: "root".into(),
                }
                .fields(),
            )
            .unwrap();
        let profile = db
            .insert(
                PROFILE,
                Profile {
                    account_id: account,
                    bio: Some("About me".into()),
                    birth_date: Some(10_957), // 2000-01-01
                }
                .fields(),
            )
            .unwrap();
        (account, profile)
    }

    #[test]
    fn test_label_is_the_username() {
        let db = Database::temporary(crate::schema()).unwrap();
        let (_, profile) = admin(&db);

        assert_eq!(profile_label(&db, profile).unwrap(), "admin");
    }

    #[test]
    fn test_one_profile_per_account() {
        let db = Database::temporary(crate::schema()).unwrap();
        let (account, _) = admin(&db);

        let result = db.insert(
            PROFILE,
            Profile {
                account_id: account,
                bio: None,
                birth_date: None,
            }
            .fields(),
        );

        assert!(matches!(
            result,
            Err(Error::Constraint(ConstraintError::UniqueViolation { .. }))
        ));
    }

    #[test]
    fn test_deleting_account_deletes_profile() {
        let db = Database::temporary(crate::schema()).unwrap();
        let (account, profile) = admin(&db);

        db.delete(ACCOUNT, account).unwrap();

        assert!(matches!(db.get(PROFILE, profile), Err(Error::NotFound)));
    }
}
