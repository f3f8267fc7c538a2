//! Field composition: one entity combining two unrelated field sets.
//!
//! The original derived UserProfiles from two base classes at once. There is
//! no clean analogue for that outside its source ecosystem, so the combined
//! entity simply embeds both field sets directly.

use relmap_core::{EntityDef, Error, FieldDef, FieldType, Fields, ScalarType};

use crate::require_str;

/// Entity names.
pub const USER: &str = "User";
pub const CUSTOM: &str = "Custom";
pub const USER_ACCOUNT_PROFILE: &str = "UserAccountProfile";

/// The credential field set.
pub fn user_fields() -> Vec<FieldDef> {
    vec![
        FieldDef::new("username", FieldType::scalar(ScalarType::String)),
        FieldDef::new("password", FieldType::scalar(ScalarType::String)),
    ]
}

/// The address field set.
pub fn custom_fields() -> Vec<FieldDef> {
    vec![FieldDef::new(
        "address",
        FieldType::scalar(ScalarType::String),
    )]
}

/// Declare the User entity.
pub fn user_entity() -> EntityDef {
    EntityDef::new(USER).with_fields(user_fields())
}

/// Declare the Custom entity.
pub fn custom_entity() -> EntityDef {
    EntityDef::new(CUSTOM).with_fields(custom_fields())
}

/// Declare the combined entity: both field sets in one table.
pub fn user_account_profile_entity() -> EntityDef {
    EntityDef::new(USER_ACCOUNT_PROFILE)
        .with_fields(user_fields())
        .with_fields(custom_fields())
}

/// A user row.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub username: String,
    pub password: String,
}

impl User {
    pub fn fields(&self) -> Fields {
        vec![
            ("username".into(), self.username.clone().into()),
            ("password".into(), self.password.clone().into()),
        ]
    }

    pub fn from_fields(fields: &Fields) -> Result<Self, Error> {
        Ok(Self {
            username: require_str(fields, "username")?,
            password: require_str(fields, "password")?,
        })
    }
}

/// A custom row.
#[derive(Debug, Clone, PartialEq)]
pub struct Custom {
    pub address: String,
}

impl Custom {
    pub fn fields(&self) -> Fields {
        vec![("address".into(), self.address.clone().into())]
    }

    pub fn from_fields(fields: &Fields) -> Result<Self, Error> {
        Ok(Self {
            address: require_str(fields, "address")?,
        })
    }
}

/// The combined row: both embedded field sets.
#[derive(Debug, Clone, PartialEq)]
pub struct UserAccountProfile {
    pub user: User,
    pub custom: Custom,
}

impl UserAccountProfile {
    pub fn fields(&self) -> Fields {
        let mut fields = self.user.fields();
        fields.extend(self.custom.fields());
        fields
    }

    pub fn from_fields(fields: &Fields) -> Result<Self, Error> {
        Ok(Self {
            user: User::from_fields(fields)?,
            custom: Custom::from_fields(fields)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relmap_core::Database;

    #[test]
    fn test_combined_entity_has_both_field_sets() {
        let entity = user_account_profile_entity();

        assert!(entity.field("username").is_some());
        assert!(entity.field("password").is_some());
        assert!(entity.field("address").is_some());
        assert_eq!(entity.fields.len(), 3);
    }

    #[test]
    fn test_combined_roundtrip() {
        let db = Database::temporary(crate::schema()).unwrap();

        let combined = UserAccountProfile {
            user: User {
                username: "admin".into(),
                password: "root".into(),
            },
            custom: Custom {
                address: "1 Main St".into(),
            },
        };
        let id = db.insert(USER_ACCOUNT_PROFILE, combined.fields()).unwrap();

        let stored =
            UserAccountProfile::from_fields(&db.get(USER_ACCOUNT_PROFILE, id).unwrap()).unwrap();
        assert_eq!(stored, combined);
    }

    #[test]
    fn test_base_entities_stand_alone() {
        let db = Database::temporary(crate::schema()).unwrap();

        let user = db
            .insert(
                USER,
                User {
                    username: "alice".into(),
                    password: "secret".into(),
                }
                .fields(),
            )
            .unwrap();
        let custom = db
            .insert(CUSTOM, Custom { address: "2 Side St".into() }.fields())
            .unwrap();

        assert!(db.get(USER, user).is_ok());
        assert!(db.get(CUSTOM, custom).is_ok());
    }
}
