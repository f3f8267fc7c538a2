//! Many-to-many with an implicit join: articles carrying a set of tags.

use std::fmt;

use relmap_core::{EntityDef, Error, FieldDef, FieldType, Fields, RelationDef, ScalarType};

use crate::require_str;

/// Entity names.
pub const TAG: &str = "Tag";
pub const ARTICLE: &str = "Article";

/// Relation name.
pub const ARTICLE_TAGS: &str = "article_tags";

/// Declare the Tag entity.
pub fn tag_entity() -> EntityDef {
    EntityDef::new(TAG).with_field(FieldDef::new(
        "name",
        FieldType::scalar(ScalarType::String),
    ))
}

/// Declare the Article entity.
pub fn article_entity() -> EntityDef {
    EntityDef::new(ARTICLE).with_field(FieldDef::new(
        "title",
        FieldType::scalar(ScalarType::String),
    ))
}

/// Articles hold an unordered set of tags.
pub fn article_tags_relation() -> RelationDef {
    RelationDef::many_to_many(ARTICLE_TAGS, ARTICLE, TAG)
}

/// A tag row.
#[derive(Debug, Clone, PartialEq)]
pub struct Tag {
    pub name: String,
}

impl Tag {
    pub fn fields(&self) -> Fields {
        vec![("name".into(), self.name.clone().into())]
    }

    pub fn from_fields(fields: &Fields) -> Result<Self, Error> {
        Ok(Self {
            name: require_str(fields, "name")?,
        })
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// An article row.
#[derive(Debug, Clone, PartialEq)]
pub struct Article {
    pub title: String,
}

impl Article {
    pub fn fields(&self) -> Fields {
        vec![("title".into(), self.title.clone().into())]
    }

    pub fn from_fields(fields: &Fields) -> Result<Self, Error> {
        Ok(Self {
            title: require_str(fields, "title")?,
        })
    }
}

impl fmt::Display for Article {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.title)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relmap_core::Database;

    #[test]
    fn test_membership_is_a_set() {
        let db = Database::temporary(crate::schema()).unwrap();

        let article = db
            .insert(ARTICLE, Article { title: "On Maps".into() }.fields())
            .unwrap();
        let tag = db.insert(TAG, Tag { name: "geo".into() }.fields()).unwrap();

        // Re-adding the same tag must not duplicate the membership
        db.link(ARTICLE_TAGS, article, tag).unwrap();
        db.link(ARTICLE_TAGS, article, tag).unwrap();
        db.link(ARTICLE_TAGS, article, tag).unwrap();

        assert_eq!(db.related(ARTICLE_TAGS, article).unwrap(), vec![tag]);
        assert_eq!(db.related_rev(ARTICLE_TAGS, tag).unwrap(), vec![article]);
    }

    #[test]
    fn test_deleting_tag_removes_memberships() {
        let db = Database::temporary(crate::schema()).unwrap();

        let article = db
            .insert(ARTICLE, Article { title: "On Maps".into() }.fields())
            .unwrap();
        let tag = db.insert(TAG, Tag { name: "geo".into() }.fields()).unwrap();
        db.link(ARTICLE_TAGS, article, tag).unwrap();

        db.delete(TAG, tag).unwrap();

        assert!(db.related(ARTICLE_TAGS, article).unwrap().is_empty());
        // The article itself survives
        assert!(db.get(ARTICLE, article).is_ok());
    }

    #[test]
    fn test_unlink() {
        let db = Database::temporary(crate::schema()).unwrap();

        let article = db
            .insert(ARTICLE, Article { title: "On Maps".into() }.fields())
            .unwrap();
        let tag = db.insert(TAG, Tag { name: "geo".into() }.fields()).unwrap();

        db.link(ARTICLE_TAGS, article, tag).unwrap();
        db.unlink(ARTICLE_TAGS, article, tag).unwrap();

        assert!(db.related(ARTICLE_TAGS, article).unwrap().is_empty());
    }
}
