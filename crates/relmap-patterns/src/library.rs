//! A shared field set reused across concrete entities.
//!
//! LibraryItem is not a table of its own. Each concrete entity (Booknew,
//! Magazine, Dvd) declares the shared fields plus one of its own, and all
//! of them list in title order by default.

use std::fmt;

use relmap_core::{
    DefaultValue, EntityDef, Error, FieldDef, FieldType, Fields, OrderBy, ScalarType, Value,
};

use crate::{require_date, require_i32, require_str};

/// Entity names.
pub const BOOKNEW: &str = "Booknew";
pub const MAGAZINE: &str = "Magazine";
pub const DVD: &str = "Dvd";

/// The shared field set: title, author, and circulation status.
pub fn library_item_fields() -> Vec<FieldDef> {
    vec![
        FieldDef::new("title", FieldType::scalar(ScalarType::String)),
        FieldDef::new("author", FieldType::scalar(ScalarType::String)),
        FieldDef::new(
            "status",
            FieldType::enum_type("ItemStatus", [ItemStatus::Available.as_str(), ItemStatus::Borrowed.as_str()]),
        )
        .with_default(DefaultValue::String(ItemStatus::Available.as_str().into())),
    ]
}

fn library_entity(name: &str) -> EntityDef {
    EntityDef::new(name)
        .with_fields(library_item_fields())
        .with_default_order([OrderBy::asc("title")])
}

/// Declare the Booknew entity: the shared set plus a publication year.
pub fn booknew_entity() -> EntityDef {
    library_entity(BOOKNEW).with_field(FieldDef::new(
        "publication_year",
        FieldType::scalar(ScalarType::Int32),
    ))
}

/// Declare the Magazine entity: the shared set plus an issue date.
pub fn magazine_entity() -> EntityDef {
    library_entity(MAGAZINE).with_field(FieldDef::new(
        "issue_date",
        FieldType::scalar(ScalarType::Date),
    ))
}

/// Declare the Dvd entity: the shared set plus a director.
pub fn dvd_entity() -> EntityDef {
    library_entity(DVD).with_field(FieldDef::new(
        "director",
        FieldType::scalar(ScalarType::String),
    ))
}

/// Circulation status of a library item.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ItemStatus {
    #[default]
    Available,
    Borrowed,
}

impl ItemStatus {
    /// The stored variant string.
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemStatus::Available => "available",
            ItemStatus::Borrowed => "borrowed",
        }
    }

    /// Parse a stored variant string.
    pub fn parse(s: &str) -> Result<Self, Error> {
        match s {
            "available" => Ok(ItemStatus::Available),
            "borrowed" => Ok(ItemStatus::Borrowed),
            other => Err(Error::InvalidData(format!("unknown item status {}", other))),
        }
    }
}

/// The shared part of every library item row.
#[derive(Debug, Clone, PartialEq)]
pub struct LibraryItem {
    pub title: String,
    pub author: String,
    pub status: ItemStatus,
}

impl LibraryItem {
    /// A freshly catalogued (available) item.
    pub fn new(title: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            status: ItemStatus::default(),
        }
    }

    fn fields(&self) -> Fields {
        vec![
            ("title".into(), self.title.clone().into()),
            ("author".into(), self.author.clone().into()),
            ("status".into(), self.status.as_str().into()),
        ]
    }

    fn from_fields(fields: &Fields) -> Result<Self, Error> {
        Ok(Self {
            title: require_str(fields, "title")?,
            author: require_str(fields, "author")?,
            status: ItemStatus::parse(&require_str(fields, "status")?)?,
        })
    }
}

impl fmt::Display for LibraryItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.title)
    }
}

/// A book row: the shared item plus its publication year.
#[derive(Debug, Clone, PartialEq)]
pub struct Booknew {
    pub item: LibraryItem,
    pub publication_year: i32,
}

impl Booknew {
    pub fn fields(&self) -> Fields {
        let mut fields = self.item.fields();
        fields.push(("publication_year".into(), self.publication_year.into()));
        fields
    }

    pub fn from_fields(fields: &Fields) -> Result<Self, Error> {
        Ok(Self {
            item: LibraryItem::from_fields(fields)?,
            publication_year: require_i32(fields, "publication_year")?,
        })
    }
}

impl fmt::Display for Booknew {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.item.fmt(f)
    }
}

/// A magazine row: the shared item plus its issue date.
#[derive(Debug, Clone, PartialEq)]
pub struct Magazine {
    pub item: LibraryItem,
    /// Days since the Unix epoch.
    pub issue_date: i32,
}

impl Magazine {
    pub fn fields(&self) -> Fields {
        let mut fields = self.item.fields();
        fields.push(("issue_date".into(), Value::Date(self.issue_date)));
        fields
    }

    pub fn from_fields(fields: &Fields) -> Result<Self, Error> {
        Ok(Self {
            item: LibraryItem::from_fields(fields)?,
            issue_date: require_date(fields, "issue_date")?,
        })
    }
}

impl fmt::Display for Magazine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.item.fmt(f)
    }
}

/// A DVD row: the shared item plus its director.
#[derive(Debug, Clone, PartialEq)]
pub struct Dvd {
    pub item: LibraryItem,
    pub director: String,
}

impl Dvd {
    pub fn fields(&self) -> Fields {
        let mut fields = self.item.fields();
        fields.push(("director".into(), self.director.clone().into()));
        fields
    }

    pub fn from_fields(fields: &Fields) -> Result<Self, Error> {
        Ok(Self {
            item: LibraryItem::from_fields(fields)?,
            director: require_str(fields, "director")?,
        })
    }
}

impl fmt::Display for Dvd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.item.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relmap_core::Database;

    #[test]
    fn test_concrete_entities_share_the_field_set() {
        for entity in [booknew_entity(), magazine_entity(), dvd_entity()] {
            assert!(entity.field("title").is_some());
            assert!(entity.field("author").is_some());
            assert!(entity.field("status").is_some());
            assert!(entity.default_order.is_some());
        }

        // And each carries exactly one field of its own
        assert!(booknew_entity().field("publication_year").is_some());
        assert!(magazine_entity().field("issue_date").is_some());
        assert!(dvd_entity().field("director").is_some());
    }

    #[test]
    fn test_status_defaults_to_available() {
        let db = Database::temporary(crate::schema()).unwrap();

        let id = db
            .insert(
                BOOKNEW,
                vec![
                    ("title".into(), "Anna Karenina".into()),
                    ("author".into(), "Leo Tolstoy".into()),
                    ("publication_year".into(), Value::Int32(1878)),
                ],
            )
            .unwrap();

        let book = Booknew::from_fields(&db.get(BOOKNEW, id).unwrap()).unwrap();
        assert_eq!(book.item.status, ItemStatus::Available);
    }

    #[test]
    fn test_status_rejects_unknown_variant() {
        let db = Database::temporary(crate::schema()).unwrap();

        let result = db.insert(
            DVD,
            vec![
                ("title".into(), "Stalker".into()),
                ("author".into(), "Mosfilm".into()),
                ("status".into(), "lost".into()),
                ("director".into(), "Tarkovsky".into()),
            ],
        );

        assert!(matches!(result, Err(Error::InvalidData(_))));
    }

    #[test]
    fn test_items_list_in_title_order() {
        let db = Database::temporary(crate::schema()).unwrap();

        for (title, year) in [("War and Peace", 1869), ("Anna Karenina", 1878), ("Resurrection", 1899)] {
            db.insert(
                BOOKNEW,
                Booknew {
                    item: LibraryItem::new(title, "Leo Tolstoy"),
                    publication_year: year,
                }
                .fields(),
            )
            .unwrap();
        }

        let titles: Vec<String> = db
            .list(BOOKNEW)
            .unwrap()
            .into_iter()
            .map(|(_, fields)| Booknew::from_fields(&fields).unwrap().item.title)
            .collect();

        assert_eq!(titles, ["Anna Karenina", "Resurrection", "War and Peace"]);
    }
}
