//! Many-to-many through an explicit join entity.
//!
//! A Loan ties one Book to one Reader and carries its own attributes:
//! the dates and the stated purpose. Deleting either side removes the loan.

use std::fmt;

use relmap_core::{
    Database, DefaultValue, DeleteBehavior, EntityDef, Error, FieldDef, FieldType, Fields,
    RecordId, RelationDef, ScalarType, Value,
};

use crate::{require_date, require_id, require_str};

/// Entity names.
pub const BOOK: &str = "Book";
pub const READER: &str = "Reader";
pub const LOAN: &str = "Loan";

/// Relation names.
pub const LOAN_BOOK: &str = "loan_book";
pub const LOAN_READER: &str = "loan_reader";

/// Declare the Book entity.
pub fn book_entity() -> EntityDef {
    EntityDef::new(BOOK)
        .with_field(FieldDef::new(
            "title",
            FieldType::scalar(ScalarType::String),
        ))
        .with_field(FieldDef::new(
            "authors",
            FieldType::scalar(ScalarType::String),
        ))
}

/// Declare the Reader entity.
pub fn reader_entity() -> EntityDef {
    EntityDef::new(READER).with_field(FieldDef::new(
        "name",
        FieldType::scalar(ScalarType::String),
    ))
}

/// Declare the Loan join entity. The loan date fills in at insert time.
pub fn loan_entity() -> EntityDef {
    EntityDef::new(LOAN)
        .with_field(FieldDef::new(
            "book_id",
            FieldType::scalar(ScalarType::Id),
        ))
        .with_field(FieldDef::new(
            "reader_id",
            FieldType::scalar(ScalarType::Id),
        ))
        .with_field(
            FieldDef::new("loan_date", FieldType::scalar(ScalarType::Date))
                .with_default(DefaultValue::CurrentDate),
        )
        .with_field(FieldDef::new(
            "due_date",
            FieldType::scalar(ScalarType::Date),
        ))
        .with_field(FieldDef::new(
            "purpose",
            FieldType::scalar(ScalarType::String),
        ))
}

/// Loans reference their book; deleting the book deletes its loans.
pub fn loan_book_relation() -> RelationDef {
    RelationDef::many_to_one(LOAN_BOOK, LOAN, "book_id", BOOK)
        .with_on_delete(DeleteBehavior::Cascade)
}

/// Loans reference their reader with the same policy.
pub fn loan_reader_relation() -> RelationDef {
    RelationDef::many_to_one(LOAN_READER, LOAN, "reader_id", READER)
        .with_on_delete(DeleteBehavior::Cascade)
}

/// A book row.
#[derive(Debug, Clone, PartialEq)]
pub struct Book {
    pub title: String,
    pub authors: String,
}

impl Book {
    pub fn fields(&self) -> Fields {
        vec![
            ("title".into(), self.title.clone().into()),
            ("authors".into(), self.authors.clone().into()),
        ]
    }

    pub fn from_fields(fields: &Fields) -> Result<Self, Error> {
        Ok(Self {
            title: require_str(fields, "title")?,
            authors: require_str(fields, "authors")?,
        })
    }
}

impl fmt::Display for Book {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.title)
    }
}

/// A reader row.
#[derive(Debug, Clone, PartialEq)]
pub struct Reader {
    pub name: String,
}

impl Reader {
    pub fn fields(&self) -> Fields {
        vec![("name".into(), self.name.clone().into())]
    }

    pub fn from_fields(fields: &Fields) -> Result<Self, Error> {
        Ok(Self {
            name: require_str(fields, "name")?,
        })
    }
}

impl fmt::Display for Reader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// A loan row.
#[derive(Debug, Clone, PartialEq)]
pub struct Loan {
    pub book_id: RecordId,
    pub reader_id: RecordId,
    /// Days since the Unix epoch.
    pub loan_date: i32,
    /// Days since the Unix epoch.
    pub due_date: i32,
    pub purpose: String,
}

impl Loan {
    pub fn fields(&self) -> Fields {
        vec![
            ("book_id".into(), self.book_id.into()),
            ("reader_id".into(), self.reader_id.into()),
            ("loan_date".into(), Value::Date(self.loan_date)),
            ("due_date".into(), Value::Date(self.due_date)),
            ("purpose".into(), self.purpose.clone().into()),
        ]
    }

    pub fn from_fields(fields: &Fields) -> Result<Self, Error> {
        Ok(Self {
            book_id: require_id(fields, "book_id")?,
            reader_id: require_id(fields, "reader_id")?,
            loan_date: require_date(fields, "loan_date")?,
            due_date: require_date(fields, "due_date")?,
            purpose: require_str(fields, "purpose")?,
        })
    }
}

/// Compose the loan's display label from its two endpoints, like
/// "War and Peace (Ivan Ivanov)".
pub fn loan_label(db: &Database, loan_id: RecordId) -> Result<String, Error> {
    let loan = Loan::from_fields(&db.get(LOAN, loan_id)?)?;
    let book = Book::from_fields(&db.get(BOOK, loan.book_id)?)?;
    let reader = Reader::from_fields(&db.get(READER, loan.reader_id)?)?;
    Ok(format!("{} ({})", book.title, reader.name))
}
