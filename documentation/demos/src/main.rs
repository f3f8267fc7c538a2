//! Console walkthrough of the mapping pattern catalogue.
//!
//! Builds a temporary database with the full catalogue schema and replays
//! one scenario per pattern: a tree chain, nested topic groups, a library
//! loan, an account with its profile, and the taxed order item.
//!
//! Run with: cargo run

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use relmap_core::{Database, Error, Value};
use relmap_patterns::{
    lending::{self, Book, Reader},
    orders::{self, OrderItem},
    profiles::{self, Account, Profile},
    taxonomy::{self, TopicGroup},
    trees::{self, Tree},
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let db = Database::temporary(relmap_patterns::schema())?;
    tracing::info!(
        entities = db.schema().entities.len(),
        relations = db.schema().relations.len(),
        "catalogue schema loaded"
    );

    tree_chain(&db)?;
    nested_topic_groups(&db)?;
    library_loan(&db)?;
    account_profile(&db)?;
    taxed_order(&db)?;

    Ok(())
}

/// Root, child, grandchild; then the root goes and the child detaches.
fn tree_chain(db: &Database) -> Result<(), Error> {
    let root = db.insert(trees::TREE, Tree::root("Root").fields())?;
    let child = db.insert(trees::TREE, Tree::child_of("Child node", root).fields())?;
    let grandchild = db.insert(
        trees::TREE,
        Tree::child_of("Descendant node", child).fields(),
    )?;
    tracing::info!(root = %root, child = %child, grandchild = %grandchild, "built a tree chain");

    db.delete(trees::TREE, root)?;
    let orphan = Tree::from_fields(&db.get(trees::TREE, child)?)?;
    tracing::info!(
        name = %orphan.name,
        detached = orphan.parent_id.is_none(),
        "root removed, child kept"
    );
    Ok(())
}

/// Electronics holds Books and Home goods as children.
fn nested_topic_groups(db: &Database) -> Result<(), Error> {
    let electronics = db.insert(
        taxonomy::TOPIC_GROUP,
        TopicGroup { name: "Electronics".into() }.fields(),
    )?;
    let books = db.insert(
        taxonomy::TOPIC_GROUP,
        TopicGroup { name: "Books".into() }.fields(),
    )?;
    let home = db.insert(
        taxonomy::TOPIC_GROUP,
        TopicGroup { name: "Home goods".into() }.fields(),
    )?;

    db.link(taxonomy::TOPIC_CHILDREN, electronics, books)?;
    db.link(taxonomy::TOPIC_CHILDREN, electronics, home)?;

    let children = db.related(taxonomy::TOPIC_CHILDREN, electronics)?;
    let parents = db.related_rev(taxonomy::TOPIC_CHILDREN, books)?;
    tracing::info!(
        children = children.len(),
        parents = parents.len(),
        "nested topic groups linked"
    );
    Ok(())
}

/// A book, a reader, and a loan joining the two.
fn library_loan(db: &Database) -> Result<(), Error> {
    let book = db.insert(
        lending::BOOK,
        Book {
            title: "War and Peace".into(),
            authors: "Leo Tolstoy".into(),
        }
        .fields(),
    )?;
    let reader = db.insert(lending::READER, Reader { name: "Ivan Ivanov".into() }.fields())?;
    let loan = db.insert(
        lending::LOAN,
        vec![
            ("book_id".into(), book.into()),
            ("reader_id".into(), reader.into()),
            ("due_date".into(), Value::Date(20_100)),
            ("purpose".into(), "course work".into()),
        ],
    )?;

    tracing::info!(label = %lending::loan_label(db, loan)?, "loan created");
    Ok(())
}

/// An account and the profile extending it.
fn account_profile(db: &Database) -> Result<(), Error> {
    let account = db.insert(
        profiles::ACCOUNT,
        Account {
            username: "admin".into(),
            email: Some("admin@example.com".into()),
            password: "root".into(),
        }
        .fields(),
    )?;
    let profile = db.insert(
        profiles::PROFILE,
        Profile {
            account_id: account,
            bio: Some("About me".into()),
            birth_date: Some(10_957),
        }
        .fields(),
    )?;

    tracing::info!(label = %profiles::profile_label(db, profile)?, "profile created");
    Ok(())
}

/// The worked tax example: price 100, quantity 2, total 240.
fn taxed_order(db: &Database) -> Result<(), Error> {
    let item = OrderItem {
        product_or_service: "Box".into(),
        description: "Glass box".into(),
        price: 100.0,
        quantity: 2,
    };
    let id = db.insert(orders::ORDER_ITEM, item.fields())?;

    let stored = OrderItem::from_fields(&db.get(orders::ORDER_ITEM, id)?)?;
    tracing::info!(
        label = %stored,
        total_with_tax = stored.total_with_tax(),
        "order item priced"
    );
    Ok(())
}
