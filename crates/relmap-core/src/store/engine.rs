//! Row store implementation over sled.

use sled::{Db, Tree};

use super::{RecordId, Row, StoreConfig, RECORD_ID_SIZE};
use crate::error::Error;

/// Tree name for row data.
const ROWS_TREE: &str = "rows";

/// Tree name for the entity type index.
const TYPE_INDEX_TREE: &str = "index:type";

/// Tree name for forward link pairs.
const LINKS_FWD_TREE: &str = "links:fwd";

/// Tree name for reverse link pairs.
const LINKS_REV_TREE: &str = "links:rev";

/// The row store wrapping sled.
///
/// Rows are keyed by their 16-byte id. A type index (`entity\0id`) supports
/// scanning all rows of an entity. Many-to-many memberships are stored as
/// link pairs (`relation\0a\0b` mirrored in both directions); the pair key
/// itself is the membership, so repeated links collapse into one edge.
pub struct Store {
    /// The underlying sled database.
    db: Db,
    /// Row data keyed by id.
    rows: Tree,
    /// Entity type index.
    type_index: Tree,
    /// Forward link pairs.
    links_fwd: Tree,
    /// Reverse link pairs.
    links_rev: Tree,
}

impl Store {
    /// Open or create a store with the given configuration.
    pub fn open(config: StoreConfig) -> Result<Self, Error> {
        let db = config.to_sled_config().open()?;
        let rows = db.open_tree(ROWS_TREE)?;
        let type_index = db.open_tree(TYPE_INDEX_TREE)?;
        let links_fwd = db.open_tree(LINKS_FWD_TREE)?;
        let links_rev = db.open_tree(LINKS_REV_TREE)?;

        Ok(Self {
            db,
            rows,
            type_index,
            links_fwd,
            links_rev,
        })
    }

    /// Store a row under an entity type.
    ///
    /// Overwrites any existing row with the same id; the type index entry is
    /// idempotent.
    pub fn put(&self, entity: &str, id: RecordId, row: Row) -> Result<(), Error> {
        let value = row.to_bytes()?;
        self.rows.insert(id.as_bytes(), value)?;
        self.type_index.insert(type_index_key(entity, id), &[])?;
        Ok(())
    }

    /// Get a row by id.
    pub fn get(&self, id: RecordId) -> Result<Option<Row>, Error> {
        match self.rows.get(id.as_bytes())? {
            Some(bytes) => Ok(Some(Row::from_bytes(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Check whether a row of the given entity type exists.
    pub fn contains(&self, entity: &str, id: RecordId) -> Result<bool, Error> {
        Ok(self.type_index.get(type_index_key(entity, id))?.is_some()
            && self.rows.get(id.as_bytes())?.is_some())
    }

    /// Remove a row, its type index entry, and every link touching it.
    pub fn remove(&self, entity: &str, id: RecordId) -> Result<(), Error> {
        self.rows.remove(id.as_bytes())?;
        self.type_index.remove(type_index_key(entity, id))?;
        self.purge_links(id)?;
        Ok(())
    }

    /// Scan all rows of an entity type.
    pub fn scan(
        &self,
        entity: &str,
    ) -> impl Iterator<Item = Result<(RecordId, Row), Error>> + '_ {
        let prefix = type_index_prefix(entity);
        let prefix_len = prefix.len();

        self.type_index
            .scan_prefix(prefix)
            .filter_map(move |result| match result {
                Ok((key, _)) => {
                    if key.len() != prefix_len + RECORD_ID_SIZE {
                        return Some(Err(Error::InvalidData("bad type index key".into())));
                    }
                    let id = match RecordId::from_slice(&key[prefix_len..]) {
                        Some(id) => id,
                        None => return Some(Err(Error::InvalidData("bad type index key".into()))),
                    };
                    match self.get(id) {
                        Ok(Some(row)) => Some(Ok((id, row))),
                        Ok(None) => None, // index entry without a row
                        Err(e) => Some(Err(e)),
                    }
                }
                Err(e) => Some(Err(e.into())),
            })
    }

    /// Add a link pair under a relation. Idempotent.
    pub fn link(&self, relation: &str, from: RecordId, to: RecordId) -> Result<(), Error> {
        self.links_fwd.insert(link_key(relation, from, to), &[])?;
        self.links_rev.insert(link_key(relation, to, from), &[])?;
        Ok(())
    }

    /// Remove a link pair.
    pub fn unlink(&self, relation: &str, from: RecordId, to: RecordId) -> Result<(), Error> {
        self.links_fwd.remove(link_key(relation, from, to))?;
        self.links_rev.remove(link_key(relation, to, from))?;
        Ok(())
    }

    /// All ids linked from `from` under a relation.
    pub fn linked(&self, relation: &str, from: RecordId) -> Result<Vec<RecordId>, Error> {
        Self::collect_link_ends(&self.links_fwd, relation, from)
    }

    /// All ids linking to `to` under a relation.
    pub fn linked_rev(&self, relation: &str, to: RecordId) -> Result<Vec<RecordId>, Error> {
        Self::collect_link_ends(&self.links_rev, relation, to)
    }

    /// Flush all pending writes to disk.
    pub fn flush(&self) -> Result<(), Error> {
        self.db.flush()?;
        Ok(())
    }

    fn collect_link_ends(
        tree: &Tree,
        relation: &str,
        anchor: RecordId,
    ) -> Result<Vec<RecordId>, Error> {
        let mut prefix = Vec::with_capacity(relation.len() + 1 + RECORD_ID_SIZE);
        prefix.extend_from_slice(relation.as_bytes());
        prefix.push(0);
        prefix.extend_from_slice(anchor.as_bytes());
        let prefix_len = prefix.len();

        let mut ids = Vec::new();
        for result in tree.scan_prefix(prefix) {
            let (key, _) = result?;
            let id = RecordId::from_slice(&key[prefix_len..])
                .ok_or_else(|| Error::InvalidData("bad link key".into()))?;
            ids.push(id);
        }
        Ok(ids)
    }

    /// Remove every link pair in which the id appears on either side.
    fn purge_links(&self, id: RecordId) -> Result<(), Error> {
        let mut doomed = Vec::new();
        for result in self.links_fwd.iter() {
            let (key, _) = result?;
            let Some((relation, from, to)) = split_link_key(&key) else {
                return Err(Error::InvalidData("bad link key".into()));
            };
            if from == id || to == id {
                doomed.push((relation.to_string(), from, to));
            }
        }

        for (relation, from, to) in doomed {
            self.unlink(&relation, from, to)?;
        }
        Ok(())
    }
}

fn type_index_key(entity: &str, id: RecordId) -> Vec<u8> {
    let mut key = type_index_prefix(entity);
    key.extend_from_slice(id.as_bytes());
    key
}

fn type_index_prefix(entity: &str) -> Vec<u8> {
    let mut prefix = Vec::with_capacity(entity.len() + 1);
    prefix.extend_from_slice(entity.as_bytes());
    prefix.push(0); // Null separator
    prefix
}

fn link_key(relation: &str, a: RecordId, b: RecordId) -> Vec<u8> {
    let mut key = Vec::with_capacity(relation.len() + 1 + 2 * RECORD_ID_SIZE);
    key.extend_from_slice(relation.as_bytes());
    key.push(0);
    key.extend_from_slice(a.as_bytes());
    key.extend_from_slice(b.as_bytes());
    key
}

fn split_link_key(key: &[u8]) -> Option<(&str, RecordId, RecordId)> {
    let sep = key.iter().position(|b| *b == 0)?;
    if key.len() != sep + 1 + 2 * RECORD_ID_SIZE {
        return None;
    }
    let relation = std::str::from_utf8(&key[..sep]).ok()?;
    let a = RecordId::from_slice(&key[sep + 1..sep + 1 + RECORD_ID_SIZE])?;
    let b = RecordId::from_slice(&key[sep + 1 + RECORD_ID_SIZE..])?;
    Some((relation, a, b))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_store() -> Store {
        Store::open(StoreConfig::temporary()).unwrap()
    }

    #[test]
    fn test_put_and_get() {
        let store = test_store();
        let id = RecordId::generate();

        store.put("Customer", id, Row::new(vec![1, 2, 3])).unwrap();

        let row = store.get(id).unwrap().unwrap();
        assert_eq!(row.data, vec![1, 2, 3]);
        assert!(store.contains("Customer", id).unwrap());
        assert!(!store.contains("Product", id).unwrap());
    }

    #[test]
    fn test_remove() {
        let store = test_store();
        let id = RecordId::generate();

        store.put("Customer", id, Row::new(vec![1])).unwrap();
        store.remove("Customer", id).unwrap();

        assert!(store.get(id).unwrap().is_none());
        assert!(!store.contains("Customer", id).unwrap());
    }

    #[test]
    fn test_scan_by_type() {
        let store = test_store();
        let a = RecordId::generate();
        let b = RecordId::generate();
        let other = RecordId::generate();

        store.put("Tag", a, Row::new(vec![1])).unwrap();
        store.put("Tag", b, Row::new(vec![2])).unwrap();
        store.put("Article", other, Row::new(vec![3])).unwrap();

        let tags: Vec<_> = store.scan("Tag").collect::<Result<Vec<_>, _>>().unwrap();
        assert_eq!(tags.len(), 2);

        let articles: Vec<_> = store
            .scan("Article")
            .collect::<Result<Vec<_>, _>>()
            .unwrap();
        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].0, other);

        let none: Vec<_> = store.scan("Loan").collect::<Result<Vec<_>, _>>().unwrap();
        assert!(none.is_empty());
    }

    #[test]
    fn test_link_is_idempotent() {
        let store = test_store();
        let article = RecordId::generate();
        let tag = RecordId::generate();

        store.link("article_tags", article, tag).unwrap();
        store.link("article_tags", article, tag).unwrap();
        store.link("article_tags", article, tag).unwrap();

        assert_eq!(store.linked("article_tags", article).unwrap(), vec![tag]);
        assert_eq!(store.linked_rev("article_tags", tag).unwrap(), vec![article]);
    }

    #[test]
    fn test_unlink() {
        let store = test_store();
        let a = RecordId::generate();
        let b = RecordId::generate();

        store.link("rel", a, b).unwrap();
        store.unlink("rel", a, b).unwrap();

        assert!(store.linked("rel", a).unwrap().is_empty());
        assert!(store.linked_rev("rel", b).unwrap().is_empty());
    }

    #[test]
    fn test_remove_purges_links() {
        let store = test_store();
        let article = RecordId::generate();
        let tag_a = RecordId::generate();
        let tag_b = RecordId::generate();

        store.put("Article", article, Row::new(vec![1])).unwrap();
        store.link("article_tags", article, tag_a).unwrap();
        store.link("article_tags", article, tag_b).unwrap();

        store.remove("Article", article).unwrap();

        assert!(store.linked("article_tags", article).unwrap().is_empty());
        assert!(store.linked_rev("article_tags", tag_a).unwrap().is_empty());
        assert!(store.linked_rev("article_tags", tag_b).unwrap().is_empty());
    }

    #[test]
    fn test_remove_purges_links_on_target_side() {
        let store = test_store();
        let article = RecordId::generate();
        let tag = RecordId::generate();

        store.put("Tag", tag, Row::new(vec![1])).unwrap();
        store.link("article_tags", article, tag).unwrap();

        store.remove("Tag", tag).unwrap();

        assert!(store.linked("article_tags", article).unwrap().is_empty());
    }

    #[test]
    fn test_links_are_scoped_by_relation() {
        let store = test_store();
        let a = RecordId::generate();
        let b = RecordId::generate();

        store.link("article_tags", a, b).unwrap();

        assert!(store.linked("topic_children", a).unwrap().is_empty());
    }

    #[test]
    fn test_persistence() {
        let dir = tempfile::tempdir().unwrap();
        let id = RecordId::generate();

        {
            let store = Store::open(StoreConfig::new(dir.path())).unwrap();
            store.put("Customer", id, Row::new(vec![7, 8, 9])).unwrap();
            store.flush().unwrap();
        }

        {
            let store = Store::open(StoreConfig::new(dir.path())).unwrap();
            let row = store.get(id).unwrap().unwrap();
            assert_eq!(row.data, vec![7, 8, 9]);
        }
    }
}
