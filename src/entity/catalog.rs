//! Entity catalog - ordered, nested storage of one entity kind
//!
//! A catalog is the invisible root of a tree of [`Node`]s. Order is insertion
//! order at every level. Lookups scan depth-first and return the first match,
//! so a catalog read from a hand-edited file with duplicate ids still answers
//! deterministically.
//!
//! Ids for new entries are allocated here (`create`), and `insert` refuses an
//! id that is already present, so the only way to end up with duplicates is
//! reading them from disk.

use std::collections::HashSet;

use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, warn};

use super::item::{Entity, SENTINEL_ID};
use super::row::DisplayRow;

/// Key holding the nested records of a node
pub const JSON_CHILDREN: &str = "children";

/// Error type for catalog operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("id {0} is already used in this catalog")]
    DuplicateId(i32),
    #[error("the sentinel id cannot be stored in a catalog")]
    SentinelId,
    #[error("parent entity {0} not found")]
    ParentNotFound(i32),
    #[error("record {index} is not a JSON object")]
    InvalidRecord { index: usize },
    #[error("document key '{0}' does not hold an array")]
    InvalidDocument(String),
    #[error("no id left above {0}")]
    IdSpaceExhausted(i32),
}

/// One entry of the tree, with its children
///
/// `extra` keeps the keys of the source record that the entity did not claim,
/// so they survive a read/write cycle. An empty `children` array counts as
/// such a key.
#[derive(Debug, Clone, PartialEq)]
pub struct Node<T> {
    entity: T,
    children: Vec<Node<T>>,
    extra: Map<String, Value>,
}

impl<T> Node<T> {
    pub fn new(entity: T) -> Self {
        Self {
            entity,
            children: Vec::new(),
            extra: Map::new(),
        }
    }

    pub fn entity(&self) -> &T {
        &self.entity
    }

    pub fn entity_mut(&mut self) -> &mut T {
        &mut self.entity
    }

    pub fn children(&self) -> &[Node<T>] {
        &self.children
    }

    pub fn into_entity(self) -> T {
        self.entity
    }
}

/// Depth-first scan for an entity id
///
/// Shared by every kind-specific "get by id" accessor.
pub fn find_by_id<T: Entity>(nodes: &[Node<T>], id: i32) -> Option<&T> {
    find_node(nodes, id).map(Node::entity)
}

fn find_node<T: Entity>(nodes: &[Node<T>], id: i32) -> Option<&Node<T>> {
    for node in nodes {
        if node.entity.id() == id {
            return Some(node);
        }
        if let Some(found) = find_node(&node.children, id) {
            return Some(found);
        }
    }
    None
}

fn find_node_mut<T: Entity>(nodes: &mut [Node<T>], id: i32) -> Option<&mut Node<T>> {
    for node in nodes.iter_mut() {
        if node.entity.id() == id {
            return Some(node);
        }
        if let Some(found) = find_node_mut(&mut node.children, id) {
            return Some(found);
        }
    }
    None
}

fn remove_node<T: Entity>(nodes: &mut Vec<Node<T>>, id: i32) -> Option<Node<T>> {
    for i in 0..nodes.len() {
        if nodes[i].entity.id() == id {
            return Some(nodes.remove(i));
        }
        if let Some(found) = remove_node(&mut nodes[i].children, id) {
            return Some(found);
        }
    }
    None
}

/// Pre-order walk yielding `(depth, node)`
pub struct Walk<'a, T> {
    stack: Vec<std::slice::Iter<'a, Node<T>>>,
}

impl<'a, T> Iterator for Walk<'a, T> {
    type Item = (usize, &'a Node<T>);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(level) = self.stack.last_mut() {
            match level.next() {
                Some(node) => {
                    let depth = self.stack.len() - 1;
                    self.stack.push(node.children.iter());
                    return Some((depth, node));
                }
                None => {
                    self.stack.pop();
                }
            }
        }
        None
    }
}

/// Ordered tree of entities of one kind
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog<T> {
    nodes: Vec<Node<T>>,
}

impl<T> Default for Catalog<T> {
    fn default() -> Self {
        Self { nodes: Vec::new() }
    }
}

impl<T: Entity> Catalog<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Top level of the tree
    pub fn root(&self) -> &[Node<T>] {
        &self.nodes
    }

    /// Number of entities at every depth
    pub fn len(&self) -> usize {
        self.walk().count()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Id the next `create` will hand out: highest id + 1, never below 1
    pub fn next_id(&self) -> Result<i32, CatalogError> {
        let max = self.iter().map(Entity::id).max().unwrap_or(0).max(0);
        max.checked_add(1).ok_or(CatalogError::IdSpaceExhausted(max))
    }

    /// Append a new entity at the top level and return its id
    pub fn create(&mut self, name: impl Into<String>) -> Result<i32, CatalogError>
    where
        T: Default,
    {
        let entity = self.allocate(name)?;
        let id = entity.id();
        self.nodes.push(Node::new(entity));
        Ok(id)
    }

    /// Append a new entity under `parent_id` and return its id
    pub fn create_child(&mut self, parent_id: i32, name: impl Into<String>) -> Result<i32, CatalogError>
    where
        T: Default,
    {
        let entity = self.allocate(name)?;
        let id = entity.id();
        let parent = find_node_mut(&mut self.nodes, parent_id).ok_or(CatalogError::ParentNotFound(parent_id))?;
        parent.children.push(Node::new(entity));
        Ok(id)
    }

    fn allocate(&self, name: impl Into<String>) -> Result<T, CatalogError>
    where
        T: Default,
    {
        let mut entity = T::default();
        entity.set_id(self.next_id()?);
        entity.set_name(name);
        Ok(entity)
    }

    /// Append an existing entity at the top level
    ///
    /// Rejects the sentinel id and ids already in the catalog.
    pub fn insert(&mut self, entity: T) -> Result<(), CatalogError> {
        self.check_insertable(entity.id())?;
        self.nodes.push(Node::new(entity));
        Ok(())
    }

    /// Append an existing entity as the last child of `parent_id`
    pub fn insert_child(&mut self, parent_id: i32, entity: T) -> Result<(), CatalogError> {
        self.check_insertable(entity.id())?;
        let parent = find_node_mut(&mut self.nodes, parent_id).ok_or(CatalogError::ParentNotFound(parent_id))?;
        parent.children.push(Node::new(entity));
        Ok(())
    }

    fn check_insertable(&self, id: i32) -> Result<(), CatalogError> {
        if id == SENTINEL_ID {
            return Err(CatalogError::SentinelId);
        }
        if self.contains(id) {
            return Err(CatalogError::DuplicateId(id));
        }
        Ok(())
    }

    pub fn contains(&self, id: i32) -> bool {
        find_node(&self.nodes, id).is_some()
    }

    /// First entity with this id, if any
    pub fn by_id(&self, id: i32) -> Option<&T> {
        find_by_id(&self.nodes, id)
    }

    pub fn by_id_mut(&mut self, id: i32) -> Option<&mut T> {
        find_node_mut(&mut self.nodes, id).map(Node::entity_mut)
    }

    pub fn node(&self, id: i32) -> Option<&Node<T>> {
        find_node(&self.nodes, id)
    }

    /// Remove an entity together with its subtree
    pub fn remove(&mut self, id: i32) -> Option<Node<T>> {
        remove_node(&mut self.nodes, id)
    }

    pub fn walk(&self) -> Walk<'_, T> {
        Walk {
            stack: vec![self.nodes.iter()],
        }
    }

    /// Entities in depth-first pre-order
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.walk().map(|(_, node)| &node.entity)
    }

    /// Rows for the tree widget, with their depth
    pub fn rows(&self) -> Vec<(usize, DisplayRow)> {
        self.walk()
            .map(|(depth, node)| (depth, node.entity.display_row()))
            .collect()
    }

    /// Build a catalog from a list of records
    ///
    /// Duplicate ids are kept as read (lookups return the first one).
    pub fn from_records(records: &[Value]) -> Result<Self, CatalogError>
    where
        T: Default,
    {
        let mut seen = HashSet::new();
        let nodes = read_nodes(records, &mut seen)?;
        debug!(count = seen.len(), "catalog read");
        Ok(Self { nodes })
    }

    pub fn to_records(&self) -> Vec<Value> {
        write_nodes(&self.nodes)
    }

    /// Read the catalog stored under `key`; a missing key is an empty catalog
    pub fn read_document(doc: &Map<String, Value>, key: &str) -> Result<Self, CatalogError>
    where
        T: Default,
    {
        match doc.get(key) {
            None => Ok(Self::new()),
            Some(Value::Array(records)) => Self::from_records(records),
            Some(_) => Err(CatalogError::InvalidDocument(key.to_string())),
        }
    }

    /// Store the catalog under `key`, leaving other keys of `doc` alone
    pub fn write_document(&self, doc: &mut Map<String, Value>, key: &str) {
        doc.insert(key.to_string(), Value::Array(self.to_records()));
    }
}

fn read_nodes<T: Entity + Default>(records: &[Value], seen: &mut HashSet<i32>) -> Result<Vec<Node<T>>, CatalogError> {
    let mut nodes = Vec::with_capacity(records.len());
    for (index, record) in records.iter().enumerate() {
        let object = record.as_object().ok_or(CatalogError::InvalidRecord { index })?;
        let entity = T::from_record(object);
        if !seen.insert(entity.id()) {
            warn!(id = entity.id(), name = entity.name(), "duplicate id in catalog");
        }

        let mut extra = object.clone();
        for key in entity.to_record().keys() {
            extra.remove(key);
        }
        let children = match object.get(JSON_CHILDREN) {
            Some(Value::Array(records)) if !records.is_empty() => {
                extra.remove(JSON_CHILDREN);
                read_nodes(records, seen)?
            }
            _ => Vec::new(),
        };

        nodes.push(Node {
            entity,
            children,
            extra,
        });
    }
    Ok(nodes)
}

fn write_nodes<T: Entity>(nodes: &[Node<T>]) -> Vec<Value> {
    nodes
        .iter()
        .map(|node| {
            let mut record = node.extra.clone();
            node.entity.write(&mut record);
            if !node.children.is_empty() {
                record.insert(JSON_CHILDREN.to_string(), Value::Array(write_nodes(&node.children)));
            }
            Value::Object(record)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::ListItem;
    use serde_json::json;

    fn sample() -> Catalog<ListItem> {
        let mut catalog = Catalog::new();
        catalog.create("Slime").unwrap();
        let bats = catalog.create("Bats").unwrap();
        catalog.create_child(bats, "Vampire bat").unwrap();
        catalog.create("Golem").unwrap();
        catalog
    }

    #[test]
    fn test_create_allocates_next_id() {
        let mut catalog: Catalog<ListItem> = Catalog::new();
        assert_eq!(catalog.next_id(), Ok(1));
        assert_eq!(catalog.create("first"), Ok(1));
        assert_eq!(catalog.create("second"), Ok(2));

        catalog.insert(ListItem::new(10, "gap")).unwrap();
        assert_eq!(catalog.create("after gap"), Ok(11));
    }

    #[test]
    fn test_create_after_max_id() {
        let records = json!([{ "id": i32::MAX, "name": "last" }]);
        let mut catalog: Catalog<ListItem> = Catalog::from_records(records.as_array().unwrap()).unwrap();

        assert_eq!(catalog.next_id(), Err(CatalogError::IdSpaceExhausted(i32::MAX)));
        assert_eq!(catalog.create("next"), Err(CatalogError::IdSpaceExhausted(i32::MAX)));
        assert_eq!(
            catalog.create_child(i32::MAX, "child"),
            Err(CatalogError::IdSpaceExhausted(i32::MAX))
        );
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn test_empty_children_survive_round_trip() {
        let records = json!([
            { "id": 1, "name": "Folder", "children": [] },
            { "id": 2, "name": "Leaf" }
        ]);
        let catalog: Catalog<ListItem> = Catalog::from_records(records.as_array().unwrap()).unwrap();
        assert!(catalog.node(1).unwrap().children().is_empty());
        assert_eq!(Value::Array(catalog.to_records()), records);
    }

    #[test]
    fn test_insert_rejects_duplicates_and_sentinel() {
        let mut catalog = sample();
        assert_eq!(catalog.insert(ListItem::new(3, "again")), Err(CatalogError::DuplicateId(3)));
        assert_eq!(catalog.insert(ListItem::default()), Err(CatalogError::SentinelId));
        assert_eq!(
            catalog.insert_child(99, ListItem::new(50, "orphan")),
            Err(CatalogError::ParentNotFound(99))
        );
        assert_eq!(catalog.len(), 4);
    }

    #[test]
    fn test_nested_lookup() {
        let catalog = sample();
        assert_eq!(catalog.by_id(3).map(|e| e.name.as_str()), Some("Vampire bat"));
        assert_eq!(catalog.node(2).map(|n| n.children().len()), Some(1));
        assert!(catalog.by_id(42).is_none());
        assert!(catalog.by_id(SENTINEL_ID).is_none());
    }

    #[test]
    fn test_iteration_order_and_rows() {
        let catalog = sample();
        let names: Vec<_> = catalog.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Slime", "Bats", "Vampire bat", "Golem"]);

        let depths: Vec<_> = catalog.rows().into_iter().map(|(depth, row)| (depth, row.id)).collect();
        assert_eq!(depths, vec![(0, 1), (0, 2), (1, 3), (0, 4)]);
    }

    #[test]
    fn test_remove_takes_subtree() {
        let mut catalog = sample();
        let removed = catalog.remove(2).unwrap();
        assert_eq!(removed.entity().name, "Bats");
        assert_eq!(removed.children().len(), 1);
        assert_eq!(catalog.len(), 2);
        assert!(catalog.by_id(3).is_none());
        assert!(catalog.remove(2).is_none());
    }

    #[test]
    fn test_by_id_mut() {
        let mut catalog = sample();
        catalog.by_id_mut(3).unwrap().name = "Giant bat".to_string();
        assert_eq!(catalog.by_id(3).unwrap().name, "Giant bat");
    }

    #[test]
    fn test_records_round_trip_with_unknown_keys() {
        let records = json!([
            { "id": 1, "name": "Slime", "hp": 10 },
            { "id": 2, "name": "Bats", "children": [
                { "id": 3, "name": "Vampire bat", "drops": [1, 2] }
            ]}
        ]);
        let catalog: Catalog<ListItem> = Catalog::from_records(records.as_array().unwrap()).unwrap();
        assert_eq!(catalog.len(), 3);
        assert_eq!(Value::Array(catalog.to_records()), records);
    }

    #[test]
    fn test_invalid_record() {
        let records = json!([{ "id": 1, "name": "ok" }, 7]);
        let result: Result<Catalog<ListItem>, _> = Catalog::from_records(records.as_array().unwrap());
        assert_eq!(result, Err(CatalogError::InvalidRecord { index: 1 }));
    }

    #[test]
    fn test_duplicates_from_disk_first_match_wins() {
        let records = json!([
            { "id": 5, "name": "first" },
            { "id": 5, "name": "second" }
        ]);
        let catalog: Catalog<ListItem> = Catalog::from_records(records.as_array().unwrap()).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.by_id(5).unwrap().name, "first");
    }

    #[test]
    fn test_document_merge_keeps_other_keys() {
        let mut doc = json!({ "monsters": [], "version": 3 }).as_object().unwrap().clone();
        let catalog = sample();
        catalog.write_document(&mut doc, "monsters");
        assert_eq!(doc["version"], json!(3));

        let back: Catalog<ListItem> = Catalog::read_document(&doc, "monsters").unwrap();
        assert_eq!(back, catalog);

        let missing: Catalog<ListItem> = Catalog::read_document(&doc, "items").unwrap();
        assert!(missing.is_empty());

        let bad: Result<Catalog<ListItem>, _> = Catalog::read_document(&doc, "version");
        assert_eq!(bad, Err(CatalogError::InvalidDocument("version".to_string())));
    }
}
