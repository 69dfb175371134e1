//! Identified entities
//!
//! Every game-data kind (shapes, monsters, items...) shares the same identity
//! contract: an integer id, a display name, a JSON record and a display row.
//! `ListItem` is the plain implementation; richer kinds embed one and
//! implement [`Entity`] on top of it.

use std::fmt;

use serde_json::{Map, Value};

use super::row::{DisplayRow, RowFlags, RowIcon};

/// Id reserved for "no entity"
pub const SENTINEL_ID: i32 = -1;

/// Name paired with [`SENTINEL_ID`]
pub const SENTINEL_NAME: &str = "<None>";

pub(crate) const JSON_ID: &str = "id";
pub(crate) const JSON_NAME: &str = "name";

/// Identity shared by every catalog entry
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ListItem {
    pub id: i32,
    pub name: String,
}

impl ListItem {
    pub fn new(id: i32, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    /// True for the "no entity" placeholder
    pub fn is_sentinel(&self) -> bool {
        self.id == SENTINEL_ID
    }

    /// Read `id` and `name` from a record
    ///
    /// Missing keys, or keys holding another JSON type, leave the field as is.
    pub fn read(&mut self, json: &Map<String, Value>) {
        if let Some(id) = json.get(JSON_ID).and_then(Value::as_i64) {
            if let Ok(id) = i32::try_from(id) {
                self.id = id;
            }
        }
        if let Some(name) = json.get(JSON_NAME).and_then(Value::as_str) {
            self.name = name.to_string();
        }
    }

    /// Write `id` and `name` into a record
    pub fn write(&self, json: &mut Map<String, Value>) {
        json.insert(JSON_ID.to_string(), Value::from(self.id));
        json.insert(JSON_NAME.to_string(), Value::from(self.name.clone()));
    }
}

impl Default for ListItem {
    fn default() -> Self {
        Self::new(SENTINEL_ID, SENTINEL_NAME)
    }
}

impl fmt::Display for ListItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.id, self.name)
    }
}

/// Contract implemented by everything a [`Catalog`](super::Catalog) can hold
///
/// Implementors only provide access to their embedded [`ListItem`]; kinds with
/// extra persisted fields override `read`/`write` and call the base version
/// first. Copying is `Clone`: the copy keeps the source id, and keeping ids
/// unique is the catalog's job.
pub trait Entity: Clone + fmt::Debug {
    fn item(&self) -> &ListItem;
    fn item_mut(&mut self) -> &mut ListItem;

    fn id(&self) -> i32 {
        self.item().id
    }

    fn name(&self) -> &str {
        &self.item().name
    }

    fn set_id(&mut self, id: i32) {
        self.item_mut().id = id;
    }

    fn set_name(&mut self, name: impl Into<String>) {
        self.item_mut().name = name.into();
    }

    fn read(&mut self, json: &Map<String, Value>) {
        self.item_mut().read(json);
    }

    fn write(&self, json: &mut Map<String, Value>) {
        self.item().write(json);
    }

    /// Icon shown next to real entries
    fn icon(&self) -> Option<RowIcon> {
        None
    }

    /// Row for the tree/list widget
    ///
    /// Ids 0 and below are placeholders and never get an icon.
    fn display_row(&self) -> DisplayRow {
        DisplayRow {
            id: self.id(),
            icon: if self.id() > 0 { self.icon() } else { None },
            flags: RowFlags::default(),
            label: self.item().to_string(),
        }
    }

    /// Build a fresh value from a record
    fn from_record(json: &Map<String, Value>) -> Self
    where
        Self: Default,
    {
        let mut entity = Self::default();
        entity.read(json);
        entity
    }

    /// Serialize into a new record
    fn to_record(&self) -> Map<String, Value> {
        let mut json = Map::new();
        self.write(&mut json);
        json
    }
}

impl Entity for ListItem {
    fn item(&self) -> &ListItem {
        self
    }

    fn item_mut(&mut self) -> &mut ListItem {
        self
    }
}
