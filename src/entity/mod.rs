//! Identified entities and their catalogs
//!
//! ```text
//! Catalog<T>
//! ├── Node { entity: T, children }   // ordered, nested
//! │   └── Node ...
//! └── Node ...
//!
//! T: Entity  (id + name + JSON record + display row)
//! ```

mod catalog;
mod item;
mod row;

pub use catalog::{find_by_id, Catalog, CatalogError, Node, Walk, JSON_CHILDREN};
pub use item::{Entity, ListItem, SENTINEL_ID, SENTINEL_NAME};
pub use row::{DisplayRow, RowFlags, RowIcon};
