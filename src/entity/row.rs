//! Display rows
//!
//! What a tree/list widget needs to show an entity: a handle to find it again,
//! an optional icon, item flags and a label. The handle is the entity id, so
//! the widget never holds a reference into the catalog.

/// Icon variants used by the catalog views
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RowIcon {
    /// Entry stored under the shared library root
    Blue,
    /// Entry stored under the project root
    Red,
}

/// Item flags handed to the widget; rows never accept drops
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowFlags {
    pub selectable: bool,
    pub enabled: bool,
    pub editable: bool,
    pub drag_enabled: bool,
}

impl RowFlags {
    /// Drop acceptance is not representable; always false
    pub fn drop_enabled(&self) -> bool {
        false
    }
}

impl Default for RowFlags {
    fn default() -> Self {
        Self {
            selectable: true,
            enabled: true,
            editable: true,
            drag_enabled: true,
        }
    }
}

/// One row of a catalog view
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayRow {
    /// Identity of the entity this row shows; resolve it with `Catalog::by_id`
    pub id: i32,
    pub icon: Option<RowIcon>,
    pub flags: RowFlags,
    pub label: String,
}
