//! gamedata: editor-side game content
//!
//! Identified entities and their catalogs, custom shape entries with their
//! project/library storage, and the OBJ reader that loads shape geometry.

/// Version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod entity;
pub mod project;
pub mod shape;

pub use entity::{Catalog, CatalogError, DisplayRow, Entity, ListItem};
pub use project::{ProjectConfig, ProjectError};
pub use shape::{CustomShape, CustomShapeKind, LoadOutcome, ObjError, ObjParser, ShapeError, ShapeGeometry, ShapeLibrary};
