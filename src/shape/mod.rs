//! Custom shapes
//!
//! Catalog entries for user-provided mesh files, plus the OBJ reader that
//! turns them into geometry.
//!
//! ```text
//! <root>/Content/Shapes/
//! ├── OBJ/          meshes
//! ├── MTL/          materials (never parsed)
//! └── Collisions/   collision meshes, OBJ format
//! ```
//!
//! `<root>` is the project directory, or the shared library for entries
//! flagged `br`.

pub mod custom_shape;
pub mod geometry;
pub mod kind;
pub mod library;
pub mod obj;

use std::path::PathBuf;

use thiserror::Error;

use crate::entity::CatalogError;

pub use custom_shape::{CustomShape, LoadOutcome, JSON_BR};
pub use geometry::{Aabb, FaceCorner, ShapeGeometry};
pub use kind::CustomShapeKind;
pub use library::ShapeLibrary;
pub use obj::{ObjError, ObjParser};

/// Error type for shape operations
#[derive(Debug, Error)]
pub enum ShapeError {
    #[error("unsupported shape kind '{0}'")]
    UnsupportedKind(String),
    #[error("no {kind} shape with id {id}")]
    NotFound { kind: CustomShapeKind, id: i32 },
    #[error(transparent)]
    Obj(#[from] ObjError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error("I/O error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{path:?} is not a {kind} file (expected *{})", .kind.extension())]
    ExtensionMismatch { kind: CustomShapeKind, path: PathBuf },
    #[error("a {kind} shape named '{name}' already exists")]
    NameTaken { kind: CustomShapeKind, name: String },
}
