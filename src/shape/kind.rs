//! Custom shape kinds
//!
//! A shape entry names a file in one of three folders: meshes, materials or
//! collision meshes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::ShapeError;

/// Which file family a shape refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CustomShapeKind {
    Obj,
    Mtl,
    Collisions,
}

impl CustomShapeKind {
    /// All kinds, in persisted code order
    pub const ALL: [CustomShapeKind; 3] = [
        CustomShapeKind::Obj,
        CustomShapeKind::Mtl,
        CustomShapeKind::Collisions,
    ];

    /// Folder relative to a storage root
    pub fn local_folder(&self) -> &'static str {
        match self {
            CustomShapeKind::Obj => "Content/Shapes/OBJ",
            CustomShapeKind::Mtl => "Content/Shapes/MTL",
            CustomShapeKind::Collisions => "Content/Shapes/Collisions",
        }
    }

    /// File extension, with the leading dot
    pub fn extension(&self) -> &'static str {
        match self {
            CustomShapeKind::Obj | CustomShapeKind::Collisions => ".obj",
            CustomShapeKind::Mtl => ".mtl",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            CustomShapeKind::Obj => "OBJ",
            CustomShapeKind::Mtl => "MTL",
            CustomShapeKind::Collisions => "Collisions",
        }
    }

    /// File dialog filter; collisions are picked among OBJ meshes elsewhere
    pub fn browse_filter(&self) -> Option<&'static str> {
        match self {
            CustomShapeKind::Obj => Some("OBJ (*.obj)"),
            CustomShapeKind::Mtl => Some("MTL (*.mtl)"),
            CustomShapeKind::Collisions => None,
        }
    }

    /// Key of this kind's catalog in the shapes document
    pub fn json_key(&self) -> &'static str {
        match self {
            CustomShapeKind::Obj => "obj",
            CustomShapeKind::Mtl => "mtl",
            CustomShapeKind::Collisions => "collisions",
        }
    }

    /// Whether files of this kind hold geometry
    ///
    /// True for `Obj` and for `Collisions`, whose files are OBJ meshes and are
    /// parsed the same way. Only `Mtl` entries are never loaded.
    pub fn is_mesh(&self) -> bool {
        !matches!(self, CustomShapeKind::Mtl)
    }

    pub fn code(&self) -> i64 {
        match self {
            CustomShapeKind::Obj => 0,
            CustomShapeKind::Mtl => 1,
            CustomShapeKind::Collisions => 2,
        }
    }

    pub(crate) fn index(&self) -> usize {
        self.code() as usize
    }
}

impl TryFrom<i64> for CustomShapeKind {
    type Error = ShapeError;

    fn try_from(code: i64) -> Result<Self, Self::Error> {
        CustomShapeKind::ALL
            .into_iter()
            .find(|kind| kind.code() == code)
            .ok_or_else(|| ShapeError::UnsupportedKind(code.to_string()))
    }
}

impl FromStr for CustomShapeKind {
    type Err = ShapeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CustomShapeKind::ALL
            .into_iter()
            .find(|kind| kind.json_key().eq_ignore_ascii_case(s) || kind.title().eq_ignore_ascii_case(s))
            .ok_or_else(|| ShapeError::UnsupportedKind(s.to_string()))
    }
}

impl fmt::Display for CustomShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}
