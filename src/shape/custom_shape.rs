//! Custom shape entity
//!
//! A catalog entry pointing at a mesh, material or collision file, stored
//! either with the project or in the shared library ("BR"). Mesh entries can
//! be loaded, after which their geometry and bounding box are queryable.

use std::path::PathBuf;

use glam::{Vec2, Vec3};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use super::geometry::{Aabb, FaceCorner, ShapeGeometry};
use super::kind::CustomShapeKind;
use super::obj::{ObjError, ObjParser};
use crate::entity::{Entity, ListItem, RowIcon};
use crate::project::ProjectConfig;

/// Key persisting the storage root selector
pub const JSON_BR: &str = "br";

/// Result of a geometry load that did not fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// File parsed; buffers replaced
    Loaded { vertices: usize, faces: usize },
    /// No file to read (sentinel entry, missing or unreadable file); buffers empty
    NoSource,
    /// Kind carries no geometry; buffers untouched
    Skipped,
}

/// A shape entry of a catalog
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CustomShape {
    item: ListItem,
    is_shared: bool,
    geometry: ShapeGeometry,
}

impl CustomShape {
    pub fn new(id: i32, name: impl Into<String>, is_shared: bool) -> Self {
        Self {
            item: ListItem::new(id, name),
            is_shared,
            geometry: ShapeGeometry::default(),
        }
    }

    /// Whether the file lives under the shared library root
    pub fn is_shared(&self) -> bool {
        self.is_shared
    }

    pub fn set_shared(&mut self, is_shared: bool) {
        self.is_shared = is_shared;
    }

    /// Folder holding files of `kind` under the selected root
    pub fn resolve_folder(kind: CustomShapeKind, is_shared: bool, config: &ProjectConfig) -> PathBuf {
        config.root(is_shared).join(kind.local_folder())
    }

    /// Absolute path of this shape's file, `None` for the sentinel entry
    ///
    /// The name is used as stored; it already carries the file extension.
    pub fn resolve_path(&self, kind: CustomShapeKind, config: &ProjectConfig) -> Option<PathBuf> {
        if self.item.is_sentinel() {
            return None;
        }
        Some(Self::resolve_folder(kind, self.is_shared, config).join(&self.item.name))
    }

    /// Path relative to whichever root holds the file, for packaging
    pub fn resolve_local_path(&self, kind: CustomShapeKind) -> PathBuf {
        PathBuf::from(kind.local_folder()).join(&self.item.name)
    }

    /// (Re)load geometry from this shape's file
    ///
    /// Material entries are skipped. Otherwise the previous buffers are
    /// dropped first: on success they are replaced by the parsed file, on
    /// failure or without a file they stay empty.
    pub fn load(&mut self, kind: CustomShapeKind, config: &ProjectConfig) -> Result<LoadOutcome, ObjError> {
        if !kind.is_mesh() {
            return Ok(LoadOutcome::Skipped);
        }

        self.geometry = ShapeGeometry::new(config.square_size);

        let Some(path) = self.resolve_path(kind, config) else {
            return Ok(LoadOutcome::NoSource);
        };

        match ObjParser::load_from_file(&path, config.square_size)? {
            Some(geometry) => {
                debug!(
                    id = self.item.id,
                    vertices = geometry.vertices.len(),
                    faces = geometry.triangle_count(),
                    "shape loaded"
                );
                let outcome = LoadOutcome::Loaded {
                    vertices: geometry.vertices.len(),
                    faces: geometry.triangle_count(),
                };
                self.geometry = geometry;
                Ok(outcome)
            }
            None => {
                warn!(id = self.item.id, ?path, "shape file missing or unreadable");
                Ok(LoadOutcome::NoSource)
            }
        }
    }

    pub fn geometry(&self) -> &ShapeGeometry {
        &self.geometry
    }

    pub fn vertex_at(&self, i: usize) -> Option<Vec3> {
        self.geometry.vertices.get(i).copied()
    }

    pub fn texture_at(&self, i: usize) -> Option<Vec2> {
        self.geometry.textures.get(i).copied()
    }

    pub fn face_at(&self, i: usize) -> Option<FaceCorner> {
        self.geometry.faces.get(i).copied()
    }

    /// Number of face corners (three per triangle)
    pub fn faces_count(&self) -> usize {
        self.geometry.faces.len()
    }

    pub fn bounds(&self) -> Option<Aabb> {
        self.geometry.bounds()
    }

    /// Lower corner of the bounding box, zero before any vertex was loaded
    pub fn min_vertex(&self) -> Vec3 {
        self.bounds().map_or(Vec3::ZERO, |b| b.min)
    }

    /// Upper corner of the bounding box, zero before any vertex was loaded
    pub fn max_vertex(&self) -> Vec3 {
        self.bounds().map_or(Vec3::ZERO, |b| b.max)
    }
}

impl Entity for CustomShape {
    fn item(&self) -> &ListItem {
        &self.item
    }

    fn item_mut(&mut self) -> &mut ListItem {
        &mut self.item
    }

    fn read(&mut self, json: &Map<String, Value>) {
        self.item.read(json);
        self.is_shared = json.get(JSON_BR).and_then(Value::as_bool).unwrap_or(false);
    }

    fn write(&self, json: &mut Map<String, Value>) {
        self.item.write(json);
        json.insert(JSON_BR.to_string(), Value::Bool(self.is_shared));
    }

    fn icon(&self) -> Option<RowIcon> {
        Some(if self.is_shared { RowIcon::Blue } else { RowIcon::Red })
    }
}
