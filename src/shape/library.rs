//! Shape Library - the project's shape catalogs
//!
//! One catalog per [`CustomShapeKind`], persisted together in
//! `Content/Datas/shapes.json` under the kinds' JSON keys. Saving merges into
//! the existing document so keys written by other tools survive.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tracing::{debug, info};

use super::custom_shape::{CustomShape, LoadOutcome};
use super::kind::CustomShapeKind;
use super::ShapeError;
use crate::entity::{Catalog, Entity};
use crate::project::ProjectConfig;

/// All shape catalogs of a project
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShapeLibrary {
    catalogs: [Catalog<CustomShape>; 3],
}

impl ShapeLibrary {
    /// Create a library with three empty catalogs
    pub fn new() -> Self {
        Self::default()
    }

    pub fn catalog(&self, kind: CustomShapeKind) -> &Catalog<CustomShape> {
        &self.catalogs[kind.index()]
    }

    pub fn catalog_mut(&mut self, kind: CustomShapeKind) -> &mut Catalog<CustomShape> {
        &mut self.catalogs[kind.index()]
    }

    /// Look up a shape by id within one kind's catalog
    pub fn get_by_id(&self, id: i32, kind: CustomShapeKind) -> Option<&CustomShape> {
        self.catalog(kind).by_id(id)
    }

    pub fn get_by_id_mut(&mut self, id: i32, kind: CustomShapeKind) -> Option<&mut CustomShape> {
        self.catalog_mut(kind).by_id_mut(id)
    }

    /// Read every kind's catalog from a shapes document
    pub fn from_document(doc: &Map<String, Value>) -> Result<Self, ShapeError> {
        let mut library = Self::new();
        for kind in CustomShapeKind::ALL {
            *library.catalog_mut(kind) = Catalog::read_document(doc, kind.json_key())?;
        }
        Ok(library)
    }

    /// Write every kind's catalog into a shapes document, keeping other keys
    pub fn write_document(&self, doc: &mut Map<String, Value>) {
        for kind in CustomShapeKind::ALL {
            self.catalog(kind).write_document(doc, kind.json_key());
        }
    }

    /// Load the project's shapes document; a missing file is an empty library
    pub fn open(config: &ProjectConfig) -> Result<Self, ShapeError> {
        match read_document(&config.shapes_datas_path())? {
            Some(doc) => Self::from_document(&doc),
            None => {
                debug!(root = ?config.project_root, "no shapes document");
                Ok(Self::new())
            }
        }
    }

    /// Save into the project's shapes document
    pub fn save(&self, config: &ProjectConfig) -> Result<(), ShapeError> {
        let path = config.shapes_datas_path();
        let mut doc = read_document(&path)?.unwrap_or_default();
        self.write_document(&mut doc);

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| ShapeError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let contents = serde_json::to_string_pretty(&Value::Object(doc))?;
        fs::write(&path, contents).map_err(|source| ShapeError::Io { path, source })
    }

    /// (Re)load the geometry of a shape that must exist
    pub fn load_geometry(
        &mut self,
        id: i32,
        kind: CustomShapeKind,
        config: &ProjectConfig,
    ) -> Result<LoadOutcome, ShapeError> {
        let shape = self
            .get_by_id_mut(id, kind)
            .ok_or(ShapeError::NotFound { kind, id })?;
        Ok(shape.load(kind, config)?)
    }

    /// Copy a file into the kind's folder and register it
    ///
    /// The entry is named after the file, extension included. Returns the new
    /// shape's id.
    pub fn import(
        &mut self,
        config: &ProjectConfig,
        kind: CustomShapeKind,
        source: &Path,
        is_shared: bool,
    ) -> Result<i32, ShapeError> {
        if !has_extension(source, kind) {
            return Err(ShapeError::ExtensionMismatch {
                kind,
                path: source.to_path_buf(),
            });
        }
        let name = source
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(|| ShapeError::ExtensionMismatch {
                kind,
                path: source.to_path_buf(),
            })?;

        let catalog = self.catalog(kind);
        if catalog.iter().any(|shape| shape.name() == name && shape.is_shared() == is_shared) {
            return Err(ShapeError::NameTaken { kind, name });
        }
        let id = catalog.next_id()?;

        let folder = CustomShape::resolve_folder(kind, is_shared, config);
        fs::create_dir_all(&folder).map_err(|source| ShapeError::Io {
            path: folder.clone(),
            source,
        })?;
        let dest = folder.join(&name);
        if dest != source {
            fs::copy(source, &dest).map_err(|source_err| ShapeError::Io {
                path: source.to_path_buf(),
                source: source_err,
            })?;
        }

        self.catalog_mut(kind).insert(CustomShape::new(id, name, is_shared))?;
        info!(%kind, id, ?dest, "shape imported");
        Ok(id)
    }

    /// Remove a shape (and any nested entries) from its catalog
    pub fn remove(&mut self, id: i32, kind: CustomShapeKind) -> Option<CustomShape> {
        self.catalog_mut(kind).remove(id).map(|node| node.into_entity())
    }

    /// `(absolute, local)` paths of the files a packaged project must carry
    ///
    /// Shared-library shapes ship with the engine and are left out.
    pub fn package_paths(&self, kind: CustomShapeKind, config: &ProjectConfig) -> Vec<(PathBuf, PathBuf)> {
        self.catalog(kind)
            .iter()
            .filter(|shape| !shape.is_shared())
            .filter_map(|shape| {
                let path = shape.resolve_path(kind, config)?;
                Some((path, shape.resolve_local_path(kind)))
            })
            .collect()
    }
}

fn has_extension(path: &Path, kind: CustomShapeKind) -> bool {
    path.extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()).eq_ignore_ascii_case(kind.extension()))
        .unwrap_or(false)
}

fn read_document(path: &Path) -> Result<Option<Map<String, Value>>, ShapeError> {
    if !path.exists() {
        return Ok(None);
    }
    let contents = fs::read_to_string(path).map_err(|source| ShapeError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Some(serde_json::from_str(&contents)?))
}
