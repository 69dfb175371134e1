//! Project configuration
//!
//! Where a project's shapes live. Each project directory carries a
//! `project.ron` naming the shared library root ("BR") and the square size;
//! the project root itself is the directory the file sits in.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Project settings file, relative to the project root
pub const PROJECT_FILE: &str = "project.ron";

/// Shape catalogs document, relative to the project root
pub const SHAPES_DATAS_FILE: &str = "Content/Datas/shapes.json";

/// Environment override for the shared library root
pub const LIBRARY_ROOT_ENV: &str = "GAMEDATA_LIBRARY_ROOT";

/// Square size used when a project does not set one
pub const DEFAULT_SQUARE_SIZE: u32 = 16;

/// Error type for project configuration
#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("I/O error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("serialize error: {0}")]
    Serialize(#[from] ron::Error),
    #[error("validation error: {0}")]
    Validation(String),
}

fn default_library_root() -> PathBuf {
    if let Some(root) = std::env::var_os(LIBRARY_ROOT_ENV) {
        return PathBuf::from(root);
    }
    dirs::data_dir()
        .map(|dir| dir.join("gamedata").join("BR"))
        .unwrap_or_else(|| PathBuf::from("BR"))
}

fn default_square_size() -> u32 {
    DEFAULT_SQUARE_SIZE
}

/// Storage roots and scale of one project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Directory holding `project.ron` (set at load time, not persisted)
    #[serde(skip)]
    pub project_root: PathBuf,

    /// Root of the shared library every project can pick shapes from
    #[serde(default = "default_library_root")]
    pub library_root: PathBuf,

    /// Size of one map square in world units
    #[serde(default = "default_square_size")]
    pub square_size: u32,
}

impl ProjectConfig {
    pub fn new(project_root: impl Into<PathBuf>, library_root: impl Into<PathBuf>) -> Self {
        Self {
            project_root: project_root.into(),
            library_root: library_root.into(),
            square_size: DEFAULT_SQUARE_SIZE,
        }
    }

    /// Defaults for a project directory without a settings file
    pub fn with_defaults(project_root: impl Into<PathBuf>) -> Self {
        Self::new(project_root, default_library_root())
    }

    /// Load `project.ron` from a project directory
    ///
    /// A missing file yields the defaults; a malformed one is an error.
    pub fn open(project_root: impl AsRef<Path>) -> Result<Self, ProjectError> {
        let project_root = project_root.as_ref();
        let path = project_root.join(PROJECT_FILE);
        if !path.exists() {
            debug!(?path, "no project file, using defaults");
            return Ok(Self::with_defaults(project_root));
        }

        let contents = fs::read_to_string(&path).map_err(|source| ProjectError::Io {
            path: path.clone(),
            source,
        })?;
        let mut config = Self::from_ron(&contents)?;
        config.project_root = project_root.to_path_buf();
        Ok(config)
    }

    /// Parse settings from RON text (project root left empty)
    pub fn from_ron(contents: &str) -> Result<Self, ProjectError> {
        let config: Self = ron::from_str(contents)?;
        if config.square_size == 0 {
            return Err(ProjectError::Validation("square_size must be positive".to_string()));
        }
        Ok(config)
    }

    /// Write `project.ron` into the project root
    pub fn save(&self) -> Result<(), ProjectError> {
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(4)
            .indentor("  ".to_string());
        let contents = ron::ser::to_string_pretty(self, pretty)?;

        let path = self.project_root.join(PROJECT_FILE);
        fs::create_dir_all(&self.project_root).map_err(|source| ProjectError::Io {
            path: self.project_root.clone(),
            source,
        })?;
        fs::write(&path, contents).map_err(|source| ProjectError::Io { path, source })
    }

    /// Root a shape's files live under
    pub fn root(&self, is_shared: bool) -> &Path {
        if is_shared {
            &self.library_root
        } else {
            &self.project_root
        }
    }

    pub fn shapes_datas_path(&self) -> PathBuf {
        self.project_root.join(SHAPES_DATAS_FILE)
    }
}
