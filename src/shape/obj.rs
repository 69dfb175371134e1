//! OBJ text parsing for custom shapes
//!
//! Reads the subset of OBJ the editor's shapes use: `v` positions, `vt`
//! texture coordinates and triangular `f` faces with `v/vt[/vn]` corners.
//! Everything else (comments, `vn`, `o`, `g`, `usemtl`, ...) is skipped.
//! Faces must be triangles: meshes are triangulated on export.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use glam::{Vec2, Vec3};
use thiserror::Error;
use tracing::debug;

use super::geometry::{FaceCorner, ShapeGeometry};

/// Error types for OBJ parsing
#[derive(Debug, Error)]
pub enum ObjError {
    #[error("I/O error reading {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("line {line}: '{record}' expects {expected} values, found {found}")]
    MissingField {
        line: usize,
        record: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("line {line}: invalid float value '{token}'")]
    InvalidFloat { line: usize, token: String },
    #[error("line {line}: faces must be triangles, found {found} corners")]
    FaceArity { line: usize, found: usize },
    #[error("line {line}: invalid index '{token}'")]
    InvalidIndex { line: usize, token: String },
    #[error("line {line}: face corner '{group}' has no texture index")]
    MissingTextureIndex { line: usize, group: String },
}

impl ObjError {
    /// 1-based line the error was found on, if it came from parsing
    pub fn line(&self) -> Option<usize> {
        match self {
            ObjError::Io { .. } => None,
            ObjError::MissingField { line, .. }
            | ObjError::InvalidFloat { line, .. }
            | ObjError::FaceArity { line, .. }
            | ObjError::InvalidIndex { line, .. }
            | ObjError::MissingTextureIndex { line, .. } => Some(*line),
        }
    }
}

/// OBJ shape parser
pub struct ObjParser;

impl ObjParser {
    /// Parse a shape file
    ///
    /// Returns `Ok(None)` when the path is not a regular file (missing, a
    /// directory) or cannot be opened: a shape without a file simply has no
    /// geometry.
    pub fn load_from_file(path: &Path, square_size: u32) -> Result<Option<ShapeGeometry>, ObjError> {
        if !path.is_file() {
            debug!(?path, "no shape file at path");
            return Ok(None);
        }
        let file = match File::open(path) {
            Ok(file) => file,
            Err(e) => {
                debug!(?path, error = %e, "shape file unavailable");
                return Ok(None);
            }
        };
        Self::parse_reader(BufReader::new(file), square_size)
            .map(Some)
            .map_err(|e| match e {
                ObjError::Io { source, .. } => ObjError::Io {
                    path: path.to_path_buf(),
                    source,
                },
                other => other,
            })
    }

    /// Parse OBJ file contents
    pub fn parse(contents: &str, square_size: u32) -> Result<ShapeGeometry, ObjError> {
        Self::parse_reader(contents.as_bytes(), square_size)
    }

    /// Parse line by line from any buffered reader
    pub fn parse_reader(reader: impl BufRead, square_size: u32) -> Result<ShapeGeometry, ObjError> {
        let mut geometry = ShapeGeometry::new(square_size);

        for (index, line) in reader.lines().enumerate() {
            let line = line.map_err(|source| ObjError::Io {
                path: PathBuf::new(),
                source,
            })?;
            Self::parse_line(&line, index + 1, &mut geometry)?;
        }

        Ok(geometry)
    }

    fn parse_line(line: &str, line_num: usize, geometry: &mut ShapeGeometry) -> Result<(), ObjError> {
        let parts: Vec<&str> = line.split_whitespace().collect();
        let Some((&record, args)) = parts.split_first() else {
            return Ok(());
        };

        match record {
            "v" => {
                // Vertex position: v x y z [w]
                Self::expect_fields(args, 3, "v", line_num)?;
                let x = Self::parse_float(args[0], line_num)?;
                let y = Self::parse_float(args[1], line_num)?;
                let z = Self::parse_float(args[2], line_num)?;
                geometry.push_vertex(Vec3::new(x, y, z));
            }

            "vt" => {
                // Texture coordinate: vt u v, origin moved to the top-left
                Self::expect_fields(args, 2, "vt", line_num)?;
                let u = Self::parse_float(args[0], line_num)?;
                let v = Self::parse_float(args[1], line_num)?;
                geometry.push_texture(Vec2::new(u, 1.0 - v));
            }

            "f" => {
                // Face: f v1/vt1[/vn1] v2/vt2[/vn2] v3/vt3[/vn3]
                if args.len() != 3 {
                    return Err(ObjError::FaceArity {
                        line: line_num,
                        found: args.len(),
                    });
                }
                geometry.push_triangle([
                    Self::parse_corner(args[0], line_num)?,
                    Self::parse_corner(args[1], line_num)?,
                    Self::parse_corner(args[2], line_num)?,
                ]);
            }

            _ => {}
        }

        Ok(())
    }

    fn expect_fields(args: &[&str], expected: usize, record: &'static str, line_num: usize) -> Result<(), ObjError> {
        if args.len() < expected {
            return Err(ObjError::MissingField {
                line: line_num,
                record,
                expected,
                found: args.len(),
            });
        }
        Ok(())
    }

    /// Parse a corner like "1/2" or "1/2/3"; the normal index is not kept
    fn parse_corner(group: &str, line_num: usize) -> Result<FaceCorner, ObjError> {
        let mut fields = group.split('/');
        let vertex = fields.next().unwrap_or_default();
        let texture = match fields.next() {
            Some(texture) if !texture.is_empty() => texture,
            _ => {
                return Err(ObjError::MissingTextureIndex {
                    line: line_num,
                    group: group.to_string(),
                })
            }
        };

        Ok(FaceCorner::new(
            Self::parse_index(vertex, line_num)?,
            Self::parse_index(texture, line_num)?,
        ))
    }

    fn parse_float(s: &str, line_num: usize) -> Result<f32, ObjError> {
        s.parse().map_err(|_| ObjError::InvalidFloat {
            line: line_num,
            token: s.to_string(),
        })
    }

    /// Convert a 1-based index to 0-based; range checks are left to consumers
    fn parse_index(s: &str, line_num: usize) -> Result<usize, ObjError> {
        match s.parse::<usize>() {
            Ok(idx) if idx > 0 => Ok(idx - 1),
            _ => Err(ObjError::InvalidIndex {
                line: line_num,
                token: s.to_string(),
            }),
        }
    }
}
