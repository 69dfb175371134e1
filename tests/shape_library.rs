//! End-to-end: project settings, shapes document and mesh loading on disk

use std::fs;

use glam::Vec3;
use gamedata::entity::{Entity, RowIcon};
use gamedata::shape::{CustomShapeKind, LoadOutcome, ShapeLibrary};
use gamedata::ProjectConfig;
use tempfile::TempDir;

const PYRAMID: &str = "\
# square pyramid, base on the ground
o Pyramid
v -8 0 -8
v 8 0 -8
v 8 0 8
v -8 0 8
v 0 16 0
vt 0 0
vt 1 0
vt 0.5 1
vn 0 1 0
f 1/1/1 2/2/1 5/3/1
f 2/1/1 3/2/1 5/3/1
f 3/1/1 4/2/1 5/3/1
f 4/1/1 1/2/1 5/3/1
";

#[test]
fn test_project_shapes_lifecycle() {
    let dir = TempDir::new().unwrap();
    let project = dir.path().join("MyGame");
    let mut config = ProjectConfig::new(&project, dir.path().join("BR"));
    config.square_size = 8;
    config.save().unwrap();

    let source = dir.path().join("pyramid.obj");
    fs::write(&source, PYRAMID).unwrap();
    let shared_source = dir.path().join("crate.obj");
    fs::write(&shared_source, "v 0 0 0\nv 16 16 16\n").unwrap();

    // Import one project-owned and one shared mesh, then persist
    let config = ProjectConfig::open(&project).unwrap();
    assert_eq!(config.square_size, 8);
    let mut library = ShapeLibrary::open(&config).unwrap();
    let pyramid = library.import(&config, CustomShapeKind::Obj, &source, false).unwrap();
    let shared = library.import(&config, CustomShapeKind::Obj, &shared_source, true).unwrap();
    library.save(&config).unwrap();

    // Reopen from disk and check what the editor would show
    let mut library = ShapeLibrary::open(&config).unwrap();
    let rows = library.catalog(CustomShapeKind::Obj).rows();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].1.label, "[1] pyramid.obj");
    assert_eq!(rows[0].1.icon, Some(RowIcon::Red));
    assert_eq!(rows[1].1.icon, Some(RowIcon::Blue));

    let outcome = library.load_geometry(pyramid, CustomShapeKind::Obj, &config).unwrap();
    assert_eq!(outcome, LoadOutcome::Loaded { vertices: 5, faces: 4 });
    let shape = library.get_by_id(pyramid, CustomShapeKind::Obj).unwrap();
    assert_eq!(shape.min_vertex(), Vec3::new(-8.0, 0.0, -8.0));
    assert_eq!(shape.max_vertex(), Vec3::new(8.0, 16.0, 8.0));
    assert_eq!(shape.geometry().size_in_squares(), Some(Vec3::new(2.0, 2.0, 2.0)));
    assert_eq!(shape.texture_at(2).unwrap().y, 0.0);

    let outcome = library.load_geometry(shared, CustomShapeKind::Obj, &config).unwrap();
    assert_eq!(outcome, LoadOutcome::Loaded { vertices: 2, faces: 0 });

    // Only the project-owned file ships with the project
    let files = library.package_paths(CustomShapeKind::Obj, &config);
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].0, project.join("Content/Shapes/OBJ/pyramid.obj"));

    // Deleting the file leaves the entry without geometry
    fs::remove_file(&files[0].0).unwrap();
    let outcome = library.load_geometry(pyramid, CustomShapeKind::Obj, &config).unwrap();
    assert_eq!(outcome, LoadOutcome::NoSource);
    let shape = library.get_by_id(pyramid, CustomShapeKind::Obj).unwrap();
    assert!(shape.geometry().is_empty());
    assert_eq!(shape.name(), "pyramid.obj");
}
