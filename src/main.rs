//! Command-line access to a project's shape catalogs
//!
//! Usage:
//!   gamedata list obj                 # Tree of OBJ shapes
//!   gamedata inspect obj 3 --json     # Load shape 3 and dump its geometry
//!   gamedata check                    # Parse every mesh, report failures
//!   gamedata import collisions wall.obj --shared
//!   gamedata files obj                # Files a packaged project must carry

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use gamedata::entity::Entity;
use gamedata::shape::{CustomShapeKind, LoadOutcome, ShapeLibrary};
use gamedata::ProjectConfig;

#[derive(Parser)]
#[command(name = "gamedata")]
#[command(version = gamedata::VERSION)]
#[command(about = "Inspect and maintain a project's custom shapes")]
struct Cli {
    /// Project directory (holds project.ron and Content/)
    #[arg(long, global = true, default_value = ".")]
    project: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a kind's catalog as a tree
    List {
        /// obj, mtl or collisions
        kind: CustomShapeKind,
    },
    /// Load one shape and print its geometry summary
    Inspect {
        kind: CustomShapeKind,
        id: i32,
        /// Dump the full geometry as JSON
        #[arg(long)]
        json: bool,
    },
    /// Load every mesh shape and report the ones that fail to parse
    Check,
    /// Copy a file into the project (or shared library) and register it
    Import {
        kind: CustomShapeKind,
        file: PathBuf,
        /// Store in the shared library instead of the project
        #[arg(long)]
        shared: bool,
    },
    /// List project-owned shape files as `absolute -> local`
    Files {
        kind: CustomShapeKind,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = ProjectConfig::open(&cli.project)
        .with_context(|| format!("Failed to read project settings in {}", cli.project.display()))?;
    let mut library = ShapeLibrary::open(&config).context("Failed to read shapes document")?;

    match cli.command {
        Commands::List { kind } => list(&library, kind),
        Commands::Inspect { kind, id, json } => inspect(&mut library, &config, kind, id, json),
        Commands::Check => check(&mut library, &config),
        Commands::Import { kind, file, shared } => {
            let id = library
                .import(&config, kind, &file, shared)
                .with_context(|| format!("Failed to import {}", file.display()))?;
            library.save(&config).context("Failed to save shapes document")?;
            println!("{}", library.get_by_id(id, kind).map(|s| s.item().to_string()).unwrap_or_default());
            Ok(())
        }
        Commands::Files { kind } => {
            for (absolute, local) in library.package_paths(kind, &config) {
                println!("{} -> {}", absolute.display(), local.display());
            }
            Ok(())
        }
    }
}

fn list(library: &ShapeLibrary, kind: CustomShapeKind) -> Result<()> {
    for (depth, row) in library.catalog(kind).rows() {
        let marker = match row.icon {
            Some(icon) => format!("{:?}", icon).to_lowercase(),
            None => "-".to_string(),
        };
        println!("{}{} ({})", "  ".repeat(depth), row.label, marker);
    }
    Ok(())
}

fn inspect(library: &mut ShapeLibrary, config: &ProjectConfig, kind: CustomShapeKind, id: i32, json: bool) -> Result<()> {
    let outcome = library
        .load_geometry(id, kind, config)
        .with_context(|| format!("Failed to load {} shape {}", kind, id))?;
    let shape = library
        .get_by_id(id, kind)
        .with_context(|| format!("{} shape {} disappeared", kind, id))?;

    if json {
        println!("{}", serde_json::to_string_pretty(shape.geometry())?);
        return Ok(());
    }

    println!("{}", shape.item());
    println!("  root:      {}", if shape.is_shared() { "library" } else { "project" });
    if let Some(path) = shape.resolve_path(kind, config) {
        println!("  file:      {}", path.display());
    }
    match outcome {
        LoadOutcome::Loaded { vertices, faces } => {
            println!("  vertices:  {}", vertices);
            println!("  triangles: {}", faces);
            println!("  min:       {}", shape.min_vertex());
            println!("  max:       {}", shape.max_vertex());
            if let Some(size) = shape.geometry().size_in_squares() {
                println!("  squares:   {}", size);
            }
        }
        LoadOutcome::NoSource => println!("  (no file)"),
        LoadOutcome::Skipped => println!("  (no geometry for {} files)", kind),
    }
    Ok(())
}

fn check(library: &mut ShapeLibrary, config: &ProjectConfig) -> Result<()> {
    let mut failures = 0;
    for kind in CustomShapeKind::ALL.into_iter().filter(CustomShapeKind::is_mesh) {
        let ids: Vec<i32> = library.catalog(kind).iter().map(Entity::id).collect();
        for id in ids {
            match library.load_geometry(id, kind, config) {
                Ok(LoadOutcome::NoSource) => warn!(%kind, id, "no file"),
                Ok(_) => {}
                Err(e) => {
                    failures += 1;
                    println!("{} {}: {}", kind, id, e);
                }
            }
        }
    }

    if failures > 0 {
        anyhow::bail!("{} shape(s) failed to load", failures);
    }
    info!("all shapes loaded");
    Ok(())
}
