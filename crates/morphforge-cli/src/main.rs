//! `morphforge`: synthesize morph targets for one or more base meshes.
//!
//! Configuration is loaded from `config.ron` and can be overridden via CLI flags.
//! Run with `cargo run -p morphforge-cli -- body.json` to write `morphs/body.morphs.json`.
//! Run with `cargo run -p morphforge-cli -- --dump-catalog catalog.ron` to get an
//! editable copy of the built-in catalog.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use morphforge_catalog::{CatalogError, MorphCatalog};
use morphforge_config::{CliArgs, Config, ConfigError};
use morphforge_export::ExportError;
use morphforge_mesh::{GeometryError, Mesh};
use morphforge_synth::{BuildOptions, MorphSet, MorphTargetBuilder};
use thiserror::Error;
use tracing::{error, info};

/// Command line of the `morphforge` binary.
#[derive(Parser, Debug)]
#[command(name = "morphforge", about = "Procedural morph target synthesis for humanoid meshes")]
struct Cli {
    /// Mesh documents (JSON: `{name, positions, unit?, up_axis?}`).
    #[arg(required_unless_present = "dump_catalog")]
    meshes: Vec<PathBuf>,

    /// Write the active catalog as RON to this path and exit.
    #[arg(long, value_name = "PATH")]
    dump_catalog: Option<PathBuf>,

    /// Build and report without writing export documents.
    #[arg(long)]
    dry_run: bool,

    #[command(flatten)]
    overrides: CliArgs,
}

/// Anything that stops a run.
#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{}: not a mesh document: {source}", path.display())]
    MeshFormat {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The name would not map to a single file inside the output directory.
    #[error("mesh name `{0}` is not a plain file name")]
    InvalidMeshName(String),

    #[error("mesh name `{0}` appears more than once")]
    DuplicateMeshName(String),

    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error("{failed} of {total} meshes failed")]
    Incomplete { failed: usize, total: usize },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            eprintln!("morphforge: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let config_dir = match cli.overrides.config.clone() {
        Some(dir) => dir,
        None => Config::default_dir()?,
    };

    let mut config = Config::load_or_create(&config_dir).unwrap_or_else(|e| {
        eprintln!("Failed to load config: {e}, using defaults");
        Config::default()
    });
    config.apply_cli_overrides(&cli.overrides);
    config.validate()?;

    let log_dir = config_dir.join("logs");
    morphforge_log::init_logging(Some(&log_dir), cfg!(debug_assertions), Some(&config));

    let catalog = load_catalog(&config)?;

    if let Some(path) = &cli.dump_catalog {
        std::fs::write(path, catalog.to_ron_string()?).map_err(|source| CliError::Io {
            path: path.clone(),
            source,
        })?;
        info!(path = %path.display(), "wrote catalog");
        return Ok(());
    }

    let meshes = cli
        .meshes
        .iter()
        .map(PathBuf::as_path)
        .map(read_mesh)
        .collect::<Result<Vec<_>, _>>()?;
    check_mesh_names(&meshes)?;

    let builder = MorphTargetBuilder::new(&catalog, BuildOptions::from_config(&config));
    let results = builder.build_batch(&meshes);

    let total = meshes.len();
    let mut failed = 0;
    for (mesh, result) in meshes.iter().zip(results) {
        let outcome = result
            .map_err(CliError::from)
            .and_then(|set| finish(mesh, &set, &config, cli.dry_run));
        if let Err(e) = outcome {
            error!(mesh = %mesh.name, "{e}");
            failed += 1;
        }
    }

    if failed > 0 {
        return Err(CliError::Incomplete { failed, total });
    }
    Ok(())
}

fn load_catalog(config: &Config) -> Result<MorphCatalog, CatalogError> {
    match &config.catalog.path {
        Some(path) => MorphCatalog::from_ron(path),
        None => {
            let catalog = MorphCatalog::builtin()?;
            info!(morphs = catalog.len(), "using built-in morph catalog");
            Ok(catalog)
        }
    }
}

fn read_mesh(path: &Path) -> Result<Mesh, CliError> {
    let contents = std::fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&contents).map_err(|source| CliError::MeshFormat {
        path: path.to_path_buf(),
        source,
    })
}

/// Print the per-morph report and write the export document.
fn finish(mesh: &Mesh, set: &MorphSet, config: &Config, dry_run: bool) -> Result<(), CliError> {
    print!("{}", report_table(set));
    if dry_run {
        return Ok(());
    }
    let doc = morphforge_export::export(mesh, set)?;
    let path = output_path(&config.export.output_dir, &mesh.name);
    morphforge_export::write_json(&doc, &path, config.export.pretty)?;
    Ok(())
}

/// Mesh names become output file names, so each must be a distinct plain file name.
fn check_mesh_names(meshes: &[Mesh]) -> Result<(), CliError> {
    let mut seen = BTreeSet::new();
    for mesh in meshes {
        let name = mesh.name.as_str();
        if Path::new(name).file_name().is_none_or(|file| file != name) {
            return Err(CliError::InvalidMeshName(name.to_string()));
        }
        if !seen.insert(name) {
            return Err(CliError::DuplicateMeshName(name.to_string()));
        }
    }
    Ok(())
}

fn output_path(dir: &Path, mesh: &str) -> PathBuf {
    dir.join(format!("{mesh}.morphs.json"))
}

fn report_table(set: &MorphSet) -> String {
    let mut out = format!(
        "{} ({} vertices, {:?}-up, {:?}, {:.2} m tall)\n",
        set.mesh,
        set.vertex_count,
        set.frame.up_axis,
        set.frame.unit,
        set.frame.height_m()
    );
    for report in &set.reports {
        out.push_str(&format!(
            "  {:<18} {:>8} {:>7.2}%  {:?}\n",
            report.name.as_str(),
            report.affected,
            report.fraction * 100.0,
            report.plausibility
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec3;

    fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_cli_parses_overrides() {
        let cli = Cli::try_parse_from([
            "morphforge",
            "a.json",
            "b.json",
            "--unit-threshold",
            "80",
            "--dry-run",
        ])
        .unwrap();
        assert_eq!(cli.meshes.len(), 2);
        assert_eq!(cli.overrides.unit_threshold, Some(80.0));
        assert!(cli.dry_run);
    }

    #[test]
    fn test_meshes_required_without_dump() {
        assert!(Cli::try_parse_from(["morphforge"]).is_err());
        let cli = Cli::try_parse_from(["morphforge", "--dump-catalog", "out.ron"]).unwrap();
        assert!(cli.meshes.is_empty());
    }

    #[test]
    fn test_read_mesh() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            dir.path(),
            "scan.json",
            r#"{"name":"scan","positions":[[0,0,0],[0.5,1.8,0.2]],"unit":"Meter"}"#,
        );
        let mesh = read_mesh(&path).unwrap();
        assert_eq!(mesh.name, "scan");
        assert_eq!(mesh.positions[1], DVec3::new(0.5, 1.8, 0.2));
    }

    #[test]
    fn test_read_mesh_errors() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            read_mesh(&dir.path().join("absent.json")),
            Err(CliError::Io { .. })
        ));
        let bad = write(dir.path(), "bad.json", "{\"positions\": 3}");
        assert!(matches!(read_mesh(&bad), Err(CliError::MeshFormat { .. })));
    }

    #[test]
    fn test_mesh_names_must_be_distinct_file_names() {
        let mesh = |name: &str| Mesh::new(name, vec![DVec3::ZERO, DVec3::ONE]);
        assert!(check_mesh_names(&[mesh("body"), mesh("head.v2")]).is_ok());

        for bad in ["", ".", "..", "../escape", "nested/body", "/abs"] {
            assert!(
                matches!(
                    check_mesh_names(&[mesh(bad)]),
                    Err(CliError::InvalidMeshName(name)) if name == bad
                ),
                "{bad:?} should be rejected"
            );
        }

        assert!(matches!(
            check_mesh_names(&[mesh("body"), mesh("head"), mesh("body")]),
            Err(CliError::DuplicateMeshName(name)) if name == "body"
        ));
    }

    #[test]
    fn test_external_catalog_is_used() {
        let dir = tempfile::tempdir().unwrap();
        let builtin = MorphCatalog::builtin().unwrap();
        let path = write(dir.path(), "catalog.ron", &builtin.to_ron_string().unwrap());
        let mut config = Config::default();
        config.catalog.path = Some(path);
        assert_eq!(load_catalog(&config).unwrap().len(), builtin.len());

        config.catalog.path = Some(dir.path().join("absent.ron"));
        assert!(matches!(load_catalog(&config), Err(CatalogError::Io(_))));
    }

    #[test]
    fn test_finish_writes_document() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.export.output_dir = dir.path().join("morphs");

        let positions = (0..=18)
            .flat_map(|i| {
                let y = i as f64 * 0.1;
                [DVec3::new(0.2, y, 0.1), DVec3::new(-0.2, y, -0.1)]
            })
            .collect();
        let mesh = Mesh::new("pole", positions);
        let catalog = MorphCatalog::builtin().unwrap();
        let set = MorphTargetBuilder::new(&catalog, BuildOptions::from_config(&config))
            .build(&mesh)
            .unwrap();

        finish(&mesh, &set, &config, false).unwrap();
        let written = output_path(&config.export.output_dir, "pole");
        let doc = morphforge_export::read_json(&written).unwrap();
        assert_eq!(doc.mesh, "pole");
        assert_eq!(doc.targets.len(), catalog.len());
    }

    #[test]
    fn test_report_table_lists_every_morph() {
        let positions = (0..=18)
            .flat_map(|i| {
                let y = i as f64 * 0.1;
                [DVec3::new(0.2, y, 0.1), DVec3::new(-0.2, y, -0.1)]
            })
            .collect();
        let mesh = Mesh::new("pole", positions);
        let catalog = MorphCatalog::builtin().unwrap();
        let set = MorphTargetBuilder::new(&catalog, BuildOptions::default())
            .build(&mesh)
            .unwrap();
        let table = report_table(&set);
        assert!(table.starts_with("pole (38 vertices, Y-up, Meter, 1.80 m tall)"));
        assert!(table.contains("Build_Heavy"));
        assert_eq!(table.lines().count(), catalog.len() + 1);
    }
}
