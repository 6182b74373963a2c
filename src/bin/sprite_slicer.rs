//! Slice a fixed-grid sprite sheet into one image file per cell.

use anyhow::Context;
use clap::Parser;
use sprite_slicer::{OutputFormat, SlicerConfig, SpriteSlicer};
use std::num::NonZeroU32;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Cut a sprite sheet into `{prefix}_{row}_{col}` tiles.
#[derive(Parser, Debug)]
#[command(name = "sprite-slicer", version, about)]
struct Cli {
    /// Sprite sheet to slice (overrides `source` from the config file).
    source: Option<PathBuf>,

    /// Path to TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Width of one cell in pixels.
    #[arg(long)]
    cell_width: Option<NonZeroU32>,

    /// Height of one cell in pixels.
    #[arg(long)]
    cell_height: Option<NonZeroU32>,

    /// Number of cells per row.
    #[arg(long)]
    columns: Option<NonZeroU32>,

    /// Number of rows.
    #[arg(long)]
    rows: Option<NonZeroU32>,

    /// Directory receiving the tiles.
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// File name prefix for tiles.
    #[arg(long)]
    prefix: Option<String>,

    /// Tile encoding (png|jpeg).
    #[arg(long)]
    format: Option<OutputFormat>,

    /// Write a JSON manifest of the written tiles.
    #[arg(long)]
    manifest: Option<PathBuf>,

    /// Validate the sheet and list planned tiles without writing anything.
    #[arg(long)]
    dry_run: bool,

    /// Write the effective configuration as TOML and exit.
    #[arg(long, value_name = "PATH")]
    save_config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so stdout stays a clean list of tiles.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("sprite_slicer=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let base = load_base_config(cli.config.as_deref())?;
    let config = apply_overrides(&cli, base);

    if let Some(path) = &cli.save_config {
        config.validate()?;
        config
            .save_to_file(path)
            .with_context(|| format!("failed to save config to {}", path.display()))?;
        println!("Saved config to {}", path.display());
        return Ok(());
    }

    let source = resolve_source(&config)?;
    let slicer = SpriteSlicer::from_config(&config)?;

    if cli.dry_run {
        let report = slicer.plan(&source)?;
        for artifact in &report.artifacts {
            println!(
                "{}\t{}x{} @ {},{}",
                artifact.path.display(),
                artifact.rect.width(),
                artifact.rect.height(),
                artifact.rect.left,
                artifact.rect.upper
            );
        }
        println!("Dry run: {} tiles planned", report.artifacts.len());
        return Ok(());
    }

    let report = slicer.slice(&source)?;
    if let Some(manifest) = &config.output.manifest {
        sprite_slicer::write_manifest(&report, manifest)?;
    }
    println!(
        "Wrote {} tiles to {}",
        report.artifacts.len(),
        config.output.dir.display()
    );
    Ok(())
}

/// Explicit `--config` file, else the default config file if present, else defaults.
fn load_base_config(explicit: Option<&Path>) -> anyhow::Result<SlicerConfig> {
    if let Some(path) = explicit {
        return SlicerConfig::from_file(path)
            .with_context(|| format!("failed to load config {}", path.display()));
    }
    let default_path = SlicerConfig::default_config_path();
    if default_path.is_file() {
        tracing::debug!(path = %default_path.display(), "using default config file");
        return SlicerConfig::from_file(&default_path)
            .with_context(|| format!("failed to load config {}", default_path.display()));
    }
    Ok(SlicerConfig::default())
}

/// Sheet to slice, after CLI overrides have been applied.
fn resolve_source(config: &SlicerConfig) -> anyhow::Result<PathBuf> {
    config
        .source
        .clone()
        .context("no sprite sheet given (pass SOURCE or set `source` in the config file)")
}

/// Command-line flags win over the config file.
fn apply_overrides(cli: &Cli, mut config: SlicerConfig) -> SlicerConfig {
    if let Some(source) = &cli.source {
        config.source = Some(source.clone());
    }
    if let Some(v) = cli.cell_width {
        config.grid.cell_width = v.get();
    }
    if let Some(v) = cli.cell_height {
        config.grid.cell_height = v.get();
    }
    if let Some(v) = cli.columns {
        config.grid.columns = v.get();
    }
    if let Some(v) = cli.rows {
        config.grid.rows = v.get();
    }
    if let Some(dir) = &cli.output_dir {
        config.output.dir = dir.clone();
    }
    if let Some(prefix) = &cli.prefix {
        config.output.prefix = prefix.clone();
    }
    if let Some(format) = cli.format {
        config.output.format = format;
    }
    if let Some(manifest) = &cli.manifest {
        config.output.manifest = Some(manifest.clone());
    }
    config
}
