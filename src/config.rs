//! Configuration for slicing runs.
//!
//! A [`SlicerConfig`] is built from defaults, an optional TOML file, and
//! command-line overrides applied by the binary. Every key is optional in the
//! file; missing sections fall back to their defaults.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::codec::OutputFormat;
use crate::error::{Result, SliceError};
use crate::grid::GridSpec;

/// Environment variable overriding [`config_dir`].
pub const CONFIG_DIR_ENV: &str = "SPRITE_SLICER_CONFIG_DIR";

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlicerConfig {
    /// Sprite sheet to slice. May instead be given on the command line.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<PathBuf>,
    /// Grid layout of the sheet.
    pub grid: GridSpec,
    /// Where and how tiles are written.
    pub output: OutputConfig,
}

/// Tile output settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory receiving the tiles (created if missing).
    pub dir: PathBuf,
    /// File name prefix; tiles are named `{prefix}_{row}_{col}.{ext}`.
    pub prefix: String,
    /// Tile encoding.
    pub format: OutputFormat,
    /// Optional JSON manifest describing the written tiles.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manifest: Option<PathBuf>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
            prefix: "icon".to_owned(),
            format: OutputFormat::Png,
            manifest: None,
        }
    }
}

impl SlicerConfig {
    /// Check grid values and output naming.
    ///
    /// # Errors
    ///
    /// Returns [`SliceError::Config`] describing the first problem found.
    pub fn validate(&self) -> Result<()> {
        self.grid.validate()?;
        if self.output.prefix.is_empty() {
            return Err(SliceError::Config("output prefix must not be empty".to_owned()));
        }
        if self.output.prefix.contains(['/', '\\']) {
            return Err(SliceError::Config(format!(
                "output prefix `{}` must not contain path separators",
                self.output.prefix
            )));
        }
        Ok(())
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid TOML.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| SliceError::Config(format!("{}: {e}", path.display())))
    }

    /// Save configuration to a TOML file, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or the config cannot be serialized.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| SliceError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Returns the default config file path: `<config dir>/config.toml`.
    pub fn default_config_path() -> PathBuf {
        config_dir().join("config.toml")
    }
}

/// Directory holding `config.toml`.
///
/// Resolves to `dirs::config_dir()/sprite-slicer/` by default. Override with
/// the `SPRITE_SLICER_CONFIG_DIR` environment variable.
#[must_use]
pub fn config_dir() -> PathBuf {
    if let Some(override_dir) = std::env::var_os(CONFIG_DIR_ENV) {
        return PathBuf::from(override_dir);
    }
    dirs::config_dir()
        .map(|d| d.join("sprite-slicer"))
        .unwrap_or_else(|| PathBuf::from("/tmp/sprite-slicer-config"))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;

    #[test]
    fn default_config_matches_stock_sheet() {
        let config = SlicerConfig::default();
        assert_eq!(config.source, None);
        assert_eq!(config.grid, GridSpec::new(32, 32, 6, 2));
        assert_eq!(config.output.dir, PathBuf::from("."));
        assert_eq!(config.output.prefix, "icon");
        assert_eq!(config.output.format, OutputFormat::Png);
        assert!(config.output.manifest.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn empty_toml_yields_defaults() {
        let config: SlicerConfig = toml::from_str("").expect("deserialize empty TOML");
        assert_eq!(config, SlicerConfig::default());
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let toml_str = r#"
source = "foods.png"

[grid]
columns = 8

[output]
format = "jpg"
"#;
        let config: SlicerConfig = toml::from_str(toml_str).expect("deserialize");
        assert_eq!(config.source, Some(PathBuf::from("foods.png")));
        assert_eq!(config.grid.columns, 8);
        assert_eq!(config.grid.rows, 2);
        assert_eq!(config.grid.cell_width, 32);
        assert_eq!(config.output.format, OutputFormat::Jpeg);
        assert_eq!(config.output.prefix, "icon");
    }

    #[test]
    fn save_and_load_round_trip() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("nested").join("config.toml");

        let mut config = SlicerConfig {
            source: Some(PathBuf::from("sheets/foods.png")),
            ..Default::default()
        };
        config.grid.rows = 4;
        config.output.prefix = "food".to_owned();
        config.output.manifest = Some(PathBuf::from("foods.json"));

        config.save_to_file(&path).expect("save config");
        assert!(path.exists());

        let loaded = SlicerConfig::from_file(&path).expect("load config");
        assert_eq!(loaded, config);
    }

    #[test]
    fn from_file_nonexistent_returns_error() {
        let result = SlicerConfig::from_file(Path::new("/nonexistent/path/config.toml"));
        assert!(matches!(result, Err(SliceError::Io(_))));
    }

    #[test]
    fn from_file_invalid_toml_returns_error() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "this is not valid toml {{{").expect("write");

        let result = SlicerConfig::from_file(&path);
        assert!(matches!(result, Err(SliceError::Config(_))));
    }

    #[test]
    fn unknown_format_is_rejected() {
        let result: std::result::Result<SlicerConfig, _> =
            toml::from_str("[output]\nformat = \"gif\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn validate_rejects_zero_grid_and_bad_prefix() {
        let mut config = SlicerConfig::default();
        config.grid.cell_height = 0;
        assert!(matches!(config.validate(), Err(SliceError::Config(_))));

        let mut config = SlicerConfig::default();
        config.output.prefix = String::new();
        assert!(matches!(config.validate(), Err(SliceError::Config(_))));

        config.output.prefix = "../icon".to_owned();
        assert!(matches!(config.validate(), Err(SliceError::Config(_))));
    }

    #[test]
    fn default_config_path_ends_with_config_toml() {
        let path = SlicerConfig::default_config_path();
        assert!(path.to_string_lossy().ends_with("config.toml"));
    }
}
