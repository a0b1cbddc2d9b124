//! Configuration settings for the polyomino tiling solver

use crate::polyomino::{PieceKind, PieceSpec};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub table: TableConfig,
    pub pieces: Vec<PieceSpec>,
    pub solver: SolverConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableConfig {
    pub width: usize,
    pub height: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolverConfig {
    pub backend: SolverBackend,
    /// Generate placements and detect overlaps on worker threads
    pub parallel_generation: bool,
    /// Reject oversized pieces and excess area before encoding
    pub precheck: bool,
    /// Total piece area must equal the table area, not just fit in it
    pub require_full_cover: bool,
    /// Re-check the decoded tiling before reporting it
    pub validate_solution: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SolverBackend {
    Cadical,
    Varisat,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub colored: bool,
    #[serde(default)]
    pub output_file: Option<PathBuf>,
    #[serde(default)]
    pub dimacs_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    Text,
    Json,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            table: TableConfig { width: 4, height: 6 },
            pieces: vec![
                PieceSpec::rectangle(2, 2, 1),
                PieceSpec::u_shape(4, 3, 1),
                PieceSpec::u_shape(3, 2, 1),
            ],
            solver: SolverConfig {
                backend: SolverBackend::Cadical,
                parallel_generation: true,
                precheck: true,
                require_full_cover: false,
                validate_solution: true,
            },
            output: OutputConfig {
                format: OutputFormat::Text,
                colored: true,
                output_file: None,
                dimacs_file: None,
            },
        }
    }
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let settings: Settings = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        settings.validate()?;
        Ok(settings)
    }

    /// Save settings to a YAML file
    pub fn to_file(&self, path: &Path) -> Result<()> {
        let content = serde_yaml::to_string(self)
            .context("Failed to serialize settings")?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Validate the settings
    pub fn validate(&self) -> Result<()> {
        if self.table.width == 0 || self.table.height == 0 {
            anyhow::bail!(
                "Table dimensions must be positive, got {}x{}",
                self.table.width,
                self.table.height
            );
        }

        if self.pieces.iter().all(|spec| spec.count == 0) {
            anyhow::bail!("At least one piece must be requested");
        }

        for (index, spec) in self.pieces.iter().enumerate() {
            if spec.width == 0 || spec.height == 0 {
                anyhow::bail!("Piece #{} has non-positive dimensions {}x{}", index, spec.width, spec.height);
            }
            if spec.kind == PieceKind::UShape && spec.width < 2 {
                anyhow::bail!("Piece #{} is a U-shape narrower than 2", index);
            }
        }

        Ok(())
    }

    /// Merge settings with command line overrides
    pub fn merge_with_cli(&mut self, cli_overrides: &CliOverrides) {
        if let Some(width) = cli_overrides.width {
            self.table.width = width;
        }
        if let Some(height) = cli_overrides.height {
            self.table.height = height;
        }
        if !cli_overrides.pieces.is_empty() {
            self.pieces = cli_overrides.pieces.clone();
        }
        if let Some(backend) = cli_overrides.backend {
            self.solver.backend = backend;
        }
        if let Some(format) = cli_overrides.format {
            self.output.format = format;
        }
        if cli_overrides.no_color {
            self.output.colored = false;
        }
        if let Some(ref output_file) = cli_overrides.output_file {
            self.output.output_file = Some(output_file.clone());
        }
        if let Some(ref dimacs_file) = cli_overrides.dimacs_file {
            self.output.dimacs_file = Some(dimacs_file.clone());
        }
    }
}

/// Command line overrides for settings
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub width: Option<usize>,
    pub height: Option<usize>,
    /// Replaces the configured pieces when non-empty
    pub pieces: Vec<PieceSpec>,
    pub backend: Option<SolverBackend>,
    pub format: Option<OutputFormat>,
    pub no_color: bool,
    pub output_file: Option<PathBuf>,
    pub dimacs_file: Option<PathBuf>,
}

/// Parse `WxH` or `WxHxN` into a piece spec of the given kind
pub fn parse_piece_arg(kind: PieceKind, arg: &str) -> Result<PieceSpec> {
    let parts: Vec<&str> = arg.split(['x', 'X']).collect();
    let numbers = parts
        .iter()
        .map(|part| part.trim().parse::<usize>())
        .collect::<std::result::Result<Vec<_>, _>>()
        .with_context(|| format!("Invalid piece '{}': expected WxH or WxHxN", arg))?;

    match numbers.as_slice() {
        &[width, height] => Ok(PieceSpec { kind, width, height, count: 1 }),
        &[width, height, count] => Ok(PieceSpec { kind, width, height, count }),
        _ => anyhow::bail!("Invalid piece '{}': expected WxH or WxHxN", arg),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_settings_are_valid() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.pieces.len(), 3);
    }

    #[test]
    fn test_yaml_round_trip_through_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config/tiling.yaml");

        let mut settings = Settings::default();
        settings.solver.backend = SolverBackend::Varisat;
        settings.to_file(&path).unwrap();

        let loaded = Settings::from_file(&path).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_parse_yaml_without_optional_paths() {
        let yaml = r#"
table: { width: 4, height: 4 }
pieces:
  - { kind: rectangle, width: 2, height: 2, count: 2 }
  - { kind: u_shape, width: 3, height: 2, count: 1 }
solver:
  backend: varisat
  parallel_generation: false
  precheck: true
  require_full_cover: true
  validate_solution: true
output:
  format: json
  colored: false
"#;
        let settings: Settings = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(settings.pieces[1], PieceSpec::u_shape(3, 2, 1));
        assert_eq!(settings.solver.backend, SolverBackend::Varisat);
        assert_eq!(settings.output.format, OutputFormat::Json);
        assert!(settings.output.output_file.is_none());
    }

    #[test]
    fn test_validation_failures() {
        let mut settings = Settings::default();
        settings.table.width = 0;
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.pieces = vec![PieceSpec::rectangle(2, 2, 0)];
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.pieces.push(PieceSpec::u_shape(1, 4, 1));
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_cli_overrides() {
        let mut settings = Settings::default();
        let overrides = CliOverrides {
            width: Some(5),
            pieces: vec![PieceSpec::rectangle(1, 5, 1)],
            no_color: true,
            ..CliOverrides::default()
        };
        settings.merge_with_cli(&overrides);

        assert_eq!(settings.table, TableConfig { width: 5, height: 6 });
        assert_eq!(settings.pieces, vec![PieceSpec::rectangle(1, 5, 1)]);
        assert!(!settings.output.colored);
        assert_eq!(settings.solver.backend, SolverBackend::Cadical);
    }

    #[test]
    fn test_parse_piece_arg() {
        assert_eq!(parse_piece_arg(PieceKind::Rectangle, "3x2").unwrap(), PieceSpec::rectangle(3, 2, 1));
        assert_eq!(parse_piece_arg(PieceKind::UShape, "4X3x2").unwrap(), PieceSpec::u_shape(4, 3, 2));
        assert!(parse_piece_arg(PieceKind::Rectangle, "3").is_err());
        assert!(parse_piece_arg(PieceKind::Rectangle, "axb").is_err());
    }
}
