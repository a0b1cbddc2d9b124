//! Main CLI application for the polyomino tiling solver

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use log::{info, warn};
use polyomino_tiling::{
    config::{parse_piece_arg, CliOverrides, OutputFormat, Settings, SolverBackend},
    polyomino::{PieceKind, PieceSpec},
    tiling::{TilingOutcome, TilingProblem},
    utils::{ColorOutput, TilingFormatter},
};
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "polyomino_tiling")]
#[command(about = "Polyomino Tiling SAT Solver")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decide whether the pieces fit on the table and print a tiling
    Solve {
        #[command(flatten)]
        problem: ProblemArgs,

        /// Output format (overrides config)
        #[arg(short, long, value_enum)]
        format: Option<FormatArg>,

        /// Write the tiling to this file (overrides config)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Write the CNF formula in DIMACS form to this file
        #[arg(long)]
        dimacs: Option<PathBuf>,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Report placement and encoding statistics without solving
    Analyze {
        #[command(flatten)]
        problem: ProblemArgs,
    },

    /// Create example configuration files
    Setup {
        /// Directory to create files in
        #[arg(short, long, default_value = ".")]
        directory: PathBuf,

        /// Force overwrite existing files
        #[arg(short, long)]
        force: bool,
    },
}

#[derive(clap::Args)]
struct ProblemArgs {
    /// Configuration file path
    #[arg(short, long, default_value = "config/default.yaml")]
    config: PathBuf,

    /// Table width (overrides config)
    #[arg(long)]
    width: Option<usize>,

    /// Table height (overrides config)
    #[arg(long)]
    height: Option<usize>,

    /// Rectangle piece as WxH or WxHxN; repeatable, replaces configured pieces
    #[arg(long = "rect")]
    rects: Vec<String>,

    /// U-shaped piece as WxH or WxHxN; repeatable, replaces configured pieces
    #[arg(long = "u-shape")]
    u_shapes: Vec<String>,

    /// SAT backend (overrides config)
    #[arg(short, long, value_enum)]
    backend: Option<BackendArg>,
}

#[derive(Clone, Copy, ValueEnum)]
enum BackendArg {
    Cadical,
    Varisat,
}

impl From<BackendArg> for SolverBackend {
    fn from(arg: BackendArg) -> Self {
        match arg {
            BackendArg::Cadical => SolverBackend::Cadical,
            BackendArg::Varisat => SolverBackend::Varisat,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    Text,
    Json,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Text => OutputFormat::Text,
            FormatArg::Json => OutputFormat::Json,
        }
    }
}

impl ProblemArgs {
    fn overrides(&self) -> Result<CliOverrides> {
        let mut pieces: Vec<PieceSpec> = Vec::new();
        for arg in &self.rects {
            pieces.push(parse_piece_arg(PieceKind::Rectangle, arg)?);
        }
        for arg in &self.u_shapes {
            pieces.push(parse_piece_arg(PieceKind::UShape, arg)?);
        }

        Ok(CliOverrides {
            width: self.width,
            height: self.height,
            pieces,
            backend: self.backend.map(SolverBackend::from),
            ..CliOverrides::default()
        })
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let verbose = matches!(cli.command, Commands::Solve { verbose: true, .. });
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(if verbose { "debug" } else { "info" }),
    )
    .init();

    match cli.command {
        Commands::Solve {
            problem, format, output, dimacs, no_color, ..
        } => {
            let mut overrides = problem.overrides()?;
            overrides.format = format.map(OutputFormat::from);
            overrides.output_file = output;
            overrides.dimacs_file = dimacs;
            overrides.no_color = no_color;
            solve_command(&problem.config, &overrides)
        }
        Commands::Analyze { problem } => {
            let overrides = problem.overrides()?;
            analyze_command(&problem.config, &overrides)
        }
        Commands::Setup { directory, force } => setup_command(directory, force),
    }
}

fn load_settings(config_path: &Path, overrides: &CliOverrides) -> Result<Settings> {
    let mut settings = if config_path.exists() {
        Settings::from_file(config_path)
            .with_context(|| format!("Failed to load config from {}", config_path.display()))?
    } else {
        warn!("Config file {} not found, using defaults", config_path.display());
        Settings::default()
    };

    settings.merge_with_cli(overrides);
    settings.validate().context("Configuration validation failed")?;
    Ok(settings)
}

fn solve_command(config_path: &Path, overrides: &CliOverrides) -> Result<()> {
    let settings = load_settings(config_path, overrides)?;

    let start_time = Instant::now();
    let problem = TilingProblem::from_settings(&settings).context("Failed to create tiling problem")?;
    let outcome = problem.solve().context("Failed to solve tiling problem")?;
    info!("Finished in {:.3}s", start_time.elapsed().as_secs_f64());

    print!("{}", render_outcome(&outcome, settings.output.format, settings.output.colored)?);

    if let (TilingOutcome::Tiled(tiling), Some(path)) = (&outcome, &settings.output.output_file) {
        TilingFormatter::save_tiling(tiling, path, settings.output.format).context("Failed to save tiling")?;
        println!("{}", ColorOutput::success(&format!("Tiling saved to {}", path.display())));
    }

    Ok(())
}

fn render_outcome(outcome: &TilingOutcome, format: OutputFormat, colored: bool) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(TilingFormatter::format_outcome(outcome, colored)),
        OutputFormat::Json => {
            let value = match outcome {
                TilingOutcome::Tiled(tiling) => serde_json::json!({ "tileable": true, "tiling": tiling }),
                TilingOutcome::Infeasible(reason) => serde_json::json!({ "tileable": false, "infeasible": reason }),
            };
            let mut json = serde_json::to_string_pretty(&value).context("Failed to serialize outcome")?;
            json.push('\n');
            Ok(json)
        }
    }
}

fn analyze_command(config_path: &Path, overrides: &CliOverrides) -> Result<()> {
    let settings = load_settings(config_path, overrides)?;
    let problem = TilingProblem::from_settings(&settings).context("Failed to create problem for analysis")?;

    let analysis = problem.analyze().context("Failed to analyze tiling problem")?;
    println!("{}", analysis);

    Ok(())
}

fn setup_command(directory: PathBuf, force: bool) -> Result<()> {
    let config_dir = directory.join("config");
    let examples_dir = config_dir.join("examples");
    std::fs::create_dir_all(&examples_dir)
        .with_context(|| format!("Failed to create directory {}", examples_dir.display()))?;

    let config_path = config_dir.join("default.yaml");
    if !config_path.exists() || force {
        Settings::default()
            .to_file(&config_path)
            .context("Failed to create default configuration")?;
        println!("Created: {}", config_path.display());
    } else {
        println!("Skipped: {} (already exists)", config_path.display());
    }

    // Exact cover of a 5x5 table
    let mut full_cover = Settings::default();
    full_cover.table.width = 5;
    full_cover.table.height = 5;
    full_cover.pieces = vec![
        PieceSpec::u_shape(5, 3, 1),
        PieceSpec::rectangle(3, 2, 1),
        PieceSpec::rectangle(5, 1, 2),
    ];
    full_cover.solver.require_full_cover = true;
    full_cover.to_file(&examples_dir.join("full_cover.yaml"))?;

    // Fits by area, but the squares cannot avoid each other
    let mut crowded = Settings::default();
    crowded.table.width = 3;
    crowded.table.height = 3;
    crowded.pieces = vec![PieceSpec::rectangle(2, 2, 2)];
    crowded.solver.backend = SolverBackend::Varisat;
    crowded.to_file(&examples_dir.join("crowded.yaml"))?;

    println!("Created example configurations in: {}", examples_dir.display());
    println!("\n{}", ColorOutput::success("Setup complete!"));
    println!("\nNext steps:");
    println!("1. Edit configuration files in {}", config_dir.display());
    println!("2. Run: cargo run -- solve --config config/default.yaml");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::try_parse_from([
            "polyomino_tiling",
            "solve",
            "--config", "test.yaml",
            "--width", "4",
            "--rect", "2x2",
            "--u-shape", "3x2x2",
            "--backend", "varisat",
        ])
        .unwrap();

        let Commands::Solve { problem, .. } = cli.command else {
            panic!("expected solve command");
        };
        let overrides = problem.overrides().unwrap();
        assert_eq!(overrides.width, Some(4));
        assert_eq!(overrides.pieces, vec![PieceSpec::rectangle(2, 2, 1), PieceSpec::u_shape(3, 2, 2)]);
        assert_eq!(overrides.backend, Some(SolverBackend::Varisat));
    }

    #[test]
    fn test_rejects_bad_piece_argument() {
        let cli = Cli::try_parse_from(["polyomino_tiling", "analyze", "--rect", "2by2"]).unwrap();
        let Commands::Analyze { problem } = cli.command else {
            panic!("expected analyze command");
        };
        assert!(problem.overrides().is_err());
    }

    #[test]
    fn test_setup_command() {
        let temp_dir = tempdir().unwrap();
        setup_command(temp_dir.path().to_path_buf(), false).unwrap();

        let config_path = temp_dir.path().join("config/default.yaml");
        assert_eq!(Settings::from_file(&config_path).unwrap(), Settings::default());
        assert!(temp_dir.path().join("config/examples/full_cover.yaml").exists());
    }

    #[test]
    fn test_setup_examples_behave_as_described() {
        let temp_dir = tempdir().unwrap();
        setup_command(temp_dir.path().to_path_buf(), false).unwrap();
        let examples = temp_dir.path().join("config/examples");

        let full_cover = Settings::from_file(&examples.join("full_cover.yaml")).unwrap();
        let outcome = polyomino_tiling::solve_tiling(&full_cover).unwrap();
        assert!(outcome.tiling().unwrap().board().is_full());

        let crowded = Settings::from_file(&examples.join("crowded.yaml")).unwrap();
        assert!(!polyomino_tiling::solve_tiling(&crowded).unwrap().is_tiled());
    }

    #[test]
    fn test_json_rendering() {
        let outcome = TilingOutcome::Infeasible(polyomino_tiling::InfeasibleReason::Unsatisfiable);
        let json = render_outcome(&outcome, OutputFormat::Json, false).unwrap();
        assert!(json.contains("\"tileable\": false"));
        assert!(json.contains("\"reason\": \"unsatisfiable\""));
    }
}
