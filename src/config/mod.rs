//! Configuration management for the polyomino tiling solver

pub mod settings;

pub use settings::{
    parse_piece_arg, CliOverrides, OutputConfig, OutputFormat, Settings, SolverBackend, SolverConfig,
    TableConfig,
};
