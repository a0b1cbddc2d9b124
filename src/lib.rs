//! Polyomino Tiling SAT Solver
//!
//! This library decides whether a set of rectangles and U-shaped polyominoes can be
//! placed on a rectangular table without overlapping, by enumerating every candidate
//! placement and handing the resulting CNF formula to a SAT solver.

pub mod config;
pub mod error;
pub mod polyomino;
pub mod sat;
pub mod tiling;
pub mod utils;

pub use config::Settings;
pub use error::{ConfigurationError, DecodeError, TilingError};
pub use tiling::{InfeasibleReason, Tiling, TilingOutcome, TilingProblem};

use anyhow::Result;

/// Main entry point for solving tiling problems
pub fn solve_tiling(settings: &Settings) -> Result<TilingOutcome> {
    settings.validate()?;
    let problem = TilingProblem::from_settings(settings)?;
    problem.solve()
}
