//! Tiling problem definition, outcomes, and validation

pub mod problem;
pub mod solution;
pub mod validator;

pub use problem::{EncodedProblem, PieceAnalysis, ProblemAnalysis, TilingOptions, TilingProblem};
pub use solution::{InfeasibleReason, PlacedPiece, Tiling, TilingOutcome};
pub use validator::{FeasibilityCheck, SolutionValidator, ValidationResult, Violation};
