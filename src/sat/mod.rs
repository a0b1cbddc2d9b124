//! SAT encoding, decoding, and solver backends for tiling problems

pub mod constraints;
pub mod decoder;
pub mod solver;
pub mod solver_factory;
pub mod variables;
pub mod varisat_solver;

pub use constraints::{Clause, CnfFormula, ConstraintEncoder, EncodingStatistics};
pub use decoder::ModelDecoder;
pub use solver::{SatSolver, SolverSolution, SolverStatistics};
pub use solver_factory::UnifiedSatSolver;
pub use variables::{PlacementKey, VariablePool, VariableStatistics};
pub use varisat_solver::VarisatSatSolver;
