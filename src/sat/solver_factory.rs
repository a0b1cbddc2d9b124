//! Factory for creating SAT solver instances based on configuration

use super::constraints::CnfFormula;
use super::solver::{SatSolver, SolverSolution, SolverStatistics};
use super::varisat_solver::VarisatSatSolver;
use crate::config::SolverBackend;
use anyhow::Result;

/// Unified SAT solver interface that can use different backends
pub enum UnifiedSatSolver {
    Cadical(SatSolver),
    Varisat(VarisatSatSolver),
}

impl UnifiedSatSolver {
    /// Create a new solver instance based on the specified backend
    pub fn new(backend: SolverBackend) -> Self {
        match backend {
            SolverBackend::Cadical => UnifiedSatSolver::Cadical(SatSolver::new()),
            SolverBackend::Varisat => UnifiedSatSolver::Varisat(VarisatSatSolver::new()),
        }
    }

    /// Add every clause of a formula
    pub fn add_formula(&mut self, formula: &CnfFormula) -> Result<()> {
        match self {
            UnifiedSatSolver::Cadical(solver) => solver.add_formula(formula),
            UnifiedSatSolver::Varisat(solver) => solver.add_formula(formula),
        }
    }

    /// Solve the SAT problem and return the model, if any
    pub fn solve(&mut self) -> Result<Option<SolverSolution>> {
        match self {
            UnifiedSatSolver::Cadical(solver) => solver.solve(),
            UnifiedSatSolver::Varisat(solver) => solver.solve(),
        }
    }

    /// Get solver statistics
    pub fn statistics(&self) -> SolverStatistics {
        match self {
            UnifiedSatSolver::Cadical(solver) => solver.statistics(),
            UnifiedSatSolver::Varisat(solver) => solver.statistics(),
        }
    }

    /// Get the number of variables
    pub fn variable_count(&self) -> usize {
        match self {
            UnifiedSatSolver::Cadical(solver) => solver.variable_count(),
            UnifiedSatSolver::Varisat(solver) => solver.variable_count(),
        }
    }

    /// Get the number of clauses
    pub fn clause_count(&self) -> usize {
        match self {
            UnifiedSatSolver::Cadical(solver) => solver.clause_count(),
            UnifiedSatSolver::Varisat(solver) => solver.clause_count(),
        }
    }

    /// Get the backend type being used
    pub fn backend(&self) -> SolverBackend {
        match self {
            UnifiedSatSolver::Cadical(_) => SolverBackend::Cadical,
            UnifiedSatSolver::Varisat(_) => SolverBackend::Varisat,
        }
    }
}

impl Default for UnifiedSatSolver {
    fn default() -> Self {
        UnifiedSatSolver::Cadical(SatSolver::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sat::Clause;

    fn formula(clauses: Vec<Vec<i32>>) -> CnfFormula {
        let mut formula = CnfFormula::new();
        formula.extend(clauses.into_iter().map(Clause::new));
        formula
    }

    #[test]
    fn test_backend_creation() {
        for backend in [SolverBackend::Cadical, SolverBackend::Varisat] {
            let solver = UnifiedSatSolver::new(backend);
            assert_eq!(solver.backend(), backend);
            assert_eq!(solver.variable_count(), 0);
            assert_eq!(solver.clause_count(), 0);
        }
        assert_eq!(UnifiedSatSolver::default().backend(), SolverBackend::Cadical);
    }

    #[test]
    fn test_backends_agree() {
        let sat = formula(vec![vec![1, 2], vec![-1], vec![-2, 3]]);
        let unsat = formula(vec![vec![1], vec![-1, 2], vec![-2]]);

        for backend in [SolverBackend::Cadical, SolverBackend::Varisat] {
            let mut solver = UnifiedSatSolver::new(backend);
            solver.add_formula(&sat).unwrap();
            let solution = solver.solve().unwrap().unwrap();
            assert!(sat.is_satisfied_by(&solution.true_variables));

            let mut solver = UnifiedSatSolver::new(backend);
            solver.add_formula(&unsat).unwrap();
            assert!(solver.solve().unwrap().is_none());
        }
    }
}
