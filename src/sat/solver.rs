//! SAT solver integration using CaDiCaL

use super::constraints::{Clause, CnfFormula};
use anyhow::Result;
use cadical::Solver;
use std::collections::BTreeSet;
use std::fmt;
use std::time::{Duration, Instant};

/// SAT solver wrapper for CaDiCaL
pub struct SatSolver {
    solver: Solver,
    variable_count: usize,
    clause_count: usize,
    has_empty_clause: bool,
}

/// Result of SAT solving
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolverSolution {
    /// Variables the model sets to true
    pub true_variables: BTreeSet<i32>,
    pub solve_time: Duration,
}

/// Statistics about the solving process
#[derive(Debug, Clone)]
pub struct SolverStatistics {
    pub variable_count: usize,
    pub clause_count: usize,
}

impl SatSolver {
    /// Create a new SAT solver instance
    pub fn new() -> Self {
        Self {
            solver: Solver::new(),
            variable_count: 0,
            clause_count: 0,
            has_empty_clause: false,
        }
    }

    /// Add every clause of a formula
    pub fn add_formula(&mut self, formula: &CnfFormula) -> Result<()> {
        for clause in formula.clauses() {
            self.add_clause(clause)?;
        }
        Ok(())
    }

    /// Add a single clause to the solver
    pub fn add_clause(&mut self, clause: &Clause) -> Result<()> {
        self.clause_count += 1;

        // An empty clause is kept out of the backend and decides the result
        if clause.is_empty() {
            self.has_empty_clause = true;
            return Ok(());
        }

        for &literal in &clause.literals {
            if literal == 0 {
                anyhow::bail!("Literal 0 is not a valid SAT literal");
            }
            self.variable_count = self.variable_count.max(literal.unsigned_abs() as usize);
        }

        self.solver.add_clause(clause.literals.iter().copied());
        Ok(())
    }

    /// Solve and return the model, or `None` when unsatisfiable
    pub fn solve(&mut self) -> Result<Option<SolverSolution>> {
        if self.has_empty_clause {
            return Ok(None);
        }

        let start_time = Instant::now();
        let result = self.solver.solve();
        let solve_time = start_time.elapsed();

        match result {
            Some(true) => Ok(Some(SolverSolution {
                true_variables: self.extract_true_variables(),
                solve_time,
            })),
            Some(false) => Ok(None),
            None => anyhow::bail!("CaDiCaL stopped without deciding satisfiability"),
        }
    }

    fn extract_true_variables(&self) -> BTreeSet<i32> {
        (1..=self.variable_count as i32)
            .filter(|&var| self.solver.value(var) == Some(true))
            .collect()
    }

    pub fn statistics(&self) -> SolverStatistics {
        SolverStatistics {
            variable_count: self.variable_count,
            clause_count: self.clause_count,
        }
    }

    /// Get the number of variables
    pub fn variable_count(&self) -> usize {
        self.variable_count
    }

    /// Get the number of clauses
    pub fn clause_count(&self) -> usize {
        self.clause_count
    }
}

impl Default for SatSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SolverStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "SAT Solver Statistics:")?;
        writeln!(f, "  Variables: {}", self.variable_count)?;
        writeln!(f, "  Clauses: {}", self.clause_count)?;
        Ok(())
    }
}

impl fmt::Display for SolverSolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "SAT Solution:")?;
        writeln!(f, "  Solve time: {:.3}s", self.solve_time.as_secs_f64())?;
        writeln!(f, "  True variables: {}", self.true_variables.len())?;
        Ok(())
    }
}
