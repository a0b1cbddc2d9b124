//! SAT solver integration using Varisat

use super::constraints::{Clause, CnfFormula};
use super::solver::{SolverSolution, SolverStatistics};
use anyhow::{Context, Result};
use std::collections::BTreeSet;
use std::time::Instant;
use varisat::{ExtendFormula, Lit, Solver};

/// SAT solver wrapper for Varisat
pub struct VarisatSatSolver {
    solver: Solver<'static>,
    variable_count: usize,
    clause_count: usize,
    has_empty_clause: bool,
}

impl VarisatSatSolver {
    pub fn new() -> Self {
        Self {
            solver: Solver::new(),
            variable_count: 0,
            clause_count: 0,
            has_empty_clause: false,
        }
    }

    pub fn add_formula(&mut self, formula: &CnfFormula) -> Result<()> {
        for clause in formula.clauses() {
            self.add_clause(clause)?;
        }
        Ok(())
    }

    pub fn add_clause(&mut self, clause: &Clause) -> Result<()> {
        self.clause_count += 1;

        if clause.is_empty() {
            self.has_empty_clause = true;
            return Ok(());
        }

        let mut literals = Vec::with_capacity(clause.literals.len());
        for &literal in &clause.literals {
            if literal == 0 {
                anyhow::bail!("Literal 0 is not a valid SAT literal");
            }
            self.variable_count = self.variable_count.max(literal.unsigned_abs() as usize);
            literals.push(Lit::from_dimacs(literal as isize));
        }

        self.solver.add_clause(&literals);
        Ok(())
    }

    pub fn solve(&mut self) -> Result<Option<SolverSolution>> {
        if self.has_empty_clause {
            return Ok(None);
        }

        let start_time = Instant::now();
        let satisfiable = self
            .solver
            .solve()
            .map_err(|e| anyhow::anyhow!("Varisat failed while solving: {:?}", e))?;
        let solve_time = start_time.elapsed();

        if !satisfiable {
            return Ok(None);
        }

        let model = self
            .solver
            .model()
            .context("Varisat reported satisfiable but produced no model")?;
        let true_variables: BTreeSet<i32> = model
            .into_iter()
            .filter(|lit| lit.is_positive())
            .map(|lit| lit.to_dimacs() as i32)
            .collect();

        Ok(Some(SolverSolution { true_variables, solve_time }))
    }

    pub fn statistics(&self) -> SolverStatistics {
        SolverStatistics {
            variable_count: self.variable_count,
            clause_count: self.clause_count,
        }
    }

    pub fn variable_count(&self) -> usize {
        self.variable_count
    }

    pub fn clause_count(&self) -> usize {
        self.clause_count
    }
}

impl Default for VarisatSatSolver {
    fn default() -> Self {
        Self::new()
    }
}
