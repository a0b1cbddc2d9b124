//! CNF representation and the exact-one, non-overlap encoding of a tiling

use super::VariablePool;
use crate::error::ConfigurationError;
use crate::polyomino::Placement;
use itertools::Itertools;
use log::debug;
use rayon::prelude::*;
use std::collections::BTreeSet;
use std::fmt;

/// Represents a SAT clause (disjunction of literals)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Clause {
    pub literals: Vec<i32>, // Positive for variable, negative for negation
}

impl Clause {
    /// Create a new clause from literals
    pub fn new(literals: Vec<i32>) -> Self {
        Self { literals }
    }

    /// Create a unit clause (single literal)
    pub fn unit(literal: i32) -> Self {
        Self { literals: vec![literal] }
    }

    /// Create a binary clause (two literals)
    pub fn binary(lit1: i32, lit2: i32) -> Self {
        Self { literals: vec![lit1, lit2] }
    }

    /// Check if clause is empty (unsatisfiable)
    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }

    pub fn is_satisfied_by(&self, true_variables: &BTreeSet<i32>) -> bool {
        self.literals.iter().any(|&literal| {
            let holds = true_variables.contains(&literal.abs());
            if literal > 0 { holds } else { !holds }
        })
    }
}

/// Conjunction of clauses, in emission order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CnfFormula {
    clauses: Vec<Clause>,
}

impl CnfFormula {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, clause: Clause) {
        self.clauses.push(clause);
    }

    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// An empty clause makes the whole formula unsatisfiable
    pub fn has_empty_clause(&self) -> bool {
        self.clauses.iter().any(Clause::is_empty)
    }

    /// Largest variable id mentioned by any literal
    pub fn max_variable(&self) -> usize {
        self.clauses
            .iter()
            .flat_map(|clause| clause.literals.iter())
            .map(|literal| literal.unsigned_abs() as usize)
            .max()
            .unwrap_or(0)
    }

    /// Evaluate the formula under the assignment "exactly these variables are true"
    pub fn is_satisfied_by(&self, true_variables: &BTreeSet<i32>) -> bool {
        self.clauses.iter().all(|clause| clause.is_satisfied_by(true_variables))
    }

    /// DIMACS CNF text
    pub fn to_dimacs(&self) -> String {
        let mut output = format!("p cnf {} {}\n", self.max_variable(), self.len());
        for clause in &self.clauses {
            for literal in &clause.literals {
                output.push_str(&literal.to_string());
                output.push(' ');
            }
            output.push_str("0\n");
        }
        output
    }
}

impl Extend<Clause> for CnfFormula {
    fn extend<T: IntoIterator<Item = Clause>>(&mut self, iter: T) {
        self.clauses.extend(iter);
    }
}

/// Clause counts per constraint family
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EncodingStatistics {
    pub pieces: usize,
    pub placements: usize,
    pub variables: usize,
    pub at_most_one_clauses: usize,
    pub at_least_one_clauses: usize,
    pub overlap_clauses: usize,
}

impl EncodingStatistics {
    pub fn total_clauses(&self) -> usize {
        self.at_most_one_clauses + self.at_least_one_clauses + self.overlap_clauses
    }
}

impl fmt::Display for EncodingStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "SAT Encoding Statistics:")?;
        writeln!(f, "  Pieces: {}", self.pieces)?;
        writeln!(f, "  Candidate placements: {}", self.placements)?;
        writeln!(f, "  Variables: {}", self.variables)?;
        writeln!(f, "  At-most-one clauses: {}", self.at_most_one_clauses)?;
        writeln!(f, "  At-least-one clauses: {}", self.at_least_one_clauses)?;
        writeln!(f, "  Non-overlap clauses: {}", self.overlap_clauses)?;
        writeln!(f, "  Total clauses: {}", self.total_clauses())?;
        Ok(())
    }
}

/// Compiles per-piece placement lists into CNF.
///
/// `v(i, j)` is "piece i occupies its j-th candidate". Clauses are emitted in
/// three families, in this order:
/// 1. at most one placement per piece, pairwise `(¬v(i,j) ∨ ¬v(i,k))` for `j < k`
/// 2. at least one placement per piece, `(v(i,0) ∨ … ∨ v(i,m-1))`, empty when `m = 0`
/// 3. no overlap between pieces, `(¬v(i,j) ∨ ¬v(i',j'))` for `i < i'` whose cells intersect
#[derive(Debug, Clone, Default)]
pub struct ConstraintEncoder {
    parallel: bool,
}

impl ConstraintEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Detect overlapping placement pairs on worker threads
    pub fn with_parallelism(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn encode(
        &self,
        placements: &[Vec<Placement>],
        pool: &mut VariablePool,
    ) -> Result<(CnfFormula, EncodingStatistics), ConfigurationError> {
        let mut formula = CnfFormula::new();
        let mut stats = EncodingStatistics {
            pieces: placements.len(),
            placements: placements.iter().map(Vec::len).sum(),
            ..EncodingStatistics::default()
        };

        for (piece, candidates) in placements.iter().enumerate() {
            for (j, k) in (0..candidates.len()).tuple_combinations() {
                formula.push(Clause::binary(-pool.id_for(piece, j)?, -pool.id_for(piece, k)?));
                stats.at_most_one_clauses += 1;
            }
        }

        for (piece, candidates) in placements.iter().enumerate() {
            let literals = (0..candidates.len())
                .map(|j| pool.id_for(piece, j))
                .collect::<Result<Vec<_>, _>>()?;
            if literals.is_empty() {
                debug!("Piece {} has no candidate placements; emitting empty clause", piece);
            }
            formula.push(Clause::new(literals));
            stats.at_least_one_clauses += 1;
        }

        for (piece, j, other, k) in self.overlapping_pairs(placements) {
            formula.push(Clause::binary(-pool.id_for(piece, j)?, -pool.id_for(other, k)?));
            stats.overlap_clauses += 1;
        }

        stats.variables = pool.variable_count();
        debug!(
            "Encoded {} pieces into {} clauses over {} variables",
            stats.pieces,
            formula.len(),
            stats.variables
        );

        Ok((formula, stats))
    }

    /// All `(i, j, i', j')` with `i < i'` whose placements share a cell, in
    /// lexicographic order regardless of parallelism
    fn overlapping_pairs(&self, placements: &[Vec<Placement>]) -> Vec<(usize, usize, usize, usize)> {
        let piece_pairs: Vec<(usize, usize)> = (0..placements.len()).tuple_combinations().collect();

        let conflicts_between = |&(piece, other): &(usize, usize)| -> Vec<(usize, usize, usize, usize)> {
            let mut conflicts = Vec::new();
            for (j, a) in placements[piece].iter().enumerate() {
                for (k, b) in placements[other].iter().enumerate() {
                    if a.conflicts_with(b) {
                        conflicts.push((piece, j, other, k));
                    }
                }
            }
            conflicts
        };

        if self.parallel {
            piece_pairs.par_iter().flat_map_iter(conflicts_between).collect()
        } else {
            piece_pairs.iter().flat_map(conflicts_between).collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::polyomino::{construct_pieces, PieceSpec, PlacementGenerator, TableSize};

    fn placements_for(width: usize, height: usize, specs: &[PieceSpec]) -> Vec<Vec<Placement>> {
        let pieces = construct_pieces(specs).unwrap();
        PlacementGenerator::new(TableSize::new(width, height).unwrap()).generate_all(&pieces)
    }

    fn set(ids: &[i32]) -> BTreeSet<i32> {
        ids.iter().copied().collect()
    }

    #[test]
    fn test_clause_evaluation() {
        let clause = Clause::binary(-1, 2);
        assert!(clause.is_satisfied_by(&set(&[])));
        assert!(clause.is_satisfied_by(&set(&[1, 2])));
        assert!(!clause.is_satisfied_by(&set(&[1])));
        assert!(!Clause::new(vec![]).is_satisfied_by(&set(&[1])));
        assert!(Clause::unit(3).is_satisfied_by(&set(&[3])));
    }

    #[test]
    fn test_dimacs_output() {
        let mut formula = CnfFormula::new();
        formula.push(Clause::new(vec![1, -3]));
        formula.push(Clause::unit(2));
        assert_eq!(formula.to_dimacs(), "p cnf 3 2\n1 -3 0\n2 0\n");
    }

    #[test]
    fn test_clause_families_single_piece() {
        // 2x1 domino on a 2x2 table: 2 horizontal + 2 vertical placements
        let placements = placements_for(2, 2, &[PieceSpec::rectangle(2, 1, 1)]);
        let mut pool = VariablePool::new();
        let (formula, stats) = ConstraintEncoder::new().encode(&placements, &mut pool).unwrap();

        assert_eq!(stats.placements, 4);
        assert_eq!(stats.at_most_one_clauses, 6);
        assert_eq!(stats.at_least_one_clauses, 1);
        assert_eq!(stats.overlap_clauses, 0);
        assert_eq!(formula.len(), stats.total_clauses());
        assert_eq!(pool.variable_count(), 4);
        assert_eq!(formula.clauses()[6], Clause::new(vec![1, 2, 3, 4]));
    }

    #[test]
    fn test_overlap_clauses_only_between_pieces() {
        // two monominoes on a 2x1 table
        let placements = placements_for(2, 1, &[PieceSpec::rectangle(1, 1, 2)]);
        let mut pool = VariablePool::new();
        let (formula, stats) = ConstraintEncoder::new().encode(&placements, &mut pool).unwrap();

        assert_eq!(stats.at_most_one_clauses, 2);
        assert_eq!(stats.at_least_one_clauses, 2);
        assert_eq!(stats.overlap_clauses, 2);

        let a0 = pool.existing_id(0, 0).unwrap();
        let b0 = pool.existing_id(1, 0).unwrap();
        assert!(formula.clauses().contains(&Clause::binary(-a0, -b0)));

        // both pieces on the same cell violates the formula, opposite cells satisfy it
        let a1 = pool.existing_id(0, 1).unwrap();
        assert!(!formula.is_satisfied_by(&set(&[a0, b0])));
        assert!(formula.is_satisfied_by(&set(&[a1, b0])));
    }

    #[test]
    fn test_piece_without_placements_yields_empty_clause() {
        let placements = placements_for(2, 2, &[PieceSpec::rectangle(3, 3, 1)]);
        let mut pool = VariablePool::new();
        let (formula, stats) = ConstraintEncoder::new().encode(&placements, &mut pool).unwrap();

        assert_eq!(stats.placements, 0);
        assert_eq!(formula.len(), 1);
        assert!(formula.has_empty_clause());
        assert_eq!(pool.variable_count(), 0);
    }

    #[test]
    fn test_encoding_is_deterministic_and_parallel_safe() {
        let specs = [PieceSpec::rectangle(2, 2, 1), PieceSpec::u_shape(4, 3, 1), PieceSpec::u_shape(3, 2, 1)];
        let placements = placements_for(4, 6, &specs);

        let mut first_pool = VariablePool::new();
        let (first, _) = ConstraintEncoder::new().encode(&placements, &mut first_pool).unwrap();
        let mut second_pool = VariablePool::new();
        let (second, _) = ConstraintEncoder::new()
            .with_parallelism(true)
            .encode(&placements, &mut second_pool)
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(first_pool.variable_count(), second_pool.variable_count());
    }

    #[test]
    fn test_every_overlap_clause_is_a_real_conflict() {
        let specs = [PieceSpec::rectangle(2, 2, 2)];
        let placements = placements_for(3, 3, &specs);
        let mut pool = VariablePool::new();
        let (formula, stats) = ConstraintEncoder::new().encode(&placements, &mut pool).unwrap();

        let overlap = &formula.clauses()[stats.at_most_one_clauses + stats.at_least_one_clauses..];
        assert_eq!(overlap.len(), stats.overlap_clauses);
        for clause in overlap {
            let a = pool.lookup(-clause.literals[0]).unwrap();
            let b = pool.lookup(-clause.literals[1]).unwrap();
            assert!(a.piece < b.piece);
            assert!(placements[a.piece][a.placement].conflicts_with(&placements[b.piece][b.placement]));
        }
        // every pair of 2x2 squares in a 3x3 table overlaps at the center
        assert_eq!(stats.overlap_clauses, 4 * 4);
    }
}
