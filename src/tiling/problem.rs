//! Tiling problem definition and the generate → encode → solve → decode pipeline

use super::{FeasibilityCheck, InfeasibleReason, SolutionValidator, Tiling, TilingOutcome};
use crate::config::{Settings, SolverBackend, SolverConfig};
use crate::error::TilingError;
use crate::polyomino::{construct_pieces, Piece, Placement, PlacementGenerator, TableSize};
use crate::sat::{
    CnfFormula, ConstraintEncoder, EncodingStatistics, ModelDecoder, UnifiedSatSolver, VariablePool, VariableStatistics,
};
use anyhow::{Context, Result};
use log::{debug, info, warn};
use std::fmt;
use std::path::PathBuf;

/// Knobs for a single run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TilingOptions {
    pub backend: SolverBackend,
    pub parallel: bool,
    /// Run the arithmetic pre-checks before generating placements
    pub precheck: bool,
    pub require_full_cover: bool,
    pub validate_solution: bool,
    /// Write the formula here in DIMACS form before solving
    pub dimacs_file: Option<PathBuf>,
}

impl Default for TilingOptions {
    fn default() -> Self {
        Self {
            backend: SolverBackend::Cadical,
            parallel: false,
            precheck: true,
            require_full_cover: false,
            validate_solution: true,
            dimacs_file: None,
        }
    }
}

impl From<&SolverConfig> for TilingOptions {
    fn from(config: &SolverConfig) -> Self {
        Self {
            backend: config.backend,
            parallel: config.parallel_generation,
            precheck: config.precheck,
            require_full_cover: config.require_full_cover,
            validate_solution: config.validate_solution,
            dimacs_file: None,
        }
    }
}

/// A formula together with the pool and placements needed to decode its models
pub struct EncodedProblem {
    pub placements: Vec<Vec<Placement>>,
    pub pool: VariablePool,
    pub formula: CnfFormula,
    pub statistics: EncodingStatistics,
}

/// Can `pieces` tile `table` without overlaps?
pub struct TilingProblem {
    table: TableSize,
    pieces: Vec<Piece>,
    options: TilingOptions,
}

impl TilingProblem {
    pub fn new(table: TableSize, pieces: Vec<Piece>, options: TilingOptions) -> Self {
        Self { table, pieces, options }
    }

    /// Build the problem described by a settings file
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let table = TableSize::new(settings.table.width, settings.table.height)
            .map_err(TilingError::from)
            .context("Invalid table configuration")?;
        let pieces = construct_pieces(&settings.pieces)
            .map_err(TilingError::from)
            .context("Invalid piece configuration")?;

        let mut options = TilingOptions::from(&settings.solver);
        options.dimacs_file = settings.output.dimacs_file.clone();

        Ok(Self::new(table, pieces, options))
    }

    pub fn table(&self) -> TableSize {
        self.table
    }

    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    pub fn options(&self) -> &TilingOptions {
        &self.options
    }

    /// Candidate placements for every piece
    pub fn generate_placements(&self) -> Vec<Vec<Placement>> {
        PlacementGenerator::new(self.table)
            .with_parallelism(self.options.parallel)
            .generate_all(&self.pieces)
    }

    /// Generate placements and compile them into CNF with a fresh pool
    pub fn encode(&self) -> Result<EncodedProblem, TilingError> {
        let placements = self.generate_placements();
        let mut pool = VariablePool::new();
        let (formula, statistics) = ConstraintEncoder::new()
            .with_parallelism(self.options.parallel)
            .encode(&placements, &mut pool)?;

        Ok(EncodedProblem {
            placements,
            pool,
            formula,
            statistics,
        })
    }

    /// Find one tiling, or report why none exists
    pub fn solve(&self) -> Result<TilingOutcome> {
        info!(
            "Tiling a {} table with {} pieces",
            self.table,
            self.pieces.len()
        );

        if self.options.precheck {
            if let Some(reason) = FeasibilityCheck::run(self.table, &self.pieces, self.options.require_full_cover) {
                info!("Rejected before encoding: {}", reason);
                return Ok(TilingOutcome::Infeasible(reason));
            }
        }

        let encoded = self.encode().context("Failed to encode tiling problem")?;
        info!(
            "Generated {} clauses with {} variables",
            encoded.formula.len(),
            encoded.pool.variable_count()
        );

        if let Some(path) = &self.options.dimacs_file {
            std::fs::write(path, encoded.formula.to_dimacs())
                .with_context(|| format!("Failed to write DIMACS file: {}", path.display()))?;
            debug!("Wrote formula to {}", path.display());
        }

        let mut solver = UnifiedSatSolver::new(self.options.backend);
        solver
            .add_formula(&encoded.formula)
            .context("Failed to add clauses to SAT solver")?;
        debug!("{:?} backend loaded:\n{}", solver.backend(), solver.statistics());

        let Some(solution) = solver.solve().context("SAT solving failed")? else {
            let reason = encoded
                .placements
                .iter()
                .position(Vec::is_empty)
                .map_or(InfeasibleReason::Unsatisfiable, |piece| InfeasibleReason::NoPlacements { piece });
            info!("No tiling exists: {}", reason);
            return Ok(TilingOutcome::Infeasible(reason));
        };

        info!("Solved in {:.3}s", solution.solve_time.as_secs_f64());

        let chosen = ModelDecoder::decode(
            solution.true_variables.iter().copied(),
            &encoded.pool,
            &encoded.placements,
        )
        .map_err(TilingError::from)
        .context("Failed to decode solver model")?;

        let tiling = Tiling::from_placements(self.table, &self.pieces, chosen, solution.solve_time);

        if self.options.validate_solution {
            let validation = SolutionValidator::new(self.options.require_full_cover).validate(&tiling, &self.pieces);
            if !validation.is_valid {
                warn!("Decoded tiling failed validation:\n{}", validation);
                anyhow::bail!("Decoded tiling is invalid: {}", validation.violations[0]);
            }
            debug!("Decoded tiling covers {} cells", validation.covered_cells);
        }

        Ok(TilingOutcome::Tiled(tiling))
    }

    /// Placement and encoding statistics, without consulting the solver
    pub fn analyze(&self) -> Result<ProblemAnalysis> {
        let precheck = FeasibilityCheck::run(self.table, &self.pieces, self.options.require_full_cover);
        let encoded = self.encode().context("Failed to encode tiling problem")?;

        let pieces = self
            .pieces
            .iter()
            .zip(&encoded.placements)
            .map(|(piece, placements)| PieceAnalysis {
                piece: piece.index,
                shape: piece.shape.name().to_string(),
                area: piece.shape.area(),
                distinct_rotations: piece.shape.symmetry().distinct_rotations(),
                placements: placements.len(),
            })
            .collect();

        Ok(ProblemAnalysis {
            table: self.table,
            precheck,
            pieces,
            variables: encoded.pool.statistics(),
            encoding: encoded.statistics,
        })
    }
}

/// Per-piece part of an analysis
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PieceAnalysis {
    pub piece: usize,
    pub shape: String,
    pub area: usize,
    pub distinct_rotations: usize,
    pub placements: usize,
}

/// Summary of a problem's size before solving
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProblemAnalysis {
    pub table: TableSize,
    pub precheck: Option<InfeasibleReason>,
    pub pieces: Vec<PieceAnalysis>,
    pub variables: VariableStatistics,
    pub encoding: EncodingStatistics,
}

impl ProblemAnalysis {
    pub fn total_area(&self) -> usize {
        self.pieces.iter().map(|piece| piece.area).sum()
    }
}

impl fmt::Display for ProblemAnalysis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Problem Analysis:")?;
        writeln!(f, "  Table: {} ({} cells)", self.table, self.table.area())?;
        writeln!(f, "  Piece area: {}", self.total_area())?;
        match &self.precheck {
            Some(reason) => writeln!(f, "  Pre-check: fails ({})", reason)?,
            None => writeln!(f, "  Pre-check: passes")?,
        }
        writeln!(f, "  Pieces:")?;
        for piece in &self.pieces {
            writeln!(
                f,
                "    #{} {}: area {}, {} rotation(s), {} placements",
                piece.piece, piece.shape, piece.area, piece.distinct_rotations, piece.placements
            )?;
        }
        write!(f, "{}{}", self.variables, self.encoding)
    }
}
