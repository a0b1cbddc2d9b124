//! Tiling results and the typed outcome of a run

use crate::polyomino::{Board, Coordinate, Piece, Placement, Rotation, TableSize};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::time::Duration;

/// One piece at its chosen placement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacedPiece {
    pub piece: usize,
    pub shape: String,
    pub rotation: Rotation,
    pub offset: (usize, usize),
    pub cells: Vec<Coordinate>,
}

/// A non-overlapping assignment of every piece to a placement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tiling {
    pub table: TableSize,
    pub pieces: Vec<PlacedPiece>,
    #[serde(skip)]
    pub solve_time: Duration,
}

impl Tiling {
    /// Pair decoded placements (one per piece, in piece order) with their pieces
    pub fn from_placements(table: TableSize, pieces: &[Piece], placements: Vec<Placement>, solve_time: Duration) -> Self {
        let pieces = pieces
            .iter()
            .zip(placements)
            .map(|(piece, placement)| PlacedPiece {
                piece: piece.index,
                shape: piece.shape.name().to_string(),
                rotation: placement.rotation,
                offset: placement.offset,
                cells: placement.cells().to_vec(),
            })
            .collect();

        Self { table, pieces, solve_time }
    }

    /// Occupancy board; later pieces win on overlapping cells and cells off
    /// the table are left out (the validator reports them)
    pub fn board(&self) -> Board {
        let mut board = Board::new(self.table);
        for placed in &self.pieces {
            for cell in placed.cells.iter().filter(|&&cell| self.table.contains(cell)) {
                board.set(cell.x as usize, cell.y as usize, placed.piece);
            }
        }
        board
    }

    pub fn covered_cells(&self) -> usize {
        self.pieces.iter().map(|placed| placed.cells.len()).sum()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = self.to_json()?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

/// Why no tiling exists
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum InfeasibleReason {
    /// The piece's bounding box fits the table in neither orientation
    PieceTooLarge { piece: usize },
    /// The pieces have more cells than the table
    AreaExceeded { required: usize, available: usize },
    /// Full cover was required but the areas differ
    AreaMismatch { required: usize, available: usize },
    /// The generator found no position for the piece
    NoPlacements { piece: usize },
    /// The solver proved the formula unsatisfiable
    Unsatisfiable,
}

impl fmt::Display for InfeasibleReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InfeasibleReason::PieceTooLarge { piece } => {
                write!(f, "piece {} does not fit the table in any orientation", piece)
            }
            InfeasibleReason::AreaExceeded { required, available } => {
                write!(f, "pieces cover {} cells but the table has only {}", required, available)
            }
            InfeasibleReason::AreaMismatch { required, available } => {
                write!(f, "pieces cover {} cells but the table has {}", required, available)
            }
            InfeasibleReason::NoPlacements { piece } => write!(f, "piece {} has no candidate placement", piece),
            InfeasibleReason::Unsatisfiable => write!(f, "no non-overlapping arrangement exists"),
        }
    }
}

/// Terminal result of a tiling run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TilingOutcome {
    Tiled(Tiling),
    Infeasible(InfeasibleReason),
}

impl TilingOutcome {
    pub fn is_tiled(&self) -> bool {
        matches!(self, TilingOutcome::Tiled(_))
    }

    pub fn tiling(&self) -> Option<&Tiling> {
        match self {
            TilingOutcome::Tiled(tiling) => Some(tiling),
            TilingOutcome::Infeasible(_) => None,
        }
    }
}
