//! Feasibility pre-checks and validation of decoded tilings

use super::{InfeasibleReason, Tiling};
use crate::polyomino::{Board, Piece, TableSize};
use std::fmt;

/// Cheap arithmetic checks run before any placement is generated.
///
/// These are fast paths only: a piece that passes may still have no placement,
/// which the generator reports on its own.
pub struct FeasibilityCheck;

impl FeasibilityCheck {
    /// First piece whose bounding box fits the table in neither orientation
    pub fn oversized_piece(table: TableSize, pieces: &[Piece]) -> Option<usize> {
        pieces
            .iter()
            .find(|piece| {
                let (w, h) = (piece.shape.width(), piece.shape.height());
                let upright = w <= table.width && h <= table.height;
                let turned = h <= table.width && w <= table.height;
                !(upright || turned)
            })
            .map(|piece| piece.index)
    }

    /// Total cell count against the table area
    pub fn area(table: TableSize, pieces: &[Piece], require_full_cover: bool) -> Option<InfeasibleReason> {
        let required: usize = pieces.iter().map(|piece| piece.shape.area()).sum();
        let available = table.area();

        if required > available {
            Some(InfeasibleReason::AreaExceeded { required, available })
        } else if require_full_cover && required != available {
            Some(InfeasibleReason::AreaMismatch { required, available })
        } else {
            None
        }
    }

    /// Run all pre-checks, returning the first failure
    pub fn run(table: TableSize, pieces: &[Piece], require_full_cover: bool) -> Option<InfeasibleReason> {
        if let Some(piece) = Self::oversized_piece(table, pieces) {
            return Some(InfeasibleReason::PieceTooLarge { piece });
        }
        Self::area(table, pieces, require_full_cover)
    }
}

/// Validates decoded tilings against the problem they claim to solve
pub struct SolutionValidator {
    require_full_cover: bool,
}

/// Result of solution validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub violations: Vec<Violation>,
    pub covered_cells: usize,
}

/// A way in which a tiling breaks the rules
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    PieceCountMismatch { expected: usize, actual: usize },
    WrongPieceOrder { position: usize, piece: usize },
    WrongArea { piece: usize, expected: usize, actual: usize },
    OutOfBounds { piece: usize, x: i32, y: i32 },
    Overlap { first: usize, second: usize, x: i32, y: i32 },
    Uncovered { cells: usize },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::PieceCountMismatch { expected, actual } => {
                write!(f, "expected {} pieces, found {}", expected, actual)
            }
            Violation::WrongPieceOrder { position, piece } => {
                write!(f, "position {} holds piece {}", position, piece)
            }
            Violation::WrongArea { piece, expected, actual } => {
                write!(f, "piece {} covers {} cells, its shape has {}", piece, actual, expected)
            }
            Violation::OutOfBounds { piece, x, y } => write!(f, "piece {} leaves the table at ({}, {})", piece, x, y),
            Violation::Overlap { first, second, x, y } => {
                write!(f, "pieces {} and {} both cover ({}, {})", first, second, x, y)
            }
            Violation::Uncovered { cells } => write!(f, "{} table cells are not covered", cells),
        }
    }
}

impl SolutionValidator {
    pub fn new(require_full_cover: bool) -> Self {
        Self { require_full_cover }
    }

    /// Check one placement per piece, in bounds, pairwise disjoint, and full cover if required
    pub fn validate(&self, tiling: &Tiling, pieces: &[Piece]) -> ValidationResult {
        let mut violations = Vec::new();

        if tiling.pieces.len() != pieces.len() {
            violations.push(Violation::PieceCountMismatch {
                expected: pieces.len(),
                actual: tiling.pieces.len(),
            });
        }

        let mut board = Board::new(tiling.table);
        for (position, (placed, piece)) in tiling.pieces.iter().zip(pieces).enumerate() {
            if placed.piece != piece.index {
                violations.push(Violation::WrongPieceOrder { position, piece: placed.piece });
            }
            if placed.cells.len() != piece.shape.area() {
                violations.push(Violation::WrongArea {
                    piece: placed.piece,
                    expected: piece.shape.area(),
                    actual: placed.cells.len(),
                });
            }

            for &cell in &placed.cells {
                match board.occupy(cell, placed.piece) {
                    Ok(None) => {}
                    Ok(Some(first)) => violations.push(Violation::Overlap {
                        first,
                        second: placed.piece,
                        x: cell.x,
                        y: cell.y,
                    }),
                    Err(_) => violations.push(Violation::OutOfBounds {
                        piece: placed.piece,
                        x: cell.x,
                        y: cell.y,
                    }),
                }
            }
        }

        if self.require_full_cover && !board.is_full() {
            violations.push(Violation::Uncovered {
                cells: tiling.table.area() - board.occupied_count(),
            });
        }

        ValidationResult {
            is_valid: violations.is_empty(),
            violations,
            covered_cells: board.occupied_count(),
        }
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Validation Result:")?;
        writeln!(f, "  Valid: {}", self.is_valid)?;
        writeln!(f, "  Covered cells: {}", self.covered_cells)?;
        for violation in &self.violations {
            writeln!(f, "  - {}", violation)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::polyomino::{construct_pieces, Coordinate, PieceSpec, Rotation};
    use crate::tiling::PlacedPiece;
    use std::time::Duration;

    fn table(width: usize, height: usize) -> TableSize {
        TableSize::new(width, height).unwrap()
    }

    fn placed(piece: usize, cells: &[(i32, i32)]) -> PlacedPiece {
        PlacedPiece {
            piece,
            shape: "rect 1x2".to_string(),
            rotation: Rotation::Deg0,
            offset: (0, 0),
            cells: cells.iter().copied().map(Coordinate::from).collect(),
        }
    }

    #[test]
    fn test_oversized_piece() {
        let pieces = construct_pieces(&[PieceSpec::rectangle(2, 2, 1), PieceSpec::rectangle(3, 3, 1)]).unwrap();
        assert_eq!(FeasibilityCheck::oversized_piece(table(2, 2), &pieces), Some(1));
        assert_eq!(
            FeasibilityCheck::run(table(2, 2), &pieces, false),
            Some(InfeasibleReason::PieceTooLarge { piece: 1 })
        );
    }

    #[test]
    fn test_turned_piece_fits() {
        let pieces = construct_pieces(&[PieceSpec::rectangle(1, 4, 1)]).unwrap();
        assert_eq!(FeasibilityCheck::oversized_piece(table(4, 1), &pieces), None);
    }

    #[test]
    fn test_area_checks() {
        let pieces = construct_pieces(&[PieceSpec::rectangle(2, 2, 2)]).unwrap();
        assert_eq!(
            FeasibilityCheck::area(table(3, 2), &pieces, false),
            Some(InfeasibleReason::AreaExceeded { required: 8, available: 6 })
        );
        assert_eq!(FeasibilityCheck::area(table(3, 3), &pieces, false), None);
        assert_eq!(
            FeasibilityCheck::area(table(3, 3), &pieces, true),
            Some(InfeasibleReason::AreaMismatch { required: 8, available: 9 })
        );
        assert_eq!(FeasibilityCheck::area(table(4, 2), &pieces, true), None);
    }

    #[test]
    fn test_prechecks_on_largest_table() {
        let side = i32::MAX as usize;
        let pieces = construct_pieces(&[PieceSpec::rectangle(2, 2, 2)]).unwrap();
        assert_eq!(FeasibilityCheck::run(table(side, side), &pieces, false), None);
        assert_eq!(
            FeasibilityCheck::run(table(side, side), &pieces, true),
            Some(InfeasibleReason::AreaMismatch { required: 8, available: side * side })
        );
    }

    #[test]
    fn test_valid_tiling() {
        let pieces = construct_pieces(&[PieceSpec::rectangle(1, 2, 2)]).unwrap();
        let tiling = Tiling {
            table: table(2, 2),
            pieces: vec![placed(0, &[(0, 0), (0, 1)]), placed(1, &[(1, 0), (1, 1)])],
            solve_time: Duration::default(),
        };

        let result = SolutionValidator::new(true).validate(&tiling, &pieces);
        assert!(result.is_valid, "{}", result);
        assert_eq!(result.covered_cells, 4);
    }

    #[test]
    fn test_detects_overlap_out_of_bounds_and_gaps() {
        let pieces = construct_pieces(&[PieceSpec::rectangle(1, 2, 2)]).unwrap();
        let tiling = Tiling {
            table: table(2, 2),
            pieces: vec![placed(0, &[(0, 0), (0, 1)]), placed(1, &[(0, 1), (0, 2)])],
            solve_time: Duration::default(),
        };

        let result = SolutionValidator::new(true).validate(&tiling, &pieces);
        assert!(!result.is_valid);
        assert!(result.violations.contains(&Violation::Overlap { first: 0, second: 1, x: 0, y: 1 }));
        assert!(result.violations.contains(&Violation::OutOfBounds { piece: 1, x: 0, y: 2 }));
        assert!(result.violations.contains(&Violation::Uncovered { cells: 2 }));
    }

    #[test]
    fn test_detects_missing_piece() {
        let pieces = construct_pieces(&[PieceSpec::rectangle(1, 2, 2)]).unwrap();
        let tiling = Tiling {
            table: table(2, 2),
            pieces: vec![placed(0, &[(0, 0), (0, 1)])],
            solve_time: Duration::default(),
        };

        let result = SolutionValidator::new(false).validate(&tiling, &pieces);
        assert_eq!(result.violations, vec![Violation::PieceCountMismatch { expected: 2, actual: 1 }]);
    }
}
