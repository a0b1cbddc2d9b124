//! Enumeration of every position a piece can occupy on the table

use super::{Coordinate, Piece, Rotation, Shape, TableSize};
use itertools::iproduct;
use log::debug;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// A piece instance at one rotation and translation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub piece: usize,
    pub rotation: Rotation,
    /// Translation (dx, dy) applied to the normalized rotated shape
    pub offset: (usize, usize),
    /// Absolute table cells, sorted
    cells: Vec<Coordinate>,
}

impl Placement {
    pub fn cells(&self) -> &[Coordinate] {
        &self.cells
    }

    /// True iff the two placements share at least one cell
    pub fn conflicts_with(&self, other: &Placement) -> bool {
        let (mut a, mut b) = (self.cells.iter().peekable(), other.cells.iter().peekable());
        while let (Some(x), Some(y)) = (a.peek(), b.peek()) {
            match x.cmp(y) {
                std::cmp::Ordering::Less => {
                    a.next();
                }
                std::cmp::Ordering::Greater => {
                    b.next();
                }
                std::cmp::Ordering::Equal => return true,
            }
        }
        false
    }
}

/// Generates placements for pieces on a fixed table.
///
/// Output order is rotation outer (0°, 90°, 180°, 270°, skipping rotations the
/// shape's symmetry class makes redundant), then `dx` ascending, then `dy`
/// ascending. Placement indices are positions in this order.
#[derive(Debug, Clone)]
pub struct PlacementGenerator {
    table: TableSize,
    parallel: bool,
}

impl PlacementGenerator {
    pub fn new(table: TableSize) -> Self {
        Self { table, parallel: false }
    }

    /// Generate placements for different pieces on worker threads
    pub fn with_parallelism(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn table(&self) -> TableSize {
        self.table
    }

    /// Every placement of `shape` for piece `piece_index`; empty when nothing fits
    pub fn generate(&self, shape: &Shape, piece_index: usize) -> Vec<Placement> {
        let mut placements = Vec::new();

        for &rotation in shape.symmetry().rotations() {
            let rotated = shape.rotated(rotation);
            let rotated_width = rotated.iter().map(|c| c.x).max().map_or(0, |x| x as usize + 1);
            let rotated_height = rotated.iter().map(|c| c.y).max().map_or(0, |y| y as usize + 1);

            if rotated_width > self.table.width || rotated_height > self.table.height {
                continue;
            }

            let max_dx = self.table.width - rotated_width;
            let max_dy = self.table.height - rotated_height;

            for (dx, dy) in iproduct!(0..=max_dx, 0..=max_dy) {
                let cells = rotated
                    .iter()
                    .map(|c| Coordinate::new(c.x + dx as i32, c.y + dy as i32))
                    .collect();
                placements.push(Placement {
                    piece: piece_index,
                    rotation,
                    offset: (dx, dy),
                    cells,
                });
            }
        }

        placements
    }

    /// Placement lists for all pieces, indexed like `pieces`
    pub fn generate_all(&self, pieces: &[Piece]) -> Vec<Vec<Placement>> {
        let all: Vec<Vec<Placement>> = if self.parallel {
            pieces
                .par_iter()
                .map(|piece| self.generate(&piece.shape, piece.index))
                .collect()
        } else {
            pieces
                .iter()
                .map(|piece| self.generate(&piece.shape, piece.index))
                .collect()
        };

        for (piece, placements) in pieces.iter().zip(&all) {
            debug!(
                "Piece {} ({}) has {} candidate placements",
                piece.index,
                piece.shape.name(),
                placements.len()
            );
        }

        all
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::polyomino::{construct_pieces, construct_shape, PieceSpec, SymmetryClass};
    use std::collections::HashSet;

    fn generator(width: usize, height: usize) -> PlacementGenerator {
        PlacementGenerator::new(TableSize::new(width, height).unwrap())
    }

    fn distinct_rotations(placements: &[Placement]) -> HashSet<Rotation> {
        placements.iter().map(|p| p.rotation).collect()
    }

    #[test]
    fn test_square_placement_count() {
        let shape = construct_shape(0, &PieceSpec::rectangle(2, 2, 1)).unwrap();
        let placements = generator(4, 6).generate(&shape, 0);

        assert_eq!(placements.len(), (4 - 2 + 1) * (6 - 2 + 1));
        assert_eq!(distinct_rotations(&placements), HashSet::from([Rotation::Deg0]));
    }

    #[test]
    fn test_rectangle_uses_two_rotations_without_duplicates() {
        let shape = construct_shape(0, &PieceSpec::rectangle(3, 1, 1)).unwrap();
        let placements = generator(4, 4).generate(&shape, 0);

        assert_eq!(
            distinct_rotations(&placements),
            HashSet::from([Rotation::Deg0, Rotation::Deg90])
        );
        // 2 * 4 horizontal + 4 * 2 vertical
        assert_eq!(placements.len(), 16);

        let unique: HashSet<Vec<Coordinate>> = placements.iter().map(|p| p.cells().to_vec()).collect();
        assert_eq!(unique.len(), placements.len());
    }

    #[test]
    fn test_u_shape_uses_four_rotations() {
        let shape = construct_shape(0, &PieceSpec::u_shape(3, 2, 1)).unwrap();
        let placements = generator(4, 6).generate(&shape, 0);

        assert_eq!(distinct_rotations(&placements).len(), 4);
        // 0°/180°: 2 * 5 each, 90°/270°: 3 * 4 each
        assert_eq!(placements.len(), 2 * 10 + 2 * 12);

        let unique: HashSet<Vec<Coordinate>> = placements.iter().map(|p| p.cells().to_vec()).collect();
        assert_eq!(unique.len(), placements.len());
    }

    #[test]
    fn test_placements_stay_on_table() {
        let table = TableSize::new(4, 6).unwrap();
        let shape = construct_shape(0, &PieceSpec::u_shape(4, 3, 1)).unwrap();
        let placements = PlacementGenerator::new(table).generate(&shape, 7);

        assert!(!placements.is_empty());
        for placement in &placements {
            assert_eq!(placement.piece, 7);
            assert_eq!(placement.cells().len(), shape.area());
            assert!(placement.cells().iter().all(|&c| table.contains(c)));
        }
    }

    #[test]
    fn test_ordering_is_rotation_then_dx_then_dy() {
        let shape = construct_shape(0, &PieceSpec::rectangle(2, 1, 1)).unwrap();
        let placements = generator(3, 2).generate(&shape, 0);

        let order: Vec<_> = placements.iter().map(|p| (p.rotation, p.offset)).collect();
        assert_eq!(
            order,
            vec![
                (Rotation::Deg0, (0, 0)),
                (Rotation::Deg0, (0, 1)),
                (Rotation::Deg0, (1, 0)),
                (Rotation::Deg0, (1, 1)),
                (Rotation::Deg90, (0, 0)),
                (Rotation::Deg90, (1, 0)),
                (Rotation::Deg90, (2, 0)),
            ]
        );
    }

    #[test]
    fn test_oversized_piece_has_no_placements() {
        let shape = construct_shape(0, &PieceSpec::rectangle(3, 3, 1)).unwrap();
        assert!(generator(2, 2).generate(&shape, 0).is_empty());
    }

    #[test]
    fn test_only_fitting_orientation_is_generated() {
        let shape = construct_shape(0, &PieceSpec::rectangle(1, 3, 1)).unwrap();
        let placements = generator(3, 1).generate(&shape, 0);

        assert_eq!(placements.len(), 1);
        assert_eq!(placements[0].rotation, Rotation::Deg90);
    }

    #[test]
    fn test_custom_shape_bounding_box_follows_cells() {
        let cells = [(0, 0), (1, 0)].map(Coordinate::from);
        let shape = Shape::new("sparse", 2, 3, cells, SymmetryClass::Rectangle).unwrap();
        // the empty rows of the declared box do not consume table space
        assert_eq!(generator(2, 1).generate(&shape, 0).len(), 1);
    }

    #[test]
    fn test_conflicts() {
        let shape = construct_shape(0, &PieceSpec::rectangle(2, 2, 1)).unwrap();
        let placements = generator(4, 4).generate(&shape, 0);
        let at = |dx, dy| placements.iter().find(|p| p.offset == (dx, dy)).unwrap();

        assert!(at(0, 0).conflicts_with(at(1, 1)));
        assert!(!at(0, 0).conflicts_with(at(2, 0)));
        assert!(!at(0, 0).conflicts_with(at(0, 2)));
    }

    #[test]
    fn test_parallel_generation_matches_sequential() {
        let specs = vec![PieceSpec::rectangle(2, 2, 1), PieceSpec::u_shape(4, 3, 1), PieceSpec::u_shape(3, 2, 1)];
        let pieces = construct_pieces(&specs).unwrap();
        let sequential = generator(4, 6).generate_all(&pieces);
        let parallel = generator(4, 6).with_parallelism(true).generate_all(&pieces);

        assert_eq!(sequential, parallel);
        assert_eq!(sequential.len(), 3);
    }
}
