//! Shapes, pieces, and their placements on the table

pub mod constructor;
pub mod placement;
pub mod shape;
pub mod table;

pub use constructor::{construct_pieces, construct_shape, Piece, PieceKind, PieceSpec};
pub use placement::{Placement, PlacementGenerator};
pub use shape::{Coordinate, Rotation, Shape, SymmetryClass, ROTATIONS};
pub use table::{Board, TableSize};
