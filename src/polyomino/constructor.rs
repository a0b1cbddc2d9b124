//! Builds shapes and piece instances from width/height/kind requests

use super::{Coordinate, Shape, SymmetryClass};
use crate::error::ConfigurationError;
use itertools::iproduct;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Family of generated shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PieceKind {
    Rectangle,
    UShape,
}

/// A request for `count` identical pieces
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PieceSpec {
    pub kind: PieceKind,
    pub width: usize,
    pub height: usize,
    pub count: usize,
}

impl PieceSpec {
    pub fn rectangle(width: usize, height: usize, count: usize) -> Self {
        Self { kind: PieceKind::Rectangle, width, height, count }
    }

    pub fn u_shape(width: usize, height: usize, count: usize) -> Self {
        Self { kind: PieceKind::UShape, width, height, count }
    }
}

/// One occurrence of a shape that must be placed exactly once
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Piece {
    pub index: usize,
    pub shape: Arc<Shape>,
}

/// Build the shape described by a single spec
pub fn construct_shape(spec_index: usize, spec: &PieceSpec) -> Result<Shape, ConfigurationError> {
    let (width, height) = (spec.width, spec.height);
    if width == 0 || height == 0 {
        return Err(ConfigurationError::InvalidPieceSpec {
            index: spec_index,
            reason: format!("dimensions {}x{} must be positive", width, height),
        });
    }
    let (Ok(w), Ok(h)) = (i32::try_from(width), i32::try_from(height)) else {
        return Err(ConfigurationError::InvalidPieceSpec {
            index: spec_index,
            reason: format!("dimensions {}x{} exceed the coordinate range", width, height),
        });
    };

    match spec.kind {
        PieceKind::Rectangle => {
            let cells = iproduct!(0..w, 0..h).map(Coordinate::from);
            let symmetry = if width == height { SymmetryClass::Point } else { SymmetryClass::Rectangle };
            Shape::new(format!("rect {}x{}", width, height), width, height, cells, symmetry)
        }
        PieceKind::UShape => {
            if width < 2 {
                return Err(ConfigurationError::InvalidPieceSpec {
                    index: spec_index,
                    reason: format!("U-shape needs width of at least 2, got {}", width),
                });
            }
            let top = (0..w).map(|x| Coordinate::new(x, 0));
            let legs = iproduct!(1..h, [0, w - 1]).map(|(y, x)| Coordinate::new(x, y));
            Shape::new(format!("U {}x{}", width, height), width, height, top.chain(legs), SymmetryClass::Free)
        }
    }
}

/// Expand specs into indexed piece instances; identical instances share one shape
pub fn construct_pieces(specs: &[PieceSpec]) -> Result<Vec<Piece>, ConfigurationError> {
    let mut pieces = Vec::new();
    for (spec_index, spec) in specs.iter().enumerate() {
        let shape = Arc::new(construct_shape(spec_index, spec)?);
        for _ in 0..spec.count {
            pieces.push(Piece {
                index: pieces.len(),
                shape: Arc::clone(&shape),
            });
        }
    }
    Ok(pieces)
}
