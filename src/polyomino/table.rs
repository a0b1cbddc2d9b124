//! Table dimensions and the occupancy board used to inspect a tiling

use super::Coordinate;
use crate::error::ConfigurationError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Validated table dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TableSize {
    pub width: usize,
    pub height: usize,
}

impl TableSize {
    /// Both sides positive, every cell addressable as an `i32` coordinate, area fits `usize`
    pub fn new(width: usize, height: usize) -> Result<Self, ConfigurationError> {
        let addressable = i32::try_from(width).is_ok() && i32::try_from(height).is_ok();
        if width == 0 || height == 0 || !addressable || width.checked_mul(height).is_none() {
            return Err(ConfigurationError::InvalidTable { width, height });
        }
        Ok(Self { width, height })
    }

    /// Saturates for tables that bypassed `new`, e.g. deserialized ones
    pub fn area(&self) -> usize {
        self.width.saturating_mul(self.height)
    }

    pub fn contains(&self, coordinate: Coordinate) -> bool {
        coordinate.x >= 0
            && coordinate.y >= 0
            && (coordinate.x as usize) < self.width
            && (coordinate.y as usize) < self.height
    }
}

impl fmt::Display for TableSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Which piece, if any, occupies each table cell
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    pub table: TableSize,
    cells: Vec<Option<usize>>,
}

impl Board {
    pub fn new(table: TableSize) -> Self {
        Self {
            table,
            cells: vec![None; table.area()],
        }
    }

    #[inline]
    fn index(&self, x: usize, y: usize) -> usize {
        y * self.table.width + x
    }

    /// Piece occupying (x, y); `None` when empty or out of bounds
    pub fn get(&self, x: usize, y: usize) -> Option<usize> {
        if x < self.table.width && y < self.table.height {
            self.cells[self.index(x, y)]
        } else {
            None
        }
    }

    /// Put `piece` on (x, y), returning the previous occupant; no-op when out of bounds
    pub fn set(&mut self, x: usize, y: usize, piece: usize) -> Option<usize> {
        if x < self.table.width && y < self.table.height {
            let idx = self.index(x, y);
            self.cells[idx].replace(piece)
        } else {
            None
        }
    }

    /// Mark a cell as taken by `piece`, returning the previous occupant if there was one
    pub fn occupy(&mut self, coordinate: Coordinate, piece: usize) -> anyhow::Result<Option<usize>> {
        if !self.table.contains(coordinate) {
            anyhow::bail!("Cell {} out of bounds for {} table", coordinate, self.table);
        }
        Ok(self.set(coordinate.x as usize, coordinate.y as usize, piece))
    }

    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_some()).count()
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }
}
