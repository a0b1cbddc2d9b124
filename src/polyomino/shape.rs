//! Polyomino shape templates and the rotation transforms applied to them

use crate::error::ConfigurationError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// A grid cell offset; x grows rightward, y grows downward
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Coordinate {
    pub x: i32,
    pub y: i32,
}

impl Coordinate {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl From<(i32, i32)> for Coordinate {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// One of the four quarter turns, in canonical order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rotation {
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

fn rotate_0(c: Coordinate) -> Coordinate {
    Coordinate::new(c.x, c.y)
}

fn rotate_90(c: Coordinate) -> Coordinate {
    Coordinate::new(-c.y, c.x)
}

fn rotate_180(c: Coordinate) -> Coordinate {
    Coordinate::new(-c.x, -c.y)
}

fn rotate_270(c: Coordinate) -> Coordinate {
    Coordinate::new(c.y, -c.x)
}

/// Coordinate maps indexed by the number of quarter turns
pub const ROTATIONS: [fn(Coordinate) -> Coordinate; 4] = [rotate_0, rotate_90, rotate_180, rotate_270];

impl Rotation {
    pub const ALL: [Rotation; 4] = [Rotation::Deg0, Rotation::Deg90, Rotation::Deg180, Rotation::Deg270];

    /// Number of quarter turns
    pub fn quarter_turns(self) -> usize {
        match self {
            Rotation::Deg0 => 0,
            Rotation::Deg90 => 1,
            Rotation::Deg180 => 2,
            Rotation::Deg270 => 3,
        }
    }

    pub fn degrees(self) -> u32 {
        self.quarter_turns() as u32 * 90
    }

    pub fn apply(self, coordinate: Coordinate) -> Coordinate {
        ROTATIONS[self.quarter_turns()](coordinate)
    }
}

impl fmt::Display for Rotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}°", self.degrees())
    }
}

/// How many of the four quarter turns of a shape are geometrically distinct
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SymmetryClass {
    /// Square-like: identity only
    Point,
    /// Non-square rectangle: 0° and 90°
    Rectangle,
    /// Asymmetric: all four
    Free,
}

impl SymmetryClass {
    pub fn distinct_rotations(self) -> usize {
        match self {
            SymmetryClass::Point => 1,
            SymmetryClass::Rectangle => 2,
            SymmetryClass::Free => 4,
        }
    }

    /// The distinct rotations, in canonical order
    pub fn rotations(self) -> &'static [Rotation] {
        &Rotation::ALL[..self.distinct_rotations()]
    }
}

/// An immutable polyomino template anchored at the top-left of its bounding box
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shape {
    name: String,
    width: usize,
    height: usize,
    cells: Vec<Coordinate>,
    symmetry: SymmetryClass,
}

impl Shape {
    /// Build a shape, rejecting empty shapes and cells outside `[0,width) × [0,height)`
    pub fn new<I>(
        name: impl Into<String>,
        width: usize,
        height: usize,
        cells: I,
        symmetry: SymmetryClass,
    ) -> Result<Self, ConfigurationError>
    where
        I: IntoIterator<Item = Coordinate>,
    {
        let name = name.into();
        let invalid = |reason: String| ConfigurationError::InvalidShape {
            name: name.clone(),
            reason,
        };

        if width == 0 || height == 0 {
            return Err(invalid(format!("bounding box {}x{} must be positive", width, height)));
        }
        if i32::try_from(width).is_err() || i32::try_from(height).is_err() {
            return Err(invalid(format!("bounding box {}x{} exceeds the coordinate range", width, height)));
        }

        let cells: BTreeSet<Coordinate> = cells.into_iter().collect();
        if cells.is_empty() {
            return Err(invalid("shape has no cells".to_string()));
        }

        for cell in &cells {
            let inside = cell.x >= 0
                && cell.y >= 0
                && (cell.x as usize) < width
                && (cell.y as usize) < height;
            if !inside {
                return Err(invalid(format!(
                    "cell {} lies outside the {}x{} bounding box",
                    cell, width, height
                )));
            }
        }

        Ok(Self {
            name,
            width,
            height,
            cells: cells.into_iter().collect(),
            symmetry,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Relative cells, sorted
    pub fn cells(&self) -> &[Coordinate] {
        &self.cells
    }

    pub fn area(&self) -> usize {
        self.cells.len()
    }

    pub fn symmetry(&self) -> SymmetryClass {
        self.symmetry
    }

    /// Cells after a rotation, shifted so the minimum x and y are 0, sorted
    pub fn rotated(&self, rotation: Rotation) -> Vec<Coordinate> {
        let rotated: Vec<Coordinate> = self.cells.iter().map(|&c| rotation.apply(c)).collect();
        let min_x = rotated.iter().map(|c| c.x).min().unwrap_or(0);
        let min_y = rotated.iter().map(|c| c.y).min().unwrap_or(0);

        let mut normalized: Vec<Coordinate> = rotated
            .into_iter()
            .map(|c| Coordinate::new(c.x - min_x, c.y - min_y))
            .collect();
        normalized.sort();
        normalized
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.height as i32 {
            for x in 0..self.width as i32 {
                let symbol = if self.cells.binary_search(&Coordinate::new(x, y)).is_ok() { '#' } else { '.' };
                write!(f, "{}", symbol)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
