//! Variable pool mapping (piece, placement) pairs to SAT variable ids

use crate::error::ConfigurationError;
use indexmap::IndexSet;
use std::fmt;

/// "Piece `piece` occupies its `placement`-th candidate"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlacementKey {
    pub piece: usize,
    pub placement: usize,
}

impl PlacementKey {
    pub fn new(piece: usize, placement: usize) -> Self {
        Self { piece, placement }
    }
}

/// Lazily allocates dense, positive variable ids in first-reference order.
///
/// The key at insertion index `i` owns id `i + 1`, so one ordered set serves
/// both directions.
#[derive(Debug, Default)]
pub struct VariablePool {
    keys: IndexSet<PlacementKey>,
}

impl VariablePool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Id for the pair, allocating the next id on first reference
    pub fn id_for(&mut self, piece: usize, placement: usize) -> Result<i32, ConfigurationError> {
        let key = PlacementKey::new(piece, placement);
        if let Some(id) = self.existing_id(piece, placement) {
            return Ok(id);
        }

        let id = i32::try_from(self.keys.len() + 1).map_err(|_| ConfigurationError::VariableOverflow)?;
        self.keys.insert(key);
        Ok(id)
    }

    /// Inverse of `id_for`; `None` for ids this pool never handed out
    pub fn lookup(&self, id: i32) -> Option<PlacementKey> {
        if id <= 0 {
            return None;
        }
        self.keys.get_index(id as usize - 1).copied()
    }

    /// Id already allocated for the pair, without allocating
    pub fn existing_id(&self, piece: usize, placement: usize) -> Option<i32> {
        self.keys
            .get_index_of(&PlacementKey::new(piece, placement))
            .map(|index| index as i32 + 1)
    }

    /// Number of variables allocated so far
    pub fn variable_count(&self) -> usize {
        self.keys.len()
    }

    pub fn statistics(&self) -> VariableStatistics {
        let mut pieces: Vec<usize> = self.keys.iter().map(|key| key.piece).collect();
        pieces.sort_unstable();
        pieces.dedup();

        VariableStatistics {
            total_variables: self.variable_count(),
            pieces_referenced: pieces.len(),
        }
    }
}

/// Statistics about variable usage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableStatistics {
    pub total_variables: usize,
    pub pieces_referenced: usize,
}

impl fmt::Display for VariableStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Variable Statistics:")?;
        writeln!(f, "  Total variables: {}", self.total_variables)?;
        writeln!(f, "  Pieces referenced: {}", self.pieces_referenced)?;
        Ok(())
    }
}
