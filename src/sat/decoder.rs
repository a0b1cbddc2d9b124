//! Maps a satisfying assignment back to one chosen placement per piece

use super::VariablePool;
use crate::error::DecodeError;
use crate::polyomino::Placement;

/// Decodes models of formulas built by `ConstraintEncoder`
pub struct ModelDecoder;

impl ModelDecoder {
    /// Chosen placement for every piece, in piece order.
    ///
    /// `true_variables` are the ids the model sets to true; ids the pool never
    /// allocated are ignored. Fails if any piece is chosen zero or several times.
    pub fn decode<I>(
        true_variables: I,
        pool: &VariablePool,
        placements: &[Vec<Placement>],
    ) -> Result<Vec<Placement>, DecodeError>
    where
        I: IntoIterator<Item = i32>,
    {
        let mut chosen: Vec<Option<usize>> = vec![None; placements.len()];

        for variable in true_variables {
            let Some(key) = pool.lookup(variable) else {
                continue;
            };

            let known = placements
                .get(key.piece)
                .is_some_and(|candidates| key.placement < candidates.len());
            if !known {
                return Err(DecodeError::UnknownPlacement {
                    variable,
                    piece: key.piece,
                    placement: key.placement,
                });
            }

            let previous = chosen[key.piece];
            match previous {
                Some(first) if first != key.placement => {
                    return Err(DecodeError::DuplicatePiece {
                        piece: key.piece,
                        first: first.min(key.placement),
                        second: first.max(key.placement),
                    });
                }
                _ => chosen[key.piece] = Some(key.placement),
            }
        }

        chosen
            .into_iter()
            .enumerate()
            .map(|(piece, placement)| {
                placement
                    .map(|j| placements[piece][j].clone())
                    .ok_or(DecodeError::MissingPiece { piece })
            })
            .collect()
    }
}
