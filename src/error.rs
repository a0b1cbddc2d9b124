//! Typed errors for the placement and encoding engine

use thiserror::Error;

/// Problems with the problem definition, detected before any placement is generated
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("invalid table dimensions {width}x{height}: both must be positive")]
    InvalidTable { width: usize, height: usize },

    #[error("invalid shape '{name}': {reason}")]
    InvalidShape { name: String, reason: String },

    #[error("invalid piece specification #{index}: {reason}")]
    InvalidPieceSpec { index: usize, reason: String },

    #[error("variable pool exhausted the solver's id space")]
    VariableOverflow,
}

/// An assignment that does not pick exactly one placement per piece
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("piece {piece} is assigned both placement {first} and placement {second}")]
    DuplicatePiece {
        piece: usize,
        first: usize,
        second: usize,
    },

    #[error("piece {piece} has no placement in the assignment")]
    MissingPiece { piece: usize },

    #[error("variable {variable} maps to piece {piece} placement {placement}, which does not exist")]
    UnknownPlacement {
        variable: i32,
        piece: usize,
        placement: usize,
    },
}

/// Any failure of a tiling run. Infeasibility is not an error; see `TilingOutcome`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TilingError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    Decode(#[from] DecodeError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_carry_indices() {
        let err = DecodeError::DuplicatePiece { piece: 2, first: 0, second: 7 };
        let message = err.to_string();
        assert!(message.contains("piece 2"));
        assert!(message.contains("0"));
        assert!(message.contains("7"));

        let wrapped: TilingError = err.into();
        assert!(matches!(wrapped, TilingError::Decode(DecodeError::DuplicatePiece { .. })));
    }

    #[test]
    fn test_configuration_error_wraps() {
        let wrapped: TilingError = ConfigurationError::InvalidTable { width: 0, height: 3 }.into();
        assert_eq!(wrapped.to_string(), "invalid table dimensions 0x3: both must be positive");
    }
}
