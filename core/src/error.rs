use thiserror::Error;

/// FEN parsing errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FenError {
    #[error("Invalid FEN format: {0}")]
    InvalidFormat(String),

    #[error("Invalid piece character: '{0}'")]
    InvalidPiece(char),

    #[error("Invalid color: {0}")]
    InvalidColor(String),

    #[error("Invalid castling rights: {0}")]
    InvalidCastling(String),

    #[error("Invalid en passant square: {0}")]
    InvalidEnPassant(String),

    #[error("Invalid number: {0}")]
    InvalidNumber(String),

    #[error("Expected exactly one {color} king, found {found}")]
    KingCount { color: String, found: usize },
}

/// Errors from parsing long algebraic move text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveParseError {
    #[error("Move must be 4 or 5 characters: {0}")]
    InvalidLength(String),

    #[error("Invalid square: {0}")]
    InvalidSquare(String),

    #[error("Invalid promotion piece: '{0}'")]
    InvalidPromotion(char),
}

/// Errors raised by the rules engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RulesError {
    #[error("Illegal move {mv} in position {fen}")]
    IllegalMove { mv: String, fen: String },

    #[error("Invalid position: {0}")]
    InvalidPosition(#[from] FenError),
}
