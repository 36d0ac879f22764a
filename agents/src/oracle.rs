//! The rules-engine boundary.
//!
//! Search code only talks to positions and moves through [`Oracle`], so it
//! never looks inside either. [`StandardChess`] binds the trait to
//! `chess-core`.

use chess_core::{Color, Move, Piece, Position, RulesError};
use std::fmt;

/// Everything the search core needs from a rules engine.
pub trait Oracle {
    type Position: Clone + fmt::Debug;
    type Move: Copy + Eq + fmt::Debug + fmt::Display;

    /// Legal moves in a stable order. Empty iff the game is over.
    fn legal_moves(&self, position: &Self::Position) -> Vec<Self::Move>;

    /// Returns the position after `mv`, or `RulesError::IllegalMove`.
    fn apply_move(
        &self,
        position: &Self::Position,
        mv: Self::Move,
    ) -> Result<Self::Position, RulesError>;

    fn is_game_over(&self, position: &Self::Position) -> bool;

    fn is_draw(&self, position: &Self::Position) -> bool;

    fn is_checkmate(&self, position: &Self::Position) -> bool;

    fn turn_color(&self, position: &Self::Position) -> Color;

    /// Canonical text form. Equal positions serialize identically.
    fn serialize(&self, position: &Self::Position) -> String;

    fn deserialize(&self, text: &str) -> Result<Self::Position, RulesError>;

    /// Every piece on the board, for material counting.
    fn pieces(&self, position: &Self::Position) -> Vec<Piece>;
}

/// Standard chess backed by the `chess-core` rules engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardChess;

impl Oracle for StandardChess {
    type Position = Position;
    type Move = Move;

    fn legal_moves(&self, position: &Position) -> Vec<Move> {
        position.legal_moves()
    }

    fn apply_move(&self, position: &Position, mv: Move) -> Result<Position, RulesError> {
        position.play(mv)
    }

    fn is_game_over(&self, position: &Position) -> bool {
        position.is_game_over()
    }

    fn is_draw(&self, position: &Position) -> bool {
        position.is_draw()
    }

    fn is_checkmate(&self, position: &Position) -> bool {
        position.is_checkmate()
    }

    fn turn_color(&self, position: &Position) -> Color {
        position.side_to_move()
    }

    fn serialize(&self, position: &Position) -> String {
        position.to_fen()
    }

    fn deserialize(&self, text: &str) -> Result<Position, RulesError> {
        Ok(Position::from_fen(text)?)
    }

    fn pieces(&self, position: &Position) -> Vec<Piece> {
        position.board.pieces().map(|(_, piece)| piece).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_core::{positions, FenError};

    #[test]
    fn test_serialize_round_trip() {
        let oracle = StandardChess;
        let position = oracle.deserialize(positions::KIWIPETE).unwrap();
        assert_eq!(oracle.serialize(&position), positions::KIWIPETE);
        assert_eq!(oracle.turn_color(&position), Color::White);
    }

    #[test]
    fn test_deserialize_rejects_garbage() {
        let err = StandardChess.deserialize("not a position").unwrap_err();
        assert!(matches!(
            err,
            RulesError::InvalidPosition(FenError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_apply_illegal_move() {
        let oracle = StandardChess;
        let position = Position::new();
        let err = oracle
            .apply_move(&position, "e2e5".parse().unwrap())
            .unwrap_err();
        assert!(matches!(err, RulesError::IllegalMove { .. }));
    }

    #[test]
    fn test_terminal_queries() {
        let oracle = StandardChess;
        let mated = oracle
            .deserialize("R5k1/5ppp/8/8/8/8/5PPP/6K1 b - - 1 1")
            .unwrap();
        assert!(oracle.is_game_over(&mated));
        assert!(oracle.is_checkmate(&mated));
        assert!(!oracle.is_draw(&mated));
        assert!(oracle.legal_moves(&mated).is_empty());
        assert_eq!(oracle.pieces(&mated).len(), 9);
    }
}
