use crate::types::*;

/// Mailbox board: one optional piece per square, indexed by `Square::index()`.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct Board {
    squares: [Option<Piece>; 64],
}

impl Board {
    pub const fn empty() -> Self {
        Self {
            squares: [None; 64],
        }
    }

    /// Creates the standard starting position.
    pub fn starting_position() -> Self {
        const BACK_RANK: [PieceType; 8] = [
            PieceType::Rook,
            PieceType::Knight,
            PieceType::Bishop,
            PieceType::Queen,
            PieceType::King,
            PieceType::Bishop,
            PieceType::Knight,
            PieceType::Rook,
        ];

        let mut board = Self::empty();
        for (file, &piece_type) in BACK_RANK.iter().enumerate() {
            board.squares[file] = Some(Piece::new(piece_type, Color::White));
            board.squares[8 + file] = Some(Piece::new(PieceType::Pawn, Color::White));
            board.squares[48 + file] = Some(Piece::new(PieceType::Pawn, Color::Black));
            board.squares[56 + file] = Some(Piece::new(piece_type, Color::Black));
        }
        board
    }

    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.squares[square.index() as usize]
    }

    pub fn set_piece(&mut self, square: Square, piece: Option<Piece>) {
        self.squares[square.index() as usize] = piece;
    }

    /// Moves whatever stands on `from` to `to`, returning the captured piece.
    pub fn move_piece(&mut self, from: Square, to: Square) -> Option<Piece> {
        let piece = self.squares[from.index() as usize].take();
        std::mem::replace(&mut self.squares[to.index() as usize], piece)
    }

    pub fn is_empty(&self, square: Square) -> bool {
        self.piece_at(square).is_none()
    }

    pub fn is_color(&self, square: Square, color: Color) -> bool {
        self.piece_at(square).is_some_and(|p| p.color == color)
    }

    pub fn is_enemy(&self, square: Square, color: Color) -> bool {
        self.is_color(square, color.opponent())
    }

    /// Iterates occupied squares with their pieces, a1 first.
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::all().filter_map(|sq| self.piece_at(sq).map(|p| (sq, p)))
    }

    /// Iterates squares holding pieces of `color`.
    pub fn pieces_of(&self, color: Color) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.pieces().filter(move |(_, p)| p.color == color)
    }

    /// Counts pieces of the given type and color.
    pub fn count(&self, piece_type: PieceType, color: Color) -> usize {
        self.pieces_of(color)
            .filter(|(_, p)| p.piece_type == piece_type)
            .count()
    }

    /// Finds the king of `color`. `None` only for boards under construction.
    pub fn king_square(&self, color: Color) -> Option<Square> {
        self.pieces_of(color)
            .find(|(_, p)| p.piece_type == PieceType::King)
            .map(|(sq, _)| sq)
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::starting_position()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        s.parse().unwrap()
    }

    #[test]
    fn test_starting_position() {
        let board = Board::starting_position();

        assert_eq!(
            board.piece_at(sq("a1")),
            Some(Piece::new(PieceType::Rook, Color::White))
        );
        assert_eq!(
            board.piece_at(sq("e1")),
            Some(Piece::new(PieceType::King, Color::White))
        );
        assert_eq!(
            board.piece_at(sq("e8")),
            Some(Piece::new(PieceType::King, Color::Black))
        );
        assert!(board.piece_at(sq("d5")).is_none());
        assert_eq!(board.pieces_of(Color::White).count(), 16);
        assert_eq!(board.pieces_of(Color::Black).count(), 16);
    }

    #[test]
    fn test_move_piece() {
        let mut board = Board::starting_position();

        let captured = board.move_piece(sq("e2"), sq("e4"));
        assert!(captured.is_none());
        assert!(board.is_empty(sq("e2")));
        assert_eq!(
            board.piece_at(sq("e4")),
            Some(Piece::new(PieceType::Pawn, Color::White))
        );

        let captured = board.move_piece(sq("d8"), sq("d2"));
        assert_eq!(captured, Some(Piece::new(PieceType::Pawn, Color::White)));
    }

    #[test]
    fn test_king_square() {
        let board = Board::starting_position();
        assert_eq!(board.king_square(Color::Black), Some(sq("e8")));
        assert_eq!(Board::empty().king_square(Color::White), None);
    }
}
