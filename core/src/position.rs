//! Complete position: board, side to move, castling, en passant and clocks.
//!
//! Positions are values. Applying a move returns a new `Position` and leaves
//! the original untouched.

use crate::board::Board;
use crate::error::RulesError;
use crate::move_gen::{generate_legal_moves, generate_legal_moves_from};
use crate::types::*;

/// Halfmoves without a pawn move or capture before the game is drawn.
pub const FIFTY_MOVE_LIMIT: u16 = 100;

/// Complete state of a chess game, matching the six FEN fields.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct Position {
    pub board: Board,
    pub turn: Color,
    pub castling: CastlingRights,
    pub en_passant: Option<Square>,
    pub halfmove_clock: u16,
    pub fullmove_number: u16,
}

/// How a finished game ended.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Outcome {
    Checkmate { winner: Color },
    Stalemate,
    FiftyMoveRule,
    InsufficientMaterial,
}

impl Outcome {
    pub fn is_draw(self) -> bool {
        !matches!(self, Outcome::Checkmate { .. })
    }

    pub fn winner(self) -> Option<Color> {
        match self {
            Outcome::Checkmate { winner } => Some(winner),
            _ => None,
        }
    }
}

impl Position {
    /// Creates the standard starting position.
    pub fn new() -> Self {
        Self {
            board: Board::starting_position(),
            turn: Color::White,
            castling: CastlingRights::all(),
            en_passant: None,
            halfmove_clock: 0,
            fullmove_number: 1,
        }
    }

    /// An empty board with White to move, for building test positions.
    pub fn empty() -> Self {
        Self {
            board: Board::empty(),
            turn: Color::White,
            castling: CastlingRights::none(),
            en_passant: None,
            halfmove_clock: 0,
            fullmove_number: 1,
        }
    }

    pub fn side_to_move(&self) -> Color {
        self.turn
    }

    /// Legal moves for the side to move. Empty once the game is over,
    /// including draws by the fifty-move rule or insufficient material.
    pub fn legal_moves(&self) -> Vec<Move> {
        if self.is_drawn_by_rule() {
            return Vec::new();
        }
        generate_legal_moves(self)
    }

    /// Applies `mv` after checking that it is legal here.
    pub fn play(&self, mv: Move) -> Result<Self, RulesError> {
        let legal = !self.is_drawn_by_rule()
            && self.board.is_color(mv.from, self.turn)
            && generate_legal_moves_from(self, mv.from).contains(&mv);

        if !legal {
            return Err(RulesError::IllegalMove {
                mv: mv.to_string(),
                fen: self.to_fen(),
            });
        }

        Ok(self.apply_move(mv))
    }

    /// Applies a move without checking legality.
    ///
    /// The move must come from the move generator; a move from an empty square
    /// returns the position with only the turn bookkeeping advanced.
    pub fn apply_move(&self, mv: Move) -> Self {
        let mut next = self.clone();
        next.en_passant = None;
        next.castling = self.castling.update_after_move(mv.from, mv.to);
        next.turn = self.turn.opponent();
        if self.turn == Color::Black {
            next.fullmove_number = next.fullmove_number.saturating_add(1);
        }

        let Some(piece) = self.board.piece_at(mv.from) else {
            next.halfmove_clock = next.halfmove_clock.saturating_add(1);
            return next;
        };

        if piece.piece_type == PieceType::King && mv.from.distance(mv.to) == 2 {
            next.apply_castle(mv);
            next.halfmove_clock = next.halfmove_clock.saturating_add(1);
            return next;
        }

        let mut captured = next.board.move_piece(mv.from, mv.to);

        if piece.piece_type == PieceType::Pawn {
            if Some(mv.to) == self.en_passant && captured.is_none() {
                let victim = Square::new(mv.to.file(), mv.from.rank());
                captured = next.board.piece_at(victim);
                next.board.set_piece(victim, None);
            }

            if let Some(promotion) = mv.promotion {
                next.board
                    .set_piece(mv.to, Some(Piece::new(promotion, piece.color)));
            }

            if mv.from.rank().index().abs_diff(mv.to.rank().index()) == 2 {
                next.en_passant = mv.from.offset(0, piece.color.pawn_direction());
            }
        }

        if piece.piece_type == PieceType::Pawn || captured.is_some() {
            next.halfmove_clock = 0;
        } else {
            next.halfmove_clock = next.halfmove_clock.saturating_add(1);
        }

        next
    }

    /// Moves king and rook for a castling move.
    fn apply_castle(&mut self, mv: Move) {
        let rank = mv.from.rank();
        let (rook_from, rook_to) = if mv.to.file() > mv.from.file() {
            (7, 5)
        } else {
            (0, 3)
        };

        self.board.move_piece(mv.from, mv.to);
        if let (Some(from), Some(to)) = (File::new(rook_from), File::new(rook_to)) {
            self.board
                .move_piece(Square::new(from, rank), Square::new(to, rank));
        }
    }

    /// Returns true if `square` is attacked by any piece of `attacker`.
    pub fn is_attacked_by(&self, square: Square, attacker: Color) -> bool {
        const KNIGHT_DELTAS: [(i8, i8); 8] = [
            (-2, -1),
            (-2, 1),
            (-1, -2),
            (-1, 2),
            (1, -2),
            (1, 2),
            (2, -1),
            (2, 1),
        ];
        const KING_DELTAS: [(i8, i8); 8] = [
            (-1, -1),
            (-1, 0),
            (-1, 1),
            (0, -1),
            (0, 1),
            (1, -1),
            (1, 0),
            (1, 1),
        ];
        const DIAGONALS: [(i8, i8); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];
        const STRAIGHTS: [(i8, i8); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

        let holds = |sq: Option<Square>, types: &[PieceType]| {
            sq.and_then(|sq| self.board.piece_at(sq))
                .is_some_and(|p| p.color == attacker && types.contains(&p.piece_type))
        };

        // Pawns attack diagonally forward, so look one rank back from the target.
        let back = -attacker.pawn_direction();
        if holds(square.offset(-1, back), &[PieceType::Pawn])
            || holds(square.offset(1, back), &[PieceType::Pawn])
        {
            return true;
        }

        if KNIGHT_DELTAS
            .iter()
            .any(|&(df, dr)| holds(square.offset(df, dr), &[PieceType::Knight]))
        {
            return true;
        }

        if KING_DELTAS
            .iter()
            .any(|&(df, dr)| holds(square.offset(df, dr), &[PieceType::King]))
        {
            return true;
        }

        let diagonal = [PieceType::Bishop, PieceType::Queen];
        let straight = [PieceType::Rook, PieceType::Queen];
        DIAGONALS
            .iter()
            .any(|&(df, dr)| holds(self.first_piece_along(square, df, dr), &diagonal))
            || STRAIGHTS
                .iter()
                .any(|&(df, dr)| holds(self.first_piece_along(square, df, dr), &straight))
    }

    /// Walks a ray from `square` and returns the first occupied square.
    fn first_piece_along(&self, square: Square, df: i8, dr: i8) -> Option<Square> {
        let mut current = square.offset(df, dr);
        while let Some(sq) = current {
            if !self.board.is_empty(sq) {
                return Some(sq);
            }
            current = sq.offset(df, dr);
        }
        None
    }

    /// Returns true if the side to move is in check.
    pub fn is_in_check(&self) -> bool {
        self.is_side_in_check(self.turn)
    }

    /// Returns true if `color`'s king is attacked.
    pub fn is_side_in_check(&self, color: Color) -> bool {
        self.board
            .king_square(color)
            .is_some_and(|king| self.is_attacked_by(king, color.opponent()))
    }

    pub fn is_fifty_move_draw(&self) -> bool {
        self.halfmove_clock >= FIFTY_MOVE_LIMIT
    }

    /// K vs K, K+minor vs K, and K+NN vs K cannot force mate.
    pub fn is_insufficient_material(&self) -> bool {
        let white = MaterialCount::of(&self.board, Color::White);
        let black = MaterialCount::of(&self.board, Color::Black);

        let cannot_mate = |side: &MaterialCount| {
            side.is_bare_king() || side.is_king_and_minor() || side.is_king_and_two_knights()
        };

        (white.is_bare_king() && cannot_mate(&black))
            || (black.is_bare_king() && cannot_mate(&white))
    }

    fn is_drawn_by_rule(&self) -> bool {
        self.is_fifty_move_draw() || self.is_insufficient_material()
    }

    /// Returns how the game ended, or `None` while it is still running.
    pub fn outcome(&self) -> Option<Outcome> {
        if generate_legal_moves(self).is_empty() {
            return Some(if self.is_in_check() {
                Outcome::Checkmate {
                    winner: self.turn.opponent(),
                }
            } else {
                Outcome::Stalemate
            });
        }

        if self.is_fifty_move_draw() {
            Some(Outcome::FiftyMoveRule)
        } else if self.is_insufficient_material() {
            Some(Outcome::InsufficientMaterial)
        } else {
            None
        }
    }

    pub fn is_game_over(&self) -> bool {
        self.outcome().is_some()
    }

    pub fn is_checkmate(&self) -> bool {
        matches!(self.outcome(), Some(Outcome::Checkmate { .. }))
    }

    pub fn is_stalemate(&self) -> bool {
        matches!(self.outcome(), Some(Outcome::Stalemate))
    }

    pub fn is_draw(&self) -> bool {
        self.outcome().is_some_and(Outcome::is_draw)
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::new()
    }
}

/// Non-king material of one side.
#[derive(Default, Debug)]
struct MaterialCount {
    pawns: usize,
    knights: usize,
    bishops: usize,
    rooks: usize,
    queens: usize,
}

impl MaterialCount {
    fn of(board: &Board, color: Color) -> Self {
        let mut count = Self::default();
        for (_, piece) in board.pieces_of(color) {
            match piece.piece_type {
                PieceType::Pawn => count.pawns += 1,
                PieceType::Knight => count.knights += 1,
                PieceType::Bishop => count.bishops += 1,
                PieceType::Rook => count.rooks += 1,
                PieceType::Queen => count.queens += 1,
                PieceType::King => {}
            }
        }
        count
    }

    fn is_bare_king(&self) -> bool {
        self.pawns + self.knights + self.bishops + self.rooks + self.queens == 0
    }

    fn is_king_and_minor(&self) -> bool {
        self.pawns + self.rooks + self.queens == 0 && self.knights + self.bishops == 1
    }

    fn is_king_and_two_knights(&self) -> bool {
        self.pawns + self.bishops + self.rooks + self.queens == 0 && self.knights == 2
    }
}
