//! FEN (Forsyth-Edwards Notation) parsing and serialization.

use crate::board::Board;
use crate::error::FenError;
use crate::position::Position;
use crate::types::{CastlingRights, Color, File, Piece, PieceType, Rank, Square};
use std::str::FromStr;

impl Position {
    /// Parses all six FEN fields. Each side must have exactly one king.
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        let fields: Vec<&str> = fen.split_whitespace().collect();
        let [placement, turn, castling, en_passant, halfmove, fullmove] = fields[..] else {
            return Err(FenError::InvalidFormat(format!(
                "Expected 6 fields, got {}",
                fields.len()
            )));
        };

        let board = parse_board(placement)?;
        for color in [Color::White, Color::Black] {
            let found = board.count(PieceType::King, color);
            if found != 1 {
                return Err(FenError::KingCount {
                    color: color.to_string(),
                    found,
                });
            }
        }

        let turn = match turn {
            "w" => Color::White,
            "b" => Color::Black,
            _ => return Err(FenError::InvalidColor(turn.to_string())),
        };

        Ok(Position {
            board,
            turn,
            castling: parse_castling(castling)?,
            en_passant: parse_en_passant(en_passant)?,
            halfmove_clock: parse_number(halfmove)?,
            fullmove_number: parse_number(fullmove)?,
        })
    }

    /// Serializes the position back to FEN.
    pub fn to_fen(&self) -> String {
        format!(
            "{} {} {} {} {} {}",
            board_to_fen(&self.board),
            if self.turn == Color::White { "w" } else { "b" },
            castling_to_fen(self.castling),
            self.en_passant
                .map_or_else(|| "-".to_string(), |sq| sq.to_string()),
            self.halfmove_clock,
            self.fullmove_number
        )
    }
}

impl FromStr for Position {
    type Err = FenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Position::from_fen(s)
    }
}

fn parse_board(placement: &str) -> Result<Board, FenError> {
    let ranks: Vec<&str> = placement.split('/').collect();
    if ranks.len() != 8 {
        return Err(FenError::InvalidFormat(format!(
            "Expected 8 ranks, got {}",
            ranks.len()
        )));
    }

    let mut board = Board::empty();

    // FEN lists rank 8 first.
    for (rank, row) in (0..8u8).rev().zip(ranks) {
        let mut file = 0u8;

        for ch in row.chars() {
            if let Some(skip) = ch.to_digit(10).filter(|d| (1..=8).contains(d)) {
                file = file
                    .checked_add(skip as u8)
                    .filter(|&f| f <= 8)
                    .ok_or_else(|| {
                        FenError::InvalidFormat(format!("Too many squares in rank {}", rank + 1))
                    })?;
            } else {
                let piece = Piece::from_char(ch).ok_or(FenError::InvalidPiece(ch))?;
                let square = File::new(file)
                    .zip(Rank::new(rank))
                    .map(|(f, r)| Square::new(f, r))
                    .ok_or_else(|| {
                        FenError::InvalidFormat(format!("Too many squares in rank {}", rank + 1))
                    })?;
                board.set_piece(square, Some(piece));
                file += 1;
            }
        }

        if file != 8 {
            return Err(FenError::InvalidFormat(format!(
                "Rank {} has {} squares, expected 8",
                rank + 1,
                file
            )));
        }
    }

    Ok(board)
}

fn board_to_fen(board: &Board) -> String {
    let mut fen = String::new();

    for rank in (0..8u8).rev() {
        let mut empty = 0;

        for file in 0..8u8 {
            let piece = Square::from_index(rank * 8 + file).and_then(|sq| board.piece_at(sq));
            match piece {
                Some(piece) => {
                    if empty > 0 {
                        fen.push_str(&empty.to_string());
                        empty = 0;
                    }
                    fen.push(piece.to_char());
                }
                None => empty += 1,
            }
        }

        if empty > 0 {
            fen.push_str(&empty.to_string());
        }
        if rank > 0 {
            fen.push('/');
        }
    }

    fen
}

fn parse_castling(field: &str) -> Result<CastlingRights, FenError> {
    let mut rights = CastlingRights::none();
    if field == "-" {
        return Ok(rights);
    }

    for ch in field.chars() {
        match ch {
            'K' => rights.white.kingside = true,
            'Q' => rights.white.queenside = true,
            'k' => rights.black.kingside = true,
            'q' => rights.black.queenside = true,
            _ => return Err(FenError::InvalidCastling(field.to_string())),
        }
    }

    Ok(rights)
}

fn castling_to_fen(castling: CastlingRights) -> String {
    let flags = [
        (castling.white.kingside, 'K'),
        (castling.white.queenside, 'Q'),
        (castling.black.kingside, 'k'),
        (castling.black.queenside, 'q'),
    ];
    let s: String = flags.iter().filter(|(set, _)| *set).map(|&(_, c)| c).collect();

    if s.is_empty() {
        "-".to_string()
    } else {
        s
    }
}

fn parse_en_passant(field: &str) -> Result<Option<Square>, FenError> {
    if field == "-" {
        return Ok(None);
    }

    let square: Square = field
        .parse()
        .map_err(|_| FenError::InvalidEnPassant(field.to_string()))?;

    // Only the squares a double pawn push skips over are valid targets.
    if !matches!(square.rank().index(), 2 | 5) {
        return Err(FenError::InvalidEnPassant(field.to_string()));
    }

    Ok(Some(square))
}

fn parse_number(field: &str) -> Result<u16, FenError> {
    field
        .parse()
        .map_err(|_| FenError::InvalidNumber(field.to_string()))
}

/// Standard FEN positions for testing.
pub mod positions {
    /// Starting position.
    pub const STARTING: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

    /// Kiwipete, a move generation stress position.
    pub const KIWIPETE: &str =
        "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";

    /// Position after 1.e4 e5.
    pub const AFTER_E4_E5: &str = "rnbqkbnr/pppp1ppp/8/4p3/4P3/8/PPPP1PPP/RNBQKBNR w KQkq e6 0 2";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_starting_position() {
        let position = Position::from_fen(positions::STARTING).unwrap();
        assert_eq!(position, Position::new());
    }

    #[test]
    fn test_round_trip() {
        for fen in [positions::STARTING, positions::KIWIPETE, positions::AFTER_E4_E5] {
            assert_eq!(Position::from_fen(fen).unwrap().to_fen(), fen);
        }
    }

    #[test]
    fn test_parse_en_passant() {
        let position: Position = positions::AFTER_E4_E5.parse().unwrap();
        assert_eq!(position.en_passant, Some("e6".parse().unwrap()));
    }

    #[test]
    fn test_invalid_fen() {
        assert!(Position::from_fen("invalid").is_err());
        assert!(Position::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR").is_err());
        assert!(matches!(
            Position::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR x KQkq - 0 1"),
            Err(FenError::InvalidColor(_))
        ));
        assert!(matches!(
            Position::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNX w KQkq - 0 1"),
            Err(FenError::InvalidPiece('X'))
        ));
        assert!(matches!(
            Position::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq e4 0 1"),
            Err(FenError::InvalidEnPassant(_))
        ));
    }

    #[test]
    fn test_overlong_rank_is_rejected() {
        let fen = format!("{}/8/8/8/8/8/8/k6K w - - 0 1", "8".repeat(40));
        assert!(matches!(
            Position::from_fen(&fen),
            Err(FenError::InvalidFormat(_))
        ));

        // 33 eights would wrap a u8 counter back to 8.
        let fen = format!("{}/8/8/8/8/8/8/k6K w - - 0 1", "8".repeat(33));
        assert!(Position::from_fen(&fen).is_err());

        assert!(Position::from_fen("44p/8/8/8/8/8/8/k6K w - - 0 1").is_err());
    }

    #[test]
    fn test_requires_one_king_each() {
        let err = Position::from_fen("8/8/8/8/8/8/8/4K3 w - - 0 1").unwrap_err();
        assert_eq!(
            err,
            FenError::KingCount {
                color: "Black".to_string(),
                found: 0
            }
        );
        assert!(Position::from_fen("k7/8/8/8/8/8/8/KK6 w - - 0 1").is_err());
    }
}
