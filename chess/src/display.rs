use chess_core::{Color, PieceType, Position, Square};
use std::fmt::Write;

fn symbol(piece_type: PieceType, color: Color) -> char {
    match (piece_type, color) {
        (PieceType::King, Color::White) => '♔',
        (PieceType::Queen, Color::White) => '♕',
        (PieceType::Rook, Color::White) => '♖',
        (PieceType::Bishop, Color::White) => '♗',
        (PieceType::Knight, Color::White) => '♘',
        (PieceType::Pawn, Color::White) => '♙',
        (PieceType::King, Color::Black) => '♚',
        (PieceType::Queen, Color::Black) => '♛',
        (PieceType::Rook, Color::Black) => '♜',
        (PieceType::Bishop, Color::Black) => '♝',
        (PieceType::Knight, Color::Black) => '♞',
        (PieceType::Pawn, Color::Black) => '♟',
    }
}

/// Renders the board, rank 8 at the top, followed by the side to move.
pub fn render_board(position: &Position) -> String {
    let mut out = String::new();
    out.push_str("\n  a b c d e f g h\n");
    out.push_str("  ---------------\n");

    for rank in (0..8u8).rev() {
        let label = char::from(b'1' + rank);
        out.push(label);
        out.push(' ');

        for file in 0..8u8 {
            let piece = Square::from_index(rank * 8 + file).and_then(|sq| position.board.piece_at(sq));
            match piece {
                Some(piece) => out.push(symbol(piece.piece_type, piece.color)),
                None => out.push('.'),
            }
            out.push(' ');
        }

        let _ = writeln!(out, "| {label}");
    }

    out.push_str("  ---------------\n");
    out.push_str("  a b c d e f g h\n\n");

    let _ = write!(out, "{} to move, move {}", position.turn, position.fullmove_number);
    if position.is_in_check() {
        out.push_str(" (check)");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_starting_position() {
        let text = render_board(&Position::new());
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[3], "8 ♜ ♞ ♝ ♛ ♚ ♝ ♞ ♜ | 8");
        assert_eq!(lines[7], "4 . . . . . . . . | 4");
        assert_eq!(lines[10], "1 ♖ ♘ ♗ ♕ ♔ ♗ ♘ ♖ | 1");
        assert!(text.ends_with("White to move, move 1"));
    }
}
