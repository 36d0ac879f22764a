use crate::position::Position;
use crate::types::{Color, File, Move, Piece, PieceType, Square};

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

const DIAGONAL_DIRS: [(i8, i8); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];
const STRAIGHT_DIRS: [(i8, i8); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];
const ALL_DIRS: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Generates every legal move for the side to move, ordered by origin square
/// (a1 first). Draw rules are not consulted here; see `Position::legal_moves`.
pub fn generate_legal_moves(position: &Position) -> Vec<Move> {
    let mut moves = Vec::with_capacity(48);
    for (from, piece) in position.board.pieces_of(position.turn) {
        generate_piece_moves(position, from, piece, &mut moves);
    }
    retain_legal(position, &mut moves);
    moves
}

/// Generates the legal moves of the piece standing on `from`.
///
/// Returns nothing if the square is empty or holds a piece of the side not to move.
pub fn generate_legal_moves_from(position: &Position, from: Square) -> Vec<Move> {
    let mut moves = Vec::new();
    if let Some(piece) = position.board.piece_at(from) {
        if piece.color == position.turn {
            generate_piece_moves(position, from, piece, &mut moves);
            retain_legal(position, &mut moves);
        }
    }
    moves
}

/// Drops moves that would leave the mover's king in check.
fn retain_legal(position: &Position, moves: &mut Vec<Move>) {
    moves.retain(|&mv| !position.apply_move(mv).is_side_in_check(position.turn));
}

fn generate_piece_moves(position: &Position, from: Square, piece: Piece, moves: &mut Vec<Move>) {
    let color = piece.color;
    match piece.piece_type {
        PieceType::Pawn => generate_pawn_moves(position, from, color, moves),
        PieceType::Knight => generate_step_moves(position, from, color, &KNIGHT_DELTAS, moves),
        PieceType::Bishop => generate_sliding_moves(position, from, color, &DIAGONAL_DIRS, moves),
        PieceType::Rook => generate_sliding_moves(position, from, color, &STRAIGHT_DIRS, moves),
        PieceType::Queen => generate_sliding_moves(position, from, color, &ALL_DIRS, moves),
        PieceType::King => {
            generate_step_moves(position, from, color, &ALL_DIRS, moves);
            generate_castling_moves(position, from, color, moves);
        }
    }
}

/// Pushes a pawn move, expanding it into the four promotions on the last rank.
fn push_pawn_move(from: Square, to: Square, color: Color, moves: &mut Vec<Move>) {
    if to.rank() == color.promotion_rank() {
        moves.extend(
            PieceType::PROMOTIONS
                .iter()
                .map(|&promotion| Move::new_promotion(from, to, promotion)),
        );
    } else {
        moves.push(Move::new(from, to));
    }
}

fn generate_pawn_moves(position: &Position, from: Square, color: Color, moves: &mut Vec<Move>) {
    let board = &position.board;
    let direction = color.pawn_direction();

    if let Some(single) = from.offset(0, direction).filter(|&sq| board.is_empty(sq)) {
        push_pawn_move(from, single, color, moves);

        if from.rank() == color.pawn_rank() {
            if let Some(double) = single.offset(0, direction).filter(|&sq| board.is_empty(sq)) {
                moves.push(Move::new(from, double));
            }
        }
    }

    for df in [-1, 1] {
        let Some(target) = from.offset(df, direction) else {
            continue;
        };
        if board.is_enemy(target, color) {
            push_pawn_move(from, target, color, moves);
        } else if position.en_passant == Some(target) {
            moves.push(Move::new(from, target));
        }
    }
}

/// Knight and king steps: one hop per delta onto an empty or enemy square.
fn generate_step_moves(
    position: &Position,
    from: Square,
    color: Color,
    deltas: &[(i8, i8)],
    moves: &mut Vec<Move>,
) {
    for &(df, dr) in deltas {
        if let Some(to) = from.offset(df, dr) {
            if !position.board.is_color(to, color) {
                moves.push(Move::new(from, to));
            }
        }
    }
}

fn generate_sliding_moves(
    position: &Position,
    from: Square,
    color: Color,
    directions: &[(i8, i8)],
    moves: &mut Vec<Move>,
) {
    for &(df, dr) in directions {
        let mut current = from.offset(df, dr);

        while let Some(to) = current {
            if position.board.is_empty(to) {
                moves.push(Move::new(from, to));
            } else {
                if position.board.is_enemy(to, color) {
                    moves.push(Move::new(from, to));
                }
                break;
            }
            current = to.offset(df, dr);
        }
    }
}

/// Castling: the king may not start in, pass through, or (via the legality
/// filter) land in check.
fn generate_castling_moves(
    position: &Position,
    from: Square,
    color: Color,
    moves: &mut Vec<Move>,
) {
    let rights = position.castling.get(color);
    let rank = color.back_rank();
    let home = File::new(4).map(|file| Square::new(file, rank));

    if !rights.any() || home != Some(from) {
        return;
    }

    let enemy = color.opponent();
    if position.is_attacked_by(from, enemy) {
        return;
    }

    let square = |file: u8| File::new(file).map(|f| Square::new(f, rank));
    let rook = Some(Piece::new(PieceType::Rook, color));
    let board = &position.board;

    if rights.kingside {
        if let (Some(f), Some(g), Some(h)) = (square(5), square(6), square(7)) {
            if board.is_empty(f)
                && board.is_empty(g)
                && board.piece_at(h) == rook
                && !position.is_attacked_by(f, enemy)
            {
                moves.push(Move::new(from, g));
            }
        }
    }

    if rights.queenside {
        if let (Some(a), Some(b), Some(c), Some(d)) = (square(0), square(1), square(2), square(3))
        {
            if board.is_empty(b)
                && board.is_empty(c)
                && board.is_empty(d)
                && board.piece_at(a) == rook
                && !position.is_attacked_by(d, enemy)
            {
                moves.push(Move::new(from, c));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fen::positions;

    fn sq(s: &str) -> Square {
        s.parse().unwrap()
    }

    #[test]
    fn test_starting_position_moves() {
        let moves = generate_legal_moves(&Position::new());
        assert_eq!(moves.len(), 20);
    }

    #[test]
    fn test_pawn_promotion() {
        let position = Position::from_fen("7k/P7/8/8/8/8/8/K7 w - - 0 1").unwrap();
        let pawn_moves = generate_legal_moves_from(&position, sq("a7"));

        assert_eq!(pawn_moves.len(), 4);
        assert!(pawn_moves.iter().all(|m| m.promotion.is_some()));
    }

    #[test]
    fn test_moves_from_square() {
        let position = Position::new();
        assert_eq!(generate_legal_moves_from(&position, sq("g1")).len(), 2);
        assert_eq!(generate_legal_moves_from(&position, sq("e2")).len(), 2);
        assert!(generate_legal_moves_from(&position, sq("e4")).is_empty());
        // Black pieces cannot move on White's turn.
        assert!(generate_legal_moves_from(&position, sq("g8")).is_empty());
    }

    #[test]
    fn test_castling_generated_when_clear() {
        let position = Position::from_fen(positions::KIWIPETE).unwrap();
        let king_moves = generate_legal_moves_from(&position, sq("e1"));

        assert!(king_moves.contains(&Move::new(sq("e1"), sq("g1"))));
        assert!(king_moves.contains(&Move::new(sq("e1"), sq("c1"))));
    }

    #[test]
    fn test_no_castling_through_check() {
        // The black rook on f8 covers f1.
        let position = Position::from_fen("4kr2/8/8/8/8/8/8/4K2R w K - 0 1").unwrap();
        let king_moves = generate_legal_moves_from(&position, sq("e1"));
        assert!(!king_moves.contains(&Move::new(sq("e1"), sq("g1"))));
    }

    #[test]
    fn test_pinned_piece_cannot_move() {
        let position = Position::from_fen("4r1k1/8/8/8/8/8/4B3/4K3 w - - 0 1").unwrap();
        assert!(generate_legal_moves_from(&position, sq("e2")).is_empty());
    }

    #[test]
    fn test_mate_and_stalemate() {
        let mated = Position::from_fen("R5k1/5ppp/8/8/8/8/5PPP/6K1 b - - 1 1").unwrap();
        assert!(generate_legal_moves(&mated).is_empty());
        assert!(mated.is_checkmate());
        assert!(!mated.is_stalemate());

        let stalemate = Position::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
        assert!(generate_legal_moves(&stalemate).is_empty());
        assert!(stalemate.is_stalemate());
        assert!(!stalemate.is_checkmate());
    }
}
