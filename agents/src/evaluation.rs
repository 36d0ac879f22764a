use crate::oracle::Oracle;
use chess_core::{Color, PieceType};

/// Score of a won (or, negated, lost) terminal position.
pub const WIN_SCORE: f64 = 100.0;

/// Material value in pawns. Kings are not counted.
pub const fn piece_value(piece_type: PieceType) -> f64 {
    match piece_type {
        PieceType::Pawn => 1.0,
        PieceType::Knight | PieceType::Bishop => 3.0,
        PieceType::Rook => 5.0,
        PieceType::Queen => 10.0,
        PieceType::King => 0.0,
    }
}

/// Scores `position` from `perspective`'s point of view.
///
/// Draws score 0 and checkmates score ±[`WIN_SCORE`]. Anything else is the
/// material balance, so swapping the perspective negates the result.
pub fn evaluate<O: Oracle>(oracle: &O, position: &O::Position, perspective: Color) -> f64 {
    if oracle.is_game_over(position) {
        if oracle.is_checkmate(position) {
            return if oracle.turn_color(position) == perspective {
                -WIN_SCORE
            } else {
                WIN_SCORE
            };
        }
        return 0.0;
    }

    material_score(oracle, position, perspective)
        - material_score(oracle, position, perspective.opponent())
}

/// Material sum for one color.
pub fn material_score<O: Oracle>(oracle: &O, position: &O::Position, color: Color) -> f64 {
    oracle
        .pieces(position)
        .into_iter()
        .filter(|piece| piece.color == color)
        .map(|piece| piece_value(piece.piece_type))
        .sum()
}
