//! Move path enumeration for validating the move generator.
//!
//! Perft ignores the fifty-move and insufficient-material rules, matching the
//! published reference counts.

use crate::move_gen::generate_legal_moves;
use crate::position::Position;
use crate::types::{Move, PieceType};

/// Leaf statistics from a detailed perft run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PerftResults {
    pub nodes: u64,
    pub captures: u64,
    pub en_passants: u64,
    pub castles: u64,
    pub promotions: u64,
    pub checks: u64,
    pub checkmates: u64,
}

impl PerftResults {
    pub fn add(&mut self, other: &Self) {
        self.nodes += other.nodes;
        self.captures += other.captures;
        self.en_passants += other.en_passants;
        self.castles += other.castles;
        self.promotions += other.promotions;
        self.checks += other.checks;
        self.checkmates += other.checkmates;
    }
}

/// Counts leaf nodes of the legal move tree to `depth`.
pub fn perft(position: &Position, depth: u8) -> u64 {
    if depth == 0 {
        return 1;
    }

    let moves = generate_legal_moves(position);
    if depth == 1 {
        return moves.len() as u64;
    }

    moves
        .into_iter()
        .map(|mv| perft(&position.apply_move(mv), depth - 1))
        .sum()
}

/// Per-root-move leaf counts, in generation order.
pub fn perft_divide(position: &Position, depth: u8) -> Vec<(Move, u64)> {
    generate_legal_moves(position)
        .into_iter()
        .map(|mv| (mv, perft(&position.apply_move(mv), depth.saturating_sub(1))))
        .collect()
}

/// Perft with a breakdown of the move kinds reaching the leaves.
pub fn perft_detailed(position: &Position, depth: u8) -> PerftResults {
    let mut results = PerftResults::default();

    if depth == 0 {
        results.nodes = 1;
        return results;
    }

    for mv in generate_legal_moves(position) {
        let next = position.apply_move(mv);

        if depth > 1 {
            results.add(&perft_detailed(&next, depth - 1));
            continue;
        }

        results.nodes += 1;

        let Some(piece) = position.board.piece_at(mv.from) else {
            continue;
        };
        let captured = position.board.piece_at(mv.to);

        if captured.is_some() {
            results.captures += 1;
        } else if piece.piece_type == PieceType::Pawn && mv.from.file() != mv.to.file() {
            results.en_passants += 1;
            results.captures += 1;
        }
        if piece.piece_type == PieceType::King && mv.from.distance(mv.to) == 2 {
            results.castles += 1;
        }
        if mv.promotion.is_some() {
            results.promotions += 1;
        }
        if next.is_in_check() {
            results.checks += 1;
            if next.is_checkmate() {
                results.checkmates += 1;
            }
        }
    }

    results
}

/// Reference positions with known node counts.
pub mod positions {
    pub const STARTING_PERFT: &[(u8, u64)] = &[
        (1, 20),
        (2, 400),
        (3, 8902),
        (4, 197_281),
        (5, 4_865_609),
    ];

    pub const KIWIPETE_PERFT: &[(u8, u64)] = &[(1, 48), (2, 2039), (3, 97_862), (4, 4_085_603)];

    pub const POSITION_3: &str = "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1";
    pub const POSITION_3_PERFT: &[(u8, u64)] = &[(1, 14), (2, 191), (3, 2812), (4, 43_238)];

    pub const POSITION_4: &str =
        "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1";
    pub const POSITION_4_PERFT: &[(u8, u64)] = &[(1, 6), (2, 264), (3, 9467)];

    pub const POSITION_5: &str = "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8";
    pub const POSITION_5_PERFT: &[(u8, u64)] = &[(1, 44), (2, 1486), (3, 62_379)];
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fen;

    fn check(fen: &str, expected: &[(u8, u64)], max_depth: u8) {
        let position = Position::from_fen(fen).unwrap();
        for &(depth, nodes) in expected.iter().filter(|(d, _)| *d <= max_depth) {
            assert_eq!(perft(&position, depth), nodes, "perft({depth}) of {fen}");
        }
    }

    #[test]
    fn test_perft_starting_position() {
        check(fen::positions::STARTING, positions::STARTING_PERFT, 3);
    }

    #[test]
    fn test_perft_kiwipete() {
        check(fen::positions::KIWIPETE, positions::KIWIPETE_PERFT, 2);
    }

    #[test]
    fn test_perft_reference_positions() {
        check(positions::POSITION_3, positions::POSITION_3_PERFT, 3);
        check(positions::POSITION_4, positions::POSITION_4_PERFT, 2);
        check(positions::POSITION_5, positions::POSITION_5_PERFT, 2);
    }

    #[test]
    fn test_perft_divide() {
        let results = perft_divide(&Position::new(), 2);

        assert_eq!(results.len(), 20);
        assert_eq!(results.iter().map(|(_, n)| n).sum::<u64>(), 400);
    }

    #[test]
    fn test_perft_detailed_kiwipete() {
        let position = Position::from_fen(fen::positions::KIWIPETE).unwrap();
        let results = perft_detailed(&position, 1);

        assert_eq!(results.nodes, 48);
        assert_eq!(results.captures, 8);
        assert_eq!(results.castles, 2);
        assert_eq!(results.en_passants, 0);
    }

    #[test]
    fn test_perft_detailed_counts_mate() {
        let position = Position::from_fen("6k1/5ppp/8/8/8/8/5PPP/R5K1 w - - 0 1").unwrap();
        let results = perft_detailed(&position, 1);

        assert_eq!(results.checks, 1);
        assert_eq!(results.checkmates, 1);
    }
}
