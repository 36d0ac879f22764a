use crate::{
    error::SearchError,
    oracle::Oracle,
    session::{Diagnostics, Selection, Session},
    Agent,
};
use chess_core::Color;
use rand::seq::SliceRandom;

/// Plays a uniformly random legal move drawn from the session's generator.
pub struct RandomAgent {
    name: String,
}

impl RandomAgent {
    pub fn new() -> Self {
        RandomAgent {
            name: "Random".to_string(),
        }
    }
}

impl Default for RandomAgent {
    fn default() -> Self {
        Self::new()
    }
}

impl<O: Oracle> Agent<O> for RandomAgent {
    fn select(
        &mut self,
        session: &mut Session<O>,
        position: &O::Position,
        _color: Color,
    ) -> Result<Option<Selection<O::Move>>, SearchError> {
        let (oracle, _, rng) = session.search_parts();
        let moves = oracle.legal_moves(position);

        Ok(moves.choose(rng).map(|&mv| Selection {
            mv,
            diagnostics: Diagnostics::Random {
                candidates: moves.len(),
            },
        }))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::StandardChess;
    use chess_core::Position;

    #[test]
    fn test_picks_a_legal_move() {
        let mut session = Session::new(StandardChess, 3);
        let position = Position::new();
        let legal = position.legal_moves();

        for _ in 0..10 {
            let selection = RandomAgent::new()
                .select(&mut session, &position, Color::White)
                .unwrap()
                .unwrap();
            assert!(legal.contains(&selection.mv));
            assert_eq!(selection.diagnostics, Diagnostics::Random { candidates: 20 });
        }
    }

    #[test]
    fn test_no_moves_no_selection() {
        let mut session = Session::new(StandardChess, 3);
        let stalemate = Position::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
        let selection = RandomAgent::new()
            .select(&mut session, &stalemate, Color::Black)
            .unwrap();
        assert!(selection.is_none());
    }
}
