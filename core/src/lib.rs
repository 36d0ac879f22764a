//! Standard chess rules: positions, FEN, legal move generation and game end
//! detection.

pub mod board;
pub mod error;
pub mod fen;
pub mod move_gen;
pub mod perft;
pub mod position;
pub mod types;

pub use board::Board;
pub use error::{FenError, MoveParseError, RulesError};
pub use fen::positions;
pub use move_gen::{generate_legal_moves, generate_legal_moves_from};
pub use perft::{perft, perft_detailed, perft_divide, PerftResults};
pub use position::{Outcome, Position, FIFTY_MOVE_LIMIT};
pub use types::*;
