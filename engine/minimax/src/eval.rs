//! Static position evaluation.

use jump61_core::{Board, Side};

/// Value of a position Red has already won; Blue's wins score the negation.
pub const WIN_VALUE: i32 = i32::MAX;

const SQUARE_WEIGHT: i32 = 5;
const FULL_SQUARE_BONUS: i32 = 10;

/// Heuristic value of `board` on one signed scale, positive favoring Red.
///
/// A won board scores plus or minus `WIN_VALUE`. Otherwise every owned
/// square is worth 5, plus 10 more once it holds at least as many spots as
/// it has neighbors and is poised to overflow. Squares of both sides add
/// the same positive weights; only the win sentinel separates the players.
pub fn static_eval(board: &Board) -> i32 {
    if let Some(winner) = board.get_winner() {
        return if winner == Side::Red {
            WIN_VALUE
        } else {
            -WIN_VALUE
        };
    }
    let mut value = 0;
    for n in 0..board.size() * board.size() {
        let square = board.square(n);
        if square.side() == Side::Empty {
            continue;
        }
        if square.spots() >= board.neighbors(n) {
            value += FULL_SQUARE_BONUS;
        }
        value += SQUARE_WEIGHT;
    }
    value
}
