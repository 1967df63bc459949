//! Fixed-depth minimax with alpha-beta pruning.

use jump61_core::{Board, Side};
use thiserror::Error;
use tracing::{debug, trace};

use crate::config::SearchConfig;
use crate::eval::static_eval;

/// Errors that can occur while picking a move.
#[derive(Debug, Error)]
pub enum SearchError {
    /// The game is over; there is nothing to search.
    #[error("game already won by {0}")]
    GameOver(Side),
    /// Asked to find a move for a side whose turn it is not.
    #[error("it is not {0}'s turn")]
    OutOfTurn(Side),
    /// The side to move has no legal square.
    #[error("no legal moves available")]
    NoLegalMoves,
}

/// Outcome of one search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchResult {
    /// The chosen square.
    pub square: usize,
    /// Backed-up value of the position, positive favoring Red.
    pub value: i32,
    /// Positions visited, root included.
    pub nodes: u64,
}

/// Value and move backed up from one ply.
struct Reply {
    value: i32,
    square: Option<usize>,
}

/// One fixed-depth search over a private working copy of a board.
///
/// The copy is made once at construction; the search mutates it move by
/// move and rewinds each move on the way back up, so the caller's board is
/// never touched.
pub struct MinimaxSearch {
    work: Board,
    side: Side,
    config: SearchConfig,
    nodes: u64,
}

impl MinimaxSearch {
    /// Prepare a search for `side` on a copy of `board`.
    ///
    /// Fails if the game is already won or it is not `side`'s turn.
    pub fn new(board: &Board, side: Side, config: SearchConfig) -> Result<Self, SearchError> {
        assert!(config.depth >= 1, "search depth must be at least 1");
        if let Some(winner) = board.get_winner() {
            return Err(SearchError::GameOver(winner));
        }
        if board.whose_move() != side {
            return Err(SearchError::OutOfTurn(side));
        }
        Ok(MinimaxSearch {
            work: board.working_copy(),
            side,
            config,
            nodes: 0,
        })
    }

    /// Run the search and return the chosen square.
    pub fn run(&mut self) -> Result<SearchResult, SearchError> {
        self.nodes = 0;
        let reply = self.min_max(self.config.depth, i32::MIN, i32::MAX);
        let square = reply.square.ok_or(SearchError::NoLegalMoves)?;
        debug!(
            side = %self.side,
            square,
            value = reply.value,
            nodes = self.nodes,
            "minimax finished"
        );
        Ok(SearchResult {
            square,
            value: reply.value,
            nodes: self.nodes,
        })
    }

    /// One ply of minimax. Red plies maximize and Blue plies minimize, and
    /// the windows are fail-hard: the running best starts at the window
    /// edge, not at infinity. The first legal square becomes the
    /// provisional move before any recursion, so a move is produced even
    /// when every continuation looks equal; only a strictly better value
    /// replaces it.
    fn min_max(&mut self, depth: u32, mut alpha: i32, mut beta: i32) -> Reply {
        self.nodes += 1;
        if depth == 0 || self.work.get_winner().is_some() {
            return Reply {
                value: static_eval(&self.work),
                square: None,
            };
        }
        let side = self.work.whose_move();
        let maximizing = side == Side::Red;
        let mut best = if maximizing { alpha } else { beta };
        let mut chosen = None;
        for n in 0..self.work.size() * self.work.size() {
            if !self.work.is_legal(side, n) {
                continue;
            }
            if chosen.is_none() {
                chosen = Some(n);
            }
            self.work.add_spot(side, n);
            let reply = self.min_max(depth - 1, alpha, beta);
            self.work.undo();
            if depth == self.config.depth {
                trace!(square = n, value = reply.value, "root candidate");
            }
            if maximizing {
                if reply.value > best {
                    best = reply.value;
                    chosen = Some(n);
                }
                alpha = alpha.max(best);
            } else {
                if reply.value < best {
                    best = reply.value;
                    chosen = Some(n);
                }
                beta = beta.min(best);
            }
            if alpha >= beta {
                break;
            }
        }
        Reply {
            value: best,
            square: chosen,
        }
    }
}

/// Pick a move for `side` on `board`.
pub fn search_for_move(
    board: &Board,
    side: Side,
    config: SearchConfig,
) -> Result<SearchResult, SearchError> {
    MinimaxSearch::new(board, side, config)?.run()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha20Rng;

    // Minimax without pruning, as a reference the pruned search must agree
    // with move for move and value for value.
    fn plain_minimax(board: &mut Board, depth: u32) -> (i32, Option<usize>) {
        if depth == 0 || board.get_winner().is_some() {
            return (static_eval(board), None);
        }
        let side = board.whose_move();
        let maximizing = side == Side::Red;
        let mut best = if maximizing { i32::MIN } else { i32::MAX };
        let mut chosen = None;
        for n in 0..board.size() * board.size() {
            if !board.is_legal(side, n) {
                continue;
            }
            if chosen.is_none() {
                chosen = Some(n);
            }
            board.add_spot(side, n);
            let (value, _) = plain_minimax(board, depth - 1);
            board.undo();
            if maximizing && value > best || !maximizing && value < best {
                best = value;
                chosen = Some(n);
            }
        }
        (best, chosen)
    }

    // Red owns everything but the (3,3) corner and has the (2,3) edge
    // loaded; one more spot there overflows into the corner and wins.
    fn one_move_from_winning() -> Board {
        let mut board = Board::new(3);
        for n in 0..8 {
            board.set(n / 3 + 1, n % 3 + 1, 1, Side::Red);
        }
        board.set(2, 3, 3, Side::Red);
        board.set(3, 3, 1, Side::Blue);
        assert_eq!(board.whose_move(), Side::Red);
        assert_eq!(board.get_winner(), None);
        board
    }

    #[test]
    fn test_finds_the_winning_move() {
        let board = one_move_from_winning();
        let result =
            search_for_move(&board, Side::Red, SearchConfig::new().with_depth(1)).unwrap();
        assert_eq!(result.square, 5); // the loaded (2,3) edge
        assert_eq!(result.value, crate::eval::WIN_VALUE);

        // Deeper searches still see the forced win.
        let result = search_for_move(&board, Side::Red, SearchConfig::default()).unwrap();
        assert_eq!(result.value, crate::eval::WIN_VALUE);
    }

    #[test]
    fn test_first_legal_square_breaks_ties() {
        // Every opening move on an empty board evaluates alike, so the
        // provisional first candidate survives.
        let board = Board::new(2);
        let result =
            search_for_move(&board, Side::Red, SearchConfig::new().with_depth(1)).unwrap();
        assert_eq!(result.square, 0);
        assert_eq!(result.value, 5);
    }

    #[test]
    fn test_matches_plain_minimax_from_the_start() {
        let board = Board::new(2);
        for depth in 1..=4 {
            let config = SearchConfig::new().with_depth(depth);
            let result = search_for_move(&board, Side::Red, config).unwrap();
            let (value, square) = plain_minimax(&mut board.working_copy(), depth);
            assert_eq!(result.value, value, "value at depth {}", depth);
            assert_eq!(Some(result.square), square, "move at depth {}", depth);
        }
    }

    #[test]
    fn test_matches_plain_minimax_on_random_positions() {
        for seed in 0..8u64 {
            let mut rng = ChaCha20Rng::seed_from_u64(seed);
            let mut board = Board::new(3);
            for _ in 0..rng.gen_range(2..6) {
                if board.get_winner().is_some() {
                    break;
                }
                let side = board.whose_move();
                let legal: Vec<usize> = (0..9).filter(|&n| board.is_legal(side, n)).collect();
                board.add_spot(side, legal[rng.gen_range(0..legal.len())]);
            }
            if board.get_winner().is_some() {
                continue;
            }
            let side = board.whose_move();
            for depth in 1..=3 {
                let config = SearchConfig::new().with_depth(depth);
                let result = search_for_move(&board, side, config).unwrap();
                let (value, square) = plain_minimax(&mut board.working_copy(), depth);
                assert_eq!(
                    result.value, value,
                    "value differs (seed {}, depth {})",
                    seed, depth
                );
                assert_eq!(
                    Some(result.square),
                    square,
                    "move differs (seed {}, depth {})",
                    seed, depth
                );
            }
        }
    }

    #[test]
    fn test_search_leaves_the_board_untouched() {
        let mut board = Board::new(3);
        board.add_spot(Side::Blue, 4);
        board.add_spot(Side::Red, 0);
        let snapshot = board.working_copy();

        let side = board.whose_move();
        search_for_move(&board, side, SearchConfig::default()).unwrap();
        assert_eq!(board, snapshot);
        assert_eq!(board.num_pieces(), 2);
    }

    #[test]
    fn test_search_is_deterministic() {
        let mut board = Board::new(3);
        board.add_spot(Side::Blue, 4);
        let first = search_for_move(&board, Side::Red, SearchConfig::default()).unwrap();
        let second = search_for_move(&board, Side::Red, SearchConfig::default()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_node_count_grows_with_depth() {
        let board = Board::new(4);
        let shallow =
            search_for_move(&board, Side::Red, SearchConfig::new().with_depth(1)).unwrap();
        // Root plus one child per square.
        assert_eq!(shallow.nodes, 17);
        let deep = search_for_move(&board, Side::Red, SearchConfig::new().with_depth(3)).unwrap();
        assert!(deep.nodes > shallow.nodes);
    }

    #[test]
    fn test_finished_game_is_an_error() {
        let mut board = Board::new(2);
        for (row, col) in [(1, 1), (1, 2), (2, 1), (2, 2)] {
            board.set(row, col, 1, Side::Red);
        }
        let err = search_for_move(&board, Side::Red, SearchConfig::default()).unwrap_err();
        assert!(matches!(err, SearchError::GameOver(Side::Red)));
    }

    #[test]
    fn test_out_of_turn_is_an_error() {
        let board = Board::new(4);
        let err = search_for_move(&board, Side::Blue, SearchConfig::default()).unwrap_err();
        assert!(matches!(err, SearchError::OutOfTurn(Side::Blue)));
    }

    #[test]
    #[should_panic]
    fn test_zero_depth_is_rejected() {
        let board = Board::new(2);
        let _ = MinimaxSearch::new(&board, Side::Red, SearchConfig { depth: 0 });
    }
}
