//! Player abstraction over the search.

use std::fmt;

use anyhow::Result;
use jump61_core::{Board, Side};

use crate::config::SearchConfig;
use crate::search::search_for_move;

/// A participant that owns one side of the board and produces moves.
///
/// The game loop holds the authoritative board; a player only reads it and
/// answers with the move to play.
pub trait Player {
    /// The side this player plays.
    fn side(&self) -> Side;

    /// The player's next move on `board`, rendered as "row col".
    fn next_move(&mut self, board: &Board) -> Result<String>;
}

/// Automated player backed by the minimax search.
pub struct AiPlayer {
    side: Side,
    config: SearchConfig,
    reporter: Option<Box<dyn FnMut(usize, usize)>>,
}

impl AiPlayer {
    /// Create a player for `side`, which must be an actual player color.
    pub fn new(side: Side) -> AiPlayer {
        assert!(side != Side::Empty, "a player must be red or blue");
        AiPlayer {
            side,
            config: SearchConfig::default(),
            reporter: None,
        }
    }

    /// Replace the default search settings.
    pub fn with_config(mut self, config: SearchConfig) -> AiPlayer {
        self.config = config;
        self
    }

    /// Install a callback told the chosen (row, col) of every move, the
    /// way a game loop echoes AI moves to the person watching.
    pub fn with_reporter<F>(mut self, reporter: F) -> AiPlayer
    where
        F: FnMut(usize, usize) + 'static,
    {
        self.reporter = Some(Box::new(reporter));
        self
    }
}

impl Player for AiPlayer {
    fn side(&self) -> Side {
        self.side
    }

    fn next_move(&mut self, board: &Board) -> Result<String> {
        let result = search_for_move(board, self.side, self.config)?;
        if let Some(report) = self.reporter.as_mut() {
            report(board.row(result.square), board.col(result.square));
        }
        Ok(board.move_string(result.square))
    }
}

impl fmt::Debug for AiPlayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AiPlayer")
            .field("side", &self.side)
            .field("config", &self.config)
            .field("reporter", &self.reporter.is_some())
            .finish()
    }
}
