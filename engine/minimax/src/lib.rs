//! Fixed-depth minimax move selection for the jump61 chain-reaction game.
//!
//! Red maximizes and Blue minimizes one signed evaluation scale, so a
//! single routine searches for both sides. The search runs over a private
//! working copy of the caller's board, making and unmaking moves in place,
//! and prunes with fail-hard alpha-beta windows. Ties between equally good
//! moves go to the lowest square index, which keeps the choice
//! deterministic.
//!
//! # Usage
//!
//! ```rust
//! use jump61_core::{Board, Side};
//! use minimax::{search_for_move, SearchConfig};
//!
//! let board = Board::new(4);
//! let result = search_for_move(&board, Side::Red, SearchConfig::default()).unwrap();
//! assert!(board.is_legal(Side::Red, result.square));
//! ```
//!
//! # Architecture
//!
//! - `config`: search settings (look-ahead depth).
//! - `eval`: the static evaluator scoring settled positions.
//! - `search`: the alpha-beta walk itself.
//! - `player`: the `Player` trait a game loop talks to, and the AI player
//!   wrapping the search behind it.

pub mod config;
pub mod eval;
pub mod player;
pub mod search;

pub use config::{SearchConfig, DEFAULT_DEPTH};
pub use eval::{static_eval, WIN_VALUE};
pub use player::{AiPlayer, Player};
pub use search::{search_for_move, MinimaxSearch, SearchError, SearchResult};
