//! Rules engine for the jump61 chain-reaction board game.
//!
//! Players alternately add spots to the squares of an N by N grid. A square
//! holding more spots than it has orthogonal neighbors overflows, feeding one
//! spot to each neighbor and capturing the neighbors for the player who
//! overloaded it. Overflows chain until the grid settles, and whoever ends up
//! owning every square wins.
//!
//! The board derives whose turn it is from spot parity, keeps a full undo
//! history of moves, and notifies registered subscribers after every visible
//! change.
//!
//! # Usage
//!
//! ```rust
//! use jump61_core::{Board, Side};
//!
//! let mut board = Board::new(4);
//! assert_eq!(board.whose_move(), Side::Red);
//!
//! let corner = board.sq_num(1, 1);
//! board.add_spot(Side::Red, corner);
//! assert_eq!(board.square(corner).spots(), 1);
//!
//! board.undo();
//! assert_eq!(board.num_pieces(), 0);
//! ```

use std::collections::VecDeque;
use std::fmt;
use std::mem;

/// Board size used when none is given.
pub const DEFAULT_SIZE: usize = 6;

/// Smallest playable board. On a 1x1 grid an overflowing square has nowhere
/// to shed spots, so the game could never settle.
pub const MIN_SIZE: usize = 2;

/// Owner of a square: one of the two players, or nobody.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Red,
    Blue,
    Empty,
}

impl Side {
    /// The opposing player. `Empty` has no opponent and maps to itself.
    pub fn opposite(self) -> Side {
        match self {
            Side::Red => Side::Blue,
            Side::Blue => Side::Red,
            Side::Empty => Side::Empty,
        }
    }

    /// Whether `player` may add a spot to a square owned by `self`.
    pub fn playable_by(self, player: Side) -> bool {
        self == player || self == Side::Empty
    }

    fn letter(self) -> char {
        match self {
            Side::Red => 'r',
            Side::Blue => 'b',
            Side::Empty => '-',
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Side::Red => "red",
            Side::Blue => "blue",
            Side::Empty => "empty",
        };
        f.write_str(name)
    }
}

/// Contents of one square: its owner and its spot count.
///
/// A square has zero spots exactly when it is unowned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Square {
    side: Side,
    spots: u32,
}

impl Square {
    /// An unowned square with no spots.
    pub const EMPTY: Square = Square {
        side: Side::Empty,
        spots: 0,
    };

    /// Build a square, enforcing that only `Side::Empty` carries zero spots.
    pub fn new(side: Side, spots: u32) -> Square {
        assert!(
            (spots == 0) == (side == Side::Empty),
            "invalid square: {} spots owned by {}",
            spots,
            side
        );
        Square { side, spots }
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn spots(&self) -> u32 {
        self.spots
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.spots, self.side.letter())
    }
}

/// Full state of one game: an N by N grid of squares plus the undo history
/// and any change subscribers.
///
/// Squares are addressed either by index `n` in `0..N*N` (row-major) or by
/// 1-based `(row, col)` coordinates.
pub struct Board {
    size: usize,
    grid: Vec<Square>,
    history: Vec<Vec<Square>>,
    subscribers: Vec<Box<dyn FnMut(&Board)>>,
    work_queue: VecDeque<usize>,
}

impl Board {
    /// Create an empty `size` x `size` board.
    ///
    /// Panics if `size` is below `MIN_SIZE`.
    pub fn new(size: usize) -> Board {
        assert!(
            size >= MIN_SIZE,
            "board size must be at least {}, got {}",
            MIN_SIZE,
            size
        );
        Board {
            size,
            grid: vec![Square::EMPTY; size * size],
            history: Vec::new(),
            subscribers: Vec::new(),
            work_queue: VecDeque::new(),
        }
    }

    /// A disposable copy with the same contents but a fresh undo history and
    /// no subscribers. Made for search engines that mutate and rewind.
    pub fn working_copy(&self) -> Board {
        let mut copy = Board::new(self.size);
        copy.grid.copy_from_slice(&self.grid);
        copy
    }

    /// Replace this board's contents with `other`'s. Sizes must match. The
    /// undo history and subscribers of `self` are left untouched.
    pub fn copy_from(&mut self, other: &Board) {
        assert_eq!(
            self.size, other.size,
            "cannot copy between boards of different sizes"
        );
        self.grid.copy_from_slice(&other.grid);
    }

    /// Reset to an empty `size` x `size` board, discarding the undo history.
    pub fn clear(&mut self, size: usize) {
        assert!(
            size >= MIN_SIZE,
            "board size must be at least {}, got {}",
            MIN_SIZE,
            size
        );
        self.size = size;
        self.grid.clear();
        self.grid.resize(size * size, Square::EMPTY);
        self.history.clear();
        self.work_queue.clear();
        self.announce();
    }

    /// Number of rows (and columns).
    pub fn size(&self) -> usize {
        self.size
    }

    /// Index of the square at `(row, col)`, both 1-based.
    pub fn sq_num(&self, row: usize, col: usize) -> usize {
        (row - 1) * self.size + (col - 1)
    }

    /// 1-based row of square `n`.
    pub fn row(&self, n: usize) -> usize {
        n / self.size + 1
    }

    /// 1-based column of square `n`.
    pub fn col(&self, n: usize) -> usize {
        n % self.size + 1
    }

    /// Whether `(row, col)` denotes a square on this board.
    pub fn exists(&self, row: usize, col: usize) -> bool {
        1 <= row && row <= self.size && 1 <= col && col <= self.size
    }

    /// Contents of square `n`.
    pub fn square(&self, n: usize) -> Square {
        self.grid[n]
    }

    /// Number of orthogonal neighbors of square `n`: 2 in a corner, 3 on an
    /// edge, 4 in the interior. A square overflows when its spots exceed
    /// this count.
    pub fn neighbors(&self, n: usize) -> u32 {
        let row = self.row(n);
        let col = self.col(n);
        let mut count = 4;
        if row == 1 {
            count -= 1;
        }
        if row == self.size {
            count -= 1;
        }
        if col == 1 {
            count -= 1;
        }
        if col == self.size {
            count -= 1;
        }
        count
    }

    /// Total number of spots on the board.
    pub fn num_pieces(&self) -> u32 {
        self.grid.iter().map(|sq| sq.spots()).sum()
    }

    /// Number of squares owned by `side`.
    pub fn num_of_side(&self, side: Side) -> usize {
        self.grid.iter().filter(|sq| sq.side() == side).count()
    }

    /// The player whose turn it is. Spot parity decides: every move adds
    /// exactly one spot, so no separate turn marker is stored. If the game
    /// is already won this nominally names the loser; check `get_winner`
    /// first.
    pub fn whose_move(&self) -> Side {
        if (self.num_pieces() as usize + self.size) % 2 == 0 {
            Side::Red
        } else {
            Side::Blue
        }
    }

    /// Whether `side` may currently add a spot to square `n`: it must be
    /// `side`'s turn, `n` must be on the board, and the target square must
    /// be unowned or owned by `side`.
    pub fn is_legal(&self, side: Side, n: usize) -> bool {
        self.whose_move() == side
            && n < self.grid.len()
            && self.square(n).side().playable_by(side)
    }

    /// The side owning every square, if any.
    pub fn get_winner(&self) -> Option<Side> {
        for side in [Side::Red, Side::Blue] {
            if self.num_of_side(side) == self.size * self.size {
                return Some(side);
            }
        }
        None
    }

    /// Add one spot for `side` to square `n` and settle any chain reaction.
    ///
    /// The move must be legal; an illegal move is a caller bug and panics.
    /// The pre-move grid is pushed onto the undo history first, so even a
    /// move played after the game is won (which changes nothing) can be
    /// undone. Subscribers are notified once the board has settled.
    pub fn add_spot(&mut self, side: Side, n: usize) {
        assert!(
            self.is_legal(side, n),
            "illegal move: {} at square {}",
            side,
            n
        );
        self.history.push(self.grid.clone());
        if self.get_winner().is_none() {
            let spots = self.grid[n].spots();
            self.grid[n] = Square::new(side, spots + 1);
            self.resolve(n);
        }
        self.announce();
    }

    /// `add_spot` addressed by 1-based `(row, col)`.
    pub fn add_spot_rc(&mut self, side: Side, row: usize, col: usize) {
        let n = self.sq_num(row, col);
        self.add_spot(side, n);
    }

    /// Put `spots` spots owned by `side` directly on `(row, col)`, bypassing
    /// legality and chain reactions. Zero spots empties the square whatever
    /// `side` says. Meant for setting up positions; no undo snapshot is
    /// taken, so `undo` rewinds past it to the last real move.
    pub fn set(&mut self, row: usize, col: usize, spots: u32, side: Side) {
        let n = self.sq_num(row, col);
        self.grid[n] = if spots == 0 {
            Square::EMPTY
        } else {
            Square::new(side, spots)
        };
        self.announce();
    }

    /// Rewind the most recent `add_spot`. Panics if there is nothing to
    /// undo. Subscribers are not notified.
    pub fn undo(&mut self) {
        let grid = self.history.pop().expect("no move to undo");
        self.grid = grid;
    }

    /// Register `notify` to be called after every visible change. The new
    /// subscriber set is immediately told the current state.
    pub fn subscribe<F>(&mut self, notify: F)
    where
        F: FnMut(&Board) + 'static,
    {
        self.subscribers.push(Box::new(notify));
        self.announce();
    }

    /// Drop all subscribers.
    pub fn clear_subscribers(&mut self) {
        self.subscribers.clear();
    }

    /// The move placing a spot on square `n`, rendered as "row col".
    pub fn move_string(&self, n: usize) -> String {
        format!("{} {}", self.row(n), self.col(n))
    }

    /// Human-readable rendition with row and column numbers, derived from
    /// the dumped form. Distinct from `Display`, which is the machine
    /// format.
    pub fn display_string(&self) -> String {
        let dump = self.to_string();
        let lines: Vec<&str> = dump.trim().lines().collect();
        let mut out = String::new();
        for row in 1..=self.size {
            out.push_str(&format!("{:2} {}\n", row, lines[row].trim()));
        }
        out.push_str("  ");
        for col in 1..=self.size {
            out.push_str(&format!("{:3}", col));
        }
        out
    }

    /// Fire overfull squares until the grid is stable or the game is won.
    ///
    /// A firing square keeps `spots - capacity` and feeds one spot to each
    /// orthogonal neighbor, capturing the neighbor for the firing side.
    /// Squares are processed from a queue in arrival order; pending work is
    /// abandoned the moment one side owns every square, so a finished board
    /// may legitimately hold an overfull square.
    fn resolve(&mut self, start: usize) {
        self.work_queue.push_back(start);
        while let Some(n) = self.work_queue.pop_front() {
            if self.get_winner().is_some() {
                self.work_queue.clear();
                return;
            }
            let capacity = self.neighbors(n);
            let spots = self.grid[n].spots();
            if spots <= capacity {
                continue;
            }
            let side = self.grid[n].side();
            let remaining = spots - capacity;
            self.grid[n] = Square::new(side, remaining);
            let row = self.row(n);
            let col = self.col(n);
            if row > 1 {
                self.spill(side, n - self.size);
            }
            if row < self.size {
                self.spill(side, n + self.size);
            }
            if col > 1 {
                self.spill(side, n - 1);
            }
            if col < self.size {
                self.spill(side, n + 1);
            }
            if remaining > capacity {
                self.work_queue.push_back(n);
            }
        }
    }

    /// Feed one spot of `side` into square `n` and queue it for settling.
    fn spill(&mut self, side: Side, n: usize) {
        let spots = self.grid[n].spots();
        self.grid[n] = Square::new(side, spots + 1);
        self.work_queue.push_back(n);
    }

    fn announce(&mut self) {
        let mut subscribers = mem::take(&mut self.subscribers);
        for notify in subscribers.iter_mut() {
            notify(self);
        }
        self.subscribers = subscribers;
    }
}

impl Default for Board {
    fn default() -> Board {
        Board::new(DEFAULT_SIZE)
    }
}

/// Boards compare by size and grid contents; undo history and subscribers
/// do not count.
impl PartialEq for Board {
    fn eq(&self, other: &Board) -> bool {
        self.size == other.size && self.grid == other.grid
    }
}

impl Eq for Board {}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Board")
            .field("size", &self.size)
            .field("grid", &self.grid)
            .field("history", &self.history.len())
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

/// The dumped machine format: `===` markers around one indented line per
/// row, each square as `<spots><letter>` with `r`, `b` or `-` for the
/// owner.
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "===")?;
        for row in 1..=self.size {
            write!(f, "    ")?;
            for col in 1..=self.size {
                write!(f, "{} ", self.grid[self.sq_num(row, col)])?;
            }
            writeln!(f)?;
        }
        writeln!(f, "===")
    }
}
