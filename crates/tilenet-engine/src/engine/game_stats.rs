/// Statistics of a single episode.
///
/// - **Score**: Sum of merge awards (`2^(r + 1)` for each merge of two rank-`r` tiles)
/// - **Moves**: Number of applied directions that changed the board
/// - **Max rank**: Highest tile rank seen on the board
///
/// # Example
///
/// ```
/// use tilenet_engine::GameStats;
///
/// let mut stats = GameStats::new();
/// stats.complete_move(8, 3);
/// stats.complete_move(0, 2);
///
/// assert_eq!(stats.score(), 8);
/// assert_eq!(stats.moves(), 2);
/// assert_eq!(stats.max_rank(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameStats {
    score: usize,
    moves: usize,
    max_rank: u8,
}

impl Default for GameStats {
    fn default() -> Self {
        Self::new()
    }
}

impl GameStats {
    /// Creates a new statistics tracker with all counters at zero.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            score: 0,
            moves: 0,
            max_rank: 0,
        }
    }

    /// Returns the cumulative score. Never decreases within an episode.
    #[must_use]
    pub const fn score(&self) -> usize {
        self.score
    }

    #[must_use]
    pub const fn moves(&self) -> usize {
        self.moves
    }

    #[must_use]
    pub const fn max_rank(&self) -> u8 {
        self.max_rank
    }

    /// Records the highest rank currently on the board without counting a move.
    pub const fn observe_rank(&mut self, rank: u8) {
        if rank > self.max_rank {
            self.max_rank = rank;
        }
    }

    /// Updates statistics after a move that changed the board.
    ///
    /// # Arguments
    ///
    /// * `gained` - Points awarded by the merges of this move
    /// * `max_rank` - Highest rank on the board after the move
    pub const fn complete_move(&mut self, gained: usize, max_rank: u8) {
        self.moves += 1;
        self.score += gained;
        self.observe_rank(max_rank);
    }
}
