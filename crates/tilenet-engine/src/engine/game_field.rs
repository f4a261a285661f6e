use rand::Rng;

use crate::core::{board::Board, direction::Direction};

use super::GameStats;

/// Outcome of applying a direction to a [`GameField`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum MoveResult {
    /// The board changed; `gained` points were awarded and a new tile was placed.
    Moved { gained: usize },
    /// Nothing could slide or merge; the field is exactly as before.
    Unchanged,
}

/// One game in progress: the board plus the statistics accumulated so far.
///
/// The field is mutated only through `&mut self` methods, and every method that places
/// tiles takes the random generator explicitly.
#[derive(Debug, Clone)]
pub struct GameField {
    board: Board,
    stats: GameStats,
}

impl GameField {
    /// Creates a field with two randomly placed tiles and a zero score.
    #[must_use]
    pub fn new<R>(rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        let mut field = Self::from_board(Board::EMPTY);
        field.reset(rng);
        field
    }

    /// Creates a field starting from an arbitrary board, with a zero score.
    #[must_use]
    pub fn from_board(board: Board) -> Self {
        let mut stats = GameStats::new();
        stats.observe_rank(board.max_rank());
        Self { board, stats }
    }

    /// Restarts the game: empty board, two random tiles, statistics cleared.
    pub fn reset<R>(&mut self, rng: &mut R)
    where
        R: Rng + ?Sized,
    {
        let board = Board::EMPTY
            .with_random_tile(rng)
            .with_random_tile(rng);
        *self = Self::from_board(board);
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    /// Returns the cumulative score of this game.
    #[must_use]
    pub fn score(&self) -> usize {
        self.stats.score()
    }

    /// Pushes all tiles towards `direction`.
    ///
    /// If the board changed, the merge award is added to the score and one new tile is
    /// placed. Otherwise nothing happens and no randomness is consumed.
    pub fn apply<R>(&mut self, direction: Direction, rng: &mut R) -> MoveResult
    where
        R: Rng + ?Sized,
    {
        let (shifted, gained) = self.board.shifted(direction);
        if shifted == self.board {
            return MoveResult::Unchanged;
        }
        self.board = shifted.with_random_tile(rng);
        self.stats.complete_move(gained, self.board.max_rank());
        MoveResult::Moved { gained }
    }

    /// Returns `true` if at least one direction would change the board.
    #[must_use]
    pub fn can_move(&self) -> bool {
        Direction::ALL
            .into_iter()
            .any(|direction| self.board.shifted(direction).0 != self.board)
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;

    #[test]
    fn test_new_field_has_two_tiles() {
        let mut rng = Pcg32::seed_from_u64(11);
        for _ in 0..50 {
            let field = GameField::new(&mut rng);
            let tiles = field.board().cells().filter(|c| *c != 0).count();
            assert_eq!(tiles, 2);
            assert_eq!(field.score(), 0);
            assert_eq!(field.stats().moves(), 0);
        }
    }

    #[test]
    fn test_unchanged_move_leaves_field_untouched() {
        let mut rng = Pcg32::seed_from_u64(5);
        let board = Board::from_rows([[2, 0, 0, 0], [0; 4], [0; 4], [0; 4]]);
        let mut field = GameField::from_board(board);

        assert_eq!(field.apply(Direction::Left, &mut rng), MoveResult::Unchanged);
        assert_eq!(field.apply(Direction::Up, &mut rng), MoveResult::Unchanged);
        assert_eq!(*field.board(), board);
        assert_eq!(field.score(), 0);
        assert_eq!(field.stats().moves(), 0);
    }

    #[test]
    fn test_merge_increases_score_by_merged_value() {
        let mut rng = Pcg32::seed_from_u64(5);
        let board = Board::from_rows([[2, 2, 0, 0], [0; 4], [0; 4], [0; 4]]);
        let mut field = GameField::from_board(board);

        let result = field.apply(Direction::Left, &mut rng);
        assert_eq!(result, MoveResult::Moved { gained: 8 });
        assert_eq!(field.score(), 8);
        assert_eq!(field.board().cell(0, 0), 3);
        // the merged tile plus the newly placed one
        assert_eq!(field.board().cells().filter(|c| *c != 0).count(), 2);
        assert_eq!(field.stats().max_rank(), 3);
    }

    #[test]
    fn test_score_is_monotonic() {
        let mut rng = Pcg32::seed_from_u64(99);
        let mut field = GameField::new(&mut rng);
        let mut last_score = 0;
        for i in 0..500 {
            let direction = Direction::ALL[i % Direction::LEN];
            field.apply(direction, &mut rng);
            assert!(field.score() >= last_score);
            last_score = field.score();
        }
    }

    #[test]
    fn test_can_move() {
        let stuck = Board::from_rows([[1, 2, 1, 2], [2, 1, 2, 1], [1, 2, 1, 2], [2, 1, 2, 1]]);
        assert!(!GameField::from_board(stuck).can_move());

        let mergeable = Board::from_rows([[1, 1, 2, 1], [2, 3, 4, 2], [1, 2, 1, 3], [2, 1, 2, 1]]);
        assert!(GameField::from_board(mergeable).can_move());
    }
}
