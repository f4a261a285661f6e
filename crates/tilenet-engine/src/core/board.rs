use std::fmt;

use arrayvec::ArrayVec;
use rand::{Rng, seq::IndexedRandom as _};

use super::direction::Direction;

/// Width and height of the board.
pub const BOARD_SIZE: usize = 4;

/// Probability that a newly placed tile has rank 2 instead of rank 1.
const HIGH_TILE_PROBABILITY: f64 = 0.1;

type Rows = [[u8; BOARD_SIZE]; BOARD_SIZE];
type Line = [u8; BOARD_SIZE];

/// A 4×4 board of tile ranks.
///
/// Each cell holds `0` for an empty cell or a positive rank. Merging two tiles of rank `r`
/// produces a tile of rank `r + 1` and awards `2^(r + 1)` points.
///
/// Boards are small `Copy` values: moves return a new board instead of mutating in place,
/// which makes "did this move change anything" a plain equality check.
///
/// # Example
///
/// ```
/// use tilenet_engine::{Board, Direction};
///
/// let board = Board::from_rows([
///     [1, 1, 0, 0],
///     [0, 0, 0, 0],
///     [0, 0, 0, 0],
///     [0, 0, 0, 0],
/// ]);
/// let (shifted, gained) = board.shifted(Direction::Left);
/// assert_eq!(shifted.cell(0, 0), 2);
/// assert_eq!(gained, 4);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Board {
    rows: Rows,
}

impl Board {
    /// Number of cells on the board (the input width of a policy network).
    pub const CELL_COUNT: usize = BOARD_SIZE * BOARD_SIZE;

    pub const EMPTY: Self = Self {
        rows: [[0; BOARD_SIZE]; BOARD_SIZE],
    };

    #[must_use]
    pub const fn from_rows(rows: Rows) -> Self {
        Self { rows }
    }

    #[must_use]
    pub const fn rows(&self) -> &Rows {
        &self.rows
    }

    /// Returns the rank at column `x`, row `y`.
    #[must_use]
    pub const fn cell(&self, x: usize, y: usize) -> u8 {
        self.rows[y][x]
    }

    /// Iterates over all cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = u8> + '_ {
        self.rows.iter().flatten().copied()
    }

    /// Returns the highest rank on the board (`0` for an empty board).
    #[must_use]
    pub fn max_rank(&self) -> u8 {
        self.cells().max().unwrap_or(0)
    }

    /// Returns the coordinates `(x, y)` of all empty cells in row-major order.
    #[must_use]
    pub fn empty_cells(&self) -> ArrayVec<(usize, usize), { Self::CELL_COUNT }> {
        let mut cells = ArrayVec::new();
        for (y, row) in self.rows.iter().enumerate() {
            for (x, cell) in row.iter().enumerate() {
                if *cell == 0 {
                    cells.push((x, y));
                }
            }
        }
        cells
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.cells().all(|cell| cell != 0)
    }

    /// Pushes every tile towards `direction`, merging equal neighbours.
    ///
    /// Returns the resulting board and the points awarded by the merges. A tile takes part
    /// in at most one merge per move. No new tile is placed here; see
    /// [`Board::with_random_tile`].
    #[must_use]
    pub fn shifted(&self, direction: Direction) -> (Self, usize) {
        let mut result = Self::EMPTY;
        let mut gained = 0;
        for line in 0..BOARD_SIZE {
            let mut values = [0; BOARD_SIZE];
            for (pos, value) in values.iter_mut().enumerate() {
                let (x, y) = line_cell(direction, line, pos);
                *value = self.rows[y][x];
            }
            let (merged, line_gained) = merge_line(values);
            gained += line_gained;
            for (pos, value) in merged.into_iter().enumerate() {
                let (x, y) = line_cell(direction, line, pos);
                result.rows[y][x] = value;
            }
        }
        (result, gained)
    }

    /// Places one new tile on a uniformly random empty cell.
    ///
    /// The tile has rank 1 with probability 0.9 and rank 2 otherwise. A full board is
    /// returned unchanged.
    #[must_use]
    pub fn with_random_tile<R>(&self, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        let empty_cells = self.empty_cells();
        let Some(&(x, y)) = empty_cells.choose(rng) else {
            return *self;
        };
        let rank = if rng.random_bool(HIGH_TILE_PROBABILITY) {
            2
        } else {
            1
        };
        let mut board = *self;
        board.rows[y][x] = rank;
        board
    }
}

/// Renders tile values (`2^rank`), one row per line, `.` for empty cells.
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (y, row) in self.rows.iter().enumerate() {
            if y > 0 {
                writeln!(f)?;
            }
            for (x, rank) in row.iter().enumerate() {
                if x > 0 {
                    write!(f, " ")?;
                }
                if *rank == 0 {
                    write!(f, "{:>5}", ".")?;
                } else {
                    write!(f, "{:>5}", 1_u64 << rank)?;
                }
            }
        }
        Ok(())
    }
}

/// Maps position `pos` along `line` to board coordinates.
///
/// Position 0 is the cell closest to the wall tiles are pushed against.
const fn line_cell(direction: Direction, line: usize, pos: usize) -> (usize, usize) {
    let last = BOARD_SIZE - 1;
    match direction {
        Direction::Left => (pos, line),
        Direction::Right => (last - pos, line),
        Direction::Up => (line, pos),
        Direction::Down => (line, last - pos),
    }
}

/// Compacts a line towards index 0 and merges equal adjacent tiles front to back.
fn merge_line(line: Line) -> (Line, usize) {
    let mut merged = [0; BOARD_SIZE];
    let mut len = 0;
    let mut gained = 0;
    let mut can_merge = false;
    for tile in line.into_iter().filter(|tile| *tile != 0) {
        if can_merge && merged[len - 1] == tile {
            merged[len - 1] = tile + 1;
            gained += 1 << (u32::from(tile) + 1);
            can_merge = false;
        } else {
            merged[len] = tile;
            len += 1;
            can_merge = true;
        }
    }
    (merged, gained)
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;

    #[test]
    fn test_merge_line() {
        assert_eq!(merge_line([0, 0, 0, 0]), ([0, 0, 0, 0], 0));
        assert_eq!(merge_line([0, 0, 0, 3]), ([3, 0, 0, 0], 0));
        assert_eq!(merge_line([1, 0, 1, 0]), ([2, 0, 0, 0], 4));
        assert_eq!(merge_line([1, 1, 2, 0]), ([2, 2, 0, 0], 4));
        assert_eq!(merge_line([2, 1, 1, 0]), ([2, 2, 0, 0], 4));
        assert_eq!(merge_line([1, 1, 1, 1]), ([2, 2, 0, 0], 8));
        assert_eq!(merge_line([1, 1, 1, 0]), ([2, 1, 0, 0], 4));
        assert_eq!(merge_line([3, 3, 2, 2]), ([4, 3, 0, 0], 16 + 8));
        assert_eq!(merge_line([1, 2, 3, 4]), ([1, 2, 3, 4], 0));
    }

    #[test]
    fn test_single_tile_in_corner() {
        let board = Board::from_rows([[1, 0, 0, 0], [0; 4], [0; 4], [0; 4]]);

        assert_eq!(board.shifted(Direction::Left), (board, 0));
        assert_eq!(board.shifted(Direction::Up), (board, 0));

        let (right, gained) = board.shifted(Direction::Right);
        assert_eq!(gained, 0);
        assert_eq!(right.cell(3, 0), 1);
        assert_eq!(right.cells().filter(|c| *c != 0).count(), 1);

        let (down, _) = board.shifted(Direction::Down);
        assert_eq!(down.cell(0, 3), 1);
    }

    #[test]
    fn test_merge_awards_next_power_of_two() {
        for rank in 1..=5_u8 {
            let board = Board::from_rows([[rank, 0, 0, 0], [rank, 0, 0, 0], [0; 4], [0; 4]]);
            let (up, gained) = board.shifted(Direction::Up);
            assert_eq!(gained, 1 << (rank + 1));
            assert_eq!(up.cell(0, 0), rank + 1);
            assert_eq!(up.cell(0, 1), 0);

            // Tiles in different columns do not merge sideways when moving up.
            let (left, gained) = board.shifted(Direction::Left);
            assert_eq!((left, gained), (board, 0));
        }
    }

    #[test]
    fn test_down_and_right_merge_towards_far_wall() {
        let board = Board::from_rows([[0, 0, 0, 0], [2, 2, 2, 0], [0; 4], [0; 4]]);
        let (right, gained) = board.shifted(Direction::Right);
        assert_eq!(right.rows()[1], [0, 0, 2, 3]);
        assert_eq!(gained, 8);

        let (down, gained) = board.shifted(Direction::Down);
        assert_eq!(down.rows()[3], [2, 2, 2, 0]);
        assert_eq!(gained, 0);
    }

    #[test]
    fn test_max_rank_and_empty_cells() {
        let board = Board::from_rows([[1, 0, 0, 0], [0, 5, 0, 0], [0; 4], [0, 0, 0, 2]]);
        assert_eq!(board.max_rank(), 5);
        assert_eq!(board.empty_cells().len(), Board::CELL_COUNT - 3);
        assert!(!board.empty_cells().contains(&(1, 1)));
        assert_eq!(Board::EMPTY.max_rank(), 0);
        assert!(!board.is_full());
    }

    #[test]
    fn test_random_tile_fills_one_empty_cell() {
        let mut rng = Pcg32::seed_from_u64(42);
        for _ in 0..100 {
            let board = Board::EMPTY.with_random_tile(&mut rng);
            let tiles: Vec<_> = board.cells().filter(|c| *c != 0).collect();
            assert_eq!(tiles.len(), 1);
            assert!(tiles[0] == 1 || tiles[0] == 2, "unexpected rank {}", tiles[0]);
        }
    }

    #[test]
    fn test_random_tile_mostly_rank_one() {
        let mut rng = Pcg32::seed_from_u64(3);
        let ones = (0..1000)
            .filter(|_| Board::EMPTY.with_random_tile(&mut rng).max_rank() == 1)
            .count();
        assert!((820..=970).contains(&ones), "rank-1 count {ones}");
    }

    #[test]
    fn test_random_tile_on_full_board() {
        let mut rng = Pcg32::seed_from_u64(0);
        let board = Board::from_rows([[1, 2, 1, 2], [2, 1, 2, 1], [1, 2, 1, 2], [2, 1, 2, 1]]);
        assert!(board.is_full());
        assert_eq!(board.with_random_tile(&mut rng), board);
        for dir in Direction::ALL {
            assert_eq!(board.shifted(dir), (board, 0));
        }
    }

    #[test]
    fn test_display_tile_values() {
        let board = Board::from_rows([[1, 0, 0, 0], [0, 2, 0, 0], [0; 4], [0, 0, 0, 11]]);
        let expected = [
            "    2     .     .     .",
            "    .     4     .     .",
            "    .     .     .     .",
            "    .     .     .  2048",
        ]
        .join("\n");
        assert_eq!(board.to_string(), expected);
    }
}
