use rand::{
    Rng,
    distr::{Distribution, StandardUniform},
};

/// Direction in which all tiles on the board are pushed.
///
/// The declaration order is also the output order of a policy network: output unit `i`
/// votes for `Direction::ALL[i]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum Direction {
    #[display("up")]
    Up,
    #[display("right")]
    Right,
    #[display("down")]
    Down,
    #[display("left")]
    Left,
}

impl Direction {
    /// Number of directions.
    pub const LEN: usize = 4;

    /// All directions, in output-index order.
    pub const ALL: [Self; Self::LEN] = [Self::Up, Self::Right, Self::Down, Self::Left];

    /// Returns the output index of this direction.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Up => 0,
            Self::Right => 1,
            Self::Down => 2,
            Self::Left => 3,
        }
    }

    /// Returns the direction with the given output index, if any.
    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

/// Uniformly random direction, so that `rng.random::<Direction>()` works.
impl Distribution<Direction> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Direction {
        Direction::ALL[rng.random_range(0..Direction::LEN)]
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;

    #[test]
    fn test_index_roundtrip() {
        for (i, dir) in Direction::ALL.into_iter().enumerate() {
            assert_eq!(dir.index(), i);
            assert_eq!(Direction::from_index(i), Some(dir));
        }
        assert_eq!(Direction::from_index(Direction::LEN), None);
    }

    #[test]
    fn test_random_direction_covers_all() {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut seen = [false; Direction::LEN];
        for _ in 0..200 {
            let dir: Direction = rng.random();
            seen[dir.index()] = true;
        }
        assert!(seen.iter().all(|s| *s), "every direction should be drawn: {seen:?}");
    }
}
