//! Session evaluation: playing episodes and turning them into fitness.
//!
//! # Episode Protocol
//!
//! 1. Start a fresh [`GameField`] (two random tiles, score 0)
//! 2. Ask the policy for a direction and apply it
//! 3. Stop according to the policy's [`EpisodeEnd`](crate::policy::EpisodeEnd) rule:
//!    a network policy stops at its first no-op move, the random baseline stops once no
//!    direction can change the board
//! 4. Report the [`GameStats`] of the finished game
//!
//! Every episode terminates: each move that changes the board places a new tile, and the
//! total tile value on a 16-cell board is bounded.
//!
//! # Fitness
//!
//! The fitness of a network is the sum of its scores over a fixed number of episodes
//! ([`DEFAULT_EPISODES`] by default). Tile placement is random, so fitness is a noisy
//! measurement and is recomputed whenever it is needed.
//!
//! # Example
//!
//! ```
//! use rand::SeedableRng as _;
//! use rand_pcg::Pcg32;
//! use tilenet_evaluator::{network::Network, session_evaluator::SessionEvaluator};
//!
//! let mut rng = Pcg32::seed_from_u64(0);
//! let network = Network::random(16, &[4, 4, 4], &mut rng).unwrap();
//! let evaluator = SessionEvaluator::new(3);
//! let fitness = evaluator.fitness(&network, &mut rng).unwrap();
//! # let _ = fitness;
//! ```

use rand::Rng;
use tilenet_engine::{Direction, GameField, GameStats, MoveResult};

use crate::{
    network::Network,
    policy::{NetworkPolicy, Policy, PolicyError, RandomPolicy},
};

/// Number of episodes summed into one fitness value.
pub const DEFAULT_EPISODES: usize = 10;

/// Plays episodes and sums their scores into fitness values.
#[derive(Debug, Clone)]
pub struct SessionEvaluator {
    episodes: usize,
}

impl Default for SessionEvaluator {
    fn default() -> Self {
        Self::new(DEFAULT_EPISODES)
    }
}

impl SessionEvaluator {
    /// Creates an evaluator that plays `episodes` games per fitness evaluation.
    #[must_use]
    pub fn new(episodes: usize) -> Self {
        Self { episodes }
    }

    #[must_use]
    pub fn episodes(&self) -> usize {
        self.episodes
    }

    /// Plays one episode with `policy` and returns its statistics.
    pub fn play_episode<P, R>(&self, policy: &P, rng: &mut R) -> GameStats
    where
        P: Policy + ?Sized,
        R: Rng + ?Sized,
    {
        self.play_episode_observed(policy, rng, |_, _, _| {})
    }

    /// Like [`Self::play_episode`], but calls `on_move` after every applied direction with
    /// the field as it is after the move.
    pub fn play_episode_observed<P, R, F>(
        &self,
        policy: &P,
        rng: &mut R,
        mut on_move: F,
    ) -> GameStats
    where
        P: Policy + ?Sized,
        R: Rng + ?Sized,
        F: FnMut(&GameField, Direction, MoveResult),
    {
        let mut field = GameField::new(rng);
        let end = policy.episode_end();
        loop {
            if end.is_no_legal_move() && !field.can_move() {
                break;
            }
            let direction = policy.select_direction(field.board(), rng);
            let result = field.apply(direction, rng);
            on_move(&field, direction, result);
            if end.is_first_no_op() && result.is_unchanged() {
                break;
            }
        }
        field.stats().clone()
    }

    /// Plays [`Self::episodes`] episodes with `policy`.
    pub fn play_episodes<P, R>(&self, policy: &P, rng: &mut R) -> Vec<GameStats>
    where
        P: Policy + ?Sized,
        R: Rng + ?Sized,
    {
        (0..self.episodes)
            .map(|_| self.play_episode(policy, rng))
            .collect()
    }

    /// Sums the scores of [`Self::episodes`] episodes played by `network`.
    ///
    /// # Errors
    ///
    /// Returns [`PolicyError`] if the network does not map 16 board cells to 4 directions.
    pub fn fitness<R>(&self, network: &Network, rng: &mut R) -> Result<usize, PolicyError>
    where
        R: Rng + ?Sized,
    {
        let policy = NetworkPolicy::new(network)?;
        Ok((0..self.episodes)
            .map(|_| self.play_episode(&policy, rng).score())
            .sum())
    }

    /// Plays one episode with uniformly random moves, as a baseline.
    pub fn play_random_episode<R>(&self, rng: &mut R) -> GameStats
    where
        R: Rng + ?Sized,
    {
        self.play_episode(&RandomPolicy, rng)
    }
}
