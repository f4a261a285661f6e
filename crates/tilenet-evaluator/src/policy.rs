//! Policies: turning a board into a move.
//!
//! - [`NetworkPolicy`] - Feeds the normalized board through a [`Network`] and picks the
//!   direction with the highest output
//! - [`RandomPolicy`] - Picks a uniformly random direction (baseline)
//!
//! # Input Encoding
//!
//! The board is flattened in row-major order and every cell is divided by the highest rank
//! currently on the board (see [`board_inputs`]). Inputs are therefore always in `[0, 1]`,
//! regardless of how far the game has progressed.

use std::fmt;

use rand::Rng;
use tilenet_engine::{Board, Direction};

use crate::network::Network;

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum PolicyError {
    #[display("policy network must take {expected} inputs, got {actual}")]
    InputSize { expected: usize, actual: usize },
    #[display("policy network must produce {expected} outputs, got {actual}")]
    OutputSize { expected: usize, actual: usize },
}

/// How an episode played by a policy is considered finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum EpisodeEnd {
    /// The first direction that leaves the board unchanged ends the episode.
    ///
    /// Required for deterministic policies: an unchanged board would be fed to the policy
    /// again and produce the same no-op forever.
    FirstNoOp,
    /// The episode continues until no direction can change the board.
    NoLegalMove,
}

/// Chooses a direction for the current board.
pub trait Policy: fmt::Debug {
    /// Returns the termination rule for episodes played by this policy.
    fn episode_end(&self) -> EpisodeEnd;

    fn select_direction<R>(&self, board: &Board, rng: &mut R) -> Direction
    where
        R: Rng + ?Sized;
}

/// Encodes a board as network inputs: each cell divided by the highest rank on the board.
///
/// An empty board encodes as all zeros.
///
/// # Example
///
/// ```
/// use tilenet_engine::Board;
/// use tilenet_evaluator::policy::board_inputs;
///
/// let board = Board::from_rows([[2, 0, 0, 0], [0, 4, 0, 0], [0; 4], [0; 4]]);
/// let inputs = board_inputs(&board);
/// assert_eq!(inputs[0], 0.5);
/// assert_eq!(inputs[5], 1.0);
/// assert_eq!(inputs[1], 0.0);
/// ```
#[must_use]
pub fn board_inputs(board: &Board) -> [f32; Board::CELL_COUNT] {
    let mut inputs = [0.0; Board::CELL_COUNT];
    let max_rank = board.max_rank();
    if max_rank == 0 {
        return inputs;
    }
    let max_rank = f32::from(max_rank);
    for (input, cell) in inputs.iter_mut().zip(board.cells()) {
        *input = f32::from(cell) / max_rank;
    }
    inputs
}

/// Returns the direction whose output is the first maximum.
///
/// # Panics
///
/// Panics if `outputs` is not exactly [`Direction::LEN`] long.
#[must_use]
pub fn select_by_outputs(outputs: &[f32]) -> Direction {
    assert_eq!(outputs.len(), Direction::LEN);
    let mut best = 0;
    for (i, value) in outputs.iter().enumerate().skip(1) {
        if *value > outputs[best] {
            best = i;
        }
    }
    Direction::ALL[best]
}

/// Plays by running the board through a network.
#[derive(Debug, Clone, Copy)]
pub struct NetworkPolicy<'a> {
    network: &'a Network,
}

impl<'a> NetworkPolicy<'a> {
    /// Wraps a network that takes one input per board cell and one output per direction.
    pub fn new(network: &'a Network) -> Result<Self, PolicyError> {
        if network.input_size() != Board::CELL_COUNT {
            return Err(PolicyError::InputSize {
                expected: Board::CELL_COUNT,
                actual: network.input_size(),
            });
        }
        if network.output_size() != Direction::LEN {
            return Err(PolicyError::OutputSize {
                expected: Direction::LEN,
                actual: network.output_size(),
            });
        }
        Ok(Self { network })
    }

    #[must_use]
    pub fn network(&self) -> &'a Network {
        self.network
    }
}

impl Policy for NetworkPolicy<'_> {
    fn episode_end(&self) -> EpisodeEnd {
        EpisodeEnd::FirstNoOp
    }

    fn select_direction<R>(&self, board: &Board, _rng: &mut R) -> Direction
    where
        R: Rng + ?Sized,
    {
        let outputs = self.network.forward(&board_inputs(board));
        select_by_outputs(&outputs)
    }
}

/// Plays uniformly random directions until the board is stuck.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomPolicy;

impl Policy for RandomPolicy {
    fn episode_end(&self) -> EpisodeEnd {
        EpisodeEnd::NoLegalMove
    }

    fn select_direction<R>(&self, _board: &Board, rng: &mut R) -> Direction
    where
        R: Rng + ?Sized,
    {
        rng.random()
    }
}
