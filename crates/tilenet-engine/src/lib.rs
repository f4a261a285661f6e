//! Game engine for the 4×4 tile-merging game.
//!
//! The engine is the environment that evolved networks are scored against:
//!
//! - [`core`] - Board representation, move directions and merge rules
//! - [`engine`] - Game state ([`GameField`]), statistics and seeding
//!
//! All randomness (tile placement) is drawn from a caller-supplied [`rand::Rng`], so a
//! single seeded generator reproduces an entire training run.

pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ParseSeedError {
    #[display("invalid seed length: expected 32 hex characters, got {len}")]
    InvalidLength { len: usize },
    #[display("invalid hex digit in seed: {input}")]
    InvalidDigit { input: String },
}
