//! Game state and statistics.
//!
//! - [`GameField`] - The environment: current board plus cumulative statistics
//! - [`GameStats`] - Score, applied moves and highest rank of one episode
//! - [`MoveResult`] - Whether an applied direction changed the board
//! - [`GameSeed`] - Seed for the deterministic random generator driving a run
//!
//! # Game Flow
//!
//! 1. Create a [`GameField`]; it starts with two random tiles
//! 2. Apply a [`Direction`](crate::Direction); tiles slide and merge
//! 3. If the board changed, one new tile is placed on a random empty cell
//! 4. Repeat until the caller decides the episode is over
//!
//! # Example
//!
//! ```
//! use rand::SeedableRng as _;
//! use rand_pcg::Pcg32;
//! use tilenet_engine::{Direction, GameField};
//!
//! let mut rng = Pcg32::seed_from_u64(1);
//! let mut field = GameField::new(&mut rng);
//!
//! while field.can_move() {
//!     for direction in Direction::ALL {
//!         if field.apply(direction, &mut rng).is_moved() {
//!             break;
//!         }
//!     }
//! }
//! assert!(!field.can_move());
//! ```

pub use self::{game_field::*, game_seed::*, game_stats::*};

mod game_field;
mod game_seed;
mod game_stats;
