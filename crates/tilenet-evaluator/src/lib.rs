//! Policy networks and their evaluation against the game engine.
//!
//! This crate implements the three lower levels of the system:
//!
//! 1. **Networks** ([`network`]) - Feed-forward networks whose weight vectors live on the
//!    probability simplex, together with the simplex sampler used to initialize them.
//!
//! 2. **Policies** ([`policy`]) - Turn a board into a move: normalize the cells, run the
//!    network, pick the direction with the highest output.
//!
//! 3. **Session Evaluation** ([`session_evaluator`]) - Play whole episodes against
//!    [`tilenet_engine::GameField`] and sum their scores into a fitness value.
//!
//! # Architecture
//!
//! ```text
//! Session Evaluation (fitness for training)
//!     ↓ plays episodes with
//! Policy (board → direction)
//!     ↓ uses
//! Network (inputs → outputs)
//! ```
//!
//! The training crate (`tilenet-training`) evolves networks using the fitness values
//! computed here.
//!
//! # Current Limitations
//!
//! - **Linear model**: Outputs are convex combinations of the inputs; without activations
//!   the whole network collapses to a single stochastic matrix.
//! - **No lookahead**: The policy only sees the current board, never the outcome of a move.
//! - **Immediate no-op ends the episode**: A network that picks an impossible direction
//!   loses the rest of the game even if other directions were still available.

pub mod network;
pub mod policy;
pub mod session_evaluator;
