//! Evolutionary training of simplex-weighted policy networks.
//!
//! Networks are never trained by gradients. A population of randomly initialized networks
//! is repeatedly ranked by how well they play, culled with a bias against weak networks,
//! and refilled with mutated copies of the survivors.
//!
//! # How Training Works
//!
//! 1. **Population** - Create `N` networks with random weights on the simplex
//! 2. **Evaluation** - Each network plays several episodes; the summed score is its fitness
//! 3. **Ranking** - Sort the population by fitness, worst first
//! 4. **Culling** - Remove `N/2` networks, each chosen by a triangular draw skewed towards
//!    the weak end
//! 5. **Reproduction** - Clone every survivor and mutate the clone by moving a little
//!    weight mass between two slots of each weight vector
//! 6. **Repeat** - Continue for a fixed number of generations
//!
//! # Architecture
//!
//! ```text
//! EvolutionParams
//!     ↓ validated by
//! evolution::evolve
//!     ↓ drives
//! Population ──rank──→ RankedPopulation ──evolve──→ Population
//!     ↑ fitness from                 ↑ offspring from
//! SessionEvaluator (tilenet-evaluator)   Mutator
//! ```
//!
//! # Modules
//!
//! - [`params`] - Training parameters and their validation
//! - [`evolution`] - The generation loop
//! - [`genetic`] - Ranking, culling and regeneration of one generation
//! - [`mutation`] - The simplex-preserving mutation operator
//! - [`stats`] - Per-generation fitness summaries
//!
//! # Example
//!
//! ```
//! use rand::SeedableRng as _;
//! use rand_pcg::Pcg32;
//! use tilenet_training::{evolution, params::EvolutionParams};
//!
//! let params = EvolutionParams {
//!     population_size: 6,
//!     generations: 2,
//!     episodes: 1,
//!     ..EvolutionParams::default()
//! };
//! let mut rng = Pcg32::seed_from_u64(42);
//! let population = evolution::evolve(&params, &mut rng, |generation, ranked| {
//!     let best = ranked.best().map(|ind| ind.fitness());
//!     println!("generation {generation}: best fitness {best:?}");
//! })
//! .unwrap();
//! assert_eq!(population.len(), 6);
//! ```
//!
//! # Current Limitations
//!
//! - **No crossover**: offspring differ from their parent by mutation only
//! - **Noisy selection**: fitness is a sum over a handful of random episodes, so ranking
//!   between similar networks is largely luck
//! - **Sequential**: networks are evaluated one after another on a single random stream

use tilenet_evaluator::{network::NetworkError, policy::PolicyError};

pub mod evolution;
pub mod genetic;
pub mod mutation;
pub mod params;
pub mod stats;

#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum TrainingError {
    #[display("invalid configuration: {reason}")]
    InvalidConfiguration { reason: String },
    #[display("invalid network")]
    Network { source: NetworkError },
    #[display("network cannot be used as a policy")]
    Policy { source: PolicyError },
}

impl TrainingError {
    pub fn invalid_configuration(reason: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            reason: reason.into(),
        }
    }
}

impl From<NetworkError> for TrainingError {
    fn from(source: NetworkError) -> Self {
        Self::Network { source }
    }
}

impl From<PolicyError> for TrainingError {
    fn from(source: PolicyError) -> Self {
        Self::Policy { source }
    }
}
