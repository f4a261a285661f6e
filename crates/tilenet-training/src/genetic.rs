//! Rank-biased selection and regeneration of network populations.
//!
//! # Algorithm Overview
//!
//! One generation proceeds as follows:
//!
//! 1. **Rank** - Every network plays [`SessionEvaluator::episodes`] games; the summed score
//!    is its fitness for this generation. Networks are sorted ascending (worst first).
//! 2. **Cull** - Half of the population is removed one at a time. Each removal draws an
//!    index from a [`triangular`] distribution over the remaining candidates, so weak
//!    networks are removed more often, but a weak network can survive and a strong one can
//!    be removed.
//! 3. **Clone & Mutate** - Each survivor is deep-copied and the copy is mutated with
//!    [`Mutator`].
//! 4. **Reassemble** - The next generation is the survivors (unchanged, in rank order)
//!    followed by their mutated copies, so the population size is preserved.
//!
//! # Key Components
//!
//! - [`Population`] - Networks of one generation, not yet evaluated
//! - [`RankedPopulation`] - Networks paired with this generation's fitness, sorted ascending
//! - [`PopulationEvolver`] - Cull, clone and mutate a ranked population
//!
//! # Fitness Is Never Carried Over
//!
//! Fitness is noisy (tile placement is random). A [`RankedPopulation`] is consumed by
//! [`PopulationEvolver::evolve`], and the resulting [`Population`] holds bare networks, so
//! the next generation always measures fitness afresh, including for survivors.
//!
//! # Example
//!
//! ```
//! use rand::SeedableRng as _;
//! use rand_pcg::Pcg32;
//! use tilenet_evaluator::session_evaluator::SessionEvaluator;
//! use tilenet_training::genetic::{Population, PopulationEvolver};
//!
//! let mut rng = Pcg32::seed_from_u64(0);
//! let mut population = Population::random(16, &[4, 4, 4], 8, &mut rng).unwrap();
//! let evaluator = SessionEvaluator::new(1);
//! let evolver = PopulationEvolver::new(0.1).unwrap();
//!
//! for _generation in 0..3 {
//!     let ranked = population.rank(&evaluator, &mut rng).unwrap();
//!     population = evolver.evolve(ranked, &mut rng).unwrap();
//! }
//! assert_eq!(population.len(), 8);
//! ```

use rand::Rng;
use tilenet_evaluator::{network::Network, session_evaluator::SessionEvaluator};

use crate::{TrainingError, mutation::Mutator, stats::FitnessStats};

/// A network together with the fitness it scored in the current generation.
#[derive(Debug, Clone)]
pub struct Individual {
    network: Network,
    fitness: usize,
}

impl Individual {
    #[must_use]
    pub fn network(&self) -> &Network {
        &self.network
    }

    /// Sum of episode scores measured for this generation.
    #[must_use]
    pub fn fitness(&self) -> usize {
        self.fitness
    }

    #[must_use]
    pub fn into_network(self) -> Network {
        self.network
    }
}

/// The networks of one generation.
#[derive(Debug, Clone, PartialEq)]
pub struct Population {
    networks: Vec<Network>,
}

impl Population {
    /// Creates `count` networks with randomly sampled weights.
    ///
    /// # Arguments
    ///
    /// * `input_size` - Number of network inputs
    /// * `layer_sizes` - Number of units of each layer
    /// * `count` - Number of networks in the population
    /// * `rng` - Random number generator
    pub fn random<R>(
        input_size: usize,
        layer_sizes: &[usize],
        count: usize,
        rng: &mut R,
    ) -> Result<Self, TrainingError>
    where
        R: Rng + ?Sized,
    {
        let networks = (0..count)
            .map(|_| Network::random(input_size, layer_sizes, rng))
            .collect::<Result<_, _>>()?;
        Ok(Self { networks })
    }

    #[must_use]
    pub fn from_networks(networks: Vec<Network>) -> Self {
        Self { networks }
    }

    #[must_use]
    pub fn networks(&self) -> &[Network] {
        &self.networks
    }

    #[must_use]
    pub fn into_networks(self) -> Vec<Network> {
        self.networks
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.networks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.networks.is_empty()
    }

    /// Measures the fitness of every network once and sorts ascending (worst first).
    ///
    /// The sort is stable: networks with equal fitness keep their population order.
    pub fn rank<R>(
        self,
        evaluator: &SessionEvaluator,
        rng: &mut R,
    ) -> Result<RankedPopulation, TrainingError>
    where
        R: Rng + ?Sized,
    {
        let mut individuals = self
            .networks
            .into_iter()
            .map(|network| {
                let fitness = evaluator.fitness(&network, rng)?;
                Ok::<_, TrainingError>(Individual { network, fitness })
            })
            .collect::<Result<Vec<_>, _>>()?;
        individuals.sort_by_key(Individual::fitness);
        Ok(RankedPopulation { individuals })
    }
}

/// A population sorted by this generation's fitness, ascending.
#[derive(Debug, Clone)]
pub struct RankedPopulation {
    individuals: Vec<Individual>,
}

impl RankedPopulation {
    /// Returns the individuals, worst first.
    #[must_use]
    pub fn individuals(&self) -> &[Individual] {
        &self.individuals
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.individuals.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.individuals.is_empty()
    }

    /// Returns the individual with the highest fitness.
    #[must_use]
    pub fn best(&self) -> Option<&Individual> {
        self.individuals.last()
    }

    /// Returns the individual with the lowest fitness.
    #[must_use]
    pub fn worst(&self) -> Option<&Individual> {
        self.individuals.first()
    }

    /// Computes fitness statistics for the whole generation.
    ///
    /// Returns `None` for an empty population.
    #[must_use]
    pub fn compute_fitness_stats(&self) -> Option<FitnessStats> {
        let fitness = self
            .individuals
            .iter()
            .map(Individual::fitness)
            .collect::<Vec<_>>();
        FitnessStats::from_sorted(&fitness)
    }

    /// Drops the fitness values, keeping the networks in rank order.
    #[must_use]
    pub fn into_population(self) -> Population {
        Population {
            networks: self
                .individuals
                .into_iter()
                .map(Individual::into_network)
                .collect(),
        }
    }
}

/// Produces the next generation from a ranked one.
#[derive(Debug, Clone)]
pub struct PopulationEvolver {
    mutator: Mutator,
}

impl PopulationEvolver {
    /// Creates an evolver whose offspring mutations move at most `adjust_max` per weight
    /// vector.
    pub fn new(adjust_max: f32) -> Result<Self, TrainingError> {
        Ok(Self {
            mutator: Mutator::new(adjust_max)?,
        })
    }

    #[must_use]
    pub fn mutator(&self) -> &Mutator {
        &self.mutator
    }

    /// Culls half of `ranked`, then appends a mutated copy of every survivor.
    ///
    /// The result has the same size as the input.
    ///
    /// # Returns
    ///
    /// The survivors in rank order, followed by their mutated clones in the same order.
    ///
    /// # Errors
    ///
    /// Returns [`TrainingError::InvalidConfiguration`] if `ranked` has an odd number of
    /// individuals, since halving and doubling it would not preserve its size.
    pub fn evolve<R>(
        &self,
        ranked: RankedPopulation,
        rng: &mut R,
    ) -> Result<Population, TrainingError>
    where
        R: Rng + ?Sized,
    {
        if ranked.len() % 2 != 0 {
            return Err(TrainingError::invalid_configuration(format!(
                "population size must be even, got {}",
                ranked.len()
            )));
        }
        let cull_count = ranked.len() / 2;
        let mut survivors = ranked.individuals;
        cull(&mut survivors, cull_count, rng)?;

        let mut networks = survivors
            .into_iter()
            .map(Individual::into_network)
            .collect::<Vec<_>>();
        let offspring = networks
            .iter()
            .map(|network| {
                let mut child = network.clone();
                self.mutator.mutate(&mut child, rng);
                child
            })
            .collect::<Vec<_>>();
        networks.extend(offspring);

        Ok(Population { networks })
    }
}

/// Draws an index in `0..n`, skewed towards 0.
///
/// First draws `a` uniformly from `0..n`, then returns a uniform draw from `0..=a`. Index
/// `k` is drawn with probability `(1/n) * Σ_{a=k}^{n-1} 1/(a+1)`.
///
/// # Panics
///
/// Panics if `n` is 0.
pub fn triangular<R>(n: usize, rng: &mut R) -> usize
where
    R: Rng + ?Sized,
{
    assert!(n > 0, "cannot draw from an empty range");
    let a = rng.random_range(0..n);
    rng.random_range(0..=a)
}

/// Removes `count` items from `ranked`, each at a [`triangular`] index over the items
/// still remaining.
///
/// `ranked` must be sorted worst first, so that the removals are biased towards weak
/// items. The relative order of the remaining items is preserved.
///
/// # Errors
///
/// Returns [`TrainingError::InvalidConfiguration`] if `count` exceeds `ranked.len()`.
pub fn cull<T, R>(ranked: &mut Vec<T>, count: usize, rng: &mut R) -> Result<(), TrainingError>
where
    R: Rng + ?Sized,
{
    if count > ranked.len() {
        return Err(TrainingError::invalid_configuration(format!(
            "cannot cull {count} individuals from a population of {}",
            ranked.len()
        )));
    }
    for _ in 0..count {
        let index = triangular(ranked.len(), rng);
        ranked.remove(index);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;

    #[test]
    fn test_triangular_single_candidate() {
        let mut rng = Pcg32::seed_from_u64(1);
        for _ in 0..100 {
            assert_eq!(triangular(1, &mut rng), 0);
        }
    }

    #[test]
    fn test_triangular_skewed_towards_zero() {
        let mut rng = Pcg32::seed_from_u64(2);
        let n = 10;
        let mut counts = vec![0_usize; n];
        for _ in 0..20_000 {
            let index = triangular(n, &mut rng);
            assert!(index < n);
            counts[index] += 1;
        }
        assert!(counts[0] > counts[n / 2], "{counts:?}");
        assert!(counts[n / 2] > counts[n - 1], "{counts:?}");
        // P(0) = H(10) / 10 ≈ 0.293
        assert!((5400..=6300).contains(&counts[0]), "{counts:?}");
    }

    #[test]
    fn test_cull_removes_count() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut items = (0..10).collect::<Vec<_>>();
        cull(&mut items, 5, &mut rng).unwrap();
        assert_eq!(items.len(), 5);
        assert!(items.is_sorted(), "order must be preserved: {items:?}");

        let mut all = vec![1, 2, 3];
        cull(&mut all, 3, &mut rng).unwrap();
        assert!(all.is_empty());
    }

    #[test]
    fn test_cull_rejects_too_many() {
        let mut rng = Pcg32::seed_from_u64(4);
        let mut items = vec![1, 2, 3];
        assert!(matches!(
            cull(&mut items, 4, &mut rng),
            Err(TrainingError::InvalidConfiguration { .. })
        ));
        assert_eq!(items, vec![1, 2, 3]);
    }

    #[test]
    fn test_cull_favours_strong_items() {
        let mut rng = Pcg32::seed_from_u64(5);
        let mut survived = [0_usize; 10];
        for _ in 0..2000 {
            let mut items = (0..10).collect::<Vec<_>>();
            cull(&mut items, 5, &mut rng).unwrap();
            for item in items {
                survived[item] += 1;
            }
        }
        assert!(survived[9] > survived[0], "{survived:?}");
        // Neither extreme is deterministic.
        assert!(survived[0] > 0, "{survived:?}");
        assert!(survived[9] < 2000, "{survived:?}");
    }

    #[test]
    fn test_rank_sorts_ascending() {
        let mut rng = Pcg32::seed_from_u64(6);
        let population = Population::random(16, &[4, 4, 4], 10, &mut rng).unwrap();
        let ranked = population.rank(&SessionEvaluator::new(2), &mut rng).unwrap();
        assert_eq!(ranked.len(), 10);
        assert!(
            ranked
                .individuals()
                .is_sorted_by_key(Individual::fitness)
        );
        let stats = ranked.compute_fitness_stats().unwrap();
        assert_eq!(stats.min, ranked.worst().unwrap().fitness());
        assert_eq!(stats.max, ranked.best().unwrap().fitness());
    }

    #[test]
    fn test_rank_rejects_non_policy_networks() {
        let mut rng = Pcg32::seed_from_u64(7);
        let population = Population::random(16, &[3], 4, &mut rng).unwrap();
        assert!(matches!(
            population.rank(&SessionEvaluator::new(1), &mut rng),
            Err(TrainingError::Policy { .. })
        ));
    }

    #[test]
    fn test_evolve_preserves_size_and_survivors() {
        let mut rng = Pcg32::seed_from_u64(8);
        let population = Population::random(16, &[4, 4, 4], 10, &mut rng).unwrap();
        let ranked = population.rank(&SessionEvaluator::new(1), &mut rng).unwrap();
        let ranked_networks = ranked
            .individuals()
            .iter()
            .map(|ind| ind.network().clone())
            .collect::<Vec<_>>();

        let evolver = PopulationEvolver::new(0.1).unwrap();
        let next = evolver.evolve(ranked, &mut rng).unwrap();
        assert_eq!(next.len(), 10);

        let (survivors, offspring) = next.networks().split_at(5);
        for survivor in survivors {
            assert!(ranked_networks.contains(survivor), "survivors are unmutated");
        }
        for (parent, child) in survivors.iter().zip(offspring) {
            assert_ne!(parent, child, "offspring are mutated");
            assert_eq!(parent.layer_sizes(), child.layer_sizes());
            for (p, c) in parent.weight_vectors().zip(child.weight_vectors()) {
                assert!((p.sum() - c.sum()).abs() < 1e-5);
            }
        }
    }

    #[test]
    fn test_evolve_empty_population() {
        let mut rng = Pcg32::seed_from_u64(9);
        let ranked = Population::from_networks(vec![])
            .rank(&SessionEvaluator::new(1), &mut rng)
            .unwrap();
        let next = PopulationEvolver::new(0.1)
            .unwrap()
            .evolve(ranked, &mut rng)
            .unwrap();
        assert!(next.is_empty());
    }

    #[test]
    fn test_evolve_rejects_odd_population() {
        let mut rng = Pcg32::seed_from_u64(10);
        let ranked = Population::random(16, &[4, 4, 4], 5, &mut rng)
            .unwrap()
            .rank(&SessionEvaluator::new(1), &mut rng)
            .unwrap();
        let result = PopulationEvolver::new(0.1)
            .unwrap()
            .evolve(ranked, &mut rng);
        assert!(matches!(
            result,
            Err(TrainingError::InvalidConfiguration { .. })
        ));
    }
}
