//! Mutation operator for simplex-weighted networks.
//!
//! A mutation moves a small amount of weight "mass" between two slots of every weight
//! vector of a network:
//!
//! 1. Pick two distinct slots with [`pick_2`]: one that gains mass, one that loses it
//! 2. Draw an amount uniformly from `[0, adjust_max)`
//! 3. Move that amount, or everything the losing slot holds if it holds less
//!
//! Because mass only moves between slots and never goes below zero, the simplex invariant
//! of [`WeightVector`](tilenet_evaluator::network::WeightVector) holds after any number of
//! mutations. The change per call is small and local; a mutation is never a
//! re-initialization.

use rand::Rng;
use rand_distr::Uniform;
use tilenet_evaluator::network::Network;

use crate::TrainingError;

/// Default upper bound (exclusive) for the mass moved per weight vector.
pub const DEFAULT_ADJUST_MAX: f32 = 0.1;

/// Picks two distinct indices in `0..n`, uniformly among all ordered pairs.
///
/// Returns `None` if `n < 2`.
///
/// # Example
///
/// ```
/// use rand::SeedableRng as _;
/// use rand_pcg::Pcg32;
/// use tilenet_training::mutation::pick_2;
///
/// let mut rng = Pcg32::seed_from_u64(0);
/// let (a, b) = pick_2(5, &mut rng).unwrap();
/// assert_ne!(a, b);
/// assert!(a < 5 && b < 5);
/// assert_eq!(pick_2(1, &mut rng), None);
/// ```
pub fn pick_2<R>(n: usize, rng: &mut R) -> Option<(usize, usize)>
where
    R: Rng + ?Sized,
{
    if n < 2 {
        return None;
    }
    let a = rng.random_range(0..n);
    let b = rng.random_range(0..n - 1);
    Some((a, b + usize::from(b >= a)))
}

/// Perturbs network weights in place while keeping every weight vector on the simplex.
#[derive(Debug, Clone)]
pub struct Mutator {
    adjust_max: f32,
    amount: Uniform<f32>,
}

impl Mutator {
    /// Creates a mutator moving at most `adjust_max` (exclusive) per weight vector.
    ///
    /// # Errors
    ///
    /// Returns [`TrainingError::InvalidConfiguration`] unless `adjust_max` is positive and
    /// finite.
    pub fn new(adjust_max: f32) -> Result<Self, TrainingError> {
        if !(adjust_max > 0.0 && adjust_max.is_finite()) {
            return Err(TrainingError::invalid_configuration(format!(
                "mutation cap must be positive and finite, got {adjust_max}"
            )));
        }
        let amount = Uniform::new(0.0, adjust_max).map_err(|e| {
            TrainingError::invalid_configuration(format!("mutation cap {adjust_max}: {e}"))
        })?;
        Ok(Self { adjust_max, amount })
    }

    #[must_use]
    pub fn adjust_max(&self) -> f32 {
        self.adjust_max
    }

    /// Applies one mass transfer to every weight vector of `network`.
    ///
    /// Weight vectors with a single slot have nothing to exchange and are left unchanged.
    pub fn mutate<R>(&self, network: &mut Network, rng: &mut R)
    where
        R: Rng + ?Sized,
    {
        for weights in network.weight_vectors_mut() {
            let Some((inc_idx, dec_idx)) = pick_2(weights.len(), rng) else {
                continue;
            };
            let amount = rng.sample(&self.amount);
            weights.transfer(dec_idx, inc_idx, amount);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;
    use tilenet_evaluator::network::WeightVector;

    use super::*;

    const EPSILON: f32 = 1e-5;

    #[test]
    fn test_pick_2_distinct_and_in_range() {
        let mut rng = Pcg32::seed_from_u64(1);
        for n in 2..20 {
            for _ in 0..200 {
                let (a, b) = pick_2(n, &mut rng).unwrap();
                assert_ne!(a, b);
                assert!(a < n && b < n, "({a}, {b}) out of range for {n}");
            }
        }
        assert_eq!(pick_2(0, &mut rng), None);
        assert_eq!(pick_2(1, &mut rng), None);
    }

    #[test]
    fn test_pick_2_uniform_over_pairs() {
        let mut rng = Pcg32::seed_from_u64(2);
        let mut counts = BTreeMap::<(usize, usize), usize>::new();
        for _ in 0..12_000 {
            let (a, b) = pick_2(4, &mut rng).unwrap();
            *counts.entry((a.min(b), a.max(b))).or_default() += 1;
        }
        assert_eq!(counts.len(), 6);
        for (pair, count) in counts {
            assert!((1800..=2200).contains(&count), "{pair:?}: {count}");
        }
    }

    #[test]
    fn test_mutator_rejects_bad_cap() {
        for cap in [0.0, -0.1, f32::NAN, f32::INFINITY] {
            assert!(matches!(
                Mutator::new(cap),
                Err(TrainingError::InvalidConfiguration { .. })
            ));
        }
        assert!(Mutator::new(0.1).is_ok());
    }

    #[test]
    fn test_mutation_preserves_simplex() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mutator = Mutator::new(0.3).unwrap();
        let mut network = Network::random(16, &[4, 4, 4], &mut rng).unwrap();
        for _ in 0..1000 {
            let before = network.clone();
            mutator.mutate(&mut network, &mut rng);
            for (old, new) in before.weight_vectors().zip(network.weight_vectors()) {
                assert!((old.sum() - new.sum()).abs() < EPSILON);
                assert!(new.as_slice().iter().all(|w| *w >= 0.0), "{new:?}");
            }
        }
    }

    #[test]
    fn test_mutation_touches_at_most_two_slots() {
        let mut rng = Pcg32::seed_from_u64(4);
        let mutator = Mutator::new(DEFAULT_ADJUST_MAX).unwrap();
        let before = Network::random(16, &[4, 4], &mut rng).unwrap();
        let mut after = before.clone();
        mutator.mutate(&mut after, &mut rng);
        for (old, new) in before.weight_vectors().zip(after.weight_vectors()) {
            let changed = std::iter::zip(old.as_slice(), new.as_slice())
                .filter(|(a, b)| a != b)
                .count();
            assert!(changed <= 2, "{changed} slots changed");
            let moved = std::iter::zip(old.as_slice(), new.as_slice())
                .map(|(a, b)| (a - b).abs())
                .fold(0.0_f32, f32::max);
            assert!(moved < DEFAULT_ADJUST_MAX + EPSILON);
        }
    }

    #[test]
    fn test_mutation_can_zero_a_slot() {
        let mut rng = Pcg32::seed_from_u64(5);
        let mutator = Mutator::new(0.5).unwrap();
        let layer = tilenet_evaluator::network::Layer::new(vec![
            WeightVector::from_values(vec![0.999, 0.001]).unwrap(),
        ]);
        let mut network = Network::from_layers(2, vec![layer]).unwrap();
        let mut zeroed = false;
        for _ in 0..100 {
            mutator.mutate(&mut network, &mut rng);
            let weights = network.weight_vectors().next().unwrap();
            zeroed |= weights.as_slice().contains(&0.0);
            assert!((weights.sum() - 1.0).abs() < EPSILON);
        }
        assert!(zeroed, "clamped transfer should empty a slot at some point");
    }

    #[test]
    fn test_single_slot_vectors_unchanged() {
        let mut rng = Pcg32::seed_from_u64(6);
        let mut network = Network::random(1, &[3, 1], &mut rng).unwrap();
        let before = network.clone();
        Mutator::new(DEFAULT_ADJUST_MAX)
            .unwrap()
            .mutate(&mut network, &mut rng);
        // first layer units have one input each; second layer has three
        for (old, new) in before.layers()[0]
            .units()
            .iter()
            .zip(network.layers()[0].units())
        {
            assert_eq!(old, new);
        }
    }
}
