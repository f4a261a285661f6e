//! The generation loop.

use rand::Rng;
use tilenet_evaluator::session_evaluator::SessionEvaluator;

use crate::{
    TrainingError,
    genetic::{Population, PopulationEvolver, RankedPopulation},
    params::EvolutionParams,
};

/// Runs a full training and returns the final population.
///
/// `on_generation` is called once per generation with the generation index and the ranked
/// population, before culling. The final population is returned unranked; evaluate it with
/// [`Population::rank`] to obtain its fitness.
///
/// # Errors
///
/// Returns [`TrainingError::InvalidConfiguration`] if [`EvolutionParams::validate`] fails.
pub fn evolve<R, F>(
    params: &EvolutionParams,
    rng: &mut R,
    mut on_generation: F,
) -> Result<Population, TrainingError>
where
    R: Rng + ?Sized,
    F: FnMut(usize, &RankedPopulation),
{
    params.validate()?;

    let evaluator = SessionEvaluator::new(params.episodes);
    let evolver = PopulationEvolver::new(params.adjust_max)?;
    let mut population = Population::random(
        params.input_size,
        &params.layer_sizes,
        params.population_size,
        rng,
    )?;

    for generation in 0..params.generations {
        let ranked = population.rank(&evaluator, rng)?;
        on_generation(generation, &ranked);
        population = evolver.evolve(ranked, rng)?;
        debug_assert_eq!(population.len(), params.population_size);
    }

    Ok(population)
}
