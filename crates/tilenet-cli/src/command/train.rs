use std::path::PathBuf;

use chrono::Utc;
use tilenet_engine::{Board, GameSeed};
use tilenet_evaluator::session_evaluator::SessionEvaluator;
use tilenet_training::{
    evolution,
    genetic::{Individual, RankedPopulation},
    params::EvolutionParams,
    stats::FitnessStats,
};

use crate::{
    model::report::{GenerationReport, TrainingReport},
    util::{self, Output},
};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct TrainArg {
    /// Number of networks per generation (must be even)
    #[arg(long, default_value_t = EvolutionParams::default().population_size)]
    population_size: usize,
    /// Number of generations
    #[arg(long, default_value_t = EvolutionParams::default().generations)]
    generations: usize,
    /// Units per layer, comma separated; the last layer must have 4 units
    #[arg(long, value_delimiter = ',', default_values_t = EvolutionParams::default().layer_sizes)]
    layer_sizes: Vec<usize>,
    /// Maximum weight mass moved per weight vector by one mutation
    #[arg(long, default_value_t = EvolutionParams::default().adjust_max)]
    adjust_max: f32,
    /// Episodes summed into one fitness value
    #[arg(long, default_value_t = EvolutionParams::default().episodes)]
    episodes: usize,
    /// Seed as 32 hex characters (random if omitted)
    #[arg(long)]
    seed: Option<GameSeed>,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &TrainArg) -> anyhow::Result<()> {
    let TrainArg {
        population_size,
        generations,
        layer_sizes,
        adjust_max,
        episodes,
        seed,
        output,
    } = arg;

    let params = EvolutionParams {
        population_size: *population_size,
        generations: *generations,
        input_size: Board::CELL_COUNT,
        layer_sizes: layer_sizes.clone(),
        adjust_max: *adjust_max,
        episodes: *episodes,
    };
    params.validate()?;

    let seed = util::resolve_seed(*seed);
    let mut rng = seed.rng();
    eprintln!("Parameters: {params:?}");

    let mut generation_reports = vec![];
    let population = evolution::evolve(&params, &mut rng, |generation, ranked| {
        eprintln!("Generation #{generation}:");
        let Some(fitness) = ranked.compute_fitness_stats() else {
            return;
        };
        print_fitness_stats(&fitness);
        print_best(ranked);
        generation_reports.push(GenerationReport {
            generation,
            fitness,
        });
    })?;

    let evaluator = SessionEvaluator::new(params.episodes);
    let ranked = population.rank(&evaluator, &mut rng)?;
    let final_stats = ranked.compute_fitness_stats();
    eprintln!("Final population:");
    if let Some(fitness) = &final_stats {
        print_fitness_stats(fitness);
        print_best(&ranked);
    }

    let report = TrainingReport {
        trained_at: Utc::now(),
        seed,
        params,
        generations: generation_reports,
        final_stats,
        final_fitness: ranked.individuals().iter().map(Individual::fitness).collect(),
    };
    Output::save_json(&report, output.clone())?;

    eprintln!();
    eprintln!("Training completed");
    if let Some(path) = &output {
        eprintln!("  Path: {}", path.display());
    }
    eprintln!("  Seed: {}", report.seed);
    eprintln!("  Trained at: {}", report.trained_at);
    eprintln!("  Population: {}", report.final_fitness.len());

    Ok(())
}

fn print_fitness_stats(fitness: &FitnessStats) {
    eprintln!("  Fitness Stats:");
    eprintln!("    Min:    {}", fitness.min);
    eprintln!("    Max:    {}", fitness.max);
    eprintln!("    Mean:   {:.3}", fitness.mean);
    eprintln!("    Median: {}", fitness.median);
    eprintln!("    StdDev: {:.3}", fitness.std_dev);
}

fn print_best(ranked: &RankedPopulation) {
    let Some(best) = ranked.best() else {
        return;
    };
    eprintln!("  Best Network (fitness {}):", best.fitness());
    for (i, layer) in best.network().layers().iter().enumerate() {
        eprintln!("    Layer {i}:");
        for weights in layer.units() {
            eprintln!("      {:.3?}", weights.as_slice());
        }
    }
}
