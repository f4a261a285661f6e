use std::{collections::BTreeMap, path::PathBuf};

use chrono::Utc;
use tilenet_engine::{GameSeed, GameStats};
use tilenet_evaluator::session_evaluator::SessionEvaluator;
use tilenet_training::stats::FitnessStats;

use crate::{
    model::report::{BaselineReport, MaxTileCount},
    util::{self, Output},
};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct BaselineArg {
    /// Number of episodes to play
    #[arg(long, default_value_t = 100)]
    episodes: usize,
    /// Seed as 32 hex characters (random if omitted)
    #[arg(long)]
    seed: Option<GameSeed>,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &BaselineArg) -> anyhow::Result<()> {
    let BaselineArg {
        episodes,
        seed,
        output,
    } = arg;

    let seed = util::resolve_seed(*seed);
    let mut rng = seed.rng();

    let evaluator = SessionEvaluator::new(*episodes);
    let stats = (0..evaluator.episodes())
        .map(|_| evaluator.play_random_episode(&mut rng))
        .collect::<Vec<_>>();

    let score = FitnessStats::new(stats.iter().map(GameStats::score));
    let mut max_tiles = BTreeMap::<u8, usize>::new();
    for game in &stats {
        *max_tiles.entry(game.max_rank()).or_default() += 1;
    }

    eprintln!("Random play over {episodes} episodes:");
    if let Some(score) = &score {
        eprintln!("  Score Stats:");
        eprintln!("    Min:    {}", score.min);
        eprintln!("    Max:    {}", score.max);
        eprintln!("    Mean:   {:.3}", score.mean);
        eprintln!("    Median: {}", score.median);
        eprintln!("    StdDev: {:.3}", score.std_dev);
    }
    eprintln!("  Highest Tile:");
    for (rank, count) in &max_tiles {
        eprintln!("    {:>5}: {count}", 1_u64 << rank);
    }

    let report = BaselineReport {
        played_at: Utc::now(),
        seed,
        episodes: *episodes,
        score,
        max_tiles: max_tiles
            .into_iter()
            .map(|(rank, episodes)| MaxTileCount {
                tile: 1 << rank,
                episodes,
            })
            .collect(),
    };
    Output::save_json(&report, output.clone())?;

    Ok(())
}
