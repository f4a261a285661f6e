use tilenet_engine::{Board, GameSeed, MoveResult};
use tilenet_evaluator::{
    network::Network, policy::NetworkPolicy, session_evaluator::SessionEvaluator,
};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct PlayArg {
    /// Units per layer of the random network, comma separated; the last layer must have 4
    /// units
    #[arg(long, value_delimiter = ',', default_values_t = [4, 4, 4])]
    layer_sizes: Vec<usize>,
    /// Seed as 32 hex characters (random if omitted)
    #[arg(long)]
    seed: Option<GameSeed>,
}

pub(crate) fn run(arg: &PlayArg) -> anyhow::Result<()> {
    let PlayArg { layer_sizes, seed } = arg;

    let seed = crate::util::resolve_seed(*seed);
    let mut rng = seed.rng();

    let network = Network::random(Board::CELL_COUNT, layer_sizes, &mut rng)?;
    let policy = NetworkPolicy::new(&network)?;

    let evaluator = SessionEvaluator::new(1);
    let stats = evaluator.play_episode_observed(&policy, &mut rng, |field, direction, result| {
        match result {
            MoveResult::Moved { gained } => {
                eprintln!(
                    "Move #{}: {direction} (+{gained}, score {})",
                    field.stats().moves(),
                    field.score()
                );
                eprintln!("{}", field.board());
                eprintln!();
            }
            MoveResult::Unchanged => {
                eprintln!("{direction} leaves the board unchanged; episode ends");
            }
        }
    });

    eprintln!();
    eprintln!("Episode finished");
    eprintln!("  Moves: {}", stats.moves());
    eprintln!("  Score: {}", stats.score());
    eprintln!("  Highest Tile: {}", 1_u64 << stats.max_rank());

    Ok(())
}
