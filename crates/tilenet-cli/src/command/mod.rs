use clap::{Parser, Subcommand};

use self::{baseline::BaselineArg, play::PlayArg, train::TrainArg};

mod baseline;
mod play;
mod train;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Evolve a population of policy networks
    Train(#[clap(flatten)] TrainArg),
    /// Play episodes with uniformly random moves
    Baseline(#[clap(flatten)] BaselineArg),
    /// Play one episode with a random network and print every board
    Play(#[clap(flatten)] PlayArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode {
        Mode::Train(arg) => train::run(&arg)?,
        Mode::Baseline(arg) => baseline::run(&arg)?,
        Mode::Play(arg) => play::run(&arg)?,
    }
    Ok(())
}
