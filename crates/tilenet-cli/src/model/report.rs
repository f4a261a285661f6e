use chrono::{DateTime, Utc};
use serde::Serialize;
use tilenet_engine::GameSeed;
use tilenet_training::{params::EvolutionParams, stats::FitnessStats};

/// Result of `tilenet train`.
#[derive(Debug, Clone, Serialize)]
pub struct TrainingReport {
    pub trained_at: DateTime<Utc>,
    pub seed: GameSeed,
    pub params: EvolutionParams,
    pub generations: Vec<GenerationReport>,
    /// Statistics of the final population, evaluated once after the last generation.
    pub final_stats: Option<FitnessStats>,
    /// Fitness of every member of the final population, ascending.
    pub final_fitness: Vec<usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GenerationReport {
    pub generation: usize,
    pub fitness: FitnessStats,
}

/// Result of `tilenet baseline`.
#[derive(Debug, Clone, Serialize)]
pub struct BaselineReport {
    pub played_at: DateTime<Utc>,
    pub seed: GameSeed,
    pub episodes: usize,
    pub score: Option<FitnessStats>,
    /// Number of episodes reaching each highest tile value, keyed by tile value.
    pub max_tiles: Vec<MaxTileCount>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MaxTileCount {
    pub tile: u64,
    pub episodes: usize,
}
