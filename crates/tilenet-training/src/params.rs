//! Training parameters and their validation.

use serde::Serialize;
use tilenet_engine::{Board, Direction};
use tilenet_evaluator::session_evaluator::DEFAULT_EPISODES;

use crate::{TrainingError, mutation::DEFAULT_ADJUST_MAX};

/// Parameters of one training run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvolutionParams {
    /// Number of networks per generation. Must be even.
    pub population_size: usize,
    /// Number of cull-and-regenerate cycles.
    pub generations: usize,
    /// Number of network inputs, one per board cell.
    pub input_size: usize,
    /// Number of units of each layer; the last one is the number of directions.
    pub layer_sizes: Vec<usize>,
    /// Exclusive upper bound of the mass moved per weight vector by one mutation.
    pub adjust_max: f32,
    /// Number of episodes summed into one fitness value.
    pub episodes: usize,
}

impl Default for EvolutionParams {
    fn default() -> Self {
        Self {
            population_size: 1000,
            generations: 100,
            input_size: Board::CELL_COUNT,
            layer_sizes: vec![4, 4, Direction::LEN],
            adjust_max: DEFAULT_ADJUST_MAX,
            episodes: DEFAULT_EPISODES,
        }
    }
}

impl EvolutionParams {
    /// Checks that a run with these parameters is well-defined.
    ///
    /// Zero generations is allowed and yields the initial population.
    ///
    /// # Errors
    ///
    /// Returns [`TrainingError::InvalidConfiguration`] if:
    ///
    /// - the population size is odd or smaller than 2 (culling half of it and cloning the
    ///   rest would not preserve its size)
    /// - `episodes` is 0
    /// - `adjust_max` is not positive and finite
    /// - the network shape does not map board cells to directions, or a layer is empty
    pub fn validate(&self) -> Result<(), TrainingError> {
        let Self {
            population_size,
            generations: _,
            input_size,
            layer_sizes,
            adjust_max,
            episodes,
        } = self;

        if *population_size < 2 || population_size % 2 != 0 {
            return Err(TrainingError::invalid_configuration(format!(
                "population size must be even and at least 2, got {population_size}"
            )));
        }
        if *episodes == 0 {
            return Err(TrainingError::invalid_configuration(
                "at least one episode per fitness evaluation is required",
            ));
        }
        if !(*adjust_max > 0.0 && adjust_max.is_finite()) {
            return Err(TrainingError::invalid_configuration(format!(
                "mutation cap must be positive and finite, got {adjust_max}"
            )));
        }
        if *input_size != Board::CELL_COUNT {
            return Err(TrainingError::invalid_configuration(format!(
                "input size must be {}, got {input_size}",
                Board::CELL_COUNT
            )));
        }
        if let Some(index) = layer_sizes.iter().position(|size| *size == 0) {
            return Err(TrainingError::invalid_configuration(format!(
                "layer {index} has no units"
            )));
        }
        if layer_sizes.last() != Some(&Direction::LEN) {
            return Err(TrainingError::invalid_configuration(format!(
                "last layer must have {} units, got {layer_sizes:?}",
                Direction::LEN
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_invalid(params: &EvolutionParams) {
        assert!(
            matches!(
                params.validate(),
                Err(TrainingError::InvalidConfiguration { .. })
            ),
            "{params:?} should be rejected"
        );
    }

    #[test]
    fn test_default_is_valid() {
        let params = EvolutionParams::default();
        assert_eq!(params.population_size, 1000);
        assert_eq!(params.generations, 100);
        assert_eq!(params.input_size, 16);
        assert_eq!(params.layer_sizes, vec![4, 4, 4]);
        assert!((params.adjust_max - 0.1).abs() < f32::EPSILON);
        assert_eq!(params.episodes, 10);
        params.validate().unwrap();
    }

    #[test]
    fn test_population_size() {
        for population_size in [0, 1, 3, 999] {
            assert_invalid(&EvolutionParams {
                population_size,
                ..EvolutionParams::default()
            });
        }
        EvolutionParams {
            population_size: 2,
            ..EvolutionParams::default()
        }
        .validate()
        .unwrap();
    }

    #[test]
    fn test_zero_generations_allowed() {
        EvolutionParams {
            generations: 0,
            ..EvolutionParams::default()
        }
        .validate()
        .unwrap();
    }

    #[test]
    fn test_rejects_bad_values() {
        assert_invalid(&EvolutionParams {
            episodes: 0,
            ..EvolutionParams::default()
        });
        assert_invalid(&EvolutionParams {
            adjust_max: 0.0,
            ..EvolutionParams::default()
        });
        assert_invalid(&EvolutionParams {
            adjust_max: f32::NAN,
            ..EvolutionParams::default()
        });
        assert_invalid(&EvolutionParams {
            input_size: 9,
            ..EvolutionParams::default()
        });
    }

    #[test]
    fn test_rejects_bad_layers() {
        for layer_sizes in [vec![], vec![4, 0, 4], vec![4, 4, 3]] {
            assert_invalid(&EvolutionParams {
                layer_sizes,
                ..EvolutionParams::default()
            });
        }
        EvolutionParams {
            layer_sizes: vec![8, 4],
            ..EvolutionParams::default()
        }
        .validate()
        .unwrap();
    }

    #[test]
    fn test_serializes_every_field() {
        let json = serde_json::to_value(EvolutionParams::default()).unwrap();
        assert_eq!(json["population_size"], 1000);
        assert_eq!(json["generations"], 100);
        assert_eq!(json["input_size"], 16);
        assert_eq!(json["layer_sizes"], serde_json::json!([4, 4, 4]));
        assert_eq!(json["episodes"], 10);
        assert!(json["adjust_max"].is_f64());
    }
}
