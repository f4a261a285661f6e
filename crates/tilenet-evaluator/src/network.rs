//! Feed-forward networks whose weights live on the probability simplex.
//!
//! A [`Network`] is a stack of [`Layer`]s. Each layer holds one [`WeightVector`] per output
//! unit, and each unit outputs the inner product of the previous layer's values with its
//! weights. There is no bias term and no activation function.
//!
//! # Simplex Invariant
//!
//! Every [`WeightVector`] is non-negative and sums to 1, so each unit outputs a convex
//! combination of its inputs. Consequently every intermediate value stays within the range
//! of the network inputs, and a constant input vector `[c, c, ...]` produces `c` on every
//! unit of every layer.
//!
//! The invariant is established by [`WeightVector::random`] (uniform sampling on the
//! simplex) or checked by [`WeightVector::from_values`], and is preserved by the only
//! mutating operation, [`WeightVector::transfer`].
//!
//! # Example
//!
//! ```
//! use rand::SeedableRng as _;
//! use rand_pcg::Pcg32;
//! use tilenet_evaluator::network::Network;
//!
//! let mut rng = Pcg32::seed_from_u64(0);
//! let network = Network::random(16, &[4, 4, 4], &mut rng).unwrap();
//! assert_eq!(network.layer_sizes(), vec![4, 4, 4]);
//!
//! let outputs = network.compute(&[0.5; 16]).unwrap();
//! assert_eq!(outputs.len(), 4);
//! assert!(outputs.iter().all(|v| (v - 0.5).abs() < 1e-5));
//! ```

use rand::Rng;

/// Tolerance used when checking that weights sum to 1.
pub const SIMPLEX_TOLERANCE: f32 = 1e-4;

/// Errors raised while building or running a [`Network`].
#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum NetworkError {
    #[display("network input size must be at least 1")]
    EmptyInput,
    #[display("layer {index} must have at least one unit")]
    EmptyLayer { index: usize },
    #[display("weight vector must have at least one element")]
    EmptyWeightVector,
    #[display("weights must be non-negative and sum to 1 (sum = {sum})")]
    NotOnSimplex { sum: f32 },
    #[display("unit {unit} of layer {layer} has {actual} weights, expected {expected}")]
    LayerShape {
        layer: usize,
        unit: usize,
        expected: usize,
        actual: usize,
    },
    #[display("expected {expected} inputs, got {actual}")]
    InputLength { expected: usize, actual: usize },
}

/// Non-negative weights summing to 1, feeding a single network unit.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightVector {
    values: Vec<f32>,
}

impl WeightVector {
    /// Samples a weight vector uniformly from the `(len - 1)`-dimensional simplex.
    ///
    /// Uses the stick-breaking construction: draw `len - 1` uniform cut points in `[0, 1)`,
    /// sort them together with the end points 0 and 1, and return the `len` gaps between
    /// consecutive points.
    ///
    /// # Errors
    ///
    /// Returns [`NetworkError::EmptyWeightVector`] if `len` is 0.
    pub fn random<R>(len: usize, rng: &mut R) -> Result<Self, NetworkError>
    where
        R: Rng + ?Sized,
    {
        if len == 0 {
            return Err(NetworkError::EmptyWeightVector);
        }
        let mut cuts = Vec::with_capacity(len + 1);
        cuts.push(0.0);
        cuts.extend((1..len).map(|_| rng.random::<f32>()));
        cuts.push(1.0);
        cuts.sort_by(f32::total_cmp);
        let values = cuts.windows(2).map(|w| w[1] - w[0]).collect();
        Ok(Self { values })
    }

    /// Wraps explicit weights after checking the simplex invariant.
    ///
    /// # Errors
    ///
    /// Returns [`NetworkError::EmptyWeightVector`] for an empty vector and
    /// [`NetworkError::NotOnSimplex`] if any weight is negative or the sum differs from 1
    /// by more than [`SIMPLEX_TOLERANCE`].
    pub fn from_values(values: Vec<f32>) -> Result<Self, NetworkError> {
        if values.is_empty() {
            return Err(NetworkError::EmptyWeightVector);
        }
        let sum = values.iter().sum::<f32>();
        let all_non_negative = values.iter().all(|v| *v >= 0.0);
        if !all_non_negative || (sum - 1.0).abs() > SIMPLEX_TOLERANCE {
            return Err(NetworkError::NotOnSimplex { sum });
        }
        Ok(Self { values })
    }

    /// Puts all mass on `index`: a unit that copies one input.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len`.
    #[must_use]
    pub fn one_hot(len: usize, index: usize) -> Self {
        assert!(index < len, "index {index} out of range for length {len}");
        let mut values = vec![0.0; len];
        values[index] = 1.0;
        Self { values }
    }

    #[must_use]
    pub fn as_slice(&self) -> &[f32] {
        &self.values
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[must_use]
    pub fn sum(&self) -> f32 {
        self.values.iter().sum()
    }

    /// Moves up to `amount` of mass from slot `from` to slot `to`.
    ///
    /// If slot `from` holds less than `amount`, its whole value is moved and it becomes 0.
    /// The sum of the vector is unchanged and no weight becomes negative. Returns the
    /// amount actually moved.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of range.
    pub fn transfer(&mut self, from: usize, to: usize, amount: f32) -> f32 {
        let moved = if self.values[from] < amount {
            let all = self.values[from];
            self.values[from] = 0.0;
            all
        } else {
            self.values[from] -= amount;
            amount
        };
        self.values[to] += moved;
        moved
    }

    fn dot(&self, inputs: &[f32]) -> f32 {
        std::iter::zip(&self.values, inputs)
            .map(|(w, x)| w * x)
            .sum()
    }
}

/// One layer of units, each with its own weight vector.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    units: Vec<WeightVector>,
}

impl Layer {
    #[must_use]
    pub fn new(units: Vec<WeightVector>) -> Self {
        Self { units }
    }

    /// Samples `size` units, each consuming `input_size` values.
    pub fn random<R>(input_size: usize, size: usize, rng: &mut R) -> Result<Self, NetworkError>
    where
        R: Rng + ?Sized,
    {
        let units = (0..size)
            .map(|_| WeightVector::random(input_size, rng))
            .collect::<Result<_, _>>()?;
        Ok(Self { units })
    }

    #[must_use]
    pub fn units(&self) -> &[WeightVector] {
        &self.units
    }

    /// Number of units, i.e. the output size of this layer.
    #[must_use]
    pub fn len(&self) -> usize {
        self.units.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    fn forward(&self, inputs: &[f32]) -> Vec<f32> {
        self.units.iter().map(|unit| unit.dot(inputs)).collect()
    }
}

/// A feed-forward network of simplex-weighted layers.
///
/// The structure (input size, number of layers and their sizes) is fixed at creation; the
/// weights can be changed in place through [`Network::weight_vectors_mut`]. `Clone` makes a
/// fully independent deep copy.
#[derive(Debug, Clone, PartialEq)]
pub struct Network {
    input_size: usize,
    layers: Vec<Layer>,
}

impl Network {
    /// Builds a network with randomly sampled weights.
    ///
    /// One layer is created per entry of `layer_sizes`; the units of each layer consume the
    /// outputs of the previous layer (or the `input_size` inputs, for the first layer).
    /// An empty `layer_sizes` yields a network that returns its inputs unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`NetworkError::EmptyInput`] if `input_size` is 0 and
    /// [`NetworkError::EmptyLayer`] if any layer size is 0.
    pub fn random<R>(
        input_size: usize,
        layer_sizes: &[usize],
        rng: &mut R,
    ) -> Result<Self, NetworkError>
    where
        R: Rng + ?Sized,
    {
        if input_size == 0 {
            return Err(NetworkError::EmptyInput);
        }
        if let Some(index) = layer_sizes.iter().position(|size| *size == 0) {
            return Err(NetworkError::EmptyLayer { index });
        }
        let mut layers = Vec::with_capacity(layer_sizes.len());
        let mut prev_size = input_size;
        for &size in layer_sizes {
            layers.push(Layer::random(prev_size, size, rng)?);
            prev_size = size;
        }
        Ok(Self { input_size, layers })
    }

    /// Builds a network from explicit layers, checking that the shapes line up.
    pub fn from_layers(input_size: usize, layers: Vec<Layer>) -> Result<Self, NetworkError> {
        if input_size == 0 {
            return Err(NetworkError::EmptyInput);
        }
        let mut prev_size = input_size;
        for (index, layer) in layers.iter().enumerate() {
            if layer.is_empty() {
                return Err(NetworkError::EmptyLayer { index });
            }
            for (unit, weights) in layer.units.iter().enumerate() {
                if weights.len() != prev_size {
                    return Err(NetworkError::LayerShape {
                        layer: index,
                        unit,
                        expected: prev_size,
                        actual: weights.len(),
                    });
                }
            }
            prev_size = layer.len();
        }
        Ok(Self { input_size, layers })
    }

    #[must_use]
    pub fn input_size(&self) -> usize {
        self.input_size
    }

    #[must_use]
    pub fn output_size(&self) -> usize {
        self.layers.last().map_or(self.input_size, Layer::len)
    }

    #[must_use]
    pub fn layer_sizes(&self) -> Vec<usize> {
        self.layers.iter().map(Layer::len).collect()
    }

    #[must_use]
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Iterates over the weight vectors of all units, layer by layer.
    pub fn weight_vectors(&self) -> impl Iterator<Item = &WeightVector> + '_ {
        self.layers.iter().flat_map(|layer| &layer.units)
    }

    /// Like [`Self::weight_vectors`], but mutable.
    pub fn weight_vectors_mut(&mut self) -> impl Iterator<Item = &mut WeightVector> + '_ {
        self.layers.iter_mut().flat_map(|layer| &mut layer.units)
    }

    /// Feeds `inputs` through every layer and returns the last layer's outputs.
    ///
    /// # Errors
    ///
    /// Returns [`NetworkError::InputLength`] if `inputs.len()` differs from
    /// [`Self::input_size`].
    pub fn compute(&self, inputs: &[f32]) -> Result<Vec<f32>, NetworkError> {
        if inputs.len() != self.input_size {
            return Err(NetworkError::InputLength {
                expected: self.input_size,
                actual: inputs.len(),
            });
        }
        Ok(self.forward(inputs))
    }

    /// [`Self::compute`] without the input length check.
    pub(crate) fn forward(&self, inputs: &[f32]) -> Vec<f32> {
        self.layers
            .iter()
            .fold(inputs.to_vec(), |values, layer| layer.forward(&values))
    }
}
