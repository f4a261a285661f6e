use std::{fmt, str::FromStr};

use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform},
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::ParseSeedError;

/// Seed for the random generator that drives a whole run.
///
/// This is a 128-bit (16-byte) seed for a [`Pcg32`] generator. Every random draw of a run
/// (network initialization, tile placement, mutation, culling) comes from the one
/// generator built by [`GameSeed::rng`], so the same seed reproduces the same run.
///
/// The seed is written and parsed as a 32-character lowercase hex string.
///
/// # Example
///
/// ```
/// use rand::Rng as _;
/// use tilenet_engine::GameSeed;
///
/// let seed: GameSeed = rand::rng().random();
/// let parsed: GameSeed = seed.to_string().parse().unwrap();
/// assert_eq!(seed, parsed);
///
/// let mut rng1 = seed.rng();
/// let mut rng2 = parsed.rng();
/// assert_eq!(rng1.random::<u64>(), rng2.random::<u64>());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameSeed([u8; 16]);

impl GameSeed {
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    /// Builds the generator for this seed.
    #[must_use]
    pub fn rng(self) -> Pcg32 {
        Pcg32::from_seed(self.0)
    }
}

impl fmt::Display for GameSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let num = u128::from_be_bytes(self.0);
        write!(f, "{num:032x}")
    }
}

impl FromStr for GameSeed {
    type Err = ParseSeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 32 {
            return Err(ParseSeedError::InvalidLength { len: s.len() });
        }
        let invalid_digit = || ParseSeedError::InvalidDigit {
            input: s.to_owned(),
        };
        if !s.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid_digit());
        }
        let num = u128::from_str_radix(s, 16).map_err(|_| invalid_digit())?;
        Ok(Self(num.to_be_bytes()))
    }
}

impl Serialize for GameSeed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for GameSeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex_str = String::deserialize(deserializer)?;
        hex_str.parse().map_err(serde::de::Error::custom)
    }
}

/// Allows generating random `GameSeed` values with `rng.random()`.
impl Distribution<GameSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> GameSeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        GameSeed(seed)
    }
}
