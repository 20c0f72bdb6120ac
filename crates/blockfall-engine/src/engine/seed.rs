use std::{fmt, str::FromStr};

use rand::{Rng, distr::StandardUniform, prelude::Distribution};
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::ParseSeedError;

/// Seed for figure generation.
///
/// This is a 128-bit seed used to initialize the random number generator
/// that picks figure shapes and spawn columns. Two games with the same seed,
/// board and configuration produce the same figure sequence, which makes
/// simulations reproducible.
///
/// The text form is 32 hexadecimal digits, used both by [`FromStr`] and by
/// serde.
///
/// # Example
///
/// ```
/// use blockfall_engine::GameSeed;
/// use rand::Rng as _;
///
/// let seed: GameSeed = rand::rng().random();
/// let parsed: GameSeed = seed.to_string().parse().unwrap();
/// assert_eq!(parsed, seed);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GameSeed([u8; 16]);

impl GameSeed {
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    #[must_use]
    pub const fn to_bytes(self) -> [u8; 16] {
        self.0
    }

    pub(crate) fn rng(self) -> Pcg32 {
        rand::SeedableRng::from_seed(self.0)
    }
}

impl fmt::Display for GameSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", u128::from_be_bytes(self.0))
    }
}

impl FromStr for GameSeed {
    type Err = ParseSeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 32 {
            return Err(ParseSeedError::InvalidLength { len: s.len() });
        }
        let mut num = 0u128;
        for c in s.chars() {
            let digit = c
                .to_digit(16)
                .ok_or(ParseSeedError::InvalidDigit { digit: c })?;
            num = (num << 4) | u128::from(digit);
        }
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
