use std::str::FromStr;

use rand::{Rng, distr::StandardUniform, prelude::Distribution};

use crate::core::{
    board::ColorTag,
    piece::{Piece, PieceShape},
};

/// 128-bit seed driving every random draw of a session: piece shapes,
/// per-block keywords, piece colors, and challenge selection.
///
/// The same seed replays the same session, which is what the tests lean on.
/// Parses from a 32-character hex string (`FromStr`), and can be drawn from
/// any `Rng` via `rng.random()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneratorSeed([u8; 16]);

impl GeneratorSeed {
    #[must_use]
    pub const fn from_u128(value: u128) -> Self {
        Self(value.to_be_bytes())
    }

    #[must_use]
    pub const fn into_bytes(self) -> [u8; 16] {
        self.0
    }
}

impl Distribution<GeneratorSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> GeneratorSeed {
        let mut bytes = [0; 16];
        rng.fill(&mut bytes);
        GeneratorSeed(bytes)
    }
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("seed must be a 32-character hex string")]
pub struct ParseSeedError;

impl FromStr for GeneratorSeed {
    type Err = ParseSeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 32 {
            return Err(ParseSeedError);
        }
        let value = u128::from_str_radix(s, 16).map_err(|_| ParseSeedError)?;
        Ok(Self::from_u128(value))
    }
}

/// Samples pieces from the configured vocabulary and palette.
///
/// Stateless over the random source: every draw goes through the `Rng` the
/// caller passes in, so generation is reproducible with a seeded generator.
#[derive(Debug, Clone)]
pub struct PieceGenerator {
    vocabulary: Vec<String>,
    palette: Vec<ColorTag>,
}

impl PieceGenerator {
    /// Callers validate the config first; both lists must be non-empty.
    pub(crate) fn new(vocabulary: Vec<String>, palette: Vec<ColorTag>) -> Self {
        debug_assert!(!vocabulary.is_empty() && !palette.is_empty());
        Self {
            vocabulary,
            palette,
        }
    }

    #[must_use]
    pub fn vocabulary(&self) -> &[String] {
        &self.vocabulary
    }

    /// Generates a piece at the spawn anchor: uniformly random shape, one
    /// uniformly random keyword per block, one uniformly random color for
    /// the whole piece.
    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> Piece {
        let shape: PieceShape = rng.random();
        let keywords: [String; 4] = std::array::from_fn(|_| {
            self.vocabulary[rng.random_range(0..self.vocabulary.len())].clone()
        });
        let color = self.palette[rng.random_range(0..self.palette.len())];
        Piece::new(shape, keywords, color)
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;
    use crate::core::piece::{SPAWN_X, SPAWN_Y};

    fn generator() -> PieceGenerator {
        PieceGenerator::new(
            ["protect", "nature", "balance"].map(String::from).to_vec(),
            vec![ColorTag::Blue, ColorTag::Green],
        )
    }

    #[test]
    fn seed_parses_from_hex() {
        let seed: GeneratorSeed = "0123456789abcdeffedcba9876543210".parse().unwrap();
        assert_eq!(
            seed,
            GeneratorSeed::from_u128(0x0123_4567_89ab_cdef_fedc_ba98_7654_3210)
        );

        assert!("too short".parse::<GeneratorSeed>().is_err());
        assert!(
            "zz234567890123456789012345678901"
                .parse::<GeneratorSeed>()
                .is_err()
        );
    }

    #[test]
    fn same_seed_generates_same_pieces() {
        let seed = GeneratorSeed::from_u128(42);
        let generator = generator();
        let mut a = Pcg32::from_seed(seed.into_bytes());
        let mut b = Pcg32::from_seed(seed.into_bytes());
        for _ in 0..20 {
            assert_eq!(generator.generate(&mut a), generator.generate(&mut b));
        }
    }

    #[test]
    fn generated_pieces_spawn_at_fixed_anchor_with_known_content() {
        let generator = generator();
        let mut rng = Pcg32::from_seed(GeneratorSeed::from_u128(7).into_bytes());
        for _ in 0..50 {
            let piece = generator.generate(&mut rng);
            assert_eq!(piece.anchor(), (SPAWN_X, SPAWN_Y));
            for block in piece.blocks() {
                assert!(
                    ["protect", "nature", "balance"].contains(&block.keyword.as_str()),
                    "unexpected keyword {}",
                    block.keyword
                );
            }
            assert!([ColorTag::Blue, ColorTag::Green].contains(&piece.color()));
        }
    }
}
