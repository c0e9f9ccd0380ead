use serde::{Deserialize, Serialize};

use crate::core::board::ColorTag;

/// Marker for the single blank in a challenge template.
pub const BLANK_MARKER: &str = "_____";

/// A fill-in-the-blank sentence challenge.
///
/// `template` contains exactly one [`BLANK_MARKER`]; `answer` is the
/// canonical fill; `keywords` are acceptable alternatives shown to the
/// player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentenceChallenge {
    pub id: String,
    pub template: String,
    pub answer: String,
    pub keywords: Vec<String>,
}

/// External configuration for one game session: the challenge pool, the
/// block vocabulary, and the color palette.
///
/// Treated as immutable for the session's lifetime. Validated once at
/// session construction; empty content is fatal there rather than producing
/// pieces or challenges with undefined content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    pub challenges: Vec<SentenceChallenge>,
    pub vocabulary: Vec<String>,
    pub palette: Vec<ColorTag>,
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum ConfigError {
    #[display("challenge pool is empty")]
    EmptyChallengePool,
    #[display("keyword vocabulary is empty")]
    EmptyVocabulary,
    #[display("color palette is empty")]
    EmptyPalette,
    #[display("challenge {id} must contain exactly one blank marker")]
    MalformedTemplate { id: String },
}

impl GameConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.challenges.is_empty() {
            return Err(ConfigError::EmptyChallengePool);
        }
        if self.vocabulary.is_empty() {
            return Err(ConfigError::EmptyVocabulary);
        }
        if self.palette.is_empty() {
            return Err(ConfigError::EmptyPalette);
        }
        for challenge in &self.challenges {
            if challenge.template.matches(BLANK_MARKER).count() != 1 {
                return Err(ConfigError::MalformedTemplate {
                    id: challenge.id.clone(),
                });
            }
        }
        Ok(())
    }

    /// The built-in vocabulary, challenge pool, and palette.
    #[must_use]
    pub fn default_content() -> Self {
        let vocabulary = [
            "protect",
            "nature",
            "sustain",
            "care",
            "green",
            "earth",
            "love",
            "peace",
            "hope",
            "future",
            "respect",
            "unity",
            "together",
            "harmony",
            "balance",
            "river",
            "ocean",
            "forest",
            "clean",
            "renewable",
            "recycle",
            "reduce",
            "reuse",
            "diverse",
            "inclusive",
            "community",
            "global",
            "citizen",
            "responsibility",
            "preserve",
            "wildlife",
            "ecosystem",
            "solar",
            "wind",
            "organic",
        ]
        .map(String::from)
        .to_vec();

        let challenge = |id: &str, template: &str, answer: &str, keywords: &[&str]| {
            SentenceChallenge {
                id: id.to_owned(),
                template: template.to_owned(),
                answer: answer.to_owned(),
                keywords: keywords.iter().map(|&k| k.to_owned()).collect(),
            }
        };
        let challenges = vec![
            challenge(
                "1",
                "We must _____ our planet for future generations.",
                "protect",
                &["protect", "preserve", "care", "sustain"],
            ),
            challenge(
                "2",
                "Together we can create a more _____ world.",
                "sustainable",
                &["sustainable", "green", "balanced", "harmonious"],
            ),
            challenge(
                "3",
                "Every person deserves _____ and dignity.",
                "respect",
                &["respect", "love", "care", "equality"],
            ),
        ];

        Self {
            challenges,
            vocabulary,
            palette: ColorTag::ALL.to_vec(),
        }
    }
}
