use super::config::SentenceChallenge;

/// Countdown granted to each challenge, in seconds.
pub const CHALLENGE_SECONDS: u64 = 20;

/// Tokens shorter than this never score.
const MIN_TOKEN_LEN: usize = 3;

/// Filler words that never score.
const STOP_WORDS: [&str; 14] = [
    "the", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by", "a", "an",
];

/// Scores a free-text answer against the available keywords and the
/// canonical answer. Pure; recomputed on every keystroke.
///
/// Per qualifying token (longer than two characters, not a stop word), in
/// token order:
///
/// 1. +1 base point
/// 2. +2 if the token overlaps any available keyword (substring in either
///    direction, case-insensitive)
/// 3. the running total DOUBLES if the token is a substring of the canonical
///    answer — multiplicative and compounding across tokens, not a flat
///    bonus
#[must_use]
pub fn score_answer(answer: &str, available_keywords: &[String], canonical_answer: &str) -> usize {
    let canonical = canonical_answer.to_lowercase();
    let keywords: Vec<String> = available_keywords.iter().map(|k| k.to_lowercase()).collect();

    let mut points = 0_usize;
    for token in answer.to_lowercase().split_whitespace() {
        if token.len() < MIN_TOKEN_LEN || STOP_WORDS.contains(&token) {
            continue;
        }
        points += 1;
        if keywords
            .iter()
            .any(|k| k.contains(token) || token.contains(k.as_str()))
        {
            points += 2;
        }
        if canonical.contains(token) {
            points *= 2;
        }
    }
    points
}

/// Lifecycle of one challenge instance.
///
/// `Offered` and `Previewing` are live; the other three are terminal.
/// `Previewing` is the explicit confirmation step between typing and
/// submitting. `TimedOut` behaves exactly like `Skipped` as far as scoring
/// is concerned: no points, nothing recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum ChallengePhase {
    Offered,
    Previewing,
    Submitted,
    Skipped,
    TimedOut,
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum ChallengeError {
    #[display("no challenge is active")]
    NoActiveChallenge,
    #[display("challenge is already resolved")]
    AlreadyResolved,
    #[display("answer is empty")]
    EmptyAnswer,
}

/// A challenge being played: the selected sentence, the answer typed so far,
/// and the countdown.
#[derive(Debug, Clone)]
pub struct ActiveChallenge {
    challenge: SentenceChallenge,
    available_keywords: Vec<String>,
    answer: String,
    seconds_left: u64,
    phase: ChallengePhase,
}

impl ActiveChallenge {
    pub(crate) fn new(challenge: SentenceChallenge, available_keywords: Vec<String>) -> Self {
        Self {
            challenge,
            available_keywords,
            answer: String::new(),
            seconds_left: CHALLENGE_SECONDS,
            phase: ChallengePhase::Offered,
        }
    }

    #[must_use]
    pub fn challenge(&self) -> &SentenceChallenge {
        &self.challenge
    }

    #[must_use]
    pub fn available_keywords(&self) -> &[String] {
        &self.available_keywords
    }

    #[must_use]
    pub fn answer(&self) -> &str {
        &self.answer
    }

    #[must_use]
    pub fn seconds_left(&self) -> u64 {
        self.seconds_left
    }

    #[must_use]
    pub fn phase(&self) -> ChallengePhase {
        self.phase
    }

    fn is_live(&self) -> bool {
        self.phase.is_offered() || self.phase.is_previewing()
    }

    #[must_use]
    pub fn is_resolved(&self) -> bool {
        !self.is_live()
    }

    /// Points the current answer would earn, recomputed from scratch.
    #[must_use]
    pub fn points(&self) -> usize {
        score_answer(
            &self.answer,
            &self.available_keywords,
            &self.challenge.answer,
        )
    }

    pub(crate) fn push_char(&mut self, c: char) {
        if self.phase.is_offered() {
            self.answer.push(c);
        }
    }

    pub(crate) fn pop_char(&mut self) {
        if self.phase.is_offered() {
            self.answer.pop();
        }
    }

    /// Confirmation step before submitting; rejects blank answers.
    pub(crate) fn preview(&mut self) -> Result<(), ChallengeError> {
        if !self.phase.is_offered() {
            return Err(ChallengeError::AlreadyResolved);
        }
        if self.answer.trim().is_empty() {
            return Err(ChallengeError::EmptyAnswer);
        }
        self.phase = ChallengePhase::Previewing;
        Ok(())
    }

    /// Back from preview to editing.
    pub(crate) fn edit(&mut self) {
        if self.phase.is_previewing() {
            self.phase = ChallengePhase::Offered;
        }
    }

    /// Finalizes the answer and returns the points earned.
    pub(crate) fn submit(&mut self) -> Result<usize, ChallengeError> {
        if !self.is_live() {
            return Err(ChallengeError::AlreadyResolved);
        }
        if self.answer.trim().is_empty() {
            return Err(ChallengeError::EmptyAnswer);
        }
        self.phase = ChallengePhase::Submitted;
        Ok(self.points())
    }

    pub(crate) fn skip(&mut self) {
        if self.is_live() {
            self.phase = ChallengePhase::Skipped;
        }
    }

    /// Advances the countdown by one second. Returns true if the challenge
    /// just timed out.
    pub(crate) fn tick_second(&mut self) -> bool {
        if !self.is_live() {
            return false;
        }
        self.seconds_left = self.seconds_left.saturating_sub(1);
        if self.seconds_left == 0 {
            self.phase = ChallengePhase::TimedOut;
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn protect_challenge() -> SentenceChallenge {
        SentenceChallenge {
            id: "1".to_owned(),
            template: "We must _____ our planet.".to_owned(),
            answer: "protect".to_owned(),
            keywords: vec!["protect".to_owned(), "preserve".to_owned()],
        }
    }

    fn keywords(words: &[&str]) -> Vec<String> {
        words.iter().map(|&w| w.to_owned()).collect()
    }

    #[test]
    fn canonical_keyword_token_scores_six() {
        // "protect": +1 base, +2 keyword overlap, then the running total
        // doubles on the canonical-answer match -> (1 + 2) * 2 = 6
        let points = score_answer("protect", &keywords(&["protect"]), "protect");
        assert_eq!(points, 6);
    }

    #[test]
    fn short_tokens_and_stop_words_never_score() {
        assert_eq!(score_answer("to a an of", &keywords(&["to"]), "to"), 0);
        assert_eq!(score_answer("we it do", &keywords(&["we"]), "we"), 0);
        assert_eq!(score_answer("", &keywords(&["protect"]), "protect"), 0);
    }

    #[test]
    fn keyword_overlap_matches_substrings_both_ways() {
        // token contained in a keyword
        assert_eq!(score_answer("protec", &keywords(&["protect"]), "x"), 3);
        // keyword contained in the token
        assert_eq!(score_answer("protection", &keywords(&["protect"]), "x"), 3);
        // case-insensitive
        assert_eq!(score_answer("PROTECT", &keywords(&["Protect"]), "x"), 3);
        // no overlap
        assert_eq!(score_answer("ocean", &keywords(&["protect"]), "x"), 1);
    }

    #[test]
    fn canonical_match_doubles_the_running_total_per_token() {
        // "protect planet": protect -> (1+2)*2 = 6, planet -> +1 = 7
        let points = score_answer("protect planet", &keywords(&["protect"]), "protect");
        assert_eq!(points, 7);

        // two canonical-matching tokens compound:
        // "pro" -> (1+2)*2 = 6, then "tect" -> (6+1+2)*2 = 18
        let points = score_answer("pro tect", &keywords(&["protect"]), "protect");
        assert_eq!(points, 18);
    }

    #[test]
    fn scoring_is_multiplicative_not_additive() {
        // If the canonical bonus were additive (+points instead of *2) these
        // would differ; pin the compounding order-dependent semantics.
        let kws = keywords(&["sustainable"]);
        let one = score_answer("sustainable", &kws, "sustainable world");
        assert_eq!(one, 6);
        let two = score_answer("sustainable world", &kws, "sustainable world");
        // sustainable -> (1+2)*2 = 6, world -> (6+1)*2 = 14
        assert_eq!(two, 14);
    }

    #[test]
    fn blank_answers_cannot_be_previewed_or_submitted() {
        let mut active = ActiveChallenge::new(protect_challenge(), keywords(&["protect"]));
        assert!(matches!(active.preview(), Err(ChallengeError::EmptyAnswer)));
        active.push_char(' ');
        assert!(matches!(active.submit(), Err(ChallengeError::EmptyAnswer)));
        assert!(active.phase().is_offered());
    }

    #[test]
    fn preview_then_submit_flow() {
        let mut active = ActiveChallenge::new(protect_challenge(), keywords(&["protect"]));
        for c in "protect".chars() {
            active.push_char(c);
        }
        assert_eq!(active.points(), 6);

        active.preview().unwrap();
        assert!(active.phase().is_previewing());
        // typing is frozen while previewing
        active.push_char('!');
        assert_eq!(active.answer(), "protect");

        active.edit();
        assert!(active.phase().is_offered());
        active.preview().unwrap();

        assert_eq!(active.submit().unwrap(), 6);
        assert!(active.phase().is_submitted());
        assert!(matches!(
            active.submit(),
            Err(ChallengeError::AlreadyResolved)
        ));
    }

    #[test]
    fn countdown_times_out_after_twenty_seconds() {
        let mut active = ActiveChallenge::new(protect_challenge(), keywords(&["protect"]));
        for _ in 0..CHALLENGE_SECONDS - 1 {
            assert!(!active.tick_second());
        }
        assert_eq!(active.seconds_left(), 1);
        assert!(active.tick_second());
        assert!(active.phase().is_timed_out());
        // terminal: further ticks and submits are inert
        assert!(!active.tick_second());
        assert!(active.submit().is_err());
    }

    #[test]
    fn skip_resolves_without_points() {
        let mut active = ActiveChallenge::new(protect_challenge(), keywords(&["protect"]));
        active.push_char('x');
        active.skip();
        assert!(active.phase().is_skipped());
        assert!(active.is_resolved());
    }
}
