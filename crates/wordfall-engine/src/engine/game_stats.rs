/// Running statistics for one session: score, cleared lines, and challenge
/// counters.
///
/// The level is never stored; it is recomputed from the cleared-line total on
/// every read, so it can only ever increase and never drifts out of sync with
/// the score.
#[derive(Debug, Clone, Default)]
pub struct GameStats {
    score: usize,
    total_cleared_lines: usize,
    pieces_placed: usize,
    challenges_attempted: usize,
    challenges_completed: usize,
}

impl GameStats {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn score(&self) -> usize {
        self.score
    }

    #[must_use]
    pub fn total_cleared_lines(&self) -> usize {
        self.total_cleared_lines
    }

    #[must_use]
    pub fn pieces_placed(&self) -> usize {
        self.pieces_placed
    }

    #[must_use]
    pub fn challenges_attempted(&self) -> usize {
        self.challenges_attempted
    }

    #[must_use]
    pub fn challenges_completed(&self) -> usize {
        self.challenges_completed
    }

    /// Current level: one step up per ten cleared lines.
    #[must_use]
    pub fn level(&self) -> usize {
        1 + self.total_cleared_lines / 10
    }

    pub(crate) fn record_commit(&mut self) {
        self.pieces_placed += 1;
    }

    /// Awards line-clear points and advances the cleared-line total.
    ///
    /// Points use the level as it was before this clear; a clear that crosses
    /// a level boundary is paid at the old rate.
    pub(crate) fn record_line_clear(&mut self, lines: usize) {
        self.score += lines * 100 * self.level();
        self.total_cleared_lines += lines;
    }

    pub(crate) fn record_challenge_attempt(&mut self) {
        self.challenges_attempted += 1;
    }

    /// Adds challenge points; only submitted answers land here.
    pub(crate) fn record_answer(&mut self, points: usize) {
        self.score += points;
        self.challenges_completed += 1;
    }
}
