use rand::Rng;

use crate::core::{board::Board, piece::Piece};

use super::piece_generator::PieceGenerator;

/// Horizontal shifts tried, in order, when an in-place rotation collides.
///
/// Deliberately not a full SRS kick table; rotation near walls or stacks can
/// fail where standard Tetris would kick, and that is expected behavior.
const WALL_KICKS: [i32; 4] = [-1, 1, -2, 2];

/// What a commit produced.
#[derive(Debug, Clone)]
pub struct CommitOutcome {
    pub lines_cleared: usize,
    /// Keywords collected from the cleared rows.
    pub keywords: Vec<String>,
    /// True if the freshly spawned piece collides: game over.
    pub top_out: bool,
}

/// The board plus the current and next falling piece.
#[derive(Debug, Clone)]
pub struct PlayField {
    board: Board,
    current: Piece,
    next: Piece,
}

impl PlayField {
    pub(crate) fn new<R: Rng + ?Sized>(generator: &PieceGenerator, rng: &mut R) -> Self {
        Self {
            board: Board::new(),
            current: generator.generate(rng),
            next: generator.generate(rng),
        }
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn current_piece(&self) -> &Piece {
        &self.current
    }

    #[must_use]
    pub fn next_piece(&self) -> &Piece {
        &self.next
    }

    /// Translates the current piece if the result is valid. A rejected move
    /// keeps the old piece and is not an error.
    pub(crate) fn try_move(&mut self, dx: i32, dy: i32) -> bool {
        let moved = self.current.translated(dx, dy);
        if !self.board.is_valid_position(&moved) {
            return false;
        }
        self.current = moved;
        true
    }

    /// Rotates the current piece clockwise, trying the wall-kick shifts when
    /// the in-place rotation collides. If nothing validates the rotation is
    /// abandoned and the pre-rotation piece is kept.
    pub(crate) fn try_rotate(&mut self) -> bool {
        let rotated = self.current.rotated();
        if self.board.is_valid_position(&rotated) {
            self.current = rotated;
            return true;
        }
        for kick in WALL_KICKS {
            let kicked = rotated.translated(kick, 0);
            if self.board.is_valid_position(&kicked) {
                self.current = kicked;
                return true;
            }
        }
        false
    }

    #[cfg(test)]
    pub(crate) fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    #[cfg(test)]
    pub(crate) fn set_current(&mut self, piece: Piece) {
        self.current = piece;
    }

    /// Commits the current piece: writes it into the board, sweeps, then
    /// promotes the next piece and generates a fresh one behind it.
    ///
    /// Ownership of the committed blocks transfers to the board; the old
    /// current piece value is gone after this call.
    pub(crate) fn commit_and_advance<R: Rng + ?Sized>(
        &mut self,
        generator: &PieceGenerator,
        rng: &mut R,
    ) -> CommitOutcome {
        self.board.place(&self.current);
        let swept = self.board.sweep();

        let spawned = std::mem::replace(&mut self.next, generator.generate(rng));
        let top_out = !self.board.is_valid_position(&spawned);
        self.current = spawned;

        CommitOutcome {
            lines_cleared: swept.lines_cleared,
            keywords: swept.keywords,
            top_out,
        }
    }
}
