use serde::{Deserialize, Serialize};

use super::piece::Piece;

/// Playable board width in cells.
pub const BOARD_WIDTH: usize = 10;
/// Playable board height in cells.
pub const BOARD_HEIGHT: usize = 17;

/// Color tag attached to a piece and carried into placed cells.
///
/// The palette is supplied by the vocabulary provider; this enum lists every
/// color the default palette uses. Rendering backends map tags to concrete
/// colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorTag {
    Blue,
    Yellow,
    Purple,
    Green,
    Red,
    Indigo,
    Orange,
    Pink,
    Teal,
    Lime,
    Rose,
    Emerald,
    Cyan,
    Amber,
    Violet,
    Slate,
}

impl ColorTag {
    /// Every color tag, in palette order.
    pub const ALL: [ColorTag; 16] = [
        ColorTag::Blue,
        ColorTag::Yellow,
        ColorTag::Purple,
        ColorTag::Green,
        ColorTag::Red,
        ColorTag::Indigo,
        ColorTag::Orange,
        ColorTag::Pink,
        ColorTag::Teal,
        ColorTag::Lime,
        ColorTag::Rose,
        ColorTag::Emerald,
        ColorTag::Cyan,
        ColorTag::Amber,
        ColorTag::Violet,
        ColorTag::Slate,
    ];
}

/// A placed cell: the keyword of the block that landed here plus the color of
/// the piece it came from. Immutable once placed; removed only by a sweep.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub keyword: String,
    pub color: ColorTag,
}

/// Result of one sweep pass over the board.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepOutcome {
    /// Number of full rows removed.
    pub lines_cleared: usize,
    /// Keywords from every cleared cell, bottom-to-top, left-to-right.
    ///
    /// Collected for challenge selection, which currently ignores them and
    /// picks uniformly at random from the pool.
    pub keywords: Vec<String>,
}

type Row = [Option<Cell>; BOARD_WIDTH];

fn empty_row() -> Row {
    std::array::from_fn(|_| None)
}

/// The fixed 10×17 grid of placed cells.
///
/// Coordinates are `(x, y)` with `x` growing rightward and `y` growing
/// downward. Pieces may extend above the visible area (`y < 0`) while
/// spawning; the spawn area is never occupied and never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    rows: [Row; BOARD_HEIGHT],
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    #[must_use]
    pub fn new() -> Self {
        Self {
            rows: std::array::from_fn(|_| empty_row()),
        }
    }

    /// True iff `x` is a valid column and `y` has not passed the bottom.
    ///
    /// There is deliberately no lower bound on `y`: blocks above the board
    /// are in bounds while a piece spawns.
    #[must_use]
    pub fn is_in_bounds(x: i32, y: i32) -> bool {
        #[expect(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
        const WIDTH: i32 = BOARD_WIDTH as i32;
        #[expect(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
        const HEIGHT: i32 = BOARD_HEIGHT as i32;
        (0..WIDTH).contains(&x) && y < HEIGHT
    }

    /// True iff `(x, y)` holds a placed cell. Always false for `y < 0`.
    #[must_use]
    pub fn is_occupied(&self, x: i32, y: i32) -> bool {
        let (Ok(x), Ok(y)) = (usize::try_from(x), usize::try_from(y)) else {
            return false;
        };
        x < BOARD_WIDTH && y < BOARD_HEIGHT && self.rows[y][x].is_some()
    }

    /// True iff every block of `piece` is in bounds and lands on a free cell.
    ///
    /// Pure: neither the board nor the piece is modified.
    #[must_use]
    pub fn is_valid_position(&self, piece: &Piece) -> bool {
        piece
            .absolute_blocks()
            .all(|(x, y, _)| Self::is_in_bounds(x, y) && !self.is_occupied(x, y))
    }

    /// Returns the cell at `(x, y)`, if occupied.
    #[must_use]
    pub fn cell(&self, x: usize, y: usize) -> Option<&Cell> {
        self.rows.get(y)?.get(x)?.as_ref()
    }

    /// Iterates the rows top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &Row> {
        self.rows.iter()
    }

    /// Writes every in-bounds block of `piece` into the grid.
    ///
    /// Blocks still above the top edge (`y < 0`) are silently dropped; a
    /// validly committed piece never has any, so this is a defensive no-op
    /// rather than an error.
    pub fn place(&mut self, piece: &Piece) {
        let color = piece.color();
        for (x, y, keyword) in piece.absolute_blocks() {
            let (Ok(x), Ok(y)) = (usize::try_from(x), usize::try_from(y)) else {
                continue;
            };
            if x < BOARD_WIDTH && y < BOARD_HEIGHT {
                self.rows[y][x] = Some(Cell {
                    keyword: keyword.to_owned(),
                    color,
                });
            }
        }
    }

    /// Removes every full row, sliding the rows above it down and inserting
    /// empty rows at the top.
    ///
    /// Scans bottom to top. After a removal the same row index is examined
    /// again, since the row that slid into it may itself be full.
    pub fn sweep(&mut self) -> SweepOutcome {
        let mut outcome = SweepOutcome::default();
        let mut y = BOARD_HEIGHT;
        while y > 0 {
            let row = y - 1;
            if self.rows[row].iter().any(Option::is_none) {
                y -= 1;
                continue;
            }
            outcome
                .keywords
                .extend(self.rows[row].iter().flatten().map(|c| c.keyword.clone()));
            self.rows[..=row].rotate_right(1);
            self.rows[0] = empty_row();
            outcome.lines_cleared += 1;
            // do not decrement y: re-examine the row that slid in
        }
        outcome
    }
}
