use rand::{Rng, distr::StandardUniform, prelude::Distribution};

use super::board::ColorTag;

/// Spawn anchor for every freshly generated piece.
pub const SPAWN_X: i32 = 3;
pub const SPAWN_Y: i32 = 0;

/// The seven canonical piece shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PieceShape {
    I,
    O,
    T,
    S,
    Z,
    J,
    L,
}

impl Distribution<PieceShape> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceShape {
        match rng.random_range(0..=6) {
            0 => PieceShape::I,
            1 => PieceShape::O,
            2 => PieceShape::T,
            3 => PieceShape::S,
            4 => PieceShape::Z,
            5 => PieceShape::J,
            _ => PieceShape::L,
        }
    }
}

impl PieceShape {
    /// Number of shapes (7).
    pub const LEN: usize = 7;

    /// Block offsets relative to the piece anchor, in generation order.
    #[must_use]
    pub const fn offsets(self) -> [(i32, i32); 4] {
        match self {
            PieceShape::I => [(0, 0), (1, 0), (2, 0), (3, 0)],
            PieceShape::O => [(0, 0), (1, 0), (0, 1), (1, 1)],
            PieceShape::T => [(1, 0), (0, 1), (1, 1), (2, 1)],
            PieceShape::S => [(1, 0), (2, 0), (0, 1), (1, 1)],
            PieceShape::Z => [(0, 0), (1, 0), (1, 1), (2, 1)],
            PieceShape::J => [(0, 0), (0, 1), (1, 1), (2, 1)],
            PieceShape::L => [(2, 0), (0, 1), (1, 1), (2, 1)],
        }
    }
}

/// One block of a piece: an offset from the anchor plus the keyword the block
/// carries. Keywords are assigned per block at generation time, not per
/// piece.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockOffset {
    pub dx: i32,
    pub dy: i32,
    pub keyword: String,
}

impl BlockOffset {
    #[must_use]
    pub fn new(dx: i32, dy: i32, keyword: impl Into<String>) -> Self {
        Self {
            dx,
            dy,
            keyword: keyword.into(),
        }
    }
}

/// A falling piece: four keyword-carrying blocks around an anchor, sharing
/// one color tag.
///
/// Pieces are values: `translated` and `rotated` return new pieces and leave
/// the original untouched, so the current and next piece never alias.
/// Absolute block coordinates are `anchor + offset`, recomputed on every
/// read and never cached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Piece {
    blocks: [BlockOffset; 4],
    anchor: (i32, i32),
    color: ColorTag,
}

impl Piece {
    /// Builds a piece of `shape` at the spawn anchor, attaching one keyword
    /// per block.
    #[must_use]
    pub fn new(shape: PieceShape, keywords: [String; 4], color: ColorTag) -> Self {
        let mut keywords = keywords.into_iter();
        let blocks = shape
            .offsets()
            .map(|(dx, dy)| BlockOffset::new(dx, dy, keywords.next().unwrap()));
        Self {
            blocks,
            anchor: (SPAWN_X, SPAWN_Y),
            color,
        }
    }

    pub(crate) fn from_parts(blocks: [BlockOffset; 4], anchor: (i32, i32), color: ColorTag) -> Self {
        Self {
            blocks,
            anchor,
            color,
        }
    }

    #[must_use]
    pub fn anchor(&self) -> (i32, i32) {
        self.anchor
    }

    #[must_use]
    pub fn color(&self) -> ColorTag {
        self.color
    }

    #[must_use]
    pub fn blocks(&self) -> &[BlockOffset; 4] {
        &self.blocks
    }

    /// Absolute `(x, y, keyword)` of every block.
    pub fn absolute_blocks(&self) -> impl Iterator<Item = (i32, i32, &str)> + '_ {
        let (ax, ay) = self.anchor;
        self.blocks
            .iter()
            .map(move |b| (ax + b.dx, ay + b.dy, b.keyword.as_str()))
    }

    /// The same piece shifted by `(dx, dy)`.
    #[must_use]
    pub fn translated(&self, dx: i32, dy: i32) -> Self {
        Self {
            blocks: self.blocks.clone(),
            anchor: (self.anchor.0 + dx, self.anchor.1 + dy),
            color: self.color,
        }
    }

    /// The same piece rotated 90° clockwise about its anchor.
    ///
    /// Each offset maps `(dx, dy) -> (-dy, dx)`; keywords travel with their
    /// blocks. Validity against a board is the caller's concern.
    #[must_use]
    pub fn rotated(&self) -> Self {
        let blocks = self
            .blocks
            .clone()
            .map(|b| BlockOffset::new(-b.dy, b.dx, b.keyword));
        Self {
            blocks,
            anchor: self.anchor,
            color: self.color,
        }
    }
}
