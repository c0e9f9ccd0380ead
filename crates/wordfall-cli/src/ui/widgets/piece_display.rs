use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Flex, Layout, Rect},
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};
use wordfall_engine::Piece;

use crate::ui::widgets::BlockDisplay;

/// Preview of a single piece in its spawn orientation, used for the NEXT
/// panel. Every spawn-orientation shape fits in a 4×2 box.
#[derive(Debug)]
pub struct PieceDisplay<'a> {
    piece: Option<&'a Piece>,
    block: Option<BlockWidget<'a>>,
}

const PREVIEW_COLS: u16 = 4;
const PREVIEW_ROWS: u16 = 2;

impl<'a> PieceDisplay<'a> {
    pub fn new() -> Self {
        Self {
            piece: None,
            block: None,
        }
    }

    pub fn piece(self, piece: &'a Piece) -> Self {
        Self {
            piece: Some(piece),
            ..self
        }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub fn width(&self) -> u16 {
        PREVIEW_COLS * BlockDisplay::width() + super::block_horizontal_margin(self.block.as_ref())
    }

    pub fn height(&self) -> u16 {
        PREVIEW_ROWS * BlockDisplay::height() + super::block_vertical_margin(self.block.as_ref())
    }
}

impl Default for PieceDisplay<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl Widget for PieceDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &PieceDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let col_constraints = (0..PREVIEW_COLS).map(|_| Constraint::Length(BlockDisplay::width()));
        let row_constraints = (0..PREVIEW_ROWS).map(|_| Constraint::Length(BlockDisplay::height()));
        let horizontal = Layout::horizontal(col_constraints).flex(Flex::Center);
        let vertical = Layout::vertical(row_constraints);
        let grid_rows = area
            .layout_vec(&vertical)
            .into_iter()
            .map(|row| row.layout_vec(&horizontal));

        let empty = BlockDisplay::empty(false);
        for (y, grid_row) in grid_rows.enumerate() {
            for (x, grid_cell) in grid_row.into_iter().enumerate() {
                #[expect(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
                let occupied = self.piece.and_then(|piece| {
                    piece
                        .blocks()
                        .iter()
                        .find(|b| b.dx == x as i32 && b.dy == y as i32)
                        .map(|b| BlockDisplay::keyword_block(piece.color(), &b.keyword))
                });
                match occupied {
                    Some(block_display) => block_display.render(grid_cell, buf),
                    None => Widget::render(&empty, grid_cell, buf),
                }
            }
        }
    }
}
