use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Flex, Layout, Rect},
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};
use wordfall_engine::{BOARD_HEIGHT, BOARD_WIDTH, Board, Piece};

use crate::ui::widgets::BlockDisplay;

/// The play field grid with the falling piece overlaid.
#[derive(Debug)]
pub struct BoardDisplay<'a> {
    board: &'a Board,
    falling_piece: Option<&'a Piece>,
    block: Option<BlockWidget<'a>>,
}

impl<'a> BoardDisplay<'a> {
    pub fn new(board: &'a Board) -> Self {
        Self {
            board,
            falling_piece: None,
            block: None,
        }
    }

    pub fn falling_piece(self, piece: &'a Piece) -> Self {
        Self {
            falling_piece: Some(piece),
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
        u16::try_from(BOARD_WIDTH).unwrap_or(u16::MAX) * BlockDisplay::width()
            + super::block_horizontal_margin(self.block.as_ref())
    }

    pub fn height(&self) -> u16 {
        u16::try_from(BOARD_HEIGHT).unwrap_or(u16::MAX) * BlockDisplay::height()
            + super::block_vertical_margin(self.block.as_ref())
    }

    /// The falling piece's block at `(x, y)`, if any. Blocks above the top
    /// edge are not drawn.
    fn piece_block_at(&self, x: i32, y: i32) -> Option<BlockDisplay> {
        let piece = self.falling_piece?;
        piece
            .absolute_blocks()
            .find(|&(bx, by, _)| bx == x && by == y)
            .map(|(_, _, keyword)| BlockDisplay::keyword_block(piece.color(), keyword))
    }
}

impl Widget for BoardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &BoardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let col_constraints = (0..BOARD_WIDTH).map(|_| Constraint::Length(BlockDisplay::width()));
        let row_constraints = (0..BOARD_HEIGHT).map(|_| Constraint::Length(BlockDisplay::height()));
        let horizontal = Layout::horizontal(col_constraints).flex(Flex::Center);
        let vertical = Layout::vertical(row_constraints);

        let grid_rows = area
            .layout::<BOARD_HEIGHT>(&vertical)
            .into_iter()
            .map(|row| row.layout::<BOARD_WIDTH>(&horizontal));

        for (y, grid_row) in grid_rows.enumerate() {
            for (x, grid_cell) in grid_row.into_iter().enumerate() {
                #[expect(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
                let overlay = self.piece_block_at(x as i32, y as i32);
                let block_display =
                    overlay.unwrap_or_else(|| BlockDisplay::from_cell(self.board.cell(x, y), true));
                block_display.render(grid_cell, buf);
            }
        }
    }
}
