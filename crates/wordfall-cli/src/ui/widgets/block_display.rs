use ratatui::{
    prelude::{Buffer, Rect},
    style::{Color, Style},
    widgets::{Paragraph, Widget},
};
use wordfall_engine::{Cell, ColorTag};

use crate::ui::widgets::{color, style};

/// Terminal color for each palette tag.
pub fn tag_color(tag: ColorTag) -> Color {
    match tag {
        ColorTag::Blue => Color::Rgb(59, 130, 246),
        ColorTag::Yellow => Color::Rgb(234, 179, 8),
        ColorTag::Purple => Color::Rgb(168, 85, 247),
        ColorTag::Green => Color::Rgb(34, 197, 94),
        ColorTag::Red => Color::Rgb(239, 68, 68),
        ColorTag::Indigo => Color::Rgb(99, 102, 241),
        ColorTag::Orange => Color::Rgb(249, 115, 22),
        ColorTag::Pink => Color::Rgb(236, 72, 153),
        ColorTag::Teal => Color::Rgb(20, 184, 166),
        ColorTag::Lime => Color::Rgb(132, 204, 22),
        ColorTag::Rose => Color::Rgb(244, 63, 94),
        ColorTag::Emerald => Color::Rgb(16, 185, 129),
        ColorTag::Cyan => Color::Rgb(6, 182, 212),
        ColorTag::Amber => Color::Rgb(245, 158, 11),
        ColorTag::Violet => Color::Rgb(139, 92, 246),
        ColorTag::Slate => Color::Rgb(100, 116, 139),
    }
}

/// One board cell on screen: a colored square carrying the initial of its
/// keyword.
#[derive(Debug)]
pub struct BlockDisplay {
    style: Style,
    symbol: String,
}

impl BlockDisplay {
    pub fn width() -> u16 {
        2
    }

    pub fn height() -> u16 {
        1
    }

    pub fn empty(show_dots: bool) -> Self {
        Self {
            style: style::EMPTY_DOT,
            symbol: if show_dots { ".".to_owned() } else { String::new() },
        }
    }

    pub fn keyword_block(color: ColorTag, keyword: &str) -> Self {
        let initial = keyword
            .chars()
            .next()
            .map(|c| c.to_ascii_uppercase().to_string())
            .unwrap_or_default();
        Self {
            style: Style::new().fg(color::BLACK).bg(tag_color(color)),
            symbol: initial,
        }
    }

    pub fn from_cell(cell: Option<&Cell>, show_dots: bool) -> Self {
        match cell {
            Some(cell) => Self::keyword_block(cell.color, &cell.keyword),
            None => Self::empty(show_dots),
        }
    }
}

impl Widget for BlockDisplay {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &BlockDisplay {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        // Use a Paragraph to fill the whole area, not just the symbol cell
        Paragraph::new(self.symbol.as_str())
            .style(self.style)
            .centered()
            .render(area, buf);
    }
}
