use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block as BlockWidget, Clear, Padding, Paragraph, Widget, Wrap},
};
use wordfall_engine::{ActiveChallenge, BLANK_MARKER, ChallengePhase};

use crate::ui::widgets::{color, style};

/// Popup for an active sentence challenge: the template, the countdown, the
/// typed answer, and the keyword hints.
#[derive(Debug)]
pub struct ChallengeDisplay<'a> {
    challenge: &'a ActiveChallenge,
}

impl<'a> ChallengeDisplay<'a> {
    pub fn new(challenge: &'a ActiveChallenge) -> Self {
        Self { challenge }
    }

    pub fn width(&self) -> u16 {
        48
    }

    pub fn height(&self) -> u16 {
        12
    }

    fn sentence_line(&self) -> Line<'_> {
        let template = &self.challenge.challenge().template;
        if self.challenge.phase() == ChallengePhase::Previewing {
            // show the sentence as it would read with the answer filled in
            let answer = Span::styled(
                self.challenge.answer(),
                Style::new().fg(color::GREEN).add_modifier(Modifier::BOLD),
            );
            let (before, after) = template
                .split_once(BLANK_MARKER)
                .unwrap_or((template.as_str(), ""));
            Line::from(vec![Span::raw(before), answer, Span::raw(after)])
        } else {
            Line::raw(template.as_str())
        }
    }
}

impl Widget for ChallengeDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &ChallengeDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let seconds = self.challenge.seconds_left();
        let countdown_color = if seconds <= 5 { color::RED } else { color::YELLOW };
        let title = Line::from(vec![
            Span::raw(" SENTENCE CHALLENGE "),
            Span::styled(
                format!("{seconds:>2}s "),
                Style::new().fg(countdown_color).add_modifier(Modifier::BOLD),
            ),
        ])
        .centered();

        let block = BlockWidget::bordered()
            .title(title)
            .padding(Padding::symmetric(2, 1))
            .border_style(Style::new().fg(countdown_color))
            .style(style::DEFAULT);
        let inner = block.inner(area);

        Clear.render(area, buf);
        block.render(area, buf);

        let keywords = self.challenge.available_keywords().join(", ");
        let answer_line = match self.challenge.phase() {
            ChallengePhase::Previewing => Line::from(vec![
                Span::raw("Submit this answer? "),
                Span::styled("Enter", Style::new().fg(color::GREEN)),
                Span::raw(" / "),
                Span::styled("Esc", Style::new().fg(color::YELLOW)),
                Span::raw(" to edit"),
            ]),
            _ => Line::from(vec![
                Span::raw("Answer: "),
                Span::styled(
                    self.challenge.answer(),
                    Style::new().add_modifier(Modifier::BOLD),
                ),
                Span::styled("_", Style::new().fg(color::GRAY)),
            ]),
        };

        let lines = vec![
            self.sentence_line(),
            Line::raw(""),
            Line::styled(
                format!("Keywords: {keywords}"),
                Style::new().fg(color::GRAY),
            ),
            Line::raw(""),
            answer_line,
            Line::styled(
                format!("Points: {}", self.challenge.points()),
                Style::new().fg(color::GREEN),
            ),
        ];
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .style(style::DEFAULT)
            .render(inner, buf);
    }
}
