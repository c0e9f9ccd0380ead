use crossterm::event::{Event, KeyCode};
use ratatui::{
    Frame,
    layout::{Constraint, Layout},
    style::{Color, Style},
    text::Text,
};
use wordfall_engine::{ChallengePhase, GameInput, GameSession, SessionPhase};

use crate::{
    tui::{App, Tui},
    ui::widgets::SessionDisplay,
};

#[derive(Debug)]
pub struct PlayApp {
    session: GameSession,
    is_exiting: bool,
}

impl PlayApp {
    pub fn new(session: GameSession) -> Self {
        Self {
            session,
            is_exiting: false,
        }
    }

    fn help_text(&self) -> &'static str {
        match self.session.phase() {
            SessionPhase::NotStarted => "Controls: Enter (Start) | Q (Quit)",
            SessionPhase::Running => {
                "Controls: ← → (Move) | ↓ (Drop) | ↑ (Rotate) | R (Restart) | Q (Quit)"
            }
            SessionPhase::ChallengeActive => match self.session.challenge().map(|c| c.phase()) {
                Some(ChallengePhase::Previewing) => {
                    "Challenge: Enter (Confirm) | Esc (Edit answer)"
                }
                _ => "Challenge: type your answer | Enter (Preview) | Esc (Skip)",
            },
            SessionPhase::GameOver => "Controls: R (Restart) | Q (Quit)",
        }
    }

    fn handle_running_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Left => self.session.handle_input(GameInput::MoveLeft),
            KeyCode::Right => self.session.handle_input(GameInput::MoveRight),
            KeyCode::Down => self.session.handle_input(GameInput::MoveDown),
            KeyCode::Up => self.session.handle_input(GameInput::Rotate),
            _ => {}
        }
    }

    fn handle_challenge_key(&mut self, code: KeyCode) {
        let previewing = self
            .session
            .challenge()
            .is_some_and(|c| c.phase() == ChallengePhase::Previewing);
        match code {
            KeyCode::Enter if previewing => {
                // points are already reflected in the stats panel
                _ = self.session.submit_challenge();
            }
            // a blank answer cannot be previewed; the error leaves editing open
            KeyCode::Enter => _ = self.session.preview_challenge(),
            KeyCode::Esc if previewing => self.session.edit_challenge(),
            KeyCode::Esc => self.session.skip_challenge(),
            KeyCode::Backspace => self.session.challenge_pop_char(),
            KeyCode::Char(c) => self.session.challenge_push_char(c),
            _ => {}
        }
    }
}

impl App for PlayApp {
    #[expect(clippy::cast_precision_loss)]
    fn init(&mut self, tui: &mut Tui) {
        tui.set_tick_rate(self.session.fps() as f64);
    }

    fn should_exit(&self) -> bool {
        self.is_exiting
    }

    fn handle_event(&mut self, _tui: &mut Tui, event: Event) {
        let Some(event) = event.as_key_event() else {
            return;
        };
        let phase = self.session.phase();

        // challenge typing owns the keyboard, including 'q' and 'r'
        if phase.is_challenge_active() {
            self.handle_challenge_key(event.code);
            return;
        }

        match event.code {
            KeyCode::Char('q') => {
                self.session.stop();
                self.is_exiting = true;
            }
            KeyCode::Enter if phase.is_not_started() => self.session.start(),
            KeyCode::Char('r') if !phase.is_not_started() => self.session.restart(),
            code if phase.is_running() => self.handle_running_key(code),
            _ => {}
        }
    }

    fn draw(&self, frame: &mut Frame) {
        let session_display = SessionDisplay::new(&self.session);
        let help_text = Text::from(self.help_text())
            .style(Style::default().fg(Color::DarkGray))
            .centered();

        let [main_area, help_area] =
            Layout::vertical([Constraint::Fill(1), Constraint::Length(1)])
                .areas::<2>(frame.area());
        frame.render_widget(session_display, main_area);
        frame.render_widget(help_text, help_area);
    }

    fn update(&mut self, _tui: &mut Tui) {
        self.session.tick();
    }
}
