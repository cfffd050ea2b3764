//! Ratatui-based terminal UI.
//!
//! Two views: a landing screen and the application wizard. The wizard view
//! renders one question at a time, then a review screen listing every answer,
//! then the verdict. The prediction call runs on a worker thread so the event
//! loop keeps redrawing while it is in flight.

use std::io;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Gauge, List, ListItem, Paragraph, Wrap},
};
use tracing::{debug, info};

use crate::domain::{FeatureVector, STEP_COUNT, StepDefinition};
use crate::error::AppError;
use crate::predictor::{PredictError, Predictor, PredictorClient, PredictorConfig};
use crate::wizard::{Phase, SubmitTicket, Submission, WizardState};

mod input;

/// Start the TUI.
pub fn run(config: PredictorConfig) -> Result<(), AppError> {
    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::runtime(format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(config);
    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode()
            .map_err(|e| AppError::runtime(format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::runtime(format!("Failed to enter alternate screen: {e}")));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

type Outcome = Result<Option<String>, PredictError>;

/// A prediction call running on a worker thread.
struct InFlight {
    ticket: SubmitTicket,
    features: FeatureVector,
    rx: Receiver<Outcome>,
}

enum View {
    Home,
    Wizard(Box<WizardSession>),
}

struct WizardSession {
    state: WizardState,
    in_flight: Option<InFlight>,
}

struct App {
    config: PredictorConfig,
    view: View,
    ticks: u64,
}

/// What a key press asks the event loop to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Action {
    None,
    Quit,
    Start,
    Home,
    Type(char),
    Erase,
    CycleOption,
    Next,
    Back,
    Submit,
}

impl App {
    fn new(config: PredictorConfig) -> Self {
        Self {
            config,
            view: View::Home,
            ticks: 0,
        }
    }

    fn event_loop<B: ratatui::backend::Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
    ) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if self.poll_submission() {
                needs_redraw = true;
            }
            if self.is_submitting() {
                self.ticks = self.ticks.wrapping_add(1);
                needs_redraw = true;
            }

            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::runtime(format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::runtime(format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::runtime(format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key) {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn is_submitting(&self) -> bool {
        matches!(&self.view, View::Wizard(s) if s.in_flight.is_some())
    }

    /// Returns `true` when the app should exit.
    fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return true;
        }

        let action = match &self.view {
            View::Home => input::home_action(key.code),
            View::Wizard(session) => {
                input::wizard_action(session.state.phase(), session.state.current_step(), key.code)
            }
        };
        self.apply(action)
    }

    fn apply(&mut self, action: Action) -> bool {
        match action {
            Action::Quit => return true,
            Action::Start => {
                info!("starting a new application");
                self.view = View::Wizard(Box::new(WizardSession {
                    state: WizardState::new(),
                    in_flight: None,
                }));
            }
            Action::Home => {
                // Dropping the session also drops any pending receiver.
                debug!("returning to home");
                self.view = View::Home;
            }
            Action::Submit => self.start_submission(),
            Action::None => {}
            edit => {
                if let View::Wizard(session) = &mut self.view {
                    apply_edit(&mut session.state, edit);
                }
            }
        }
        false
    }

    fn start_submission(&mut self) {
        let View::Wizard(session) = &mut self.view else {
            return;
        };
        let Ok(Submission { ticket, features }) = session.state.begin_submit() else {
            // Rejections are reflected in the state's error or are no-ops.
            return;
        };

        let (tx, rx) = mpsc::channel();
        let config = self.config.clone();
        thread::spawn(move || {
            let client = PredictorClient::new(&config);
            let outcome = client.predict(&features);
            // The receiver is gone if the user left the wizard.
            let _ = tx.send(outcome);
        });
        session.in_flight = Some(InFlight { ticket, features, rx });
    }

    /// Apply a finished prediction, if any. Returns whether state changed.
    fn poll_submission(&mut self) -> bool {
        let View::Wizard(session) = &mut self.view else {
            return false;
        };
        let Some(pending) = &session.in_flight else {
            return false;
        };

        let outcome = match pending.rx.try_recv() {
            Ok(outcome) => outcome,
            Err(TryRecvError::Empty) => return false,
            Err(TryRecvError::Disconnected) => Err(PredictError::Decode(
                "prediction worker exited without a response".to_string(),
            )),
        };

        if let Some(InFlight { ticket, features, .. }) = session.in_flight.take() {
            session.state.finish_submit(ticket, features, outcome);
        }
        true
    }

    fn draw(&self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        self.draw_header(frame, chunks[0]);
        match &self.view {
            View::Home => self.draw_home(frame, chunks[1]),
            View::Wizard(session) => self.draw_wizard(frame, chunks[1], session),
        }
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let line = Line::from(vec![
            Span::styled("loan", Style::default().fg(Color::Cyan)),
            Span::raw(" | loan approval wizard | predictor: "),
            Span::styled(self.config.predict_url(), Style::default().fg(Color::Gray)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_home(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let text = Text::from(vec![
            Line::from(Span::styled(
                "Loan Approval Prediction",
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::raw(""),
            Line::raw(format!(
                "Answer {STEP_COUNT} short questions about the applicant and get an instant verdict."
            )),
            Line::raw(""),
            Line::from(Span::styled(
                "Press Enter to start your application",
                Style::default().fg(Color::Yellow),
            )),
        ]);
        let p = Paragraph::new(text)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(Block::default().title("Home").borders(Borders::ALL));
        frame.render_widget(p, centered(area, 70, 9));
    }

    fn draw_wizard(&self, frame: &mut ratatui::Frame<'_>, area: Rect, session: &WizardSession) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0)])
            .split(area);

        let state = &session.state;
        let done = state.step_index().min(STEP_COUNT);
        let gauge = Gauge::default()
            .block(Block::default().title("Progress").borders(Borders::ALL))
            .gauge_style(Style::default().fg(Color::Cyan))
            .ratio(done as f64 / STEP_COUNT as f64)
            .label(format!("{done}/{STEP_COUNT}"));
        frame.render_widget(gauge, chunks[0]);

        match state.phase() {
            Phase::Answering(_) => {
                if let Some(step) = state.current_step() {
                    self.draw_step(frame, chunks[1], state, step);
                }
            }
            Phase::Review => self.draw_review(frame, chunks[1], state),
            Phase::Result => self.draw_result(frame, chunks[1], state),
        }
    }

    fn draw_step(
        &self,
        frame: &mut ratatui::Frame<'_>,
        area: Rect,
        state: &WizardState,
        step: &StepDefinition,
    ) {
        let input = state.current_input();
        let mut lines = vec![
            Line::from(Span::styled(step.placeholder, Style::default().fg(Color::Gray))),
            Line::raw(""),
            Line::from(vec![
                Span::raw("> "),
                Span::styled(input.to_string(), Style::default().add_modifier(Modifier::BOLD)),
                Span::styled("_", Style::default().fg(Color::Cyan)),
            ]),
        ];
        if !step.options().is_empty() {
            lines.push(Line::raw(""));
            lines.push(Line::from(Span::styled(
                format!("Options: {}  (Tab to cycle)", step.options().join(" / ")),
                Style::default().fg(Color::Gray),
            )));
        }
        if let Some(err) = state.error() {
            lines.push(Line::raw(""));
            lines.push(Line::from(Span::styled(err.to_string(), Style::default().fg(Color::Red))));
        }

        let title = format!("{} ({}/{STEP_COUNT})", step.name, state.step_index() + 1);
        let p = Paragraph::new(Text::from(lines))
            .wrap(Wrap { trim: false })
            .block(Block::default().title(title).borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_review(&self, frame: &mut ratatui::Frame<'_>, area: Rect, state: &WizardState) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(4)])
            .split(area);

        let items: Vec<ListItem> = crate::domain::STEPS
            .iter()
            .map(|step| {
                let value = state.answers().get(step.field).unwrap_or("-");
                ListItem::new(Line::from(vec![
                    Span::styled(format!("{:<26}", step.name), Style::default().fg(Color::Gray)),
                    Span::raw(value.to_string()),
                ]))
            })
            .collect();
        let list = List::new(items).block(
            Block::default()
                .title("Review & Submit")
                .borders(Borders::ALL),
        );
        frame.render_widget(list, chunks[0]);

        let status = if state.is_submitting() {
            let dots = ".".repeat((self.ticks / 3 % 4) as usize);
            Line::from(Span::styled(
                format!("Submitting{dots}"),
                Style::default().fg(Color::Yellow),
            ))
        } else if let Some(err) = state.error() {
            Line::from(Span::styled(err.to_string(), Style::default().fg(Color::Red)))
        } else {
            Line::raw("Please review your inputs and submit your loan request.")
        };
        let p = Paragraph::new(status)
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, chunks[1]);
    }

    fn draw_result(&self, frame: &mut ratatui::Frame<'_>, area: Rect, state: &WizardState) {
        let verdict_style = match state.result() {
            Some(v) if v.eq_ignore_ascii_case("approved") => Style::default().fg(Color::Green),
            Some(_) => Style::default().fg(Color::Yellow),
            None => Style::default().fg(Color::Red),
        };
        let mut lines = vec![
            Line::raw(""),
            Line::from(Span::styled(
                state.result_text().to_string(),
                verdict_style.add_modifier(Modifier::BOLD),
            )),
            Line::raw(""),
        ];
        if let Some(features) = state.submitted_features() {
            lines.push(Line::from(Span::styled(
                format!(
                    "total assets {:.0} | debt/income {:.4} | loan/assets {:.4} | cibil bucket {}",
                    features.total_assets(),
                    features.debt_to_income(),
                    features.loan_to_assets(),
                    features.cibil_bucket(),
                ),
                Style::default().fg(Color::Gray),
            )));
        }
        if let Some(at) = state.completed_at() {
            lines.push(Line::from(Span::styled(
                format!("submitted {}", at.format("%Y-%m-%d %H:%M:%S")),
                Style::default().fg(Color::Gray),
            )));
        }

        let p = Paragraph::new(Text::from(lines))
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .title("Loan Approval Result")
                    .borders(Borders::ALL),
            );
        frame.render_widget(p, centered(area, 80, 9));
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = match &self.view {
            View::Home => "Enter start  q quit",
            View::Wizard(session) => match session.state.phase() {
                Phase::Answering(_) => "type to answer  Enter next  Esc back  Ctrl-C quit",
                Phase::Review if session.state.is_submitting() => "waiting for the predictor...",
                Phase::Review => "Enter submit  Esc back  Ctrl-C quit",
                Phase::Result => "Enter back to home  q quit",
            },
        };
        let p = Paragraph::new(Line::from(Span::styled(help, Style::default().fg(Color::Gray))))
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

/// Text-editing and navigation actions on the wizard state.
fn apply_edit(state: &mut WizardState, action: Action) {
    match action {
        Action::Type(c) => {
            let mut text = state.current_input().to_string();
            text.push(c);
            state.set_input(text);
        }
        Action::Erase => {
            let mut text = state.current_input().to_string();
            text.pop();
            state.set_input(text);
        }
        Action::CycleOption => {
            if let Some(step) = state.current_step() {
                if let Some(next) = input::next_option(step.options(), state.current_input()) {
                    state.set_input(next);
                }
            }
        }
        Action::Next => {
            state.next();
        }
        Action::Back => {
            state.back();
        }
        _ => {}
    }
}

/// A rect of at most `width` x `height`, centered in `area`.
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    Rect {
        x: area.x + (area.width - w) / 2,
        y: area.y + (area.height - h) / 2,
        width: w,
        height: h,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typing_and_erasing_edit_the_current_answer() {
        let mut state = WizardState::new();
        apply_edit(&mut state, Action::Type('4'));
        apply_edit(&mut state, Action::Type('2'));
        assert_eq!(state.current_input(), "42");
        apply_edit(&mut state, Action::Erase);
        assert_eq!(state.current_input(), "4");
        apply_edit(&mut state, Action::Next);
        assert_eq!(state.phase(), Phase::Answering(1));
    }

    #[test]
    fn tab_cycles_choice_options() {
        let mut state = WizardState::new();
        state.set_input("1");
        state.next();
        apply_edit(&mut state, Action::CycleOption);
        assert_eq!(state.current_input(), "graduate");
        apply_edit(&mut state, Action::CycleOption);
        assert_eq!(state.current_input(), "not graduate");
        apply_edit(&mut state, Action::CycleOption);
        assert_eq!(state.current_input(), "graduate");
    }

    #[test]
    fn start_and_home_reset_the_session() {
        let mut app = App::new(PredictorConfig::default());
        assert!(!app.apply(Action::Start));
        app.apply(Action::Type('3'));
        app.apply(Action::Next);
        let View::Wizard(session) = &app.view else {
            panic!("expected wizard view");
        };
        assert_eq!(session.state.phase(), Phase::Answering(1));

        app.apply(Action::Home);
        assert!(matches!(app.view, View::Home));
        app.apply(Action::Start);
        let View::Wizard(session) = &app.view else {
            panic!("expected wizard view");
        };
        assert_eq!(session.state.phase(), Phase::Answering(0));
        assert!(session.state.answers().is_empty());
    }

    #[test]
    fn quit_action_exits() {
        let mut app = App::new(PredictorConfig::default());
        assert!(app.apply(Action::Quit));
    }

    #[test]
    fn centered_clamps_to_area() {
        let area = Rect::new(0, 0, 40, 5);
        let r = centered(area, 80, 9);
        assert_eq!((r.width, r.height), (40, 5));
        let r = centered(Rect::new(0, 0, 100, 20), 80, 10);
        assert_eq!((r.x, r.y), (10, 5));
    }
}
